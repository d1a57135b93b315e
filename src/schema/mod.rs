//! Schema module - Configuration, cell kinds and seeding types for sandbox worlds.

mod cell;
mod config;
mod seed;

pub use cell::*;
pub use config::*;
pub use seed::*;
