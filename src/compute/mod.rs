//! Compute module - Per-frame physics phases and the driver that sequences them.

mod brush;
mod coords;
mod fluid;
mod grid;
mod light;
mod mass;
mod settle;
mod shading;
mod simulation;

pub use brush::*;
pub use coords::*;
pub use fluid::*;
pub use grid::*;
pub use light::*;
pub use mass::*;
pub use settle::*;
pub use shading::*;
pub use simulation::*;
