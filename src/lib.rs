//! Falling cells - Grid sandbox kernel for sand, water and light.
//!
//! This crate implements the per-frame physics of a falling-material sandbox
//! on a fixed-size 2D grid: granular settling, mass-conserving water
//! redistribution, derived water shading, and light propagation by flood fill.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, cell kinds and world seeding
//! - `compute`: Grid buffers, the four physics phases, brush and driver
//!
//! # Example
//!
//! ```rust,no_run
//! use falling_cells::{
//!     schema::{CellKind, Pattern, Seed, SimulationConfig},
//!     compute::{Simulation, Tool},
//! };
//!
//! let config = SimulationConfig::default();
//! let seed = Seed {
//!     pattern: Pattern::Pool {
//!         min: (0.2, 0.1),
//!         max: (0.8, 0.4),
//!         mass: 1.0,
//!     },
//!     noise_seed: 1,
//! };
//! let mut sim = Simulation::new(config, &seed).expect("valid config");
//!
//! sim.paint(160, 200, Tool::Paint(CellKind::Sand));
//! sim.frame(8);
//!
//! println!("Total water after one frame: {}", sim.stats().total_mass);
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{Grid, Simulation, SimulationStats, Tool};
pub use schema::{CellKind, Pattern, Seed, SimulationConfig};
