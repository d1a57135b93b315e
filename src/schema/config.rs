//! Configuration types for sandbox simulation parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CellKind, Rgb};

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Water mass model parameters.
    #[serde(default)]
    pub fluid: FluidConfig,
    /// Base colors per cell kind.
    #[serde(default)]
    pub palette: Palette,
    /// Brush parameters.
    #[serde(default)]
    pub brush: BrushConfig,
    /// Ambient background noise parameters.
    #[serde(default)]
    pub noise: NoiseConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            fluid: FluidConfig::default(),
            palette: Palette::default(),
            brush: BrushConfig::default(),
            noise: NoiseConfig::default(),
        }
    }
}

/// Water mass model parameters.
///
/// Each simulation owns its own copy so several grids can be tuned independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Un-pressurized mass of a full water cell.
    pub max_mass: f32,
    /// Excess mass a cell can hold compared to the cell above it.
    pub max_compress: f32,
    /// Cells below this mass are treated as dry.
    pub min_mass: f32,
    /// Upper bound on mass moved across one edge in one step.
    pub max_flow: f32,
    /// Flows above this are halved.
    pub damping_threshold: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            max_mass: 1.0,
            max_compress: 0.02,
            min_mass: 0.001,
            max_flow: 1.0,
            damping_threshold: 0.1,
        }
    }
}

/// Base color for every cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub air: Rgb,
    pub clay: Rgb,
    pub light: Rgb,
    pub sand: Rgb,
    pub water: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            air: Rgb::from_hex(0x112233),
            clay: Rgb::from_hex(0x332211),
            light: Rgb::from_hex(0x999988),
            sand: Rgb::from_hex(0x666600),
            water: Rgb::from_hex(0x441166),
        }
    }
}

impl Palette {
    /// Base color for a cell kind.
    pub fn color(&self, kind: CellKind) -> Rgb {
        match kind {
            CellKind::Air => self.air,
            CellKind::Clay => self.clay,
            CellKind::Light => self.light,
            CellKind::Sand => self.sand,
            CellKind::Water => self.water,
        }
    }
}

/// Brush parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Relative brush size (0.0-1.0).
    pub size: f32,
    /// Per-channel color jitter, relative to the kind's luma.
    pub color_noise: f32,
    /// Water mass deposited per painted cell.
    pub water_mass: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            size: 0.24,
            color_noise: 0.5,
            water_mass: 0.5,
        }
    }
}

/// Ambient background noise: per-cell brightness `base +/- spread / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub base: f32,
    pub spread: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            base: 0.8,
            spread: 0.02,
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        // Neighbor table entries are stored as u32 with u32::MAX reserved.
        if self.width.checked_mul(self.height).is_none_or(|n| n >= u32::MAX as usize) {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        let fluid = &self.fluid;
        if fluid.max_mass <= 0.0 {
            return Err(ConfigError::InvalidMaxMass);
        }
        if fluid.max_compress < 0.0 {
            return Err(ConfigError::InvalidCompression);
        }
        if fluid.min_mass < 0.0 || fluid.min_mass >= fluid.max_mass {
            return Err(ConfigError::InvalidMinMass);
        }
        if fluid.max_flow <= 0.0 || fluid.damping_threshold <= 0.0 {
            return Err(ConfigError::InvalidFlowLimits);
        }
        if !(0.0..=1.0).contains(&self.brush.size) {
            return Err(ConfigError::InvalidBrushSize(self.brush.size));
        }
        if !(0.0..=1.0).contains(&self.noise.base) {
            return Err(ConfigError::InvalidNoise(self.noise.base));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Grid {width}x{height} has too many cells")]
    GridTooLarge { width: usize, height: usize },
    #[error("Max mass must be positive")]
    InvalidMaxMass,
    #[error("Max compression must be non-negative")]
    InvalidCompression,
    #[error("Min mass must be non-negative and below max mass")]
    InvalidMinMass,
    #[error("Flow cap and damping threshold must be positive")]
    InvalidFlowLimits,
    #[error("Brush size {0} is outside 0.0-1.0")]
    InvalidBrushSize(f32),
    #[error("Noise base {0} is outside 0.0-1.0")]
    InvalidNoise(f32),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
