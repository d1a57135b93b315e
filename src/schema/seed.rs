//! Seed types for initializing sandbox worlds.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{CellKind, SimulationConfig};
use crate::compute::cell_index;

/// Complete seed description for world initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
    /// Random seed for the ambient background noise.
    #[serde(default)]
    pub noise_seed: u64,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Terrain {
                seed: 0,
                threshold: 0.475,
                clay_threshold: 0.5,
            },
            noise_seed: 0,
        }
    }
}

/// Predefined world layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Nothing but air.
    Empty,
    /// Layered value-noise terrain of sand with clay cores.
    Terrain {
        /// Random seed for the noise lattice.
        seed: u64,
        /// Noise level above which cells become sand.
        threshold: f32,
        /// Noise level above which cells become clay.
        clay_threshold: f32,
    },
    /// Clay basin filled with water.
    Pool {
        /// Lower-left inner corner as fraction of grid size (0.0-1.0).
        min: (f32, f32),
        /// Upper-right inner corner as fraction of grid size.
        max: (f32, f32),
        /// Water mass per interior cell.
        mass: f32,
    },
    /// Explicit cell list in world coordinates (y up).
    Custom {
        /// List of (x, y, kind) entries.
        cells: Vec<(usize, usize, CellKind)>,
    },
}

/// Flat buffers produced by a seed, in storage order.
#[derive(Debug, Clone)]
pub struct WorldLayers {
    pub cells: Vec<u8>,
    pub colors: Vec<u8>,
    pub mass: Vec<f32>,
    pub noise: Vec<u8>,
}

impl Seed {
    /// Generate initial world buffers from seed.
    pub fn generate(&self, config: &SimulationConfig) -> WorldLayers {
        let (width, height) = (config.width, config.height);
        let size = config.grid_size();
        let mut layers = WorldLayers {
            cells: vec![CellKind::Air.as_u8(); size],
            colors: vec![0; size * 3],
            mass: vec![0.0; size],
            noise: ambient_noise(size, config, self.noise_seed),
        };

        match &self.pattern {
            Pattern::Empty => {}
            Pattern::Terrain {
                seed,
                threshold,
                clay_threshold,
            } => apply_terrain(&mut layers, config, *seed, *threshold, *clay_threshold),
            Pattern::Pool { min, max, mass } => {
                let x0 = (min.0 * width as f32) as i32;
                let y0 = (min.1 * height as f32) as i32;
                let x1 = (max.0 * width as f32) as i32;
                let y1 = (max.1 * height as f32) as i32;
                let mut rng = StdRng::seed_from_u64(self.noise_seed);
                for y in (y0 - 1)..=y1 {
                    for x in (x0 - 1)..=(x1 + 1) {
                        let Some(index) = cell_index(width, height, x, y) else {
                            continue;
                        };
                        let wall = x < x0 || x > x1 || y < y0;
                        if wall {
                            place(&mut layers, config, index, CellKind::Clay, &mut rng);
                        } else {
                            layers.mass[index] = *mass;
                        }
                    }
                }
            }
            Pattern::Custom { cells } => {
                let mut rng = StdRng::seed_from_u64(self.noise_seed);
                for &(x, y, kind) in cells {
                    if let Some(index) = cell_index(width, height, x as i32, y as i32) {
                        place(&mut layers, config, index, kind, &mut rng);
                    }
                }
            }
        }

        layers
    }
}

/// Per-cell ambient brightness: `255 * (base + (r - 0.5) * spread)`.
fn ambient_noise(size: usize, config: &SimulationConfig, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = config.noise.base;
    let spread = config.noise.spread;
    (0..size)
        .map(|_| {
            let n = base + (rng.r#gen::<f32>() - 0.5) * spread;
            (255.0 * n).floor().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Write one cell the way a brush stroke would.
fn place(
    layers: &mut WorldLayers,
    config: &SimulationConfig,
    index: usize,
    kind: CellKind,
    rng: &mut StdRng,
) {
    match kind {
        CellKind::Air => {
            layers.cells[index] = CellKind::Air.as_u8();
            layers.mass[index] = 0.0;
        }
        CellKind::Water => {
            layers.cells[index] = CellKind::Air.as_u8();
            layers.mass[index] = config.brush.water_mass;
        }
        CellKind::Clay | CellKind::Light | CellKind::Sand => {
            layers.cells[index] = kind.as_u8();
            layers.mass[index] = 0.0;
            let color = config
                .palette
                .color(kind)
                .jittered(config.brush.color_noise, 1.0, rng);
            layers.colors[index * 3..index * 3 + 3].copy_from_slice(&color.channels());
        }
    }
}

fn apply_terrain(
    layers: &mut WorldLayers,
    config: &SimulationConfig,
    seed: u64,
    threshold: f32,
    clay_threshold: f32,
) {
    let (width, height) = (config.width, config.height);
    let noise = ValueNoise::new(seed);
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);

    for y in 0..height {
        for x in 0..width {
            let (fx, fy) = (x as f32, y as f32);
            let n = (noise.sample(fx / 128.0, fy / 128.0) * 0.6
                + noise.sample(fx / 64.0, fy / 32.0) * 0.3
                + noise.sample(fx / 32.0, fy / 32.0) * 0.1
                + noise.sample(fx / 16.0, fy / 16.0) * 0.1)
                * 0.5
                + 0.5;
            if n <= threshold {
                continue;
            }
            let Some(index) = cell_index(width, height, x as i32, y as i32) else {
                continue;
            };
            let kind = if n > clay_threshold {
                CellKind::Clay
            } else {
                CellKind::Sand
            };
            // Clay gets darker toward the core of a deposit.
            let brightness = if kind == CellKind::Clay {
                1.25 - n * 0.5
            } else {
                1.0
            };
            let color = config
                .palette
                .color(kind)
                .jittered(config.brush.color_noise, brightness, &mut rng);
            layers.cells[index] = kind.as_u8();
            layers.colors[index * 3..index * 3 + 3].copy_from_slice(&color.channels());
        }
    }
}

/// Smoothly interpolated lattice noise in [-1, 1].
struct ValueNoise {
    seed: u64,
}

impl ValueNoise {
    fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn lattice(&self, x: i64, y: i64) -> f32 {
        // SplitMix64 over the packed lattice coordinate
        let mut h = self
            .seed
            .wrapping_add((x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add((y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
        h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^= h >> 31;
        (h >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0
    }

    fn sample(&self, x: f32, y: f32) -> f32 {
        let (x0, y0) = (x.floor(), y.floor());
        let (tx, ty) = (smoothstep(x - x0), smoothstep(y - y0));
        let (ix, iy) = (x0 as i64, y0 as i64);
        let top = lerp(self.lattice(ix, iy), self.lattice(ix + 1, iy), tx);
        let bottom = lerp(self.lattice(ix, iy + 1), self.lattice(ix + 1, iy + 1), tx);
        lerp(top, bottom, ty)
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            width: 64,
            height: 48,
            ..Default::default()
        }
    }

    #[test]
    fn test_terrain_is_deterministic() {
        let config = small_config();
        let seed = Seed::default();
        let a = seed.generate(&config);
        let b = seed.generate(&config);
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.colors, b.colors);
        assert_eq!(a.noise, b.noise);
    }

    #[test]
    fn test_terrain_only_places_sand_and_clay() {
        let layers = Seed::default().generate(&small_config());
        assert!(layers.cells.iter().all(|&c| c == 0 || c == 1 || c == 3));
        assert!(layers.mass.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_ambient_noise_range() {
        let layers = Seed {
            pattern: Pattern::Empty,
            noise_seed: 3,
        }
        .generate(&small_config());
        // 255 * (0.8 +/- 0.01)
        assert!(layers.noise.iter().all(|&n| (201..=207).contains(&n)));
        assert!(layers.cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_pool_has_walls_and_water() {
        let config = SimulationConfig {
            width: 10,
            height: 10,
            ..Default::default()
        };
        let layers = Seed {
            pattern: Pattern::Pool {
                min: (0.2, 0.2),
                max: (0.7, 0.7),
                mass: 1.0,
            },
            noise_seed: 0,
        }
        .generate(&config);

        let at = |x: i32, y: i32| cell_index(10, 10, x, y).unwrap();
        // Floor and side walls
        assert_eq!(layers.cells[at(4, 1)], CellKind::Clay.as_u8());
        assert_eq!(layers.cells[at(1, 4)], CellKind::Clay.as_u8());
        assert_eq!(layers.cells[at(8, 4)], CellKind::Clay.as_u8());
        // Water interior
        assert_eq!(layers.cells[at(4, 4)], CellKind::Air.as_u8());
        assert_eq!(layers.mass[at(4, 4)], 1.0);
        // Open top
        assert_eq!(layers.cells[at(4, 8)], CellKind::Air.as_u8());
        assert_eq!(layers.mass[at(4, 8)], 0.0);
    }

    #[test]
    fn test_custom_cells_and_water() {
        let config = SimulationConfig {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let layers = Seed {
            pattern: Pattern::Custom {
                cells: vec![
                    (0, 0, CellKind::Sand),
                    (1, 0, CellKind::Water),
                    (9, 9, CellKind::Clay),
                ],
            },
            noise_seed: 0,
        }
        .generate(&config);

        assert_eq!(layers.cells[cell_index(4, 4, 0, 0).unwrap()], CellKind::Sand.as_u8());
        let water = cell_index(4, 4, 1, 0).unwrap();
        assert_eq!(layers.cells[water], CellKind::Air.as_u8());
        assert_eq!(layers.mass[water], config.brush.water_mass);
        assert_eq!(layers.cells.iter().filter(|&&c| c != 0).count(), 1);
    }

    #[test]
    fn test_value_noise_bounded() {
        let noise = ValueNoise::new(42);
        for i in 0..200 {
            let v = noise.sample(i as f32 * 0.37, i as f32 * 0.11);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_seed_json_round_trip() {
        let json = r#"{ "pattern": { "type": "Pool", "min": [0.1, 0.1], "max": [0.9, 0.5], "mass": 0.8 } }"#;
        let seed: Seed = serde_json::from_str(json).unwrap();
        assert!(matches!(seed.pattern, Pattern::Pool { mass, .. } if mass == 0.8));
        assert_eq!(seed.noise_seed, 0);
    }
}
