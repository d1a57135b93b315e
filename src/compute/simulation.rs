//! Simulation driver.
//!
//! Runs the fixed per-frame phase order: settle, redistribute water, derive
//! colors, propagate light.

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::schema::{CellKind, ConfigError, EMITTER, OPAQUE, SETTLED, Seed, SimulationConfig};

use super::{
    Brush, Grid, LightPropagator, SettleStats, ShadeInputs, Tool, redistribute, settle, shade,
};

/// A sandbox world plus everything needed to advance it.
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    light: LightPropagator,
    brush: Brush,
    rng: StdRng,
    /// Step count.
    step: u64,
    /// Set when clay or emitters changed since the last light pass.
    light_dirty: bool,
}

impl Simulation {
    /// Create new simulation from configuration and seed.
    pub fn new(config: SimulationConfig, seed: &Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::from_seed(seed, &config);
        info!(
            "Created {}x{} simulation ({:?})",
            config.width, config.height, seed.pattern
        );
        Ok(Self::from_grid(config, grid, seed.noise_seed))
    }

    /// Wrap an existing grid. The grid must match the configured dimensions.
    pub fn from_grid(config: SimulationConfig, grid: Grid, rng_seed: u64) -> Self {
        assert_eq!(
            (grid.width, grid.height),
            (config.width, config.height),
            "grid does not match configuration"
        );
        Self {
            light: LightPropagator::new(grid.grid_size()),
            brush: Brush::new(config.brush),
            rng: StdRng::seed_from_u64(rng_seed),
            step: 0,
            light_dirty: true,
            config,
            grid,
        }
    }

    /// Perform one simulation step: settle sand, then move water.
    pub fn step(&mut self) -> SettleStats {
        let grid = &mut self.grid;
        let settled = settle(
            &mut grid.cells,
            &mut grid.colors,
            &mut grid.mass,
            grid.width,
            grid.height,
            self.step,
            SETTLED,
            &self.config.fluid,
        );
        redistribute(
            &grid.cells,
            &grid.neighbors,
            grid.mass.begin_frame(),
            &self.config.fluid,
        );
        self.step += 1;
        settled
    }

    /// Run simulation for specified number of steps.
    pub fn run(&mut self, steps: u64) {
        let mut totals = SettleStats::default();
        for _ in 0..steps {
            let s = self.step();
            totals.moved += s.moved;
            totals.destroyed += s.destroyed;
        }
        debug!(
            "Ran {} steps (now {}): {} moves, {} destroyed, mass {:.4}",
            steps,
            self.step,
            totals.moved,
            totals.destroyed,
            self.grid.total_mass()
        );
    }

    /// Recompute colors of empty cells from noise and water.
    pub fn update_color(&mut self) {
        let grid = &mut self.grid;
        let inputs = ShadeInputs {
            cells: &grid.cells,
            noise: &grid.noise,
            mass: grid.mass.values(),
            neighbors: &grid.neighbors,
            air: self.config.palette.air,
            water: self.config.palette.water,
            fluid: &self.config.fluid,
        };
        shade(&inputs, &mut grid.colors, grid.width);
    }

    /// Recompute the light field.
    pub fn update_light(&mut self) {
        let grid = &mut self.grid;
        let waves = self
            .light
            .propagate(&grid.cells, &grid.neighbors, &mut grid.light, EMITTER, OPAQUE);
        self.light_dirty = false;
        debug!("Light converged after {} waves", waves);
    }

    /// Advance `steps` steps, then refresh colors and, if needed, light.
    ///
    /// Settling never creates or removes clay or emitters, so light only
    /// needs recomputing after brush strokes or reseeding.
    pub fn frame(&mut self, steps: u64) {
        self.run(steps);
        self.update_color();
        if self.light_dirty {
            self.update_light();
        }
    }

    /// Apply one brush stroke at world `(x, y)`.
    pub fn paint(&mut self, x: i32, y: i32, tool: Tool) {
        let dirty = self.brush.apply(
            &mut self.grid,
            x,
            y,
            tool,
            &self.config.palette,
            &mut self.rng,
        );
        self.light_dirty |= dirty;
    }

    /// Change the brush size (0.0-1.0).
    pub fn set_brush_size(&mut self, size: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&size) {
            return Err(ConfigError::InvalidBrushSize(size));
        }
        self.config.brush.size = size;
        self.brush = Brush::new(self.config.brush);
        Ok(())
    }

    /// Replace the world with a freshly seeded one.
    pub fn reset(&mut self, seed: &Seed) {
        self.grid = Grid::from_seed(seed, &self.config);
        self.step = 0;
        self.light_dirty = true;
    }

    /// Empty the world, keeping the background noise.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.light_dirty = true;
    }

    /// Get grid reference.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access. Marks light for recomputation.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.light_dirty = true;
        &mut self.grid
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps taken so far.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Whether the light field is out of date.
    pub fn light_dirty(&self) -> bool {
        self.light_dirty
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::from_simulation(self)
    }
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SimulationStats {
    pub step: u64,
    pub total_mass: f32,
    pub max_mass: f32,
    pub wet_cells: usize,
    pub air_cells: usize,
    pub clay_cells: usize,
    pub light_cells: usize,
    pub sand_cells: usize,
    pub lit_cells: usize,
    pub max_light: u8,
}

impl SimulationStats {
    /// Compute statistics from a simulation.
    pub fn from_simulation(sim: &Simulation) -> Self {
        let grid = sim.grid();
        let min_mass = sim.config().fluid.min_mass;
        let mut stats = Self {
            step: sim.step_count(),
            ..Default::default()
        };

        for (index, &kind) in grid.cells.iter().enumerate() {
            match CellKind::try_from(kind) {
                Ok(CellKind::Air) => stats.air_cells += 1,
                Ok(CellKind::Clay) => stats.clay_cells += 1,
                Ok(CellKind::Light) => stats.light_cells += 1,
                Ok(CellKind::Sand) => stats.sand_cells += 1,
                Ok(CellKind::Water) | Err(_) => {}
            }
            let mass = grid.mass.get(index);
            stats.total_mass += mass;
            stats.max_mass = stats.max_mass.max(mass);
            if mass >= min_mass {
                stats.wet_cells += 1;
            }
            let light = grid.light[index];
            if light > 0 {
                stats.lit_cells += 1;
            }
            stats.max_light = stats.max_light.max(light);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Pattern;

    fn config(width: usize, height: usize) -> SimulationConfig {
        SimulationConfig {
            width,
            height,
            ..Default::default()
        }
    }

    fn custom(cells: Vec<(usize, usize, CellKind)>) -> Seed {
        Seed {
            pattern: Pattern::Custom { cells },
            noise_seed: 5,
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Simulation::new(config(0, 4), &Seed::default());
        assert!(matches!(result, Err(ConfigError::InvalidDimensions)));
    }

    #[test]
    fn test_step_counter_and_cadence() {
        let mut sim = Simulation::new(config(3, 3), &custom(vec![(1, 2, CellKind::Sand)])).unwrap();
        // Step 0 moves the sand, step 1 does not.
        assert_eq!(sim.step().moved, 1);
        assert_eq!(sim.step().moved, 0);
        assert_eq!(sim.step().moved, 1);
        assert_eq!(sim.step_count(), 3);
        assert_eq!(sim.grid().kind_at(1, 0), Some(CellKind::Sand));
        // Step 3 is odd, step 4 destroys the sand at the bottom.
        sim.run(2);
        assert_eq!(sim.grid().kind_at(1, 0), Some(CellKind::Air));
        assert_eq!(sim.stats().sand_cells, 0);
    }

    #[test]
    fn test_pool_conserves_water() {
        let seed = Seed {
            pattern: Pattern::Pool {
                min: (0.25, 0.25),
                max: (0.75, 0.5),
                mass: 0.6,
            },
            noise_seed: 0,
        };
        let mut sim = Simulation::new(config(16, 16), &seed).unwrap();
        let initial = sim.grid().total_mass();
        assert!(initial > 0.0);
        sim.run(200);
        let final_mass = sim.grid().total_mass();
        assert!(
            (initial - final_mass).abs() / initial < 1e-3,
            "Mass not conserved: {} -> {}",
            initial,
            final_mass
        );
    }

    #[test]
    fn test_frame_shades_and_lights() {
        let mut sim = Simulation::new(
            config(8, 8),
            &custom(vec![(4, 4, CellKind::Light), (0, 7, CellKind::Water)]),
        )
        .unwrap();
        assert!(sim.light_dirty());
        sim.frame(1);
        assert!(!sim.light_dirty());

        let stats = sim.stats();
        assert_eq!(stats.max_light, 255);
        assert_eq!(stats.lit_cells, 64);
        assert_eq!(stats.light_cells, 1);
        // Dry background got the ambient color.
        let i = sim.grid().index(7, 0).unwrap();
        assert_ne!(sim.grid().color(i), crate::schema::Rgb::default());
    }

    #[test]
    fn test_paint_marks_light_dirty() {
        let mut sim = Simulation::new(config(8, 8), &custom(vec![])).unwrap();
        sim.frame(0);
        for _ in 0..32 {
            sim.paint(4, 4, Tool::Paint(CellKind::Sand));
        }
        assert!(!sim.light_dirty());
        for _ in 0..32 {
            sim.paint(4, 4, Tool::Paint(CellKind::Light));
        }
        assert!(sim.light_dirty());
        sim.frame(0);
        assert!(sim.stats().max_light == 255);
    }

    #[test]
    fn test_brush_size_validated() {
        let mut sim = Simulation::new(config(4, 4), &custom(vec![])).unwrap();
        assert!(sim.set_brush_size(0.5).is_ok());
        assert!(matches!(
            sim.set_brush_size(1.5),
            Err(ConfigError::InvalidBrushSize(_))
        ));
    }

    #[test]
    fn test_reset_and_clear() {
        let mut sim = Simulation::new(config(4, 4), &custom(vec![(0, 3, CellKind::Clay)])).unwrap();
        sim.run(4);
        sim.clear();
        assert_eq!(sim.stats().clay_cells, 0);
        sim.reset(&custom(vec![(1, 1, CellKind::Clay)]));
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.stats().clay_cells, 1);
        assert!(sim.light_dirty());
    }
}
