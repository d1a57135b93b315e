//! Grid state: every per-cell buffer of one sandbox world.

use crate::schema::{CellKind, Rgb, Seed, SimulationConfig, UnknownCellKind, WorldLayers};

use super::{MassField, NeighborTable, cell_index};

/// Simulation state container.
///
/// All buffers are flat and indexed by [`cell_index`]; colors hold 3 bytes per cell.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Grid width (X dimension).
    pub width: usize,
    /// Grid height (Y dimension).
    pub height: usize,
    /// Cell type bytes (see [`CellKind`]).
    pub cells: Vec<u8>,
    /// RGB color per cell.
    pub colors: Vec<u8>,
    /// Light level per cell.
    pub light: Vec<u8>,
    /// Static ambient brightness per cell.
    pub noise: Vec<u8>,
    /// Water mass.
    pub mass: MassField,
    /// Down/left/right/up neighbor indices.
    pub neighbors: NeighborTable,
}

impl Grid {
    /// Create an empty, dry grid with full-brightness background.
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            cells: vec![CellKind::Air.as_u8(); size],
            colors: vec![0; size * 3],
            light: vec![0; size],
            noise: vec![255; size],
            mass: MassField::new(size),
            neighbors: NeighborTable::build(width, height),
        }
    }

    /// Create new state from seed.
    pub fn from_seed(seed: &Seed, config: &SimulationConfig) -> Self {
        Self::from_layers(config.width, config.height, seed.generate(config))
    }

    /// Wrap pre-built buffers.
    pub fn from_layers(width: usize, height: usize, layers: WorldLayers) -> Self {
        let size = width * height;
        assert_eq!(layers.cells.len(), size, "cell buffer size");
        assert_eq!(layers.colors.len(), size * 3, "color buffer size");
        assert_eq!(layers.mass.len(), size, "mass buffer size");
        assert_eq!(layers.noise.len(), size, "noise buffer size");
        Self {
            width,
            height,
            cells: layers.cells,
            colors: layers.colors,
            light: vec![0; size],
            noise: layers.noise,
            mass: MassField::from_values(layers.mass),
            neighbors: NeighborTable::build(width, height),
        }
    }

    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Storage index of world `(x, y)`, or `None` off-grid.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        cell_index(self.width, self.height, x, y)
    }

    /// Kind stored at a storage index.
    pub fn kind(&self, index: usize) -> Result<CellKind, UnknownCellKind> {
        CellKind::try_from(self.cells[index])
    }

    /// Kind at world `(x, y)`; `None` off-grid.
    pub fn kind_at(&self, x: i32, y: i32) -> Option<CellKind> {
        self.index(x, y).and_then(|i| self.kind(i).ok())
    }

    /// Color of a cell.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        let c = &self.colors[index * 3..index * 3 + 3];
        Rgb::new(c[0], c[1], c[2])
    }

    #[inline]
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        self.colors[index * 3..index * 3 + 3].copy_from_slice(&color.channels());
    }

    /// Committed water mass at world `(x, y)`; 0 off-grid.
    pub fn mass_at(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.mass.get(i))
    }

    /// Get total water mass.
    pub fn total_mass(&self) -> f32 {
        self.mass.total()
    }

    /// Reset every cell to dry air. Noise is kept.
    pub fn clear(&mut self) {
        self.cells.fill(CellKind::Air.as_u8());
        self.colors.fill(0);
        self.light.fill(0);
        self.mass.clear();
    }
}
