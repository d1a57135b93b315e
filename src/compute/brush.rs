//! Circular paint/erase brush.

use rand::Rng;

use crate::schema::{BrushConfig, CellKind, Palette};

use super::Grid;

/// What a brush stroke writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Write a cell kind. Painting water wets air cells.
    Paint(CellKind),
    /// Reset cells to dry air.
    Erase,
}

/// Circular brush footprint.
#[derive(Debug, Clone)]
pub struct Brush {
    offsets: Vec<(i32, i32)>,
    config: BrushConfig,
}

impl Brush {
    /// Build the footprint for `config.size` (0.0-1.0).
    ///
    /// The footprint is a `scaled x scaled` square, `scaled = 2 + floor(8 * size) * 2`,
    /// cut to a disk of radius `0.4 * scaled`.
    pub fn new(config: BrushConfig) -> Self {
        let scaled = 2 + (8.0 * config.size).floor() as i32 * 2;
        let center = scaled as f32 * 0.5;
        let radius = scaled as f32 * 0.4;
        let offsets = (0..scaled * scaled)
            .filter_map(|i| {
                let x = (i % scaled) as f32 - center;
                let y = (i / scaled) as f32 - center;
                ((x + 0.5).hypot(y + 0.5) < radius).then_some((x as i32, y as i32))
            })
            .collect();
        Self { offsets, config }
    }

    /// Cell offsets covered by the brush.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Apply one stroke centered at world `(x, y)`.
    ///
    /// Each covered cell is hit with probability 1/2, like spray paint.
    /// Returns whether any light-relevant cell (clay or emitter) was written or
    /// overwritten, meaning the light field must be recomputed.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        x: i32,
        y: i32,
        tool: Tool,
        palette: &Palette,
        rng: &mut R,
    ) -> bool {
        let mut light_dirty = false;
        for &(dx, dy) in &self.offsets {
            if rng.gen_bool(0.5) {
                continue;
            }
            let Some(index) = grid.index(x + dx, y + dy) else {
                continue;
            };
            let previous = grid.kind(index).ok();
            if previous.is_some_and(CellKind::affects_light)
                || matches!(tool, Tool::Paint(kind) if kind.affects_light())
            {
                light_dirty = true;
            }
            self.write(grid, index, tool, palette, rng);
        }
        light_dirty
    }

    fn write<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        index: usize,
        tool: Tool,
        palette: &Palette,
        rng: &mut R,
    ) {
        match tool {
            Tool::Erase | Tool::Paint(CellKind::Air) => {
                grid.cells[index] = CellKind::Air.as_u8();
                grid.mass.set(index, 0.0);
            }
            Tool::Paint(CellKind::Water) => {
                grid.cells[index] = CellKind::Air.as_u8();
                grid.mass.set(index, self.config.water_mass);
            }
            Tool::Paint(kind @ (CellKind::Clay | CellKind::Light | CellKind::Sand)) => {
                grid.cells[index] = kind.as_u8();
                grid.mass.set(index, 0.0);
                let color = palette
                    .color(kind)
                    .jittered(self.config.color_noise, 1.0, rng);
                grid.set_color(index, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn brush(size: f32) -> Brush {
        Brush::new(BrushConfig {
            size,
            ..Default::default()
        })
    }

    /// Paint until every covered cell has been hit at least once.
    fn saturate(brush: &Brush, grid: &mut Grid, x: i32, y: i32, tool: Tool) -> bool {
        let mut rng = StdRng::seed_from_u64(11);
        let palette = Palette::default();
        let mut dirty = false;
        for _ in 0..64 {
            dirty |= brush.apply(grid, x, y, tool, &palette, &mut rng);
        }
        dirty
    }

    #[test]
    fn test_smallest_brush_footprint() {
        // scaled = 2, center 1, radius 0.8: only offsets whose cell center is near the origin
        let b = brush(0.0);
        assert_eq!(b.offsets(), &[(-1, -1), (0, -1), (-1, 0), (0, 0)]);
    }

    #[test]
    fn test_footprint_grows_with_size() {
        assert!(brush(1.0).offsets().len() > brush(0.24).offsets().len());
        assert!(brush(0.24).offsets().len() > brush(0.0).offsets().len());
    }

    #[test]
    fn test_paint_water_wets_air() {
        let mut grid = Grid::new(8, 8);
        let b = brush(0.0);
        let dirty = saturate(&b, &mut grid, 4, 4, Tool::Paint(CellKind::Water));
        assert!(!dirty);
        assert!(grid.cells.iter().all(|&c| c == 0));
        assert!((grid.total_mass() - 4.0 * 0.5).abs() < 1e-6);
        assert!((grid.mass_at(4, 4) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_paint_clay_marks_light_dirty() {
        let mut grid = Grid::new(8, 8);
        let b = brush(0.0);
        assert!(saturate(&b, &mut grid, 4, 4, Tool::Paint(CellKind::Clay)));
        assert_eq!(grid.kind_at(3, 3), Some(CellKind::Clay));
        assert_eq!(grid.kind_at(4, 4), Some(CellKind::Clay));
    }

    #[test]
    fn test_erase_clears_cells_and_mass() {
        let mut grid = Grid::new(8, 8);
        let b = brush(0.0);
        saturate(&b, &mut grid, 4, 4, Tool::Paint(CellKind::Light));
        saturate(&b, &mut grid, 1, 1, Tool::Paint(CellKind::Water));
        assert!(grid.total_mass() > 0.0);
        assert!(saturate(&b, &mut grid, 4, 4, Tool::Erase));
        saturate(&b, &mut grid, 1, 1, Tool::Erase);
        assert!(grid.cells.iter().all(|&c| c == 0));
        assert_eq!(grid.total_mass(), 0.0);
    }

    #[test]
    fn test_sand_does_not_dirty_light() {
        let mut grid = Grid::new(8, 8);
        let b = brush(0.0);
        assert!(!saturate(&b, &mut grid, 4, 4, Tool::Paint(CellKind::Sand)));
        assert_eq!(grid.kind_at(4, 4), Some(CellKind::Sand));
    }

    #[test]
    fn test_stroke_clipped_at_edges() {
        let mut grid = Grid::new(4, 4);
        let b = brush(1.0);
        saturate(&b, &mut grid, 0, 0, Tool::Paint(CellKind::Sand));
        assert_eq!(grid.kind_at(0, 0), Some(CellKind::Sand));
    }
}
