//! Derived colors for empty (water-capable) cells.
//!
//! Background is the ambient color darkened by per-cell noise. Wet cells blend
//! in the water color, emphasized near walls and near the dry surface.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::schema::{EMPTY, FluidConfig, Rgb};

use super::{Direction, NeighborTable};

/// Read-only inputs of the shading pass.
#[derive(Clone, Copy)]
pub struct ShadeInputs<'a> {
    pub cells: &'a [u8],
    pub noise: &'a [u8],
    pub mass: &'a [f32],
    pub neighbors: &'a NeighborTable,
    pub air: Rgb,
    pub water: Rgb,
    pub fluid: &'a FluidConfig,
}

/// Recompute colors of every empty cell. Other cells keep their color.
pub fn shade(inputs: &ShadeInputs<'_>, colors: &mut [u8], width: usize) {
    let size = inputs.cells.len();
    debug_assert_eq!(colors.len(), size * 3);
    debug_assert_eq!(inputs.noise.len(), size);
    debug_assert_eq!(inputs.mass.len(), size);
    debug_assert_eq!(inputs.neighbors.len(), size);

    let shade_row = |(row, pixels): (usize, &mut [u8])| {
        for (col, pixel) in pixels.chunks_exact_mut(3).enumerate() {
            let index = row * width + col;
            if inputs.cells[index] == EMPTY {
                pixel.copy_from_slice(&shade_cell(inputs, index).channels());
            }
        }
    };

    // Rows write disjoint color slices and only read shared inputs.
    #[cfg(not(target_arch = "wasm32"))]
    colors.par_chunks_mut(width * 3).enumerate().for_each(shade_row);

    #[cfg(target_arch = "wasm32")]
    colors.chunks_mut(width * 3).enumerate().for_each(shade_row);
}

/// Color of a single empty cell.
pub fn shade_cell(inputs: &ShadeInputs<'_>, index: usize) -> Rgb {
    let n = inputs.noise[index] as f32 / 255.0;
    let base = [
        (inputs.air.r as f32 * n) as u8,
        (inputs.air.g as f32 * n) as u8,
        (inputs.air.b as f32 * n) as u8,
    ];

    let mass = inputs.mass[index];
    if mass < inputs.fluid.min_mass {
        return Rgb::new(base[0], base[1], base[2]);
    }

    let outline = outline(inputs, index);
    let weight = shade_weight(mass, outline);
    let mix = |b: u8, w: u8| ((b as f32 + w as f32 * weight) / 2.0) as u8;
    Rgb::new(
        mix(base[0], inputs.water.r),
        mix(base[1], inputs.water.g),
        mix(base[2], inputs.water.b),
    )
}

/// Water tint weight for a wet cell: `(2 - clamp(mass, 1, 1.25)) * outline`.
#[inline]
pub fn shade_weight(mass: f32, outline: f32) -> f32 {
    (2.0 - mass.clamp(1.0, 1.25)) * outline
}

/// Outline factor of a wet cell.
///
/// Sides first (the stronger of left and right), then below, then above.
/// A cell with no wall or dry neighbor at all gets 1.
pub fn outline(inputs: &ShadeInputs<'_>, index: usize) -> f32 {
    let side = |dir| neighbor_outline(inputs, inputs.neighbors.get(index, dir));
    let sides = side(Direction::Left).max(side(Direction::Right));
    [sides, side(Direction::Down), side(Direction::Up)]
        .into_iter()
        .find(|&o| o != 0.0)
        .unwrap_or(1.0)
}

#[inline]
fn neighbor_outline(inputs: &ShadeInputs<'_>, neighbor: Option<usize>) -> f32 {
    match neighbor {
        None => 0.0,
        Some(n) if inputs.cells[n] != EMPTY => 0.75,
        Some(n) if inputs.mass[n] < inputs.fluid.min_mass => 1.25,
        Some(_) => 0.0,
    }
}
