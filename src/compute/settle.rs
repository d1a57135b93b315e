//! Granular settling: particles fall, slide diagonally, and displace water.
//!
//! The pass mutates the grid in place, so sweep order is observable: a cell
//! vacated earlier in the sweep is immediately available to later cells.

use crate::schema::{EMPTY, FluidConfig, SETTLED};

use super::{MassField, cell_index};

/// Outcome counts of one settling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleStats {
    pub moved: usize,
    pub destroyed: usize,
}

/// Advance every cell of type `particle` by one settling step.
///
/// Runs only on even `step` values. Columns are swept left-to-right when
/// `step % 4 == 0` and right-to-left otherwise.
///
/// A particle that moves always leaves [`SETTLED`] in its destination cell,
/// whatever `particle` is.
#[allow(clippy::too_many_arguments)]
pub fn settle(
    cells: &mut [u8],
    colors: &mut [u8],
    mass: &mut MassField,
    width: usize,
    height: usize,
    step: u64,
    particle: u8,
    fluid: &FluidConfig,
) -> SettleStats {
    let size = width * height;
    debug_assert_eq!(cells.len(), size);
    debug_assert_eq!(colors.len(), size * 3);
    debug_assert_eq!(mass.len(), size);

    let mut stats = SettleStats::default();
    if step % 2 != 0 {
        return stats;
    }

    let nx: i32 = if step % 4 == 0 { 1 } else { -1 };

    for y in 0..height as i32 {
        for sx in 0..width as i32 {
            let x = if nx == 1 { sx } else { width as i32 - 1 - sx };
            let Some(index) = cell_index(width, height, x, y) else {
                continue;
            };
            if cells[index] != particle {
                continue;
            }

            let mut target = cell_index(width, height, x, y - 1);
            if occupied(cells, target) {
                target = cell_index(width, height, x - nx, y - 1);
                if occupied(cells, target) {
                    target = cell_index(width, height, x + nx, y - 1);
                    if occupied(cells, target) {
                        continue;
                    }
                }
            }

            match target {
                None => {
                    cells[index] = EMPTY;
                    stats.destroyed += 1;
                }
                Some(target) => {
                    cells[index] = cells[target];
                    cells[target] = SETTLED;
                    // Displaced water moves up into the vacated cell.
                    mass.set(index, mass.get(target).min(fluid.max_mass));
                    mass.set(target, 0.0);
                    colors.copy_within(index * 3..index * 3 + 3, target * 3);
                    stats.moved += 1;
                }
            }
        }
    }

    stats
}

/// In-bounds and not empty. Off-grid targets count as free.
#[inline]
fn occupied(cells: &[u8], target: Option<usize>) -> bool {
    target.is_some_and(|t| cells[t] != EMPTY)
}
