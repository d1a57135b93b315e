//! Water mass redistribution over the 4-neighbor adjacency.
//!
//! Water is modeled as a slightly compressible column: a cell may hold a bit
//! more than `max_mass` when there is water above it. Each pass moves mass
//! down first, then sideways, then (only the compressed excess) up.

use crate::schema::{EMPTY, FluidConfig};

use super::{Direction, MassFrame, NeighborTable};

/// Mass the lower of two vertically stacked cells should hold, given their combined mass.
#[inline]
pub fn stable_state(total_mass: f32, config: &FluidConfig) -> f32 {
    let max_mass = config.max_mass;
    let compress = config.max_compress;
    if total_mass <= max_mass {
        max_mass
    } else if total_mass < 2.0 * max_mass + compress {
        (max_mass * max_mass + total_mass * compress) / (max_mass + compress)
    } else {
        (total_mass + compress) / 2.0
    }
}

/// Run one redistribution pass and commit it.
///
/// Only empty cells carry or receive mass. Mass that flows toward a missing
/// neighbor leaves the grid.
pub fn redistribute(
    cells: &[u8],
    neighbors: &NeighborTable,
    mut frame: MassFrame<'_>,
    config: &FluidConfig,
) {
    debug_assert_eq!(cells.len(), frame.len());
    debug_assert_eq!(neighbors.len(), frame.len());

    for index in 0..cells.len() {
        if cells[index] != EMPTY {
            continue;
        }
        let mass = frame.committed(index);
        let mut remaining = mass;

        for (dir, neighbor) in Direction::ALL.into_iter().zip(neighbors.around(index)) {
            if remaining <= 0.0 {
                break;
            }
            if neighbor.is_some_and(|n| cells[n] != EMPTY) {
                continue;
            }
            let neighbor_mass = neighbor.map_or(0.0, |n| frame.committed(n));

            let target = match dir {
                Direction::Down => stable_state(remaining + neighbor_mass, config) - neighbor_mass,
                // Equalize with the side neighbor
                Direction::Left | Direction::Right => (mass - neighbor_mass) / 4.0,
                // Only compressed water flows upward
                Direction::Up => remaining - stable_state(remaining + neighbor_mass, config),
            };
            let flow = clamp_flow(target, remaining, config);

            frame.transfer(index, neighbor, flow);
            remaining -= flow;
        }
    }

    frame.commit();
}

/// Damp large flows and keep the result within `[0, min(remaining, max_flow)]`.
#[inline]
fn clamp_flow(flow: f32, remaining: f32, config: &FluidConfig) -> f32 {
    let flow = if flow > config.damping_threshold {
        flow * 0.5
    } else {
        flow
    };
    flow.max(0.0).min(remaining).min(config.max_flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{MassField, cell_index};
    use crate::schema::OPAQUE;
    use proptest::prelude::*;

    fn config() -> FluidConfig {
        FluidConfig::default()
    }

    /// Empty grid whose border ring is clay, so no mass can leave.
    fn closed_box(width: usize, height: usize) -> Vec<u8> {
        let mut cells = vec![EMPTY; width * height];
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if x == 0 || y == 0 || x == width as i32 - 1 || y == height as i32 - 1 {
                    cells[cell_index(width, height, x, y).unwrap()] = OPAQUE;
                }
            }
        }
        cells
    }

    #[test]
    fn test_stable_state_below_one() {
        let c = config();
        assert_eq!(stable_state(0.0, &c), 1.0);
        assert_eq!(stable_state(0.5, &c), 1.0);
        assert_eq!(stable_state(1.0, &c), 1.0);
    }

    #[test]
    fn test_stable_state_regions_meet() {
        let c = config();
        let edge = 2.0 + c.max_compress;
        let below = stable_state(edge - 1e-4, &c);
        let above = stable_state(edge, &c);
        assert!((below - above).abs() < 1e-3);
        assert!((stable_state(1.0 + 1e-5, &c) - 1.0).abs() < 1e-4);
        assert!((stable_state(3.0, &c) - 1.51).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_stable_state_is_one_up_to_max_mass(t in -1.0f32..=1.0) {
            prop_assert_eq!(stable_state(t, &config()), 1.0);
        }

        #[test]
        fn prop_stable_state_non_decreasing(a in 1.0f32..2.02, b in 1.0f32..2.02) {
            let c = config();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(stable_state(lo, &c) <= stable_state(hi, &c) + 1e-6);
        }

        #[test]
        fn prop_stable_state_linear_tail(t in 2.02f32..100.0) {
            let c = config();
            prop_assert!((stable_state(t, &c) - (t + c.max_compress) / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_water_falls_into_empty_cell_below() {
        let (w, h) = (1, 2);
        let cells = vec![EMPTY; 2];
        let neighbors = NeighborTable::build(w, h);
        let top = cell_index(w, h, 0, 1).unwrap();
        let bottom = cell_index(w, h, 0, 0).unwrap();
        let mut mass = MassField::new(2);
        mass.set(top, 0.05);

        redistribute(&cells, &neighbors, mass.begin_frame(), &config());

        // Small flows are not damped: the whole column moves down.
        assert!(mass.get(top).abs() < 1e-6);
        assert!((mass.get(bottom) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_large_flow_is_damped() {
        let (w, h) = (1, 2);
        let cells = vec![EMPTY; 2];
        let neighbors = NeighborTable::build(w, h);
        let top = cell_index(w, h, 0, 1).unwrap();
        let bottom = cell_index(w, h, 0, 0).unwrap();
        let mut mass = MassField::new(2);
        mass.set(top, 0.8);

        redistribute(&cells, &neighbors, mass.begin_frame(), &config());

        // Down: stable target 1.0 is halved to 0.5.
        assert!((mass.get(bottom) - 0.5).abs() < 1e-6);
        // Sides are off-grid: 0.8 / 4 = 0.2 is halved to 0.1 and drained, twice.
        assert!((mass.get(top) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_flow_into_wall_is_skipped() {
        let cells = closed_box(3, 3);
        let neighbors = NeighborTable::build(3, 3);
        let center = cell_index(3, 3, 1, 1).unwrap();
        let mut mass = MassField::new(9);
        mass.set(center, 0.7);

        redistribute(&cells, &neighbors, mass.begin_frame(), &config());

        assert!((mass.get(center) - 0.7).abs() < 1e-6);
        assert!((mass.total() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_mass_lost_at_open_boundary() {
        let cells = vec![EMPTY; 1];
        let neighbors = NeighborTable::build(1, 1);
        let mut mass = MassField::from_values(vec![0.05]);

        redistribute(&cells, &neighbors, mass.begin_frame(), &config());

        assert!(mass.total() < 0.05);
    }

    #[test]
    fn test_mass_conserved_in_closed_box() {
        let (w, h) = (12, 10);
        let cells = closed_box(w, h);
        let neighbors = NeighborTable::build(w, h);
        let mut values = vec![0.0f32; w * h];
        for (i, v) in values.iter_mut().enumerate() {
            if cells[i] == EMPTY {
                *v = ((i * 37) % 11) as f32 * 0.13;
            }
        }
        let mut mass = MassField::from_values(values);
        let initial = mass.total();

        for _ in 0..50 {
            redistribute(&cells, &neighbors, mass.begin_frame(), &config());
        }

        let final_mass = mass.total();
        assert!(
            (initial - final_mass).abs() < 1e-3,
            "Mass not conserved: {} -> {}",
            initial,
            final_mass
        );
        assert!(mass.values().iter().all(|&m| m >= -1e-5));
    }

    #[test]
    fn test_side_flow_equalizes() {
        let cells = closed_box(4, 3);
        let neighbors = NeighborTable::build(4, 3);
        let left = cell_index(4, 3, 1, 1).unwrap();
        let right = cell_index(4, 3, 2, 1).unwrap();
        let mut mass = MassField::new(12);
        mass.set(left, 0.2);

        redistribute(&cells, &neighbors, mass.begin_frame(), &config());

        // (0.2 - 0) / 4 moves right
        assert!((mass.get(right) - 0.05).abs() < 1e-6);
        assert!((mass.get(left) - 0.15).abs() < 1e-6);
    }
}
