//! Light propagation by multi-source breadth-first flood fill.
//!
//! Emitters start at full brightness; each hop through a non-opaque cell
//! costs [`LIGHT_FALLOFF`]. A cell keeps the brightest level that reaches it.

use super::NeighborTable;

/// Level written into emitter cells.
pub const MAX_LIGHT: u8 = 255;
/// Brightness lost per hop.
pub const LIGHT_FALLOFF: u8 = 2;

/// Light flood fill with reusable frontier queues.
#[derive(Debug, Clone)]
pub struct LightPropagator {
    frontier: Vec<usize>,
    next: Vec<usize>,
}

impl LightPropagator {
    /// Allocate queues for a grid of `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            frontier: Vec::with_capacity(size),
            next: Vec::with_capacity(size),
        }
    }

    /// Recompute the light field from scratch.
    ///
    /// Returns the number of propagation waves run.
    pub fn propagate(
        &mut self,
        cells: &[u8],
        neighbors: &NeighborTable,
        light: &mut [u8],
        emitter: u8,
        opaque: u8,
    ) -> usize {
        debug_assert_eq!(cells.len(), light.len());
        debug_assert_eq!(neighbors.len(), light.len());

        light.fill(0);
        self.frontier.clear();
        self.next.clear();

        for (index, &kind) in cells.iter().enumerate() {
            if kind == emitter {
                light[index] = MAX_LIGHT;
                self.frontier.push(index);
            }
        }

        let mut waves = 0;
        while !self.frontier.is_empty() {
            for &index in &self.frontier {
                let level = light[index].saturating_sub(LIGHT_FALLOFF);
                for neighbor in neighbors.around(index).into_iter().flatten() {
                    // Equal-or-brighter cells were reached by a shorter path.
                    if cells[neighbor] == opaque || light[neighbor] >= level {
                        continue;
                    }
                    light[neighbor] = level;
                    self.next.push(neighbor);
                }
            }
            std::mem::swap(&mut self.frontier, &mut self.next);
            self.next.clear();
            waves += 1;
        }
        waves
    }
}
