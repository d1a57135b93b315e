//! Double-buffered water mass storage.
//!
//! The fluid pass reads the committed buffer and accumulates into the staged
//! buffer. [`MassField::begin_frame`] seeds staging from committed so the pass
//! only ever applies deltas, and [`MassFrame::commit`] swaps the buffers.

/// Committed and staged water mass, one entry per cell.
#[derive(Debug, Clone)]
pub struct MassField {
    committed: Vec<f32>,
    staged: Vec<f32>,
}

impl MassField {
    /// Create a dry field of `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            committed: vec![0.0; size],
            staged: vec![0.0; size],
        }
    }

    /// Create from initial committed values.
    pub fn from_values(values: Vec<f32>) -> Self {
        let staged = values.clone();
        Self {
            committed: values,
            staged,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Committed mass of a cell.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.committed[index]
    }

    /// Overwrite a cell's mass in both buffers.
    #[inline]
    pub fn set(&mut self, index: usize, mass: f32) {
        self.committed[index] = mass;
        self.staged[index] = mass;
    }

    /// Committed mass buffer.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.committed
    }

    /// Zero both buffers.
    pub fn clear(&mut self) {
        self.committed.fill(0.0);
        self.staged.fill(0.0);
    }

    /// Total committed mass.
    pub fn total(&self) -> f32 {
        total_mass(&self.committed)
    }

    /// Start a redistribution frame with staging seeded from committed.
    pub fn begin_frame(&mut self) -> MassFrame<'_> {
        self.staged.copy_from_slice(&self.committed);
        MassFrame { field: self }
    }
}

/// An in-progress redistribution pass.
///
/// Reads see the state at frame start; writes accumulate until [`commit`](Self::commit).
/// Dropping a frame without committing discards its transfers.
#[derive(Debug)]
pub struct MassFrame<'a> {
    field: &'a mut MassField,
}

impl MassFrame<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.field.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    /// Mass of a cell at frame start.
    #[inline]
    pub fn committed(&self, index: usize) -> f32 {
        self.field.committed[index]
    }

    /// Move `amount` out of `from` and into `to`.
    ///
    /// A `None` destination drains the mass off the grid.
    #[inline]
    pub fn transfer(&mut self, from: usize, to: Option<usize>, amount: f32) {
        self.field.staged[from] -= amount;
        if let Some(to) = to {
            self.field.staged[to] += amount;
        }
    }

    /// Adopt the staged buffer as the new committed state.
    pub fn commit(self) {
        let field = self.field;
        std::mem::swap(&mut field.committed, &mut field.staged);
    }
}

/// Calculate total mass in grid (for conservation checking).
pub fn total_mass(grid: &[f32]) -> f32 {
    grid.iter().sum()
}
