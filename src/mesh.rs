use faer_core::{Mat, MatRef};

use crate::Float;

// grid[0] <-> lower
// grid[i] <-> lower + i * delta forall i
// grid[steps] <-> upper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub(crate) lower: Float,
    pub(crate) upper: Float,
    pub(crate) delta: Float,
    pub(crate) steps: usize,
}

impl Grid {
    pub fn from_steps(lower: Float, upper: Float, steps: usize) -> Self {
        let delta = (upper - lower) / steps as Float;
        Self {
            lower,
            upper,
            delta,
            steps,
        }
    }

    pub fn with_steps(self, steps: usize) -> Self {
        Self::from_steps(self.lower, self.upper, steps)
    }

    pub fn delta(&self) -> Float {
        self.delta
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Nodes `lower, lower + h, ..., upper`.
    pub fn iter(self) -> impl Iterator<Item = Float> {
        (0..(self.steps + 1)).map(move |i| self.lower + self.delta * i as Float)
    }

    /// Cell centers, padded with one ghost center on each side.
    pub fn cell_centers(self) -> impl Iterator<Item = Float> {
        (0..(self.steps + 2)).map(move |i| self.lower + self.delta * (i as Float - 0.5))
    }
}

/// Storage layout of the state vector over a [`Grid`] of `N` cells.
///
/// The two layouts are never mixed within a solve:
/// - `CellCentered`: `N + 2` values, cell averages with one ghost cell on each side;
/// - `Nodal`: `N + 1` values on the nodes, the last one duplicating the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    CellCentered,
    Nodal,
}

impl Layout {
    pub fn left_ghost_cells(self) -> usize {
        match self {
            Layout::CellCentered => 1,
            Layout::Nodal => 0,
        }
    }

    pub fn right_ghost_cells(self) -> usize {
        self.left_ghost_cells()
    }

    pub fn storage_len(self, cells: usize) -> usize {
        match self {
            Layout::CellCentered => cells + 2,
            Layout::Nodal => cells + 1,
        }
    }

    /// Number of samples that carry physical state, i.e. storage minus ghosts.
    pub fn physical_len(self, cells: usize) -> usize {
        self.storage_len(cells) - self.left_ghost_cells() - self.right_ghost_cells()
    }

    pub fn coordinates(self, grid: Grid) -> Mat<Float> {
        let x: Vec<Float> = match self {
            Layout::CellCentered => grid.cell_centers().collect(),
            Layout::Nodal => grid.iter().collect(),
        };
        Mat::from_fn(x.len(), 1, |i, _| x[i])
    }

    /// View of `u` without its ghost cells.
    pub fn physical<'a>(self, u: MatRef<'a, Float>) -> MatRef<'a, Float> {
        let left = self.left_ghost_cells();
        let len = u.nrows() - left - self.right_ghost_cells();
        u.subrows(left, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spacing() {
        let grid = Grid::from_steps(0., 1., 20);
        assert_eq!(grid.delta(), 0.05);
        assert_eq!(grid.iter().count(), 21);

        let grid = grid.with_steps(10);
        assert_eq!(grid.delta(), 0.1);
    }

    #[test]
    fn cell_centered_coordinates_include_ghosts() {
        let grid = Grid::from_steps(0., 1., 4);
        let x = Layout::CellCentered.coordinates(grid);

        assert_eq!(x.nrows(), 6);
        assert_eq!(x.read(0, 0), -0.125);
        assert_eq!(x.read(1, 0), 0.125);
        assert_eq!(x.read(5, 0), 1.125);

        let inner = Layout::CellCentered.physical(x.as_ref());
        assert_eq!(inner.nrows(), 4);
        assert_eq!(inner.read(3, 0), 0.875);
    }

    #[test]
    fn nodal_coordinates_duplicate_endpoint() {
        let grid = Grid::from_steps(0., 1., 4);
        let x = Layout::Nodal.coordinates(grid);

        assert_eq!(x.nrows(), 5);
        assert_eq!(x.read(0, 0), 0.);
        assert_eq!(x.read(4, 0), 1.);
        assert_eq!(Layout::Nodal.physical(x.as_ref()).nrows(), 5);
        assert_eq!(Layout::Nodal.physical_len(4), 5);
        assert_eq!(Layout::CellCentered.physical_len(4), 4);
    }
}
