use std::fmt;

use crate::{
    bc::BoundaryMode, driver::SimError, mesh::Grid, method::Scheme, norms::NormWindow,
    problem::Problem, Float,
};

/// Everything one solve needs: problem, spatial resolution, CFL number, scheme, grid
/// variant and norm window.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) problem: Problem,
    pub(crate) grid: Grid,
    pub(crate) cfl: Float,
    pub(crate) scheme: Scheme,
    pub(crate) boundary: BoundaryMode,
    pub(crate) window: NormWindow,
}

impl Simulation {
    pub fn new(problem: Problem) -> Self {
        let grid = Grid::from_steps(problem.space.0, problem.space.1, 100);
        Self {
            problem,
            grid,
            cfl: 0.9,
            scheme: Scheme::default(),
            boundary: BoundaryMode::default(),
            window: NormWindow::default(),
        }
    }

    pub fn with_cells(mut self, cells: usize) -> Self {
        self.grid = self.grid.with_steps(cells);
        self
    }

    pub fn with_cfl(mut self, cfl: Float) -> Self {
        self.cfl = cfl;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_norm_window(mut self, window: NormWindow) -> Self {
        self.window = window;
        self
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn time_step(&self) -> Float {
        self.cfl * self.grid.delta / self.problem.speed.abs()
    }

    /// Realized Courant number `a Δt / h`.
    pub fn courant(&self) -> Float {
        self.problem.speed * self.time_step() / self.grid.delta
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let cells = self.grid.steps;
        if cells == 0 {
            return Err(SimError::NoCells);
        }

        let required = self.window.min_samples();
        if self.boundary.layout().physical_len(cells) < required {
            return Err(SimError::TooCoarse { cells, required });
        }

        let t = self.problem.final_time;
        if !(t.is_finite() && t > 0.0) {
            return Err(SimError::InvalidFinalTime(t));
        }

        if !(self.cfl.is_finite() && self.cfl > 0.0) {
            return Err(SimError::InvalidCfl(self.cfl));
        }

        let courant = self.courant();
        if !(courant <= 1.0) {
            return Err(SimError::InstabilityRisk { courant });
        }

        Ok(())
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "simulation of `{}` problem:\n\t- `{}` scheme, {} boundary\n\t- Δx = {:e} ({} cells)\n\t- Δt = {:e} (ν = {})",
            self.problem.name,
            self.scheme,
            self.boundary,
            self.grid.delta,
            self.grid.steps,
            self.time_step(),
            self.courant(),
        )
    }
}
