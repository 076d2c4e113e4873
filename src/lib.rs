//! Explicit finite-difference solvers for the linear advection equation
//! `u_t + a u_x = 0` on `[0, 1]`, and the mesh-refinement studies measuring their
//! observed order of convergence.

pub mod bc;
pub mod convergence;
pub mod driver;
pub mod mesh;
pub mod method;
pub mod methods;
pub mod norms;
pub mod problem;
pub mod sim;

pub type Float = f64;

pub use bc::{
    update_ftbs, update_lw, BoundaryCondition, BoundaryMode, Dirichlet, Extrapolation, Periodic,
};
pub use convergence::{
    observed_order, observed_orders, run_convergence_study, ConvergenceTable, RunParameters,
};
pub use driver::{Driver, Logger, ObsCtx, Observer, SimError};
pub use mesh::{Grid, Layout};
pub use method::{Method, Scheme};
pub use norms::{ErrorReport, Norm, NormWindow};
pub use problem::{InitialCondition, Problem};
pub use sim::Simulation;

/// State of a time step, handed to boundary conditions.
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub(crate) problem: &'a Problem,
    pub(crate) grid: &'a Grid,
    pub(crate) t: Float,
}

impl<'a> Ctx<'a> {
    pub fn new(problem: &'a Problem, grid: &'a Grid, t: Float) -> Self {
        Self { problem, grid, t }
    }

    pub fn problem(&self) -> &Problem {
        self.problem
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn time(&self) -> Float {
        self.t
    }
}
