use std::fmt;

use crate::{
    bc::BoundaryMode,
    driver::{Driver, SimError},
    method::Scheme,
    norms::{ErrorReport, Norm, NormWindow},
    problem::{InitialCondition, Problem},
    sim::Simulation,
    Float,
};

/// Parameters shared by every solve of a refinement study.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    /// Cell counts, strictly increasing.
    pub resolutions: Vec<usize>,
    pub cfl: Float,
    pub scheme: Scheme,
    pub final_time: Float,
    pub boundary: BoundaryMode,
    pub initial_condition: InitialCondition,
    pub window: NormWindow,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            resolutions: vec![20, 40, 80, 160],
            cfl: 0.9,
            scheme: Scheme::Upwind,
            final_time: 1.0,
            boundary: BoundaryMode::Periodic,
            initial_condition: InitialCondition::Smooth,
            window: NormWindow::Reference,
        }
    }
}

impl RunParameters {
    pub fn with_resolutions(mut self, resolutions: impl Into<Vec<usize>>) -> Self {
        self.resolutions = resolutions.into();
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

    pub fn with_final_time(mut self, final_time: Float) -> Self {
        self.final_time = final_time;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_initial_condition(mut self, initial_condition: InitialCondition) -> Self {
        self.initial_condition = initial_condition;
        self
    }

    pub fn with_norm_window(mut self, window: NormWindow) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.resolutions.len() < 2 {
            return Err(SimError::TooFewResolutions(self.resolutions.len()));
        }
        if self.resolutions.contains(&0) {
            return Err(SimError::NoCells);
        }
        if self.resolutions.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SimError::UnorderedResolutions);
        }
        Ok(())
    }

    pub fn simulation(&self, cells: usize) -> Simulation {
        Simulation::new(Problem::new(self.initial_condition, self.final_time))
            .with_cells(cells)
            .with_cfl(self.cfl)
            .with_scheme(self.scheme)
            .with_boundary(self.boundary)
            .with_norm_window(self.window)
    }
}

/// `log2(coarse / fine)`, the order observed when the mesh is halved.
///
/// Not finite when either error is exactly zero: `inf` for a zero `fine`, `-inf` for a
/// zero `coarse`, `NaN` when both are.
pub fn observed_order(coarse: Float, fine: Float) -> Float {
    (coarse / fine).log2()
}

/// Observed orders between consecutive entries of `errors`.
pub fn observed_orders(errors: &[Float]) -> Vec<Float> {
    errors
        .windows(2)
        .map(|w| observed_order(w[0], w[1]))
        .collect()
}

/// Solves once per resolution, in ascending order, and collects the error reports.
pub fn run_convergence_study(params: &RunParameters) -> Result<ConvergenceTable, SimError> {
    params.validate()?;

    let mut reports = Vec::with_capacity(params.resolutions.len());
    for &cells in &params.resolutions {
        tracing::info!("running for cells = {}", cells);
        reports.push(Driver::new(params.simulation(cells)).run()?);
    }

    let table = ConvergenceTable {
        scheme: params.scheme,
        cfl: params.cfl,
        reports,
    };

    for norm in [Norm::L1, Norm::L2, Norm::Max] {
        tracing::debug!("{} orders: {:?}", norm, table.orders(norm));
    }

    Ok(table)
}

/// Error reports of a refinement study, ordered by increasing resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceTable {
    scheme: Scheme,
    cfl: Float,
    reports: Vec<ErrorReport>,
}

impl ConvergenceTable {
    pub fn reports(&self) -> &[ErrorReport] {
        &self.reports
    }

    pub fn errors(&self, norm: Norm) -> Vec<Float> {
        self.reports.iter().map(|r| r.get(norm)).collect()
    }

    /// `orders(norm)[i]` is observed between `reports()[i]` and `reports()[i + 1]`.
    pub fn orders(&self, norm: Norm) -> Vec<Float> {
        observed_orders(&self.errors(norm))
    }

    /// `(N, error)` pairs for plotting.
    pub fn series(&self, norm: Norm) -> Vec<(usize, Float)> {
        self.reports.iter().map(|r| (r.cells, r.get(norm))).collect()
    }
}

impl fmt::Display for ConvergenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scheme = {}, CFL = {}", self.scheme, self.cfl)?;
        writeln!(
            f,
            "{:>6} {:>13} {:>6} {:>13} {:>6} {:>13} {:>6}",
            "N", "L1", "rate", "L2", "rate", "max", "rate"
        )?;

        for (i, r) in self.reports.iter().enumerate() {
            write!(f, "{:>6}", r.cells)?;
            for norm in [Norm::L1, Norm::L2, Norm::Max] {
                write!(f, " {:>13.6e}", r.get(norm))?;
                let rate = i
                    .checked_sub(1)
                    .map(|j| observed_order(self.reports[j].get(norm), r.get(norm)))
                    .filter(|p| p.is_finite());
                match rate {
                    Some(p) => write!(f, " {:>6.2}", p)?,
                    None => write!(f, " {:>6}", "-")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
