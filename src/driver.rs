use faer_core::{Mat, MatRef};
use thiserror::Error;

use crate::{
    bc::BoundaryCondition,
    mesh::Grid,
    method::Method,
    norms::{self, ErrorReport},
    problem::Problem,
    sim::Simulation,
    Ctx, Float,
};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("unknown scheme `{0}`")]
    InvalidScheme(String),
    #[error("unknown initial condition `{0}`")]
    InvalidInitialCondition(String),
    #[error("unknown boundary condition `{0}`")]
    InvalidBoundary(String),
    #[error("unknown extrapolation order `{0}`")]
    InvalidExtrapolation(String),
    #[error("extrapolation order must be 1 or 2, got {0}")]
    InvalidExtrapolationOrder(usize),
    #[error("Courant number {courant} exceeds 1, explicit schemes are unstable")]
    InstabilityRisk { courant: Float },
    #[error("CFL number must be positive, got {0}")]
    InvalidCfl(Float),
    #[error("final time must be positive, got {0}")]
    InvalidFinalTime(Float),
    #[error("mesh has no cells")]
    NoCells,
    #[error("{cells} cells leave fewer than {required} samples for the error norms")]
    TooCoarse { cells: usize, required: usize },
    #[error("convergence study needs at least 2 resolutions, got {0}")]
    TooFewResolutions(usize),
    #[error("resolutions must be strictly increasing")]
    UnorderedResolutions,
    #[error("observer failed: {0}")]
    Observer(String),
}

pub struct ObsCtx<'ctx> {
    // Meta
    problem: &'ctx Problem,
    grid: &'ctx Grid,
    method: &'ctx dyn Method,
    bc: &'ctx dyn BoundaryCondition,
    courant: Float,
    time_step: Float,

    // Iteration info
    iter: usize,
    time: Float,
    storage: MatRef<'ctx, Float>, // current state *with* ghost cells
}

impl<'ctx> ObsCtx<'ctx> {
    pub fn problem(&self) -> &Problem {
        self.problem
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn method(&self) -> &dyn Method {
        self.method
    }

    pub fn boundary(&self) -> &dyn BoundaryCondition {
        self.bc
    }

    pub fn courant(&self) -> Float {
        self.courant
    }

    pub fn time_step(&self) -> Float {
        self.time_step
    }

    pub fn iter(&self) -> usize {
        self.iter
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn storage(&self) -> MatRef<'_, Float> {
        self.storage
    }

    /// Current state without ghost cells.
    pub fn solution(&self) -> MatRef<'_, Float> {
        self.bc.layout().physical(self.storage)
    }
}

#[allow(unused_variables)]
pub trait Observer {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }

    fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        Ok(())
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        (**self).at_startup(ctx)
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        (**self).at_each_iteration(ctx)
    }

    fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        (**self).at_cleanup(ctx)
    }
}

pub struct Driver<'d> {
    pub(crate) sim: Simulation,
    pub(crate) observers: Vec<Box<dyn Observer + 'd>>,
    pub(crate) time_sampling: usize,
}

impl<'d> Driver<'d> {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            observers: Vec::new(),
            time_sampling: 1,
        }
    }

    pub fn with_time_sampling(mut self, sampling_period: usize) -> Self {
        self.time_sampling = sampling_period.max(1);
        self
    }

    pub fn with_observer(mut self, observer: impl Observer + 'd) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Marches the initial condition up to the final time and measures the error against
    /// the exact solution at the time actually reached.
    ///
    /// The last step is not shortened: the loop stops at the first `t >= final_time` and
    /// both fields are compared at that `t`.
    pub fn run(&mut self) -> Result<ErrorReport, SimError> {
        self.sim.validate()?;

        let Simulation {
            problem,
            grid,
            scheme,
            boundary,
            window,
            ..
        } = &self.sim;

        let method = scheme.method();
        let bc = boundary.strategy();
        let layout = bc.layout();
        let dt = self.sim.time_step();
        let courant = self.sim.courant();

        let _span = tracing::debug_span!("solve", cells = grid.steps, scheme = %scheme).entered();

        // set initial condition
        let x = layout.coordinates(*grid);
        let mut u = problem.u0.sample(x.as_ref());
        let mut v = Mat::<Float>::zeros(u.nrows(), 1);

        let mut t = 0.0;
        let mut n = 0;
        bc.apply(Ctx::new(problem, grid, t), u.as_mut());

        for o in self.observers.iter_mut() {
            o.at_startup(ObsCtx {
                problem,
                grid,
                method,
                bc: bc.as_ref(),
                courant,
                time_step: dt,
                iter: n,
                time: t,
                storage: u.as_ref(),
            })?;
        }

        // propagate solution
        while t < problem.final_time {
            bc.apply(Ctx::new(problem, grid, t), u.as_mut());
            bc.advance(method, courant, u.as_ref(), v.as_mut());
            std::mem::swap(&mut u, &mut v);
            t += dt;
            n += 1;

            if n % self.time_sampling == 0 {
                for o in self.observers.iter_mut() {
                    o.at_each_iteration(ObsCtx {
                        problem,
                        grid,
                        method,
                        bc: bc.as_ref(),
                        courant,
                        time_step: dt,
                        iter: n,
                        time: t,
                        storage: u.as_ref(),
                    })?;
                }
            }
        }

        // compare against the exact solution
        let xs = layout.physical(x.as_ref());
        let exact = Mat::<Float>::from_fn(xs.nrows(), 1, |i, _| {
            problem.exact(xs.read(i, 0), t)
        });
        let err = norms::pointwise_error(layout.physical(u.as_ref()), exact.as_ref());
        let (linf, l1, l2) = norms::error_norms(err.as_ref(), grid.delta, *window);

        for o in self.observers.iter_mut() {
            o.at_cleanup(ObsCtx {
                problem,
                grid,
                method,
                bc: bc.as_ref(),
                courant,
                time_step: dt,
                iter: n,
                time: t,
                storage: u.as_ref(),
            })?;
        }

        Ok(ErrorReport {
            cells: grid.steps,
            time: t,
            steps: n,
            linf,
            l1,
            l2,
        })
    }
}

pub struct Logger;

impl Observer for Logger {
    fn at_startup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::INFO,
            "start of simulation of problem `{}` (`{}` method, {} boundary, Δx={:e} ({} cells), Δt={:e}, ν={})",
            ctx.problem().name(),
            ctx.method().name(),
            ctx.boundary().name(),
            ctx.grid().delta(),
            ctx.grid().steps(),
            ctx.time_step(),
            ctx.courant(),
        );
        Ok(())
    }

    fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::TRACE,
            "problem `{}`: step {} (t={:e})",
            ctx.problem().name(),
            ctx.iter(),
            ctx.time()
        );
        Ok(())
    }

    fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
        tracing::event!(
            tracing::Level::INFO,
            "finished simulation of problem `{}` at t={:e} after {} steps",
            ctx.problem().name(),
            ctx.time(),
            ctx.iter()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bc::{BoundaryMode, Extrapolation},
        method::Scheme,
        problem::InitialCondition,
    };

    fn sim(cells: usize) -> Simulation {
        Simulation::new(Problem::new(InitialCondition::Smooth, 1.0))
            .with_cells(cells)
    }

    #[test]
    fn final_time_may_be_overshot() {
        let report = Driver::new(sim(20)).run().unwrap();
        // Δt = 0.045, 23 steps
        assert_eq!(report.steps, 23);
        assert!(report.time >= 1.0);
        assert!(report.time < 1.0 + 0.045 + 1e-12);
    }

    #[test]
    fn invalid_input_is_reported_before_stepping() {
        struct Counter(usize);
        impl Observer for Counter {
            fn at_startup(&mut self, _ctx: ObsCtx) -> Result<(), SimError> {
                self.0 += 1;
                Ok(())
            }
        }

        let mut counter = Counter(0);
        let res = Driver::new(sim(20).with_cfl(1.5))
            .with_observer(&mut counter)
            .run();
        assert!(matches!(res, Err(SimError::InstabilityRisk { .. })));
        assert_eq!(counter.0, 0);
    }

    #[test]
    fn observer_error_aborts_run() {
        struct Failing;
        impl Observer for Failing {
            fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
                if ctx.iter() == 3 {
                    return Err(SimError::Observer("stop".into()));
                }
                Ok(())
            }
        }

        let res = Driver::new(sim(20)).with_observer(Failing).run();
        assert!(matches!(res, Err(SimError::Observer(s)) if s == "stop"));
    }

    #[test]
    fn sampling_period() {
        struct Steps(Vec<usize>);
        impl Observer for Steps {
            fn at_each_iteration(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
                self.0.push(ctx.iter());
                Ok(())
            }
        }

        let mut steps = Steps(Vec::new());
        Driver::new(sim(20))
            .with_time_sampling(5)
            .with_observer(&mut steps)
            .run()
            .unwrap();
        assert_eq!(steps.0, vec![5, 10, 15, 20]);
    }

    #[test]
    fn bounded_solution_strips_ghosts() {
        struct Sizes(usize, usize);
        impl Observer for Sizes {
            fn at_cleanup(&mut self, ctx: ObsCtx) -> Result<(), SimError> {
                self.0 = ctx.storage().nrows();
                self.1 = ctx.solution().nrows();
                Ok(())
            }
        }

        let mut sizes = Sizes(0, 0);
        Driver::new(
            sim(16)
                .with_scheme(Scheme::LaxWendroff)
                .with_boundary(BoundaryMode::Bounded(Extrapolation::Second)),
        )
        .with_observer(&mut sizes)
        .run()
        .unwrap();
        assert_eq!((sizes.0, sizes.1), (18, 16));
    }

    #[test]
    fn logger_runs() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let report = Driver::new(sim(10)).with_observer(Logger).run().unwrap();
        assert!(report.l1 > 0.0);
    }
}
