use linhyp::{
    run_convergence_study, BoundaryMode, Driver, Extrapolation, InitialCondition, Logger, Norm,
    Problem, RunParameters, Scheme, Simulation,
};

fn main() -> Result<(), linhyp::SimError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // single solve, logged
    let sim = Simulation::new(Problem::new(InitialCondition::Hat, 1.0))
        .with_cells(200)
        .with_scheme(Scheme::LaxWendroff);
    println!("{}", sim);
    let report = Driver::new(sim).with_observer(Logger).run()?;
    println!("{:?}\n", report);

    // refinement studies, as `-N 20 40 80 160 320 640`
    let base = RunParameters::default().with_resolutions([20, 40, 80, 160, 320, 640]);
    for scheme in ["FTBS", "LW"] {
        for boundary in [
            BoundaryMode::Periodic,
            BoundaryMode::Bounded(Extrapolation::First),
            BoundaryMode::Bounded(Extrapolation::Second),
        ] {
            let params = base
                .clone()
                .with_scheme(scheme.parse()?)
                .with_boundary(boundary);
            let table = run_convergence_study(&params)?;
            println!("{} boundary\n{}", boundary, table);
            println!("L2 series: {:?}\n", table.series(Norm::L2));
        }
    }

    Ok(())
}
