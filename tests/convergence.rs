use linhyp::{
    run_convergence_study, BoundaryMode, Extrapolation, InitialCondition, Norm, RunParameters,
    Scheme,
};

fn assert_orders_within(params: &RunParameters, norms: &[Norm], lower: f64, upper: f64) {
    let table = run_convergence_study(params).unwrap();
    for &norm in norms {
        for (i, p) in table.orders(norm).into_iter().enumerate() {
            assert!(
                (lower..=upper).contains(&p),
                "{} order {:.3} between N={} and N={} outside [{}, {}]\n{}",
                norm,
                p,
                table.reports()[i].cells,
                table.reports()[i + 1].cells,
                lower,
                upper,
                table
            );
        }
    }
}

fn assert_non_increasing(params: &RunParameters, norms: &[Norm]) {
    let table = run_convergence_study(params).unwrap();
    for &norm in norms {
        let errors = table.errors(norm);
        assert!(
            errors.windows(2).all(|w| w[1] <= w[0]),
            "{} errors not decreasing: {:?}",
            norm,
            errors
        );
    }
}

#[test]
fn upwind_is_first_order_on_periodic_grid() {
    let params = RunParameters::default();
    assert_orders_within(&params, &[Norm::L1, Norm::L2], 0.85, 1.15);
}

#[test]
fn lax_wendroff_is_second_order_on_periodic_grid() {
    let params = RunParameters::default().with_scheme(Scheme::LaxWendroff);
    assert_orders_within(&params, &[Norm::L1, Norm::L2], 1.8, 2.1);
}

#[test]
fn max_norm_follows_theoretical_order_for_smooth_data() {
    let params = RunParameters::default().with_resolutions([80, 160, 320]);
    assert_orders_within(&params, &[Norm::Max], 0.85, 1.15);

    let params = params.with_scheme(Scheme::LaxWendroff);
    assert_orders_within(&params, &[Norm::Max], 1.85, 2.15);
}

#[test]
fn upwind_is_first_order_with_inflow_outflow() {
    for extrapolation in [Extrapolation::First, Extrapolation::Second] {
        let params = RunParameters::default()
            .with_resolutions([40, 80, 160, 320])
            .with_boundary(BoundaryMode::Bounded(extrapolation));
        assert_orders_within(&params, &[Norm::L1, Norm::L2, Norm::Max], 0.85, 1.15);
    }
}

#[test]
fn lax_wendroff_is_second_order_with_inflow_outflow() {
    for extrapolation in [Extrapolation::First, Extrapolation::Second] {
        let params = RunParameters::default()
            .with_resolutions([80, 160, 320])
            .with_scheme(Scheme::LaxWendroff)
            .with_boundary(BoundaryMode::Bounded(extrapolation));
        assert_orders_within(&params, &[Norm::L1, Norm::L2], 1.8, 2.1);
    }
}

#[test]
fn errors_decay_under_refinement() {
    for scheme in [Scheme::Upwind, Scheme::LaxWendroff] {
        for boundary in [
            BoundaryMode::Periodic,
            BoundaryMode::Bounded(Extrapolation::First),
        ] {
            let params = RunParameters::default()
                .with_scheme(scheme)
                .with_boundary(boundary);
            assert_non_increasing(&params, &[Norm::L1, Norm::L2, Norm::Max]);

            // the max norm does not settle for discontinuous data
            let params = params.with_initial_condition(InitialCondition::Hat);
            assert_non_increasing(&params, &[Norm::L1, Norm::L2]);
        }
    }
}

#[test]
fn hat_converges_below_first_order() {
    let params = RunParameters::default()
        .with_initial_condition(InitialCondition::Hat)
        .with_resolutions([40, 80, 160, 320]);
    let table = run_convergence_study(&params).unwrap();

    for p in table.orders(Norm::L1) {
        assert!(p > 0.4 && p < 0.8, "L1 order {}", p);
    }
    for e in table.errors(Norm::Max) {
        assert!(e > 0.4, "max error {}", e);
    }
}
