//! Numerical Laplace-space solutions against the Theis solution


use aquiflow::domain::{ZonedAquifer, ZonedLaplaceSolver};
use aquiflow::laplace::stehfest;
use aquiflow::prelude::*;
use aquiflow::utilities::analytical::compare_solutions;
use approx::assert_relative_eq;
use test_utils::*;

const RADII: [f64; 3] = [1.0, 2.0, 3.0];
const TIMES: [f64; 2] = [10.0, 100.0];

fn theis_reference() -> ndarray::Array2<f64> {
    grid(&[
        &[-0.24959541, -0.14506368, -0.08971485],
        &[-0.43105106, -0.32132823, -0.25778313],
    ])
}

#[test]
fn test_theis_point_source() {
    let result = theis(&RADII, &TIMES, 1e-3, 1e-3, -1e-3, &SimulationParams::default()).unwrap();
    let h = result.grid().unwrap();
    assert!(max_relative_error(h, &theis_reference()) < 1e-6);
}

#[test]
fn test_laplace_path_reproduces_theis() {
    let aquifer = ZonedAquifer::homogeneous(0.0, f64::INFINITY, 1e-3, 1e-3).unwrap();
    for solver in [
        ZonedLaplaceSolver::new(aquifer.clone(), -1e-3, RADII.to_vec()),
        ZonedLaplaceSolver::new(aquifer, -1e-3, RADII.to_vec()).with_matrix_path(),
    ] {
        let h = stehfest(&solver, &TIMES, 12).unwrap();
        assert!(max_relative_error(&h, &theis_reference()) < 1e-4);

        let (_, max_error, rel_error) = compare_solutions(&h, &theis_reference());
        assert!(max_error < 1e-5);
        assert!(rel_error < 1e-4);
    }
}

#[test]
fn test_laplace_path_over_a_wide_time_range() {
    let radii = [0.5, 2.0, 8.0, 30.0];
    let times = [1.0, 10.0, 100.0, 1e3, 1e4];
    let reference = TheisSolution::new(5e-3, 1e-4, -2e-3)
        .unwrap()
        .evaluate_on_grid(&radii, &times);

    let aquifer = ZonedAquifer::homogeneous(0.0, f64::INFINITY, 5e-3, 1e-4).unwrap();
    let solver = ZonedLaplaceSolver::new(aquifer, -2e-3, radii.to_vec());
    let h = stehfest(&solver, &times, 12).unwrap();

    // the inversion is relative to the head itself; tiny early-time
    // heads far from the well get an absolute floor
    assert!(all_close(&h, &reference, 1e-3, 5e-6));
}

#[test]
fn test_small_well_radius_approaches_point_well() {
    let point = theis(&RADII, &TIMES, 1e-3, 1e-4, -1e-3, &SimulationParams::default()).unwrap();
    let params = SimulationParams {
        well_radius: 0.05,
        ..Default::default()
    };
    let well = theis(&RADII, &TIMES, 1e-3, 1e-4, -1e-3, &params).unwrap();

    let a = point.grid().unwrap();
    let b = well.grid().unwrap();
    assert!(max_relative_error(b, a) < 1e-3);
}

#[test]
fn test_drawdown_monotonic_in_radius_and_time() {
    let radii = [0.5, 1.0, 2.0, 4.0, 8.0];
    let times = [5.0, 20.0, 100.0, 500.0, 2000.0];
    for well_radius in [0.0, 0.1] {
        let aquifer = ZonedAquifer::homogeneous(well_radius, f64::INFINITY, 1e-3, 1e-4).unwrap();
        let solver = ZonedLaplaceSolver::new(aquifer, -1e-3, radii.to_vec());
        let h = stehfest(&solver, &times, 12).unwrap();

        // extraction: head rises away from the well and falls over time
        for row in h.rows() {
            assert!(row.windows(2).into_iter().all(|w| w[1] > w[0]));
        }
        for col in h.columns() {
            assert!(col.windows(2).into_iter().all(|w| w[1] < w[0]));
        }
    }
}

#[test]
fn test_fixed_head_boundary_limits_drawdown() {
    let radii = [1.0, 5.0, 15.0];
    let times = [10.0, 1000.0, 1e5];
    let unbounded = theis(&radii, &times, 1e-3, 1e-4, -1e-3, &SimulationParams::default()).unwrap();
    let params = SimulationParams {
        outer_radius: 30.0,
        ..Default::default()
    };
    let bounded = theis(&radii, &times, 1e-3, 1e-4, -1e-3, &params).unwrap();

    let a = unbounded.grid().unwrap();
    let b = bounded.grid().unwrap();
    for (free, fixed) in a.iter().zip(b.iter()) {
        assert!(*fixed < 0.0);
        assert!(fixed.abs() <= free.abs() * (1.0 + 1e-4));
    }
    // steady state: Thiem drawdown Q/(2πT) ln(R/r)
    let thiem = -1e-3 / (2.0 * std::f64::consts::PI * 1e-3) * (30.0f64 / 5.0).ln();
    assert_relative_eq!(b[[2, 1]], thiem, max_relative = 1e-3);
}
