//! Stehfest inversion of transforms with known inverses


use aquiflow::laplace::{stehfest, LaplaceFunction, StehfestWeights};
use aquiflow::FlowError;
use ndarray::Array1;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_unit_step() {
    let f = |s: f64| Array1::from(vec![1.0 / s, 2.0 / s]);
    let times = [0.5, 1.0, 10.0, 1000.0];
    let h = stehfest(&f, &times, 12).unwrap();

    assert_eq!(h.dim(), (4, 2));
    for row in h.rows() {
        assert_close!(row[0], 1.0, 1e-8);
        assert_close!(row[1], 2.0, 2e-8);
    }
}

#[test]
fn test_exponential_decay() {
    let f = |s: f64| Array1::from(vec![1.0 / (s + 0.5)]);
    let exact = (-0.5f64).exp();

    let mut previous = f64::INFINITY;
    for order in [8, 10, 12] {
        let h = stehfest(&f, &[1.0], order).unwrap();
        let error = (h[[0, 0]] - exact).abs();
        assert!(error < 1e-3, "order {}: error {}", order, error);
        assert!(error < previous, "order {} does not improve", order);
        previous = error;
    }
    assert!(previous < 1e-5);
}

#[test]
fn test_higher_orders_stay_bounded() {
    let f = |s: f64| Array1::from(vec![1.0 / (s + 0.5)]);
    for order in [14, 16] {
        let h = stehfest(&f, &[1.0], order).unwrap();
        assert_close!(h[[0, 0]], (-0.5f64).exp(), 1e-4);
    }
}

#[test]
fn test_shared_nodes_are_evaluated_once() {
    struct Counting {
        calls: AtomicUsize,
    }

    impl LaplaceFunction for Counting {
        fn evaluate(&self, s: f64) -> Array1<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Array1::from(vec![1.0 / (s + 1.0)])
        }
    }

    let func = Counting {
        calls: AtomicUsize::new(0),
    };
    // k ln2 / t over t = 1, 2, 4 and k = 1..4 has 8 distinct values
    let h = stehfest(&func, &[1.0, 2.0, 4.0], 4).unwrap();
    assert_eq!(func.calls.load(Ordering::SeqCst), 8);

    let weights = StehfestWeights::new(4).unwrap();
    for (i, &t) in [1.0, 2.0, 4.0].iter().enumerate() {
        let values: Vec<f64> = weights.nodes(t).map(|s| 1.0 / (s + 1.0)).collect();
        assert_close!(h[[i, 0]], weights.combine(t, &values), 1e-14);
    }
}

#[test]
fn test_rejects_invalid_input() {
    let f = |s: f64| Array1::from(vec![1.0 / s]);
    assert_eq!(
        stehfest(&f, &[1.0], 11),
        Err(FlowError::InvalidStehfestOrder(11))
    );
    assert_eq!(stehfest(&f, &[1.0, -2.0], 12), Err(FlowError::NonPositiveTime(-2.0)));
    assert_eq!(stehfest(&f, &[], 12), Err(FlowError::Empty("time value")));
}

#[test]
fn test_very_high_orders_never_return_non_finite_values() {
    let f = |s: f64| Array1::from(vec![1.0 / s]);
    // the weights overflow a direct factorial product from order 172 on
    for order in [172, 200, 400] {
        let h = stehfest(&f, &[1.0, 10.0], order).unwrap();
        assert!(h.iter().all(|v| v.is_finite()), "order {}", order);
    }
    assert_eq!(
        stehfest(&f, &[1.0], 600),
        Err(FlowError::InvalidStehfestOrder(600))
    );
}

#[test]
fn test_non_finite_values_are_masked() {
    let f = |s: f64| Array1::from(vec![1.0 / s, f64::NAN, if s > 1.0 { f64::INFINITY } else { 1.0 }]);
    let h = stehfest(&f, &[0.5, 10.0], 12).unwrap();

    assert_close!(h[[0, 0]], 1.0, 1e-8);
    assert_eq!(h[[0, 1]], 0.0);
    assert_eq!(h[[1, 1]], 0.0);
    // every node at t = 0.5 exceeds 1
    assert_eq!(h[[0, 2]], 0.0);
}
