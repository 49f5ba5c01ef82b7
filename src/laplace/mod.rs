//! Laplace-space functions and their numerical inversion

pub mod stehfest;

use ndarray::Array1;
use rayon::prelude::*;

pub use stehfest::{stehfest, StehfestWeights, DEFAULT_STEHFEST_ORDER};

/// A function of the (real) Laplace variable evaluated at a fixed set of
/// spatial points
pub trait LaplaceFunction: Send + Sync {
    /// Values at every spatial point for one Laplace node `s`
    fn evaluate(&self, s: f64) -> Array1<f64>;

    /// Values for a batch of nodes, one row per node
    ///
    /// Nodes are independent, so they are evaluated in parallel.
    fn evaluate_nodes(&self, nodes: &[f64]) -> Vec<Array1<f64>> {
        nodes.par_iter().map(|&s| self.evaluate(s)).collect()
    }
}

impl<F> LaplaceFunction for F
where
    F: Fn(f64) -> Array1<f64> + Send + Sync,
{
    fn evaluate(&self, s: f64) -> Array1<f64> {
        self(s)
    }
}
