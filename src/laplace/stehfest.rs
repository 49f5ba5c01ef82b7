//! Gaver–Stehfest inversion of the Laplace transform
//!
//! ```text
//! f(t) ≈ ln2/t Σ_{k=1}^{N} V_k F(k ln2 / t)
//! ```
//!
//! The nodes are real, so the transform is only ever evaluated on the
//! positive real axis. The weights alternate in sign and grow quickly with
//! `N`; in double precision the result improves up to roughly `N = 12..16`
//! and then degrades through cancellation. No order selection is attempted.

use super::LaplaceFunction;
use crate::error::{ensure_stehfest_order, ensure_times, FlowError, FlowResult};
use ndarray::Array2;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f64::consts::LN_2;
use std::sync::{Arc, Mutex};

/// Order used when the caller does not choose one
pub const DEFAULT_STEHFEST_ORDER: usize = 12;

// Weight tables are pure functions of the order; built once per process.
static WEIGHT_CACHE: Lazy<Mutex<HashMap<usize, Arc<StehfestWeights>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Stehfest weights `V_1..V_N` for an even order `N`
#[derive(Debug, Clone, PartialEq)]
pub struct StehfestWeights {
    order: usize,
    weights: Vec<f64>,
}

impl StehfestWeights {
    /// Compute the weight table for `order`
    ///
    /// Each term is summed in log space, so the factorials never overflow.
    /// Orders whose weights exceed the range of `f64` are rejected.
    pub fn new(order: usize) -> FlowResult<Self> {
        ensure_stehfest_order(order)?;

        let half = order / 2;
        let ln_fact = ln_factorials(order);
        let weights: Vec<f64> = (1..=order)
            .map(|k| {
                let mut sum = 0.0;
                for j in (k + 1) / 2..=k.min(half) {
                    let ln_term = half as f64 * (j as f64).ln() + ln_fact[2 * j]
                        - ln_fact[half - j]
                        - ln_fact[j]
                        - ln_fact[j - 1]
                        - ln_fact[k - j]
                        - ln_fact[2 * j - k];
                    sum += ln_term.exp();
                }
                if (k + half) % 2 == 0 {
                    sum
                } else {
                    -sum
                }
            })
            .collect();

        if weights.iter().any(|w| !w.is_finite()) {
            log::warn!("Stehfest weights of order {} are not representable", order);
            return Err(FlowError::InvalidStehfestOrder(order));
        }
        log::trace!("built Stehfest weight table of order {}", order);
        Ok(Self { order, weights })
    }

    /// Shared weight table for `order`, computed on first use
    pub fn cached(order: usize) -> FlowResult<Arc<Self>> {
        ensure_stehfest_order(order)?;

        let mut cache = WEIGHT_CACHE
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(weights) = cache.get(&order) {
            return Ok(Arc::clone(weights));
        }
        let weights = Arc::new(Self::new(order)?);
        cache.insert(order, Arc::clone(&weights));
        Ok(weights)
    }

    /// Summation length `N`
    pub fn order(&self) -> usize {
        self.order
    }

    /// The weights `V_1..V_N`
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Laplace nodes `k ln2 / t` for `k = 1..N`
    pub fn nodes(&self, time: f64) -> impl Iterator<Item = f64> {
        (1..=self.order).map(move |k| node(k, time))
    }

    /// Combine transform values taken at `self.nodes(time)`
    pub fn combine(&self, time: f64, values: &[f64]) -> f64 {
        let sum: f64 = self
            .weights
            .iter()
            .zip(values.iter())
            .map(|(w, v)| w * v)
            .sum();
        LN_2 / time * sum
    }
}

#[inline]
fn node(k: usize, time: f64) -> f64 {
    k as f64 * LN_2 / time
}

/// `ln n!` for `n = 0..=max`
fn ln_factorials(max: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(max + 1);
    let mut acc = 0.0;
    table.push(acc);
    for i in 1..=max {
        acc += (i as f64).ln();
        table.push(acc);
    }
    table
}

/// Invert `func` at every time value
///
/// Returns an array of shape `(times.len(), points)` where `points` is the
/// number of values `func` produces per node. The transform is evaluated
/// once per distinct node across all times. Results that are not finite
/// are set to zero.
pub fn stehfest<F>(func: &F, times: &[f64], order: usize) -> FlowResult<Array2<f64>>
where
    F: LaplaceFunction + ?Sized,
{
    ensure_times(times)?;
    let weights = StehfestWeights::cached(order)?;

    let (nodes, lookup) = distinct_nodes(times, order);
    log::debug!(
        "Stehfest inversion: {} time values, order {}, {} distinct nodes",
        times.len(),
        order,
        nodes.len()
    );

    let values = func.evaluate_nodes(&nodes);
    let points = values.first().map_or(0, |v| v.len());
    if let Some(row) = values.iter().find(|v| v.len() != points) {
        return Err(FlowError::size_mismatch(
            "Laplace-space values per node",
            points,
            row.len(),
        ));
    }

    let mut result = Array2::zeros((times.len(), points));
    for (ti, &time) in times.iter().enumerate() {
        let mut row = result.row_mut(ti);
        for (k, &w) in weights.weights().iter().enumerate() {
            row.scaled_add(w, &values[lookup[ti * order + k]]);
        }
        row *= LN_2 / time;
    }

    let mut masked = 0usize;
    result.mapv_inplace(|h| {
        if h.is_finite() {
            h
        } else {
            masked += 1;
            0.0
        }
    });
    if masked > 0 {
        log::warn!(
            "Stehfest inversion of order {}: {} non-finite values replaced by zero",
            order,
            masked
        );
    }

    Ok(result)
}

/// Sorted distinct nodes and, for every `(time, k)` pair, the index of its node
fn distinct_nodes(times: &[f64], order: usize) -> (Vec<f64>, Vec<usize>) {
    let all: Vec<f64> = times
        .iter()
        .flat_map(|&t| (1..=order).map(move |k| node(k, t)))
        .collect();

    let mut distinct = all.clone();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    let lookup = all
        .iter()
        .map(|s| distinct.partition_point(|d| d < s))
        .collect();
    (distinct, lookup)
}
