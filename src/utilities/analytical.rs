//! Closed-form reference solutions for radial flow to a well
//!
//! The Theis solution describes transient drawdown around a line source
//! pumping at a constant rate from a homogeneous, confined and infinite
//! aquifer:
//!
//! ```text
//! h(r, t) = Q / (4π T) · E1(r² S / (4 T t))
//! ```
//!
//! It serves as the reference the numerical Laplace-space path is checked
//! against. The steady-state counterparts (Thiem and the extended Thiem
//! solutions for coarse-grained fields) need no inversion at all and are
//! evaluated directly relative to a reference radius.

use super::upscaling::{ConductivityField, TransmissivityField};
use crate::engine::expint::{exp1, expi};
use crate::error::{ensure_positive, FlowError, FlowResult};
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

/// Homogeneous aquifer pumped by a line source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheisSolution {
    transmissivity: f64,
    storativity: f64,
    pumping_rate: f64,
}

impl TheisSolution {
    /// `pumping_rate` is negative for extraction
    pub fn new(transmissivity: f64, storativity: f64, pumping_rate: f64) -> FlowResult<Self> {
        ensure_positive("transmissivity", transmissivity)?;
        ensure_positive("storativity", storativity)?;
        Ok(Self {
            transmissivity,
            storativity,
            pumping_rate,
        })
    }

    /// Head change at radius `r` and time `t`
    pub fn evaluate_at(&self, r: f64, t: f64) -> f64 {
        let u = r * r * self.storativity / (4.0 * self.transmissivity * t);
        self.pumping_rate / (4.0 * PI * self.transmissivity) * exp1(u)
    }

    /// Head on a time × radius grid
    pub fn evaluate_on_grid(&self, radii: &[f64], times: &[f64]) -> Array2<f64> {
        Array2::from_shape_fn((times.len(), radii.len()), |(i, j)| {
            self.evaluate_at(radii[j], times[i])
        })
    }
}

/// Radii for a steady-state solution must be positive
fn ensure_steady_radii(radii: &[f64], reference_radius: f64) -> FlowResult<()> {
    ensure_positive("reference radius", reference_radius)?;
    match radii.iter().find(|&&r| !(r > 0.0 && r.is_finite())) {
        Some(&radius) => Err(FlowError::RadiusOutOfRange {
            radius,
            well_radius: 0.0,
        }),
        None => Ok(()),
    }
}

/// Steady-state head in a homogeneous aquifer (Thiem)
///
/// `reference_head` is the head at `reference_radius`.
pub fn thiem(
    radii: &[f64],
    reference_radius: f64,
    transmissivity: f64,
    rate: f64,
    reference_head: f64,
) -> FlowResult<Array1<f64>> {
    ensure_steady_radii(radii, reference_radius)?;
    ensure_positive("transmissivity", transmissivity)?;

    let factor = -rate / (2.0 * PI * transmissivity);
    Ok(radii
        .iter()
        .map(|&r| factor * (r / reference_radius).ln() + reference_head)
        .collect())
}

/// Steady-state head for a coarse-grained log-normal transmissivity
pub fn ext_thiem_2d(
    radii: &[f64],
    reference_radius: f64,
    field: &TransmissivityField,
    rate: f64,
    reference_head: f64,
) -> FlowResult<Array1<f64>> {
    ensure_steady_radii(radii, reference_radius)?;
    let profile = field.coarse_graining()?;
    let chi = profile.chi;
    // a well value equal to the geometric mean leaves a homogeneous field
    if chi == 0.0 {
        return thiem(radii, reference_radius, profile.mean, rate, reference_head);
    }

    let factor = -rate / (4.0 * PI * profile.mean);
    let decay = (-chi).exp();
    let potential = |r: f64| {
        let a = chi / (1.0 + profile.scale_sq * r * r);
        decay * expi(chi - a) - expi(-a)
    };
    let reference = potential(reference_radius);

    Ok(radii
        .iter()
        .map(|&r| factor * (potential(r) - reference) + reference_head)
        .collect())
}

/// Steady-state head for a coarse-grained 3D log-normal conductivity in an
/// aquifer of the given `thickness`
pub fn ext_thiem_3d(
    radii: &[f64],
    reference_radius: f64,
    field: &ConductivityField,
    rate: f64,
    thickness: f64,
    reference_head: f64,
) -> FlowResult<Array1<f64>> {
    ensure_steady_radii(radii, reference_radius)?;
    ensure_positive("aquifer thickness", thickness)?;
    let profile = field.coarse_graining()?;
    let chi = profile.chi;

    let factor = -rate / thickness / (2.0 * PI * profile.mean);
    let potential = |r: f64| {
        let root = (1.0 + profile.scale_sq * r * r).sqrt();
        let odd = root.ln_1p() - 1.0 / root;
        let even = root.ln() - 0.5 / root.powi(2) - 0.25 / root.powi(4);
        (-chi).exp() * r.ln() + odd * chi.sinh() + even * (1.0 - chi.cosh())
    };
    let reference = potential(reference_radius);

    Ok(radii
        .iter()
        .map(|&r| factor * (potential(r) - reference) + reference_head)
        .collect())
}

/// Error norms of a numerical solution against a reference
///
/// Returns `(l2_error, max_error, relative_l2_error)`.
pub fn compare_solutions(numerical: &Array2<f64>, reference: &Array2<f64>) -> (f64, f64, f64) {
    assert_eq!(numerical.shape(), reference.shape());

    let mut l2_error: f64 = 0.0;
    let mut max_error: f64 = 0.0;
    let mut reference_norm: f64 = 0.0;

    for (num, exact) in numerical.iter().zip(reference.iter()) {
        let error = (num - exact).abs();
        l2_error += error * error;
        max_error = max_error.max(error);
        reference_norm += exact * exact;
    }

    l2_error = l2_error.sqrt();
    reference_norm = reference_norm.sqrt();

    let relative_l2_error = if reference_norm > 1e-15 {
        l2_error / reference_norm
    } else {
        l2_error
    };

    (l2_error, max_error, relative_l2_error)
}
