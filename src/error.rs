//! Error types for aquifer models
//!
//! Every variant describes a violated input constraint. Numerical
//! degeneracies inside the Laplace-domain solver are not errors: they are
//! masked to zero and reported through the `log` facade instead.

use thiserror::Error;

/// Result type used throughout the crate
pub type FlowResult<T> = Result<T, FlowError>;

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// A scalar parameter that must be strictly positive
    #[error("{name} needs to be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// An array element that must be strictly positive
    #[error("{name}[{index}] needs to be positive, got {value}")]
    NonPositiveElement {
        name: &'static str,
        index: usize,
        value: f64,
    },

    /// Zone boundaries are not strictly increasing
    #[error("zone radii need to be strictly increasing: radius[{index}] = {current} <= {previous}")]
    UnsortedZones {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// A zone boundary lies outside the open interval (well, outer)
    #[error("zone radius {radius} must lie strictly between the well radius {well_radius} and the outer radius {outer_radius}")]
    ZoneOutOfRange {
        radius: f64,
        well_radius: f64,
        outer_radius: f64,
    },

    /// Negative or non-finite well radius
    #[error("the well radius needs to be finite and >= 0, got {0}")]
    InvalidWellRadius(f64),

    /// Outer radius not beyond the well
    #[error("the outer radius {outer_radius} needs to be greater than the well radius {well_radius}")]
    InvalidOuterRadius { well_radius: f64, outer_radius: f64 },

    /// Evaluation radius inside the well or at the origin
    #[error("radius {radius} needs to be > 0 and >= the well radius {well_radius}")]
    RadiusOutOfRange { radius: f64, well_radius: f64 },

    /// Non-positive time value
    #[error("time values need to be > 0, got {0}")]
    NonPositiveTime(f64),

    /// Two arrays that must be parallel-indexed have different lengths
    #[error("{what}: expected {expected} values, got {provided}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        provided: usize,
    },

    /// Stehfest order that is odd, too small or has weights beyond `f64`
    #[error("the Stehfest order needs to be an even integer > 1 with finite weights, got {0}")]
    InvalidStehfestOrder(usize),

    /// Too few partitions for an upscaled model
    #[error("the number of partitions needs to be at least 2, got {0}")]
    InvalidPartCount(usize),

    /// A value outside its admissible interval
    #[error("{name} must lie within {interval}, got {value}")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        interval: &'static str,
    },

    /// Empty input where at least one value is required
    #[error("at least one {0} is required")]
    Empty(&'static str),
}

impl FlowError {
    pub fn non_positive(name: &'static str, value: f64) -> Self {
        Self::NonPositive { name, value }
    }

    pub fn size_mismatch(what: &'static str, expected: usize, provided: usize) -> Self {
        Self::SizeMismatch {
            what,
            expected,
            provided,
        }
    }

    pub fn out_of_interval(name: &'static str, value: f64, interval: &'static str) -> Self {
        Self::OutOfInterval {
            name,
            value,
            interval,
        }
    }
}

/// Check that a scalar is finite and strictly positive
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> FlowResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(FlowError::non_positive(name, value))
    }
}

/// Check that every element of a slice is finite and strictly positive
pub(crate) fn ensure_all_positive(name: &'static str, values: &[f64]) -> FlowResult<()> {
    match values
        .iter()
        .position(|&v| !(v > 0.0 && v.is_finite()))
    {
        Some(index) => Err(FlowError::NonPositiveElement {
            name,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

/// Check that a Stehfest order is an even integer > 1
pub(crate) fn ensure_stehfest_order(order: usize) -> FlowResult<()> {
    if order > 1 && order % 2 == 0 {
        Ok(())
    } else {
        Err(FlowError::InvalidStehfestOrder(order))
    }
}

/// Check that all time values are finite and positive
pub(crate) fn ensure_times(times: &[f64]) -> FlowResult<()> {
    if times.is_empty() {
        return Err(FlowError::Empty("time value"));
    }
    match times.iter().find(|&&t| !(t > 0.0 && t.is_finite())) {
        Some(&t) => Err(FlowError::NonPositiveTime(t)),
        None => Ok(()),
    }
}
