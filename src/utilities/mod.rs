//! Helpers around the zoned solver: radius partitions, closed-form
//! reference solutions and upscaled aquifer profiles

pub mod analytical;
pub mod upscaling;

use crate::error::{FlowError, FlowResult};

/// Radius partition for a sampled aquifer profile
///
/// Returns `(boundaries, evaluation)`: `parts + 1` zone boundaries and one
/// evaluation radius per zone. The inner boundaries are equally spaced in
/// `log1p` between `well_radius` and `last_radius`, the final boundary is
/// `outer_radius`. Zone `i` takes the profile value at `evaluation[i]`, the
/// outer zone the value at `outer_radius` (the far field when unbounded).
///
/// When `last_radius` reaches the outer radius, the last inner boundary is
/// placed one log-step below the outer radius instead.
pub fn radii(
    parts: usize,
    well_radius: f64,
    outer_radius: f64,
    last_radius: f64,
) -> FlowResult<(Vec<f64>, Vec<f64>)> {
    if parts < 2 {
        return Err(FlowError::InvalidPartCount(parts));
    }
    if !(well_radius >= 0.0 && well_radius.is_finite()) {
        return Err(FlowError::InvalidWellRadius(well_radius));
    }
    if !(outer_radius > well_radius) {
        return Err(FlowError::InvalidOuterRadius {
            well_radius,
            outer_radius,
        });
    }
    if !(last_radius > well_radius) {
        return Err(FlowError::out_of_interval(
            "last partition radius",
            last_radius,
            "(well radius, inf)",
        ));
    }

    let start = well_radius.ln_1p();
    let end = if last_radius < outer_radius {
        last_radius.ln_1p()
    } else {
        let span = outer_radius.ln_1p() - start;
        start + span * (parts - 1) as f64 / parts as f64
    };

    let mut boundaries = log_spaced(start, end, parts);
    boundaries[0] = well_radius;
    if last_radius < outer_radius {
        boundaries[parts - 1] = last_radius;
    }
    boundaries.push(outer_radius);

    let mut evaluation = log_spaced(start, end, parts - 1);
    evaluation[0] = well_radius;
    evaluation.push(outer_radius);

    Ok((boundaries, evaluation))
}

/// `expm1` of `count` equally spaced points on `[start, end]`
fn log_spaced(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start.exp_m1()];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| (start + step * i as f64).exp_m1())
        .collect()
}
