//! High-level interface for transient pumping-test simulations
//!
//! Every entry point validates its inputs, builds a [`ZonedAquifer`],
//! inverts the zoned Laplace-space head with the Stehfest algorithm and
//! shapes the output as a time × radius grid or as paired values.

use super::aquifer::ZonedAquifer;
use super::zoned::ZonedLaplaceSolver;
use crate::error::{
    ensure_all_positive, ensure_positive, ensure_stehfest_order, ensure_times, FlowError,
    FlowResult,
};
use crate::laplace::{stehfest, DEFAULT_STEHFEST_ORDER};
use crate::utilities::analytical::TheisSolution;
use crate::utilities::radii as partition_radii;
use crate::utilities::upscaling::{CoarseGraining, ConductivityField, TransmissivityField};
use ndarray::{Array1, Array2};

/// Parameters shared by all simulation entry points
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Evaluate every radius at every time; otherwise radii and times are
    /// paired element-wise
    pub structured: bool,
    /// Radius of the pumping well, 0 for a point well
    pub well_radius: f64,
    /// Radius of the fixed-head outer boundary, infinite when unbounded
    pub outer_radius: f64,
    /// Head at the outer boundary, added to every result
    pub reference_head: f64,
    /// Number of Stehfest terms
    pub stehfest_order: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            structured: true,
            well_radius: 0.0,
            outer_radius: f64::INFINITY,
            reference_head: 0.0,
            stehfest_order: DEFAULT_STEHFEST_ORDER,
        }
    }
}

impl SimulationParams {
    /// Check the geometry, the evaluation points and the inversion order
    fn validate(&self, radii: &[f64], times: &[f64]) -> FlowResult<()> {
        if !(self.well_radius >= 0.0 && self.well_radius.is_finite()) {
            return Err(FlowError::InvalidWellRadius(self.well_radius));
        }
        if !(self.outer_radius > self.well_radius) {
            return Err(FlowError::InvalidOuterRadius {
                well_radius: self.well_radius,
                outer_radius: self.outer_radius,
            });
        }
        if radii.is_empty() {
            return Err(FlowError::Empty("radius"));
        }
        if let Some(&radius) = radii
            .iter()
            .find(|&&r| !(r >= self.well_radius && r > 0.0))
        {
            return Err(FlowError::RadiusOutOfRange {
                radius,
                well_radius: self.well_radius,
            });
        }
        ensure_times(times)?;
        if !self.structured && radii.len() != times.len() {
            return Err(FlowError::size_mismatch(
                "paired time values",
                radii.len(),
                times.len(),
            ));
        }
        ensure_stehfest_order(self.stehfest_order)
    }

    /// Add the reference head and pick the requested output shape
    fn finish(&self, mut grid: Array2<f64>) -> SimulationResult {
        grid += self.reference_head;
        if self.structured {
            SimulationResult::Grid(grid)
        } else {
            SimulationResult::Paired(grid.diag().to_owned())
        }
    }
}

/// Partition of an upscaled aquifer profile into constant zones
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionParams {
    /// Number of zones
    pub parts: usize,
    /// Tolerance of the profile against its far-field value that fixes
    /// the outermost inner boundary
    pub relative_error: f64,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            parts: 30,
            relative_error: 0.01,
        }
    }
}

impl PartitionParams {
    fn validate(&self) -> FlowResult<()> {
        if self.parts < 2 {
            return Err(FlowError::InvalidPartCount(self.parts));
        }
        if !(self.relative_error > 0.0 && self.relative_error < 1.0) {
            return Err(FlowError::out_of_interval(
                "relative error",
                self.relative_error,
                "(0, 1)",
            ));
        }
        Ok(())
    }
}

/// Head values of a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationResult {
    /// Shape `(times, radii)`
    Grid(Array2<f64>),
    /// One value per `(radius, time)` pair
    Paired(Array1<f64>),
}

impl SimulationResult {
    pub fn grid(&self) -> Option<&Array2<f64>> {
        match self {
            Self::Grid(grid) => Some(grid),
            Self::Paired(_) => None,
        }
    }

    pub fn paired(&self) -> Option<&Array1<f64>> {
        match self {
            Self::Grid(_) => None,
            Self::Paired(values) => Some(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Grid(grid) => grid.len(),
            Self::Paired(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values in row-major order
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::Grid(grid) => grid.iter().copied().collect(),
            Self::Paired(values) => values.to_vec(),
        }
    }
}

/// Transient head in an aquifer made of concentric zones
///
/// `zone_radii` are the interior zone boundaries; the well radius and the
/// outer radius from `params` close the partition. `transmissivity` and
/// `storativity` hold one value per zone, `rate` is negative for
/// extraction.
pub fn diskmodel(
    radii: &[f64],
    times: &[f64],
    transmissivity: &[f64],
    storativity: &[f64],
    zone_radii: &[f64],
    rate: f64,
    params: &SimulationParams,
) -> FlowResult<SimulationResult> {
    params.validate(radii, times)?;

    for (index, pair) in zone_radii.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(FlowError::UnsortedZones {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    if let Some(&radius) = zone_radii
        .iter()
        .find(|&&r| !(r > params.well_radius && r < params.outer_radius))
    {
        return Err(FlowError::ZoneOutOfRange {
            radius,
            well_radius: params.well_radius,
            outer_radius: params.outer_radius,
        });
    }

    let zones = zone_radii.len() + 1;
    if transmissivity.len() != zones {
        return Err(FlowError::size_mismatch(
            "transmissivity",
            zones,
            transmissivity.len(),
        ));
    }
    if storativity.len() != zones {
        return Err(FlowError::size_mismatch("storativity", zones, storativity.len()));
    }
    ensure_all_positive("transmissivity", transmissivity)?;
    ensure_all_positive("storativity", storativity)?;

    let mut boundaries = Vec::with_capacity(zones + 1);
    boundaries.push(params.well_radius);
    boundaries.extend_from_slice(zone_radii);
    boundaries.push(params.outer_radius);

    let aquifer = ZonedAquifer::new(boundaries, transmissivity.to_vec(), storativity.to_vec())?;
    solve_zoned(aquifer, rate, radii, times, params)
}

/// Transient head in a homogeneous aquifer
///
/// A point well in an unbounded aquifer uses the closed-form Theis
/// solution, every other geometry the Laplace-space solver.
pub fn theis(
    radii: &[f64],
    times: &[f64],
    transmissivity: f64,
    storativity: f64,
    rate: f64,
    params: &SimulationParams,
) -> FlowResult<SimulationResult> {
    params.validate(radii, times)?;
    ensure_positive("transmissivity", transmissivity)?;
    ensure_positive("storativity", storativity)?;

    if params.well_radius == 0.0 && params.outer_radius.is_infinite() {
        log::debug!("theis: closed form for {} radii", radii.len());
        let grid = TheisSolution::new(transmissivity, storativity, rate)?
            .evaluate_on_grid(radii, times);
        return Ok(params.finish(grid));
    }

    let aquifer = ZonedAquifer::homogeneous(
        params.well_radius,
        params.outer_radius,
        transmissivity,
        storativity,
    )?;
    solve_zoned(aquifer, rate, radii, times, params)
}

/// Extended Theis solution for a log-normal transmissivity field
///
/// The coarse-grained transmissivity is sampled on a log-spaced partition
/// and solved as a zoned aquifer with uniform storativity.
pub fn ext_theis_2d(
    radii: &[f64],
    times: &[f64],
    field: &TransmissivityField,
    storativity: f64,
    rate: f64,
    partition: &PartitionParams,
    params: &SimulationParams,
) -> FlowResult<SimulationResult> {
    params.validate(radii, times)?;
    ensure_positive("storativity", storativity)?;
    partition.validate()?;

    let profile = field.coarse_graining()?;
    let aquifer = upscaled_aquifer(&profile, field.correlation_length, storativity, partition, params)?;
    solve_zoned(aquifer, rate, radii, times, params)
}

/// Extended Theis solution for a 3D log-normal conductivity field
///
/// The aquifer has the given `thickness`; the rate is applied per unit
/// thickness and the coarse-grained conductivity takes the place of
/// transmissivity.
#[allow(clippy::too_many_arguments)]
pub fn ext_theis_3d(
    radii: &[f64],
    times: &[f64],
    field: &ConductivityField,
    storativity: f64,
    rate: f64,
    thickness: f64,
    partition: &PartitionParams,
    params: &SimulationParams,
) -> FlowResult<SimulationResult> {
    params.validate(radii, times)?;
    ensure_positive("storativity", storativity)?;
    ensure_positive("aquifer thickness", thickness)?;
    partition.validate()?;

    let profile = field.coarse_graining()?;
    let aquifer = upscaled_aquifer(&profile, field.correlation_length, storativity, partition, params)?;
    solve_zoned(aquifer, rate / thickness, radii, times, params)
}

/// Zone model sampling `profile` on a generated partition
fn upscaled_aquifer(
    profile: &CoarseGraining,
    correlation_length: f64,
    storativity: f64,
    partition: &PartitionParams,
    params: &SimulationParams,
) -> FlowResult<ZonedAquifer> {
    let mut last_radius = profile.cutoff_radius(partition.relative_error)?;
    // a profile already inside the tolerance still needs a partition
    if !(last_radius > params.well_radius) {
        last_radius = params.well_radius + correlation_length;
    }

    let (boundaries, evaluation) = partition_radii(
        partition.parts,
        params.well_radius,
        params.outer_radius,
        last_radius,
    )?;
    log::debug!(
        "upscaled profile: {} zones up to r = {:.4}, well value {:e}, far field {:e}",
        partition.parts,
        last_radius,
        profile.well_value(),
        profile.mean
    );

    let values = evaluation.iter().map(|&r| profile.value_at(r)).collect();
    ZonedAquifer::new(boundaries, values, vec![storativity; partition.parts])
}

fn solve_zoned(
    aquifer: ZonedAquifer,
    rate: f64,
    radii: &[f64],
    times: &[f64],
    params: &SimulationParams,
) -> FlowResult<SimulationResult> {
    let solver = ZonedLaplaceSolver::new(aquifer, rate, radii.to_vec());
    let grid = stehfest(&solver, times, params.stehfest_order)?;
    Ok(params.finish(grid))
}
