//! Concentric zone model of a confined aquifer

use crate::error::{ensure_all_positive, ensure_positive, FlowError, FlowResult};

/// Condition at the innermost radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InnerBoundary {
    /// Line source at the origin
    Point,
    /// Pumping through the face of a well with finite radius
    WellFace(f64),
}

/// Condition at the outermost radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OuterBoundary {
    /// Head bounded at infinity
    Unbounded,
    /// Fixed (zero) head at a finite radius
    FixedHead(f64),
}

/// Radial partition `r_0 < r_1 < … < r_N` with constant transmissivity and
/// storativity inside each annulus
#[derive(Debug, Clone, PartialEq)]
pub struct ZonedAquifer {
    radii: Vec<f64>,
    transmissivity: Vec<f64>,
    storativity: Vec<f64>,
}

impl ZonedAquifer {
    /// Build a validated zone model
    ///
    /// `radii` holds all `N + 1` boundaries, the property arrays one value
    /// per zone. The last boundary may be `f64::INFINITY`.
    pub fn new(radii: Vec<f64>, transmissivity: Vec<f64>, storativity: Vec<f64>) -> FlowResult<Self> {
        if transmissivity.is_empty() {
            return Err(FlowError::Empty("zone"));
        }
        let zones = transmissivity.len();
        if radii.len() != zones + 1 {
            return Err(FlowError::size_mismatch("zone boundaries", zones + 1, radii.len()));
        }
        if storativity.len() != zones {
            return Err(FlowError::size_mismatch("storativity", zones, storativity.len()));
        }

        let well = radii[0];
        if !(well >= 0.0 && well.is_finite()) {
            return Err(FlowError::InvalidWellRadius(well));
        }
        for (index, pair) in radii.windows(2).enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(FlowError::UnsortedZones {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        ensure_all_positive("transmissivity", &transmissivity)?;
        ensure_all_positive("storativity", &storativity)?;

        Ok(Self {
            radii,
            transmissivity,
            storativity,
        })
    }

    /// Single zone between `well_radius` and `outer_radius`
    pub fn homogeneous(
        well_radius: f64,
        outer_radius: f64,
        transmissivity: f64,
        storativity: f64,
    ) -> FlowResult<Self> {
        ensure_positive("transmissivity", transmissivity)?;
        ensure_positive("storativity", storativity)?;
        if !(outer_radius > well_radius) {
            return Err(FlowError::InvalidOuterRadius {
                well_radius,
                outer_radius,
            });
        }
        Self::new(
            vec![well_radius, outer_radius],
            vec![transmissivity],
            vec![storativity],
        )
    }

    /// Number of zones `N`
    pub fn zone_count(&self) -> usize {
        self.transmissivity.len()
    }

    /// All `N + 1` zone boundaries
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn transmissivity(&self) -> &[f64] {
        &self.transmissivity
    }

    pub fn storativity(&self) -> &[f64] {
        &self.storativity
    }

    pub fn well_radius(&self) -> f64 {
        self.radii[0]
    }

    pub fn outer_radius(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    pub fn inner_boundary(&self) -> InnerBoundary {
        let r0 = self.well_radius();
        if r0 > 0.0 {
            InnerBoundary::WellFace(r0)
        } else {
            InnerBoundary::Point
        }
    }

    pub fn outer_boundary(&self) -> OuterBoundary {
        let rn = self.outer_radius();
        if rn.is_finite() {
            OuterBoundary::FixedHead(rn)
        } else {
            OuterBoundary::Unbounded
        }
    }

    /// Square roots of the diffusivity reciprocals `sqrt(S_i / T_i)`
    pub fn diffusivity_roots(&self) -> Vec<f64> {
        self.storativity
            .iter()
            .zip(&self.transmissivity)
            .map(|(s, t)| (s / t).sqrt())
            .collect()
    }

    /// Index `i` of the zone with `r_i <= r < r_{i+1}`
    pub fn zone_of(&self, r: f64) -> Option<usize> {
        if !(r >= self.well_radius() && r < self.outer_radius()) {
            return None;
        }
        // first boundary strictly greater than r, minus one
        Some(self.radii.partition_point(|&b| b <= r) - 1)
    }
}
