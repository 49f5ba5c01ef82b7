//! Coarse-grained transmissivity and conductivity profiles
//!
//! For a log-normal field with a Gaussian covariance, the effective value
//! seen by radial flow varies from a well value at `r = 0` to the far-field
//! effective value as
//!
//! ```text
//! X_CG(r) = X_mean · exp(χ / (1 + C r²)^p)
//! ```
//!
//! with `p = 1` for depth-averaged transmissivity (2D) and `p = 3/2` for
//! conductivity in 3D. The well policy is resolved into `χ` once, so the
//! solver only ever sees a `CoarseGraining`.

use crate::error::{ensure_positive, FlowError, FlowResult};

/// Default proportionality factor of the upscaling procedure
pub const DEFAULT_PROPORTIONALITY: f64 = 1.6;

/// Conductivity assumed at the well in the 3D model
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WellConductivity {
    /// Harmonic mean `K_G exp(-σ²/2)`
    #[default]
    Harmonic,
    /// Arithmetic mean `K_G exp(σ²/2)`
    Arithmetic,
    /// Explicit value
    Value(f64),
}

/// Anisotropy function `a(e)` for the ratio `e` of vertical to horizontal
/// correlation length, `0 < e <= 1`
pub fn anisotropy_factor(e: f64) -> FlowResult<f64> {
    if !(e > 0.0 && e <= 1.0) {
        return Err(FlowError::out_of_interval("anisotropy ratio", e, "(0, 1]"));
    }
    if e == 1.0 {
        return Ok(1.0 / 3.0);
    }
    let q = (1.0 - e * e).sqrt();
    Ok(e / (2.0 * q * q) * ((q / e).atan() / q - e))
}

/// Resolved profile `mean · exp(chi / (1 + scale_sq r²)^exponent)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoarseGraining {
    /// Far-field effective value
    pub mean: f64,
    /// Log-ratio of the well value to the far-field value
    pub chi: f64,
    /// `C` in `1 + C r²`
    pub scale_sq: f64,
    pub exponent: f64,
}

impl CoarseGraining {
    /// Effective value at radius `r`; the far-field value at infinity
    pub fn value_at(&self, r: f64) -> f64 {
        if r.is_infinite() {
            return self.mean;
        }
        let damping = (1.0 + self.scale_sq * r * r).powf(self.exponent);
        self.mean * (self.chi / damping).exp()
    }

    pub fn well_value(&self) -> f64 {
        self.mean * self.chi.exp()
    }

    /// Radius beyond which the profile stays within `relative_error` of the
    /// far-field value
    ///
    /// Zero when the whole profile is already within tolerance.
    pub fn cutoff_radius(&self, relative_error: f64) -> FlowResult<f64> {
        if !(relative_error > 0.0 && relative_error < 1.0) {
            return Err(FlowError::out_of_interval(
                "relative error",
                relative_error,
                "(0, 1)",
            ));
        }
        let bound = if self.chi > 0.0 {
            relative_error.ln_1p()
        } else if self.chi < 0.0 {
            (-relative_error).ln_1p()
        } else {
            return Ok(0.0);
        };

        let ratio = self.chi / bound;
        if ratio <= 1.0 {
            return Ok(0.0);
        }
        Ok(((ratio.powf(1.0 / self.exponent) - 1.0) / self.scale_sq).sqrt())
    }
}

/// Statistics of a log-normal transmissivity field (2D)
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissivityField {
    pub geometric_mean: f64,
    /// Variance of `ln T`
    pub variance: f64,
    pub correlation_length: f64,
    /// Explicit transmissivity at the well, harmonic mean when `None`
    pub well: Option<f64>,
    pub proportionality: f64,
}

impl TransmissivityField {
    pub fn new(geometric_mean: f64, variance: f64, correlation_length: f64) -> Self {
        Self {
            geometric_mean,
            variance,
            correlation_length,
            well: None,
            proportionality: DEFAULT_PROPORTIONALITY,
        }
    }

    pub fn with_well_transmissivity(mut self, well: f64) -> Self {
        self.well = Some(well);
        self
    }

    pub fn with_proportionality(mut self, proportionality: f64) -> Self {
        self.proportionality = proportionality;
        self
    }

    pub fn validate(&self) -> FlowResult<()> {
        ensure_positive("geometric mean transmissivity", self.geometric_mean)?;
        if let Some(well) = self.well {
            ensure_positive("well transmissivity", well)?;
        }
        ensure_positive("variance", self.variance)?;
        ensure_positive("correlation length", self.correlation_length)?;
        ensure_positive("proportionality factor", self.proportionality)
    }

    pub fn coarse_graining(&self) -> FlowResult<CoarseGraining> {
        self.validate()?;
        let chi = match self.well {
            Some(well) => well.ln() - self.geometric_mean.ln(),
            None => -0.5 * self.variance,
        };
        Ok(CoarseGraining {
            mean: self.geometric_mean,
            chi,
            scale_sq: (self.proportionality / self.correlation_length).powi(2),
            exponent: 1.0,
        })
    }
}

/// Statistics of a log-normal, vertically anisotropic conductivity field (3D)
#[derive(Debug, Clone, PartialEq)]
pub struct ConductivityField {
    pub geometric_mean: f64,
    /// Variance of `ln K`
    pub variance: f64,
    /// Horizontal correlation length
    pub correlation_length: f64,
    /// Vertical over horizontal correlation length, in `(0, 1]`
    pub anisotropy: f64,
    pub well: WellConductivity,
    pub proportionality: f64,
}

impl ConductivityField {
    pub fn new(geometric_mean: f64, variance: f64, correlation_length: f64, anisotropy: f64) -> Self {
        Self {
            geometric_mean,
            variance,
            correlation_length,
            anisotropy,
            well: WellConductivity::default(),
            proportionality: DEFAULT_PROPORTIONALITY,
        }
    }

    pub fn with_well(mut self, well: WellConductivity) -> Self {
        self.well = well;
        self
    }

    pub fn with_proportionality(mut self, proportionality: f64) -> Self {
        self.proportionality = proportionality;
        self
    }

    pub fn validate(&self) -> FlowResult<()> {
        ensure_positive("geometric mean conductivity", self.geometric_mean)?;
        if let WellConductivity::Value(k) = self.well {
            ensure_positive("well conductivity", k)?;
        }
        ensure_positive("variance", self.variance)?;
        ensure_positive("correlation length", self.correlation_length)?;
        anisotropy_factor(self.anisotropy)?;
        ensure_positive("proportionality factor", self.proportionality)
    }

    /// Far-field effective conductivity `K_G exp(σ² (1/2 - a(e)))`
    pub fn effective_mean(&self) -> FlowResult<f64> {
        let a = anisotropy_factor(self.anisotropy)?;
        Ok(self.geometric_mean * (self.variance * (0.5 - a)).exp())
    }

    pub fn coarse_graining(&self) -> FlowResult<CoarseGraining> {
        self.validate()?;
        let a = anisotropy_factor(self.anisotropy)?;
        let mean = self.effective_mean()?;
        let chi = match self.well {
            WellConductivity::Harmonic => self.variance * (a - 1.0),
            WellConductivity::Arithmetic => self.variance * a,
            WellConductivity::Value(k) => k.ln() - mean.ln(),
        };
        let length = self.correlation_length * self.anisotropy.cbrt();
        Ok(CoarseGraining {
            mean,
            chi,
            scale_sq: (self.proportionality / length).powi(2),
            exponent: 1.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_anisotropy_limits() {
        assert_relative_eq!(anisotropy_factor(1.0).unwrap(), 1.0 / 3.0);
        assert_relative_eq!(anisotropy_factor(1.0 - 1e-6).unwrap(), 1.0 / 3.0, epsilon = 1e-5);
        assert!(anisotropy_factor(1e-6).unwrap() < 1e-5);
        assert!(anisotropy_factor(0.0).is_err());
        assert!(anisotropy_factor(1.5).is_err());
    }

    #[test]
    fn test_transmissivity_profile_limits() {
        let cg = TransmissivityField::new(1e-3, 1.0, 10.0)
            .coarse_graining()
            .unwrap();
        // harmonic mean at the well, geometric mean far away
        assert_relative_eq!(cg.value_at(0.0), 1e-3 * (-0.5f64).exp(), max_relative = 1e-14);
        assert_relative_eq!(cg.well_value(), cg.value_at(0.0));
        assert_eq!(cg.value_at(f64::INFINITY), 1e-3);
        assert!(cg.value_at(5.0) > cg.value_at(1.0));
    }

    #[test]
    fn test_well_policies() {
        let field = ConductivityField::new(1e-3, 1.0, 10.0, 1.0);
        let harmonic = field.coarse_graining().unwrap();
        assert_relative_eq!(harmonic.well_value(), 1e-3 * (-0.5f64).exp(), max_relative = 1e-14);

        let arithmetic = field
            .clone()
            .with_well(WellConductivity::Arithmetic)
            .coarse_graining()
            .unwrap();
        assert_relative_eq!(arithmetic.well_value(), 1e-3 * 0.5f64.exp(), max_relative = 1e-14);

        let explicit = field
            .with_well(WellConductivity::Value(2e-3))
            .coarse_graining()
            .unwrap();
        assert_relative_eq!(explicit.well_value(), 2e-3, max_relative = 1e-14);
    }

    #[test]
    fn test_cutoff_radius() {
        let cg = TransmissivityField::new(1e-3, 1.0, 10.0)
            .coarse_graining()
            .unwrap();
        let r = cg.cutoff_radius(0.01).unwrap();
        assert_relative_eq!(r, 43.638_062_709_737_98, max_relative = 1e-12);
        assert_relative_eq!(cg.value_at(r), 1e-3 * 0.99, max_relative = 1e-12);

        let cg3 = ConductivityField::new(1e-3, 1.0, 10.0, 1.0)
            .coarse_graining()
            .unwrap();
        assert_relative_eq!(cg3.cutoff_radius(0.01).unwrap(), 24.515_995_567_049_806, max_relative = 1e-12);

        // a well value inside the tolerance needs no partition at all
        let flat = TransmissivityField::new(1e-3, 1.0, 10.0)
            .with_well_transmissivity(1.001e-3)
            .coarse_graining()
            .unwrap();
        assert_eq!(flat.cutoff_radius(0.01).unwrap(), 0.0);
        assert!(flat.cutoff_radius(1.0).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(TransmissivityField::new(-1.0, 1.0, 10.0).validate().is_err());
        assert!(TransmissivityField::new(1.0, 1.0, 10.0)
            .with_well_transmissivity(0.0)
            .validate()
            .is_err());
        assert!(ConductivityField::new(1.0, 1.0, 10.0, 0.0).validate().is_err());
        assert!(ConductivityField::new(1.0, 1.0, 10.0, 0.5)
            .with_proportionality(0.0)
            .validate()
            .is_err());
    }
}
