//! Laplace-space head around a pumping well in a zoned aquifer
//!
//! Inside zone `i` the transformed head satisfies the modified Bessel
//! equation, so
//!
//! ```text
//! h̄(r, s) = A_i I0(c_i r) + B_i K0(c_i r),    c_i = sqrt(s S_i / T_i)
//! ```
//!
//! The coefficients follow from the pumping condition at the well, the
//! outer condition and, for every interface, continuity of head and of
//! flux `T ∂h/∂r`. A single zone is solved in closed form; several zones
//! give a `2N × 2N` system with bandwidth two which is solved with the
//! banded LU.

use super::aquifer::{InnerBoundary, OuterBoundary, ZonedAquifer};
use crate::engine::banded::BandedMatrix;
use crate::engine::bessel::{i0, i1, k0, k0_k1, k1, BesselSet};
use crate::laplace::LaplaceFunction;
use ndarray::Array1;
use std::f64::consts::PI;

/// Laplace-domain solver for a fixed aquifer, pumping rate and set of radii
#[derive(Debug, Clone)]
pub struct ZonedLaplaceSolver {
    aquifer: ZonedAquifer,
    pumping_rate: f64,
    radii: Vec<f64>,
    /// `sqrt(S_i / T_i)` per zone
    roots: Vec<f64>,
    /// `(T_i / T_{i+1}) (root_i / root_{i+1})` per interface
    flux_ratios: Vec<f64>,
    matrix_path: bool,
}

impl ZonedLaplaceSolver {
    /// `pumping_rate` is negative for extraction
    pub fn new(aquifer: ZonedAquifer, pumping_rate: f64, radii: Vec<f64>) -> Self {
        let roots = aquifer.diffusivity_roots();
        let t = aquifer.transmissivity();
        let flux_ratios = (0..aquifer.zone_count().saturating_sub(1))
            .map(|i| t[i] / t[i + 1] * roots[i] / roots[i + 1])
            .collect();

        log::debug!(
            "zoned Laplace solver: {} zone(s), {:?} / {:?}, {} radii",
            aquifer.zone_count(),
            aquifer.inner_boundary(),
            aquifer.outer_boundary(),
            radii.len()
        );

        Self {
            aquifer,
            pumping_rate,
            radii,
            roots,
            flux_ratios,
            matrix_path: false,
        }
    }

    /// Always assemble the interface system, even for a single zone
    pub fn with_matrix_path(mut self) -> Self {
        self.matrix_path = true;
        self
    }

    pub fn aquifer(&self) -> &ZonedAquifer {
        &self.aquifer
    }

    /// Transformed head at every radius
    ///
    /// Radii outside `[r_0, r_N)` give zero, as does any value that is not
    /// finite.
    pub fn head(&self, s: f64) -> Array1<f64> {
        let coefficients = self.coefficients(s);
        let scales = self.scales(s);

        let mut masked = 0usize;
        let head: Array1<f64> = self
            .radii
            .iter()
            .map(|&r| {
                let value = self.aquifer.zone_of(r).map_or(0.0, |i| {
                    zone_head(coefficients[2 * i], coefficients[2 * i + 1], scales[i] * r)
                });
                if value.is_finite() {
                    value
                } else {
                    masked += 1;
                    0.0
                }
            })
            .collect();

        if masked > 0 {
            log::warn!(
                "s = {:e}: {} non-finite head value(s) replaced by zero",
                s,
                masked
            );
        }
        head
    }

    /// Zone coefficients `[A_0, B_0, A_1, B_1, …]`
    ///
    /// Non-finite coefficients (singular or overflowing systems) are
    /// replaced by zero.
    pub fn coefficients(&self, s: f64) -> Array1<f64> {
        let mut x = if self.aquifer.zone_count() == 1 && !self.matrix_path {
            self.homogeneous_coefficients(s)
        } else {
            let (matrix, rhs) = self.assemble(s);
            matrix.solve(&rhs)
        };

        let mut masked = 0usize;
        x.mapv_inplace(|v| {
            if v.is_finite() {
                v
            } else {
                masked += 1;
                0.0
            }
        });
        if masked > 0 {
            log::warn!(
                "s = {:e}: {} of {} zone coefficients not finite, set to zero",
                s,
                masked,
                x.len()
            );
        }
        x
    }

    /// Head on the inner and outer side of every interior zone boundary
    pub fn interface_heads(&self, s: f64) -> Vec<(f64, f64)> {
        let x = self.coefficients(s);
        let scales = self.scales(s);
        let radii = self.aquifer.radii();

        (1..self.aquifer.zone_count())
            .map(|i| {
                let r = radii[i];
                let inside = zone_head(x[2 * i - 2], x[2 * i - 1], scales[i - 1] * r);
                let outside = zone_head(x[2 * i], x[2 * i + 1], scales[i] * r);
                (inside, outside)
            })
            .collect()
    }

    /// Argument scales `c_i = sqrt(s) sqrt(S_i / T_i)`
    fn scales(&self, s: f64) -> Vec<f64> {
        let root_s = s.sqrt();
        self.roots.iter().map(|d| root_s * d).collect()
    }

    /// Pumping term `Q / (2π T_0) / s`
    fn pumping_term(&self, s: f64) -> f64 {
        self.pumping_rate / (2.0 * PI * self.aquifer.transmissivity()[0]) / s
    }

    fn homogeneous_coefficients(&self, s: f64) -> Array1<f64> {
        let c = self.roots[0] * s.sqrt();
        let q = self.pumping_term(s);

        let (a, b) = match (self.aquifer.inner_boundary(), self.aquifer.outer_boundary()) {
            (InnerBoundary::Point, OuterBoundary::Unbounded) => (0.0, q),
            (InnerBoundary::Point, OuterBoundary::FixedHead(rn)) => {
                let x = c * rn;
                (-q * k0(x) / i0(x), q)
            }
            (InnerBoundary::WellFace(r0), OuterBoundary::Unbounded) => {
                let x = c * r0;
                (0.0, q / (x * k1(x)))
            }
            (InnerBoundary::WellFace(r0), OuterBoundary::FixedHead(rn)) => {
                let well = BesselSet::at(c * r0);
                let outer = BesselSet::at(c * rn);
                // K0/I0 at the outer edge stays finite when I0 overflows
                let ratio = outer.k0 / outer.i0;
                let b = q / (c * r0) / (well.k1 + well.i1 * ratio);
                (-b * ratio, b)
            }
        };

        Array1::from(vec![a, b])
    }

    /// Interface system `M x = v`
    ///
    /// Row 0 is the pumping condition, rows `2i+1` / `2i+2` continuity of
    /// head and flux across boundary `r_{i+1}`, the last row the outer
    /// condition.
    fn assemble(&self, s: f64) -> (BandedMatrix, Array1<f64>) {
        let zones = self.aquifer.zone_count();
        let n = 2 * zones;
        let radii = self.aquifer.radii();
        let c = self.scales(s);

        let mut m = BandedMatrix::zeros(n, 2, 2);
        let mut v = Array1::zeros(n);
        v[0] = self.pumping_term(s);

        match self.aquifer.inner_boundary() {
            InnerBoundary::Point => m.set(0, 1, 1.0),
            InnerBoundary::WellFace(r0) => {
                let x = c[0] * r0;
                m.set(0, 0, -x * i1(x));
                m.set(0, 1, x * k1(x));
            }
        }

        for i in 0..zones - 1 {
            let r = radii[i + 1];
            let inner = BesselSet::at(c[i] * r);
            let outer = BesselSet::at(c[i + 1] * r);
            let ratio = self.flux_ratios[i];

            let head_row = 2 * i + 1;
            m.set(head_row, 2 * i, inner.i0);
            m.set(head_row, 2 * i + 1, inner.k0);
            m.set(head_row, 2 * i + 2, -outer.i0);
            m.set(head_row, 2 * i + 3, -outer.k0);

            let flux_row = 2 * i + 2;
            m.set(flux_row, 2 * i, ratio * inner.i1);
            m.set(flux_row, 2 * i + 1, -ratio * inner.k1);
            m.set(flux_row, 2 * i + 2, -outer.i1);
            m.set(flux_row, 2 * i + 3, outer.k1);
        }

        let last = n - 1;
        match self.aquifer.outer_boundary() {
            // bounded head: no growing solution in the last zone
            OuterBoundary::Unbounded => m.set(last, n - 2, 1.0),
            OuterBoundary::FixedHead(rn) => {
                let x = c[zones - 1] * rn;
                m.set(last, n - 2, 1.0);
                m.set(last, n - 1, k0(x) / i0(x));
            }
        }

        (m, v)
    }
}

impl LaplaceFunction for ZonedLaplaceSolver {
    fn evaluate(&self, s: f64) -> Array1<f64> {
        self.head(s)
    }
}

/// `A I0(x) + B K0(x)`, skipping a vanishing term so that an overflowing
/// Bessel value cannot turn it into NaN
fn zone_head(a: f64, b: f64, x: f64) -> f64 {
    let growing = if a == 0.0 { 0.0 } else { a * i0(x) };
    let decaying = if b == 0.0 { 0.0 } else { b * k0_k1(x).0 };
    growing + decaying
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn solver(radii: Vec<f64>, t: Vec<f64>, s: Vec<f64>, points: Vec<f64>) -> ZonedLaplaceSolver {
        ZonedLaplaceSolver::new(ZonedAquifer::new(radii, t, s).unwrap(), -1e-3, points)
    }

    #[test]
    fn test_point_source_coefficients() {
        let sol = solver(vec![0.0, f64::INFINITY], vec![1e-3], vec![1e-3], vec![1.0]);
        let x = sol.coefficients(2.0);
        assert_eq!(x[0], 0.0);
        assert_abs_diff_eq!(x[1], -1e-3 / (2.0 * PI * 1e-3) / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_matrix_layout_single_zone() {
        let sol = solver(vec![0.5, 20.0], vec![2e-3], vec![1e-4], vec![1.0]);
        let (m, v) = sol.assemble(1.0);
        let c = (1e-4f64 / 2e-3).sqrt();
        assert_eq!(m.dim(), 2);
        assert_abs_diff_eq!(m.get(0, 0), -c * 0.5 * i1(c * 0.5), epsilon = 1e-14);
        assert_abs_diff_eq!(m.get(0, 1), c * 0.5 * k1(c * 0.5), epsilon = 1e-14);
        assert_eq!(m.get(1, 0), 1.0);
        assert!(v[0] < 0.0 && v[1] == 0.0);
    }

    #[test]
    fn test_outside_domain_is_zero() {
        let sol = solver(vec![0.5, 20.0], vec![2e-3], vec![1e-4], vec![0.1, 1.0, 20.0, 25.0]);
        let h = sol.head(0.5);
        assert_eq!(h[0], 0.0);
        assert!(h[1] < 0.0);
        assert_eq!(h[2], 0.0);
        assert_eq!(h[3], 0.0);
    }

    #[test]
    fn test_heads_are_finite_for_large_nodes() {
        let sol = solver(
            vec![0.0, 3.0, 1000.0],
            vec![1e-3, 1e-2],
            vec![1e-1, 1e-1],
            vec![1.0, 2.0, 500.0],
        );
        let h = sol.head(50.0);
        assert!(h.iter().all(|v| v.is_finite()));
    }
}
