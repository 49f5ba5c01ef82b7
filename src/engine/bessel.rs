//! Modified Bessel functions of order 0 and 1 for real arguments
//!
//! The radial diffusion equation in Laplace space is the modified Bessel
//! equation, so every head evaluation reduces to a combination of
//! I0, I1, K0 and K1. The Stehfest nodes are real, hence only real,
//! non-negative arguments are needed.
//!
//! * `I_n`: power series up to `x = 30`, Hankel asymptotic expansion above.
//! * `K_n`: logarithmic power series up to `x = 2`, Steed's continued
//!   fraction (CF2) above, which yields K0 and K1 in one pass.

use std::f64::consts::PI;

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Switch from power series to asymptotic expansion for I_n
const I_SERIES_LIMIT: f64 = 30.0;

/// Switch from power series to continued fraction for K_n
const K_SERIES_LIMIT: f64 = 2.0;

const EPS: f64 = 1e-17;
const MAX_ITER: usize = 10_000;

/// The four Bessel values needed at one argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesselSet {
    pub i0: f64,
    pub i1: f64,
    pub k0: f64,
    pub k1: f64,
}

impl BesselSet {
    /// Evaluate I0, I1, K0 and K1 at `x`
    pub fn at(x: f64) -> Self {
        let (k0, k1) = k0_k1(x);
        Self {
            i0: i0(x),
            i1: i1(x),
            k0,
            k1,
        }
    }
}

/// Modified Bessel function of the first kind, order 0
pub fn i0(x: f64) -> f64 {
    bessel_i(0, x.abs())
}

/// Modified Bessel function of the first kind, order 1
pub fn i1(x: f64) -> f64 {
    let value = bessel_i(1, x.abs());
    if x < 0.0 {
        -value
    } else {
        value
    }
}

/// Modified Bessel function of the second kind, order 0
pub fn k0(x: f64) -> f64 {
    k0_k1(x).0
}

/// Modified Bessel function of the second kind, order 1
pub fn k1(x: f64) -> f64 {
    k0_k1(x).1
}

/// K0 and K1 evaluated together
///
/// Returns `(+inf, +inf)` at the origin and NaN for negative or NaN input.
pub fn k0_k1(x: f64) -> (f64, f64) {
    if x.is_nan() || x < 0.0 {
        (f64::NAN, f64::NAN)
    } else if x == 0.0 {
        (f64::INFINITY, f64::INFINITY)
    } else if x <= K_SERIES_LIMIT {
        k_series(x)
    } else if x.is_infinite() {
        (0.0, 0.0)
    } else {
        k_continued_fraction(x)
    }
}

fn bessel_i(order: u32, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= I_SERIES_LIMIT {
        i_series(order, x)
    } else {
        i_asymptotic(order, x)
    }
}

/// I_n(x) = Σ (x/2)^(2k+n) / (k! (k+n)!)
fn i_series(order: u32, x: f64) -> f64 {
    let quarter_sq = 0.25 * x * x;
    let mut term = if order == 0 { 1.0 } else { 0.5 * x };
    let mut sum = term;

    for k in 1..MAX_ITER {
        let k = k as f64;
        term *= quarter_sq / (k * (k + order as f64));
        sum += term;
        if term <= EPS * sum {
            break;
        }
    }

    sum
}

/// I_n(x) ~ e^x / sqrt(2πx) Σ (-1)^k a_k(n) / x^k
fn i_asymptotic(order: u32, x: f64) -> f64 {
    let mu = 4.0 * (order * order) as f64;
    let mut term = 1.0;
    let mut sum = 1.0;

    for k in 1..30 {
        let odd = (2 * k - 1) as f64;
        term *= -(mu - odd * odd) / (k as f64 * 8.0 * x);
        sum += term;
        if term.abs() < EPS {
            break;
        }
    }

    // split the exponential so that e^x overflows only where the result does
    let half = (0.5 * x).exp();
    half * (sum / (2.0 * PI * x).sqrt()) * half
}

/// Power series around the origin (A&S 9.6.13 and 9.6.11)
fn k_series(x: f64) -> (f64, f64) {
    let quarter_sq = 0.25 * x * x;
    let log_half = (0.5 * x).ln();

    // K0 = -ln(x/2) I0 + Σ ψ(k+1) (x²/4)^k / (k!)²
    let mut term = 1.0;
    let mut psi = -EULER_GAMMA;
    let mut sum = psi;
    for k in 1..MAX_ITER {
        let kf = k as f64;
        term *= quarter_sq / (kf * kf);
        psi += 1.0 / kf;
        let delta = term * psi;
        sum += delta;
        if delta.abs() < EPS * sum.abs() {
            break;
        }
    }
    let k0 = -log_half * i_series(0, x) + sum;

    // K1 = 1/x + ln(x/2) I1 - x/4 Σ (ψ(k+1) + ψ(k+2)) (x²/4)^k / (k! (k+1)!)
    let mut term = 1.0;
    let mut psi_a = -EULER_GAMMA;
    let mut psi_b = 1.0 - EULER_GAMMA;
    let mut sum = psi_a + psi_b;
    for k in 1..MAX_ITER {
        let kf = k as f64;
        term *= quarter_sq / (kf * (kf + 1.0));
        psi_a += 1.0 / kf;
        psi_b += 1.0 / (kf + 1.0);
        let delta = term * (psi_a + psi_b);
        sum += delta;
        if delta.abs() < EPS * sum.abs() {
            break;
        }
    }
    let k1 = 1.0 / x + log_half * i_series(1, x) - 0.25 * x * sum;

    (k0, k1)
}

/// Steed's continued fraction CF2 for order 0, recurrence to order 1
fn k_continued_fraction(x: f64) -> (f64, f64) {
    let a1 = 0.25;
    let mut b = 2.0 * (1.0 + x);
    let mut d = 1.0 / b;
    let mut delh = d;
    let mut h = d;
    let mut q1 = 0.0;
    let mut q2 = 1.0;
    let mut q = a1;
    let mut c = a1;
    let mut a = -a1;
    let mut s = 1.0 + q * delh;

    for i in 2..MAX_ITER {
        let i = i as f64;
        a -= 2.0 * (i - 1.0);
        c = -a * c / i;
        let q_next = (q1 - b * q2) / a;
        q1 = q2;
        q2 = q_next;
        q += c * q_next;
        b += 2.0;
        d = 1.0 / (b + a * d);
        delh *= b * d - 1.0;
        h += delh;
        let dels = q * delh;
        s += dels;
        if (dels / s).abs() < 1e-16 {
            break;
        }
    }

    h *= a1;
    let k0 = (PI / (2.0 * x)).sqrt() * (-x).exp() / s;
    let k1 = k0 * (x + 0.5 - h) / x;
    (k0, k1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_values_at_one() {
        assert_relative_eq!(i0(1.0), 1.266_065_877_752_008_2, max_relative = 1e-14);
        assert_relative_eq!(i1(1.0), 0.565_159_103_992_485_1, max_relative = 1e-14);
        assert_relative_eq!(k0(1.0), 0.421_024_438_240_708_3, max_relative = 1e-14);
        assert_relative_eq!(k1(1.0), 0.601_907_230_197_234_6, max_relative = 1e-14);
    }

    #[test]
    fn test_small_argument() {
        assert_relative_eq!(k0(0.1), 2.427_069_024_702_016_4, max_relative = 1e-13);
        assert_relative_eq!(k1(0.1), 9.853_844_780_870_606, max_relative = 1e-13);
        assert_eq!(i0(0.0), 1.0);
        assert_eq!(i1(0.0), 0.0);
        assert!(k0(0.0).is_infinite());
    }

    #[test]
    fn test_branch_switch_is_continuous() {
        // both K branches at the switch point
        let (s0, s1) = k_series(K_SERIES_LIMIT);
        let (c0, c1) = k_continued_fraction(K_SERIES_LIMIT);
        assert_relative_eq!(s0, c0, max_relative = 1e-13);
        assert_relative_eq!(s1, c1, max_relative = 1e-13);
        assert_relative_eq!(k0(2.0), 0.113_893_872_749_533_44, max_relative = 1e-13);
        assert_relative_eq!(k1(2.0), 0.139_865_881_816_522_43, max_relative = 1e-13);

        let series = i_series(0, I_SERIES_LIMIT);
        let asymptotic = i_asymptotic(0, I_SERIES_LIMIT);
        assert_relative_eq!(series, asymptotic, max_relative = 1e-13);
        assert_relative_eq!(i0(30.0), 781_672_297_823.977_5, max_relative = 1e-13);
    }

    #[test]
    fn test_large_argument() {
        assert_relative_eq!(k0(10.0), 1.778_006_231_616_917e-5, max_relative = 1e-12);
        assert_relative_eq!(k1(10.0), 1.864_877_345_382_558e-5, max_relative = 1e-12);
        assert!(i0(800.0).is_infinite());
        assert_eq!(k0(800.0), 0.0);
    }

    #[test]
    fn test_wronskian() {
        // I0 K1 + I1 K0 = 1/x
        for &x in &[0.05, 0.5, 1.9, 2.1, 7.0, 25.0, 40.0] {
            let b = BesselSet::at(x);
            assert_relative_eq!(b.i0 * b.k1 + b.i1 * b.k0, 1.0 / x, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_symmetry_and_domain() {
        assert_eq!(i0(-1.5), i0(1.5));
        assert_eq!(i1(-1.5), -i1(1.5));
        assert!(k0(-1.0).is_nan());
        assert!(k1(f64::NAN).is_nan());
    }
}
