//! Exponential integrals E1 and Ei
//!
//! E1 is the Theis well function `W(u) = E1(u)`; Ei appears in the
//! steady-state solution for a coarse-grained transmissivity.

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

const EPS: f64 = 1e-17;
const MAX_ITER: usize = 1000;
const FP_MIN: f64 = 1e-300;

/// Exponential integral `E1(x) = ∫_x^∞ e^{-t}/t dt` for `x > 0`
///
/// Returns `+inf` at the origin and NaN for negative input.
pub fn exp1(x: f64) -> f64 {
    if x.is_nan() || x < 0.0 {
        f64::NAN
    } else if x == 0.0 {
        f64::INFINITY
    } else if x <= 1.0 {
        series(x)
    } else if x.is_infinite() {
        0.0
    } else {
        continued_fraction(x)
    }
}

/// Exponential integral `Ei(x)`, principal value, for real `x != 0`
///
/// `Ei(x) = -E1(-x)` for negative input; `Ei(0) = -inf`.
pub fn expi(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x == 0.0 {
        f64::NEG_INFINITY
    } else if x < 0.0 {
        -exp1(-x)
    } else if x <= 40.0 {
        ei_series(x)
    } else if x.is_infinite() {
        f64::INFINITY
    } else {
        ei_asymptotic(x)
    }
}

/// Ei(x) = γ + ln x + Σ x^k / (k k!)
fn ei_series(x: f64) -> f64 {
    let mut term = 1.0;
    let mut sum = 0.0;
    for k in 1..MAX_ITER {
        let k = k as f64;
        term *= x / k;
        let delta = term / k;
        sum += delta;
        if delta < EPS * sum {
            break;
        }
    }
    EULER_GAMMA + x.ln() + sum
}

/// Ei(x) ~ e^x / x Σ k! / x^k, truncated at the smallest term
fn ei_asymptotic(x: f64) -> f64 {
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..MAX_ITER {
        let next = term * k as f64 / x;
        if next < EPS * sum || next > term {
            break;
        }
        term = next;
        sum += term;
    }
    x.exp() / x * sum
}

/// E1(x) = -γ - ln x - Σ (-x)^k / (k k!)
fn series(x: f64) -> f64 {
    let mut term = 1.0;
    let mut sum = 0.0;
    for k in 1..MAX_ITER {
        let k = k as f64;
        term *= -x / k;
        let delta = term / k;
        sum += delta;
        if delta.abs() < EPS * sum.abs() {
            break;
        }
    }
    -EULER_GAMMA - x.ln() - sum
}

/// Modified Lentz evaluation of the even continued fraction
fn continued_fraction(x: f64) -> f64 {
    let mut b = x + 1.0;
    let mut c = 1.0 / FP_MIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..MAX_ITER {
        let a = -((i * i) as f64);
        b += 2.0;
        d = 1.0 / (a * d + b);
        c = b + a / c;
        let delta = c * d;
        h *= delta;
        if (delta - 1.0).abs() < 1e-16 {
            break;
        }
    }
    h * (-x).exp()
}
