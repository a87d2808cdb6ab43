//! Exponential integral E1 for positive arguments
//!
//! `E1(x) = integral from x to infinity of exp(-u)/u du`, the special
//! function underlying the general-purpose survival-time prior.
//!
//! Evaluated with the classic split: a power series around the origin for
//! `x <= 1` (Abramowitz & Stegun 5.1.11) and a modified-Lentz continued
//! fraction for `x > 1` (Abramowitz & Stegun 5.1.22).
//!
//! Underflow is reported as `None`, never raised: for large `x` the value
//! `E1(x) ~ exp(-x)/x` drops below the smallest normal f64 long before the
//! argument itself becomes extreme, and callers substitute an asymptotic
//! expansion for `log(E1(x))` in that regime. This replaces the global
//! error-handler toggling a C special-function library would require with a
//! pure result inspected locally at each call site.

/// Euler-Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Iteration cap for both the series and the continued fraction. Both
/// converge in well under this many terms over their respective domains.
const MAX_ITERATIONS: usize = 200;

/// Evaluate `E1(x)` for `x > 0`.
///
/// Returns `None` when the result is smaller than the smallest positive
/// normal `f64`, i.e. when the value has underflowed out of representable
/// range.
pub fn exp1(x: f64) -> Option<f64> {
    debug_assert!(x > 0.0, "E1 is evaluated on positive arguments only");

    if x <= 1.0 {
        Some(exp1_series(x))
    } else {
        exp1_continued_fraction(x)
    }
}

/// Power series: `E1(x) = -gamma - ln(x) + sum_{k>=1} (-1)^(k+1) x^k / (k * k!)`
fn exp1_series(x: f64) -> f64 {
    let mut sum = -EULER_GAMMA - x.ln();
    let mut term = 1.0; // (-x)^k / k! running term

    for k in 1..=MAX_ITERATIONS {
        term *= -x / k as f64;
        let delta = -term / k as f64;
        sum += delta;
        if delta.abs() < sum.abs() * f64::EPSILON {
            break;
        }
    }

    sum
}

/// Modified-Lentz evaluation of the continued fraction
/// `E1(x) = exp(-x) * 1/(x + 1 - 1/(x + 3 - 4/(x + 5 - 9/(...))))`
fn exp1_continued_fraction(x: f64) -> Option<f64> {
    let mut b = x + 1.0;
    let mut c = f64::MAX;
    let mut d = 1.0 / b;
    let mut h = d;

    for i in 1..=MAX_ITERATIONS {
        let a = -((i * i) as f64);
        b += 2.0;
        d = 1.0 / (a * d + b);
        c = b + a / c;
        let delta = c * d;
        h *= delta;
        if (delta - 1.0).abs() < f64::EPSILON {
            break;
        }
    }

    let result = h * (-x).exp();
    if result < f64::MIN_POSITIVE {
        None
    } else {
        Some(result)
    }
}
