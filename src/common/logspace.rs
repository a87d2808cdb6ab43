//! Numerically stable arithmetic on log-probabilities
//!
//! The persistence filter carries all of its state in log-space to avoid
//! underflow when long sequences of small likelihood terms are multiplied
//! together. The two primitives here compute `log(x + y)` and `log(x - y)`
//! directly from `log(x)` and `log(y)`.

use crate::errors::LogSpaceError;

/// Compute `log(x + y)` from `log(x)` and `log(y)`.
///
/// Symmetric in its arguments. Uses the identity
/// `log(x + y) = log(x) + log1p(exp(log(y) - log(x)))` with the larger
/// argument ordered first, so the exponential argument is never positive.
///
/// When `log(y) - log(x)` is negative enough that the exponential underflows
/// to zero, the result degrades gracefully to the larger argument, which is
/// the mathematically correct limit.
pub fn logsum(logx: f64, logy: f64) -> f64 {
    let (hi, lo) = if logx >= logy {
        (logx, logy)
    } else {
        (logy, logx)
    };

    // Both terms carry zero probability mass
    if hi == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    hi + (lo - hi).exp().ln_1p()
}

/// Compute `log(x - y)` from `log(x)` and `log(y)`, requiring `logx >= logy`.
///
/// Uses the identity `log(x - y) = log(x) + log1p(-exp(log(y) - log(x)))`.
/// The ordering requirement is a hard precondition: violating it means the
/// caller asked for the logarithm of a negative number, and the call fails
/// with [`LogSpaceError::OrderViolation`].
///
/// When `log(y) - log(x)` underflows the exponential to zero, the result is
/// `logx`: the subtracted mass is negligible.
pub fn logdiff(logx: f64, logy: f64) -> Result<f64, LogSpaceError> {
    if logy > logx {
        return Err(LogSpaceError::OrderViolation { logx, logy });
    }

    // x == y == 0; the difference carries no mass
    if logx == f64::NEG_INFINITY {
        return Ok(f64::NEG_INFINITY);
    }

    Ok(logx + (-(logy - logx).exp()).ln_1p())
}
