//! Survival-time priors
//!
//! A survival prior is the capability injected into the persistence filter:
//! a pure, deterministic map from elapsed time `t >= 0` to the natural
//! logarithm of the survival function `S_T(t)` of the feature's persistence
//! time, with `log S_T(0) = 0` and `log S_T` nonincreasing. The filter never
//! inspects the prior beyond calling it, so alternative priors can be
//! substituted without touching the filter itself.
//!
//! The reference implementation is [`GeneralPurposePrior`], the two-rate
//! mixture model from "Towards Lifelong Feature-Based Mapping in Semi-Static
//! Environments" (Rosen, Mason, Leonard).

use std::f64::consts::LN_2;

use crate::common::expint::exp1;
use crate::common::logspace::logdiff;
use crate::errors::PriorError;

/// Capability trait for survival-time priors.
///
/// Implementors must be deterministic and side-effect-free; the filter may
/// call `log_survival` many times per second, so evaluation should be cheap.
///
/// The trait is blanket-implemented for closures, so a plain
/// `|t| { ... }` can be handed to the filter directly.
pub trait SurvivalPrior {
    /// Natural logarithm of the survival function `S_T(t)` at elapsed time
    /// `t >= 0`.
    ///
    /// Fails with [`PriorError::NegativeTime`] for `t < 0`.
    fn log_survival(&self, t: f64) -> Result<f64, PriorError>;
}

impl<F> SurvivalPrior for F
where
    F: Fn(f64) -> Result<f64, PriorError>,
{
    fn log_survival(&self, t: f64) -> Result<f64, PriorError> {
        self(t)
    }
}

/// The general-purpose two-rate survival-time prior.
///
/// Models the persistence time as exponentially distributed with an unknown
/// rate, itself distributed log-uniformly over `[lambda_l, lambda_u]`.
/// Marginalizing over the rate gives the survival function
///
/// ```text
/// S_T(t) = [E1(lambda_l * t) - E1(lambda_u * t)] / ln(lambda_u / lambda_l)
/// ```
///
/// where `E1` is the exponential integral. For large `t` the `E1` terms
/// underflow before their logarithms can be taken; each term independently
/// falls back to a tight asymptotic bound on its logarithm in that regime.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct GeneralPurposePrior {
    lambda_l: f64,
    lambda_u: f64,
    /// Precomputed `ln(ln(lambda_u / lambda_l))` normalization constant
    #[serde(skip)]
    log_log_rate_ratio: f64,
}

impl GeneralPurposePrior {
    /// Create a prior with admissible rate bounds `0 < lambda_l < lambda_u`.
    ///
    /// Fails with [`PriorError::RateOrdering`] unless `lambda_l < lambda_u`.
    pub fn new(lambda_l: f64, lambda_u: f64) -> Result<Self, PriorError> {
        if !(lambda_l < lambda_u) {
            return Err(PriorError::RateOrdering { lambda_l, lambda_u });
        }

        Ok(Self {
            lambda_l,
            lambda_u,
            log_log_rate_ratio: (lambda_u / lambda_l).ln().ln(),
        })
    }

    /// Lower rate bound
    #[inline]
    pub fn lambda_l(&self) -> f64 {
        self.lambda_l
    }

    /// Upper rate bound
    #[inline]
    pub fn lambda_u(&self) -> f64 {
        self.lambda_u
    }

    /// `log(E1(lambda_l * t))`, with the asymptotic fallback for large
    /// arguments.
    ///
    /// The fallback is the upper bound `E1(x) < exp(-x) * log(1 + 1/x)`,
    /// which is tight as `x -> infinity`.
    fn log_e1_lower_rate(&self, t: f64) -> f64 {
        let x = self.lambda_l * t;
        match exp1(x) {
            Some(value) => value.ln(),
            None => -x + (1.0 / x).ln_1p().ln(),
        }
    }

    /// `log(E1(lambda_u * t))`, with the asymptotic fallback for large
    /// arguments.
    ///
    /// The fallback is the lower bound `E1(x) > (1/2) * exp(-x) * log(1 + 2/x)`.
    fn log_e1_upper_rate(&self, t: f64) -> f64 {
        let x = self.lambda_u * t;
        match exp1(x) {
            Some(value) => value.ln(),
            None => -LN_2 - x + (2.0 / x).ln_1p().ln(),
        }
    }
}

impl SurvivalPrior for GeneralPurposePrior {
    fn log_survival(&self, t: f64) -> Result<f64, PriorError> {
        if t < 0.0 {
            return Err(PriorError::NegativeTime { t });
        }

        if t > 0.0 {
            // The two E1 terms are evaluated independently; in the same call
            // one may take the exact path and the other the asymptotic one.
            let log_e1_l = self.log_e1_lower_rate(t);
            let log_e1_u = self.log_e1_upper_rate(t);
            Ok(logdiff(log_e1_l, log_e1_u)? - self.log_log_rate_ratio)
        } else {
            // S_T(0) = 1 by continuity
            Ok(0.0)
        }
    }
}

/// Free-function form of the general-purpose survival function.
///
/// Evaluates `log S_T(t)` for the two-rate prior with bounds
/// `lambda_l < lambda_u`, validating both the elapsed time and the rate
/// ordering on every call. Prefer constructing a [`GeneralPurposePrior`]
/// when evaluating repeatedly.
pub fn log_general_purpose_survival_function(
    t: f64,
    lambda_l: f64,
    lambda_u: f64,
) -> Result<f64, PriorError> {
    GeneralPurposePrior::new(lambda_l, lambda_u)?.log_survival(t)
}
