//! Error types for the persistence filter and its numeric primitives
//!
//! All failures are domain errors raised on invalid caller input. Numeric
//! underflow is never an error anywhere in this crate: it is detected locally
//! and replaced by its correct limiting value.

use std::fmt;

/// Errors from the log-space arithmetic primitives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogSpaceError {
    /// `logdiff(logx, logy)` was called with `logx < logy`, i.e. the caller
    /// asked for the logarithm of a negative number
    OrderViolation {
        /// Log of the minuend
        logx: f64,
        /// Log of the subtrahend
        logy: f64,
    },
}

impl fmt::Display for LogSpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSpaceError::OrderViolation { logx, logy } => {
                write!(
                    f,
                    "logdiff requires logx >= logy (got logx = {}, logy = {})",
                    logx, logy
                )
            }
        }
    }
}

impl std::error::Error for LogSpaceError {}

/// Errors from survival-time priors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorError {
    /// Survival functions are defined on the nonnegative real line
    NegativeTime {
        /// The offending elapsed time
        t: f64,
    },

    /// The general-purpose prior requires `lambda_l < lambda_u`
    RateOrdering {
        /// Lower rate bound
        lambda_l: f64,
        /// Upper rate bound
        lambda_u: f64,
    },

    /// Log-space arithmetic failed inside a prior evaluation
    LogSpace(LogSpaceError),
}

impl fmt::Display for PriorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorError::NegativeTime { t } => {
                write!(
                    f,
                    "survival functions are defined on the nonnegative real line (got t = {})",
                    t
                )
            }
            PriorError::RateOrdering { lambda_l, lambda_u } => {
                write!(
                    f,
                    "rate parameter lambda_u must be greater than lambda_l (got lambda_l = {}, lambda_u = {})",
                    lambda_l, lambda_u
                )
            }
            PriorError::LogSpace(e) => write!(f, "prior evaluation failed: {}", e),
        }
    }
}

impl std::error::Error for PriorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PriorError::LogSpace(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LogSpaceError> for PriorError {
    fn from(e: LogSpaceError) -> Self {
        PriorError::LogSpace(e)
    }
}

/// Errors that can occur while updating or querying a persistence filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A new observation must be at least as recent as the last one
    ObservationOutOfOrder {
        /// Timestamp of the rejected observation
        observation_time: f64,
        /// Timestamp of the last incorporated observation
        last_observation_time: f64,
    },

    /// A prediction query must be at least as recent as the last observation
    PredictionOutOfOrder {
        /// Timestamp of the rejected query
        prediction_time: f64,
        /// Timestamp of the last incorporated observation
        last_observation_time: f64,
    },

    /// A probability argument fell outside `[0, 1]`
    ProbabilityOutOfRange {
        /// Which argument was invalid
        name: &'static str,
        /// The offending value
        value: f64,
    },

    /// The injected survival prior rejected an evaluation
    Prior(PriorError),

    /// Log-space arithmetic failed
    LogSpace(LogSpaceError),

    /// Invalid simulation or experiment configuration
    Configuration {
        /// Description of the configuration issue
        description: String,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::ObservationOutOfOrder {
                observation_time,
                last_observation_time,
            } => {
                write!(
                    f,
                    "observation at t = {} predates the last incorporated observation at t = {}",
                    observation_time, last_observation_time
                )
            }
            FilterError::PredictionOutOfOrder {
                prediction_time,
                last_observation_time,
            } => {
                write!(
                    f,
                    "prediction at t = {} predates the last incorporated observation at t = {}",
                    prediction_time, last_observation_time
                )
            }
            FilterError::ProbabilityOutOfRange { name, value } => {
                write!(f, "probability {} must be in [0, 1] (got {})", name, value)
            }
            FilterError::Prior(e) => write!(f, "survival prior failed: {}", e),
            FilterError::LogSpace(e) => write!(f, "log-space arithmetic failed: {}", e),
            FilterError::Configuration { description } => {
                write!(f, "configuration error: {}", description)
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Prior(e) => Some(e),
            FilterError::LogSpace(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PriorError> for FilterError {
    fn from(e: PriorError) -> Self {
        FilterError::Prior(e)
    }
}

impl From<LogSpaceError> for FilterError {
    fn from(e: LogSpaceError) -> Self {
        FilterError::LogSpace(e)
    }
}
