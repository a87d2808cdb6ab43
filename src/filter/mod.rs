//! The persistence filter
//!
//! Recursive Bayesian estimation of the posterior probability that a tracked
//! feature still exists, from a stream of noisy binary detections and an
//! injected survival-time prior.

mod persistence;

pub use persistence::PersistenceFilter;
