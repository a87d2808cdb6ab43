//! Low-level numeric utilities
//!
//! Log-space arithmetic and the exponential-integral special function. These
//! have no dependency on the filter itself and are reusable on their own.

pub mod expint;
pub mod logspace;

pub use expint::exp1;
pub use logspace::{logdiff, logsum};
