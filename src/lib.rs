/*!
# persistence-filter - Bayesian feature persistence estimation

Rust implementation of the persistence filter for computing Bayesian beliefs
over the temporal persistence of features in semi-static environments, as
described in "Towards Lifelong Feature-Based Mapping in Semi-Static
Environments" (Rosen, Mason, Leonard).

## Features

- Exact recursive posterior over a feature's continued existence, computed
  from a stream of noisy binary detections
- Numerically stable log-space arithmetic (`logsum` / `logdiff`)
- General-purpose two-rate survival-time prior with asymptotic safeguards
  for the exponential-integral underflow regime
- Pluggable survival priors through the [`SurvivalPrior`] trait
- Simulation and evaluation utilities for benchmarking estimators

## Modules

- [`filter`] - The recursive persistence filter
- [`prior`] - Survival-time priors and the `SurvivalPrior` capability trait
- [`common`] - Log-space arithmetic and the exponential integral
- [`simulate`] - Scenario sampling, baselines, and scoring
- [`errors`] - Domain error types

## Example

```rust
use persistence_filter::{FilterError, GeneralPurposePrior, PersistenceFilter};

// Two-rate survival prior with admissible rates in [0.01, 1]
let prior = GeneralPurposePrior::new(0.01, 1.0)?;

// One filter per tracked feature; detector has a 20% missed detection
// rate and a 1% false alarm rate
let mut filter = PersistenceFilter::new(prior);
filter.update(true, 1.0, 0.2, 0.01)?;
filter.update(false, 2.5, 0.2, 0.01)?;

// Posterior belief that the feature still exists at a later query time
let belief = filter.predict(3.0)?;
assert!((0.0..=1.0).contains(&belief));
# Ok::<(), FilterError>(())
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Low-level numerics: log-space arithmetic and the exponential integral
pub mod common;

/// Domain error types
pub mod errors;

/// The recursive persistence filter
pub mod filter;

/// Survival-time priors
pub mod prior;

/// Simulation and evaluation utilities
pub mod simulate;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use filter::PersistenceFilter;
pub use prior::{log_general_purpose_survival_function, GeneralPurposePrior, SurvivalPrior};

// Numeric primitives
pub use common::{logdiff, logsum};

// Errors
pub use errors::{FilterError, LogSpaceError, PriorError};

// Simulation
pub use simulate::{DetectorModel, RevisitSchedule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
