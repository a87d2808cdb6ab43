//! Recursive Bayesian feature persistence estimation
//!
//! Implements the persistence filter from "Towards Lifelong Feature-Based
//! Mapping in Semi-Static Environments" (Rosen, Mason, Leonard). One filter
//! instance tracks one feature; the posterior marginalizes in closed form
//! over the feature's unknown vanishing time, entirely in log-space.

use log::trace;

use crate::common::logspace::{logdiff, logsum};
use crate::errors::{FilterError, PriorError};
use crate::prior::SurvivalPrior;

/// Online Bayesian estimator of a single feature's persistence.
///
/// Consumes timestamped boolean detector outputs with per-observation missed
/// detection and false alarm probabilities, and produces the posterior
/// probability that the feature still exists at any query time at or after
/// the last observation.
///
/// All state is carried in log-probability space. The lower evidence sum
/// (the probability mass of "the feature had already vanished by the most
/// recent observation") is absent until the first observation is
/// incorporated; its logarithm would otherwise be undefined.
///
/// A filter is a plain value type: no I/O, no locking, all operations O(1).
/// Independent instances may be updated concurrently on separate threads;
/// exclusive access to any single instance is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct PersistenceFilter<P: SurvivalPrior> {
    /// The injected survival-time prior, fixed for the filter's lifetime
    prior: P,

    /// Absolute time at which this filter was created
    init_time: f64,

    /// Time of the last incorporated observation (t_N)
    last_observation_time: f64,

    /// log p(Y_{1:N} | T >= t_N): likelihood of the observations so far,
    /// conditioned on the feature having survived through t_N
    log_likelihood: f64,

    /// log L(Y_{1:N}): the lower evidence sum, absent before the first
    /// observation since L(Y_{1:0}) = 0
    log_lower_evidence_sum: Option<f64>,

    /// log p(Y_{1:N}): the full marginal evidence
    log_evidence: f64,
}

impl<P: SurvivalPrior> PersistenceFilter<P> {
    /// Create a filter initialized at time zero.
    pub fn new(prior: P) -> Self {
        Self::with_initialization_time(prior, 0.0)
    }

    /// Create a filter initialized at an arbitrary absolute time.
    ///
    /// All observation and query times handed to the filter are absolute;
    /// the prior is evaluated on times shifted by `initialization_time`.
    pub fn with_initialization_time(prior: P, initialization_time: f64) -> Self {
        Self {
            prior,
            init_time: initialization_time,
            last_observation_time: initialization_time,
            log_likelihood: 0.0,
            log_lower_evidence_sum: None,
            log_evidence: 0.0,
        }
    }

    /// The survival prior shifted to this filter's time origin.
    fn shifted_log_survival(&self, t: f64) -> Result<f64, PriorError> {
        self.prior.log_survival(t - self.init_time)
    }

    /// Incorporate a new detector output.
    ///
    /// `detected` is the detector's boolean decision at `observation_time`;
    /// `p_missed` and `p_false_alarm` are its missed-detection and
    /// false-alarm probabilities for this observation.
    ///
    /// Fails if `observation_time` predates the last incorporated
    /// observation or if either probability lies outside `[0, 1]`. The
    /// update is all-or-nothing: on any error, no state is mutated.
    pub fn update(
        &mut self,
        detected: bool,
        observation_time: f64,
        p_missed: f64,
        p_false_alarm: f64,
    ) -> Result<(), FilterError> {
        if observation_time < self.last_observation_time {
            return Err(FilterError::ObservationOutOfOrder {
                observation_time,
                last_observation_time: self.last_observation_time,
            });
        }
        if !(0.0..=1.0).contains(&p_missed) {
            return Err(FilterError::ProbabilityOutOfRange {
                name: "p_missed",
                value: p_missed,
            });
        }
        if !(0.0..=1.0).contains(&p_false_alarm) {
            return Err(FilterError::ProbabilityOutOfRange {
                name: "p_false_alarm",
                value: p_false_alarm,
            });
        }

        // Everything fallible is evaluated before any field is touched, so
        // a prior failure cannot leave the filter half-updated.
        let log_survival_at_obs = self.shifted_log_survival(observation_time)?;

        // p(y_N | T < t_N): the observation's likelihood under the
        // "already vanished" hypothesis
        let log_vanished_likelihood = if detected {
            p_false_alarm.ln()
        } else {
            (1.0 - p_false_alarm).ln()
        };

        let new_lower_sum = match self.log_lower_evidence_sum {
            Some(log_lower_sum) => {
                // General recurrence: fold the prior mass assigned to
                // vanishing inside [t_{N-1}, t_N) into the running sum
                let log_prior_mass = logdiff(
                    self.shifted_log_survival(self.last_observation_time)?,
                    log_survival_at_obs,
                )?;
                logsum(log_lower_sum, self.log_likelihood + log_prior_mass)
                    + log_vanished_likelihood
            }
            None => {
                // Base case, first observation:
                //   L(Y_{1:1}) = p(y_1 | T < t_1) * (1 - S_T(t_1)).
                // If exponentiating log S_T(t_1) underflows, log(1 - S_T)
                // is taken as exactly 0, the first-order limit of log(1 - x)
                // for vanishing x.
                let log_one_minus_survival = (-log_survival_at_obs.exp()).ln_1p();
                log_vanished_likelihood + log_one_minus_survival
            }
        };

        self.log_lower_evidence_sum = Some(new_lower_sum);

        // Fold the observation's likelihood under the "still alive at t_N"
        // hypothesis into the running conditional likelihood
        self.log_likelihood += if detected {
            (1.0 - p_missed).ln()
        } else {
            p_missed.ln()
        };

        self.last_observation_time = observation_time;

        // Total evidence: "already vanished" branch plus "still alive" branch
        self.log_evidence = logsum(new_lower_sum, self.log_likelihood + log_survival_at_obs);

        trace!(
            "update: detected = {}, t = {}, log_likelihood = {}, log_evidence = {}",
            detected,
            observation_time,
            self.log_likelihood,
            self.log_evidence
        );

        Ok(())
    }

    /// Posterior probability that the feature still exists at
    /// `prediction_time`.
    ///
    /// Fails if `prediction_time` predates the last incorporated
    /// observation. A pure read: no state is mutated. An extremely negative
    /// posterior exponent underflows to exactly `0.0`, which is the correct
    /// limit, not an error.
    pub fn predict(&self, prediction_time: f64) -> Result<f64, FilterError> {
        if prediction_time < self.last_observation_time {
            return Err(FilterError::PredictionOutOfOrder {
                prediction_time,
                last_observation_time: self.last_observation_time,
            });
        }

        let exponent =
            self.log_likelihood - self.log_evidence + self.shifted_log_survival(prediction_time)?;
        Ok(exponent.exp())
    }

    /// Time of the last incorporated observation.
    #[inline]
    pub fn last_observation_time(&self) -> f64 {
        self.last_observation_time
    }

    /// Absolute time at which this filter was initialized.
    #[inline]
    pub fn initialization_time(&self) -> f64 {
        self.init_time
    }

    /// The likelihood probability `p(Y_{1:N} | T >= t_N)`.
    #[inline]
    pub fn likelihood(&self) -> f64 {
        self.log_likelihood.exp()
    }

    /// The evidence probability `p(Y_{1:N})`.
    #[inline]
    pub fn evidence(&self) -> f64 {
        self.log_evidence.exp()
    }

    /// The lower evidence sum `L(Y_{1:N})`, or `0.0` before the first
    /// observation.
    #[inline]
    pub fn evidence_lower_sum(&self) -> f64 {
        self.log_lower_evidence_sum.map_or(0.0, f64::exp)
    }

    /// The injected survival prior.
    #[inline]
    pub fn prior(&self) -> &P {
        &self.prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prior::GeneralPurposePrior;

    fn reference_prior() -> GeneralPurposePrior {
        GeneralPurposePrior::new(0.01, 1.0).unwrap()
    }

    #[test]
    fn test_fresh_filter_state() {
        let filter = PersistenceFilter::new(reference_prior());
        assert_eq!(filter.initialization_time(), 0.0);
        assert_eq!(filter.last_observation_time(), 0.0);
        assert_eq!(filter.likelihood(), 1.0);
        assert_eq!(filter.evidence(), 1.0);
        assert_eq!(filter.evidence_lower_sum(), 0.0);
    }

    #[test]
    fn test_predict_before_any_observation_is_the_prior() {
        let prior = reference_prior();
        let filter = PersistenceFilter::new(prior);
        let t = 2.0;
        let expected = prior.log_survival(t).unwrap().exp();
        assert_eq!(filter.predict(t).unwrap(), expected);
    }

    #[test]
    fn test_initialization_time_shifts_the_prior() {
        let prior = reference_prior();
        let shifted = PersistenceFilter::with_initialization_time(prior, 10.0);
        let unshifted = PersistenceFilter::new(prior);
        assert_eq!(
            shifted.predict(12.0).unwrap(),
            unshifted.predict(2.0).unwrap()
        );
    }

    #[test]
    fn test_update_transitions_lower_evidence_sum_once() {
        let mut filter = PersistenceFilter::new(reference_prior());
        assert_eq!(filter.evidence_lower_sum(), 0.0);
        filter.update(false, 1.0, 0.2, 0.01).unwrap();
        assert!(filter.evidence_lower_sum() > 0.0);
    }

    #[test]
    fn test_out_of_order_update_leaves_state_unchanged() {
        let mut filter = PersistenceFilter::new(reference_prior());
        filter.update(true, 2.0, 0.2, 0.01).unwrap();

        let snapshot = (
            filter.last_observation_time(),
            filter.likelihood(),
            filter.evidence(),
            filter.evidence_lower_sum(),
        );

        let err = filter.update(true, 1.0, 0.2, 0.01).unwrap_err();
        assert!(matches!(err, FilterError::ObservationOutOfOrder { .. }));

        assert_eq!(
            snapshot,
            (
                filter.last_observation_time(),
                filter.likelihood(),
                filter.evidence(),
                filter.evidence_lower_sum(),
            )
        );
    }

    #[test]
    fn test_invalid_probabilities_are_rejected() {
        let mut filter = PersistenceFilter::new(reference_prior());
        assert!(matches!(
            filter.update(true, 1.0, -0.1, 0.01),
            Err(FilterError::ProbabilityOutOfRange {
                name: "p_missed",
                ..
            })
        ));
        assert!(matches!(
            filter.update(true, 1.0, 0.2, 1.5),
            Err(FilterError::ProbabilityOutOfRange {
                name: "p_false_alarm",
                ..
            })
        ));
        // Rejected updates must not initialize the lower evidence sum
        assert_eq!(filter.evidence_lower_sum(), 0.0);
    }

    #[test]
    fn test_out_of_order_prediction_is_rejected() {
        let mut filter = PersistenceFilter::new(reference_prior());
        filter.update(true, 5.0, 0.2, 0.01).unwrap();
        assert!(matches!(
            filter.predict(4.0),
            Err(FilterError::PredictionOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_zero_false_alarm_rate_with_detection() {
        // P_F = 0 and a positive detection pins the "already vanished"
        // hypothesis to zero mass; everything must stay NaN-free
        let mut filter = PersistenceFilter::new(reference_prior());
        filter.update(true, 1.0, 0.2, 0.0).unwrap();
        assert_eq!(filter.evidence_lower_sum(), 0.0);
        assert!(!filter.evidence().is_nan());
        let posterior = filter.predict(1.0).unwrap();
        assert!((0.0..=1.0).contains(&posterior));
        // With no false alarms possible, a detection proves existence
        assert!((posterior - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_observation_time_is_allowed() {
        let mut filter = PersistenceFilter::new(reference_prior());
        filter.update(true, 1.0, 0.2, 0.01).unwrap();
        filter.update(true, 1.0, 0.2, 0.01).unwrap();
        assert_eq!(filter.last_observation_time(), 1.0);
    }

    #[test]
    fn test_closure_prior_drives_the_filter() {
        let exponential = |t: f64| -> Result<f64, PriorError> {
            if t < 0.0 {
                return Err(PriorError::NegativeTime { t });
            }
            Ok(-0.1 * t)
        };
        let mut filter = PersistenceFilter::new(exponential);
        filter.update(false, 1.0, 0.2, 0.01).unwrap();
        let belief = filter.predict(2.0).unwrap();
        assert!((0.0..=1.0).contains(&belief));
    }
}
