//! Simulation and evaluation utilities
//!
//! Tools for benchmarking persistence estimators on synthetic surveillance
//! scenarios: sampling feature observation times from a bursty revisitation
//! process, generating noisy detections for a known ground-truth survival
//! time, running a filter over an observation sequence, and scoring belief
//! traces against ground truth.

use log::{debug, trace};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Exp, Geometric};
use serde::Serialize;

use crate::errors::FilterError;
use crate::filter::PersistenceFilter;
use crate::prior::SurvivalPrior;

fn configuration_error(description: impl Into<String>) -> FilterError {
    FilterError::Configuration {
        description: description.into(),
    }
}

/// Bursty Markov revisitation process for feature observation times.
///
/// Simulates a patrolling robot that revisits a feature's location at
/// exponentially distributed intervals and, during each visit, reobserves
/// the feature a geometrically distributed number of times with
/// exponentially distributed gaps.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RevisitSchedule {
    /// Rate of the exponentially distributed inter-visit intervals
    revisit_rate: f64,
    /// Rate of the exponentially distributed gaps between reobservations
    /// within a single visit
    observation_rate: f64,
    /// Probability of leaving after each reobservation; the expected number
    /// of reobservations per visit is its reciprocal
    departure_probability: f64,
}

impl RevisitSchedule {
    /// Create a schedule. Both rates must be positive and the departure
    /// probability must lie in `(0, 1]`.
    pub fn new(
        revisit_rate: f64,
        observation_rate: f64,
        departure_probability: f64,
    ) -> Result<Self, FilterError> {
        if !(revisit_rate > 0.0) {
            return Err(configuration_error(format!(
                "revisit rate must be positive (got {})",
                revisit_rate
            )));
        }
        if !(observation_rate > 0.0) {
            return Err(configuration_error(format!(
                "observation rate must be positive (got {})",
                observation_rate
            )));
        }
        if !(departure_probability > 0.0 && departure_probability <= 1.0) {
            return Err(configuration_error(format!(
                "departure probability must be in (0, 1] (got {})",
                departure_probability
            )));
        }

        Ok(Self {
            revisit_rate,
            observation_rate,
            departure_probability,
        })
    }

    /// Sample a strictly increasing sequence of observation times covering
    /// `[0, simulation_length]`.
    pub fn sample_observation_times<R: Rng>(
        &self,
        rng: &mut R,
        simulation_length: f64,
    ) -> Result<Vec<f64>, FilterError> {
        let inter_observation = Exp::new(self.observation_rate)
            .map_err(|e| configuration_error(format!("observation gap distribution: {}", e)))?;
        let inter_visit = Exp::new(self.revisit_rate)
            .map_err(|e| configuration_error(format!("revisit gap distribution: {}", e)))?;
        let reobservations = Geometric::new(self.departure_probability)
            .map_err(|e| configuration_error(format!("reobservation count distribution: {}", e)))?;

        let mut times = Vec::new();
        let mut current_time = 0.0;

        while current_time < simulation_length {
            // Geometric samples count failures before the first success; the
            // number of observations per visit is at least one
            let count = reobservations.sample(rng) + 1;

            let mut t = current_time;
            for _ in 0..count {
                t += inter_observation.sample(rng);
                times.push(t);
            }
            trace!("visit at t = {}: {} observations", current_time, count);

            current_time = t + inter_visit.sample(rng);
        }

        times.retain(|&t| t <= simulation_length);
        debug!(
            "sampled {} observation times over [0, {}]",
            times.len(),
            simulation_length
        );
        Ok(times)
    }
}

/// Detector error model: missed detection and false alarm rates.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DetectorModel {
    p_missed: f64,
    p_false_alarm: f64,
}

impl DetectorModel {
    /// Create a detector model. Both probabilities must lie in `[0, 1]`.
    pub fn new(p_missed: f64, p_false_alarm: f64) -> Result<Self, FilterError> {
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
        Ok(Self {
            p_missed,
            p_false_alarm,
        })
    }

    /// Missed detection probability
    #[inline]
    pub fn p_missed(&self) -> f64 {
        self.p_missed
    }

    /// False alarm probability
    #[inline]
    pub fn p_false_alarm(&self) -> f64 {
        self.p_false_alarm
    }

    /// Sample boolean detector outputs at the given observation times, for a
    /// feature that vanishes at `survival_time`.
    ///
    /// While the feature persists, the detector fires with probability
    /// `1 - p_missed`; afterwards it fires with probability `p_false_alarm`.
    pub fn sample_observations<R: Rng>(
        &self,
        rng: &mut R,
        survival_time: f64,
        observation_times: &[f64],
    ) -> Result<Vec<bool>, FilterError> {
        let detection = Bernoulli::new(1.0 - self.p_missed)
            .map_err(|e| configuration_error(format!("detection distribution: {}", e)))?;
        let false_alarm = Bernoulli::new(self.p_false_alarm)
            .map_err(|e| configuration_error(format!("false alarm distribution: {}", e)))?;

        Ok(observation_times
            .iter()
            .map(|&t| {
                if t <= survival_time {
                    detection.sample(rng)
                } else {
                    false_alarm.sample(rng)
                }
            })
            .collect())
    }
}

/// Run a persistence filter over a timestamped observation sequence and
/// record its belief at each query time.
///
/// Both `observations` (pairs of detector output and timestamp) and
/// `query_times` must be sorted in nondecreasing time order. Query times
/// that precede the first observation see the prior belief. Returns one
/// posterior per query time.
pub fn run_filter<P: SurvivalPrior>(
    prior: P,
    observations: &[(bool, f64)],
    detector: &DetectorModel,
    query_times: &[f64],
    init_time: f64,
) -> Result<Vec<f64>, FilterError> {
    let mut filter = PersistenceFilter::with_initialization_time(prior, init_time);
    let mut beliefs = Vec::with_capacity(query_times.len());
    let mut next_query = 0;

    for &(detected, t) in observations {
        while next_query < query_times.len() && query_times[next_query] < t {
            beliefs.push(filter.predict(query_times[next_query])?);
            next_query += 1;
        }
        filter.update(detected, t, detector.p_missed(), detector.p_false_alarm())?;
    }

    while next_query < query_times.len() {
        beliefs.push(filter.predict(query_times[next_query])?);
        next_query += 1;
    }

    debug!(
        "filter run: {} observations, {} queries",
        observations.len(),
        query_times.len()
    );
    Ok(beliefs)
}

/// Baseline estimator that simply repeats the most recent observation.
///
/// Query times preceding the first observation report `1.0` (the feature is
/// assumed present until seen otherwise). Inputs must be sorted in
/// nondecreasing time order.
pub fn empirical_estimator(observations: &[(bool, f64)], query_times: &[f64]) -> Vec<f64> {
    let mut beliefs = Vec::with_capacity(query_times.len());
    let mut next_query = 0;
    let mut current = 1.0;

    for &(detected, t) in observations {
        while next_query < query_times.len() && query_times[next_query] < t {
            beliefs.push(current);
            next_query += 1;
        }
        current = if detected { 1.0 } else { 0.0 };
    }

    while next_query < query_times.len() {
        beliefs.push(current);
        next_query += 1;
    }

    beliefs
}

/// Empirical L1 error between a belief trace and the ground-truth state,
/// integrated over the query grid with the trapezoid rule.
pub fn l1_error(ground_truth: &[f64], belief: &[f64], query_times: &[f64]) -> f64 {
    debug_assert_eq!(ground_truth.len(), belief.len());
    debug_assert_eq!(ground_truth.len(), query_times.len());

    let mut total = 0.0;
    for i in 1..query_times.len() {
        let left = (ground_truth[i - 1] - belief[i - 1]).abs();
        let right = (ground_truth[i] - belief[i]).abs();
        total += 0.5 * (left + right) * (query_times[i] - query_times[i - 1]);
    }
    total
}

/// Mean absolute error between a belief trace and the ground-truth state
/// over the query grid.
pub fn mean_absolute_error(ground_truth: &[f64], belief: &[f64], query_times: &[f64]) -> f64 {
    let span = query_times[query_times.len() - 1] - query_times[0];
    l1_error(ground_truth, belief, query_times) / span
}

/// Precision and recall of the ABSENT classification.
///
/// Given ground-truth presence states and predicted presence states, scores
/// how well predicted absences line up with true absences. Either side is
/// `None` when its denominator is empty (no predicted absences for
/// precision, no true absences for recall).
pub fn absence_precision_recall(
    ground_truth_present: &[bool],
    predicted_present: &[bool],
) -> (Option<f64>, Option<f64>) {
    debug_assert_eq!(ground_truth_present.len(), predicted_present.len());

    let mut predicted_absences = 0usize;
    let mut true_absences = 0usize;
    let mut correct_absences = 0usize;

    for (&truth, &predicted) in ground_truth_present.iter().zip(predicted_present) {
        if !predicted {
            predicted_absences += 1;
        }
        if !truth {
            true_absences += 1;
        }
        if !predicted && !truth {
            correct_absences += 1;
        }
    }

    let precision = if predicted_absences > 0 {
        Some(correct_absences as f64 / predicted_absences as f64)
    } else {
        None
    };
    let recall = if true_absences > 0 {
        Some(correct_absences as f64 / true_absences as f64)
    } else {
        None
    };

    (precision, recall)
}
