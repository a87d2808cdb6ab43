//! Integration tests for the persistence filter
//!
//! Verifies the filter against hand-derived closed-form posteriors for a
//! three-observation sequence under the reference two-rate prior, plus the
//! structural properties of the log-space primitives and the evidence
//! decomposition. These serve as the numerical regression suite.

use persistence_filter::{
    log_general_purpose_survival_function, logdiff, logsum, FilterError, GeneralPurposePrior,
    PersistenceFilter, SurvivalPrior,
};

const LAMBDA_L: f64 = 0.01;
const LAMBDA_U: f64 = 1.0;

const P_M: f64 = 0.2;
const P_F: f64 = 0.01;

const TOLERANCE: f64 = 1e-9;

/// Helper: check if two f64 values are approximately equal (relative)
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

/// The reference survival function S_T(t)
fn survival(t: f64) -> f64 {
    log_general_purpose_survival_function(t, LAMBDA_L, LAMBDA_U)
        .unwrap()
        .exp()
}

fn reference_filter() -> PersistenceFilter<GeneralPurposePrior> {
    PersistenceFilter::new(GeneralPurposePrior::new(LAMBDA_L, LAMBDA_U).unwrap())
}

/// Test the filter against the hand-computed closed forms for the sequence
/// y_1 = 0 at t_1 = 1, y_2 = 1 at t_2 = 2, y_3 = 0 at t_3 = 3
#[test]
fn test_three_observation_closed_forms() {
    let mut filter = reference_filter();

    let (t_1, t_2, t_3) = (1.0, 2.0, 3.0);

    // FIRST OBSERVATION: y_1 = 0 at t_1

    filter.update(false, t_1, P_M, P_F).unwrap();

    // p(y_1 = 0 | T >= t_1) = P_M
    let likelihood_1 = P_M;
    // p(y_1 = 0) = P_M * S(t_1) + (1 - P_F) * (1 - S(t_1))
    let evidence_1 = P_M * survival(t_1) + (1.0 - P_F) * (1.0 - survival(t_1));
    let posterior_1 = (likelihood_1 / evidence_1) * survival(t_1);

    assert!(approx_eq(filter.likelihood(), likelihood_1, TOLERANCE));
    assert!(approx_eq(filter.evidence(), evidence_1, TOLERANCE));
    assert!(approx_eq(filter.predict(t_1).unwrap(), posterior_1, TOLERANCE));

    // SECOND OBSERVATION: y_2 = 1 at t_2

    filter.update(true, t_2, P_M, P_F).unwrap();

    // p(y_1 = 0, y_2 = 1 | T >= t_2) = P_M * (1 - P_M)
    let likelihood_2 = P_M * (1.0 - P_M);
    // Marginalizing the vanishing time over (-, t_1), [t_1, t_2), [t_2, +)
    let evidence_2 = P_M * (1.0 - P_M) * survival(t_2)
        + P_M * P_F * (survival(t_1) - survival(t_2))
        + (1.0 - P_F) * P_F * (1.0 - survival(t_1));
    let posterior_2 = (likelihood_2 / evidence_2) * survival(t_2);

    assert!(approx_eq(filter.likelihood(), likelihood_2, TOLERANCE));
    assert!(approx_eq(filter.evidence(), evidence_2, TOLERANCE));
    assert!(approx_eq(filter.predict(t_2).unwrap(), posterior_2, TOLERANCE));

    // THIRD OBSERVATION: y_3 = 0 at t_3

    filter.update(false, t_3, P_M, P_F).unwrap();

    let likelihood_3 = P_M * (1.0 - P_M) * P_M;
    let evidence_3 = P_M * (1.0 - P_M) * P_M * survival(t_3)
        + P_M * (1.0 - P_M) * (1.0 - P_F) * (survival(t_2) - survival(t_3))
        + P_M * P_F * (1.0 - P_F) * (survival(t_1) - survival(t_2))
        + (1.0 - P_F) * P_F * (1.0 - P_F) * (1.0 - survival(t_1));
    let posterior_3 = (likelihood_3 / evidence_3) * survival(t_3);

    assert!(approx_eq(filter.likelihood(), likelihood_3, TOLERANCE));
    assert!(approx_eq(filter.evidence(), evidence_3, TOLERANCE));
    assert!(approx_eq(filter.predict(t_3).unwrap(), posterior_3, TOLERANCE));
}

/// Test that the evidence always decomposes into the lower sum plus the
/// surviving-branch mass
#[test]
fn test_evidence_decomposition() {
    let mut filter = reference_filter();
    let observations = [
        (false, 1.0),
        (true, 2.0),
        (true, 2.0),
        (false, 3.5),
        (true, 10.0),
        (false, 50.0),
    ];

    for (detected, t) in observations {
        filter.update(detected, t, P_M, P_F).unwrap();

        let surviving_branch =
            filter.likelihood() * survival(filter.last_observation_time());
        let recomposed = filter.evidence_lower_sum() + surviving_branch;
        assert!(
            approx_eq(filter.evidence(), recomposed, TOLERANCE),
            "evidence {} != lower sum + surviving branch {}",
            filter.evidence(),
            recomposed
        );
    }
}

/// Test that predictions are probabilities and nonincreasing in query time
#[test]
fn test_predictions_are_monotone_probabilities() {
    let mut filter = reference_filter();
    filter.update(true, 1.0, P_M, P_F).unwrap();
    filter.update(false, 2.0, P_M, P_F).unwrap();

    let mut previous = f64::INFINITY;
    for i in 0..200 {
        let t = 2.0 + i as f64 * 0.5;
        let belief = filter.predict(t).unwrap();
        assert!((0.0..=1.0).contains(&belief), "predict({}) = {}", t, belief);
        assert!(belief <= previous, "belief increased at t = {}", t);
        previous = belief;
    }
}

/// Test that a distant-future prediction underflows to zero, not an error
#[test]
fn test_far_future_prediction_underflows_to_zero() {
    let mut filter = reference_filter();
    filter.update(true, 1.0, P_M, P_F).unwrap();
    let belief = filter.predict(1e9).unwrap();
    assert_eq!(belief, 0.0);
}

/// Test log-space primitive identities
#[test]
fn test_log_arithmetic_identities() {
    let a = -0.75;
    let b = -2.5;

    assert_eq!(logsum(a, b), logsum(b, a));
    assert_eq!(logsum(a, f64::NEG_INFINITY), a);
    assert_eq!(logdiff(a, a).unwrap().exp(), 0.0);
    assert!(matches!(
        logdiff(b, a),
        Err(persistence_filter::LogSpaceError::OrderViolation { .. })
    ));
}

/// Test that a rejected update leaves every accessor unchanged
#[test]
fn test_failed_update_is_atomic() {
    let mut filter = reference_filter();
    filter.update(false, 1.0, P_M, P_F).unwrap();
    filter.update(true, 4.0, P_M, P_F).unwrap();

    let snapshot = (
        filter.initialization_time(),
        filter.last_observation_time(),
        filter.likelihood(),
        filter.evidence(),
        filter.evidence_lower_sum(),
    );

    assert!(matches!(
        filter.update(true, 3.0, P_M, P_F),
        Err(FilterError::ObservationOutOfOrder { .. })
    ));
    assert!(matches!(
        filter.update(true, 5.0, 1.2, P_F),
        Err(FilterError::ProbabilityOutOfRange { .. })
    ));

    let after = (
        filter.initialization_time(),
        filter.last_observation_time(),
        filter.likelihood(),
        filter.evidence(),
        filter.evidence_lower_sum(),
    );
    assert_eq!(snapshot, after);
}

/// Test the reference survival function's boundary and error behavior
#[test]
fn test_general_purpose_survival_function_contract() {
    for (l, u) in [(0.01, 1.0), (0.5, 2.0), (1e-4, 1e2)] {
        assert_eq!(log_general_purpose_survival_function(0.0, l, u).unwrap(), 0.0);
    }

    // Strictly decreasing for t > 0
    let mut previous = 0.0;
    for i in 1..50 {
        let t = i as f64;
        let log_s = log_general_purpose_survival_function(t, LAMBDA_L, LAMBDA_U).unwrap();
        assert!(log_s < previous);
        previous = log_s;
    }

    assert!(log_general_purpose_survival_function(-1.0, LAMBDA_L, LAMBDA_U).is_err());
    assert!(log_general_purpose_survival_function(1.0, 1.0, 0.5).is_err());
    assert!(log_general_purpose_survival_function(1.0, 1.0, 1.0).is_err());
}

/// Test a long sequence of all-negative observations: the belief must decay
/// toward zero without any intermediate NaN or range violation
#[test]
fn test_long_negative_sequence_decays_cleanly() {
    let mut filter = reference_filter();
    for i in 1..=500 {
        filter.update(false, i as f64, P_M, P_F).unwrap();
        let belief = filter.predict(i as f64).unwrap();
        assert!((0.0..=1.0).contains(&belief));
        assert!(!filter.evidence().is_nan());
    }
    assert!(filter.predict(500.0).unwrap() < 1e-6);
}

/// Test that a memoryless closure prior reproduces the textbook posterior
/// for a single observation
#[test]
fn test_single_observation_with_exponential_prior() {
    let rate = 0.1;
    let exponential = move |t: f64| -> Result<f64, persistence_filter::PriorError> {
        if t < 0.0 {
            return Err(persistence_filter::PriorError::NegativeTime { t });
        }
        Ok(-rate * t)
    };

    let mut filter = PersistenceFilter::new(exponential);
    filter.update(false, 2.0, P_M, P_F).unwrap();

    let s = (-rate * 2.0_f64).exp();
    let expected = P_M * s / (P_M * s + (1.0 - P_F) * (1.0 - s));
    assert!(approx_eq(filter.predict(2.0).unwrap(), expected, TOLERANCE));

    // The closure satisfies the same capability contract as the reference prior
    assert_eq!(exponential.log_survival(1.0).unwrap(), -rate);
}
