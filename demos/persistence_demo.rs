//! Persistence filter walkthrough
//!
//! Reproduces the hand-computed three-observation example from the original
//! persistence filter derivation: a negative detection at t = 1, a positive
//! detection at t = 2, and a negative detection at t = 3, comparing the
//! filter's likelihood, evidence, and posterior against the closed forms at
//! each step.

use clap::Parser;
use persistence_filter::{
    FilterError, GeneralPurposePrior, PersistenceFilter, SurvivalPrior,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Lower bound on the admissible rate parameters
    #[arg(long, default_value_t = 0.01)]
    lambda_l: f64,

    /// Upper bound on the admissible rate parameters
    #[arg(long, default_value_t = 1.0)]
    lambda_u: f64,

    /// Detector missed detection probability
    #[arg(short = 'm', long, default_value_t = 0.2)]
    p_missed: f64,

    /// Detector false alarm probability
    #[arg(short = 'f', long, default_value_t = 0.01)]
    p_false_alarm: f64,
}

fn main() -> Result<(), FilterError> {
    env_logger::init();
    let args = Args::parse();

    let prior = GeneralPurposePrior::new(args.lambda_l, args.lambda_u)?;
    let survival = |t: f64| -> Result<f64, FilterError> { Ok(prior.log_survival(t)?.exp()) };

    let p_m = args.p_missed;
    let p_f = args.p_false_alarm;

    let mut filter = PersistenceFilter::new(prior);

    let (t_1, t_2, t_3) = (1.0, 2.0, 3.0);
    let (s_1, s_2, s_3) = (survival(t_1)?, survival(t_2)?, survival(t_3)?);

    println!("Persistence Filter Walkthrough");
    println!("==============================");
    println!("Prior rates: lambda_l = {}, lambda_u = {}", args.lambda_l, args.lambda_u);
    println!("Detector: P_M = {}, P_F = {}", p_m, p_f);
    println!();

    // FIRST OBSERVATION: y_1 = 0 at t_1 = 1.0
    filter.update(false, t_1, p_m, p_f)?;

    let likelihood_1 = p_m;
    let evidence_1 = p_m * s_1 + (1.0 - p_f) * (1.0 - s_1);
    let posterior_1 = (likelihood_1 / evidence_1) * s_1;

    println!("After y_1 = 0 at t_1 = {}", t_1);
    println!("  likelihood: filter = {:.12}, closed form = {:.12}", filter.likelihood(), likelihood_1);
    println!("  evidence:   filter = {:.12}, closed form = {:.12}", filter.evidence(), evidence_1);
    println!("  posterior:  filter = {:.12}, closed form = {:.12}", filter.predict(t_1)?, posterior_1);
    println!();

    // SECOND OBSERVATION: y_2 = 1 at t_2 = 2.0
    filter.update(true, t_2, p_m, p_f)?;

    let likelihood_2 = p_m * (1.0 - p_m);
    let evidence_2 = p_m * (1.0 - p_m) * s_2
        + p_m * p_f * (s_1 - s_2)
        + (1.0 - p_f) * p_f * (1.0 - s_1);
    let posterior_2 = (likelihood_2 / evidence_2) * s_2;

    println!("After y_2 = 1 at t_2 = {}", t_2);
    println!("  likelihood: filter = {:.12}, closed form = {:.12}", filter.likelihood(), likelihood_2);
    println!("  evidence:   filter = {:.12}, closed form = {:.12}", filter.evidence(), evidence_2);
    println!("  posterior:  filter = {:.12}, closed form = {:.12}", filter.predict(t_2)?, posterior_2);
    println!();

    // THIRD OBSERVATION: y_3 = 0 at t_3 = 3.0
    filter.update(false, t_3, p_m, p_f)?;

    let likelihood_3 = p_m * (1.0 - p_m) * p_m;
    let evidence_3 = p_m * (1.0 - p_m) * p_m * s_3
        + p_m * (1.0 - p_m) * (1.0 - p_f) * (s_2 - s_3)
        + p_m * p_f * (1.0 - p_f) * (s_1 - s_2)
        + (1.0 - p_f) * p_f * (1.0 - p_f) * (1.0 - s_1);
    let posterior_3 = (likelihood_3 / evidence_3) * s_3;

    println!("After y_3 = 0 at t_3 = {}", t_3);
    println!("  likelihood: filter = {:.12}, closed form = {:.12}", filter.likelihood(), likelihood_3);
    println!("  evidence:   filter = {:.12}, closed form = {:.12}", filter.evidence(), evidence_3);
    println!("  posterior:  filter = {:.12}, closed form = {:.12}", filter.predict(t_3)?, posterior_3);

    Ok(())
}
