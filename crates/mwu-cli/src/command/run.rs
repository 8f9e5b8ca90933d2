use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use mwu_engine::{RunParams, WeightMap, weights};
use rand::SeedableRng as _;
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg64;
use tracing::info;

use crate::{
    schema::report::{ArmReport, RunReport},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Mean payoff of each arm
    #[arg(long, value_delimiter = ',', default_values_t = [0.2, 0.5, 0.8])]
    arms: Vec<f64>,
    /// Standard deviation of every arm's payoff
    #[arg(long, default_value_t = 0.3)]
    sigma: f64,
    /// Number of rounds (overrides the config file)
    #[arg(long)]
    rounds: Option<usize>,
    /// Learning rate (overrides the config file)
    #[arg(long)]
    eta: Option<f64>,
    /// Run parameters file (JSON format)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed (drawn from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        arms,
        sigma,
        rounds,
        eta,
        config,
        seed,
        output,
    } = arg;

    let mut params = match config {
        Some(path) => util::read_json_file::<RunParams, _>("run config", path)?,
        None => RunParams::default(),
    };
    if let Some(rounds) = rounds {
        params.rounds = *rounds;
    }
    if let Some(eta) = eta {
        params.eta = *eta;
    }

    let payoffs = arms
        .iter()
        .map(|&mean| Normal::new(mean, *sigma))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid payoff distribution (sigma = {sigma})"))?;

    let (seed, mut rng) = util::seeded_rng(*seed);
    let mut payoff_rng = Pcg64::from_rng(&mut rng);
    info!(?params, seed, arms = arms.len(), "resolved run parameters");

    eprintln!(
        "Running {} rounds over {} arms (eta = {}, seed = {seed})",
        params.rounds,
        arms.len(),
        params.eta
    );
    let objects = (0..arms.len()).collect::<Vec<_>>();
    let final_weights = params.run(
        &objects,
        |&arm: &usize| payoffs[arm].sample(&mut payoff_rng),
        |payoff: &f64| payoff.clamp(-1.0, 1.0),
        &mut rng,
    );

    let probabilities = weights::probabilities(&final_weights);
    let weight_map = final_weights
        .iter()
        .copied()
        .enumerate()
        .collect::<WeightMap<_>>();
    let best_arm = weight_map.argmax().map(|(&arm, _)| arm);

    eprintln!("  Arms:");
    for (i, (mean, weight)) in arms.iter().zip(&final_weights).enumerate() {
        let prob = probabilities.as_ref().map_or(0.0, |p| p[i]);
        eprintln!("  {i:2}: mean {mean:.3} => weight {weight:.3e}, p = {prob:.3}");
    }
    match best_arm {
        Some(arm) => eprintln!("  Best arm: {arm} (mean {:.3})", arms[arm]),
        None => eprintln!("  Best arm: none"),
    }

    let report = RunReport {
        params,
        seed,
        ran_at: Utc::now(),
        arms: arms
            .iter()
            .zip(&final_weights)
            .map(|(&mean, &weight)| ArmReport { mean, weight })
            .collect(),
        probabilities,
        best_arm,
    };
    Output::save_json(&report, output.clone())?;

    if let Some(path) = output {
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}
