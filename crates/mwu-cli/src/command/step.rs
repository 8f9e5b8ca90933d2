use std::path::PathBuf;

use anyhow::Context as _;
use mwu_engine::{WeightMap, update};

use crate::{
    schema::report::StepReport,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum StepMode {
    /// Reward only the drawn key
    #[default]
    Chosen,
    /// Reward every key against the drawn one
    Global,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StepArg {
    /// Current weights, e.g. `a=1.0,b=1.0`
    #[arg(long)]
    weights: WeightMap<String>,
    /// Update variant (chosen or global)
    #[arg(long, default_value = "chosen")]
    mode: StepMode,
    /// Key that earns the positive reward in `chosen` mode
    #[arg(long)]
    target: Option<String>,
    /// Magnitude of the reward (positive on a match, negative otherwise)
    #[arg(long, default_value_t = 0.1)]
    reward: f64,
    /// Random seed (drawn from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &StepArg) -> anyhow::Result<()> {
    let StepArg {
        weights,
        mode,
        target,
        reward,
        seed,
        output,
    } = arg;
    let score = |matched: bool| if matched { *reward } else { -*reward };

    let (seed, mut rng) = util::seeded_rng(*seed);
    let mut drawn = None;
    let updated = match mode {
        StepMode::Chosen => {
            let target = target
                .as_deref()
                .context("--target is required in `chosen` mode")?;
            update::step(
                |key: &String| {
                    drawn = Some(key.clone());
                    key == target
                },
                |matched: &bool| score(*matched),
                weights,
                &mut rng,
            )
        }
        StepMode::Global => update::step_all(
            |key: &String| {
                drawn = Some(key.clone());
                key.clone()
            },
            |key: &String, outcome: &String| score(key == outcome),
            weights,
            &mut rng,
        ),
    };

    eprintln!("{mode:?} step (seed = {seed})");
    match &drawn {
        Some(key) => eprintln!("  Drawn: {key}"),
        None => eprintln!("  Drawn: none (total weight is zero)"),
    }

    let report = StepReport {
        seed,
        drawn,
        weights: updated,
    };
    Output::save_json(&report, output.clone())
}
