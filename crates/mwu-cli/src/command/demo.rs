use mwu_engine::RunParams;

use crate::util::{self, Output};

const OBJECTS: [u32; 3] = [0, 1, 2];
const FAVORED: u32 = 0;
const DEFAULT_ROUNDS: usize = 10;
const DEFAULT_ETA: f64 = 0.2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    /// Number of rounds
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    rounds: usize,
    /// Learning rate
    #[arg(long, default_value_t = DEFAULT_ETA)]
    eta: f64,
    /// Random seed (drawn from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for DemoArg {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            eta: DEFAULT_ETA,
            seed: None,
        }
    }
}

/// Rewards object `0` with `+1` and every other object with `-1`.
pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let DemoArg { rounds, eta, seed } = *arg;
    let params = RunParams { rounds, eta };
    let (seed, mut rng) = util::seeded_rng(seed);

    eprintln!("Demo: objects {OBJECTS:?}, object {FAVORED} is rewarded");
    eprintln!("  Rounds: {rounds}, eta: {eta}, seed: {seed}");
    let weights = params.run(
        &OBJECTS,
        |object: &u32| *object,
        |outcome: &u32| if *outcome == FAVORED { 1.0 } else { -1.0 },
        &mut rng,
    );

    Output::save_json(&weights, None)
}
