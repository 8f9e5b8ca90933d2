use clap::{Parser, Subcommand};

use self::{demo::DemoArg, run::RunArg, step::StepArg};

mod demo;
mod run;
mod step;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the three-object demonstration
    Demo(#[clap(flatten)] DemoArg),
    /// Run multi-round updates over Gaussian-payoff arms
    Run(#[clap(flatten)] RunArg),
    /// Apply a single-round update to a weight map
    Step(#[clap(flatten)] StepArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Demo(DemoArg::default())) {
        Mode::Demo(arg) => demo::run(&arg)?,
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Step(arg) => step::run(&arg)?,
    }
    Ok(())
}
