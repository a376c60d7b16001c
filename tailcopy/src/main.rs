use anyhow::Context;
use clap::Parser;
use log::info;
use tokio::signal;

mod cli;
mod hex;
mod loader;
mod simulate;

use cli::{AttachArgs, Cli, Command};
use loader::AttachedPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Attach(args) => attach(args).await,
        Command::Simulate(args) => {
            let (verdict, frame) = simulate::run(&args);
            println!("verdict: {}", verdict);
            println!("frame:   {}", frame);
            Ok(())
        }
    }
}

async fn attach(args: AttachArgs) -> anyhow::Result<()> {
    loader::bump_memlock_rlimit();

    let mut pipeline = AttachedPipeline::attach(&args)
        .with_context(|| format!("failed to set up pipeline on {}", args.iface))?;

    info!("Waiting for Ctrl-C...");
    signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    pipeline.detach().context("failed to detach pipeline")?;
    info!("Exiting...");

    Ok(())
}
