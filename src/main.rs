use anyhow::Context;
use clap::Parser;
use indec_ipv::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("indec-ipv run failed")
}
