//! Paygate command line.

mod cli;
mod config;
mod demo;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    cli::run().await
}
