//! Entrypoint for the swap filler, a CLI that fills a WETH->DAI swap quote
//! through a deployed SimpleTokenSwap contract

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::needless_pass_by_ref_mut)]
#![deny(unsafe_code)]
#![deny(clippy::uninlined_format_args)]

use clap::Parser;
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{
    cli::Cli, error::SwapError, helpers::wei_to_ether, quote_client::ZeroExClient,
    swap::run_swap, swap_client::SwapClient,
};

mod abis;
mod cli;
mod error;
mod helpers;
mod quote_client;
mod swap;
mod swap_client;

/// Main entrypoint for the swap filler
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging();

    if let Err(e) = run(&cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Run a single swap from the CLI configuration
async fn run(cli: &Cli) -> Result<(), SwapError> {
    let sell_token = cli.sell_token_address()?;
    let buy_token = cli.buy_token_address()?;

    let swap_client = SwapClient::new(cli).await?;
    let quote_client = ZeroExClient::new(cli.quote_url.clone(), cli.api_key.clone());

    let result = run_swap(&swap_client, &quote_client, sell_token, buy_token, &cli.sell_amount)
        .await?;

    let bought = wei_to_ether(result.bought_amount)?;
    info!(
        "Successfully sold {} of {sell_token:#x} for {bought} of {buy_token:#x}!",
        cli.sell_amount
    );
    Ok(())
}

/// Configure the logging subscriber
fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy(),
        )
        .with(fmt::layer())
        .init();
}
