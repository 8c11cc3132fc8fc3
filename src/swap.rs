//! The swap workflow: deposit collateral into the contract, fetch a quote
//! for the deposited amount, fill the quote through the contract, and
//! extract the bought amount from the fill receipt.
//!
//! The workflow is strictly sequential: the fill transaction is never
//! constructed before the deposit's terminal state is known, since it spends
//! the funds the deposit makes available. Every failure is fatal to the run;
//! no step is retried and no compensating action is attempted, since
//! on-chain transactions are not locally revocable.

use alloy_primitives::{Address, U256};
use tracing::{info, instrument};

use crate::{
    error::SwapError,
    helpers::ether_to_wei,
    quote_client::{TradeParams, ZeroExClient},
    swap_client::SwapClient,
};

/// The terminal artifact of a successful swap run
#[derive(Debug, Clone, Copy)]
pub struct SwapResult {
    /// The amount of the buy token received by the contract, in base units
    pub bought_amount: U256,
}

/// Run a single end-to-end swap of `sell_amount` (in whole token units)
/// through the deployed contract.
#[instrument(skip_all, fields(sell_amount = %sell_amount))]
pub async fn run_swap(
    swap_client: &SwapClient,
    quote_client: &ZeroExClient,
    sell_token: Address,
    buy_token: Address,
    sell_amount: &str,
) -> Result<SwapResult, SwapError> {
    let sell_amount_wei = ether_to_wei(sell_amount)?;
    if sell_amount_wei.is_zero() {
        return Err(SwapError::parse("sell amount must be greater than zero"));
    }

    let chain_id = swap_client.chain_id().await?;
    let owner = swap_client.owner();
    let contract = swap_client.contract_address();

    // Deposit ETH into the contract; it wraps to WETH on the fly. A failure
    // here aborts the run with the funds still in the wallet.
    info!("Depositing {sell_amount} ETH (WETH) into the contract at {contract:#x}...");
    let deposit_tx = swap_client.build_deposit_tx(sell_amount_wei);
    swap_client.submit_and_confirm(deposit_tx).await?;

    // Quote a sale of the WETH the contract now holds
    info!("Fetching swap quote to sell {sell_amount} of {sell_token:#x}...");
    let params = TradeParams {
        chain_id,
        sell_token,
        buy_token,
        sell_amount: sell_amount_wei,
        taker: owner,
    };
    let quote = quote_client.fetch_quote(&params).await?;
    info!("Received a quote selling {}", quote.sell_amount);

    // Have the contract fill the quote with its own WETH. A failure here
    // leaves the deposited funds in the contract, under its own recovery
    // logic.
    info!("Filling the quote through the contract at {contract:#x}...");
    let fill_tx = swap_client.build_fill_tx(&quote);
    let receipt = swap_client.submit_and_confirm(fill_tx).await?;

    let bought_amount = swap_client.extract_bought_amount(&receipt)?;
    Ok(SwapResult { bought_amount })
}
