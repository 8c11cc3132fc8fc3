//! The definition of the swap client, which holds the configuration details
//! along with a lower-level handle for the deployed `SimpleTokenSwap`
//! contract

use std::str::FromStr;

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{Address, U256};
use tracing::{debug, instrument};

use crate::{cli::Cli, error::SwapError, quote_client::SwapQuote};

mod contract_interaction;

/// A type alias for the RPC client, an alloy middleware stack that includes
/// a signer derived from a raw private key and a provider connected to the
/// RPC endpoint
pub type SwapProvider = DynProvider;

/// A configuration struct for the swap client: the deployed contract
/// address, an RPC endpoint, and a private key for signing transactions
pub struct SwapClientConfig {
    /// The address of the deployed `SimpleTokenSwap` contract
    pub contract_address: String,
    /// The RPC endpoint used for submissions and reads
    pub rpc_url: String,
    /// The private key of the account to use for signing transactions
    pub private_key: PrivateKeySigner,
}

impl SwapClientConfig {
    /// Create a provider with the configured wallet attached
    async fn get_provider(&self) -> Result<SwapProvider, SwapError> {
        let key = self.private_key.clone();
        let provider = ProviderBuilder::new()
            .wallet(key)
            .connect(&self.rpc_url)
            .await
            .map_err(SwapError::rpc)?;

        Ok(DynProvider::new(provider))
    }

    /// Parse the deployed contract address
    fn get_contract_address(&self) -> Result<Address, SwapError> {
        Address::from_str(&self.contract_address).map_err(SwapError::parse)
    }
}

/// The swap client, which provides a higher-level interface to the deployed
/// contract for the two transactions of the swap workflow.
///
/// Constructed once per run and passed explicitly into the workflow; no
/// module-level state.
pub struct SwapClient {
    /// The address of the deployed contract
    contract_address: Address,
    /// The address of the wallet owner submitting transactions
    owner: Address,
    /// The shared provider used for submissions and reads
    provider: SwapProvider,
}

impl SwapClient {
    /// Creates a new swap client from CLI configuration
    pub async fn new(cli: &Cli) -> Result<Self, SwapError> {
        let private_key =
            PrivateKeySigner::from_str(&cli.private_key).map_err(SwapError::parse)?;
        let owner = private_key.address();

        let config = SwapClientConfig {
            contract_address: cli.deployed_address.clone(),
            rpc_url: cli.rpc_url.clone(),
            private_key,
        };

        let contract_address = config.get_contract_address()?;
        let provider = config.get_provider().await?;

        Ok(Self { contract_address, owner, provider })
    }

    /// The address of the deployed contract
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// The address of the wallet owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fetch the chain id from the connected network
    pub async fn chain_id(&self) -> Result<u64, SwapError> {
        self.provider.get_chain_id().await.map_err(SwapError::rpc)
    }

    /// Build the transaction depositing ETH into the contract
    pub fn build_deposit_tx(&self, value: U256) -> TransactionRequest {
        contract_interaction::build_deposit_tx(self.contract_address, self.owner, value)
    }

    /// Build the transaction filling a quote through the contract
    pub fn build_fill_tx(&self, quote: &SwapQuote) -> TransactionRequest {
        contract_interaction::build_fill_tx(self.contract_address, self.owner, quote)
    }

    /// Extract the bought amount from a fill receipt's logs
    pub fn extract_bought_amount(&self, receipt: &TransactionReceipt) -> Result<U256, SwapError> {
        contract_interaction::extract_bought_amount(self.contract_address, receipt.logs())
    }

    /// Submit a transaction and block until the network reports a terminal
    /// outcome for it.
    ///
    /// The wait is unbounded, limited only by the provider's own defaults.
    /// A transaction is submitted exactly once; a reverted transaction is
    /// never resubmitted, since resubmission without understanding the
    /// revert cause risks repeated fund loss.
    #[instrument(skip_all)]
    pub async fn submit_and_confirm(
        &self,
        tx: TransactionRequest,
    ) -> Result<TransactionReceipt, SwapError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(SwapError::submission_rejected)?;

        let tx_hash = *pending.tx_hash();
        debug!("transaction {tx_hash:#x} pending, awaiting receipt");

        let receipt = pending.get_receipt().await.map_err(SwapError::rpc)?;
        check_receipt_status(receipt)
    }
}

/// Inspect a mined receipt's status flag, mapping a failure status to
/// `ExecutionReverted` carrying the transaction hash.
///
/// The workflow propagates this error immediately, so a reverted deposit is
/// never followed by a quote fetch or a fill.
fn check_receipt_status(receipt: TransactionReceipt) -> Result<TransactionReceipt, SwapError> {
    if !receipt.status() {
        return Err(SwapError::ExecutionReverted { tx_hash: receipt.transaction_hash });
    }

    Ok(receipt)
}
