//! The CLI for the swap filler

use alloy_primitives::Address;
use clap::Parser;

use crate::error::SwapError;

/// Mainnet WETH, the default sell token
const DEFAULT_SELL_TOKEN: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
/// Mainnet DAI, the default buy token
const DEFAULT_BUY_TOKEN: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
/// The default base URL of the 0x Allowance-Holder swap API
const DEFAULT_QUOTE_URL: &str = "https://api.0x.org/swap/allowance-holder";

/// Fill a swap quote through a deployed SimpleTokenSwap contract
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Deployed address of the SimpleTokenSwap contract
    pub deployed_address: String,

    /// Amount of WETH to sell, in whole token units
    #[arg(short = 'a', long, default_value = "0.1")]
    pub sell_amount: String,

    /// The token sold by the contract
    #[arg(long, default_value = DEFAULT_SELL_TOKEN)]
    pub sell_token: String,

    /// The token bought by the contract
    #[arg(long, default_value = DEFAULT_BUY_TOKEN)]
    pub buy_token: String,

    /// The RPC URL for blockchain interaction
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// The private key for signing transactions
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: String,

    /// The base URL of the quoting service
    #[arg(long, default_value = DEFAULT_QUOTE_URL)]
    pub quote_url: String,

    /// The 0x API key to attach to quote requests
    #[arg(long, env = "ZEROEX_API_KEY")]
    pub api_key: Option<String>,
}

impl Cli {
    /// Parse the sell token address
    pub fn sell_token_address(&self) -> Result<Address, SwapError> {
        self.sell_token.parse().map_err(SwapError::parse)
    }

    /// Parse the buy token address
    pub fn buy_token_address(&self) -> Result<Address, SwapError> {
        self.buy_token.parse().map_err(SwapError::parse)
    }
}
