//! Client for fetching swap quotes from the 0x Allowance-Holder swap API.
//!
//! The API returns the exact calldata needed to execute the trade; the
//! response is parsed strictly so that a missing required field aborts the
//! run rather than silently defaulting.

use alloy_primitives::{Address, Bytes, U256};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{error::SwapError, helpers::handle_http_response};

/// The 0x api key header
const API_KEY_HEADER: &str = "0x-api-key";

/// The quote endpoint
const QUOTE_ENDPOINT: &str = "quote";

// ---------
// | Types |
// ---------

/// The parameters of the requested trade, serialized into the quote query
/// string. Built once per run, before any network activity.
#[derive(Debug, Clone)]
pub struct TradeParams {
    /// The id of the chain on which the trade executes
    pub chain_id: u64,
    /// The token being sold
    pub sell_token: Address,
    /// The token being bought
    pub buy_token: Address,
    /// The amount of the sell token, in base units
    pub sell_amount: U256,
    /// The address on whose behalf the quote is priced
    pub taker: Address,
}

impl TradeParams {
    /// Serialize the trade parameters into query parameters
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chainId", self.chain_id.to_string()),
            ("sellToken", self.sell_token.to_string()),
            ("buyToken", self.buy_token.to_string()),
            ("sellAmount", self.sell_amount.to_string()),
            ("taker", self.taker.to_string()),
        ]
    }
}

/// Transaction details from the quote response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    /// Destination contract address for the fill
    to: Option<String>,
    /// Hex-encoded calldata executing the fill
    data: Option<String>,
}

/// The allowance issue reported by the quote response, present when the
/// taker must grant an allowance before the fill
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAllowanceIssue {
    /// The address that must be approved to spend the sell token
    spender: String,
}

/// Potential blockers reported alongside the quote
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssues {
    /// The allowance issue, if any
    #[serde(default)]
    allowance: Option<RawAllowanceIssue>,
}

/// Raw quote response structure from the 0x API.
///
/// Only `transaction.to`, `transaction.data` and `issues.allowance` are
/// modeled as optional; every other field is required and its absence fails
/// deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuoteResponse {
    /// The token being sold
    sell_token: String,
    /// The token being bought
    buy_token: String,
    /// The amount of tokens being sold, in base units
    sell_amount: String,
    /// The transaction executing the fill
    transaction: Option<RawTransaction>,
    /// The amount of native token to attach to the fill, in wei
    value: String,
    /// The gas price at which the quote was priced, in wei
    gas_price: String,
    /// Potential blockers reported alongside the quote
    #[serde(default)]
    issues: Option<RawIssues>,
}

impl RawQuoteResponse {
    /// Get the token being sold
    fn get_sell_token(&self) -> Result<Address, SwapError> {
        self.sell_token.parse().map_err(SwapError::quote_malformed)
    }

    /// Get the token being bought
    fn get_buy_token(&self) -> Result<Address, SwapError> {
        self.buy_token.parse().map_err(SwapError::quote_malformed)
    }

    /// Get the amount of tokens being sold
    fn get_sell_amount(&self) -> Result<U256, SwapError> {
        U256::from_str_radix(&self.sell_amount, 10).map_err(SwapError::quote_malformed)
    }

    /// Get the address of the swap contract that will be called
    fn get_to_address(&self) -> Result<Address, SwapError> {
        self.transaction
            .as_ref()
            .ok_or(SwapError::quote_malformed("missing transaction"))?
            .to
            .as_ref()
            .ok_or(SwapError::quote_malformed("missing transaction.to"))?
            .parse()
            .map_err(SwapError::quote_malformed)
    }

    /// Get the calldata for the fill
    fn get_data(&self) -> Result<Bytes, SwapError> {
        let data = self
            .transaction
            .as_ref()
            .ok_or(SwapError::quote_malformed("missing transaction"))?
            .data
            .as_ref()
            .ok_or(SwapError::quote_malformed("missing transaction.data"))?;

        data.parse().map_err(SwapError::quote_malformed)
    }

    /// Get the value of the fill transaction
    fn get_value(&self) -> Result<U256, SwapError> {
        U256::from_str_radix(&self.value, 10).map_err(SwapError::quote_malformed)
    }

    /// Get the gas price at which the quote was priced
    fn get_gas_price(&self) -> Result<u128, SwapError> {
        self.gas_price.parse().map_err(SwapError::quote_malformed)
    }

    /// Get the allowance spender, falling back to the zero-address sentinel
    /// when the quote reports no allowance issue. The sentinel tells the
    /// contract that no allowance-setting step is required before the fill.
    fn get_allowance_spender(&self) -> Result<Address, SwapError> {
        match self.issues.as_ref().and_then(|issues| issues.allowance.as_ref()) {
            Some(allowance) => allowance.spender.parse().map_err(SwapError::quote_malformed),
            None => Ok(Address::ZERO),
        }
    }
}

/// A typed, validated swap quote.
///
/// Created once per run; a quote is never refreshed or retried, since prices
/// are time-sensitive and a stale quote is unsafe to reuse silently.
#[derive(Debug, Clone)]
pub struct SwapQuote {
    /// The token being sold
    pub sell_token: Address,
    /// The token being bought
    pub buy_token: Address,
    /// The amount of tokens being sold, in base units
    pub sell_amount: U256,
    /// The contract to call to execute the fill
    pub to: Address,
    /// The calldata executing the fill
    pub data: Bytes,
    /// The amount of native token to attach to the fill, in wei
    pub value: U256,
    /// The gas price at which the quote was priced, in wei
    pub gas_price: u128,
    /// The address that must be approved to spend the sell token, or the
    /// zero address when no allowance step is required
    pub allowance_spender: Address,
}

impl SwapQuote {
    /// Convert a raw quote response into a validated quote
    fn from_raw(raw: RawQuoteResponse) -> Result<Self, SwapError> {
        let sell_token = raw.get_sell_token()?;
        let buy_token = raw.get_buy_token()?;
        let sell_amount = raw.get_sell_amount()?;
        let to = raw.get_to_address()?;
        let data = raw.get_data()?;
        let value = raw.get_value()?;
        let gas_price = raw.get_gas_price()?;
        let allowance_spender = raw.get_allowance_spender()?;

        Ok(Self { sell_token, buy_token, sell_amount, to, data, value, gas_price, allowance_spender })
    }
}

// ----------
// | Client |
// ----------

/// A client for the 0x swap API
#[derive(Clone)]
pub struct ZeroExClient {
    /// The API key to use for requests
    api_key: Option<String>,
    /// The base URL for the quote API
    base_url: String,
    /// The underlying HTTP client
    http_client: Client,
}

impl ZeroExClient {
    /// Create a new client
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self { api_key, base_url, http_client: Client::new() }
    }

    /// Get a full URL for a given endpoint
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, SwapError> {
        let url = if !endpoint.starts_with('/') {
            format!("{}/{}", self.base_url, endpoint)
        } else {
            format!("{}{}", self.base_url, endpoint)
        };

        Url::parse_with_params(&url, params).map_err(SwapError::parse)
    }

    /// Send a get request to the quoting service
    async fn send_get_request<T: for<'de> Deserialize<'de>>(
        &self,
        url: Url,
    ) -> Result<T, SwapError> {
        let mut request = self.http_client.get(url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key.as_str());
        }

        let response = request.send().await?;
        handle_http_response(response).await
    }

    /// Fetch a quote for the given trade parameters.
    ///
    /// A single attempt: a failed or malformed quote is terminal for the run.
    #[instrument(skip_all)]
    pub async fn fetch_quote(&self, params: &TradeParams) -> Result<SwapQuote, SwapError> {
        let query = params.to_query_params();
        let url = self.build_url(QUOTE_ENDPOINT, &query)?;

        info!("Fetching quote {url}...");
        let raw: RawQuoteResponse = self.send_get_request(url).await?;

        SwapQuote::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mainnet WETH
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    /// Mainnet DAI
    const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
    /// A fill target address
    const FILL_TARGET: &str = "0xDef1C0ded9bec7F1a1670819833240f027b25EfF";

    fn full_quote_json() -> String {
        format!(
            r#"{{
                "sellToken": "{WETH}",
                "buyToken": "{DAI}",
                "sellAmount": "100000000000000000",
                "transaction": {{ "to": "{FILL_TARGET}", "data": "0xabcdef" }},
                "value": "0",
                "gasPrice": "1000000000"
            }}"#
        )
    }

    #[test]
    fn test_parse_full_quote() {
        let raw: RawQuoteResponse = serde_json::from_str(&full_quote_json()).unwrap();
        let quote = SwapQuote::from_raw(raw).unwrap();

        assert_eq!(quote.sell_token, WETH.parse::<Address>().unwrap());
        assert_eq!(quote.buy_token, DAI.parse::<Address>().unwrap());
        assert_eq!(quote.sell_amount, U256::from(100_000_000_000_000_000u128));
        assert_eq!(quote.to, FILL_TARGET.parse::<Address>().unwrap());
        assert_eq!(quote.data, Bytes::from(vec![0xab, 0xcd, 0xef]));
        assert_eq!(quote.value, U256::ZERO);
        assert_eq!(quote.gas_price, 1_000_000_000u128);
    }

    #[test]
    fn test_missing_issues_defaults_spender_to_zero() {
        let raw: RawQuoteResponse = serde_json::from_str(&full_quote_json()).unwrap();
        let quote = SwapQuote::from_raw(raw).unwrap();
        assert_eq!(quote.allowance_spender, Address::ZERO);
    }

    #[test]
    fn test_missing_allowance_defaults_spender_to_zero() {
        let json = full_quote_json().replace(
            r#""value": "0","#,
            r#""value": "0", "issues": {},"#,
        );
        let raw: RawQuoteResponse = serde_json::from_str(&json).unwrap();
        let quote = SwapQuote::from_raw(raw).unwrap();
        assert_eq!(quote.allowance_spender, Address::ZERO);
    }

    #[test]
    fn test_allowance_spender_copied_from_issues() {
        let issues = format!(r#""issues": {{ "allowance": {{ "spender": "{FILL_TARGET}" }} }},"#);
        let json = full_quote_json().replace(r#""value": "0","#, &format!(r#""value": "0", {issues}"#));
        let raw: RawQuoteResponse = serde_json::from_str(&json).unwrap();
        let quote = SwapQuote::from_raw(raw).unwrap();
        assert_eq!(quote.allowance_spender, FILL_TARGET.parse::<Address>().unwrap());
    }

    #[test]
    fn test_missing_transaction_to_is_malformed() {
        let json =
            full_quote_json().replace(&format!(r#""to": "{FILL_TARGET}", "#), "");
        let raw: RawQuoteResponse = serde_json::from_str(&json).unwrap();
        let err = SwapQuote::from_raw(raw).unwrap_err();
        assert!(matches!(err, SwapError::QuoteMalformed(_)));
    }

    #[test]
    fn test_missing_transaction_is_malformed() {
        let json = full_quote_json()
            .replace(&format!(r#""transaction": {{ "to": "{FILL_TARGET}", "data": "0xabcdef" }},"#), "");
        let raw: RawQuoteResponse = serde_json::from_str(&json).unwrap();
        let err = SwapQuote::from_raw(raw).unwrap_err();
        assert!(matches!(err, SwapError::QuoteMalformed(_)));
    }

    #[test]
    fn test_missing_gas_price_fails_deserialization() {
        let json = full_quote_json().replace(r#""gasPrice": "1000000000""#, r#""gasPrice2": "1""#);
        assert!(serde_json::from_str::<RawQuoteResponse>(&json).is_err());
    }
}
