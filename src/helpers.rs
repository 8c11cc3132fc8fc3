//! Helpers for the swap filler

use alloy_primitives::{
    utils::{format_units, parse_ether},
    U256,
};
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::SwapError;

/// The number of decimals used by ETH / WETH amounts
const ETHER_DECIMALS: u8 = 18;

// --------------------
// | Unit Conversions |
// --------------------

/// Convert a human-denominated ETH amount (e.g. "0.1") into wei
pub fn ether_to_wei(amount: &str) -> Result<U256, SwapError> {
    parse_ether(amount).map_err(SwapError::parse)
}

/// Convert a wei amount into a human-denominated ETH amount.
///
/// Returns a decimal string rather than a float so the full 18-decimal
/// precision survives the conversion.
pub fn wei_to_ether(amount: U256) -> Result<String, SwapError> {
    let formatted = format_units(amount, ETHER_DECIMALS).map_err(SwapError::parse)?;
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    Ok(trimmed.to_string())
}

// --------
// | HTTP |
// --------

/// Deserialize an HTTP response body, surfacing the status and body text on a
/// non-success status
pub async fn handle_http_response<T: DeserializeOwned>(resp: Response) -> Result<T, SwapError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SwapError::quote_unavailable(format!("{status}: {body}")));
    }

    resp.json::<T>().await.map_err(SwapError::quote_malformed)
}
