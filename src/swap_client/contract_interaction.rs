//! Helpers for building the contract transactions of the swap workflow and
//! decoding their receipts

use alloy::{
    network::TransactionBuilder,
    rpc::types::{Log, TransactionRequest},
};
use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolEvent};

use crate::{
    abis::SimpleTokenSwap::{depositETHCall, fillQuoteCall, BoughtTokens},
    error::SwapError,
    quote_client::SwapQuote,
};

/// Build the transaction invoking the contract's `depositETH` entry point.
///
/// The contract accepts ETH and wraps it to WETH on the fly; the deposited
/// amount is carried entirely in the transaction value.
pub fn build_deposit_tx(contract: Address, owner: Address, value: U256) -> TransactionRequest {
    let calldata = depositETHCall {}.abi_encode();

    TransactionRequest::default()
        .with_to(contract)
        .with_from(owner)
        .with_value(value)
        .with_input(calldata)
}

/// Build the transaction invoking the contract's `fillQuote` entry point
/// with the quote's positional arguments.
///
/// The allowance spender is always passed, zero-address sentinel included,
/// since `fillQuote` takes a fixed argument arity.
pub fn build_fill_tx(contract: Address, owner: Address, quote: &SwapQuote) -> TransactionRequest {
    let calldata = fillQuoteCall {
        sellToken: quote.sell_token,
        buyToken: quote.buy_token,
        spender: quote.allowance_spender,
        swapTarget: quote.to,
        swapCallData: quote.data.clone(),
    }
    .abi_encode();

    TransactionRequest::default()
        .with_to(contract)
        .with_from(owner)
        .with_value(quote.value)
        .with_gas_price(quote.gas_price)
        .with_input(calldata)
}

/// Scan a fill receipt's logs for the contract's `BoughtTokens` event and
/// extract the bought amount.
///
/// A success receipt without the event indicates a contract/ABI mismatch
/// the workflow cannot recover from.
pub fn extract_bought_amount(contract: Address, logs: &[Log]) -> Result<U256, SwapError> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| BoughtTokens::decode_log(&log.inner).ok())
        .map(|event| event.boughtAmount)
        .ok_or(SwapError::result_extraction("no BoughtTokens event in receipt"))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, TxKind};

    use super::*;

    /// Mainnet WETH
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    /// Mainnet DAI
    const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn contract_address() -> Address {
        addr("0x1111111111111111111111111111111111111111")
    }

    fn owner_address() -> Address {
        addr("0x2222222222222222222222222222222222222222")
    }

    fn sample_quote() -> SwapQuote {
        SwapQuote {
            sell_token: addr(WETH),
            buy_token: addr(DAI),
            sell_amount: U256::from(100_000_000_000_000_000u128),
            to: addr("0xDef1C0ded9bec7F1a1670819833240f027b25EfF"),
            data: Bytes::from(vec![0xab, 0xcd, 0xef]),
            value: U256::ZERO,
            gas_price: 1_000_000_000u128,
            allowance_spender: Address::ZERO,
        }
    }

    #[test]
    fn test_build_deposit_tx() {
        let value = U256::from(100_000_000_000_000_000u128);
        let tx = build_deposit_tx(contract_address(), owner_address(), value);

        assert_eq!(tx.to, Some(TxKind::Call(contract_address())));
        assert_eq!(tx.from, Some(owner_address()));
        assert_eq!(tx.value, Some(value));

        let calldata = tx.input.input().unwrap();
        depositETHCall::abi_decode(calldata).unwrap();
    }

    #[test]
    fn test_build_fill_tx() {
        let quote = sample_quote();
        let tx = build_fill_tx(contract_address(), owner_address(), &quote);

        assert_eq!(tx.to, Some(TxKind::Call(contract_address())));
        assert_eq!(tx.value, Some(quote.value));
        assert_eq!(tx.gas_price, Some(quote.gas_price));

        // The sentinel spender must be passed through verbatim
        let calldata = tx.input.input().unwrap();
        let call = fillQuoteCall::abi_decode(calldata).unwrap();
        assert_eq!(call.sellToken, quote.sell_token);
        assert_eq!(call.buyToken, quote.buy_token);
        assert_eq!(call.spender, Address::ZERO);
        assert_eq!(call.swapTarget, quote.to);
        assert_eq!(call.swapCallData, quote.data);
    }

    /// Construct an rpc log carrying the given event data at the given
    /// address
    fn rpc_log(address: Address, event: &BoughtTokens) -> Log {
        let inner = alloy_primitives::Log { address, data: event.encode_log_data() };
        Log { inner, ..Default::default() }
    }

    #[test]
    fn test_extract_bought_amount() {
        let bought = U256::from(250u64) * U256::from(10u64).pow(U256::from(18u64));
        let event = BoughtTokens {
            sellToken: addr(WETH),
            buyToken: addr(DAI),
            boughtAmount: bought,
        };

        let logs = vec![rpc_log(contract_address(), &event)];
        let amount = extract_bought_amount(contract_address(), &logs).unwrap();
        assert_eq!(amount, bought);
    }

    #[test]
    fn test_extract_ignores_foreign_logs() {
        let event = BoughtTokens {
            sellToken: addr(WETH),
            buyToken: addr(DAI),
            boughtAmount: U256::from(1u64),
        };

        // Same event shape, emitted by a different contract
        let logs = vec![rpc_log(owner_address(), &event)];
        let err = extract_bought_amount(contract_address(), &logs).unwrap_err();
        assert!(matches!(err, SwapError::ResultExtractionFailed(_)));
    }

    #[test]
    fn test_extract_missing_event() {
        let err = extract_bought_amount(contract_address(), &[]).unwrap_err();
        assert!(matches!(err, SwapError::ResultExtractionFailed(_)));
    }
}
