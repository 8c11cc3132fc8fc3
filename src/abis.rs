//! ABI types for the `SimpleTokenSwap` helper contract

use alloy::sol;

sol! {
    #[derive(Debug)]
    /// @dev A contract that holds WETH and fills externally-priced swap
    /// quotes against it
    contract SimpleTokenSwap {
        /// @dev Emitted when a quote is filled, carrying the amount of the
        /// buy token received by the contract
        event BoughtTokens(address sellToken, address buyToken, uint256 boughtAmount);

        /// @dev Deposit ETH and wrap it into WETH held by the contract
        function depositETH() external payable;

        /// @dev Fill a swap quote with the contract's own WETH balance.
        /// `spender` is granted an allowance before the fill when non-zero;
        /// the zero address means no allowance step is required.
        function fillQuote(
            address sellToken,
            address buyToken,
            address spender,
            address payable swapTarget,
            bytes calldata swapCallData
        ) external payable;
    }
}
