//! Error types for the swap filler

use alloy_primitives::TxHash;

/// The error type for a swap run.
///
/// Every variant is fatal to the run; there is no local recovery or retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SwapError {
    /// The quoting service could not be reached, or returned a non-success
    /// status
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),
    /// The quoting service returned a body missing a required field
    #[error("malformed quote: {0}")]
    QuoteMalformed(String),
    /// The network refused the transaction before it entered a pending state
    #[error("transaction rejected before broadcast: {0}")]
    SubmissionRejected(String),
    /// The transaction was mined but its status reports failure
    #[error("transaction {tx_hash:#x} reverted on-chain")]
    ExecutionReverted {
        /// The hash of the reverted transaction
        tx_hash: TxHash,
    },
    /// A success receipt did not contain the expected event
    #[error("result extraction failed: {0}")]
    ResultExtractionFailed(String),
    /// An error parsing a value
    #[error("parse error: {0}")]
    Parse(String),
    /// An error interacting with the lower level rpc client
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl SwapError {
    /// Create a new quote unavailable error
    #[allow(clippy::needless_pass_by_value)]
    pub fn quote_unavailable<T: ToString>(e: T) -> Self {
        SwapError::QuoteUnavailable(e.to_string())
    }

    /// Create a new malformed quote error
    #[allow(clippy::needless_pass_by_value)]
    pub fn quote_malformed<T: ToString>(e: T) -> Self {
        SwapError::QuoteMalformed(e.to_string())
    }

    /// Create a new submission rejected error
    #[allow(clippy::needless_pass_by_value)]
    pub fn submission_rejected<T: ToString>(e: T) -> Self {
        SwapError::SubmissionRejected(e.to_string())
    }

    /// Create a new result extraction error
    #[allow(clippy::needless_pass_by_value)]
    pub fn result_extraction<T: ToString>(e: T) -> Self {
        SwapError::ResultExtractionFailed(e.to_string())
    }

    /// Create a new parse error
    #[allow(clippy::needless_pass_by_value)]
    pub fn parse<T: ToString>(e: T) -> Self {
        SwapError::Parse(e.to_string())
    }

    /// Create a new rpc error
    #[allow(clippy::needless_pass_by_value)]
    pub fn rpc<T: ToString>(e: T) -> Self {
        SwapError::Rpc(e.to_string())
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(e: reqwest::Error) -> Self {
        SwapError::quote_unavailable(e)
    }
}
