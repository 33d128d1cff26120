//! Error types for myth-transfer

use thiserror::Error;

/// Main error type for myth-transfer operations
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    /// Invalid account address or public key
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Amount is not a positive integer that fits in u128
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Secret material could not be turned into a signer
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// Invalid transaction format
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    /// SCALE codec decode error
    #[error("SCALE decode error: {0}")]
    ScaleDecode(String),
    /// Missing required context
    #[error("Missing context: {0}")]
    MissingContext(String),
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Destination chain cannot be reached with a local transfer
    #[error("Unsupported destination: {0}")]
    UnsupportedDestination(String),
    /// Endpoint could not be reached
    #[error("Connection error: {0}")]
    Connection(String),
    /// RPC request failed after connecting
    #[error("RPC error: {0}")]
    Rpc(String),
    /// Transaction was rejected, dropped or reported an error
    #[error("Submission error: {0}")]
    Submission(String),
    /// Status update that makes no sense in the current state
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),
}

impl From<parity_scale_codec::Error> for TransferError {
    fn from(err: parity_scale_codec::Error) -> Self {
        TransferError::ScaleDecode(err.to_string())
    }
}

impl From<hex::FromHexError> for TransferError {
    fn from(err: hex::FromHexError) -> Self {
        TransferError::InvalidInput(format!("Invalid hex: {}", err))
    }
}

impl From<subxt::Error> for TransferError {
    fn from(err: subxt::Error) -> Self {
        TransferError::Rpc(err.to_string())
    }
}
