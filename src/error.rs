use alloy_primitives::B256;
use contractkit_common::StorageError;

/// Failures raised at the remote call boundary.
///
/// These are surfaced to callers unchanged through [`SdkError::Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Transaction {0} reverted")]
    Reverted(B256),
    #[error("No signer configured")]
    NoSigner,
    #[error("{0} is not supported by this transport")]
    Unsupported(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("This functionality is not available because the contract does not implement the '{0}' extension")]
    ExtensionNotImplemented(&'static str),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Contract configuration error: {0}")]
    Config(String),
    #[error("Invalid SDK options: {0}")]
    InvalidOptions(String),
    #[error("Chain {0} is not supported")]
    UnsupportedChain(u64),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Transaction receipt has no {0} event")]
    MissingEvent(&'static str),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = SdkError> = std::result::Result<T, E>;
