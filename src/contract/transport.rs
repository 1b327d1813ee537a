//! The remote call boundary.
//!
//! ABI encoding happens in [`ContractWrapper`](super::ContractWrapper); a
//! transport only moves opaque calldata to a node and back.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use super::TransactionReceipt;
use crate::error::TransportError;

/// A fully encoded transaction, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Network and signer access for contract calls (object-safe).
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Execute a read-only call and return the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError>;

    /// Submit a transaction and wait for its receipt.
    async fn send(&self, tx: TransactionCall) -> Result<TransactionReceipt, TransportError>;

    /// Address transactions are sent from.
    async fn signer_address(&self) -> Result<Address, TransportError>;

    async fn chain_id(&self) -> Result<u64, TransportError>;

    /// Sign a 32-byte digest (EIP-712 payloads) and return the 65-byte signature.
    async fn sign_hash(&self, _hash: B256) -> Result<Bytes, TransportError> {
        Err(TransportError::Unsupported("sign_hash"))
    }
}
