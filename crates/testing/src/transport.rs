use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use alloy_primitives::{Address, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use contractkit::{ContractTransport, ReceiptLog, TransactionCall, TransactionReceipt, TransportError};

pub const MOCK_CHAIN_ID: u64 = 31337;

#[derive(Default)]
struct State {
    by_calldata: HashMap<Bytes, Result<Bytes, String>>,
    by_selector: HashMap<[u8; 4], Result<Bytes, String>>,
    logs: HashMap<[u8; 4], Vec<ReceiptLog>>,
    reads: Vec<Bytes>,
    sent: Vec<TransactionCall>,
}

/// In-memory [`ContractTransport`].
///
/// Reads are answered by exact calldata first, then by function selector.
/// Transactions always succeed and carry the logs registered for their
/// selector.
pub struct MockTransport {
    state: Mutex<State>,
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            signer: PrivateKeySigner::random(),
            chain_id: MOCK_CHAIN_ID,
        }
    }

    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Answer every call to `C` with `value`.
    pub fn respond<C: SolCall>(&self, value: impl SolValue) -> &Self {
        self.state()
            .by_selector
            .insert(C::SELECTOR, Ok(Bytes::from(value.abi_encode())));
        self
    }

    /// Answer this exact call with `value`.
    pub fn respond_to<C: SolCall>(&self, call: &C, value: impl SolValue) -> &Self {
        self.state()
            .by_calldata
            .insert(Bytes::from(call.abi_encode()), Ok(Bytes::from(value.abi_encode())));
        self
    }

    /// Answer this exact call with already encoded return data.
    pub fn respond_raw<C: SolCall>(&self, call: &C, data: Bytes) -> &Self {
        self.state()
            .by_calldata
            .insert(Bytes::from(call.abi_encode()), Ok(data));
        self
    }

    /// Make every call to `C` revert.
    pub fn revert<C: SolCall>(&self) -> &Self {
        self.state()
            .by_selector
            .insert(C::SELECTOR, Err(format!("execution reverted: {}", C::SIGNATURE)));
        self
    }

    /// Make this exact call revert.
    pub fn revert_on<C: SolCall>(&self, call: &C) -> &Self {
        self.state().by_calldata.insert(
            Bytes::from(call.abi_encode()),
            Err(format!("execution reverted: {}", C::SIGNATURE)),
        );
        self
    }

    /// Logs attached to the receipt of every transaction calling `C`.
    pub fn emit_on<C: SolCall>(&self, logs: Vec<ReceiptLog>) -> &Self {
        self.state().logs.insert(C::SELECTOR, logs);
        self
    }

    /// Calldata of every read, in order.
    pub fn reads(&self) -> Vec<Bytes> {
        self.state().reads.clone()
    }

    /// Every submitted transaction, in order.
    pub fn sent(&self) -> Vec<TransactionCall> {
        self.state().sent.clone()
    }

    /// Submitted transactions whose calldata starts with `C`'s selector.
    pub fn sent_calls<C: SolCall>(&self) -> Vec<TransactionCall> {
        self.state()
            .sent
            .iter()
            .filter(|tx| tx.data.starts_with(&C::SELECTOR))
            .cloned()
            .collect()
    }

    /// Total number of reads and transactions that reached this transport.
    pub fn request_count(&self) -> usize {
        let state = self.state();
        state.reads.len() + state.sent.len()
    }
}

#[async_trait]
impl ContractTransport for MockTransport {
    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, TransportError> {
        let mut state = self.state();
        state.reads.push(data.clone());

        let selector: Option<[u8; 4]> = data.get(..4).and_then(|s| s.try_into().ok());
        let response = state.by_calldata.get(&data).cloned().or_else(|| {
            selector.and_then(|selector| state.by_selector.get(&selector).cloned())
        });

        match response {
            Some(Ok(bytes)) => Ok(bytes),
            Some(Err(reason)) => Err(TransportError::Rpc(reason)),
            None => Err(TransportError::Rpc(format!(
                "no mock response for calldata {data}"
            ))),
        }
    }

    async fn send(&self, tx: TransactionCall) -> Result<TransactionReceipt, TransportError> {
        let mut state = self.state();
        let selector: Option<[u8; 4]> = tx.data.get(..4).and_then(|s| s.try_into().ok());
        let logs = selector
            .and_then(|selector| state.logs.get(&selector).cloned())
            .unwrap_or_default();

        state.sent.push(tx);
        let nonce = state.sent.len() as u64;

        Ok(TransactionReceipt {
            transaction_hash: B256::left_padding_from(&nonce.to_be_bytes()),
            block_number: Some(nonce),
            gas_used: 21_000,
            status: true,
            logs,
        })
    }

    async fn signer_address(&self) -> Result<Address, TransportError> {
        Ok(self.signer.address())
    }

    async fn chain_id(&self) -> Result<u64, TransportError> {
        Ok(self.chain_id)
    }

    async fn sign_hash(&self, hash: B256) -> Result<Bytes, TransportError> {
        let signature = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| TransportError::Rpc(e.to_string()))?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}
