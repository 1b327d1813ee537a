//! Handle to a deployed contract.
//!
//! A [`ContractWrapper`] pairs an address and its detected interface with a
//! replaceable [`ContractTransport`]. Every capability built on a contract
//! holds a clone of the same wrapper, so rebinding the transport through one
//! clone is seen by all of them.

mod provider;
mod receipt;
mod result;
mod transport;

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};

pub use provider::ProviderTransport;
pub use receipt::{ReceiptLog, TransactionReceipt};
pub use result::{ResolveById, TransactionResult, TransactionResultWithId};
pub use transport::{ContractTransport, TransactionCall};

use crate::detection::ContractInterface;
use crate::error::{Result, TransportError};

sol! {
    interface IMulticall {
        function multicall(bytes[] calldata data) external returns (bytes[] memory results);
    }
}

#[derive(Clone)]
pub struct ContractWrapper {
    address: Address,
    interface: Arc<ContractInterface>,
    transport: Arc<RwLock<Arc<dyn ContractTransport>>>,
}

impl std::fmt::Debug for ContractWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractWrapper")
            .field("address", &self.address)
            .field("functions", &self.interface.len())
            .finish_non_exhaustive()
    }
}

impl ContractWrapper {
    pub fn new(
        address: Address,
        interface: ContractInterface,
        transport: Arc<dyn ContractTransport>,
    ) -> Self {
        Self {
            address,
            interface: Arc::new(interface),
            transport: Arc::new(RwLock::new(transport)),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.interface.has_function(name)
    }

    /// Rebind the network/signer. Applies to every clone of this wrapper.
    pub fn update_transport(&self, transport: Arc<dyn ContractTransport>) {
        *self.transport.write().unwrap_or_else(PoisonError::into_inner) = transport;
        tracing::debug!(
            target: "contractkit::contract",
            address = %self.address,
            "Transport updated"
        );
    }

    fn transport(&self) -> Arc<dyn ContractTransport> {
        Arc::clone(&self.transport.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// ABI-encode a call.
    pub fn encode<C: SolCall>(call: &C) -> Bytes {
        Bytes::from(call.abi_encode())
    }

    /// Execute a read-only call and decode its return value.
    pub async fn read<C: SolCall>(&self, call: &C) -> Result<C::Return> {
        tracing::trace!(
            target: "contractkit::contract",
            address = %self.address,
            function = C::SIGNATURE,
            "Read"
        );
        let data = self.transport().call(self.address, Self::encode(call)).await?;
        Ok(C::abi_decode_returns(&data)?)
    }

    pub fn prepare<C: SolCall>(&self, call: &C, value: U256) -> TransactionCall {
        TransactionCall {
            to: self.address,
            data: Self::encode(call),
            value,
        }
    }

    pub async fn send<C: SolCall>(&self, call: &C) -> Result<TransactionReceipt> {
        self.send_with_value(call, U256::ZERO).await
    }

    pub async fn send_with_value<C: SolCall>(
        &self,
        call: &C,
        value: U256,
    ) -> Result<TransactionReceipt> {
        tracing::debug!(
            target: "contractkit::contract",
            address = %self.address,
            function = C::SIGNATURE,
            value = %value,
            "Sending transaction"
        );
        self.send_prepared(self.prepare(call, value)).await
    }

    /// Submit an already encoded transaction. A reverted receipt is an error.
    pub async fn send_prepared(&self, tx: TransactionCall) -> Result<TransactionReceipt> {
        let receipt = self.transport().send(tx).await?;
        if !receipt.status {
            tracing::warn!(
                target: "contractkit::contract",
                address = %self.address,
                tx_hash = %receipt.transaction_hash,
                "Transaction reverted"
            );
            return Err(TransportError::Reverted(receipt.transaction_hash).into());
        }
        tracing::debug!(
            target: "contractkit::contract",
            tx_hash = %receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        Ok(receipt)
    }

    /// Batch several encoded calls into one `multicall(bytes[])` transaction.
    pub async fn multicall(&self, calls: Vec<Bytes>) -> Result<TransactionReceipt> {
        tracing::debug!(
            target: "contractkit::contract",
            address = %self.address,
            calls = calls.len(),
            "Sending multicall"
        );
        self.send(&IMulticall::multicallCall { data: calls }).await
    }

    pub async fn signer_address(&self) -> Result<Address> {
        Ok(self.transport().signer_address().await?)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        Ok(self.transport().chain_id().await?)
    }

    pub async fn sign_hash(&self, hash: B256) -> Result<Bytes> {
        Ok(self.transport().sign_hash(hash).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolValue;
    use async_trait::async_trait;
    use std::sync::Mutex;

    sol! {
        interface ICounter {
            function count() external view returns (uint256);
            function bump() external;
        }
    }

    struct FixedTransport {
        value: u64,
        status: bool,
        sent: Mutex<Vec<TransactionCall>>,
    }

    impl FixedTransport {
        fn new(value: u64, status: bool) -> Arc<Self> {
            Arc::new(Self {
                value,
                status,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ContractTransport for FixedTransport {
        async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes, TransportError> {
            Ok(Bytes::from(U256::from(self.value).abi_encode()))
        }

        async fn send(&self, tx: TransactionCall) -> Result<TransactionReceipt, TransportError> {
            self.sent.lock().unwrap().push(tx);
            Ok(TransactionReceipt {
                transaction_hash: B256::repeat_byte(0xab),
                status: self.status,
                ..Default::default()
            })
        }

        async fn signer_address(&self) -> Result<Address, TransportError> {
            Ok(Address::repeat_byte(0x01))
        }

        async fn chain_id(&self) -> Result<u64, TransportError> {
            Ok(31337)
        }
    }

    fn wrapper(transport: Arc<dyn ContractTransport>) -> ContractWrapper {
        ContractWrapper::new(
            Address::repeat_byte(0x42),
            ContractInterface::from_signatures(["count()", "bump()"]),
            transport,
        )
    }

    #[tokio::test]
    async fn test_read_decodes_return_value() {
        let contract = wrapper(FixedTransport::new(5, true));
        let count = contract.read(&ICounter::countCall {}).await.unwrap();
        assert_eq!(count, U256::from(5u64));
    }

    #[tokio::test]
    async fn test_update_transport_is_shared_by_clones() {
        let contract = wrapper(FixedTransport::new(1, true));
        let clone = contract.clone();

        contract.update_transport(FixedTransport::new(9, true));

        let count = clone.read(&ICounter::countCall {}).await.unwrap();
        assert_eq!(count, U256::from(9u64));
    }

    #[tokio::test]
    async fn test_send_encodes_calldata() {
        let transport = FixedTransport::new(0, true);
        let contract = wrapper(transport.clone());

        contract.send(&ICounter::bumpCall {}).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Address::repeat_byte(0x42));
        assert_eq!(sent[0].data[..4], ICounter::bumpCall::SELECTOR);
        assert_eq!(sent[0].value, U256::ZERO);
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_an_error() {
        let contract = wrapper(FixedTransport::new(0, false));
        let err = contract.send(&ICounter::bumpCall {}).await.unwrap_err();
        assert!(matches!(
            err,
            crate::SdkError::Transport(TransportError::Reverted(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_hash_unsupported_by_default() {
        let contract = wrapper(FixedTransport::new(0, true));
        let err = contract.sign_hash(B256::ZERO).await.unwrap_err();
        assert!(matches!(
            err,
            crate::SdkError::Transport(TransportError::Unsupported("sign_hash"))
        ));
    }
}
