use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use super::{ContractTransport, ReceiptLog, TransactionCall, TransactionReceipt};
use crate::error::TransportError;
use crate::options::GasSettings;

fn rpc_error(e: impl std::fmt::Display) -> TransportError {
    TransportError::Rpc(e.to_string())
}

/// JSON-RPC transport backed by an alloy provider.
///
/// Gas price is the node's suggestion scaled by the configured speed and capped
/// at `max_price_in_gwei`.
pub struct ProviderTransport {
    provider: DynProvider,
    signer: Option<PrivateKeySigner>,
    gas: GasSettings,
}

impl ProviderTransport {
    pub fn connect(
        rpc_url: &str,
        signer: Option<PrivateKeySigner>,
        gas: GasSettings,
    ) -> Result<Self, TransportError> {
        let url = url::Url::parse(rpc_url)
            .map_err(|e| TransportError::Rpc(format!("invalid RPC URL {rpc_url}: {e}")))?;

        let provider = match &signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        tracing::info!(
            target: "contractkit::contract::provider",
            rpc_url = %rpc_url,
            signer = ?signer.as_ref().map(|s| s.address()),
            "Connected provider transport"
        );

        Ok(Self {
            provider,
            signer,
            gas,
        })
    }

    pub fn read_only(rpc_url: &str, gas: GasSettings) -> Result<Self, TransportError> {
        Self::connect(rpc_url, None, gas)
    }

    async fn gas_price(&self) -> Result<u128, TransportError> {
        let suggested = self.provider.get_gas_price().await.map_err(rpc_error)?;
        let price = self.gas.price_for(suggested);
        tracing::trace!(
            target: "contractkit::contract::provider",
            suggested,
            price,
            speed = ?self.gas.speed,
            "Computed gas price"
        );
        Ok(price)
    }
}

#[async_trait]
impl ContractTransport for ProviderTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, TransportError> {
        let mut tx = TransactionRequest::default().with_to(to).with_input(data);
        if let Some(signer) = &self.signer {
            tx = tx.with_from(signer.address());
        }
        self.provider.call(tx).await.map_err(rpc_error)
    }

    async fn send(&self, call: TransactionCall) -> Result<TransactionReceipt, TransportError> {
        let gas_price = self.gas_price().await?;
        let tx = TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.data)
            .with_value(call.value)
            .with_gas_price(gas_price);

        let pending = self.provider.send_transaction(tx).await.map_err(rpc_error)?;
        let receipt = pending.get_receipt().await.map_err(rpc_error)?;

        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            status: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| ReceiptLog {
                    address: log.address(),
                    topics: log.topics().to_vec(),
                    data: log.data().data.clone(),
                })
                .collect(),
        })
    }

    async fn signer_address(&self) -> Result<Address, TransportError> {
        if let Some(signer) = &self.signer {
            return Ok(signer.address());
        }
        let accounts = self.provider.get_accounts().await.map_err(rpc_error)?;
        accounts.first().copied().ok_or(TransportError::NoSigner)
    }

    async fn chain_id(&self) -> Result<u64, TransportError> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }

    async fn sign_hash(&self, hash: B256) -> Result<Bytes, TransportError> {
        let signer = self.signer.as_ref().ok_or(TransportError::NoSigner)?;
        let signature = signer.sign_hash(&hash).await.map_err(rpc_error)?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}
