//! Delayed reveal: tokens are lazy minted with placeholder metadata and an
//! encrypted base URI that is revealed later with a password.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use contractkit::{Result, SdkError, TransactionResult, TransactionResultWithId};
use contractkit_common::{
    base_uri_from_batch, upload_or_extract_uris, NftMetadata, NftMetadataInput, NftMetadataOrUri,
    NftMetadataOwner, UploadOptions,
};
use futures::future::try_join_all;

use crate::abi::{IDelayedReveal, ILazyMint};
use crate::lazy_mintable::lazy_mint_results;
use crate::token::Erc721Core;

/// An unrevealed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchToReveal {
    /// Index of the batch, as passed to [`DelayedReveal::reveal`].
    pub batch_index: u64,
    /// First token id of the batch.
    pub first_token_id: U256,
    pub placeholder_metadata: NftMetadata,
}

/// `keccak256(abi.encodePacked(password, chainId, batchIndex, contract))`
pub fn hash_delay_reveal_password(
    password: &str,
    chain_id: u64,
    batch_index: U256,
    contract: Address,
) -> B256 {
    keccak256(
        (
            password.to_string(),
            U256::from(chain_id),
            batch_index,
            contract,
        )
            .abi_encode_packed(),
    )
}

/// `keccak256(abi.encodePacked(baseURI, key, chainId))`
fn provenance_hash(base_uri: &str, key: B256, chain_id: u64) -> B256 {
    keccak256(
        (
            Bytes::copy_from_slice(base_uri.as_bytes()),
            key,
            U256::from(chain_id),
        )
            .abi_encode_packed(),
    )
}

#[derive(Debug, Clone)]
pub struct DelayedReveal {
    core: Erc721Core,
}

impl DelayedReveal {
    pub(crate) fn new(core: Erc721Core) -> Self {
        Self { core }
    }

    async fn encrypt_decrypt(&self, data: Bytes, key: B256) -> Result<Bytes> {
        self.core
            .contract()
            .read(&IDelayedReveal::encryptDecryptCall {
                data,
                key: Bytes::copy_from_slice(key.as_slice()),
            })
            .await
    }

    async fn password_key(&self, password: &str, batch_index: U256) -> Result<B256> {
        let chain_id = self.core.contract().chain_id().await?;
        Ok(hash_delay_reveal_password(
            password,
            chain_id,
            batch_index,
            self.core.contract().address(),
        ))
    }

    /// Lazy mint `metadatas` behind `placeholder`. The real base URI is stored
    /// encrypted with a key derived from `password`.
    pub async fn create_delayed_reveal_batch(
        &self,
        placeholder: &NftMetadataInput,
        metadatas: &[NftMetadataOrUri],
        password: &str,
        options: UploadOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        if password.is_empty() {
            return Err(SdkError::InvalidInput("password is required".to_string()));
        }
        if metadatas.is_empty() {
            return Err(SdkError::InvalidInput(
                "delayed reveal batch requires at least one token".to_string(),
            ));
        }

        let contract = self.core.contract();
        let storage = self.core.storage();
        let start = self.core.next_token_id_to_mint().await?.saturating_to::<u64>();

        let upload = UploadOptions {
            start_file_number: start,
            ..options
        };
        let uris = upload_or_extract_uris(metadatas, storage, &upload).await?;
        let base_uri = base_uri_from_batch(&uris).map_err(|e| {
            SdkError::InvalidInput(format!("revealed URIs must share a base URI: {e}"))
        })?;

        let placeholders =
            vec![NftMetadataOrUri::Metadata(placeholder.clone()); metadatas.len()];
        let placeholder_uris = upload_or_extract_uris(
            &placeholders,
            storage,
            &UploadOptions::starting_at(start),
        )
        .await?;
        let placeholder_base_uri = base_uri_from_batch(&placeholder_uris)?;

        let batch_index = contract
            .read(&IDelayedReveal::getBaseURICountCall {})
            .await?;
        let chain_id = contract.chain_id().await?;
        let key = hash_delay_reveal_password(password, chain_id, batch_index, contract.address());

        let encrypted_base_uri = self
            .encrypt_decrypt(Bytes::copy_from_slice(base_uri.as_bytes()), key)
            .await?;
        let provenance = provenance_hash(&base_uri, key, chain_id);
        let data = (encrypted_base_uri, provenance).abi_encode_params();

        let receipt = contract
            .send(&ILazyMint::lazyMintCall {
                amount: U256::from(uris.len()),
                baseURIForTokens: placeholder_base_uri,
                extraData: Bytes::from(data),
            })
            .await?;

        tracing::info!(
            target: "contractkit_erc721::revealable",
            batch_index = %batch_index,
            count = uris.len(),
            "Created delayed reveal batch"
        );
        lazy_mint_results(&self.core, &receipt)
    }

    /// Reveal the batch at `batch_index`. A wrong password is rejected before
    /// any transaction is sent.
    pub async fn reveal(&self, batch_index: u64, password: &str) -> Result<TransactionResult> {
        if password.is_empty() {
            return Err(SdkError::InvalidInput("password is required".to_string()));
        }
        let contract = self.core.contract();
        let index = U256::from(batch_index);
        let key = self.password_key(password, index).await?;

        let batch_id = contract
            .read(&IDelayedReveal::getBatchIdAtIndexCall { index })
            .await?;
        let stored = contract
            .read(&IDelayedReveal::encryptedDataCall { batchId: batch_id })
            .await?;
        if stored.is_empty() {
            return Err(SdkError::InvalidInput(format!(
                "batch {batch_index} is already revealed"
            )));
        }
        let encrypted = <(Bytes, B256)>::abi_decode_params(&stored)
            .map(|(encrypted, _)| encrypted)
            .unwrap_or(stored);

        let decrypted = self.encrypt_decrypt(encrypted, key).await?;
        let revealed_uri = String::from_utf8(decrypted.to_vec()).unwrap_or_default();
        if !revealed_uri.contains("://") || !revealed_uri.ends_with('/') {
            return Err(SdkError::InvalidInput("invalid password".to_string()));
        }

        let receipt = contract
            .send(&IDelayedReveal::revealCall {
                index,
                key: Bytes::copy_from_slice(key.as_slice()),
            })
            .await?;
        tracing::info!(
            target: "contractkit_erc721::revealable",
            batch_index,
            "Revealed batch"
        );
        Ok(TransactionResult { receipt })
    }

    /// Batches that still hold encrypted data, with their placeholder metadata.
    pub async fn get_batches_to_reveal(&self) -> Result<Vec<BatchToReveal>> {
        let contract = self.core.contract();
        let count = contract
            .read(&IDelayedReveal::getBaseURICountCall {})
            .await?
            .saturating_to::<u64>();
        if count == 0 {
            return Ok(Vec::new());
        }

        let batch_ids = try_join_all((0..count).map(|index| async move {
            contract
                .read(&IDelayedReveal::getBatchIdAtIndexCall {
                    index: U256::from(index),
                })
                .await
        }))
        .await?;

        let batches = try_join_all(batch_ids.iter().enumerate().map(|(index, batch_id)| {
            let first_token_id = if index == 0 {
                U256::ZERO
            } else {
                batch_ids[index - 1]
            };
            async move {
                let encrypted = contract
                    .read(&IDelayedReveal::encryptedDataCall {
                        batchId: *batch_id,
                    })
                    .await?;
                if encrypted.is_empty() {
                    return Ok(None);
                }
                let placeholder_metadata = self.core.token_metadata(first_token_id).await?;
                Ok::<_, SdkError>(Some(BatchToReveal {
                    batch_index: index as u64,
                    first_token_id,
                    placeholder_metadata,
                }))
            }
        }))
        .await?;

        Ok(batches.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_packed_encoding() {
        let contract = Address::repeat_byte(0x42);
        let mut packed = b"secret".to_vec();
        packed.extend_from_slice(&U256::from(137u64).to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(2u64).to_be_bytes::<32>());
        packed.extend_from_slice(contract.as_slice());

        assert_eq!(
            hash_delay_reveal_password("secret", 137, U256::from(2u64), contract),
            keccak256(&packed)
        );
    }

    #[test]
    fn test_password_hash_depends_on_every_input() {
        let contract = Address::repeat_byte(0x42);
        let base = hash_delay_reveal_password("secret", 1, U256::ZERO, contract);
        assert_ne!(base, hash_delay_reveal_password("other", 1, U256::ZERO, contract));
        assert_ne!(base, hash_delay_reveal_password("secret", 5, U256::ZERO, contract));
        assert_ne!(base, hash_delay_reveal_password("secret", 1, U256::from(1u64), contract));
        assert_ne!(
            base,
            hash_delay_reveal_password("secret", 1, U256::ZERO, Address::ZERO)
        );
    }
}
