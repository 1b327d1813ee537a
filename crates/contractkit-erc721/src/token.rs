use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use contractkit::{ContractWrapper, ResolveById, Result, SdkError, TransactionReceipt};
use contractkit::TransactionResultWithId;
use contractkit_common::{fetch_token_metadata, ContentStorage, NftMetadata, NftMetadataOwner};

use crate::abi::{IERC721Supply, IERC721};

/// Reads shared by the facade and every capability class.
#[derive(Clone)]
pub struct Erc721Core {
    contract: ContractWrapper,
    storage: Arc<dyn ContentStorage>,
}

impl std::fmt::Debug for Erc721Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Erc721Core")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl Erc721Core {
    pub fn new(contract: ContractWrapper, storage: Arc<dyn ContentStorage>) -> Self {
        Self { contract, storage }
    }

    pub fn contract(&self) -> &ContractWrapper {
        &self.contract
    }

    pub fn storage(&self) -> &dyn ContentStorage {
        self.storage.as_ref()
    }

    pub async fn owner_of(&self, token_id: U256) -> Result<Address> {
        self.contract
            .read(&IERC721::ownerOfCall { tokenId: token_id })
            .await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.contract.read(&IERC721::balanceOfCall { owner }).await
    }

    pub async fn token_metadata(&self, token_id: U256) -> Result<NftMetadata> {
        let token_uri = self
            .contract
            .read(&IERC721::tokenURICall { tokenId: token_id })
            .await?;
        if token_uri.is_empty() {
            return Err(SdkError::NotFound(format!("token URI for token {token_id}")));
        }
        Ok(fetch_token_metadata(token_id, &token_uri, self.storage()).await?)
    }

    /// Metadata and owner of a token. The owner is the zero address when
    /// `ownerOf` fails (burned or not yet claimed).
    pub async fn get(&self, token_id: U256) -> Result<NftMetadataOwner> {
        let (owner, metadata) =
            futures::join!(self.owner_of(token_id), self.token_metadata(token_id));
        let owner = owner.unwrap_or_else(|e| {
            tracing::trace!(
                target: "contractkit_erc721::token",
                token_id = %token_id,
                error = %e,
                "ownerOf failed, reporting zero owner"
            );
            Address::ZERO
        });
        Ok(NftMetadataOwner {
            metadata: metadata?,
            owner,
        })
    }

    /// `nextTokenIdToMint()`, falling back to `totalSupply()`.
    pub async fn next_token_id_to_mint(&self) -> Result<U256> {
        if self.contract.has_function("nextTokenIdToMint") {
            self.contract
                .read(&IERC721Supply::nextTokenIdToMintCall {})
                .await
        } else if self.contract.has_function("totalSupply") {
            self.contract.read(&IERC721Supply::totalSupplyCall {}).await
        } else {
            Err(SdkError::Config(
                "contract requires either `nextTokenIdToMint` or `totalSupply` to determine the next token id to mint"
                    .to_string(),
            ))
        }
    }

    /// Wrap a receipt and a minted id into a lazily resolvable result.
    pub(crate) fn result_with_id(
        &self,
        receipt: TransactionReceipt,
        id: U256,
    ) -> TransactionResultWithId<NftMetadataOwner> {
        TransactionResultWithId::new(receipt, id, Arc::new(self.clone()))
    }

    /// One result per id in `ids`, all sharing `receipt`.
    pub(crate) fn results_for_ids(
        &self,
        receipt: &TransactionReceipt,
        ids: impl IntoIterator<Item = U256>,
    ) -> Vec<TransactionResultWithId<NftMetadataOwner>> {
        let resolver: Arc<dyn ResolveById<NftMetadataOwner>> = Arc::new(self.clone());
        ids.into_iter()
            .map(|id| TransactionResultWithId::new(receipt.clone(), id, Arc::clone(&resolver)))
            .collect()
    }
}

#[async_trait]
impl ResolveById<NftMetadataOwner> for Erc721Core {
    async fn resolve(&self, id: U256) -> Result<NftMetadataOwner> {
        self.get(id).await
    }
}

/// `start..start + quantity` as token ids.
pub(crate) fn id_range(start: U256, quantity: U256) -> impl Iterator<Item = U256> {
    let count = quantity.saturating_to::<u64>();
    (0..count).map(move |offset| start + U256::from(offset))
}
