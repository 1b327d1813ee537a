use alloy_primitives::{Bytes, U256};
use contractkit::features::erc721::{CLAIMABLE, CLAIMABLE_WITH_CONDITIONS, REVEALABLE};
use contractkit::{Capability, Result, SdkError, TransactionReceipt, TransactionResultWithId};
use contractkit_common::{
    base_uri_from_batch, upload_or_extract_uris, NftMetadataOrUri, NftMetadataOwner,
    UploadOptions,
};

use crate::abi::ILazyMint;
use crate::claimable::{Erc721Claimable, Erc721ClaimableWithConditions};
use crate::revealable::DelayedReveal;
use crate::token::Erc721Core;

/// `lazyMint(uint256,string,bytes)`: registers metadata for tokens that are
/// minted later by a claim.
#[derive(Debug, Clone)]
pub struct Erc721LazyMintable {
    core: Erc721Core,
    pub(crate) claim_with_conditions: Capability<Erc721ClaimableWithConditions>,
    pub(crate) claim: Capability<Erc721Claimable>,
    pub(crate) revealer: Capability<DelayedReveal>,
}

impl Erc721LazyMintable {
    pub(crate) fn new(core: Erc721Core) -> Self {
        let interface = core.contract().interface();
        let claim_with_conditions = Capability::detect(interface, &CLAIMABLE_WITH_CONDITIONS, || {
            Erc721ClaimableWithConditions::new(core.clone())
        });
        let claim = Capability::detect(interface, &CLAIMABLE, || Erc721Claimable::new(core.clone()));
        let revealer = Capability::detect(interface, &REVEALABLE, || DelayedReveal::new(core.clone()));
        Self {
            core,
            claim_with_conditions,
            claim,
            revealer,
        }
    }

    /// Upload `metadatas` (numbered from the next token id) and register them
    /// under their shared base URI.
    pub async fn lazy_mint(
        &self,
        metadatas: &[NftMetadataOrUri],
        options: UploadOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        if metadatas.is_empty() {
            return Err(SdkError::InvalidInput(
                "lazy mint requires at least one token".to_string(),
            ));
        }

        let start = self.core.next_token_id_to_mint().await?;
        let options = UploadOptions {
            start_file_number: start.saturating_to::<u64>(),
            ..options
        };
        let uris = upload_or_extract_uris(metadatas, self.core.storage(), &options).await?;
        let base_uri = base_uri_from_batch(&uris).map_err(|e| {
            SdkError::InvalidInput(format!("lazy minted URIs must share a base URI: {e}"))
        })?;

        let receipt = self
            .core
            .contract()
            .send(&ILazyMint::lazyMintCall {
                amount: U256::from(uris.len()),
                baseURIForTokens: base_uri.clone(),
                extraData: Bytes::new(),
            })
            .await?;

        tracing::info!(
            target: "contractkit_erc721::lazy_mintable",
            base_uri = %base_uri,
            count = uris.len(),
            "Lazy minted batch"
        );
        lazy_mint_results(&self.core, &receipt)
    }

    pub fn claim_with_conditions(&self) -> Result<&Erc721ClaimableWithConditions> {
        self.claim_with_conditions.get()
    }

    pub fn claim(&self) -> Result<&Erc721Claimable> {
        self.claim.get()
    }

    pub fn revealer(&self) -> Result<&DelayedReveal> {
        self.revealer.get()
    }
}

/// One result per id in the `TokensLazyMinted` range of `receipt`.
pub(crate) fn lazy_mint_results(
    core: &Erc721Core,
    receipt: &TransactionReceipt,
) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
    let event = receipt
        .decode_events::<ILazyMint::TokensLazyMinted>()
        .into_iter()
        .next()
        .ok_or(SdkError::MissingEvent("TokensLazyMinted"))?;

    let start = event.startTokenId.saturating_to::<u64>();
    let end = event.endTokenId.saturating_to::<u64>();
    Ok(core.results_for_ids(receipt, (start..=end).map(U256::from)))
}
