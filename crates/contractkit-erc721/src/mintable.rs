use alloy_primitives::{Address, Bytes};
use contractkit::features::erc721::BATCH_MINTABLE;
use contractkit::{Capability, ContractWrapper, Result, SdkError, TransactionResultWithId};
use contractkit_common::{
    upload_or_extract_uri, upload_or_extract_uris, NftMetadataOrUri, NftMetadataOwner,
    UploadOptions,
};

use crate::abi::IMintableERC721;
use crate::token::Erc721Core;

/// `mintTo(address,string)` with metadata upload.
#[derive(Debug, Clone)]
pub struct Erc721Mintable {
    core: Erc721Core,
    pub(crate) batch: Capability<Erc721BatchMintable>,
}

impl Erc721Mintable {
    pub(crate) fn new(core: Erc721Core) -> Self {
        let batch = Capability::detect(core.contract().interface(), &BATCH_MINTABLE, || {
            Erc721BatchMintable { core: core.clone() }
        });
        Self { core, batch }
    }

    pub async fn to(
        &self,
        receiver: Address,
        metadata: &NftMetadataOrUri,
    ) -> Result<TransactionResultWithId<NftMetadataOwner>> {
        let uri = upload_or_extract_uri(metadata, self.core.storage()).await?;
        let receipt = self
            .core
            .contract()
            .send(&IMintableERC721::mintToCall { to: receiver, uri })
            .await?;

        let event = receipt
            .decode_events::<IMintableERC721::TokensMinted>()
            .into_iter()
            .next()
            .ok_or(SdkError::MissingEvent("TokensMinted"))?;

        tracing::info!(
            target: "contractkit_erc721::mintable",
            token_id = %event.tokenIdMinted,
            receiver = %receiver,
            "Minted token"
        );
        Ok(self.core.result_with_id(receipt, event.tokenIdMinted))
    }

    pub fn batch(&self) -> Result<&Erc721BatchMintable> {
        self.batch.get()
    }
}

/// Several `mintTo` calls in one multicall transaction.
#[derive(Debug, Clone)]
pub struct Erc721BatchMintable {
    core: Erc721Core,
}

impl Erc721BatchMintable {
    pub async fn to(
        &self,
        receiver: Address,
        metadatas: &[NftMetadataOrUri],
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let uris =
            upload_or_extract_uris(metadatas, self.core.storage(), &UploadOptions::default())
                .await?;
        let calls: Vec<Bytes> = uris
            .into_iter()
            .map(|uri| ContractWrapper::encode(&IMintableERC721::mintToCall { to: receiver, uri }))
            .collect();

        let receipt = self.core.contract().multicall(calls).await?;
        let ids = receipt
            .decode_events::<IMintableERC721::TokensMinted>()
            .into_iter()
            .map(|event| event.tokenIdMinted);

        Ok(self.core.results_for_ids(&receipt, ids))
    }
}
