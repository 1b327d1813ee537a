use std::sync::Arc;

use alloy_primitives::{Address, U256};
use contractkit::features::erc721::{
    BURNABLE, CLAIMABLE, CLAIMABLE_WITH_CONDITIONS, LAZY_MINTABLE, MINTABLE, REVEALABLE,
    SIGNATURE_MINT, SUPPLY,
};
use contractkit::{
    detect_contract_feature, Capability, ContractTransport, ContractWrapper, QueryAllParams,
    Result, SdkError, TransactionCall, TransactionResult, TransactionResultWithId,
};
use contractkit_common::{
    ContentStorage, NftMetadata, NftMetadataOrUri, NftMetadataOwner, UploadOptions,
};

use crate::abi::IERC721;
use crate::burnable::Erc721Burnable;
use crate::claimable::{ClaimConditions, ClaimOptions};
use crate::lazy_mintable::Erc721LazyMintable;
use crate::mintable::Erc721Mintable;
use crate::revealable::DelayedReveal;
use crate::signature_mintable::Erc721SignatureMintable;
use crate::supply::Erc721Supply;
use crate::token::Erc721Core;

/// ERC721 facade.
///
/// Standard reads and writes are always available. Every extension is
/// detected once from the contract's declared interface; calling an
/// operation of an extension the contract lacks fails with
/// [`SdkError::ExtensionNotImplemented`] before anything is sent.
#[derive(Debug, Clone)]
pub struct Erc721 {
    core: Erc721Core,
    supply: Capability<Erc721Supply>,
    mintable: Capability<Erc721Mintable>,
    burnable: Capability<Erc721Burnable>,
    lazy_mintable: Capability<Erc721LazyMintable>,
    signature_mintable: Capability<Erc721SignatureMintable>,
}

impl Erc721 {
    pub fn new(contract: ContractWrapper, storage: Arc<dyn ContentStorage>) -> Self {
        let core = Erc721Core::new(contract.clone(), storage);
        let interface = contract.interface();

        let supply = Capability::when(
            detect_contract_feature(&contract, &SUPPLY) || contract.has_function("nextTokenIdToMint"),
            SUPPLY.name,
            || Erc721Supply::new(core.clone()),
        );
        let mintable = Capability::detect(interface, &MINTABLE, || Erc721Mintable::new(core.clone()));
        let burnable =
            Capability::detect(interface, &BURNABLE, || Erc721Burnable::new(contract.clone()));
        let lazy_mintable = Capability::detect(interface, &LAZY_MINTABLE, || {
            Erc721LazyMintable::new(core.clone())
        });
        let signature_mintable = Capability::detect(interface, &SIGNATURE_MINT, || {
            Erc721SignatureMintable::new(core.clone())
        });

        tracing::debug!(
            target: "contractkit_erc721::erc721",
            address = %contract.address(),
            supply = supply.is_implemented(),
            mintable = mintable.is_implemented(),
            burnable = burnable.is_implemented(),
            lazy_mintable = lazy_mintable.is_implemented(),
            signature_mintable = signature_mintable.is_implemented(),
            "Resolved ERC721 capabilities"
        );

        Self {
            core,
            supply,
            mintable,
            burnable,
            lazy_mintable,
            signature_mintable,
        }
    }

    /// Rebind the network/signer of this facade and every capability object.
    pub fn on_network_updated(&self, transport: Arc<dyn ContractTransport>) {
        self.core.contract().update_transport(transport);
    }

    pub fn address(&self) -> Address {
        self.core.contract().address()
    }

    fn contract(&self) -> &ContractWrapper {
        self.core.contract()
    }

    // Standard ERC721

    pub async fn get(&self, token_id: U256) -> Result<NftMetadataOwner> {
        self.core.get(token_id).await
    }

    pub async fn owner_of(&self, token_id: U256) -> Result<Address> {
        self.core.owner_of(token_id).await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.core.balance_of(owner).await
    }

    pub async fn balance(&self) -> Result<U256> {
        let signer = self.contract().signer_address().await?;
        self.balance_of(signer).await
    }

    pub async fn is_approved(&self, owner: Address, operator: Address) -> Result<bool> {
        self.contract()
            .read(&IERC721::isApprovedForAllCall { owner, operator })
            .await
    }

    pub async fn transfer(&self, to: Address, token_id: U256) -> Result<TransactionResult> {
        let from = self.contract().signer_address().await?;
        let receipt = self
            .contract()
            .send(&IERC721::safeTransferFromCall {
                from,
                to,
                tokenId: token_id,
            })
            .await?;
        Ok(TransactionResult { receipt })
    }

    pub async fn set_approval_for_all(
        &self,
        operator: Address,
        approved: bool,
    ) -> Result<TransactionResult> {
        let receipt = self
            .contract()
            .send(&IERC721::setApprovalForAllCall { operator, approved })
            .await?;
        Ok(TransactionResult { receipt })
    }

    pub async fn set_approval_for_token(
        &self,
        operator: Address,
        token_id: U256,
    ) -> Result<TransactionResult> {
        let receipt = self
            .contract()
            .send(&IERC721::approveCall {
                to: operator,
                tokenId: token_id,
            })
            .await?;
        Ok(TransactionResult { receipt })
    }

    /// Metadata behind `tokenURI`. An empty URI is [`SdkError::NotFound`].
    pub async fn get_token_metadata(&self, token_id: U256) -> Result<NftMetadata> {
        self.core.token_metadata(token_id).await
    }

    pub async fn next_token_id_to_mint(&self) -> Result<U256> {
        self.core.next_token_id_to_mint().await
    }

    pub async fn total_count(&self) -> Result<U256> {
        self.next_token_id_to_mint().await
    }

    // Supply

    pub async fn get_all(&self, params: Option<QueryAllParams>) -> Result<Vec<NftMetadataOwner>> {
        self.supply.get()?.all(params).await
    }

    pub async fn total_circulating_supply(&self) -> Result<U256> {
        self.supply.get()?.total_circulating_supply().await
    }

    fn owned(&self) -> Result<&crate::supply::Erc721Enumerable> {
        self.supply
            .as_option()
            .and_then(|supply| supply.owned.as_option())
            .ok_or(SdkError::ExtensionNotImplemented(SUPPLY.name))
    }

    pub async fn get_owned(&self, wallet: Option<Address>) -> Result<Vec<NftMetadataOwner>> {
        self.owned()?.all(wallet).await
    }

    pub async fn get_owned_token_ids(&self, wallet: Option<Address>) -> Result<Vec<U256>> {
        self.owned()?.token_ids(wallet).await
    }

    // Mintable

    pub async fn mint(
        &self,
        metadata: &NftMetadataOrUri,
    ) -> Result<TransactionResultWithId<NftMetadataOwner>> {
        let mintable = self.mintable.get()?;
        let receiver = self.contract().signer_address().await?;
        mintable.to(receiver, metadata).await
    }

    pub async fn mint_to(
        &self,
        receiver: Address,
        metadata: &NftMetadataOrUri,
    ) -> Result<TransactionResultWithId<NftMetadataOwner>> {
        self.mintable.get()?.to(receiver, metadata).await
    }

    fn batch_mintable(&self) -> Result<&crate::mintable::Erc721BatchMintable> {
        self.mintable
            .as_option()
            .and_then(|mintable| mintable.batch.as_option())
            .ok_or(SdkError::ExtensionNotImplemented(
                contractkit::features::erc721::BATCH_MINTABLE.name,
            ))
    }

    pub async fn mint_batch(
        &self,
        metadatas: &[NftMetadataOrUri],
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let batch = self.batch_mintable()?;
        let receiver = self.contract().signer_address().await?;
        batch.to(receiver, metadatas).await
    }

    pub async fn mint_batch_to(
        &self,
        receiver: Address,
        metadatas: &[NftMetadataOrUri],
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        self.batch_mintable()?.to(receiver, metadatas).await
    }

    // Burnable

    pub async fn burn(&self, token_id: U256) -> Result<TransactionResult> {
        self.burnable.get()?.token(token_id).await
    }

    // Lazy mint

    pub async fn lazy_mint(
        &self,
        metadatas: &[NftMetadataOrUri],
        options: UploadOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        self.lazy_mintable.get()?.lazy_mint(metadatas, options).await
    }

    // Claim

    pub async fn claim(
        &self,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let claimer = self.claimer()?;
        let destination = self.contract().signer_address().await?;
        claimer.to(destination, quantity, options).await
    }

    pub async fn claim_to(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        self.claimer()?.to(destination, quantity, options).await
    }

    pub async fn get_claim_transaction(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<TransactionCall> {
        match self.claimer()? {
            Claimer::WithConditions(claim) => {
                claim
                    .get_claim_transaction(destination, quantity, options)
                    .await
            }
            Claimer::Plain(claim) => claim.get_claim_transaction(destination, quantity, options),
        }
    }

    /// Claim-with-conditions when declared, else plain claim.
    fn claimer(&self) -> Result<Claimer<'_>> {
        let lazy = self.lazy_mintable.as_option();
        if let Some(claim) = lazy.and_then(|lazy| lazy.claim_with_conditions.as_option()) {
            return Ok(Claimer::WithConditions(claim));
        }
        if let Some(claim) = lazy.and_then(|lazy| lazy.claim.as_option()) {
            return Ok(Claimer::Plain(claim));
        }
        Err(SdkError::ExtensionNotImplemented(CLAIMABLE.name))
    }

    pub fn claim_conditions(&self) -> Result<&ClaimConditions> {
        self.lazy_mintable
            .as_option()
            .and_then(|lazy| lazy.claim_with_conditions.as_option())
            .map(|claim| &claim.conditions)
            .ok_or(SdkError::ExtensionNotImplemented(
                CLAIMABLE_WITH_CONDITIONS.name,
            ))
    }

    // Signature mint

    pub fn signature(&self) -> Result<&Erc721SignatureMintable> {
        self.signature_mintable.get()
    }

    // Delayed reveal

    pub fn revealer(&self) -> Result<&DelayedReveal> {
        self.lazy_mintable
            .as_option()
            .and_then(|lazy| lazy.revealer.as_option())
            .ok_or(SdkError::ExtensionNotImplemented(REVEALABLE.name))
    }
}

enum Claimer<'a> {
    WithConditions(&'a crate::claimable::Erc721ClaimableWithConditions),
    Plain(&'a crate::claimable::Erc721Claimable),
}

impl Claimer<'_> {
    async fn to(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        match self {
            Self::WithConditions(claim) => claim.to(destination, quantity, options).await,
            Self::Plain(claim) => claim.to(destination, quantity, options).await,
        }
    }
}
