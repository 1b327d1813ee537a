//! Signature-based minting.
//!
//! An authorized wallet signs an EIP-712 `MintRequest`; anyone holding the
//! signed payload can then mint it.

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use contractkit::{
    is_native_token, ContractWrapper, Result, SdkError, TransactionResultWithId,
    NATIVE_TOKEN_ADDRESS,
};
use contractkit_common::{
    upload_or_extract_uri, upload_or_extract_uris, NftMetadataOrUri, NftMetadataOwner,
    UploadOptions,
};

use crate::abi::{ISignatureMintERC721, MintRequest};
use crate::token::{id_range, Erc721Core};

pub const SIGNATURE_MINT_DOMAIN_NAME: &str = "SignatureMintERC721";
pub const SIGNATURE_MINT_DOMAIN_VERSION: &str = "1";

/// Default validity window of a generated payload.
const DEFAULT_VALIDITY_SECONDS: u64 = 60 * 60 * 24 * 365 * 10;

/// What to mint, for whom and at what price.
#[derive(Debug, Clone)]
pub struct PayloadToSign {
    pub to: Address,
    pub metadata: NftMetadataOrUri,
    pub quantity: U256,
    /// Price per token in the currency's base units.
    pub price: U256,
    pub currency: Address,
    pub primary_sale_recipient: Address,
    pub royalty_recipient: Address,
    pub royalty_bps: U256,
    /// Unix seconds. Defaults to now.
    pub mint_start_time: Option<u64>,
    /// Unix seconds. Defaults to ten years after the start.
    pub mint_end_time: Option<u64>,
    /// Defaults to a random id.
    pub uid: Option<B256>,
}

impl PayloadToSign {
    pub fn new(to: Address, metadata: impl Into<NftMetadataOrUri>) -> Self {
        Self {
            to,
            metadata: metadata.into(),
            quantity: U256::from(1u64),
            price: U256::ZERO,
            currency: NATIVE_TOKEN_ADDRESS,
            primary_sale_recipient: Address::ZERO,
            royalty_recipient: Address::ZERO,
            royalty_bps: U256::ZERO,
            mint_start_time: None,
            mint_end_time: None,
            uid: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.quantity.is_zero() {
            return Err(SdkError::InvalidInput(
                "mint quantity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn into_request(self, uri: String) -> MintRequest {
        let start = self.mint_start_time.unwrap_or_else(unix_now);
        let end = self
            .mint_end_time
            .unwrap_or_else(|| start.saturating_add(DEFAULT_VALIDITY_SECONDS));
        MintRequest {
            to: self.to,
            royaltyRecipient: self.royalty_recipient,
            royaltyBps: self.royalty_bps,
            primarySaleRecipient: self.primary_sale_recipient,
            uri,
            quantity: self.quantity,
            pricePerToken: self.price,
            currency: self.currency,
            validityStartTimestamp: u128::from(start),
            validityEndTimestamp: u128::from(end),
            uid: self.uid.unwrap_or_else(B256::random),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// A mint request and the signature authorizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub payload: MintRequest,
    pub signature: Bytes,
}

/// EIP-712 domain of the signature mint extension on `contract`.
pub fn signature_mint_domain(chain_id: u64, contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(SIGNATURE_MINT_DOMAIN_NAME)),
        Some(Cow::Borrowed(SIGNATURE_MINT_DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(contract),
        None,
    )
}

#[derive(Debug, Clone)]
pub struct Erc721SignatureMintable {
    core: Erc721Core,
}

impl Erc721SignatureMintable {
    pub(crate) fn new(core: Erc721Core) -> Self {
        Self { core }
    }

    async fn sign(&self, payload: MintRequest) -> Result<SignedPayload> {
        let contract = self.core.contract();
        let domain = signature_mint_domain(contract.chain_id().await?, contract.address());
        let digest = payload.eip712_signing_hash(&domain);
        let signature = contract.sign_hash(digest).await?;
        Ok(SignedPayload { payload, signature })
    }

    /// Upload the payload's metadata and sign it with the connected signer.
    pub async fn generate(&self, payload: PayloadToSign) -> Result<SignedPayload> {
        payload.validate()?;
        let uri = upload_or_extract_uri(&payload.metadata, self.core.storage()).await?;
        self.sign(payload.into_request(uri)).await
    }

    /// Like [`generate`](Self::generate) for several payloads, uploading all
    /// metadata in one batch. Nothing is uploaded unless every payload is valid.
    pub async fn generate_batch(&self, payloads: Vec<PayloadToSign>) -> Result<Vec<SignedPayload>> {
        for payload in &payloads {
            payload.validate()?;
        }
        let metadatas: Vec<NftMetadataOrUri> =
            payloads.iter().map(|payload| payload.metadata.clone()).collect();
        let uris =
            upload_or_extract_uris(&metadatas, self.core.storage(), &UploadOptions::default())
                .await?;

        let mut signed = Vec::with_capacity(payloads.len());
        for (payload, uri) in payloads.into_iter().zip(uris) {
            signed.push(self.sign(payload.into_request(uri)).await?);
        }
        Ok(signed)
    }

    /// Whether the contract accepts `signed` (signer authorized, not expired,
    /// uid unused).
    pub async fn verify(&self, signed: &SignedPayload) -> Result<bool> {
        let verdict = self
            .core
            .contract()
            .read(&ISignatureMintERC721::verifyCall {
                req: signed.payload.clone(),
                signature: signed.signature.clone(),
            })
            .await?;
        Ok(verdict.success)
    }

    pub async fn mint(
        &self,
        signed: &SignedPayload,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let payload = &signed.payload;
        let value = if is_native_token(payload.currency) {
            payload.pricePerToken.saturating_mul(payload.quantity)
        } else {
            U256::ZERO
        };

        let receipt = self
            .core
            .contract()
            .send_with_value(
                &ISignatureMintERC721::mintWithSignatureCall {
                    req: payload.clone(),
                    signature: signed.signature.clone(),
                },
                value,
            )
            .await?;
        let event = receipt
            .decode_events::<ISignatureMintERC721::TokensMintedWithSignature>()
            .into_iter()
            .next()
            .ok_or(SdkError::MissingEvent("TokensMintedWithSignature"))?;

        Ok(self
            .core
            .results_for_ids(&receipt, id_range(event.tokenIdMinted, payload.quantity)))
    }

    /// Mint several payloads in one multicall.
    ///
    /// A multicall carries no value, so payloads priced in the native currency
    /// are rejected. Payloads priced in an ERC20 currency are accepted: the
    /// contract pulls that payment from the receiver's allowance.
    pub async fn mint_batch(
        &self,
        signed: &[SignedPayload],
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        if signed.iter().any(|s| {
            is_native_token(s.payload.currency) && !s.payload.pricePerToken.is_zero()
        }) {
            return Err(SdkError::InvalidInput(
                "batch signature mints cannot carry native currency payments".to_string(),
            ));
        }

        let calls = signed
            .iter()
            .map(|s| {
                ContractWrapper::encode(&ISignatureMintERC721::mintWithSignatureCall {
                    req: s.payload.clone(),
                    signature: s.signature.clone(),
                })
            })
            .collect();
        let receipt = self.core.contract().multicall(calls).await?;

        let events = receipt.decode_events::<ISignatureMintERC721::TokensMintedWithSignature>();
        let ids = events
            .iter()
            .flat_map(|event| id_range(event.tokenIdMinted, event.mintRequest.quantity))
            .collect::<Vec<_>>();
        Ok(self.core.results_for_ids(&receipt, ids))
    }
}
