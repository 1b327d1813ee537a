//! Claiming lazily minted tokens.
//!
//! Two extensions exist: a plain `claim(address,uint256)` and the drop-style
//! claim that is checked against the active claim condition. The facade
//! prefers the latter when a contract declares both.

use alloy_primitives::{Address, Bytes, B256, U256};
use contractkit::{
    is_native_token, ContractWrapper, Result, SdkError, TransactionCall, TransactionResult,
    TransactionResultWithId, NATIVE_TOKEN_ADDRESS,
};
use contractkit_common::NftMetadataOwner;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::abi::{AllowlistProof, ClaimCondition, IClaimableERC721, IDrop};
use crate::token::{id_range, Erc721Core};

/// Overrides for a claim. Unset fields come from the active claim condition.
#[derive(Debug, Clone, Default)]
pub struct ClaimOptions {
    pub price_per_token: Option<U256>,
    pub currency: Option<Address>,
    pub allowlist_proof: Option<AllowlistProof>,
}

/// Proof submitted when the claimer is not on an allowlist.
pub fn default_allowlist_proof() -> AllowlistProof {
    AllowlistProof {
        proof: Vec::new(),
        quantityLimitPerWallet: U256::ZERO,
        pricePerToken: U256::MAX,
        currency: Address::ZERO,
    }
}

fn ensure_quantity(quantity: U256) -> Result<()> {
    if quantity.is_zero() {
        return Err(SdkError::InvalidInput(
            "claim quantity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn claim_value(currency: Address, price_per_token: U256, quantity: U256) -> U256 {
    if is_native_token(currency) {
        price_per_token.saturating_mul(quantity)
    } else {
        U256::ZERO
    }
}

/// Plain `claim(address,uint256)`.
#[derive(Debug, Clone)]
pub struct Erc721Claimable {
    core: Erc721Core,
}

impl Erc721Claimable {
    pub(crate) fn new(core: Erc721Core) -> Self {
        Self { core }
    }

    pub fn get_claim_transaction(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<TransactionCall> {
        ensure_quantity(quantity)?;
        let value = options.price_per_token.map_or(U256::ZERO, |price| {
            claim_value(
                options.currency.unwrap_or(NATIVE_TOKEN_ADDRESS),
                price,
                quantity,
            )
        });
        Ok(self.core.contract().prepare(
            &IClaimableERC721::claimCall {
                receiver: destination,
                quantity,
            },
            value,
        ))
    }

    pub async fn to(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let tx = self.get_claim_transaction(destination, quantity, options)?;
        let receipt = self.core.contract().send_prepared(tx).await?;
        let event = receipt
            .decode_events::<IClaimableERC721::TokensClaimed>()
            .into_iter()
            .next()
            .ok_or(SdkError::MissingEvent("TokensClaimed"))?;

        Ok(self
            .core
            .results_for_ids(&receipt, id_range(event.startTokenId, quantity)))
    }
}

/// Drop-style claim against the active claim condition.
#[derive(Debug, Clone)]
pub struct Erc721ClaimableWithConditions {
    core: Erc721Core,
    pub conditions: ClaimConditions,
}

impl Erc721ClaimableWithConditions {
    pub(crate) fn new(core: Erc721Core) -> Self {
        let conditions = ClaimConditions {
            contract: core.contract().clone(),
        };
        Self { core, conditions }
    }

    pub async fn get_claim_transaction(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<TransactionCall> {
        ensure_quantity(quantity)?;
        let active = self.conditions.get_active().await?;
        let price_per_token = options.price_per_token.unwrap_or(active.pricePerToken);
        let currency = options.currency.unwrap_or(active.currency);
        let allowlist_proof = options
            .allowlist_proof
            .clone()
            .unwrap_or_else(default_allowlist_proof);

        let value = claim_value(currency, price_per_token, quantity);
        tracing::debug!(
            target: "contractkit_erc721::claimable",
            destination = %destination,
            quantity = %quantity,
            currency = %currency,
            price_per_token = %price_per_token,
            value = %value,
            "Prepared claim"
        );

        Ok(self.core.contract().prepare(
            &IDrop::claimCall {
                receiver: destination,
                quantity,
                currency,
                pricePerToken: price_per_token,
                allowlistProof: allowlist_proof,
                data: Bytes::new(),
            },
            value,
        ))
    }

    pub async fn to(
        &self,
        destination: Address,
        quantity: U256,
        options: &ClaimOptions,
    ) -> Result<Vec<TransactionResultWithId<NftMetadataOwner>>> {
        let tx = self
            .get_claim_transaction(destination, quantity, options)
            .await?;
        let receipt = self.core.contract().send_prepared(tx).await?;
        let event = receipt
            .decode_events::<IDrop::TokensClaimed>()
            .into_iter()
            .next()
            .ok_or(SdkError::MissingEvent("TokensClaimed"))?;

        tracing::info!(
            target: "contractkit_erc721::claimable",
            start_token_id = %event.startTokenId,
            quantity = %event.quantityClaimed,
            receiver = %destination,
            "Claimed tokens"
        );
        Ok(self
            .core
            .results_for_ids(&receipt, id_range(event.startTokenId, quantity)))
    }
}

impl ClaimCondition {
    /// Tokens still claimable under this condition.
    pub fn available_supply(&self) -> U256 {
        self.maxClaimableSupply.saturating_sub(self.supplyClaimed)
    }
}

/// A claim phase to set on the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimConditionInput {
    /// Unix timestamp (seconds) at which the phase starts.
    pub start_time: u64,
    pub max_claimable_supply: U256,
    pub quantity_limit_per_wallet: U256,
    pub price: U256,
    pub currency: Address,
    pub merkle_root: B256,
    pub metadata: String,
}

impl Default for ClaimConditionInput {
    fn default() -> Self {
        Self {
            start_time: 0,
            max_claimable_supply: U256::MAX,
            quantity_limit_per_wallet: U256::MAX,
            price: U256::ZERO,
            currency: NATIVE_TOKEN_ADDRESS,
            merkle_root: B256::ZERO,
            metadata: String::new(),
        }
    }
}

impl From<ClaimConditionInput> for ClaimCondition {
    fn from(input: ClaimConditionInput) -> Self {
        Self {
            startTimestamp: U256::from(input.start_time),
            maxClaimableSupply: input.max_claimable_supply,
            supplyClaimed: U256::ZERO,
            quantityLimitPerWallet: input.quantity_limit_per_wallet,
            merkleRoot: input.merkle_root,
            pricePerToken: input.price,
            currency: input.currency,
            metadata: input.metadata,
        }
    }
}

/// Reads and writes the claim phases of a drop.
#[derive(Debug, Clone)]
pub struct ClaimConditions {
    contract: ContractWrapper,
}

impl ClaimConditions {
    pub async fn get_active_id(&self) -> Result<U256> {
        self.contract
            .read(&IDrop::getActiveClaimConditionIdCall {})
            .await
    }

    pub async fn get_by_id(&self, condition_id: U256) -> Result<ClaimCondition> {
        self.contract
            .read(&IDrop::getClaimConditionByIdCall {
                conditionId: condition_id,
            })
            .await
    }

    pub async fn get_active(&self) -> Result<ClaimCondition> {
        let id = self.get_active_id().await?;
        self.get_by_id(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<ClaimCondition>> {
        let phases = self.contract.read(&IDrop::claimConditionCall {}).await?;
        let start = phases.currentStartId.saturating_to::<u64>();
        let count = phases.count.saturating_to::<u64>();
        try_join_all((start..start.saturating_add(count)).map(|id| self.get_by_id(U256::from(id))))
            .await
    }

    /// Replace every phase. Phases are submitted ordered by start time.
    pub async fn set(
        &self,
        mut conditions: Vec<ClaimConditionInput>,
        reset_claim_eligibility: bool,
    ) -> Result<TransactionResult> {
        conditions.sort_by_key(|condition| condition.start_time);
        let phases: Vec<ClaimCondition> = conditions.into_iter().map(Into::into).collect();

        tracing::info!(
            target: "contractkit_erc721::claimable",
            address = %self.contract.address(),
            phases = phases.len(),
            reset_claim_eligibility,
            "Setting claim conditions"
        );
        let receipt = self
            .contract
            .send(&IDrop::setClaimConditionsCall {
                phases,
                resetClaimEligibility: reset_claim_eligibility,
            })
            .await?;
        Ok(TransactionResult { receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_value_only_for_native_currency() {
        let price = U256::from(10u64);
        let quantity = U256::from(3u64);
        assert_eq!(claim_value(NATIVE_TOKEN_ADDRESS, price, quantity), U256::from(30u64));
        assert_eq!(claim_value(Address::ZERO, price, quantity), U256::from(30u64));
        assert_eq!(
            claim_value(Address::repeat_byte(0x20), price, quantity),
            U256::ZERO
        );
    }

    #[test]
    fn test_default_allowlist_proof() {
        let proof = default_allowlist_proof();
        assert!(proof.proof.is_empty());
        assert_eq!(proof.quantityLimitPerWallet, U256::ZERO);
        assert_eq!(proof.pricePerToken, U256::MAX);
        assert_eq!(proof.currency, Address::ZERO);
    }

    #[test]
    fn test_condition_input_defaults_to_unlimited_free_phase() {
        let condition: ClaimCondition = ClaimConditionInput::default().into();
        assert_eq!(condition.maxClaimableSupply, U256::MAX);
        assert_eq!(condition.pricePerToken, U256::ZERO);
        assert_eq!(condition.currency, NATIVE_TOKEN_ADDRESS);
        assert_eq!(condition.available_supply(), U256::MAX);
    }
}
