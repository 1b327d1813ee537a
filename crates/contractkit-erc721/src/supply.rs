//! Supply and enumeration queries.

use alloy_primitives::{Address, U256};
use contractkit::features::erc721::ENUMERABLE;
use contractkit::{Capability, QueryAllParams, Result};
use contractkit_common::NftMetadataOwner;
use futures::future::try_join_all;

use crate::abi::{IERC721Enumerable, IERC721Supply};
use crate::token::Erc721Core;

#[derive(Debug, Clone)]
pub struct Erc721Supply {
    core: Erc721Core,
    pub(crate) owned: Capability<Erc721Enumerable>,
}

impl Erc721Supply {
    pub(crate) fn new(core: Erc721Core) -> Self {
        let owned = Capability::detect(core.contract().interface(), &ENUMERABLE, || {
            Erc721Enumerable { core: core.clone() }
        });
        Self { core, owned }
    }

    /// Tokens in the requested window (default: the first 100), clamped to
    /// the number of minted tokens.
    pub async fn all(&self, params: Option<QueryAllParams>) -> Result<Vec<NftMetadataOwner>> {
        let params = params.unwrap_or_default();
        let total = self.core.next_token_id_to_mint().await?;
        let range = params.range(total.saturating_to::<u64>());

        tracing::debug!(
            target: "contractkit_erc721::supply",
            start = range.start,
            end = range.end,
            total = %total,
            "Fetching tokens"
        );

        try_join_all(range.map(|id| self.core.get(U256::from(id)))).await
    }

    pub async fn total_circulating_supply(&self) -> Result<U256> {
        self.core
            .contract()
            .read(&IERC721Supply::totalSupplyCall {})
            .await
    }

    pub fn owned(&self) -> Result<&Erc721Enumerable> {
        self.owned.get()
    }
}

/// Per-owner enumeration through `tokenOfOwnerByIndex`.
#[derive(Debug, Clone)]
pub struct Erc721Enumerable {
    core: Erc721Core,
}

impl Erc721Enumerable {
    /// Ids owned by `wallet`, or by the signer when `None`.
    pub async fn token_ids(&self, wallet: Option<Address>) -> Result<Vec<U256>> {
        let owner = match wallet {
            Some(wallet) => wallet,
            None => self.core.contract().signer_address().await?,
        };
        let balance = self.core.balance_of(owner).await?;
        let count = balance.saturating_to::<u64>();

        try_join_all((0..count).map(|index| async move {
            let call = IERC721Enumerable::tokenOfOwnerByIndexCall {
                owner,
                index: U256::from(index),
            };
            self.core.contract().read(&call).await
        }))
        .await
    }

    pub async fn all(&self, wallet: Option<Address>) -> Result<Vec<NftMetadataOwner>> {
        let ids = self.token_ids(wallet).await?;
        try_join_all(ids.into_iter().map(|id| self.core.get(id))).await
    }
}
