use alloy_primitives::U256;
use contractkit::{ContractWrapper, Result, TransactionResult};

use crate::abi::IBurnableERC721;

#[derive(Debug, Clone)]
pub struct Erc721Burnable {
    contract: ContractWrapper,
}

impl Erc721Burnable {
    pub(crate) fn new(contract: ContractWrapper) -> Self {
        Self { contract }
    }

    pub async fn token(&self, token_id: U256) -> Result<TransactionResult> {
        let receipt = self
            .contract
            .send(&IBurnableERC721::burnCall { tokenId: token_id })
            .await?;
        Ok(TransactionResult { receipt })
    }
}
