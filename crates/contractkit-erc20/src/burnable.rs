use alloy_primitives::Address;
use contractkit::{Result, TransactionResult};

use crate::abi::IBurnableERC20;
use crate::currency::Amount;
use crate::token::Erc20Core;

#[derive(Debug, Clone)]
pub struct Erc20Burnable {
    core: Erc20Core,
}

impl Erc20Burnable {
    pub(crate) fn new(core: Erc20Core) -> Self {
        Self { core }
    }

    /// Burn tokens held by the connected wallet.
    pub async fn tokens(&self, amount: &Amount) -> Result<TransactionResult> {
        let amount = self.core.normalize_amount(amount).await?;
        let receipt = self
            .core
            .contract()
            .send(&IBurnableERC20::burnCall { amount })
            .await?;
        Ok(TransactionResult { receipt })
    }

    /// Burn tokens held by `holder`. Requires an allowance.
    pub async fn from(&self, holder: Address, amount: &Amount) -> Result<TransactionResult> {
        let amount = self.core.normalize_amount(amount).await?;
        let receipt = self
            .core
            .contract()
            .send(&IBurnableERC20::burnFromCall {
                account: holder,
                amount,
            })
            .await?;
        Ok(TransactionResult { receipt })
    }
}
