use alloy_primitives::{Address, Bytes};
use contractkit::features::erc20::BATCH_MINTABLE;
use contractkit::{Capability, ContractWrapper, Result, TransactionResult};

use crate::abi::IMintableERC20;
use crate::currency::{Amount, TokenMintInput};
use crate::token::Erc20Core;

/// `mintTo(address,uint256)`.
#[derive(Debug, Clone)]
pub struct Erc20Mintable {
    core: Erc20Core,
    pub(crate) batch: Capability<Erc20BatchMintable>,
}

impl Erc20Mintable {
    pub(crate) fn new(core: Erc20Core) -> Self {
        let batch = Capability::detect(core.contract().interface(), &BATCH_MINTABLE, || {
            Erc20BatchMintable { core: core.clone() }
        });
        Self { core, batch }
    }

    pub async fn to(&self, receiver: Address, amount: &Amount) -> Result<TransactionResult> {
        let amount = self.core.normalize_amount(amount).await?;
        let receipt = self
            .core
            .contract()
            .send(&IMintableERC20::mintToCall {
                to: receiver,
                amount,
            })
            .await?;

        tracing::info!(
            target: "contractkit_erc20::mintable",
            receiver = %receiver,
            amount = %amount,
            "Minted tokens"
        );
        Ok(TransactionResult { receipt })
    }

    pub fn batch(&self) -> Result<&Erc20BatchMintable> {
        self.batch.get()
    }
}

/// Several `mintTo` calls in one multicall transaction.
#[derive(Debug, Clone)]
pub struct Erc20BatchMintable {
    core: Erc20Core,
}

impl Erc20BatchMintable {
    pub async fn to(&self, inputs: &[TokenMintInput]) -> Result<TransactionResult> {
        let decimals = self.core.decimals().await?;
        let calls = inputs
            .iter()
            .map(|input| {
                let amount = input.amount.to_base_units(decimals)?;
                Ok(ContractWrapper::encode(&IMintableERC20::mintToCall {
                    to: input.to_address,
                    amount,
                }))
            })
            .collect::<Result<Vec<Bytes>>>()?;

        let receipt = self.core.contract().multicall(calls).await?;
        Ok(TransactionResult { receipt })
    }
}
