use alloy_primitives::{Address, U256};
use contractkit::{ContractWrapper, Result};

use crate::abi::IERC20;
use crate::currency::{Amount, Currency, CurrencyValue};

/// Reads shared by the facade and its capability classes.
#[derive(Debug, Clone)]
pub struct Erc20Core {
    contract: ContractWrapper,
}

impl Erc20Core {
    pub fn new(contract: ContractWrapper) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &ContractWrapper {
        &self.contract
    }

    pub async fn decimals(&self) -> Result<u8> {
        self.contract.read(&IERC20::decimalsCall {}).await
    }

    pub async fn currency(&self) -> Result<Currency> {
        let (name, symbol, decimals) = futures::try_join!(
            self.contract.read(&IERC20::nameCall {}),
            self.contract.read(&IERC20::symbolCall {}),
            self.decimals(),
        )?;
        Ok(Currency {
            name,
            symbol,
            decimals,
        })
    }

    pub async fn value_of(&self, value: U256) -> Result<CurrencyValue> {
        Ok(CurrencyValue::new(self.currency().await?, value))
    }

    pub async fn balance_of(&self, owner: Address) -> Result<CurrencyValue> {
        let balance = self
            .contract
            .read(&IERC20::balanceOfCall { account: owner })
            .await?;
        self.value_of(balance).await
    }

    /// Base units of `amount`. Decimal amounts read `decimals()` first.
    pub async fn normalize_amount(&self, amount: &Amount) -> Result<U256> {
        match amount {
            Amount::BaseUnits(value) => Ok(*value),
            Amount::Display(_) => amount.to_base_units(self.decimals().await?),
        }
    }
}
