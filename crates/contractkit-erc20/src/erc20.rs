use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use contractkit::features::erc20::{BATCH_MINTABLE, BURNABLE, MINTABLE};
use contractkit::{
    Capability, ContractTransport, ContractWrapper, Result, SdkError, TransactionResult,
};

use crate::abi::IERC20;
use crate::burnable::Erc20Burnable;
use crate::currency::{Amount, Currency, CurrencyValue, TokenMintInput};
use crate::mintable::{Erc20BatchMintable, Erc20Mintable};
use crate::token::Erc20Core;

/// ERC20 facade.
///
/// Amounts are accepted either as decimal strings in whole tokens or as base
/// units; decimal amounts are scaled by the contract's `decimals()`.
#[derive(Debug, Clone)]
pub struct Erc20 {
    core: Erc20Core,
    mintable: Capability<Erc20Mintable>,
    burnable: Capability<Erc20Burnable>,
}

impl Erc20 {
    pub fn new(contract: ContractWrapper) -> Self {
        let core = Erc20Core::new(contract);
        let interface = core.contract().interface();
        let mintable = Capability::detect(interface, &MINTABLE, || Erc20Mintable::new(core.clone()));
        let burnable = Capability::detect(interface, &BURNABLE, || Erc20Burnable::new(core.clone()));

        tracing::debug!(
            target: "contractkit_erc20::erc20",
            address = %core.contract().address(),
            mintable = mintable.is_implemented(),
            burnable = burnable.is_implemented(),
            "Resolved ERC20 capabilities"
        );

        Self {
            core,
            mintable,
            burnable,
        }
    }

    pub fn on_network_updated(&self, transport: Arc<dyn ContractTransport>) {
        self.core.contract().update_transport(transport);
    }

    pub fn address(&self) -> Address {
        self.core.contract().address()
    }

    fn contract(&self) -> &ContractWrapper {
        self.core.contract()
    }

    pub async fn get(&self) -> Result<Currency> {
        self.core.currency().await
    }

    /// Balance of the connected wallet.
    pub async fn balance(&self) -> Result<CurrencyValue> {
        let signer = self.contract().signer_address().await?;
        self.balance_of(signer).await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<CurrencyValue> {
        self.core.balance_of(owner).await
    }

    pub async fn total_supply(&self) -> Result<CurrencyValue> {
        let supply = self.contract().read(&IERC20::totalSupplyCall {}).await?;
        self.core.value_of(supply).await
    }

    /// How much `spender` may spend from the connected wallet.
    pub async fn allowance(&self, spender: Address) -> Result<CurrencyValue> {
        let owner = self.contract().signer_address().await?;
        self.allowance_of(owner, spender).await
    }

    pub async fn allowance_of(&self, owner: Address, spender: Address) -> Result<CurrencyValue> {
        let allowance = self
            .contract()
            .read(&IERC20::allowanceCall { owner, spender })
            .await?;
        self.core.value_of(allowance).await
    }

    pub async fn normalize_amount(&self, amount: impl Into<Amount>) -> Result<U256> {
        self.core.normalize_amount(&amount.into()).await
    }

    pub async fn transfer(&self, to: Address, amount: impl Into<Amount>) -> Result<TransactionResult> {
        let amount = self.normalize_amount(amount).await?;
        let receipt = self
            .contract()
            .send(&IERC20::transferCall { to, amount })
            .await?;
        Ok(TransactionResult { receipt })
    }

    /// Move tokens out of `from` using the connected wallet's allowance.
    pub async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: impl Into<Amount>,
    ) -> Result<TransactionResult> {
        let amount = self.normalize_amount(amount).await?;
        let receipt = self
            .contract()
            .send(&IERC20::transferFromCall { from, to, amount })
            .await?;
        Ok(TransactionResult { receipt })
    }

    pub async fn set_allowance(
        &self,
        spender: Address,
        amount: impl Into<Amount>,
    ) -> Result<TransactionResult> {
        let amount = self.normalize_amount(amount).await?;
        let receipt = self
            .contract()
            .send(&IERC20::approveCall { spender, amount })
            .await?;
        Ok(TransactionResult { receipt })
    }

    /// Several transfers from the connected wallet in one multicall.
    pub async fn transfer_batch(&self, transfers: &[TokenMintInput]) -> Result<TransactionResult> {
        let decimals = self.core.decimals().await?;
        let calls = transfers
            .iter()
            .map(|transfer| {
                let amount = transfer.amount.to_base_units(decimals)?;
                Ok(ContractWrapper::encode(&IERC20::transferCall {
                    to: transfer.to_address,
                    amount,
                }))
            })
            .collect::<Result<Vec<Bytes>>>()?;

        let receipt = self.contract().multicall(calls).await?;
        Ok(TransactionResult { receipt })
    }

    // Mintable

    pub async fn mint(&self, amount: impl Into<Amount>) -> Result<TransactionResult> {
        let mintable = self.mintable.get()?;
        let receiver = self.contract().signer_address().await?;
        mintable.to(receiver, &amount.into()).await
    }

    pub async fn mint_to(
        &self,
        receiver: Address,
        amount: impl Into<Amount>,
    ) -> Result<TransactionResult> {
        self.mintable.get()?.to(receiver, &amount.into()).await
    }

    fn batch_mintable(&self) -> Result<&Erc20BatchMintable> {
        self.mintable
            .as_option()
            .and_then(|mintable| mintable.batch.as_option())
            .ok_or(SdkError::ExtensionNotImplemented(BATCH_MINTABLE.name))
    }

    pub async fn mint_batch_to(&self, inputs: &[TokenMintInput]) -> Result<TransactionResult> {
        self.batch_mintable()?.to(inputs).await
    }

    // Burnable

    pub async fn burn(&self, amount: impl Into<Amount>) -> Result<TransactionResult> {
        self.burnable.get()?.tokens(&amount.into()).await
    }

    pub async fn burn_from(
        &self,
        holder: Address,
        amount: impl Into<Amount>,
    ) -> Result<TransactionResult> {
        self.burnable.get()?.from(holder, &amount.into()).await
    }
}
