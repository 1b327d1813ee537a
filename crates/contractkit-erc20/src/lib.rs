//! ERC20 support for contractkit
//!
//! [`Erc20`] wraps the standard token interface and exposes the optional
//! [`Erc20Mintable`], [`Erc20BatchMintable`] and [`Erc20Burnable`] extensions
//! when the contract declares them.
//!
//! # Example
//!
//! ```rust,ignore
//! use contractkit::{ContractInterface, ContractWrapper};
//! use contractkit_erc20::Erc20;
//!
//! let token = Erc20::new(ContractWrapper::new(address, interface, transport));
//! let balance = token.balance().await?;
//! println!("{} {}", balance.display_value, balance.currency.symbol);
//! token.transfer(recipient, "1.5").await?;
//! ```

pub mod abi;
pub mod burnable;
pub mod currency;
pub mod erc20;
pub mod mintable;
pub mod token;

pub use burnable::Erc20Burnable;
pub use currency::{display_amount, Amount, Currency, CurrencyValue, TokenMintInput};
pub use erc20::Erc20;
pub use mintable::{Erc20BatchMintable, Erc20Mintable};
pub use token::Erc20Core;
