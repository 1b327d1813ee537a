//! ERC721 support for contractkit
//!
//! [`Erc721`] composes the capability classes a contract declares:
//!
//! - [`Erc721Supply`] / [`Erc721Enumerable`]: paged and per-owner queries
//! - [`Erc721Mintable`] / [`Erc721BatchMintable`]: `mintTo`, alone or batched
//! - [`Erc721Burnable`]
//! - [`Erc721LazyMintable`]: lazy mint, with plain or condition-checked claims
//!   and [`DelayedReveal`]
//! - [`Erc721SignatureMintable`]: EIP-712 signed mint requests
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use contractkit::{ContractInterface, ContractWrapper, ProviderTransport, GasSettings};
//! use contractkit_common::{IpfsStorage, DEFAULT_IPFS_API, DEFAULT_IPFS_GATEWAY};
//! use contractkit_erc721::Erc721;
//!
//! let transport = Arc::new(ProviderTransport::read_only(rpc_url, GasSettings::default())?);
//! let interface = ContractInterface::from_abi_json(&abi_json)?;
//! let nft = Erc721::new(
//!     ContractWrapper::new(address, interface, transport),
//!     Arc::new(IpfsStorage::new(DEFAULT_IPFS_API, DEFAULT_IPFS_GATEWAY)?),
//! );
//! let first_page = nft.get_all(None).await?;
//! ```

pub mod abi;
pub mod burnable;
pub mod claimable;
pub mod erc721;
pub mod lazy_mintable;
pub mod mintable;
pub mod revealable;
pub mod signature_mintable;
pub mod supply;
pub mod token;

pub use burnable::Erc721Burnable;
pub use claimable::{
    default_allowlist_proof, ClaimConditionInput, ClaimConditions, ClaimOptions, Erc721Claimable,
    Erc721ClaimableWithConditions,
};
pub use erc721::Erc721;
pub use lazy_mintable::Erc721LazyMintable;
pub use mintable::{Erc721BatchMintable, Erc721Mintable};
pub use revealable::{hash_delay_reveal_password, BatchToReveal, DelayedReveal};
pub use signature_mintable::{
    signature_mint_domain, Erc721SignatureMintable, PayloadToSign, SignedPayload,
};
pub use supply::{Erc721Enumerable, Erc721Supply};
pub use token::Erc721Core;
