//! contractkit - typed access to ERC token contracts.
//!
//! A [`ContractWrapper`] binds an address and its declared interface to a
//! replaceable transport. Token facades (see the `contractkit-erc721` and
//! `contractkit-erc20` crates) run feature detection once at construction and
//! hold each optional extension as a [`Capability`].

pub mod addresses;
pub mod capability;
pub mod contract;
pub mod detection;
pub mod error;
pub mod options;
pub mod query;

// Re-export commonly used types for facade crates
pub use async_trait::async_trait;

pub use addresses::{
    is_native_token, AddressBook, ChainId, ContractAddresses, ContractName, NATIVE_TOKEN_ADDRESS,
};
pub use capability::Capability;
pub use contract::{
    ContractTransport, ContractWrapper, ProviderTransport, ReceiptLog, ResolveById,
    TransactionCall, TransactionReceipt, TransactionResult, TransactionResultWithId,
};
pub use detection::{
    detect_contract_feature, detect_features, features, ContractInterface, Fingerprint,
};
pub use error::{Result, SdkError, TransportError};
pub use options::{GasSettings, GasSpeed, GaslessSettings, SdkOptions, SdkOptionsInput};
pub use query::{QueryAllParams, DEFAULT_QUERY_ALL_COUNT};
