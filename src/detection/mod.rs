//! Static capability detection over a contract's declared interface.

pub mod features;
mod fingerprint;
mod interface;

pub use fingerprint::{detect_contract_feature, detect_features, Fingerprint};
pub use interface::ContractInterface;
