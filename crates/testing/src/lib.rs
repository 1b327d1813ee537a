//! Test utilities for contractkit.
//!
//! - [`MockTransport`]: answers reads from canned responses and records every
//!   read and transaction. Nothing touches a network.
//! - [`MemoryStorage`]: content storage backed by a map.

mod storage;
mod transport;

pub use storage::MemoryStorage;
pub use transport::{MockTransport, MOCK_CHAIN_ID};
