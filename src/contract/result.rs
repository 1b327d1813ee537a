use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;

use super::TransactionReceipt;
use crate::error::Result;

/// Outcome of a write that produced no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub receipt: TransactionReceipt,
}

/// Looks up the full record behind an identifier emitted by a write.
#[async_trait]
pub trait ResolveById<T>: Send + Sync {
    async fn resolve(&self, id: U256) -> Result<T>;
}

/// Outcome of a write that produced an identifier (a token id).
///
/// The associated record is only fetched when [`data`](Self::data) is awaited.
pub struct TransactionResultWithId<T> {
    pub receipt: TransactionReceipt,
    pub id: U256,
    resolver: Arc<dyn ResolveById<T>>,
}

impl<T> TransactionResultWithId<T> {
    pub fn new(receipt: TransactionReceipt, id: U256, resolver: Arc<dyn ResolveById<T>>) -> Self {
        Self {
            receipt,
            id,
            resolver,
        }
    }

    pub async fn data(&self) -> Result<T> {
        self.resolver.resolve(self.id).await
    }
}

impl<T> Clone for TransactionResultWithId<T> {
    fn clone(&self) -> Self {
        Self {
            receipt: self.receipt.clone(),
            id: self.id,
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for TransactionResultWithId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionResultWithId")
            .field("receipt", &self.receipt)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    #[async_trait]
    impl ResolveById<String> for Counting {
        async fn resolve(&self, id: U256) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("token #{id}"))
        }
    }

    #[tokio::test]
    async fn test_data_is_fetched_on_demand() {
        let resolver = Arc::new(Counting(AtomicUsize::new(0)));
        let result = TransactionResultWithId::new(
            TransactionReceipt::default(),
            U256::from(3u64),
            resolver.clone(),
        );
        assert_eq!(resolver.0.load(Ordering::SeqCst), 0);

        assert_eq!(result.data().await.unwrap(), "token #3");
        assert_eq!(resolver.0.load(Ordering::SeqCst), 1);
    }
}
