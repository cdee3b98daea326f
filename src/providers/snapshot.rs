use crate::core::feed::FeedError;
use crate::core::rates::{RateTable, RateTableProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Serves one rate table, fetched when the provider is loaded, for the rest
/// of the process lifetime.
#[derive(Clone)]
pub struct SnapshotProvider {
    table: Arc<RateTable>,
}

impl SnapshotProvider {
    /// Fetches a table from `inner` once. A failed fetch leaves no snapshot.
    pub async fn load(inner: &dyn RateTableProvider) -> Result<Self, FeedError> {
        let table = inner.fetch_table().await?;
        info!(
            currencies = table.len(),
            as_of = ?table.as_of(),
            "Loaded rate snapshot"
        );
        Ok(Self { table })
    }

    pub fn from_table(table: RateTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

#[async_trait]
impl RateTableProvider for SnapshotProvider {
    async fn fetch_table(&self) -> Result<Arc<RateTable>, FeedError> {
        debug!("Serving rate snapshot");
        Ok(Arc::clone(&self.table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockInnerProvider {
        call_count: AtomicUsize,
        fail: bool,
    }

    impl MockInnerProvider {
        fn new(fail: bool) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl RateTableProvider for MockInnerProvider {
        async fn fetch_table(&self) -> Result<Arc<RateTable>, FeedError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FeedError::Transport("connection refused".to_string()));
            }
            RateTable::new("RUB", vec![RateEntry::new("USD", 90.0)], None).map(Arc::new)
        }
    }

    #[tokio::test]
    async fn test_snapshot_fetches_once() {
        let inner = MockInnerProvider::new(false);
        let snapshot = SnapshotProvider::load(&inner).await.unwrap();
        assert_eq!(inner.call_count.load(Ordering::SeqCst), 1);

        let first = snapshot.fetch_table().await.unwrap();
        let second = snapshot.fetch_table().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.lookup("USD"), Some(90.0));
        assert_eq!(inner.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_snapshot_load_propagates_feed_error() {
        let inner = MockInnerProvider::new(true);
        let result = SnapshotProvider::load(&inner).await;
        assert!(matches!(result, Err(FeedError::Transport(_))));
    }
}
