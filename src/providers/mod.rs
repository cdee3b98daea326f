pub mod cbr;
pub mod snapshot;

use crate::core::config::{AppConfig, RefreshPolicy};
use crate::core::rates::RateTableProvider;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the provider the server hands to its handlers. With
/// [`RefreshPolicy::Startup`] the feed is fetched here, before returning.
pub async fn build_provider(
    config: &AppConfig,
    refresh: RefreshPolicy,
) -> Result<Arc<dyn RateTableProvider>> {
    let cbr = cbr::CbrProvider::new(&config.cbr(), &config.base_currency)?;
    match refresh {
        RefreshPolicy::PerRequest => Ok(Arc::new(cbr)),
        RefreshPolicy::Startup => {
            let snapshot = snapshot::SnapshotProvider::load(&cbr)
                .await
                .context("Failed to load rate snapshot at startup")?;
            Ok(Arc::new(snapshot))
        }
    }
}
