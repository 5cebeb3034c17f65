//! Catalog fetcher: retrieves the complete inventory of the media server.
//!
//! Retrieval is two-phase: a `Limit=0` count query followed by strictly
//! sequential pages of [`PAGE_SIZE`] items. Any failure aborts the whole
//! fetch; a partial inventory is never returned.

use crate::models::catalog::RawCatalogItem;
use crate::Result;
use async_trait::async_trait;

/// Items requested per page.
pub const PAGE_SIZE: u64 = 2000;

/// Paged access to the media server inventory.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Total number of Movie/Series/Episode items.
    async fn total_record_count(&self) -> Result<u64>;

    /// One page of items starting at `start_index`.
    async fn fetch_page(&self, start_index: u64, limit: u64) -> Result<Vec<RawCatalogItem>>;
}

/// Outcome of a catalog fetch.
///
/// `Complete(vec![])` is a genuinely empty library; `Aborted` means nothing
/// can be concluded about the library and prior state must be kept.
#[must_use]
#[derive(Debug)]
pub enum FetchOutcome {
    Complete(Vec<RawCatalogItem>),
    Aborted { reason: String },
}

impl FetchOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchOutcome::Aborted { .. })
    }
}

/// Fetch the full inventory from `source`.
pub async fn fetch_catalog(source: &dyn CatalogSource) -> FetchOutcome {
    let total = match source.total_record_count().await {
        Ok(total) => total,
        Err(e) => {
            return FetchOutcome::Aborted {
                reason: format!("count query failed: {}", e),
            }
        }
    };

    if total == 0 {
        tracing::info!("Catalog is empty");
        return FetchOutcome::Complete(Vec::new());
    }

    tracing::debug!(total, "Fetching catalog");

    let mut items: Vec<RawCatalogItem> = Vec::with_capacity(total.min(50_000) as usize);
    let mut start_index = 0u64;

    while (items.len() as u64) < total {
        let page = match source.fetch_page(start_index, PAGE_SIZE).await {
            Ok(page) => page,
            Err(e) => {
                return FetchOutcome::Aborted {
                    reason: format!("page at StartIndex={} failed: {}", start_index, e),
                }
            }
        };

        let fetched = page.len() as u64;
        items.extend(page);
        tracing::debug!(start_index, fetched, so_far = items.len(), "Fetched catalog page");

        if fetched < PAGE_SIZE {
            break;
        }
        start_index += fetched;
    }

    if (items.len() as u64) < total {
        tracing::debug!(
            fetched = items.len(),
            total,
            "Catalog ended before the reported total"
        );
    }

    FetchOutcome::Complete(items)
}
