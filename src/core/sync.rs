//! Sync engine: one fetch → index → diff → notify → reconcile cycle, and
//! the timer loop that drives it.

use crate::core::diff::diff_indexes;
use crate::core::enrich::{enrich_items, group_added, TitleDetailSource};
use crate::core::fetcher::{fetch_catalog, CatalogSource, FetchOutcome};
use crate::core::indexer::build_index;
use crate::core::notify::{dispatch, Notification, NotificationKind, Notifier};
use crate::core::reconciler::{notify_completed, reconcile_requests};
use crate::core::repository::LibraryRepository;
use crate::core::store::StateStore;
use crate::models::library::LibraryDiff;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Name used as requester on automatic notifications.
pub const AUTO_SCAN_REQUESTER: &str = "system";

/// Per-title limit on metadata lookups during a cycle.
pub const DEFAULT_DETAIL_TIMEOUT: Duration = Duration::from_secs(30);

/// Shortest period the scheduler accepts.
pub const MIN_SCHEDULE_PERIOD: Duration = Duration::from_secs(1);

/// Counts from one successful cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub total_keys: usize,
    pub added: usize,
    pub removed: usize,
    /// First sync: added notifications were suppressed.
    pub initial: bool,
    pub added_notifications: usize,
    pub completed_requests: usize,
    pub completion_notifications: usize,
}

/// Result of [`SyncEngine::run_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncSummary),
    /// Another cycle was already running.
    Skipped,
    /// The cycle stopped early; stored state is unchanged where it matters.
    Failed { reason: String },
}

/// Last known sync state, for status display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Never,
    Succeeded { at: DateTime<Utc>, keys: usize },
    Failed { at: DateTime<Utc>, reason: String },
}

/// Clears the in-flight flag when the cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Library synchronization engine.
pub struct SyncEngine {
    catalog: Arc<dyn CatalogSource>,
    details: Option<Arc<dyn TitleDetailSource>>,
    detail_timeout: Duration,
    notifier: Arc<dyn Notifier>,
    store: Arc<StateStore>,
    library: LibraryRepository,
    in_flight: AtomicBool,
    last_status: RwLock<SyncStatus>,
}

impl SyncEngine {
    /// Create an engine over `store`, loading the persisted library index.
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<StateStore>,
    ) -> Result<Self> {
        let library = LibraryRepository::open(store.clone())?;
        Ok(Self {
            catalog,
            details: None,
            detail_timeout: DEFAULT_DETAIL_TIMEOUT,
            notifier,
            store,
            library,
            in_flight: AtomicBool::new(false),
            last_status: RwLock::new(SyncStatus::Never),
        })
    }

    /// Enrich added titles with metadata before notifying.
    pub fn with_details(mut self, details: Arc<dyn TitleDetailSource>) -> Self {
        self.details = Some(details);
        self
    }

    /// Give up on a title's metadata after `timeout`.
    pub fn with_detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    pub fn library(&self) -> &LibraryRepository {
        &self.library
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn last_status(&self) -> SyncStatus {
        self.last_status.read().await.clone()
    }

    /// Run one sync cycle unless one is already in flight.
    pub async fn run_cycle(&self) -> SyncOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Library sync already running, skipping");
            return SyncOutcome::Skipped;
        };

        tracing::info!("Library sync started");
        match self.sync_once().await {
            Ok(summary) => {
                tracing::info!(
                    keys = summary.total_keys,
                    added = summary.added,
                    removed = summary.removed,
                    initial = summary.initial,
                    completed_requests = summary.completed_requests,
                    "Library sync finished"
                );
                *self.last_status.write().await = SyncStatus::Succeeded {
                    at: Utc::now(),
                    keys: summary.total_keys,
                };
                SyncOutcome::Completed(summary)
            }
            Err(e) => {
                tracing::warn!("Library sync failed: {}", e);
                let reason = e.to_string();
                *self.last_status.write().await = SyncStatus::Failed {
                    at: Utc::now(),
                    reason: reason.clone(),
                };
                SyncOutcome::Failed { reason }
            }
        }
    }

    async fn sync_once(&self) -> Result<SyncSummary> {
        let items = match fetch_catalog(self.catalog.as_ref()).await {
            FetchOutcome::Complete(items) => items,
            FetchOutcome::Aborted { reason } => return Err(Error::FetchAborted(reason)),
        };

        let index = build_index(&items);
        let previous = self.library.current().await;
        let diff = diff_indexes(previous.as_ref(), &index);
        let total_keys = index.len();

        self.library.replace(index.clone()).await?;

        if !diff.removed.is_empty() {
            tracing::info!(removed = diff.removed.len(), "Keys left the library");
            tracing::debug!(keys = ?diff.removed, "Removed keys");
        }
        if diff.initial {
            tracing::info!(keys = total_keys, "Initial library sync, not announcing additions");
        }

        let added_notifications = self.announce_added(&diff).await;

        let mut requests = self.store.requests()?;
        let completed = reconcile_requests(&mut requests, &index, Utc::now());
        if !completed.is_empty() {
            self.store.set_requests(&requests)?;
        }
        let completion_notifications = notify_completed(self.notifier.as_ref(), &completed).await;

        Ok(SyncSummary {
            total_keys,
            added: diff.added.len(),
            removed: diff.removed.len(),
            initial: diff.initial,
            added_notifications,
            completed_requests: completed.len(),
            completion_notifications,
        })
    }

    async fn announce_added(&self, diff: &LibraryDiff) -> usize {
        if diff.added.is_empty() {
            return 0;
        }

        let mut items = group_added(&diff.added);
        if let Some(details) = &self.details {
            items = enrich_items(details.as_ref(), items, self.detail_timeout).await;
        }

        let mut delivered = 0;
        for item in items {
            let notification = Notification {
                kind: NotificationKind::AutoScan,
                item,
                requested_by: AUTO_SCAN_REQUESTER.to_string(),
                poster_override: None,
            };
            if dispatch(self.notifier.as_ref(), &notification).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Run a cycle every `period` until `cancel` fires.
    ///
    /// The first cycle starts immediately. A cycle in progress when `cancel`
    /// fires runs to completion; missed ticks are skipped. Periods below
    /// [`MIN_SCHEDULE_PERIOD`] are raised to it.
    pub async fn run_scheduled(&self, period: Duration, cancel: CancellationToken) {
        let period = period.max(MIN_SCHEDULE_PERIOD);
        tracing::info!(period_secs = period.as_secs(), "Library sync scheduler started");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Library sync scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let SyncOutcome::Failed { reason } = self.run_cycle().await {
                        tracing::debug!("Keeping last good index after failure: {}", reason);
                    }
                }
            }
        }
    }
}

/// Spawn the scheduler on the runtime.
pub fn spawn_scheduler(
    engine: Arc<SyncEngine>,
    period: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { engine.run_scheduled(period, cancel).await })
}
