//! Notification boundary.
//!
//! The engine decides when to notify and with what payload; delivery is
//! behind the [`Notifier`] trait.

use crate::models::media::MediaKind;
use crate::models::request::PendingRequest;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest a single delivery may take before it counts as failed.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a notification is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user submitted a request.
    Request,
    /// A request was fulfilled by the library.
    Completed,
    /// A sync cycle found new content.
    AutoScan,
}

/// Season/episode pair newly present in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

/// Title payload of a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifiedItem {
    pub kind: MediaKind,
    pub tmdb_id: String,
    pub title: String,
    pub year: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// Only set for series that gained episodes.
    #[serde(default)]
    pub new_episodes: Vec<EpisodeRef>,
}

impl NotifiedItem {
    /// Item with no metadata beyond its identity.
    pub fn bare(kind: MediaKind, tmdb_id: impl Into<String>) -> Self {
        let tmdb_id = tmdb_id.into();
        Self {
            kind,
            title: format!("TMDB {}", tmdb_id),
            tmdb_id,
            year: None,
            overview: None,
            poster_path: None,
            new_episodes: Vec::new(),
        }
    }

    pub fn from_request(request: &PendingRequest) -> Self {
        let mut item = Self::bare(request.media_type, request.tmdb_id.clone());
        if !request.title.is_empty() {
            item.title = request.title.clone();
        }
        item.poster_path = request.poster_path.clone();
        item
    }

    /// Public TMDB page of the title.
    pub fn tmdb_url(&self) -> String {
        format!("https://www.themoviedb.org/{}/{}", self.kind, self.tmdb_id)
    }
}

/// A notification to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub item: NotifiedItem,
    pub requested_by: String,
    /// Absolute poster URL overriding the item's poster.
    pub poster_override: Option<String>,
}

/// Delivery channel for notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Deliver a notification, logging and swallowing any failure.
pub async fn dispatch(notifier: &dyn Notifier, notification: &Notification) -> bool {
    let delivery = tokio::time::timeout(DELIVERY_TIMEOUT, notifier.notify(notification))
        .await
        .unwrap_or_else(|_| Err(crate::Error::NotificationFailed("timed out".to_string())));
    match delivery {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                kind = ?notification.kind,
                tmdb_id = %notification.item.tmdb_id,
                "Notification failed: {}",
                e
            );
            false
        }
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            kind = ?notification.kind,
            title = %notification.item.title,
            requested_by = %notification.requested_by,
            "Notification"
        );
        Ok(())
    }
}
