//! User request model.

use crate::models::library::LibraryKey;
use crate::models::media::MediaKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
}

impl RequestStatus {
    /// Pending and processing requests are still waiting on the library.
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Processing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "待处理",
            RequestStatus::Processing => "处理中",
            RequestStatus::Completed => "已完成",
            RequestStatus::Rejected => "已拒绝",
        }
    }
}

/// A user's request for a title to be added to the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub id: String,
    pub tmdb_id: String,
    pub media_type: MediaKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub status: RequestStatus,
    pub requested_by: String,
    pub request_date: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    /// Create a new pending request.
    pub fn new(
        tmdb_id: impl Into<String>,
        media_type: MediaKind,
        title: impl Into<String>,
        requested_by: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tmdb_id: tmdb_id.into(),
            media_type,
            title: title.into(),
            poster_path: None,
            status: RequestStatus::Pending,
            requested_by: requested_by.into(),
            request_date: Utc::now(),
            completed_at: None,
        }
    }

    /// Membership key of the requested title.
    pub fn library_key(&self) -> LibraryKey {
        LibraryKey::title(self.media_type, self.tmdb_id.clone())
    }
}
