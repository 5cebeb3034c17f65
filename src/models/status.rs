//! Derived availability status of a title.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Released,
    Streaming,
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaStatus::Pending => write!(f, "pending"),
            MediaStatus::Released => write!(f, "released"),
            MediaStatus::Streaming => write!(f, "streaming"),
        }
    }
}

/// Best release date per release type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDateSet {
    pub theatrical: Option<NaiveDate>,
    pub digital: Option<NaiveDate>,
    pub physical: Option<NaiveDate>,
}

/// Result of resolving one title. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStatusResolution {
    pub status: MediaStatus,
    pub badge_label: String,
    pub badge_color_class: Option<String>,
    pub platform: Option<String>,
    pub provider_region: Option<String>,
    /// Display date or progress string.
    pub release_date: String,
    pub release_dates: ReleaseDateSet,
}
