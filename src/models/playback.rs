//! Playback statistics and report models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content a playback record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackItemType {
    Movie,
    Episode,
}

/// One user's last playback of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRecord {
    pub user_id: String,
    pub user_name: String,
    pub item_id: String,
    pub item_name: String,
    pub item_type: PlaybackItemType,
    pub series_name: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub playback_date: DateTime<Utc>,
    /// Seconds.
    pub played_duration: f64,
    /// Seconds.
    pub total_duration: f64,
    pub played_percentage: f64,
}

/// Per-user aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: String,
    pub user_name: String,
    pub total_play_count: u32,
    /// Seconds.
    pub total_duration: f64,
    pub movie_count: u32,
    pub episode_count: u32,
}

/// Per-content aggregate. Shows are keyed by series name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    /// Movie item id, or the first episode id seen for a show.
    pub item_id: String,
    pub item_name: String,
    pub item_type: String,
    pub play_count: u32,
    pub unique_viewers: u32,
}

/// Report window kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
}

/// Playback report for a time window. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackReport {
    pub kind: ReportKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub total_plays: u32,
    /// Seconds.
    pub total_duration: f64,
    pub active_users: u32,
    pub top_users: Vec<UserStats>,
    pub top_movies: Vec<ContentStats>,
    pub top_shows: Vec<ContentStats>,
    pub recent_plays: Vec<PlaybackRecord>,
}
