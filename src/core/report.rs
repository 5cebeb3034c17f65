//! Playback report aggregation.
//!
//! Rolls each user's recently played items up into per-user and per-content
//! statistics for a time window. Shows are keyed by series name, so two
//! different shows with the same display name are counted together.

use crate::models::catalog::{CatalogItemType, PlayedItem, ServerUser};
use crate::models::playback::{
    ContentStats, PlaybackItemType, PlaybackRecord, PlaybackReport, ReportKind, UserStats,
};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::{BTreeMap, HashSet};

/// Played items fetched per user.
pub const RECENT_ITEMS_PER_USER: u32 = 100;

const TOP_USERS: usize = 10;
const TOP_MOVIES: usize = 5;
const TOP_SHOWS: usize = 5;
const RECENT_PLAYS: usize = 20;

/// Media server ticks are 100ns.
const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Access to users and their playback history.
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    async fn list_users(&self) -> Result<Vec<ServerUser>>;

    /// Most recently played items of a user, newest first.
    async fn recently_played(&self, user_id: &str, limit: u32) -> Result<Vec<PlayedItem>>;
}

/// Convert a played item into a record. Items without a last-played date or
/// of another type are dropped.
pub fn to_record(user: &ServerUser, item: &PlayedItem) -> Option<PlaybackRecord> {
    let item_type = match item.item_type {
        CatalogItemType::Movie => PlaybackItemType::Movie,
        CatalogItemType::Episode => PlaybackItemType::Episode,
        _ => return None,
    };
    let user_data = item.user_data.as_ref()?;
    let playback_date = user_data.last_played_date?;

    Some(PlaybackRecord {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        item_type,
        series_name: item.series_name.clone(),
        season_number: item.parent_index_number,
        episode_number: item.index_number,
        playback_date,
        played_duration: user_data.playback_position_ticks.unwrap_or(0) as f64 / TICKS_PER_SECOND,
        total_duration: item.run_time_ticks.unwrap_or(0) as f64 / TICKS_PER_SECOND,
        played_percentage: user_data
            .played_percentage
            .unwrap_or(if user_data.played { 100.0 } else { 0.0 }),
    })
}

/// Collect every user's playback records inside `[start, end]`.
///
/// A failure listing users fails the whole collection; a failure for a
/// single user is logged and that user is skipped.
pub async fn collect_playback(
    source: &dyn PlaybackSource,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<PlaybackRecord>> {
    let users = source.list_users().await?;
    let mut records = Vec::new();

    for user in &users {
        let items = match source.recently_played(&user.id, RECENT_ITEMS_PER_USER).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(user = %user.name, "Failed to fetch playback history: {}", e);
                continue;
            }
        };

        records.extend(
            items
                .iter()
                .filter_map(|item| to_record(user, item))
                .filter(|r| r.playback_date >= start && r.playback_date <= end),
        );
    }

    tracing::debug!(users = users.len(), records = records.len(), "Collected playback");
    Ok(records)
}

/// Build the report for an already filtered record set.
pub fn aggregate(
    kind: ReportKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    records: &[PlaybackRecord],
    generated_at: DateTime<Utc>,
) -> PlaybackReport {
    let mut users: BTreeMap<&str, UserStats> = BTreeMap::new();
    let mut movies: BTreeMap<&str, ContentStats> = BTreeMap::new();
    let mut shows: BTreeMap<&str, ContentStats> = BTreeMap::new();

    for r in records {
        let stats = users.entry(r.user_id.as_str()).or_insert_with(|| UserStats {
            user_id: r.user_id.clone(),
            user_name: r.user_name.clone(),
            total_play_count: 0,
            total_duration: 0.0,
            movie_count: 0,
            episode_count: 0,
        });
        stats.total_play_count += 1;
        stats.total_duration += r.played_duration;
        match r.item_type {
            PlaybackItemType::Movie => stats.movie_count += 1,
            PlaybackItemType::Episode => stats.episode_count += 1,
        }

        match (r.item_type, r.series_name.as_deref()) {
            (PlaybackItemType::Movie, _) => {
                movies
                    .entry(r.item_id.as_str())
                    .or_insert_with(|| content(&r.item_id, &r.item_name, "Movie"))
                    .play_count += 1;
            }
            (PlaybackItemType::Episode, Some(series)) => {
                shows
                    .entry(series)
                    .or_insert_with(|| content(&r.item_id, series, "Series"))
                    .play_count += 1;
            }
            (PlaybackItemType::Episode, None) => {}
        }
    }

    for (item_id, stats) in movies.iter_mut() {
        stats.unique_viewers = unique_viewers(records, |r| r.item_id == *item_id);
    }
    for (series, stats) in shows.iter_mut() {
        stats.unique_viewers =
            unique_viewers(records, |r| r.series_name.as_deref() == Some(*series));
    }

    let mut top_users: Vec<UserStats> = users.into_values().collect();
    top_users.sort_by(|a, b| {
        b.total_play_count
            .cmp(&a.total_play_count)
            .then_with(|| a.user_name.cmp(&b.user_name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    let active_users = top_users.len() as u32;
    top_users.truncate(TOP_USERS);

    let mut recent_plays = records.to_vec();
    recent_plays.sort_by(|a, b| b.playback_date.cmp(&a.playback_date));
    recent_plays.truncate(RECENT_PLAYS);

    PlaybackReport {
        kind,
        start_date: start,
        end_date: end,
        generated_at,
        total_plays: records.len() as u32,
        total_duration: records.iter().map(|r| r.played_duration).sum(),
        active_users,
        top_users,
        top_movies: top_content(movies, TOP_MOVIES),
        top_shows: top_content(shows, TOP_SHOWS),
        recent_plays,
    }
}

fn content(item_id: &str, item_name: &str, item_type: &str) -> ContentStats {
    ContentStats {
        item_id: item_id.to_string(),
        item_name: item_name.to_string(),
        item_type: item_type.to_string(),
        play_count: 0,
        unique_viewers: 0,
    }
}

fn unique_viewers(records: &[PlaybackRecord], matches: impl Fn(&PlaybackRecord) -> bool) -> u32 {
    records
        .iter()
        .filter(|r| matches(r))
        .map(|r| r.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u32
}

fn top_content(map: BTreeMap<&str, ContentStats>, limit: usize) -> Vec<ContentStats> {
    let mut items: Vec<ContentStats> = map.into_values().collect();
    items.sort_by(|a, b| {
        b.play_count
            .cmp(&a.play_count)
            .then_with(|| a.item_name.cmp(&b.item_name))
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    items.truncate(limit);
    items
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(i64::from(now.num_seconds_from_midnight()))
        - Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// Window covered by a report generated at `now` (UTC days).
///
/// Daily: the current day. Weekly: Sunday through Saturday of the current
/// week. Both ends are inclusive.
pub fn report_window(kind: ReportKind, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = start_of_day(now);
    let (start, days) = match kind {
        ReportKind::Daily => (today, 1),
        ReportKind::Weekly => {
            let since_sunday = i64::from(now.weekday().num_days_from_sunday());
            (today - Duration::days(since_sunday), 7)
        }
    };
    (start, start + Duration::days(days) - Duration::milliseconds(1))
}

/// Collect and aggregate a report for the window containing `now`.
pub async fn generate_report(
    source: &dyn PlaybackSource,
    kind: ReportKind,
    now: DateTime<Utc>,
) -> Result<PlaybackReport> {
    let (start, end) = report_window(kind, now);
    let records = collect_playback(source, start, end).await?;
    Ok(aggregate(kind, start, end, &records, Utc::now()))
}
