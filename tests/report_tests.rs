//! Integration tests for playback reports.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use streamhub::core::report::{aggregate, collect_playback, generate_report, PlaybackSource};
use streamhub::generators::report::format_report_for_telegram;
use streamhub::models::catalog::{CatalogItemType, PlayedItem, ServerUser, UserData};
use streamhub::models::playback::{PlaybackItemType, PlaybackRecord, ReportKind};
use streamhub::{Error, Result};

// ========== TEST FIXTURES ==========

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    // March 2024: the 10th is a Sunday
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn record(
    user: &str,
    item_id: &str,
    name: &str,
    series: Option<&str>,
    when: DateTime<Utc>,
) -> PlaybackRecord {
    PlaybackRecord {
        user_id: format!("u-{}", user),
        user_name: user.to_string(),
        item_id: item_id.to_string(),
        item_name: name.to_string(),
        item_type: if series.is_some() {
            PlaybackItemType::Episode
        } else {
            PlaybackItemType::Movie
        },
        series_name: series.map(String::from),
        season_number: series.map(|_| 1),
        episode_number: series.map(|_| 1),
        playback_date: when,
        played_duration: 1800.0,
        total_duration: 3600.0,
        played_percentage: 50.0,
    }
}

fn played(
    id: &str,
    item_type: CatalogItemType,
    series: Option<&str>,
    when: Option<DateTime<Utc>>,
) -> PlayedItem {
    PlayedItem {
        id: id.to_string(),
        name: format!("Item {}", id),
        item_type,
        series_name: series.map(String::from),
        series_id: None,
        parent_index_number: Some(1),
        index_number: Some(2),
        run_time_ticks: Some(36_000_000_000),
        user_data: Some(UserData {
            last_played_date: when,
            playback_position_ticks: Some(18_000_000_000),
            played_percentage: None,
            played: true,
        }),
    }
}

/// Users with canned histories; users missing from `history` fail.
struct FakePlayback {
    users: Vec<ServerUser>,
    history: HashMap<String, Vec<PlayedItem>>,
}

#[async_trait]
impl PlaybackSource for FakePlayback {
    async fn list_users(&self) -> Result<Vec<ServerUser>> {
        Ok(self.users.clone())
    }

    async fn recently_played(&self, user_id: &str, _limit: u32) -> Result<Vec<PlayedItem>> {
        self.history
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::other("user history unavailable"))
    }
}

fn user(id: &str, name: &str) -> ServerUser {
    ServerUser {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// ========== AGGREGATION TESTS ==========

#[test]
fn test_totals_and_unique_viewers() {
    let records = vec![
        record("alice", "m1", "Dune", None, at(12, 10)),
        record("bob", "m1", "Dune", None, at(12, 11)),
        record("alice", "m1", "Dune", None, at(12, 12)),
        record("alice", "e1", "Pilot", Some("Severance"), at(12, 13)),
    ];
    let report = aggregate(ReportKind::Daily, at(12, 0), at(12, 23), &records, at(12, 23));

    assert_eq!(report.total_plays, 4);
    assert_eq!(report.total_duration, 4.0 * 1800.0);
    assert_eq!(report.active_users, 2);

    assert_eq!(report.top_users[0].user_name, "alice");
    assert_eq!(report.top_users[0].total_play_count, 3);
    assert_eq!(report.top_users[0].movie_count, 2);
    assert_eq!(report.top_users[0].episode_count, 1);

    assert_eq!(report.top_movies[0].play_count, 3);
    assert_eq!(report.top_movies[0].unique_viewers, 2);
    assert_eq!(report.top_shows[0].item_name, "Severance");
}

#[test]
fn test_shows_keyed_by_series_name() {
    let records = vec![
        record("alice", "e1", "Pilot", Some("Severance"), at(12, 10)),
        record("bob", "e2", "Half Loop", Some("Severance"), at(12, 11)),
        record("bob", "e9", "Other", Some("Andor"), at(12, 12)),
    ];
    let report = aggregate(ReportKind::Daily, at(12, 0), at(12, 23), &records, at(12, 23));

    assert_eq!(report.top_shows.len(), 2);
    assert_eq!(report.top_shows[0].item_name, "Severance");
    assert_eq!(report.top_shows[0].play_count, 2);
    assert_eq!(report.top_shows[0].unique_viewers, 2);
    assert!(report.top_movies.is_empty());
}

#[test]
fn test_top_lists_are_capped_and_ordered() {
    let mut records = Vec::new();
    for i in 0..12 {
        let user = format!("user{:02}", i);
        let name = format!("Movie {:02}", i);
        let when = at(12, 1) + Duration::minutes(i);
        records.push(record(&user, &format!("m{}", i), &name, None, when));
    }
    // Movie 05 gets an extra play
    records.push(record("user00", "m5", "Movie 05", None, at(12, 2)));

    let report = aggregate(ReportKind::Daily, at(12, 0), at(12, 23), &records, at(12, 23));
    assert_eq!(report.top_users.len(), 10);
    assert_eq!(report.active_users, 12);
    assert_eq!(report.top_movies.len(), 5);
    assert_eq!(report.top_movies[0].item_name, "Movie 05");
    // Ties ordered by name
    assert_eq!(report.top_movies[1].item_name, "Movie 00");
    assert_eq!(report.top_movies[2].item_name, "Movie 01");
}

#[test]
fn test_recent_plays_newest_first_and_capped() {
    let records: Vec<PlaybackRecord> = (0..25)
        .map(|i| {
            let when = at(12, 0) + Duration::minutes(i);
            record("alice", &format!("m{}", i), "Movie", None, when)
        })
        .collect();
    let report = aggregate(ReportKind::Daily, at(12, 0), at(12, 23), &records, at(12, 23));

    assert_eq!(report.recent_plays.len(), 20);
    assert_eq!(report.recent_plays[0].item_id, "m24");
    assert!(report.recent_plays[0].playback_date > report.recent_plays[19].playback_date);
}

// ========== COLLECTION TESTS ==========

#[tokio::test]
async fn test_collect_filters_window_and_skips_failing_users() {
    let mut history = HashMap::new();
    history.insert(
        "u1".to_string(),
        vec![
            played("m1", CatalogItemType::Movie, None, Some(at(12, 9))),
            played("e1", CatalogItemType::Episode, Some("Severance"), Some(at(13, 9))),
            // Outside the window
            played("m2", CatalogItemType::Movie, None, Some(at(11, 9))),
            // Never played or wrong type
            played("m3", CatalogItemType::Movie, None, None),
            played("s1", CatalogItemType::Series, None, Some(at(12, 9))),
        ],
    );
    let source = FakePlayback {
        users: vec![user("u1", "alice"), user("u2", "broken")],
        history,
    };

    let records = collect_playback(&source, at(12, 0), at(13, 23)).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.user_name == "alice"));

    let movie = records.iter().find(|r| r.item_id == "m1").unwrap();
    assert_eq!(movie.played_duration, 1800.0);
    assert_eq!(movie.total_duration, 3600.0);
    assert_eq!(movie.played_percentage, 100.0);
}

#[tokio::test]
async fn test_weekly_report_window() {
    let mut history = HashMap::new();
    history.insert(
        "u1".to_string(),
        vec![
            played("m1", CatalogItemType::Movie, None, Some(at(10, 0))),
            played("m2", CatalogItemType::Movie, None, Some(at(16, 23))),
            // Previous Saturday
            played("m3", CatalogItemType::Movie, None, Some(at(9, 23))),
        ],
    );
    let source = FakePlayback {
        users: vec![user("u1", "alice")],
        history,
    };

    let report = generate_report(&source, ReportKind::Weekly, at(14, 12)).await.unwrap();
    assert_eq!(report.start_date, at(10, 0));
    assert_eq!(report.total_plays, 2);
}

// ========== FORMAT TESTS ==========

#[test]
fn test_telegram_text() {
    let records = vec![
        record("alice", "m1", "Dune <Part Two>", None, at(12, 10)),
        record("bob", "e1", "Pilot", Some("Severance"), at(12, 11)),
    ];
    let report = aggregate(ReportKind::Weekly, at(10, 0), at(16, 23), &records, at(16, 23));
    let text = format_report_for_telegram(&report);

    assert!(text.contains("每周观影报告"));
    assert!(text.contains("2024-03-10 ~ 2024-03-16"));
    assert!(text.contains("播放次数：2"));
    assert!(text.contains("观看时长：1小时0分钟"));
    assert!(text.contains("Dune &lt;Part Two&gt;"));
    assert!(text.contains("Severance"));
}

#[test]
fn test_empty_report_text() {
    let report = aggregate(ReportKind::Daily, at(12, 0), at(12, 23), &[], at(12, 23));
    let text = format_report_for_telegram(&report);
    assert!(text.contains("每日观影报告"));
    assert!(text.contains("暂无播放记录"));
}
