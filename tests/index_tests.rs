//! Integration tests for index building and diffing.
//!
//! Tests cover:
//! - Movie, series and episode keys
//! - Episodes listed before their series in the same batch
//! - Items that cannot be keyed (missing TMDB id, unknown series)
//! - Diffs between consecutive indexes

use std::collections::BTreeSet;
use streamhub::core::diff::diff_indexes;
use streamhub::core::indexer::build_index;
use streamhub::models::catalog::{CatalogItemType, ProviderIds, RawCatalogItem};
use streamhub::models::library::{LibraryIndex, LibraryKey};
use streamhub::models::media::MediaKind;

// ========== TEST FIXTURES ==========

fn item(id: &str, item_type: CatalogItemType, tmdb: Option<&str>) -> RawCatalogItem {
    RawCatalogItem {
        id: id.to_string(),
        name: None,
        item_type,
        provider_ids: ProviderIds {
            tmdb: tmdb.map(String::from),
            imdb: None,
        },
        series_id: None,
        parent_index_number: None,
        index_number: None,
    }
}

fn movie(tmdb: &str) -> RawCatalogItem {
    item(&format!("m{}", tmdb), CatalogItemType::Movie, Some(tmdb))
}

fn series(id: &str, tmdb: &str) -> RawCatalogItem {
    item(id, CatalogItemType::Series, Some(tmdb))
}

fn episode(series_id: &str, season: Option<u32>, ep: u32) -> RawCatalogItem {
    let mut e = item(&format!("{}-{}", series_id, ep), CatalogItemType::Episode, None);
    e.series_id = Some(series_id.to_string());
    e.parent_index_number = season;
    e.index_number = Some(ep);
    e
}

fn keys(index: &LibraryIndex) -> Vec<String> {
    index.iter().cloned().collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ========== BUILD TESTS ==========

#[test]
fn test_single_movie() {
    let index = build_index(&[movie("550")]);
    assert_eq!(keys(&index), vec!["movie_550"]);
}

#[test]
fn test_series_with_episode() {
    let index = build_index(&[series("abc", "1396"), episode("abc", Some(1), 1)]);
    assert_eq!(keys(&index), vec!["tv_1396", "tv_1396_s1_e1"]);
}

#[test]
fn test_episode_before_series_in_batch() {
    let index = build_index(&[episode("S1", Some(1), 1), series("S1", "1396")]);
    assert!(index.contains(&LibraryKey::episode("1396", 1, 1)));
    assert!(index.contains(&LibraryKey::title(MediaKind::Tv, "1396")));
}

#[test]
fn test_missing_season_defaults_to_one() {
    let index = build_index(&[series("abc", "1396"), episode("abc", None, 4)]);
    assert!(index.contains_str("tv_1396_s1_e4"));
}

#[test]
fn test_unkeyable_items_skipped() {
    let catalog = vec![
        item("m1", CatalogItemType::Movie, None),
        item("m2", CatalogItemType::Movie, Some("  ")),
        // Series without TMDB id: its episodes cannot be keyed
        item("s1", CatalogItemType::Series, None),
        episode("s1", Some(1), 1),
        // Episode pointing at a series not in the catalog
        episode("ghost", Some(1), 1),
        item("f1", CatalogItemType::Other, Some("99")),
    ];
    assert!(build_index(&catalog).is_empty());
}

#[test]
fn test_duplicate_items_collapse() {
    let index = build_index(&[
        movie("550"),
        movie("550"),
        series("a", "1396"),
        series("b", "1396"),
    ]);
    assert_eq!(index.len(), 2);
}

#[test]
fn test_empty_catalog() {
    assert!(build_index(&[]).is_empty());
}

// ========== DIFF TESTS ==========

#[test]
fn test_first_diff_is_initial() {
    let current = build_index(&[movie("550")]);
    let diff = diff_indexes(None, &current);
    assert!(diff.initial);
    assert!(diff.added.is_empty());
    assert!(diff.removed.is_empty());
}

#[test]
fn test_diff_added_and_removed() {
    let previous = build_index(&[movie("550"), series("a", "1396"), episode("a", Some(1), 1)]);
    let current = build_index(&[
        movie("680"),
        series("a", "1396"),
        episode("a", Some(1), 1),
        episode("a", Some(1), 2),
    ]);

    let diff = diff_indexes(Some(&previous), &current);
    assert!(!diff.initial);
    assert_eq!(diff.added, set(&["movie_680", "tv_1396_s1_e2"]));
    assert_eq!(diff.removed, set(&["movie_550"]));
}

#[test]
fn test_identical_indexes_have_empty_diff() {
    let catalog = vec![movie("550"), series("a", "1396"), episode("a", Some(2), 3)];
    let first = build_index(&catalog);
    let second = build_index(&catalog);

    let diff = diff_indexes(Some(&first), &second);
    assert!(diff.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_index_survives_json() {
    let index = build_index(&[movie("550"), series("a", "1396"), episode("a", Some(1), 1)]);
    let json = serde_json::to_string(&index).unwrap();
    let restored: LibraryIndex = serde_json::from_str(&json).unwrap();
    assert!(diff_indexes(Some(&index), &restored).is_empty());
}
