//! Index builder: turns raw catalog items into a [`LibraryIndex`].

use crate::models::catalog::{CatalogItemType, RawCatalogItem};
use crate::models::library::{LibraryIndex, LibraryKey};
use crate::models::media::MediaKind;
use std::collections::HashMap;

/// Season assumed for episodes without a `ParentIndexNumber`.
const DEFAULT_SEASON: u32 = 1;

/// Build the membership index for one catalog batch.
///
/// Pass 1 indexes every movie and series and records the series
/// `internal id -> tmdb id` lookup. Pass 2 resolves episodes through that
/// lookup only after pass 1 has seen the whole batch, so episode order
/// relative to its series does not matter. Episodes whose series cannot be
/// resolved are left out of the index.
pub fn build_index(items: &[RawCatalogItem]) -> LibraryIndex {
    let mut index = LibraryIndex::new();
    let mut series_lookup: HashMap<&str, &str> = HashMap::new();

    // Pass 1: movies and series
    for item in items {
        let Some(tmdb_id) = item.tmdb_id() else {
            continue;
        };
        match item.item_type {
            CatalogItemType::Movie => {
                index.insert(&LibraryKey::title(MediaKind::Movie, tmdb_id));
            }
            CatalogItemType::Series => {
                index.insert(&LibraryKey::title(MediaKind::Tv, tmdb_id));
                if !item.id.is_empty() {
                    series_lookup.insert(item.id.as_str(), tmdb_id);
                }
            }
            _ => {}
        }
    }

    // Pass 2: episodes
    let mut unresolved = 0usize;
    for item in items
        .iter()
        .filter(|i| i.item_type == CatalogItemType::Episode)
    {
        let series_tmdb = item
            .series_id
            .as_deref()
            .and_then(|id| series_lookup.get(id));
        match (series_tmdb, item.index_number) {
            (Some(series_tmdb), Some(episode)) => {
                let season = item.parent_index_number.unwrap_or(DEFAULT_SEASON);
                index.insert(&LibraryKey::episode(*series_tmdb, season, episode));
            }
            _ => unresolved += 1,
        }
    }

    if unresolved > 0 {
        tracing::debug!(unresolved, "Episodes without a resolvable series were skipped");
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::ProviderIds;

    fn series(id: &str, tmdb: Option<&str>) -> RawCatalogItem {
        RawCatalogItem {
            id: id.to_string(),
            name: None,
            item_type: CatalogItemType::Series,
            provider_ids: ProviderIds {
                tmdb: tmdb.map(str::to_string),
                imdb: None,
            },
            series_id: None,
            parent_index_number: None,
            index_number: None,
        }
    }

    fn episode(series_id: &str, season: Option<u32>, ep: Option<u32>) -> RawCatalogItem {
        RawCatalogItem {
            id: format!("{}-{:?}-{:?}", series_id, season, ep),
            name: None,
            item_type: CatalogItemType::Episode,
            provider_ids: ProviderIds::default(),
            series_id: Some(series_id.to_string()),
            parent_index_number: season,
            index_number: ep,
        }
    }

    #[test]
    fn test_missing_season_defaults_to_one() {
        let index = build_index(&[series("s", Some("10")), episode("s", None, Some(4))]);
        assert!(index.contains_str("tv_10_s1_e4"));
    }

    #[test]
    fn test_specials_keep_season_zero() {
        let index = build_index(&[series("s", Some("10")), episode("s", Some(0), Some(1))]);
        assert!(index.contains_str("tv_10_s0_e1"));
    }

    #[test]
    fn test_episode_without_number_is_skipped() {
        let index = build_index(&[series("s", Some("10")), episode("s", Some(1), None)]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_series_without_tmdb_drops_its_episodes() {
        let index = build_index(&[series("s", None), episode("s", Some(1), Some(1))]);
        assert!(index.is_empty());
    }
}
