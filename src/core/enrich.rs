//! Turns newly added library keys into notification payloads.

use crate::core::notify::{EpisodeRef, NotifiedItem};
use crate::models::library::LibraryKey;
use crate::models::media::MediaKind;
use crate::models::metadata::TitleDetails;
use crate::Result;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Per-title metadata lookup.
#[async_trait]
pub trait TitleDetailSource: Send + Sync {
    async fn title_details(&self, kind: MediaKind, tmdb_id: &str) -> Result<TitleDetails>;
}

/// Group added keys into one item per title.
///
/// Episodes are folded into their series: a new series carries its new
/// episodes, and a known series that only gained episodes gets its own item.
pub fn group_added<'a>(added: impl IntoIterator<Item = &'a String>) -> Vec<NotifiedItem> {
    let mut titles: BTreeSet<(MediaKind, String)> = BTreeSet::new();
    let mut episodes: BTreeMap<String, Vec<EpisodeRef>> = BTreeMap::new();

    for raw in added {
        match raw.parse::<LibraryKey>() {
            Ok(LibraryKey::Title { kind, tmdb_id }) => {
                titles.insert((kind, tmdb_id));
            }
            Ok(LibraryKey::Episode {
                series_tmdb_id,
                season,
                episode,
            }) => {
                episodes
                    .entry(series_tmdb_id)
                    .or_default()
                    .push(EpisodeRef { season, episode });
            }
            Err(e) => tracing::warn!("Skipping added key: {}", e),
        }
    }

    for series_id in episodes.keys() {
        titles.insert((MediaKind::Tv, series_id.clone()));
    }

    titles
        .into_iter()
        .map(|(kind, tmdb_id)| {
            let mut item = NotifiedItem::bare(kind, tmdb_id);
            if kind == MediaKind::Tv {
                if let Some(mut new_episodes) = episodes.remove(&item.tmdb_id) {
                    new_episodes.sort();
                    item.new_episodes = new_episodes;
                }
            }
            item
        })
        .collect()
}

fn apply_details(item: &mut NotifiedItem, details: TitleDetails) {
    if let Some(title) = details.display_title() {
        item.title = title.to_string();
    }
    item.year = details.year();
    item.overview = details.overview.filter(|o| !o.is_empty());
    item.poster_path = details.poster_path;
}

/// Fetch details for every item concurrently.
///
/// All lookups run to completion or give up after `timeout`; an item whose
/// lookup fails keeps the metadata it already had.
pub async fn enrich_items(
    source: &dyn TitleDetailSource,
    items: Vec<NotifiedItem>,
    timeout: Duration,
) -> Vec<NotifiedItem> {
    let lookups = items.into_iter().map(|mut item| async move {
        let request = source.title_details(item.kind, &item.tmdb_id);
        let lookup = tokio::time::timeout(timeout, request)
            .await
            .unwrap_or_else(|_| Err(crate::Error::other("timed out")));
        match lookup {
            Ok(details) => apply_details(&mut item, details),
            Err(e) => {
                let err = crate::Error::DetailFetchFailed(format!(
                    "{} {}: {}",
                    item.kind, item.tmdb_id, e
                ));
                tracing::warn!("{}", err);
            }
        }
        item
    });
    join_all(lookups).await
}
