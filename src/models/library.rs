//! Library index: the set of composite membership keys for one sync cycle.
//!
//! Key grammar:
//! - `movie_{tmdbId}` / `tv_{tmdbId}` for movies and series
//! - `tv_{tmdbId}_s{season}_e{episode}` for single episodes

use crate::models::media::MediaKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Parsed form of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LibraryKey {
    /// A movie or a whole series.
    Title { kind: MediaKind, tmdb_id: String },
    /// A single episode of a series.
    Episode {
        series_tmdb_id: String,
        season: u32,
        episode: u32,
    },
}

impl LibraryKey {
    pub fn title(kind: MediaKind, tmdb_id: impl Into<String>) -> Self {
        LibraryKey::Title {
            kind,
            tmdb_id: tmdb_id.into(),
        }
    }

    pub fn episode(series_tmdb_id: impl Into<String>, season: u32, episode: u32) -> Self {
        LibraryKey::Episode {
            series_tmdb_id: series_tmdb_id.into(),
            season,
            episode,
        }
    }

    /// TMDB id of the movie or series this key belongs to.
    pub fn tmdb_id(&self) -> &str {
        match self {
            LibraryKey::Title { tmdb_id, .. } => tmdb_id,
            LibraryKey::Episode { series_tmdb_id, .. } => series_tmdb_id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            LibraryKey::Title { kind, .. } => *kind,
            LibraryKey::Episode { .. } => MediaKind::Tv,
        }
    }
}

impl std::fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryKey::Title { kind, tmdb_id } => write!(f, "{}_{}", kind, tmdb_id),
            LibraryKey::Episode {
                series_tmdb_id,
                season,
                episode,
            } => write!(f, "tv_{}_s{}_e{}", series_tmdb_id, season, episode),
        }
    }
}

impl FromStr for LibraryKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::Error::InvalidLibraryKey(s.to_string());

        if let Some(id) = s.strip_prefix("movie_") {
            if id.is_empty() || id.contains('_') {
                return Err(invalid());
            }
            return Ok(LibraryKey::title(MediaKind::Movie, id));
        }

        let rest = s.strip_prefix("tv_").ok_or_else(invalid)?;
        let parts: Vec<&str> = rest.split('_').collect();
        match parts.as_slice() {
            [id] if !id.is_empty() => Ok(LibraryKey::title(MediaKind::Tv, *id)),
            [id, season, episode] if !id.is_empty() => {
                let season = season
                    .strip_prefix('s')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                let episode = episode
                    .strip_prefix('e')
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                Ok(LibraryKey::episode(*id, season, episode))
            }
            _ => Err(invalid()),
        }
    }
}

/// One snapshot of the library. Persisted as a plain array of key strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryIndex {
    keys: BTreeSet<String>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Returns false if it was already present.
    pub fn insert(&mut self, key: &LibraryKey) -> bool {
        self.keys.insert(key.to_string())
    }

    pub fn contains(&self, key: &LibraryKey) -> bool {
        self.keys.contains(&key.to_string())
    }

    pub fn contains_str(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }

    pub(crate) fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }
}

impl<S: Into<String>> FromIterator<S> for LibraryIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Difference between two consecutive snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    /// No previous snapshot existed; `added` was suppressed.
    pub initial: bool,
}

impl LibraryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
