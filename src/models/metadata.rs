//! Metadata provider (TMDB) title payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Movie or TV details, requested with
/// `append_to_response=watch/providers,release_dates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleDetails {
    #[serde(default)]
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV show name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    /// Primary release date (movies).
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date (TV).
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_episode_to_air: Option<EpisodeSummary>,
    #[serde(default)]
    pub release_dates: Option<ReleaseDates>,
    #[serde(rename = "watch/providers", default)]
    pub watch_providers: Option<WatchProviders>,
}

impl TitleDetails {
    /// Localized display title for either kind.
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Four-digit year of the primary date.
    pub fn year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.get(..4))
            .map(str::to_string)
    }
}

/// Latest aired episode of a show.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeSummary {
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub episode_number: Option<u32>,
}

/// Release dates container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<ReleaseDateCountry>,
}

/// Release dates for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDateCountry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ReleaseDate>,
}

/// Individual release date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub certification: Option<String>,
    /// ISO timestamp, e.g. `2024-01-10T00:00:00.000Z`.
    #[serde(default)]
    pub release_date: String,
    /// 1 premiere, 2 limited, 3 theatrical, 4 digital, 5 physical, 6 TV.
    #[serde(rename = "type")]
    pub release_type: u8,
}

/// Watch provider block keyed by ISO 3166-1 region code.
///
/// Regions are held in a `BTreeMap`, so iteration is in ascending region-code
/// order regardless of the order the provider returned them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: BTreeMap<String, RegionProviders>,
}

/// Providers offering a title in one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<ProviderEntry>,
    #[serde(default)]
    pub buy: Vec<ProviderEntry>,
    #[serde(default)]
    pub rent: Vec<ProviderEntry>,
}

/// A single streaming/purchase/rental service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub provider_name: String,
    #[serde(default)]
    pub provider_id: Option<u64>,
    #[serde(default)]
    pub logo_path: Option<String>,
}
