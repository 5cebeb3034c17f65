//! Media server (Emby/Jellyfin) payloads.

use serde::{Deserialize, Serialize};

/// Item types requested from the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogItemType {
    Movie,
    Series,
    Episode,
    /// Seasons, folders and anything else the server may return.
    #[serde(other)]
    Other,
}

/// External provider ids attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIds {
    #[serde(rename = "Tmdb", alias = "tmdb", alias = "TMDB", default)]
    pub tmdb: Option<String>,
    #[serde(rename = "Imdb", alias = "imdb", alias = "IMDB", default)]
    pub imdb: Option<String>,
}

/// One item of the catalog inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCatalogItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub item_type: CatalogItemType,
    #[serde(default)]
    pub provider_ids: ProviderIds,
    /// Back-reference from an episode to its series.
    #[serde(default)]
    pub series_id: Option<String>,
    /// Season number of an episode.
    #[serde(default)]
    pub parent_index_number: Option<u32>,
    /// Episode number within the season.
    #[serde(default)]
    pub index_number: Option<u32>,
}

impl RawCatalogItem {
    /// Trimmed TMDB id, if present and non-empty.
    pub fn tmdb_id(&self) -> Option<&str> {
        self.provider_ids
            .tmdb
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// `/Items` response. The count query only fills `total_record_count`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_record_count: u64,
}

/// Media server user account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerUser {
    pub id: String,
    pub name: String,
}

/// Per-user playback state of an item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserData {
    #[serde(default)]
    pub last_played_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub playback_position_ticks: Option<u64>,
    #[serde(default)]
    pub played_percentage: Option<f64>,
    #[serde(default)]
    pub played: bool,
}

/// Item returned from a user's played-items listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayedItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type")]
    pub item_type: CatalogItemType,
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub parent_index_number: Option<u32>,
    #[serde(default)]
    pub index_number: Option<u32>,
    #[serde(default)]
    pub run_time_ticks: Option<u64>,
    #[serde(default)]
    pub user_data: Option<UserData>,
}

/// What a session is currently playing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NowPlayingItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(rename = "Type", default = "other_type")]
    pub item_type: CatalogItemType,
}

fn other_type() -> CatalogItemType {
    CatalogItemType::Other
}

/// Active client session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveSession {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub now_playing_item: Option<NowPlayingItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_episode_item() {
        let json = r#"{
            "Id": "e1",
            "Name": "Pilot",
            "Type": "Episode",
            "SeriesId": "s1",
            "ParentIndexNumber": 1,
            "IndexNumber": 1,
            "ProviderIds": {}
        }"#;
        let item: RawCatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, CatalogItemType::Episode);
        assert_eq!(item.series_id.as_deref(), Some("s1"));
        assert_eq!(item.tmdb_id(), None);
    }

    #[test]
    fn test_unknown_item_type() {
        let json = r#"{"Id": "x", "Type": "Season"}"#;
        let item: RawCatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, CatalogItemType::Other);
    }

    #[test]
    fn test_blank_tmdb_id_is_unresolvable() {
        let json = r#"{"Id": "m", "Type": "Movie", "ProviderIds": {"Tmdb": "  "}}"#;
        let item: RawCatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.tmdb_id(), None);
    }

    #[test]
    fn test_count_query_response() {
        let resp: ItemsResponse<RawCatalogItem> =
            serde_json::from_str(r#"{"Items": [], "TotalRecordCount": 4321}"#).unwrap();
        assert_eq!(resp.total_record_count, 4321);
        assert!(resp.items.is_empty());
    }
}
