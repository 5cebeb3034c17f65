//! Emby/Jellyfin API client.

use crate::core::fetcher::CatalogSource;
use crate::core::report::PlaybackSource;
use crate::models::catalog::{
    ActiveSession, ItemsResponse, PlayedItem, RawCatalogItem, ServerUser,
};
use crate::models::config::EmbyConfig;
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const CATALOG_ITEM_TYPES: &str = "Movie,Series,Episode";
const CATALOG_FIELDS: &str = "ProviderIds,SeriesId,ParentIndexNumber,IndexNumber";
const PLAYED_FIELDS: &str =
    "UserData,SeriesName,SeriesId,ParentIndexNumber,IndexNumber,RunTimeTicks";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Server identity from `/System/Info`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Emby API client.
pub struct EmbyClient {
    base_url: String,
    api_key: String,
    library_id: Option<String>,
    client: reqwest::Client,
}

impl EmbyClient {
    /// Create a client from configuration.
    pub fn new(config: &EmbyConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if config.is_configured() => key.to_string(),
            _ => return Err(crate::Error::EmbyNotConfigured),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            api_key,
            library_id: config.library_id.clone().filter(|id| !id.is_empty()),
            client,
        })
    }

    fn auth_param(&self) -> String {
        format!("api_key={}", urlencoding::encode(&self.api_key))
    }

    /// Catalog listing URL; `extra` is appended before the library filter.
    fn items_url(&self, extra: &str) -> String {
        let parent = self
            .library_id
            .as_deref()
            .map(|id| format!("&ParentId={}", urlencoding::encode(id)))
            .unwrap_or_default();
        format!(
            "{}/Items?Recursive=true&IncludeItemTypes={}&IsMissing=false{}{}&{}",
            self.base_url,
            CATALOG_ITEM_TYPES,
            extra,
            parent,
            self.auth_param()
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    /// Check that the server is reachable and accepts the key.
    pub async fn validate_connection(&self) -> Result<SystemInfo> {
        let url = format!("{}/System/Info?{}", self.base_url, self.auth_param());
        self.get_json(&url).await
    }

    /// Sessions that are currently playing something.
    pub async fn active_sessions(&self) -> Result<Vec<ActiveSession>> {
        let url = format!("{}/Sessions?{}", self.base_url, self.auth_param());
        let sessions: Vec<ActiveSession> = self.get_json(&url).await?;
        Ok(sessions
            .into_iter()
            .filter(|s| s.now_playing_item.is_some())
            .collect())
    }
}

#[async_trait]
impl CatalogSource for EmbyClient {
    async fn total_record_count(&self) -> Result<u64> {
        let url = self.items_url("&Limit=0");
        let resp: ItemsResponse<RawCatalogItem> = self.get_json(&url).await?;
        Ok(resp.total_record_count)
    }

    async fn fetch_page(&self, start_index: u64, limit: u64) -> Result<Vec<RawCatalogItem>> {
        let url = self.items_url(&format!(
            "&Fields={}&StartIndex={}&Limit={}",
            CATALOG_FIELDS, start_index, limit
        ));
        tracing::debug!(start_index, limit, "Fetching catalog page");
        let resp: ItemsResponse<RawCatalogItem> = self.get_json(&url).await?;
        Ok(resp.items)
    }
}

#[async_trait]
impl PlaybackSource for EmbyClient {
    async fn list_users(&self) -> Result<Vec<ServerUser>> {
        let url = format!("{}/Users?{}", self.base_url, self.auth_param());
        self.get_json(&url).await
    }

    async fn recently_played(&self, user_id: &str, limit: u32) -> Result<Vec<PlayedItem>> {
        let url = format!(
            "{}/Users/{}/Items?Recursive=true&IncludeItemTypes=Movie,Episode&IsPlayed=true\
             &SortBy=DatePlayed&SortOrder=Descending&Limit={}&Fields={}&{}",
            self.base_url,
            urlencoding::encode(user_id),
            limit,
            PLAYED_FIELDS,
            self.auth_param()
        );
        let resp: ItemsResponse<PlayedItem> = self.get_json(&url).await?;
        Ok(resp.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(library_id: Option<&str>) -> EmbyConfig {
        EmbyConfig {
            server_url: "http://emby.local:8096/".to_string(),
            api_key: Some("secret".to_string()),
            library_id: library_id.map(String::from),
        }
    }

    #[test]
    fn test_requires_configuration() {
        let missing = EmbyConfig {
            server_url: String::new(),
            api_key: None,
            library_id: None,
        };
        assert!(matches!(
            EmbyClient::new(&missing),
            Err(crate::Error::EmbyNotConfigured)
        ));
    }

    #[test]
    fn test_count_query_url() {
        let client = EmbyClient::new(&config(None)).unwrap();
        assert_eq!(
            client.items_url("&Limit=0"),
            "http://emby.local:8096/Items?Recursive=true&IncludeItemTypes=Movie,Series,Episode\
             &IsMissing=false&Limit=0&api_key=secret"
        );
    }

    #[test]
    fn test_library_filter_in_url() {
        let client = EmbyClient::new(&config(Some("lib 1"))).unwrap();
        let url = client.items_url("&StartIndex=2000&Limit=2000");
        assert!(url.contains("&StartIndex=2000&Limit=2000&ParentId=lib%201&api_key=secret"));
    }
}
