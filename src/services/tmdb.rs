//! TMDB API client.

use crate::core::enrich::TitleDetailSource;
use crate::models::config::TmdbConfig;
use crate::models::media::MediaKind;
use crate::models::metadata::TitleDetails;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// TMDB API client.
pub struct TmdbClient {
    /// API key or Bearer token (JWT)
    api_key: String,
    base_url: String,
    language: String,
    /// Whether to use Bearer token authentication (API v4 style)
    use_bearer: bool,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client.
    /// Supports both API key (v3) and Bearer token (v4) formats.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(crate::Error::TmdbApiKeyMissing)?;

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            use_bearer,
            client,
        })
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.use_bearer {
            format!(
                "{}/{}?language={}{}",
                self.base_url, path, self.language, extra_params
            )
        } else {
            format!(
                "{}/{}?api_key={}&language={}{}",
                self.base_url,
                path,
                urlencoding::encode(&self.api_key),
                self.language,
                extra_params
            )
        }
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.use_bearer {
            format!("{}/authentication", self.base_url)
        } else {
            format!(
                "{}/authentication?api_key={}",
                self.base_url,
                urlencoding::encode(&self.api_key)
            )
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get movie or TV details with watch providers and release dates.
    pub async fn title_details(&self, kind: MediaKind, tmdb_id: &str) -> Result<TitleDetails> {
        let url = self.build_url(
            &format!("{}/{}", kind, urlencoding::encode(tmdb_id)),
            "&append_to_response=watch/providers,release_dates",
        );
        let resp = self
            .build_request(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

/// Get poster image URL.
pub fn poster_url(poster_path: &str, size: &str) -> String {
    if poster_path.starts_with("http") {
        poster_path.to_string()
    } else {
        format!("{}/{}{}", IMAGE_BASE_URL, size, poster_path)
    }
}

#[async_trait]
impl TitleDetailSource for TmdbClient {
    async fn title_details(&self, kind: MediaKind, tmdb_id: &str) -> Result<TitleDetails> {
        TmdbClient::title_details(self, kind, tmdb_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> TmdbConfig {
        TmdbConfig {
            api_key: Some(key.to_string()),
            base_url: "https://tmdb.proxy/3/".to_string(),
            language: "zh-CN".to_string(),
        }
    }

    #[test]
    fn test_v3_key_in_query() {
        let client = TmdbClient::new(&config("abc")).unwrap();
        assert_eq!(
            client.build_url("movie/550", "&append_to_response=watch/providers,release_dates"),
            "https://tmdb.proxy/3/movie/550?api_key=abc&language=zh-CN\
             &append_to_response=watch/providers,release_dates"
        );
    }

    #[test]
    fn test_bearer_token_not_in_query() {
        let client = TmdbClient::new(&config("eyJhbGciOi")).unwrap();
        assert_eq!(
            client.build_url("tv/1396", ""),
            "https://tmdb.proxy/3/tv/1396?language=zh-CN"
        );
    }

    #[test]
    fn test_missing_key() {
        let mut cfg = config("");
        assert!(TmdbClient::new(&cfg).is_err());
        cfg.api_key = None;
        assert!(matches!(
            TmdbClient::new(&cfg),
            Err(crate::Error::TmdbApiKeyMissing)
        ));
    }

    #[test]
    fn test_poster_url() {
        assert_eq!(poster_url("/p.jpg", "w500"), "https://image.tmdb.org/t/p/w500/p.jpg");
        assert_eq!(poster_url("https://x/p.jpg", "w500"), "https://x/p.jpg");
    }
}
