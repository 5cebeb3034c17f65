//! Emby server preflight check.

use super::CheckResult;
use crate::models::config::EmbyConfig;
use crate::services::emby::EmbyClient;

/// Check if the media server is reachable with the configured key.
pub async fn check(config: &EmbyConfig) -> CheckResult {
    let client = match EmbyClient::new(config) {
        Ok(client) => client,
        Err(_) => {
            return CheckResult::fail(
                "Emby",
                "server not configured",
                "Set EMBY_SERVER_URL and EMBY_API_KEY, or [emby] in config.toml",
            )
        }
    };

    match client.validate_connection().await {
        Ok(info) => {
            let name = info.server_name.unwrap_or_else(|| config.base_url().to_string());
            match info.version {
                Some(version) => CheckResult::ok("Emby", &format!("{} (v{})", name, version)),
                None => CheckResult::ok("Emby", &name),
            }
        }
        Err(e) => CheckResult::fail(
            "Emby",
            &format!("connection failed: {}", e),
            "Check the server URL and API key",
        ),
    }
}
