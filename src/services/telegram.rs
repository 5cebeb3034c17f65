//! Telegram Bot API notifier.

use crate::core::notify::{Notification, Notifier};
use crate::generators::caption::render_caption;
use crate::models::config::TelegramConfig;
use crate::services::tmdb::poster_url;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const API_BASE_URL: &str = "https://api.telegram.org";
const POSTER_SIZE: &str = "w500";
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Telegram's limit for photo captions.
const CAPTION_MAX_CHARS: usize = 1024;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends notifications to a Telegram chat.
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let (token, chat) = match (config.bot_token.as_deref(), config.chat_id.as_deref()) {
            (Some(token), Some(chat)) if config.is_configured() => (token, chat),
            _ => return Err(Error::TelegramNotConfigured),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            bot_token: token.to_string(),
            chat_id: chat.to_string(),
            client,
        })
    }

    async fn call(&self, method: &str, body: &Value) -> Result<()> {
        let url = format!("{}/bot{}/{}", API_BASE_URL, self.bot_token, method);
        let resp: ApiResponse = self.client.post(&url).json(body).send().await?.json().await?;
        if resp.ok {
            Ok(())
        } else {
            Err(Error::NotificationFailed(format!(
                "{}: {}",
                method,
                resp.description.unwrap_or_else(|| "unknown error".to_string())
            )))
        }
    }

    /// Send a plain HTML message.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            &json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let caption = render_caption(notification);
        let keyboard = json!({
            "inline_keyboard": [[{
                "text": "TMDB",
                "url": notification.item.tmdb_url(),
            }]]
        });

        let photo = notification
            .poster_override
            .clone()
            .or_else(|| {
                notification
                    .item
                    .poster_path
                    .as_deref()
                    .map(|p| poster_url(p, POSTER_SIZE))
            });

        if let Some(photo) = photo {
            if caption.chars().count() <= CAPTION_MAX_CHARS {
                let body = json!({
                    "chat_id": self.chat_id,
                    "photo": photo,
                    "caption": caption,
                    "parse_mode": "HTML",
                    "reply_markup": keyboard,
                });
                match self.call("sendPhoto", &body).await {
                    Ok(()) => return Ok(()),
                    Err(e) => tracing::debug!("sendPhoto failed, falling back to text: {}", e),
                }
            }
        }

        self.call(
            "sendMessage",
            &json!({
                "chat_id": self.chat_id,
                "text": caption,
                "parse_mode": "HTML",
                "reply_markup": keyboard,
            }),
        )
        .await
    }
}
