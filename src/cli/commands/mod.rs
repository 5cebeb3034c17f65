//! CLI command implementations.

pub mod now_playing;
pub mod report;
pub mod requests;
pub mod status;
pub mod sync;
pub mod watch;

use crate::core::notify::{LogNotifier, Notifier};
use crate::core::store::StateStore;
use crate::core::sync::SyncEngine;
use crate::models::config::Config;
use crate::services::emby::EmbyClient;
use crate::services::telegram::TelegramNotifier;
use crate::services::tmdb::TmdbClient;
use crate::utils::fs::create_dir_all;
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Open the state store under the configured data directory.
pub fn open_store(config: &Config) -> Result<Arc<StateStore>> {
    create_dir_all(&config.data_dir)?;
    Ok(Arc::new(StateStore::new(&config.data_dir)))
}

/// Telegram when configured, otherwise the log.
pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match TelegramNotifier::new(&config.telegram) {
        Ok(telegram) => Arc::new(telegram),
        Err(_) => {
            tracing::info!("Telegram not configured, notifications go to the log");
            Arc::new(LogNotifier)
        }
    }
}

/// Wire the sync engine from configuration.
pub fn build_engine(config: &Config, store: Arc<StateStore>) -> Result<SyncEngine> {
    let catalog = Arc::new(EmbyClient::new(&config.emby)?);
    let engine = SyncEngine::new(catalog, build_notifier(config), store)?;

    Ok(match TmdbClient::new(&config.tmdb) {
        Ok(tmdb) => engine.with_details(Arc::new(tmdb)),
        Err(_) => {
            tracing::info!("TMDB not configured, added titles are announced without metadata");
            engine
        }
    })
}

/// Spinner shown while a long call runs.
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
