//! Watch command implementation.
//!
//! Runs sync cycles on a timer until Ctrl-C.

use super::{build_engine, open_store};
use crate::core::store::StateStore;
use crate::core::sync::spawn_scheduler;
use crate::models::config::Config;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Interval in minutes: the persisted one, else the configured one.
pub fn effective_interval(store: &StateStore, config: &Config) -> Result<u32> {
    let minutes = store
        .sync_interval()?
        .unwrap_or(config.sync.interval_minutes);
    Ok(minutes.max(1))
}

/// Sync periodically until interrupted.
pub async fn watch(config: &Config, interval: Option<u32>) -> Result<()> {
    let store = open_store(config)?;
    if let Some(minutes) = interval {
        store.set_sync_interval(minutes)?;
    }
    let minutes = effective_interval(&store, config)?;

    let engine = Arc::new(build_engine(config, store)?);
    let cancel = CancellationToken::new();
    let handle = spawn_scheduler(
        engine.clone(),
        Duration::from_secs(u64::from(minutes) * 60),
        cancel.clone(),
    );

    println!(
        "{} syncing every {} minute(s), press Ctrl-C to stop",
        "👀".bold(),
        minutes.to_string().cyan()
    );

    tokio::signal::ctrl_c().await?;
    println!();
    println!("{}", "Stopping, waiting for the current cycle...".yellow());
    cancel.cancel();

    if let Err(e) = handle.await {
        tracing::warn!("Scheduler task ended abnormally: {}", e);
    }
    Ok(())
}
