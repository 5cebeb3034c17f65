//! Now-playing command implementation.

use crate::models::catalog::CatalogItemType;
use crate::models::config::Config;
use crate::services::emby::EmbyClient;
use crate::Result;
use colored::Colorize;

/// Print sessions that are currently playing.
pub async fn now_playing(config: &Config) -> Result<()> {
    let client = EmbyClient::new(&config.emby)?;
    let sessions = client.active_sessions().await?;

    println!("{}", "▶️  Now playing".bold().cyan());
    println!();

    if sessions.is_empty() {
        println!("Nothing is playing.");
        return Ok(());
    }

    for session in &sessions {
        let Some(item) = &session.now_playing_item else {
            continue;
        };
        let name = match (item.item_type, item.series_name.as_deref()) {
            (CatalogItemType::Episode, Some(series)) => format!("{} - {}", series, item.name),
            _ => item.name.clone(),
        };
        println!(
            "  {:<16} {}  {}",
            session.user_name.as_deref().unwrap_or("?").bold(),
            name,
            format!(
                "[{} / {}]",
                session.device_name.as_deref().unwrap_or("-"),
                session.client.as_deref().unwrap_or("-")
            )
            .dimmed()
        );
    }

    Ok(())
}
