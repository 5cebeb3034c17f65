//! Status command implementation.

use super::{open_store, spinner};
use crate::core::status::resolve_status;
use crate::models::config::Config;
use crate::models::library::LibraryKey;
use crate::models::media::MediaKind;
use crate::models::status::MediaStatus;
use crate::services::tmdb::TmdbClient;
use crate::Result;
use chrono::{NaiveDate, Utc};
use colored::Colorize;

fn fmt_opt(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Resolve and print the availability of one title.
pub async fn show_status(config: &Config, tmdb_id: &str, kind: MediaKind) -> Result<()> {
    let client = TmdbClient::new(&config.tmdb)?;

    let pb = spinner("Looking up title...");
    let details = client.title_details(kind, tmdb_id).await;
    pb.finish_and_clear();
    let details = details?;

    let resolution = resolve_status(
        &details,
        details.watch_providers.as_ref(),
        kind,
        Utc::now().date_naive(),
    );

    let title = details.display_title().unwrap_or(tmdb_id);
    println!(
        "{} {} {}",
        "🎬".bold(),
        title.bold(),
        details.year().map(|y| format!("({})", y)).unwrap_or_default()
    );
    println!();

    let badge = match resolution.status {
        MediaStatus::Streaming => resolution.badge_label.green(),
        MediaStatus::Released => resolution.badge_label.cyan(),
        MediaStatus::Pending => resolution.badge_label.yellow(),
    };
    println!("  {:<12} {} ({})", "Status:".bold(), badge, resolution.status);
    println!("  {:<12} {}", "Date:".bold(), resolution.release_date);
    if let Some(region) = &resolution.provider_region {
        println!("  {:<12} {}", "Region:".bold(), region);
    }
    if kind == MediaKind::Movie {
        let dates = &resolution.release_dates;
        println!("  {:<12} {}", "Theatrical:".bold(), fmt_opt(dates.theatrical));
        println!("  {:<12} {}", "Digital:".bold(), fmt_opt(dates.digital));
        println!("  {:<12} {}", "Physical:".bold(), fmt_opt(dates.physical));
    }

    let store = open_store(config)?;
    let in_library = store
        .library_index()?
        .is_some_and(|index| index.contains(&LibraryKey::title(kind, tmdb_id)));
    println!(
        "  {:<12} {}",
        "Library:".bold(),
        if in_library { "in library".green() } else { "not in library".dimmed() }
    );

    Ok(())
}
