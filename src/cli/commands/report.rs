//! Report command implementation.

use super::spinner;
use crate::core::report::generate_report;
use crate::generators::report::{format_duration, format_report_for_telegram};
use crate::models::config::Config;
use crate::models::playback::{PlaybackItemType, PlaybackReport, ReportKind};
use crate::services::emby::EmbyClient;
use crate::services::telegram::TelegramNotifier;
use crate::Result;
use chrono::Utc;
use colored::Colorize;

fn print_report(report: &PlaybackReport) {
    let heading = match report.kind {
        ReportKind::Daily => "📊 Daily playback report",
        ReportKind::Weekly => "📊 Weekly playback report",
    };
    println!("{}", heading.bold().cyan());
    println!(
        "{} ~ {}",
        report.start_date.format("%Y-%m-%d"),
        report.end_date.format("%Y-%m-%d")
    );
    println!();
    println!(
        "Plays: {}  Watch time: {}  Active users: {}",
        report.total_plays.to_string().bold(),
        format_duration(report.total_duration),
        report.active_users
    );

    if !report.top_users.is_empty() {
        println!();
        println!("{}", "Top users".bold());
        for (i, user) in report.top_users.iter().enumerate() {
            println!(
                "  {:>2}. {:<20} {:>4} plays  {}",
                i + 1,
                user.user_name,
                user.total_play_count,
                format_duration(user.total_duration)
            );
        }
    }

    for (label, items) in [("Top movies", &report.top_movies), ("Top shows", &report.top_shows)] {
        if items.is_empty() {
            continue;
        }
        println!();
        println!("{}", label.bold());
        for (i, item) in items.iter().enumerate() {
            println!(
                "  {:>2}. {:<30} {:>4} plays  {} viewer(s)",
                i + 1,
                item.item_name,
                item.play_count,
                item.unique_viewers
            );
        }
    }

    if !report.recent_plays.is_empty() {
        println!();
        println!("{}", "Recent plays".bold());
        for play in &report.recent_plays {
            let name = match (play.item_type, play.series_name.as_deref()) {
                (PlaybackItemType::Episode, Some(series)) => format!(
                    "{} S{:02}E{:02}",
                    series,
                    play.season_number.unwrap_or(0),
                    play.episode_number.unwrap_or(0)
                ),
                _ => play.item_name.clone(),
            };
            println!(
                "  {}  {:<16} {}",
                play.playback_date.format("%m-%d %H:%M").to_string().dimmed(),
                play.user_name,
                name
            );
        }
    }
}

/// Generate a report, print it and optionally send it to Telegram.
pub async fn run_report(config: &Config, kind: ReportKind, send: bool) -> Result<()> {
    let client = EmbyClient::new(&config.emby)?;

    let pb = spinner("Collecting playback history...");
    let report = generate_report(&client, kind, Utc::now()).await;
    pb.finish_and_clear();
    let report = report?;

    print_report(&report);

    if send {
        let telegram = TelegramNotifier::new(&config.telegram)?;
        telegram.send_text(&format_report_for_telegram(&report)).await?;
        println!();
        println!("{} report sent to Telegram", "[OK]".green());
    }
    Ok(())
}
