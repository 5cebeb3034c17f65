//! Requests command implementation.

use super::{build_notifier, open_store};
use crate::core::requests::{add_request, approve_request, list_requests, reject_request};
use crate::models::config::Config;
use crate::models::media::MediaKind;
use crate::models::request::{PendingRequest, RequestStatus};
use crate::services::tmdb::TmdbClient;
use crate::Result;
use colored::Colorize;

/// List stored requests.
pub async fn list(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let requests = list_requests(&store)?;

    println!("{}", "📋 Requests".bold().cyan());
    println!();

    if requests.is_empty() {
        println!("No requests found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<6} {:<12} {:<12} {}",
        "ID".bold(),
        "Status".bold(),
        "Kind".bold(),
        "TMDB".bold(),
        "User".bold(),
        "Title".bold()
    );
    println!("{}", "-".repeat(100));

    for r in &requests {
        let status = match r.status {
            RequestStatus::Pending => r.status.label().yellow(),
            RequestStatus::Processing => r.status.label().cyan(),
            RequestStatus::Completed => r.status.label().green(),
            RequestStatus::Rejected => r.status.label().red(),
        };
        println!(
            "{:<38} {:<10} {:<6} {:<12} {:<12} {}",
            r.id, status, r.media_type, r.tmdb_id, r.requested_by, r.title
        );
    }

    Ok(())
}

/// Submit a request, looking the title up on TMDB when not given.
pub async fn add(
    config: &Config,
    tmdb_id: &str,
    kind: MediaKind,
    title: Option<String>,
    user: &str,
) -> Result<()> {
    let store = open_store(config)?;
    let mut request = PendingRequest::new(tmdb_id, kind, title.unwrap_or_default(), user);

    if request.title.is_empty() {
        match TmdbClient::new(&config.tmdb) {
            Ok(client) => match client.title_details(kind, tmdb_id).await {
                Ok(details) => {
                    if let Some(t) = details.display_title() {
                        request.title = t.to_string();
                    }
                    request.poster_path = details.poster_path.clone();
                }
                Err(e) => tracing::warn!("Title lookup failed: {}", e),
            },
            Err(_) => tracing::debug!("TMDB not configured, storing request without title"),
        }
    }

    let notifier = build_notifier(config);
    let request = add_request(&store, notifier.as_ref(), request).await?;
    println!(
        "{} request {} submitted for {} {}",
        "[OK]".green(),
        request.id.dimmed(),
        request.media_type,
        request.tmdb_id
    );
    Ok(())
}

/// Approve a pending request by id.
pub async fn approve(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let request = approve_request(&store, id)?;
    println!("{} request {} approved", "[OK]".green(), request.id);
    Ok(())
}

/// Reject a request by id.
pub async fn reject(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let request = reject_request(&store, id)?;
    println!("{} request {} rejected", "[OK]".green(), request.id);
    Ok(())
}
