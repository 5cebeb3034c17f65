//! Sync command implementation.

use super::{build_engine, open_store, spinner};
use crate::core::sync::SyncOutcome;
use crate::models::config::Config;
use crate::Result;
use colored::Colorize;

/// Run one sync cycle and print its summary.
pub async fn run_sync(config: &Config) -> Result<()> {
    println!("{}", "🔄 Syncing library...".bold().cyan());
    println!();

    let store = open_store(config)?;
    let engine = build_engine(config, store)?;

    let pb = spinner("Fetching catalog...");
    let outcome = engine.run_cycle().await;
    pb.finish_and_clear();

    match outcome {
        SyncOutcome::Completed(summary) => {
            println!("{} {} keys indexed", "[OK]".green(), summary.total_keys);
            if summary.initial {
                println!("  {} initial sync, additions not announced", "->".yellow());
            } else {
                println!(
                    "  {} added, {} removed, {} announced",
                    summary.added.to_string().green(),
                    summary.removed.to_string().red(),
                    summary.added_notifications
                );
            }
            if summary.completed_requests > 0 {
                println!(
                    "  {} request(s) completed",
                    summary.completed_requests.to_string().green()
                );
            }
            Ok(())
        }
        SyncOutcome::Skipped => {
            println!("{} another sync is running", "[SKIP]".yellow());
            Ok(())
        }
        SyncOutcome::Failed { reason } => {
            println!("{} {}", "[FAIL]".red(), reason);
            println!("  {} stored library index left unchanged", "->".yellow());
            Err(crate::Error::other(reason))
        }
    }
}
