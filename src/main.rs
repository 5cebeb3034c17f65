//! StreamHub CLI
//!
//! Syncs an Emby/Jellyfin library index, reconciles title requests and
//! reports playback.

use clap::Parser;
use streamhub::cli::{
    args::{Cli, Commands, ReportArg, RequestsAction},
    commands::{now_playing, report, requests, status, sync, watch},
};
use streamhub::models::config::{load_config, Config};
use streamhub::models::playback::ReportKind;
use streamhub::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = load_config();

    // Run the appropriate command
    match cli.command {
        Commands::Sync => {
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }
            sync::run_sync(&config).await?;
        }

        Commands::Watch { interval } => {
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }
            watch::watch(&config, interval).await?;
        }

        Commands::Status { tmdb_id, kind } => {
            status::show_status(&config, &tmdb_id, kind.into()).await?;
        }

        Commands::Report { kind, send } => {
            let kind = match kind {
                ReportArg::Daily => ReportKind::Daily,
                ReportArg::Weekly => ReportKind::Weekly,
            };
            report::run_report(&config, kind, send).await?;
        }

        Commands::Requests { action } => match action {
            RequestsAction::List => {
                requests::list(&config).await?;
            }
            RequestsAction::Add {
                tmdb_id,
                kind,
                title,
                user,
            } => {
                requests::add(&config, &tmdb_id, kind.into(), title, &user).await?;
            }
            RequestsAction::Approve { id } => {
                requests::approve(&config, &id).await?;
            }
            RequestsAction::Reject { id } => {
                requests::reject(&config, &id).await?;
            }
        },

        Commands::NowPlaying => {
            now_playing::now_playing(&config).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("streamhub=debug")
    } else {
        EnvFilter::new("streamhub=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
