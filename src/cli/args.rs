//! Command line argument definitions.

use crate::models::media::MediaKind;
use clap::{Parser, Subcommand, ValueEnum};

/// StreamHub - Keep your media library index, requests and notifications in sync
#[derive(Parser, Debug)]
#[command(name = "streamhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one library sync cycle
    Sync,

    /// Sync on a recurring timer until interrupted
    Watch {
        /// Minutes between cycles (persisted for later runs)
        #[arg(
            short,
            long,
            value_name = "MINUTES",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        interval: Option<u32>,
    },

    /// Show the availability status of a title
    Status {
        /// TMDB id of the title
        #[arg(value_name = "TMDB_ID")]
        tmdb_id: String,

        /// Media kind
        #[arg(short, long, value_enum, default_value = "movie")]
        kind: KindArg,
    },

    /// Generate a playback report
    Report {
        /// Report window
        #[arg(value_enum)]
        kind: ReportArg,

        /// Send the report to Telegram
        #[arg(long)]
        send: bool,
    },

    /// Manage title requests
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },

    /// Show what is playing right now
    NowPlaying,
}

#[derive(Subcommand, Debug)]
pub enum RequestsAction {
    /// List all requests
    List,

    /// Submit a request
    Add {
        /// TMDB id of the title
        #[arg(value_name = "TMDB_ID")]
        tmdb_id: String,

        /// Media kind
        #[arg(short, long, value_enum, default_value = "movie")]
        kind: KindArg,

        /// Display title (looked up on TMDB when omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// Requesting user
        #[arg(short, long, default_value = "admin")]
        user: String,
    },

    /// Approve a pending request
    Approve {
        /// Request id
        #[arg(value_name = "REQUEST_ID")]
        id: String,
    },

    /// Reject a request
    Reject {
        /// Request id
        #[arg(value_name = "REQUEST_ID")]
        id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Movie,
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Tv,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportArg {
    Daily,
    Weekly,
}
