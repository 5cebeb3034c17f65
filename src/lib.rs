//! StreamHub Library
//!
//! Keeps a normalized index of an Emby/Jellyfin library in sync, reconciles
//! user requests against it and derives availability status from TMDB.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
