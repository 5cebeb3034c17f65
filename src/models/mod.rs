//! Data models.

pub mod catalog;
pub mod config;
pub mod library;
pub mod media;
pub mod metadata;
pub mod playback;
pub mod request;
pub mod status;
