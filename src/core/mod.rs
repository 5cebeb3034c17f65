//! Core business logic modules.

pub mod diff;
pub mod enrich;
pub mod fetcher;
pub mod indexer;
pub mod notify;
pub mod reconciler;
pub mod repository;
pub mod report;
pub mod requests;
pub mod status;
pub mod store;
pub mod sync;
