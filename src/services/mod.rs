//! External service clients.

pub mod emby;
pub mod telegram;
pub mod tmdb;
