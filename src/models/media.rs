//! Media-related data models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of title tracked by the library index and by requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Key prefix and TMDB path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Hashtag used in notification captions.
    pub fn tag(&self) -> &'static str {
        match self {
            MediaKind::Movie => "#电影",
            MediaKind::Tv => "#剧集",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "series" | "tvshow" | "tvshows" => Ok(MediaKind::Tv),
            other => Err(crate::Error::other(format!("Unknown media kind: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parse() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert!("music".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_media_kind_serde() {
        let json = serde_json::to_string(&MediaKind::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
    }
}
