use std::fmt::Display;

use serde::Serialize;

/// Artist placeholder used when the source catalog has no artist for a track
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Represent a liked track, independent of either service's schema.
///
/// Two records are the same track when both artist and name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Track {
    pub artist: String,
    pub name: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            name: name.into(),
        }
    }

    /// Builds a track from the artist names the source reported,
    /// keeping the first one.
    pub fn from_artists(artists: &[String], name: impl Into<String>) -> Self {
        let artist = artists
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ARTIST);
        Self::new(artist, name)
    }

    /// free-text query sent to the destination catalog
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artist, self.name)
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.name)
    }
}
