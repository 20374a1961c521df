//! Source catalog: where liked tracks are read from

pub mod error;
pub mod reader;
pub mod yandex;

use error::SourceError;

/// Lightweight entry of the liked tracks listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub id: String,
    pub album_id: Option<String>,
}

impl TrackRef {
    /// id in the form the track endpoint expects
    pub fn qualified_id(&self) -> String {
        match &self.album_id {
            Some(album) => format!("{}:{}", self.id, album),
            None => self.id.clone(),
        }
    }
}

/// Full metadata of a liked track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub title: String,
    pub artists: Vec<String>,
}

pub trait SourceCatalog {
    /// all liked tracks, in the catalog's own listing order
    fn liked_tracks(&self) -> Result<Vec<TrackRef>, SourceError>;

    fn resolve(&self, track: &TrackRef) -> Result<ResolvedTrack, SourceError>;
}
