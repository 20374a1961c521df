//! Destination catalog: where liked tracks are searched and liked

pub mod auth;
pub mod error;
pub mod matcher;
pub mod session;
pub mod ytmusic;

use crate::domain::candidate::SearchCandidate;
use error::DestinationError;

/// Result category a search is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Songs,
}

pub trait DestinationCatalog {
    /// Candidates in the order the catalog ranked them
    fn search(
        &self,
        query: &str,
        filter: SearchFilter,
    ) -> Result<Vec<SearchCandidate>, DestinationError>;

    /// marks the item liked
    fn like(&self, video_id: &str) -> Result<(), DestinationError>;
}
