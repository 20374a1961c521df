use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),

    /// An artist object without its id. The catalog has such entries and they
    /// cannot be resolved.
    #[error("track {track_id} references an artist without id")]
    MissingArtistId { track_id: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}
