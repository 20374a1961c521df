use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::{destination::matcher::FailedTrack, domain::track::Track};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorEntry {
    #[serde(flatten)]
    pub track: Track,
    pub reason: String,
}

impl From<&FailedTrack> for ErrorEntry {
    fn from(failed: &FailedTrack) -> Self {
        Self {
            track: failed.track.clone(),
            reason: failed.error.to_string(),
        }
    }
}

/// Outcome of one run, as written to the output file
#[derive(Debug, Serialize, Default)]
pub struct TransferReport {
    /// every exported track, in the order it was imported
    pub liked_tracks: Vec<Track>,
    pub not_found: Vec<Track>,
    pub errors: Vec<ErrorEntry>,
    /// source entries that could not be read, not part of any list above
    #[serde(skip)]
    pub skipped: usize,
}

impl TransferReport {
    pub fn imported(&self) -> usize {
        self.liked_tracks.len() - self.not_found.len() - self.errors.len()
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn report() -> TransferReport {
        TransferReport {
            liked_tracks: vec![
                Track::new("Кино", "Кукушка"),
                Track::new("Daft Punk", "Veridis Quo"),
                Track::new("Unknown Artist", "Intro"),
            ],
            not_found: vec![Track::new("Unknown Artist", "Intro")],
            errors: vec![ErrorEntry {
                track: Track::new("Daft Punk", "Veridis Quo"),
                reason: "like failed: http error".into(),
            }],
            skipped: 2,
        }
    }

    #[test]
    fn test_report_shape() -> anyhow::Result<()> {
        let value: serde_json::Value = serde_json::from_str(&report().to_json()?)?;

        assert_eq!(value["liked_tracks"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["liked_tracks"][0]["artist"], "Кино");
        assert_eq!(value["not_found"][0]["name"], "Intro");
        assert_eq!(value["errors"][0]["artist"], "Daft Punk");
        assert_eq!(value["errors"][0]["reason"], "like failed: http error");
        assert!(value.get("skipped").is_none());
        Ok(())
    }

    #[test]
    fn test_write_keeps_unicode() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("tracks.json");

        report().write(&path)?;

        let written = std::fs::read_to_string(&path)?;
        assert!(written.contains("\"Кукушка\""));
        Ok(())
    }

    #[test]
    fn test_imported_count() {
        assert_eq!(report().imported(), 1);
    }
}
