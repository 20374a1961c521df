//! Matching liked tracks against the destination catalog and liking them there.
//!
//! Tracks are handled strictly one after another: search, select, like. The
//! destination does not publish its per-account rate limits, so requests are
//! never issued in parallel.

use thiserror::Error;

use crate::{
    destination::{DestinationCatalog, SearchFilter, error::DestinationError},
    domain::{candidate::SearchCandidate, track::Track},
};

/// Rule that picked a candidate, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// the catalog's own best guess
    TopResult,
    /// title equals the track name
    ExactTitle,
    /// first candidate with an id, in catalog ranking
    FirstRanked,
    /// no candidate had an id, the first raw one is taken anyway
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub candidate: &'a SearchCandidate,
    pub rule: SelectionRule,
}

/// Picks the candidate to like for `track`, `None` only when there are no candidates.
///
/// Candidates are scanned in catalog order. Ones without an id are passed over,
/// the first top result or exact title match wins immediately. Otherwise the
/// first candidate with an id is taken, and when none has an id the very first
/// candidate is returned even though it cannot be liked.
pub fn select_best<'a>(candidates: &'a [SearchCandidate], track: &Track) -> Option<Selection<'a>> {
    let mut first_ranked = None;

    for candidate in candidates {
        if candidate.video_id.is_none() {
            continue;
        }
        if candidate.is_top_result() {
            return Some(Selection {
                candidate,
                rule: SelectionRule::TopResult,
            });
        }
        if candidate.has_title(&track.name) {
            return Some(Selection {
                candidate,
                rule: SelectionRule::ExactTitle,
            });
        }
        first_ranked.get_or_insert(candidate);
    }

    match first_ranked {
        Some(candidate) => Some(Selection {
            candidate,
            rule: SelectionRule::FirstRanked,
        }),
        None => candidates.first().map(|candidate| Selection {
            candidate,
            rule: SelectionRule::Degraded,
        }),
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("search failed: {0}")]
    Search(DestinationError),

    #[error("selected result has no video id")]
    NoVideoId,

    #[error("like failed: {0}")]
    Like(DestinationError),
}

/// What happened to one track
#[derive(Debug)]
pub enum ImportOutcome {
    Imported { video_id: String },
    NotFound,
    Failed(ImportError),
}

/// Receives one call per processed track. All methods default to doing nothing.
pub trait ImportObserver {
    fn import_started(&mut self, _total: usize) {}
    fn processed(&mut self, _track: &Track, _outcome: &ImportOutcome) {}
    fn import_finished(&mut self) {}
}

impl ImportObserver for () {}

#[derive(Debug)]
pub struct FailedTrack {
    pub track: Track,
    pub error: ImportError,
}

/// Tracks that were not liked, each in input order.
///
/// Everything else from the input was liked.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub total: usize,
    pub not_found: Vec<Track>,
    pub errors: Vec<FailedTrack>,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.total - self.not_found.len() - self.errors.len()
    }

    fn record(&mut self, track: &Track, outcome: ImportOutcome) {
        match outcome {
            ImportOutcome::Imported { .. } => {}
            ImportOutcome::NotFound => self.not_found.push(track.clone()),
            ImportOutcome::Failed(error) => self.errors.push(FailedTrack {
                track: track.clone(),
                error,
            }),
        }
    }
}

/// Searches, selects and likes a single track.
pub fn import_track<D: DestinationCatalog + ?Sized>(catalog: &D, track: &Track) -> ImportOutcome {
    let candidates = match catalog.search(&track.search_query(), SearchFilter::Songs) {
        Ok(candidates) => candidates,
        Err(e) => return ImportOutcome::Failed(ImportError::Search(e)),
    };

    let Some(selection) = select_best(&candidates, track) else {
        return ImportOutcome::NotFound;
    };
    log::debug!("{track}: picked {:?} by {:?}", selection.candidate, selection.rule);

    let Some(video_id) = selection.candidate.video_id.as_deref() else {
        return ImportOutcome::Failed(ImportError::NoVideoId);
    };

    match catalog.like(video_id) {
        Ok(()) => ImportOutcome::Imported {
            video_id: video_id.to_string(),
        },
        Err(e) => ImportOutcome::Failed(ImportError::Like(e)),
    }
}

/// Likes every track it can find, in input order. Never stops early.
pub fn import_liked_tracks<D: DestinationCatalog + ?Sized>(
    catalog: &D,
    tracks: &[Track],
    observer: &mut dyn ImportObserver,
) -> ImportSummary {
    let mut summary = ImportSummary {
        total: tracks.len(),
        ..Default::default()
    };
    observer.import_started(tracks.len());

    for track in tracks {
        let outcome = import_track(catalog, track);
        observer.processed(track, &outcome);
        summary.record(track, outcome);
    }

    observer.import_finished();
    summary
}
