//! Runs a whole migration: export from the source, import into the destination.
//!
//! Nothing is checkpointed. If the process stops midway, the outcome of the
//! tracks handled so far is lost and a new run starts from scratch.

use crate::{
    destination::{
        DestinationCatalog,
        matcher::{ImportObserver, import_liked_tracks},
    },
    report::{ErrorEntry, TransferReport},
    source::{
        SourceCatalog,
        error::SourceError,
        reader::{ExportObserver, export_liked_tracks},
    },
};

/// Observes both stages of a transfer
pub trait TransferObserver: ExportObserver + ImportObserver {}

impl<T: ExportObserver + ImportObserver> TransferObserver for T {}

/// Moves every liked track from `source` to `destination`.
///
/// The source lists the newest like first, so the list is reversed to like
/// the oldest track first and keep the destination's history in the same order.
/// Fails only when the source library cannot be listed.
pub fn transfer<S, D, O>(
    source: &S,
    destination: &D,
    observer: &mut O,
) -> Result<TransferReport, SourceError>
where
    S: SourceCatalog + ?Sized,
    D: DestinationCatalog + ?Sized,
    O: TransferObserver,
{
    let export = export_liked_tracks(source, observer)?;
    let mut tracks = export.tracks;
    tracks.reverse();

    let summary = import_liked_tracks(destination, &tracks, observer);

    Ok(TransferReport {
        errors: summary.errors.iter().map(ErrorEntry::from).collect(),
        not_found: summary.not_found,
        liked_tracks: tracks,
        skipped: export.skipped,
    })
}
