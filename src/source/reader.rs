use crate::{
    domain::track::Track,
    source::{SourceCatalog, error::SourceError},
};

/// Receives export progress. All methods default to doing nothing.
pub trait ExportObserver {
    fn export_started(&mut self, _total: usize) {}
    /// `position` is zero-based in listing order
    fn exported(&mut self, _position: usize, _track: &Track) {}
    fn skipped(&mut self, _position: usize, _reason: &SourceError) {}
    fn export_finished(&mut self, _exported: usize, _skipped: usize) {}
}

impl ExportObserver for () {}

#[derive(Debug)]
pub struct LibraryExport {
    /// in the catalog's listing order
    pub tracks: Vec<Track>,
    /// entries that could not be resolved
    pub skipped: usize,
}

/// Reads every liked track of the source library.
///
/// Only a failing listing call is an error. An entry that fails to resolve
/// is skipped and counted, the rest of the library is still read.
pub fn export_liked_tracks<C: SourceCatalog + ?Sized>(
    catalog: &C,
    observer: &mut dyn ExportObserver,
) -> Result<LibraryExport, SourceError> {
    let refs = catalog.liked_tracks()?;
    observer.export_started(refs.len());

    let mut tracks = Vec::with_capacity(refs.len());
    let mut skipped = 0;

    for (position, track_ref) in refs.iter().enumerate() {
        match catalog.resolve(track_ref) {
            Ok(resolved) => {
                let track = Track::from_artists(&resolved.artists, resolved.title);
                observer.exported(position, &track);
                tracks.push(track);
            }
            Err(e) => {
                match &e {
                    SourceError::MissingArtistId { .. } => {
                        log::debug!("skipping liked entry {}: missing artist id", track_ref.id)
                    }
                    _ => log::debug!("skipping liked entry {}: {e}", track_ref.id),
                }
                skipped += 1;
                observer.skipped(position, &e);
            }
        }
    }

    observer.export_finished(tracks.len(), skipped);
    Ok(LibraryExport { tracks, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::track::UNKNOWN_ARTIST,
        source::{ResolvedTrack, TrackRef},
    };
    use std::collections::HashMap;

    enum Entry {
        Ok(&'static str, &'static [&'static str]),
        MissingArtistId,
        Broken,
    }

    struct FakeCatalog {
        listing_fails: bool,
        entries: Vec<(&'static str, Entry)>,
    }

    impl FakeCatalog {
        fn new(entries: Vec<(&'static str, Entry)>) -> Self {
            Self {
                listing_fails: false,
                entries,
            }
        }
    }

    impl SourceCatalog for FakeCatalog {
        fn liked_tracks(&self) -> Result<Vec<TrackRef>, SourceError> {
            if self.listing_fails {
                return Err(SourceError::Malformed("listing down".into()));
            }
            Ok(self
                .entries
                .iter()
                .map(|(id, _)| TrackRef {
                    id: id.to_string(),
                    album_id: None,
                })
                .collect())
        }

        fn resolve(&self, track: &TrackRef) -> Result<ResolvedTrack, SourceError> {
            let entries: HashMap<_, _> = self.entries.iter().map(|(id, e)| (*id, e)).collect();
            match entries[track.id.as_str()] {
                Entry::Ok(title, artists) => Ok(ResolvedTrack {
                    title: title.to_string(),
                    artists: artists.iter().map(|a| a.to_string()).collect(),
                }),
                Entry::MissingArtistId => Err(SourceError::MissingArtistId {
                    track_id: track.id.clone(),
                }),
                Entry::Broken => Err(SourceError::Malformed("bad json".into())),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        exported: Vec<usize>,
        skipped: Vec<usize>,
        finished: Option<(usize, usize)>,
    }

    impl ExportObserver for Recorder {
        fn export_started(&mut self, total: usize) {
            self.total = Some(total);
        }
        fn exported(&mut self, position: usize, _track: &Track) {
            self.exported.push(position);
        }
        fn skipped(&mut self, position: usize, _reason: &SourceError) {
            self.skipped.push(position);
        }
        fn export_finished(&mut self, exported: usize, skipped: usize) {
            self.finished = Some((exported, skipped));
        }
    }

    #[test]
    fn test_export_keeps_listing_order() -> anyhow::Result<()> {
        let catalog = FakeCatalog::new(vec![
            ("1", Entry::Ok("First", &["A"])),
            ("2", Entry::Ok("Second", &["B", "C"])),
            ("3", Entry::Ok("Third", &["D"])),
        ]);

        let export = export_liked_tracks(&catalog, &mut ())?;

        assert_eq!(
            export.tracks,
            vec![
                Track::new("A", "First"),
                Track::new("B", "Second"),
                Track::new("D", "Third"),
            ]
        );
        assert_eq!(export.skipped, 0);
        Ok(())
    }

    #[test]
    fn test_export_skips_bad_entries() -> anyhow::Result<()> {
        let catalog = FakeCatalog::new(vec![
            ("1", Entry::Ok("First", &["A"])),
            ("2", Entry::MissingArtistId),
            ("3", Entry::Broken),
            ("4", Entry::Ok("Fourth", &["B"])),
        ]);
        let mut recorder = Recorder::default();

        let export = export_liked_tracks(&catalog, &mut recorder)?;

        assert_eq!(
            export.tracks,
            vec![Track::new("A", "First"), Track::new("B", "Fourth")]
        );
        assert_eq!(export.skipped, 2);
        assert_eq!(recorder.total, Some(4));
        assert_eq!(recorder.exported, vec![0, 3]);
        assert_eq!(recorder.skipped, vec![1, 2]);
        assert_eq!(recorder.finished, Some((2, 2)));
        Ok(())
    }

    #[test]
    fn test_export_unknown_artist() -> anyhow::Result<()> {
        let catalog = FakeCatalog::new(vec![("1", Entry::Ok("Nameless", &[]))]);

        let export = export_liked_tracks(&catalog, &mut ())?;

        assert_eq!(export.tracks, vec![Track::new(UNKNOWN_ARTIST, "Nameless")]);
        Ok(())
    }

    #[test]
    fn test_export_listing_failure_is_an_error() {
        let catalog = FakeCatalog {
            listing_fails: true,
            entries: vec![],
        };

        assert!(export_liked_tracks(&catalog, &mut ()).is_err());
    }
}
