//! Terminal feedback for export and import.
//!
//! Shows a progress bar with the last processed track below it. In log-only
//! mode the bar is hidden and progress is logged periodically instead, which
//! keeps the output tail-friendly.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

use crate::{
    destination::matcher::{ImportObserver, ImportOutcome},
    domain::track::Track,
    source::{error::SourceError, reader::ExportObserver},
};

const LOG_INTERVAL: u64 = 50;

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

fn create_progress_bar(len: u64, phase: &str, log_only: bool) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if log_only {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_bar()
            .template(
                "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta})\n{wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(style);
    }
    pb.set_prefix(phase.to_string());
    pb
}

pub struct TerminalProgress {
    log_only: bool,
    bar: Option<ProgressBar>,
    phase: &'static str,
    started: Instant,
}

impl TerminalProgress {
    pub fn new(log_only: bool) -> Self {
        Self {
            log_only,
            bar: None,
            phase: "",
            started: Instant::now(),
        }
    }

    fn begin(&mut self, phase: &'static str, total: usize) {
        self.phase = phase;
        self.started = Instant::now();
        self.bar = Some(create_progress_bar(total as u64, phase, self.log_only));
    }

    fn advance(&mut self, status: Option<&Track>) {
        let Some(bar) = &self.bar else { return };
        bar.inc(1);
        if let Some(track) = status {
            bar.set_message(track.to_string());
        }
        let (current, total) = (bar.position(), bar.length().unwrap_or(0));
        if self.log_only && (current % LOG_INTERVAL == 0 || current == total) {
            let pct = 100.0 * current as f64 / total.max(1) as f64;
            log::info!("[{}] {}/{} ({:.1}%)", self.phase, current, total, pct);
        }
    }

    /// Prints above the bar, or logs when the bar is hidden
    fn report(&self, message: String) {
        match &self.bar {
            Some(bar) if !self.log_only => bar.println(message),
            _ => log::warn!("{message}"),
        }
    }

    fn end(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        log::info!(
            "[{}] done in {}",
            self.phase,
            format_duration(self.started.elapsed())
        );
    }
}

impl ExportObserver for TerminalProgress {
    fn export_started(&mut self, total: usize) {
        self.begin("Export tracks", total);
    }

    fn exported(&mut self, _position: usize, track: &Track) {
        self.advance(Some(track));
    }

    fn skipped(&mut self, position: usize, reason: &SourceError) {
        let message = match reason {
            SourceError::MissingArtistId { .. } => {
                format!("Skipped track {}: Missing artist ID", position + 1)
            }
            other => format!("Skipped track {}: {other}", position + 1),
        };
        self.report(message);
        self.advance(None);
    }

    fn export_finished(&mut self, _exported: usize, _skipped: usize) {
        self.end();
    }
}

impl ImportObserver for TerminalProgress {
    fn import_started(&mut self, total: usize) {
        self.begin("Import tracks", total);
    }

    fn processed(&mut self, track: &Track, outcome: &ImportOutcome) {
        match outcome {
            ImportOutcome::Imported { .. } => {}
            ImportOutcome::NotFound => self.report(format!("Not found: {track}")),
            ImportOutcome::Failed(e) => self.report(format!("Error: {track}, {e}")),
        }
        self.advance(Some(track));
    }

    fn import_finished(&mut self) {
        self.end();
    }
}
