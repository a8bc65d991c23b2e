// shutoh-cli/src/reporting.rs
//
// Terminal progress bar for scene detection, driven by the core reporter
// events. indicatif hides the bar when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use shutoh_core::reporting::{DetectionSummary, Reporter};
use std::sync::Mutex;
use std::time::Duration;

/// Reporter that draws one progress bar per detection run.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
    cuts: Mutex<usize>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
            cuts: Mutex::new(0),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalReporter {
    fn detection_started(&self, detector: &'static str, total_frames: u64) {
        self.finish_progress();
        let pb = ProgressBar::new(total_frames);
        let style = ProgressStyle::default_bar()
            .template("Detecting [{bar:40}] {percent:>3}% {pos}/{len} frames ({per_sec}, eta {eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(style);
        pb.set_message(format!("{detector}: 0 cuts"));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut cuts) = self.cuts.lock() {
            *cuts = 0;
        }
        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(pb);
        }
    }

    fn frame_processed(&self, _frame_num: u64) {
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn cut_found(&self, _frame_num: u64) {
        let Ok(mut cuts) = self.cuts.lock() else {
            return;
        };
        *cuts += 1;
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_message(format!("{} cuts", *cuts));
            }
        }
    }

    fn detection_complete(&self, summary: &DetectionSummary) {
        self.finish_progress();
        log::debug!(
            "{} detector: {} frames in {:.1}s",
            summary.detector,
            summary.frames_processed,
            summary.elapsed_secs
        );
    }
}
