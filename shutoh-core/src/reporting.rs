//! Progress events emitted while a detector runs.
//!
//! The scene manager calls into a [`Reporter`] from the detection thread.
//! Front ends decide how (and whether) to present these events.

/// Totals of a finished detection run.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSummary {
    pub detector: &'static str,
    pub frames_processed: u64,
    pub cuts: usize,
    pub elapsed_secs: f64,
}

/// Reporter interface. Every event has a default no-op implementation.
pub trait Reporter: Send + Sync {
    fn detection_started(&self, _detector: &'static str, _total_frames: u64) {}
    fn frame_processed(&self, _frame_num: u64) {}
    fn cut_found(&self, _frame_num: u64) {}
    fn detection_complete(&self, _summary: &DetectionSummary) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}
