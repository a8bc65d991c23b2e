// ============================================================================
// shutoh-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for Shutoh Core
//
// This module defines the error types used throughout the shutoh-core library.
// It provides a unified error handling approach using the thiserror crate.
//
// KEY COMPONENTS:
// - CoreError: Enum of all possible error types
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for creating common external command errors

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Timestamp Errors ----
    #[error("Invalid timestamp '{0}': expected HH:MM:SS or HH:MM:SS.fff")]
    InvalidTimestamp(String),

    #[error("Time value out of range in '{0}'")]
    TimeOutOfRange(String),

    #[error("Negative seconds are not allowed: {0}")]
    NegativeSecond(f64),

    // ---- Range / Configuration Errors ----
    #[error("Frame rate {0} is too small")]
    TooSmallFpsValue(f64),

    #[error("Negative frame number: {0}")]
    NegativeFrameNum(i64),

    #[error("Frame number {requested} exceeds the last frame {maximum}")]
    OverMaximumFrameNum { requested: i64, maximum: u64 },

    #[error("Frame rates differ: {left} vs {right}")]
    FramerateMismatch { left: f64, right: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ---- Video Source Errors ----
    #[error("No such file: {0}")]
    NoSuchFile(PathBuf),

    #[error("Failed to open video file {path}: {message}")]
    FailedToOpenFile { path: PathBuf, message: String },

    #[error("Unsupported codec or no video stream in {0}")]
    NotSupportedCodec(PathBuf),

    #[error("Failed to set frame position to {0}")]
    FailedToSetFramePosition(u64),

    // ---- Usage Errors ----
    #[error("{0} must be called before {1}")]
    FunctionIsNotCalled(&'static str, &'static str),

    #[error("Frame decode thread panicked")]
    DecodeThreadPanicked,

    // ---- External Command Errors ----
    #[error("Failed to execute {0}: {1}")]
    CommandStart(String, io::Error),

    #[error("Command {0} failed with status {1}. Stderr: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed to write {count} of {total} clip(s)")]
    SplitFailed { count: usize, total: usize },

    // ---- Wrapped Library Errors ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// --- Helper functions for creating errors ---

pub fn command_start_error(cmd: impl Into<String>, e: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), e)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}
