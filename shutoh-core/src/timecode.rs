//! Frame-accurate time representation.
//!
//! A [`FrameTimecode`] stores an exact frame count together with the frame
//! rate it was measured at. Wall-clock strings and seconds are always derived
//! from the frame count, never the other way around, so cut positions survive
//! any number of conversions without drifting.
//!
//! Two timecodes can only be combined when their frame rates match; mixing
//! rates is reported as [`CoreError::FramerateMismatch`].

use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;
use std::fmt;

/// Smallest frame rate accepted by any constructor.
pub const MIN_FPS_DELTA: f64 = 1.0 / 100_000.0;

const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const MAX_HOURS: i64 = 10;

/// A position in a video, counted in frames at a fixed frame rate.
#[derive(Debug, Clone, Copy)]
pub struct FrameTimecode {
    frame_num: u64,
    framerate: f64,
}

impl FrameTimecode {
    /// Creates a timecode from an exact frame count.
    pub fn from_frames(frame_num: u64, framerate: f64) -> CoreResult<Self> {
        check_framerate(framerate)?;
        Ok(Self {
            frame_num,
            framerate,
        })
    }

    /// Creates a timecode from seconds, rounding to the nearest frame.
    pub fn from_seconds(seconds: f64, framerate: f64) -> CoreResult<Self> {
        check_framerate(framerate)?;
        if seconds < 0.0 || !seconds.is_finite() {
            return Err(CoreError::NegativeSecond(seconds));
        }
        Ok(Self {
            frame_num: seconds_to_frames(seconds, framerate),
            framerate,
        })
    }

    /// Parses a strict `HH:MM:SS` or `HH:MM:SS.fff` timestamp.
    ///
    /// Exactly three colon-separated numeric fields are required. Hours and
    /// minutes are plain digits, seconds are digits with an optional
    /// `.digits` fraction; a leading `-` is read as an out-of-range value.
    /// Hours must be in `[0, 10)`, minutes and seconds in `[0, 60)`.
    pub fn from_timecode_str(text: &str, framerate: f64) -> CoreResult<Self> {
        check_framerate(framerate)?;

        let fields: Vec<&str> = text.trim().split(':').collect();
        if fields.len() != 3 || fields.iter().any(|f| f.is_empty()) {
            return Err(CoreError::InvalidTimestamp(text.to_string()));
        }

        let invalid = || CoreError::InvalidTimestamp(text.to_string());
        if !is_integer_field(fields[0])
            || !is_integer_field(fields[1])
            || !is_decimal_field(fields[2])
        {
            return Err(invalid());
        }
        let hours: i64 = fields[0].parse().map_err(|_| invalid())?;
        let minutes: i64 = fields[1].parse().map_err(|_| invalid())?;
        let seconds: f64 = fields[2].parse().map_err(|_| invalid())?;
        if !seconds.is_finite() {
            return Err(invalid());
        }

        if !(0..MAX_HOURS).contains(&hours)
            || !(0..60).contains(&minutes)
            || !(0.0..60.0).contains(&seconds)
        {
            return Err(CoreError::TimeOutOfRange(text.to_string()));
        }

        let total = (hours * 3600 + minutes * 60) as f64 + seconds;
        Ok(Self {
            frame_num: seconds_to_frames(total, framerate),
            framerate,
        })
    }

    /// Parses any of the accepted user-facing forms:
    ///
    /// - a plain frame count: `"9000"`
    /// - seconds with a suffix or decimal point: `"300s"`, `"300.0"`
    /// - a timestamp: `"00:05:00"`, `"00:05:00.000"`
    pub fn parse(text: &str, framerate: f64) -> CoreResult<Self> {
        check_framerate(framerate)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidTimestamp(text.to_string()));
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let frame_num = trimmed
                .parse()
                .map_err(|_| CoreError::InvalidTimestamp(text.to_string()))?;
            return Self::from_frames(frame_num, framerate);
        }

        if trimmed.contains(':') {
            return Self::from_timecode_str(trimmed, framerate);
        }

        let number = trimmed.strip_suffix('s').unwrap_or(trimmed);
        let seconds: f64 = number
            .parse()
            .map_err(|_| CoreError::InvalidTimestamp(text.to_string()))?;
        Self::from_seconds(seconds, framerate)
    }

    pub fn frame_num(&self) -> u64 {
        self.frame_num
    }

    pub fn framerate(&self) -> f64 {
        self.framerate
    }

    /// Returns a timecode at `frame_num` sharing this timecode's frame rate.
    pub fn with_frame(&self, frame_num: u64) -> Self {
        Self {
            frame_num,
            framerate: self.framerate,
        }
    }

    /// Position in seconds.
    pub fn seconds(&self) -> f64 {
        self.frame_num as f64 / self.framerate
    }

    /// Seconds with millisecond precision, the form ffmpeg expects for `-ss`/`-t`.
    pub fn to_seconds_string(&self) -> String {
        format!("{:.3}", self.seconds())
    }

    pub fn try_add(&self, other: &FrameTimecode) -> CoreResult<Self> {
        self.check_same_rate(other)?;
        Ok(self.with_frame(self.frame_num.saturating_add(other.frame_num)))
    }

    /// Subtracts `other`, clamping at frame zero.
    pub fn try_sub(&self, other: &FrameTimecode) -> CoreResult<Self> {
        self.check_same_rate(other)?;
        Ok(self.with_frame(self.frame_num.saturating_sub(other.frame_num)))
    }

    fn check_same_rate(&self, other: &FrameTimecode) -> CoreResult<()> {
        if (self.framerate - other.framerate).abs() < MIN_FPS_DELTA {
            Ok(())
        } else {
            Err(CoreError::FramerateMismatch {
                left: self.framerate,
                right: other.framerate,
            })
        }
    }
}

fn check_framerate(framerate: f64) -> CoreResult<()> {
    // NaN fails this comparison too
    if framerate >= MIN_FPS_DELTA {
        Ok(())
    } else {
        Err(CoreError::TooSmallFpsValue(framerate))
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer_field(field: &str) -> bool {
    is_digits(field.strip_prefix('-').unwrap_or(field))
}

fn is_decimal_field(field: &str) -> bool {
    let unsigned = field.strip_prefix('-').unwrap_or(field);
    match unsigned.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => is_digits(unsigned),
    }
}

fn seconds_to_frames(seconds: f64, framerate: f64) -> u64 {
    (seconds * framerate).round() as u64
}

impl fmt::Display for FrameTimecode {
    /// Formats as `HH:MM:SS.fff`. Millisecond rounding carries into the
    /// minute and hour fields.
    ///
    /// The hour field keeps growing past 9, but
    /// [`FrameTimecode::from_timecode_str`] only accepts hours below 10, so
    /// output from `10:00:00.000` on does not parse back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.seconds() * 1000.0).round() as u64;
        let ms = total_ms % 1000;
        let total_secs = total_ms / 1000;
        let secs = total_secs % SECONDS_PER_MINUTE;
        let total_mins = total_secs / SECONDS_PER_MINUTE;
        let mins = total_mins % MINUTES_PER_HOUR;
        let hours = total_mins / MINUTES_PER_HOUR;
        write!(f, "{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    }
}

impl PartialEq for FrameTimecode {
    fn eq(&self, other: &Self) -> bool {
        self.frame_num == other.frame_num
    }
}

impl Eq for FrameTimecode {}

impl PartialOrd for FrameTimecode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrameTimecode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frame_num.cmp(&other.frame_num)
    }
}
