//! Cue sheet timestamps (`mm:ss:ff`).
//!
//! Cue sheets express positions as minutes, seconds and frames, where a frame
//! is 1/75th of a second. Minutes are not capped at 99 because audiobooks
//! routinely run for many hours.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of cue frames in one second.
pub const FRAMES_PER_SECOND: u32 = 75;

/// A position inside the audio stream as written in an `INDEX` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CueTimestamp {
    pub minutes: u32,
    pub seconds: u8,
    pub frames: u8,
}

/// Reasons a timestamp string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("expected at most 3 ':'-separated fields, found {0}")]
    TooManyFields(usize),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("seconds value {0} is out of range (0-59)")]
    SecondsOutOfRange(u32),

    #[error("frames value {0} is out of range (0-74)")]
    FramesOutOfRange(u32),
}

impl CueTimestamp {
    pub fn new(minutes: u32, seconds: u8, frames: u8) -> Self {
        Self {
            minutes,
            seconds,
            frames,
        }
    }

    /// Converts the timestamp to milliseconds, rounding frames to the
    /// nearest millisecond.
    ///
    /// A frame is 40/3 ms, so the fractional part is never exactly one half
    /// and adding 37 before the division rounds correctly.
    pub fn to_millis(&self) -> u64 {
        let frames_ms = (u64::from(self.frames) * 1000 + 37) / u64::from(FRAMES_PER_SECOND);
        u64::from(self.minutes) * 60_000 + u64::from(self.seconds) * 1000 + frames_ms
    }
}

impl FromStr for CueTimestamp {
    type Err = TimestampError;

    /// Parses `mm:ss:ff`. Shorter `mm:ss` and `mm` forms are accepted with
    /// the missing fields treated as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }

        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() > 3 {
            return Err(TimestampError::TooManyFields(fields.len()));
        }

        let parse_field = |field: &str| -> Result<u32, TimestampError> {
            let field = field.trim();
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimestampError::NotANumber(field.to_string()));
            }
            field
                .parse::<u32>()
                .map_err(|_| TimestampError::NotANumber(field.to_string()))
        };

        let minutes = parse_field(fields[0])?;
        let seconds = match fields.get(1) {
            Some(field) => parse_field(field)?,
            None => 0,
        };
        let frames = match fields.get(2) {
            Some(field) => parse_field(field)?,
            None => 0,
        };

        if seconds >= 60 {
            return Err(TimestampError::SecondsOutOfRange(seconds));
        }
        if frames >= FRAMES_PER_SECOND {
            return Err(TimestampError::FramesOutOfRange(frames));
        }

        Ok(Self::new(minutes, seconds as u8, frames as u8))
    }
}

impl fmt::Display for CueTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}
