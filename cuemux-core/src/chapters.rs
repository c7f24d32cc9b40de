// ============================================================================
// cuemux-core/src/chapters.rs
// ============================================================================
//
// CHAPTER BUILDER: Cue Tracks to Chapter Boundaries
//
// Converts the tracks of a parsed cue sheet into an ordered list of chapters.
// Each chapter starts at its track's INDEX 01 and ends exactly where the next
// chapter starts. The last chapter has an open end (`ChapterEnd::Open`) until
// the stream duration is known.

use crate::cue::{CueSheet, CueTrack};
use crate::error::{CoreError, CoreResult};

/// End of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterEnd {
    /// Exclusive end time in milliseconds
    At(u64),
    /// Runs to the end of the stream
    Open,
}

impl ChapterEnd {
    pub fn millis(&self) -> Option<u64> {
        match self {
            ChapterEnd::At(ms) => Some(*ms),
            ChapterEnd::Open => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ChapterEnd::Open)
    }
}

/// One chapter marker as written to the ffmpeg metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Start time in milliseconds
    pub start_ms: u64,
    pub end: ChapterEnd,
    pub title: String,
}

impl Chapter {
    /// Length of the chapter, or `None` while the end is open.
    pub fn duration_ms(&self) -> Option<u64> {
        self.end.millis().map(|end| end.saturating_sub(self.start_ms))
    }
}

/// Builds validated chapters from a cue sheet.
///
/// Fails with `EmptyCueSheet` when there are no tracks, `MissingTimestamp`
/// when a track has no INDEX 01, and `OutOfOrderTimestamp` when a track
/// starts before its predecessor. Nothing is returned on failure.
pub fn build_chapters(sheet: &CueSheet) -> CoreResult<Vec<Chapter>> {
    if sheet.tracks.is_empty() {
        return Err(CoreError::EmptyCueSheet);
    }

    let mut tracks: Vec<&CueTrack> = sheet.tracks.iter().collect();
    tracks.sort_by_key(|track| track.number);

    for pair in tracks.windows(2) {
        if pair[0].number == pair[1].number {
            log::warn!("Cue sheet lists track {} more than once", pair[0].number);
        }
    }

    let starts = tracks
        .iter()
        .map(|track| {
            track
                .start_millis()
                .ok_or(CoreError::MissingTimestamp(track.number))
        })
        .collect::<CoreResult<Vec<u64>>>()?;

    for (i, pair) in starts.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(CoreError::OutOfOrderTimestamp(
                tracks[i].number,
                tracks[i + 1].number,
            ));
        }
        if pair[1] == pair[0] {
            log::warn!(
                "Tracks {} and {} start at the same time; chapter {} will be empty",
                tracks[i].number,
                tracks[i + 1].number,
                tracks[i].number
            );
        }
    }

    let chapters: Vec<Chapter> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| Chapter {
            start_ms: starts[i],
            end: starts
                .get(i + 1)
                .map_or(ChapterEnd::Open, |next| ChapterEnd::At(*next)),
            title: track.display_title(),
        })
        .collect();

    log::debug!("Built {} chapters from cue sheet", chapters.len());
    Ok(chapters)
}

/// Closes an open last chapter at `stream_end_ms`.
///
/// Returns `true` when the end was set. The end is left open if the stream
/// end does not fall after the chapter start, since that would produce an
/// empty or inverted chapter.
pub fn close_open_end(chapters: &mut [Chapter], stream_end_ms: u64) -> bool {
    let Some(last) = chapters.last_mut() else {
        return false;
    };
    if !last.end.is_open() {
        return false;
    }
    if stream_end_ms <= last.start_ms {
        log::warn!(
            "Stream ends at {} ms, not after the last chapter start ({} ms); leaving its end open",
            stream_end_ms,
            last.start_ms
        );
        return false;
    }
    last.end = ChapterEnd::At(stream_end_ms);
    true
}
