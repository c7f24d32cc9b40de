// ============================================================================
// cuemux-core/src/cue/mod.rs
// ============================================================================
//
// CUE SHEETS: Data Model and Parsing
//
// A cue sheet is a plain-text sidecar describing track boundaries inside a
// single audio stream with FILE / TRACK / TITLE / INDEX directives. Only the
// parts needed to build chapter markers are modelled here: the album-level
// TITLE and PERFORMER, the referenced files, and per-track titles and
// INDEX 01 positions.
//
// KEY COMPONENTS:
// - CueSheet / CueTrack / CueFile: parsed representation
// - parser: line-oriented cue sheet parser
// - timestamp: `mm:ss:ff` handling at 75 frames per second
// - encoding: byte decoding with a legacy code page fallback

pub mod encoding;
pub mod parser;
pub mod timestamp;

pub use encoding::{decode_cue_bytes, resolve_encoding};
pub use parser::{parse_cue_sheet, read_cue_file};
pub use timestamp::{CueTimestamp, FRAMES_PER_SECOND};

/// Parsed cue sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueSheet {
    /// Album title from the header TITLE line
    pub title: Option<String>,
    /// Album artist from the header PERFORMER line
    pub performer: Option<String>,
    /// FILE entries in source order
    pub files: Vec<CueFile>,
    /// Tracks in source order
    pub tracks: Vec<CueTrack>,
}

/// A `FILE "<name>" <type>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueFile {
    pub name: String,
    pub file_type: Option<String>,
}

/// One chapter candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    /// 1-based TRACK number as written in the cue sheet
    pub number: u32,
    pub title: Option<String>,
    pub performer: Option<String>,
    /// Position of `INDEX 01`, if the track had one
    pub start: Option<CueTimestamp>,
}

impl CueTrack {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            title: None,
            performer: None,
            start: None,
        }
    }

    /// Start position in milliseconds, if known.
    pub fn start_millis(&self) -> Option<u64> {
        self.start.as_ref().map(CueTimestamp::to_millis)
    }

    /// The track title, or `Track N` when the cue sheet gives none.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => format!("Track {}", self.number),
        }
    }
}
