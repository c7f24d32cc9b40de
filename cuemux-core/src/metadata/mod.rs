// ============================================================================
// cuemux-core/src/metadata/mod.rs
// ============================================================================
//
// FFMETADATA: ffmpeg's Chapter Metadata Text Format
//
// ffmpeg reads global tags and chapters from an INI-like file that starts
// with `;FFMETADATA1`. Chapters are `[CHAPTER]` sections carrying a TIMEBASE,
// START, END and any tags (we only write `title`). The characters `=`, `;`,
// `#`, `\` and newline are structurally significant and are escaped with a
// backslash.
//
// KEY COMPONENTS:
// - FfMetadata: global tags plus chapters
// - writer: pure serializer to FFMETADATA1 text
// - reader: parser for the same text, used to verify what we emit

pub mod reader;
pub mod writer;

pub use reader::parse_ffmetadata;
pub use writer::{escape_value, render_chapters, to_ffmetadata};

use crate::chapters::Chapter;
use crate::cue::CueSheet;

/// First line of every ffmetadata file.
pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

/// Section name for chapter blocks.
pub const CHAPTER_SECTION: &str = "[CHAPTER]";

/// Timebase used for chapter START/END values (milliseconds).
pub const CHAPTER_TIMEBASE: &str = "1/1000";

/// Global tags and chapters for one output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfMetadata {
    /// Global `key=value` tags in output order
    pub tags: Vec<(String, String)>,
    pub chapters: Vec<Chapter>,
}

impl FfMetadata {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self {
            tags: Vec::new(),
            chapters,
        }
    }

    /// Builds metadata with the album title and artist from the cue header.
    pub fn from_cue_sheet(sheet: &CueSheet, chapters: Vec<Chapter>) -> Self {
        let mut metadata = Self::new(chapters);
        if let Some(title) = sheet.title.as_deref().filter(|t| !t.is_empty()) {
            metadata = metadata.with_tag("title", title);
        }
        if let Some(artist) = sheet.performer.as_deref().filter(|a| !a.is_empty()) {
            metadata = metadata.with_tag("artist", artist);
        }
        metadata
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Returns the first global tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
