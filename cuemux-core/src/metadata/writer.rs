//! FFMETADATA1 serializer.
//!
//! Pure functions: nothing here touches the file system.

use crate::chapters::{Chapter, ChapterEnd};
use crate::metadata::{CHAPTER_SECTION, CHAPTER_TIMEBASE, FFMETADATA_HEADER, FfMetadata};
use std::fmt::Write;

/// Escapes a key or value so ffmpeg reads it back verbatim.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '=' | ';' | '#' | '\n' | '\r') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Renders global tags and chapters as FFMETADATA1 text.
///
/// Every chapter block is TIMEBASE, START, END, title in that order. An open
/// end is written as `END=<start>`; the mp4 muxer derives the last chapter's
/// real extent from the stream.
pub fn to_ffmetadata(metadata: &FfMetadata) -> String {
    let mut out = String::new();
    out.push_str(FFMETADATA_HEADER);
    out.push('\n');

    for (key, value) in &metadata.tags {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}={}", escape_value(key), escape_value(value));
    }

    for chapter in &metadata.chapters {
        write_chapter(&mut out, chapter);
    }

    out
}

/// Renders chapters with no global tags.
pub fn render_chapters(chapters: &[Chapter]) -> String {
    to_ffmetadata(&FfMetadata::new(chapters.to_vec()))
}

fn write_chapter(out: &mut String, chapter: &Chapter) {
    out.push_str(CHAPTER_SECTION);
    out.push('\n');
    let _ = writeln!(out, "TIMEBASE={CHAPTER_TIMEBASE}");
    let _ = writeln!(out, "START={}", chapter.start_ms);
    // ffmpeg reads the line after START as END no matter what it holds.
    let end = match chapter.end {
        ChapterEnd::At(end) => end,
        ChapterEnd::Open => chapter.start_ms,
    };
    let _ = writeln!(out, "END={end}");
    let _ = writeln!(out, "title={}", escape_value(&chapter.title));
}
