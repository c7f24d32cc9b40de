// cuemux-core/tests/cue_chapter_tests.rs

use cuemux_core::chapters::{ChapterEnd, build_chapters, close_open_end};
use cuemux_core::cue::{parse_cue_sheet, read_cue_file};
use cuemux_core::error::CoreError;
use std::fs;
use tempfile::tempdir;

fn cue_with_starts(starts: &[&str]) -> String {
    let mut cue = String::from("TITLE \"Book\"\nFILE \"book.mp3\" MP3\n");
    for (i, start) in starts.iter().enumerate() {
        cue.push_str(&format!(
            "  TRACK {:02} AUDIO\n    TITLE \"Chapter {}\"\n    INDEX 01 {}\n",
            i + 1,
            i + 1,
            start
        ));
    }
    cue
}

#[test]
fn test_known_timestamps_convert_to_millis() {
    let sheet = parse_cue_sheet(&cue_with_starts(&["00:00:00", "03:15:00", "07:42:50"])).unwrap();
    let chapters = build_chapters(&sheet).unwrap();

    let starts: Vec<u64> = chapters.iter().map(|c| c.start_ms).collect();
    assert_eq!(starts, vec![0, 195_000, 462_667]);
}

#[test]
fn test_chapters_are_contiguous_and_last_is_open() {
    let starts = ["00:00:00", "01:00:00", "02:30:10", "10:00:74", "75:00:00"];
    let sheet = parse_cue_sheet(&cue_with_starts(&starts)).unwrap();
    let chapters = build_chapters(&sheet).unwrap();

    assert_eq!(chapters.len(), starts.len());
    for pair in chapters.windows(2) {
        assert_eq!(pair[0].end, ChapterEnd::At(pair[1].start_ms));
    }
    assert_eq!(chapters.last().unwrap().end, ChapterEnd::Open);
    assert_eq!(chapters[3].title, "Chapter 4");
}

#[test]
fn test_out_of_order_tracks_are_rejected() {
    let sheet = parse_cue_sheet(&cue_with_starts(&["00:00:00", "05:00:00", "04:59:74"])).unwrap();
    assert!(matches!(
        build_chapters(&sheet),
        Err(CoreError::OutOfOrderTimestamp(2, 3))
    ));
}

#[test]
fn test_empty_cue_sheet() {
    let sheet = parse_cue_sheet("REM GENRE Audiobook\nTITLE \"Nothing\"\nFILE \"book.mp3\" MP3\n").unwrap();
    assert!(matches!(build_chapters(&sheet), Err(CoreError::EmptyCueSheet)));
}

#[test]
fn test_missing_index_names_the_track() {
    let cue = "FILE \"a.mp3\" MP3\nTRACK 01 AUDIO\n  INDEX 01 00:00:00\nTRACK 02 AUDIO\n  TITLE \"No index\"\n";
    let sheet = parse_cue_sheet(cue).unwrap();
    assert!(matches!(build_chapters(&sheet), Err(CoreError::MissingTimestamp(2))));
}

#[test]
fn test_close_open_end_with_stream_duration() {
    let sheet = parse_cue_sheet(&cue_with_starts(&["00:00:00", "03:15:00"])).unwrap();
    let mut chapters = build_chapters(&sheet).unwrap();

    assert!(close_open_end(&mut chapters, 400_000));
    assert_eq!(chapters[1].end, ChapterEnd::At(400_000));
    assert!(!close_open_end(&mut chapters, 500_000));
}

#[test]
fn test_read_cue_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("book.cue");
    let text = cue_with_starts(&["00:00:00", "00:30:00"]).replace('\n', "\r\n");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(text.as_bytes());
    fs::write(&path, bytes).unwrap();

    let sheet = read_cue_file(&path, None).unwrap();
    assert_eq!(sheet.title.as_deref(), Some("Book"));
    assert_eq!(sheet.tracks.len(), 2);
    assert_eq!(sheet.tracks[1].start_millis(), Some(30_000));
}

#[test]
fn test_read_missing_cue_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        read_cue_file(&dir.path().join("nope.cue"), None),
        Err(CoreError::PathError(_))
    ));
}
