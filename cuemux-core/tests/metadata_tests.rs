// cuemux-core/tests/metadata_tests.rs

use cuemux_core::chapters::{Chapter, ChapterEnd, build_chapters};
use cuemux_core::cue::parse_cue_sheet;
use cuemux_core::metadata::{FfMetadata, parse_ffmetadata, to_ffmetadata};

#[test]
fn test_special_character_titles_round_trip() {
    let titles = [
        "Part 1; The Beginning",
        "a=b",
        "#1 Hit",
        "C:\\Books\\chapter",
        "Line one\nLine two",
        "Глава 3",
    ];
    let chapters: Vec<Chapter> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Chapter {
            start_ms: i as u64 * 1000,
            end: ChapterEnd::At((i as u64 + 1) * 1000),
            title: title.to_string(),
        })
        .collect();
    let metadata = FfMetadata::new(chapters).with_tag("comment", "x=y; #z");

    let parsed = parse_ffmetadata(&to_ffmetadata(&metadata)).unwrap();
    assert_eq!(parsed, metadata);
}

#[test]
fn test_cue_sheet_to_ffmetadata_text() {
    let cue = "PERFORMER \"Jane Doe\"\nTITLE \"A Book\"\nFILE \"book.mp3\" MP3\n  TRACK 01 AUDIO\n    TITLE \"Intro\"\n    INDEX 01 00:00:00\n  TRACK 02 AUDIO\n    INDEX 01 03:15:00\n";
    let sheet = parse_cue_sheet(cue).unwrap();
    let metadata = FfMetadata::from_cue_sheet(&sheet, build_chapters(&sheet).unwrap());

    let expected = "\
;FFMETADATA1
title=A Book
artist=Jane Doe
[CHAPTER]
TIMEBASE=1/1000
START=0
END=195000
title=Intro
[CHAPTER]
TIMEBASE=1/1000
START=195000
END=195000
title=Track 2
";
    assert_eq!(to_ffmetadata(&metadata), expected);
}
