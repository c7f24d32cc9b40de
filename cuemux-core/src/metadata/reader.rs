//! FFMETADATA1 parser.
//!
//! Mirrors the rules ffmpeg applies when reading a metadata file: a backslash
//! escapes the next character (including a newline), lines starting with `;`
//! or `#` are comments, `[SECTION]` lines open a section, and everything
//! else is `key=value`. A chapter block is read positionally: an optional
//! TIMEBASE, then START, then END, then tags. START/END are converted from
//! the chapter's TIMEBASE to milliseconds; without a TIMEBASE ffmpeg assumes
//! nanoseconds.

use crate::chapters::{Chapter, ChapterEnd};
use crate::error::{CoreError, CoreResult};
use crate::metadata::{FFMETADATA_HEADER, FfMetadata};

/// A character together with whether it was backslash-escaped.
type Unit = (char, bool);

const DEFAULT_TIMEBASE: (u64, u64) = (1, 1_000_000_000);

#[derive(Debug, PartialEq, Eq)]
enum Section {
    Global,
    Chapter(PendingChapter),
    Other,
}

/// Line ffmpeg expects next inside a `[CHAPTER]` block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ChapterField {
    #[default]
    TimebaseOrStart,
    Start,
    End,
    Tags,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct PendingChapter {
    next: ChapterField,
    timebase: Option<(u64, u64)>,
    start: Option<u64>,
    end: Option<u64>,
    title: Option<String>,
}

impl PendingChapter {
    fn finish(self) -> CoreResult<Chapter> {
        let (num, den) = self.timebase.unwrap_or(DEFAULT_TIMEBASE);
        let start = self
            .start
            .ok_or_else(|| CoreError::MetadataParse("chapter without START".to_string()))?;
        let end = self
            .end
            .ok_or_else(|| CoreError::MetadataParse("chapter without END".to_string()))?;
        let to_ms = |value: u64| -> u64 {
            let ms = u128::from(value) * u128::from(num) * 1000 / u128::from(den);
            u64::try_from(ms).unwrap_or(u64::MAX)
        };
        Ok(Chapter {
            start_ms: to_ms(start),
            end: ChapterEnd::At(to_ms(end)),
            title: self.title.unwrap_or_default(),
        })
    }
}

/// Parses FFMETADATA1 text into global tags and chapters.
pub fn parse_ffmetadata(text: &str) -> CoreResult<FfMetadata> {
    let lines = split_logical_lines(text);
    let mut lines = lines.into_iter();

    let header: String = lines
        .next()
        .map(|line| line.iter().map(|(c, _)| *c).collect())
        .unwrap_or_default();
    if header != FFMETADATA_HEADER {
        return Err(CoreError::MetadataParse(format!(
            "missing {FFMETADATA_HEADER} header"
        )));
    }

    let mut metadata = FfMetadata::default();
    let mut section = Section::Global;

    for line in lines {
        let Some(&(first, first_escaped)) = line.first() else {
            continue;
        };
        if !first_escaped && (first == ';' || first == '#') {
            continue;
        }

        if !first_escaped && first == '[' {
            let name: String = line.iter().map(|(c, _)| *c).collect();
            close_section(&mut metadata, std::mem::replace(&mut section, Section::Other))?;
            section = if name == "[CHAPTER]" {
                Section::Chapter(PendingChapter::default())
            } else {
                Section::Other
            };
            continue;
        }

        let split_at = line
            .iter()
            .position(|&(c, escaped)| c == '=' && !escaped)
            .ok_or_else(|| {
                let raw: String = line.iter().map(|(c, _)| *c).collect();
                CoreError::MetadataParse(format!("expected key=value, found '{raw}'"))
            })?;
        let key: String = line[..split_at].iter().map(|(c, _)| *c).collect();
        let value: String = line[split_at + 1..].iter().map(|(c, _)| *c).collect();

        match &mut section {
            Section::Global => metadata.tags.push((key, value)),
            Section::Chapter(chapter) => apply_chapter_field(chapter, &key, value)?,
            Section::Other => {}
        }
    }

    close_section(&mut metadata, section)?;
    Ok(metadata)
}

fn close_section(metadata: &mut FfMetadata, section: Section) -> CoreResult<()> {
    if let Section::Chapter(chapter) = section {
        metadata.chapters.push(chapter.finish()?);
    }
    Ok(())
}

/// Applies one chapter line. Like ffmpeg, the block must open with an
/// optional TIMEBASE, then START, then END; tags follow.
fn apply_chapter_field(chapter: &mut PendingChapter, key: &str, value: String) -> CoreResult<()> {
    let parse_number = |value: &str| -> CoreResult<u64> {
        value.trim().parse::<u64>().map_err(|_| {
            CoreError::MetadataParse(format!("invalid {key} value '{value}'"))
        })
    };

    match (chapter.next, key) {
        (ChapterField::TimebaseOrStart, "TIMEBASE") => {
            let (num, den) = value.split_once('/').ok_or_else(|| {
                CoreError::MetadataParse(format!("invalid TIMEBASE '{value}'"))
            })?;
            let num = parse_number(num)?;
            let den = parse_number(den)?;
            if num == 0 || den == 0 {
                return Err(CoreError::MetadataParse(format!("invalid TIMEBASE '{value}'")));
            }
            chapter.timebase = Some((num, den));
            chapter.next = ChapterField::Start;
        }
        (ChapterField::TimebaseOrStart | ChapterField::Start, "START") => {
            chapter.start = Some(parse_number(&value)?);
            chapter.next = ChapterField::End;
        }
        (ChapterField::TimebaseOrStart | ChapterField::Start, other) => {
            return Err(CoreError::MetadataParse(format!(
                "expected chapter START, found '{other}'"
            )));
        }
        (ChapterField::End, "END") => {
            chapter.end = Some(parse_number(&value)?);
            chapter.next = ChapterField::Tags;
        }
        (ChapterField::End, other) => {
            return Err(CoreError::MetadataParse(format!(
                "expected chapter END, found '{other}'"
            )));
        }
        (ChapterField::Tags, "title") => chapter.title = Some(value),
        (ChapterField::Tags, other) => log::trace!("Ignoring chapter tag '{other}'"),
    }
    Ok(())
}

/// Splits text on unescaped newlines, resolving backslash escapes.
fn split_logical_lines(text: &str) -> Vec<Vec<Unit>> {
    let mut lines = Vec::new();
    let mut current: Vec<Unit> = Vec::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next) => current.push((next, true)),
                None => current.push(('\\', false)),
            },
            '\n' => {
                if current.last() == Some(&('\r', false)) {
                    current.pop();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push((ch, false)),
        }
    }
    if current.last() == Some(&('\r', false)) {
        current.pop();
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::to_ffmetadata;

    #[test]
    fn test_parse_tags_and_chapters() {
        let text = ";FFMETADATA1\ntitle=Book\nartist=Author\n\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=0\nEND=1500\ntitle=One\n# comment\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=1500\nEND=1500\ntitle=Two\n";
        let metadata = parse_ffmetadata(text).unwrap();
        assert_eq!(metadata.tag("title"), Some("Book"));
        assert_eq!(metadata.tag("artist"), Some("Author"));
        assert_eq!(
            metadata.chapters,
            vec![
                Chapter {
                    start_ms: 0,
                    end: ChapterEnd::At(1500),
                    title: "One".to_string(),
                },
                Chapter {
                    start_ms: 1500,
                    end: ChapterEnd::At(1500),
                    title: "Two".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_timebase_conversion() {
        let text = ";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/75\nSTART=150\nEND=300\n[CHAPTER]\nSTART=3000000000\nEND=4000000000\n";
        let metadata = parse_ffmetadata(text).unwrap();
        assert_eq!(metadata.chapters[0].start_ms, 2000);
        assert_eq!(metadata.chapters[0].end, ChapterEnd::At(4000));
        // No TIMEBASE: nanoseconds
        assert_eq!(metadata.chapters[1].start_ms, 3000);
        assert_eq!(metadata.chapters[1].end, ChapterEnd::At(4000));
    }

    #[test]
    fn test_escaped_title_round_trip() {
        let title = "Line one\nLine two; with = signs # and \\ slashes";
        let metadata = FfMetadata::new(vec![Chapter {
            start_ms: 10,
            end: ChapterEnd::At(20),
            title: title.to_string(),
        }])
        .with_tag("title", "A;B=C");

        let parsed = parse_ffmetadata(&to_ffmetadata(&metadata)).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_escaped_leading_semicolon_is_not_a_comment() {
        let metadata = FfMetadata::new(vec![]).with_tag(";odd", "value");
        let parsed = parse_ffmetadata(&to_ffmetadata(&metadata)).unwrap();
        assert_eq!(parsed.tag(";odd"), Some("value"));
    }

    #[test]
    fn test_crlf_input() {
        let text = ";FFMETADATA1\r\ntitle=Book\r\n";
        let metadata = parse_ffmetadata(text).unwrap();
        assert_eq!(metadata.tag("title"), Some("Book"));
    }

    #[test]
    fn test_rejects_missing_header() {
        assert!(matches!(
            parse_ffmetadata("title=Book\n"),
            Err(CoreError::MetadataParse(_))
        ));
        assert!(matches!(parse_ffmetadata(""), Err(CoreError::MetadataParse(_))));
    }

    #[test]
    fn test_rejects_bad_chapter() {
        assert!(parse_ffmetadata(";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/1000\nEND=5\n").is_err());
        assert!(parse_ffmetadata(";FFMETADATA1\n[CHAPTER]\nSTART=abc\n").is_err());
        assert!(parse_ffmetadata(";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/0\nSTART=1\n").is_err());
        assert!(parse_ffmetadata(";FFMETADATA1\nno separator\n").is_err());
    }

    #[test]
    fn test_chapter_fields_must_follow_ffmpeg_order() {
        let title_before_end = ";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=1000\ntitle=Epilogue\n";
        assert!(matches!(
            parse_ffmetadata(title_before_end),
            Err(CoreError::MetadataParse(ref msg)) if msg.contains("END")
        ));

        let end_before_start = ";FFMETADATA1\n[CHAPTER]\nEND=5\nSTART=1\n";
        assert!(parse_ffmetadata(end_before_start).is_err());

        let missing_end = ";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=1000\n";
        assert!(parse_ffmetadata(missing_end).is_err());
    }

    #[test]
    fn test_open_end_reads_back_as_zero_length() {
        let metadata = FfMetadata::new(vec![
            Chapter {
                start_ms: 0,
                end: ChapterEnd::At(1000),
                title: "One".to_string(),
            },
            Chapter {
                start_ms: 1000,
                end: ChapterEnd::Open,
                title: "Epilogue".to_string(),
            },
        ]);
        let parsed = parse_ffmetadata(&to_ffmetadata(&metadata)).unwrap();
        let titles: Vec<&str> = parsed.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Epilogue"]);
        assert_eq!(parsed.chapters[1].end, ChapterEnd::At(1000));
    }

    #[test]
    fn test_title_ending_in_carriage_return_round_trips() {
        let metadata = FfMetadata::new(vec![Chapter {
            start_ms: 0,
            end: ChapterEnd::At(10),
            title: "Old Mac title\r".to_string(),
        }]);
        let parsed = parse_ffmetadata(&to_ffmetadata(&metadata)).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_stream_sections_are_ignored() {
        let text = ";FFMETADATA1\ntitle=Book\n[STREAM]\ntitle=ignored\n";
        let metadata = parse_ffmetadata(text).unwrap();
        assert_eq!(metadata.tags, vec![("title".to_string(), "Book".to_string())]);
    }
}
