//! Line-oriented cue sheet parser.
//!
//! Only the directives that matter for chapter markers are interpreted:
//! `FILE`, `TRACK`, `TITLE`, `PERFORMER` and `INDEX`. Everything else
//! (`REM`, `FLAGS`, `ISRC`, `PREGAP`, ...) is skipped.

use crate::cue::encoding::{decode_cue_bytes, resolve_encoding};
use crate::cue::timestamp::CueTimestamp;
use crate::cue::{CueFile, CueSheet, CueTrack};
use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Reads and parses a cue sheet file.
///
/// `encoding_label` forces a specific text encoding; when `None` the
/// encoding is detected from the bytes.
pub fn read_cue_file(path: &Path, encoding_label: Option<&str>) -> CoreResult<CueSheet> {
    let forced = encoding_label.map(resolve_encoding).transpose()?;
    let bytes = std::fs::read(path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to read cue file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let (text, _) = decode_cue_bytes(&bytes, forced);
    parse_cue_sheet(&text)
}

/// Parses cue sheet text.
///
/// Tracks are returned in source order. Tracks without an `INDEX 01` line
/// are kept with `start == None`; rejecting them is left to the chapter
/// builder. A malformed `INDEX 01` value fails immediately.
pub fn parse_cue_sheet(text: &str) -> CoreResult<CueSheet> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut sheet = CueSheet::default();
    let mut current: Option<CueTrack> = None;
    // Set while inside a non-audio TRACK whose directives are ignored.
    let mut skipping = false;

    // `lines` handles LF and CRLF; the remaining CRs are classic Mac line ends.
    let lines = text.lines().flat_map(|line| line.split('\r'));
    for (line_no, raw_line) in lines.enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = split_keyword(line);
        let keyword = keyword.to_ascii_uppercase();

        match keyword.as_str() {
            "REM" => {}
            "FILE" => {
                let file = parse_file_line(rest);
                log::debug!("Cue FILE entry: {}", file.name);
                sheet.files.push(file);
            }
            "TRACK" => {
                if let Some(track) = current.take() {
                    sheet.tracks.push(track);
                }

                let mut parts = rest.split_whitespace();
                let number_text = parts.next().unwrap_or_default();
                let number = number_text
                    .parse::<u32>()
                    .map_err(|_| CoreError::InvalidTrackNumber(number_text.to_string()))?;

                match parts.next() {
                    Some(track_type) if !track_type.eq_ignore_ascii_case("AUDIO") => {
                        log::warn!(
                            "Skipping track {} with non-audio type {}",
                            number,
                            track_type
                        );
                        skipping = true;
                    }
                    _ => {
                        skipping = false;
                        current = Some(CueTrack::new(number));
                    }
                }
            }
            "TITLE" => {
                let value = unquote(rest);
                match current.as_mut() {
                    Some(track) => {
                        if track.title.is_none() {
                            track.title = Some(value);
                        }
                    }
                    None if !skipping => {
                        if sheet.title.is_none() {
                            sheet.title = Some(value);
                        }
                    }
                    None => {}
                }
            }
            "PERFORMER" => {
                let value = unquote(rest);
                match current.as_mut() {
                    Some(track) => {
                        if track.performer.is_none() {
                            track.performer = Some(value);
                        }
                    }
                    None if !skipping => {
                        if sheet.performer.is_none() {
                            sheet.performer = Some(value);
                        }
                    }
                    None => {}
                }
            }
            "INDEX" => match current.as_mut() {
                Some(track) => parse_index_line(track, rest)?,
                None => log::debug!(
                    "Ignoring INDEX outside of an audio track on line {}",
                    line_no + 1
                ),
            },
            _ => log::trace!("Ignoring cue directive on line {}: {}", line_no + 1, line),
        }
    }

    if let Some(track) = current {
        sheet.tracks.push(track);
    }

    if sheet.files.len() > 1 {
        log::warn!(
            "Cue sheet references {} files; timestamps are used as-is for a single stream",
            sheet.files.len()
        );
    }

    Ok(sheet)
}

/// Splits a line into its directive keyword and the remainder.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

/// Returns the text between the first and last double quote, or the trimmed
/// value when it is not quoted.
fn unquote(value: &str) -> String {
    let value = value.trim();
    match (value.find('"'), value.rfind('"')) {
        (Some(start), Some(end)) if start < end => value[start + 1..end].to_string(),
        _ => value.trim_matches('"').to_string(),
    }
}

fn parse_file_line(rest: &str) -> CueFile {
    let rest = rest.trim();
    if let (Some(start), Some(end)) = (rest.find('"'), rest.rfind('"')) {
        if start < end {
            let file_type = rest[end + 1..].split_whitespace().last().map(str::to_string);
            return CueFile {
                name: rest[start + 1..end].to_string(),
                file_type,
            };
        }
    }

    // Unquoted: the last token is the type when there is more than one.
    match rest.rsplit_once(char::is_whitespace) {
        Some((name, file_type)) => CueFile {
            name: name.trim().to_string(),
            file_type: Some(file_type.to_string()),
        },
        None => CueFile {
            name: rest.to_string(),
            file_type: None,
        },
    }
}

fn parse_index_line(track: &mut CueTrack, rest: &str) -> CoreResult<()> {
    let mut parts = rest.split_whitespace();
    let index_number = parts.next().unwrap_or_default();
    let position = parts.next();

    let index_number = index_number
        .parse::<u32>()
        .map_err(|_| CoreError::MalformedIndexFormat(track.number, rest.to_string()))?;
    if index_number != 1 {
        log::trace!("Ignoring INDEX {:02} of track {}", index_number, track.number);
        return Ok(());
    }

    let position = position
        .ok_or_else(|| CoreError::MalformedIndexFormat(track.number, rest.to_string()))?;
    let timestamp = position.parse::<CueTimestamp>().map_err(|e| {
        log::debug!("Track {} INDEX 01 '{}': {}", track.number, position, e);
        CoreError::MalformedIndexFormat(track.number, position.to_string())
    })?;

    if track.start.is_some() {
        log::warn!(
            "Track {} has more than one INDEX 01; keeping the first",
            track.number
        );
    } else {
        track.start = Some(timestamp);
    }
    Ok(())
}
