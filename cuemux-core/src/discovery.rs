//! Input and output file discovery.
//!
//! Locates a cover image next to the audio file when the user did not name
//! one, and checks that the output path uses an MP4-family extension.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Output extensions ffmpeg is asked to write as an mp4 container.
pub const SUPPORTED_OUTPUT_EXTENSIONS: &[&str] = &["mp4", "m4a", "m4b"];

/// Cover file stems, in order of preference.
pub const COVER_STEMS: &[&str] = &["cover", "folder", "front", "album"];

/// Cover file extensions, in order of preference.
pub const COVER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Fails with `UnsupportedOutputFormat` unless the path ends in .mp4, .m4a or .m4b.
pub fn validate_output_container(output_path: &Path) -> CoreResult<()> {
    let extension = output_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if SUPPORTED_OUTPUT_EXTENSIONS
        .iter()
        .any(|supported| extension.eq_ignore_ascii_case(supported))
    {
        Ok(())
    } else {
        Err(CoreError::UnsupportedOutputFormat(
            output_path.display().to_string(),
        ))
    }
}

/// Searches `dir` for a conventionally named cover image.
///
/// Matching is case-insensitive; `cover.jpg` beats `folder.png`, and within
/// a stem `jpg` beats `jpeg` beats `png`.
pub fn find_cover_image(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot scan {} for a cover image: {}", dir.display(), e);
            return None;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    for stem in COVER_STEMS {
        for extension in COVER_EXTENSIONS {
            let found = files.iter().find(|path| {
                let stem_matches = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.eq_ignore_ascii_case(stem));
                let ext_matches = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension));
                stem_matches && ext_matches
            });
            if let Some(path) = found {
                return Some(path.clone());
            }
        }
    }
    None
}

/// Resolves the cover image for a conversion.
///
/// An explicit cover must exist. Otherwise, when `auto` is set, the audio
/// file's directory is searched.
pub fn locate_cover(
    explicit: Option<&Path>,
    audio_path: &Path,
    auto: bool,
) -> CoreResult<Option<PathBuf>> {
    if let Some(cover) = explicit {
        if !cover.is_file() {
            return Err(CoreError::PathError(format!(
                "Cover image '{}' does not exist",
                cover.display()
            )));
        }
        return Ok(Some(cover.to_path_buf()));
    }

    if !auto {
        return Ok(None);
    }

    let dir = match audio_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let found = find_cover_image(dir);
    match &found {
        Some(path) => log::info!("Using cover image found next to the audio: {}", path.display()),
        None => log::debug!("No cover image found in {}", dir.display()),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_container() {
        assert!(validate_output_container(Path::new("book.m4b")).is_ok());
        assert!(validate_output_container(Path::new("book.M4A")).is_ok());
        assert!(validate_output_container(Path::new("/x/book.mp4")).is_ok());
        assert!(matches!(
            validate_output_container(Path::new("book.mp3")),
            Err(CoreError::UnsupportedOutputFormat(_))
        ));
        assert!(validate_output_container(Path::new("book")).is_err());
    }

    #[test]
    fn test_find_cover_prefers_stem_then_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("folder.jpg"), b"x").unwrap();
        fs::write(dir.path().join("Cover.PNG"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let found = find_cover_image(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "Cover.PNG");

        fs::write(dir.path().join("cover.jpeg"), b"x").unwrap();
        let found = find_cover_image(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "cover.jpeg");
    }

    #[test]
    fn test_find_cover_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cover.jpg")).unwrap();
        assert_eq!(find_cover_image(dir.path()), None);
    }

    #[test]
    fn test_locate_cover() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("book.mp3");
        let cover = dir.path().join("front.jpg");
        fs::write(&audio, b"x").unwrap();
        fs::write(&cover, b"x").unwrap();

        assert_eq!(locate_cover(None, &audio, true).unwrap(), Some(cover.clone()));
        assert_eq!(locate_cover(None, &audio, false).unwrap(), None);
        assert_eq!(
            locate_cover(Some(&cover), &audio, false).unwrap(),
            Some(cover.clone())
        );
        assert!(matches!(
            locate_cover(Some(&dir.path().join("missing.jpg")), &audio, true),
            Err(CoreError::PathError(_))
        ));
    }
}
