//! Temporary file management utilities.
//!
//! The ffmetadata text handed to ffmpeg lives in a file. By default that file
//! is a `NamedTempFile` in the system temp directory, removed when dropped;
//! callers may instead ask for it to be written to a path they keep.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, NamedTempFile};

/// Prefix of temporary metadata files.
pub const METADATA_FILE_PREFIX: &str = "ffmpeg_meta_";

/// Extension of temporary metadata files.
pub const METADATA_FILE_EXTENSION: &str = "ini";

/// A metadata file on disk, either auto-deleted or kept for the user.
#[derive(Debug)]
pub enum MetadataFile {
    /// Removed when this value is dropped.
    Temporary(NamedTempFile),
    /// Written to a path the caller chose; left in place.
    Persistent(PathBuf),
}

impl MetadataFile {
    pub fn path(&self) -> &Path {
        match self {
            MetadataFile::Temporary(file) => file.path(),
            MetadataFile::Persistent(path) => path,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, MetadataFile::Temporary(_))
    }
}

/// Writes `contents` to a metadata file.
///
/// With `keep_at` the file is written there (parent directories are
/// created). Otherwise a `ffmpeg_meta_*.ini` temp file is used.
pub fn write_metadata_file(contents: &str, keep_at: Option<&Path>) -> CoreResult<MetadataFile> {
    match keep_at {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents).map_err(|e| {
                CoreError::PathError(format!(
                    "Failed to write metadata file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            log::debug!("Wrote metadata file: {}", path.display());
            Ok(MetadataFile::Persistent(path.to_path_buf()))
        }
        None => {
            let mut file = TempFileBuilder::new()
                .prefix(METADATA_FILE_PREFIX)
                .suffix(&format!(".{METADATA_FILE_EXTENSION}"))
                .tempfile()?;
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            log::debug!("Wrote temporary metadata file: {}", file.path().display());
            Ok(MetadataFile::Temporary(file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_metadata_file_is_removed_on_drop() {
        let file = write_metadata_file(";FFMETADATA1\n", None).unwrap();
        assert!(file.is_temporary());
        let path = file.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(METADATA_FILE_PREFIX));
        assert!(name.ends_with(".ini"));
        assert_eq!(fs::read_to_string(&path).unwrap(), ";FFMETADATA1\n");

        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_persistent_metadata_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("chapters.txt");

        let file = write_metadata_file("title=x\n", Some(&target)).unwrap();
        assert!(!file.is_temporary());
        assert_eq!(file.path(), target.as_path());
        drop(file);

        assert_eq!(fs::read_to_string(&target).unwrap(), "title=x\n");
    }
}
