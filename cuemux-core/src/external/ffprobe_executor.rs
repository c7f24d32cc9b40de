//! FFprobe integration for reading the source audio duration.
//!
//! The duration closes the last chapter, which otherwise has no known end.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{Config, FfProbeError, ffprobe_config};
use std::path::{Path, PathBuf};

/// Trait for probing media files.
pub trait FfprobeExecutor {
    /// Returns the container duration in seconds, or `None` when ffprobe
    /// reports no duration.
    fn get_duration(&self, input_path: &Path) -> CoreResult<Option<f64>>;
}

/// `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone)]
pub struct CrateFfprobeExecutor {
    binary: PathBuf,
}

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self::with_binary(crate::config::DEFAULT_FFPROBE_BINARY)
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for CrateFfprobeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_duration(&self, input_path: &Path) -> CoreResult<Option<f64>> {
        log::debug!(
            "Running ffprobe ({}) for duration on: {}",
            self.binary.display(),
            input_path.display()
        );
        let config = Config::builder().ffprobe_bin(&self.binary).build();
        match ffprobe_config(config, input_path) {
            Ok(metadata) => Ok(parse_duration(metadata.format.duration.as_deref(), input_path)),
            Err(err) => {
                log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
                Err(map_ffprobe_error(err))
            }
        }
    }
}

fn parse_duration(raw: Option<&str>, input_path: &Path) -> Option<f64> {
    let duration = raw
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);
    if duration.is_none() {
        log::warn!(
            "ffprobe reported no usable duration for {} (raw: {:?})",
            input_path.display(),
            raw
        );
    }
    duration
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe", output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe output deserialization: {err}"))
        }
        #[allow(unreachable_patterns)]
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let path = Path::new("book.mp3");
        assert_eq!(parse_duration(Some("3725.120000"), path), Some(3725.12));
        assert_eq!(parse_duration(Some("N/A"), path), None);
        assert_eq!(parse_duration(Some("0.000000"), path), None);
        assert_eq!(parse_duration(None, path), None);
    }

    #[test]
    fn test_missing_binary_is_a_start_error() {
        let probe = CrateFfprobeExecutor::with_binary("/nonexistent/ffprobe-binary");
        let err = probe.get_duration(Path::new("book.mp3")).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart(_, _)));
    }
}
