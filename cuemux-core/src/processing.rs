// ============================================================================
// cuemux-core/src/processing.rs
// ============================================================================
//
// CONVERSION PIPELINE: Audio + Cue Sheet -> Chaptered MP4
//
// The pipeline is strictly linear: validate the configuration, read the cue
// sheet into chapters, probe the audio duration to close the last chapter,
// write the ffmetadata file and hand everything to ffmpeg. Any failure stops
// the run; nothing is retried and no partial state is kept except what
// ffmpeg itself may have written.
//
// KEY COMPONENTS:
// - prepare_metadata: cue sheet -> FfMetadata, no external tools involved
// - process_audiobook: full run with the real ffmpeg/ffprobe
// - process_audiobook_with: full run with injected spawner/prober (tests)

use crate::chapters::{build_chapters, close_open_end};
use crate::config::CoreConfig;
use crate::cue::read_cue_file;
use crate::discovery::locate_cover;
use crate::error::{CoreError, CoreResult};
use crate::external::{
    CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, MuxParams, SidecarSpawner,
    check_dependency, run_mux,
};
use crate::metadata::{FfMetadata, to_ffmetadata};
use crate::temp_files::write_metadata_file;
use crate::terminal;
use crate::utils::{get_file_size, seconds_to_millis};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub output_path: PathBuf,
    pub chapter_count: usize,
    /// Audio duration reported by ffprobe, in seconds
    pub audio_duration: Option<f64>,
    pub cover_path: Option<PathBuf>,
    /// Set when the metadata file was kept at a user-chosen path
    pub metadata_path: Option<PathBuf>,
    pub output_size: u64,
    pub elapsed: Duration,
}

/// Reads the cue sheet and builds the ffmetadata for it.
///
/// The last chapter's end is left open; callers that know the stream
/// duration close it with [`close_open_end`].
pub fn prepare_metadata(config: &CoreConfig) -> CoreResult<FfMetadata> {
    ensure_file_exists(&config.cue_path, "Cue sheet")?;

    let sheet = read_cue_file(&config.cue_path, config.cue_encoding.as_deref())?;
    let chapters = build_chapters(&sheet)?;
    Ok(FfMetadata::from_cue_sheet(&sheet, chapters))
}

/// Runs a conversion with the real ffmpeg and ffprobe binaries.
pub fn process_audiobook(config: &CoreConfig) -> CoreResult<ConvertResult> {
    config.validate()?;
    check_dependency(&config.ffmpeg_binary)?;
    check_dependency(&config.ffprobe_binary)?;

    let prober = CrateFfprobeExecutor::with_binary(&config.ffprobe_binary);
    process_audiobook_with(&SidecarSpawner, &prober, config)
}

/// Runs a conversion using the given ffmpeg spawner and ffprobe executor.
pub fn process_audiobook_with<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    config: &CoreConfig,
) -> CoreResult<ConvertResult> {
    let start_time = Instant::now();
    config.validate()?;

    ensure_file_exists(&config.audio_path, "Audio file")?;
    ensure_file_exists(&config.cue_path, "Cue sheet")?;
    check_output_path(config)?;

    terminal::print_processing("Reading cue sheet");
    let mut metadata = prepare_metadata(config)?;
    log::info!(
        "Read {} chapters from {}",
        metadata.chapters.len(),
        config.cue_path.display()
    );

    let cover_path = locate_cover(
        config.cover_path.as_deref(),
        &config.audio_path,
        config.auto_cover,
    )?;

    terminal::print_processing("Probing audio duration");
    let audio_duration = prober.get_duration(&config.audio_path)?;
    match audio_duration {
        Some(secs) => {
            close_open_end(&mut metadata.chapters, seconds_to_millis(secs));
        }
        None => log::warn!("Audio duration unknown; the last chapter runs to the end of the stream"),
    }

    let metadata_file = write_metadata_file(&to_ffmetadata(&metadata), config.metadata_path.as_deref())?;

    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    terminal::print_processing("Muxing with ffmpeg");
    let params = MuxParams {
        ffmpeg_binary: config.ffmpeg_binary.clone(),
        audio_path: config.audio_path.clone(),
        metadata_path: metadata_file.path().to_path_buf(),
        cover_path: cover_path.clone(),
        output_path: config.output_path.clone(),
        audio_codec: config.audio_codec.clone(),
        log_level: config.ffmpeg_loglevel.clone(),
        // The existing-output check above already ran.
        overwrite: true,
    };
    run_mux(spawner, &params, audio_duration)?;

    let output_size = get_file_size(&config.output_path)?;
    let result = ConvertResult {
        output_path: config.output_path.clone(),
        chapter_count: metadata.chapters.len(),
        audio_duration,
        cover_path,
        metadata_path: (!metadata_file.is_temporary()).then(|| metadata_file.path().to_path_buf()),
        output_size,
        elapsed: start_time.elapsed(),
    };
    log::debug!("Conversion finished: {:?}", result);
    Ok(result)
}

fn ensure_file_exists(path: &Path, what: &str) -> CoreResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::PathError(format!(
            "{} '{}' does not exist or is not a file",
            what,
            path.display()
        )))
    }
}

fn check_output_path(config: &CoreConfig) -> CoreResult<()> {
    let output = &config.output_path;
    if output == &config.audio_path {
        return Err(CoreError::Config(
            "output file must differ from the audio file".to_string(),
        ));
    }
    if output.exists() {
        if !config.overwrite {
            return Err(CoreError::OutputExists(output.clone()));
        }
        log::warn!("Overwriting existing output file: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::ChapterEnd;
    use crate::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
    use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
    use std::fs;
    use tempfile::TempDir;

    const CUE: &str = "PERFORMER \"Author\"\nTITLE \"Book\"\nFILE \"book.mp3\" MP3\n  TRACK 01 AUDIO\n    TITLE \"Opening\"\n    INDEX 01 00:00:00\n  TRACK 02 AUDIO\n    TITLE \"Middle\"\n    INDEX 01 03:15:00\n  TRACK 03 AUDIO\n    TITLE \"End\"\n    INDEX 01 07:42:50\n";

    fn setup(cue: &str) -> (TempDir, CoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("book.mp3");
        let cue_path = dir.path().join("book.cue");
        fs::write(&audio, b"audio").unwrap();
        fs::write(&cue_path, cue).unwrap();
        let config = CoreConfig::new(audio, cue_path, dir.path().join("out").join("book.m4b"));
        (dir, config)
    }

    #[test]
    fn test_process_success() {
        let (dir, mut config) = setup(CUE);
        let kept = dir.path().join("chapters.ini");
        config.metadata_path = Some(kept.clone());

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("book.m4b", vec![], true);
        let prober = MockFfprobeExecutor::new();
        prober.expect_duration(&config.audio_path, Some(600.5));

        let result = process_audiobook_with(&spawner, &prober, &config).unwrap();
        assert_eq!(result.chapter_count, 3);
        assert_eq!(result.audio_duration, Some(600.5));
        assert_eq!(result.cover_path, None);
        assert_eq!(result.metadata_path.as_deref(), Some(kept.as_path()));
        assert!(result.output_size > 0);

        let written = crate::metadata::parse_ffmetadata(&fs::read_to_string(&kept).unwrap()).unwrap();
        assert_eq!(written.tag("title"), Some("Book"));
        assert_eq!(written.tag("artist"), Some("Author"));
        assert_eq!(written.chapters[2].start_ms, 462_667);
        assert_eq!(written.chapters[2].end, ChapterEnd::At(600_500));

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(&"-y".to_string()));
        assert!(calls[0].contains(&kept.to_string_lossy().into_owned()));
    }

    #[test]
    fn test_auto_cover_is_passed_to_ffmpeg() {
        let (dir, config) = setup(CUE);
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"jpg").unwrap();

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("book.m4b", vec![], true);
        let prober = MockFfprobeExecutor::new();
        prober.expect_duration(&config.audio_path, None);

        let result = process_audiobook_with(&spawner, &prober, &config).unwrap();
        assert_eq!(result.cover_path, Some(cover.clone()));
        assert_eq!(result.metadata_path, None);
        assert!(spawner.get_received_calls()[0].contains(&"attached_pic".to_string()));
    }

    #[test]
    fn test_existing_output_requires_overwrite() {
        let (_dir, mut config) = setup(CUE);
        fs::create_dir_all(config.output_path.parent().unwrap()).unwrap();
        fs::write(&config.output_path, b"old").unwrap();

        let spawner = MockFfmpegSpawner::new();
        let prober = MockFfprobeExecutor::new();
        let err = process_audiobook_with(&spawner, &prober, &config).unwrap_err();
        assert!(matches!(err, CoreError::OutputExists(_)));
        assert!(spawner.get_received_calls().is_empty());

        config.overwrite = true;
        spawner.add_success_expectation("book.m4b", vec![], true);
        prober.expect_duration(&config.audio_path, Some(500.0));
        assert!(process_audiobook_with(&spawner, &prober, &config).is_ok());
    }

    #[test]
    fn test_ffmpeg_failure_is_reported() {
        let (_dir, config) = setup(CUE);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation(
            "book.m4b",
            vec![FfmpegEvent::Log(LogLevel::Error, "Invalid data found".to_string())],
            1,
        );
        let prober = MockFfprobeExecutor::new();
        prober.expect_duration(&config.audio_path, Some(500.0));

        let err = process_audiobook_with(&spawner, &prober, &config).unwrap_err();
        match err {
            CoreError::CommandFailed(_, _, stderr) => assert!(stderr.contains("Invalid data found")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cue_error_stops_before_ffmpeg() {
        let (_dir, config) = setup("TRACK 01 AUDIO\n  INDEX 01 05:00:00\nTRACK 02 AUDIO\n  INDEX 01 01:00:00\n");
        let spawner = MockFfmpegSpawner::new();
        let prober = MockFfprobeExecutor::new();

        let err = process_audiobook_with(&spawner, &prober, &config).unwrap_err();
        assert!(matches!(err, CoreError::OutOfOrderTimestamp(1, 2)));
        assert!(spawner.get_received_calls().is_empty());
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_probe_failure_propagates() {
        let (_dir, config) = setup(CUE);
        let spawner = MockFfmpegSpawner::new();
        let prober = MockFfprobeExecutor::new();
        prober.expect_failure(&config.audio_path);

        assert!(matches!(
            process_audiobook_with(&spawner, &prober, &config),
            Err(CoreError::FfprobeParse(_))
        ));
        assert!(spawner.get_received_calls().is_empty());
    }

    #[test]
    fn test_missing_audio() {
        let (_dir, mut config) = setup(CUE);
        config.audio_path = config.audio_path.with_file_name("missing.mp3");
        let spawner = MockFfmpegSpawner::new();
        let prober = MockFfprobeExecutor::new();
        assert!(matches!(
            process_audiobook_with(&spawner, &prober, &config),
            Err(CoreError::PathError(_))
        ));
    }

    #[test]
    fn test_prepare_metadata_leaves_end_open() {
        let (_dir, config) = setup(CUE);
        let metadata = prepare_metadata(&config).unwrap();
        assert_eq!(metadata.chapters.len(), 3);
        assert_eq!(metadata.chapters[0].end, ChapterEnd::At(195_000));
        assert!(metadata.chapters[2].end.is_open());
    }
}
