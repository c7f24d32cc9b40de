//! Core library for turning an audio file and its cue sheet into a chaptered MP4.
//!
//! Cue sheet tracks become chapters, the chapters are rendered as ffmpeg's
//! FFMETADATA1 text, and ffmpeg muxes the audio, the metadata and an optional
//! cover image into an .mp4/.m4a/.m4b container.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cuemux_core::{CoreConfig, process_audiobook};
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/books/book.mp3"),
//!     PathBuf::from("/books/book.cue"),
//!     PathBuf::from("/books/book.m4b"),
//! );
//! config.overwrite = true;
//! config.validate().unwrap();
//!
//! let result = process_audiobook(&config).unwrap();
//! println!("{} chapters written to {}", result.chapter_count, result.output_path.display());
//! ```

pub mod chapters;
pub mod config;
pub mod cue;
pub mod discovery;
pub mod error;
pub mod external;
pub mod metadata;
pub mod processing;
pub mod temp_files;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use chapters::{Chapter, ChapterEnd, build_chapters, close_open_end};
pub use config::CoreConfig;
pub use cue::{CueSheet, CueTrack, parse_cue_sheet, read_cue_file};
pub use discovery::{find_cover_image, locate_cover, validate_output_container};
pub use error::{CoreError, CoreResult};
pub use metadata::{FfMetadata, parse_ffmetadata, to_ffmetadata};
pub use processing::{ConvertResult, prepare_metadata, process_audiobook, process_audiobook_with};
pub use temp_files::{MetadataFile, write_metadata_file};
pub use utils::{format_bytes, format_duration, format_millis};
