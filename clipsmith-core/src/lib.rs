//! Core library for single-file video edits using ffmpeg and ffprobe.
//!
//! This crate provides format conversion, cropping, trimming, speed changes,
//! region blurring, resizing and audio muting/extraction, plus the preview
//! scaling used to pick regions on a downscaled frame.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clipsmith_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use clipsmith_core::{CoreConfig, Operation, Region};
//! use std::path::Path;
//!
//! let config = CoreConfig::default();
//! config.validate().unwrap();
//!
//! let outcome = Operation::Crop { region: Region::new(0, 0, 1280, 720) }
//!     .run(
//!         &SidecarSpawner,
//!         &CrateFfprobeExecutor::new(),
//!         &config,
//!         Path::new("/videos/clip.mp4"),
//!     )
//!     .unwrap();
//! println!("wrote {}", outcome.output_path.display());
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod processing;
pub mod progress_reporting;
pub mod region;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use external::{VideoProperties, check_required_tools, get_file_size, get_video_properties};
pub use processing::{
    Container, Operation, OperationOutcome, OutputFormat, PreviewFrame, ReplacePolicy,
    extract_preview_frame,
};
pub use region::{DragSelection, PreviewScale, Region};
pub use temp_files::{create_temp_file_path, sibling_temp_path};
pub use utils::{
    format_bytes, format_clock, format_duration, has_supported_extension, parse_ffmpeg_time,
};
