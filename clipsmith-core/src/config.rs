// ============================================================================
// clipsmith-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the encoder defaults and tuning values shared by the
// operations. Consumers (like clipsmith-cli) create a CoreConfig, override the
// fields their flags cover, call validate() and pass it to an operation.
//
// KEY COMPONENTS:
// - CoreConfig: Encoder defaults, preview box, blur kernel, replace policy
// - Default constants: Values the original tabs started with

use crate::error::{CoreError, CoreResult};
use crate::processing::replace::ReplacePolicy;

use std::time::Duration;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default CRF for VP9 WebM conversion. Range 0-51, lower is better quality.
pub const DEFAULT_WEBM_CRF: u8 = 32;

/// Default CRF for H.264 MP4 conversion.
pub const DEFAULT_MP4_CRF: u8 = 20;

/// Default CRF used when an in-place operation has to re-encode video.
pub const DEFAULT_REENCODE_CRF: u8 = 20;

/// Default x264 preset.
pub const DEFAULT_PRESET: &str = "medium";

/// Presets accepted by libx264.
pub const X264_PRESETS: [&str; 9] = [
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
];

/// Largest CRF value accepted for either encoder.
pub const MAX_CRF: u8 = 51;

/// Preview box the first frame is fitted into for region selection.
pub const DEFAULT_PREVIEW_MAX_WIDTH: u32 = 640;
pub const DEFAULT_PREVIEW_MAX_HEIGHT: u32 = 360;

/// Square Gaussian kernel size applied to blurred regions.
pub const DEFAULT_BLUR_KERNEL: u32 = 15;

/// Allowed range for the speed multiplier.
pub const MIN_SPEED_FACTOR: f64 = 0.25;
pub const MAX_SPEED_FACTOR: f64 = 4.0;

/// Sample rate required by the Opus encoder.
pub const OPUS_SAMPLE_RATE: u32 = 48_000;

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the clipsmith-core library.
///
/// # Examples
///
/// ```rust
/// use clipsmith_core::CoreConfig;
///
/// let mut config = CoreConfig::default();
/// config.mp4_crf = 23;
/// config.preset = "fast".to_string();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Encoder Settings ----
    /// CRF for `convert → webm`
    pub webm_crf: u8,

    /// Whether `convert → webm` tries Opus audio before Vorbis
    pub use_opus: bool,

    /// CRF for `convert → mp4`
    pub mp4_crf: u8,

    /// CRF used by crop, trim, speed, blur and resize
    pub reencode_crf: u8,

    /// x264 preset for every H.264 encode
    pub preset: String,

    // ---- Region Selection ----
    pub preview_max_width: u32,
    pub preview_max_height: u32,

    /// Gaussian kernel edge length for `blur`; must be odd
    pub blur_kernel: u32,

    // ---- File Replacement ----
    /// Policy for the delete+rename step after `trim`
    pub trim_replace: ReplacePolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            webm_crf: DEFAULT_WEBM_CRF,
            use_opus: true,
            mp4_crf: DEFAULT_MP4_CRF,
            reencode_crf: DEFAULT_REENCODE_CRF,
            preset: DEFAULT_PRESET.to_string(),
            preview_max_width: DEFAULT_PREVIEW_MAX_WIDTH,
            preview_max_height: DEFAULT_PREVIEW_MAX_HEIGHT,
            blur_kernel: DEFAULT_BLUR_KERNEL,
            trim_replace: ReplacePolicy::retrying(
                5,
                Duration::from_secs(1),
                Duration::from_millis(1500),
            ),
        }
    }
}

impl CoreConfig {
    /// Checks every field against the ranges the encoders accept.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, crf) in [
            ("webm_crf", self.webm_crf),
            ("mp4_crf", self.mp4_crf),
            ("reencode_crf", self.reencode_crf),
        ] {
            if crf > MAX_CRF {
                return Err(CoreError::Config(format!(
                    "{name} must be between 0 and {MAX_CRF}, got {crf}"
                )));
            }
        }

        if !X264_PRESETS.contains(&self.preset.as_str()) {
            return Err(CoreError::Config(format!(
                "unknown preset '{}', expected one of: {}",
                self.preset,
                X264_PRESETS.join(", ")
            )));
        }

        if self.preview_max_width == 0 || self.preview_max_height == 0 {
            return Err(CoreError::Config(
                "preview box dimensions must be non-zero".to_string(),
            ));
        }

        if self.blur_kernel < 3 || self.blur_kernel % 2 == 0 {
            return Err(CoreError::Config(format!(
                "blur kernel must be an odd number >= 3, got {}",
                self.blur_kernel
            )));
        }

        if self.trim_replace.attempts == 0 {
            return Err(CoreError::Config(
                "replace policy needs at least one attempt".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.webm_crf, 32);
        assert_eq!(config.mp4_crf, 20);
        assert_eq!(config.trim_replace.attempts, 5);
    }

    #[test]
    fn test_rejects_out_of_range_crf() {
        let config = CoreConfig {
            mp4_crf: 52,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_preset() {
        let config = CoreConfig {
            preset: "ludicrous".to_string(),
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_even_blur_kernel() {
        let config = CoreConfig {
            blur_kernel: 14,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
