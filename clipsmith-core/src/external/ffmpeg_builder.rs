//! FFmpeg command builder utilities
//!
//! This module provides a builder pattern for constructing FFmpeg commands
//! with the common options every operation uses, plus small builders for the
//! video and audio filter strings.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Builder for creating `FFmpeg` commands with common configurations
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Creates a new `FFmpeg` command builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            cmd: FfmpegCommand::new(),
        }
    }

    /// Builds the command with the banner hidden and overwriting enabled (`-y`)
    #[must_use]
    pub fn build(mut self) -> FfmpegCommand {
        self.cmd.arg("-hide_banner");
        self.cmd.arg("-y");
        self.cmd
    }
}

/// Builder for constructing video filter chains
#[derive(Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a crop filter (`w:h:x:y`)
    #[must_use]
    pub fn add_crop(mut self, crop: &str) -> Self {
        if !crop.is_empty() {
            self.filters.push(format!("crop={crop}"));
        }
        self
    }

    /// Adds a bilinear scale to exactly `width`x`height`
    #[must_use]
    pub fn add_scale(mut self, width: u32, height: u32) -> Self {
        self.filters
            .push(format!("scale={width}:{height}:flags=bilinear"));
        self
    }

    /// Adds a timestamp rescale for a playback speed multiplier
    #[must_use]
    pub fn add_speed(mut self, factor: f64) -> Self {
        self.filters.push(format!("setpts=PTS/{factor}"));
        self
    }

    /// Builds the filter chain string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Bounds of a single `atempo` filter.
const ATEMPO_MIN: f64 = 0.5;
const ATEMPO_MAX: f64 = 2.0;

/// Splits a speed multiplier into `atempo` links, each within `[0.5, 2.0]`.
///
/// Returns an empty chain for a factor of 1 or a non-positive factor.
#[must_use]
pub fn atempo_chain(factor: f64) -> Vec<String> {
    let mut chain = Vec::new();
    if !factor.is_finite() || factor <= 0.0 {
        return chain;
    }

    let mut remaining = factor;
    while remaining > ATEMPO_MAX + 1e-9 {
        chain.push(format!("atempo={ATEMPO_MAX}"));
        remaining /= ATEMPO_MAX;
    }
    while remaining < ATEMPO_MIN - 1e-9 {
        chain.push(format!("atempo={ATEMPO_MIN}"));
        remaining /= ATEMPO_MIN;
    }
    if (remaining - 1.0).abs() > 1e-6 {
        chain.push(format!("atempo={remaining}"));
    }
    chain
}

/// Gaussian sigma equivalent to a square `kernel` with an automatic sigma,
/// matching the rule `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
#[must_use]
pub fn gaussian_sigma_for_kernel(kernel: u32) -> f64 {
    0.3 * ((f64::from(kernel) - 1.0) * 0.5 - 1.0) + 0.8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_chain_joins_in_order() {
        let chain = VideoFilterChain::new()
            .add_crop("100:50:10:20")
            .add_scale(640, 360)
            .build();
        assert_eq!(
            chain.as_deref(),
            Some("crop=100:50:10:20,scale=640:360:flags=bilinear")
        );
    }

    #[test]
    fn test_empty_chain_is_none() {
        assert!(VideoFilterChain::new().add_crop("").build().is_none());
    }

    #[test]
    fn test_atempo_chain_stays_in_range() {
        assert!(atempo_chain(1.0).is_empty());
        assert_eq!(atempo_chain(1.5), vec!["atempo=1.5"]);
        assert_eq!(atempo_chain(4.0), vec!["atempo=2", "atempo=2"]);
        assert_eq!(atempo_chain(0.25), vec!["atempo=0.5", "atempo=0.5"]);
        assert_eq!(atempo_chain(3.0), vec!["atempo=2", "atempo=1.5"]);
    }

    #[test]
    fn test_atempo_chain_product_matches_factor() {
        for factor in [0.25, 0.3, 0.5, 0.75, 1.25, 2.0, 2.5, 3.7, 4.0] {
            let product: f64 = atempo_chain(factor)
                .iter()
                .map(|link| link.trim_start_matches("atempo=").parse::<f64>().unwrap())
                .product();
            assert!((product - factor).abs() < 1e-9, "factor {factor}");
        }
    }

    #[test]
    fn test_sigma_for_default_kernel() {
        assert!((gaussian_sigma_for_kernel(15) - 2.6).abs() < 1e-12);
        assert!((gaussian_sigma_for_kernel(3) - 0.8).abs() < 1e-12);
    }
}
