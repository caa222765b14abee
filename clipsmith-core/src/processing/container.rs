//! Container detection and the re-encode codecs each container gets.
//!
//! In-place operations keep the source extension, so the encoder has to
//! match it: WebM only carries VP8/VP9/AV1 with Vorbis/Opus, everything else
//! is written as H.264 with AAC. H.264 frames with an odd side are written in
//! 4:4:4 since chroma subsampling needs even dimensions.

use crate::config::OPUS_SAMPLE_RATE;

use std::fmt;
use std::path::Path;

/// Container family derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Mp4,
    Mov,
    Mkv,
    Webm,
    Avi,
    Other,
}

impl Container {
    /// Container for `path`, matched case-insensitively on the extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "m4v" => Self::Mp4,
            "mov" => Self::Mov,
            "mkv" => Self::Mkv,
            "webm" => Self::Webm,
            "avi" => Self::Avi,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_webm(self) -> bool {
        matches!(self, Self::Webm)
    }

    /// Video encoder used when an operation has to re-encode.
    #[must_use]
    pub const fn video_codec(self) -> &'static str {
        if self.is_webm() { "libvpx-vp9" } else { "libx264" }
    }

    /// Audio encoder used when an operation has to re-encode audio.
    #[must_use]
    pub const fn audio_codec(self) -> &'static str {
        if self.is_webm() { "libopus" } else { "aac" }
    }

    /// Pixel format for an x264 frame of `width`x`height`.
    #[must_use]
    pub const fn h264_pixel_format(width: u32, height: u32) -> &'static str {
        if width % 2 == 0 && height % 2 == 0 {
            "yuv420p"
        } else {
            "yuv444p"
        }
    }

    /// Encoder arguments for a video stream whose output frames are
    /// `frame` (width, height) pixels.
    ///
    /// VP9 runs in constant-quality mode (`-b:v 0`); the preset only applies
    /// to x264.
    #[must_use]
    pub fn video_encode_args(self, crf: u8, preset: &str, frame: (u32, u32)) -> Vec<String> {
        let mut args = vec!["-c:v".to_string(), self.video_codec().to_string()];
        if self.is_webm() {
            args.extend(["-b:v".to_string(), "0".to_string()]);
            args.extend(["-crf".to_string(), crf.to_string()]);
        } else {
            args.extend(["-crf".to_string(), crf.to_string()]);
            args.extend(["-preset".to_string(), preset.to_string()]);
            let (width, height) = frame;
            args.extend([
                "-pix_fmt".to_string(),
                Self::h264_pixel_format(width, height).to_string(),
            ]);
        }
        args
    }

    /// Encoder arguments for the audio stream.
    #[must_use]
    pub fn audio_encode_args(self) -> Vec<String> {
        let mut args = vec!["-c:a".to_string(), self.audio_codec().to_string()];
        if self.is_webm() {
            args.extend(["-ar".to_string(), OPUS_SAMPLE_RATE.to_string()]);
        }
        args
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mp4 => "MP4",
            Self::Mov => "QuickTime",
            Self::Mkv => "Matroska",
            Self::Webm => "WebM",
            Self::Avi => "AVI",
            Self::Other => "unknown container",
        };
        f.write_str(name)
    }
}
