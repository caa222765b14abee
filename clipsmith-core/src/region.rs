// ============================================================================
// clipsmith-core/src/region.rs
// ============================================================================
//
// REGION SELECTION: Rectangles in Source and Preview Coordinates
//
// Crop and blur act on a Region in source-video pixels. Users pick it on a
// scaled-down preview of the first frame, so this module also carries the
// preview scale factor and the drag-rectangle normalisation that turns two
// pointer positions back into source coordinates.
//
// KEY COMPONENTS:
// - Region: (left, top, right, bottom) rectangle with ffmpeg crop formatting
// - PreviewScale: factor fitting a frame into the preview box, never > 1
// - DragSelection: two drag corners in preview space

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// REGION
// ============================================================================

/// Axis-aligned rectangle `(left, top, right, bottom)` in pixels.
///
/// `right`/`bottom` are exclusive, so `width = right - left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Region {
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Region covering a whole `width`x`height` frame.
    #[must_use]
    pub const fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Rejects regions that would produce a zero-sized frame.
    ///
    /// Bounds against the frame are not checked here; the encoder reports those.
    pub fn ensure_non_empty(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::InvalidRegion {
                region: self.to_string(),
                reason: "region has zero width or height".to_string(),
            });
        }
        Ok(())
    }

    /// ffmpeg `crop` filter arguments: `w:h:x:y`.
    #[must_use]
    pub fn crop_spec(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.width(),
            self.height(),
            self.left,
            self.top
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl FromStr for Region {
    type Err = CoreError;

    /// Parses `"L,T,R,B"`; surrounding parentheses and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_four(s)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

fn parse_four(s: &str) -> CoreResult<[u32; 4]> {
    let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CoreError::InvalidRegion {
            region: s.to_string(),
            reason: "expected four comma-separated integers".to_string(),
        });
    }

    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse::<u32>().map_err(|e| CoreError::InvalidRegion {
            region: s.to_string(),
            reason: format!("'{part}' is not a non-negative integer: {e}"),
        })?;
    }
    Ok(values)
}

// ============================================================================
// PREVIEW SCALING
// ============================================================================

/// Scale factor applied to a source frame so it fits the preview box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewScale {
    factor: f64,
}

impl PreviewScale {
    /// Fits `source_width`x`source_height` into `max_width`x`max_height`
    /// without ever scaling up.
    pub fn fit(
        source_width: u32,
        source_height: u32,
        max_width: u32,
        max_height: u32,
    ) -> CoreResult<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(CoreError::VideoInfoError(format!(
                "cannot scale a {source_width}x{source_height} frame"
            )));
        }
        let width_scale = f64::from(max_width) / f64::from(source_width);
        let height_scale = f64::from(max_height) / f64::from(source_height);
        Self::from_factor(width_scale.min(height_scale).min(1.0))
    }

    /// Wraps an explicit factor, which must lie in `(0, 1]`.
    pub fn from_factor(factor: f64) -> CoreResult<Self> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(CoreError::InvalidParameter(format!(
                "preview scale factor must be in (0, 1], got {factor}"
            )));
        }
        Ok(Self { factor })
    }

    #[must_use]
    pub const fn factor(&self) -> f64 {
        self.factor
    }

    #[must_use]
    pub fn is_downscaled(&self) -> bool {
        self.factor < 1.0
    }

    /// Display size of a source frame under this scale.
    #[must_use]
    pub fn display_size(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        (
            self.to_preview(source_width),
            self.to_preview(source_height),
        )
    }

    /// Source coordinate → preview coordinate (truncating).
    #[must_use]
    pub fn to_preview(&self, value: u32) -> u32 {
        (f64::from(value) * self.factor) as u32
    }

    /// Preview coordinate → source coordinate (truncating).
    #[must_use]
    pub fn to_source(&self, value: u32) -> u32 {
        (f64::from(value) / self.factor) as u32
    }

    /// Maps a preview-space region back to source resolution.
    #[must_use]
    pub fn region_to_source(&self, region: &Region) -> Region {
        Region::new(
            self.to_source(region.left),
            self.to_source(region.top),
            self.to_source(region.right),
            self.to_source(region.bottom),
        )
    }

    /// Maps a source-space region into preview space.
    #[must_use]
    pub fn region_to_preview(&self, region: &Region) -> Region {
        Region::new(
            self.to_preview(region.left),
            self.to_preview(region.top),
            self.to_preview(region.right),
            self.to_preview(region.bottom),
        )
    }
}

// ============================================================================
// DRAG SELECTION
// ============================================================================

/// Press and release positions of a pointer drag over the preview.
///
/// The corners may come in any order; [`DragSelection::normalized`] sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSelection {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl DragSelection {
    #[must_use]
    pub const fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self { start, end }
    }

    /// Preview-space region spanned by the drag.
    #[must_use]
    pub fn normalized(&self) -> Region {
        Region::new(
            self.start.0.min(self.end.0),
            self.start.1.min(self.end.1),
            self.start.0.max(self.end.0),
            self.start.1.max(self.end.1),
        )
    }

    /// Source-space region for this drag under `scale`.
    #[must_use]
    pub fn to_source(&self, scale: &PreviewScale) -> Region {
        scale.region_to_source(&self.normalized())
    }
}

impl FromStr for DragSelection {
    type Err = CoreError;

    /// Parses `"X1,Y1,X2,Y2"` as the two drag corners.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = parse_four(s)?;
        Ok(Self::new((v[0], v[1]), (v[2], v[3])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_dimensions_and_crop_spec() {
        let region = Region::new(10, 20, 110, 70);
        assert_eq!(region.width(), 100);
        assert_eq!(region.height(), 50);
        assert_eq!(region.crop_spec(), "100:50:10:20");
        assert_eq!(region.to_string(), "(10, 20, 110, 70)");
    }

    #[test]
    fn test_inverted_region_is_empty() {
        let region = Region::new(100, 100, 50, 50);
        assert_eq!(region.width(), 0);
        assert!(region.is_empty());
        assert!(region.ensure_non_empty().is_err());
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("1,2,3,4".parse::<Region>().unwrap(), Region::new(1, 2, 3, 4));
        assert_eq!(
            "(1, 2, 3, 4)".parse::<Region>().unwrap(),
            Region::new(1, 2, 3, 4)
        );
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("1,2,-3,4".parse::<Region>().is_err());
    }

    #[test]
    fn test_fit_never_upscales() {
        let scale = PreviewScale::fit(320, 240, 640, 360).unwrap();
        assert_eq!(scale.factor(), 1.0);
        assert!(!scale.is_downscaled());
    }

    #[test]
    fn test_fit_uses_tighter_axis() {
        // 1920x1080 into 640x360: both axes give 1/3
        let scale = PreviewScale::fit(1920, 1080, 640, 360).unwrap();
        assert!((scale.factor() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(scale.display_size(1920, 1080), (640, 360));

        // Portrait 1080x1920: height is the constraint
        let scale = PreviewScale::fit(1080, 1920, 640, 360).unwrap();
        assert!((scale.factor() - 0.1875).abs() < 1e-12);
        assert_eq!(scale.display_size(1080, 1920), (202, 360));
    }

    #[test]
    fn test_rejects_factor_outside_unit_interval() {
        assert!(PreviewScale::from_factor(0.0).is_err());
        assert!(PreviewScale::from_factor(1.5).is_err());
        assert!(PreviewScale::from_factor(f64::NAN).is_err());
        assert!(PreviewScale::fit(0, 1080, 640, 360).is_err());
    }

    #[test]
    fn test_drag_normalises_corners() {
        let drag = DragSelection::new((200, 150), (50, 30));
        assert_eq!(drag.normalized(), Region::new(50, 30, 200, 150));
    }

    #[test]
    fn test_drag_to_source_rescales() {
        let scale = PreviewScale::fit(1920, 1080, 640, 360).unwrap();
        let drag = DragSelection::new((10, 20), (110, 70));
        let region = drag.to_source(&scale);
        assert_eq!(region, Region::new(30, 60, 330, 210));
        assert_eq!(region.width(), 300);
    }

    #[test]
    fn test_full_preview_maps_to_full_frame_without_scaling() {
        let scale = PreviewScale::fit(640, 360, 640, 360).unwrap();
        let region = scale.region_to_source(&Region::full_frame(640, 360));
        assert_eq!(region, Region::full_frame(640, 360));
    }
}
