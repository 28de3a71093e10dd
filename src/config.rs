//! Per-page scroll behaviour.
//!
//! Header offset and observation band differ between page layouts, so each
//! guide carries its own values; the defaults match the standard sticky header.

use serde::{Deserialize, Serialize};

/// Height of the standard sticky site header, in CSS pixels.
pub const DEFAULT_HEADER_OFFSET: f32 = 80.0;

/// Frames used to animate a smooth scroll.
pub const DEFAULT_SMOOTH_FRAMES: u32 = 12;

/// Observation band relative to the viewport.
///
/// The band starts `top_px` below the viewport top and ends
/// `bottom_ratio * viewport_height` above the viewport bottom, mirroring an
/// intersection root margin of `-{top_px}px 0px -{bottom_ratio * 100}% 0px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMargin {
    pub top_px: f32,
    pub bottom_ratio: f32,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top_px: DEFAULT_HEADER_OFFSET,
            bottom_ratio: 0.7,
        }
    }
}

impl RootMargin {
    /// Document-space band `[start, end)` for a viewport at `scroll_y`.
    pub fn band(&self, scroll_y: f32, viewport_height: f32) -> (f32, f32) {
        let ratio = self.bottom_ratio.clamp(0.0, 1.0);
        let start = scroll_y + self.top_px.max(0.0);
        let end = scroll_y + viewport_height * (1.0 - ratio);
        (start, end)
    }

    /// Whether the band is non-empty for the given viewport height.
    pub fn is_usable(&self, viewport_height: f32) -> bool {
        let (start, end) = self.band(0.0, viewport_height);
        end > start
    }
}

/// Scroll configuration for one guide page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Pixels subtracted from a section's offset when scrolling to it.
    pub header_offset: f32,
    pub root_margin: RootMargin,
    pub smooth_scroll_frames: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            header_offset: DEFAULT_HEADER_OFFSET,
            root_margin: RootMargin::default(),
            smooth_scroll_frames: DEFAULT_SMOOTH_FRAMES,
        }
    }
}
