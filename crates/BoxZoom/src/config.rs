//! # Configuration
//!
//! This module defines the configuration struct for the box-zoom handler.

use serde::{Deserialize, Serialize};

/// Configuration parameters for the box-zoom interaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoxZoomConfig {
    /// Use the rasterized quad overlay when the host exposes a pipeline.
    /// The frame overlay is used otherwise, and as the fallback when shader
    /// compilation fails. Default: true.
    pub prefer_raster_overlay: bool,
    /// Padding in screen pixels applied when fitting the committed bounds.
    /// Default: 0.0.
    pub fit_padding: f32,
    /// Visual styling configuration.
    #[serde(default)]
    pub style: OverlayStyle,
}

impl Default for BoxZoomConfig {
    fn default() -> Self {
        Self {
            prefer_raster_overlay: true,
            fit_padding: 0.0,
            style: OverlayStyle::default(),
        }
    }
}

/// Visual styling for the drag overlay.
///
/// Colors are RGBA in 0.0 - 1.0 (`glam::Vec4`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Fill color of the rasterized quad.
    pub fill_color: glam::Vec4,
    /// Opacity multiplier applied to the fill in the fragment stage.
    pub fill_opacity: f32,
    /// Side length in pixels of the four corner markers (frame overlay).
    pub marker_size: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill_color: glam::Vec4::new(0.3, 0.3, 0.6, 1.0),
            fill_opacity: 0.2,
            marker_size: 10.0,
        }
    }
}
