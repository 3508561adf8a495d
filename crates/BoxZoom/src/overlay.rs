//! # Overlay Renderer
//!
//! This module draws the live drag overlay. Two interchangeable strategies
//! cover the same capability (render a four-cornered quad, destroy it):
//!
//! - **Frame**: four marker elements the host positions, one per corner.
//! - **Raster**: a filled quad drawn through the host's programmable pipeline
//!   (compiled shader program + clip-space vertex buffer).
//!
//! The raster strategy is preferred when available and falls back to the frame
//! strategy if the program fails to compile or link. Either way the
//! interaction keeps working; the worst case is a degraded visual.

use glam::{Vec2, Vec4};
use slotmap::new_key_type;
use thiserror::Error;

use crate::config::{BoxZoomConfig, OverlayStyle};
use crate::geo::ScreenQuad;
use crate::shaders::{self, ShaderSource};

new_key_type! {
    /// Handle to a marker element owned by the host.
    pub struct MarkerId;
    /// Handle to a compiled shader program owned by the host.
    pub struct ProgramId;
    /// Handle to a GPU vertex buffer owned by the host.
    pub struct BufferId;
}

/// Failure to build the quad program. Recoverable: the overlay falls back to
/// the frame strategy and the interaction continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader compile failed: {0}")]
    Compile(String),
    #[error("program link failed: {0}")]
    Link(String),
}

/// The map container at its interface: marker elements, cursor affordance,
/// pointer capture, and native drag suppression. Implemented by the host;
/// tests implement it with an in-memory double.
///
/// All toggles must be idempotent - the teardown path may run more than once.
pub trait OverlayHost {
    /// Creates a square marker element of `size` pixels, initially unplaced.
    fn create_marker(&mut self, size: f32) -> MarkerId;
    /// Translates a marker so it sits on `pos` (screen pixels).
    fn set_marker_translation(&mut self, marker: MarkerId, pos: Vec2);
    fn remove_marker(&mut self, marker: MarkerId);

    /// Shows or clears the crosshair cursor affordance.
    fn set_crosshair(&mut self, on: bool);
    /// Routes move/release/key events to the handler even outside the map
    /// container (the document-level listener analog).
    fn capture_pointer(&mut self, on: bool);
    /// Suppresses the platform's native drag-selection behavior.
    fn suppress_native_drag(&mut self, on: bool);

    /// Current viewport size in screen pixels.
    fn viewport_size(&self) -> Vec2;
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// The programmable pipeline, when the host has one.
    fn raster(&mut self) -> Option<&mut dyn RasterPipeline> {
        None
    }
}

/// One rasterized draw of the overlay quad, covering the current viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawQuad {
    pub program: ProgramId,
    pub buffer: BufferId,
    /// Triangle-strip vertex count.
    pub vertex_count: u32,
    pub color: Vec4,
    pub opacity: f32,
    /// Model-view matrix, column major. Identity: vertices are already in
    /// clip space.
    pub matrix: [f32; 16],
}

/// Shader compilation/linking and buffer plumbing, owned by the host.
pub trait RasterPipeline {
    fn compile_program(
        &mut self,
        source: &ShaderSource,
        defines: &[String],
    ) -> Result<ProgramId, ShaderError>;
    fn create_buffer(&mut self) -> BufferId;
    fn upload_vertices(&mut self, buffer: BufferId, vertices: &[f32]);
    /// Issues a triangle-strip draw over the current viewport.
    fn draw(&mut self, call: &DrawQuad);
    fn destroy_program(&mut self, program: ProgramId);
    fn destroy_buffer(&mut self, buffer: BufferId);
}

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// The active overlay visual, owned by the drag session.
#[derive(Debug)]
pub enum Overlay {
    Frame(FrameOverlay),
    Raster(RasterOverlay),
}

impl Overlay {
    /// Builds the configured strategy. The raster strategy is tried first when
    /// preferred and available; on `ShaderError` the frame strategy takes over.
    pub fn create(config: &BoxZoomConfig, host: &mut dyn OverlayHost) -> Self {
        if config.prefer_raster_overlay {
            let pixel_ratio = host.device_pixel_ratio();
            if let Some(pipeline) = host.raster() {
                match RasterOverlay::create(pipeline, pixel_ratio) {
                    Ok(raster) => return Overlay::Raster(raster),
                    Err(err) => {
                        tracing::warn!(%err, "quad pipeline unavailable, using frame overlay");
                    }
                }
            }
        }
        Overlay::Frame(FrameOverlay::create(&config.style, host))
    }

    /// Repositions the overlay onto the projected envelope corners.
    pub fn render(&mut self, quad: &ScreenQuad, style: &OverlayStyle, host: &mut dyn OverlayHost) {
        match self {
            Overlay::Frame(frame) => frame.render(quad, host),
            Overlay::Raster(raster) => raster.render(quad, style, host),
        }
    }

    /// Releases every host resource the overlay holds.
    pub fn destroy(self, host: &mut dyn OverlayHost) {
        match self {
            Overlay::Frame(frame) => frame.destroy(host),
            Overlay::Raster(raster) => raster.destroy(host),
        }
    }
}

/// Four corner markers forming a frame. Purely visual, no hit testing.
#[derive(Debug)]
pub struct FrameOverlay {
    // Order: nw, ne, sw, se.
    markers: [MarkerId; 4],
}

impl FrameOverlay {
    pub fn create(style: &OverlayStyle, host: &mut dyn OverlayHost) -> Self {
        let markers = [
            host.create_marker(style.marker_size),
            host.create_marker(style.marker_size),
            host.create_marker(style.marker_size),
            host.create_marker(style.marker_size),
        ];
        Self { markers }
    }

    fn render(&mut self, quad: &ScreenQuad, host: &mut dyn OverlayHost) {
        let [nw, ne, sw, se] = self.markers;
        host.set_marker_translation(nw, quad.nw);
        host.set_marker_translation(ne, quad.ne);
        host.set_marker_translation(sw, quad.sw);
        host.set_marker_translation(se, quad.se);
    }

    fn destroy(self, host: &mut dyn OverlayHost) {
        for marker in self.markers {
            host.remove_marker(marker);
        }
    }
}

/// A filled quad rasterized through the host pipeline.
///
/// The program is compiled once when the session's overlay is created; each
/// move only re-uploads the vertex buffer and re-issues the draw.
#[derive(Debug)]
pub struct RasterOverlay {
    program: ProgramId,
    buffer: BufferId,
}

impl RasterOverlay {
    pub fn create(pipeline: &mut dyn RasterPipeline, pixel_ratio: f32) -> Result<Self, ShaderError> {
        let defines = vec![
            "OVERLAY_QUAD".to_string(),
            format!("DEVICE_PIXEL_RATIO {pixel_ratio:.1}"),
        ];
        let program = pipeline.compile_program(&shaders::FILL_QUAD, &defines)?;
        let buffer = pipeline.create_buffer();
        Ok(Self { program, buffer })
    }

    fn render(&mut self, quad: &ScreenQuad, style: &OverlayStyle, host: &mut dyn OverlayHost) {
        let viewport = host.viewport_size();
        let Some(pipeline) = host.raster() else {
            return;
        };

        let to_clip = |p: Vec2| {
            Vec2::new(
                2.0 * p.x / viewport.x - 1.0,
                1.0 - 2.0 * p.y / viewport.y,
            )
        };
        // Triangle strip: nw, ne, sw, se.
        let corners = [quad.nw, quad.ne, quad.sw, quad.se].map(to_clip);
        let mut vertices = [0.0f32; 8];
        for (i, corner) in corners.iter().enumerate() {
            vertices[i * 2] = corner.x;
            vertices[i * 2 + 1] = corner.y;
        }

        pipeline.upload_vertices(self.buffer, &vertices);
        pipeline.draw(&DrawQuad {
            program: self.program,
            buffer: self.buffer,
            vertex_count: 4,
            color: style.fill_color,
            opacity: style.fill_opacity,
            matrix: IDENTITY,
        });
    }

    fn destroy(self, host: &mut dyn OverlayHost) {
        if let Some(pipeline) = host.raster() {
            pipeline.destroy_buffer(self.buffer);
            pipeline.destroy_program(self.program);
        }
    }
}
