//! # BoxZoom
//!
//! `box_zoom` is a headless drag-to-select zoom interaction for map surfaces:
//! the user holds Shift, drags a rectangle over the viewport, and on release
//! the camera reframes to the geographic bounds implied by that rectangle.
//! The crate owns state, mathematics, and logic, while delegating real I/O
//! (elements, cursor, GPU pipeline, camera) to the host application.
//!
//! ## Core Architecture
//! - **Geo (`src/geo.rs`)**: geographic coordinates and the bounds envelope.
//! - **Camera (`src/camera.rs`)**: the screen <-> geographic bridge
//!   (`CameraBridge`) plus a concrete web-mercator camera.
//! - **Interaction (`src/interaction.rs`)**: the Idle -> Armed -> Dragging
//!   state machine and the `MapEvent` notifications it emits.
//! - **Overlay (`src/overlay.rs`)**: the live drag visual - frame markers or
//!   a rasterized quad through the host's shader pipeline.

pub mod camera;
pub mod config;
pub mod geo;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod shaders;

// Re-exports for convenience
pub use config::BoxZoomConfig;
pub use interaction::{BoxZoomMode, MapEvent, SourceEvent};

use camera::CameraBridge;
use input::{KeyEvent, PointerEvent};
use overlay::OverlayHost;

/// The main entry point for the library.
///
/// `BoxZoom` holds the interaction's transient state and configuration. The
/// host forwards pointer and key events into the `on_*` methods; emitted
/// [`MapEvent`]s land in the buffer passed to each call.
///
/// A new handler starts disabled; call [`enable`](BoxZoom::enable) to begin
/// observing presses.
pub struct BoxZoom {
    /// Configuration settings.
    pub config: BoxZoomConfig,
    enabled: bool,
    mode: BoxZoomMode,
}

impl BoxZoom {
    /// Creates a new handler with the given configuration.
    pub fn new(config: BoxZoomConfig) -> Self {
        Self {
            config,
            enabled: false,
            mode: BoxZoomMode::Idle,
        }
    }

    /// Starts observing qualifying presses. Idempotent.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops observing new presses. Idempotent. A drag already in flight is
    /// not force-cancelled; it persists until its natural completion.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether the interaction observes presses.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the interaction is currently in use (armed or dragging).
    pub fn is_active(&self) -> bool {
        !matches!(self.mode, BoxZoomMode::Idle)
    }

    /// The current interaction state.
    pub fn mode(&self) -> &BoxZoomMode {
        &self.mode
    }

    /// Forwards a pointer press. Arms on a primary-button press with Shift
    /// held; anything else is a no-op.
    pub fn on_pointer_down(&mut self, event: &PointerEvent, host: &mut dyn OverlayHost) {
        interaction::handle_pointer_down(self.enabled, &mut self.mode, event, host);
    }

    /// Forwards a pointer move. Tracks the drag and keeps the overlay
    /// anchored to the projected corners of the geographic envelope.
    pub fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        camera: &dyn CameraBridge,
        host: &mut dyn OverlayHost,
        events: &mut Vec<MapEvent>,
    ) {
        interaction::handle_pointer_move(&self.config, &mut self.mode, event, camera, host, events);
    }

    /// Forwards a pointer release. Commits the zoom (or cancels a zero-area
    /// box) and tears the session down.
    pub fn on_pointer_up(
        &mut self,
        event: &PointerEvent,
        camera: &mut dyn CameraBridge,
        host: &mut dyn OverlayHost,
        events: &mut Vec<MapEvent>,
    ) {
        interaction::handle_pointer_up(&self.config, &mut self.mode, event, camera, host, events);
    }

    /// Forwards a key press. Escape cancels a live drag.
    pub fn on_key_down(
        &mut self,
        event: &KeyEvent,
        host: &mut dyn OverlayHost,
        events: &mut Vec<MapEvent>,
    ) {
        interaction::handle_key_down(&mut self.mode, event, host, events);
    }
}
