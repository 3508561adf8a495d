//! # Interaction State Machine
//!
//! This module owns the box-zoom lifecycle: a qualifying press arms the
//! handler, the first move starts a drag session with a live overlay, and the
//! release either commits a camera reframe or cancels. All transitions run
//! synchronously inside the host's event callbacks; out-of-order events (a
//! move while idle, a release while armed) are no-ops, never errors.

use glam::Vec2;
use uuid::Uuid;

use crate::camera::{CameraBridge, FitOptions};
use crate::config::BoxZoomConfig;
use crate::geo::{GeoBounds, envelope_quad};
use crate::input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent};
use crate::overlay::{Overlay, OverlayHost};

/// Events emitted to the host application.
///
/// `original_event` carries the input that triggered the transition, so
/// subscribers can inspect position and modifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    /// A drag session began (first qualifying move after arming).
    BoxZoomStart { original_event: SourceEvent },
    /// The drag committed; the camera was reframed to `bounds`.
    BoxZoomEnd {
        original_event: SourceEvent,
        bounds: GeoBounds,
    },
    /// The drag ended without a camera change (Escape or zero-area box).
    BoxZoomCancel { original_event: SourceEvent },
}

/// The input event a [`MapEvent`] originated from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

/// The current state of the interaction.
#[derive(Debug, Default)]
pub enum BoxZoomMode {
    /// No active interaction.
    #[default]
    Idle,
    /// Qualifying press received, waiting for the first move.
    Armed {
        /// Press position in screen pixels.
        start: Vec2,
    },
    /// Overlay visible, tracking movement.
    Dragging { session: DragSession },
}

/// Everything owned by one live drag. Created on the first move after arming,
/// destroyed on every exit path - keeping session state here (instead of in
/// loose handler fields) prevents stale reads across sessions.
#[derive(Debug)]
pub struct DragSession {
    /// Correlation id for log output.
    pub id: Uuid,
    /// Press position in screen pixels.
    pub start: Vec2,
    /// Latest cursor position in screen pixels.
    pub current: Vec2,
    /// The live overlay visual.
    pub overlay: Overlay,
}

fn qualifies_as_press(event: &PointerEvent) -> bool {
    event.button == Some(PointerButton::Primary) && event.modifiers.contains(Modifiers::SHIFT)
}

/// Handles a pointer press.
///
/// Arms only from `Idle`, only while enabled, and only for a primary-button
/// press with Shift held. On arming, pointer capture and native-drag
/// suppression start; the overlay waits for the first move.
pub fn handle_pointer_down(
    enabled: bool,
    mode: &mut BoxZoomMode,
    event: &PointerEvent,
    host: &mut dyn OverlayHost,
) {
    if !enabled || !matches!(mode, BoxZoomMode::Idle) || !qualifies_as_press(event) {
        return;
    }

    host.capture_pointer(true);
    host.suppress_native_drag(true);
    *mode = BoxZoomMode::Armed { start: event.pos };
    tracing::debug!(x = event.pos.x, y = event.pos.y, "box zoom armed");
}

/// Handles a pointer move.
///
/// The first move after arming transitions to `Dragging`: crosshair cursor,
/// overlay creation, and a `BoxZoomStart` emission. Every move re-derives the
/// geographic envelope from both endpoints and repositions the overlay onto
/// the envelope's projected corners - under camera rotation those corners are
/// not the drag rectangle's corners.
pub fn handle_pointer_move(
    config: &BoxZoomConfig,
    mode: &mut BoxZoomMode,
    event: &PointerEvent,
    camera: &dyn CameraBridge,
    host: &mut dyn OverlayHost,
    events: &mut Vec<MapEvent>,
) {
    if let BoxZoomMode::Armed { start } = *mode {
        let overlay = Overlay::create(config, host);
        host.set_crosshair(true);
        let session = DragSession {
            id: Uuid::new_v4(),
            start,
            current: start,
            overlay,
        };
        tracing::debug!(session = %session.id, "box zoom started");
        *mode = BoxZoomMode::Dragging { session };
        events.push(MapEvent::BoxZoomStart {
            original_event: SourceEvent::Pointer(event.clone()),
        });
    }

    let BoxZoomMode::Dragging { session } = mode else {
        return;
    };

    session.current = event.pos;
    let bounds = GeoBounds::from_points(
        camera.unproject(session.start),
        camera.unproject(session.current),
    );
    let quad = envelope_quad(camera, &bounds);
    session.overlay.render(&quad, &config.style, host);
}

/// Handles a pointer release.
///
/// Only a primary-button release while `Dragging` terminates the session.
/// A release at exactly the press position is a zero-area box: the session is
/// torn down and `BoxZoomCancel` fires with no camera change. Otherwise the
/// camera reframes to the envelope of both endpoints (linear transition) and
/// `BoxZoomEnd` fires carrying the bounds. A release while merely `Armed`
/// disarms silently - no move means no session and no events.
pub fn handle_pointer_up(
    config: &BoxZoomConfig,
    mode: &mut BoxZoomMode,
    event: &PointerEvent,
    camera: &mut dyn CameraBridge,
    host: &mut dyn OverlayHost,
    events: &mut Vec<MapEvent>,
) {
    if event.button != Some(PointerButton::Primary) {
        return;
    }

    match mode {
        BoxZoomMode::Idle => {}
        BoxZoomMode::Armed { .. } => finish(mode, host),
        BoxZoomMode::Dragging { session } => {
            let start = session.start;
            let end = event.pos;
            let session_id = session.id;
            finish(mode, host);

            if start == end {
                tracing::debug!(session = %session_id, "box zoom cancelled: zero-area box");
                events.push(MapEvent::BoxZoomCancel {
                    original_event: SourceEvent::Pointer(event.clone()),
                });
                return;
            }

            let bounds = GeoBounds::from_points(camera.unproject(start), camera.unproject(end));
            camera.fit_bounds(
                bounds,
                FitOptions {
                    linear: true,
                    padding: config.fit_padding,
                },
            );
            tracing::debug!(session = %session_id, ?bounds, "box zoom committed");
            events.push(MapEvent::BoxZoomEnd {
                original_event: SourceEvent::Pointer(event.clone()),
                bounds,
            });
        }
    }
}

/// Handles a key press. Escape tears down a live drag and emits
/// `BoxZoomCancel`; while merely armed it disarms silently.
pub fn handle_key_down(
    mode: &mut BoxZoomMode,
    event: &KeyEvent,
    host: &mut dyn OverlayHost,
    events: &mut Vec<MapEvent>,
) {
    if event.key != Some(Key::Escape) {
        return;
    }

    match mode {
        BoxZoomMode::Idle => {}
        BoxZoomMode::Armed { .. } => finish(mode, host),
        BoxZoomMode::Dragging { session } => {
            tracing::debug!(session = %session.id, "box zoom cancelled: escape");
            finish(mode, host);
            events.push(MapEvent::BoxZoomCancel {
                original_event: SourceEvent::Key(event.clone()),
            });
        }
    }
}

/// The single exit path for commit, cancel, and escape. Releases pointer
/// capture, restores native drag, clears the cursor affordance, and destroys
/// the overlay. Idempotent: every host toggle is, and a second call finds
/// `Idle` with no overlay left to destroy.
pub fn finish(mode: &mut BoxZoomMode, host: &mut dyn OverlayHost) {
    let previous = std::mem::take(mode);

    host.capture_pointer(false);
    host.suppress_native_drag(false);
    host.set_crosshair(false);

    if let BoxZoomMode::Dragging { session } = previous {
        session.overlay.destroy(host);
    }
}
