//! # Input Protocol
//!
//! This module defines the pointer and keyboard events the host application
//! feeds into the handler. Events are plain values so tests can simulate a
//! full interaction without a real event source.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state attached to every input event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

// Manual Serialize/Deserialize implementation for bitflags to be friendly
impl Serialize for Modifiers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Modifiers::from_bits_truncate(bits))
    }
}

/// Pointer buttons in press order of a typical mouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left button; the only one that starts or commits a box zoom.
    Primary,
    Auxiliary,
    Secondary,
}

/// Keyboard keys the handler cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
}

/// A pointer event in screen space, relative to the map container.
///
/// `button` is `None` for events that carry no button information (moves, or
/// malformed host events). Such events never qualify as a press or release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Cursor position in screen pixels.
    pub pos: Vec2,
    /// The button that changed state, if any.
    pub button: Option<PointerButton>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A move event: position only, no button.
    pub fn moved(pos: Vec2) -> Self {
        Self {
            pos,
            button: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// A button event at `pos`.
    pub fn button(pos: Vec2, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            pos,
            button: Some(button),
            modifiers,
        }
    }
}

/// A keyboard event.
///
/// `key` is `None` when the host delivers a key the handler has no mapping
/// for; such events are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Option<Key>,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key: Some(key),
            modifiers: Modifiers::empty(),
        }
    }
}
