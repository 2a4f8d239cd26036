// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display collaborator driven by the event loop.

use std::time::Duration;

use keygrid_address::PixelPoint;
use keygrid_event_state::{ChordBindings, KeyPress, Keycode, PointerButton};
use keygrid_overlay::{DrawCommand, TextMetrics};

use crate::Result;

/// An input event relevant to the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A key went down.
    KeyPress {
        /// The key, its modifiers, and the keyboard snapshot taken with it.
        press: KeyPress,
        /// Whether the overlay surface had focus when the key arrived.
        on_overlay: bool,
    },
    /// A key went up.
    KeyRelease(Keycode),
    /// The overlay surface must be repainted.
    Expose,
}

/// Everything the event loop needs from the windowing system.
///
/// Methods that fail with an [`Error`](crate::Error) report a broken display;
/// the loop treats that as fatal, except for [`Platform::warp_pointer`] and
/// [`Platform::button`], whose failures are logged and dropped.
pub trait Platform: TextMetrics {
    /// Screen size in pixels.
    fn screen_size(&self) -> (u32, u32);

    /// Physical keys of the toggle chord on this keyboard.
    fn chord_bindings(&self) -> ChordBindings;

    /// Create the full-screen overlay and give it keyboard focus.
    fn show_overlay(&mut self) -> Result<()>;

    /// Destroy the overlay and hand focus back.
    fn hide_overlay(&mut self) -> Result<()>;

    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Result<Option<PlatformEvent>>;

    /// Repaint the overlay from scratch.
    fn draw(&mut self, commands: &[DrawCommand]) -> Result<()>;

    /// Move the pointer to an absolute screen position.
    fn warp_pointer(&mut self, to: PixelPoint) -> Result<()>;

    /// Synthesize a button press or release at the current pointer position.
    fn button(&mut self, button: PointerButton, pressed: bool) -> Result<()>;

    /// Block the loop for `duration`.
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
