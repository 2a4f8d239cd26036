// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chord recognition against the physical keyboard state.
//!
//! Two chords are recognized:
//!
//! - **Overlay toggle**: every key in [`ChordBindings::toggle_keys`] physically
//!   down while [`ChordBindings::modifier`] is held. Fires once on the rising
//!   edge; auto-repeat events while the chord stays down are swallowed until one
//!   of the keys is released.
//! - **Click mode**: the modifier plus a digit `1`..=`4`, recognized only while
//!   the overlay is visible and focused.
//!
//! Letter state comes from the [`KeyboardState`] snapshot rather than the event's
//! modifier mask, so Caps Lock and Num Lock never block recognition.
//!
//! ```
//! use keygrid_event_state::{
//!     ChordAction, ChordBindings, ChordDetector, ClickMode, Key, KeyPress, Modifiers,
//! };
//!
//! let mut chords = ChordDetector::new(ChordBindings::new([43, 28]));
//! let press = KeyPress::new(11, Key::Char('2'), Modifiers::CONTROL | Modifiers::LOCK);
//!
//! assert_eq!(chords.on_key_press(&press, false), ChordAction::None);
//! assert_eq!(
//!     chords.on_key_press(&press, true),
//!     ChordAction::SetClickMode(ClickMode::Right),
//! );
//! ```

use crate::click::ClickMode;
use crate::key::{Key, KeyPress, Keycode, Modifiers};

/// Which physical keys form the chords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChordBindings {
    /// Keys that must all be down to toggle the overlay.
    pub toggle_keys: [Keycode; 2],
    /// Modifier that must be held for either chord.
    pub modifier: Modifiers,
}

impl ChordBindings {
    /// Toggle on `toggle_keys` with the Control modifier.
    pub const fn new(toggle_keys: [Keycode; 2]) -> Self {
        Self {
            toggle_keys,
            modifier: Modifiers::CONTROL,
        }
    }
}

/// What the host should do in response to a key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordAction {
    /// No chord fired.
    None,
    /// Flip overlay visibility.
    ToggleOverlay,
    /// Switch the active click mode.
    SetClickMode(ClickMode),
}

/// Rising-edge chord detector.
#[derive(Clone, Debug)]
pub struct ChordDetector {
    bindings: ChordBindings,
    toggle_in_progress: bool,
}

impl ChordDetector {
    /// Create a detector for `bindings`, armed.
    pub const fn new(bindings: ChordBindings) -> Self {
        Self {
            bindings,
            toggle_in_progress: false,
        }
    }

    /// The bindings this detector watches.
    pub const fn bindings(&self) -> &ChordBindings {
        &self.bindings
    }

    /// Whether the toggle chord has fired and not yet been released.
    pub const fn toggle_in_progress(&self) -> bool {
        self.toggle_in_progress
    }

    /// Whether `press` belongs to a chord and must not be treated as typed input.
    pub fn is_chord_input(&self, press: &KeyPress) -> bool {
        press.modifiers.contains(self.bindings.modifier)
    }

    /// Feed a key press.
    ///
    /// `overlay_focused` gates the click-mode chord. The toggle chord is always
    /// live.
    pub fn on_key_press(&mut self, press: &KeyPress, overlay_focused: bool) -> ChordAction {
        let held = press.modifiers.contains(self.bindings.modifier);

        if held && press.keyboard.all_down(&self.bindings.toggle_keys) {
            if self.toggle_in_progress {
                return ChordAction::None;
            }
            self.toggle_in_progress = true;
            return ChordAction::ToggleOverlay;
        }
        self.toggle_in_progress = false;

        if held
            && overlay_focused
            && let Key::Char(c) = press.key
            && let Some(mode) = ClickMode::from_digit(c)
        {
            return ChordAction::SetClickMode(mode);
        }
        ChordAction::None
    }

    /// Feed a key release. Releasing any toggle key re-arms the toggle chord.
    pub fn on_key_release(&mut self, keycode: Keycode) {
        if self.bindings.toggle_keys.contains(&keycode) {
            self.toggle_in_progress = false;
        }
    }

    /// Re-arm unconditionally.
    pub fn reset(&mut self) {
        self.toggle_in_progress = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyboardState;

    const H: Keycode = 43;
    const T: Keycode = 28;

    fn detector() -> ChordDetector {
        ChordDetector::new(ChordBindings::new([H, T]))
    }

    fn chord_press(mods: Modifiers, down: &[Keycode]) -> KeyPress {
        let mut kb = KeyboardState::default();
        for &k in down {
            kb.press(k);
        }
        KeyPress::new(T, Key::Char('t'), mods).with_keyboard(kb)
    }

    #[test]
    fn held_chord_toggles_once() {
        let mut d = detector();
        let press = chord_press(Modifiers::CONTROL, &[H, T]);
        let toggles = (0..10)
            .filter(|_| d.on_key_press(&press, false) == ChordAction::ToggleOverlay)
            .count();
        assert_eq!(toggles, 1);
        assert!(d.toggle_in_progress());
    }

    #[test]
    fn releasing_a_chord_key_rearms() {
        let mut d = detector();
        let press = chord_press(Modifiers::CONTROL, &[H, T]);
        assert_eq!(d.on_key_press(&press, false), ChordAction::ToggleOverlay);
        d.on_key_release(H);
        assert!(!d.toggle_in_progress());
        assert_eq!(d.on_key_press(&press, false), ChordAction::ToggleOverlay);
    }

    #[test]
    fn unrelated_release_keeps_debounce() {
        let mut d = detector();
        let press = chord_press(Modifiers::CONTROL, &[H, T]);
        assert_eq!(d.on_key_press(&press, false), ChordAction::ToggleOverlay);
        d.on_key_release(99);
        assert!(d.toggle_in_progress());
    }

    #[test]
    fn press_without_full_chord_rearms() {
        let mut d = detector();
        let full = chord_press(Modifiers::CONTROL, &[H, T]);
        let partial = chord_press(Modifiers::CONTROL, &[T]);
        assert_eq!(d.on_key_press(&full, false), ChordAction::ToggleOverlay);
        assert_eq!(d.on_key_press(&partial, false), ChordAction::None);
        assert!(!d.toggle_in_progress());
        assert_eq!(d.on_key_press(&full, false), ChordAction::ToggleOverlay);
    }

    #[test]
    fn lock_keys_do_not_block_toggle() {
        for mods in Modifiers::CONTROL.lock_variants() {
            let mut d = detector();
            let press = chord_press(mods, &[H, T]);
            assert_eq!(
                d.on_key_press(&press, false),
                ChordAction::ToggleOverlay,
                "mods {mods:?}"
            );
        }
    }

    #[test]
    fn toggle_requires_modifier() {
        let mut d = detector();
        let press = chord_press(Modifiers::empty(), &[H, T]);
        assert_eq!(d.on_key_press(&press, false), ChordAction::None);
        let press = chord_press(Modifiers::SHIFT, &[H, T]);
        assert_eq!(d.on_key_press(&press, false), ChordAction::None);
    }

    #[test]
    fn click_mode_chord_needs_focus_and_modifier() {
        let mut d = detector();
        let ctrl_four = KeyPress::new(13, Key::Char('4'), Modifiers::CONTROL);
        let bare_four = KeyPress::new(13, Key::Char('4'), Modifiers::empty());
        let ctrl_five = KeyPress::new(14, Key::Char('5'), Modifiers::CONTROL);

        assert_eq!(d.on_key_press(&ctrl_four, false), ChordAction::None);
        assert_eq!(
            d.on_key_press(&ctrl_four, true),
            ChordAction::SetClickMode(ClickMode::Double)
        );
        assert_eq!(d.on_key_press(&bare_four, true), ChordAction::None);
        assert_eq!(d.on_key_press(&ctrl_five, true), ChordAction::None);
    }

    #[test]
    fn chord_input_is_flagged() {
        let d = detector();
        assert!(d.is_chord_input(&KeyPress::new(13, Key::Char('x'), Modifiers::CONTROL)));
        assert!(!d.is_chord_input(&KeyPress::new(13, Key::Char('x'), Modifiers::LOCK)));
    }
}
