// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keygrid Event State: raw key input, chord detection, and click plans.
//!
//! This crate holds the small pieces of state that sit between the platform's
//! raw keyboard events and the navigation logic:
//!
//! - [`key`]: a platform-neutral [`KeyPress`] carrying the logical key, the
//!   reported [`Modifiers`], and a full physical [`KeyboardState`] snapshot.
//! - [`chord`]: [`ChordDetector`], which recognizes the overlay toggle chord on
//!   its rising edge (debounced against key repeat) and the click-mode chord.
//! - [`click`]: [`ClickMode`] and the press/release/wait sequence a host must
//!   perform to synthesize that click.
//!
//! ## Example
//!
//! ```rust
//! use keygrid_event_state::{
//!     ChordAction, ChordBindings, ChordDetector, Key, KeyPress, KeyboardState, Modifiers,
//! };
//!
//! let bindings = ChordBindings::new([43, 28]);
//! let mut chords = ChordDetector::new(bindings);
//!
//! let mut keyboard = KeyboardState::default();
//! keyboard.press(43);
//! keyboard.press(28);
//! let press = KeyPress::new(28, Key::Char('t'), Modifiers::CONTROL | Modifiers::NUM_LOCK)
//!     .with_keyboard(keyboard);
//!
//! // The first event with every chord key down toggles…
//! assert_eq!(chords.on_key_press(&press, false), ChordAction::ToggleOverlay);
//! // …and auto-repeat while they stay down does not.
//! assert_eq!(chords.on_key_press(&press, false), ChordAction::None);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod chord;
pub mod click;
pub mod key;

pub use chord::{ChordAction, ChordBindings, ChordDetector};
pub use click::{ClickMode, ClickPlan, ClickStep, DOUBLE_CLICK_GAP, PRESS_SETTLE, PointerButton};
pub use key::{Key, KeyPress, KeyboardState, Keycode, Modifiers};
