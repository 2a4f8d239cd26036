// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keygrid Navigator: turn keystrokes into pointer targets.
//!
//! The navigator is the decision core of the keyboard pointer overlay. It owns
//! no display resources. Instead, each key is run through an explicit state
//! machine ([`Navigator`]) that returns a short list of [`Effect`]s for the host
//! to perform: highlight, redraw, warp the pointer, click, close, or ignore.
//!
//! [`Lifecycle`] tracks overlay visibility and the idle timeout that force-hides
//! a forgotten overlay.
//!
//! ## Example
//!
//! ```rust
//! use keygrid_address::{GridGeometry, PixelPoint};
//! use keygrid_event_state::{ClickMode, Key};
//! use keygrid_navigator::{Effect, Navigator};
//!
//! let mut nav = Navigator::new(GridGeometry::with_cell_size(1000, 500, 50));
//!
//! nav.handle_key(Key::Char('b'));
//! nav.handle_key(Key::Char('0'));
//! let effects = nav.handle_key(Key::Char('r'));
//!
//! assert!(effects.contains(&Effect::Warp(PixelPoint::new(540, 8))));
//! assert_eq!(effects.last(), Some(&Effect::Click(ClickMode::Left)));
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events on transitions, mode changes, and expiry.
//!
//! This crate is `no_std`.

#![no_std]

mod buffer;
mod lifecycle;
mod machine;

pub use buffer::{BUFFER_CAPACITY, CellCode, TypedBuffer};
pub use lifecycle::{DEFAULT_IDLE_TIMEOUT_MS, Lifecycle};
pub use machine::{Effect, Effects, Input, NavigationState, Navigator, Phase};
