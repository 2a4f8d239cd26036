// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keygrid Overlay: the draw list for the pointer grid.
//!
//! [`render`] is a pure function of the navigation state and the screen
//! geometry. It returns a flat list of [`DrawCommand`]s (filled rectangles,
//! lines, and labels) in paint order. A backend only has to map each
//! [`ColorRole`] to a concrete colour and issue the primitives.
//!
//! Label placement needs font metrics, which only the backend knows. They are
//! supplied through the [`TextMetrics`] trait so that labels stay centered in
//! their cells whatever font the surface uses.
//!
//! ## Example
//!
//! ```rust
//! use keygrid_address::GridGeometry;
//! use keygrid_navigator::NavigationState;
//! use keygrid_overlay::{render, DrawCommand, MonospaceMetrics};
//!
//! let geometry = GridGeometry::with_cell_size(100, 50, 50);
//! let commands = render(&NavigationState::default(), &geometry, &MonospaceMetrics::default());
//!
//! // Two cells, each with two border lines and one label.
//! let labels = commands.iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count();
//! assert_eq!(labels, 2);
//! assert_eq!(commands.len(), 6);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod metrics;
mod render;

pub use metrics::{MonospaceMetrics, TextExtents, TextMetrics};
pub use render::{ColorRole, DrawCommand, Label, render};
