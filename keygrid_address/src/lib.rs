// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keygrid Address: the addressing scheme behind the pointer grid.
//!
//! The screen is partitioned into square cells of a fixed edge length, laid out
//! in row-major order. Every cell is named by a two-character [`CellId`] that is
//! a pure function of its linear index:
//!
//! - indices `0..260` use a letter followed by a digit (`a0`, `a1`, … `z9`);
//! - indices `260..936` use two letters (`aa`, `ab`, … `zz`).
//!
//! A selected cell is further split into a 3×3 grid of sub-cells, each named by
//! a single letter from a fixed table ([`SUBCELL_ALPHABET`]).
//!
//! Ids are never stored. They are regenerated from [`GridGeometry`] whenever
//! they are needed, so the addressing is always consistent with the current
//! screen dimensions.
//!
//! # Example
//!
//! ```rust
//! use keygrid_address::{CellId, GridGeometry, PixelPoint, SubCellId};
//!
//! // A 1000×500 screen with 50px cells has 20 columns and 10 rows.
//! let grid = GridGeometry::with_cell_size(1000, 500, 50);
//! assert_eq!(grid.cell_count(), 200);
//!
//! // Index 10 is the first cell of the second id "decade" and sits at x = 500.
//! let b0: CellId = "b0".parse().unwrap();
//! assert_eq!(b0.index(), 10);
//! assert_eq!(grid.origin_of(b0), Some(PixelPoint::new(500, 0)));
//!
//! // Sub-cell `r` is the top-right third of the cell.
//! let r = SubCellId::from_char('r').unwrap();
//! assert_eq!(r.offset(), (2, 0));
//! assert_eq!(grid.subcell_center(b0, r), Some(PixelPoint::new(540, 8)));
//! ```
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

mod cell;
mod geometry;
mod subcell;

pub use cell::{CELL_ID_CAPACITY, CellId, LETTER_DIGIT_CELLS, ParseCellIdError};
pub use geometry::{
    DEFAULT_CELL_SIZE, GridCell, GridGeometry, PixelPoint, SUBGRID_DIVISIONS, SubCell,
};
pub use subcell::{SUBCELL_ALPHABET, SubCellId};

/// Map a linear cell index to its two-character id.
///
/// Returns `None` for indices at or beyond [`CELL_ID_CAPACITY`].
#[inline]
pub fn cell_index_to_id(index: usize) -> Option<CellId> {
    CellId::from_index(index)
}

/// Find the top-left pixel of the cell named `code` on a `width`×`height` screen.
///
/// Uses [`DEFAULT_CELL_SIZE`]. Returns `None` when the code is malformed or when no
/// cell with that id fits within the screen bounds.
pub fn id_to_cell_origin(code: &str, width: u32, height: u32) -> Option<PixelPoint> {
    let id = code.parse::<CellId>().ok()?;
    GridGeometry::new(width, height).origin_of(id)
}

/// Reverse lookup of a sub-cell letter into its `(sx, sy)` position.
#[inline]
pub fn sub_id_to_offset(code: char) -> Option<(u32, u32)> {
    SubCellId::from_char(code).map(SubCellId::offset)
}
