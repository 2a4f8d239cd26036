// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-character sub-cell identifiers.

use core::fmt;

/// Sub-cell letters in row-major order: entry `sy * 3 + sx` names position `(sx, sy)`.
pub const SUBCELL_ALPHABET: [char; 9] = ['g', 'c', 'r', 'h', 't', 'n', 'm', 'w', 'v'];

const SUBCELL_STRS: [&str; 9] = ["g", "c", "r", "h", "t", "n", "m", "w", "v"];

/// One of the nine positions of the 3×3 sub-grid inside a cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubCellId(u8);

impl SubCellId {
    /// Look up a sub-cell by its letter. Uppercase letters are folded to lowercase.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        SUBCELL_ALPHABET
            .iter()
            .position(|&entry| entry == c)
            .and_then(|pos| u8::try_from(pos).ok())
            .map(Self)
    }

    /// Sub-cell at column `sx` and row `sy`, both in `0..3`.
    pub fn from_offset(sx: u32, sy: u32) -> Option<Self> {
        if sx >= 3 || sy >= 3 {
            return None;
        }
        u8::try_from(sy * 3 + sx).ok().map(Self)
    }

    /// Every sub-cell in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0_u8..9).map(Self)
    }

    /// `(sx, sy)` position within the parent cell.
    pub fn offset(self) -> (u32, u32) {
        let pos = u32::from(self.0);
        (pos % 3, pos / 3)
    }

    /// The letter naming this sub-cell.
    pub fn as_char(self) -> char {
        SUBCELL_ALPHABET[usize::from(self.0)]
    }

    /// The letter naming this sub-cell, as a string slice.
    pub fn as_str(self) -> &'static str {
        SUBCELL_STRS[usize::from(self.0)]
    }
}

impl fmt::Debug for SubCellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubCellId").field(&self.as_char()).finish()
    }
}

impl fmt::Display for SubCellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
