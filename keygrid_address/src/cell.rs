// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-character cell identifiers.

use core::fmt;
use core::str::FromStr;

const LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8; 10] = b"0123456789";

/// Number of cells addressed by a letter followed by a digit (`a0`..`z9`).
pub const LETTER_DIGIT_CELLS: usize = 26 * 10;

/// Total number of distinct cell ids: letter/digit ids followed by letter/letter ids.
pub const CELL_ID_CAPACITY: usize = LETTER_DIGIT_CELLS + 26 * 26;

/// Identifier of one grid cell.
///
/// Always two lowercase ASCII bytes: a letter followed by either a digit or a letter.
/// The mapping to and from a linear index is a bijection over `0..CELL_ID_CAPACITY`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId([u8; 2]);

impl CellId {
    /// Id of the cell at linear `index`, or `None` past [`CELL_ID_CAPACITY`].
    pub fn from_index(index: usize) -> Option<Self> {
        if index < LETTER_DIGIT_CELLS {
            Some(Self([LETTERS[(index / 10) % 26], DIGITS[index % 10]]))
        } else if index < CELL_ID_CAPACITY {
            let rel = index - LETTER_DIGIT_CELLS;
            Some(Self([LETTERS[(rel / 26) % 26], LETTERS[rel % 26]]))
        } else {
            None
        }
    }

    /// Build an id from two characters, folding ASCII letters to lowercase.
    ///
    /// Returns `None` when the pair is not a valid id (the first character must be
    /// a letter, the second a digit or a letter).
    pub fn from_chars(first: char, second: char) -> Option<Self> {
        let first = u8::try_from(first.to_ascii_lowercase()).ok()?;
        let second = u8::try_from(second.to_ascii_lowercase()).ok()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        if !(second.is_ascii_lowercase() || second.is_ascii_digit()) {
            return None;
        }
        Some(Self([first, second]))
    }

    /// Linear index of this id in row-major order.
    pub fn index(self) -> usize {
        let [first, second] = self.0;
        let high = usize::from(first - b'a');
        if second.is_ascii_digit() {
            high * 10 + usize::from(second - b'0')
        } else {
            LETTER_DIGIT_CELLS + high * 26 + usize::from(second - b'a')
        }
    }

    /// The id as a two-character string slice.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).expect("cell id invariant violated: non-ASCII byte")
    }

    /// The raw ASCII bytes of the id.
    pub const fn as_bytes(&self) -> [u8; 2] {
        self.0
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellId").field(&self.as_str()).finish()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a valid [`CellId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseCellIdError;

impl fmt::Display for ParseCellIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a letter followed by a letter or digit")
    }
}

impl core::error::Error for ParseCellIdError {}

impl FromStr for CellId {
    type Err = ParseCellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => {
                Self::from_chars(first, second).ok_or(ParseCellIdError)
            }
            _ => Err(ParseCellIdError),
        }
    }
}
