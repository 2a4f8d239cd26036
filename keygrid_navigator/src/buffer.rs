// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The typed-character buffer and the raw two-character code it spells.

use core::fmt;

use keygrid_address::CellId;

/// Maximum number of characters the buffer retains.
pub const BUFFER_CAPACITY: usize = 3;

/// Sliding window over the most recent typed characters.
///
/// Holds lowercase ASCII alphanumerics only. Pushing onto a full buffer drops the
/// oldest character.
#[derive(Clone, Copy, Default)]
pub struct TypedBuffer {
    bytes: [u8; BUFFER_CAPACITY],
    len: usize,
}

impl TypedBuffer {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; BUFFER_CAPACITY],
            len: 0,
        }
    }

    /// Append `byte`, discarding the oldest character when full.
    pub fn push(&mut self, byte: u8) {
        debug_assert!(
            byte.is_ascii_lowercase() || byte.is_ascii_digit(),
            "typed buffer accepts lowercase alphanumerics only"
        );
        if self.len == BUFFER_CAPACITY {
            self.bytes.rotate_left(1);
            self.bytes[BUFFER_CAPACITY - 1] = byte;
        } else {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    /// Number of buffered characters.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been typed.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Buffered bytes, oldest first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Buffered characters as a string slice.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).expect("typed buffer invariant violated: non-ASCII")
    }

    /// The first two characters, once at least two have been typed.
    pub fn code(&self) -> Option<CellCode> {
        (self.len >= 2).then(|| CellCode([self.bytes[0], self.bytes[1]]))
    }
}

impl PartialEq for TypedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TypedBuffer {}

impl fmt::Debug for TypedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedBuffer").field(&self.as_str()).finish()
    }
}

/// Two typed characters naming a cell, whether or not that cell exists.
///
/// Unlike [`CellId`], a code such as `"7q"` is representable: the highlight
/// follows whatever the user typed and simply has no visible target when the
/// code does not name a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCode([u8; 2]);

impl CellCode {
    /// The code as a two-character string slice.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).expect("cell code invariant violated: non-ASCII")
    }

    /// The raw bytes of the code.
    pub const fn as_bytes(&self) -> [u8; 2] {
        self.0
    }

    /// The cell id this code spells, if it is a well-formed id.
    pub fn cell_id(self) -> Option<CellId> {
        CellId::from_chars(char::from(self.0[0]), char::from(self.0[1]))
    }

    /// Whether this code names `id`.
    pub fn matches(self, id: CellId) -> bool {
        self.0 == id.as_bytes()
    }
}

impl From<CellId> for CellCode {
    fn from(id: CellId) -> Self {
        Self(id.as_bytes())
    }
}

impl fmt::Debug for CellCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellCode").field(&self.as_str()).finish()
    }
}

impl fmt::Display for CellCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_keeps_most_recent_three() {
        let mut buf = TypedBuffer::new();
        for &b in b"abcde" {
            buf.push(b);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_str(), "cde");
        assert_eq!(buf.code().map(|c| c.as_bytes()), Some(*b"cd"));
    }

    #[test]
    fn code_needs_two_characters() {
        let mut buf = TypedBuffer::new();
        assert!(buf.code().is_none());
        buf.push(b'q');
        assert!(buf.code().is_none());
        buf.push(b'7');
        assert_eq!(buf.code().unwrap().as_str(), "q7");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.as_str(), "");
    }

    #[test]
    fn malformed_code_has_no_cell() {
        let mut buf = TypedBuffer::new();
        buf.push(b'7');
        buf.push(b'q');
        let code = buf.code().unwrap();
        assert_eq!(code.as_str(), "7q");
        assert!(code.cell_id().is_none());
    }

    #[test]
    fn code_matches_its_cell() {
        let id: CellId = "b0".parse().unwrap();
        let code = CellCode::from(id);
        assert!(code.matches(id));
        assert_eq!(code.cell_id(), Some(id));
        assert!(!code.matches("b1".parse().unwrap()));
    }
}
