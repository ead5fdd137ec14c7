//! Framing protocol for variable-length containers.
//!
//! Variable-length containers (lists, maps, text) are delimited without
//! length prefixes. Two byte values are reserved inside container element
//! streams:
//!
//! - [`ESCAPE`] marks that the bytes following it belong to an element,
//!   even if they would otherwise read as a control byte.
//! - [`TERMINATOR`] ends the container.
//!
//! A container's encoding is the concatenation of its elements' encodings,
//! each prefixed with one ESCAPE byte when the encoding is empty or its
//! first byte collides with a control byte, followed by exactly one
//! TERMINATOR. The escape rule guarantees two things the decoder relies on:
//! every element occupies at least one byte, so a decode loop always makes
//! progress, and the byte inspected at a container boundary is a control
//! byte only when the encoder put one there.
//!
//! The control bytes are reserved only at element boundaries. Fixed-width
//! scalar payloads may contain them freely; the decoder never inspects the
//! interior of a scalar.

use crate::error::CodecError;

/// Control byte prefixed to an element whose encoding is empty or begins
/// with a control byte.
pub const ESCAPE: u8 = 0x17;

/// Control byte marking the end of a variable-length container. Also the
/// entire encoding of an absent optional.
pub const TERMINATOR: u8 = 0x19;

/// Applies the escape rule to the element encoded at `buf[start..]`.
///
/// Call with `start` captured before the element was appended. Prefixes one
/// [`ESCAPE`] byte when the element's encoding is empty or leads with a
/// control byte; leaves the buffer untouched otherwise.
pub(crate) fn escape_element(buf: &mut Vec<u8>, start: usize) {
    match buf.get(start).copied() {
        // An element that encoded to nothing must still occupy one byte.
        None => buf.push(ESCAPE),
        Some(ESCAPE | TERMINATOR) => buf.insert(start, ESCAPE),
        Some(_) => {}
    }
}

/// Outcome of a container boundary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// An element begins at the cursor; any escape byte has been consumed.
    Element,
    /// The container's terminator was consumed; the container is complete.
    End,
}

/// Cursor over an encoded buffer.
///
/// Decoding threads a `Reader` by mutable reference through the recursive
/// calls. Each decode consumes exactly the bytes its own type's grammar
/// defines, so no length fields are needed to find element boundaries.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn end_of_input(&self) -> CodecError {
        CodecError::UnexpectedEnd { offset: self.pos }
    }

    /// Consumes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEnd`] if the buffer is exhausted.
    pub fn take(&mut self) -> Result<u8, CodecError> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| self.end_of_input())?;
        self.pos += 1;
        Ok(byte)
    }

    /// Consumes exactly `N` bytes as a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEnd`] if fewer than `N` bytes remain.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let end = self.pos.checked_add(N).ok_or_else(|| self.end_of_input())?;
        let bytes = self.buf.get(self.pos..end).ok_or_else(|| self.end_of_input())?;
        let bytes: [u8; N] = bytes.try_into().map_err(|_| self.end_of_input())?;
        self.pos = end;
        Ok(bytes)
    }

    /// Performs the boundary check at the current cursor.
    ///
    /// Peeks the byte at the cursor: a [`TERMINATOR`] is consumed and ends
    /// the container; an [`ESCAPE`] is consumed and the element begins at
    /// the new cursor; any other byte is left in place as the element's
    /// first byte.
    ///
    /// The check always reads the live cursor, never a fixed buffer offset,
    /// so it behaves identically at top level and nested inside other
    /// containers.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEnd`] if the buffer is exhausted
    /// before a terminator was seen.
    pub fn boundary(&mut self) -> Result<Boundary, CodecError> {
        match self.buf.get(self.pos).copied() {
            None => Err(self.end_of_input()),
            Some(TERMINATOR) => {
                self.pos += 1;
                Ok(Boundary::End)
            }
            Some(ESCAPE) => {
                self.pos += 1;
                Ok(Boundary::Element)
            }
            Some(_) => Ok(Boundary::Element),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn escape_element_plain_data_untouched() {
        let mut buf = vec![0x01, 0x02];
        escape_element(&mut buf, 0);
        assert_eq!(buf, vec![0x01, 0x02]);
    }

    #[test]
    fn escape_element_leading_terminator() {
        let mut buf = vec![0xAA, TERMINATOR, 0x05];
        escape_element(&mut buf, 1);
        assert_eq!(buf, vec![0xAA, ESCAPE, TERMINATOR, 0x05]);
    }

    #[test]
    fn escape_element_leading_escape() {
        let mut buf = vec![ESCAPE];
        escape_element(&mut buf, 0);
        assert_eq!(buf, vec![ESCAPE, ESCAPE]);
    }

    #[test]
    fn escape_element_empty_encoding() {
        let mut buf = vec![0xAA];
        escape_element(&mut buf, 1);
        assert_eq!(buf, vec![0xAA, ESCAPE]);
    }

    #[test]
    fn escape_element_control_byte_not_at_start() {
        let mut buf = vec![0x01, TERMINATOR];
        escape_element(&mut buf, 0);
        assert_eq!(buf, vec![0x01, TERMINATOR]);
    }

    #[test]
    fn take_advances_cursor() {
        let mut reader = Reader::new(&[0x10, 0x20]);
        assert_eq!(reader.take().unwrap(), 0x10);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.take().unwrap(), 0x20);
        assert!(matches!(reader.take(), Err(CodecError::UnexpectedEnd { offset: 2 })));
    }

    #[test]
    fn take_array_exact_width() {
        let mut reader = Reader::new(&[0x01, 0x02, 0x03]);
        assert_eq!(reader.take_array::<2>().unwrap(), [0x01, 0x02]);
        assert_eq!(reader.remaining(), 1);
        assert!(matches!(
            reader.take_array::<2>(),
            Err(CodecError::UnexpectedEnd { offset: 2 })
        ));
    }

    #[test]
    fn boundary_consumes_terminator() {
        let mut reader = Reader::new(&[TERMINATOR, 0xFF]);
        assert_eq!(reader.boundary().unwrap(), Boundary::End);
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn boundary_consumes_escape_only() {
        let mut reader = Reader::new(&[ESCAPE, TERMINATOR]);
        assert_eq!(reader.boundary().unwrap(), Boundary::Element);
        assert_eq!(reader.position(), 1);
        // The escaped byte is left for the element decode.
        assert_eq!(reader.take().unwrap(), TERMINATOR);
    }

    #[test]
    fn boundary_leaves_plain_byte() {
        let mut reader = Reader::new(&[0x42]);
        assert_eq!(reader.boundary().unwrap(), Boundary::Element);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn boundary_on_empty_input_errors() {
        let mut reader = Reader::new(&[]);
        assert!(matches!(reader.boundary(), Err(CodecError::UnexpectedEnd { offset: 0 })));
    }
}
