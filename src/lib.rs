//! `byteframe`
//!
//! A compact binary codec for typed in-memory values. The byte stream
//! carries no type tags or length prefixes: variable-length containers
//! (lists, maps, text) are delimited by a reserved terminator byte, with an
//! escape byte disambiguating real data that would collide with the framing.
//! Decoding is driven entirely by the destination's type, which must be the
//! exact type the value was encoded with.
//!
//! # Overview
//!
//! - **Scalars**: `bool`, fixed-width integers and floats, big-endian.
//! - **Text**: `String`/`str`, framed as a container of raw bytes.
//! - **Sequences**: `[T; N]` (unframed, statically sized) and `Vec<T>`
//!   (terminator-framed).
//! - **Maps**: `HashMap` (unordered bytes) and `BTreeMap` (deterministic
//!   bytes).
//! - **Products**: tuples, and any user type that implements [`Encoder`]
//!   and [`Decoder`] over its fields in declaration order.
//! - **Optionals**: `Option<T>`, with absence encoded as a single
//!   terminator byte.
//!
//! # Example
//!
//! ```
//! use byteframe::{decode, encode, CodecError, Decoder, Encoder, Reader};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: String,
//! }
//!
//! impl Encoder for Point {
//!     fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
//!         self.x.encode_to(buf)?;
//!         self.y.encode_to(buf)?;
//!         self.label.encode_to(buf)
//!     }
//! }
//!
//! impl Decoder for Point {
//!     fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
//!         self.x.decode_from(reader)?;
//!         self.y.decode_from(reader)?;
//!         self.label.decode_from(reader)
//!     }
//! }
//!
//! let point = Point { x: -3, y: 40, label: "origin-ish".into() };
//! let bytes = encode(&point)?;
//!
//! let mut restored = Point::default();
//! decode(&bytes, &mut restored)?;
//! assert_eq!(restored, point);
//! # Ok::<(), CodecError>(())
//! ```
//!
//! # Modules
//!
//! - [`frame`] - Control bytes, escape rule and the [`Reader`] cursor
//! - [`encode`](mod@encode) - The [`Encoder`] trait and built-in implementations
//! - [`decode`](mod@decode) - The [`Decoder`] trait and built-in implementations
//! - [`error`] - Error types ([`CodecError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod decode;
pub mod encode;
pub mod error;
pub mod frame;


pub use decode::Decoder;
pub use encode::Encoder;
pub use error::CodecError;
pub use frame::{Boundary, Reader, ESCAPE, TERMINATOR};

/// Encode `value` to a fresh byte buffer.
///
/// # Errors
///
/// Returns an error if any part of the value fails to encode; the built-in
/// implementations never fail.
pub fn encode<T: Encoder + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    value.encode()
}

/// Decode `bytes` into `dest`, which must have the exact type used at
/// encode time.
///
/// Bytes after the end of the decoded value are ignored. On error `dest`
/// may be partially overwritten.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEnd`] if `bytes` is truncated, or
/// [`CodecError::InvalidTarget`] if the destination cannot represent the
/// decoded data.
pub fn decode<T: Decoder + ?Sized>(bytes: &[u8], dest: &mut T) -> Result<(), CodecError> {
    let mut reader = Reader::new(bytes);
    dest.decode_from(&mut reader)
}
