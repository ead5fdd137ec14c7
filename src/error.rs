//! Error types for encoding and decoding.

use thiserror::Error;

/// Errors raised by [`encode`](crate::encode()) and [`decode`](crate::decode()).
///
/// All variants are terminal for the call that raised them: there is no
/// retry and no partial-result contract, although a failed decode may leave
/// the destination partially populated with whatever was decoded before the
/// failure point.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Encoding met a runtime shape outside the supported set.
    ///
    /// The built-in [`Encoder`](crate::Encoder) implementations cannot raise
    /// this; the type system only admits supported shapes. It is the
    /// documented escape hatch for manual implementations that cover dynamic
    /// shapes, such as an enum with a variant that has no byte encoding.
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),

    /// Decoding ran past the end of the input buffer.
    ///
    /// Raised when fewer bytes remain than a fixed-width scalar requires, or
    /// when the buffer is exhausted before a variable-length container's
    /// terminator is found. `offset` is the cursor position at the failed
    /// read.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd {
        /// Cursor position where the input ran out.
        offset: usize,
    },

    /// The destination cannot accept the decoded data.
    ///
    /// The one runtime case among the built-in implementations is a
    /// [`String`] destination whose decoded text bytes are not valid UTF-8.
    #[error("invalid decode target: {0}")]
    InvalidTarget(String),
}
