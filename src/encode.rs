//! Type-directed encoding.
//!
//! Each supported shape has a fixed byte grammar; no type tags are written:
//!
//! - `bool`: 1 byte, `0x00` or `0x01`
//! - integers: width/8 bytes, big-endian; signed values via their
//!   two's-complement bit pattern
//! - `f32`/`f64`: IEEE 754 bit pattern, big-endian
//! - text (`str`, `String`): raw bytes as a variable-length container of
//!   single-byte elements
//! - `[T; N]`: elements concatenated, no framing
//! - `Vec<T>`, `[T]`: each element escape-prefixed per [`frame`](crate::frame),
//!   then one terminator
//! - maps: per entry, the key escape-prefixed and the value appended
//!   unescaped; one terminator after all entries
//! - tuples: fields concatenated in order, no framing
//! - `Option<T>`: `None` is a bare terminator; `Some` is the pointee's
//!   encoding, escape-prefixed under the element rule

use std::collections::{BTreeMap, HashMap};

use crate::error::CodecError;
use crate::frame::{self, TERMINATOR};

/// A trait for values that can be encoded to bytes.
///
/// Implementations exist for the closed set of supported shapes: scalars,
/// text, sequences, maps, tuples and optionals. User product types implement
/// it by encoding their fields in declaration order; fields an
/// implementation does not name simply never reach the stream.
pub trait Encoder {
    /// Encode this value to a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the value fails to encode.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        self.encode_to(&mut buf)?;
        Ok(buf)
    }

    /// Append this value's encoding to `buf`.
    ///
    /// More efficient than [`encode`](Encoder::encode) when encoding several
    /// values into one buffer. Container encodings recurse through this
    /// method.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the value fails to encode.
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError>;
}

/// Appends one container element: encode, then apply the escape rule to
/// whatever was written.
fn encode_element<T: Encoder + ?Sized>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    let start = buf.len();
    value.encode_to(buf)?;
    frame::escape_element(buf, start);
    Ok(())
}

impl Encoder for bool {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        buf.push(u8::from(*self));
        Ok(())
    }
}

macro_rules! scalar_encoder {
    ($($ty:ty),* $(,)?) => {$(
        impl Encoder for $ty {
            fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
                buf.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }
    )*};
}

scalar_encoder!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Encoder for str {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        // Text is a container of single-byte elements: a byte's encoding is
        // itself, so the element escape rule reduces to a direct collision
        // check.
        for &byte in self.as_bytes() {
            if byte == frame::ESCAPE || byte == TERMINATOR {
                buf.push(frame::ESCAPE);
            }
            buf.push(byte);
        }
        buf.push(TERMINATOR);
        Ok(())
    }
}

impl Encoder for String {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        self.as_str().encode_to(buf)
    }
}

impl<T: Encoder> Encoder for [T] {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        for item in self {
            encode_element(item, buf)?;
        }
        buf.push(TERMINATOR);
        Ok(())
    }
}

impl<T: Encoder> Encoder for Vec<T> {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        self.as_slice().encode_to(buf)
    }
}

impl<T: Encoder, const N: usize> Encoder for [T; N] {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        // Fixed length: the decoder counts elements statically, so no
        // escaping and no terminator.
        for item in self {
            item.encode_to(buf)?;
        }
        Ok(())
    }
}

/// Shared body for the map impls. Only the key is escaped: the decode loop
/// decides continue-or-stop before each key, while a value always follows
/// its key unconditionally, so a value's first byte is never read as a
/// control byte.
fn encode_entries<'a, K, V, I>(entries: I, buf: &mut Vec<u8>) -> Result<(), CodecError>
where
    K: Encoder + 'a,
    V: Encoder + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    for (key, value) in entries {
        encode_element(key, buf)?;
        value.encode_to(buf)?;
    }
    buf.push(TERMINATOR);
    Ok(())
}

impl<K: Encoder, V: Encoder, S> Encoder for HashMap<K, V, S> {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        // Entry order is unspecified; byte output varies between runs.
        encode_entries(self.iter(), buf)
    }
}

impl<K: Encoder, V: Encoder> Encoder for BTreeMap<K, V> {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        // Entries are visited in key order, so the byte output is
        // deterministic. Use this map type when encodings are compared or
        // hashed.
        encode_entries(self.iter(), buf)
    }
}

impl<T: Encoder> Encoder for Option<T> {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            // A bare terminator marks absence.
            None => {
                buf.push(TERMINATOR);
                Ok(())
            }
            // The presence marker is the pointee itself, escaped so it can
            // never read as the absence marker.
            Some(value) => encode_element(value, buf),
        }
    }
}

impl<T: Encoder + ?Sized> Encoder for Box<T> {
    fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        (**self).encode_to(buf)
    }
}

impl Encoder for () {
    fn encode_to(&self, _buf: &mut Vec<u8>) -> Result<(), CodecError> {
        Ok(())
    }
}

macro_rules! tuple_encoder {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Encoder),+> Encoder for ($($name,)+) {
            fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
                $(self.$idx.encode_to(buf)?;)+
                Ok(())
            }
        }
    };
}

tuple_encoder!(A: 0);
tuple_encoder!(A: 0, B: 1);
tuple_encoder!(A: 0, B: 1, C: 2);
tuple_encoder!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frame::ESCAPE;

    #[test]
    fn encode_bool() {
        assert_eq!(true.encode().unwrap(), vec![0x01]);
        assert_eq!(false.encode().unwrap(), vec![0x00]);
    }

    #[test]
    fn encode_u16_big_endian() {
        assert_eq!(0x0102u16.encode().unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn encode_signed_via_bit_pattern() {
        assert_eq!((-1i16).encode().unwrap(), vec![0xFF, 0xFF]);
        assert_eq!((-2i8).encode().unwrap(), vec![0xFE]);
        assert_eq!(i64::MIN.encode().unwrap(), vec![0x80, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn encode_float_bit_pattern() {
        assert_eq!(1.0f32.encode().unwrap(), 0x3F80_0000u32.to_be_bytes());
        assert_eq!(1.0f64.encode().unwrap(), 0x3FF0_0000_0000_0000u64.to_be_bytes());
    }

    #[test]
    fn encode_empty_list_is_bare_terminator() {
        let list: Vec<u8> = Vec::new();
        assert_eq!(list.encode().unwrap(), vec![TERMINATOR]);
    }

    #[test]
    fn encode_list_ends_with_terminator() {
        let encoded = vec![1u8, 2, 3].encode().unwrap();
        assert_eq!(encoded, vec![1, 2, 3, TERMINATOR]);
    }

    #[test]
    fn encode_list_escapes_colliding_elements() {
        let encoded = vec![0x01u8, ESCAPE, TERMINATOR].encode().unwrap();
        assert_eq!(encoded, vec![0x01, ESCAPE, ESCAPE, ESCAPE, TERMINATOR, TERMINATOR]);
    }

    #[test]
    fn encode_list_escapes_empty_elements() {
        // A zero-size element still consumes one byte in the stream.
        let encoded = vec![[0u8; 0], [0u8; 0]].encode().unwrap();
        assert_eq!(encoded, vec![ESCAPE, ESCAPE, TERMINATOR]);
    }

    #[test]
    fn encode_text() {
        assert_eq!("".encode().unwrap(), vec![TERMINATOR]);
        assert_eq!("ab".encode().unwrap(), vec![b'a', b'b', TERMINATOR]);
    }

    #[test]
    fn encode_text_escapes_control_bytes() {
        let text = String::from_utf8(vec![ESCAPE, b'x', TERMINATOR]).unwrap();
        assert_eq!(
            text.encode().unwrap(),
            vec![ESCAPE, ESCAPE, b'x', ESCAPE, TERMINATOR, TERMINATOR]
        );
    }

    #[test]
    fn encode_fixed_array_has_no_framing() {
        assert_eq!([0x0102u16, 0x0304].encode().unwrap(), vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn encode_fixed_array_does_not_escape() {
        // Control-byte collisions only matter where the decoder does
        // boundary checks, which a fixed array never triggers.
        assert_eq!([TERMINATOR, ESCAPE].encode().unwrap(), vec![TERMINATOR, ESCAPE]);
    }

    #[test]
    fn encode_map_escapes_keys_not_values() {
        let mut map = BTreeMap::new();
        map.insert(TERMINATOR, TERMINATOR);
        assert_eq!(map.encode().unwrap(), vec![ESCAPE, TERMINATOR, TERMINATOR, TERMINATOR]);
    }

    #[test]
    fn encode_btreemap_is_deterministic() {
        let mut map = BTreeMap::new();
        map.insert(2u8, 20u8);
        map.insert(1u8, 10u8);
        assert_eq!(map.encode().unwrap(), vec![1, 10, 2, 20, TERMINATOR]);
    }

    #[test]
    fn encode_absent_option_is_bare_terminator() {
        let opt: Option<i64> = None;
        assert_eq!(opt.encode().unwrap(), vec![TERMINATOR]);
    }

    #[test]
    fn encode_present_option_is_pointee() {
        assert_eq!(Some(0x0102u16).encode().unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn encode_present_option_escapes_collision() {
        assert_eq!(Some(TERMINATOR).encode().unwrap(), vec![ESCAPE, TERMINATOR]);
        assert_eq!(Some(()).encode().unwrap(), vec![ESCAPE]);
    }

    #[test]
    fn encode_nested_option_distinguishes_absence_levels() {
        let absent: Option<Option<u8>> = None;
        let present_absent: Option<Option<u8>> = Some(None);
        assert_eq!(absent.encode().unwrap(), vec![TERMINATOR]);
        assert_eq!(present_absent.encode().unwrap(), vec![ESCAPE, TERMINATOR]);
    }

    #[test]
    fn encode_tuple_concatenates_fields() {
        let encoded = (0x01u8, 0x0203u16, true).encode().unwrap();
        assert_eq!(encoded, vec![0x01, 0x02, 0x03, 0x01]);
    }

    #[test]
    fn custom_impl_can_reject_a_shape() {
        enum Dynamic {
            Number(u32),
            Opaque,
        }

        impl Encoder for Dynamic {
            fn encode_to(&self, buf: &mut Vec<u8>) -> Result<(), CodecError> {
                match self {
                    Self::Number(n) => n.encode_to(buf),
                    Self::Opaque => Err(CodecError::UnsupportedType("Dynamic::Opaque")),
                }
            }
        }

        assert!(Dynamic::Number(7).encode().is_ok());
        assert!(matches!(
            Dynamic::Opaque.encode(),
            Err(CodecError::UnsupportedType("Dynamic::Opaque"))
        ));
    }
}
