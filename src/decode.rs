//! Type-directed decoding.
//!
//! Decoding mirrors [`encode`](mod@crate::encode) exactly: the destination's
//! type drives the traversal, and the [`Reader`] cursor advances by exactly
//! the bytes each shape's grammar defines. Variable-length containers are
//! walked with the boundary check from [`frame`](crate::frame); fixed-width
//! shapes read their statically known byte count.
//!
//! Because the stream carries no type information, the destination must have
//! the exact type the value was encoded with. Decoding against a different
//! type yields garbage or an error, never a diagnostic.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::error::CodecError;
use crate::frame::{Boundary, Reader};

/// A trait for types that can be decoded from bytes, in place.
///
/// `decode_from` overwrites `self` with the value read at the reader's
/// cursor and advances the cursor past it. Containers allocate fresh
/// backing storage for every element they produce; the element types'
/// [`Default`] impls provide the blank destinations, the analog of
/// zero-value allocation.
///
/// On error the destination may be partially overwritten by the fields or
/// elements decoded before the failure point.
pub trait Decoder {
    /// Decode one value at the reader's cursor into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnexpectedEnd`] when the buffer runs out
    /// mid-value, or [`CodecError::InvalidTarget`] when the destination
    /// cannot represent the decoded bytes.
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError>;
}

impl Decoder for bool {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        *self = reader.take()? != 0;
        Ok(())
    }
}

macro_rules! scalar_decoder {
    ($($ty:ty => $width:literal),* $(,)?) => {$(
        impl Decoder for $ty {
            fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
                *self = <$ty>::from_be_bytes(reader.take_array::<$width>()?);
                Ok(())
            }
        }
    )*};
}

scalar_decoder!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

impl Decoder for String {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        let mut bytes = Vec::new();
        loop {
            match reader.boundary()? {
                Boundary::End => break,
                Boundary::Element => bytes.push(reader.take()?),
            }
        }
        *self = String::from_utf8(bytes)
            .map_err(|e| CodecError::InvalidTarget(format!("text is not valid UTF-8: {e}")))?;
        Ok(())
    }
}

impl<T: Decoder + Default> Decoder for Vec<T> {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        self.clear();
        loop {
            match reader.boundary()? {
                Boundary::End => return Ok(()),
                Boundary::Element => {
                    let mut item = T::default();
                    item.decode_from(reader)?;
                    self.push(item);
                }
            }
        }
    }
}

impl<T: Decoder, const N: usize> Decoder for [T; N] {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        // No framing: exactly N element decodes, driven by the type.
        for slot in self {
            slot.decode_from(reader)?;
        }
        Ok(())
    }
}

/// Shared body for the map impls. The boundary check runs before each key
/// only; a value follows its key unconditionally, so its leading byte is
/// consumed as data without inspection.
fn decode_entries<K, V, F>(reader: &mut Reader<'_>, mut insert: F) -> Result<(), CodecError>
where
    K: Decoder + Default,
    V: Decoder + Default,
    F: FnMut(K, V),
{
    loop {
        match reader.boundary()? {
            Boundary::End => return Ok(()),
            Boundary::Element => {
                let mut key = K::default();
                key.decode_from(reader)?;
                let mut value = V::default();
                value.decode_from(reader)?;
                insert(key, value);
            }
        }
    }
}

impl<K, V, S> Decoder for HashMap<K, V, S>
where
    K: Decoder + Default + Eq + Hash,
    V: Decoder + Default,
    S: BuildHasher,
{
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        self.clear();
        decode_entries(reader, |key, value| {
            self.insert(key, value);
        })
    }
}

impl<K, V> Decoder for BTreeMap<K, V>
where
    K: Decoder + Default + Ord,
    V: Decoder + Default,
{
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        self.clear();
        decode_entries(reader, |key, value| {
            self.insert(key, value);
        })
    }
}

impl<T: Decoder + Default> Decoder for Option<T> {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        // The absence marker shares the terminator byte value, so the
        // presence check is the same boundary check containers use, at the
        // live cursor.
        match reader.boundary()? {
            Boundary::End => *self = None,
            Boundary::Element => {
                let mut value = T::default();
                value.decode_from(reader)?;
                *self = Some(value);
            }
        }
        Ok(())
    }
}

impl<T: Decoder + ?Sized> Decoder for Box<T> {
    fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
        (**self).decode_from(reader)
    }
}

impl Decoder for () {
    fn decode_from(&mut self, _reader: &mut Reader<'_>) -> Result<(), CodecError> {
        Ok(())
    }
}

macro_rules! tuple_decoder {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Decoder),+> Decoder for ($($name,)+) {
            fn decode_from(&mut self, reader: &mut Reader<'_>) -> Result<(), CodecError> {
                $(self.$idx.decode_from(reader)?;)+
                Ok(())
            }
        }
    };
}

tuple_decoder!(A: 0);
tuple_decoder!(A: 0, B: 1);
tuple_decoder!(A: 0, B: 1, C: 2);
tuple_decoder!(A: 0, B: 1, C: 2, D: 3);
