//! Core traits for the gfstream library.

use crate::de::Deserializer;
use crate::error::Result;
use crate::ser::Serializer;
use crate::stream::{InputStream, OutputStream};

/// A trait for types that can be written into an archive.
///
/// By implementing this trait for your types, you define the exact sequence
/// of primitive writes that represents them on the wire. The library's
/// `Serializer` handles the header and scalar encoding; composite shapes
/// from the standard library already have implementations in
/// [`composite`](crate::composite).
///
/// The format carries no type tags, so the matching [`Decode`]
/// implementation must issue the same sequence of reads.
pub trait Encode {
    /// Serializes the value through the provided serializer.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()>;
}

/// A trait for types that can be reconstructed from an archive.
///
/// Implementations mirror their [`Encode`] counterpart read for read.
/// Decoding is strict: bytes that cannot form a value of the expected type
/// (a bad bool byte, a non-UTF-8 string, an out-of-range union index) fail
/// with a descriptive [`Error`](crate::error::Error) instead of being
/// coerced.
pub trait Decode: Sized {
    /// Deserializes a value through the provided deserializer.
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self>;
}
