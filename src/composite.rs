//! Encode/decode rules for composite shapes.
//!
//! Everything here reduces to sequences of primitive codec calls: tuples
//! write their elements in declaration order with no prefix, containers
//! write a size followed by their elements, optionals write a presence
//! flag, unions write an index via the size codec. The free functions at
//! the bottom cover shapes that cannot take a blanket impl: fieldless
//! enums ([`encode_enum`]/[`decode_enum`]), bit-flag sets
//! ([`encode_flags`]/[`decode_flags`]) and hand-rolled tagged unions
//! ([`write_variant_index`]/[`read_variant_index`]).

use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};

use num_enum::TryFromPrimitive;

use crate::de::Deserializer;
use crate::error::{Error, Result};
use crate::ser::Serializer;
use crate::stream::{InputStream, OutputStream};
use crate::traits::{Decode, Encode};

// Containers reserve at most this many elements before any actually decode,
// so a hostile size prefix cannot force a huge allocation.
const PREALLOC_LIMIT: usize = 1024;

fn decoded_len(declared: u64) -> Result<usize> {
    usize::try_from(declared)
        .map_err(|_| Error::invalid_data("container length exceeds address space"))
}

macro_rules! scalar_impl {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Encode for $ty {
            fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
                ser.$write(*self)
            }
        }

        impl Decode for $ty {
            fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
                de.$read()
            }
        }
    };
}

scalar_impl!(bool, write_bool, read_bool);
scalar_impl!(u8, write_u8, read_u8);
scalar_impl!(i8, write_i8, read_i8);
scalar_impl!(u16, write_u16, read_u16);
scalar_impl!(i16, write_i16, read_i16);
scalar_impl!(u32, write_u32, read_u32);
scalar_impl!(i32, write_i32, read_i32);
scalar_impl!(u64, write_u64, read_u64);
scalar_impl!(i64, write_i64, read_i64);
scalar_impl!(f32, write_f32, read_f32);
scalar_impl!(f64, write_f64, read_f64);

impl Encode for char {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_u32(*self as u32)
    }
}

impl Decode for char {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let scalar = de.read_u32()?;
        char::from_u32(scalar)
            .ok_or_else(|| Error::invalid_data(format!("invalid char scalar {scalar:#x}")))
    }
}

impl Encode for str {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_str(self)
    }
}

impl Encode for String {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_str(self)
    }
}

impl Decode for String {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        de.read_string()
    }
}

impl Encode for Path {
    /// Paths travel in portable form: forward-slash separators regardless
    /// of platform. Paths that are not valid UTF-8 cannot be archived.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        let Some(text) = self.to_str() else {
            return Err(Error::invalid_data("path is not valid UTF-8"));
        };
        if cfg!(windows) && text.contains('\\') {
            ser.write_str(&text.replace('\\', "/"))
        } else {
            ser.write_str(text)
        }
    }
}

impl Encode for PathBuf {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        self.as_path().encode(ser)
    }
}

impl Decode for PathBuf {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        Ok(PathBuf::from(de.read_string()?))
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        (**self).encode(ser)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        (**self).encode(ser)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        Ok(Box::new(T::decode(de)?))
    }
}

impl Encode for () {
    fn encode<S: OutputStream>(&self, _ser: &mut Serializer<'_, S>) -> Result<()> {
        Ok(())
    }
}

impl Decode for () {
    fn decode<S: InputStream>(_de: &mut Deserializer<'_, S>) -> Result<Self> {
        Ok(())
    }
}

macro_rules! tuple_impl {
    ($($name:ident $index:tt),+) => {
        impl<$($name: Encode),+> Encode for ($($name,)+) {
            fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
                $(self.$index.encode(ser)?;)+
                Ok(())
            }
        }

        impl<$($name: Decode),+> Decode for ($($name,)+) {
            fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
                Ok(($($name::decode(de)?,)+))
            }
        }
    };
}

tuple_impl!(A 0);
tuple_impl!(A 0, B 1);
tuple_impl!(A 0, B 1, C 2);
tuple_impl!(A 0, B 1, C 2, D 3);
tuple_impl!(A 0, B 1, C 2, D 3, E 4);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
tuple_impl!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

impl<T: Encode, const N: usize> Encode for [T; N] {
    /// Fixed-size arrays carry no size prefix; both sides must agree on `N`.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        for element in self {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let mut elements = Vec::with_capacity(N);
        for _ in 0..N {
            elements.push(T::decode(de)?);
        }
        match elements.try_into() {
            Ok(array) => Ok(array),
            Err(_) => unreachable!("vector length equals array length"),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        match self {
            Some(value) => {
                ser.write_bool(true)?;
                value.encode(ser)
            }
            None => ser.write_bool(false),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        if de.read_bool()? {
            Ok(Some(T::decode(de)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Encode, E: Encode> Encode for std::result::Result<T, E> {
    /// `Result` is a two-alternative tagged union: index 0 is `Ok`, 1 is
    /// `Err`.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        match self {
            Ok(value) => {
                write_variant_index(ser, 0)?;
                value.encode(ser)
            }
            Err(error) => {
                write_variant_index(ser, 1)?;
                error.encode(ser)
            }
        }
    }
}

impl<T: Decode, E: Decode> Decode for std::result::Result<T, E> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        if read_variant_index(de, 2)? == 0 {
            Ok(Ok(T::decode(de)?))
        } else {
            Ok(Err(E::decode(de)?))
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for element in self {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        self.as_slice().encode(ser)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut elements = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            elements.push(T::decode(de)?);
        }
        Ok(elements)
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for element in self {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut elements = VecDeque::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            elements.push_back(T::decode(de)?);
        }
        Ok(elements)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for element in self {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut elements = BTreeSet::new();
        for _ in 0..len {
            elements.insert(T::decode(de)?);
        }
        Ok(elements)
    }
}

impl<T: Encode> Encode for HashSet<T> {
    /// Elements travel in the set's native iteration order, which is
    /// unspecified; only set equality survives the round trip.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for element in self {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Decode + Eq + Hash> Decode for HashSet<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut elements = HashSet::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            elements.insert(T::decode(de)?);
        }
        Ok(elements)
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for (key, value) in self {
            key.encode(ser)?;
            value.encode(ser)?;
        }
        Ok(())
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut entries = BTreeMap::new();
        for _ in 0..len {
            let key = K::decode(de)?;
            let value = V::decode(de)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

impl<K: Encode, V: Encode> Encode for HashMap<K, V> {
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for (key, value) in self {
            key.encode(ser)?;
            value.encode(ser)?;
        }
        Ok(())
    }
}

impl<K: Decode + Eq + Hash, V: Decode> Decode for HashMap<K, V> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let len = decoded_len(de.read_size()?)?;
        let mut entries = HashMap::with_capacity(len.min(PREALLOC_LIMIT));
        for _ in 0..len {
            let key = K::decode(de)?;
            let value = V::decode(de)?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

impl<T: Encode> Encode for BinaryHeap<T> {
    /// Serialization reaches through the adapter to its backing storage:
    /// elements travel in heap-array order, not pop order.
    fn encode<S: OutputStream>(&self, ser: &mut Serializer<'_, S>) -> Result<()> {
        ser.write_size(self.len() as u64)?;
        for element in self.iter() {
            element.encode(ser)?;
        }
        Ok(())
    }
}

impl<T: Decode + Ord> Decode for BinaryHeap<T> {
    fn decode<S: InputStream>(de: &mut Deserializer<'_, S>) -> Result<Self> {
        let elements: Vec<T> = Vec::decode(de)?;
        Ok(BinaryHeap::from(elements))
    }
}

/// Writes a fieldless enum as its underlying integer.
pub fn encode_enum<T, S>(ser: &mut Serializer<'_, S>, value: T) -> Result<()>
where
    T: TryFromPrimitive + Into<<T as TryFromPrimitive>::Primitive>,
    <T as TryFromPrimitive>::Primitive: Encode,
    S: OutputStream,
{
    let raw: <T as TryFromPrimitive>::Primitive = value.into();
    raw.encode(ser)
}

/// Reads a fieldless enum from its underlying integer, rejecting unknown
/// discriminants.
pub fn decode_enum<T, S>(de: &mut Deserializer<'_, S>) -> Result<T>
where
    T: TryFromPrimitive,
    <T as TryFromPrimitive>::Primitive: Decode,
    S: InputStream,
{
    let raw = <T as TryFromPrimitive>::Primitive::decode(de)?;
    T::try_from_primitive(raw)
        .map_err(|_| Error::invalid_data(format!("unknown {} discriminant {raw:?}", T::NAME)))
}

/// Writes a bit-flag set as its underlying integer mask.
pub fn encode_flags<F, S>(ser: &mut Serializer<'_, S>, flags: &F) -> Result<()>
where
    F: bitflags::Flags,
    F::Bits: Encode,
    S: OutputStream,
{
    flags.bits().encode(ser)
}

/// Reads a bit-flag set from its integer mask. Bits unknown to the current
/// flag definition are retained so the mask round-trips losslessly.
pub fn decode_flags<F, S>(de: &mut Deserializer<'_, S>) -> Result<F>
where
    F: bitflags::Flags,
    F::Bits: Decode,
    S: InputStream,
{
    Ok(F::from_bits_retain(F::Bits::decode(de)?))
}

/// Writes a zero-based tagged-union alternative index.
pub fn write_variant_index<S: OutputStream>(
    ser: &mut Serializer<'_, S>,
    index: u64,
) -> Result<()> {
    ser.write_size(index)
}

/// Reads a tagged-union alternative index and validates it against the
/// union's alternative count.
pub fn read_variant_index<S: InputStream>(
    de: &mut Deserializer<'_, S>,
    count: u64,
) -> Result<u64> {
    let index = de.read_size()?;
    if index >= count {
        return Err(Error::invalid_variant(index, count));
    }
    Ok(index)
}
