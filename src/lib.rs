//! # gfstream (v0.2.1)
//!
//! A lightweight, composable Rust library for binary archive serialization.
//!
//! ## Overview
//!
//! `gfstream` writes and reads compact binary archives: a four-byte header
//! (the `"gf"` magic plus a format version) followed by big-endian scalar
//! values, variable-length sizes, and composite shapes built recursively
//! out of both. The same trait-based stream layer carries the bytes in
//! every direction, so the codec never cares whether it is talking to a
//! file, a borrowed byte span, or a stack of decorators.
//!
//! ## Key Features
//!
//! * **Composable Streams**: File and in-memory terminals, plus buffering,
//!   DEFLATE compression, and integrity-hashing decorators that stack in
//!   any order
//! * **Compact Sizes**: lengths, counts and union indices use a tiered
//!   variable-length encoding that spends one byte on small values
//! * **Recursive Composites**: tuples, options, results, paths, and the
//!   std containers encode out of the box via [`Encode`]/[`Decode`]
//! * **Strict Decoding**: bad magic, out-of-range union indices, invalid
//!   bools and malformed UTF-8 all fail with descriptive errors instead of
//!   producing garbage values
//!
//! ## Quick Start
//!
//! ```rust
//! use gfstream::*;
//! use std::collections::BTreeMap;
//!
//! fn main() -> Result<()> {
//!     let mut archive = Vec::new();
//!
//!     // Write: header first, then values in schema order.
//!     let mut output = BufferOutputStream::new(&mut archive);
//!     let mut serializer = Serializer::new(&mut output)?;
//!     serializer.encode(&String::from("spawn_point"))?;
//!     serializer.encode(&(12.5f32, -3.0f32))?;
//!     let mut tags = BTreeMap::new();
//!     tags.insert(String::from("biome"), 7u32);
//!     serializer.encode(&tags)?;
//!
//!     // Read the same sequence back.
//!     let mut input = SliceInputStream::new(&archive);
//!     let mut deserializer = Deserializer::new(&mut input)?;
//!     let name: String = deserializer.decode()?;
//!     let position: (f32, f32) = deserializer.decode()?;
//!     let tags_back: BTreeMap<String, u32> = deserializer.decode()?;
//!
//!     assert_eq!(name, "spawn_point");
//!     assert_eq!(position, (12.5, -3.0));
//!     assert_eq!(tags_back.get("biome"), Some(&7));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is built around two pairs of abstractions:
//!
//! * **`OutputStream` / `InputStream`**: byte transport. Terminal streams
//!   own or borrow a backing store; decorator streams wrap another stream
//!   by mutable reference and transform the bytes in flight
//! * **`Encode` / `Decode`**: value representation. User types implement
//!   these to define their wire sequence; the `composite` module covers
//!   the standard shapes
//!
//! The format carries no type tags, so writer and reader must agree on
//! the value sequence out of band.

pub mod buffered;
pub mod composite;
pub mod compressed;
pub mod de;
pub mod error;
pub mod file;
pub mod hashed;
pub mod ser;
pub mod size;
pub mod stream;
pub mod traits;

// Re-export the main public API for user convenience.
pub use buffered::{BufferedInputStream, BufferedOutputStream};
pub use composite::{
    decode_enum, decode_flags, encode_enum, encode_flags, read_variant_index,
    write_variant_index,
};
pub use compressed::{CompressedInputStream, CompressedOutputStream};
pub use de::Deserializer;
pub use error::{Error, Result};
pub use file::{FileInputStream, FileOutputStream, WriteMode};
pub use hashed::{Crc32Hasher, HashedInputStream, HashedOutputStream, Sha256Hasher, StreamHasher};
pub use ser::{Serializer, MAGIC};
pub use stream::{
    BufferOutputStream, InputStream, OutputStream, SliceInputStream, SliceOutputStream,
};
pub use traits::{Decode, Encode};
