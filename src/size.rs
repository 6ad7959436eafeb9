//! Variable-length encoding for sizes, counts and union indices.
//!
//! Small sizes dominate real archives, so the codec spends one byte on any
//! size below `0xFF` and grows through eight tiers for larger ones. Tier `k`
//! (for `k` in 1..=7) writes `k` marker bytes of `0xFF` followed by a
//! `(k + 1)`-byte big-endian payload holding `size - (2^(8k) - 1)`; the
//! subtraction keeps every tier's payload anchored at zero and makes each
//! encoding unambiguous. A size fits tier `k` when it is strictly below
//! `2^(8(k+1)) - 1`, so the boundary values `0xFF`, `0xFFFF`, `0xFFFFFF`, ...
//! each promote to the next tier. Tier 7 takes everything that remains, which
//! means `u64::MAX` occupies the full 15 bytes.

use crate::error::{Error, Result};
use crate::stream::{InputStream, OutputStream};

/// Longest possible encoding: 7 marker bytes plus an 8-byte payload.
pub const MAX_ENCODED_LEN: usize = 15;

const MARKER: u8 = 0xFF;
const MAX_TIER: usize = 7;

/// Offset subtracted from a size before encoding its tier payload.
fn tier_offset(tier: usize) -> u64 {
    (1u64 << (8 * tier)) - 1
}

/// Smallest size that no longer fits tier `tier`. Only defined below tier 7,
/// which has no upper bound.
fn tier_limit(tier: usize) -> u64 {
    (1u64 << (8 * (tier + 1))) - 1
}

/// Encodes `size` into `out`, returning the number of bytes used.
pub(crate) fn encode(size: u64, out: &mut [u8; MAX_ENCODED_LEN]) -> usize {
    if size < u64::from(MARKER) {
        out[0] = size as u8;
        return 1;
    }
    let mut used = 0;
    let mut tier = 0;
    loop {
        tier += 1;
        out[used] = MARKER;
        used += 1;
        if tier == MAX_TIER || size < tier_limit(tier) {
            let payload = size - tier_offset(tier);
            let width = tier + 1;
            out[used..used + width].copy_from_slice(&payload.to_be_bytes()[8 - width..]);
            return used + width;
        }
    }
}

/// Number of bytes `size` occupies on the wire.
pub fn encoded_len(size: u64) -> usize {
    let mut tier = 0;
    while tier < MAX_TIER && size >= tier_limit(tier) {
        tier += 1;
    }
    if tier == 0 {
        1
    } else {
        2 * tier + 1
    }
}

/// Writes `size` to `stream` in the variable-length encoding.
pub fn write<S: OutputStream + ?Sized>(stream: &mut S, size: u64) -> Result<()> {
    let mut encoded = [0u8; MAX_ENCODED_LEN];
    let used = encode(size, &mut encoded);
    stream.write_all(&encoded[..used])
}

/// Reads a variable-length size from `stream`.
pub fn read<S: InputStream + ?Sized>(stream: &mut S) -> Result<u64> {
    let mut byte = [0u8; 1];
    stream.read_exact(&mut byte)?;
    if byte[0] != MARKER {
        return Ok(u64::from(byte[0]));
    }
    // Count the marker run; the byte that breaks it (or the byte after the
    // seventh marker) is the first payload byte.
    let mut tier = 1;
    let first = loop {
        stream.read_exact(&mut byte)?;
        if byte[0] != MARKER || tier == MAX_TIER {
            break byte[0];
        }
        tier += 1;
    };
    let width = tier + 1;
    let mut payload = [0u8; 8];
    payload[8 - width] = first;
    stream.read_exact(&mut payload[8 - width + 1..])?;
    u64::from_be_bytes(payload)
        .checked_add(tier_offset(tier))
        .ok_or_else(|| Error::invalid_data("size payload overflows 64 bits"))
}
