//! MurmurHash3 (x86, 32-bit).
//!
//! Used to derive compact member-list ids; not a cryptographic hash.

use std::io::Cursor;

pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    murmur3::murmur3_32(&mut Cursor::new(data), seed)
        .expect("reading from an in-memory buffer cannot fail")
}

/// Hash of a string's UTF-8 bytes with seed 0.
pub fn murmur3_str(s: &str) -> u32 {
    murmur3_32(s.as_bytes(), 0)
}
