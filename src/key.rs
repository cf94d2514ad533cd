//! Key derivation.
//!
//! The obfuscation key is derived from the payload's size and checksum, so no
//! key byte is ever written into the output. The runtime stub recomputes the
//! key from the metadata record with the same formula; both sides must agree
//! bit for bit or packed payloads become undecodable.

/// Mixing constant shared with the runtime stub.
pub const KEY_MIX: u32 = 0xA5A5_A5A5;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Additive sum of all bytes, modulo 2^32.
pub fn checksum(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(b as u32))
}

/// Derives the obfuscation key from the payload's size and checksum.
pub fn derive_key(payload_size: u32, checksum: u32) -> u8 {
    let x = payload_size ^ checksum ^ KEY_MIX;
    (x as u8).rotate_left(3)
}

/// FNV-1a 64 hash of a passphrase.
///
/// Only this value is stored; the stub hashes what the user types and compares.
pub fn passphrase_hash(passphrase: &[u8]) -> u64 {
    passphrase.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        (h ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}
