//! Payload obfuscation transform.
//!
//! Every byte is XORed with a single key byte and then rotated left by a fixed
//! amount. The same `(key, rotation)` pair is applied to the whole payload.
//! This hides the payload from casual inspection; it is not encryption.

use rand::Rng;

use crate::error::{PackError, Result};

/// A bit rotation amount in `1..=7`.
///
/// 0 and 8 are excluded since both leave every byte unrotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u8);

impl Rotation {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(amount: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&amount) {
            Ok(Self(amount))
        } else {
            Err(PackError::InvalidRotation(amount))
        }
    }

    /// Picks a rotation uniformly from `1..=7`.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Parameters shared by the packer and the runtime stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObfuscationParams {
    pub key: u8,
    pub rotation: Rotation,
}

#[inline]
pub fn encode_byte(b: u8, key: u8, rotation: Rotation) -> u8 {
    (b ^ key).rotate_left(rotation.get() as u32)
}

/// Inverse of [`encode_byte`], as applied by the runtime stub.
#[inline]
pub fn decode_byte(c: u8, key: u8, rotation: Rotation) -> u8 {
    c.rotate_right(rotation.get() as u32) ^ key
}

/// Encodes `data` into a new buffer.
pub fn encode(data: &[u8], params: ObfuscationParams) -> Vec<u8> {
    data.iter()
        .map(|&b| encode_byte(b, params.key, params.rotation))
        .collect()
}

/// Decodes `data` into a new buffer.
pub fn decode(data: &[u8], params: ObfuscationParams) -> Vec<u8> {
    data.iter()
        .map(|&c| decode_byte(c, params.key, params.rotation))
        .collect()
}
