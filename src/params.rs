//! Value types for the inputs and output of one bcrypt computation.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{BcryptError, BcryptResult};
use crate::radix64;

/// Lowest accepted cost.
pub const MIN_COST: u32 = 4;
/// Highest accepted cost.
pub const MAX_COST: u32 = 31;
/// Cost used when the caller does not pick one.
pub const DEFAULT_COST: u32 = 12;

/// Raw salt size in bytes.
pub const SALT_LEN: usize = 16;
/// Raw digest size in bytes (the 24th byte of output is dropped).
pub const DIGEST_LEN: usize = 23;

/// Base-2 logarithm of the number of key-schedule repetitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost(u32);

impl Cost {
    /// Validates a cost; out-of-range values are rejected, never clamped.
    pub fn new(log_rounds: u32) -> BcryptResult<Self> {
        if (MIN_COST..=MAX_COST).contains(&log_rounds) {
            Ok(Cost(log_rounds))
        } else {
            Err(BcryptError::InvalidCost(log_rounds))
        }
    }

    pub const fn log_rounds(self) -> u32 {
        self.0
    }

    /// Number of expensive key-schedule iterations, `2^cost`.
    pub const fn rounds(self) -> u64 {
        1 << self.0
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost(DEFAULT_COST)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// The minor version letter after `$2`.
///
/// Variants historically mark fixes to password-length and sign-extension
/// bugs in particular implementations. This crate computes the correct (2b)
/// algorithm for every variant and only carries the letter through so stored
/// hashes keep their prefix. Hashes produced by the buggy 2x implementation
/// from passwords with high-bit bytes will not verify.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    TwoA,
    #[default]
    TwoB,
    TwoX,
    TwoY,
}

impl Variant {
    pub const fn as_str(self) -> &'static str {
        match self {
            Variant::TwoA => "2a",
            Variant::TwoB => "2b",
            Variant::TwoX => "2x",
            Variant::TwoY => "2y",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BcryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2a" => Ok(Variant::TwoA),
            "2b" => Ok(Variant::TwoB),
            "2x" => Ok(Variant::TwoX),
            "2y" => Ok(Variant::TwoY),
            other => Err(BcryptError::MalformedHash(format!(
                "unknown variant {other:?}"
            ))),
        }
    }
}

/// 16 bytes of salt, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub const fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Salt(bytes)
    }

    /// Accepts exactly 16 bytes; anything else is an error, never padded.
    pub fn from_slice(bytes: &[u8]) -> BcryptResult<Self> {
        let bytes: [u8; SALT_LEN] =
            bytes
                .try_into()
                .map_err(|_| BcryptError::InvalidSaltLength {
                    expected: SALT_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Salt(bytes))
    }

    /// Draws a fresh salt from the thread-local CSPRNG.
    pub fn generate() -> BcryptResult<Self> {
        Self::generate_from(&mut rand::thread_rng())
    }

    /// Draws a fresh salt from `rng`.
    pub fn generate_from<R: RngCore + ?Sized>(rng: &mut R) -> BcryptResult<Self> {
        let mut bytes = [0u8; SALT_LEN];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|e| BcryptError::InsufficientEntropy(e.to_string()))?;
        Ok(Salt(bytes))
    }

    /// Parses the 22-character radix-64 form.
    pub fn decode(encoded: &str) -> BcryptResult<Self> {
        let bytes = radix64::decode(encoded)?;
        Self::from_slice(&bytes)
    }

    pub fn encode(&self) -> String {
        radix64::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// The salt as the four big-endian words the key schedule consumes.
    pub(crate) fn words(&self) -> [u32; 4] {
        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Salt").field(&self.encode()).finish()
    }
}

/// The 23-byte bcrypt output. Equality is constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub(crate) const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// Parses the 31-character radix-64 form.
    pub fn decode(encoded: &str) -> BcryptResult<Self> {
        let bytes = radix64::decode(encoded)?;
        let bytes: [u8; DIGEST_LEN] = bytes.as_slice().try_into().map_err(|_| {
            BcryptError::MalformedHash(format!(
                "digest decodes to {} bytes, expected {DIGEST_LEN}",
                bytes.len()
            ))
        })?;
        Ok(Digest(bytes))
    }

    pub fn encode(&self) -> String {
        radix64::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl ConstantTimeEq for Digest {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Digest {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Digest {}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Digest").field(&self.encode()).finish()
    }
}
