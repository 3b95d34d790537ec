//! bcrypt password hashing.
//!
//! bcrypt is a cost-parameterised, salted, one-way password hash built on
//! Eksblowfish, a Blowfish variant whose key setup is deliberately
//! expensive. This crate implements the whole primitive:
//!
//! - [`radix64`]: bcrypt's own base-64 alphabet
//! - [`blowfish`]: the cipher and its key-schedule hooks
//! - [`eksblowfish`]: the `2^cost` key schedule
//! - [`bcrypt`](mod@bcrypt): hashing, verification and salt handling
//! - [`hash_string`]: the `$2b$12$...` text format
//!
//! # Examples
//!
//! ```
//! use bcrypt_core::{verify, BcryptHasher};
//!
//! let hasher = BcryptHasher::new(4).unwrap();
//! let hash = hasher.hash(b"hunter2").unwrap().to_string();
//!
//! assert!(verify(b"hunter2", &hash).unwrap());
//! assert!(!verify(b"hunter3", &hash).unwrap());
//! ```
//!
//! Every call owns its own cipher state, so hashes can run on as many
//! threads as needed without synchronisation. They block for as long as the
//! cost demands; async callers should use the `offload` module (feature
//! `tokio`) or their own worker pool.

pub mod bcrypt;
pub mod blowfish;
pub mod eksblowfish;
pub mod error;
pub mod hash_string;
#[cfg(feature = "tokio")]
pub mod offload;
pub mod params;
pub mod password;
mod pi;
pub mod radix64;

pub use crate::bcrypt::{
    bcrypt_digest, encode_salt, gen_salt, gen_salt_with, generate_salt, hash, hashpw, verify,
    BcryptHasher,
};
pub use crate::error::{BcryptError, BcryptResult};
pub use crate::hash_string::{HashString, Setting, HASH_STRING_LEN, SETTING_LEN};
pub use crate::params::{
    Cost, Digest, Salt, Variant, DEFAULT_COST, DIGEST_LEN, MAX_COST, MIN_COST, SALT_LEN,
};
pub use crate::password::MAX_KEY_LEN;
