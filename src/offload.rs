//! Running hashes off the async executor.
//!
//! bcrypt is deliberately slow and blocks its thread for the whole
//! computation. These helpers move the work to tokio's blocking pool.
//! Dropping the returned future abandons the result; the computation itself
//! runs to completion in the background.

use tokio::task;

use crate::bcrypt::{self, BcryptHasher};
use crate::error::{BcryptError, BcryptResult};
use crate::hash_string::HashString;

fn join_error(err: task::JoinError) -> BcryptError {
    BcryptError::TaskFailed(err.to_string())
}

/// Hashes `password` with a fresh salt on the blocking pool.
pub async fn hash_async(hasher: BcryptHasher, password: Vec<u8>) -> BcryptResult<HashString> {
    let password = zeroize::Zeroizing::new(password);
    task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(join_error)?
}

/// Verifies `password` against `existing` on the blocking pool.
pub async fn verify_async(password: Vec<u8>, existing: String) -> BcryptResult<bool> {
    let password = zeroize::Zeroizing::new(password);
    task::spawn_blocking(move || bcrypt::verify(&password, &existing))
        .await
        .map_err(join_error)?
}
