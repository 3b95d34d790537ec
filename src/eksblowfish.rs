//! The expensive key schedule.
//!
//! Starting from the digits of pi, the key and salt are folded in once with
//! the salted expansion, then the state is re-keyed `2^cost` times,
//! alternating between the key and the salt. The state is carried forward
//! through every round and never reset.

use std::time::Instant;

use tracing::trace;

use crate::blowfish::Blowfish;
use crate::error::BcryptResult;
use crate::params::{Cost, Salt};

/// Runs Eksblowfish setup and returns the resulting cipher state.
///
/// `key` is the prepared key material (see [`crate::password`]). The loop is
/// not interruptible; abandoning the result is the only way to cancel.
pub fn expensive_key_setup(key: &[u8], salt: &Salt, cost: Cost) -> Blowfish {
    let started = Instant::now();
    let salt_words = salt.words();

    let mut state = Blowfish::with_key_and_salt(key, &salt_words);

    for _ in 0..cost.rounds() {
        state.expand_key(key);
        state.expand_key(salt.as_bytes());
    }

    trace!(
        cost = cost.log_rounds(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "expensive key setup finished"
    );

    state
}

/// Like [`expensive_key_setup`] but validates a raw cost first, before any
/// work is done.
pub fn expensive_key_setup_checked(
    key: &[u8],
    salt: &Salt,
    log_rounds: u32,
) -> BcryptResult<Blowfish> {
    let cost = Cost::new(log_rounds)?;
    Ok(expensive_key_setup(key, salt, cost))
}
