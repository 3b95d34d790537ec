//! bcrypt hashing and verification.
//!
//! [`BcryptHasher`] holds the configuration for producing new hashes. The
//! free functions mirror the two entry points a host binding exposes,
//! `encode_salt` and `hashpw`, plus `hash`, `verify` and salt generation.

use rand::RngCore;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::eksblowfish::expensive_key_setup;
use crate::error::BcryptResult;
use crate::hash_string::{HashString, Setting};
use crate::params::{Cost, Digest, Salt, Variant, DIGEST_LEN};
use crate::password::key_material;

/// "OrpheanBeholderScryDoubt" as six big-endian words.
const MAGIC: [u32; 6] = {
    const fn word(bytes: &[u8; 24], i: usize) -> u32 {
        (bytes[i] as u32) << 24
            | (bytes[i + 1] as u32) << 16
            | (bytes[i + 2] as u32) << 8
            | (bytes[i + 3] as u32)
    }

    let text = b"OrpheanBeholderScryDoubt";
    [
        word(text, 0),
        word(text, 4),
        word(text, 8),
        word(text, 12),
        word(text, 16),
        word(text, 20),
    ]
};

/// Times each magic block is encrypted.
const MAGIC_ROUNDS: usize = 64;

/// Produces and checks bcrypt hashes with a fixed cost and variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: Cost,
    variant: Variant,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> BcryptResult<Self> {
        Ok(BcryptHasher {
            cost: Cost::new(cost)?,
            variant: Variant::default(),
        })
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Hashes `password` with a freshly generated salt.
    pub fn hash(&self, password: &[u8]) -> BcryptResult<HashString> {
        let salt = Salt::generate()?;
        Ok(self.hash_with_salt(password, &salt))
    }

    /// Hashes `password` with a caller-supplied salt.
    pub fn hash_with_salt(&self, password: &[u8], salt: &Salt) -> HashString {
        let setting = Setting::new(self.variant, self.cost, salt.clone());
        hash_setting(password, setting)
    }
}

/// The bcrypt function itself: 23 bytes of output for a password, salt and
/// cost.
pub fn bcrypt_digest(password: &[u8], salt: &Salt, cost: Cost) -> Digest {
    let key = key_material(password);
    let state = expensive_key_setup(&key, salt, cost);

    let mut cdata = MAGIC;
    for _ in 0..MAGIC_ROUNDS {
        for block in cdata.chunks_exact_mut(2) {
            let (l, r) = state.encrypt_block(block[0], block[1]);
            block[0] = l;
            block[1] = r;
        }
    }

    let mut output = [0u8; 24];
    for (bytes, word) in output.chunks_exact_mut(4).zip(cdata) {
        bytes.copy_from_slice(&word.to_be_bytes());
    }

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&output[..DIGEST_LEN]);
    Digest::from_bytes(digest)
}

fn hash_setting(password: &[u8], setting: Setting) -> HashString {
    debug!(
        cost = setting.cost().log_rounds(),
        variant = %setting.variant(),
        "computing bcrypt hash"
    );
    let digest = bcrypt_digest(password, setting.salt(), setting.cost());
    HashString::new(setting, digest)
}

/// Hashes `password` with a raw 16-byte salt.
pub fn hash(password: &[u8], salt: &[u8], cost: u32, variant: Variant) -> BcryptResult<HashString> {
    let cost = Cost::new(cost)?;
    let salt = Salt::from_slice(salt)?;
    Ok(hash_setting(password, Setting::new(variant, cost, salt)))
}

/// Checks `password` against a stored 60-character hash.
///
/// Malformed hashes are an error rather than a plain `false`. The digests
/// are compared in constant time.
pub fn verify(password: &[u8], existing: &str) -> BcryptResult<bool> {
    let existing = HashString::parse(existing)?;
    Ok(existing.verify(password))
}

impl HashString {
    /// Recomputes the hash of `password` with this hash's parameters and
    /// compares digests in constant time.
    pub fn verify(&self, password: &[u8]) -> bool {
        debug!(
            cost = self.cost().log_rounds(),
            variant = %self.variant(),
            "verifying bcrypt hash"
        );
        if self.variant() == Variant::TwoX {
            warn!("verifying a legacy 2x hash; it is computed with 2b semantics");
        }

        let candidate = bcrypt_digest(password, self.salt(), self.cost());
        candidate.ct_eq(self.digest()).into()
    }
}

/// Draws a 16-byte salt from `rng`.
pub fn generate_salt<R: RngCore + ?Sized>(rng: &mut R) -> BcryptResult<Salt> {
    Salt::generate_from(rng)
}

/// Formats a raw salt and cost as a `$2b$NN$<salt>` setting.
pub fn encode_salt(raw: &[u8], cost: u32) -> BcryptResult<String> {
    let cost = Cost::new(cost)?;
    let salt = Salt::from_slice(raw)?;
    Ok(Setting::new(Variant::TwoB, cost, salt).to_string())
}

/// Generates a random setting for `cost`, ready to pass to [`hashpw`].
pub fn gen_salt(cost: u32) -> BcryptResult<String> {
    gen_salt_with(&mut rand::thread_rng(), cost)
}

/// [`gen_salt`] with an explicit random source.
pub fn gen_salt_with<R: RngCore + ?Sized>(rng: &mut R, cost: u32) -> BcryptResult<String> {
    let cost = Cost::new(cost)?;
    let salt = generate_salt(rng)?;
    Ok(Setting::new(Variant::TwoB, cost, salt).to_string())
}

/// Hashes `password` under a setting or an existing full hash string.
///
/// Given a setting this creates a new hash. Given a stored hash the digest
/// part is ignored and the result can be compared with the stored value to
/// verify; [`verify`] does that comparison in constant time.
pub fn hashpw(password: &[u8], salt_or_hash: &str) -> BcryptResult<String> {
    let setting = Setting::parse_prefix(salt_or_hash)?;
    Ok(hash_setting(password, setting).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BcryptError;

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("no entropy"))
        }
    }

    fn counting_salt() -> [u8; 16] {
        let mut salt = [0u8; 16];
        for (i, b) in salt.iter_mut().enumerate() {
            *b = i as u8;
        }
        salt
    }

    #[test]
    fn magic_words() {
        assert_eq!(MAGIC[0], u32::from_be_bytes(*b"Orph"));
        assert_eq!(MAGIC[5], u32::from_be_bytes(*b"oubt"));
    }

    #[test]
    fn test_basic_hashing() -> Result<(), BcryptError> {
        let bcrypt = BcryptHasher::new(4)?;
        let hash = bcrypt.hash(b"password123")?;
        let text = hash.to_string();
        assert!(text.starts_with("$2b$04$"));
        assert_eq!(text.len(), 60);
        Ok(())
    }

    #[test]
    fn test_password_verification() -> Result<(), BcryptError> {
        let bcrypt = BcryptHasher::new(4)?;

        let hash = bcrypt.hash(b"test_password")?.to_string();

        assert!(verify(b"test_password", &hash)?);
        assert!(!verify(b"wrong_password", &hash)?);
        Ok(())
    }

    #[test]
    fn hashing_is_deterministic() -> Result<(), BcryptError> {
        let salt = counting_salt();
        let first = hash(b"determinism", &salt, 4, Variant::TwoB)?;
        let second = hash(b"determinism", &salt, 4, Variant::TwoB)?;
        assert_eq!(first.to_string(), second.to_string());
        Ok(())
    }

    #[test]
    fn known_short_cost_hashes() -> Result<(), BcryptError> {
        let salt = counting_salt();
        assert_eq!(
            hash(b"", &[0; 16], 4, Variant::TwoB)?.to_string(),
            "$2b$04$......................w74bL5gU7LSJClZClCa.Pkz14aTv/XO"
        );
        assert_eq!(
            hash(&[b'a'; 71], &salt, 4, Variant::TwoB)?.to_string(),
            "$2b$04$..CA.uOD/eaGAOmJB.yMBuFX3M8ZaB8T23PcIG8hExbMypeo8IKIS"
        );
        Ok(())
    }

    #[test]
    fn long_passwords_truncate() -> Result<(), BcryptError> {
        let salt = counting_salt();
        let long = [b'a'; 100];
        let expected = "$2b$04$..CA.uOD/eaGAOmJB.yMBuIbwKfymVuMfASrmYBUytUgog5Nvtojy";
        assert_eq!(hash(&long, &salt, 4, Variant::TwoB)?.to_string(), expected);
        assert_eq!(hash(&long[..72], &salt, 4, Variant::TwoB)?.to_string(), expected);
        assert!(verify(&long[..72], expected)?);
        assert!(!verify(&long[..71], expected)?);
        Ok(())
    }

    #[test]
    fn empty_password_is_valid() -> Result<(), BcryptError> {
        let hash = BcryptHasher::new(4)?.hash(b"")?;
        assert!(hash.verify(b""));
        assert!(!hash.verify(b" "));
        Ok(())
    }

    #[test]
    fn variant_only_changes_prefix() -> Result<(), BcryptError> {
        let salt = counting_salt();
        let b = hash(b"variant", &salt, 4, Variant::TwoB)?.to_string();
        let y = hash(b"variant", &salt, 4, Variant::TwoY)?.to_string();
        assert_eq!(&b[3..], &y[3..]);
        assert_eq!(&y[..4], "$2y$");
        Ok(())
    }

    #[test]
    fn test_invalid_cost_factors() {
        assert_eq!(BcryptHasher::new(3), Err(BcryptError::InvalidCost(3)));
        assert_eq!(BcryptHasher::new(32), Err(BcryptError::InvalidCost(32)));
        assert!(BcryptHasher::new(4).is_ok());
        // accepted structurally; never run at this cost in tests
        assert_eq!(BcryptHasher::new(31).map(|h| h.cost().log_rounds()), Ok(31));
        assert!(matches!(
            hash(b"pw", &[0; 16], 3, Variant::TwoB),
            Err(BcryptError::InvalidCost(3))
        ));
    }

    #[test]
    fn rejects_wrong_salt_length() {
        assert!(matches!(
            hash(b"pw", &[0; 12], 4, Variant::TwoB),
            Err(BcryptError::InvalidSaltLength {
                expected: 16,
                actual: 12
            })
        ));
        assert!(matches!(
            encode_salt(&[0; 17], 4),
            Err(BcryptError::InvalidSaltLength { actual: 17, .. })
        ));
    }

    #[test]
    fn encode_salt_formats_setting() -> Result<(), BcryptError> {
        assert_eq!(
            encode_salt(&counting_salt(), 5)?,
            "$2b$05$..CA.uOD/eaGAOmJB.yMBu"
        );
        assert_eq!(encode_salt(&[0; 16], 4), Ok("$2b$04$......................".to_string()));
        assert_eq!(encode_salt(&[0; 16], 2), Err(BcryptError::InvalidCost(2)));
        Ok(())
    }

    #[test]
    fn hashpw_accepts_setting_or_hash() -> Result<(), BcryptError> {
        let setting = encode_salt(&counting_salt(), 4)?;
        let created = hashpw(&[b'a'; 100], &setting)?;
        assert_eq!(
            created,
            "$2b$04$..CA.uOD/eaGAOmJB.yMBuIbwKfymVuMfASrmYBUytUgog5Nvtojy"
        );
        assert_eq!(hashpw(&[b'a'; 100], &created)?, created);
        assert_ne!(hashpw(b"other", &created)?, created);
        Ok(())
    }

    #[test]
    fn hashpw_rejects_garbage() {
        assert!(matches!(
            hashpw(b"pw", ":"),
            Err(BcryptError::MalformedHash(_))
        ));
        assert!(matches!(
            hashpw(b"pw", "$2b$04$short"),
            Err(BcryptError::MalformedHash(_))
        ));
    }

    #[test]
    fn gen_salt_round_trips_through_hashpw() -> Result<(), BcryptError> {
        let setting = gen_salt(4)?;
        assert_eq!(setting.len(), 29);
        assert!(setting.starts_with("$2b$04$"));
        let hash = hashpw(b"secret", &setting)?;
        assert!(hash.starts_with(&setting));
        assert!(verify(b"secret", &hash)?);
        Ok(())
    }

    #[test]
    fn salt_generation_failure() {
        assert!(matches!(
            generate_salt(&mut FailingRng),
            Err(BcryptError::InsufficientEntropy(_))
        ));
        assert!(matches!(
            gen_salt_with(&mut FailingRng, 10),
            Err(BcryptError::InsufficientEntropy(_))
        ));
    }

    #[test]
    fn verify_reports_malformed_hash() {
        let unknown = "$2z$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.";
        assert!(matches!(
            verify(b"", unknown),
            Err(BcryptError::MalformedHash(_))
        ));
        assert!(matches!(
            verify(b"", "not a hash"),
            Err(BcryptError::MalformedHash(_))
        ));
    }

    mod proptest_tests {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(8))]

            #[test]
            fn verify_accepts_own_hash(password in prop::collection::vec(any::<u8>(), 0..80), salt in prop::array::uniform16(any::<u8>())) {
                let hashed = hash(&password, &salt, 4, Variant::TwoB).unwrap();
                prop_assert!(verify(&password, &hashed.to_string()).unwrap());
            }

            #[test]
            fn single_bit_flip_is_rejected(password in prop::collection::vec(any::<u8>(), 1..72), bit in 0usize..8, salt in prop::array::uniform16(any::<u8>())) {
                let hashed = hash(&password, &salt, 4, Variant::TwoB).unwrap().to_string();
                let mut flipped = password.clone();
                let index = flipped.len() - 1;
                flipped[index] ^= 1 << bit;
                prop_assert!(!verify(&flipped, &hashed).unwrap());
            }
        }
    }
}
