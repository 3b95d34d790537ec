//! The `$2b$12$<salt><digest>` text layout.
//!
//! A *setting* is the 29-character prefix `$<variant>$<cost>$<salt>`, the
//! form produced by `encode_salt`. A *hash string* is a setting followed by
//! the 31-character digest, 60 characters in total.

use std::fmt;
use std::str::FromStr;

use crate::error::{BcryptError, BcryptResult};
use crate::params::{Cost, Digest, Salt, Variant};
use crate::radix64;

/// Characters used by an encoded salt.
pub const ENCODED_SALT_LEN: usize = radix64::encoded_len(crate::params::SALT_LEN);
/// Characters used by an encoded digest.
pub const ENCODED_DIGEST_LEN: usize = radix64::encoded_len(crate::params::DIGEST_LEN);
/// Length of `$2b$NN$` plus the encoded salt.
pub const SETTING_LEN: usize = 7 + ENCODED_SALT_LEN;
/// Length of a complete hash string.
pub const HASH_STRING_LEN: usize = SETTING_LEN + ENCODED_DIGEST_LEN;

fn malformed(reason: impl Into<String>) -> BcryptError {
    BcryptError::MalformedHash(reason.into())
}

/// Splits `$<variant>$<cost>$<rest>` and validates the first two fields.
fn split_fields(s: &str) -> BcryptResult<(Variant, Cost, &str)> {
    if !s.is_ascii() {
        return Err(malformed("contains non-ASCII characters"));
    }

    let Some(body) = s.strip_prefix('$') else {
        return Err(malformed("missing leading '$'"));
    };

    let mut fields = body.splitn(3, '$');
    let (Some(variant), Some(cost), Some(rest)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("wrong number of '$'-delimited fields"));
    };

    let variant: Variant = variant.parse()?;

    if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("cost {cost:?} is not two digits")));
    }
    let log_rounds: u32 = cost
        .parse()
        .map_err(|_| malformed(format!("cost {cost:?} is not a number")))?;
    let cost =
        Cost::new(log_rounds).map_err(|_| malformed(format!("cost {log_rounds} out of range")))?;

    Ok((variant, cost, rest))
}

/// The codec ignores unused low bits in a final character, so two texts can
/// decode to the same bytes. Only the text `encode` would produce is accepted
/// here; otherwise a stored hash could be altered and still verify.
fn ensure_canonical(field: &str, encoded: &str, reencoded: &str) -> BcryptResult<()> {
    if encoded == reencoded {
        Ok(())
    } else {
        Err(malformed(format!(
            "{field} {encoded:?} is not canonical, expected {reencoded:?}"
        )))
    }
}

fn decode_salt(encoded: &str) -> BcryptResult<Salt> {
    let salt = Salt::decode(encoded).map_err(|e| malformed(format!("salt: {e}")))?;
    ensure_canonical("salt", encoded, &salt.encode())?;
    Ok(salt)
}

fn decode_digest(encoded: &str) -> BcryptResult<Digest> {
    let digest = Digest::decode(encoded).map_err(|e| match e {
        BcryptError::MalformedHash(_) => e,
        other => malformed(format!("digest: {other}")),
    })?;
    ensure_canonical("digest", encoded, &digest.encode())?;
    Ok(digest)
}

/// Parameters for one hash: variant, cost and salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting {
    variant: Variant,
    cost: Cost,
    salt: Salt,
}

impl Setting {
    pub fn new(variant: Variant, cost: Cost, salt: Salt) -> Self {
        Setting {
            variant,
            cost,
            salt,
        }
    }

    /// Parses exactly a 29-character setting.
    pub fn parse(s: &str) -> BcryptResult<Self> {
        if s.len() != SETTING_LEN {
            return Err(malformed(format!(
                "setting is {} characters, expected {SETTING_LEN}",
                s.len()
            )));
        }
        Self::parse_prefix(s)
    }

    /// Parses the setting at the start of either a bare setting or a full
    /// hash string. The digest of a full hash string is checked for a valid
    /// canonical encoding but otherwise ignored.
    pub fn parse_prefix(s: &str) -> BcryptResult<Self> {
        let (variant, cost, rest) = split_fields(s)?;

        if rest.len() != ENCODED_SALT_LEN && rest.len() != ENCODED_SALT_LEN + ENCODED_DIGEST_LEN {
            return Err(malformed(format!(
                "salt and digest are {} characters, expected {ENCODED_SALT_LEN} or {}",
                rest.len(),
                ENCODED_SALT_LEN + ENCODED_DIGEST_LEN
            )));
        }

        let (salt, digest) = rest.split_at(ENCODED_SALT_LEN);
        let salt = decode_salt(salt)?;
        if !digest.is_empty() {
            decode_digest(digest)?;
        }
        Ok(Setting::new(variant, cost, salt))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}${}${}", self.variant, self.cost, self.salt.encode())
    }
}

impl FromStr for Setting {
    type Err = BcryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Setting::parse(s)
    }
}

/// A complete bcrypt hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashString {
    setting: Setting,
    digest: Digest,
}

impl HashString {
    pub fn new(setting: Setting, digest: Digest) -> Self {
        HashString { setting, digest }
    }

    /// Parses a 60-character hash string.
    pub fn parse(s: &str) -> BcryptResult<Self> {
        if s.len() != HASH_STRING_LEN {
            return Err(malformed(format!(
                "hash is {} characters, expected {HASH_STRING_LEN}",
                s.len()
            )));
        }

        let (variant, cost, rest) = split_fields(s)?;
        if rest.len() != ENCODED_SALT_LEN + ENCODED_DIGEST_LEN {
            return Err(malformed("salt and digest have the wrong length"));
        }

        let (salt, digest) = rest.split_at(ENCODED_SALT_LEN);
        Ok(HashString {
            setting: Setting::new(variant, cost, decode_salt(salt)?),
            digest: decode_digest(digest)?,
        })
    }

    pub fn setting(&self) -> &Setting {
        &self.setting
    }

    pub fn variant(&self) -> Variant {
        self.setting.variant
    }

    pub fn cost(&self) -> Cost {
        self.setting.cost
    }

    pub fn salt(&self) -> &Salt {
        &self.setting.salt
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

impl fmt::Display for HashString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.setting, self.digest.encode())
    }
}

impl FromStr for HashString {
    type Err = BcryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashString::parse(s)
    }
}
