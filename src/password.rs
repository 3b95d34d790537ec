//! Turning a password into Blowfish key material.

use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

/// Longest key bcrypt consumes, terminating NUL included.
pub const MAX_KEY_LEN: usize = 72;

/// Key material for the key schedule: the password bytes followed by a NUL,
/// truncated to 72 bytes. Bytes past the limit never influence the hash.
pub(crate) fn key_material(password: &[u8]) -> Zeroizing<Vec<u8>> {
    let len = password.len().min(MAX_KEY_LEN);

    let mut key: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::with_capacity(len + 1));
    key.extend_from_slice(&password[..len]);
    key.push(0);
    key.truncate(MAX_KEY_LEN);

    key
}

/// Applies Unicode NFKC normalisation so that canonically or compatibly
/// equivalent spellings of a password produce the same bytes.
///
/// bcrypt itself hashes raw bytes; callers opt into this explicitly.
///
/// The output is measured first and written into a buffer of exactly that
/// size, so no reallocation leaves an unwiped copy behind.
pub fn normalize(password: &str) -> Zeroizing<Vec<u8>> {
    let len: usize = password.nfkc().map(char::len_utf8).sum();

    let mut normalized = Zeroizing::new(Vec::with_capacity(len));
    let mut buf = Zeroizing::new([0u8; 4]);
    for c in password.nfkc() {
        normalized.extend_from_slice(c.encode_utf8(&mut buf[..]).as_bytes());
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_nul() {
        assert_eq!(key_material(b"").as_slice(), b"\0");
        assert_eq!(key_material(b"abc").as_slice(), b"abc\0");
    }

    #[test]
    fn truncates_at_72_bytes() {
        let short = [b'a'; 71];
        let key = key_material(&short);
        assert_eq!(key.len(), 72);
        assert_eq!(key[71], 0);

        let exact = [b'b'; 72];
        assert_eq!(key_material(&exact).as_slice(), &exact[..]);

        let long = [b'c'; 100];
        assert_eq!(key_material(&long).as_slice(), &long[..72]);
    }

    #[test]
    fn keeps_embedded_nul() {
        assert_eq!(key_material(b"a\0b").as_slice(), b"a\0b\0");
    }

    #[test]
    fn normalization_unifies_composed_forms() {
        let composed = normalize("caf\u{e9}");
        let decomposed = normalize("cafe\u{301}");
        assert_eq!(composed, decomposed);
        assert_eq!(normalize("plain").as_slice(), b"plain");
    }

    #[test]
    fn normalization_fills_exact_capacity() {
        // U+FDFA expands to 18 characters under NFKC
        let expanded = normalize("a\u{fdfa}");
        assert_eq!(expanded.len(), expanded.capacity());
        assert_eq!(
            std::str::from_utf8(&expanded).unwrap(),
            "a\u{635}\u{644}\u{649} \u{627}\u{644}\u{644}\u{647} \u{639}\u{644}\u{64a}\u{647} \u{648}\u{633}\u{644}\u{645}"
        );
        assert_eq!(normalize("").len(), 0);
    }
}
