//! Blowfish block cipher with the key-schedule hooks bcrypt needs.
//!
//! Only encryption is implemented. The state is wiped when dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::pi::{P_INIT, S_INIT};

/// Number of Feistel rounds.
const ROUNDS: usize = 16;

/// Number of 32-bit subkeys in the P-array.
pub const SUBKEYS: usize = ROUNDS + 2;

/// Mutable Blowfish state: 18 subkeys and four 256-entry S-boxes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Blowfish {
    p: [u32; SUBKEYS],
    s: [[u32; 256]; 4],
}

/// Yields big-endian 32-bit words from a byte string, wrapping around to
/// its start when the bytes run out.
struct WordCycle<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl<'a> WordCycle<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        WordCycle { bytes, index: 0 }
    }

    fn next_word(&mut self) -> u32 {
        let mut word = 0u32;
        for _ in 0..4 {
            word = (word << 8) | u32::from(self.bytes[self.index]);
            self.index = (self.index + 1) % self.bytes.len();
        }
        word
    }
}

impl Blowfish {
    /// Returns the unkeyed state loaded with the digits of pi.
    pub fn initial() -> Self {
        Blowfish {
            p: P_INIT,
            s: S_INIT,
        }
    }

    /// Standard Blowfish key setup.
    ///
    /// Keys are cycled to fill the P-array; Blowfish proper limits them to
    /// 56 bytes but bcrypt feeds up to 72.
    pub fn with_key(key: &[u8]) -> Self {
        let mut state = Self::initial();
        state.expand_key(key);
        state
    }

    /// bcrypt's salted key setup: like [`Blowfish::with_key`] but the salt is
    /// mixed into every block that regenerates the subkeys and S-boxes.
    pub fn with_key_and_salt(key: &[u8], salt: &[u32; 4]) -> Self {
        let mut state = Self::initial();
        state.expand_key_with_salt(key, salt);
        state
    }

    /// XORs `key` into the P-array and regenerates the whole state from
    /// encryptions of a zero block, keeping the current state as the
    /// starting point.
    pub fn expand_key(&mut self, key: &[u8]) {
        self.mix_key(key);
        self.regenerate(|l, r| (l, r));
    }

    /// Same as [`Blowfish::expand_key`] but every block is XORed with the next
    /// two salt words before it is encrypted.
    pub fn expand_key_with_salt(&mut self, key: &[u8], salt: &[u32; 4]) {
        self.mix_key(key);

        let mut offset = 0;
        self.regenerate(|l, r| {
            let block = (l ^ salt[offset], r ^ salt[offset + 1]);
            offset ^= 2;
            block
        });
    }

    /// Encrypts one 64-bit block given as two big-endian halves.
    pub fn encrypt_block(&self, mut l: u32, mut r: u32) -> (u32, u32) {
        for i in (0..ROUNDS).step_by(2) {
            l ^= self.p[i];
            r ^= self.f(l);
            r ^= self.p[i + 1];
            l ^= self.f(r);
        }

        l ^= self.p[ROUNDS];
        r ^= self.p[ROUNDS + 1];

        (r, l)
    }

    /// Encrypts an 8-byte block in place.
    pub fn encrypt_bytes(&self, block: &mut [u8; 8]) {
        let [a, b, c, d, e, f, g, h] = *block;
        let (l, r) = self.encrypt_block(
            u32::from_be_bytes([a, b, c, d]),
            u32::from_be_bytes([e, f, g, h]),
        );
        block[..4].copy_from_slice(&l.to_be_bytes());
        block[4..].copy_from_slice(&r.to_be_bytes());
    }

    fn mix_key(&mut self, key: &[u8]) {
        if key.is_empty() {
            return;
        }

        let mut words = WordCycle::new(key);
        for subkey in &mut self.p {
            *subkey ^= words.next_word();
        }
    }

    /// Overwrites the P-array and then each S-box, two words at a time, with
    /// successive encryptions. `next_input` turns the previous ciphertext
    /// into the next plaintext.
    fn regenerate<F>(&mut self, mut next_input: F)
    where
        F: FnMut(u32, u32) -> (u32, u32),
    {
        let (mut l, mut r) = (0u32, 0u32);

        for i in (0..SUBKEYS).step_by(2) {
            let (pl, pr) = next_input(l, r);
            (l, r) = self.encrypt_block(pl, pr);
            self.p[i] = l;
            self.p[i + 1] = r;
        }

        for sbox in 0..4 {
            for k in (0..256).step_by(2) {
                let (pl, pr) = next_input(l, r);
                (l, r) = self.encrypt_block(pl, pr);
                self.s[sbox][k] = l;
                self.s[sbox][k + 1] = r;
            }
        }
    }

    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        let h = self.s[0][usize::from(a)].wrapping_add(self.s[1][usize::from(b)]);
        (h ^ self.s[2][usize::from(c)]).wrapping_add(self.s[3][usize::from(d)])
    }
}
