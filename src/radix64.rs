//! bcrypt's radix-64 text encoding.
//!
//! Same bit packing as base64 (three bytes to four characters, most
//! significant bits first) but with its own alphabet and no `=` padding. A
//! trailing group of one or two bytes becomes two or three characters.

use crate::error::{BcryptError, BcryptResult};

// BCrypt's custom base64 alphabet
const BCRYPT_BASE64: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const INVALID: u8 = 0xff;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < BCRYPT_BASE64.len() {
        table[BCRYPT_BASE64[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of characters needed to encode `len` bytes.
pub const fn encoded_len(len: usize) -> usize {
    (len * 4 + 2) / 3
}

/// Number of bytes produced by decoding `len` characters.
pub const fn decoded_len(len: usize) -> usize {
    len * 6 / 8
}

fn sextet(character: char) -> Option<u8> {
    let index = usize::try_from(u32::from(character)).ok()?;
    match DECODE_TABLE.get(index) {
        Some(&value) if value != INVALID => Some(value),
        _ => None,
    }
}

/// Encodes bytes with the bcrypt alphabet.
pub fn encode(input: &[u8]) -> String {
    let mut output = String::with_capacity(encoded_len(input.len()));

    for chunk in input.chunks(3) {
        let b1 = u32::from(chunk[0]);
        let b2 = chunk.get(1).map_or(0, |&b| u32::from(b));
        let b3 = chunk.get(2).map_or(0, |&b| u32::from(b));

        let triple = (b1 << 16) | (b2 << 8) | b3;

        // one more character than bytes in the group
        for i in 0..=chunk.len() {
            let index = (triple >> (18 - 6 * i)) & 0x3f;
            output.push(char::from(BCRYPT_BASE64[index as usize]));
        }
    }

    output
}

/// Decodes a bcrypt radix-64 string.
///
/// Unused low bits of the final character are ignored, as every historical
/// implementation does, so distinct texts can decode to the same bytes.
/// Hash-string parsing rejects such non-canonical text one level up. A final
/// group of a single character cannot carry a whole byte and is rejected.
pub fn decode(input: &str) -> BcryptResult<Vec<u8>> {
    let mut values = Vec::with_capacity(input.len());

    for (position, character) in input.chars().enumerate() {
        let value = sextet(character).ok_or(BcryptError::InvalidEncoding {
            character,
            position,
        })?;
        values.push(value);
    }

    if values.len() % 4 == 1 {
        let position = values.len() - 1;
        // every character is in the alphabet by now, so bytes and chars line up
        let character = char::from(input.as_bytes()[position]);
        return Err(BcryptError::InvalidEncoding {
            character,
            position,
        });
    }

    let mut output = Vec::with_capacity(decoded_len(values.len()));

    for group in values.chunks(4) {
        let mut triple = 0u32;
        for (i, &value) in group.iter().enumerate() {
            triple |= u32::from(value) << (18 - 6 * i);
        }

        let bytes = triple.to_be_bytes();
        output.extend_from_slice(&bytes[1..group.len()]);
    }

    Ok(output)
}
