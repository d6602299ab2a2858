// src/utils/hex_code.rs - Identifier <-> short code bijection
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("invalid short code")]
    InvalidCode,
}

/// Hex digits `0` and `1` are written as `g` and `h` in a short code
const SUBSTITUTIONS: [(char, char); 2] = [('0', 'g'), ('1', 'h')];

/// Encodes an identifier as a short code.
///
/// The identifier is formatted as a lowercase base-16 numeral and the digits
/// `0`/`1` are swapped for `g`/`h`, so every code is drawn from `2-9a-h`.
pub fn encode(id: u64) -> String {
    format!("{:x}", id)
        .chars()
        .map(|c| {
            SUBSTITUTIONS
                .iter()
                .find(|(digit, _)| *digit == c)
                .map_or(c, |(_, letter)| *letter)
        })
        .collect()
}

/// Decodes a short code back to its identifier.
///
/// Fails with [`CodeError::InvalidCode`] on empty input, on any character
/// outside the code alphabet, and on numerals that overflow `u64`.
pub fn decode(code: &str) -> Result<u64, CodeError> {
    if code.is_empty() {
        return Err(CodeError::InvalidCode);
    }

    let mut numeral = String::with_capacity(code.len());
    for c in code.chars() {
        let digit = match c {
            '2'..='9' | 'a'..='f' => c,
            _ => SUBSTITUTIONS
                .iter()
                .find(|(_, letter)| *letter == c)
                .map(|(digit, _)| *digit)
                .ok_or(CodeError::InvalidCode)?,
        };
        numeral.push(digit);
    }

    u64::from_str_radix(&numeral, 16).map_err(|_| CodeError::InvalidCode)
}
