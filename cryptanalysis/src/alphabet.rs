//! Ciphertext and plaintext alphabets
//!
//! Both alphabets have the same 26 ranks. Ciphertext symbols are written in
//! upper case (`A..Z`), plaintext symbols in lower case (`a..z`), and the rank
//! of a [`Symbol`] is used directly as an index into every frequency table.

use std::fmt;

use crate::error::{CryptanalysisError, Result};

/// Number of symbols in each alphabet
pub const ALPHABET_SIZE: usize = 26;

/// Ciphertext alphabet, in rank order
pub const CIPHER_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Plaintext alphabet, in rank order
pub const PLAIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Placeholder rendered for an unknown plaintext symbol
pub const UNKNOWN: char = '-';

/// A symbol identified by its rank in the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Build a symbol from its rank, if the rank is in `0..26`.
    pub fn from_rank(rank: usize) -> Option<Self> {
        (rank < ALPHABET_SIZE).then(|| Symbol(rank as u8))
    }

    /// All symbols in rank order.
    pub fn all() -> impl Iterator<Item = Symbol> + Clone {
        (0..ALPHABET_SIZE as u8).map(Symbol)
    }

    pub fn rank(self) -> usize {
        self.0 as usize
    }

    /// Parse an upper-case ciphertext symbol.
    pub fn from_cipher(c: char) -> Result<Self> {
        if c.is_ascii_uppercase() {
            Ok(Symbol(c as u8 - b'A'))
        } else {
            Err(CryptanalysisError::InvalidCipherSymbol(c))
        }
    }

    /// Parse a lower-case plaintext symbol.
    pub fn from_plain(c: char) -> Result<Self> {
        if c.is_ascii_lowercase() {
            Ok(Symbol(c as u8 - b'a'))
        } else {
            Err(CryptanalysisError::InvalidPlainSymbol(c))
        }
    }

    /// Parse a plaintext symbol or the `-` placeholder (`None`).
    pub fn from_plain_or_unknown(c: char) -> Result<Option<Self>> {
        if c == UNKNOWN {
            Ok(None)
        } else {
            Self::from_plain(c).map(Some)
        }
    }

    pub fn cipher_char(self) -> char {
        (b'A' + self.0) as char
    }

    pub fn plain_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Rotate forward by `shift` positions.
    pub fn shift(self, shift: u8) -> Self {
        Symbol((self.0 + shift % 26) % 26)
    }

    /// Rotate backward by `shift` positions (Caesar decryption).
    pub fn unshift(self, shift: u8) -> Self {
        Symbol((self.0 + 26 - shift % 26) % 26)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cipher_char())
    }
}

/// Render an optional plaintext symbol, using `-` when unknown.
pub fn plain_or_unknown(symbol: Option<Symbol>) -> char {
    symbol.map_or(UNKNOWN, Symbol::plain_char)
}

/// Parse a whole word of ciphertext symbols.
pub fn parse_cipher_word(word: &str) -> Result<Vec<Symbol>> {
    word.chars().map(Symbol::from_cipher).collect()
}

/// Parse a whole word of plaintext symbols, where `-` stands for unknown.
pub fn parse_plain_word(word: &str) -> Result<Vec<Option<Symbol>>> {
    word.chars().map(Symbol::from_plain_or_unknown).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_alphabets() {
        for (symbol, (c, p)) in Symbol::all().zip(CIPHER_ALPHABET.chars().zip(PLAIN_ALPHABET.chars())) {
            assert_eq!(symbol.cipher_char(), c);
            assert_eq!(symbol.plain_char(), p);
            assert_eq!(Symbol::from_cipher(c).unwrap(), symbol);
            assert_eq!(Symbol::from_plain(p).unwrap(), symbol);
        }
        assert!(Symbol::from_rank(26).is_none());
    }

    #[test]
    fn test_case_is_checked() {
        assert!(matches!(Symbol::from_cipher('a'), Err(CryptanalysisError::InvalidCipherSymbol('a'))));
        assert!(matches!(Symbol::from_plain('A'), Err(CryptanalysisError::InvalidPlainSymbol('A'))));
        assert_eq!(Symbol::from_plain_or_unknown('-').unwrap(), None);
    }

    #[test]
    fn test_shift_wraps() {
        let z = Symbol::from_cipher('Z').unwrap();
        assert_eq!(z.shift(1).cipher_char(), 'A');
        assert_eq!(Symbol::from_cipher('A').unwrap().unshift(1), z);
        assert_eq!(z.shift(7).unshift(7), z);
    }
}
