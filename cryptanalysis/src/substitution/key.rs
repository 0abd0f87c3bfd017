//! Partial decryption key for a monoalphabetic substitution

use std::fmt;

use crate::alphabet::{self, plain_or_unknown, Symbol, ALPHABET_SIZE, CIPHER_ALPHABET};
use crate::error::{CryptanalysisError, Result};
use crate::stats::Ciphertext;
use crate::utils;

/// Mapping from every ciphertext symbol to a plaintext symbol or unset.
///
/// The mapping is not required to be injective: two ciphertext
/// symbols may point at the same plaintext symbol while a solution is being
/// worked out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionKey {
    map: [Option<Symbol>; ALPHABET_SIZE],
}

impl SubstitutionKey {
    /// A key with every symbol unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a full 26-character key such as `"e-t---..."`.
    pub fn parse(key: &str) -> Result<Self> {
        let mut result = Self::new();
        result.map_range(CIPHER_ALPHABET, key)?;
        Ok(result)
    }

    pub fn get(&self, c: Symbol) -> Option<Symbol> {
        self.map[c.rank()]
    }

    /// Map ciphertext symbol `c` to plaintext symbol `p`.
    pub fn set(&mut self, c: Symbol, p: Symbol) {
        self.map[c.rank()] = Some(p);
    }

    pub fn unset(&mut self, c: Symbol) {
        self.map[c.rank()] = None;
    }

    /// Set or clear a mapping in one call.
    pub fn assign(&mut self, c: Symbol, p: Option<Symbol>) {
        self.map[c.rank()] = p;
    }

    /// Map each symbol of `cword` to the symbol at the same position of `pword`.
    ///
    /// `-` in `pword` unsets the corresponding symbol. Both words are fully
    /// validated before the key is touched.
    pub fn map_range(&mut self, cword: &str, pword: &str) -> Result<()> {
        let cipher = alphabet::parse_cipher_word(cword)?;
        let plain = alphabet::parse_plain_word(pword)?;
        if cipher.len() != plain.len() {
            return Err(CryptanalysisError::LengthMismatch {
                cipher: cipher.len(),
                plain: plain.len(),
            });
        }

        for (c, p) in cipher.into_iter().zip(plain) {
            self.assign(c, p);
        }
        Ok(())
    }

    pub fn is_assigned(&self, c: Symbol) -> bool {
        self.map[c.rank()].is_some()
    }

    /// Ciphertext symbols without a mapping, in rank order.
    pub fn unassigned(&self) -> impl Iterator<Item = Symbol> + '_ {
        Symbol::all().filter(|&c| !self.is_assigned(c))
    }

    /// Decrypt `ciphertext`, writing `-` for unmapped symbols.
    pub fn decipher(&self, ciphertext: &Ciphertext) -> String {
        ciphertext
            .symbols()
            .iter()
            .map(|&c| plain_or_unknown(self.get(c)))
            .collect()
    }

    /// Ciphertext and decryption interleaved in blocks of `width` symbols.
    pub fn render(&self, ciphertext: &Ciphertext, width: usize) -> String {
        utils::render_blocks(&ciphertext.to_string(), &self.decipher(ciphertext), width)
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clear: String = self.map.iter().map(|&p| plain_or_unknown(p)).collect();
        write!(f, "Cipher: {CIPHER_ALPHABET}\nClear : {clear}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(ch: char) -> Symbol {
        Symbol::from_cipher(ch).unwrap()
    }

    fn p(ch: char) -> Symbol {
        Symbol::from_plain(ch).unwrap()
    }

    #[test]
    fn test_set_then_unset_restores() {
        let mut key = SubstitutionKey::new();
        key.set(c('A'), p('e'));
        let before = key;

        key.set(c('Q'), p('z'));
        key.unset(c('Q'));
        assert_eq!(key, before);
    }

    #[test]
    fn test_map_range_matches_sequential_sets() {
        let mut mapped = SubstitutionKey::new();
        mapped.map_range("XQJX", "th-e").unwrap();

        let mut manual = SubstitutionKey::new();
        manual.set(c('X'), p('t'));
        manual.set(c('Q'), p('h'));
        manual.unset(c('J'));
        manual.set(c('X'), p('e'));
        assert_eq!(mapped, manual);
        assert_eq!(mapped.get(c('X')), Some(p('e')));
    }

    #[test]
    fn test_map_range_validates_before_mutating() {
        let mut key = SubstitutionKey::new();
        key.set(c('A'), p('a'));
        let before = key;

        assert!(matches!(
            key.map_range("AB", "x"),
            Err(CryptanalysisError::LengthMismatch { cipher: 2, plain: 1 })
        ));
        assert!(matches!(key.map_range("Ab", "xy"), Err(CryptanalysisError::InvalidCipherSymbol('b'))));
        assert!(matches!(key.map_range("AB", "xY"), Err(CryptanalysisError::InvalidPlainSymbol('Y'))));
        assert_eq!(key, before);
    }

    #[test]
    fn test_non_injective_keys_are_allowed() {
        let mut key = SubstitutionKey::new();
        key.set(c('A'), p('e'));
        key.set(c('B'), p('e'));
        assert_eq!(key.get(c('A')), key.get(c('B')));
    }

    #[test]
    fn test_display_and_parse() {
        let key = SubstitutionKey::parse("ab------------------------").unwrap();
        assert_eq!(
            key.to_string(),
            "Cipher: ABCDEFGHIJKLMNOPQRSTUVWXYZ\nClear : ab------------------------"
        );
        assert_eq!(key.unassigned().count(), 24);
        assert!(SubstitutionKey::parse("abc").is_err());
    }

    #[test]
    fn test_decipher_and_render() {
        let ct = Ciphertext::parse("XYZZY").unwrap();
        let mut key = SubstitutionKey::new();
        key.map_range("XY", "ab").unwrap();
        assert_eq!(key.decipher(&ct), "ab--b");
        assert_eq!(key.render(&ct, 3), "XYZ\nab-\nZY\n-b");
    }
}
