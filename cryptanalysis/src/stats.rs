//! Ciphertext and its symbol statistics

use std::fmt;
use std::str::FromStr;

use crate::alphabet::{Symbol, ALPHABET_SIZE};
use crate::error::{CryptanalysisError, Result};
use crate::utils;

/// An immutable ciphertext with its unigram and bigram counts.
///
/// Counts cover the full symbol and pair domain, including symbols that never
/// occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    symbols: Vec<Symbol>,
    unigram: [usize; ALPHABET_SIZE],
    bigram: [[usize; ALPHABET_SIZE]; ALPHABET_SIZE],
}

impl Ciphertext {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        let mut unigram = [0; ALPHABET_SIZE];
        let mut bigram = [[0; ALPHABET_SIZE]; ALPHABET_SIZE];

        for s in &symbols {
            unigram[s.rank()] += 1;
        }
        for pair in symbols.windows(2) {
            bigram[pair[0].rank()][pair[1].rank()] += 1;
        }

        Self { symbols, unigram, bigram }
    }

    /// Parse ciphertext, ignoring line breaks and other ASCII whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let symbols = text
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .map(Symbol::from_cipher)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(symbols))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn unigram(&self, x: Symbol) -> usize {
        self.unigram[x.rank()]
    }

    pub fn bigram(&self, x: Symbol, y: Symbol) -> usize {
        self.bigram[x.rank()][y.rank()]
    }

    pub fn unigram_counts(&self) -> &[usize; ALPHABET_SIZE] {
        &self.unigram
    }

    /// Adjacent symbol pairs, in text order.
    pub fn pairs(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.symbols.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Ciphertext symbols by descending count, ties in rank order.
    pub fn symbols_by_frequency(&self) -> Vec<Symbol> {
        utils::sorted_by_count(&self.unigram)
    }

    /// Distinct symbols seen immediately after `x`.
    pub fn right_neighbours(&self, x: Symbol) -> Vec<Symbol> {
        Symbol::all().filter(|&y| self.bigram(x, y) != 0).collect()
    }
}

impl FromStr for Ciphertext {
    type Err = CryptanalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|s| write!(f, "{}", s.cipher_char()))
    }
}
