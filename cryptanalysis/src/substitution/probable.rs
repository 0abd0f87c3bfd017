//! Probable-word search

use crate::alphabet::Symbol;
use crate::error::{CryptanalysisError, Result};
use crate::stats::Ciphertext;

/// A ciphertext window whose letter pattern matches a probable word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbableMatch {
    pub position: usize,
    pub text: String,
}

/// Index of the first occurrence of each element, e.g. "letter" -> 0 1 2 2 1 5.
fn geometry<T: PartialEq>(word: &[T]) -> Vec<usize> {
    word.iter()
        .map(|x| word.iter().position(|y| y == x).unwrap_or(0))
        .collect()
}

/// Every window of the ciphertext with the same repetition pattern as `word`.
///
/// Under a substitution, "letter" can only hide behind a window whose 3rd and
/// 4th symbols are equal, whose 2nd and 5th are equal, and so on.
pub fn find_probable_word(ciphertext: &Ciphertext, word: &str) -> Result<Vec<ProbableMatch>> {
    let word: Vec<Symbol> = word.chars().map(Symbol::from_plain).collect::<Result<_>>()?;
    if word.is_empty() {
        return Err(CryptanalysisError::EmptyPattern);
    }

    let pattern = geometry(&word);
    Ok(ciphertext
        .symbols()
        .windows(word.len())
        .enumerate()
        .filter(|(_, window)| geometry(window) == pattern)
        .map(|(position, window)| ProbableMatch {
            position,
            text: window.iter().map(|s| s.cipher_char()).collect(),
        })
        .collect())
}
