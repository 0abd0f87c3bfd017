//! Fixtures shared by the unit tests

use crate::alphabet::Symbol;
use crate::language::LanguageModel;
use crate::stats::Ciphertext;

pub(crate) const ENGLISH_SAMPLE: &str = include_str!("../testdata/english.txt");

/// Letters of the English sample, as ranks.
pub(crate) fn sample_symbols() -> Vec<Symbol> {
    ENGLISH_SAMPLE
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .filter_map(|c| Symbol::from_plain(c.to_ascii_lowercase()).ok())
        .collect()
}

pub(crate) fn english_model() -> LanguageModel {
    LanguageModel::from_sample_text(ENGLISH_SAMPLE)
}

/// The English sample under the identity substitution.
pub(crate) fn english_ciphertext() -> Ciphertext {
    Ciphertext::new(sample_symbols())
}

/// The English sample enciphered with a Vigenère keyword.
pub(crate) fn vigenere_ciphertext(keyword: &str) -> Ciphertext {
    let shifts: Vec<u8> = keyword.bytes().map(|b| b - b'a').collect();
    let symbols = sample_symbols()
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.shift(shifts[i % shifts.len()]))
        .collect();
    Ciphertext::new(symbols)
}
