//! Statistical model of a plaintext language
//!
//! A [`LanguageModel`] holds unigram frequencies, bigram frequencies and the
//! row-normalized transition probabilities derived from them. Every table is
//! fully materialized over the 26-symbol alphabet, so lookups never miss.
//!
//! Models are read from two whitespace-separated data files:
//!
//! - `freq.data`: one line per symbol, `a 0.0812`
//! - `bigrammes.data`: one line per leading symbol followed by 26 values,
//!   `a 0.0001 0.0021 ...`, in alphabet order of the following symbol

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::alphabet::{Symbol, ALPHABET_SIZE, PLAIN_ALPHABET};
use crate::error::{CryptanalysisError, Result};

/// Name of the unigram data file inside a language directory
pub const FREQUENCY_FILE: &str = "freq.data";

/// Name of the bigram data file inside a language directory
pub const BIGRAM_FILE: &str = "bigrammes.data";

type Table = [[f64; ALPHABET_SIZE]; ALPHABET_SIZE];

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageModel {
    unigram: [f64; ALPHABET_SIZE],
    bigram: Table,
    transition: Table,
}

impl LanguageModel {
    /// Build a model from unigram frequencies and raw bigram rows.
    ///
    /// Rows need not sum to 1: each row is normalized into transition
    /// probabilities, and a row with no mass gives all-zero transitions.
    pub fn new(unigram: [f64; ALPHABET_SIZE], bigram: Table) -> Self {
        let mut transition = [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE];

        for (row, probs) in bigram.iter().zip(transition.iter_mut()) {
            let total: f64 = row.iter().sum();
            if total != 0.0 {
                for (p, f) in probs.iter_mut().zip(row) {
                    *p = f / total;
                }
            }
        }

        Self { unigram, bigram, transition }
    }

    /// Estimate a model from a sample of plaintext.
    ///
    /// Characters that are not ASCII letters are skipped; letters are folded
    /// to lower case.
    pub fn from_sample_text(text: &str) -> Self {
        let symbols: Vec<Symbol> = text
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .filter_map(|c| Symbol::from_plain(c.to_ascii_lowercase()).ok())
            .collect();

        let mut unigram = [0.0; ALPHABET_SIZE];
        let mut bigram = [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE];

        for s in &symbols {
            unigram[s.rank()] += 1.0;
        }
        for pair in symbols.windows(2) {
            bigram[pair[0].rank()][pair[1].rank()] += 1.0;
        }

        let n = symbols.len() as f64;
        if n > 0.0 {
            unigram.iter_mut().for_each(|f| *f /= n);
        }
        if n > 1.0 {
            bigram.iter_mut().flatten().for_each(|f| *f /= n - 1.0);
        }

        Self::new(unigram, bigram)
    }

    /// Parse the contents of a unigram file and a bigram file.
    pub fn parse(frequencies: &str, bigrams: &str) -> Result<Self> {
        let unigram = parse_frequencies(frequencies)?;
        let bigram = parse_bigrams(bigrams)?;
        Ok(Self::new(unigram, bigram))
    }

    /// Load `freq.data` and `bigrammes.data` from a language directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let frequencies = read(&dir.join(FREQUENCY_FILE))?;
        let bigrams = read(&dir.join(BIGRAM_FILE))?;
        let model = Self::parse(&frequencies, &bigrams)?;
        debug!(dir = %dir.display(), "loaded language model");
        Ok(model)
    }

    pub fn unigram(&self, x: Symbol) -> f64 {
        self.unigram[x.rank()]
    }

    pub fn bigram(&self, x: Symbol, y: Symbol) -> f64 {
        self.bigram[x.rank()][y.rank()]
    }

    /// Probability of `y` following `x`; 0 for a row without data.
    pub fn transition(&self, x: Symbol, y: Symbol) -> f64 {
        self.transition[x.rank()][y.rank()]
    }

    /// Plaintext symbols by descending frequency, ties in rank order.
    pub fn letters_by_frequency(&self) -> Vec<Symbol> {
        let mut letters: Vec<Symbol> = Symbol::all().collect();
        letters.sort_by(|a, b| self.unigram(*b).total_cmp(&self.unigram(*a)));
        letters
    }

    /// The `n` most frequent plaintext symbols.
    pub fn most_frequent(&self, n: usize) -> Vec<Symbol> {
        let mut letters = self.letters_by_frequency();
        letters.truncate(n);
        letters
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CryptanalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn malformed(file: &'static str, line: usize, reason: impl Into<String>) -> CryptanalysisError {
    CryptanalysisError::MalformedData {
        file,
        line,
        reason: reason.into(),
    }
}

/// Parse the leading symbol field of a data line.
fn parse_symbol(file: &'static str, line: usize, field: &str) -> Result<Symbol> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Symbol::from_plain(c).map_err(|_| malformed(file, line, format!("'{field}' is not a plaintext symbol"))),
        _ => Err(malformed(file, line, format!("'{field}' is not a single symbol"))),
    }
}

fn parse_value(file: &'static str, line: usize, field: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(_) => Err(malformed(file, line, format!("'{field}' is not a non-negative frequency"))),
        Err(_) => Err(malformed(file, line, format!("'{field}' is not a number"))),
    }
}

fn parse_frequencies(text: &str) -> Result<[f64; ALPHABET_SIZE]> {
    let mut unigram = [None; ALPHABET_SIZE];

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 {
            return Err(malformed(FREQUENCY_FILE, line_no, format!("expected 2 fields, found {}", fields.len())));
        }

        let symbol = parse_symbol(FREQUENCY_FILE, line_no, fields[0])?;
        let value = parse_value(FREQUENCY_FILE, line_no, fields[1])?;
        let slot = &mut unigram[symbol.rank()];
        if slot.is_some() {
            return Err(malformed(FREQUENCY_FILE, line_no, format!("duplicate symbol '{}'", symbol.plain_char())));
        }
        *slot = Some(value);
    }

    let mut result = [0.0; ALPHABET_SIZE];
    for ((value, slot), c) in result.iter_mut().zip(unigram).zip(PLAIN_ALPHABET.chars()) {
        *value = slot.ok_or(CryptanalysisError::MissingFrequency(c))?;
    }
    Ok(result)
}

fn parse_bigrams(text: &str) -> Result<Table> {
    let mut bigram = [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE];
    let mut seen = [false; ALPHABET_SIZE];

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != ALPHABET_SIZE + 1 {
            return Err(malformed(
                BIGRAM_FILE,
                line_no,
                format!("expected {} fields, found {}", ALPHABET_SIZE + 1, fields.len()),
            ));
        }

        let symbol = parse_symbol(BIGRAM_FILE, line_no, fields[0])?;
        if std::mem::replace(&mut seen[symbol.rank()], true) {
            return Err(malformed(BIGRAM_FILE, line_no, format!("duplicate row '{}'", symbol.plain_char())));
        }
        for (value, field) in bigram[symbol.rank()].iter_mut().zip(&fields[1..]) {
            *value = parse_value(BIGRAM_FILE, line_no, field)?;
        }
    }

    Ok(bigram)
}

/// Per-language constants used by the substitution solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    code: String,
    vowels: Vec<Symbol>,
    consonants: Vec<Symbol>,
    fixed_digraph: bool,
}

/// Languages with built-in profiles
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["en", "fr", "de", "es", "it"];

const VOWELS: &str = "aeiouy";
const COMMON_CONSONANTS: &str = "lntsr";

impl LanguageProfile {
    /// Profile for one of the [`SUPPORTED_LANGUAGES`].
    pub fn builtin(code: &str) -> Result<Self> {
        if !SUPPORTED_LANGUAGES.contains(&code) {
            return Err(CryptanalysisError::UnknownLanguage(code.to_string()));
        }

        Ok(Self {
            code: code.to_string(),
            vowels: plain_symbols(VOWELS),
            consonants: plain_symbols(COMMON_CONSONANTS),
            // "qu" is nearly a fixed pair in the Romance languages
            fixed_digraph: matches!(code, "fr" | "es" | "it"),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Vowel slots, in the order used by the vowel assignment search.
    pub fn vowels(&self) -> &[Symbol] {
        &self.vowels
    }

    /// Most common consonants, targets of the consonant assignment search.
    pub fn consonants(&self) -> &[Symbol] {
        &self.consonants
    }

    pub fn has_fixed_digraph(&self) -> bool {
        self.fixed_digraph
    }
}

fn plain_symbols(letters: &str) -> Vec<Symbol> {
    letters.chars().filter_map(|c| Symbol::from_plain(c).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::from_plain(c).unwrap()
    }

    fn frequency_text() -> String {
        PLAIN_ALPHABET
            .chars()
            .enumerate()
            .map(|(i, c)| format!("{c} {}\n", (i + 1) as f64 / 351.0))
            .collect()
    }

    #[test]
    fn test_parse_full_model() {
        let bigrams = "a 2 2 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n\
                       b 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n";
        let model = LanguageModel::parse(&frequency_text(), bigrams).unwrap();

        assert_eq!(model.unigram(sym('z')), 26.0 / 351.0);
        assert_eq!(model.bigram(sym('a'), sym('b')), 2.0);
        assert_eq!(model.transition(sym('a'), sym('a')), 0.5);
        assert_eq!(model.transition(sym('a'), sym('b')), 0.5);
        // zero-mass rows and missing rows are uninformative, not errors
        assert!(Symbol::all().all(|y| model.transition(sym('b'), y) == 0.0));
        assert!(Symbol::all().all(|y| model.transition(sym('q'), y) == 0.0));
    }

    #[test]
    fn test_transition_rows_sum_to_one() {
        let model = LanguageModel::from_sample_text("the quick brown fox jumps over the lazy dog");
        for x in Symbol::all() {
            let total: f64 = Symbol::all().map(|y| model.transition(x, y)).sum();
            assert!(total == 0.0 || (total - 1.0).abs() < 1e-9, "row {x} sums to {total}");
        }
    }

    #[test]
    fn test_malformed_frequency_lines() {
        let err = LanguageModel::parse("a 0.5 0.2\n", "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { file: FREQUENCY_FILE, line: 1, .. }));

        let err = LanguageModel::parse("A 0.5\n", "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { line: 1, .. }));

        let err = LanguageModel::parse("a x\n", "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { .. }));

        let err = LanguageModel::parse("a -0.1\n", "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { .. }));

        let err = LanguageModel::parse("a 0.5\n", "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MissingFrequency('b')));

        let duplicated = format!("{}a 0.1\n", frequency_text());
        let err = LanguageModel::parse(&duplicated, "").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { line: 27, .. }));
    }

    #[test]
    fn test_malformed_bigram_lines() {
        let err = LanguageModel::parse(&frequency_text(), "a 1 2 3\n").unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { file: BIGRAM_FILE, line: 1, .. }));

        let row = format!("a{}\n", " 1".repeat(26));
        let err = LanguageModel::parse(&frequency_text(), &format!("\n{row}{row}")).unwrap_err();
        assert!(matches!(err, CryptanalysisError::MalformedData { line: 3, .. }));
    }

    #[test]
    fn test_letters_by_frequency() {
        let model = LanguageModel::parse(&frequency_text(), "").unwrap();
        let top: String = model.most_frequent(3).iter().map(|s| s.plain_char()).collect();
        assert_eq!(top, "zyx");
        assert_eq!(model.letters_by_frequency().len(), ALPHABET_SIZE);
    }

    #[test]
    fn test_load_reports_missing_files() {
        let err = LanguageModel::load("/nonexistent/language").unwrap_err();
        assert!(matches!(err, CryptanalysisError::Io { .. }));
    }

    #[test]
    fn test_profiles() {
        let fr = LanguageProfile::builtin("fr").unwrap();
        assert!(fr.has_fixed_digraph());
        assert_eq!(fr.vowels().len(), 6);
        assert_eq!(fr.consonants().len(), 5);
        assert!(!LanguageProfile::builtin("en").unwrap().has_fixed_digraph());
        assert!(matches!(
            LanguageProfile::builtin("xx"),
            Err(CryptanalysisError::UnknownLanguage(_))
        ));
    }
}
