//! Vowel/consonant separation
//!
//! [`sukhotin`] finds vowel candidates from the bigram structure of the
//! ciphertext alone. [`gaines`] ranks consonants from the variety of each
//! symbol's neighbours. Neither touches a key.

use std::fmt;

use tracing::{debug, trace};

use crate::alphabet::{Symbol, ALPHABET_SIZE};
use crate::language::{LanguageModel, LanguageProfile};
use crate::stats::Ciphertext;

/// Sukhotin's algorithm: at most `count` vowel candidates, in discovery order.
///
/// Each symbol starts with a score equal to the number of bigrams it shares
/// with other symbols. The best-scoring symbol becomes a vowel and every
/// remaining symbol loses twice its contacts with it. The search stops early
/// when the best remaining score is exactly zero; negative leaders are still
/// picked.
pub fn sukhotin(ciphertext: &Ciphertext, count: usize) -> Vec<Symbol> {
    let contacts = |x: Symbol, y: Symbol| (ciphertext.bigram(x, y) + ciphertext.bigram(y, x)) as i64;

    let mut scores: Vec<Option<i64>> = Symbol::all()
        .map(|x| Some(Symbol::all().filter(|&y| y != x).map(|y| contacts(x, y)).sum()))
        .collect();
    let mut vowels = Vec::new();

    while vowels.len() < count {
        // first maximum in rank order
        let best = scores
            .iter()
            .enumerate()
            .filter_map(|(rank, score)| score.map(|s| (rank, s)))
            .fold(None, |best: Option<(usize, i64)>, (rank, s)| match best {
                Some((_, top)) if top >= s => best,
                _ => Some((rank, s)),
            });

        let Some((rank, score)) = best else { break };
        if score == 0 {
            break;
        }

        let Some(vowel) = Symbol::from_rank(rank) else { break };
        trace!(vowel = %vowel, score, "sukhotin pick");
        vowels.push(vowel);
        scores[rank] = None;

        for (x, slot) in Symbol::all().zip(scores.iter_mut()) {
            if let Some(s) = slot {
                *s -= 2 * contacts(x, vowel);
            }
        }
    }

    debug!(found = vowels.len(), requested = count, "sukhotin finished");
    vowels
}

/// Sukhotin candidates next to the language's own vowel statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct VowelReport {
    /// Ciphertext candidates, most frequent first
    pub candidates: Vec<Symbol>,
    /// Ciphertext bigram counts between the candidates
    pub cipher_bigrams: Vec<Vec<usize>>,
    /// Language vowels, most frequent first
    pub language_vowels: Vec<Symbol>,
    /// Language vowel bigram frequencies scaled to the ciphertext length
    pub language_bigrams: Vec<Vec<usize>>,
}

impl VowelReport {
    pub fn new(ciphertext: &Ciphertext, model: &LanguageModel, profile: &LanguageProfile) -> Self {
        let mut candidates = sukhotin(ciphertext, profile.vowels().len());
        candidates.sort_by(|a, b| ciphertext.unigram(*b).cmp(&ciphertext.unigram(*a)));

        let mut language_vowels = profile.vowels().to_vec();
        language_vowels.sort_by(|a, b| model.unigram(*b).total_cmp(&model.unigram(*a)));

        let n = ciphertext.len() as f64;
        let cipher_bigrams = candidates
            .iter()
            .map(|&v| candidates.iter().map(|&w| ciphertext.bigram(v, w)).collect())
            .collect();
        let language_bigrams = language_vowels
            .iter()
            .map(|&v| {
                language_vowels
                    .iter()
                    .map(|&w| (n * model.bigram(v, w)) as usize)
                    .collect()
            })
            .collect();

        Self {
            candidates,
            cipher_bigrams,
            language_vowels,
            language_bigrams,
        }
    }
}

fn write_matrix(
    f: &mut fmt::Formatter<'_>,
    labels: &[char],
    rows: &[Vec<usize>],
) -> fmt::Result {
    write!(f, "  ")?;
    for label in labels {
        write!(f, " {label:3}")?;
    }
    writeln!(f)?;
    for (label, row) in labels.iter().zip(rows) {
        write!(f, "{label}")?;
        for value in row {
            write!(f, " {value:3}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for VowelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cipher: Vec<char> = self.candidates.iter().map(|s| s.cipher_char()).collect();
        let plain: Vec<char> = self.language_vowels.iter().map(|s| s.plain_char()).collect();

        writeln!(f, "Putative vowels:    {}", join(&cipher))?;
        write_matrix(f, &cipher, &self.cipher_bigrams)?;
        writeln!(f, "{}", "-".repeat(ALPHABET_SIZE))?;
        write_matrix(f, &plain, &self.language_bigrams)
    }
}

/// Result of Gaines' consonant-line method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GainesReport {
    /// Suggested consonants, sure ones first, then the amplification
    pub consonants: Vec<Symbol>,
    /// Every other symbol with its number of contacts with the consonants,
    /// most contacts first
    pub remaining: Vec<(Symbol, usize)>,
}

/// Share of all contacts after which symbols count as sure consonants
const CONSONANT_LINE: f64 = 0.8;

/// Gaines' consonant-line method.
///
/// Symbols are ranked by the number of distinct neighbours they touch. Walking
/// down that ranking, every symbol met once the running total reaches 80% of
/// all contacts is a sure consonant. Symbols that never touch a sure
/// consonant are added as well; the rest are ranked by how often they touch
/// one.
pub fn gaines(ciphertext: &Ciphertext) -> GainesReport {
    let mut contacts: Vec<Vec<Symbol>> = vec![Vec::new(); ALPHABET_SIZE];
    let mut distinct = [[false; ALPHABET_SIZE]; ALPHABET_SIZE];

    for (x, y) in ciphertext.pairs() {
        contacts[y.rank()].push(x);
        contacts[x.rank()].push(y);
        distinct[y.rank()][x.rank()] = true;
        distinct[x.rank()][y.rank()] = true;
    }

    let mut ranked: Vec<(Symbol, usize)> = Symbol::all()
        .map(|x| (x, distinct[x.rank()].iter().filter(|&&d| d).count()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = ranked.iter().map(|&(_, n)| n).sum();
    let threshold = (total as f64 * CONSONANT_LINE) as usize;

    let mut consonants = Vec::new();
    let mut tally = [0usize; ALPHABET_SIZE];
    let mut running = 0;
    for &(x, n) in &ranked {
        running += n;
        if running >= threshold {
            consonants.push(x);
            for y in &contacts[x.rank()] {
                tally[y.rank()] += 1;
            }
        }
    }
    debug!(sure = consonants.len(), total, threshold, "gaines consonant line");

    // first amplification
    for &(x, _) in &ranked {
        if tally[x.rank()] == 0 && !consonants.contains(&x) {
            consonants.push(x);
        }
    }

    let mut remaining: Vec<(Symbol, usize)> = Symbol::all()
        .filter(|x| !consonants.contains(x))
        .map(|x| (x, tally[x.rank()]))
        .collect();
    remaining.sort_by(|a, b| b.1.cmp(&a.1));

    GainesReport { consonants, remaining }
}

impl fmt::Display for GainesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let consonants: Vec<char> = self.consonants.iter().map(|s| s.cipher_char()).collect();
        let remaining: Vec<char> = self.remaining.iter().map(|(s, _)| s.cipher_char()).collect();
        writeln!(f, "Suggested consonants: {}", join(&consonants))?;
        write!(f, "Remaining letters:  {}", join(&remaining))
    }
}

fn join(symbols: &[char]) -> String {
    symbols.iter().map(char::to_string).collect::<Vec<_>>().join(" ")
}
