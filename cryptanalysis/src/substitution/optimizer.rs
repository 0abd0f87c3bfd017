//! Brute-force assignment of ciphertext symbols to plaintext slots
//!
//! Both searches score every permutation of a small candidate list (at most
//! 7! = 5040 of them) in parallel, then reduce to the best one. Ties go to the
//! permutation generated first, so the outcome matches a sequential scan.

use rayon::prelude::*;
use tracing::debug;

use crate::alphabet::Symbol;
use crate::language::LanguageModel;
use crate::stats::Ciphertext;
use crate::substitution::key::SubstitutionKey;
use crate::utils;

/// Best vowel assignment found by [`optimize_vowels`].
#[derive(Debug, Clone, PartialEq)]
pub struct VowelAssignment {
    /// `(ciphertext symbol, plaintext vowel)` pairs
    pub pairs: Vec<(Symbol, Symbol)>,
    /// Squared distance between the two bigram tables (lower is better)
    pub score: f64,
}

impl VowelAssignment {
    /// Write the assignment into `key`.
    pub fn commit(&self, key: &mut SubstitutionKey) {
        for &(c, p) in &self.pairs {
            key.set(c, p);
        }
    }
}

/// Best consonant assignment found by [`optimize_consonants`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConsonantAssignment {
    /// The input key extended with the winning assignment
    pub key: SubstitutionKey,
    /// Sum of transition probabilities over mapped bigrams (higher is better)
    pub score: f64,
}

/// Reduce `(index, score)` pairs to the best score, lowest index on ties.
fn best_scored<F>(count: usize, score: F, better: fn(f64, f64) -> bool) -> Option<(usize, f64)>
where
    F: Fn(usize) -> f64 + Sync,
{
    (0..count)
        .into_par_iter()
        .map(|i| (i, score(i)))
        .reduce_with(|a, b| {
            if better(b.1, a.1) || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        })
}

/// Assign vowel candidates to the language's vowel slots.
///
/// Candidate `i` of a permutation stands for `vowels[i]`. The score sums, over
/// every ordered pair of slots, the squared difference between the normalized
/// ciphertext bigram count of the candidates and the language bigram
/// frequency of the vowels. The permutation with the lowest score wins.
pub fn optimize_vowels(
    ciphertext: &Ciphertext,
    model: &LanguageModel,
    candidates: &[Symbol],
    vowels: &[Symbol],
) -> VowelAssignment {
    let n = ciphertext.len().max(1) as f64;
    let perms = utils::permutations(candidates);

    let score = |perm: &[Symbol]| -> f64 {
        let slots: Vec<(Symbol, Symbol)> = perm.iter().copied().zip(vowels.iter().copied()).collect();
        slots
            .iter()
            .flat_map(|&(cv, v)| slots.iter().map(move |&(cw, w)| (cv, v, cw, w)))
            .map(|(cv, v, cw, w)| {
                let diff = ciphertext.bigram(cv, cw) as f64 / n - model.bigram(v, w);
                diff * diff
            })
            .sum()
    };

    let (best, best_score) =
        best_scored(perms.len(), |i| score(&perms[i]), |a, b| a < b).unwrap_or((0, 0.0));
    let pairs: Vec<(Symbol, Symbol)> = perms[best].iter().copied().zip(vowels.iter().copied()).collect();
    debug!(permutations = perms.len(), score = best_score, "vowel assignment");

    VowelAssignment {
        pairs,
        score: best_score,
    }
}

/// Assign the most frequent unmapped ciphertext symbols to common consonants.
///
/// The `consonants.len()` most frequent symbols still unset in `key` are tried
/// in every order against `consonants`. Each tentative key is scored by the
/// sum of transition probabilities over every adjacent ciphertext pair whose
/// two symbols are both mapped. The highest score wins; the first permutation
/// is kept when no score is positive.
pub fn optimize_consonants(
    ciphertext: &Ciphertext,
    model: &LanguageModel,
    key: &SubstitutionKey,
    consonants: &[Symbol],
) -> ConsonantAssignment {
    let mut candidates: Vec<Symbol> = ciphertext
        .symbols_by_frequency()
        .into_iter()
        .filter(|&c| !key.is_assigned(c))
        .collect();
    candidates.truncate(consonants.len());

    let perms = utils::permutations(&candidates);
    let extend = |perm: &[Symbol]| {
        let mut tentative = *key;
        for (&c, &p) in perm.iter().zip(consonants) {
            tentative.set(c, p);
        }
        tentative
    };

    let score = |tentative: &SubstitutionKey| -> f64 {
        let mut total = 0.0;
        for x in Symbol::all() {
            let Some(px) = tentative.get(x) else { continue };
            for y in Symbol::all() {
                let Some(py) = tentative.get(y) else { continue };
                let count = ciphertext.bigram(x, y);
                if count != 0 {
                    total += count as f64 * model.transition(px, py);
                }
            }
        }
        total
    };

    let (best, best_score) =
        best_scored(perms.len(), |i| score(&extend(&perms[i])), |a, b| a > b).unwrap_or((0, 0.0));
    debug!(
        candidates = candidates.len(),
        permutations = perms.len(),
        score = best_score,
        "consonant assignment"
    );

    ConsonantAssignment {
        key: extend(&perms[best]),
        score: best_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::ALPHABET_SIZE;
    use crate::test_support;

    fn c(ch: char) -> Symbol {
        Symbol::from_cipher(ch).unwrap()
    }

    fn p(ch: char) -> Symbol {
        Symbol::from_plain(ch).unwrap()
    }

    fn plain(word: &str) -> Vec<Symbol> {
        word.chars().map(p).collect()
    }

    #[test]
    fn test_vowels_recovered_from_identity_text() {
        let ct = test_support::english_ciphertext();
        let model = test_support::english_model();
        let vowels = plain("aeio");
        // feed the candidates in a scrambled order
        let candidates = vec![c('O'), c('A'), c('I'), c('E')];

        let best = optimize_vowels(&ct, &model, &candidates, &vowels);
        assert_eq!(best.pairs, vec![(c('A'), p('a')), (c('E'), p('e')), (c('I'), p('i')), (c('O'), p('o'))]);

        let mut key = SubstitutionKey::new();
        best.commit(&mut key);
        assert_eq!(key.get(c('E')), Some(p('e')));
    }

    #[test]
    fn test_vowels_ties_keep_first_permutation() {
        // no bigram data at all: every permutation scores the same
        let ct = Ciphertext::parse("AB").unwrap();
        let model = LanguageModel::new([0.0; ALPHABET_SIZE], [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE]);
        let best = optimize_vowels(&ct, &model, &[c('X'), c('Y'), c('Z')], &plain("aei"));
        assert_eq!(best.pairs, vec![(c('X'), p('a')), (c('Y'), p('e')), (c('Z'), p('i'))]);
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn test_vowels_empty_candidates() {
        let ct = Ciphertext::parse("").unwrap();
        let model = test_support::english_model();
        let best = optimize_vowels(&ct, &model, &[], &plain("aeiouy"));
        assert!(best.pairs.is_empty());
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn test_consonants_assign_most_frequent_symbols() {
        let ct = test_support::english_ciphertext();
        let model = test_support::english_model();
        let mut key = SubstitutionKey::new();
        key.map_range("AEIOUY", "aeiouy").unwrap();

        // the five most frequent non-vowels of the sample, shuffled
        let targets: Vec<Symbol> = ct
            .symbols_by_frequency()
            .into_iter()
            .filter(|&s| !key.is_assigned(s))
            .take(5)
            .collect();
        let mut shuffled = targets.clone();
        shuffled.rotate_left(2);

        let best = optimize_consonants(&ct, &model, &key, &shuffled);
        for &t in &targets {
            assert!(best.key.is_assigned(t));
        }
        assert!(best.score > 0.0);
        // vowels are untouched
        assert_eq!(best.key.get(c('E')), Some(p('e')));
    }

    #[test]
    fn test_consonants_without_signal_keep_first_permutation() {
        let ct = Ciphertext::parse("QWQWQ").unwrap();
        let model = LanguageModel::new([0.0; ALPHABET_SIZE], [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE]);
        let best = optimize_consonants(&ct, &model, &SubstitutionKey::new(), &plain("lnt"));

        // candidates by frequency: Q, W, then A (first unseen symbol)
        assert_eq!(best.key.get(c('Q')), Some(p('l')));
        assert_eq!(best.key.get(c('W')), Some(p('n')));
        assert_eq!(best.key.get(c('A')), Some(p('t')));
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn test_consonants_with_full_key() {
        let ct = Ciphertext::parse("ABC").unwrap();
        let model = test_support::english_model();
        let key = SubstitutionKey::parse("abcdefghijklmnopqrstuvwxyz").unwrap();
        let best = optimize_consonants(&ct, &model, &key, &plain("lntsr"));
        assert_eq!(best.key, key);
    }
}
