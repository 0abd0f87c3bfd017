//! Monoalphabetic substitution cryptanalysis

pub mod classifier;
pub mod digraph;
pub mod key;
pub mod optimizer;
pub mod probable;

pub use classifier::{gaines, sukhotin, GainesReport, VowelReport};
pub use digraph::{find_digraph_hints, DigraphHint};
pub use key::SubstitutionKey;
pub use optimizer::{optimize_consonants, optimize_vowels, ConsonantAssignment, VowelAssignment};
pub use probable::{find_probable_word, ProbableMatch};

use tracing::info;

use crate::alphabet::ALPHABET_SIZE;
use crate::language::{LanguageModel, LanguageProfile};
use crate::stats::Ciphertext;

/// Key suggested by [`auto_solve`], with the evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoSolution {
    pub key: SubstitutionKey,
    pub vowels: VowelAssignment,
    pub consonant_score: f64,
    /// Digraph hints against the suggested key, when the language has them
    pub hints: Vec<DigraphHint>,
}

/// Build a key from scratch: Sukhotin vowels, the vowel permutation search,
/// then the consonant permutation search.
pub fn auto_solve(ciphertext: &Ciphertext, model: &LanguageModel, profile: &LanguageProfile) -> AutoSolution {
    let candidates = sukhotin(ciphertext, profile.vowels().len());
    let vowels = optimize_vowels(ciphertext, model, &candidates, profile.vowels());

    let mut key = SubstitutionKey::new();
    vowels.commit(&mut key);
    let consonants = optimize_consonants(ciphertext, model, &key, profile.consonants());

    let hints = find_digraph_hints(ciphertext, &consonants.key, profile).unwrap_or_default();
    info!(
        vowels = vowels.pairs.len(),
        assigned = ALPHABET_SIZE - consonants.key.unassigned().count(),
        "auto solve finished"
    );

    AutoSolution {
        key: consonants.key,
        vowels,
        consonant_score: consonants.score,
        hints,
    }
}
