//! # Cryptanalysis Library
//!
//! Statistical tools for breaking classical ciphers without the key, given a
//! model of the plaintext language (letter and bigram frequencies).
//!
//! ## Supported Ciphers
//!
//! - **Monoalphabetic substitution**: vowel detection (Sukhotin), consonant
//!   ranking (Gaines), permutation search for vowel and consonant
//!   assignments, digraph hints and probable words
//! - **Vigenère**: Kasiski examination, Friedman autocorrelation and
//!   per-column Caesar shift scoring
//!
//! ## Usage
//!
//! ```rust
//! use cryptanalysis::{Ciphertext, LanguageModel, VigenereKey};
//!
//! let model = LanguageModel::from_sample_text("the quick brown fox jumps over the lazy dog");
//! let ciphertext: Ciphertext = "RIJVSUYVJN".parse()?;
//!
//! let mut key = VigenereKey::new(ciphertext);
//! key.set_length(3)?;
//! let best = cryptanalysis::vigenere::best_shifts(&key, &model, 0)?;
//! key.set_column(0, best[0].shift as usize)?;
//! # Ok::<(), cryptanalysis::CryptanalysisError>(())
//! ```

// Public modules
pub mod alphabet;
pub mod error;
pub mod language;
pub mod stats;
pub mod substitution;
pub mod utils;
pub mod vigenere;

#[cfg(test)]
mod test_support;

// Re-exports for easy access
pub use alphabet::{Symbol, ALPHABET_SIZE, CIPHER_ALPHABET, PLAIN_ALPHABET};
pub use error::{CryptanalysisError, Result};
pub use language::{LanguageModel, LanguageProfile, SUPPORTED_LANGUAGES};
pub use stats::Ciphertext;
pub use substitution::SubstitutionKey;
pub use vigenere::VigenereKey;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
