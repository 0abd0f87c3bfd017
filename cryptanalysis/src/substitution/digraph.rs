//! Hints for near-fixed digraphs such as "qu"

use std::fmt;

use crate::alphabet::Symbol;
use crate::error::{CryptanalysisError, Result};
use crate::language::LanguageProfile;
use crate::stats::Ciphertext;
use crate::substitution::key::SubstitutionKey;

/// A ciphertext pair that may encode the fixed digraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigraphHint {
    pub first: Symbol,
    pub second: Symbol,
    /// Occurrences of the pair in the ciphertext
    pub count: usize,
    pub first_maps_to: Option<Symbol>,
    pub second_maps_to: Option<Symbol>,
}

/// Symbols followed by only one or two distinct symbols.
///
/// A letter like `q` is almost always followed by `u`, so its ciphertext
/// image has very few distinct right neighbours. Symbols are visited from
/// most to least frequent; the key is only read.
pub fn find_digraph_hints(
    ciphertext: &Ciphertext,
    key: &SubstitutionKey,
    profile: &LanguageProfile,
) -> Result<Vec<DigraphHint>> {
    if !profile.has_fixed_digraph() {
        return Err(CryptanalysisError::DigraphUnsupported(profile.code().to_string()));
    }

    let mut hints = Vec::new();
    for x in ciphertext.symbols_by_frequency() {
        let neighbours = ciphertext.right_neighbours(x);
        if (1..=2).contains(&neighbours.len()) {
            hints.extend(neighbours.into_iter().map(|y| DigraphHint {
                first: x,
                second: y,
                count: ciphertext.bigram(x, y),
                first_maps_to: key.get(x),
                second_maps_to: key.get(y),
            }));
        }
    }
    Ok(hints)
}

impl fmt::Display for DigraphHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>13}{}: {:<4}",
            self.first.cipher_char(),
            self.second.cipher_char(),
            self.count
        )?;
        if let Some(p) = self.first_maps_to {
            write!(f, " ({} now maps to {})", self.first, p.plain_char())?;
        }
        if let Some(p) = self.second_maps_to {
            write!(f, " ({} now maps to {})", self.second, p.plain_char())?;
        }
        Ok(())
    }
}

/// Render a list of hints under a header, or a note when there are none.
pub fn render_hints(hints: &[DigraphHint]) -> String {
    let mut out = String::from("  candidate qu: times (notes)");
    if hints.is_empty() {
        out.push_str("\n  no candidates");
    }
    for hint in hints {
        out.push('\n');
        out.push_str(&hint.to_string());
    }
    out
}
