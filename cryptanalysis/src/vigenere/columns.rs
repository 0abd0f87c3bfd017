//! Per-column Caesar shift scoring
//!
//! With the key length fixed, column `j` holds every `K`-th ciphertext symbol
//! starting at `j` and was enciphered with a single Caesar shift. Candidate
//! shifts are scored on two signals:
//!
//! - how many of the ten most frequent language letters are also among the
//!   ten most frequent letters of the decrypted column;
//! - the transition probabilities between the decrypted column and any
//!   neighbouring column that is already set, since columns `j - 1`, `j` and
//!   `j + 1` hold adjacent plaintext letters.

use std::fmt;

use tracing::trace;

use crate::alphabet::{Symbol, ALPHABET_SIZE};
use crate::error::Result;
use crate::language::LanguageModel;
use crate::utils;
use crate::vigenere::key::VigenereKey;

/// Letters compared by the frequency intersection
pub const FREQUENT_LETTERS: usize = 10;

/// Number of shifts reported by [`best_shifts`]
pub const BEST_SHIFTS: usize = 5;

/// Score of one candidate shift for a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftScore {
    pub shift: u8,
    /// Size of the top-10 letter intersection, 0 to 10
    pub intersection: usize,
    /// Sum of transition probabilities with set neighbour columns
    pub transition: f64,
}

impl ShiftScore {
    pub fn total(&self) -> f64 {
        self.intersection as f64 + self.transition
    }
}

impl fmt::Display for ShiftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.shift,
            self.intersection,
            (100.0 * self.transition) as i64
        )
    }
}

/// Column `column` decrypted with `shift`.
pub fn shifted_column(key: &VigenereKey, column: usize, shift: u8) -> Result<Vec<Symbol>> {
    Ok(key.column(column)?.into_iter().map(|c| c.unshift(shift)).collect())
}

/// Number of `frequent` letters among the ten most frequent of `letters`.
fn frequency_intersection(frequent: &[Symbol], letters: &[Symbol]) -> usize {
    let mut counts = [0usize; ALPHABET_SIZE];
    for s in letters {
        counts[s.rank()] += 1;
    }
    utils::sorted_by_count(&counts)
        .into_iter()
        .take(FREQUENT_LETTERS)
        .filter(|s| frequent.contains(s))
        .count()
}

/// Transition probabilities between `letters` (column `column`) and the
/// decrypted neighbour columns that are already set.
fn neighbour_transitions(key: &VigenereKey, model: &LanguageModel, column: usize, letters: &[Symbol]) -> Result<f64> {
    let Some(length) = key.length() else { return Ok(0.0) };
    let mut total = 0.0;

    if column + 1 < length && key.shift(column + 1)?.is_some() {
        for (row, &x) in letters.iter().enumerate() {
            if let Some(y) = key.clear_at(row * length + column + 1) {
                total += model.transition(x, y);
            }
        }
    }
    if column > 0 && key.shift(column - 1)?.is_some() {
        for (row, &y) in letters.iter().enumerate() {
            if let Some(x) = key.clear_at(row * length + column - 1) {
                total += model.transition(x, y);
            }
        }
    }
    Ok(total)
}

/// Score all 26 shifts of `column`, in shift order.
pub fn score_shifts(key: &VigenereKey, model: &LanguageModel, column: usize) -> Result<Vec<ShiftScore>> {
    let frequent = model.most_frequent(FREQUENT_LETTERS);

    (0..ALPHABET_SIZE as u8)
        .map(|shift| {
            let letters = shifted_column(key, column, shift)?;
            let score = ShiftScore {
                shift,
                intersection: frequency_intersection(&frequent, &letters),
                transition: neighbour_transitions(key, model, column, &letters)?,
            };
            trace!(column, shift, total = score.total(), "shift score");
            Ok(score)
        })
        .collect()
}

/// The five best shifts of `column` by combined score, best first.
pub fn best_shifts(key: &VigenereKey, model: &LanguageModel, column: usize) -> Result<Vec<ShiftScore>> {
    let mut scores = score_shifts(key, model, column)?;
    scores.sort_by(|a, b| b.total().total_cmp(&a.total()));
    scores.truncate(BEST_SHIFTS);
    Ok(scores)
}

/// The `limit` shifts with the largest frequency intersection, with the
/// decrypted column text.
pub fn frequent_letter_shifts(
    key: &VigenereKey,
    model: &LanguageModel,
    column: usize,
    limit: usize,
) -> Result<Vec<(ShiftScore, String)>> {
    let frequent = model.most_frequent(FREQUENT_LETTERS);
    let mut scores = (0..ALPHABET_SIZE as u8)
        .map(|shift| {
            let letters = shifted_column(key, column, shift)?;
            let score = ShiftScore {
                shift,
                intersection: frequency_intersection(&frequent, &letters),
                transition: 0.0,
            };
            Ok((score, letters.iter().map(|s| s.plain_char()).collect()))
        })
        .collect::<Result<Vec<(ShiftScore, String)>>>()?;

    scores.sort_by(|a, b| b.0.intersection.cmp(&a.0.intersection));
    scores.truncate(limit);
    Ok(scores)
}

/// Column `column` decrypted under every shift.
pub fn all_shifts(key: &VigenereKey, column: usize) -> Result<Vec<(u8, String)>> {
    (0..ALPHABET_SIZE as u8)
        .map(|shift| {
            let text = shifted_column(key, column, shift)?.iter().map(|s| s.plain_char()).collect();
            Ok((shift, text))
        })
        .collect()
}
