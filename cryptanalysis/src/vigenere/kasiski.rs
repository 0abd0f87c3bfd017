//! Kasiski examination: repeated patterns and their distances

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::alphabet::Symbol;
use crate::stats::Ciphertext;
use crate::utils;

/// Shortest pattern length that counts as a repeat
pub const MIN_PATTERN_LENGTH: usize = 3;

/// A pattern seen at two positions of the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat {
    pub pattern: String,
    /// Position of the first occurrence
    pub first: usize,
    /// Position of a later occurrence
    pub later: usize,
    pub distance: usize,
    /// Key-length candidates: divisors of `distance` in `2..=distance`
    pub divisors: Vec<usize>,
}

/// Every repeated pattern of length 3 or more, longest first.
///
/// Patterns are grouped per length with a hash map; lengths are tried in
/// increasing order until one yields no repeat at all, since no longer pattern
/// can repeat past that point. Each later occurrence of a pattern is recorded
/// against its first occurrence. Ties are ordered by first, then later
/// position.
pub fn kasiski(ciphertext: &Ciphertext) -> Vec<Repeat> {
    let symbols = ciphertext.symbols();
    let mut repeats = Vec::new();

    for length in MIN_PATTERN_LENGTH..symbols.len() {
        let mut occurrences: HashMap<&[Symbol], Vec<usize>> = HashMap::new();
        for (position, window) in symbols.windows(length).enumerate() {
            occurrences.entry(window).or_default().push(position);
        }

        let before = repeats.len();
        for (window, positions) in occurrences {
            let Some((&first, later)) = positions.split_first() else { continue };
            for &later in later {
                let distance = later - first;
                repeats.push(Repeat {
                    pattern: window.iter().map(|s| s.cipher_char()).collect(),
                    first,
                    later,
                    distance,
                    divisors: utils::divisors(distance),
                });
            }
        }

        if repeats.len() == before {
            break;
        }
    }

    repeats.sort_by(|a, b| {
        b.pattern
            .len()
            .cmp(&a.pattern.len())
            .then(a.first.cmp(&b.first))
            .then(a.later.cmp(&b.later))
    });
    debug!(repeats = repeats.len(), "kasiski examination");
    repeats
}

/// How many repeats have `divisor` among their key-length candidates, for
/// every divisor that occurs, most common first.
pub fn divisor_tally(repeats: &[Repeat]) -> Vec<(usize, usize)> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for d in repeats.iter().flat_map(|r| &r.divisors) {
        *counts.entry(*d).or_default() += 1;
    }

    let mut tally: Vec<(usize, usize)> = counts.into_iter().collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    tally
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisors: Vec<String> = self.divisors.iter().map(usize::to_string).collect();
        write!(
            f,
            "{:<12} {:>6} {:>6} {:>6}  [{}]",
            self.pattern,
            self.first,
            self.later,
            self.distance,
            divisors.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_simple_repeat() {
        let ct = Ciphertext::parse("ABCXYZABCQ").unwrap();
        let repeats = kasiski(&ct);
        assert_eq!(
            repeats,
            vec![Repeat {
                pattern: "ABC".to_string(),
                first: 0,
                later: 6,
                distance: 6,
                divisors: vec![2, 3, 6],
            }]
        );
    }

    #[test]
    fn test_longest_first_and_all_occurrences() {
        let ct = Ciphertext::parse("ABCDQABCDRABC").unwrap();
        let repeats = kasiski(&ct);
        let summary: Vec<(&str, usize, usize)> =
            repeats.iter().map(|r| (r.pattern.as_str(), r.first, r.later)).collect();
        assert_eq!(
            summary,
            vec![
                ("ABCD", 0, 5),
                ("ABC", 0, 5),
                ("ABC", 0, 10),
                ("BCD", 1, 6),
            ]
        );
    }

    #[test]
    fn test_no_repeats() {
        assert!(kasiski(&Ciphertext::parse("ABCDEFGHIJ").unwrap()).is_empty());
        assert!(kasiski(&Ciphertext::parse("").unwrap()).is_empty());
        assert!(kasiski(&Ciphertext::parse("AAA").unwrap()).is_empty());
    }

    #[test]
    fn test_repeating_key_length_is_a_divisor() {
        let ct = test_support::vigenere_ciphertext("lemon");
        let repeats = kasiski(&ct);
        assert!(!repeats.is_empty());
        assert!(repeats.iter().any(|r| r.divisors.contains(&5)));
        assert!(divisor_tally(&repeats).iter().any(|&(d, _)| d == 5));
    }

    #[test]
    fn test_divisor_tally() {
        let ct = Ciphertext::parse("ABCXYZABCQ").unwrap();
        assert_eq!(divisor_tally(&kasiski(&ct)), vec![(2, 1), (3, 1), (6, 1)]);
    }
}
