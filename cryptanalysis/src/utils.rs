//! Utility functions shared by the solvers

use crate::alphabet::{Symbol, ALPHABET_SIZE};

/// All permutations of `items`, in lexicographic order of their positions.
///
/// The first permutation is `items` itself. An empty slice yields a single
/// empty permutation, so a search over it still scores exactly once.
pub fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    let mut result = Vec::new();

    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());
        if !next_permutation(&mut indices) {
            break;
        }
    }

    result
}

/// Advance `v` to the next lexicographic permutation; false once exhausted.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }

    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Divisors of `n` in `2..=n`.
pub fn divisors(n: usize) -> Vec<usize> {
    (2..=n).filter(|d| n % d == 0).collect()
}

/// Symbols sorted by descending count, ties kept in rank order.
pub fn sorted_by_count(counts: &[usize; ALPHABET_SIZE]) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = Symbol::all().collect();
    symbols.sort_by(|a, b| counts[b.rank()].cmp(&counts[a.rank()]));
    symbols
}

/// Interleave ciphertext lines with their decryption, `width` symbols per line.
pub fn render_blocks(cipher: &str, clear: &str, width: usize) -> String {
    let cipher: Vec<char> = cipher.chars().collect();
    let clear: Vec<char> = clear.chars().collect();
    let width = width.max(1);

    cipher
        .chunks(width)
        .zip(clear.chunks(width))
        .map(|(c, p)| format!("{}\n{}", c.iter().collect::<String>(), p.iter().collect::<String>()))
        .collect::<Vec<_>>()
        .join("\n")
}
