//! Friedman test: autocorrelation of the ciphertext under cyclic shifts

use crate::stats::Ciphertext;

/// Shifts are tried for `1..MAX_SHIFT`
pub const MAX_SHIFT: usize = 50;

/// Autocorrelation index for each shift `k` in `1..50` (and `k < n`).
///
/// `index(k)` counts the positions where the ciphertext equals itself rotated
/// by `k`, divided by `n - k`. Peaks appear at multiples of the key length.
pub fn autocorrelation(ciphertext: &Ciphertext) -> Vec<(usize, f64)> {
    let symbols = ciphertext.symbols();
    let n = symbols.len();

    (1..MAX_SHIFT.min(n))
        .map(|k| {
            let matches = (0..n).filter(|&i| symbols[i] == symbols[(i + k) % n]).count();
            (k, matches as f64 / (n - k) as f64)
        })
        .collect()
}

/// The series sorted by descending index; equal values keep shift order.
pub fn ranked(series: &[(usize, f64)]) -> Vec<(usize, f64)> {
    let mut ranked = series.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// One line per shift with a bar proportional to the index.
pub fn render_series(series: &[(usize, f64)]) -> String {
    let top = series.iter().map(|&(_, v)| v).fold(0.0, f64::max);
    series
        .iter()
        .map(|&(k, v)| {
            let width = if top > 0.0 { (v / top * 40.0).round() as usize } else { 0 };
            format!("{k:>3} {v:.4} {}", "#".repeat(width))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_periodic_text() {
        let ct = Ciphertext::parse("ABCABCABC").unwrap();
        let series = autocorrelation(&ct);
        assert_eq!(series.len(), 8);
        assert_eq!(series[2], (3, 9.0 / 6.0));
        assert_eq!(series[0], (1, 0.0));
    }

    #[test]
    fn test_short_texts() {
        assert!(autocorrelation(&Ciphertext::parse("").unwrap()).is_empty());
        assert!(autocorrelation(&Ciphertext::parse("A").unwrap()).is_empty());
        assert_eq!(autocorrelation(&Ciphertext::parse("AB").unwrap()), vec![(1, 0.0)]);
    }

    #[test]
    fn test_peak_at_key_length() {
        let ct = test_support::vigenere_ciphertext("lemon");
        let series = autocorrelation(&ct);
        let at = |k: usize| series[k - 1].1;

        assert!(at(5) > at(4) && at(5) > at(6));
        assert!(at(10) > at(9) && at(10) > at(11));
    }

    #[test]
    fn test_ranked_and_render() {
        let series = vec![(1, 0.1), (2, 0.3), (3, 0.3)];
        assert_eq!(ranked(&series), vec![(2, 0.3), (3, 0.3), (1, 0.1)]);
        let rendered = render_series(&series);
        assert!(rendered.starts_with("  1 0.1000 #############"));
        assert_eq!(rendered.lines().count(), 3);
    }
}
