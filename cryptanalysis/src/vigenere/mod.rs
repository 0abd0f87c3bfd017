//! Vigenère cryptanalysis
//!
//! [`kasiski`] and [`friedman`] suggest key lengths; once a length is fixed
//! on a [`VigenereKey`], [`columns`] ranks the Caesar shift of each column.

pub mod columns;
pub mod friedman;
pub mod kasiski;
pub mod key;

pub use columns::{all_shifts, best_shifts, frequent_letter_shifts, score_shifts, ShiftScore};
pub use friedman::autocorrelation;
pub use kasiski::{divisor_tally, kasiski, Repeat};
pub use key::VigenereKey;
