//! Vigenère key under construction and its decrypted buffer
//!
//! The key starts without a length. Once a length `K` is chosen, each of the
//! `K` columns can be set to a shift or unset independently; the decrypted
//! buffer holds one slot per ciphertext position, addressed as
//! `row * K + column`, and only ever changes for the column being edited.

use crate::alphabet::{plain_or_unknown, Symbol, ALPHABET_SIZE};
use crate::error::{CryptanalysisError, Result};
use crate::stats::Ciphertext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VigenereKey {
    ciphertext: Ciphertext,
    shifts: Option<Vec<Option<u8>>>,
    clear: Vec<Option<Symbol>>,
}

impl VigenereKey {
    pub fn new(ciphertext: Ciphertext) -> Self {
        let clear = vec![None; ciphertext.len()];
        Self {
            ciphertext,
            shifts: None,
            clear,
        }
    }

    pub fn ciphertext(&self) -> &Ciphertext {
        &self.ciphertext
    }

    /// Key length, if one has been chosen.
    pub fn length(&self) -> Option<usize> {
        self.shifts.as_ref().map(Vec::len)
    }

    /// Per-column shifts; `None` entries are unset columns.
    pub fn shifts(&self) -> Option<&[Option<u8>]> {
        self.shifts.as_deref()
    }

    /// Fix the key length, unsetting every column and clearing the buffer.
    pub fn set_length(&mut self, length: usize) -> Result<()> {
        let max = self.ciphertext.len();
        if length == 0 || length > max {
            return Err(CryptanalysisError::InvalidKeyLength { length, max });
        }

        self.shifts = Some(vec![None; length]);
        self.clear.fill(None);
        Ok(())
    }

    fn checked_length(&self, column: usize) -> Result<usize> {
        let length = self.length().ok_or(CryptanalysisError::KeyLengthNotSet)?;
        if column >= length {
            return Err(CryptanalysisError::ColumnOutOfRange { column, length });
        }
        Ok(length)
    }

    /// Ciphertext positions belonging to `column`.
    pub fn column_positions(&self, column: usize) -> Result<impl Iterator<Item = usize>> {
        let length = self.checked_length(column)?;
        Ok((column..self.ciphertext.len()).step_by(length))
    }

    /// Ciphertext symbols of `column`, one per row.
    pub fn column(&self, column: usize) -> Result<Vec<Symbol>> {
        let symbols = self.ciphertext.symbols();
        Ok(self.column_positions(column)?.map(|i| symbols[i]).collect())
    }

    pub fn shift(&self, column: usize) -> Result<Option<u8>> {
        self.checked_length(column)?;
        Ok(self.shifts.as_ref().and_then(|s| s[column]))
    }

    /// Commit `shift` for `column` and decrypt that column into the buffer.
    pub fn set_column(&mut self, column: usize, shift: usize) -> Result<()> {
        let positions: Vec<usize> = self.column_positions(column)?.collect();
        if shift >= ALPHABET_SIZE {
            return Err(CryptanalysisError::ShiftOutOfRange(shift));
        }
        let shift = shift as u8;

        let symbols = self.ciphertext.symbols();
        for i in positions {
            self.clear[i] = Some(symbols[i].unshift(shift));
        }
        if let Some(shifts) = self.shifts.as_mut() {
            shifts[column] = Some(shift);
        }
        Ok(())
    }

    /// Forget the shift of `column` and blank its buffer positions.
    pub fn unset_column(&mut self, column: usize) -> Result<()> {
        let positions: Vec<usize> = self.column_positions(column)?.collect();
        for i in positions {
            self.clear[i] = None;
        }
        if let Some(shifts) = self.shifts.as_mut() {
            shifts[column] = None;
        }
        Ok(())
    }

    /// Decrypted buffer, `None` where the column is unset.
    pub fn clear(&self) -> &[Option<Symbol>] {
        &self.clear
    }

    pub fn clear_at(&self, position: usize) -> Option<Symbol> {
        self.clear.get(position).copied().flatten()
    }

    /// Key as letters (`A` for shift 0), `-` for unset columns.
    pub fn key_word(&self) -> Option<String> {
        self.shifts.as_ref().map(|shifts| {
            shifts
                .iter()
                .map(|s| s.map_or('-', |s| Symbol::from_rank(s as usize).map_or('-', Symbol::cipher_char)))
                .collect()
        })
    }

    /// Buffer rendered `K` symbols per line, separated by spaces.
    pub fn render_rows(&self) -> Result<String> {
        let length = self.length().ok_or(CryptanalysisError::KeyLengthNotSet)?;
        Ok(self
            .clear
            .chunks(length)
            .map(|row| {
                row.iter()
                    .map(|&p| plain_or_unknown(p).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Summary of the key, in the form printed by the `key` command.
    pub fn describe(&self) -> String {
        match &self.shifts {
            None => "The key length is not defined yet.".to_string(),
            Some(shifts) => {
                let values: Vec<String> = shifts
                    .iter()
                    .map(|s| s.map_or_else(|| "-".to_string(), |s| s.to_string()))
                    .collect();
                format!(
                    "Key length = {}\nKey = [{}]\nKey word = {}\n- = key value not set",
                    shifts.len(),
                    values.join(", "),
                    self.key_word().unwrap_or_default()
                )
            }
        }
    }
}
