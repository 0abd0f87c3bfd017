//! Error types for cryptanalysis operations

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptanalysisError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {file} data at line {line}: {reason}")]
    MalformedData {
        file: &'static str,
        line: usize,
        reason: String,
    },

    #[error("Missing frequency for plaintext symbol '{0}'")]
    MissingFrequency(char),

    #[error("'{0}' is not a ciphertext symbol (A-Z)")]
    InvalidCipherSymbol(char),

    #[error("'{0}' is not a plaintext symbol (a-z or -)")]
    InvalidPlainSymbol(char),

    #[error("Length mismatch: {cipher} ciphertext symbols for {plain} plaintext symbols")]
    LengthMismatch { cipher: usize, plain: usize },

    #[error("Pattern must not be empty")]
    EmptyPattern,

    #[error("The key length is not defined yet")]
    KeyLengthNotSet,

    #[error("Invalid key length {length} (must be between 1 and {max})")]
    InvalidKeyLength { length: usize, max: usize },

    #[error("The column number should be between 0 and {max} (got {column})", max = .length - 1)]
    ColumnOutOfRange { column: usize, length: usize },

    #[error("The shift should be between 0 and 25 (got {0})")]
    ShiftOutOfRange(usize),

    #[error("Digraph rules are not available for language '{0}'")]
    DigraphUnsupported(String),
}

pub type Result<T> = std::result::Result<T, CryptanalysisError>;
