//! Error types for Agrochain

use std::fmt;

#[derive(Debug, Clone)]
pub enum LedgerError {
    EmptyChain,
    InvalidTransaction(String),
    Serialization(String),
    ProofSearchExhausted(u64),
    ApiError(String),
    IoError(String),
    ConfigError(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::EmptyChain => {
                write!(f, "Cannot derive previous_hash from an empty chain")
            }
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            LedgerError::ProofSearchExhausted(cap) => {
                write!(f, "No valid proof found within {} iterations", cap)
            }
            LedgerError::ApiError(msg) => write!(f, "API error: {}", msg),
            LedgerError::IoError(msg) => write!(f, "IO error: {}", msg),
            LedgerError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
