//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    #[error("invalid fraction: {0} basis points exceeds 10000")]
    InvalidFraction(u32),

    #[error("arithmetic overflow")]
    Overflow,
}
