//! Error types for cfgsync-content

/// Result type for cfgsync-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cfgsync-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Symbol not found in artifact: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("Symbol {symbol} at line {line} is a {found} assignment, cannot write a {expected} value")]
    FormMismatch {
        symbol: String,
        line: usize,
        found: String,
        expected: String,
    },

    #[error("Invalid operand {value:?} for symbol {symbol}: {reason}")]
    InvalidOperand {
        symbol: String,
        value: String,
        reason: String,
    },
}
