//! Error type shared by every part of the codec.

use thiserror::Error;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Everything that can go wrong while building, using or persisting a codec.
///
/// Symbols are carried as their `Debug` rendering so the error stays independent
/// of the alphabet type.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A code table entry breaks the length/value rules, or reuses another entry's code.
    #[error("Invalid code for symbol {symbol}: {bits} bits, value {value}")]
    InvalidCode {
        /// The offending symbol
        symbol: String,
        /// Bit length of the rejected code
        bits: u32,
        /// Integer value of the rejected code
        value: u128,
    },

    /// The frequency table did not contain a single real symbol.
    #[error("Cannot build a code table from an empty alphabet")]
    EmptyAlphabet,

    /// The encoder was handed a symbol the table does not know.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// No table entry carries the requested code.
    #[error("Unknown code: {bits} bits, value {value}")]
    UnknownCode {
        /// Bit length probed
        bits: u8,
        /// Integer value probed
        value: u128,
    },

    /// Two entries where one code is a bit prefix of the other.
    #[error("Code of {prefix} is a prefix of the code of {symbol}")]
    PrefixConflict {
        /// Symbol owning the shorter code
        prefix: String,
        /// Symbol owning the longer code
        symbol: String,
    },

    /// The decoded symbols cannot be joined the requested way.
    #[error("Cannot reassemble symbol {symbol} with {concat} concatenation")]
    UnsupportedConcat {
        /// Strategy that was requested
        concat: &'static str,
        /// First symbol that did not fit
        symbol: String,
    },

    /// A persisted code table is damaged, of another type, or of an unknown version.
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Shorthand for a `MalformedPersistedData` error.
    pub fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedPersistedData(message.into())
    }
}
