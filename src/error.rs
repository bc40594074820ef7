//! Error types shared by the parameter, parser, and action-construction layers.
//!
//! The original engine distinguishes an error from a value by packing both
//! into a shared header and comparing a reserved bit (see `action::flags`).
//! That trick exists only because the source is written in C; here the same
//! distinction is an ordinary `Result<T, ActionError>`.

use thiserror::Error;

/// Every way constructing, validating, or parsing an action can fail.
///
/// `Display` messages intentionally contain the substrings exercised by the
/// round-trip and structural test oracles (`"Unknown"`, `"Invalid number"`,
/// `"out of range"`, `"Unexpected"`): tests assert on substrings, not exact
/// text, and those words are treated as part of the contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    /// Allocation failure. The engine does not actually allocate in a way
    /// that can fail in Rust; this variant exists so constructors keep the
    /// same `Result` shape as the original OOM singleton and so tests that
    /// exercise the "construct then immediately drop" pattern have somewhere
    /// to hang a note about it.
    #[error("out of memory")]
    OutOfMemory,

    /// A syntax error raised by the tokenizer or recursive-descent parser.
    #[error("Unexpected token: {0}")]
    Parse(String),

    /// A keyword with no registered constructor.
    #[error("Unknown keyword '{0}'")]
    UnknownKeyword(String),

    /// Wrong number of parameters for a keyword's schema.
    #[error("Invalid number of parameters for '{keyword}'")]
    InvalidArity { keyword: String },

    /// A supplied parameter has the wrong type for its schema slot.
    #[error("Invalid type for parameter #{index} of '{keyword}': {detail}")]
    InvalidType {
        keyword: String,
        index: usize,
        detail: String,
    },

    /// A numeric parameter fell outside its schema-declared bound.
    #[error("Value out of range for parameter #{index} of '{keyword}': {detail}")]
    OutOfRange {
        keyword: String,
        index: usize,
        detail: String,
    },

    /// A string parameter was not one of the schema's allowed values.
    #[error("Invalid value for parameter #{index} of '{keyword}': {detail}")]
    InvalidValue {
        keyword: String,
        index: usize,
        detail: String,
    },
}

pub type ActionResult<T> = Result<T, ActionError>;
