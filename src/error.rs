//! Error types for the LALR core.

use thiserror::Error;

/// Errors that can occur while reading a grammar or building its tables.
///
/// Conflicts are deliberately **not** represented here: per the historical
/// behavior this core follows, an unresolved shift/reduce or reduce/reduce
/// conflict is a non-fatal diagnostic, not an abort condition. Callers get
/// conflict data back alongside the tables, never through this enum.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("redefined symbol: {0}")]
    Redefined(String),

    #[error("empty grammar input")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
