//! Error types for the front end.
//!
//! Fatal conditions (unopenable files, an unresolvable grammar) surface as
//! `Result::Err`; recoverable lexical and syntactic errors travel through the
//! token stream and the parser's diagnostic list instead, so a single run can
//! report many of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type for the front end.
#[derive(Error, Debug)]
pub enum FrontendError {
    /// Error while loading or resolving the grammar
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error while loading the grammar file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule line was empty or had no left-hand side
    #[error("rule {line} has no left-hand side")]
    MissingLhs { line: usize },

    /// The left-hand side was not written as `<nonTerminal>`
    #[error("rule {line}: left-hand side {symbol:?} is not a non-terminal")]
    LhsNotNonTerminal { line: usize, symbol: String },

    /// A non-terminal name did not resolve
    #[error("rule {line}: unknown non-terminal {symbol:?}")]
    UnknownNonTerminal { line: usize, symbol: String },

    /// A terminal name did not resolve after prepending the TK_ prefix
    #[error("rule {line}: unknown terminal {symbol:?}")]
    UnknownTerminal { line: usize, symbol: String },

    /// A rule had a left-hand side but no right-hand symbols
    #[error("rule {line}: empty right-hand side")]
    EmptyRhs { line: usize },

    /// The grammar file contained no rules at all
    #[error("grammar contains no rules")]
    Empty,
}

/// Result type using FrontendError.
pub type FrontendResult<T> = Result<T, FrontendError>;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A recoverable error in the source program
    Error,
    /// A warning (e.g. a parse-table conflict that was overwritten)
    Warning,
}

/// A diagnostic message tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Source line the diagnostic refers to (0 for file-level warnings)
    pub line: usize,
    /// Message text
    pub message: String,
}

impl Diagnostic {
    /// Create a new error diagnostic at the given line.
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line: 0,
            message: message.into(),
        }
    }

    /// Check whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "Line {:>5} Error: {}", self.line, self.message),
            Severity::Warning => write!(f, "Warning: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::error(12, "Unrecognized pattern: \"@\"");
        let s = format!("{}", d);
        assert!(s.starts_with("Line"));
        assert!(s.contains("12 Error:"));
        assert!(s.contains("Unrecognized pattern"));
    }

    #[test]
    fn test_warning_display() {
        let d = Diagnostic::warning("duplicate parse table entry");
        assert_eq!(format!("{}", d), "Warning: duplicate parse table entry");
        assert!(!d.is_error());
    }

    #[test]
    fn test_grammar_error_display() {
        let e = GrammarError::UnknownTerminal {
            line: 3,
            symbol: "TK_BOGUS".to_string(),
        };
        assert!(format!("{}", e).contains("TK_BOGUS"));
    }
}
