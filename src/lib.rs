//! # llfront — a compiler front end
//!
//! Turns source text into a labeled parse tree ready for semantic analysis:
//!
//! ```text
//! Input -> Twin buffer -> DFA lexer -> Token stream -> LL(1) driver -> Parse tree
//!                                         |                  |
//!                                    Symbol table     Grammar + FIRST/FOLLOW
//! ```
//!
//! The lexer walks an explicit automaton over a twin-buffer byte stream and
//! interns every lexeme in a shared symbol table. The parser derives its
//! table from a grammar file at startup by computing FIRST and FOLLOW sets to
//! fixed point, then runs a predictive descent with panic-mode error
//! recovery, so one run reports many errors and always yields a tree.
//!
//! ## Example
//!
//! ```rust,ignore
//! use llfront::prelude::*;
//!
//! let ctx = ParserContext::from_path("grammar.txt")?;
//! let outcome = llfront::parse_source("_main\n    return ;\nend\n", &ctx)?;
//! for diagnostic in &outcome.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod frontend;
pub mod parser;
pub mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::frontend::{
        strip_comments, tokenize_source, Lexer, SymbolEntry, SymbolTable, Token, TokenKind,
    };
    pub use crate::parser::{
        parse_tokens, FirstFollowSets, Grammar, GrammarSymbol, NonTerminal, ParseOutcome,
        ParseTable, ParseTree, ParserContext,
    };
    pub use crate::utils::errors::*;
}

pub use frontend::tokenize_source;
pub use parser::parse_source;

use crate::utils::errors::FrontendResult;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full pipeline for one file: load the grammar, lex, and parse.
///
/// Callers that process multiple inputs should build a [`parser::ParserContext`]
/// once and use [`parse_source`] instead; the context is immutable and can be
/// shared read-only.
pub fn compile(source: &str, grammar_text: &str) -> FrontendResult<parser::ParseOutcome> {
    let ctx = parser::ParserContext::new(grammar_text)?;
    parse_source(source, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_compile_pipeline() {
        let outcome = compile(
            "_main end",
            "<program> <mainFunction>\n\
             <mainFunction> MAIN <stmts> END\n\
             <stmts> EPS\n",
        )
        .unwrap();
        assert!(outcome.is_clean());
    }
}
