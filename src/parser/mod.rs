//! Syntax analysis: grammar loading, FIRST/FOLLOW computation, parse-table
//! construction, and the predictive driver.
//!
//! The parse table is derived at startup from the grammar text by computing
//! FIRST and FOLLOW sets to fixed point. The driver performs panic-mode
//! recovery against FOLLOW sets, so a single run reports many syntax errors
//! and still returns a (possibly partial) parse tree.

pub mod grammar;
pub mod predictive;
pub mod sets;
pub mod table;
pub mod tree;

// Re-exports
pub use grammar::{Grammar, GrammarSymbol, NonTerminal, Rule, RuleId, NON_TERMINAL_COUNT};
pub use predictive::{parse_tokens, ParseOutcome};
pub use sets::{FirstFollowSets, TokenSet};
pub use table::{ParseTable, ParserContext};
pub use tree::{NodeId, ParseNode, ParseTree};

use crate::frontend::lexer::tokenize_source;
use crate::utils::errors::FrontendResult;

/// Lex and parse a complete source string against a prepared context.
pub fn parse_source(source: &str, ctx: &ParserContext) -> FrontendResult<ParseOutcome> {
    let tokens = tokenize_source(source)?;
    Ok(parse_tokens(&tokens, ctx))
}
