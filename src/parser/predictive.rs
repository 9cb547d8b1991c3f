//! Table-driven predictive parsing with panic-mode error recovery.
//!
//! The driver keeps a stack of tree nodes seeded with the start symbol.
//! Comment tokens are skipped silently; lexical-error tokens are skipped with
//! a diagnostic and set the syntax-error flag. On a parse-table miss the
//! current non-terminal is popped when the lookahead is in its FOLLOW set,
//! otherwise input is discarded until a synchronizable token appears. The
//! parser never aborts: it always returns a (possibly partial) tree together
//! with the error flag.

use crate::frontend::symtab::SymbolEntry;
use crate::frontend::token::{Token, TokenKind};
use crate::parser::grammar::{Grammar, GrammarSymbol};
use crate::parser::table::ParserContext;
use crate::parser::tree::{NodeId, ParseTree};
use crate::utils::errors::Diagnostic;
use std::rc::Rc;

/// Result of a parse: the tree, the collected diagnostics, and whether any
/// syntax (or lexical) error was seen.
#[derive(Debug)]
pub struct ParseOutcome {
    /// The parse tree, partial when errors occurred
    pub tree: ParseTree,
    /// Diagnostics in source order
    pub diagnostics: Vec<Diagnostic>,
    /// True when any lexical or syntactic error was flagged
    pub had_syntax_error: bool,
}

impl ParseOutcome {
    /// Check whether the input parsed cleanly.
    pub fn is_clean(&self) -> bool {
        !self.had_syntax_error
    }
}

/// Parse a token stream against the grammar in `ctx`.
pub fn parse_tokens(tokens: &[Token], ctx: &ParserContext) -> ParseOutcome {
    let mut tree = ParseTree::new(Grammar::START);
    let mut stack: Vec<NodeId> = vec![tree.root()];
    let mut diagnostics = Vec::new();
    let mut had_error = false;
    let mut pos = 0;
    let mut last_line = 1;

    while let Some(&node_id) = stack.last() {
        let token = match tokens.get(pos) {
            Some(t) => t,
            None => break,
        };
        last_line = token.line;

        // Comments are skipped silently; lexical errors are skipped with a
        // diagnostic and poison the run.
        match token.kind() {
            TokenKind::Comment => {
                pos += 1;
                continue;
            }
            TokenKind::UnknownPattern => {
                diagnostics.push(Diagnostic::error(
                    token.line,
                    format!("Unrecognized pattern: \"{}\"", token.lexeme()),
                ));
                had_error = true;
                pos += 1;
                continue;
            }
            TokenKind::IdLengthExceeded => {
                diagnostics.push(Diagnostic::error(
                    token.line,
                    format!("Too long identifier: \"{}\"", token.lexeme()),
                ));
                had_error = true;
                pos += 1;
                continue;
            }
            TokenKind::FunLengthExceeded => {
                diagnostics.push(Diagnostic::error(
                    token.line,
                    format!("Too long function name: \"{}\"", token.lexeme()),
                ));
                had_error = true;
                pos += 1;
                continue;
            }
            _ => {}
        }

        match tree.node(node_id).symbol {
            GrammarSymbol::Terminal(TokenKind::Eps) => {
                let node = tree.node_mut(node_id);
                node.line = token.line;
                node.entry = Some(Rc::new(SymbolEntry::new("EPSILON", TokenKind::Eps, 0.0)));
                stack.pop();
            }
            GrammarSymbol::Terminal(expected) if expected == token.kind() => {
                let node = tree.node_mut(node_id);
                node.line = token.line;
                node.entry = Some(Rc::clone(&token.entry));
                stack.pop();
                pos += 1;
            }
            GrammarSymbol::Terminal(expected) => {
                had_error = true;
                diagnostics.push(Diagnostic::error(
                    token.line,
                    format!(
                        "The token {} for lexeme \"{}\" does not match the expected token {}",
                        token.kind().name(),
                        token.lexeme(),
                        expected.name()
                    ),
                ));
                tree.node_mut(node_id).line = token.line;
                stack.pop();
            }
            GrammarSymbol::NonTerminal(nt) => {
                match ctx.table().get(nt, token.kind()) {
                    Some(rule_id) => {
                        stack.pop();
                        tree.node_mut(node_id).line = token.line;
                        let rule = ctx.grammar().rule(rule_id);
                        let children: Vec<NodeId> = rule
                            .rhs
                            .iter()
                            .map(|&symbol| tree.add_child(node_id, symbol))
                            .collect();
                        for &child in children.iter().rev() {
                            stack.push(child);
                        }
                    }
                    None => {
                        had_error = true;
                        diagnostics.push(Diagnostic::error(
                            token.line,
                            format!(
                                "Invalid token {} encountered with value \"{}\". Stack top is: {}",
                                token.kind().name(),
                                token.lexeme(),
                                nt.name()
                            ),
                        ));
                        if ctx.sets().follow(nt).contains(token.kind()) {
                            tree.node_mut(node_id).line = token.line;
                            stack.pop();
                        } else {
                            pos += 1;
                            // Input exhausted while skipping: drop the stuck
                            // non-terminal so the drain does not report it twice.
                            if pos >= tokens.len() {
                                stack.pop();
                            }
                        }
                    }
                }
            }
        }
    }

    let at_end = tokens
        .get(pos)
        .map(|t| t.kind() == TokenKind::Dollar)
        .unwrap_or(true);
    if !(stack.is_empty() && at_end) || had_error {
        had_error = true;
        // Drain whatever is left on the stack, then whatever input remains.
        while let Some(node_id) = stack.pop() {
            match tree.node(node_id).symbol {
                GrammarSymbol::NonTerminal(nt) => diagnostics.push(Diagnostic::error(
                    last_line,
                    format!(
                        "Invalid token TK_DOLLAR encountered. Stack top is: {}",
                        nt.name()
                    ),
                )),
                GrammarSymbol::Terminal(expected) => diagnostics.push(Diagnostic::error(
                    last_line,
                    format!(
                        "The token TK_DOLLAR for lexeme \"\" does not match the expected token {}",
                        expected.name()
                    ),
                )),
            }
        }
        while let Some(token) = tokens.get(pos) {
            if token.kind() == TokenKind::Dollar {
                break;
            }
            diagnostics.push(Diagnostic::error(
                token.line,
                format!(
                    "Invalid token {} encountered with value \"{}\". Stack top is: TK_DOLLAR",
                    token.kind().name(),
                    token.lexeme()
                ),
            ));
            pos += 1;
        }
    }

    ParseOutcome {
        tree,
        diagnostics,
        had_syntax_error: had_error,
    }
}
