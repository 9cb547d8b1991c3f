//! LL(1) parse-table construction.
//!
//! For each rule N -> alpha, the rule is entered at [N][t] for every terminal
//! t in FIRST(alpha); if alpha is nullable it is also entered for every t in
//! FOLLOW(N). A cell that is already occupied is reported as a warning and
//! overwritten, so the later rule wins.

use crate::frontend::token::{TokenKind, TOKEN_KIND_COUNT};
use crate::parser::grammar::{Grammar, NonTerminal, RuleId, NON_TERMINAL_COUNT};
use crate::parser::sets::FirstFollowSets;
use crate::utils::errors::{Diagnostic, FrontendResult, GrammarError};
use std::path::Path;

/// The (non-terminal, token kind) -> rule mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    cells: Vec<Option<RuleId>>,
}

impl ParseTable {
    fn empty() -> Self {
        Self {
            cells: vec![None; NON_TERMINAL_COUNT * TOKEN_KIND_COUNT],
        }
    }

    /// Build the table; conflicts become warnings and the later rule wins.
    pub fn build(grammar: &Grammar, sets: &FirstFollowSets) -> (ParseTable, Vec<Diagnostic>) {
        let mut table = ParseTable::empty();
        let mut warnings = Vec::new();
        for (rule_id, rule) in grammar.rules().iter().enumerate() {
            let rhs_first = sets.first_of_rhs(&rule.rhs);
            for tk in rhs_first.iter() {
                if tk != TokenKind::Eps {
                    table.set(rule.lhs, tk, rule_id, &mut warnings);
                }
            }
            if rhs_first.has_epsilon() {
                let follow: Vec<TokenKind> = sets.follow(rule.lhs).iter().collect();
                for tk in follow {
                    table.set(rule.lhs, tk, rule_id, &mut warnings);
                }
            }
        }
        (table, warnings)
    }

    /// Look up the rule for a (non-terminal, lookahead) pair.
    pub fn get(&self, nt: NonTerminal, tk: TokenKind) -> Option<RuleId> {
        self.cells[nt.index() * TOKEN_KIND_COUNT + tk.index()]
    }

    fn set(
        &mut self,
        nt: NonTerminal,
        tk: TokenKind,
        rule_id: RuleId,
        warnings: &mut Vec<Diagnostic>,
    ) {
        let cell = &mut self.cells[nt.index() * TOKEN_KIND_COUNT + tk.index()];
        if let Some(existing) = *cell {
            if existing != rule_id {
                warnings.push(Diagnostic::warning(format!(
                    "multiple parse table entries at ({}, {}); overwriting rule {} with rule {}",
                    nt.name(),
                    tk.name(),
                    existing,
                    rule_id
                )));
            }
        }
        *cell = Some(rule_id);
    }
}

/// Everything the predictive driver needs, built once per grammar and shared
/// read-only afterwards: the rules, the FIRST/FOLLOW sets, and the table.
#[derive(Debug, Clone)]
pub struct ParserContext {
    grammar: Grammar,
    sets: FirstFollowSets,
    table: ParseTable,
    warnings: Vec<Diagnostic>,
}

impl ParserContext {
    /// Build a context from grammar text.
    pub fn new(grammar_text: &str) -> Result<ParserContext, GrammarError> {
        Ok(ParserContext::from_grammar(Grammar::parse(grammar_text)?))
    }

    /// Build a context from an already-loaded grammar.
    pub fn from_grammar(grammar: Grammar) -> ParserContext {
        let sets = FirstFollowSets::compute(&grammar);
        let (table, warnings) = ParseTable::build(&grammar, &sets);
        ParserContext {
            grammar,
            sets,
            table,
            warnings,
        }
    }

    /// Build a context from a grammar file.
    pub fn from_path(path: impl AsRef<Path>) -> FrontendResult<ParserContext> {
        Ok(ParserContext::from_grammar(Grammar::from_path(path)?))
    }

    /// The grammar rules.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The FIRST/FOLLOW sets.
    pub fn sets(&self) -> &FirstFollowSets {
        &self.sets
    }

    /// The parse table.
    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Conflict warnings recorded while the table was built.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(text: &str) -> ParserContext {
        ParserContext::new(text).unwrap()
    }

    #[test]
    fn test_table_entries_from_first() {
        let ctx = context(
            "<program> <mainFunction>\n\
             <mainFunction> MAIN <stmts> END\n\
             <stmts> RETURN SEM\n",
        );
        let rule = ctx.table().get(NonTerminal::Program, TokenKind::Main);
        assert_eq!(rule, Some(0));
        assert_eq!(
            ctx.table().get(NonTerminal::MainFunction, TokenKind::Main),
            Some(1)
        );
        assert_eq!(ctx.table().get(NonTerminal::Program, TokenKind::End), None);
    }

    #[test]
    fn test_epsilon_rule_fills_follow_columns() {
        let ctx = context(
            "<program> <declarations> END\n\
             <declarations> TYPE SEM <declarations>\n\
             <declarations> EPS\n",
        );
        // eps rule sits at FOLLOW(<declarations>) = { TK_END }
        assert_eq!(
            ctx.table().get(NonTerminal::Declarations, TokenKind::End),
            Some(2)
        );
        assert_eq!(
            ctx.table().get(NonTerminal::Declarations, TokenKind::Type),
            Some(1)
        );
    }

    #[test]
    fn test_conflict_warns_and_last_writer_wins() {
        let ctx = context(
            "<program> MAIN END\n\
             <program> MAIN SEM\n",
        );
        assert_eq!(
            ctx.table().get(NonTerminal::Program, TokenKind::Main),
            Some(1)
        );
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].message.contains("multiple parse table entries"));
    }

    #[test]
    fn test_context_build_is_idempotent() {
        let text = "<program> <mainFunction>\n\
                    <mainFunction> MAIN <stmts> END\n\
                    <stmts> EPS\n\
                    <stmts> RETURN SEM\n";
        let a = ParserContext::new(text).unwrap();
        let b = ParserContext::new(text).unwrap();
        assert_eq!(a.grammar(), b.grammar());
        assert_eq!(a.sets(), b.sets());
        assert_eq!(a.table(), b.table());
    }
}
