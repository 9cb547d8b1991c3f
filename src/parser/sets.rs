//! FIRST and FOLLOW set computation.
//!
//! Sets are bags that preserve insertion order (deterministic output) with a
//! boolean mask over the token-kind universe for O(1) membership. Both
//! computations iterate to fixed point; termination follows because sets only
//! grow within a finite universe.

use crate::frontend::token::{TokenKind, TOKEN_KIND_COUNT};
use crate::parser::grammar::{Grammar, GrammarSymbol, NonTerminal, NON_TERMINAL_COUNT};

/// An insertion-ordered set of token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    order: Vec<TokenKind>,
    mask: [bool; TOKEN_KIND_COUNT],
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            mask: [false; TOKEN_KIND_COUNT],
        }
    }

    /// Insert a kind; returns true if it was not already present.
    pub fn insert(&mut self, kind: TokenKind) -> bool {
        if self.mask[kind.index()] {
            return false;
        }
        self.mask[kind.index()] = true;
        self.order.push(kind);
        true
    }

    /// O(1) membership test.
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.mask[kind.index()]
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.order.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check whether the epsilon marker is a member.
    pub fn has_epsilon(&self) -> bool {
        self.contains(TokenKind::Eps)
    }
}

/// The FIRST and FOLLOW sets of a grammar, indexed by non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstFollowSets {
    first: Vec<TokenSet>,
    follow: Vec<TokenSet>,
}

impl FirstFollowSets {
    /// Compute both set families for the grammar.
    pub fn compute(grammar: &Grammar) -> Self {
        let first = compute_first(grammar);
        let follow = compute_follow(grammar, &first);
        Self { first, follow }
    }

    /// FIRST of a non-terminal.
    pub fn first(&self, nt: NonTerminal) -> &TokenSet {
        &self.first[nt.index()]
    }

    /// FOLLOW of a non-terminal.
    pub fn follow(&self, nt: NonTerminal) -> &TokenSet {
        &self.follow[nt.index()]
    }

    /// FIRST of a symbol sequence: terminals cut the walk short, nullable
    /// non-terminals let it continue, and epsilon joins only when every
    /// symbol is nullable.
    pub fn first_of_rhs(&self, rhs: &[GrammarSymbol]) -> TokenSet {
        first_of_rhs(&self.first, rhs)
    }
}

fn first_of_rhs(first: &[TokenSet], rhs: &[GrammarSymbol]) -> TokenSet {
    let mut result = TokenSet::new();
    let mut all_nullable = true;
    for symbol in rhs {
        match symbol {
            GrammarSymbol::Terminal(tk) => {
                result.insert(*tk);
                all_nullable = false;
            }
            GrammarSymbol::NonTerminal(nt) => {
                let sub = &first[nt.index()];
                for tk in sub.iter() {
                    if tk != TokenKind::Eps {
                        result.insert(tk);
                    }
                }
                if !sub.has_epsilon() {
                    all_nullable = false;
                }
            }
        }
        if !all_nullable {
            break;
        }
    }
    if all_nullable {
        result.insert(TokenKind::Eps);
    }
    result
}

fn compute_first(grammar: &Grammar) -> Vec<TokenSet> {
    let mut first = vec![TokenSet::new(); NON_TERMINAL_COUNT];
    let mut modified = true;
    while modified {
        modified = false;
        for rule in grammar.rules() {
            let lhs = rule.lhs.index();
            let rhs_first = first_of_rhs(&first, &rule.rhs);
            for tk in rhs_first.iter() {
                if first[lhs].insert(tk) {
                    modified = true;
                }
            }
        }
    }
    first
}

fn compute_follow(grammar: &Grammar, first: &[TokenSet]) -> Vec<TokenSet> {
    let mut follow = vec![TokenSet::new(); NON_TERMINAL_COUNT];
    follow[Grammar::START.index()].insert(TokenKind::Dollar);

    let mut modified = true;
    while modified {
        modified = false;
        for rule in grammar.rules() {
            let lhs = rule.lhs.index();
            for (i, symbol) in rule.rhs.iter().enumerate() {
                let nt = match symbol {
                    GrammarSymbol::NonTerminal(nt) => *nt,
                    GrammarSymbol::Terminal(_) => continue,
                };
                let beta = &rule.rhs[i + 1..];
                let beta_first = first_of_rhs(first, beta);
                for tk in beta_first.iter() {
                    if tk != TokenKind::Eps && follow[nt.index()].insert(tk) {
                        modified = true;
                    }
                }
                if beta.is_empty() || beta_first.has_epsilon() {
                    let inherited: Vec<TokenKind> = follow[lhs].iter().collect();
                    for tk in inherited {
                        if follow[nt.index()].insert(tk) {
                            modified = true;
                        }
                    }
                }
            }
        }
    }
    follow
}
