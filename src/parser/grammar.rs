//! Grammar representation and loader.
//!
//! The grammar text has one rule per line: the left-hand non-terminal in
//! angle brackets, then the whitespace-separated right-hand symbols. A symbol
//! beginning with `<` is a non-terminal; anything else is a terminal written
//! without its `TK_` prefix, which the loader prepends before resolving.
//! Every referenced symbol must resolve or loading fails.

use crate::frontend::token::TokenKind;
use crate::utils::errors::{FrontendResult, GrammarError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The grammatical categories of the language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum NonTerminal {
    Program,
    OtherFunctions,
    MainFunction,
    Stmts,
    Stmt,
    Function,
    InputPar,
    OutputPar,
    ParameterList,
    DataType,
    RemainingList,
    PrimitiveDatatype,
    ConstructedDatatype,
    TypeDefinitions,
    TypeDefinition,
    Declarations,
    Declaration,
    OtherStmts,
    ReturnStmt,
    DefinetypeStmt,
    FieldDefinition,
    FieldDefinitions,
    FieldType,
    MoreFields,
    GlobalOrNot,
    AssignmentStmt,
    IterativeStmt,
    ConditionalStmt,
    ElsePart,
    IoStmt,
    FunCallStmt,
    OptionSingleConstructed,
    OutputParameters,
    InputParameters,
    HighPrecedenceOperators,
    LowPrecedenceOperators,
    OneExpansion,
    MoreExpansions,
    ExpPrime,
    Term,
    TermPrime,
    Factor,
    MoreIds,
    A,
    IdList,
    RelationalOp,
    OptionalReturn,
    Var,
    LogicalOp,
    ArithmeticExpression,
    SingleOrRecId,
    BooleanExpression,
    ActualOrRedefined,
}

/// Number of non-terminals (parse-table row count).
pub const NON_TERMINAL_COUNT: usize = 53;

impl NonTerminal {
    /// All non-terminals in declaration order.
    pub const ALL: [NonTerminal; NON_TERMINAL_COUNT] = {
        use NonTerminal::*;
        [
            Program,
            OtherFunctions,
            MainFunction,
            Stmts,
            Stmt,
            Function,
            InputPar,
            OutputPar,
            ParameterList,
            DataType,
            RemainingList,
            PrimitiveDatatype,
            ConstructedDatatype,
            TypeDefinitions,
            TypeDefinition,
            Declarations,
            Declaration,
            OtherStmts,
            ReturnStmt,
            DefinetypeStmt,
            FieldDefinition,
            FieldDefinitions,
            FieldType,
            MoreFields,
            GlobalOrNot,
            AssignmentStmt,
            IterativeStmt,
            ConditionalStmt,
            ElsePart,
            IoStmt,
            FunCallStmt,
            OptionSingleConstructed,
            OutputParameters,
            InputParameters,
            HighPrecedenceOperators,
            LowPrecedenceOperators,
            OneExpansion,
            MoreExpansions,
            ExpPrime,
            Term,
            TermPrime,
            Factor,
            MoreIds,
            A,
            IdList,
            RelationalOp,
            OptionalReturn,
            Var,
            LogicalOp,
            ArithmeticExpression,
            SingleOrRecId,
            BooleanExpression,
            ActualOrRedefined,
        ]
    };

    /// Index of this non-terminal in declaration order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The angle-bracketed spelling used in the grammar file and in printed
    /// output.
    pub fn name(self) -> &'static str {
        use NonTerminal::*;
        match self {
            Program => "<program>",
            OtherFunctions => "<otherFunctions>",
            MainFunction => "<mainFunction>",
            Stmts => "<stmts>",
            Stmt => "<stmt>",
            Function => "<function>",
            InputPar => "<input_par>",
            OutputPar => "<output_par>",
            ParameterList => "<parameter_list>",
            DataType => "<dataType>",
            RemainingList => "<remaining_list>",
            PrimitiveDatatype => "<primitiveDatatype>",
            ConstructedDatatype => "<constructedDatatype>",
            TypeDefinitions => "<typeDefinitions>",
            TypeDefinition => "<typeDefinition>",
            Declarations => "<declarations>",
            Declaration => "<declaration>",
            OtherStmts => "<otherStmts>",
            ReturnStmt => "<returnStmt>",
            DefinetypeStmt => "<definetypestmt>",
            FieldDefinition => "<fieldDefinition>",
            FieldDefinitions => "<fieldDefinitions>",
            FieldType => "<fieldType>",
            MoreFields => "<moreFields>",
            GlobalOrNot => "<global_or_not>",
            AssignmentStmt => "<assignmentStmt>",
            IterativeStmt => "<iterativeStmt>",
            ConditionalStmt => "<conditionalStmt>",
            ElsePart => "<elsePart>",
            IoStmt => "<ioStmt>",
            FunCallStmt => "<funCallStmt>",
            OptionSingleConstructed => "<option_single_constructed>",
            OutputParameters => "<outputParameters>",
            InputParameters => "<inputParameters>",
            HighPrecedenceOperators => "<highPrecedenceOperators>",
            LowPrecedenceOperators => "<lowPrecedenceOperators>",
            OneExpansion => "<oneExpansion>",
            MoreExpansions => "<moreExpansions>",
            ExpPrime => "<expPrime>",
            Term => "<term>",
            TermPrime => "<termPrime>",
            Factor => "<factor>",
            MoreIds => "<more_ids>",
            A => "<A>",
            IdList => "<idList>",
            RelationalOp => "<relationalOp>",
            OptionalReturn => "<optionalReturn>",
            Var => "<var>",
            LogicalOp => "<logicalOp>",
            ArithmeticExpression => "<arithmeticExpression>",
            SingleOrRecId => "<singleOrRecId>",
            BooleanExpression => "<booleanExpression>",
            ActualOrRedefined => "<actualOrRedefined>",
        }
    }

    /// Resolve an angle-bracketed name.
    pub fn from_name(name: &str) -> Option<NonTerminal> {
        NonTerminal::ALL.iter().copied().find(|nt| nt.name() == name)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A grammar symbol: either a non-terminal or a terminal token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrammarSymbol {
    /// A grammatical category
    NonTerminal(NonTerminal),
    /// A terminal token kind (TK_EPS marks the empty production)
    Terminal(TokenKind),
}

impl GrammarSymbol {
    /// Check whether this symbol is a non-terminal.
    pub fn is_non_terminal(self) -> bool {
        matches!(self, GrammarSymbol::NonTerminal(_))
    }

    /// Check whether this symbol is the epsilon marker.
    pub fn is_epsilon(self) -> bool {
        matches!(self, GrammarSymbol::Terminal(TokenKind::Eps))
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSymbol::NonTerminal(nt) => write!(f, "{}", nt.name()),
            GrammarSymbol::Terminal(tk) => write!(f, "{}", tk.name()),
        }
    }
}

/// Identifier of a rule within its grammar (index into the rule list).
pub type RuleId = usize;

/// A production rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Left-hand non-terminal
    pub lhs: NonTerminal,
    /// Right-hand symbols in order; a single TK_EPS means the empty production
    pub rhs: Vec<GrammarSymbol>,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs.name())?;
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// An ordered collection of production rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    /// The start symbol of every grammar.
    pub const START: NonTerminal = NonTerminal::Program;

    /// Parse grammar text. Whitespace-only lines are skipped; every symbol
    /// must resolve.
    pub fn parse(text: &str) -> Result<Grammar, GrammarError> {
        let mut rules = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let mut parts = line.split_whitespace();
            let lhs_text = match parts.next() {
                Some(t) => t,
                None => continue,
            };
            if !lhs_text.starts_with('<') {
                return Err(GrammarError::LhsNotNonTerminal {
                    line: line_no,
                    symbol: lhs_text.to_string(),
                });
            }
            let lhs = NonTerminal::from_name(lhs_text).ok_or_else(|| {
                GrammarError::UnknownNonTerminal {
                    line: line_no,
                    symbol: lhs_text.to_string(),
                }
            })?;
            let mut rhs = Vec::new();
            for part in parts {
                let symbol = if part.starts_with('<') {
                    let nt = NonTerminal::from_name(part).ok_or_else(|| {
                        GrammarError::UnknownNonTerminal {
                            line: line_no,
                            symbol: part.to_string(),
                        }
                    })?;
                    GrammarSymbol::NonTerminal(nt)
                } else {
                    let tk = TokenKind::from_rule_name(part).ok_or_else(|| {
                        GrammarError::UnknownTerminal {
                            line: line_no,
                            symbol: format!("TK_{}", part),
                        }
                    })?;
                    GrammarSymbol::Terminal(tk)
                };
                rhs.push(symbol);
            }
            if rhs.is_empty() {
                return Err(GrammarError::EmptyRhs { line: line_no });
            }
            rules.push(Rule { lhs, rhs });
        }
        if rules.is_empty() {
            return Err(GrammarError::Empty);
        }
        Ok(Grammar { rules })
    }

    /// Load grammar text from a file.
    pub fn from_path(path: impl AsRef<Path>) -> FrontendResult<Grammar> {
        let text = std::fs::read_to_string(path)?;
        Ok(Grammar::parse(&text)?)
    }

    /// All rules in file order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rule with the given id.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the grammar has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
