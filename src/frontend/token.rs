//! Token kinds and tokens produced by the lexer.
//!
//! The kind enumeration is closed and totally ordered; the three error kinds
//! sort after every valid kind so the parser can test for them with a single
//! comparison. The variant order is load-bearing: the parse table and the
//! grammar loader index by it.

use crate::frontend::symtab::SymbolEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// The kind of a token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum TokenKind {
    /// `<---`
    AssignOp,
    /// `%` to end of line
    Comment,
    /// Field identifier `[a-z]+`
    FieldId,
    /// Variable identifier `[b-d][2-7]+` or `[b-d][a-z]+[2-7]+`
    Id,
    /// Integer literal
    Num,
    /// Real literal
    Rnum,
    /// Function identifier `_` letters digits?
    FunId,
    /// Record/union identifier `#[a-z]+`
    Ruid,
    /// `with` keyword
    With,
    /// `parameters` keyword
    Parameters,
    /// `end` keyword
    End,
    /// `while` keyword
    While,
    /// `union` keyword
    Union,
    /// `endunion` keyword
    EndUnion,
    /// `definetype` keyword
    DefineType,
    /// `as` keyword
    As,
    /// `type` keyword
    Type,
    /// The `_main` function identifier
    Main,
    /// `global` keyword
    Global,
    /// `parameter` keyword
    Parameter,
    /// `list` keyword
    List,
    /// `[`
    Sql,
    /// `]`
    Sqr,
    /// `input` keyword
    Input,
    /// `output` keyword
    Output,
    /// `int` keyword
    Int,
    /// `real` keyword
    Real,
    /// `,`
    Comma,
    /// `;`
    Sem,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `endwhile` keyword
    EndWhile,
    /// `(`
    Op,
    /// `)`
    Cl,
    /// `if` keyword
    If,
    /// `then` keyword
    Then,
    /// `endif` keyword
    EndIf,
    /// `read` keyword
    Read,
    /// `write` keyword
    Write,
    /// `return` keyword
    Return,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `call` keyword
    Call,
    /// `record` keyword
    Record,
    /// `endrecord` keyword
    EndRecord,
    /// `else` keyword
    Else,
    /// `&&&`
    And,
    /// `@@@`
    Or,
    /// `~`
    Not,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `!=`
    Ne,
    /// Epsilon marker for empty productions
    Eps,
    /// End-of-input marker
    Dollar,
    /// Lexical error: unrecognized pattern
    UnknownPattern,
    /// Lexical error: variable identifier longer than 20 characters
    IdLengthExceeded,
    /// Lexical error: function identifier longer than 30 characters
    FunLengthExceeded,
}

/// Number of token kinds (parse-table column count).
pub const TOKEN_KIND_COUNT: usize = 62;

impl TokenKind {
    /// All kinds in declaration order.
    pub const ALL: [TokenKind; TOKEN_KIND_COUNT] = {
        use TokenKind::*;
        [
            AssignOp, Comment, FieldId, Id, Num, Rnum, FunId, Ruid, With, Parameters, End,
            While, Union, EndUnion, DefineType, As, Type, Main, Global, Parameter, List,
            Sql, Sqr, Input, Output, Int, Real, Comma, Sem, Colon, Dot, EndWhile, Op, Cl,
            If, Then, EndIf, Read, Write, Return, Plus, Minus, Mul, Div, Call, Record,
            EndRecord, Else, And, Or, Not, Lt, Le, Eq, Gt, Ge, Ne, Eps, Dollar,
            UnknownPattern, IdLengthExceeded, FunLengthExceeded,
        ]
    };

    /// Index of this kind in declaration order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Check whether this is one of the three lexical-error kinds.
    pub fn is_error(self) -> bool {
        self >= TokenKind::UnknownPattern
    }

    /// Check whether this kind names a reserved keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            With | Parameters
                | End
                | While
                | Union
                | EndUnion
                | DefineType
                | As
                | Type
                | Global
                | Parameter
                | List
                | Input
                | Output
                | Int
                | Real
                | EndWhile
                | If
                | Then
                | EndIf
                | Read
                | Write
                | Return
                | Call
                | Record
                | EndRecord
                | Else
        )
    }

    /// The canonical name of this kind, as used in printed listings and the
    /// grammar file (minus the `TK_` prefix there).
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            AssignOp => "TK_ASSIGNOP",
            Comment => "TK_COMMENT",
            FieldId => "TK_FIELDID",
            Id => "TK_ID",
            Num => "TK_NUM",
            Rnum => "TK_RNUM",
            FunId => "TK_FUNID",
            Ruid => "TK_RUID",
            With => "TK_WITH",
            Parameters => "TK_PARAMETERS",
            End => "TK_END",
            While => "TK_WHILE",
            Union => "TK_UNION",
            EndUnion => "TK_ENDUNION",
            DefineType => "TK_DEFINETYPE",
            As => "TK_AS",
            Type => "TK_TYPE",
            Main => "TK_MAIN",
            Global => "TK_GLOBAL",
            Parameter => "TK_PARAMETER",
            List => "TK_LIST",
            Sql => "TK_SQL",
            Sqr => "TK_SQR",
            Input => "TK_INPUT",
            Output => "TK_OUTPUT",
            Int => "TK_INT",
            Real => "TK_REAL",
            Comma => "TK_COMMA",
            Sem => "TK_SEM",
            Colon => "TK_COLON",
            Dot => "TK_DOT",
            EndWhile => "TK_ENDWHILE",
            Op => "TK_OP",
            Cl => "TK_CL",
            If => "TK_IF",
            Then => "TK_THEN",
            EndIf => "TK_ENDIF",
            Read => "TK_READ",
            Write => "TK_WRITE",
            Return => "TK_RETURN",
            Plus => "TK_PLUS",
            Minus => "TK_MINUS",
            Mul => "TK_MUL",
            Div => "TK_DIV",
            Call => "TK_CALL",
            Record => "TK_RECORD",
            EndRecord => "TK_ENDRECORD",
            Else => "TK_ELSE",
            And => "TK_AND",
            Or => "TK_OR",
            Not => "TK_NOT",
            Lt => "TK_LT",
            Le => "TK_LE",
            Eq => "TK_EQ",
            Gt => "TK_GT",
            Ge => "TK_GE",
            Ne => "TK_NE",
            Eps => "TK_EPS",
            Dollar => "TK_DOLLAR",
            UnknownPattern => "LEXICAL_ERROR",
            IdLengthExceeded => "IDENTIFIER_LENGTH_EXCEEDED",
            FunLengthExceeded => "FUNCTION_NAME_LENGTH_EXCEEDED",
        }
    }

    /// Name used in token listings; error kinds get their category text.
    pub fn listing_name(self) -> &'static str {
        use TokenKind::*;
        match self {
            UnknownPattern => "Unrecognized pattern",
            IdLengthExceeded => "Identifier length exceeded 20",
            FunLengthExceeded => "Function name length exceeded 30",
            other => other.name(),
        }
    }

    /// Resolve a canonical `TK_*` name back to a kind.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        TokenKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Resolve a grammar-file terminal name (written without the `TK_`
    /// prefix) to a kind.
    pub fn from_rule_name(bare: &str) -> Option<TokenKind> {
        let prefixed = format!("TK_{}", bare);
        TokenKind::from_name(&prefixed)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A token in the source program: a shared symbol-table entry plus the line
/// it was seen on.
#[derive(Debug, Clone)]
pub struct Token {
    /// Interned entry carrying lexeme, kind, and numeric value
    pub entry: Rc<SymbolEntry>,
    /// Source line (1-indexed)
    pub line: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(entry: Rc<SymbolEntry>, line: usize) -> Self {
        Self { entry, line }
    }

    /// The kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.entry.kind
    }

    /// The lexeme text of this token.
    pub fn lexeme(&self) -> &str {
        &self.entry.lexeme
    }

    /// Check if this is the end-of-input token.
    pub fn is_eof(&self) -> bool {
        self.kind() == TokenKind::Dollar
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind().name(), self.lexeme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_sort_last() {
        assert!(TokenKind::UnknownPattern > TokenKind::Dollar);
        assert!(TokenKind::FunLengthExceeded > TokenKind::IdLengthExceeded);
        assert!(TokenKind::UnknownPattern.is_error());
        assert!(TokenKind::IdLengthExceeded.is_error());
        assert!(!TokenKind::Dollar.is_error());
        assert!(!TokenKind::AssignOp.is_error());
    }

    #[test]
    fn test_name_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_rule_name_resolution() {
        assert_eq!(TokenKind::from_rule_name("ASSIGNOP"), Some(TokenKind::AssignOp));
        assert_eq!(TokenKind::from_rule_name("EPS"), Some(TokenKind::Eps));
        assert_eq!(TokenKind::from_rule_name("SEM"), Some(TokenKind::Sem));
        assert_eq!(TokenKind::from_rule_name("NOPE"), None);
    }

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(TokenKind::ALL.len(), TOKEN_KIND_COUNT);
    }

    #[test]
    fn test_listing_names_for_errors() {
        assert_eq!(
            TokenKind::UnknownPattern.listing_name(),
            "Unrecognized pattern"
        );
        assert_eq!(
            TokenKind::IdLengthExceeded.listing_name(),
            "Identifier length exceeded 20"
        );
        assert_eq!(TokenKind::Num.listing_name(), "TK_NUM");
    }
}
