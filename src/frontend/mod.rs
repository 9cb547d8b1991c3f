//! Lexical analysis: twin buffer, keyword trie, symbol table, and the DFA
//! lexer.
//!
//! The lexer publishes a token stream whose entries share storage for
//! repeated lexemes through the symbol table; the parser consumes that stream
//! and points its tree leaves back into the same entries.

pub mod buffer;
pub mod keywords;
pub mod lexer;
pub mod symtab;
pub mod token;

// Re-exports
pub use buffer::{TwinBuffer, SEGMENT_SIZE};
pub use keywords::{KeywordTrie, KEYWORDS};
pub use lexer::{strip_comments, tokenize_source, Lexer, MAX_FUNID_LEN, MAX_ID_LEN};
pub use symtab::{SymbolEntry, SymbolTable};
pub use token::{Token, TokenKind, TOKEN_KIND_COUNT};
