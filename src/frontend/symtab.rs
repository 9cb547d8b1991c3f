//! Append-only interning symbol table.
//!
//! Every distinct lexeme gets exactly one entry; the token stream and the
//! parse tree share that entry by reference. Entries are immutable after
//! creation.

use crate::frontend::token::TokenKind;
use std::rc::Rc;

/// A symbol-table entry: the lexeme, its token kind, and the parsed numeric
/// value when the kind is a numeric literal (0.0 otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    /// The lexeme text
    pub lexeme: String,
    /// Token kind classified by the lexer
    pub kind: TokenKind,
    /// Numeric value for TK_NUM / TK_RNUM entries
    pub value: f64,
}

impl SymbolEntry {
    /// Create a new entry.
    pub fn new(lexeme: impl Into<String>, kind: TokenKind, value: f64) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
            value,
        }
    }
}

/// Append-only store of interned symbol entries.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<Rc<SymbolEntry>>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(16),
        }
    }

    /// Look up an entry by exact lexeme. Linear scan; insertion order is
    /// preserved for deterministic output.
    pub fn find(&self, lexeme: &str) -> Option<Rc<SymbolEntry>> {
        self.entries
            .iter()
            .find(|e| e.lexeme == lexeme)
            .cloned()
    }

    /// Append a pre-built entry.
    pub fn insert(&mut self, entry: Rc<SymbolEntry>) {
        self.entries.push(entry);
    }

    /// Return the entry for a lexeme, creating it on first sighting. A
    /// subsequent sighting with identical text reuses the stored entry
    /// verbatim, whatever kind or value it was created with.
    pub fn intern(&mut self, lexeme: &str, kind: TokenKind, value: f64) -> Rc<SymbolEntry> {
        if let Some(existing) = self.find(lexeme) {
            return existing;
        }
        let entry = Rc::new(SymbolEntry::new(lexeme, kind, value));
        self.insert(Rc::clone(&entry));
        entry
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<SymbolEntry>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_reuses_entry() {
        let mut table = SymbolTable::new();
        let a = table.intern("abc", TokenKind::FieldId, 0.0);
        let b = table.intern("abc", TokenKind::FieldId, 0.0);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_intern_distinct_lexemes() {
        let mut table = SymbolTable::new();
        table.intern("b2", TokenKind::Id, 0.0);
        table.intern("b3", TokenKind::Id, 0.0);
        assert_eq!(table.len(), 2);
        assert!(table.find("b2").is_some());
        assert!(table.find("b4").is_none());
    }

    #[test]
    fn test_no_duplicate_lexemes() {
        let mut table = SymbolTable::new();
        for lex in ["x", "y", "x", "z", "y", "x"] {
            table.intern(lex, TokenKind::FieldId, 0.0);
        }
        for entry in table.iter() {
            let count = table.iter().filter(|e| e.lexeme == entry.lexeme).count();
            assert_eq!(count, 1, "lexeme {:?} interned more than once", entry.lexeme);
        }
    }

    #[test]
    fn test_numeric_value_stored() {
        let mut table = SymbolTable::new();
        let n = table.intern("123", TokenKind::Num, 123.0);
        assert_eq!(n.value, 123.0);
        // First sighting wins
        let again = table.intern("123", TokenKind::Num, 999.0);
        assert_eq!(again.value, 123.0);
    }
}
