//! Keyword lookup trie.
//!
//! A 26-way trie over the lowercase alphabet, built once at startup with the
//! reserved-word set and shared read-only afterwards.

use crate::frontend::token::TokenKind;
use once_cell::sync::Lazy;

/// The reserved words of the language and their token kinds.
pub const RESERVED_WORDS: [(&str, TokenKind); 27] = [
    ("with", TokenKind::With),
    ("parameters", TokenKind::Parameters),
    ("end", TokenKind::End),
    ("while", TokenKind::While),
    ("union", TokenKind::Union),
    ("endunion", TokenKind::EndUnion),
    ("definetype", TokenKind::DefineType),
    ("as", TokenKind::As),
    ("type", TokenKind::Type),
    ("global", TokenKind::Global),
    ("parameter", TokenKind::Parameter),
    ("list", TokenKind::List),
    ("input", TokenKind::Input),
    ("output", TokenKind::Output),
    ("int", TokenKind::Int),
    ("real", TokenKind::Real),
    ("endwhile", TokenKind::EndWhile),
    ("if", TokenKind::If),
    ("then", TokenKind::Then),
    ("endif", TokenKind::EndIf),
    ("read", TokenKind::Read),
    ("write", TokenKind::Write),
    ("return", TokenKind::Return),
    ("call", TokenKind::Call),
    ("record", TokenKind::Record),
    ("endrecord", TokenKind::EndRecord),
    ("else", TokenKind::Else),
];

const ALPHABET: usize = 26;

#[derive(Debug, Default)]
struct TrieNode {
    children: [Option<Box<TrieNode>>; ALPHABET],
    kind: Option<TokenKind>,
}

impl TrieNode {
    fn new() -> Self {
        Self::default()
    }
}

/// Trie mapping lowercase-letter words to reserved token kinds.
#[derive(Debug)]
pub struct KeywordTrie {
    root: TrieNode,
}

impl Default for KeywordTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
        }
    }

    /// Insert a word. Words must consist of lowercase letters only.
    pub fn insert(&mut self, word: &str, kind: TokenKind) {
        let mut current = &mut self.root;
        for b in word.bytes() {
            debug_assert!(b.is_ascii_lowercase(), "keyword byte out of range: {}", b);
            let index = (b - b'a') as usize;
            current = current.children[index].get_or_insert_with(|| Box::new(TrieNode::new()));
        }
        current.kind = Some(kind);
    }

    /// Look up a word; returns the reserved kind if present.
    pub fn lookup(&self, word: &str) -> Option<TokenKind> {
        let mut current = &self.root;
        for b in word.bytes() {
            if !b.is_ascii_lowercase() {
                return None;
            }
            let index = (b - b'a') as usize;
            current = current.children[index].as_deref()?;
        }
        current.kind
    }
}

/// The keyword trie, built once per process.
pub static KEYWORDS: Lazy<KeywordTrie> = Lazy::new(|| {
    let mut trie = KeywordTrie::new();
    for (word, kind) in RESERVED_WORDS {
        trie.insert(word, kind);
    }
    trie
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_reserved_words_resolve() {
        for (word, kind) in RESERVED_WORDS {
            assert_eq!(KEYWORDS.lookup(word), Some(kind), "word {:?}", word);
        }
    }

    #[test]
    fn test_non_keywords_miss() {
        assert_eq!(KEYWORDS.lookup("abc"), None);
        assert_eq!(KEYWORDS.lookup("en"), None); // proper prefix of "end"
        assert_eq!(KEYWORDS.lookup("endd"), None);
        assert_eq!(KEYWORDS.lookup(""), None);
    }

    #[test]
    fn test_prefix_words_are_distinct() {
        // "end", "endif", "endwhile", "endunion", "endrecord" share a prefix
        assert_eq!(KEYWORDS.lookup("end"), Some(TokenKind::End));
        assert_eq!(KEYWORDS.lookup("endif"), Some(TokenKind::EndIf));
        assert_eq!(KEYWORDS.lookup("endwhile"), Some(TokenKind::EndWhile));
        assert_eq!(KEYWORDS.lookup("endunion"), Some(TokenKind::EndUnion));
        assert_eq!(KEYWORDS.lookup("endrecord"), Some(TokenKind::EndRecord));
    }

    #[test]
    fn test_rejects_out_of_alphabet() {
        assert_eq!(KEYWORDS.lookup("End"), None);
        assert_eq!(KEYWORDS.lookup("end2"), None);
    }
}
