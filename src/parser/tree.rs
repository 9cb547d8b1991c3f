//! Parse tree storage and output.
//!
//! Nodes live in an arena indexed by `NodeId`; children are growable arrays
//! kept in left-to-right rule order, so no parent pointers are needed: the
//! traversal passes the parent down as a visitor argument. Rows print in
//! left-root-rest order, first child before the node, remaining children
//! after it.

use crate::frontend::symtab::SymbolEntry;
use crate::frontend::token::TokenKind;
use crate::parser::grammar::{GrammarSymbol, NonTerminal};
use std::io::{self, Write};
use std::rc::Rc;

/// Index of a node within its tree's arena.
pub type NodeId = usize;

/// Initial capacity of a node's child list; it doubles on overflow.
const INIT_CHILD_CAPACITY: usize = 4;

/// A node of the parse tree.
#[derive(Debug, Clone)]
pub struct ParseNode {
    /// The grammar symbol this node is labeled with
    pub symbol: GrammarSymbol,
    /// Children in left-to-right rule order (empty for leaves)
    pub children: Vec<NodeId>,
    /// Source line of the token that created or expanded this node
    pub line: usize,
    /// For terminal leaves, the symbol-table entry of the matched token (or
    /// a synthetic entry for epsilon leaves)
    pub entry: Option<Rc<SymbolEntry>>,
}

impl ParseNode {
    fn new(symbol: GrammarSymbol) -> Self {
        Self {
            symbol,
            children: Vec::with_capacity(INIT_CHILD_CAPACITY),
            line: 0,
            entry: None,
        }
    }

    /// Check whether this node is a leaf (labeled by a terminal).
    pub fn is_leaf(&self) -> bool {
        !self.symbol.is_non_terminal()
    }
}

/// A parse tree rooted at the start non-terminal.
#[derive(Debug, Clone)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: NodeId,
}

impl ParseTree {
    /// Create a tree holding only a root labeled with the start symbol.
    pub fn new(start: NonTerminal) -> Self {
        Self {
            nodes: vec![ParseNode::new(GrammarSymbol::NonTerminal(start))],
            root: 0,
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id]
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut ParseNode {
        &mut self.nodes[id]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Append a new child under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, symbol: GrammarSymbol) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ParseNode::new(symbol));
        self.nodes[parent].children.push(id);
        id
    }

    /// Visit every node in left-root-rest order: the first child, then the
    /// node itself, then the remaining children. The parent is passed to the
    /// visitor (None at the root).
    pub fn traverse<F>(&self, visitor: &mut F)
    where
        F: FnMut(&ParseNode, Option<&ParseNode>),
    {
        self.traverse_from(self.root, None, visitor);
    }

    fn traverse_from<F>(&self, id: NodeId, parent: Option<NodeId>, visitor: &mut F)
    where
        F: FnMut(&ParseNode, Option<&ParseNode>),
    {
        let node = self.node(id);
        if let Some(&first) = node.children.first() {
            self.traverse_from(first, Some(id), visitor);
        }
        visitor(node, parent.map(|p| self.node(p)));
        for &child in node.children.iter().skip(1) {
            self.traverse_from(child, Some(id), visitor);
        }
    }

    /// Write the tree as one row per node in traversal order.
    pub fn write_listing(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{:>32} {:>12} {:>16} {:>20} {:>30} {:>12} {:>30}\n",
            "lexeme",
            "lineNumber",
            "tokenName",
            "valueIfNumber",
            "parentNodeSymbol",
            "isLeafNode",
            "nodeSymbol"
        )?;
        let mut result = Ok(());
        self.traverse(&mut |node, parent| {
            if result.is_ok() {
                result = write_row(&mut *out, node, parent);
            }
        });
        result
    }
}

fn write_row(
    out: &mut impl Write,
    node: &ParseNode,
    parent: Option<&ParseNode>,
) -> io::Result<()> {
    let lexeme: &str = match (&node.entry, node.is_leaf()) {
        (Some(entry), true) => &entry.lexeme,
        _ => "-----",
    };
    let token_name = match (&node.entry, node.is_leaf()) {
        (Some(entry), true) => entry.kind.name(),
        _ => "-----",
    };
    let value = match &node.entry {
        Some(entry) if entry.kind == TokenKind::Num => format!("{:>20}", entry.value as i64),
        Some(entry) if entry.kind == TokenKind::Rnum => format!("{:>20.2}", entry.value),
        _ => format!("{:>20}", "Not number "),
    };
    let parent_name = match parent {
        Some(p) => match p.symbol {
            GrammarSymbol::NonTerminal(nt) => nt.name(),
            GrammarSymbol::Terminal(tk) => tk.name(),
        },
        None => "ROOT",
    };
    let leaf_flag = if node.is_leaf() { "YES" } else { "NO" };
    let node_symbol = match node.symbol {
        GrammarSymbol::NonTerminal(nt) => nt.name(),
        GrammarSymbol::Terminal(_) => "-----",
    };
    writeln!(
        out,
        "{:>32} {:>12} {:>16} {} {:>30} {:>12} {:>30}",
        lexeme, node.line, token_name, value, parent_name, leaf_flag, node_symbol
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::NonTerminal;

    fn leaf_entry(lexeme: &str, kind: TokenKind, value: f64) -> Rc<SymbolEntry> {
        Rc::new(SymbolEntry::new(lexeme, kind, value))
    }

    #[test]
    fn test_add_children_in_order() {
        let mut tree = ParseTree::new(NonTerminal::Program);
        let a = tree.add_child(tree.root(), GrammarSymbol::Terminal(TokenKind::Main));
        let b = tree.add_child(tree.root(), GrammarSymbol::NonTerminal(NonTerminal::Stmts));
        assert_eq!(tree.node(tree.root()).children, vec![a, b]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_left_root_rest_order() {
        // root with children [x, y, z]: order must be x, root, y, z
        let mut tree = ParseTree::new(NonTerminal::Program);
        let root = tree.root();
        for kind in [TokenKind::Main, TokenKind::Sem, TokenKind::End] {
            let id = tree.add_child(root, GrammarSymbol::Terminal(kind));
            tree.node_mut(id).entry = Some(leaf_entry(kind.name(), kind, 0.0));
        }
        let mut seen = Vec::new();
        tree.traverse(&mut |node, _| {
            seen.push(node.symbol);
        });
        assert_eq!(
            seen,
            vec![
                GrammarSymbol::Terminal(TokenKind::Main),
                GrammarSymbol::NonTerminal(NonTerminal::Program),
                GrammarSymbol::Terminal(TokenKind::Sem),
                GrammarSymbol::Terminal(TokenKind::End),
            ]
        );
    }

    #[test]
    fn test_traversal_passes_parent() {
        let mut tree = ParseTree::new(NonTerminal::Program);
        let mid = tree.add_child(tree.root(), GrammarSymbol::NonTerminal(NonTerminal::Stmts));
        tree.add_child(mid, GrammarSymbol::Terminal(TokenKind::Sem));
        let mut parents = Vec::new();
        tree.traverse(&mut |node, parent| {
            parents.push((node.symbol, parent.map(|p| p.symbol)));
        });
        assert!(parents.contains(&(
            GrammarSymbol::Terminal(TokenKind::Sem),
            Some(GrammarSymbol::NonTerminal(NonTerminal::Stmts))
        )));
        assert!(parents.contains(&(GrammarSymbol::NonTerminal(NonTerminal::Program), None)));
    }

    #[test]
    fn test_listing_rows() {
        let mut tree = ParseTree::new(NonTerminal::Program);
        let num = tree.add_child(tree.root(), GrammarSymbol::Terminal(TokenKind::Num));
        {
            let node = tree.node_mut(num);
            node.entry = Some(leaf_entry("42", TokenKind::Num, 42.0));
            node.line = 3;
        }
        let mut out = Vec::new();
        tree.write_listing(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // header, blank, leaf row, root row
        assert!(lines[0].contains("lexeme"));
        assert!(lines[2].contains("42"));
        assert!(lines[2].contains("TK_NUM"));
        assert!(lines[2].contains("YES"));
        assert!(lines[3].contains("ROOT"));
        assert!(lines[3].contains("<program>"));
        assert!(lines[3].contains("Not number"));
    }

    #[test]
    fn test_rnum_value_two_decimals() {
        let mut tree = ParseTree::new(NonTerminal::Program);
        let r = tree.add_child(tree.root(), GrammarSymbol::Terminal(TokenKind::Rnum));
        tree.node_mut(r).entry = Some(leaf_entry("4.56", TokenKind::Rnum, 4.56));
        let mut out = Vec::new();
        tree.write_listing(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("4.56"));
    }
}
