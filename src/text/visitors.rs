//! Visitor protocols over syntax trees.
//!
//! Two traversal contracts exist:
//!
//! - *Recursive* visitors are handed a symbol and are expected to recurse
//!   into children themselves (via [`SyntaxTreeNode::visit_children`] or
//!   manually); this lets a search stop early or skip subtrees. Used for
//!   search and printing.
//! - *Single-level* visitors never recurse; the caller drives traversal.
//!   Context-aware walks that push/pop a [`SyntaxTreeContext`] stack are
//!   built on this contract (see
//!   [`tree_context`](super::tree_context)).
//!
//! Both contracts must skip absent (`None`) children without disturbing the
//! ranks of their siblings.

use std::fmt;

use super::syntax_tree::{ConcreteSyntaxTree, Symbol, SyntaxTreeLeaf, SyntaxTreeNode};
#[cfg(doc)]
use super::tree_context::SyntaxTreeContext;

/// Observing visitor; implementations recurse into children themselves.
pub trait TreeVisitorRecursive {
    fn visit_node(&mut self, node: &SyntaxTreeNode);
    fn visit_leaf(&mut self, leaf: &SyntaxTreeLeaf);
}

/// Mutating visitor; receives the owning slot so it may replace or remove
/// the subtree in place. Implementations recurse themselves.
pub trait MutableTreeVisitorRecursive {
    fn visit(&mut self, slot: &mut ConcreteSyntaxTree);
}

/// Single-level visitor: never recurses, the caller drives traversal.
pub trait SymbolVisitor {
    fn visit_node(&mut self, node: &SyntaxTreeNode);
    fn visit_leaf(&mut self, leaf: &SyntaxTreeLeaf);
}

impl Symbol {
    /// One-level dispatch to the matching visit method.
    pub fn accept<V: TreeVisitorRecursive + ?Sized>(&self, visitor: &mut V) {
        match self {
            Symbol::Node(node) => visitor.visit_node(node),
            Symbol::Leaf(leaf) => visitor.visit_leaf(leaf),
        }
    }
}

impl SyntaxTreeNode {
    /// Dispatches the visitor over every present child, in rank order.
    pub fn visit_children<V: TreeVisitorRecursive + ?Sized>(&self, visitor: &mut V) {
        for child in self.children.iter().flatten() {
            child.accept(visitor);
        }
    }
}

/// Renders a tree with one symbol per line, children indented, absent
/// children appearing as gaps in the child-rank sequence.
pub struct RawTreePrinter<'a> {
    root: &'a Symbol,
}

impl<'a> RawTreePrinter<'a> {
    pub fn new(root: &'a Symbol) -> Self {
        Self { root }
    }
}

struct RawSymbolPrinter<'f, 'w> {
    formatter: &'f mut fmt::Formatter<'w>,
    indent: usize,
    child_rank: usize,
    result: fmt::Result,
}

impl RawSymbolPrinter<'_, '_> {
    fn record(&mut self, result: fmt::Result) {
        if self.result.is_ok() {
            self.result = result;
        }
    }
}

impl TreeVisitorRecursive for RawSymbolPrinter<'_, '_> {
    fn visit_leaf(&mut self, leaf: &SyntaxTreeLeaf) {
        let line = format!(
            "{:indent$}Leaf @{} ({:?} @{}..{})",
            "",
            self.child_rank,
            leaf.token.kind,
            leaf.token.left(),
            leaf.token.right(),
            indent = self.indent
        );
        let result = writeln!(self.formatter, "{}", line);
        self.record(result);
    }

    fn visit_node(&mut self, node: &SyntaxTreeNode) {
        let open = format!(
            "{:indent$}Node @{} ({:?}) {{",
            "",
            self.child_rank,
            node.kind,
            indent = self.indent
        );
        let result = writeln!(self.formatter, "{}", open);
        self.record(result);

        let saved_indent = self.indent;
        let saved_rank = self.child_rank;
        self.indent += 2;
        self.child_rank = 0;
        for child in &node.children {
            if let Some(child) = child {
                child.accept(self);
            }
            // Absent children appear as gaps in the child rank sequence.
            self.child_rank += 1;
        }
        self.indent = saved_indent;
        self.child_rank = saved_rank;

        let close = format!("{:indent$}}}", "", indent = self.indent);
        let result = writeln!(self.formatter, "{}", close);
        self.record(result);
    }
}

impl fmt::Display for RawTreePrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = RawSymbolPrinter {
            formatter: f,
            indent: 0,
            child_rank: 0,
            result: Ok(()),
        };
        self.root.accept(&mut printer);
        printer.result
    }
}
