//! The text-structure data model: tokens with byte extents, the concrete
//! syntax tree, and the `TextStructureView` that keeps them consistent.

pub mod syntax_tree;
pub mod testing;
pub mod text_structure;
pub mod token;
pub mod token_stream;
pub mod tree_context;
pub mod tree_utils;
pub mod visitors;

pub use syntax_tree::{
    leaf, node, ConcreteSyntaxTree, NodeKind, Symbol, SymbolKind, SyntaxTreeLeaf, SyntaxTreeNode,
};
pub use text_structure::{DeferredExpansion, NodeExpansionMap, TextStructure, TextStructureView};
pub use token::{LexicalError, Token};
pub use token_stream::{TokenSequence, TokenStreamView};
pub use tree_context::SyntaxTreeContext;
