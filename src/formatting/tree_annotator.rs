//! Pairs pre-format tokens with syntax-tree context during annotation.
//!
//! The syntax tree's leaves are visited in order while an ancestor-tag
//! context stack is maintained; each leaf is matched against the next
//! pre-format token so that the annotation callback sees the context of the
//! token on the right of each pair. Format tokens with no corresponding
//! leaf (e.g. comments, which the parser never sees) are annotated with the
//! context of the most recent leaf.

use crate::text::syntax_tree::ConcreteSyntaxTree;
use crate::text::tree_context::{visit_leaves_with_context, SyntaxTreeContext};

use super::format_token::PreFormatToken;

/// Walks `tree`'s leaves with context and annotates each token of
/// `ftokens` (after the first) against its predecessor by calling
/// `annotate(prev, curr, context)`.
///
/// Tokens are consumed in order: when the next format token matches the
/// visited leaf's token it takes that leaf's context; tokens in between
/// (absent from the tree) inherit the context current at that point. Any
/// tokens remaining after the last leaf are annotated with an empty
/// context.
pub fn annotate_format_tokens_using_syntax_context(
    tree: &ConcreteSyntaxTree,
    ftokens: &mut [PreFormatToken],
    _base_text: &str,
    annotate: &mut dyn FnMut(&PreFormatToken, &mut PreFormatToken, &SyntaxTreeContext),
) {
    let mut next_index = 0;

    visit_leaves_with_context(tree, &mut |leaf, context| {
        // Annotate unmatched tokens (not represented in the tree) with the
        // current context, then the leaf's own token.
        while next_index < ftokens.len() {
            let is_leaf_token = ftokens[next_index].token == leaf.token;
            annotate_at(ftokens, next_index, context, annotate);
            next_index += 1;
            if is_leaf_token {
                break;
            }
        }
    });

    // Tokens beyond the last leaf (trailing comments and the like).
    let empty_context = SyntaxTreeContext::new();
    while next_index < ftokens.len() {
        annotate_at(ftokens, next_index, &empty_context, annotate);
        next_index += 1;
    }
}

fn annotate_at(
    ftokens: &mut [PreFormatToken],
    index: usize,
    context: &SyntaxTreeContext,
    annotate: &mut dyn FnMut(&PreFormatToken, &mut PreFormatToken, &SyntaxTreeContext),
) {
    if index == 0 {
        return; // the first token has no predecessor to annotate against
    }
    let (head, tail) = ftokens.split_at_mut(index);
    annotate(&head[index - 1], &mut tail[0], context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::tokens::TokenKind;
    use crate::text::syntax_tree::{leaf, node, NodeKind};
    use crate::text::token::Token;

    fn ftokens_of(tokens: &[Token]) -> Vec<PreFormatToken> {
        tokens.iter().cloned().map(PreFormatToken::new).collect()
    }

    #[test]
    fn test_contexts_seen_per_token() {
        // Tree for "!x": Expression( Unary( '!', 'x' ) )
        let bang = Token::new(TokenKind::Bang, 0..1);
        let ident = Token::new(TokenKind::Identifier, 1..2);
        let tree = node(
            NodeKind::Expression,
            vec![node(
                NodeKind::UnaryPrefixExpression,
                vec![leaf(bang.clone()), leaf(ident.clone())],
            )],
        );
        let mut ftokens = ftokens_of(&[bang, ident]);
        let mut seen = Vec::new();
        annotate_format_tokens_using_syntax_context(
            &tree,
            &mut ftokens,
            "!x",
            &mut |prev, curr, context| {
                seen.push((prev.token.kind, curr.token.kind, context.top()));
            },
        );
        assert_eq!(
            seen,
            vec![(
                TokenKind::Bang,
                TokenKind::Identifier,
                Some(NodeKind::UnaryPrefixExpression)
            )]
        );
    }

    #[test]
    fn test_tokens_absent_from_tree_inherit_context() {
        // "x /*c*/ y" where the comment is not in the tree.
        let x = Token::new(TokenKind::Identifier, 0..1);
        let comment = Token::new(TokenKind::BlockComment, 2..7);
        let y = Token::new(TokenKind::Identifier, 8..9);
        let tree = node(
            NodeKind::Expression,
            vec![leaf(x.clone()), leaf(y.clone())],
        );
        let mut ftokens = ftokens_of(&[x, comment, y]);
        let mut seen = Vec::new();
        annotate_format_tokens_using_syntax_context(
            &tree,
            &mut ftokens,
            "x /*c*/ y",
            &mut |_, curr, context| {
                seen.push((curr.token.kind, context.top()));
            },
        );
        assert_eq!(
            seen,
            vec![
                (TokenKind::BlockComment, Some(NodeKind::Expression)),
                (TokenKind::Identifier, Some(NodeKind::Expression)),
            ]
        );
    }

    #[test]
    fn test_no_tree_annotates_with_empty_context() {
        let a = Token::new(TokenKind::Identifier, 0..1);
        let b = Token::new(TokenKind::Semicolon, 1..2);
        let mut ftokens = ftokens_of(&[a, b]);
        let mut count = 0;
        annotate_format_tokens_using_syntax_context(
            &None,
            &mut ftokens,
            "x;",
            &mut |_, _, context| {
                assert!(context.is_empty());
                count += 1;
            },
        );
        assert_eq!(count, 1);
    }
}
