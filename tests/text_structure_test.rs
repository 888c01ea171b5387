//! End-to-end scenarios over the text-structure core: the per-line token
//! index, substring trimming, and deferred subtree expansion.

use svtext::lexing::lexer::lex_into_structure;
use svtext::lexing::tokens::TokenKind;
use svtext::text::syntax_tree::{leaf, node, NodeKind};
use svtext::text::testing::make_text_structure;
use svtext::text::text_structure::{DeferredExpansion, NodeExpansionMap, TextStructure};
use svtext::text::token::Token;
use svtext::text::token_stream::init_token_stream_view;
use svtext::text::tree_utils::{
    find_first_subtree_path, leftmost_leaf, rightmost_leaf, string_span_of_symbol,
};

#[test]
fn test_line_token_map() {
    let structure = lex_into_structure("a\nbc\ndef\n");
    let view = structure.data();

    // Entry i points at the first token starting on line i; the final
    // entry is the end of the token sequence.
    assert_eq!(view.line_token_map(), &[0, 2, 4, 6, 7]);

    let line0 = view.tokens_on_line(0);
    assert_eq!(line0[0].kind, TokenKind::Identifier);
    assert_eq!(line0[0].text(view.contents()), "a");
    assert_eq!(line0.last().unwrap().kind, TokenKind::Newline);

    let line1 = view.tokens_on_line(1);
    assert_eq!(line1[0].text(view.contents()), "bc");

    let line2 = view.tokens_on_line(2);
    assert_eq!(line2[0].text(view.contents()), "def");

    // The trailing empty line holds only the EOF sentinel.
    let line3 = view.tokens_on_line(3);
    assert_eq!(line3.len(), 1);
    assert!(line3[0].is_eof());
}

#[test]
fn test_trim_to_substring() {
    let mut structure = make_text_structure(
        "hello world",
        &[
            (TokenKind::Identifier, 0, 5),
            (TokenKind::Whitespace, 5, 6),
            (TokenKind::Identifier, 6, 11),
        ],
    );
    structure
        .mutable_data()
        .focus_on_subtree_spanning_substring(6, 5);

    let view = structure.data();
    assert_eq!(view.contents(), "world");
    assert_eq!(
        view.token_stream(),
        &vec![Token::new(TokenKind::Identifier, 0..5), Token::eof(5)]
    );
    structure.internal_consistency_check().unwrap();
}

#[test]
fn test_trim_narrows_tree_and_line_map() {
    let mut structure = make_text_structure(
        "aa bb\ncc\n",
        &[
            (TokenKind::Identifier, 0, 2),
            (TokenKind::Whitespace, 2, 3),
            (TokenKind::Identifier, 3, 5),
            (TokenKind::Newline, 5, 6),
            (TokenKind::Identifier, 6, 8),
            (TokenKind::Newline, 8, 9),
        ],
    );
    *structure.mutable_data().mutable_syntax_tree() = node(
        NodeKind::StatementList,
        vec![
            node(
                NodeKind::Statement,
                vec![
                    leaf(Token::new(TokenKind::Identifier, 0..2)),
                    leaf(Token::new(TokenKind::Identifier, 3..5)),
                ],
            ),
            node(
                NodeKind::Statement,
                vec![leaf(Token::new(TokenKind::Identifier, 6..8))],
            ),
        ],
    );

    structure
        .mutable_data()
        .focus_on_subtree_spanning_substring(6, 3);

    let view = structure.data();
    assert_eq!(view.contents(), "cc\n");
    // The surviving subtree is the second statement, rebased.
    let root = view.syntax_tree().as_deref().unwrap();
    assert_eq!(string_span_of_symbol(root), Some(0..2));
    assert_eq!(leftmost_leaf(root).unwrap().token.extent, 0..2);
    assert_eq!(rightmost_leaf(root).unwrap().token.extent, 0..2);
    // Two lines ("cc" and the trailing empty one).
    assert_eq!(view.line_token_map().first(), Some(&0));
    assert_eq!(
        view.line_token_map().last(),
        Some(&view.token_stream().len())
    );
    structure.internal_consistency_check().unwrap();
}

// Builds the subanalysis of "1+2" as an expression.
fn subanalysis_of_expression() -> TextStructure {
    let mut sub = TextStructure::new("1+2");
    let view = sub.mutable_data();
    view.mutable_token_stream().extend([
        Token::new(TokenKind::DecNumber, 0..1),
        Token::new(TokenKind::Plus, 1..2),
        Token::new(TokenKind::DecNumber, 2..3),
        Token::eof(3),
    ]);
    *view.mutable_token_stream_view() = init_token_stream_view(view.token_stream());
    *view.mutable_syntax_tree() = node(
        NodeKind::Expression,
        vec![
            leaf(Token::new(TokenKind::DecNumber, 0..1)),
            leaf(Token::new(TokenKind::Plus, 1..2)),
            leaf(Token::new(TokenKind::DecNumber, 2..3)),
        ],
    );
    view.calculate_first_tokens_per_line();
    sub.internal_consistency_check().unwrap();
    sub
}

#[test]
fn test_expand_subtrees_splices_tokens_and_tree() {
    // Parent "`M(1+2)\n" analyzed with the macro argument left unexpanded.
    let mut parent = make_text_structure(
        "`M(1+2)\n",
        &[
            (TokenKind::MacroIdentifier, 0, 2),
            (TokenKind::LParen, 2, 3),
            (TokenKind::MacroArg, 3, 6),
            (TokenKind::RParen, 6, 7),
            (TokenKind::Newline, 7, 8),
        ],
    );
    *parent.mutable_data().mutable_syntax_tree() = node(
        NodeKind::MacroCall,
        vec![
            leaf(Token::new(TokenKind::MacroIdentifier, 0..2)),
            leaf(Token::new(TokenKind::LParen, 2..3)),
            leaf(Token::new(TokenKind::MacroArg, 3..6)),
            leaf(Token::new(TokenKind::RParen, 6..7)),
        ],
    );

    let insertion_point = find_first_subtree_path(parent.data().syntax_tree(), &|symbol| {
        symbol
            .as_leaf()
            .is_some_and(|l| l.token.kind == TokenKind::MacroArg)
    })
    .unwrap();
    assert_eq!(insertion_point, vec![2]);

    let mut expansions = NodeExpansionMap::new();
    expansions.insert(
        3,
        DeferredExpansion {
            insertion_point,
            subanalysis: subanalysis_of_expression(),
        },
    );
    parent.mutable_data().expand_subtrees(&mut expansions);

    let view = parent.data();
    assert_eq!(
        view.token_stream(),
        &vec![
            Token::new(TokenKind::MacroIdentifier, 0..2),
            Token::new(TokenKind::LParen, 2..3),
            Token::new(TokenKind::DecNumber, 3..4),
            Token::new(TokenKind::Plus, 4..5),
            Token::new(TokenKind::DecNumber, 5..6),
            Token::new(TokenKind::RParen, 6..7),
            Token::new(TokenKind::Newline, 7..8),
            Token::eof(8),
        ]
    );

    // The expression subtree was spliced where the MacroArg leaf was.
    let root = view.syntax_tree().as_deref().unwrap();
    let macro_call = root.expect_node();
    assert_eq!(macro_call.kind, NodeKind::MacroCall);
    let spliced_symbol = macro_call.children[2].as_deref().unwrap();
    let spliced = spliced_symbol.expect_node();
    assert_eq!(spliced.kind, NodeKind::Expression);
    assert_eq!(string_span_of_symbol(spliced_symbol), Some(3..6));
    assert_eq!(string_span_of_symbol(root), Some(0..7));

    // The filtered view points at the spliced tokens in order.
    let texts: Vec<&str> = view
        .token_stream_view()
        .iter()
        .map(|&i| view.token_stream()[i].text(view.contents()))
        .collect();
    assert_eq!(texts, vec!["`M", "(", "1", "+", "2", ")", ""]);

    parent.internal_consistency_check().unwrap();
}

#[test]
#[should_panic(expected = "does not match the parent slice")]
fn test_expand_subtrees_rejects_mismatched_text() {
    let mut parent = make_text_structure(
        "`M(1+2)\n",
        &[
            (TokenKind::MacroIdentifier, 0, 2),
            (TokenKind::LParen, 2, 3),
            (TokenKind::MacroArg, 3, 6),
            (TokenKind::RParen, 6, 7),
            (TokenKind::Newline, 7, 8),
        ],
    );
    *parent.mutable_data().mutable_syntax_tree() = node(
        NodeKind::MacroCall,
        vec![leaf(Token::new(TokenKind::MacroArg, 3..6))],
    );

    let mut sub = TextStructure::new("9-9"); // not the text at offset 3
    let view = sub.mutable_data();
    view.mutable_token_stream().extend([
        Token::new(TokenKind::DecNumber, 0..1),
        Token::eof(3),
    ]);
    view.calculate_first_tokens_per_line();

    let mut expansions = NodeExpansionMap::new();
    expansions.insert(
        3,
        DeferredExpansion {
            insertion_point: vec![0],
            subanalysis: sub,
        },
    );
    parent.mutable_data().expand_subtrees(&mut expansions);
}

#[test]
fn test_rebase_invariant() {
    // After rebasing with offset k, an extent [a, b) becomes [k+a, k+b).
    let parent = TextStructure::new("xx 1+2 yy");
    let mut sub = TextStructure::new("1+2");
    let view = sub.mutable_data();
    view.mutable_token_stream().extend([
        Token::new(TokenKind::DecNumber, 0..1),
        Token::new(TokenKind::Plus, 1..2),
        Token::new(TokenKind::DecNumber, 2..3),
        Token::eof(3),
    ]);
    let parent_view = parent.data();
    sub.mutable_data().rebase_tokens_to_superstring(
        std::sync::Arc::from(parent_view.contents()),
        0..parent_view.contents().len(),
        3,
    );
    let rebased = sub.data();
    assert_eq!(rebased.token_stream()[0].extent, 3..4);
    assert_eq!(rebased.token_stream()[2].extent, 5..6);
    assert_eq!(rebased.token_stream()[0].text(rebased.contents()), "1");
}
