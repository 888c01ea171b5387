//! Token sequences and filtered views.
//!
//! A `TokenStreamView` is the subset of a `TokenSequence` passed to the
//! parser (whitespace and most comments removed). It stores indices into the
//! sequence rather than references: indices survive reallocation when the
//! sequence is rebuilt, which the trim and expansion operations depend on.

use super::token::Token;

/// Ordered sequence of tokens, terminated by an EOF sentinel.
pub type TokenSequence = Vec<Token>;

/// Ordered indices into a `TokenSequence`, representing a filtered subset.
pub type TokenStreamView = Vec<usize>;

/// Returns a view containing every token of the sequence.
pub fn init_token_stream_view(tokens: &TokenSequence) -> TokenStreamView {
    (0..tokens.len()).collect()
}

/// Removes from the view the tokens that do not satisfy the keep predicate.
/// May be composed successively with different predicates.
pub fn filter_token_stream_view_in_place(
    tokens: &TokenSequence,
    view: &mut TokenStreamView,
    keep: impl Fn(&Token) -> bool,
) {
    view.retain(|&index| keep(&tokens[index]));
}

/// Appends an EOF sentinel anchored at the last token's end, unless the
/// sequence is empty or already terminated.
pub fn terminate_token_stream(tokens: &mut TokenSequence) {
    match tokens.last() {
        None => {}
        Some(last) if last.is_eof() => {}
        Some(last) => {
            let end = last.right();
            tokens.push(Token::eof(end));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::tokens::TokenKind;

    fn sample() -> TokenSequence {
        vec![
            Token::new(TokenKind::Identifier, 0..5),
            Token::new(TokenKind::Whitespace, 5..6),
            Token::new(TokenKind::Identifier, 6..11),
            Token::eof(11),
        ]
    }

    #[test]
    fn test_init_view() {
        let tokens = sample();
        assert_eq!(init_token_stream_view(&tokens), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_view() {
        let tokens = sample();
        let mut view = init_token_stream_view(&tokens);
        filter_token_stream_view_in_place(&tokens, &mut view, |t| {
            t.kind != TokenKind::Whitespace
        });
        assert_eq!(view, vec![0, 2, 3]);
        // Filtering is idempotent.
        filter_token_stream_view_in_place(&tokens, &mut view, |t| {
            t.kind != TokenKind::Whitespace
        });
        assert_eq!(view, vec![0, 2, 3]);
    }

    #[test]
    fn test_filters_compose() {
        let tokens = sample();
        let mut view = init_token_stream_view(&tokens);
        filter_token_stream_view_in_place(&tokens, &mut view, |t| {
            t.kind != TokenKind::Whitespace
        });
        filter_token_stream_view_in_place(&tokens, &mut view, |t| !t.is_eof());
        assert_eq!(view, vec![0, 2]);
    }

    #[test]
    fn test_terminate() {
        let mut tokens = vec![Token::new(TokenKind::Identifier, 0..5)];
        terminate_token_stream(&mut tokens);
        assert_eq!(tokens.last(), Some(&Token::eof(5)));
        // Idempotent: a terminated stream is left alone.
        terminate_token_stream(&mut tokens);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_terminate_empty_is_noop() {
        let mut tokens = TokenSequence::new();
        terminate_token_stream(&mut tokens);
        assert!(tokens.is_empty());
    }
}
