//! Inter-token spacing and break annotation.
//!
//! Given two adjacent pre-format tokens and the syntax-tree context of the
//! right token, the annotator assigns the number of spaces required between
//! them, a penalty for breaking the line there, and a break decision. Each
//! of the three is computed by a cascade of rules in which the first match
//! wins; every rule returns a [`WithReason`] so the ordering stays
//! auditable from top to bottom.

use crate::lexing::tokens::{
    is_comment, is_end_keyword, is_keyword_callable, is_preprocessor_keyword, is_unary_operator,
    FormatTokenClass, TokenKind,
};
use crate::text::syntax_tree::NodeKind;
use crate::text::tree_context::SyntaxTreeContext;
use crate::util::with_reason::WithReason;

use super::format_token::{PreFormatToken, SpacingOptions};
use super::style::FormatStyle;

// Signals that spacing was not explicitly handled in the cascade.
const UNHANDLED_SPACES_REQUIRED: i64 = -1;

use FormatTokenClass as FTC;

fn is_unary_prefix_expression_operand(
    left: &PreFormatToken,
    context: &SyntaxTreeContext,
) -> bool {
    is_unary_operator(left.token.kind)
        && context.is_inside_first(
            &[NodeKind::UnaryPrefixExpression],
            &[NodeKind::Expression],
        )
}

fn is_inside_numeric_literal(left: &PreFormatToken, right: &PreFormatToken) -> bool {
    (left.class == FTC::NumericLiteral && right.class == FTC::NumericBase)
        || left.class == FTC::NumericBase
}

// The following combinations cannot be merged without a space:
//   number number : would lex as one different number
//   number id/kw  : would lex as a bad identifier
//   id/kw number  : would lex as a (different) identifier
//   id/kw id/kw   : would lex as a (different) identifier
fn pairwise_nonmergeable(ftoken: &PreFormatToken) -> bool {
    ftoken.token.kind == TokenKind::DecNumber
        || ftoken.class == FTC::Identifier
        || ftoken.class == FTC::Keyword
}

fn in_range_like_context(context: &SyntaxTreeContext) -> bool {
    context.is_inside_first(
        &[
            NodeKind::SelectVariableDimension,
            NodeKind::DimensionRange,
            NodeKind::DimensionSlice,
        ],
        &[],
    )
}

// Minimum spaces required between left and right. Returning
// UNHANDLED_SPACES_REQUIRED leaves the decision to the caller's default.
// Higher-precedence rules come earlier.
fn spaces_required_between(
    style: &FormatStyle,
    left: &PreFormatToken,
    right: &PreFormatToken,
    context: &SyntaxTreeContext,
    base_text: &str,
) -> WithReason<i64> {
    let l = left.token.kind;
    let r = right.token.kind;

    if l == TokenKind::EscapedIdentifier {
        return WithReason::new(1, "escaped identifiers must end with whitespace");
    }

    if right.class == FTC::EolComment || right.class == FTC::BlockComment {
        return WithReason::new(
            style.spaces_before_comment as i64,
            "style: require spaces before comments",
        );
    }

    if left.class == FTC::OpenGroup || right.class == FTC::CloseGroup {
        return WithReason::new(
            0,
            "prefer \"(foo)\" over \"( foo )\", \"[x]\" over \"[ x ]\"",
        );
    }

    // Leave [expressions] inside scalar and range dimensions alone, except
    // for the spacing before '[' and around ':', covered elsewhere.
    if context.is_inside_first(
        &[NodeKind::DimensionRange, NodeKind::DimensionScalar],
        &[],
    ) && r != TokenKind::LBracket
        && l != TokenKind::Colon
        && r != TokenKind::Colon
    {
        return WithReason::new(
            UNHANDLED_SPACES_REQUIRED,
            "preserve spacing inside dimensions",
        );
    }

    // Unary operators (context-sensitive).
    if is_unary_prefix_expression_operand(left, context)
        && (left.class != FTC::BinaryOperator || !is_unary_operator(r))
    {
        return WithReason::new(0, "bind unary prefix operator close to its operand");
    }

    if l == TokenKind::ScopeRes {
        return WithReason::new(0, "prefer \"::id\" over \":: id\"");
    }

    // Delimiters, list separators.
    if r == TokenKind::Comma {
        return WithReason::new(0, "no space before comma");
    }
    if l == TokenKind::Comma {
        return WithReason::new(1, "require space after comma");
    }
    if r == TokenKind::Semicolon {
        if l == TokenKind::Colon {
            return WithReason::new(1, "space between colon and semicolon (\"default: ;\")");
        }
        return WithReason::new(0, "no space before semicolon");
    }
    if l == TokenKind::Semicolon {
        return WithReason::new(1, "require space after semicolon");
    }

    if context.is_inside_first(&[NodeKind::StreamingConcatenation], &[]) {
        if l == TokenKind::Shl || l == TokenKind::Shr {
            return WithReason::new(0, "no space around streaming operators");
        }
        if left.class == FTC::NumericLiteral
            || left.class == FTC::Identifier
            || left.class == FTC::Keyword
        {
            return WithReason::new(0, "no space around streaming operator slice size");
        }
    }

    // "@(" over "@ (", "@*" over "@ *" for event controls.
    if l == TokenKind::At {
        return WithReason::new(0, "no space after \"@\"");
    }
    if r == TokenKind::At {
        return WithReason::new(1, "space before \"@\"");
    }

    // Do not force space between a unary operator and '{'.
    if context.is_inside_first(&[NodeKind::UnaryPrefixExpression], &[])
        && is_unary_operator(l)
        && r == TokenKind::LBrace
    {
        return WithReason::new(0, "no space between unary and concatenation operators");
    }

    // Assignment operators get the binary-operator treatment:
    // "assign foo = bar;" over "assign foo =bar;".
    if left.class == FTC::BinaryOperator || right.class == FTC::BinaryOperator {
        return WithReason::new(1, "space around binary and assignment operators");
    }

    // Tokens without surface form (like some preprocessor sentinels) get no
    // additional spacing on either side.
    if left.token.is_empty() || right.token.is_empty() {
        return WithReason::new(0, "no additional space around empty-text tokens");
    }

    // "16'h123" over "16 'h123" and "16'h 123".
    if is_inside_numeric_literal(left, right) {
        return WithReason::new(0, "no space inside based numeric literals");
    }

    // Hierarchy separators: "a.b", "a::b".
    if left.class == FTC::Hierarchy || right.class == FTC::Hierarchy {
        return WithReason::new(0, "no space separating hierarchy components");
    }

    // Cast operator, e.g. "void'(...)".
    if l == TokenKind::Apostrophe || r == TokenKind::Apostrophe {
        return WithReason::new(0, "no space around the cast operator");
    }

    if r == TokenKind::LParen {
        // "#(" for parameter formals and arguments.
        if l == TokenKind::Hash {
            return WithReason::new(0, "fuse \"#(\"");
        }
        // ") (" between parameter and port formals.
        if l == TokenKind::RParen {
            return WithReason::new(1, "separate \") (\" between parameters and ports");
        }
        if left.class == FTC::Identifier || is_keyword_callable(l) {
            if context.is_inside(NodeKind::ActualNamedPort) || context.is_inside(NodeKind::Port)
            {
                return WithReason::new(0, "named port: no space between id and '('");
            }
            if context.is_inside(NodeKind::GateInstance) {
                return WithReason::new(1, "module instance: space between id and '('");
            }
            if context.is_inside(NodeKind::ModuleHeader) {
                return WithReason::new(1, "module declaration: space between id and '('");
            }
            // Covers function, task, and macro calls.
            return WithReason::new(0, "function/constructor calls: no space before '('");
        }
    }

    if l == TokenKind::RBrace {
        return WithReason::new(1, "space after '}'");
    }
    if r == TokenKind::LBrace {
        if left.class == FTC::Keyword {
            return WithReason::new(1, "space between keyword and '{'");
        }
        if context.direct_parents_are(&[NodeKind::BraceGroup, NodeKind::ConstraintDeclaration])
        {
            return WithReason::new(1, "space before '{' opening a constraint body");
        }
        if context.direct_parents_are(&[NodeKind::BraceGroup, NodeKind::CoverPoint]) {
            return WithReason::new(1, "space before '{' opening a coverpoint body");
        }
        return WithReason::new(0, "no space before '{' in other contexts");
    }

    // Padding around packed dimensions: "type [N] id;".
    if (left.class == FTC::Keyword || left.class == FTC::Identifier)
        && r == TokenKind::LBracket
    {
        if context.is_inside_first(&[NodeKind::PackedDimensions], &[NodeKind::Expression]) {
            return WithReason::new(1, "space before [packed dimensions] of declarations");
        }
        // All other contexts, such as "a[i]" indices.
        return WithReason::new(0, "no space before '[' in indexing");
    }
    if l == TokenKind::RBracket && right.class == FTC::Identifier {
        if context.direct_parents_are(&[
            NodeKind::UnqualifiedId,
            NodeKind::DataTypeImplicitBasicIdDimensions,
        ]) {
            return WithReason::new(1, "space after [packed dimensions] of declarations");
        }
        // Unhandled in other contexts.
    }

    // Cannot merge tokens that would lex as a different token.
    if pairwise_nonmergeable(left) && pairwise_nonmergeable(right) {
        return WithReason::new(1, "cannot pair number/identifier/keyword without a space");
    }

    if r == TokenKind::Colon {
        if l == TokenKind::Default {
            return WithReason::new(0, "no space inside \"default:\"");
        }
        if context.direct_parent_is_one_of(&[NodeKind::CaseItem, NodeKind::CoverPoint]) {
            return WithReason::new(0, "case-like items, no space before ':'");
        }
        // Everything that resembles an end-label.
        if is_end_keyword(l) {
            return WithReason::new(1, "one space between end-keyword and ':'");
        }
        // Prefix statement labels, and labels before 'begin'.
        if context.direct_parent_is_one_of(&[
            NodeKind::BlockIdentifier,
            NodeKind::LabeledStatement,
            NodeKind::GenerateBlock,
        ]) {
            return WithReason::new(1, "one space before ':' in prefix block labels");
        }
        if context.direct_parent_is(NodeKind::TernaryExpression) {
            return WithReason::new(1, "ternary ?: wants one space around ':'");
        }
        // Spacing in bit slices: preserve 0 or 1 of the original spaces.
        if in_range_like_context(context) {
            let spaces = right.original_leading_spaces(base_text).len().min(1);
            return WithReason::new(spaces as i64, "limit spaces before ':' in bit slice to 0 or 1");
        }
        if context.direct_parent_is(NodeKind::ValueRange) {
            return WithReason::new(1, "spaces around ':' in value ranges");
        }
        // If not handled above, preserve existing spacing.
    }
    if l == TokenKind::Colon {
        if in_range_like_context(context) {
            // The left token was already annotated; mirror its spacing.
            return WithReason::new(
                left.before.spaces_required as i64,
                "symmetrize spaces before and after ':' in bit slice",
            );
        }
        return WithReason::new(1, "default to one space after ':'");
    }

    // "if (...)", "for (...)", "case ...", "return ...".
    if left.class == FTC::Keyword {
        return WithReason::new(1, "space between flow-control keyword and '('");
    }

    if left.class == FTC::UnaryOperator {
        return WithReason::new(0, "\"++i\" over \"++ i\"");
    }
    if right.class == FTC::UnaryOperator {
        return WithReason::new(0, "\"i++\" over \"i ++\"");
    }

    if l == TokenKind::DecNumber && r == TokenKind::UnbasedNumber {
        // e.g. 1'b1, 16'hbabe
        return WithReason::new(0, "no space between numeric width and un-based number");
    }

    // Multi-dimensional arrays and indices.
    if l == TokenKind::RBracket && r == TokenKind::LBracket {
        return WithReason::new(0, "no space separating multidimensional indices");
    }

    if l == TokenKind::Hash {
        return WithReason::new(0, "no space after '#' (delays, parameters)");
    }
    if r == TokenKind::Hash {
        return WithReason::new(1, "space before '#' in other contexts");
    }

    if right.class == FTC::Keyword {
        return WithReason::new(1, "space before keywords");
    }

    // e.g. "always_ff @(posedge clk) begin", "case (expr):".
    if l == TokenKind::RParen {
        if r == TokenKind::Colon {
            return WithReason::new(0, "no space between ')' and ':'");
        }
        return WithReason::new(1, "space between ')' and most other tokens");
    }
    if l == TokenKind::MacroCallCloseToEndLine {
        if r == TokenKind::Semicolon {
            return WithReason::new(0, "no space between macro-closing ')' and ';'");
        }
        return WithReason::new(1, "space between macro-closing ')' and other tokens");
    }
    if l == TokenKind::RBracket {
        return WithReason::new(1, "space between ']' and most other tokens");
    }

    if is_preprocessor_keyword(r) {
        return WithReason::new(1, "preprocessor keywords separate from the token on the left");
    }

    if left.class == FTC::EolComment || left.class == FTC::BlockComment {
        // Nothing should follow an EOL comment; handle the case anyway so
        // unwanted spacing is never preserved accidentally.
        return WithReason::new(1, "handle left=comment to avoid preserving unwanted spaces");
    }

    WithReason::new(
        UNHANDLED_SPACES_REQUIRED,
        "default: spacing not explicitly handled",
    )
}

struct SpacePolicy {
    spaces_required: usize,
    force_preserve_spaces: bool,
}

fn spaces_policy(
    style: &FormatStyle,
    left: &PreFormatToken,
    right: &PreFormatToken,
    context: &SyntaxTreeContext,
    base_text: &str,
) -> SpacePolicy {
    // Unhandled cases default to one space, conservatively.
    const UNHANDLED_SPACES_DEFAULT: usize = 1;
    let spaces = spaces_required_between(style, left, right, context, base_text);
    tracing::trace!(spaces = spaces.value, reason = spaces.reason, "spacing rule");

    if spaces.value == UNHANDLED_SPACES_REQUIRED {
        return SpacePolicy {
            spaces_required: UNHANDLED_SPACES_DEFAULT,
            force_preserve_spaces: true,
        };
    }
    SpacePolicy {
        spaces_required: spaces.value as usize,
        force_preserve_spaces: false,
    }
}

// Penalty for breaking the line between these two tokens; higher means a
// less desirable break point. Feeds the wrap optimizer.
fn break_penalty_between(left: &PreFormatToken, right: &PreFormatToken) -> WithReason<i32> {
    const MIN_PENALTY: i32 = 1;

    let inter_token = break_penalty_between_tokens(left, right);
    WithReason::new(inter_token.value.max(MIN_PENALTY), inter_token.reason)
}

fn break_penalty_between_tokens(left: &PreFormatToken, right: &PreFormatToken) -> WithReason<i32> {
    if left.class == FTC::Identifier && right.class == FTC::OpenGroup {
        return WithReason::new(20, "identifier, open-group");
    }
    // Slightly prefer to break on the left: "a .b" over "a. b".
    if left.class == FTC::Hierarchy {
        return WithReason::new(50, "hierarchy separator on left");
    }
    if right.class == FTC::Hierarchy {
        return WithReason::new(45, "hierarchy separator on right");
    }
    // Prefer to split after commas rather than before them.
    if right.token.kind == TokenKind::Comma {
        return WithReason::new(10, "avoid breaking before ','");
    }
    if left.token.kind == TokenKind::Equals {
        return WithReason::new(2, "avoid breaking directly at an assignment");
    }
    // Prefer to keep '(' with whatever is on the left.
    if right.class == FTC::OpenGroup {
        return WithReason::new(5, "right is open-group");
    }
    if left.token.kind == TokenKind::DecNumber && right.token.kind == TokenKind::BasedNumber {
        // Never broken anyway; see the break cascade.
        return WithReason::new(90, "numeric width, base");
    }
    WithReason::new(1, "unhandled wrap penalty")
}

// Whether to break, not break, or let the optimizer evaluate both.
fn break_decision_between(
    left: &PreFormatToken,
    right: &PreFormatToken,
    context: &SyntaxTreeContext,
    base_text: &str,
) -> WithReason<SpacingOptions> {
    let l = left.token.kind;
    let r = right.token.kind;

    // Leave everything inside [dimensions] alone, except the delimiters
    // themselves, which other rules cover.
    if context.is_inside_first(
        &[NodeKind::DimensionRange, NodeKind::DimensionScalar],
        &[],
    ) && l != TokenKind::LBracket
        && l != TokenKind::RBracket
        && r != TokenKind::LBracket
        && r != TokenKind::RBracket
        && l != TokenKind::Colon
        && r != TokenKind::Colon
    {
        return WithReason::new(
            SpacingOptions::Preserve,
            "leave spaces inside [] untouched",
        );
    }

    if l == TokenKind::PpDefine {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "keep `define and macro name together",
        );
    }
    if r == TokenKind::PpDefineBody {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "macro definition body starts on the same line",
        );
    }

    // Mandatory line breaks.
    if left.class == FTC::EolComment || l == TokenKind::PpDefineBody {
        return WithReason::new(SpacingOptions::MustWrap, "token must be newline-terminated");
    }

    if right.class == FTC::EolComment {
        // If no newline separates the two tokens, the comment belongs to
        // the line it trails.
        let between = &base_text[left.token.right()..right.token.left()];
        if !between.contains('\n') {
            return WithReason::new(
                SpacingOptions::MustAppend,
                "EOL comment cannot break from the tokens on its line",
            );
        }
    }

    // Never separate unary prefix operators from their operands.
    if is_unary_prefix_expression_operand(left, context) {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "never separate unary prefix operator from its operand",
        );
    }

    if is_inside_numeric_literal(left, right) {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "never separate numeric width, base, and digits",
        );
    }

    // Macro calls: no break between the macro id and its '('.
    if l == TokenKind::MacroIdentifier && r == TokenKind::LParen {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "no break between macro call id and '('",
        );
    }

    if is_end_keyword(r) {
        return WithReason::new(SpacingOptions::MustWrap, "end keywords start their own lines");
    }

    if r == TokenKind::Else {
        if l != TokenKind::End {
            return WithReason::new(
                SpacingOptions::MustWrap,
                "'else' starts its own line unless preceded by 'end'",
            );
        }
        return WithReason::new(
            SpacingOptions::MustAppend,
            "'end'-'else' stay together on one line",
        );
    }

    if l == TokenKind::Else && r == TokenKind::Begin {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "'else'-'begin' stay together on one line",
        );
    }

    if l == TokenKind::RParen && r == TokenKind::Begin {
        return WithReason::new(
            SpacingOptions::MustAppend,
            "')'-'begin' stay together on one line",
        );
    }

    if l == TokenKind::MacroCallCloseToEndLine
        && !is_comment(r)
        && r != TokenKind::Semicolon
    {
        return WithReason::new(
            SpacingOptions::MustWrap,
            "macro-closing ')' ends its own line except before comments and ';'",
        );
    }

    if l == TokenKind::PpElse || l == TokenKind::PpEndif {
        if is_comment(r) {
            return WithReason::new(SpacingOptions::Undecided, "comment may follow `else/`endif");
        }
        return WithReason::new(
            SpacingOptions::MustWrap,
            "`else and `endif are on their own lines except for comments",
        );
    }

    if is_preprocessor_keyword(r) {
        return WithReason::new(
            SpacingOptions::MustWrap,
            "preprocessor directives start their own lines",
        );
    }

    WithReason::new(
        SpacingOptions::Undecided,
        "default: leave wrap decision to the optimizer",
    )
}

/// Annotates `curr`'s inter-token state from its left neighbor and syntax
/// context.
pub fn annotate_format_token(
    style: &FormatStyle,
    prev: &PreFormatToken,
    curr: &mut PreFormatToken,
    context: &SyntaxTreeContext,
    base_text: &str,
) {
    let policy = spaces_policy(style, prev, curr, context, base_text);
    curr.before.spaces_required = policy.spaces_required;
    if policy.force_preserve_spaces {
        // Forgo all inter-token calculation.
        curr.before.break_decision = SpacingOptions::Preserve;
    } else {
        let penalty = break_penalty_between(prev, curr);
        curr.before.break_penalty = penalty.value;
        let breaker = break_decision_between(prev, curr, context, base_text);
        curr.before.break_decision = breaker.value;
        tracing::trace!(reason = breaker.reason, "line break constraint");
    }
}

/// Annotates every token after the first against its predecessor, using the
/// syntax tree for context (see
/// [`tree_annotator`](super::tree_annotator)).
pub fn annotate_formatting_information(
    style: &FormatStyle,
    tree: &crate::text::syntax_tree::ConcreteSyntaxTree,
    ftokens: &mut [PreFormatToken],
    base_text: &str,
) {
    super::tree_annotator::annotate_format_tokens_using_syntax_context(
        tree,
        ftokens,
        base_text,
        &mut |prev, curr, context| annotate_format_token(style, prev, curr, context, base_text),
    );
}
