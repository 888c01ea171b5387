//! Comment-directed suppression of lint findings.
//!
//! Waivers are issued by comments of the form `<trigger> <command> <rule>`,
//! where the trigger word is configurable and the command is one of
//! `waive-line`, `waive-start`, `waive-stop`. The builder walks a file line
//! by line, consuming each line's token range, and accumulates a per-rule
//! set of waived lines:
//!
//! - `waive-line` on a line with real tokens waives that line; on a
//!   comment-only line the waiver is deferred to the next line holding real
//!   tokens (a blank line cancels the deferral).
//! - `waive-start` opens a range for the rule; the first start wins, so the
//!   widest range applies.
//! - `waive-stop` closes the range up to (excluding) its own line;
//!   unmatched stops are ignored. Ranges still open at end of file are
//!   flushed through the last line.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::lexing::tokens::{is_comment, is_whitespace};
use crate::strings::comment::strip_comment_and_space_padding;
use crate::text::text_structure::TextStructureView;
use crate::text::token::Token;

pub const WAIVE_ONE_LINE_COMMAND: &str = "waive-line";
pub const WAIVE_RANGE_START_COMMAND: &str = "waive-start";
pub const WAIVE_RANGE_STOP_COMMAND: &str = "waive-stop";

/// Per-rule sets of waived 0-based line numbers.
#[derive(Debug, Clone, Default)]
pub struct LintWaiver {
    // One bitset of lines per rule name.
    waiver_map: HashMap<String, Vec<bool>>,
}

impl LintWaiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waive_one_line(&mut self, rule_name: &str, line_number: usize) {
        self.waive_line_range(rule_name, line_number, line_number + 1);
    }

    pub fn waive_line_range(&mut self, rule_name: &str, line_begin: usize, line_end: usize) {
        let line_set = self.waiver_map.entry(rule_name.to_string()).or_default();
        if line_set.len() < line_end {
            line_set.resize(line_end, false);
        }
        for line in line_begin..line_end {
            line_set[line] = true;
        }
    }

    pub fn rule_is_waived_on_line(&self, rule_name: &str, line_number: usize) -> bool {
        self.waiver_map
            .get(rule_name)
            .is_some_and(|line_set| line_set.get(line_number).copied().unwrap_or(false))
    }

    pub fn is_empty(&self) -> bool {
        self.waiver_map
            .values()
            .all(|line_set| !line_set.iter().any(|&waived| waived))
    }
}

/// Stateful line walker that builds a [`LintWaiver`] from token ranges.
#[derive(Debug)]
pub struct LintWaiverBuilder {
    trigger_keyword: String,

    // Rules from comment-only waive-line directives, applied to the next
    // line that holds real tokens.
    unapplied_oneline_waivers: HashSet<String>,

    // At most one open range per rule: rule name to starting line.
    // Ordered so that the end-of-file flush is deterministic.
    waiver_open_ranges: BTreeMap<String, usize>,

    lint_waiver: LintWaiver,
}

impl LintWaiverBuilder {
    pub fn new(trigger_keyword: &str) -> Self {
        Self {
            trigger_keyword: trigger_keyword.to_string(),
            unapplied_oneline_waivers: HashSet::new(),
            waiver_open_ranges: BTreeMap::new(),
            lint_waiver: LintWaiver::new(),
        }
    }

    pub fn waiver(&self) -> &LintWaiver {
        &self.lint_waiver
    }

    pub fn into_waiver(self) -> LintWaiver {
        self.lint_waiver
    }

    // Parses `<trigger> <command> <rule>` out of stripped comment text.
    // Additional text beyond the rule name is ignored, so a directive may
    // carry trailing commentary.
    fn extract_waived_rule<'c>(&self, comment_text: &'c str) -> Option<(&'c str, &'c str)> {
        let mut words = comment_text.split_whitespace();
        if words.next() != Some(self.trigger_keyword.as_str()) {
            return None;
        }
        let command = words.next()?;
        if command != WAIVE_ONE_LINE_COMMAND
            && command != WAIVE_RANGE_START_COMMAND
            && command != WAIVE_RANGE_STOP_COMMAND
        {
            return None;
        }
        let rule = words.next()?;
        Some((command, rule))
    }

    /// Consumes one line's tokens (the unfiltered range that starts on the
    /// line).
    pub fn process_line(&mut self, tokens: &[Token], contents: &str, line_number: usize) {
        // A line of pure whitespace cancels deferred one-line waivers.
        let line_is_blank = tokens.iter().all(|t| is_whitespace(t.kind) || t.is_eof());
        if line_is_blank {
            self.unapplied_oneline_waivers.clear();
            return;
        }

        let line_has_tokens = tokens
            .iter()
            .any(|t| !is_whitespace(t.kind) && !is_comment(t.kind) && !t.is_eof());

        if line_has_tokens {
            for rule in self.unapplied_oneline_waivers.drain() {
                self.lint_waiver.waive_one_line(&rule, line_number);
            }
        }

        for token in tokens {
            if !is_comment(token.kind) {
                continue;
            }
            let comment_text = strip_comment_and_space_padding(token.text(contents));
            let (command, rule) = match self.extract_waived_rule(comment_text) {
                None => continue,
                Some(found) => found,
            };
            match command {
                WAIVE_ONE_LINE_COMMAND => {
                    if line_has_tokens {
                        self.lint_waiver.waive_one_line(rule, line_number);
                    } else {
                        self.unapplied_oneline_waivers.insert(rule.to_string());
                    }
                }
                WAIVE_RANGE_START_COMMAND => {
                    // First start wins: the widest applicable range.
                    self.waiver_open_ranges
                        .entry(rule.to_string())
                        .or_insert(line_number);
                }
                WAIVE_RANGE_STOP_COMMAND => {
                    if let Some(start_line) = self.waiver_open_ranges.remove(rule) {
                        self.lint_waiver
                            .waive_line_range(rule, start_line, line_number);
                    }
                    // Unbalanced stops are ignored (possibly a mistaken
                    // rule name).
                }
                _ => {}
            }
        }
    }

    /// Walks every line of the analyzed text, then flushes ranges left open
    /// so their waivers extend to end-of-file.
    pub fn process_token_ranges_by_line(&mut self, text_structure: &TextStructureView) {
        let total_lines = text_structure.lines().len();
        let contents = text_structure.contents();
        for line_number in 0..total_lines {
            let tokens = text_structure.tokens_on_line(line_number);
            self.process_line(tokens, contents, line_number);
        }

        let open_ranges = std::mem::take(&mut self.waiver_open_ranges);
        for (rule, start_line) in open_ranges {
            self.lint_waiver
                .waive_line_range(&rule, start_line, total_lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::lexer::lex_into_structure;

    const TRIGGER: &str = "sv_lint";

    fn build(text: &str) -> LintWaiver {
        let structure = lex_into_structure(text);
        let mut builder = LintWaiverBuilder::new(TRIGGER);
        builder.process_token_ranges_by_line(structure.data());
        builder.into_waiver()
    }

    #[test]
    fn test_no_directives() {
        let waiver = build("wire x;\nwire y;\n");
        assert!(waiver.is_empty());
        assert!(!waiver.rule_is_waived_on_line("some-rule", 0));
    }

    #[test]
    fn test_waive_line_same_line() {
        let waiver = build("wire x;  // sv_lint waive-line rule-x\nwire y;\n");
        assert!(waiver.rule_is_waived_on_line("rule-x", 0));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 1));
        assert!(!waiver.rule_is_waived_on_line("rule-y", 0));
    }

    #[test]
    fn test_waive_line_deferred_to_next_line() {
        let waiver = build("// sv_lint waive-line rule-x\nwire x;\nwire y;\n");
        assert!(!waiver.rule_is_waived_on_line("rule-x", 0));
        assert!(waiver.rule_is_waived_on_line("rule-x", 1));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 2));
    }

    #[test]
    fn test_blank_line_cancels_deferred_waiver() {
        let waiver = build("// sv_lint waive-line rule-x\n\nwire x;\n");
        assert!(waiver.is_empty());
    }

    #[test]
    fn test_waive_range() {
        let text = "\
// sv_lint waive-start rule-x
wire a;
wire b;
// sv_lint waive-stop rule-x
wire c;
";
        let waiver = build(text);
        assert!(waiver.rule_is_waived_on_line("rule-x", 0));
        assert!(waiver.rule_is_waived_on_line("rule-x", 1));
        assert!(waiver.rule_is_waived_on_line("rule-x", 2));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 3));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 4));
    }

    #[test]
    fn test_unclosed_range_extends_to_eof() {
        let text = "wire a;\n// sv_lint waive-start rule-x\nwire b;\nwire c;\n";
        let waiver = build(text);
        assert!(!waiver.rule_is_waived_on_line("rule-x", 0));
        assert!(waiver.rule_is_waived_on_line("rule-x", 1));
        assert!(waiver.rule_is_waived_on_line("rule-x", 2));
        assert!(waiver.rule_is_waived_on_line("rule-x", 3));
        // Including the trailing empty line.
        assert!(waiver.rule_is_waived_on_line("rule-x", 4));
    }

    #[test]
    fn test_first_start_wins() {
        let text = "\
// sv_lint waive-start rule-x
wire a;
// sv_lint waive-start rule-x
// sv_lint waive-stop rule-x
wire b;
";
        let waiver = build(text);
        // The stop closes the range opened first, covering lines 0..3.
        assert!(waiver.rule_is_waived_on_line("rule-x", 0));
        assert!(waiver.rule_is_waived_on_line("rule-x", 2));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 3));
        assert!(!waiver.rule_is_waived_on_line("rule-x", 4));
    }

    #[test]
    fn test_unmatched_stop_is_ignored() {
        let waiver = build("// sv_lint waive-stop rule-x\nwire a;\n");
        assert!(waiver.is_empty());
    }

    #[test]
    fn test_independent_rules() {
        let text = "\
// sv_lint waive-start rule-x
wire a;  // sv_lint waive-line rule-y
// sv_lint waive-stop rule-x
";
        let waiver = build(text);
        assert!(waiver.rule_is_waived_on_line("rule-x", 1));
        assert!(waiver.rule_is_waived_on_line("rule-y", 1));
        assert!(!waiver.rule_is_waived_on_line("rule-y", 0));
    }

    #[test]
    fn test_wrong_trigger_is_ignored() {
        let waiver = build("wire x;  // other_tool waive-line rule-x\n");
        assert!(waiver.is_empty());
    }

    #[test]
    fn test_directive_with_trailing_commentary() {
        let waiver = build("wire x;  // sv_lint waive-line rule-x because reasons\n");
        assert!(waiver.rule_is_waived_on_line("rule-x", 0));
    }
}
