//! Analyses built over token streams: lint-waiver collection and lexical
//! equivalence checking.

pub mod equivalence;
pub mod lint_waiver;

pub use equivalence::{format_equivalent, lexically_equivalent, obfuscation_equivalent};
pub use lint_waiver::{LintWaiver, LintWaiverBuilder};
