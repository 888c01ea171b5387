//! Formatter style knobs.
//!
//! The style is deserializable so that projects can keep a configuration
//! file next to their sources; absent fields fall back to the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatStyle {
    /// Spaces per indentation level.
    pub indentation_spaces: usize,

    /// Spaces for open-and-hanging continuation lines.
    pub wrap_spaces: usize,

    /// Target line length.
    pub column_limit: usize,

    /// Minimum spaces between code and a trailing comment.
    pub spaces_before_comment: usize,
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self {
            indentation_spaces: 2,
            wrap_spaces: 4,
            column_limit: 100,
            spaces_before_comment: 2,
        }
    }
}

impl FormatStyle {
    /// Loads a style from YAML, layering the file's fields over defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
