//! Settings shared by the converters and the translation store.

use serde::{Deserialize, Serialize};

/// Default comment metadata token (`@check: true`).
pub const DEFAULT_CHECK_TOKEN: &str = "check";
/// Default continuation indentation width.
pub const DEFAULT_INDENT: usize = 4;
/// Default extension of the files loaded from each locale directory.
pub const DEFAULT_EXTENSION: &str = "ftl";

/// Explicit configuration passed to [`crate::TranslationStore`] and
/// [`crate::Converter`] at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Token of the comment metadata line holding the needs-review flag.
    #[serde(alias = "check")]
    pub check_token: String,
    /// Spaces used for continuation lines and attributes when writing.
    pub indent: usize,
    /// File extension (without the dot) recognised inside locale directories.
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_token: DEFAULT_CHECK_TOKEN.to_string(),
            indent: DEFAULT_INDENT,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comment metadata token.
    pub fn with_check_token(mut self, token: impl Into<String>) -> Self {
        self.check_token = token.into();
        self
    }

    /// Sets the continuation indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Sets the recognised file extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// The full `@token: ` prefix of the metadata line.
    pub(crate) fn metadata_prefix(&self) -> String {
        format!("@{}: ", self.check_token)
    }
}
