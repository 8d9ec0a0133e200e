//! Editable, format-agnostic view of one translation.

use std::{fmt::Display, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Translation of one variable in one locale.
///
/// Records are owned by the [`crate::TranslationStore`]; callers get clones and
/// should fetch again after every store operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationRecord {
    /// Flat value text; continuation lines are plain `\n`.
    #[serde(default)]
    pub value: String,

    /// Attribute values keyed by `.name`, in source order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Free comment text with the metadata line removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    /// Translator-facing review flag, stored in the comment metadata line.
    #[serde(default)]
    pub needs_review: bool,

    /// File the record was loaded from and is saved back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl TranslationRecord {
    /// Value of an attribute, accepting the name with or without its dot.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&attribute_key(name))
            .map(String::as_str)
    }

    /// `true` when the record carries nothing worth writing.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
            && self.attributes.is_empty()
            && self.comment.is_none()
            && !self.needs_review
    }

    /// `true` when a value or at least one attribute value is present.
    pub fn is_translated(&self) -> bool {
        !self.value.is_empty() || self.attributes.values().any(|value| !value.is_empty())
    }
}

impl Display for TranslationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TranslationRecord {{ value: {:?}, attributes: {}, needs_review: {} }}",
            self.value,
            self.attributes.len(),
            self.needs_review
        )
    }
}

/// The field targeted by [`crate::TranslationStore::update`], with its new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the value text.
    Value(String),
    /// Replace (or add) one attribute value. The name may omit the leading dot.
    Attribute { name: String, value: String },
    /// Replace the free comment text; an empty string removes the comment.
    Comment(String),
    /// Set the review flag.
    NeedsReview(bool),
}

impl Edit {
    pub fn value(value: impl Into<String>) -> Self {
        Edit::Value(value.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Edit::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Edit::Comment(comment.into())
    }

    /// Human-readable name of the targeted field, used in log messages.
    pub fn field_name(&self) -> String {
        match self {
            Edit::Value(_) => "value".to_string(),
            Edit::Attribute { name, .. } => attribute_key(name),
            Edit::Comment(_) => "comment".to_string(),
            Edit::NeedsReview(_) => "needs_review".to_string(),
        }
    }
}

/// Store key of an attribute: its name with a leading dot.
pub fn attribute_key(name: &str) -> String {
    format!(".{}", name.trim_start_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_blank() {
        let record = TranslationRecord::default();
        assert!(record.is_blank());
        assert!(!record.is_translated());
        assert_eq!(record.value, "");
        assert!(record.source_path.is_none());
    }

    #[test]
    fn test_attribute_lookup_accepts_both_spellings() {
        let mut record = TranslationRecord::default();
        record
            .attributes
            .insert(".title".to_string(), "Title".to_string());
        assert_eq!(record.attribute("title"), Some("Title"));
        assert_eq!(record.attribute(".title"), Some("Title"));
        assert_eq!(record.attribute("label"), None);
        assert!(record.is_translated());
        assert!(!record.is_blank());
    }

    #[test]
    fn test_review_flag_alone_is_not_blank() {
        let record = TranslationRecord {
            needs_review: true,
            ..Default::default()
        };
        assert!(!record.is_blank());
        assert!(!record.is_translated());
    }

    #[test]
    fn test_attribute_key() {
        assert_eq!(attribute_key("title"), ".title");
        assert_eq!(attribute_key(".title"), ".title");
    }

    #[test]
    fn test_edit_field_names() {
        assert_eq!(Edit::value("x").field_name(), "value");
        assert_eq!(Edit::attribute("title", "x").field_name(), ".title");
        assert_eq!(Edit::comment("x").field_name(), "comment");
        assert_eq!(Edit::NeedsReview(true).field_name(), "needs_review");
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = TranslationRecord {
            value: "Hello".to_string(),
            ..Default::default()
        };
        record
            .attributes
            .insert(".title".to_string(), "Hi".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["value"], "Hello");
        assert_eq!(json["attributes"][".title"], "Hi");
        assert_eq!(json["needs_review"], false);
        assert!(json.get("comment").is_none());
        assert!(json.get("source_path").is_none());
    }
}
