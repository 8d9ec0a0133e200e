//! Conversion between syntax tree entries and [`TranslationRecord`]s.
//!
//! Loading flattens a message or term into plain strings and pulls the review
//! flag out of its comment; saving re-parses those strings into patterns and
//! rebuilds the comment block.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{error, warn};

use crate::{
    ast::{Attribute, Comment, Entry, Pattern, PatternElement, Term, Message, is_identifier},
    config::Config,
    error::Error,
    parser::{normalize_line_endings, parse_value},
    serializer::pattern_text,
    types::{TranslationRecord, attribute_key},
};

/// Placeable written for values that must exist but are empty.
pub const EMPTY_PLACEABLE: &str = "{ \"\" }";

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// The text did not parse as a clean pattern; `text` is then the
    /// recovered raw fragment and callers should keep their input instead.
    pub had_junk: bool,
}

/// Canonicalizes an edited value by running it through the parser and
/// flattening the result again.
///
/// Trailing whitespace of the input is kept, so an editor that pushes every
/// keystroke does not swallow a freshly typed space or line break.
pub fn normalize(text: &str, indent: usize) -> Normalized {
    let text = normalize_line_endings(text);
    let pattern = parse_value(&text, indent);
    if pattern.has_junk() {
        return Normalized {
            text: pattern_text(&pattern, indent),
            had_junk: true,
        };
    }

    let mut canonical = pattern_text(&pattern, indent);
    canonical.push_str(&text[text.trim_end().len()..]);
    Normalized {
        text: canonical,
        had_junk: false,
    }
}

/// Converts between entries and records using one [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// [`normalize`] with the configured indentation.
    pub fn normalize(&self, text: &str) -> Normalized {
        normalize(text, self.config.indent)
    }

    /// Builds the store key and record for a message or term.
    ///
    /// An attribute that fails to convert is logged and kept with an empty value.
    pub fn entry_to_record(
        &self,
        entry: &Entry,
        source_path: Option<&Path>,
    ) -> Result<(String, TranslationRecord), Error> {
        let (id, value, attributes, comment) = match entry {
            Entry::Message(Message {
                id,
                value,
                attributes,
                comment,
            }) => (id, value.as_ref(), attributes, comment),
            Entry::Term(Term {
                id,
                value,
                attributes,
                comment,
            }) => (id, Some(value), attributes, comment),
            Entry::Comment(_) | Entry::Junk(_) | Entry::Blank(_) => {
                return Err(Error::conversion_error(
                    "only messages and terms can be converted to a translation",
                    None,
                ));
            }
        };
        if !is_identifier(id) {
            return Err(Error::InvalidIdentifier(id.clone()));
        }
        let key = entry.key().unwrap_or_else(|| id.clone());

        let (comment, needs_review) = self.split_comment(comment.as_ref());

        let mut attribute_values = IndexMap::new();
        for attribute in attributes {
            let value = self.attribute_text(attribute).unwrap_or_else(|e| {
                error!(
                    key = %key,
                    attribute = %attribute.id,
                    path = ?source_path,
                    "Error parsing attribute: {}",
                    e
                );
                String::new()
            });
            attribute_values.insert(attribute_key(&attribute.id), value);
        }

        let record = TranslationRecord {
            value: value.map(|pattern| self.value_text(pattern)).unwrap_or_default(),
            attributes: attribute_values,
            comment,
            needs_review,
            source_path: source_path.map(Path::to_path_buf),
        };

        Ok((key, record))
    }

    /// Builds the message (or term, for `-` keys) written for a record.
    ///
    /// A term always gets a value. A message gets one when its value is not
    /// empty, and also when it has no attributes: an entry with neither would
    /// not parse back, so the empty value is written as [`EMPTY_PLACEABLE`].
    /// Whitespace-only text is written as a string literal, since Fluent trims
    /// whitespace around a pattern.
    pub fn record_to_entry(&self, key: &str, record: &TranslationRecord) -> Result<Entry, Error> {
        let (is_term, id) = match key.strip_prefix('-') {
            Some(id) => (true, id),
            None => (false, key),
        };
        if !is_identifier(id) {
            return Err(Error::InvalidIdentifier(key.to_string()));
        }

        let comment = self.build_comment(record);
        let attributes = record
            .attributes
            .iter()
            .map(|(name, value)| {
                let attribute_id = name.trim_start_matches('.');
                if !is_identifier(attribute_id) {
                    return Err(Error::InvalidIdentifier(name.clone()));
                }
                Ok(Attribute {
                    id: attribute_id.to_string(),
                    value: self.value_pattern(value),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if is_term {
            return Ok(Entry::Term(Term {
                id: id.to_string(),
                value: self.value_pattern(&record.value),
                attributes,
                comment,
            }));
        }

        let value = (!record.value.is_empty() || attributes.is_empty())
            .then(|| self.value_pattern(&record.value));

        Ok(Entry::Message(Message {
            id: id.to_string(),
            value,
            attributes,
            comment,
        }))
    }

    /// Splits a comment into free text and the review flag.
    pub fn split_comment(&self, comment: Option<&Comment>) -> (Option<String>, bool) {
        let Some(comment) = comment else {
            return (None, false);
        };

        let mut lines = Vec::new();
        let mut needs_review = false;
        for row in comment.content.split('\n') {
            let row = row.trim();
            match self.metadata_value(row) {
                Some(raw) => match parse_bool(raw) {
                    Some(flag) => needs_review = flag,
                    None => {
                        warn!(line = %row, "Unrecognised review flag kept as comment text");
                        lines.push(row);
                    }
                },
                None => lines.push(row),
            }
        }

        let text = lines.join("\n");
        if text.trim().is_empty() {
            (None, needs_review)
        } else {
            (Some(text), needs_review)
        }
    }

    /// Comment block for a record: the metadata line followed by the free text,
    /// or nothing when the record has neither a comment nor the review flag.
    pub fn build_comment(&self, record: &TranslationRecord) -> Option<Comment> {
        let free_text = record
            .comment
            .as_deref()
            .filter(|comment| !comment.trim().is_empty());
        if !record.needs_review && free_text.is_none() {
            return None;
        }

        let mut content = format!("{}{}", self.config.metadata_prefix(), record.needs_review);
        if let Some(free_text) = free_text {
            content.push('\n');
            content.push_str(&normalize_line_endings(free_text));
        }
        Some(Comment::new(content))
    }

    /// `@token:` line content, if `row` is the metadata line.
    fn metadata_value<'r>(&self, row: &'r str) -> Option<&'r str> {
        row.strip_prefix('@')?
            .strip_prefix(self.config.check_token.as_str())?
            .strip_prefix(':')
            .map(str::trim)
    }

    fn attribute_text(&self, attribute: &Attribute) -> Result<String, Error> {
        if !is_identifier(&attribute.id) {
            return Err(Error::InvalidIdentifier(attribute.id.clone()));
        }
        Ok(self.value_text(&attribute.value))
    }

    fn value_text(&self, pattern: &Pattern) -> String {
        if let [PatternElement::Placeable(raw)] = pattern.elements.as_slice() {
            if let Some(blank) = blank_literal_text(raw) {
                return blank;
            }
        }
        pattern_text(pattern, self.config.indent)
    }

    fn value_pattern(&self, text: &str) -> Pattern {
        if text.trim().is_empty() {
            Pattern::new(vec![PatternElement::Placeable(blank_literal(text))])
        } else {
            parse_value(text, self.config.indent)
        }
    }
}

/// `{ "…" }` holding `text`; spaces stay literal, other whitespace is escaped.
fn blank_literal(text: &str) -> String {
    let mut literal = String::from("{ \"");
    for c in text.chars() {
        if c == ' ' {
            literal.push(c);
        } else {
            literal.push_str(&format!("\\u{:04X}", u32::from(c)));
        }
    }
    literal.push_str("\" }");
    literal
}

/// Text of a placeable written by [`blank_literal`], or `None` for any other
/// placeable.
fn blank_literal_text(raw: &str) -> Option<String> {
    let literal = raw
        .strip_prefix('{')?
        .strip_suffix('}')?
        .trim()
        .strip_prefix('"')?
        .strip_suffix('"')?;

    let mut text = String::new();
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        let c = match c {
            ' ' => c,
            '\\' if chars.next() == Some('u') => {
                let hex = chars.by_ref().take(4).collect::<String>();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .filter(|c| c.is_whitespace())?
            }
            _ => return None,
        };
        text.push(c);
    }
    Some(text)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
