//! Writes the syntax tree back to Fluent source text.
//!
//! Blank lines between entries are written as they were read. Inside an entry
//! the layout is canonical: multi-line values start on their own line and
//! continuation lines are indented by a fixed width. Placeables and junk are
//! emitted exactly as they were read.

use crate::ast::{
    Attribute, Comment, CommentLevel, Entry, Message, Pattern, PatternElement, Resource, Term,
};
use crate::config::DEFAULT_INDENT;
use crate::parser::{SYNTHETIC_PREFIX, strip_synthetic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serializer {
    indent: String,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Serializer {
    /// Creates a serializer indenting continuation lines by `indent` spaces.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent.max(1)),
        }
    }

    /// Writes the entries in order. A blank line is only added where a
    /// standalone comment would otherwise be read back as part of the next entry.
    pub fn serialize(&self, resource: &Resource) -> String {
        let mut out = String::new();
        let mut previous = None;

        for entry in &resource.body {
            if previous.is_some_and(|previous| needs_separator(previous, entry)) {
                out.push('\n');
            }
            out.push_str(&self.serialize_entry(entry));
            previous = Some(entry);
        }

        out
    }

    pub fn serialize_entry(&self, entry: &Entry) -> String {
        match entry {
            Entry::Message(message) => self.message(message),
            Entry::Term(term) => self.term(term),
            Entry::Comment(comment) => comment_block(comment),
            Entry::Junk(junk) => junk.content.clone(),
            Entry::Blank(blank) => blank.clone(),
        }
    }

    /// Serializes a pattern as it follows `=`, including the leading space or
    /// line break.
    pub fn serialize_pattern(&self, pattern: &Pattern) -> String {
        let content = self.indent_except_first_line(&pattern_source(pattern));
        if starts_on_new_line(pattern) {
            format!("\n{}{}", self.indent, content)
        } else {
            format!(" {}", content)
        }
    }

    fn message(&self, message: &Message) -> String {
        let mut out = String::new();
        if let Some(comment) = &message.comment {
            out.push_str(&comment_block(comment));
        }
        out.push_str(&message.id);
        out.push_str(" =");
        if let Some(value) = &message.value {
            out.push_str(&self.serialize_pattern(value));
        }
        for attribute in &message.attributes {
            out.push_str(&self.attribute(attribute));
        }
        out.push('\n');
        out
    }

    fn term(&self, term: &Term) -> String {
        let mut out = String::new();
        if let Some(comment) = &term.comment {
            out.push_str(&comment_block(comment));
        }
        out.push('-');
        out.push_str(&term.id);
        out.push_str(" =");
        out.push_str(&self.serialize_pattern(&term.value));
        for attribute in &term.attributes {
            out.push_str(&self.attribute(attribute));
        }
        out.push('\n');
        out
    }

    fn attribute(&self, attribute: &Attribute) -> String {
        let value = self.indent_except_first_line(&self.serialize_pattern(&attribute.value));
        format!("\n{}.{} ={}", self.indent, attribute.id, value)
    }

    /// Blank lines stay empty so no trailing whitespace is written.
    fn indent_except_first_line(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        for (index, line) in content.split_inclusive('\n').enumerate() {
            if index > 0 && line != "\n" {
                out.push_str(&self.indent);
            }
            out.push_str(line);
        }
        out
    }
}

/// Serializes a resource with the default indentation.
pub fn serialize(resource: &Resource) -> String {
    Serializer::default().serialize(resource)
}

/// Flattens a pattern to the plain value string shown to translators.
///
/// Junk produced by re-parsing a bare value loses its synthetic wrapper.
pub fn pattern_text(pattern: &Pattern, indent: usize) -> String {
    pattern
        .elements
        .iter()
        .map(|element| match element {
            PatternElement::Junk(content) if content.starts_with(SYNTHETIC_PREFIX) => {
                strip_synthetic(content, indent)
            }
            other => other.as_str().to_string(),
        })
        .collect()
}

fn pattern_source(pattern: &Pattern) -> String {
    pattern.elements.iter().map(PatternElement::as_str).collect()
}

fn starts_on_new_line(pattern: &Pattern) -> bool {
    let multiline = pattern
        .elements
        .iter()
        .any(|element| element.as_str().contains('\n'));
    if !multiline {
        return false;
    }
    match pattern.elements.first() {
        Some(PatternElement::Text(text)) => !text.starts_with(['[', '.', '*']),
        _ => true,
    }
}

/// `# a` directly above `b = 1` attaches to it, and comment lines of one level
/// merge.
fn needs_separator(previous: &Entry, next: &Entry) -> bool {
    let Entry::Comment(comment) = previous else {
        return false;
    };
    match next {
        Entry::Comment(next) => next.level == comment.level,
        Entry::Message(_) | Entry::Term(_) => comment.level == CommentLevel::Regular,
        Entry::Junk(junk) => {
            comment.level == CommentLevel::Regular
                && junk
                    .content
                    .starts_with(|c: char| c.is_ascii_alphabetic() || c == '-')
        }
        Entry::Blank(_) => false,
    }
}

fn comment_block(comment: &Comment) -> String {
    let marker = comment.level.marker();
    let mut out = comment
        .content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                marker.to_string()
            } else {
                format!("{} {}", marker, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}
