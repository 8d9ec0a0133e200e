//! Syntax tree of a Fluent resource.
//!
//! Only the structure needed for round-trip editing is modelled: placeables are
//! kept as their raw `{ … }` source and anything that fails to parse is kept as
//! `Junk` so it can be written back unchanged.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").unwrap();
}

/// Returns `true` if `name` is a valid message, term or attribute identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// All entries parsed from one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub body: Vec<Entry>,
}

impl Resource {
    pub fn new(body: Vec<Entry>) -> Self {
        Self { body }
    }

    /// Messages and terms, skipping comments and junk.
    pub fn messages(&self) -> impl Iterator<Item = &Entry> {
        self.body
            .iter()
            .filter(|entry| matches!(entry, Entry::Message(_) | Entry::Term(_)))
    }

    /// Top-level junk entries.
    pub fn junk(&self) -> impl Iterator<Item = &Junk> {
        self.body.iter().filter_map(|entry| match entry {
            Entry::Junk(junk) => Some(junk),
            _ => None,
        })
    }

    /// `true` if any entry, value or attribute contains junk.
    pub fn has_junk(&self) -> bool {
        self.body.iter().any(Entry::has_junk)
    }
}

/// A top-level item of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(Message),
    Term(Term),
    Comment(Comment),
    Junk(Junk),
    /// Blank lines between entries, exactly as read.
    Blank(String),
}

impl Entry {
    /// The store key: the message name, or `-name` for a term.
    pub fn key(&self) -> Option<String> {
        match self {
            Entry::Message(message) => Some(message.id.clone()),
            Entry::Term(term) => Some(format!("-{}", term.id)),
            _ => None,
        }
    }

    pub fn has_junk(&self) -> bool {
        match self {
            Entry::Message(message) => {
                message.value.as_ref().is_some_and(Pattern::has_junk)
                    || message.attributes.iter().any(|a| a.value.has_junk())
            }
            Entry::Term(term) => {
                term.value.has_junk() || term.attributes.iter().any(|a| a.value.has_junk())
            }
            Entry::Comment(_) | Entry::Blank(_) => false,
            Entry::Junk(_) => true,
        }
    }
}

/// `id = value`, with optional attributes and leading comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub value: Option<Pattern>,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

/// `-id = value`; a term always has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: String,
    pub value: Pattern,
    pub attributes: Vec<Attribute>,
    pub comment: Option<Comment>,
}

/// `.id = value` below a message or term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: String,
    pub value: Pattern,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn new(elements: Vec<PatternElement>) -> Self {
        Self { elements }
    }

    /// A pattern holding a single text run.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            elements: vec![PatternElement::Text(value.into())],
        }
    }

    pub fn has_junk(&self) -> bool {
        self.elements
            .iter()
            .any(|element| matches!(element, PatternElement::Junk(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.iter().all(|element| element.as_str().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    /// Literal text; continuation lines are already dedented.
    Text(String),
    /// Raw placeable source including the braces.
    Placeable(String),
    /// A fragment that could not be parsed.
    Junk(String),
}

impl PatternElement {
    pub fn as_str(&self) -> &str {
        match self {
            PatternElement::Text(value)
            | PatternElement::Placeable(value)
            | PatternElement::Junk(value) => value,
        }
    }
}

/// Comment marker depth: `#`, `##` or `###`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentLevel {
    #[default]
    Regular,
    Group,
    Resource,
}

impl CommentLevel {
    pub fn marker(self) -> &'static str {
        match self {
            CommentLevel::Regular => "#",
            CommentLevel::Group => "##",
            CommentLevel::Resource => "###",
        }
    }

    pub(crate) fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(CommentLevel::Regular),
            2 => Some(CommentLevel::Group),
            3 => Some(CommentLevel::Resource),
            _ => None,
        }
    }
}

/// Comment text without its `#` markers; lines are separated by `\n`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub level: CommentLevel,
    pub content: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            level: CommentLevel::Regular,
            content: content.into(),
        }
    }
}

/// Unparseable top-level text, including its trailing line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junk {
    pub content: String,
}

impl Display for Junk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("hello"));
        assert!(is_identifier("hello-world_2"));
        assert!(!is_identifier("-hello"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("with space"));
    }

    #[test]
    fn test_entry_keys() {
        let message = Entry::Message(Message {
            id: "brand".to_string(),
            value: Some(Pattern::text("Firefox")),
            attributes: vec![],
            comment: None,
        });
        let term = Entry::Term(Term {
            id: "brand".to_string(),
            value: Pattern::text("Firefox"),
            attributes: vec![],
            comment: None,
        });
        assert_eq!(message.key().as_deref(), Some("brand"));
        assert_eq!(term.key().as_deref(), Some("-brand"));
        assert_eq!(Entry::Comment(Comment::new("x")).key(), None);
        assert_eq!(Entry::Blank("\n".to_string()).key(), None);
    }

    #[test]
    fn test_junk_detection() {
        let clean = Entry::Message(Message {
            id: "a".to_string(),
            value: Some(Pattern::new(vec![
                PatternElement::Text("Hi ".to_string()),
                PatternElement::Placeable("{ $name }".to_string()),
            ])),
            attributes: vec![],
            comment: None,
        });
        assert!(!clean.has_junk());

        let dirty_attribute = Entry::Message(Message {
            id: "a".to_string(),
            value: None,
            attributes: vec![Attribute {
                id: "title".to_string(),
                value: Pattern::new(vec![PatternElement::Junk("{ }".to_string())]),
            }],
            comment: None,
        });
        assert!(dirty_attribute.has_junk());

        assert!(!Entry::Blank("\n\n".to_string()).has_junk());

        let resource = Resource::new(vec![
            clean,
            Entry::Blank("\n".to_string()),
            Entry::Junk(Junk {
                content: "oops\n".to_string(),
            }),
        ]);
        assert!(resource.has_junk());
        assert_eq!(resource.messages().count(), 1);
        assert_eq!(resource.junk().count(), 1);
    }

    #[test]
    fn test_empty_pattern() {
        assert!(Pattern::default().is_empty());
        assert!(Pattern::text("").is_empty());
        assert!(!Pattern::text("x").is_empty());
    }
}
