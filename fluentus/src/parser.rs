//! Lenient parser for the Fluent (`.ftl`) syntax.
//!
//! [`parse`] never fails. Anything it cannot structure is kept verbatim as junk
//! at the smallest enclosing scope:
//!
//! - a broken placeable or a stray `}` becomes a [`PatternElement::Junk`] and the
//!   surrounding message survives;
//! - a broken header or attribute line turns the whole entry (with its attached
//!   comment) into an [`Entry::Junk`];
//! - any other unexpected line becomes an [`Entry::Junk`] that runs up to the
//!   next line that looks like the start of an entry.
//!
//! Placeables stay opaque but must be valid Fluent expressions, which is
//! checked with `fluent-syntax`. Blank lines between entries are kept as
//! [`Entry::Blank`].

use std::borrow::Cow;

use tracing::warn;

use crate::ast::{
    Attribute, Comment, CommentLevel, Entry, Junk, Message, Pattern, PatternElement, Resource,
    Term,
};

/// Head of the wrapper entry used by [`parse_value`].
pub const SYNTHETIC_PREFIX: &str = "variable =";

/// Parses a whole resource.
pub fn parse(source: &str) -> Resource {
    let source = normalize_line_endings(source);
    ResourceParser::new(&source).parse()
}

/// Parses a free-standing value as it would appear after `key =`.
///
/// Every line is indented by `indent` spaces and placed below the key, so a
/// plain multi-line string reads as a block pattern and keeps the relative
/// indentation of its lines. If the value cannot be read back as a clean
/// pattern, the result is a single junk element holding the input with the
/// wrapper and indentation removed again.
pub fn parse_value(text: &str, indent: usize) -> Pattern {
    let text = normalize_line_endings(text);
    if text.trim().is_empty() {
        return Pattern::default();
    }

    let padding = continuation_padding(indent);
    let indented = text.replace('\n', &padding);
    // A block line starting with `[`, `*` or `.` ends the pattern, so such a
    // first line goes inline, as the serializer writes it.
    let source = if text.trim_start().starts_with(['[', '*', '.']) {
        format!("{SYNTHETIC_PREFIX} {indented}")
    } else {
        format!("{SYNTHETIC_PREFIX}{padding}{indented}")
    };
    let resource = ResourceParser::new(&source).parse();

    let mut entries = resource
        .body
        .iter()
        .filter(|entry| !matches!(entry, Entry::Blank(_)));
    if let (Some(Entry::Message(message)), None) = (entries.next(), entries.next()) {
        if message.attributes.is_empty() && message.comment.is_none() {
            if let Some(value) = &message.value {
                return value.clone();
            }
        }
    }

    warn!(value = %text, "Value does not parse as a clean pattern");
    Pattern::new(vec![PatternElement::Junk(strip_synthetic(&source, indent))])
}

/// Removes the wrapper added by [`parse_value`] from a junk fragment.
pub(crate) fn strip_synthetic(content: &str, indent: usize) -> String {
    content
        .strip_prefix(SYNTHETIC_PREFIX)
        .unwrap_or(content)
        .trim()
        .replace(&continuation_padding(indent), "\n")
}

pub(crate) fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn continuation_padding(indent: usize) -> String {
    format!("\n{}", " ".repeat(indent.max(1)))
}

struct ResourceParser<'s> {
    src: &'s str,
    pos: usize,
    body: Vec<Entry>,
    /// A `#` comment that attaches to the next entry if no blank line follows.
    pending: Option<(Comment, usize)>,
}

impl<'s> ResourceParser<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            body: Vec::new(),
            pending: None,
        }
    }

    fn parse(mut self) -> Resource {
        while self.pos < self.src.len() {
            let start = self.pos;
            if self.skip_blank_lines() {
                self.flush_comment();
                let blank = self.src[start..self.pos].to_string();
                self.body.push(Entry::Blank(blank));
                continue;
            }

            match self.src[start..].chars().next() {
                Some('#') => self.comment(start),
                Some(c) if c.is_ascii_alphabetic() || c == '-' => self.entry(start),
                _ => {
                    self.flush_comment();
                    self.junk(start, start, "expected a message, term or comment");
                }
            }
        }
        self.flush_comment();

        Resource::new(self.body)
    }

    fn skip_blank_lines(&mut self) -> bool {
        let mut skipped = false;
        while self.pos < self.src.len() {
            let end = line_end(self.src, self.pos);
            if !is_blank(&self.src[self.pos..end]) {
                break;
            }
            self.pos = next_line(self.src, end);
            skipped = true;
        }
        skipped
    }

    fn flush_comment(&mut self) {
        if let Some((comment, _)) = self.pending.take() {
            self.body.push(Entry::Comment(comment));
        }
    }

    fn comment(&mut self, start: usize) {
        match read_comment(self.src, start) {
            Some((comment, end)) => {
                // Consecutive lines of one level were merged, so anything pending
                // has a different level and stands alone.
                self.flush_comment();
                self.pos = end;
                if comment.level == CommentLevel::Regular {
                    self.pending = Some((comment, start));
                } else {
                    self.body.push(Entry::Comment(comment));
                }
            }
            None => {
                self.flush_comment();
                self.junk(start, start, "expected `#`, `##` or `###` followed by a space");
            }
        }
    }

    fn entry(&mut self, start: usize) {
        match EntryParser::new(self.src, start).parse() {
            Ok((mut entry, end)) => {
                if let Some((comment, _)) = self.pending.take() {
                    match &mut entry {
                        Entry::Message(message) => message.comment = Some(comment),
                        Entry::Term(term) => term.comment = Some(comment),
                        _ => {}
                    }
                }
                self.body.push(entry);
                self.pos = end;
            }
            Err(error) => {
                let junk_start = self
                    .pending
                    .take()
                    .map_or(start, |(_, comment_start)| comment_start);
                self.junk(junk_start, start, &error.0);
            }
        }
    }

    fn junk(&mut self, junk_start: usize, from: usize, reason: &str) {
        let end = next_entry_start(self.src, from);
        let content = &self.src[junk_start..end];
        warn!(reason, junk = %content.trim_end(), "Unparseable entry kept as junk");
        self.body.push(Entry::Junk(Junk {
            content: content.to_string(),
        }));
        self.pos = end;
    }
}

/// Reads consecutive comment lines of the same level starting at `start`.
fn read_comment(src: &str, start: usize) -> Option<(Comment, usize)> {
    let mut level = None;
    let mut lines = Vec::new();
    let mut pos = start;

    while pos < src.len() {
        let end = line_end(src, pos);
        let line = &src[pos..end];
        let depth = line.len() - line.trim_start_matches('#').len();
        let Some(line_level) = CommentLevel::from_depth(depth) else {
            break;
        };
        if level.is_some_and(|level| level != line_level) {
            break;
        }
        let rest = &line[depth..];
        let text = if rest.is_empty() {
            ""
        } else if let Some(text) = rest.strip_prefix(' ') {
            text
        } else {
            break;
        };

        level = Some(line_level);
        lines.push(text);
        pos = next_line(src, end);
    }

    let level = level?;
    Some((
        Comment {
            level,
            content: lines.join("\n"),
        },
        pos,
    ))
}

#[derive(Debug)]
struct ParseError(String);

type ParseResult<T> = Result<T, ParseError>;

struct EntryParser<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> EntryParser<'s> {
    fn new(src: &'s str, pos: usize) -> Self {
        Self { src, pos }
    }

    fn parse(mut self) -> ParseResult<(Entry, usize)> {
        let is_term = self.eat('-');
        let id = self
            .identifier()
            .ok_or_else(|| ParseError("expected an identifier".to_string()))?;
        self.skip_inline_blank();
        if !self.eat('=') {
            return Err(ParseError(format!("expected `=` after `{id}`")));
        }

        let value = self.pattern();
        let mut attributes = Vec::new();
        while let Some(attribute) = self.attribute()? {
            attributes.push(attribute);
        }
        let end = next_line(self.src, self.pos);

        let entry = if is_term {
            let value = value
                .ok_or_else(|| ParseError(format!("expected term `-{id}` to have a value")))?;
            Entry::Term(Term {
                id,
                value,
                attributes,
                comment: None,
            })
        } else {
            if value.is_none() && attributes.is_empty() {
                return Err(ParseError(format!(
                    "expected message `{id}` to have a value or attributes"
                )));
            }
            Entry::Message(Message {
                id,
                value,
                attributes,
                comment: None,
            })
        };

        Ok((entry, end))
    }

    fn eat(&mut self, c: char) -> bool {
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_inline_blank(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
    }

    fn identifier(&mut self) -> Option<String> {
        let rest = &self.src[self.pos..];
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        self.pos += len;
        Some(rest[..len].to_string())
    }

    fn attribute(&mut self) -> ParseResult<Option<Attribute>> {
        let Some(start) = next_attribute_line(self.src, self.pos) else {
            return Ok(None);
        };
        self.pos = start;
        self.eat('.');

        let id = self
            .identifier()
            .ok_or_else(|| ParseError("expected an attribute name after `.`".to_string()))?;
        self.skip_inline_blank();
        if !self.eat('=') {
            return Err(ParseError(format!("expected `=` after attribute `.{id}`")));
        }
        let value = self
            .pattern()
            .ok_or_else(|| ParseError(format!("expected a value for attribute `.{id}`")))?;

        Ok(Some(Attribute { id, value }))
    }

    /// Reads the inline part and every continuation line of a pattern, leaving
    /// the cursor at the end of its last line.
    fn pattern(&mut self) -> Option<Pattern> {
        self.skip_inline_blank();

        let mut lines = Vec::new();
        let mut scanner = BraceScanner::default();
        let mut start = self.pos;
        let mut top_level = true;

        loop {
            let end = line_end(self.src, start);
            let text = &self.src[start..end];
            for byte in text.bytes() {
                scanner.feed(byte);
            }
            scanner.end_line();
            lines.push(RawLine { text, top_level });
            self.pos = end;

            let Some((blank_lines, next)) = continuation(self.src, end, scanner.depth) else {
                break;
            };
            top_level = scanner.depth == 0;
            for _ in 0..blank_lines {
                lines.push(RawLine { text: "", top_level });
            }
            start = next;
        }

        let text = dedent(&lines);
        if text.is_empty() {
            None
        } else {
            Some(Pattern::new(tokenize(&text)))
        }
    }
}

struct RawLine<'s> {
    text: &'s str,
    /// The line starts outside of any placeable.
    top_level: bool,
}

/// Tracks brace depth and string literals inside placeables.
#[derive(Debug, Default)]
struct BraceScanner {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl BraceScanner {
    fn feed(&mut self, byte: u8) {
        if self.in_string {
            match byte {
                _ if self.escaped => self.escaped = false,
                b'\\' => self.escaped = true,
                b'"' | b'\n' => self.in_string = false,
                _ => {}
            }
            return;
        }
        match byte {
            b'{' => self.depth += 1,
            b'}' => self.depth = self.depth.saturating_sub(1),
            b'"' if self.depth > 0 => self.in_string = true,
            _ => {}
        }
    }

    /// String literals never span lines.
    fn end_line(&mut self) {
        self.in_string = false;
        self.escaped = false;
    }
}

/// Decides whether the line after `end` continues the current pattern.
///
/// Returns the number of blank lines in between and the start of the next line.
fn continuation(src: &str, mut end: usize, depth: usize) -> Option<(usize, usize)> {
    let mut blank_lines = 0;
    while end < src.len() {
        let start = end + 1;
        let stop = line_end(src, start);
        let line = &src[start..stop];
        if is_blank(line) {
            blank_lines += 1;
            end = stop;
            continue;
        }

        let content = line.trim_start_matches(' ');
        let indent = line.len() - content.len();
        let continues = if depth == 0 {
            indent > 0 && !content.starts_with(['[', '*', '.', '}'])
        } else {
            indent > 0 || content.starts_with('}')
        };
        return continues.then_some((blank_lines, start));
    }
    None
}

/// Finds the `.` of an indented attribute line following `end`.
fn next_attribute_line(src: &str, mut end: usize) -> Option<usize> {
    while end < src.len() {
        let start = end + 1;
        let stop = line_end(src, start);
        let line = &src[start..stop];
        if is_blank(line) {
            end = stop;
            continue;
        }
        let content = line.trim_start_matches(' ');
        let indent = line.len() - content.len();
        return (indent > 0 && content.starts_with('.')).then_some(start + indent);
    }
    None
}

/// Joins pattern lines, removing the common indentation of the block lines
/// and trailing whitespace.
fn dedent(lines: &[RawLine<'_>]) -> String {
    let block = lines.get(1..).unwrap_or_default();
    let indent_of = |line: &RawLine<'_>| line.text.len() - line.text.trim_start_matches(' ').len();
    let common = block
        .iter()
        .filter(|line| line.top_level && !is_blank(line.text))
        .map(indent_of)
        .min()
        .or_else(|| {
            block
                .iter()
                .filter(|line| !is_blank(line.text))
                .map(indent_of)
                .min()
        })
        .unwrap_or(0);

    let mut parts = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        if !is_blank(first.text) {
            parts.push(first.text);
        }
    }
    for line in block {
        if is_blank(line.text) {
            parts.push("");
        } else {
            parts.push(&line.text[indent_of(line).min(common)..]);
        }
    }

    parts
        .join("\n")
        .trim_end_matches([' ', '\t', '\n'])
        .to_string()
}

/// Splits dedented pattern text into text runs and placeables.
fn tokenize(text: &str) -> Vec<PatternElement> {
    let mut elements = Vec::new();
    let bytes = text.as_bytes();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => {
                push_text(&mut elements, &text[literal_start..pos]);
                let end = placeable_end(text, pos);
                let raw = &text[pos..end.unwrap_or(text.len())];
                if end.is_some() && is_valid_placeable(raw) {
                    elements.push(PatternElement::Placeable(raw.to_string()));
                } else {
                    warn!(placeable = %raw, "Unparseable placeable kept as junk");
                    elements.push(PatternElement::Junk(raw.to_string()));
                }
                pos = end.unwrap_or(text.len());
                literal_start = pos;
            }
            b'}' => {
                push_text(&mut elements, &text[literal_start..pos]);
                warn!("Unbalanced `}}` kept as junk");
                elements.push(PatternElement::Junk("}".to_string()));
                pos += 1;
                literal_start = pos;
            }
            _ => pos += 1,
        }
    }
    push_text(&mut elements, &text[literal_start..]);

    elements
}

fn push_text(elements: &mut Vec<PatternElement>, text: &str) {
    if !text.is_empty() {
        elements.push(PatternElement::Text(text.to_string()));
    }
}

/// Byte offset just past the `}` closing the placeable opened at `start`.
fn placeable_end(text: &str, start: usize) -> Option<usize> {
    let mut scanner = BraceScanner::default();
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        scanner.feed(*byte);
        if scanner.depth == 0 && !scanner.in_string {
            return Some(start + offset + 1);
        }
    }
    None
}

/// Checks a complete `{ … }` placeable against the Fluent grammar.
fn is_valid_placeable(raw: &str) -> bool {
    let source = format!("k = {}\n", raw.replace('\n', "\n    "));
    fluent_syntax::parser::parse(source.as_str()).is_ok()
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

fn line_end(src: &str, from: usize) -> usize {
    src[from..].find('\n').map_or(src.len(), |offset| from + offset)
}

fn next_line(src: &str, end: usize) -> usize {
    (end + 1).min(src.len())
}

/// Start of the next line that can begin an entry, or the end of input.
fn next_entry_start(src: &str, from: usize) -> usize {
    let mut end = line_end(src, from);
    while end < src.len() {
        let start = end + 1;
        if src[start..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '-' || c == '#') {
            return start;
        }
        end = line_end(src, start);
    }
    src.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn message(resource: &Resource, index: usize) -> &Message {
        match &resource.body[index] {
            Entry::Message(message) => message,
            other => panic!("expected a message, got {:?}", other),
        }
    }

    fn text(value: &str) -> PatternElement {
        PatternElement::Text(value.to_string())
    }

    fn placeable(value: &str) -> PatternElement {
        PatternElement::Placeable(value.to_string())
    }

    #[test]
    fn test_parse_simple_message() {
        let resource = parse("hello = Hello, world!\n");
        assert_eq!(resource.body.len(), 1);
        let hello = message(&resource, 0);
        assert_eq!(hello.id, "hello");
        assert_eq!(hello.value, Some(Pattern::text("Hello, world!")));
        assert!(hello.attributes.is_empty());
        assert!(hello.comment.is_none());
    }

    #[test]
    fn test_parse_placeables_are_opaque() {
        let resource = parse("welcome = Welcome, {$user}! You have { NUMBER($count) } new { -brand }.\n");
        let welcome = message(&resource, 0);
        assert_eq!(
            welcome.value.as_ref().unwrap().elements,
            vec![
                text("Welcome, "),
                placeable("{$user}"),
                text("! You have "),
                placeable("{ NUMBER($count) }"),
                text(" new "),
                placeable("{ -brand }"),
                text("."),
            ]
        );
    }

    #[test]
    fn test_parse_term_and_attributes() {
        let resource = parse(indoc! {"
            -brand = Firefox
                .gender = masculine
            login = Log in
                .title = Log in to { -brand }
                .accesskey = L
        "});
        assert_eq!(resource.body.len(), 2);
        match &resource.body[0] {
            Entry::Term(term) => {
                assert_eq!(term.id, "brand");
                assert_eq!(term.value, Pattern::text("Firefox"));
                assert_eq!(term.attributes[0].id, "gender");
            }
            other => panic!("expected a term, got {:?}", other),
        }
        let login = message(&resource, 1);
        assert_eq!(login.attributes.len(), 2);
        assert_eq!(
            login.attributes[0].value.elements,
            vec![text("Log in to "), placeable("{ -brand }")]
        );
        assert_eq!(login.attributes[1].value, Pattern::text("L"));
    }

    #[test]
    fn test_parse_attributes_only_message() {
        let resource = parse("menu =\n    .label = Menu\n");
        let menu = message(&resource, 0);
        assert!(menu.value.is_none());
        assert_eq!(menu.attributes[0].id, "label");
    }

    #[test]
    fn test_parse_multiline_block_is_dedented() {
        let resource = parse(indoc! {"
            about =
                First line
                  indented line

                after a blank line
            next = x
        "});
        let about = message(&resource, 0);
        assert_eq!(
            about.value,
            Some(Pattern::text(
                "First line\n  indented line\n\nafter a blank line"
            ))
        );
        assert_eq!(message(&resource, 1).id, "next");
    }

    #[test]
    fn test_parse_inline_start_with_continuation() {
        let resource = parse("multi = one\n    two\n    three\n");
        assert_eq!(
            message(&resource, 0).value,
            Some(Pattern::text("one\ntwo\nthree"))
        );
    }

    #[test]
    fn test_parse_select_expression_placeable() {
        let resource = parse(indoc! {"
            emails =
                { $count ->
                    [one] One email
                   *[other] { $count } emails
                }
        "});
        let emails = message(&resource, 0);
        assert_eq!(
            emails.value.as_ref().unwrap().elements,
            vec![placeable(
                "{ $count ->\n    [one] One email\n   *[other] { $count } emails\n}"
            )]
        );
        assert!(!resource.has_junk());
    }

    #[test]
    fn test_parse_comments() {
        let resource = parse(indoc! {"
            ### Resource comment

            ## Group
            ## comment

            # Standalone

            # Attached
            #
            # to greeting
            greeting = Hi
        "});
        assert_eq!(resource.body.len(), 7);
        assert_eq!(resource.body[1], Entry::Blank("\n".to_string()));
        match &resource.body[0] {
            Entry::Comment(comment) => {
                assert_eq!(comment.level, CommentLevel::Resource);
                assert_eq!(comment.content, "Resource comment");
            }
            other => panic!("unexpected {:?}", other),
        }
        match &resource.body[2] {
            Entry::Comment(comment) => {
                assert_eq!(comment.level, CommentLevel::Group);
                assert_eq!(comment.content, "Group\ncomment");
            }
            other => panic!("unexpected {:?}", other),
        }
        match &resource.body[4] {
            Entry::Comment(comment) => assert_eq!(comment.content, "Standalone"),
            other => panic!("unexpected {:?}", other),
        }
        let greeting = message(&resource, 6);
        assert_eq!(
            greeting.comment.as_ref().unwrap().content,
            "Attached\n\nto greeting"
        );
    }

    #[test]
    fn test_bad_placeable_degrades_to_junk_element() {
        let resource = parse("broken = Hello { } world\nfine = ok\n");
        let broken = message(&resource, 0);
        assert_eq!(
            broken.value.as_ref().unwrap().elements,
            vec![
                text("Hello "),
                PatternElement::Junk("{ }".to_string()),
                text(" world"),
            ]
        );
        assert_eq!(message(&resource, 1).id, "fine");
        assert!(resource.has_junk());
    }

    #[test]
    fn test_unclosed_placeable_stops_at_next_entry() {
        let resource = parse("broken = Hello { $name\nfine = ok\n");
        let broken = message(&resource, 0);
        assert_eq!(
            broken.value.as_ref().unwrap().elements,
            vec![text("Hello "), PatternElement::Junk("{ $name".to_string())]
        );
        assert_eq!(message(&resource, 1).value, Some(Pattern::text("ok")));
    }

    #[test]
    fn test_placeables_must_be_valid_expressions() {
        for raw in ["{ NUMBER($n }", "{ $ }", "{ $a $b }", "{ x y z }", "{ 1abc }"] {
            let resource = parse(&format!("broken = Hi {raw}\n"));
            assert_eq!(
                message(&resource, 0).value.as_ref().unwrap().elements,
                vec![text("Hi "), PatternElement::Junk(raw.to_string())],
                "placeable {:?}",
                raw
            );
        }

        let resource = parse("ok = { msg.title } { -brand(case: \"genitive\") } { 1.5 } { \"\\u0020\" }\n");
        assert!(!resource.has_junk());
    }

    #[test]
    fn test_blank_lines_between_entries_are_kept() {
        let resource = parse("\na = 1\n\n\nb = 2\n  \n");
        assert_eq!(
            resource.body.iter().map(|entry| entry.key()).collect::<Vec<_>>(),
            vec![None, Some("a".to_string()), None, Some("b".to_string()), None]
        );
        assert_eq!(resource.body[0], Entry::Blank("\n".to_string()));
        assert_eq!(resource.body[2], Entry::Blank("\n\n".to_string()));
        assert_eq!(resource.body[4], Entry::Blank("  \n".to_string()));
        assert!(!resource.has_junk());
    }

    #[test]
    fn test_select_without_default_is_junk_element() {
        let resource = parse("sel = { $n ->\n    [one] x\n    [other] y\n}\n");
        assert!(message(&resource, 0).value.as_ref().unwrap().has_junk());
    }

    #[test]
    fn test_broken_entries_become_junk() {
        let source = indoc! {"
            good = Good
            # attached to a broken entry
            broken value without equals
            -term =
            ok = Fine
        "};
        let resource = parse(source);
        assert_eq!(resource.body.len(), 4);
        assert_eq!(message(&resource, 0).id, "good");
        match &resource.body[1] {
            Entry::Junk(junk) => assert_eq!(
                junk.content,
                "# attached to a broken entry\nbroken value without equals\n"
            ),
            other => panic!("expected junk, got {:?}", other),
        }
        match &resource.body[2] {
            Entry::Junk(junk) => assert_eq!(junk.content, "-term =\n"),
            other => panic!("expected junk, got {:?}", other),
        }
        assert_eq!(message(&resource, 3).id, "ok");
    }

    #[test]
    fn test_broken_attribute_makes_entry_junk() {
        let resource = parse("login = Log in\n    .title\nnext = x\n");
        assert_eq!(resource.body.len(), 2);
        assert!(matches!(&resource.body[0], Entry::Junk(junk) if junk.content == "login = Log in\n    .title\n"));
        assert_eq!(message(&resource, 1).id, "next");
    }

    #[test]
    fn test_stray_indented_line_is_junk() {
        let resource = parse("a = 1\n    [b] 2\nc = 3\n");
        assert_eq!(resource.body.len(), 3);
        assert!(matches!(&resource.body[1], Entry::Junk(junk) if junk.content == "    [b] 2\n"));
    }

    #[test]
    fn test_message_without_value_or_attributes_is_junk() {
        let resource = parse("empty =\n");
        assert!(matches!(&resource.body[0], Entry::Junk(_)));
    }

    #[test]
    fn test_crlf_input() {
        let resource = parse("a = one\r\n    two\r\nb = three\r\n");
        assert_eq!(message(&resource, 0).value, Some(Pattern::text("one\ntwo")));
        assert_eq!(message(&resource, 1).value, Some(Pattern::text("three")));
    }

    #[test]
    fn test_unicode_text() {
        let resource = parse("dessert = Café crème brûlée { $n } 🍮\n");
        assert_eq!(
            message(&resource, 0).value.as_ref().unwrap().elements,
            vec![
                text("Café crème brûlée "),
                placeable("{ $n }"),
                text(" 🍮")
            ]
        );
    }

    #[test]
    fn test_parse_value_plain_and_multiline() {
        assert_eq!(parse_value("Hello", 4), Pattern::text("Hello"));
        assert_eq!(
            parse_value("line one\nline two", 4),
            Pattern::text("line one\nline two")
        );
        assert_eq!(
            parse_value("Hi { $name }", 4).elements,
            vec![text("Hi "), placeable("{ $name }")]
        );
        assert_eq!(parse_value("   ", 4), Pattern::default());
    }

    #[test]
    fn test_parse_value_keeps_relative_indentation() {
        assert_eq!(
            parse_value("First line\n  indented line", 4),
            Pattern::text("First line\n  indented line")
        );
        assert_eq!(parse_value("  a\n  b", 2), Pattern::text("a\nb"));
        assert_eq!(parse_value("trailing\n\n", 4), Pattern::text("trailing"));
        assert_eq!(
            parse_value("[not a variant]\n  next", 4),
            Pattern::text("[not a variant]\nnext")
        );
    }

    #[test]
    fn test_parse_value_junk_keeps_raw_text() {
        let pattern = parse_value("first\n[second]", 4);
        assert_eq!(
            pattern.elements,
            vec![PatternElement::Junk("first\n[second]".to_string())]
        );

        let pattern = parse_value("first\n.attr = x", 4);
        assert_eq!(
            pattern.elements,
            vec![PatternElement::Junk("first\n.attr = x".to_string())]
        );
    }

    #[test]
    fn test_strip_synthetic() {
        assert_eq!(
            strip_synthetic("variable = a\n    b\n", 4),
            "a\nb".to_string()
        );
        assert_eq!(
            strip_synthetic("variable =\n    a {\n      b\n", 4),
            "a {\n  b".to_string()
        );
        assert_eq!(strip_synthetic("{ }", 4), "{ }".to_string());
    }
}
