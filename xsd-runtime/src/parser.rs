//! The streaming validator/tokenizer itself (§4.3, §6.2). A single
//! forward pass over the document text, dispatching against the
//! descriptor tables in [`crate::tables`] as it goes — no DOM, no
//! lookahead beyond one token.
//!
//! Grounded on `original_source/src/XmlParser.cpp` end to end: the
//! `skipSpace`/`skipText`/`unescapeString`/`stripComments`/`readToken`
//! free functions, and the `enterElement`/`checkElement`/`setAttribute`/
//! `addText`/`checkAttributes`/`parseElement`/`parse` pipeline built
//! on top of them. Byte scanning only ever stops at ASCII delimiters
//! (`<`, `&`, `;`, quotes, whitespace), which are never UTF-8
//! continuation bytes, so every slice taken here lands on a char
//! boundary — no `unsafe` or lossy conversion is needed anywhere below.

use std::any::Any;
use std::collections::HashMap;

use crate::error::{ParseError, Result};
use crate::position::Position;
use crate::tables::ElementInfo;

#[derive(Debug, PartialEq)]
enum Token {
    StartTagBegin, // <
    TagEnd,        // >
    EndTagBegin,   // </
    EmptyTagEnd,   // />
    EqualsSign,    // =
    String(String),
    Name(String),
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, line: 1, line_start: 0 }
    }

    fn byte(&self, at: usize) -> u8 {
        self.input.as_bytes().get(at).copied().unwrap_or(0)
    }

    fn peek(&self) -> u8 {
        self.byte(self.pos)
    }

    fn starts_with_at(&self, at: usize, needle: &str) -> bool {
        self.input.get(at..).map_or(false, |s| s.starts_with(needle))
    }

    fn find_from(&self, from: usize, needles: &[u8]) -> Option<usize> {
        self.input.as_bytes()[from.min(self.input.len())..]
            .iter()
            .position(|b| needles.contains(b))
            .map(|offset| from + offset)
    }

    fn position(&self) -> Position {
        Position { line: self.line }
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax { line: self.line, message: message.into() }
    }

    fn verification_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Verification { line: self.line, message: message.into() }
    }

    fn advance_newline(&mut self) {
        if self.byte(self.pos) == b'\r' {
            self.pos += 1;
            if self.byte(self.pos) == b'\n' {
                self.pos += 1;
            }
        } else {
            self.pos += 1;
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    fn skip_space(&mut self) {
        loop {
            match self.peek() {
                b'\r' | b'\n' => self.advance_newline(),
                b'<' if self.starts_with_at(self.pos + 1, "!--") => {
                    self.pos += 4;
                    loop {
                        match self.find_from(self.pos, b"-\r\n") {
                            None => {
                                self.pos = self.input.len();
                                return;
                            }
                            Some(end) => {
                                self.pos = end;
                                match self.peek() {
                                    b'\r' | b'\n' => self.advance_newline(),
                                    _ => {
                                        if self.starts_with_at(self.pos + 1, "->") {
                                            self.pos = end + 3;
                                            break;
                                        }
                                        self.pos += 1;
                                    }
                                }
                            }
                        }
                    }
                }
                b' ' | b'\t' | 0x0b | 0x0c => self.pos += 1,
                _ => return,
            }
        }
    }

    fn skip_text(&mut self) -> Result<()> {
        loop {
            match self.find_from(self.pos, b"<\r\n") {
                None => {
                    self.pos = self.input.len();
                    return Err(self.syntax_error("Unexpected end of file"));
                }
                Some(end) => {
                    self.pos = end;
                    match self.peek() {
                        b'\r' | b'\n' => self.advance_newline(),
                        _ => {
                            if self.byte(self.pos + 1) == b'!' {
                                self.skip_space();
                                continue;
                            }
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Decodes `&amp; &lt; &gt; &quot; &apos; &#N; &#xN;`. Any other escape
/// sequence, or one missing its terminating `;`, passes through as the
/// literal text it appeared as.
pub fn unescape_string(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len());
    let mut i = 0;
    loop {
        match find_byte(bytes, i, b'&') {
            None => {
                result.push_str(&s[i..]);
                return result;
            }
            Some(next) => {
                result.push_str(&s[i..next]);
                i = next + 1;
                let Some(seq_end) = find_byte(bytes, i, b';') else {
                    result.push('&');
                    continue;
                };
                let seq = &s[i..seq_end];
                if let Some(rest) = seq.strip_prefix('#') {
                    let parsed = if let Some(hex) = rest.strip_prefix('x') {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        rest.parse::<u32>().ok()
                    };
                    match parsed.and_then(char::from_u32) {
                        Some(ch) => {
                            result.push(ch);
                            i = seq_end + 1;
                        }
                        None => result.push('&'),
                    }
                    continue;
                }
                let translated = match seq {
                    "apos" => Some('\''),
                    "quot" => Some('"'),
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    _ => None,
                };
                match translated {
                    Some(ch) => {
                        result.push(ch);
                        i = seq_end + 1;
                    }
                    None => result.push('&'),
                }
            }
        }
    }
}

/// Strips `<!-- ... -->` comments out of a captured text run. An
/// unterminated comment is treated as implicitly closed at EOF rather
/// than scanning forever.
pub fn strip_comments(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len());
    let mut i = 0;
    loop {
        match find_byte(bytes, i, b'<') {
            None => {
                result.push_str(&s[i..]);
                return result;
            }
            Some(next) => {
                result.push_str(&s[i..next]);
                if !s.get(next + 1..).map_or(false, |rest| rest.starts_with("!--")) {
                    result.push_str(&s[next..]);
                    return result;
                }
                i = next + 4;
                loop {
                    match find_byte(bytes, i, b'-') {
                        None => {
                            i = s.len();
                            break;
                        }
                        Some(dash) => {
                            if s.get(dash + 1..).map_or(false, |rest| rest.starts_with("->")) {
                                i = dash + 3;
                                break;
                            }
                            i = dash + 1;
                        }
                    }
                }
                if i >= s.len() {
                    return result;
                }
            }
        }
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..].iter().position(|b| *b == needle).map(|offset| from + offset)
}

/// Per-element bookkeeping (§4.3.1's "occurrence bitmap"). Carries no
/// lifetime of its own — unlike `original_source`'s `ElementContext`,
/// the live `&mut dyn Any` element is threaded as its own function
/// parameter throughout this module rather than stored alongside this
/// state, since reborrowing a `&'e mut` field held behind another
/// `&mut` wrapper doesn't let the borrow checker hand back the full
/// `'e` on return; plain parameters do.
struct ElementState {
    info: &'static ElementInfo,
    processed_elements: HashMap<*const (), usize>,
    processed_attributes: u64,
}

impl ElementState {
    fn new(info: &'static ElementInfo) -> Self {
        Self {
            info,
            processed_elements: HashMap::with_capacity(info.children.len()),
            processed_attributes: 0,
        }
    }
}

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub struct Parser<'a> {
    cursor: Cursor<'a>,
    namespaces: &'a [&'a str],
    namespace_prefix_to_index: HashMap<String, usize>,
}

impl<'a> Parser<'a> {
    fn read_token(&mut self) -> Result<Token> {
        self.cursor.skip_space();
        match self.cursor.peek() {
            b'<' => {
                if self.cursor.byte(self.cursor.pos + 1) == b'/' {
                    self.cursor.pos += 2;
                    Ok(Token::EndTagBegin)
                } else {
                    self.cursor.pos += 1;
                    Ok(Token::StartTagBegin)
                }
            }
            b'>' => {
                self.cursor.pos += 1;
                Ok(Token::TagEnd)
            }
            0 => Err(self.cursor.syntax_error("Unexpected end of file")),
            b'=' => {
                self.cursor.pos += 1;
                Ok(Token::EqualsSign)
            }
            quote @ (b'"' | b'\'') => {
                let start = self.cursor.pos + 1;
                let Some(end) = self.cursor.find_from(start, &[b'"', b'\'', b'\r', b'\n']) else {
                    return Err(self.cursor.syntax_error("Unexpected end of file"));
                };
                if self.cursor.byte(end) != quote {
                    return Err(self.cursor.syntax_error("New line in string"));
                }
                let value = unescape_string(&self.cursor.input[start..end]);
                self.cursor.pos = end + 1;
                Ok(Token::String(value))
            }
            b'/' if self.cursor.byte(self.cursor.pos + 1) == b'>' => {
                self.cursor.pos += 2;
                Ok(Token::EmptyTagEnd)
            }
            _ => {
                let start = self.cursor.pos;
                let mut end = start;
                loop {
                    let b = self.cursor.byte(end);
                    if b == 0 || b == b'/' || b == b'>' || b == b'=' || (b as char).is_ascii_whitespace() {
                        break;
                    }
                    end += 1;
                }
                if end == start {
                    return Err(self.cursor.syntax_error("Expected name"));
                }
                let value = self.cursor.input[start..end].to_string();
                self.cursor.pos = end;
                Ok(Token::Name(value))
            }
        }
    }

    fn skip_text_and_sub_elements(&mut self, element_name: &str) -> Result<()> {
        loop {
            self.cursor.skip_text()?;
            let backup = self.cursor.pos;
            let backup_line = self.cursor.line;
            let backup_line_start = self.cursor.line_start;
            match self.read_token()? {
                Token::StartTagBegin => {
                    if let Token::Name(nested_name) = self.read_token()? {
                        self.skip_text_and_sub_elements(&nested_name)?;
                        self.read_token()?;
                    }
                }
                Token::EndTagBegin => {
                    if let Token::Name(name) = self.read_token()? {
                        if name == element_name {
                            self.cursor.pos = backup;
                            self.cursor.line = backup_line;
                            self.cursor.line_start = backup_line_start;
                            return Ok(());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Looks `name` up among `parent_state.info`'s children (and its base
    /// chain), bumps its occurrence count, and returns the child's fresh
    /// `ElementState` plus a reborrow of its field inside `parent_element`.
    fn enter_element<'e>(
        &mut self,
        parent_state: &mut ElementState,
        parent_element: &'e mut dyn Any,
        name: &str,
    ) -> Result<(ElementState, &'e mut dyn Any)> {
        let bare_name = name.split_once(':').map(|(_, local)| local).unwrap_or(name);
        let mut current = Some(parent_state.info);
        while let Some(info) = current {
            for child in info.children {
                if child.name == bare_name {
                    let key = child as *const _ as *const ();
                    let count = parent_state.processed_elements.entry(key).or_insert(0);
                    if child.max_occurs != 0 && *count >= child.max_occurs {
                        return Err(self
                            .cursor
                            .verification_error(format!("Maximum occurrence of element '{bare_name}' is {}", child.max_occurs)));
                    }
                    *count += 1;
                    let element = (child.get_field)(parent_element);
                    return Ok((ElementState::new(child.info), element));
                }
            }
            current = info.base;
        }
        Err(self.cursor.verification_error(format!("Unexpected element '{name}'")))
    }

    fn check_element(&self, state: &ElementState) -> Result<()> {
        // Unlike `total_attribute_count`, there's no cheap single-number
        // short-circuit here that's still correct across the `base`
        // chain, so this always walks it — `mandatory_children_count` is
        // informational only (kept for generated tables to report, not
        // consulted here).
        let mut current = Some(state.info);
        while let Some(info) = current {
            for child in info.children {
                let key = child as *const _ as *const ();
                let count = state.processed_elements.get(&key).copied().unwrap_or(0);
                if count < child.min_occurs {
                    return Err(self
                        .cursor
                        .verification_error(format!("Minimum occurrence of element '{}' is {}", child.name, child.min_occurs)));
                }
            }
            current = info.base;
        }
        Ok(())
    }

    fn set_attribute(&mut self, state: &mut ElementState, element: &mut dyn Any, name: &str, value: String) -> Result<()> {
        let mut attribute: u64 = 1;
        let mut current = Some(state.info);
        while let Some(info) = current {
            for a in info.attributes {
                if a.name == name {
                    if state.processed_attributes & attribute != 0 {
                        return Err(self.cursor.verification_error(format!("Repeated attribute '{name}'")));
                    }
                    state.processed_attributes |= attribute;
                    let position = self.cursor.position();
                    return (a.set_attribute)(element, position, value);
                }
                attribute <<= 1;
            }
            current = info.base;
        }

        if state.info.flags.level1 {
            if name == "xmlns" || name.starts_with("xmlns:") {
                let prefix = name.strip_prefix("xmlns:").unwrap_or("").to_string();
                if let Some(index) = self.namespaces.iter().position(|ns| **ns == value) {
                    self.namespace_prefix_to_index.insert(prefix, index);
                    return Ok(());
                }
                return Err(self.cursor.verification_error(format!("Unknown namespace '{value}'")));
            }
            if let Some((prefix, local)) = name.split_once(':') {
                if local == "noNamespaceSchemaLocation" {
                    if let Some(&index) = self.namespace_prefix_to_index.get(prefix) {
                        if self.namespaces.get(index) == Some(&XSI_NAMESPACE) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        let mut current = Some(state.info);
        while let Some(info) = current {
            if info.flags.any_attribute {
                if let Some(sink) = info.any_attribute_sink {
                    sink(element, name.to_string(), value);
                    return Ok(());
                }
            }
            current = info.base;
        }

        Err(self.cursor.verification_error(format!("Unexpected attribute '{name}'")))
    }

    fn add_text(&self, state: &ElementState, element: &mut dyn Any, text: String) {
        let Some(text_field) = state.info.text_field else {
            return;
        };
        let field = text_field(element);
        if field.is_empty() {
            *field = text;
        } else {
            field.push_str(&text);
        }
    }

    fn check_attributes(&self, state: &mut ElementState, element: &mut dyn Any) -> Result<()> {
        let total = state.info.total_attribute_count();
        let mask: u64 = if total >= 64 { u64::MAX } else { (1u64 << total) - 1 };
        let missing = mask & !state.processed_attributes;
        if missing == 0 {
            return Ok(());
        }

        let mut attribute: u64 = 1;
        let mut current = Some(state.info);
        while let Some(info) = current {
            for a in info.attributes {
                if missing & attribute != 0 {
                    if a.is_mandatory {
                        return Err(self.cursor.verification_error(format!("Missing attribute '{}'", a.name)));
                    }
                    if let Some(set_default) = a.set_default_value {
                        set_default(element);
                    }
                }
                attribute <<= 1;
            }
            current = info.base;
        }
        Ok(())
    }

    fn parse_element(&mut self, parent_state: &mut ElementState, parent_element: &mut dyn Any) -> Result<()> {
        let Token::Name(element_name) = self.read_token()? else {
            return Err(self.cursor.syntax_error("Expected tag name"));
        };
        let (mut state, element) = self.enter_element(parent_state, parent_element, &element_name)?;

        loop {
            match self.read_token()? {
                Token::EmptyTagEnd => {
                    self.check_attributes(&mut state, &mut *element)?;
                    return self.check_element(&state);
                }
                Token::TagEnd => break,
                Token::Name(attribute_name) => {
                    if !matches!(self.read_token()?, Token::EqualsSign) {
                        return Err(self.cursor.syntax_error("Expected '='"));
                    }
                    let Token::String(attribute_value) = self.read_token()? else {
                        return Err(self.cursor.syntax_error("Expected string"));
                    };
                    self.set_attribute(&mut state, &mut *element, &attribute_name, attribute_value)?;
                }
                _ => {}
            }
        }

        self.check_attributes(&mut state, &mut *element)?;

        loop {
            if state.info.flags.read_text {
                let start = self.cursor.pos;
                if state.info.flags.skip_processing {
                    self.skip_text_and_sub_elements(&element_name)?;
                } else {
                    self.cursor.skip_text()?;
                }
                if self.cursor.pos != start {
                    let text = strip_comments(&self.cursor.input[start..self.cursor.pos]);
                    self.add_text(&state, &mut *element, text);
                }
            } else {
                self.cursor.skip_text()?;
            }

            match self.read_token()? {
                Token::EndTagBegin => break,
                Token::StartTagBegin => {
                    self.parse_element(&mut state, &mut *element)?;
                }
                _ => return Err(self.cursor.syntax_error("Expected '<'")),
            }
        }

        let Token::Name(end_name) = self.read_token()? else {
            return Err(self.cursor.syntax_error("Expected tag name"));
        };
        if end_name != element_name {
            return Err(self.cursor.syntax_error(format!("Expected end tag of '{element_name}'")));
        }
        if !matches!(self.read_token()?, Token::TagEnd) {
            return Err(self.cursor.syntax_error("Expected '>'"));
        }
        self.check_element(&state)
    }
}

/// Parses `input` against `root`, using `root_info` as the descriptor
/// table for the document element. `namespaces` lists the namespace URIs
/// the generated binding recognizes, in the order `xmlns`/`xmlns:prefix`
/// declarations are matched against (§4.3.2).
pub fn parse<T: Any>(input: &str, namespaces: &[&str], root: &mut T, root_info: &'static ElementInfo) -> Result<()> {
    let mut parser = Parser {
        cursor: Cursor::new(input),
        namespaces,
        namespace_prefix_to_index: HashMap::new(),
    };

    parser.cursor.skip_space();
    while parser.cursor.peek() == b'<' && parser.cursor.byte(parser.cursor.pos + 1) == b'?' {
        parser.cursor.pos += 2;
        loop {
            match parser.cursor.find_from(parser.cursor.pos, b"\r\n?") {
                None => return Err(parser.cursor.syntax_error("Unexpected end of file")),
                Some(end) => {
                    if parser.cursor.byte(end) == b'?' && parser.cursor.byte(end + 1) == b'>' {
                        parser.cursor.pos = end + 2;
                        break;
                    }
                    parser.cursor.pos = end + 1;
                    parser.cursor.skip_space();
                }
            }
        }
        parser.cursor.skip_space();
    }

    if !matches!(parser.read_token()?, Token::StartTagBegin) {
        return Err(parser.cursor.syntax_error("Expected '<'"));
    }

    let mut root_state = ElementState::new(root_info);
    parser.parse_element(&mut root_state, root as &mut dyn Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_decodes_named_entities() {
        assert_eq!(unescape_string("test&amp;"), "test&");
    }

    #[test]
    fn unescape_decodes_numeric_entities() {
        assert_eq!(unescape_string("&#65;&#x42;"), "AB");
    }

    #[test]
    fn unescape_passes_through_unknown_entities() {
        assert_eq!(unescape_string("a&foo;b"), "a&foo;b");
    }

    #[test]
    fn unescape_passes_through_unterminated_entity() {
        assert_eq!(unescape_string("a&amp"), "a&amp");
    }

    #[test]
    fn strip_comments_removes_a_comment() {
        assert_eq!(strip_comments("<!-- abc -->"), "");
    }

    #[test]
    fn strip_comments_keeps_surrounding_text() {
        assert_eq!(strip_comments("x<!-- c -->y"), "xy");
    }

    #[test]
    fn strip_comments_leaves_non_comment_tags_alone() {
        assert_eq!(strip_comments("a<b>c"), "a<b>c");
    }
}
