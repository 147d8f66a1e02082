//! Token-aware rewrite.
//!
//! A single pass over the source records bracket structure and which line
//! starts fall inside strings, template literals or comments. Exports are
//! only recognised at depth zero in code, each method ends at the brace that
//! closes its body, and lines that begin inside a literal keep their exact
//! leading whitespace.

use super::exports::{line_number, ExportMatch, ExportScanner};
use super::{assemble_object, Conversion};
use crate::error::{ObjectifyError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Keywords after which a `/` starts a regular expression literal.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Code,
    Comment,
    Literal,
}

#[derive(Debug, Clone, Copy)]
struct LineStart {
    offset: usize,
    depth: usize,
    kind: LineKind,
}

#[derive(Debug, Clone, Copy)]
struct Punct {
    offset: usize,
    byte: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str(u8),
    Template,
    Regex { in_class: bool },
}

/// Bracket structure and line classification of one source text.
struct SourceMap {
    line_starts: Vec<LineStart>,
    puncts: Vec<Punct>,
    literal_lines: HashSet<usize>,
}

impl SourceMap {
    fn scan(source: &str) -> Result<Self> {
        let bytes = source.as_bytes();
        let mut state = State::Code;
        let mut stack: Vec<(u8, usize)> = Vec::new();
        let mut puncts = Vec::new();
        let mut line_starts = vec![LineStart {
            offset: 0,
            depth: 0,
            kind: LineKind::Code,
        }];
        let mut literal_start = 0;
        let mut last_significant: Option<usize> = None;
        let mut escaped = false;

        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();

            match state {
                State::Code => match b {
                    b'/' if next == Some(b'/') => {
                        state = State::LineComment;
                        i += 2;
                        continue;
                    }
                    b'/' if next == Some(b'*') => {
                        state = State::BlockComment;
                        literal_start = i;
                        i += 2;
                        continue;
                    }
                    b'/' if regex_allowed(bytes, last_significant) => {
                        state = State::Regex { in_class: false };
                        literal_start = i;
                    }
                    b'\'' | b'"' => {
                        state = State::Str(b);
                        literal_start = i;
                    }
                    b'`' => {
                        state = State::Template;
                        literal_start = i;
                    }
                    b'(' | b'[' | b'{' => {
                        stack.push((b, i));
                        puncts.push(Punct { offset: i, byte: b });
                        last_significant = Some(i);
                    }
                    b')' | b']' | b'}' => {
                        match stack.pop() {
                            Some((b'$', _)) if b == b'}' => state = State::Template,
                            Some((open, _)) if closes(open, b) => {
                                puncts.push(Punct { offset: i, byte: b });
                                last_significant = Some(i);
                            }
                            Some((open, at)) => {
                                return Err(malformed(
                                    source,
                                    i,
                                    format!(
                                        "'{}' does not close '{}' opened on line {}",
                                        b as char,
                                        open as char,
                                        line_number(source, at)
                                    ),
                                ));
                            }
                            None => {
                                return Err(malformed(
                                    source,
                                    i,
                                    format!("unexpected '{}'", b as char),
                                ));
                            }
                        }
                    }
                    b if b.is_ascii_whitespace() => {}
                    _ => last_significant = Some(i),
                },
                State::LineComment => {
                    if b == b'\n' {
                        state = State::Code;
                    }
                }
                State::BlockComment => {
                    if b == b'*' && next == Some(b'/') {
                        state = State::Code;
                        i += 2;
                        continue;
                    }
                }
                State::Str(quote) => {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == quote {
                        state = State::Code;
                        last_significant = Some(i);
                    } else if b == b'\n' {
                        return Err(malformed(source, literal_start, "unterminated string"));
                    }
                }
                State::Template => {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == b'`' {
                        state = State::Code;
                        last_significant = Some(i);
                    } else if b == b'$' && next == Some(b'{') {
                        stack.push((b'$', i));
                        state = State::Code;
                        i += 2;
                        continue;
                    }
                }
                State::Regex { in_class } => {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == b'\n' {
                        return Err(malformed(
                            source,
                            literal_start,
                            "unterminated regular expression",
                        ));
                    } else if in_class && b == b']' {
                        state = State::Regex { in_class: false };
                    } else if !in_class && b == b'[' {
                        state = State::Regex { in_class: true };
                    } else if !in_class && b == b'/' {
                        state = State::Code;
                        last_significant = Some(i);
                    }
                }
            }

            if b == b'\n' && i + 1 < bytes.len() {
                let kind = match state {
                    State::BlockComment => LineKind::Comment,
                    State::Str(_) | State::Template => LineKind::Literal,
                    _ => LineKind::Code,
                };
                line_starts.push(LineStart {
                    offset: i + 1,
                    depth: stack.len(),
                    kind,
                });
            }
            i += 1;
        }

        match state {
            State::Code | State::LineComment => {}
            State::BlockComment => {
                return Err(malformed(source, literal_start, "unterminated block comment"))
            }
            State::Template => {
                return Err(malformed(source, literal_start, "unterminated template literal"))
            }
            State::Str(_) => return Err(malformed(source, literal_start, "unterminated string")),
            State::Regex { .. } => {
                return Err(malformed(
                    source,
                    literal_start,
                    "unterminated regular expression",
                ))
            }
        }

        if let Some(&(open, at)) = stack.last() {
            let message = if open == b'$' {
                "unterminated template expression".to_string()
            } else {
                format!("unclosed '{}'", open as char)
            };
            return Err(malformed(source, at, message));
        }

        let literal_lines = line_starts
            .iter()
            .filter(|ls| ls.kind == LineKind::Literal)
            .map(|ls| ls.offset)
            .collect();

        Ok(Self {
            line_starts,
            puncts,
            literal_lines,
        })
    }

    fn exports(&self, scanner: &ExportScanner, source: &str) -> Vec<ExportMatch> {
        self.line_starts
            .iter()
            .filter(|ls| ls.depth == 0 && ls.kind == LineKind::Code)
            .filter_map(|ls| scanner.export_at(source, ls.offset))
            .collect()
    }

    /// Offset just past the brace closing the body of `export`.
    fn body_end(&self, source: &str, export: &ExportMatch) -> Result<usize> {
        let not_found = || {
            malformed(
                source,
                export.offset,
                format!("no function body found for '{}'", export.name),
            )
        };

        let open_paren = self
            .puncts
            .binary_search_by_key(&export.paren_offset, |p| p.offset)
            .map_err(|_| not_found())?;
        let close_paren = self.matching(open_paren).ok_or_else(not_found)?;

        let open_brace = close_paren + 1;
        match self.puncts.get(open_brace) {
            Some(p) if p.byte == b'{' => {}
            _ => return Err(not_found()),
        }

        let close_brace = self.matching(open_brace).ok_or_else(not_found)?;
        Ok(self.puncts[close_brace].offset + 1)
    }

    fn matching(&self, open_index: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (index, punct) in self.puncts.iter().enumerate().skip(open_index) {
            match punct.byte {
                b'(' | b'[' | b'{' => depth += 1,
                _ => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Copy `source[start..end]`, indenting every non-blank line that begins
    /// inside the span and outside a literal.
    fn indent_span(&self, source: &str, start: usize, end: usize, indent: &str) -> String {
        let text = &source[start..end];
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        let mut line_offset = start;

        for (n, line) in text.split('\n').enumerate() {
            if n > 0 {
                out.push('\n');
                if !line.trim().is_empty() && !self.literal_lines.contains(&line_offset) {
                    out.push_str(indent);
                }
            }
            out.push_str(line);
            line_offset += line.len() + 1;
        }
        out
    }
}

fn closes(open: u8, close: u8) -> bool {
    matches!((open, close), (b'(', b')') | (b'[', b']') | (b'{', b'}'))
}

fn regex_allowed(bytes: &[u8], last_significant: Option<usize>) -> bool {
    let Some(at) = last_significant else {
        return true;
    };

    let prev = bytes[at];
    if is_postfix_update(bytes, at) {
        return false;
    }
    if b"(,=:[!&|?{};+-*%<>~^".contains(&prev) {
        return true;
    }
    if !is_ident_byte(prev) {
        return false;
    }

    let mut word_start = at;
    while word_start > 0 && is_ident_byte(bytes[word_start - 1]) {
        word_start -= 1;
    }
    let word = &bytes[word_start..=at];
    REGEX_PRECEDING_KEYWORDS
        .iter()
        .any(|keyword| keyword.as_bytes() == word)
}

/// `i++` or `x--` ends an operand, so a following `/` divides.
fn is_postfix_update(bytes: &[u8], at: usize) -> bool {
    if at < 2 || !matches!(bytes[at], b'+' | b'-') || bytes[at - 1] != bytes[at] {
        return false;
    }
    let operand = bytes[at - 2];
    is_ident_byte(operand) || operand == b')' || operand == b']'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn malformed(source: &str, offset: usize, message: impl Into<String>) -> ObjectifyError {
    ObjectifyError::Malformed {
        line: line_number(source, offset),
        message: message.into(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Gap {
    Blank,
    /// Comments and whitespace, with stray semicolons removed.
    Trivia(String),
    Code,
}

fn classify_gap(gap: &str) -> Gap {
    let bytes = gap.as_bytes();
    let mut cleaned = String::with_capacity(gap.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b';' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = gap[i..].find('\n').map_or(gap.len(), |n| i + n);
                cleaned.push_str(&gap[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = gap[i + 2..].find("*/").map_or(gap.len(), |n| i + 2 + n + 2);
                cleaned.push_str(&gap[i..end]);
                i = end;
            }
            b if b.is_ascii_whitespace() => {
                cleaned.push(b as char);
                i += 1;
            }
            _ => return Gap::Code,
        }
    }

    if cleaned.trim().is_empty() {
        Gap::Blank
    } else {
        Gap::Trivia(cleaned)
    }
}

/// Indent every non-blank line after the first.
fn indent_continuation(text: &str, indent: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(n, line)| {
            if n > 0 && !line.trim().is_empty() {
                format!("{}{}", indent, line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn convert(
    scanner: &ExportScanner,
    source: &str,
    object_name: &str,
    indent: &str,
) -> Result<Conversion> {
    let map = SourceMap::scan(source)?;
    let exports = map.exports(scanner, source);
    if exports.is_empty() {
        return Ok(Conversion::NoExports);
    }

    let preamble = source[..exports[0].offset].trim_end();
    let mut relocated = Vec::new();
    let mut body = String::with_capacity(source.len() + source.len() / 4);

    for (i, export) in exports.iter().enumerate() {
        let end = map.body_end(source, export)?;
        let next_start = exports.get(i + 1).map_or(source.len(), |e| e.offset);
        if end > next_start {
            return Err(malformed(
                source,
                export.offset,
                format!("body of '{}' runs into the next export", export.name),
            ));
        }

        body.push_str(indent);
        body.push_str(&export.method_head());
        body.push_str(&map.indent_span(source, export.paren_offset, end, indent));

        let is_last = i + 1 == exports.len();
        if !is_last {
            body.push(',');
        }

        let gap = &source[end..next_start];
        match classify_gap(gap) {
            Gap::Blank => {
                if !is_last {
                    body.push('\n');
                }
            }
            Gap::Trivia(comments) => body.push_str(&indent_continuation(&comments, indent)),
            Gap::Code => {
                warn!(
                    line = line_number(source, end),
                    "moving top-level code after '{}' above the object literal", export.name
                );
                relocated.push(gap.trim().to_string());
                if !is_last {
                    body.push('\n');
                }
            }
        }
        debug!(name = %export.name, line = export.line, "method converted");
    }

    let mut output = assemble_object(preamble, &relocated, object_name);
    output.push_str(body.trim_end());
    output.push_str("\n};\n");

    Ok(Conversion::Converted { exports, output })
}
