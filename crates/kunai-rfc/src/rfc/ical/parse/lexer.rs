//! Content line lexer for iCalendar (RFC 5545 §3.1).
//!
//! Handles line unfolding and tokenization of content lines.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into content lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. Lines starting with SP/HTAB are
/// continuations of the previous line; unfolding removes the line break and
/// the single whitespace character. Blank lines are skipped.
///
/// Returns `(line_number, line)` pairs, numbered by the first physical line.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
                continue;
            }
            lines.push((i + 1, continuation.to_string()));
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Parses a single content line.
///
/// Format: `name *(";" param) ":" value`
///
/// ## Errors
/// Returns an error if the line is malformed or contains invalid characters.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let name_end = line.find([';', ':']).unwrap_or(line.len());

    if name_end == 0 {
        return Err(ParseError::new(
            ParseErrorKind::MissingPropertyName,
            line_num,
            1,
        ));
    }

    let name = &line[..name_end];
    if let Some(pos) = name.find(|c: char| !c.is_ascii_alphanumeric() && c != '-') {
        return Err(ParseError::new(
            ParseErrorKind::InvalidPropertyName,
            line_num,
            pos + 1,
        ));
    }

    let mut pos = name_end;
    let mut params = Vec::new();

    while line[pos..].starts_with(';') {
        let (param, next) = parse_parameter(line, pos + 1, line_num)?;
        params.push(param);
        pos = next;
    }

    if !line[pos..].starts_with(':') {
        return Err(
            ParseError::new(ParseErrorKind::MissingColon, line_num, pos + 1)
                .with_context(name.to_string()),
        );
    }

    Ok(ContentLine {
        name: name.to_ascii_uppercase(),
        params,
        raw_value: line[pos + 1..].to_string(),
    })
}

/// Parses one parameter starting at byte offset `start`.
///
/// Returns the parameter and the offset of the delimiter that ended it
/// (`;` or `:`).
fn parse_parameter(line: &str, start: usize, line_num: usize) -> ParseResult<(Parameter, usize)> {
    let Some(eq) = line[start..].find('=').map(|i| start + i) else {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            start + 1,
        ));
    };

    let name = &line[start..eq];
    if name.is_empty() || name.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-') {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            start + 1,
        ));
    }

    let mut values = Vec::new();
    let mut pos = eq + 1;
    loop {
        let (value, next) = parse_param_value(line, pos, line_num)?;
        values.push(value);

        match line[next..].chars().next() {
            Some(',') => pos = next + 1,
            Some(';' | ':') => return Ok((Parameter::with_values(name, values), next)),
            Some(c) => {
                return Err(
                    ParseError::new(ParseErrorKind::InvalidParameter, line_num, next + 1)
                        .with_context(format!("unexpected character '{c}'")),
                );
            }
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingColon,
                    line_num,
                    line.len(),
                ));
            }
        }
    }
}

/// Parses a parameter value (possibly quoted) starting at byte offset `start`.
///
/// Returns the decoded value and the offset just past it.
fn parse_param_value(line: &str, start: usize, line_num: usize) -> ParseResult<(String, usize)> {
    let rest = &line[start..];

    let Some(quoted) = rest.strip_prefix('"') else {
        let end = rest.find([',', ';', ':']).unwrap_or(rest.len());
        return Ok((rest[..end].to_string(), start + end));
    };

    let Some(close) = quoted.find('"') else {
        return Err(ParseError::new(
            ParseErrorKind::UnclosedQuote,
            line_num,
            start + 1,
        ));
    };

    Ok((decode_caret(&quoted[..close]), start + close + 2))
}

/// Decodes RFC 6868 caret escapes. Unknown escapes are kept verbatim.
fn decode_caret(s: &str) -> String {
    let mut value = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            value.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => value.push('^'),
            Some('n') => value.push('\n'),
            Some('\'') => value.push('"'),
            _ => {
                value.push('^');
                continue;
            }
        }
        chars.next();
    }
    value
}
