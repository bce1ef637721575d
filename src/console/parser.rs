//! Command line parser
//!
//! A completed line is either a baud-rate change or text to echo.

use crate::config::{Dialect, NumberParsing, BAUD_PREFIX};

use super::ConsoleError;

/// Command derived from one completed line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Switch the UART to this rate
    SetBaudRate(u32),
    /// Send the raw line back
    Echo(&'a [u8]),
}

/// Parse a completed line for the given dialect.
///
/// Only the prefixed dialect can fail: a matching prefix followed by
/// something that is not a positive rate is `MalformedBaudCommand`.
pub fn parse_line(line: &[u8], dialect: Dialect, parsing: NumberParsing) -> Result<Command<'_>, ConsoleError> {
    match dialect {
        Dialect::Numeric => Ok(match parse_rate(line, parsing) {
            Some(rate) => Command::SetBaudRate(rate),
            None => Command::Echo(line),
        }),
        Dialect::Prefixed => {
            let Some(rest) = trim_start(line).strip_prefix(BAUD_PREFIX.as_bytes()) else {
                return Ok(Command::Echo(line));
            };
            parse_rate(rest, parsing)
                .map(Command::SetBaudRate)
                .ok_or(ConsoleError::MalformedBaudCommand)
        }
    }
}

/// Positive baud rate from `text`, or `None` for zero / not a number.
pub fn parse_rate(text: &[u8], parsing: NumberParsing) -> Option<u32> {
    let value = match parsing {
        NumberParsing::Lenient => parse_leading_int(text)?,
        NumberParsing::Strict => parse_strict_int(text)?,
    };

    u32::try_from(value).ok().filter(|&rate| rate > 0)
}

/// `atoi`-style parse: skip leading whitespace, optional sign, then as many
/// digits as follow. Anything after the digits is ignored.
///
/// Returns `None` when there are no digits or the value overflows `i64`.
pub fn parse_leading_int(text: &[u8]) -> Option<i64> {
    let text = trim_start(text);

    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };

    let end = digits.iter().position(|b| !b.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for &b in &digits[..end] {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }

    Some(if negative { -value } else { value })
}

/// Whole-token parse: the trimmed text must be digits only.
pub fn parse_strict_int(text: &[u8]) -> Option<i64> {
    let text = trim_end(trim_start(text));

    if text.is_empty() || !text.iter().all(u8::is_ascii_digit) {
        return None;
    }

    core::str::from_utf8(text).ok()?.parse().ok()
}

fn is_space(b: u8) -> bool {
    // C isspace(): also vertical tab
    b.is_ascii_whitespace() || b == 0x0B
}

fn trim_start(text: &[u8]) -> &[u8] {
    let start = text.iter().position(|&b| !is_space(b)).unwrap_or(text.len());
    &text[start..]
}

fn trim_end(text: &[u8]) -> &[u8] {
    let end = text.iter().rposition(|&b| !is_space(b)).map_or(0, |i| i + 1);
    &text[..end]
}
