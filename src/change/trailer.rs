//! Commit message trailer grammar
//!
//! A message is read as a subject line, an optional body and an optional
//! trailer block. The trailer block is the trailing run of `Key: value`
//! lines (continuation lines indented) that follows a blank line. A key is
//! any text before the first `:` that doesn't start with whitespace, so
//! `Trailer 1: value` counts.
//!
//! A message made only of trailer lines has no subject. Its lines still
//! carry a change identity, but a new trailer goes below a blank line:
//!
//! ```text
//! Add foo                      <- subject
//!
//! Longer description.          <- body
//!
//! Reviewed-by: Someone         <- trailer block
//! Change-ID: 0192e4c2-...
//! ```

/// Trailer key holding the change identity
pub const CHANGE_ID_KEY: &str = "Change-ID";

/// A single `Key: value` trailer line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer<'a> {
    /// Key, without the separator
    pub key: &'a str,
    /// Value on the key's line, trimmed
    pub value: &'a str,
}

/// Trailers of `message`, in order
///
/// Continuation lines are not folded into the values.
pub fn trailers(message: &str) -> Vec<Trailer<'_>> {
    let lines = content_lines(message);
    let Some(start) = trailer_block_start(&lines) else {
        return Vec::new();
    };

    lines[start..]
        .iter()
        .filter_map(|line| parse_trailer_line(line))
        .collect()
}

/// Whether `message` ends in a trailer block below a blank line
pub fn has_trailer_block(message: &str) -> bool {
    trailer_block_start(&content_lines(message)).is_some_and(|start| start > 0)
}

/// The change identity recorded in `message`'s trailer block
///
/// The key must be exactly `Change-ID`, so Gerrit's `Change-Id` is left
/// alone. Empty values are ignored.
pub fn change_id(message: &str) -> Option<&str> {
    trailers(message)
        .into_iter()
        .find(|t| t.key == CHANGE_ID_KEY && !t.value.is_empty())
        .map(|t| t.value)
}

/// Add a `Change-ID` trailer to `message`
///
/// Messages that already carry an identity are returned unchanged. The new
/// trailer joins an existing trailer block directly; otherwise it is
/// separated from the message by one blank line. An empty message becomes
/// the trailer alone.
pub fn append_change_id(message: &str, id: &str) -> String {
    if change_id(message).is_some() {
        return message.to_string();
    }

    let trailer = format!("{CHANGE_ID_KEY}: {id}\n");
    let content = message.trim_end();
    if content.is_empty() {
        return trailer;
    }

    let separator = if has_trailer_block(content) { "\n" } else { "\n\n" };
    format!("{content}{separator}{trailer}")
}

/// Split a message into its first line and the remainder
pub fn split_message(message: &str) -> (&str, &str) {
    message.split_once('\n').unwrap_or((message, ""))
}

/// Message lines with trailing blank lines removed
fn content_lines(message: &str) -> Vec<&str> {
    let content = message.trim_end();
    if content.is_empty() {
        Vec::new()
    } else {
        content.split('\n').collect()
    }
}

/// Index of the first line of the trailer block, if there is one
fn trailer_block_start(lines: &[&str]) -> Option<usize> {
    let mut start = lines.len();
    while start > 0 && (is_trailer_line(lines[start - 1]) || is_continuation(lines[start - 1])) {
        start -= 1;
    }

    // A block can't open with a continuation line
    while start < lines.len() && is_continuation(lines[start]) {
        start += 1;
    }

    if start == lines.len() {
        return None;
    }

    (start == 0 || lines[start - 1].trim().is_empty()).then_some(start)
}

fn is_trailer_line(line: &str) -> bool {
    parse_trailer_line(line).is_some()
}

fn parse_trailer_line(line: &str) -> Option<Trailer<'_>> {
    let (key, value) = line.split_once(':')?;
    let valid_key = key.starts_with(|c: char| !c.is_whitespace());

    valid_key.then(|| Trailer {
        key: key.trim_end(),
        value: value.trim(),
    })
}

fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) && !line.trim().is_empty()
}
