//! Positional `?` placeholder scanning.
//!
//! Statements are rendered with `?` placeholders. The scanner skips quoted text (plain,
//! `E'...'` with backslash escapes, and `$tag$...$tag$` bodies), line comments and block
//! comments, so a `?` inside a literal is never mistaken for a parameter slot.

use std::borrow::Cow;

#[derive(Clone, Copy)]
enum State {
    Normal,
    SingleQuoted,
    EscapeQuoted,
    DoubleQuoted,
    /// Offset and length of the opening `$tag$`.
    DollarQuoted(usize, usize),
    LineComment,
    BlockComment(u32),
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Length of a `$tag$` delimiter starting at `idx`, if there is one.
fn dollar_tag(bytes: &[u8], idx: usize) -> Option<usize> {
    let rest = &bytes[idx + 1..];
    if rest.first().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    let tag_len = rest
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
        .count();
    (rest.get(tag_len) == Some(&b'$')).then_some(tag_len + 2)
}

/// Byte offsets of every placeholder in `sql`.
fn placeholder_offsets(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut offsets = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        let next = bytes.get(idx + 1).copied();
        let word_start = idx == 0 || !is_ident_byte(bytes[idx - 1]);
        match state {
            State::Normal => match (b, next) {
                (b'?', _) => offsets.push(idx),
                (b'E' | b'e', Some(b'\'')) if word_start => {
                    state = State::EscapeQuoted;
                    idx += 1;
                }
                (b'$', _) if word_start => {
                    if let Some(len) = dollar_tag(bytes, idx) {
                        state = State::DollarQuoted(idx, len);
                        idx += len - 1;
                    }
                }
                (b'\'', _) => state = State::SingleQuoted,
                (b'"', _) => state = State::DoubleQuoted,
                (b'-', Some(b'-')) => {
                    state = State::LineComment;
                    idx += 1;
                }
                (b'/', Some(b'*')) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                _ => {}
            },
            // A doubled quote re-enters the literal on the next byte.
            State::SingleQuoted if b == b'\'' => state = State::Normal,
            State::EscapeQuoted => match b {
                b'\\' => idx += 1,
                b'\'' => state = State::Normal,
                _ => {}
            },
            State::DollarQuoted(start, len) => {
                if bytes[idx..].starts_with(&bytes[start..start + len]) {
                    state = State::Normal;
                    idx += len - 1;
                }
            }
            State::DoubleQuoted if b == b'"' => state = State::Normal,
            State::LineComment if b == b'\n' => state = State::Normal,
            State::BlockComment(depth) => match (b, next) {
                (b'/', Some(b'*')) => {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                }
                (b'*', Some(b'/')) => {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
                _ => {}
            },
            _ => {}
        }
        idx += 1;
    }

    offsets
}

/// Number of `?` placeholders outside literals and comments.
pub fn count_placeholders(sql: &str) -> usize {
    placeholder_offsets(sql).len()
}

/// Rewrites `?` placeholders to PostgreSQL's `$1..$n`.
/// Returns a borrowed `Cow` when the statement has no placeholders.
pub fn to_numbered(sql: &str) -> Cow<'_, str> {
    let offsets = placeholder_offsets(sql);
    if offsets.is_empty() {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len() + offsets.len() * 2);
    let mut last = 0;
    for (i, offset) in offsets.into_iter().enumerate() {
        out.push_str(&sql[last..offset]);
        out.push('$');
        out.push_str(&(i + 1).to_string());
        last = offset + 1;
    }
    out.push_str(&sql[last..]);
    Cow::Owned(out)
}
