//! Value-level text transforms: identifier requoting and MySQL escape
//! conversion inside string literals.
//!
//! All transforms are single-pass scanners that track quoting state, so a `;`
//! or backtick inside a string literal is never misread as structure.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Normal,
    Single,
    Double,
    Backtick,
}

/// Rewrite backtick-quoted identifiers to double-quoted identifiers.
///
/// String literal contents are passed through untouched (backslash escape
/// pairs are consumed verbatim so an escaped quote cannot end the literal).
pub fn requote_identifiers(text: &str) -> String {
    transform(text, false)
}

/// Rewrite an INSERT statement: requote identifiers and convert MySQL
/// backslash escapes inside single-quoted literals to SQLite-acceptable text.
pub fn rewrite_insert(text: &str) -> String {
    transform(text, true)
}

fn transform(text: &str, convert_escapes: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = QuoteState::Normal;

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Normal => match c {
                '`' => {
                    out.push('"');
                    state = QuoteState::Backtick;
                }
                '\'' => {
                    out.push(c);
                    state = QuoteState::Single;
                }
                '"' => {
                    out.push(c);
                    state = QuoteState::Double;
                }
                _ => out.push(c),
            },
            QuoteState::Backtick => match c {
                '`' => {
                    // Doubled backtick is an escaped backtick in MySQL.
                    if chars.peek() == Some(&'`') {
                        chars.next();
                        out.push('`');
                    } else {
                        out.push('"');
                        state = QuoteState::Normal;
                    }
                }
                // A literal double quote inside the identifier must be
                // doubled under SQLite quoting.
                '"' => out.push_str("\"\""),
                _ => out.push(c),
            },
            QuoteState::Single => match c {
                '\\' => match chars.next() {
                    Some(d) if convert_escapes => convert_escape(d, &mut out),
                    Some(d) => {
                        out.push('\\');
                        out.push(d);
                    }
                    None => out.push('\\'),
                },
                '\'' => {
                    out.push(c);
                    state = QuoteState::Normal;
                }
                _ => out.push(c),
            },
            QuoteState::Double => match c {
                '\\' => {
                    out.push('\\');
                    if let Some(d) = chars.next() {
                        out.push(d);
                    }
                }
                '"' => {
                    out.push(c);
                    state = QuoteState::Normal;
                }
                _ => out.push(c),
            },
        }
    }

    out
}

/// Convert one MySQL backslash escape to its SQLite-acceptable spelling.
///
/// Policy (documented in DESIGN.md): quote escapes become SQL doubling,
/// control escapes become their literal bytes, `\0` is dropped (a text
/// literal cannot carry NUL), `\%`/`\_` stay two characters as MySQL stores
/// them, and any other escaped character stands for itself.
fn convert_escape(d: char, out: &mut String) {
    match d {
        '\'' => out.push_str("''"),
        '"' => out.push('"'),
        '\\' => out.push('\\'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'b' => out.push('\u{0008}'),
        'Z' => out.push('\u{001A}'),
        '0' => {}
        '%' | '_' => {
            out.push('\\');
            out.push(d);
        }
        other => out.push(other),
    }
}

/// Collapse runs of whitespace outside quotes into single spaces and trim.
///
/// Used when reassembling CREATE TABLE items onto one line; quoted content
/// (literals, identifiers) is preserved byte-for-byte.
pub(crate) fn collapse_ws(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = QuoteState::Normal;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Normal => {
                if c.is_whitespace() {
                    pending_space = !out.is_empty();
                    continue;
                }
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                match c {
                    '\'' => state = QuoteState::Single,
                    '"' => state = QuoteState::Double,
                    '`' => state = QuoteState::Backtick,
                    _ => {}
                }
                out.push(c);
            }
            QuoteState::Single => {
                out.push(c);
                if c == '\\' {
                    if let Some(d) = chars.next() {
                        out.push(d);
                    }
                } else if c == '\'' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Double => {
                out.push(c);
                if c == '\\' {
                    if let Some(d) = chars.next() {
                        out.push(d);
                    }
                } else if c == '"' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Backtick => {
                out.push(c);
                if c == '`' {
                    state = QuoteState::Normal;
                }
            }
        }
    }

    out
}

/// Count the logical rows in an INSERT statement by counting top-level
/// parenthesized groups after the VALUES keyword.
pub fn count_insert_rows(sql: &str) -> u64 {
    let Some(values_end) = find_values_keyword(sql) else {
        return 1;
    };

    let mut count = 0u64;
    let mut depth = 0i32;
    let mut chars = sql[values_end..].chars().peekable();
    let mut state = QuoteState::Normal;

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Normal => match c {
                '\'' => state = QuoteState::Single,
                '"' => state = QuoteState::Double,
                '`' => state = QuoteState::Backtick,
                '(' => {
                    if depth == 0 {
                        count += 1;
                    }
                    depth += 1;
                }
                ')' => depth -= 1,
                _ => {}
            },
            QuoteState::Single => {
                if c == '\\' {
                    chars.next();
                } else if c == '\'' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Double => {
                if c == '\\' {
                    chars.next();
                } else if c == '"' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Backtick => {
                if c == '`' {
                    state = QuoteState::Normal;
                }
            }
        }
    }

    count.max(1)
}

/// Find the end of the top-level VALUES keyword, skipping quoted regions.
fn find_values_keyword(sql: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut state = QuoteState::Normal;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match state {
            QuoteState::Normal => match b {
                b'\'' => state = QuoteState::Single,
                b'"' => state = QuoteState::Double,
                b'`' => state = QuoteState::Backtick,
                b'V' | b'v' => {
                    let end = i + 6;
                    if end <= bytes.len()
                        && sql[i..end].eq_ignore_ascii_case("VALUES")
                        && (i == 0 || !bytes[i - 1].is_ascii_alphanumeric())
                        && (end == bytes.len()
                            || !bytes[end].is_ascii_alphanumeric() && bytes[end] != b'_')
                    {
                        return Some(end);
                    }
                }
                _ => {}
            },
            QuoteState::Single => {
                if b == b'\\' {
                    i += 1;
                } else if b == b'\'' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Double => {
                if b == b'\\' {
                    i += 1;
                } else if b == b'"' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Backtick => {
                if b == b'`' {
                    state = QuoteState::Normal;
                }
            }
        }
        i += 1;
    }
    None
}

/// Split text on top-level commas, respecting parentheses and quotes.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut state = QuoteState::Normal;
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            QuoteState::Normal => match b {
                b'\'' => state = QuoteState::Single,
                b'"' => state = QuoteState::Double,
                b'`' => state = QuoteState::Backtick,
                b'(' => depth += 1,
                b')' => depth -= 1,
                b',' if depth == 0 => {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
            QuoteState::Single => {
                if b == b'\\' {
                    i += 1;
                } else if b == b'\'' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Double => {
                if b == b'\\' {
                    i += 1;
                } else if b == b'"' {
                    state = QuoteState::Normal;
                }
            }
            QuoteState::Backtick => {
                if b == b'`' {
                    state = QuoteState::Normal;
                }
            }
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}
