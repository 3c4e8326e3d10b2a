//! CREATE TABLE rewriting.
//!
//! A light structural parse of the table body drives the per-column rules:
//! the body is split on top-level commas, each item is classified (column
//! definition, key clause, constraint), and the statement is reassembled on a
//! single line. Reassembly is what keeps re-translation of already-converted
//! DDL byte-identical.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::values::{collapse_ws, requote_identifiers, split_top_level};
use crate::typemap;

/// Rewrite a MySQL `CREATE TABLE` statement into SQLite DDL.
///
/// Statements without a parenthesized body (e.g. `CREATE TABLE ... AS
/// SELECT`) fall back to identifier requoting only.
pub fn rewrite_create_table(text: &str, enum_checks: bool) -> String {
    let Some((header, body, options)) = split_create_table(text) else {
        return requote_identifiers(text);
    };

    // CREATE TABLE ... AS SELECT has no column-definition body; the first
    // paren group belongs to the query. Pass it through with requoting only.
    let header_upper = header.to_uppercase();
    if header_upper.contains(" AS ") || header_upper.contains("SELECT") {
        return requote_identifiers(text);
    }

    let items: Vec<String> = split_top_level(body)
        .into_iter()
        .map(collapse_ws)
        .filter(|s| !s.is_empty())
        .collect();

    let mut columns: Vec<ColumnDef> = Vec::new();
    let mut constraints: Vec<Constraint> = Vec::new();

    for item in &items {
        match classify_item(item) {
            Item::Column(col) => columns.push(col),
            Item::Constraint(c) => constraints.push(c),
            Item::DroppedKey(kind) => {
                debug!(clause = item.as_str(), "dropping {kind} clause (no SQLite equivalent)");
            }
        }
    }

    // An AUTO_INCREMENT column that is the primary key becomes
    // INTEGER PRIMARY KEY AUTOINCREMENT; a table-level PRIMARY KEY naming
    // just that column would then be redundant and is dropped.
    let table_pk_single = constraints.iter().find_map(|c| match c {
        Constraint::PrimaryKey { single_col, .. } => single_col.clone(),
        _ => None,
    });
    let mut absorbed_pk = false;
    for col in &mut columns {
        if col.auto_increment && (col.inline_pk || table_pk_single.as_deref() == Some(&col.name)) {
            col.rowid_alias = true;
            if !col.inline_pk {
                absorbed_pk = true;
            }
            break;
        }
    }

    let mut parts: Vec<String> = Vec::with_capacity(items.len());
    for col in &columns {
        parts.push(render_column(col, enum_checks));
    }
    for c in &constraints {
        match c {
            Constraint::PrimaryKey { rendered, .. } => {
                if !absorbed_pk {
                    parts.push(rendered.clone());
                }
            }
            Constraint::Other(rendered) => parts.push(rendered.clone()),
        }
    }

    let options = options.trim();
    if !options.is_empty() {
        debug!(options, "dropping table options");
    }

    format!("{} ({})", collapse_ws(&requote_identifiers(header)), parts.join(", "))
}

/// Split a CREATE TABLE statement into header, body, and trailing options.
fn split_create_table(text: &str) -> Option<(&str, &str, &str)> {
    let bytes = text.as_bytes();
    let mut open = None;
    let mut depth = 0i32;
    let mut in_backtick = false;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_backtick {
            if b == b'`' {
                in_backtick = false;
            }
        } else if in_string {
            if b == b'\\' {
                i += 1;
            } else if b == b'\'' {
                in_string = false;
            }
        } else {
            match b {
                b'`' => in_backtick = true,
                b'\'' => in_string = true,
                b'(' => {
                    if depth == 0 && open.is_none() {
                        open = Some(i);
                    }
                    depth += 1;
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let open = open?;
                        return Some((&text[..open], &text[open + 1..i], &text[i + 1..]));
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

struct ColumnDef {
    /// Unquoted column name.
    name: String,
    /// SQLite-quoted column name.
    quoted_name: String,
    /// Lowercased base type name.
    type_base: String,
    /// Raw text inside the type's parentheses.
    type_args: Option<String>,
    /// Type declaration as written, minus UNSIGNED/ZEROFILL attributes.
    raw_type: String,
    unsigned: bool,
    auto_increment: bool,
    inline_pk: bool,
    /// Render as INTEGER PRIMARY KEY AUTOINCREMENT.
    rowid_alias: bool,
    /// Remaining column attributes after flag extraction and strips.
    modifiers: String,
}

enum Constraint {
    PrimaryKey {
        rendered: String,
        single_col: Option<String>,
    },
    Other(String),
}

enum Item {
    Column(ColumnDef),
    Constraint(Constraint),
    DroppedKey(&'static str),
}

fn classify_item(item: &str) -> Item {
    let upper = item.to_uppercase();

    if upper.starts_with("PRIMARY KEY") {
        let cols = paren_content(item).unwrap_or("");
        let rendered = format!("PRIMARY KEY ({})", rewrite_key_columns(cols));
        let parts = split_top_level(cols);
        let single_col = if parts.len() == 1 {
            unquote_identifier(parts[0].trim())
        } else {
            None
        };
        return Item::Constraint(Constraint::PrimaryKey {
            rendered,
            single_col,
        });
    }

    if upper.starts_with("UNIQUE KEY") || upper.starts_with("UNIQUE INDEX") {
        let kw_len = if upper.starts_with("UNIQUE KEY") {
            "UNIQUE KEY".len()
        } else {
            "UNIQUE INDEX".len()
        };
        let rest = item[kw_len..].trim_start();
        let (name, rest) = take_identifier(rest);
        let cols = paren_content(rest).unwrap_or("");
        let cols = rewrite_key_columns(cols);
        let rendered = match name {
            Some(name) => format!("CONSTRAINT {} UNIQUE ({})", quote_ident(&name), cols),
            None => format!("UNIQUE ({})", cols),
        };
        return Item::Constraint(Constraint::Other(rendered));
    }

    if upper.starts_with("UNIQUE") {
        // Already-standard inline UNIQUE constraint.
        return Item::Constraint(Constraint::Other(requote_identifiers(item)));
    }

    if upper.starts_with("FULLTEXT") || upper.starts_with("SPATIAL") {
        return Item::DroppedKey("index");
    }
    if upper.starts_with("KEY ") || upper.starts_with("KEY(") || upper.starts_with("KEY`") {
        return Item::DroppedKey("index");
    }
    if upper.starts_with("INDEX ") || upper.starts_with("INDEX(") || upper.starts_with("INDEX`") {
        return Item::DroppedKey("index");
    }

    if upper.starts_with("CONSTRAINT") || upper.starts_with("FOREIGN KEY") || upper.starts_with("CHECK") {
        return Item::Constraint(Constraint::Other(requote_identifiers(item)));
    }

    Item::Column(parse_column(item))
}

fn parse_column(item: &str) -> ColumnDef {
    let (name, rest) = take_identifier(item);
    let name = name.unwrap_or_default();
    let quoted_name = quote_ident(&name);
    let rest = rest.trim_start();

    // Base type token.
    let base_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let type_base = rest[..base_end].to_lowercase();
    let mut cursor = &rest[base_end..];

    // Optional parenthesized args (ENUM literals may hold commas/parens).
    let mut type_args = None;
    let trimmed = cursor.trim_start();
    if trimmed.starts_with('(') {
        if let Some(args) = paren_content(trimmed) {
            type_args = Some(args.to_string());
            let end = matching_paren_end(trimmed);
            cursor = &trimmed[end..];
        }
    }

    // UNSIGNED / ZEROFILL attributes belong to the type.
    let mut unsigned = false;
    let mut rest_mods = cursor.trim_start();
    loop {
        let word_end = rest_mods
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest_mods.len());
        let word = &rest_mods[..word_end];
        if word.eq_ignore_ascii_case("unsigned") {
            unsigned = true;
        } else if !word.eq_ignore_ascii_case("zerofill") && !word.eq_ignore_ascii_case("signed") {
            break;
        }
        rest_mods = rest_mods[word_end..].trim_start();
    }

    let raw_type = match &type_args {
        Some(args) => format!("{}({})", &rest[..base_end], args),
        None => rest[..base_end].to_string(),
    };

    let (modifiers, auto_increment, inline_pk) = clean_modifiers(rest_mods);

    ColumnDef {
        name,
        quoted_name,
        type_base,
        type_args,
        raw_type,
        unsigned,
        auto_increment,
        inline_pk,
        rowid_alias: false,
        modifiers,
    }
}

/// Strip MySQL-only column attributes and extract structural flags.
fn clean_modifiers(mods: &str) -> (String, bool, bool) {
    static RE_AUTO_INC: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bAUTO_INCREMENT\b").unwrap());
    static RE_PRIMARY_KEY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());
    static RE_CHAR_SET: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bCHARACTER\s+SET\s+\w+").unwrap());
    static RE_COLLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCOLLATE\s+\w+").unwrap());
    static RE_ON_UPDATE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\bON\s+UPDATE\s+CURRENT_TIMESTAMP(\(\d*\))?").unwrap()
    });
    static RE_COMMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bCOMMENT\s*'(?:[^']|'')*'").unwrap());

    let auto_increment = RE_AUTO_INC.is_match(mods);
    let inline_pk = RE_PRIMARY_KEY.is_match(mods);

    let cleaned = RE_AUTO_INC.replace_all(mods, "");
    let cleaned = RE_PRIMARY_KEY.replace_all(&cleaned, "");
    let cleaned = RE_CHAR_SET.replace_all(&cleaned, "");
    let cleaned = RE_COLLATE.replace_all(&cleaned, "");
    let cleaned = RE_ON_UPDATE.replace_all(&cleaned, "");
    let cleaned = RE_COMMENT.replace_all(&cleaned, "");

    (
        collapse_ws(&requote_identifiers(&cleaned)),
        auto_increment,
        inline_pk,
    )
}

fn render_column(col: &ColumnDef, enum_checks: bool) -> String {
    if col.rowid_alias {
        if !col.modifiers.is_empty() && col.modifiers != "NOT NULL" {
            debug!(
                column = col.name.as_str(),
                dropped = col.modifiers.as_str(),
                "dropping attributes on AUTO_INCREMENT primary key column"
            );
        }
        return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", col.quoted_name);
    }

    let type_decl = match col.type_base.as_str() {
        "enum" if enum_checks => match &col.type_args {
            Some(args) => format!("TEXT CHECK ({} IN ({}))", col.quoted_name, args),
            None => "TEXT".to_string(),
        },
        _ => typemap::map_type(&col.type_base, col.type_args.as_deref(), col.unsigned)
            .unwrap_or_else(|| col.raw_type.clone()),
    };

    let mut out = format!("{} {}", col.quoted_name, type_decl);
    if col.inline_pk {
        out.push_str(" PRIMARY KEY");
    }
    if !col.modifiers.is_empty() {
        out.push(' ');
        out.push_str(&col.modifiers);
    }
    out
}

/// Requote an index/PK column list and strip MySQL prefix lengths
/// (`name(10)`), which SQLite does not accept.
fn rewrite_key_columns(cols: &str) -> String {
    static RE_PREFIX_LEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\d+\)$").unwrap());

    split_top_level(cols)
        .into_iter()
        .map(|c| {
            let c = collapse_ws(&requote_identifiers(c.trim()));
            RE_PREFIX_LEN.replace(&c, "").to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Content of the first balanced parenthesized group.
fn paren_content(text: &str) -> Option<&str> {
    let start = text.find('(')?;
    let end = matching_paren_end(&text[start..]);
    if end == 0 {
        return None;
    }
    Some(&text[start + 1..start + end - 1])
}

/// Byte index just past the balanced group that starts at the first `(`.
/// Returns 0 when unbalanced.
fn matching_paren_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut in_backtick = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                i += 1;
            } else if b == b'\'' {
                in_string = false;
            }
        } else if in_backtick {
            if b == b'`' {
                in_backtick = false;
            }
        } else {
            match b {
                b'\'' => in_string = true,
                b'`' => in_backtick = true,
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    0
}

/// Take a leading identifier (backtick-quoted, double-quoted, or bare).
/// Returns the unquoted name and the remaining text.
fn take_identifier(text: &str) -> (Option<String>, &str) {
    let text = text.trim_start();
    let mut chars = text.char_indices().peekable();
    match chars.peek().map(|&(_, c)| c) {
        Some(q @ ('`' | '"')) => {
            chars.next();
            let mut name = String::new();
            while let Some((i, c)) = chars.next() {
                if c == q {
                    if chars.peek().map(|&(_, c)| c) == Some(q) {
                        chars.next();
                        name.push(q);
                    } else {
                        return (Some(name), &text[i + 1..]);
                    }
                } else {
                    name.push(c);
                }
            }
            (Some(name), "")
        }
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => {
            let end = text
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .unwrap_or(text.len());
            (Some(text[..end].to_string()), &text[end..])
        }
        _ => (None, text),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn unquote_identifier(text: &str) -> Option<String> {
    take_identifier(text).0
}
