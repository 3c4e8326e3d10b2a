//! Type mapping between MySQL column types and SQLite storage classes.
//!
//! SQLite's dynamic typing stores most MySQL declarations fine as written, so
//! the mapper only rewrites types whose syntax or semantics SQLite cannot
//! accept: unsigned integer variants, the sized TEXT/BLOB family, and binary
//! types. `ENUM`/`SET` need the column name for their CHECK constraint and are
//! handled by the schema rewriter; the bare storage class lives here.

/// Map a MySQL column type to a SQLite storage class.
///
/// `base` is the lowercase-insensitive type name, `args` the raw text inside
/// its parentheses (if any), `unsigned` whether an `UNSIGNED` attribute was
/// attached. Returns `None` when the declaration should be kept as written.
pub fn map_type(base: &str, args: Option<&str>, unsigned: bool) -> Option<String> {
    match base.to_lowercase().as_str() {
        // Integer family: SQLite has one integer storage class. Signed
        // variants (with or without display width) are accepted as written;
        // unsigned variants are not a SQLite type and collapse to INTEGER.
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => {
            if unsigned {
                Some("INTEGER".to_string())
            } else {
                None
            }
        }

        // Sized TEXT family
        "tinytext" | "mediumtext" | "longtext" => Some("TEXT".to_string()),

        // Binary types all become BLOB
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
            Some("BLOB".to_string())
        }

        // ENUM/SET collapse to TEXT; the schema rewriter adds the CHECK
        // constraint for ENUM when configured.
        "enum" | "set" => Some("TEXT".to_string()),

        // DOUBLE/FLOAT/DECIMAL keep their declaration; unsigned is dropped by
        // mapping to the bare type (SQLite rejects the attribute).
        "double" | "float" | "real" | "decimal" | "numeric" => {
            if unsigned {
                let mut decl = base.to_uppercase();
                if let Some(args) = args {
                    decl.push('(');
                    decl.push_str(args);
                    decl.push(')');
                }
                Some(decl)
            } else {
                None
            }
        }

        // DATETIME/TIMESTAMP/DATE/TIME/YEAR, CHAR/VARCHAR/TEXT, JSON, BIT:
        // retained as declared; SQLite's dynamic typing handles storage.
        _ => None,
    }
}
