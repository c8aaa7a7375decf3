//! SQL identifier validation.
//!
//! Column and table names are spliced into statement text, never bound, so
//! anything that reaches a builder from caller data is checked here first.
//!
//! - Each dotted part must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - Select expressions may also be `*`, `alias.*` or carry a trailing `AS <name>`

use crate::error::{SqlError, SqlResult};

/// Validate a (possibly dotted) unquoted identifier, e.g. `r.author_id`.
pub fn validate_ident(s: &str) -> SqlResult<()> {
    if s.is_empty() {
        return Err(SqlError::invalid_argument("Identifier cannot be empty"));
    }

    for part in s.split('.') {
        validate_part(s, part)?;
    }
    Ok(())
}

/// Validate every identifier in a list.
pub fn validate_idents<S: AsRef<str>>(idents: &[S]) -> SqlResult<()> {
    idents.iter().try_for_each(|s| validate_ident(s.as_ref()))
}

/// Validate a select-list expression.
///
/// Accepts `col`, `t.col`, `*`, `t.*` and either of the first two followed by
/// `AS alias` (keyword case-insensitive).
pub fn validate_select_expr(expr: &str) -> SqlResult<()> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    match tokens.as_slice() {
        ["*"] => Ok(()),
        [single] => match single.strip_suffix(".*") {
            Some(table) => validate_ident(table),
            None => validate_ident(single),
        },
        [column, kw, alias] if kw.eq_ignore_ascii_case("AS") => {
            validate_ident(column)?;
            validate_part(expr, alias)
        }
        _ => Err(SqlError::invalid_argument(format!(
            "Invalid select expression: '{expr}'"
        ))),
    }
}

fn validate_part(whole: &str, part: &str) -> SqlResult<()> {
    let mut chars = part.chars();
    match chars.next() {
        None => {
            return Err(SqlError::invalid_argument(format!(
                "Empty identifier segment in '{whole}'"
            )));
        }
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => {
            return Err(SqlError::invalid_argument(format!(
                "Invalid identifier start character '{c}' in '{whole}'"
            )));
        }
    }

    if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(SqlError::invalid_argument(format!(
            "Invalid character '{c}' in identifier '{whole}'"
        )));
    }
    Ok(())
}
