//! ORDER BY from the sort keys of a filter request.

use crate::error::{SqlError, SqlResult};
use crate::filter::{FilterMap, FilterRequest, normalize_key};
use crate::ident::validate_ident;
use crate::registry::AliasMap;
use crate::value::SqlValue;

pub const ORDER_BY_KEY: &str = "orderby";
pub const ORDER_BY2_KEY: &str = "orderby2";
pub const DIRECTION_KEY: &str = "chronorder";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn parse(value: &str) -> SqlResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(SqlError::invalid_argument(format!(
                "sort order must be asc or desc, got '{other}'"
            ))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Renders `ORDER BY <a1><c1>[, <a2><c2>] [ASC|DESC]`.
///
/// `orderBy` is always the primary key and `orderBy2` the secondary, whatever
/// order they arrive in. A direction with no sort key is dropped.
#[derive(Debug, Clone, Copy)]
pub struct OrderByBuilder<'a> {
    aliases: AliasMap<'a>,
    translate: Option<FilterMap<'a>>,
}

impl<'a> OrderByBuilder<'a> {
    pub fn new(aliases: AliasMap<'a>) -> Self {
        Self {
            aliases,
            translate: None,
        }
    }

    /// Map client sort values (e.g. `author`) to columns (e.g. `full_name`)
    /// before alias lookup.
    pub fn translate(mut self, map: FilterMap<'a>) -> Self {
        self.translate = Some(map);
        self
    }

    pub fn build(&self, request: &FilterRequest) -> SqlResult<String> {
        let mut primary = None;
        let mut secondary = None;
        let mut direction = None;

        for (key, value) in request.iter() {
            match normalize_key(key).as_str() {
                ORDER_BY_KEY => primary = Some(self.sort_column(value)?),
                ORDER_BY2_KEY => secondary = Some(self.sort_column(value)?),
                DIRECTION_KEY => direction = Some(value),
                _ => {}
            }
        }

        let columns: Vec<String> = primary.into_iter().chain(secondary).collect();
        if columns.is_empty() {
            return Ok(String::new());
        }

        let mut sql = format!("ORDER BY {}", columns.join(", "));
        if let Some(value) = direction {
            let dir = Direction::parse(&sort_text(value)?)?;
            sql.push(' ');
            sql.push_str(dir.as_sql());
        }
        Ok(sql)
    }

    fn sort_column(&self, value: &SqlValue) -> SqlResult<String> {
        let raw = sort_text(value)?.trim().to_lowercase();
        let column = self
            .translate
            .and_then(|map| map.column(&raw))
            .map(str::to_string)
            .unwrap_or(raw);
        validate_ident(&column)?;
        self.aliases.qualify(&column)
    }
}

fn sort_text(value: &SqlValue) -> SqlResult<String> {
    match value {
        SqlValue::Text(s) => Ok(s.clone()),
        other => Err(SqlError::invalid_argument(format!(
            "sort value must be text, got {other}"
        ))),
    }
}
