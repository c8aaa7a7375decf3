//! Bound parameter values.
//!
//! Builders never splice client data into SQL text; every value travels as a
//! [`SqlValue`] in the statement's parameter list, positionally matched to `$N`.

use bytes::BytesMut;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};

/// A value bound to a `$N` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (ids, ratings, counts)
    Int(i32),
    /// Text value
    Text(String),
}

impl SqlValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a reference usable as a tokio-postgres parameter.
    pub fn as_param(&self) -> &(dyn ToSql + Sync) {
        self
    }

    fn accepts_value(&self, ty: &Type) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Bool(_) => <bool as ToSql>::accepts(ty),
            SqlValue::Int(_) => {
                <i32 as ToSql>::accepts(ty)
                    || <i64 as ToSql>::accepts(ty)
                    || <i16 as ToSql>::accepts(ty)
            }
            SqlValue::Text(_) => <String as ToSql>::accepts(ty),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Text(v) => f.write_str(v),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql(ty, out),
            SqlValue::Int(v) => {
                if *ty == Type::INT8 {
                    i64::from(*v).to_sql(ty, out)
                } else if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            SqlValue::Text(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
    }

    // `accepts` is per-type, so the per-variant check lives here.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if !self.accepts_value(ty) {
            return Err(Box::new(WrongType::new::<SqlValue>(ty.clone())));
        }
        self.to_sql(ty, out)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// An ordered list of `(column, value)` pairs.
///
/// Iteration order fixes placeholder order for WHERE, INSERT and UPDATE.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnValues {
    pairs: Vec<(String, SqlValue)>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a pair.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.pairs.push((column.into(), value.into()));
        self
    }

    /// Append a pair (by-value chaining form).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Look up the value of the first pair with `column`.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.pairs
            .iter()
            .find(|(col, _)| col == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Remove every pair with `column`, returning the first removed value.
    pub fn remove(&mut self, column: &str) -> Option<SqlValue> {
        let idx = self.pairs.iter().position(|(col, _)| col == column)?;
        let (_, value) = self.pairs.remove(idx);
        self.pairs.retain(|(col, _)| col != column);
        Some(value)
    }

    /// Replace the value of an existing pair or append a new one.
    pub fn set(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(col, _)| col == column) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((column.to_string(), value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.pairs.iter().map(|(col, value)| (col.as_str(), value))
    }

    /// Column names in order.
    pub fn columns(&self) -> Vec<&str> {
        self.pairs.iter().map(|(col, _)| col.as_str()).collect()
    }
}

impl<C, V> From<Vec<(C, V)>> for ColumnValues
where
    C: Into<String>,
    V: Into<SqlValue>,
{
    fn from(pairs: Vec<(C, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<C, V> FromIterator<(C, V)> for ColumnValues
where
    C: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(col, value)| (col.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for ColumnValues {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// Collect parameter references for tokio-postgres.
pub fn params_ref(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(SqlValue::as_param).collect()
}
