//! Client filter requests and their translation to storage columns.

use crate::value::{ColumnValues, SqlValue};

/// Lower-case and trim a client-supplied key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Key/value pairs as received from a query string, in arrival order.
///
/// Keys are kept as sent; lookups normalize both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pairs: Vec<(String, SqlValue)>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(key, value);
        self
    }

    /// First value whose normalized key equals `key` (already lower-case).
    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.pairs
            .iter()
            .find(|(k, _)| normalize_key(k) == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for FilterRequest
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Client filter key (lower-case) to storage column.
///
/// ```rust
/// use savour_sql::filter::{FilterMap, FilterRequest};
///
/// const RECIPES: FilterMap<'static> = FilterMap::new(&[("author", "full_name"), ("name", "name")]);
///
/// let req = FilterRequest::new().with("Author ", "ina").with("colour", "red");
/// let cols = RECIPES.normalize(&req);
/// assert_eq!(cols.columns(), vec!["full_name"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilterMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> FilterMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    /// Storage column for a normalized filter key.
    pub fn column(&self, key: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, col)| *col)
    }

    pub fn is_filter(&self, key: &str) -> bool {
        self.column(&normalize_key(key)).is_some()
    }

    /// Translate recognised keys to columns, keeping request order and
    /// dropping everything else (sort keys included).
    pub fn normalize(&self, request: &FilterRequest) -> ColumnValues {
        request
            .iter()
            .filter_map(|(key, value)| {
                self.column(&normalize_key(key))
                    .map(|col| (col, value.clone()))
            })
            .collect()
    }
}
