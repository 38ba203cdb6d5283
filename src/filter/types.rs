use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a query parameter maps onto a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// `?field=value`, raw value passed through
    Equals,
    /// `?field=true|false`
    Boolean,
    /// `?field_min=..&field_max=..`
    Range,
    /// `?field_from=..&field_to=..`
    DateRange,
}

impl FilterKind {
    /// Query parameter suffixes recognised for this kind (empty = the bare field name)
    pub fn suffixes(&self) -> (&'static str, &'static str) {
        match self {
            FilterKind::Range => ("_min", "_max"),
            FilterKind::DateRange => ("_from", "_to"),
            FilterKind::Equals | FilterKind::Boolean => ("", ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    pub column: String,
    pub kind: FilterKind,
}

/// A single WHERE condition. Predicates in a filter are AND-combined.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Equality; a null value means IS NULL
    Eq { column: String, value: Value },
    /// Inequality; a null value means IS NOT NULL
    Ne { column: String, value: Value },
    Gte { column: String, value: Value },
    Lte { column: String, value: Value },
    /// Timestamp lower bound (inclusive)
    Since { column: String, at: DateTime<Utc> },
    /// Timestamp upper bound (inclusive)
    Until { column: String, at: DateTime<Utc> },
    /// Case-insensitive substring match, OR-combined across columns
    Search { columns: Vec<String>, term: String },
    In { column: String, values: Vec<Value> },
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq { column: column.into(), value: value.into() }
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ne { column: column.into(), value: value.into() }
    }

    /// Columns referenced by this predicate
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::Ne { column, .. }
            | Predicate::Gte { column, .. }
            | Predicate::Lte { column, .. }
            | Predicate::Since { column, .. }
            | Predicate::Until { column, .. }
            | Predicate::In { column, .. } => vec![column.as_str()],
            Predicate::Search { columns, .. } => columns.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), sort: SortDirection::Asc }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), sort: SortDirection::Desc }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
