// In-process evaluation of filters, mirroring the SQL semantics of FilterWhere/FilterOrder.
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::types::{FilterOrderInfo, Predicate, SortDirection};

pub fn matches_all(record: &Map<String, Value>, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| matches(record, p))
}

pub fn matches(record: &Map<String, Value>, predicate: &Predicate) -> bool {
    let field = |column: &str| record.get(column).unwrap_or(&Value::Null);
    match predicate {
        Predicate::Eq { column, value } => match value {
            Value::Null => field(column).is_null(),
            _ => loosely_equal(field(column), value),
        },
        Predicate::Ne { column, value } => match value {
            Value::Null => !field(column).is_null(),
            _ => !field(column).is_null() && !loosely_equal(field(column), value),
        },
        Predicate::Gte { column, value } => {
            !field(column).is_null() && compare_values(field(column), value) != Ordering::Less
        }
        Predicate::Lte { column, value } => {
            !field(column).is_null() && compare_values(field(column), value) != Ordering::Greater
        }
        Predicate::Since { column, at } => parse_instant(field(column)).map_or(false, |v| v >= *at),
        Predicate::Until { column, at } => parse_instant(field(column)).map_or(false, |v| v <= *at),
        Predicate::Search { columns, term } => {
            let needle = term.to_lowercase();
            columns.iter().any(|c| {
                text_form(field(c)).map_or(false, |s| s.to_lowercase().contains(&needle))
            })
        }
        Predicate::In { column, values } => values.iter().any(|v| loosely_equal(field(column), v)),
    }
}

/// Orders two records by the given columns. Nulls sort last on ascending
/// columns and first on descending ones, as Postgres does.
pub fn compare_records(a: &Map<String, Value>, b: &Map<String, Value>, order: &[FilterOrderInfo]) -> Ordering {
    for info in order {
        let left = a.get(&info.column).unwrap_or(&Value::Null);
        let right = b.get(&info.column).unwrap_or(&Value::Null);
        let ord = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => compare_values(left, right),
        };
        let ord = match info.sort {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn loosely_equal(stored: &Value, wanted: &Value) -> bool {
    if stored == wanted {
        return true;
    }
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Null, _) | (_, Value::Null) => false,
        _ => text_form(stored) == text_form(wanted),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Value::String(x), Value::String(y)) = (a, b) {
        if let (Some(x), Some(y)) = (parse_instant(a), parse_instant(b)) {
            return x.cmp(&y);
        }
        return x.cmp(y);
    }
    if let (Value::Bool(x), Value::Bool(y)) = (a, b) {
        return x.cmp(y);
    }
    text_form(a).cmp(&text_form(b))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn text_form(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads RFC 3339 timestamps and bare `YYYY-MM-DD` dates (as midnight UTC).
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_like(s),
        _ => None,
    }
}

pub fn parse_date_like(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
