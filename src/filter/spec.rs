use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{Number, Value};

use super::matcher::parse_date_like;
use super::types::{FilterField, FilterKind, Predicate};

/// Declares which list parameters a resource understands.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    fields: Vec<FilterField>,
    search_columns: Vec<String>,
    owner_field: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, column: impl Into<String>, kind: FilterKind) -> Self {
        self.fields.push(FilterField { column: column.into(), kind });
        self
    }

    pub fn search(mut self, columns: &[&str]) -> Self {
        self.search_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn owned_by(mut self, column: impl Into<String>) -> Self {
        self.owner_field = Some(column.into());
        self
    }

    pub fn fields(&self) -> &[FilterField] { &self.fields }
    pub fn search_columns(&self) -> &[String] { &self.search_columns }
    pub fn owner_field(&self) -> Option<&str> { self.owner_field.as_deref() }

    /// Query parameter names this spec reacts to (owner scope excluded)
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for f in &self.fields {
            match f.kind {
                FilterKind::Equals | FilterKind::Boolean => names.push(f.column.clone()),
                FilterKind::Range | FilterKind::DateRange => {
                    let (lo, hi) = f.kind.suffixes();
                    names.push(format!("{}{}", f.column, lo));
                    names.push(format!("{}{}", f.column, hi));
                }
            }
        }
        if !self.search_columns.is_empty() {
            names.push("search".to_string());
        }
        names
    }

    /// Owner scope predicate for `caller`, if the resource is owned
    pub fn owner_predicate(&self, caller: i64) -> Option<Predicate> {
        self.owner_field.as_ref().map(|column| Predicate::eq(column.clone(), caller))
    }

    /// Builds the AND-list for a list request.
    ///
    /// The owner predicate always comes first and cannot be influenced by the
    /// request; absent or empty parameters never produce a predicate.
    pub fn predicates(&self, params: &HashMap<String, String>, caller: i64) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(owner) = self.owner_predicate(caller) {
            out.push(owner);
        }

        let param = |name: &str| -> Option<&str> {
            params.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
        };

        for field in &self.fields {
            if self.owner_field.as_deref() == Some(field.column.as_str()) {
                continue;
            }
            match field.kind {
                FilterKind::Equals => {
                    if let Some(raw) = param(&field.column) {
                        out.push(Predicate::eq(field.column.clone(), raw));
                    }
                }
                FilterKind::Boolean => {
                    if let Some(raw) = param(&field.column) {
                        match parse_bool(raw) {
                            Some(b) => out.push(Predicate::eq(field.column.clone(), b)),
                            None => tracing::debug!("Ignoring non-boolean value '{}' for filter {}", raw, field.column),
                        }
                    }
                }
                FilterKind::Range => {
                    let (lo, hi) = field.kind.suffixes();
                    if let Some(n) = param(&format!("{}{}", field.column, lo)).and_then(parse_number) {
                        out.push(Predicate::Gte { column: field.column.clone(), value: Value::Number(n) });
                    }
                    if let Some(n) = param(&format!("{}{}", field.column, hi)).and_then(parse_number) {
                        out.push(Predicate::Lte { column: field.column.clone(), value: Value::Number(n) });
                    }
                }
                FilterKind::DateRange => {
                    let (lo, hi) = field.kind.suffixes();
                    if let Some(at) = param(&format!("{}{}", field.column, lo)).and_then(parse_date_like) {
                        out.push(Predicate::Since { column: field.column.clone(), at });
                    }
                    if let Some(at) = param(&format!("{}{}", field.column, hi)).and_then(parse_upper_bound) {
                        out.push(Predicate::Until { column: field.column.clone(), at });
                    }
                }
            }
        }

        if !self.search_columns.is_empty() {
            if let Some(term) = param("search") {
                out.push(Predicate::Search { columns: self.search_columns.clone(), term: term.to_string() });
            }
        }

        out
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Number::from(i));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// A bare date as upper bound covers the whole day.
fn parse_upper_bound(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let next = date.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(next - Duration::microseconds(1));
    }
    parse_date_like(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn spec() -> FilterSpec {
        FilterSpec::new()
            .field("category", FilterKind::Equals)
            .field("is_active", FilterKind::Boolean)
            .field("points", FilterKind::Range)
            .field("created_at", FilterKind::DateRange)
            .search(&["name", "description"])
    }

    #[test]
    fn absent_and_empty_parameters_add_nothing() {
        assert!(spec().predicates(&params(&[]), 1).is_empty());
        assert!(spec().predicates(&params(&[("category", ""), ("search", "  ")]), 1).is_empty());
    }

    #[test]
    fn equality_passes_raw_value() {
        let preds = spec().predicates(&params(&[("category", "sustainability")]), 1);
        assert_eq!(preds, vec![Predicate::eq("category", "sustainability")]);
    }

    #[test]
    fn booleans_coerce_or_are_ignored() {
        let preds = spec().predicates(&params(&[("is_active", "false")]), 1);
        assert_eq!(preds, vec![Predicate::eq("is_active", false)]);
        assert!(spec().predicates(&params(&[("is_active", "maybe")]), 1).is_empty());
    }

    #[test]
    fn range_bounds_apply_independently() {
        let preds = spec().predicates(&params(&[("points_min", "10")]), 1);
        assert_eq!(preds, vec![Predicate::Gte { column: "points".into(), value: Value::from(10) }]);
        let preds = spec().predicates(&params(&[("points_max", "2.5")]), 1);
        assert_eq!(preds.len(), 1);
        assert!(spec().predicates(&params(&[("points_min", "ten")]), 1).is_empty());
    }

    #[test]
    fn date_upper_bound_covers_whole_day() {
        let preds = spec().predicates(&params(&[("created_at_to", "2024-03-01")]), 1);
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap() + Duration::microseconds(999_999);
        assert_eq!(preds, vec![Predicate::Until { column: "created_at".into(), at: expected }]);
    }

    #[test]
    fn owner_scope_is_mandatory_and_not_overridable() {
        let owned = FilterSpec::new()
            .owned_by("user_id")
            .field("user_id", FilterKind::Equals)
            .field("status", FilterKind::Equals);
        let preds = owned.predicates(&params(&[("user_id", "99"), ("status", "unlocked")]), 7);
        assert_eq!(preds, vec![Predicate::eq("user_id", 7), Predicate::eq("status", "unlocked")]);
    }

    #[test]
    fn search_targets_declared_columns() {
        let preds = spec().predicates(&params(&[("search", "green")]), 1);
        assert_eq!(
            preds,
            vec![Predicate::Search { columns: vec!["name".into(), "description".into()], term: "green".into() }]
        );
    }
}
