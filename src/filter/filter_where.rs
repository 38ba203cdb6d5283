use chrono::SecondsFormat;
use serde_json::Value;

use super::error::FilterError;
use super::types::Predicate;

/// Compiles predicates into a parameterized Postgres WHERE clause.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(predicates: &[Predicate], starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(predicates)
    }

    fn build(&mut self, predicates: &[Predicate]) -> Result<(String, Vec<Value>), FilterError> {
        let mut sql_conditions = vec![];
        for predicate in predicates {
            sql_conditions.push(self.build_sql_condition(predicate)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, predicate: &Predicate) -> Result<String, FilterError> {
        match predicate {
            Predicate::Eq { column, value } => Ok(match value {
                Value::Null => format!("{} IS NULL", quote(column)),
                // Raw strings compare against the column's text form so that
                // `?organization_id=3` works against integer columns too.
                Value::String(_) => format!("{}::text = {}", quote(column), self.param(value.clone())),
                _ => format!("{} = {}", quote(column), self.param(value.clone())),
            }),
            Predicate::Ne { column, value } => Ok(match value {
                Value::Null => format!("{} IS NOT NULL", quote(column)),
                Value::String(_) => format!("{}::text <> {}", quote(column), self.param(value.clone())),
                _ => format!("{} <> {}", quote(column), self.param(value.clone())),
            }),
            Predicate::Gte { column, value } => {
                Self::require_scalar(column, value)?;
                Ok(format!("{} >= {}", quote(column), self.param(value.clone())))
            }
            Predicate::Lte { column, value } => {
                Self::require_scalar(column, value)?;
                Ok(format!("{} <= {}", quote(column), self.param(value.clone())))
            }
            Predicate::Since { column, at } => {
                let p = self.param(Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true)));
                Ok(format!("{} >= {}::timestamptz", quote(column), p))
            }
            Predicate::Until { column, at } => {
                let p = self.param(Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true)));
                Ok(format!("{} <= {}::timestamptz", quote(column), p))
            }
            Predicate::Search { columns, term } => {
                if columns.is_empty() {
                    return Err(FilterError::InvalidOperatorData("search requires at least one column".to_string()));
                }
                let p = self.param(Value::String(format!("%{}%", escape_like(term))));
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}::text ILIKE {}", quote(c), p))
                    .collect();
                Ok(format!("({})", parts.join(" OR ")))
            }
            Predicate::In { column, values } => {
                if values.is_empty() { return Ok("1=0".to_string()); }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} IN ({})", quote(column), params.join(", ")))
            }
        }
    }

    fn require_scalar(column: &str, value: &Value) -> Result<(), FilterError> {
        match value {
            Value::Number(_) | Value::String(_) => Ok(()),
            _ => Err(FilterError::InvalidOperatorData(format!("range bound for {} must be a number or string", column))),
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') { out.push('\\'); }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn empty_predicates_match_everything() {
        let (sql, params) = FilterWhere::generate(&[], 0).unwrap();
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn equality_binds_by_value_type() {
        let preds = vec![
            Predicate::eq("category", "sustainability"),
            Predicate::eq("is_active", true),
            Predicate::eq("user_id", 7),
        ];
        let (sql, params) = FilterWhere::generate(&preds, 0).unwrap();
        assert_eq!(sql, "\"category\"::text = $1 AND \"is_active\" = $2 AND \"user_id\" = $3");
        assert_eq!(params, vec![json!("sustainability"), json!(true), json!(7)]);
    }

    #[test]
    fn null_equality_becomes_is_null() {
        let (sql, params) = FilterWhere::generate(&[Predicate::eq("parent_id", Value::Null)], 0).unwrap();
        assert_eq!(sql, "\"parent_id\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn search_reuses_one_placeholder_and_escapes_wildcards() {
        let preds = vec![Predicate::Search {
            columns: vec!["name".into(), "description".into()],
            term: "100%_green".into(),
        }];
        let (sql, params) = FilterWhere::generate(&preds, 0).unwrap();
        assert_eq!(sql, "(\"name\"::text ILIKE $1 OR \"description\"::text ILIKE $1)");
        assert_eq!(params, vec![json!("%100\\%\\_green%")]);
    }

    #[test]
    fn date_bounds_cast_to_timestamptz() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (sql, params) = FilterWhere::generate(&[Predicate::Since { column: "created_at".into(), at }], 2).unwrap();
        assert_eq!(sql, "\"created_at\" >= $3::timestamptz");
        assert_eq!(params, vec![json!("2024-01-01T00:00:00.000000Z")]);
    }

    #[test]
    fn empty_in_matches_nothing() {
        let (sql, _) = FilterWhere::generate(&[Predicate::In { column: "id".into(), values: vec![] }], 0).unwrap();
        assert_eq!(sql, "1=0");
    }

    #[test]
    fn range_bound_rejects_objects() {
        let err = FilterWhere::generate(&[Predicate::Gte { column: "points".into(), value: json!({"a": 1}) }], 0);
        assert!(err.is_err());
    }
}
