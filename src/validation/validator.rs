use std::sync::Arc;

use serde_json::{Number, Value};
use tracing::debug;

use super::errors::ValidationErrors;
use super::formats;
use super::rules::{display_name, FieldRules, Rule};
use super::ValidationOutcome;
use crate::database::record::{record_id, Record, SYSTEM_FIELDS};
use crate::database::{DatabaseError, Repository, Store};
use crate::filter::matcher::parse_date_like;
use crate::filter::spec::parse_bool;
use crate::filter::Predicate;

/// Checks an input record against a resource's field rules.
///
/// Creates are validated when `existing` is `None`; updates are partial, so
/// absent fields are skipped and cross-field rules fall back to the stored row.
pub struct Validator<'a> {
    rules: &'a [FieldRules],
    store: Arc<dyn Store>,
    owner: Option<(&'a str, i64)>,
}

impl<'a> Validator<'a> {
    pub fn new(rules: &'a [FieldRules], store: Arc<dyn Store>) -> Self {
        Self { rules, store, owner: None }
    }

    /// Owner field value used when a uniqueness scope includes the owner
    pub fn owned_by(mut self, field: &'a str, caller: i64) -> Self {
        self.owner = Some((field, caller));
        self
    }

    pub async fn validate(&self, input: Record, existing: Option<&Record>) -> Result<ValidationOutcome, DatabaseError> {
        let creating = existing.is_none();
        let mut data = self.permitted(input);
        let mut errors = ValidationErrors::new();
        let mut passed: Vec<&FieldRules> = Vec::new();

        for field in self.rules {
            match check_field(field, &mut data, creating) {
                Ok(true) => passed.push(field),
                Ok(false) => {}
                Err(messages) => {
                    for message in messages {
                        errors.add(field.name.clone(), message);
                    }
                }
            }
        }

        // On update, a stored value is rechecked when a field it depends on
        // (an after_or_equal anchor or a uniqueness scope column) changes
        if !creating {
            for field in self.rules {
                let affected = !errors.has(&field.name)
                    && !passed.iter().any(|p| p.name == field.name)
                    && field.dependencies().any(|other| data.contains_key(other));
                if affected {
                    passed.push(field);
                }
            }
        }

        // Rules that look at other fields or other rows, only for fields that
        // already passed their own checks
        let merged = self.merged_view(&data, existing);
        for field in passed {
            for message in self.check_relations(field, &merged, existing).await? {
                errors.add(field.name.clone(), message);
            }
        }

        if errors.is_empty() {
            Ok(ValidationOutcome::Valid(data))
        } else {
            Ok(ValidationOutcome::Invalid(errors))
        }
    }

    /// Drops system fields and anything the rule set does not declare.
    fn permitted(&self, input: Record) -> Record {
        input
            .into_iter()
            .filter(|(key, _)| {
                let keep = !SYSTEM_FIELDS.contains(&key.as_str()) && self.rules.iter().any(|f| &f.name == key);
                if !keep {
                    debug!("Dropping non-assignable field '{}'", key);
                }
                keep
            })
            .collect()
    }

    fn merged_view(&self, data: &Record, existing: Option<&Record>) -> Record {
        let mut merged = existing.cloned().unwrap_or_default();
        for (key, value) in data {
            merged.insert(key.clone(), value.clone());
        }
        if let Some((field, caller)) = self.owner {
            if existing.is_none() || !merged.contains_key(field) {
                merged.insert(field.to_string(), Value::from(caller));
            }
        }
        merged
    }

    async fn check_relations(
        &self,
        field: &FieldRules,
        merged: &Record,
        existing: Option<&Record>,
    ) -> Result<Vec<String>, DatabaseError> {
        let mut messages = Vec::new();
        let value = merged.get(&field.name).cloned().unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(messages);
        }
        let label = display_name(&field.name);

        for rule in &field.rules {
            match rule {
                Rule::Exists { table } => {
                    let found = Repository::new(table.as_str(), self.store.clone())
                        .exists(vec![Predicate::eq("id", value.clone())])
                        .await?;
                    if !found {
                        messages.push(format!("The selected {} is invalid.", label));
                    }
                }
                Rule::Unique { table, scope } => {
                    let mut predicates = vec![Predicate::eq(field.name.clone(), value.clone())];
                    for column in scope {
                        predicates.push(Predicate::eq(column.clone(), merged.get(column).cloned().unwrap_or(Value::Null)));
                    }
                    if let Some(id) = existing.and_then(record_id) {
                        predicates.push(Predicate::ne("id", id));
                    }
                    let taken = Repository::new(table.as_str(), self.store.clone()).exists(predicates).await?;
                    if taken {
                        messages.push(format!("The {} has already been taken.", label));
                    }
                }
                Rule::AfterOrEqual(other) => {
                    let start = merged.get(other).and_then(|v| v.as_str()).and_then(parse_date_like);
                    let end = value.as_str().and_then(parse_date_like);
                    if let (Some(start), Some(end)) = (start, end) {
                        if end < start {
                            messages.push(format!(
                                "The {} field must be a date after or equal to {}.",
                                label,
                                display_name(other)
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(messages)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Presence and format checks for one field, normalizing the value in place.
/// `Ok(true)` means the field holds a non-null value that passed; `Err` carries
/// every failed rule's message.
fn check_field(field: &FieldRules, data: &mut Record, creating: bool) -> Result<bool, Vec<String>> {
    let label = display_name(&field.name);
    let present = data.contains_key(&field.name);
    let value = data.get(&field.name).cloned().unwrap_or(Value::Null);

    if is_blank(&value) {
        let required = if creating {
            field.is_required()
        } else {
            present && field.is_required_on_update()
        };
        if required {
            return Err(vec![format!("The {} field is required.", label)]);
        }
        if present {
            data.insert(field.name.clone(), Value::Null);
        }
        return Ok(false);
    }

    let mut value = value;
    let mut messages = Vec::new();
    for rule in &field.rules {
        match check_rule(rule, &value, &label) {
            Ok(Some(normalized)) => value = normalized,
            Ok(None) => {}
            Err(message) => messages.push(message),
        }
    }
    if !messages.is_empty() {
        return Err(messages);
    }
    data.insert(field.name.clone(), value);
    Ok(true)
}

fn check_rule(rule: &Rule, value: &Value, label: &str) -> Result<Option<Value>, String> {
    let text = value.as_str();
    let string_check = |ok: fn(&str) -> bool, message: String| -> Result<Option<Value>, String> {
        match text {
            Some(s) if ok(s) => Ok(None),
            _ => Err(message),
        }
    };

    match rule {
        Rule::String { max } => match text {
            None => Err(format!("The {} field must be a string.", label)),
            Some(s) => match max {
                Some(max) if s.chars().count() > *max => {
                    Err(format!("The {} field must not be greater than {} characters.", label, max))
                }
                _ => Ok(None),
            },
        },
        Rule::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(None),
            Value::Number(n) if n.as_f64().map_or(false, |f| f.fract() == 0.0) => {
                Ok(n.as_f64().map(|f| Value::from(f as i64)))
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| Some(Value::from(i)))
                .map_err(|_| format!("The {} field must be an integer.", label)),
            _ => Err(format!("The {} field must be an integer.", label)),
        },
        Rule::Numeric => match value {
            Value::Number(_) => Ok(None),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(Some(Value::from(i)));
                }
                s.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(|n| Some(Value::Number(n)))
                    .ok_or_else(|| format!("The {} field must be a number.", label))
            }
            _ => Err(format!("The {} field must be a number.", label)),
        },
        Rule::Boolean => match value {
            Value::Bool(_) => Ok(None),
            Value::Number(n) if n.as_i64() == Some(0) || n.as_i64() == Some(1) => {
                Ok(Some(Value::Bool(n.as_i64() == Some(1))))
            }
            Value::String(s) => parse_bool(s.trim())
                .map(|b| Some(Value::Bool(b)))
                .ok_or_else(|| format!("The {} field must be true or false.", label)),
            _ => Err(format!("The {} field must be true or false.", label)),
        },
        Rule::Email => string_check(formats::is_email, format!("The {} field must be a valid email address.", label)),
        Rule::Url => string_check(formats::is_url, format!("The {} field must be a valid URL.", label)),
        Rule::HexColor => {
            string_check(formats::is_hex_color, format!("The {} field must be a valid hexadecimal color.", label))
        }
        Rule::Timezone => string_check(formats::is_timezone, format!("The {} field must be a valid timezone.", label)),
        Rule::Date => string_check(formats::is_date, format!("The {} field must be a valid date.", label)),
        Rule::In(allowed) => {
            let candidate = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if allowed.iter().any(|a| *a == candidate) {
                Ok(None)
            } else {
                Err(format!("The selected {} is invalid.", label))
            }
        }
        Rule::Min(min) => match value.as_f64() {
            Some(n) if n < *min => Err(format!("The {} field must be at least {}.", label, min)),
            _ => Ok(None),
        },
        Rule::Max(max) => match value.as_f64() {
            Some(n) if n > *max => Err(format!("The {} field must not be greater than {}.", label, max)),
            _ => Ok(None),
        },
        Rule::Required | Rule::RequiredOnUpdate | Rule::Exists { .. } | Rule::Unique { .. } | Rule::AfterOrEqual(_) => {
            Ok(None)
        }
    }
}
