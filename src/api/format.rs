use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::{Map, Value};

use crate::database::record::record_id;
use crate::database::{DatabaseError, Record, Repository, Store};
use crate::filter::matcher::parse_instant;
use crate::filter::Predicate;
use crate::resource::{ComputedField, Relation, ResourceDescriptor};

/// Renders stored records into the `data` wire shape: stored columns minus
/// hidden ones, eager-loaded relation summaries, and computed fields.
pub struct ResourceTransformer<'a> {
    descriptor: &'a ResourceDescriptor,
    store: Arc<dyn Store>,
}

impl<'a> ResourceTransformer<'a> {
    pub fn new(descriptor: &'a ResourceDescriptor, store: Arc<dyn Store>) -> Self {
        Self { descriptor, store }
    }

    pub async fn render_one(&self, record: Record) -> Result<Value, DatabaseError> {
        let mut rendered = self.render_many(vec![record]).await?;
        Ok(rendered.pop().unwrap_or(Value::Null))
    }

    /// Relations and computed counts are loaded with one query each for the
    /// whole batch.
    pub async fn render_many(&self, records: Vec<Record>) -> Result<Vec<Value>, DatabaseError> {
        let loaded = try_join_all(
            self.descriptor
                .relations()
                .iter()
                .map(|relation| self.load_relation(relation, &records)),
        )
        .await?;
        let counts = try_join_all(
            self.descriptor
                .computed_fields()
                .iter()
                .map(|field| self.load_counts(field, &records)),
        )
        .await?;

        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let mut data = record.clone();

            for (relation, summaries) in self.descriptor.relations().iter().zip(&loaded) {
                let summary = record
                    .get(&relation.foreign_key)
                    .and_then(as_id)
                    .and_then(|id| summaries.get(&id).cloned())
                    .unwrap_or(Value::Null);
                data.insert(relation.name.clone(), summary);
            }

            for (field, counts) in self.descriptor.computed_fields().iter().zip(&counts) {
                let value = match field {
                    ComputedField::Count { .. } => {
                        let count = record_id(&record).and_then(|id| counts.get(&id).copied()).unwrap_or(0);
                        Value::from(count)
                    }
                    ComputedField::DurationMinutes { start, end, .. } => duration_minutes(&record, start, end),
                };
                data.insert(field.name().to_string(), value);
            }

            for hidden in self.descriptor.hidden_fields() {
                data.remove(hidden);
            }
            out.push(Value::Object(data));
        }
        Ok(out)
    }

    async fn load_relation(&self, relation: &Relation, records: &[Record]) -> Result<HashMap<i64, Value>, DatabaseError> {
        let ids: HashSet<i64> = records
            .iter()
            .filter_map(|r| r.get(&relation.foreign_key).and_then(as_id))
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Repository::new(relation.table.as_str(), self.store.clone())
            .select_ids(ids.into_iter().map(Value::from).collect())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = record_id(&row)?;
                let summary: Map<String, Value> = relation
                    .fields
                    .iter()
                    .map(|f| (f.clone(), row.get(f).cloned().unwrap_or(Value::Null)))
                    .collect();
                Some((id, Value::Object(summary)))
            })
            .collect())
    }

    /// Child rows per parent id for a `Count` field; empty for other kinds
    async fn load_counts(&self, field: &ComputedField, records: &[Record]) -> Result<HashMap<i64, u64>, DatabaseError> {
        let ComputedField::Count { table, foreign_key, .. } = field else {
            return Ok(HashMap::new());
        };
        let ids: HashSet<i64> = records.iter().filter_map(record_id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let children = Repository::new(table.as_str(), self.store.clone())
            .select_any(
                vec![Predicate::In {
                    column: foreign_key.clone(),
                    values: ids.into_iter().map(Value::from).collect(),
                }],
                vec![],
            )
            .await?;

        let mut counts = HashMap::new();
        for child in &children {
            if let Some(parent) = child.get(foreign_key).and_then(as_id) {
                *counts.entry(parent).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

/// Whole minutes from `start` to `end`; null unless both are set
pub fn duration_minutes(record: &Record, start: &str, end: &str) -> Value {
    let start = record.get(start).and_then(parse_instant);
    let end = record.get(end).and_then(parse_instant);
    match (start, end) {
        (Some(s), Some(e)) => Value::from((e - s).num_minutes()),
        _ => Value::Null,
    }
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
