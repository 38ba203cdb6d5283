use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::database::store::Store;
use crate::filter::filter::validate_table_name;
use crate::filter::matcher::{compare_records, matches_all};
use crate::filter::Filter;

#[derive(Debug, Default)]
struct MemoryTable {
    next_id: i64,
    rows: BTreeMap<i64, Record>,
}

/// In-process store evaluating filters with `filter::matcher`.
/// Tables spring into existence on first write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, DatabaseError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(filter.table_name()) else {
            return Ok(vec![]);
        };

        let mut rows: Vec<&Record> = table
            .rows
            .values()
            .filter(|r| matches_all(r, filter.predicates()))
            .collect();
        if !filter.order_info().is_empty() {
            rows.sort_by(|a, b| compare_records(a, b, filter.order_info()));
        }

        let offset = filter.offset_value().unwrap_or(0) as usize;
        let limit = filter.limit_value().map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(filter.table_name())
            .map(|t| t.rows.values().filter(|r| matches_all(r, filter.predicates())).count() as u64)
            .unwrap_or(0))
    }

    async fn insert(&self, table: &str, mut record: Record) -> Result<Record, DatabaseError> {
        validate_table_name(table)?;
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;
        record.insert("id".to_string(), Value::from(id));
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, id: i64, changes: Record) -> Result<Option<Record>, DatabaseError> {
        validate_table_name(table)?;
        let mut tables = self.tables.write().await;
        let Some(row) = tables.get_mut(table).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(None);
        };
        for (key, value) in changes {
            if key != "id" {
                row.insert(key, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool, DatabaseError> {
        validate_table_name(table)?;
        let mut tables = self.tables.write().await;
        Ok(tables.get_mut(table).map_or(false, |t| t.rows.remove(&id).is_some()))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
