use std::sync::Arc;

use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::database::record::Record;
use crate::database::store::Store;
use crate::filter::{FilterOrderInfo, Predicate};
use crate::pagination::{Page, PageRequest};

/// Table-scoped access to a `Store`
#[derive(Clone)]
pub struct Repository {
    table_name: String,
    store: Arc<dyn Store>,
}

impl Repository {
    pub fn new(table_name: impl Into<String>, store: Arc<dyn Store>) -> Self {
        Self {
            table_name: table_name.into(),
            store,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn select_any(&self, predicates: Vec<Predicate>, order: Vec<FilterOrderInfo>) -> Result<Vec<Record>, DatabaseError> {
        QueryBuilder::new(&self.table_name)?
            .where_all(predicates)?
            .order_by(order)?
            .select_all(self.store.as_ref())
            .await
    }

    pub async fn select_page(
        &self,
        predicates: Vec<Predicate>,
        order: Vec<FilterOrderInfo>,
        page: &PageRequest,
    ) -> Result<Page<Record>, DatabaseError> {
        let (records, meta) = QueryBuilder::new(&self.table_name)?
            .where_all(predicates)?
            .order_by(order)?
            .select_page(self.store.as_ref(), page)
            .await?;
        Ok(Page { records, meta })
    }

    pub async fn select_one(&self, predicates: Vec<Predicate>) -> Result<Option<Record>, DatabaseError> {
        QueryBuilder::new(&self.table_name)?
            .where_all(predicates)?
            .select_optional(self.store.as_ref())
            .await
    }

    pub async fn select_404(&self, predicates: Vec<Predicate>) -> Result<Record, DatabaseError> {
        self.select_one(predicates)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    pub async fn count(&self, predicates: Vec<Predicate>) -> Result<u64, DatabaseError> {
        QueryBuilder::new(&self.table_name)?
            .where_all(predicates)?
            .count(self.store.as_ref())
            .await
    }

    pub async fn exists(&self, predicates: Vec<Predicate>) -> Result<bool, DatabaseError> {
        Ok(self.select_one(predicates).await?.is_some())
    }

    pub async fn select_ids(&self, ids: Vec<Value>) -> Result<Vec<Record>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        self.select_any(vec![Predicate::In { column: "id".to_string(), values: ids }], vec![])
            .await
    }

    pub async fn create(&self, record: Record) -> Result<Record, DatabaseError> {
        self.store.insert(&self.table_name, record).await
    }

    pub async fn update(&self, id: i64, changes: Record) -> Result<Option<Record>, DatabaseError> {
        self.store.update(&self.table_name, id, changes).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        self.store.delete(&self.table_name, id).await
    }
}
