use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::filter::Filter;

/// Persistence collaborator. Implementations evaluate `Filter`s with the same
/// semantics: AND-combined predicates, the filter's ordering, and its window.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for logs and `/health`
    fn name(&self) -> &'static str;

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, DatabaseError>;

    /// Rows matching the filter's predicates, ignoring its window
    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError>;

    /// Inserts a row and returns it as stored, `id` assigned.
    async fn insert(&self, table: &str, record: Record) -> Result<Record, DatabaseError>;

    /// Applies `changes` to the row with `id`; `None` when no such row exists.
    async fn update(&self, table: &str, id: i64, changes: Record) -> Result<Option<Record>, DatabaseError>;

    async fn delete(&self, table: &str, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
