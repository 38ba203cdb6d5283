use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::database::store::Store;
use crate::filter::{Filter, FilterOrder, FilterOrderInfo, Predicate};
use crate::pagination::{PageMeta, PageRequest};

/// Fluent wrapper composing predicates, ordering and a page window into a
/// `Filter`, then running it against a `Store`.
pub struct QueryBuilder {
    filter: Filter,
}

impl QueryBuilder {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        Ok(Self { filter: Filter::new(table_name)? })
    }

    pub fn where_all(mut self, predicates: Vec<Predicate>) -> Result<Self, DatabaseError> {
        self.filter.where_all(predicates)?;
        Ok(self)
    }

    /// Ordering with `id ASC` appended as a tie-break, so pages are stable.
    pub fn order_by(mut self, order: Vec<FilterOrderInfo>) -> Result<Self, DatabaseError> {
        self.filter.order(FilterOrder::with_tiebreak(order))?;
        Ok(self)
    }

    pub fn paginate(mut self, page: &PageRequest) -> Result<Self, DatabaseError> {
        self.filter.limit(page.per_page, Some(page.offset()))?;
        Ok(self)
    }

    pub fn limit(mut self, limit: u64) -> Result<Self, DatabaseError> {
        self.filter.limit(limit, None)?;
        Ok(self)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub async fn select_all(self, store: &dyn Store) -> Result<Vec<Record>, DatabaseError> {
        store.select(&self.filter).await
    }

    pub async fn select_optional(self, store: &dyn Store) -> Result<Option<Record>, DatabaseError> {
        let query = self.limit(1)?;
        Ok(store.select(&query.filter).await?.into_iter().next())
    }

    pub async fn count(&self, store: &dyn Store) -> Result<u64, DatabaseError> {
        store.count(&self.filter.unbounded()).await
    }

    /// Window rows plus the unwindowed total
    pub async fn select_page(self, store: &dyn Store, page: &PageRequest) -> Result<(Vec<Record>, PageMeta), DatabaseError> {
        let total = self.count(store).await?;
        let query = self.paginate(page)?;
        let records = store.select(&query.filter).await?;
        Ok((records, PageMeta::new(page, total)))
    }
}
