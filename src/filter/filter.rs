use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{quote, FilterWhere};
use super::types::{FilterOrderInfo, Predicate, SqlResult};

/// A query against one table: predicates, ordering, and an optional window.
///
/// Stores either compile it to SQL (`to_sql`, `to_count_sql`) or evaluate it
/// directly (see `filter::matcher`).
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    predicates: Vec<Predicate>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            predicates: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn where_all(&mut self, predicates: Vec<Predicate>) -> Result<&mut Self, FilterError> {
        for predicate in predicates {
            self.push(predicate)?;
        }
        Ok(self)
    }

    pub fn push(&mut self, predicate: Predicate) -> Result<&mut Self, FilterError> {
        for column in predicate.columns() {
            validate_column(column)?;
        }
        self.predicates.push(predicate);
        Ok(self)
    }

    pub fn order(&mut self, order: Vec<FilterOrderInfo>) -> Result<&mut Self, FilterError> {
        for info in &order {
            validate_column(&info.column)?;
        }
        self.order_data = order;
        Ok(self)
    }

    pub fn limit(&mut self, limit: u64, offset: Option<u64>) -> Result<&mut Self, FilterError> {
        if limit == 0 { return Err(FilterError::InvalidLimit("Limit must be positive".to_string())); }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    /// Same table and predicates, no ordering or window
    pub fn unbounded(&self) -> Self {
        Self {
            table_name: self.table_name.clone(),
            predicates: self.predicates.clone(),
            order_data: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn table_name(&self) -> &str { &self.table_name }
    pub fn predicates(&self) -> &[Predicate] { &self.predicates }
    pub fn order_info(&self) -> &[FilterOrderInfo] { &self.order_data }
    pub fn limit_value(&self) -> Option<u64> { self.limit }
    pub fn offset_value(&self) -> Option<u64> { self.offset }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0)?;
        let order_clause = FilterOrder::generate(&self.order_data)?;
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT row_to_json(t) AS row".to_string(),
            format!("FROM {} t", quote(&self.table_name)),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0)?;
        let query = format!("SELECT COUNT(*)::bigint AS count FROM {} WHERE {}", quote(&self.table_name), where_clause);
        Ok(SqlResult { query, params })
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) if o > 0 => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), _) => format!("LIMIT {}", l),
            (None, Some(o)) if o > 0 => format!("OFFSET {}", o),
            _ => String::new(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
    if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
    if !is_identifier(name) {
        return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
    }
    Ok(())
}

pub fn validate_column(name: &str) -> Result<(), FilterError> {
    if name.is_empty() { return Err(FilterError::InvalidColumn("Column name cannot be empty".to_string())); }
    if !is_identifier(name) {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_unsafe_identifiers() {
        assert!(Filter::new("achievements").is_ok());
        assert!(Filter::new("").is_err());
        assert!(Filter::new("users; DROP TABLE users").is_err());
        assert!(Filter::new("9lives").is_err());

        let mut filter = Filter::new("achievements").unwrap();
        assert!(filter.push(Predicate::eq("name\" OR 1=1 --", "x")).is_err());
    }

    #[test]
    fn select_sql_combines_where_order_and_window() {
        let mut filter = Filter::new("achievements").unwrap();
        filter
            .where_all(vec![Predicate::eq("category", "social")]).unwrap()
            .order(vec![FilterOrderInfo::asc("sort_order"), FilterOrderInfo::asc("id")]).unwrap()
            .limit(15, Some(30)).unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM \"achievements\" t WHERE \"category\"::text = $1 \
             ORDER BY \"sort_order\" ASC, \"id\" ASC LIMIT 15 OFFSET 30"
        );
        assert_eq!(sql.params, vec![json!("social")]);
    }

    #[test]
    fn count_sql_ignores_window() {
        let mut filter = Filter::new("tags").unwrap();
        filter.limit(10, Some(10)).unwrap();
        let sql = filter.to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*)::bigint AS count FROM \"tags\" WHERE 1=1");
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut filter = Filter::new("tags").unwrap();
        assert!(filter.limit(0, None).is_err());
    }
}
