use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row};
use tracing::debug;

use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::record::Record;
use crate::database::store::Store;
use crate::filter::filter::{validate_column, validate_table_name};
use crate::filter::Filter;

/// Postgres-backed store. Rows travel as JSON in both directions:
/// reads through `row_to_json`, writes through `jsonb_populate_record`, so
/// column types are coerced by the database itself.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn log_query(query: &str) {
        if config::config().database.enable_query_logging {
            debug!("SQL: {}", query);
        }
    }
}

fn quoted_columns(record: &Record) -> Result<Vec<String>, DatabaseError> {
    record
        .keys()
        .map(|k| {
            validate_column(k)?;
            Ok(format!("\"{}\"", k))
        })
        .collect()
}

fn insert_sql(table: &str, columns: &[String]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO \"{}\" AS t DEFAULT VALUES RETURNING row_to_json(t) AS row", table);
    }
    let list = columns.join(", ");
    format!(
        "INSERT INTO \"{table}\" AS t ({list}) SELECT {list} FROM jsonb_populate_record(NULL::\"{table}\", $1) \
         RETURNING row_to_json(t) AS row"
    )
}

fn update_sql(table: &str, columns: &[String]) -> String {
    let list = columns.join(", ");
    let target = if columns.len() == 1 { list.clone() } else { format!("({})", list) };
    format!(
        "UPDATE \"{table}\" AS t SET {target} = (SELECT {list} FROM jsonb_populate_record(NULL::\"{table}\", $1)) \
         WHERE t.\"id\" = $2 RETURNING row_to_json(t) AS row"
    )
}

fn map_write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return DatabaseError::UniqueViolation(db.constraint().map(str::to_string));
        }
    }
    DatabaseError::Sqlx(err)
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<Record, DatabaseError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!("Expected a JSON row, got {}", other))),
    }
}

#[async_trait]
impl Store for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Record>, DatabaseError> {
        let sql_result = filter.to_sql()?;
        Self::log_query(&sql_result.query);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let sql_result = filter.to_count_sql()?;
        Self::log_query(&sql_result.query);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Record, DatabaseError> {
        validate_table_name(table)?;
        let columns = quoted_columns(&record)?;
        let query = insert_sql(table, &columns);
        Self::log_query(&query);

        let mut q = sqlx::query(&query);
        if !columns.is_empty() {
            q = q.bind(Value::Object(record));
        }
        let row = q.fetch_one(&self.pool).await.map_err(map_write_error)?;
        row_to_record(&row)
    }

    async fn update(&self, table: &str, id: i64, changes: Record) -> Result<Option<Record>, DatabaseError> {
        validate_table_name(table)?;
        if changes.is_empty() {
            let mut filter = Filter::new(table)?;
            filter.push(crate::filter::Predicate::eq("id", id))?;
            return Ok(self.select(&filter).await?.into_iter().next());
        }

        let columns = quoted_columns(&changes)?;
        let query = update_sql(table, &columns);
        Self::log_query(&query);

        let row = sqlx::query(&query)
            .bind(Value::Object(changes))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool, DatabaseError> {
        validate_table_name(table)?;
        let query = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", table);
        Self::log_query(&query);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
