use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::api::ResourceTransformer;
use crate::database::{DatabaseError, Record, Repository, Store};
use crate::error::ApiError;
use crate::filter::Predicate;
use crate::observer::{ObserverContext, ObserverPipeline};
use crate::pagination::{PageMeta, PageRequest};
use crate::resource::{ActionEffect, ResourceDescriptor};
use crate::types::{self, Operation};
use crate::validation::rules::display_name;
use crate::validation::ValidationErrors;

/// CRUD orchestration for one resource on behalf of one caller.
///
/// Every record lookup is scoped by id and, for owned resources, by owner;
/// a row that exists but belongs to someone else is reported as missing.
pub struct ResourceService {
    descriptor: Arc<ResourceDescriptor>,
    store: Arc<dyn Store>,
    pipeline: Arc<ObserverPipeline>,
    caller: i64,
}

impl ResourceService {
    pub fn new(
        descriptor: Arc<ResourceDescriptor>,
        store: Arc<dyn Store>,
        pipeline: Arc<ObserverPipeline>,
        caller: i64,
    ) -> Self {
        Self {
            descriptor,
            store,
            pipeline,
            caller,
        }
    }

    fn repository(&self) -> Repository {
        Repository::new(self.descriptor.table_name(), self.store.clone())
    }

    fn transformer(&self) -> ResourceTransformer<'_> {
        ResourceTransformer::new(&self.descriptor, self.store.clone())
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> Result<(Vec<Value>, PageMeta), ApiError> {
        let mut errors = ValidationErrors::new();
        let page = PageRequest::from_params(params).map_err(|e| errors.merge(e)).ok();
        let order = self.descriptor.list_order(params).map_err(|e| errors.merge(e)).ok();
        let (Some(page), Some(order)) = (page, order) else {
            return Err(ApiError::validation_failed(errors));
        };

        let predicates = self.descriptor.filter_spec().predicates(params, self.caller);
        let result = self.repository().select_page(predicates, order, &page).await?;

        info!(
            "Listed {} page {} ({} of {})",
            self.descriptor.name(),
            result.meta.current_page,
            result.records.len(),
            result.meta.total
        );

        let data = self.transformer().render_many(result.records).await?;
        Ok((data, result.meta))
    }

    pub async fn show(&self, id: &str) -> Result<Value, ApiError> {
        let record = self.find_owned(id).await?;
        Ok(self.transformer().render_one(record).await?)
    }

    pub async fn create(&self, input: Record) -> Result<Value, ApiError> {
        let mut ctx = self.context(Operation::Create, input, None);
        self.pipeline.execute(&mut ctx).await?;

        let created = self
            .repository()
            .create(ctx.input)
            .await
            .map_err(|e| self.unique_violation(e))?;

        info!("Created {} id={:?}", self.descriptor.name(), created.get("id"));
        Ok(self.transformer().render_one(created).await?)
    }

    /// Partial update; `PUT` and `PATCH` share it
    pub async fn update(&self, id: &str, input: Record) -> Result<Value, ApiError> {
        let existing = self.find_owned(id).await?;
        let record_id = existing_id(&existing)?;

        let mut ctx = self.context(Operation::Update, input, Some(existing));
        self.pipeline.execute(&mut ctx).await?;

        let updated = self
            .repository()
            .update(record_id, ctx.input)
            .await
            .map_err(|e| self.unique_violation(e))?
            .ok_or_else(not_found)?;

        info!("Updated {} id={}", self.descriptor.name(), record_id);
        Ok(self.transformer().render_one(updated).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let existing = self.find_owned(id).await?;
        let record_id = existing_id(&existing)?;

        let mut ctx = self.context(Operation::Delete, Record::new(), Some(existing));
        self.pipeline.execute(&mut ctx).await?;

        if !self.repository().delete(record_id).await? {
            return Err(not_found());
        }
        info!("Deleted {} id={}", self.descriptor.name(), record_id);
        Ok(())
    }

    /// Runs a declared nested action and returns its message
    pub async fn action(&self, id: &str, name: &str) -> Result<String, ApiError> {
        let action = self.descriptor.action_named(name).cloned().ok_or_else(not_found)?;
        let existing = self.find_owned(id).await?;
        let record_id = existing_id(&existing)?;

        let mut changes = Record::new();
        match &action.effect {
            ActionEffect::Increment(field) => {
                let current = existing.get(field).and_then(Value::as_i64).unwrap_or(0);
                changes.insert(field.clone(), Value::from(current + 1));
            }
            ActionEffect::Touch(field) => {
                changes.insert(field.clone(), Value::String(types::timestamp(Utc::now())));
            }
            ActionEffect::Acknowledge => {
                info!("{} {} on {} id={}", self.descriptor.name(), name, self.caller, record_id);
                return Ok(action.message);
            }
        }

        let mut ctx = self.context(Operation::Action, changes, Some(existing));
        self.pipeline.execute(&mut ctx).await?;
        self.repository()
            .update(record_id, ctx.input)
            .await?
            .ok_or_else(not_found)?;

        info!("Ran {} {} on id={}", self.descriptor.name(), name, record_id);
        Ok(action.message)
    }

    /// The record with this id visible to the caller, else 404
    async fn find_owned(&self, id: &str) -> Result<Record, ApiError> {
        let id: i64 = id.trim().parse().map_err(|_| not_found())?;

        let mut predicates = vec![Predicate::eq("id", id)];
        if let Some(owner) = self.descriptor.filter_spec().owner_predicate(self.caller) {
            predicates.push(owner);
        }

        self.repository().select_one(predicates).await?.ok_or_else(not_found)
    }

    fn context(&self, operation: Operation, input: Record, existing: Option<Record>) -> ObserverContext {
        ObserverContext::new(
            operation,
            self.descriptor.clone(),
            self.store.clone(),
            self.caller,
            input,
            existing,
        )
    }

    /// A unique violation the pre-flight check missed becomes a 422 on the
    /// constrained field (matched by constraint name, else the first unique field).
    fn unique_violation(&self, err: DatabaseError) -> ApiError {
        let DatabaseError::UniqueViolation(constraint) = &err else {
            return err.into();
        };

        let uniques = self.descriptor.unique_constraints();
        let field = constraint
            .as_deref()
            .and_then(|name| uniques.iter().find(|(field, _)| name.contains(field)))
            .or_else(|| uniques.first())
            .map(|(field, _)| *field);

        match field {
            Some(field) => {
                tracing::warn!("Unique violation on {}.{} ({:?})", self.descriptor.name(), field, constraint);
                ApiError::validation_failed(ValidationErrors::single(
                    field,
                    format!("The {} has already been taken.", display_name(field)),
                ))
            }
            None => err.into(),
        }
    }
}

fn not_found() -> ApiError {
    ApiError::not_found("Record not found")
}

fn existing_id(record: &Record) -> Result<i64, ApiError> {
    crate::database::record::record_id(record).ok_or_else(|| {
        tracing::error!("Stored record without an integer id");
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}
