use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::database::{Record, Repository, Store};
use crate::observer::traits::ObserverRing;
use crate::resource::ResourceDescriptor;
use crate::types::{self, Operation};

/// The data flowing through the observer pipeline for one write
pub struct ObserverContext {
    // Core request data
    pub operation: Operation,
    pub descriptor: Arc<ResourceDescriptor>,
    pub store: Arc<dyn Store>,
    pub caller: i64,

    /// Pending changes (full record on create, partial on update)
    pub input: Record,

    /// Stored row for update/delete/action
    pub existing: Option<Record>,

    /// Single clock reading shared by every observer
    pub now: DateTime<Utc>,

    // Performance tracking
    pub start_time: Instant,
    pub current_ring: Option<ObserverRing>,
}

impl ObserverContext {
    pub fn new(
        operation: Operation,
        descriptor: Arc<ResourceDescriptor>,
        store: Arc<dyn Store>,
        caller: i64,
        input: Record,
        existing: Option<Record>,
    ) -> Self {
        Self {
            operation,
            descriptor,
            store,
            caller,
            input,
            existing,
            now: Utc::now(),
            start_time: Instant::now(),
            current_ring: None,
        }
    }

    pub fn resource_name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn repository(&self, table: &str) -> Repository {
        Repository::new(table, self.store.clone())
    }

    pub fn now_string(&self) -> String {
        types::timestamp(self.now)
    }
}
