use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::resource::ResourceDescriptor;
use crate::types::Operation;

/// Observer rings with semantic meaning, executed in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    InputValidation = 1,    // Rule set checks, mass-assignment filtering
    Security = 2,           // Owner scoping
    Business = 3,           // Delete guards
    Enrichment = 4,         // Status and record timestamps
}

impl ObserverRing {
    pub const ALL: [ObserverRing; 4] = [
        ObserverRing::InputValidation,
        ObserverRing::Security,
        ObserverRing::Business,
        ObserverRing::Enrichment,
    ];
}

/// A hook run before a write reaches the store
#[async_trait]
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &'static str;

    /// Which ring this observer belongs to
    fn ring(&self) -> ObserverRing;

    /// Check if observer applies to this operation
    fn applies_to_operation(&self, op: Operation) -> bool;

    /// Check if observer applies to this resource
    fn applies_to_resource(&self, _descriptor: &ResourceDescriptor) -> bool {
        true
    }

    /// Priority within ring (lower numbers execute first)
    fn priority(&self) -> u8 {
        50
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError>;
}
