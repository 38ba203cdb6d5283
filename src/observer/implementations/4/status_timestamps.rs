// Ring 4: Enrichment - status transitions stamp their timestamp field
use async_trait::async_trait;
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::resource::ResourceDescriptor;
use crate::types::Operation;

/// For each (status field, value, timestamp field) row of the resource:
/// creating with the value, or updating into it from another value, sets the
/// timestamp to now unless the client supplied one.
#[derive(Default)]
pub struct StatusTimestampsObserver;

#[async_trait]
impl Observer for StatusTimestampsObserver {
    fn name(&self) -> &'static str {
        "StatusTimestampsObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    fn applies_to_resource(&self, descriptor: &ResourceDescriptor) -> bool {
        !descriptor.status_timestamps().is_empty()
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let now = ctx.now_string();
        let descriptor = ctx.descriptor.clone();

        for rule in descriptor.status_timestamps() {
            let incoming = ctx.input.get(&rule.status_field).and_then(Value::as_str);
            if incoming != Some(rule.value.as_str()) {
                continue;
            }

            let previous = ctx
                .existing
                .as_ref()
                .and_then(|r| r.get(&rule.status_field))
                .and_then(Value::as_str);
            if ctx.operation == Operation::Update && previous == Some(rule.value.as_str()) {
                continue;
            }

            let supplied = ctx.input.get(&rule.timestamp_field).map_or(false, |v| !v.is_null());
            if !supplied {
                tracing::debug!(
                    "{}: {}={} sets {}",
                    ctx.resource_name(),
                    rule.status_field,
                    rule.value,
                    rule.timestamp_field
                );
                ctx.input.insert(rule.timestamp_field.clone(), Value::String(now.clone()));
            }
        }
        Ok(())
    }
}
