// Ring 2: Security - owner field is always the caller
use async_trait::async_trait;
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::resource::ResourceDescriptor;
use crate::types::Operation;

/// Sets the owner field to the caller on create and pins it on update,
/// whatever the client sent.
#[derive(Default)]
pub struct OwnerScopeObserver;

#[async_trait]
impl Observer for OwnerScopeObserver {
    fn name(&self) -> &'static str {
        "OwnerScopeObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Security
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update | Operation::Action)
    }

    fn applies_to_resource(&self, descriptor: &ResourceDescriptor) -> bool {
        descriptor.owner_field().is_some()
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(owner) = ctx.descriptor.owner_field().map(str::to_string) else {
            return Ok(());
        };

        match ctx.operation {
            Operation::Create => {
                if ctx.input.insert(owner.clone(), Value::from(ctx.caller)).is_some() {
                    tracing::debug!("Replaced client-supplied {} on {}", owner, ctx.resource_name());
                }
            }
            _ => {
                ctx.input.remove(&owner);
            }
        }
        Ok(())
    }
}
