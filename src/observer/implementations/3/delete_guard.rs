// Ring 3: Business - refuse deletes that would orphan dependent rows
use async_trait::async_trait;

use crate::database::record::record_id;
use crate::filter::Predicate;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::resource::ResourceDescriptor;
use crate::types::Operation;

#[derive(Default)]
pub struct DeleteGuardObserver;

#[async_trait]
impl Observer for DeleteGuardObserver {
    fn name(&self) -> &'static str {
        "DeleteGuardObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Business
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        op == Operation::Delete
    }

    fn applies_to_resource(&self, descriptor: &ResourceDescriptor) -> bool {
        !descriptor.delete_guards().is_empty()
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(id) = ctx.existing.as_ref().and_then(record_id) else {
            return Ok(());
        };

        for guard in ctx.descriptor.delete_guards() {
            let dependents = ctx
                .repository(&guard.table)
                .exists(vec![Predicate::eq(guard.foreign_key.clone(), id)])
                .await?;
            if dependents {
                tracing::info!(
                    "Refusing delete of {} {}: rows in {} reference it",
                    ctx.resource_name(),
                    id,
                    guard.table
                );
                return Err(ObserverError::Precondition(guard.message.clone()));
            }
        }
        Ok(())
    }
}
