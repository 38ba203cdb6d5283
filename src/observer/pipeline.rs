use std::collections::BTreeMap;
use std::time::Instant;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::implementations::{
    DeleteGuardObserver, InputValidationObserver, OwnerScopeObserver, RecordTimestampsObserver,
    StatusTimestampsObserver,
};
use crate::observer::traits::{Observer, ObserverRing};

/// Runs registered observers ring by ring; the first failure stops the pipeline.
pub struct ObserverPipeline {
    // Observer registry by ring, each list sorted by priority
    observers: BTreeMap<ObserverRing, Vec<Box<dyn Observer>>>,
}

impl ObserverPipeline {
    /// Create new observer pipeline with empty observer registry
    pub fn new() -> Self {
        Self { observers: BTreeMap::new() }
    }

    /// Pipeline with the built-in observers every resource uses
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.register_observer(Box::new(InputValidationObserver));
        pipeline.register_observer(Box::new(OwnerScopeObserver));
        pipeline.register_observer(Box::new(DeleteGuardObserver));
        pipeline.register_observer(Box::new(StatusTimestampsObserver));
        pipeline.register_observer(Box::new(RecordTimestampsObserver));
        pipeline
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) {
        let ring = observer.ring();
        let name = observer.name();
        let list = self.observers.entry(ring).or_default();
        list.push(observer);
        list.sort_by_key(|o| o.priority());

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    pub fn observer_names(&self) -> Vec<&'static str> {
        self.observers.values().flatten().map(|o| o.name()).collect()
    }

    pub async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        tracing::info!(
            "Observer pipeline starting: operation={:?}, resource={}",
            ctx.operation,
            ctx.resource_name()
        );

        for ring in ObserverRing::ALL {
            ctx.current_ring = Some(ring);
            if let Err(error) = self.execute_ring(ring, ctx).await {
                tracing::warn!("Observer pipeline stopped at ring {:?}: {}", ring, error);
                return Err(error);
            }
        }

        tracing::debug!("Observer pipeline finished in {:?}", ctx.start_time.elapsed());
        Ok(())
    }

    async fn execute_ring(&self, ring: ObserverRing, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let observers = match self.observers.get(&ring) {
            Some(obs) => obs,
            None => {
                tracing::debug!("No observers registered for ring {:?}", ring);
                return Ok(());
            }
        };

        for observer in observers {
            if !observer.applies_to_operation(ctx.operation) {
                tracing::trace!("Observer {} skipped - doesn't apply to operation {:?}",
                              observer.name(), ctx.operation);
                continue;
            }

            if !observer.applies_to_resource(&ctx.descriptor) {
                tracing::trace!("Observer {} skipped - doesn't apply to resource {}",
                              observer.name(), ctx.resource_name());
                continue;
            }

            let observer_start = Instant::now();

            observer.execute(ctx).await?;
            tracing::debug!(
                "Observer: {} completed successfully in {:?}",
                observer.name(), observer_start.elapsed()
            );
        }

        Ok(())
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
