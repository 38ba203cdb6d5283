// Ring 4: Enrichment - created_at / updated_at
use async_trait::async_trait;
use serde_json::Value;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;

#[derive(Default)]
pub struct RecordTimestampsObserver;

#[async_trait]
impl Observer for RecordTimestampsObserver {
    fn name(&self) -> &'static str {
        "RecordTimestampsObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Enrichment
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update | Operation::Action)
    }

    fn priority(&self) -> u8 {
        90
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let now = Value::String(ctx.now_string());
        if ctx.operation == Operation::Create {
            ctx.input.insert("created_at".to_string(), now.clone());
        }
        ctx.input.insert("updated_at".to_string(), now);
        Ok(())
    }
}
