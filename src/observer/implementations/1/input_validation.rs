// Ring 1: Input Validation - rule set checks and mass-assignment filtering
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::types::Operation;
use crate::validation::{ValidationOutcome, Validator};

/// Replaces the pending input with its validated, normalized form.
#[derive(Default)]
pub struct InputValidationObserver;

#[async_trait]
impl Observer for InputValidationObserver {
    fn name(&self) -> &'static str {
        "InputValidationObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let descriptor = ctx.descriptor.clone();
        let mut validator = Validator::new(descriptor.rules(), ctx.store.clone());
        if let Some(owner) = descriptor.owner_field() {
            validator = validator.owned_by(owner, ctx.caller);
        }

        let input = std::mem::take(&mut ctx.input);
        match validator.validate(input, ctx.existing.as_ref()).await? {
            ValidationOutcome::Valid(data) => {
                ctx.input = data;
                Ok(())
            }
            ValidationOutcome::Invalid(errors) => {
                tracing::warn!(
                    "Validation failed for {} ({} errors on fields: {})",
                    ctx.resource_name(),
                    errors.count(),
                    errors.fields().collect::<Vec<_>>().join(", ")
                );
                Err(ObserverError::Validation(errors))
            }
        }
    }
}
