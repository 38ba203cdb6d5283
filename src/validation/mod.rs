pub mod errors;
pub mod formats;
pub mod rules;
pub mod validator;

pub use errors::ValidationErrors;
pub use rules::{FieldRules, Rule};
pub use validator::Validator;

use crate::database::Record;

/// Result of checking input against a rule set
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The permitted, normalized input
    Valid(Record),
    Invalid(ValidationErrors),
}
