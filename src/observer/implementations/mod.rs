// Observer implementations organized by rings

// Ring 1: Input Validation
#[path = "1/input_validation.rs"]
pub mod input_validation;

// Ring 2: Security
#[path = "2/owner_scope.rs"]
pub mod owner_scope;

// Ring 3: Business
#[path = "3/delete_guard.rs"]
pub mod delete_guard;

// Ring 4: Enrichment
#[path = "4/status_timestamps.rs"]
pub mod status_timestamps;
#[path = "4/record_timestamps.rs"]
pub mod record_timestamps;

pub use input_validation::*;
pub use owner_scope::*;
pub use delete_guard::*;
pub use status_timestamps::*;
pub use record_timestamps::*;
