/// Shared types used across the codebase

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Operations a resource request performs
/// Used by both the observer pipeline and the resource service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Action, // Nested `POST /{id}/{action}` effect
}

/// Wire format for stored timestamps: RFC 3339, microseconds, `Z`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
