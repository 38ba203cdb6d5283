pub mod descriptor;
pub mod registry;

pub use descriptor::{
    ActionEffect, ComputedField, DeleteGuard, NestedAction, Relation, ResourceDescriptor, StatusTimestamp,
};
pub use registry::ResourceRegistry;
