// Response rendering for resources
pub mod format;

pub use format::ResourceTransformer;
