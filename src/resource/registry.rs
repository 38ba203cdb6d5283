use std::collections::BTreeMap;
use std::sync::Arc;

use super::descriptor::ResourceDescriptor;

/// Name → descriptor lookup shared by every request
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<ResourceDescriptor>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, descriptor: ResourceDescriptor) -> Self {
        if self.resources.contains_key(descriptor.name()) {
            tracing::warn!("Resource '{}' registered twice; keeping the latest", descriptor.name());
        }
        self.resources.insert(descriptor.name().to_string(), Arc::new(descriptor));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<ResourceDescriptor>> {
        self.resources.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceDescriptor>> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
