//! Per-page lookup of side-loaded resources

use super::types::{Reference, Resource};
use std::collections::HashMap;
use tracing::debug;

/// Lookup of side-loaded resources by `(type, id)`, scoped to one page
///
/// Duplicate keys overwrite earlier entries. Duplicates within a page are
/// copies of the same shared resource, so the order does not matter.
#[derive(Debug, Clone, Default)]
pub struct IncludedIndex<'a> {
    by_type: HashMap<&'a str, HashMap<&'a str, &'a Resource>>,
    len: usize,
}

impl<'a> IncludedIndex<'a> {
    /// Build an index over the given resources
    pub fn build(resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        let mut by_type: HashMap<&'a str, HashMap<&'a str, &'a Resource>> = HashMap::new();
        for resource in resources {
            by_type
                .entry(resource.kind.as_str())
                .or_default()
                .insert(resource.id.as_str(), resource);
        }
        let len = by_type.values().map(HashMap::len).sum();
        Self { by_type, len }
    }

    /// Number of distinct `(type, id)` keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a resource by type and id
    pub fn get(&self, kind: &str, id: &str) -> Option<&'a Resource> {
        self.by_type.get(kind).and_then(|ids| ids.get(id)).copied()
    }

    /// Resolve a reference; a missing target is logged and yields `None`
    pub fn resolve(&self, reference: &Reference) -> Option<&'a Resource> {
        let found = self.get(&reference.kind, &reference.id);
        if found.is_none() {
            debug!(
                kind = %reference.kind,
                id = %reference.id,
                "Unresolved reference"
            );
        }
        found
    }

    /// Resolve many references, dropping misses and keeping input order
    pub fn resolve_many(&self, references: &[Reference]) -> Vec<&'a Resource> {
        references.iter().filter_map(|r| self.resolve(r)).collect()
    }

    /// Resolve the to-one relationship `name` of `resource`
    pub fn related(&self, resource: &Resource, name: &str) -> Option<&'a Resource> {
        resource
            .relationship(name)
            .as_one()
            .and_then(|r| self.resolve(r))
    }

    /// Resolve every reference of relationship `name` of `resource`
    pub fn related_many(&self, resource: &Resource, name: &str) -> Vec<&'a Resource> {
        self.resolve_many(resource.relationship(name).refs())
    }

    /// Attribute of a related resource as text, empty when anything is missing
    pub fn related_attr(&self, resource: &Resource, name: &str, attribute: &str) -> String {
        self.related(resource, name)
            .map(|r| r.attr_str(attribute))
            .unwrap_or_default()
    }
}
