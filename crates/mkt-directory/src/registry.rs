use mkt_model::ResourceName;
use tracing::debug;

use crate::error::DirectoryError;
use crate::metadata::ResourceMetadata;
use crate::schema::{ApiDescription, inject_route_fields};
use crate::table::builtin_entries;

/// The resolved metadata for every resource type.
///
/// Entries are stored in `ResourceName` declaration order, so a name's
/// discriminant is its index.
#[derive(Debug, Clone)]
pub struct Directory {
    entries: Vec<ResourceMetadata>,
    has_schema: bool,
}

impl Directory {
    /// The static table with children derived from each entry's parent.
    pub fn builtin() -> Self {
        let mut entries = builtin_entries();
        entries.sort_by_key(|entry| entry.name);
        debug_assert_eq!(entries.len(), ResourceName::ALL.len());

        let links: Vec<(ResourceName, ResourceName)> = entries
            .iter()
            .filter_map(|entry| entry.parent.map(|parent| (parent, entry.name)))
            .collect();
        for (parent, child) in links {
            entries[parent as usize].children.push(child);
        }

        Self {
            entries,
            has_schema: false,
        }
    }

    /// Resolves every resource's create model from the API description.
    pub fn with_schema(mut self, description: &ApiDescription) -> Result<Self, DirectoryError> {
        let route_fields: Vec<Vec<&'static str>> = ResourceName::ALL
            .iter()
            .map(|name| self.route_params(*name))
            .collect();
        for (entry, fields) in self.entries.iter_mut().zip(route_fields) {
            let mut schema = description.resource_schema(entry)?;
            inject_route_fields(&mut schema, &fields);
            debug!(
                resource = %entry.name,
                fields = schema.fields.len(),
                required = schema.required.len(),
                "resolved resource schema"
            );
            entry.schema = Some(schema);
        }
        self.has_schema = true;
        Ok(self)
    }

    pub fn has_schema(&self) -> bool {
        self.has_schema
    }

    pub fn get(&self, name: ResourceName) -> &ResourceMetadata {
        &self.entries[name as usize]
    }

    /// All entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceMetadata> {
        self.entries.iter()
    }

    /// Entries without a parent, in declaration order.
    pub fn top_level(&self) -> impl Iterator<Item = &ResourceMetadata> {
        self.entries.iter().filter(|entry| entry.parent.is_none())
    }

    /// Entries sorted by creation priority; ties keep declaration order.
    pub fn creation_order(&self) -> Vec<&ResourceMetadata> {
        let mut ordered: Vec<&ResourceMetadata> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| entry.create_priority);
        ordered
    }

    pub fn children_of(&self, name: ResourceName) -> &[ResourceName] {
        &self.get(name).children
    }

    /// Ancestors of a resource, outermost first.
    pub fn ancestors_of(&self, name: ResourceName) -> Vec<ResourceName> {
        let mut ancestors = Vec::new();
        let mut current = self.get(name).parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.get(parent).parent;
        }
        ancestors.reverse();
        ancestors
    }

    /// Record fields that fill the route's placeholders, outermost first.
    ///
    /// `VariantInventoryRecords` yields `["ProductID", "VariantID"]`.
    pub fn route_params(&self, name: ResourceName) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut current = Some(self.get(name));
        while let Some(entry) = current {
            let Some(field) = entry.parent_ref_field else {
                break;
            };
            fields.push(field);
            current = entry.parent.map(|parent| self.get(parent));
        }
        fields.reverse();
        fields
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}
