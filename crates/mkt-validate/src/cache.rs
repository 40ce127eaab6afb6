//! Existence indexes built by the first validation pass.

use std::collections::{HashMap, HashSet};

use mkt_directory::Directory;
use mkt_model::{IdentityKey, Record, RecordExt, ResourceName};

/// Result of adding a record to a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    Added,
    /// The key was already present; the cache keeps the first record.
    Duplicate(IdentityKey),
    /// The record carries no usable identity value.
    Skipped,
}

/// IDs of every ID-bearing record, keyed under their ancestors' IDs.
#[derive(Debug, Clone)]
pub struct IdCache {
    keys: HashSet<IdentityKey>,
    route_fields: HashMap<ResourceName, Vec<&'static str>>,
}

impl IdCache {
    pub fn new(directory: &Directory) -> Self {
        let route_fields = directory
            .iter()
            .filter(|entry| entry.has_id_field)
            .map(|entry| (entry.name, directory.route_params(entry.name)))
            .collect();
        Self {
            keys: HashSet::new(),
            route_fields,
        }
    }

    /// Identity key of a record, with its route fields as the scope.
    pub fn key_for(&self, resource: ResourceName, record: &Record) -> Option<IdentityKey> {
        let fields = self.fields(resource);
        let id = record.scalar_field("ID")?;
        let scope = fields
            .iter()
            .map(|field| record.scalar_field(field).unwrap_or_default())
            .collect();
        Some(IdentityKey::id(resource, scope, id))
    }

    pub fn add(&mut self, resource: ResourceName, record: &Record) -> Insert {
        let Some(key) = self.key_for(resource, record) else {
            return Insert::Skipped;
        };
        if self.keys.contains(&key) {
            return Insert::Duplicate(key);
        }
        self.keys.insert(key);
        Insert::Added
    }

    /// Whether a record of `resource` with `id` exists under `scope`.
    ///
    /// # Panics
    ///
    /// Panics if `resource` has no ID field; that is a directory bug.
    pub fn has(&self, resource: ResourceName, scope: &[&str], id: &str) -> bool {
        assert!(
            self.route_fields.contains_key(&resource),
            "ID cache queried for {resource}, which has no ID field"
        );
        let key = IdentityKey::id(
            resource,
            scope.iter().map(|part| (*part).to_string()).collect(),
            id,
        );
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn fields(&self, resource: ResourceName) -> &[&'static str] {
        match self.route_fields.get(&resource) {
            Some(fields) => fields,
            None => panic!("ID cache queried for {resource}, which has no ID field"),
        }
    }
}

/// Usernames of every user type.
#[derive(Debug, Clone, Default)]
pub struct UsernameCache {
    keys: HashSet<IdentityKey>,
    all: HashSet<String>,
}

impl UsernameCache {
    pub fn add(&mut self, resource: ResourceName, record: &Record) -> Insert {
        let Some(username) = record.scalar_field("Username") else {
            return Insert::Skipped;
        };
        let key = IdentityKey::username(resource, username.clone());
        if self.keys.contains(&key) {
            return Insert::Duplicate(key);
        }
        self.keys.insert(key);
        self.all.insert(username);
        Insert::Added
    }

    /// Whether any user type has this username.
    pub fn contains(&self, username: &str) -> bool {
        self.all.contains(username)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
