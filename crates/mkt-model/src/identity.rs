use std::fmt;

use crate::resource::ResourceName;

/// The unique part of an identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityValue {
    Id(String),
    Username(String),
}

/// Composite identity of a record within one document.
///
/// Child resources carry their ancestors' IDs in `scope`, outermost first, so
/// two buyers can each own a user group called `managers`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub resource: ResourceName,
    pub scope: Vec<String>,
    pub value: IdentityValue,
}

impl IdentityKey {
    pub fn id(resource: ResourceName, scope: Vec<String>, id: impl Into<String>) -> Self {
        Self {
            resource,
            scope,
            value: IdentityValue::Id(id.into()),
        }
    }

    /// Usernames are unique per resource type regardless of parent.
    pub fn username(resource: ResourceName, username: impl Into<String>) -> Self {
        Self {
            resource,
            scope: Vec::new(),
            value: IdentityValue::Username(username.into()),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for part in &self.scope {
            write!(f, "/{part}")?;
        }
        match &self.value {
            IdentityValue::Id(id) => write!(f, "#{id}"),
            IdentityValue::Username(username) => write!(f, "@{username}"),
        }
    }
}
