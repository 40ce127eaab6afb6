pub mod document;
pub mod error;
pub mod identity;
pub mod issue;
pub mod resource;

pub use document::{
    DocumentMeta, MARKETPLACE_ID_PLACEHOLDER, REDACTED_MESSAGE, Record, RecordExt,
    SerializedMarketplace, scalar_text,
};
pub use error::InputError;
pub use identity::{IdentityKey, IdentityValue};
pub use issue::{IssueKind, ValidationIssue, ValidationReport};
pub use resource::{ResourceName, UnknownResource};

/// Version stamped into downloaded documents.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
