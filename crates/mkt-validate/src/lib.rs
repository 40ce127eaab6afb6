//! Validation of marketplace documents before upload.
//!
//! [`validate`] runs both passes over a document with the default resource
//! rules and returns every issue found together with the identity indexes.

pub mod cache;
pub mod checks;
pub mod context;
pub mod report;
pub mod rules;
pub mod validator;

pub use cache::{IdCache, Insert, UsernameCache};
pub use context::ValidationContext;
pub use report::{
    REPORT_SCHEMA, REPORT_SCHEMA_VERSION, ValidationReportPayload, write_validation_report_json,
};
pub use rules::{RuleRegistry, ValidationRule, default_rules};
pub use validator::{ValidationOutcome, Validator, validate};
