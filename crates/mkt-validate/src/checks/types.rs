//! Value checks against a field schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mkt_directory::{FieldSchema, FieldType};
use serde_json::Value;

/// Outcome of checking one value. Never panics for any input.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeCheck {
    Valid,
    /// Wrong JSON type; reference and charset checks are skipped.
    Mismatch {
        actual: &'static str,
        expected: FieldType,
    },
    /// Right type, but the value breaks a range, length, or format rule.
    Invalid(String),
}

impl TypeCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The issue message, or `None` when valid.
    pub fn message(&self, resource: &str, field: &str, value: &Value) -> Option<String> {
        let json = render(value);
        match self {
            Self::Valid => None,
            Self::Mismatch { actual, expected } => Some(format!(
                "Incorrect type {resource}.{field}: {json} is {actual}. Should be {}.",
                expected.as_str()
            )),
            Self::Invalid(reason) => Some(format!(
                "Invalid value {resource}.{field}: {json} {reason}."
            )),
        }
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn check_value(value: &Value, field: &FieldSchema) -> TypeCheck {
    let Some(expected) = field.field_type else {
        return TypeCheck::Valid;
    };
    let actual = json_type_name(value);
    let matches = match expected {
        FieldType::Object => value.is_object(),
        FieldType::Array => value.is_array(),
        // YAML writes `5.0` as a float; a whole value still counts.
        FieldType::Integer => {
            actual == "integer" || value.as_f64().is_some_and(|number| number.fract() == 0.0)
        }
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::String => value.is_string(),
    };
    if !matches {
        return TypeCheck::Mismatch { actual, expected };
    }

    if let Some(number) = value.as_f64() {
        if let Some(minimum) = field.minimum
            && number < minimum
        {
            return TypeCheck::Invalid(format!("is less than minimum {minimum}"));
        }
        if let Some(maximum) = field.maximum
            && number > maximum
        {
            return TypeCheck::Invalid(format!("is greater than maximum {maximum}"));
        }
    }

    if let Some(text) = value.as_str() {
        if let Some(max_length) = field.max_length
            && text.chars().count() > max_length
        {
            return TypeCheck::Invalid(format!("exceeds max length {max_length}"));
        }
        if field.format.as_deref() == Some("date-time") && !is_date_time(text) {
            return TypeCheck::Invalid("is not a valid date-time".to_string());
        }
    }

    TypeCheck::Valid
}

/// RFC 3339, or a date/date-time without an offset.
fn is_date_time(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// `ID` values may only use letters, digits, `_` and `-`.
pub fn is_valid_id(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Compact JSON text of a value, as shown in messages.
pub fn render(value: &Value) -> String {
    value.to_string()
}
