//! The company-contact extraction schema.
//!
//! Model output arrives as untyped JSON. [`CompanyInfo::from_value`] is the
//! single place where that JSON is checked against the schema: every field is
//! optional, an absent key means `null`, unknown keys are ignored, and only
//! structurally wrong data (a non-object container or a non-string field) is
//! rejected.

use crate::errors::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An extracted record as stored in the pipeline state.
pub type ExtractedRecord = serde_json::Map<String, Value>;

/// Company contact information extracted from a website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// The name of the company.
    pub company_name: Option<String>,
    /// Contact email address.
    pub contact_email: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Physical address.
    pub address: Option<String>,
    /// About us or company description text.
    pub about_us_text: Option<String>,
}

impl CompanyInfo {
    /// The schema field names, in display order.
    pub const FIELDS: [&'static str; 5] = [
        "company_name",
        "contact_email",
        "phone_number",
        "address",
        "about_us_text",
    ];

    /// Validates an untyped JSON value against the schema.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(record) => Self::from_record(record),
            other => Err(SchemaError::NotAnObject {
                found: json_type_name(other),
            }),
        }
    }

    /// Validates a JSON object against the schema.
    pub fn from_record(record: &ExtractedRecord) -> Result<Self, SchemaError> {
        let field = |name: &'static str| -> Result<Option<String>, SchemaError> {
            match record.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(SchemaError::InvalidField {
                    field: name,
                    found: json_type_name(other),
                }),
            }
        };

        Ok(Self {
            company_name: field("company_name")?,
            contact_email: field("contact_email")?,
            phone_number: field("phone_number")?,
            address: field("address")?,
            about_us_text: field("about_us_text")?,
        })
    }

    /// Converts to a record with all five keys present.
    #[must_use]
    pub fn to_record(&self) -> ExtractedRecord {
        self.fields()
            .into_iter()
            .map(|(name, value)| {
                let value = value.map_or(Value::Null, |s| Value::String(s.to_string()));
                (name.to_string(), value)
            })
            .collect()
    }

    /// Returns `(field, value)` pairs in display order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("company_name", self.company_name.as_deref()),
            ("contact_email", self.contact_email.as_deref()),
            ("phone_number", self.phone_number.as_deref()),
            ("address", self.address.as_deref()),
            ("about_us_text", self.about_us_text.as_deref()),
        ]
    }

    /// Number of fields holding a non-empty value.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.fields()
            .iter()
            .filter(|(_, v)| v.is_some_and(|s| !s.is_empty()))
            .count()
    }
}

/// Counts non-empty string values in a record.
#[must_use]
pub fn populated_fields(record: &ExtractedRecord) -> usize {
    record
        .values()
        .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
        .count()
}

/// Returns a short JSON type name for diagnostics.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_full_record_validates() {
        let value = json!({
            "company_name": "Acme GmbH",
            "contact_email": "info@acme.de",
            "phone_number": "+49 30 1234567",
            "address": "Hauptstr. 1, Berlin",
            "about_us_text": "Wir bauen Raketen."
        });

        let info = CompanyInfo::from_value(&value).unwrap();
        assert_eq!(info.company_name.as_deref(), Some("Acme GmbH"));
        assert_eq!(info.populated_count(), 5);
    }

    #[test]
    fn test_missing_keys_become_explicit_nulls() {
        let info = CompanyInfo::from_value(&json!({"company_name": "Acme"})).unwrap();
        let record = info.to_record();

        assert_eq!(record.len(), 5);
        assert_eq!(record.get("contact_email"), Some(&Value::Null));
        assert_eq!(record.get("company_name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let info = CompanyInfo::from_value(&json!({"company_name": "Acme", "ceo": "Wile E."})).unwrap();
        assert!(!info.to_record().contains_key("ceo"));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let err = CompanyInfo::from_value(&json!({"phone_number": ["+1 555", "+1 556"]})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidField {
                field: "phone_number",
                found: "array"
            }
        );

        let err = CompanyInfo::from_value(&json!({"company_name": 42})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { found: "number", .. }));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = CompanyInfo::from_value(&json!(["Acme"])).unwrap_err();
        assert_eq!(err, SchemaError::NotAnObject { found: "array" });
    }

    #[test]
    fn test_populated_counts_ignore_empty_strings() {
        let info = CompanyInfo {
            company_name: Some("Acme".to_string()),
            contact_email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(info.populated_count(), 1);
        assert_eq!(populated_fields(&info.to_record()), 1);
    }
}
