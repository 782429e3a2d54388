//! Field kinds, field metadata and declarative validation rules.
//!
//! This module defines the declarative pieces of the form system:
//! - `FieldKind`: Enumeration of supported input kinds (wire names are lowercase)
//! - `ValidationRule`: Rules attached to a field, checked in declaration order
//! - `FieldDefinition`: Metadata + rules for a single field
//!
//! Everything here is data only; checking lives in `validate.rs`.
//!
//! Usage:
//! ```ignore
//! use forms::{FieldDefinition, FieldKind, ValidationRule};
//!
//! let field = FieldDefinition::new("roll_no", "Roll number", FieldKind::Text)
//!     .required()
//!     .rule(ValidationRule::MinLength { value: 5, message: None })
//!     .help("As printed on your ID card");
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A single field kind supported by the form system.
///
/// Notes:
/// - Text / Textarea / Email / Url / Date render as single- or multi-line editors
/// - Number is range-checked against `min` / `max`
/// - Select / Radio pick one entry of `options`
/// - Checkbox holds a list of picked `options` (empty list counts as no answer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Url,
    Number,
    Select,
    Radio,
    Checkbox,
    Date,
    File,
}

/// Declarative validation rule.
///
/// Rules only run when the field has a value; emptiness is governed by
/// `FieldDefinition::required`. `message` overrides the default text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationRule {
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Url {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MinLength {
        value: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        value: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Named predicate registered on the `Validator` at runtime.
    Custom {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    /// Configured message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationRule::Email { message }
            | ValidationRule::Url { message }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::MaxLength { message, .. }
            | ValidationRule::Pattern { message, .. }
            | ValidationRule::Custom { message, .. } => message.as_deref(),
        }
    }

    /// Message used when the rule does not configure one.
    pub fn default_message(&self) -> String {
        match self {
            ValidationRule::Email { .. } => "Please enter a valid email address".into(),
            ValidationRule::Url { .. } => "Please enter a valid URL".into(),
            ValidationRule::MinLength { value, .. } => format!("Must be at least {value} characters"),
            ValidationRule::MaxLength { value, .. } => format!("Must be at most {value} characters"),
            ValidationRule::Pattern { .. } => "Invalid format".into(),
            ValidationRule::Custom { .. } => "Invalid value".into(),
        }
    }
}

/// Declarative description of a form field.
///
/// `id` keys the answer and error maps and must be unique across the whole
/// form, not just within its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FieldDefinition {
    /// Create a new optional field without rules.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            required: false,
            validation: Vec::new(),
            min: None,
            max: None,
            options: Vec::new(),
            placeholder: None,
            help: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Numeric bounds, inclusive. Only used by `FieldKind::Number`.
    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FieldKind::Number)
    }

    /// Return true if this field collects several values.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox)
    }

    /// Return true if the value must be one of `options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Select | FieldKind::Radio | FieldKind::Checkbox
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_field() {
        let raw = json!({
            "id": "email",
            "label": "College email",
            "type": "email",
            "required": true,
            "validation": [
                { "type": "email", "message": "Use your college address" },
                { "type": "minLength", "value": 6 }
            ]
        });
        let field: FieldDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(field.kind, FieldKind::Email);
        assert!(field.required);
        assert_eq!(field.validation.len(), 2);
        assert_eq!(field.validation[0].message(), Some("Use your college address"));
        assert_eq!(
            field.validation[1],
            ValidationRule::MinLength {
                value: 6,
                message: None
            }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = json!({ "id": "x", "type": "hologram" });
        assert!(serde_json::from_value::<FieldDefinition>(raw).is_err());
    }

    #[test]
    fn default_messages_use_bounds() {
        let rule = ValidationRule::MaxLength {
            value: 40,
            message: None,
        };
        assert_eq!(rule.default_message(), "Must be at most 40 characters");
    }

    #[test]
    fn kind_display_matches_wire_name() {
        assert_eq!(FieldKind::Textarea.to_string(), "textarea");
        assert_eq!("checkbox".parse::<FieldKind>().unwrap(), FieldKind::Checkbox);
    }
}
