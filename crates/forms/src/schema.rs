//! Form schema definition.
//!
//! `FormDefinition` groups ordered `SectionDefinition`s, each holding the
//! `FieldDefinition`s rendered and validated together as one step. The
//! document is fetched from (and saved to) the backend as JSON, so every type
//! here round-trips through serde unchanged.
//!
//! Definitions are read-only once a `FormController` owns them; `check()` is
//! run at that point so that the id invariant holds for the whole session.
//!
//! Typical usage:
//! ```ignore
//! use forms::{FieldDefinition, FieldKind, FormDefinition, SectionDefinition};
//!
//! let form = FormDefinition::new("Student profile", vec![
//!     SectionDefinition::new("Personal", vec![
//!         FieldDefinition::new("full_name", "Full name", FieldKind::Text).required(),
//!     ]),
//!     SectionDefinition::new("Academics", vec![
//!         FieldDefinition::new("cgpa", "CGPA", FieldKind::Number).range(Some(0.0), Some(10.0)),
//!     ]),
//! ]);
//! form.check()?;
//! ```

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::field::{FieldDefinition, ValidationRule};

const DEFAULT_CONFIRMATION: &str = "Your response has been recorded.";

/// Behaviour around submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_message: Option<String>,
    /// Whether "submit another response" is offered after submitting.
    #[serde(default = "default_true")]
    pub allow_another_response: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            submit_label: None,
            confirmation_message: None,
            allow_another_response: true,
        }
    }
}

impl FormSettings {
    pub fn confirmation(&self) -> &str {
        self.confirmation_message
            .as_deref()
            .unwrap_or(DEFAULT_CONFIRMATION)
    }
}

/// A named, ordered group of fields validated and navigated as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl SectionDefinition {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.id.as_str())
    }
}

/// Declarative schema for a multi-section form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<SectionDefinition>,
    #[serde(default)]
    pub settings: FormSettings,
}

impl FormDefinition {
    pub fn new(title: impl Into<String>, sections: Vec<SectionDefinition>) -> Self {
        Self {
            title: title.into(),
            description: None,
            sections,
            settings: FormSettings::default(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn settings(mut self, settings: FormSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Index of the final section. Zero for an empty form; `check()` rejects those.
    pub fn last_section_index(&self) -> usize {
        self.sections.len().saturating_sub(1)
    }

    pub fn section(&self, index: usize) -> Result<&SectionDefinition, FormError> {
        self.sections.get(index).ok_or(FormError::SectionOutOfRange {
            index,
            count: self.sections.len(),
        })
    }

    /// All fields across all sections, in display order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field_by_id(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.id == id)
    }

    /// Index of the section holding `field_id`.
    pub fn section_of(&self, field_id: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.fields.iter().any(|f| f.id == field_id))
    }

    /// Verify the structural invariants: at least one section, field ids
    /// unique across the form, and every `pattern` rule compiles.
    pub fn check(&self) -> Result<(), FormError> {
        if self.sections.is_empty() {
            return Err(FormError::NoSections);
        }
        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.id.as_str()) {
                return Err(FormError::DuplicateFieldId(field.id.clone()));
            }
            for rule in &field.validation {
                if let ValidationRule::Pattern { value, .. } = rule {
                    Regex::new(value).map_err(|e| FormError::InvalidPattern {
                        field: field.id.clone(),
                        message: e.to_string(),
                    })?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use serde_json::json;

    fn two_sections() -> FormDefinition {
        FormDefinition::new(
            "Profile",
            vec![
                SectionDefinition::new(
                    "Personal",
                    vec![FieldDefinition::new("name", "Name", FieldKind::Text)],
                ),
                SectionDefinition::new(
                    "Contact",
                    vec![FieldDefinition::new("mail", "Mail", FieldKind::Email)],
                ),
            ],
        )
    }

    #[test]
    fn check_accepts_unique_ids() {
        assert_eq!(two_sections().check(), Ok(()));
    }

    #[test]
    fn check_rejects_ids_repeated_across_sections() {
        let mut form = two_sections();
        form.sections[1].fields[0].id = "name".into();
        assert_eq!(
            form.check(),
            Err(FormError::DuplicateFieldId("name".into()))
        );
    }

    #[test]
    fn check_rejects_empty_form() {
        let form = FormDefinition::new("Empty", vec![]);
        assert_eq!(form.check(), Err(FormError::NoSections));
    }

    #[test]
    fn check_rejects_broken_pattern() {
        let mut form = two_sections();
        form.sections[0].fields[0]
            .validation
            .push(ValidationRule::Pattern {
                value: "([a-z".into(),
                message: None,
            });
        assert!(matches!(
            form.check(),
            Err(FormError::InvalidPattern { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn section_lookup() {
        let form = two_sections();
        assert_eq!(form.section_of("mail"), Some(1));
        assert_eq!(form.section_of("nope"), None);
        assert_eq!(form.last_section_index(), 1);
        assert_eq!(
            form.section(5),
            Err(FormError::SectionOutOfRange { index: 5, count: 2 })
        );
    }

    #[test]
    fn decodes_document_without_settings() {
        let raw = json!({
            "sections": [
                { "title": "Only", "fields": [ { "id": "a", "type": "text" } ] }
            ]
        });
        let form: FormDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(form.section_count(), 1);
        assert!(form.settings.allow_another_response);
        assert_eq!(form.settings.confirmation(), DEFAULT_CONFIRMATION);
    }
}
