//! Section-by-section form progression.
//!
//! `FormController` owns the definition, the `FormState` and the current
//! `FormPhase`. Every user action arrives as an `Intent`; `reduce` applies it
//! and returns the side effects the caller has to carry out (today only the
//! hand-off of a complete answer map to whatever submits it).
//!
//! Transitions:
//!   * `Change`          (Filling)        store value, drop that field's error
//!   * `Next`            (Filling(i<last)) validate section i, advance only if valid
//!   * `Previous`        (Filling(i))     go to i-1 (saturating), no validation
//!   * `Submit`          (Filling(last))  validate every section; all valid ->
//!                                        `Effect::Submit` + `Submitted`, otherwise
//!                                        back to `Filling(0)` with all errors
//!   * `SubmissionFailed`(Submitted)      back to `Filling(last)`, answers kept
//!   * `Reset`           (Submitted)      clear everything, `Filling(0)`
//!
//! Intents that do not apply to the current phase are ignored and reported as
//! `Effect::Ignored`, never as errors.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::FormError;
use crate::schema::{FormDefinition, SectionDefinition};
use crate::state::{AnswerMap, ErrorMap, FormState};
use crate::validate::Validator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Filling(usize),
    Submitted { confirmation: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Change { field_id: String, value: Value },
    Next,
    Previous,
    Submit,
    /// The submission collaborator reported a failure for the last `Effect::Submit`.
    SubmissionFailed { message: String },
    Reset,
}

impl Intent {
    pub fn change(field_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Intent::Change {
            field_id: field_id.into(),
            value: value.into(),
        }
    }
}

/// Declarative instruction emitted by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the complete answer map to the submission collaborator.
    Submit(AnswerMap),
    /// The intent did not apply; nothing changed.
    Ignored(String),
}

impl Effect {
    fn ignored(reason: impl Into<String>) -> Vec<Effect> {
        vec![Effect::Ignored(reason.into())]
    }
}

#[derive(Debug)]
pub struct FormController {
    form: FormDefinition,
    validator: Validator,
    phase: FormPhase,
    state: FormState,
}

impl FormController {
    /// Take ownership of a checked form definition, starting at `Filling(0)`.
    pub fn new(form: FormDefinition) -> Result<Self, FormError> {
        form.check()?;
        Ok(Self {
            form,
            validator: Validator::new(),
            phase: FormPhase::Filling(0),
            state: FormState::default(),
        })
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.state.answers
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.state.errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.state.form_error.as_deref()
    }

    /// Section currently shown, `None` once submitted.
    pub fn section_index(&self) -> Option<usize> {
        match self.phase {
            FormPhase::Filling(i) => Some(i),
            FormPhase::Submitted { .. } => None,
        }
    }

    pub fn current_section(&self) -> Option<&SectionDefinition> {
        self.section_index().and_then(|i| self.form.sections.get(i))
    }

    pub fn is_last_section(&self) -> bool {
        self.section_index() == Some(self.form.last_section_index())
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, FormPhase::Submitted { .. })
    }

    /// 1-based position and section count, for "Step 2 of 3" style displays.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.form.section_count();
        match self.phase {
            FormPhase::Filling(i) => (i + 1, total),
            FormPhase::Submitted { .. } => (total, total),
        }
    }

    pub fn change(&mut self, field_id: impl Into<String>, value: impl Into<Value>) -> Vec<Effect> {
        self.reduce(Intent::change(field_id, value))
    }

    pub fn next(&mut self) -> Vec<Effect> {
        self.reduce(Intent::Next)
    }

    pub fn previous(&mut self) -> Vec<Effect> {
        self.reduce(Intent::Previous)
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        self.reduce(Intent::Submit)
    }

    pub fn submission_failed(&mut self, message: impl Into<String>) -> Vec<Effect> {
        self.reduce(Intent::SubmissionFailed {
            message: message.into(),
        })
    }

    pub fn reset(&mut self) -> Vec<Effect> {
        self.reduce(Intent::Reset)
    }

    /// Apply a single intent.
    ///
    /// Policy:
    ///   - Never panics; inapplicable intents yield `Effect::Ignored`.
    ///   - Validation failures stay in the error map, they are not `Err`s.
    pub fn reduce(&mut self, intent: Intent) -> Vec<Effect> {
        let last = self.form.last_section_index();
        match (intent, self.phase.clone()) {
            (Intent::Change { field_id, value }, FormPhase::Filling(_)) => {
                if self.form.field_by_id(&field_id).is_none() {
                    return Effect::ignored(format!("unknown field: {field_id}"));
                }
                self.state.set_answer(&field_id, value);
                Vec::new()
            }
            (Intent::Next, FormPhase::Filling(i)) if i < last => {
                let Ok(report) = self.validator.validate_section(&self.form, i, &self.state.answers)
                else {
                    return Effect::ignored(format!("section {i} out of range"));
                };
                self.state
                    .errors
                    .merge_section(self.form.sections[i].field_ids(), &report.errors);
                if report.valid {
                    debug!(from = i, to = i + 1, "form advanced");
                    self.phase = FormPhase::Filling(i + 1);
                } else {
                    debug!(section = i, errors = report.errors.len(), "form section invalid");
                }
                Vec::new()
            }
            (Intent::Previous, FormPhase::Filling(i)) => {
                self.phase = FormPhase::Filling(i.saturating_sub(1));
                Vec::new()
            }
            (Intent::Submit, FormPhase::Filling(i)) if i == last => {
                let report = self.validator.validate_all(&self.form, &self.state.answers);
                if report.is_valid() {
                    self.state.errors.clear();
                    self.state.form_error = None;
                    self.phase = FormPhase::Submitted {
                        confirmation: self.form.settings.confirmation().to_string(),
                    };
                    info!(answers = self.state.answers.len(), "form submitted");
                    vec![Effect::Submit(self.state.answers.clone())]
                } else {
                    // Always back to the first section, even when only a later one failed.
                    info!(invalid_sections = ?report.invalid_sections, "form submission blocked");
                    self.state.errors.replace_all(report.errors);
                    self.phase = FormPhase::Filling(0);
                    Vec::new()
                }
            }
            (Intent::SubmissionFailed { message }, FormPhase::Submitted { .. }) => {
                self.state.form_error = Some(message);
                self.phase = FormPhase::Filling(last);
                Vec::new()
            }
            (Intent::Reset, FormPhase::Submitted { .. }) => {
                if !self.form.settings.allow_another_response {
                    return Effect::ignored("form accepts a single response");
                }
                self.state.clear();
                self.phase = FormPhase::Filling(0);
                Vec::new()
            }
            (intent, phase) => {
                debug!(?intent, ?phase, "intent ignored");
                Effect::ignored(format!("{intent:?} does not apply in {phase:?}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, FieldKind};
    use crate::schema::{FormSettings, SectionDefinition};
    use serde_json::json;

    fn form() -> FormDefinition {
        FormDefinition::new(
            "Profile",
            vec![
                SectionDefinition::new(
                    "Personal",
                    vec![
                        FieldDefinition::new("name", "Name", FieldKind::Text).required(),
                        FieldDefinition::new("nick", "Nickname", FieldKind::Text),
                    ],
                ),
                SectionDefinition::new(
                    "Academics",
                    vec![FieldDefinition::new("cgpa", "CGPA", FieldKind::Number)
                        .required()
                        .range(Some(0.0), Some(10.0))],
                ),
            ],
        )
    }

    #[test]
    fn starts_filling_first_section() {
        let c = FormController::new(form()).unwrap();
        assert_eq!(c.phase(), &FormPhase::Filling(0));
        assert!(c.answers().is_empty());
        assert!(c.errors().is_empty());
        assert_eq!(c.progress(), (1, 2));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut f = form();
        f.sections[1].fields[0].id = "name".into();
        assert_eq!(
            FormController::new(f).unwrap_err(),
            FormError::DuplicateFieldId("name".into())
        );
    }

    #[test]
    fn next_blocked_by_invalid_section() {
        let mut c = FormController::new(form()).unwrap();
        let effects = c.next();
        assert!(effects.is_empty());
        assert_eq!(c.phase(), &FormPhase::Filling(0));
        assert_eq!(c.errors().len(), 1);
        assert!(c.errors().contains("name"));
    }

    #[test]
    fn change_clears_error_without_revalidating() {
        let mut c = FormController::new(form()).unwrap();
        c.next();
        c.change("name", "");
        assert!(!c.errors().contains("name"));
        assert_eq!(c.answers().get("name"), Some(&json!("")));
    }

    #[test]
    fn change_to_unknown_field_is_ignored() {
        let mut c = FormController::new(form()).unwrap();
        let effects = c.change("ghost", "boo");
        assert!(matches!(effects.as_slice(), [Effect::Ignored(_)]));
        assert!(c.answers().is_empty());
    }

    #[test]
    fn previous_saturates_and_keeps_errors() {
        let mut c = FormController::new(form()).unwrap();
        c.change("name", "Asha");
        c.next();
        c.submit();
        assert_eq!(c.phase(), &FormPhase::Filling(0));
        assert!(c.errors().contains("cgpa"));
        c.previous();
        assert_eq!(c.phase(), &FormPhase::Filling(0));
        assert!(c.errors().contains("cgpa"));
    }

    #[test]
    fn submit_only_applies_on_last_section() {
        let mut c = FormController::new(form()).unwrap();
        c.change("name", "Asha");
        c.change("cgpa", 8);
        let effects = c.submit();
        assert!(matches!(effects.as_slice(), [Effect::Ignored(_)]));
        assert_eq!(c.phase(), &FormPhase::Filling(0));
    }

    #[test]
    fn submit_then_reset() {
        let mut c = FormController::new(form()).unwrap();
        c.change("name", "Asha");
        c.next();
        c.change("cgpa", 8.2);
        let effects = c.submit();
        assert_eq!(effects.len(), 1);
        assert!(c.is_submitted());
        assert_eq!(
            c.phase(),
            &FormPhase::Submitted {
                confirmation: "Your response has been recorded.".into()
            }
        );

        c.reset();
        assert_eq!(c.phase(), &FormPhase::Filling(0));
        assert!(c.answers().is_empty());
        assert!(c.errors().is_empty());
    }

    #[test]
    fn reset_respects_single_response_setting() {
        let f = form().settings(FormSettings {
            allow_another_response: false,
            ..FormSettings::default()
        });
        let mut c = FormController::new(f).unwrap();
        c.change("name", "Asha");
        c.next();
        c.change("cgpa", 9);
        c.submit();
        let effects = c.reset();
        assert!(matches!(effects.as_slice(), [Effect::Ignored(_)]));
        assert!(c.is_submitted());
    }

    #[test]
    fn submission_failure_returns_to_last_section() {
        let mut c = FormController::new(form()).unwrap();
        c.change("name", "Asha");
        c.next();
        c.change("cgpa", 9);
        c.submit();
        c.submission_failed("server unavailable");
        assert_eq!(c.phase(), &FormPhase::Filling(1));
        assert_eq!(c.form_error(), Some("server unavailable"));
        assert_eq!(c.answers().len(), 2);

        let effects = c.submit();
        assert!(matches!(effects.as_slice(), [Effect::Submit(_)]));
        assert_eq!(c.form_error(), None);
    }

    #[test]
    fn change_after_submit_is_ignored() {
        let mut c = FormController::new(form()).unwrap();
        c.change("name", "Asha");
        c.next();
        c.change("cgpa", 9);
        c.submit();
        let effects = c.change("name", "Other");
        assert!(matches!(effects.as_slice(), [Effect::Ignored(_)]));
        assert_eq!(c.answers().get("name"), Some(&json!("Asha")));
    }
}
