//! Dynamic forms as served by the assessment backend (student profile forms,
//! registration forms).
//!
//! Layout:
//! - `field.rs`       : `FieldKind`, `FieldDefinition`, `ValidationRule`
//! - `schema.rs`      : `FormDefinition`, `SectionDefinition`, `FormSettings`
//! - `state.rs`       : answer map, error map, `FormState`
//! - `validate.rs`    : field and section validation (`Validator`)
//! - `progression.rs` : section-by-section progression (`FormController`)

pub mod error;
pub mod field;
pub mod progression;
pub mod schema;
pub mod state;
pub mod validate;

pub use error::FormError;
pub use field::{FieldDefinition, FieldKind, ValidationRule};
pub use progression::{Effect, FormController, FormPhase, Intent};
pub use schema::{FormDefinition, FormSettings, SectionDefinition};
pub use state::{AnswerMap, ErrorMap, FormState};
pub use validate::{FormReport, SectionReport, Validator};
