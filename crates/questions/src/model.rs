//! Wire types of the question bank, test and student endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::DraftError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Question bank a question lives in; also the path segment of its endpoints.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QuestionKind {
    Mcq,
    Rearrange,
    Coding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqOption {
    pub option_id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub question: String,
    pub options: Vec<McqOption>,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub is_multiple: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    pub difficulty: Difficulty,
}

impl McqQuestion {
    /// A selection is correct when it names exactly the correct option ids,
    /// in any order.
    pub fn is_correct(&self, selected: &[String]) -> bool {
        let mut picked: Vec<&str> = selected.iter().map(String::as_str).collect();
        let mut expected: Vec<&str> = self.correct_answers.iter().map(String::as_str).collect();
        picked.sort_unstable();
        picked.dedup();
        expected.sort_unstable();
        expected.dedup();
        picked == expected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RearrangeItem {
    pub item_id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl RearrangeItem {
    /// New item with a freshly generated id, for drafting questions locally.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            item_id: uuid::Uuid::new_v4().to_string(),
            value: value.into(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RearrangeQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub question: String,
    pub items: Vec<RearrangeItem>,
    pub correct_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub statement: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    pub difficulty: Difficulty,
}

impl CodingQuestion {
    pub fn visible_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.test_cases.iter().filter(|c| !c.hidden)
    }
}

/// A question of any bank. The wire format carries no tag; the bank is known
/// from the endpoint, so decoding goes through [`Question::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Question {
    Mcq(McqQuestion),
    Rearrange(RearrangeQuestion),
    Coding(CodingQuestion),
}

impl Question {
    /// Decode a locally written payload. Rearrange drafts may leave ids out:
    /// when `correct_order` is absent the items are taken as listed in the
    /// correct order, and items given as plain text or without an `item_id`
    /// get a generated one.
    pub fn from_draft(kind: QuestionKind, mut value: serde_json::Value) -> serde_json::Result<Self> {
        if kind == QuestionKind::Rearrange {
            complete_rearrange_draft(&mut value);
        }
        Self::from_value(kind, value)
    }

    pub fn from_value(kind: QuestionKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            QuestionKind::Mcq => Self::Mcq(serde_json::from_value(value)?),
            QuestionKind::Rearrange => Self::Rearrange(serde_json::from_value(value)?),
            QuestionKind::Coding => Self::Coding(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Mcq(_) => QuestionKind::Mcq,
            Self::Rearrange(_) => QuestionKind::Rearrange,
            Self::Coding(_) => QuestionKind::Coding,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Mcq(q) => &q.id,
            Self::Rearrange(q) => &q.id,
            Self::Coding(q) => &q.id,
        }
    }

    /// Prompt or title, whichever the bank uses.
    pub fn title(&self) -> &str {
        match self {
            Self::Mcq(q) => &q.question,
            Self::Rearrange(q) => &q.question,
            Self::Coding(q) => &q.title,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            Self::Mcq(q) => &q.topic,
            Self::Rearrange(q) => &q.topic,
            Self::Coding(q) => &q.topic,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Self::Mcq(q) => q.difficulty,
            Self::Rearrange(q) => q.difficulty,
            Self::Coding(q) => q.difficulty,
        }
    }
}

fn complete_rearrange_draft(value: &mut serde_json::Value) {
    use serde_json::Value;

    let Some(draft) = value.as_object_mut() else {
        return;
    };
    if draft.contains_key("correct_order") {
        return;
    }
    let Some(Value::Array(items)) = draft.get_mut("items") else {
        return;
    };
    let mut order = Vec::with_capacity(items.len());
    for item in items.iter_mut() {
        if let Value::String(text) = item {
            let generated = RearrangeItem::new(text.as_str());
            *item = serde_json::json!({ "item_id": generated.item_id, "value": generated.value });
        } else if let Some(fields) = item.as_object_mut() {
            let has_id = matches!(fields.get("item_id"), Some(Value::String(id)) if !id.is_empty());
            if !has_id {
                let generated = RearrangeItem::new("");
                fields.insert("item_id".into(), Value::String(generated.item_id));
            }
        }
        if let Some(id) = item.get("item_id") {
            order.push(id.clone());
        }
    }
    draft.insert("correct_order".into(), Value::Array(order));
}

/// Payload for creating a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub mcq_ids: Vec<String>,
    #[serde(default)]
    pub rearrange_ids: Vec<String>,
    #[serde(default)]
    pub coding_ids: Vec<String>,
}

impl NewTest {
    pub fn question_count(&self) -> usize {
        self.mcq_ids.len() + self.rearrange_ids.len() + self.coding_ids.len()
    }

    /// Client-side checks before posting the draft.
    pub fn check(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.duration_minutes == 0 {
            return Err(DraftError::NonPositiveDuration);
        }
        if self.ends_at <= self.starts_at {
            return Err(DraftError::WindowEndsBeforeStart);
        }
        if self.question_count() == 0 {
            return Err(DraftError::NoQuestions);
        }
        Ok(())
    }
}

/// Identifier echoed back by create/duplicate endpoints.
///
/// Servers echo the id under any of `id`, `_id`, `test_id` or `question_id`,
/// sometimes several at once; the first present in that order wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EchoedIds")]
pub struct CreatedResource {
    pub id: String,
}

#[derive(Deserialize)]
struct EchoedIds {
    id: Option<String>,
    #[serde(rename = "_id")]
    underscore_id: Option<String>,
    test_id: Option<String>,
    question_id: Option<String>,
}

impl TryFrom<EchoedIds> for CreatedResource {
    type Error = String;

    fn try_from(ids: EchoedIds) -> Result<Self, Self::Error> {
        [ids.id, ids.underscore_id, ids.test_id, ids.question_id]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .map(|id| Self { id })
            .ok_or_else(|| "response carries no resource id".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u8>,
}

/// Filter values the backend offers for the student list.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFilterMeta {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub years: Vec<u8>,
    #[serde(default)]
    pub semesters: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub test_id: String,
    pub student_ids: Vec<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResultStatus {
    NotStarted,
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub student_id: String,
    pub student_name: String,
    pub status: ResultStatus,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl TestResult {
    /// Score as a percentage, `None` when the test has no marks.
    pub fn percentage(&self) -> Option<f64> {
        (self.max_score > 0.0).then(|| self.score / self.max_score * 100.0)
    }
}
