//! Domain of the assessment portal as seen from the client: question banks
//! (MCQ, rearrange, coding), tests, students and results, together with the
//! filter state that drives the paginated list endpoints.

pub mod error;
pub mod filter;
pub mod model;
pub mod page;
pub mod rearrange;

pub use error::{DraftError, RearrangeError};
pub use filter::{ListFilter, Paging, QuestionFilter, ResultFilter, StudentFilter};
pub use model::{
    AssignmentRequest, CodingQuestion, CreatedResource, Difficulty, McqOption, McqQuestion,
    NewTest, Question, QuestionKind, RearrangeItem, RearrangeQuestion, ResultStatus, Student,
    StudentFilterMeta, TestCase, TestResult,
};
pub use page::{Page, StudentPage};
pub use rearrange::{Evaluation, RearrangeBoard};
