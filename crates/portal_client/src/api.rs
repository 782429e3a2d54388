use async_trait::async_trait;
use forms::{AnswerMap, FormDefinition};
use questions::{
    AssignmentRequest, CreatedResource, NewTest, Page, Question, QuestionFilter, QuestionKind,
    ResultFilter, StudentFilter, StudentPage, TestResult,
};
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

/// Endpoints of the assessment portal used by this client.
///
/// List calls take a cancellation token; a cancelled call resolves to
/// [`ClientError::Cancelled`] without touching any view state. Calls that only
/// acknowledge return the server's message.
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn list_questions(
        &self,
        kind: QuestionKind,
        filter: &QuestionFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<Question>, ClientError>;

    async fn create_question(&self, question: &Question) -> Result<CreatedResource, ClientError>;

    async fn duplicate_question(
        &self,
        kind: QuestionKind,
        id: &str,
    ) -> Result<CreatedResource, ClientError>;

    async fn create_test(&self, test: &NewTest) -> Result<CreatedResource, ClientError>;

    async fn duplicate_test(&self, id: &str) -> Result<CreatedResource, ClientError>;

    async fn list_students(
        &self,
        filter: &StudentFilter,
        cancel: &CancellationToken,
    ) -> Result<StudentPage, ClientError>;

    async fn assign_students(&self, request: &AssignmentRequest) -> Result<String, ClientError>;

    async fn list_results(
        &self,
        test_id: &str,
        filter: &ResultFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<TestResult>, ClientError>;

    async fn profile_form(&self) -> Result<FormDefinition, ClientError>;

    async fn save_profile_form(&self, form: &FormDefinition) -> Result<String, ClientError>;

    async fn submit_profile(&self, answers: &AnswerMap) -> Result<String, ClientError>;
}
