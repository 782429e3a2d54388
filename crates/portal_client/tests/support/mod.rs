#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use forms::{AnswerMap, FormDefinition};
use portal_client::{ClientError, PortalApi};
use questions::{
    AssignmentRequest, CreatedResource, Difficulty, McqOption, McqQuestion, NewTest, Page,
    Question, QuestionFilter, QuestionKind, ResultFilter, StudentFilter, StudentPage, TestResult,
};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

/// In-memory portal. Responses are queued up front; calls that are not
/// scripted answer `Rejected`.
#[derive(Default)]
pub struct FakePortal {
    pub question_pages: Mutex<VecDeque<Result<Page<Question>, ClientError>>>,
    pub question_queries: Mutex<Vec<Vec<(&'static str, String)>>>,
    pub form: Mutex<Option<FormDefinition>>,
    pub submissions: Mutex<Vec<AnswerMap>>,
    pub fail_submissions: AtomicBool,
}

impl FakePortal {
    pub fn queue_questions(&self, page: Result<Page<Question>, ClientError>) {
        self.question_pages.lock().unwrap().push_back(page);
    }

    pub fn submissions(&self) -> Vec<AnswerMap> {
        self.submissions.lock().unwrap().clone()
    }
}

fn not_scripted(call: &str) -> ClientError {
    ClientError::Rejected(format!("{call} is not scripted"))
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn list_questions(
        &self,
        _kind: QuestionKind,
        filter: &QuestionFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<Question>, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        self.question_queries
            .lock()
            .unwrap()
            .push(questions::ListFilter::query(filter));
        self.question_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(not_scripted("list_questions")))
    }

    async fn create_question(&self, _question: &Question) -> Result<CreatedResource, ClientError> {
        Err(not_scripted("create_question"))
    }

    async fn duplicate_question(
        &self,
        _kind: QuestionKind,
        _id: &str,
    ) -> Result<CreatedResource, ClientError> {
        Err(not_scripted("duplicate_question"))
    }

    async fn create_test(&self, _test: &NewTest) -> Result<CreatedResource, ClientError> {
        Err(not_scripted("create_test"))
    }

    async fn duplicate_test(&self, _id: &str) -> Result<CreatedResource, ClientError> {
        Err(not_scripted("duplicate_test"))
    }

    async fn list_students(
        &self,
        _filter: &StudentFilter,
        _cancel: &CancellationToken,
    ) -> Result<StudentPage, ClientError> {
        Err(not_scripted("list_students"))
    }

    async fn assign_students(&self, _request: &AssignmentRequest) -> Result<String, ClientError> {
        Err(not_scripted("assign_students"))
    }

    async fn list_results(
        &self,
        _test_id: &str,
        _filter: &ResultFilter,
        _cancel: &CancellationToken,
    ) -> Result<Page<TestResult>, ClientError> {
        Err(not_scripted("list_results"))
    }

    async fn profile_form(&self) -> Result<FormDefinition, ClientError> {
        self.form
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| not_scripted("profile_form"))
    }

    async fn save_profile_form(&self, form: &FormDefinition) -> Result<String, ClientError> {
        *self.form.lock().unwrap() = Some(form.clone());
        Ok("Form saved".into())
    }

    async fn submit_profile(&self, answers: &AnswerMap) -> Result<String, ClientError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "try again later".into(),
            });
        }
        self.submissions.lock().unwrap().push(answers.clone());
        Ok(String::new())
    }
}

pub fn mcq(id: &str) -> Question {
    Question::Mcq(McqQuestion {
        id: id.into(),
        question: format!("Question {id}"),
        options: vec![
            McqOption {
                option_id: "a".into(),
                value: "yes".into(),
            },
            McqOption {
                option_id: "b".into(),
                value: "no".into(),
            },
        ],
        correct_answers: vec!["a".into()],
        is_multiple: false,
        explanation: None,
        topic: "basics".into(),
        subtopic: None,
        difficulty: Difficulty::Easy,
    })
}

pub fn question_page(ids: &[&str], total: u64) -> Page<Question> {
    Page {
        items: ids.iter().map(|id| mcq(id)).collect(),
        page: 1,
        per_page: 10,
        total,
    }
}
