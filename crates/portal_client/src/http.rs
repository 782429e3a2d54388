//! `PortalApi` over HTTPS with reqwest.

use std::sync::Arc;

use async_trait::async_trait;
use forms::{AnswerMap, FormDefinition};
use questions::{
    AssignmentRequest, CreatedResource, ListFilter, NewTest, Page, Question, QuestionFilter,
    QuestionKind, ResultFilter, StudentFilter, StudentPage, TestResult,
};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::PortalApi;
use crate::config::{ApiUrl, ClientConfig};
use crate::envelope;
use crate::error::ClientError;
use crate::token::TokenStore;

pub struct HttpPortal {
    client: Client,
    base: ApiUrl,
    tokens: Arc<dyn TokenStore>,
}

/// One outgoing call, built up before it is sent.
struct Call<'a> {
    method: Method,
    segments: Vec<&'a str>,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Call<'a> {
    fn new(method: Method, segments: Vec<&'a str>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
            cancel: None,
        }
    }

    fn query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn cancel(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl HttpPortal {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("examiner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: config.api_url()?,
            tokens,
        })
    }

    fn auth_headers(&self) -> Result<HeaderMap, ClientError> {
        let token = self.tokens.require()?;
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send the call and return the raw body of a 2xx response.
    async fn send(&self, call: Call<'_>) -> Result<Vec<u8>, ClientError> {
        let url = self.base.for_api(&call.segments)?;
        let mut request = self
            .client
            .request(call.method.clone(), url.clone())
            .headers(self.auth_headers()?);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        debug!(method = %call.method, %url, "sending API request");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            if status.is_success() {
                Ok(body)
            } else {
                let message = envelope::error_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
                Err(ClientError::Status { status, message })
            }
        };

        let result = match call.cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(ClientError::Cancelled),
                    result = exchange => result,
                }
            }
            None => exchange.await,
        };

        match &result {
            Err(e) if e.is_cancelled() => debug!(method = %call.method, %url, "request cancelled"),
            Err(e) => warn!(method = %call.method, %url, error = %e, "request failed"),
            Ok(body) => debug!(method = %call.method, %url, bytes = body.len(), "response received"),
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, call: Call<'_>) -> Result<T, ClientError> {
        let body = self.send(call).await?;
        envelope::decode(&body)
    }

    async fn acknowledge(&self, call: Call<'_>) -> Result<String, ClientError> {
        let body = self.send(call).await?;
        envelope::acknowledge(&body)
    }
}

#[async_trait]
impl PortalApi for HttpPortal {
    async fn list_questions(
        &self,
        kind: QuestionKind,
        filter: &QuestionFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<Question>, ClientError> {
        let kind_segment = kind.to_string();
        let call = Call::new(Method::GET, vec!["questions", kind_segment.as_str()])
            .query(filter.query())
            .cancel(cancel);
        let raw: Page<Value> = self.fetch(call).await?;
        let items = raw
            .items
            .into_iter()
            .map(|item| Question::from_value(kind, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            page: raw.page,
            per_page: raw.per_page,
            total: raw.total,
        })
    }

    async fn create_question(&self, question: &Question) -> Result<CreatedResource, ClientError> {
        let kind_segment = question.kind().to_string();
        let call = Call::new(Method::POST, vec!["questions", kind_segment.as_str()]).json(question)?;
        self.fetch(call).await
    }

    async fn duplicate_question(
        &self,
        kind: QuestionKind,
        id: &str,
    ) -> Result<CreatedResource, ClientError> {
        let kind_segment = kind.to_string();
        let call = Call::new(
            Method::POST,
            vec!["questions", kind_segment.as_str(), id, "duplicate"],
        );
        self.fetch(call).await
    }

    async fn create_test(&self, test: &NewTest) -> Result<CreatedResource, ClientError> {
        let call = Call::new(Method::POST, vec!["tests"]).json(test)?;
        self.fetch(call).await
    }

    async fn duplicate_test(&self, id: &str) -> Result<CreatedResource, ClientError> {
        self.fetch(Call::new(Method::POST, vec!["tests", id, "duplicate"]))
            .await
    }

    async fn list_students(
        &self,
        filter: &StudentFilter,
        cancel: &CancellationToken,
    ) -> Result<StudentPage, ClientError> {
        let call = Call::new(Method::GET, vec!["students"])
            .query(filter.query())
            .cancel(cancel);
        self.fetch(call).await
    }

    async fn assign_students(&self, request: &AssignmentRequest) -> Result<String, ClientError> {
        let call = Call::new(Method::POST, vec!["tests", "assign"]).json(request)?;
        self.acknowledge(call).await
    }

    async fn list_results(
        &self,
        test_id: &str,
        filter: &ResultFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<TestResult>, ClientError> {
        let call = Call::new(Method::GET, vec!["tests", test_id, "results"])
            .query(filter.query())
            .cancel(cancel);
        self.fetch(call).await
    }

    async fn profile_form(&self) -> Result<FormDefinition, ClientError> {
        self.fetch(Call::new(Method::GET, vec!["profile", "form"]))
            .await
    }

    async fn save_profile_form(&self, form: &FormDefinition) -> Result<String, ClientError> {
        let call = Call::new(Method::POST, vec!["profile", "form"]).json(form)?;
        self.acknowledge(call).await
    }

    async fn submit_profile(&self, answers: &AnswerMap) -> Result<String, ClientError> {
        let call = Call::new(Method::POST, vec!["profile", "responses"]).json(answers)?;
        self.acknowledge(call).await
    }
}
