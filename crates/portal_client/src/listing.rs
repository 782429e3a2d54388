//! Filtered, paginated list views.
//!
//! A `ListView` owns one filter and the last page that was rendered. Every
//! refresh is tagged with a `FetchTicket`: a generation number plus a
//! cancellation token. Issuing a ticket cancels the previous one, and only
//! the result of the newest, uncancelled ticket may replace the page.
//!
//! Notification policy: silence on a non-empty page, a warning when the server
//! reports `total == 0`, an error when the fetch fails (the previous page stays).

use std::sync::Arc;

use async_trait::async_trait;
use questions::{
    ListFilter, Page, Question, QuestionFilter, QuestionKind, ResultFilter, StudentFilter,
    StudentPage, TestResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::PortalApi;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};

pub const NO_RESULTS: &str = "No results match the current filters";

/// Anything carrying the server's total item count.
pub trait Paged {
    fn total(&self) -> u64;
}

impl<T> Paged for Page<T> {
    fn total(&self) -> u64 {
        self.total
    }
}

impl Paged for StudentPage {
    fn total(&self) -> u64 {
        self.page.total
    }
}

#[async_trait]
pub trait PageLoader<F: ListFilter>: Send + Sync {
    type Output: Paged + Send + 'static;

    async fn load(&self, filter: &F, cancel: &CancellationToken)
        -> Result<Self::Output, ClientError>;
}

pub struct QuestionLoader {
    pub api: Arc<dyn PortalApi>,
    pub kind: QuestionKind,
}

#[async_trait]
impl PageLoader<QuestionFilter> for QuestionLoader {
    type Output = Page<Question>;

    async fn load(
        &self,
        filter: &QuestionFilter,
        cancel: &CancellationToken,
    ) -> Result<Self::Output, ClientError> {
        self.api.list_questions(self.kind, filter, cancel).await
    }
}

pub struct StudentLoader {
    pub api: Arc<dyn PortalApi>,
}

#[async_trait]
impl PageLoader<StudentFilter> for StudentLoader {
    type Output = StudentPage;

    async fn load(
        &self,
        filter: &StudentFilter,
        cancel: &CancellationToken,
    ) -> Result<Self::Output, ClientError> {
        self.api.list_students(filter, cancel).await
    }
}

pub struct ResultLoader {
    pub api: Arc<dyn PortalApi>,
    pub test_id: String,
}

#[async_trait]
impl PageLoader<ResultFilter> for ResultLoader {
    type Output = Page<TestResult>;

    async fn load(
        &self,
        filter: &ResultFilter,
        cancel: &CancellationToken,
    ) -> Result<Self::Output, ClientError> {
        self.api.list_results(&self.test_id, filter, cancel).await
    }
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// What `ListView::apply` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Non-empty page rendered.
    Loaded,
    /// `total == 0`; empty page rendered and a warning raised.
    Empty,
    /// Fetch failed; previous page kept and an error raised.
    Failed,
    /// Superseded or cancelled; nothing touched.
    Stale,
}

pub struct ListView<F: ListFilter, R> {
    filter: F,
    data: Option<R>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    notifier: Arc<dyn Notifier>,
    empty_message: String,
}

impl<F: ListFilter, R: Paged> ListView<F, R> {
    pub fn new(filter: F, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            filter,
            data: None,
            generation: 0,
            in_flight: None,
            notifier,
            empty_message: NO_RESULTS.to_string(),
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Change the filter. The filter's own setters take care of resetting
    /// the page; the caller follows up with a fetch.
    pub fn update_filter(&mut self, change: impl FnOnce(&mut F)) {
        change(&mut self.filter);
    }

    /// Last rendered result, `None` before the first successful fetch.
    pub fn data(&self) -> Option<&R> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch: cancel the one in flight and hand out a new ticket
    /// together with the filter snapshot to load with.
    pub fn begin_fetch(&mut self) -> (FetchTicket, F) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
            debug!(generation = self.generation, "superseded list fetch cancelled");
        }
        self.generation += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        (
            FetchTicket {
                generation: self.generation,
                cancel,
            },
            self.filter.clone(),
        )
    }

    /// Cancel the fetch in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<R, ClientError>) -> Applied {
        if ticket.generation != self.generation || ticket.is_cancelled() {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "stale list result dropped"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) if page.total() == 0 => {
                self.data = Some(page);
                self.notifier
                    .notify(Notification::warning(self.empty_message.clone()));
                Applied::Empty
            }
            Ok(page) => {
                self.data = Some(page);
                Applied::Loaded
            }
            Err(e) if e.is_cancelled() => Applied::Stale,
            Err(e) => {
                warn!(error = %e, "list fetch failed");
                self.notifier.notify(Notification::error(e.to_string()));
                Applied::Failed
            }
        }
    }

    /// Fetch with the current filter and apply the result.
    pub async fn refresh<L>(&mut self, loader: &L) -> Applied
    where
        L: PageLoader<F, Output = R>,
    {
        let (ticket, filter) = self.begin_fetch();
        let result = loader.load(&filter, ticket.token()).await;
        self.apply(&ticket, result)
    }
}

/// Run a ticketed load detached from the view, e.g. on a spawned task. The
/// ticket comes back with the result so the owner can `apply` it.
pub async fn run_fetch<F, L>(
    loader: Arc<L>,
    filter: F,
    ticket: FetchTicket,
) -> (FetchTicket, Result<L::Output, ClientError>)
where
    F: ListFilter,
    L: PageLoader<F> + ?Sized,
{
    let result = loader.load(&filter, ticket.token()).await;
    (ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use reqwest::StatusCode;

    fn page(items: Vec<u32>, total: u64) -> Page<u32> {
        Page {
            items,
            page: 1,
            per_page: 10,
            total,
        }
    }

    fn view(notifier: &Arc<RecordingNotifier>) -> ListView<QuestionFilter, Page<u32>> {
        ListView::new(QuestionFilter::new(), notifier.clone())
    }

    #[test]
    fn newer_ticket_cancels_older() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut v = view(&notifier);
        let (a, _) = v.begin_fetch();
        let (b, _) = v.begin_fetch();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert_eq!(b.generation(), 2);
        assert!(v.is_loading());
    }

    #[test]
    fn failure_keeps_previous_page() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut v = view(&notifier);
        let (t, _) = v.begin_fetch();
        assert_eq!(v.apply(&t, Ok(page(vec![1, 2], 2))), Applied::Loaded);

        let (t, _) = v.begin_fetch();
        let err = ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "database down".into(),
        };
        assert_eq!(v.apply(&t, Err(err)), Applied::Failed);
        assert_eq!(v.data().map(|p| p.items.clone()), Some(vec![1, 2]));
        assert_eq!(notifier.count(Level::Error), 1);
        assert!(!v.is_loading());
    }

    #[test]
    fn cancelled_error_is_silent() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut v = view(&notifier);
        let (t, _) = v.begin_fetch();
        assert_eq!(v.apply(&t, Err(ClientError::Cancelled)), Applied::Stale);
        assert!(notifier.snapshot().is_empty());
    }

    #[test]
    fn explicit_cancel_makes_result_stale() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut v = view(&notifier);
        let (t, _) = v.begin_fetch();
        v.cancel();
        assert_eq!(v.apply(&t, Ok(page(vec![9], 1))), Applied::Stale);
        assert!(v.data().is_none());
    }
}
