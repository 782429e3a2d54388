//! List view behaviour against a scripted portal:
//! - a page reporting `total == 0` raises exactly one warning and nothing else
//! - a non-empty page raises nothing
//! - a superseded fetch that resolves late never replaces the newer page

mod support;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_client::{
    Applied, ClientError, Level, ListView, PageLoader, QuestionLoader, RecordingNotifier,
    run_fetch,
};
use pretty_assertions::assert_eq;
use questions::{ListFilter, Page, Question, QuestionFilter, QuestionKind};
use support::{FakePortal, question_page};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

type Gate = oneshot::Receiver<Result<Page<Question>, ClientError>>;

/// Loader whose results are released by the test, keyed by the search text.
struct GatedLoader {
    gates: Mutex<HashMap<String, Gate>>,
    honour_cancel: bool,
}

impl GatedLoader {
    fn new(gates: Vec<(&str, Gate)>, honour_cancel: bool) -> Self {
        Self {
            gates: Mutex::new(
                gates
                    .into_iter()
                    .map(|(k, g)| (k.to_string(), g))
                    .collect(),
            ),
            honour_cancel,
        }
    }
}

#[async_trait]
impl PageLoader<QuestionFilter> for GatedLoader {
    type Output = Page<Question>;

    async fn load(
        &self,
        filter: &QuestionFilter,
        cancel: &CancellationToken,
    ) -> Result<Page<Question>, ClientError> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .remove(filter.search())
            .expect("gate for search");
        if self.honour_cancel {
            tokio::select! {
                _ = cancel.cancelled() => Err(ClientError::Cancelled),
                released = gate => released.expect("gate sender"),
            }
        } else {
            gate.await.expect("gate sender")
        }
    }
}

fn ids(view: &ListView<QuestionFilter, Page<Question>>) -> Vec<String> {
    view.data()
        .map(|p| p.items.iter().map(|q| q.id().to_string()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn items_with_zero_total_raise_only_the_no_results_warning() {
    let portal = Arc::new(FakePortal::default());
    portal.queue_questions(Ok(question_page(&["q1", "q2"], 0)));
    let notifier = Arc::new(RecordingNotifier::new());
    let loader = QuestionLoader {
        api: portal.clone(),
        kind: QuestionKind::Mcq,
    };
    let mut view = ListView::new(QuestionFilter::new(), notifier.clone());

    let applied = view.refresh(&loader).await;

    assert_eq!(applied, Applied::Empty);
    assert_eq!(notifier.count(Level::Warning), 1);
    assert_eq!(notifier.count(Level::Success), 0);
    assert_eq!(notifier.count(Level::Error), 0);
}

#[tokio::test]
async fn non_empty_page_is_silent() {
    let portal = Arc::new(FakePortal::default());
    portal.queue_questions(Ok(question_page(&["q1"], 14)));
    let notifier = Arc::new(RecordingNotifier::new());
    let loader = QuestionLoader {
        api: portal.clone(),
        kind: QuestionKind::Mcq,
    };
    let mut view = ListView::new(QuestionFilter::new(), notifier.clone());

    assert_eq!(view.refresh(&loader).await, Applied::Loaded);
    assert!(notifier.snapshot().is_empty());
    assert_eq!(ids(&view), vec!["q1"]);
}

#[tokio::test]
async fn filter_change_refetches_from_first_page() {
    let portal = Arc::new(FakePortal::default());
    portal.queue_questions(Ok(question_page(&["q1"], 30)));
    portal.queue_questions(Ok(question_page(&["q7"], 3)));
    let notifier = Arc::new(RecordingNotifier::new());
    let loader = QuestionLoader {
        api: portal.clone(),
        kind: QuestionKind::Mcq,
    };
    let mut view = ListView::new(QuestionFilter::new(), notifier);

    view.update_filter(|f| f.goto_page(3));
    view.refresh(&loader).await;
    view.update_filter(|f| f.set_search("heap"));
    view.refresh(&loader).await;

    let queries = portal.question_queries.lock().unwrap().clone();
    assert!(queries[0].contains(&("page", "3".to_string())));
    assert!(queries[1].contains(&("page", "1".to_string())));
    assert!(queries[1].contains(&("search", "heap".to_string())));
    assert_eq!(ids(&view), vec!["q7"]);
}

#[tokio::test]
async fn late_result_of_superseded_fetch_is_dropped() {
    let (release_a, gate_a) = oneshot::channel();
    let (release_b, gate_b) = oneshot::channel();
    let loader = Arc::new(GatedLoader::new(vec![("a", gate_a), ("b", gate_b)], false));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = ListView::new(QuestionFilter::new(), notifier.clone());

    view.update_filter(|f| f.set_search("a"));
    let (ticket_a, filter_a) = view.begin_fetch();
    let fetch_a = tokio::spawn(run_fetch(loader.clone(), filter_a, ticket_a));

    view.update_filter(|f| f.set_search("b"));
    let (ticket_b, filter_b) = view.begin_fetch();
    let fetch_b = tokio::spawn(run_fetch(loader.clone(), filter_b, ticket_b));

    release_b.send(Ok(question_page(&["b1"], 1))).unwrap();
    let (ticket, result) = fetch_b.await.unwrap();
    assert_eq!(view.apply(&ticket, result), Applied::Loaded);

    release_a.send(Ok(question_page(&["a1", "a2"], 2))).unwrap();
    let (ticket, result) = fetch_a.await.unwrap();
    assert_eq!(view.apply(&ticket, result), Applied::Stale);

    assert_eq!(ids(&view), vec!["b1"]);
    assert!(notifier.snapshot().is_empty());
}

#[tokio::test]
async fn superseded_fetch_observes_cancellation() {
    let (_release_a, gate_a) = oneshot::channel();
    let (release_b, gate_b) = oneshot::channel();
    let loader = Arc::new(GatedLoader::new(vec![("a", gate_a), ("b", gate_b)], true));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = ListView::new(QuestionFilter::new(), notifier.clone());

    view.update_filter(|f| f.set_search("a"));
    let (ticket_a, filter_a) = view.begin_fetch();
    let fetch_a = tokio::spawn(run_fetch(loader.clone(), filter_a, ticket_a));

    view.update_filter(|f| f.set_search("b"));
    let (ticket_b, filter_b) = view.begin_fetch();

    let (ticket, result) = fetch_a.await.unwrap();
    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert_eq!(view.apply(&ticket, result), Applied::Stale);
    assert!(view.is_loading());

    release_b.send(Ok(question_page(&[], 0))).unwrap();
    let (ticket, result) = run_fetch(loader, filter_b, ticket_b).await;
    assert_eq!(view.apply(&ticket, result), Applied::Empty);
    assert_eq!(notifier.count(Level::Warning), 1);
    assert_eq!(notifier.count(Level::Error), 0);
}
