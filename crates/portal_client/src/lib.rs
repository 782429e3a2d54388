//! Client side of the assessment portal:
//! - `api` / `http`: endpoint trait and its reqwest implementation
//! - `envelope`: `{ success, message?, data? }` and bare-body decoding
//! - `config`: layered `ClientConfig` and the API base url
//! - `token`: bearer token persistence
//! - `listing`: filtered, paginated list views with cancellable fetches
//! - `notify`: one-shot user notifications
//! - `profile`: profile form session over `forms::FormController`

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod listing;
pub mod notify;
pub mod profile;
pub mod token;

pub use api::PortalApi;
pub use config::{ApiUrl, ClientConfig};
pub use error::ClientError;
pub use http::HttpPortal;
pub use listing::{
    Applied, FetchTicket, ListView, PageLoader, Paged, QuestionLoader, ResultLoader,
    StudentLoader, run_fetch,
};
pub use notify::{Level, Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use profile::ProfileSession;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
