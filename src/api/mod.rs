pub mod http;

use crate::domain::email::{EmailDetail, EmailId, EmailSummary};
use crate::domain::query::ListQuery;

/// Anything that went wrong while reading from the listing or detail endpoint.
///
/// Views never show these verbatim; they are logged and folded into one error state.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server answered {status}")]
    Status { status: u16 },
    #[error("unexpected payload: {0}")]
    Payload(String),
}

pub trait InboxApi: Send + Sync {
    /// `GET /emails/{keyword}?limit={n}`
    fn list_emails(&self, query: &ListQuery) -> Result<Vec<EmailSummary>, FetchError>;

    /// `GET /email/{id}`
    fn get_email(&self, id: &EmailId) -> Result<EmailDetail, FetchError>;
}
