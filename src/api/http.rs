use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::api::{FetchError, InboxApi};
use crate::domain::email::{EmailDetail, EmailId, EmailSummary};
use crate::domain::query::ListQuery;

/// Reads the inbox from an HTTP origin exposing `/emails/{keyword}` and `/email/{id}`.
pub struct HttpInboxApi {
    base: Url,
    http: Client,
}

impl HttpInboxApi {
    /// `timeout` of `None` lets a hung request wait forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        // so that path segments are appended rather than replacing the last one
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn list_url(&self, query: &ListQuery) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("emails")
            .push(&query.filter.path_segment());
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("limit", &query.limit.to_string());
            if let Some(since) = query.since {
                qp.append_pair("checkDate", &since.format("%Y-%m-%d").to_string());
            }
        }
        Ok(url)
    }

    pub fn detail_url(&self, id: &EmailId) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("email")
            .push(id.as_str());
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().map_err(FetchError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().map_err(FetchError::Transport)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Payload(e.to_string()))
    }
}

impl InboxApi for HttpInboxApi {
    fn list_emails(&self, query: &ListQuery) -> Result<Vec<EmailSummary>, FetchError> {
        let url = self.list_url(query)?;
        self.get_json(url)
    }

    fn get_email(&self, id: &EmailId) -> Result<EmailDetail, FetchError> {
        let url = self.detail_url(id)?;
        self.get_json(url)
    }
}
