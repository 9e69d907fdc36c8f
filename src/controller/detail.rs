use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::InboxApi;
use crate::controller::{DETAIL_ERROR_MESSAGE, Dispatcher, Outcome, RequestId};
use crate::domain::email::{EmailDetail, EmailId};
use crate::domain::query::Status;

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub selected: Option<EmailId>,
    pub status: Status,
    pub detail: Option<EmailDetail>,
    pub error_message: Option<String>,
}

/// Loads the single email a view has selected.
pub struct DetailFetcher {
    api: Arc<dyn InboxApi>,
    state: DetailState,
    worker: Dispatcher<EmailDetail>,
}

impl DetailFetcher {
    pub fn new(api: Arc<dyn InboxApi>) -> Self {
        Self {
            api,
            state: DetailState::default(),
            worker: Dispatcher::new(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// `None` (or an empty id) clears the view without touching the network.
    pub fn select(&mut self, id: Option<EmailId>) -> Option<RequestId> {
        match id {
            Some(id) if !id.as_str().trim().is_empty() => Some(self.load_detail(id)),
            _ => {
                self.clear();
                None
            }
        }
    }

    pub fn clear(&mut self) {
        if self.state.is_loading() {
            debug!("detail request #{} abandoned", self.worker.latest());
        }
        self.worker.supersede();
        self.state = DetailState::default();
    }

    fn load_detail(&mut self, id: EmailId) -> RequestId {
        self.state = DetailState {
            selected: Some(id.clone()),
            status: Status::Loading,
            detail: None,
            error_message: None,
        };
        let api = Arc::clone(&self.api);
        let req = self.worker.spawn(move || api.get_email(&id));
        debug!("detail request #{req} for {:?}", self.state.selected);
        req
    }

    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.worker.try_next() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block until the latest request resolves.
    pub fn wait(&mut self) {
        while self.state.is_loading() {
            match self.worker.next_timeout(Duration::from_secs(3600)) {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => debug!("still waiting on detail request #{}", self.worker.latest()),
            }
        }
    }

    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.is_loading() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            if let Some(outcome) = self.worker.next_timeout(left) {
                self.apply(outcome);
            }
        }
        true
    }

    pub(crate) fn apply(&mut self, outcome: Outcome<EmailDetail>) -> bool {
        if !self.worker.is_current(outcome.id) {
            debug!("dropping stale detail response #{}", outcome.id);
            return false;
        }
        match outcome.result {
            Ok(detail) => {
                self.state.detail = Some(detail);
                self.state.status = Status::Ready;
                self.state.error_message = None;
            }
            Err(e) => {
                warn!("detail request #{} for {:?} failed: {e}", outcome.id, self.state.selected);
                self.state.detail = None;
                self.state.status = Status::Error;
                self.state.error_message = Some(DETAIL_ERROR_MESSAGE.to_string());
            }
        }
        true
    }
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}
