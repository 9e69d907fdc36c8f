use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::InboxApi;
use crate::controller::{Dispatcher, LIST_ERROR_MESSAGE, Outcome, RequestId};
use crate::domain::email::EmailSummary;
use crate::domain::query::{FilterKeyword, Limit, QueryError, QueryState, Status};

/// Owns the filter/limit selection of one inbox view and the listing it produced.
pub struct InboxController {
    api: Arc<dyn InboxApi>,
    defaults: (FilterKeyword, Limit),
    state: QueryState,
    worker: Dispatcher<Vec<EmailSummary>>,
}

impl InboxController {
    pub fn new(api: Arc<dyn InboxApi>) -> Self {
        Self::with_defaults(api, FilterKeyword::All, Limit::default())
    }

    pub fn with_defaults(api: Arc<dyn InboxApi>, filter: FilterKeyword, limit: Limit) -> Self {
        Self {
            api,
            state: QueryState::new(filter.clone(), limit),
            defaults: (filter, limit),
            worker: Dispatcher::new(),
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Reset to defaults and fetch.
    pub fn initialize(&mut self) -> RequestId {
        let (filter, limit) = self.defaults.clone();
        self.state = QueryState::new(filter, limit);
        self.fetch()
    }

    /// Any keyword the server might know is accepted; only unusable ones are refused,
    /// in which case nothing changes and nothing is fetched.
    pub fn set_filter(&mut self, keyword: &str) -> Result<RequestId, QueryError> {
        let filter = FilterKeyword::parse(keyword)?;
        Ok(self.select_filter(filter))
    }

    pub fn select_filter(&mut self, filter: FilterKeyword) -> RequestId {
        self.state.filter = filter;
        self.fetch()
    }

    pub fn set_limit(&mut self, n: u32) -> Result<RequestId, QueryError> {
        let limit = Limit::new(n)?;
        Ok(self.select_limit(limit))
    }

    pub fn select_limit(&mut self, limit: Limit) -> RequestId {
        self.state.limit = limit;
        self.fetch()
    }

    pub fn set_since(&mut self, since: Option<NaiveDate>) -> RequestId {
        self.state.since = since;
        self.fetch()
    }

    pub fn refresh(&mut self) -> RequestId {
        self.fetch()
    }

    fn fetch(&mut self) -> RequestId {
        self.state.status = Status::Loading;
        self.state.error_message = None;

        let query = self.state.query();
        let api = Arc::clone(&self.api);
        let id = self.worker.spawn(move || api.list_emails(&query));
        debug!(
            "list request #{id}: filter={} limit={} since={:?}",
            self.state.filter, self.state.limit, self.state.since
        );
        id
    }

    /// Apply every outcome that has arrived. Returns true if state changed.
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
                None => debug!("still waiting on list request #{}", self.worker.latest()),
            }
        }
    }

    /// Like [`Self::wait`] but gives up after `timeout`. Returns false if still loading.
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

    pub(crate) fn apply(&mut self, outcome: Outcome<Vec<EmailSummary>>) -> bool {
        if !self.worker.is_current(outcome.id) {
            debug!(
                "dropping stale list response #{} (latest #{})",
                outcome.id,
                self.worker.latest()
            );
            return false;
        }

        match outcome.result {
            Ok(items) => {
                debug!("list request #{} returned {} emails", outcome.id, items.len());
                self.state.results = items;
                self.state.status = Status::Ready;
                self.state.error_message = None;
            }
            Err(e) => {
                warn!("list request #{} failed: {e}", outcome.id);
                self.state.status = Status::Error;
                self.state.error_message = Some(LIST_ERROR_MESSAGE.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::controller::testing::RecordingApi;
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(5);

    fn controller(api: &Arc<RecordingApi>) -> InboxController {
        InboxController::new(Arc::clone(api) as Arc<dyn InboxApi>)
    }

    #[test]
    fn mount_fetches_all_with_default_limit() {
        let api = Arc::new(RecordingApi::with_rows(3));
        let mut c = controller(&api);
        assert_eq!(c.state().status, Status::Idle);

        c.initialize();
        assert!(c.wait_timeout(WAIT));

        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].filter.path_segment(), "all");
        assert_eq!(calls[0].limit.get(), 100);
        assert_eq!(c.state().status, Status::Ready);
        assert_eq!(c.state().results.len(), 3);
    }

    #[test]
    fn every_selection_issues_exactly_one_call() {
        let api = Arc::new(RecordingApi::with_rows(1));
        let mut c = controller(&api);

        for kw in ["ALL", "ATS", "TMO"] {
            c.set_filter(kw).unwrap();
            assert!(c.wait_timeout(WAIT));
        }
        for n in Limit::ALLOWED {
            c.set_limit(n).unwrap();
            assert!(c.wait_timeout(WAIT));
        }

        let calls = api.list_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 3 + Limit::ALLOWED.len());
        let segments: Vec<_> = calls[..3].iter().map(|q| q.filter.path_segment()).collect();
        assert_eq!(segments, ["all", "ats", "tmo"]);
        let limits: Vec<_> = calls[3..].iter().map(|q| q.limit.get()).collect();
        assert_eq!(limits, Limit::ALLOWED);
        // limit changes keep the last filter
        assert!(calls[3..].iter().all(|q| q.filter.path_segment() == "tmo"));
    }

    #[test]
    fn filter_change_goes_through_loading() {
        let api = Arc::new(RecordingApi::with_rows(2));
        let mut c = controller(&api);
        c.initialize();
        assert!(c.wait_timeout(WAIT));
        assert_eq!(c.state().status, Status::Ready);

        c.set_filter("ATS").unwrap();
        assert_eq!(c.state().status, Status::Loading);
        assert_eq!(c.state().filter.to_string(), "ATS");

        assert!(c.wait_timeout(WAIT));
        assert_eq!(c.state().status, Status::Ready);
        assert_eq!(c.state().results[0].subject, "ats #0");
    }

    #[test]
    fn failure_keeps_results_and_selection() {
        let api = Arc::new(RecordingApi::with_rows(3));
        let mut c = controller(&api);
        c.initialize();
        assert!(c.wait_timeout(WAIT));
        let before = c.state().results.clone();

        api.set_failing(true);
        c.set_filter("ATS").unwrap();
        assert!(c.wait_timeout(WAIT));

        assert_eq!(c.state().status, Status::Error);
        assert_eq!(c.state().error_message.as_deref(), Some(LIST_ERROR_MESSAGE));
        assert_eq!(c.state().results, before);
        assert_eq!(c.state().filter.to_string(), "ATS");
    }

    #[test]
    fn success_after_failure_clears_message() {
        let api = Arc::new(RecordingApi::with_rows(1));
        api.set_failing(true);
        let mut c = controller(&api);
        c.initialize();
        assert!(c.wait_timeout(WAIT));
        assert_eq!(c.state().status, Status::Error);

        api.set_failing(false);
        c.refresh();
        assert!(c.state().error_message.is_none());
        assert!(c.wait_timeout(WAIT));
        assert_eq!(c.state().status, Status::Ready);
        assert!(c.state().error_message.is_none());
        assert_eq!(api.list_call_count(), 2);
    }

    #[test]
    fn invalid_selection_is_a_no_op() {
        let api = Arc::new(RecordingApi::with_rows(1));
        let mut c = controller(&api);

        assert_eq!(c.set_limit(75), Err(QueryError::InvalidLimit(75)));
        assert!(matches!(c.set_filter(""), Err(QueryError::InvalidFilter(_))));
        assert_eq!(c.state().status, Status::Idle);
        assert_eq!(c.state().limit.get(), 100);
        assert_eq!(api.list_call_count(), 0);
    }

    #[test]
    fn since_is_forwarded() {
        let api = Arc::new(RecordingApi::with_rows(0));
        let mut c = controller(&api);
        let day = NaiveDate::from_ymd_opt(2024, 2, 1);
        c.set_since(day);
        assert!(c.wait_timeout(WAIT));
        assert_eq!(api.list_calls.lock().unwrap()[0].since, day);
        assert!(c.state().results.is_empty());
        assert_eq!(c.state().status, Status::Ready);
    }

    #[test]
    fn slow_stale_response_does_not_clobber_newer_one() {
        let api = Arc::new(RecordingApi::with_rows(2));
        let (release, gate) = mpsc::channel();
        api.gates.lock().unwrap().insert("ats".into(), gate);

        let mut c = controller(&api);
        let stale = c.set_filter("ATS").unwrap();
        let fresh = c.set_filter("TMO").unwrap();
        assert!(fresh > stale);

        assert!(c.wait_timeout(WAIT));
        assert_eq!(c.state().results[0].subject, "tmo #0");

        release.send(()).unwrap();
        let late = c.worker.next_timeout(WAIT).expect("gated request resolves");
        assert_eq!(late.id, stale);
        assert!(!c.apply(late));
        assert_eq!(c.state().results[0].subject, "tmo #0");
        assert_eq!(c.state().status, Status::Ready);
    }

    #[test]
    fn stale_failure_is_ignored_while_loading() {
        let api = Arc::new(RecordingApi::with_rows(1));
        let mut c = controller(&api);
        // never leave the gated request hanging past the test
        let (_release, gate) = mpsc::channel::<()>();
        api.gates.lock().unwrap().insert("all".into(), gate);
        let current = c.initialize();

        let changed = c.apply(Outcome {
            id: current - 1,
            result: Err(FetchError::Status { status: 502 }),
        });
        assert!(!changed);
        assert_eq!(c.state().status, Status::Loading);
        assert!(c.state().error_message.is_none());
    }

    #[test]
    fn poll_is_non_blocking() {
        let api = Arc::new(RecordingApi::with_rows(1));
        let mut c = controller(&api);
        assert!(!c.poll());

        c.refresh();
        let deadline = Instant::now() + WAIT;
        while !c.poll() {
            assert!(Instant::now() < deadline, "response never arrived");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(c.state().status, Status::Ready);
    }
}
