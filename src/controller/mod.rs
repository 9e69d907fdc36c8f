//! View-state owners. Each view holds its own controller; nothing here is global.
//!
//! Every triggering operation runs one read on a worker thread. Outcomes come
//! back over a channel tagged with the request number, and only the latest
//! request may touch state.

pub mod detail;
pub mod inbox;

pub use detail::{DetailFetcher, DetailState};
pub use inbox::InboxController;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::api::FetchError;

pub const LIST_ERROR_MESSAGE: &str = "Unable to fetch emails. Please try again later.";
pub const DETAIL_ERROR_MESSAGE: &str = "Unable to load this email. Please try again later.";

pub type RequestId = u64;

pub struct Outcome<T> {
    pub id: RequestId,
    pub result: Result<T, FetchError>,
}

pub(crate) struct Dispatcher<T> {
    tx: Sender<Outcome<T>>,
    rx: Receiver<Outcome<T>>,
    latest: RequestId,
}

impl<T: Send + 'static> Dispatcher<T> {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, latest: 0 }
    }

    pub(crate) fn spawn<F>(&mut self, job: F) -> RequestId
    where
        F: FnOnce() -> Result<T, FetchError> + Send + 'static,
    {
        self.latest += 1;
        let id = self.latest;
        let tx = self.tx.clone();
        thread::spawn(move || {
            // receiver gone means the view was dropped
            let _ = tx.send(Outcome { id, result: job() });
        });
        id
    }

    /// Make every outstanding request stale.
    pub(crate) fn supersede(&mut self) {
        self.latest += 1;
    }

    pub(crate) fn is_current(&self, id: RequestId) -> bool {
        id == self.latest
    }

    pub(crate) fn latest(&self) -> RequestId {
        self.latest
    }

    pub(crate) fn try_next(&self) -> Option<Outcome<T>> {
        match self.rx.try_recv() {
            Ok(o) => Some(o),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub(crate) fn next_timeout(&self, timeout: Duration) -> Option<Outcome<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(o) => Some(o),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
