use ratatui::widgets::ListState;
use std::sync::Arc;

use crate::api::InboxApi;
use crate::controller::{DetailFetcher, InboxController};
use crate::domain::email::{EmailId, EmailSummary};
use crate::domain::query::{FilterKeyword, Limit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    ListOnly,
    Split,
}

pub struct AppState {
    pub inbox: InboxController,
    pub detail: DetailFetcher,

    pub list_state: ListState,
    pub body_scroll: u16,

    pub focus: Focus,
    pub mode: ViewMode,

    /// One-off hint shown in the footer until the next key press.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(api: Arc<dyn InboxApi>, filter: FilterKeyword, limit: Limit) -> Self {
        Self {
            inbox: InboxController::with_defaults(Arc::clone(&api), filter, limit),
            detail: DetailFetcher::new(api),
            list_state: ListState::default(),
            body_scroll: 0,
            focus: Focus::List,
            mode: ViewMode::ListOnly,
            notice: None,
        }
    }

    pub fn items(&self) -> &[EmailSummary] {
        &self.inbox.state().results
    }

    pub fn mount(&mut self) {
        self.inbox.initialize();
    }

    /// Pull in finished requests. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let list_changed = self.inbox.poll();
        if list_changed {
            self.fix_selection();
        }
        let detail_changed = self.detail.poll();
        list_changed || detail_changed
    }

    fn fix_selection(&mut self) {
        let len = self.items().len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.items().is_empty() {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let len = self.items().len() as i32;
        let next = (cur + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.items().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.items().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    // Selectors are locked while a listing is in flight.

    pub fn cycle_filter(&mut self, forward: bool) {
        if self.inbox.state().is_loading() {
            return;
        }
        let next = self.inbox.state().filter.cycle(forward);
        self.inbox.select_filter(next);
        self.list_state.select(Some(0));
    }

    pub fn cycle_limit(&mut self, forward: bool) {
        if self.inbox.state().is_loading() {
            return;
        }
        let next = self.inbox.state().limit.cycle(forward);
        self.inbox.select_limit(next);
    }

    pub fn refresh(&mut self) {
        if self.inbox.state().is_loading() {
            return;
        }
        self.inbox.refresh();
    }

    pub fn current_selected_id(&self) -> Option<EmailId> {
        let idx = self.list_state.selected()?;
        self.items().get(idx)?.email_id.clone()
    }

    pub fn open_selected(&mut self) {
        if self.list_state.selected().is_none() {
            return;
        }
        let Some(id) = self.current_selected_id() else {
            self.notice = Some("This email has no id; the server cannot return its details.".into());
            return;
        };
        self.mode = ViewMode::Split;
        self.focus = Focus::Body;
        self.body_scroll = 0;
        self.detail.select(Some(id));
    }

    pub fn close_email(&mut self) {
        self.mode = ViewMode::ListOnly;
        self.focus = Focus::List;
        self.body_scroll = 0;
        self.detail.select(None);
    }

    pub fn toggle_focus(&mut self) {
        if self.mode != ViewMode::Split {
            return;
        }
        self.focus = match self.focus {
            Focus::List => Focus::Body,
            Focus::Body => Focus::List,
        };
    }

    pub fn scroll_body(&mut self, delta: i32) {
        if self.mode != ViewMode::Split {
            return;
        }
        if delta < 0 {
            self.body_scroll = self.body_scroll.saturating_sub((-delta) as u16);
        } else {
            self.body_scroll = self.body_scroll.saturating_add(delta as u16);
        }
    }
}
