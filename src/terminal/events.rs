use crossterm::event::{KeyCode, KeyEvent};

use crate::terminal::state::{AppState, Focus, ViewMode};

/// Returns true when the app should quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    state.notice = None;

    match key.code {
        KeyCode::Char('q') => return true,

        KeyCode::Esc => {
            if state.mode == ViewMode::Split {
                state.close_email();
                return false;
            }
            return true;
        }

        KeyCode::Enter => {
            state.open_selected();
            return false;
        }

        KeyCode::Tab => {
            state.toggle_focus();
            return false;
        }

        KeyCode::Char('r') => {
            state.refresh();
            return false;
        }

        KeyCode::Char('f') => {
            state.cycle_filter(true);
            return false;
        }
        KeyCode::Char('F') => {
            state.cycle_filter(false);
            return false;
        }

        KeyCode::Char('l') => {
            state.cycle_limit(true);
            return false;
        }
        KeyCode::Char('L') => {
            state.cycle_limit(false);
            return false;
        }

        _ => {}
    }

    match state.focus {
        Focus::List => handle_list_keys(key, state),
        Focus::Body => handle_body_keys(key, state),
    }
    false
}

fn handle_list_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Home => state.select_first(),
        KeyCode::End => state.select_last(),
        _ => {}
    }
}

fn handle_body_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.scroll_body(1),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_body(-1),
        KeyCode::PageDown => state.scroll_body(10),
        KeyCode::PageUp => state.scroll_body(-10),
        KeyCode::Home => state.body_scroll = 0,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InboxApi;
    use crate::controller::testing::RecordingApi;
    use crate::domain::query::{FilterKeyword, Limit};
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> (Arc<RecordingApi>, AppState) {
        let api = Arc::new(RecordingApi::with_rows(2));
        let st = AppState::new(
            Arc::clone(&api) as Arc<dyn InboxApi>,
            FilterKeyword::All,
            Limit::default(),
        );
        (api, st)
    }

    #[test]
    fn q_and_esc_quit_from_list() {
        let (_api, mut st) = state();
        assert!(handle_key(key(KeyCode::Char('q')), &mut st));
        assert!(handle_key(key(KeyCode::Esc), &mut st));
    }

    #[test]
    fn limit_keys_cycle_and_fetch() {
        let (api, mut st) = state();
        assert!(!handle_key(key(KeyCode::Char('l')), &mut st));
        assert_eq!(st.inbox.state().limit.get(), 200);
        assert!(st.inbox.wait_timeout(Duration::from_secs(5)));
        assert!(!handle_key(key(KeyCode::Char('L')), &mut st));
        assert_eq!(st.inbox.state().limit.get(), 100);
        assert!(st.inbox.wait_timeout(Duration::from_secs(5)));
        assert_eq!(api.list_call_count(), 2);
    }

    #[test]
    fn esc_closes_detail_before_quitting() {
        let (_api, mut st) = state();
        st.mount();
        assert!(st.inbox.wait_timeout(Duration::from_secs(5)));
        st.move_selection(0);
        assert!(!handle_key(key(KeyCode::Enter), &mut st));
        assert_eq!(st.mode, ViewMode::Split);
        assert!(!handle_key(key(KeyCode::Esc), &mut st));
        assert_eq!(st.mode, ViewMode::ListOnly);
    }
}
