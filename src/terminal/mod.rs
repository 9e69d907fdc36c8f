pub mod events;
pub mod state;
pub mod ui;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;

use crate::api::InboxApi;
use crate::domain::query::{FilterKeyword, Limit};
use crate::terminal::state::AppState;

const TICK: Duration = Duration::from_millis(100);

pub fn run_tui(api: Arc<dyn InboxApi>, filter: FilterKeyword, limit: Limit) -> Result<()> {
    color_eyre::install().map_err(|e| anyhow!("{e}"))?;

    let mut state = AppState::new(api, filter, limit);
    let terminal = ratatui::init();
    let result = run(terminal, &mut state);
    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, state: &mut AppState) -> Result<()> {
    state.mount();

    loop {
        state.poll();
        terminal.draw(|f| ui::render(f, state))?;

        // wake up regularly so finished requests show without a key press
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && events::handle_key(key, state)
        {
            break;
        }
    }
    Ok(())
}
