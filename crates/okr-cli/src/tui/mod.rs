//! Interactive terminal dashboard.
//!
//! The terminal is put in raw mode on the alternate screen with mouse
//! capture; [`TerminalGuard`] restores it on every exit path, including
//! errors returned from the draw loop.

pub mod chart;
pub mod dashboard;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use okr_core::AppState;
use okr_core::config::{DatasetSource, UiConfig};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tracing::info;

use dashboard::DashboardView;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Run the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be configured or drawing fails.
pub fn run_dashboard(state: AppState, source: DatasetSource, ui: UiConfig) -> Result<()> {
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut view = DashboardView::new(state, source, ui);
    let tick = view.tick();
    info!(objective = view.state().active_objective_id(), "dashboard started");

    while !view.should_quit() {
        terminal.draw(|frame| view.render(frame, frame.area()))?;
        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => view.handle_key(key),
            Event::Mouse(mouse) => view.handle_mouse(mouse),
            _ => {}
        }
    }

    terminal.show_cursor()?;
    drop(guard);
    info!(
        objective = view.state().active_objective_id(),
        drawer = ?view.state().drawer(),
        "dashboard closed"
    );
    Ok(())
}
