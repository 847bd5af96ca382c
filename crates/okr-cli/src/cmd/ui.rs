//! `okr ui`: launch the interactive dashboard.

use crate::tui;
use anyhow::bail;
use clap::Args;
use okr_core::config::EffectiveConfig;
use std::io::{self, IsTerminal};
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct UiArgs {
    /// Objective selected at startup (overrides `default_objective`).
    #[arg(short, long)]
    pub objective: Option<String>,
}

/// Execute `okr ui`.
///
/// # Errors
///
/// Returns an error if stdout is not a terminal, the dataset cannot be
/// loaded, `--objective` names no objective, or the terminal fails.
pub fn run_ui(args: &UiArgs, config: &EffectiveConfig) -> anyhow::Result<()> {
    if !io::stdout().is_terminal() {
        bail!("`okr ui` needs an interactive terminal; use `okr krs` or `okr show` for plain output");
    }
    let dataset = super::load_dataset(config)?;
    let state = super::session(dataset, args.objective.as_deref(), config)?;
    info!(
        source = %config.dataset,
        objective = state.active_objective_id(),
        "launching dashboard"
    );
    tui::run_dashboard(state, config.dataset.clone(), config.ui.clone())
}
