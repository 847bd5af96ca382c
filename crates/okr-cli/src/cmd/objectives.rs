//! `okr objectives`: list objectives with status and progress.

use crate::output::{OutputMode, Renderable, render_list};
use clap::Args;
use okr_core::AppState;
use okr_core::config::EffectiveConfig;
use okr_core::derive::{self, ObjectiveView};
use okr_core::model::Status;
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug, Default)]
pub struct ObjectivesArgs {
    /// Only list objectives with this status, e.g. "on track" or `at-risk`.
    #[arg(long, value_name = "STATUS")]
    pub status: Option<Status>,
}

/// One objective row as emitted in every output mode.
#[derive(Debug, Serialize)]
pub struct ObjectiveRow {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub status: Status,
    pub progress_pct: u16,
    /// Key results found by `objective_id` scan.
    pub kr_count: usize,
    /// The objective the dashboard opens on.
    pub selected: bool,
}

impl ObjectiveRow {
    fn from_view(view: &ObjectiveView<'_>, state: &AppState) -> Self {
        let objective = view.objective;
        Self {
            id: objective.id.clone(),
            title: objective.title.clone(),
            owner: objective.owner.clone(),
            status: objective.status,
            progress_pct: objective.progress_percent(),
            kr_count: state.dataset().key_results_for(&objective.id).count(),
            selected: view.is_selected,
        }
    }
}

/// `[#########-----------]` for a 0..=100 percentage.
pub fn progress_bar(pct: u16, width: usize) -> String {
    let filled = usize::from(pct.min(100)) * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

impl Renderable for ObjectiveRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let marker = if self.selected { '>' } else { ' ' };
        writeln!(w, "{marker} {:<7} {}", self.id, self.title)?;
        writeln!(
            w,
            "          {} {:>3}%  {}  owner: {}  krs: {}",
            progress_bar(self.progress_pct, BAR_WIDTH),
            self.progress_pct,
            self.status,
            self.owner,
            self.kr_count
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            if self.selected { "*" } else { "" },
            self.id,
            self.status,
            self.progress_pct,
            self.kr_count,
            self.title
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["SEL", "ID", "STATUS", "PROGRESS", "KRS", "TITLE"]
    }
}

/// Rows in dataset order, optionally restricted to one status.
pub fn objective_rows(state: &AppState, status: Option<Status>) -> Vec<ObjectiveRow> {
    derive::visible_objectives(state)
        .iter()
        .filter(|view| status.is_none_or(|s| view.objective.status == s))
        .map(|view| ObjectiveRow::from_view(view, state))
        .collect()
}

/// Execute `okr objectives`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or output fails.
pub fn run_objectives(
    args: &ObjectivesArgs,
    output: OutputMode,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config)?;
    let state = super::session(dataset, None, config)?;
    let rows = objective_rows(&state, args.status);
    debug!(status = ?args.status, rows = rows.len(), "listing objectives");
    render_list(&rows, output)?;
    Ok(())
}
