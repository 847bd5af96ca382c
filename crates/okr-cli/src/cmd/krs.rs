//! `okr krs`: key results of one objective, as the dashboard grid shows them.

use crate::output::{OutputMode, pretty_section, render_mode};
use clap::Args;
use okr_core::chart::{self, TrendChart};
use okr_core::config::EffectiveConfig;
use okr_core::derive::{self, EMPTY_KRS_NOTICE};
use okr_core::model::{KeyResult, Status};
use okr_core::{AppState, format};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct KrsArgs {
    /// Objective to list; defaults to the configured or first objective.
    #[arg(short, long)]
    pub objective: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KrCard {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub unit: String,
    pub status: Status,
    pub current: f64,
    pub target: f64,
    pub delta_to_target_pct: f64,
    /// `Current`, `Target`, and `Δ to target` labels.
    pub stats: [String; 3],
    pub chart: TrendChart,
}

impl KrCard {
    fn from_kr(kr: &KeyResult) -> Self {
        Self {
            id: kr.id.clone(),
            title: kr.title.clone(),
            owner: kr.owner.clone(),
            unit: kr.unit.clone(),
            status: kr.status,
            current: kr.current,
            target: kr.target,
            delta_to_target_pct: kr.delta_to_target_pct,
            stats: derive::kr_stats(kr),
            chart: chart::mini_chart(kr),
        }
    }
}

/// The grid for the active objective.
#[derive(Debug, Serialize)]
pub struct KrGrid {
    pub objective_id: String,
    pub objective_title: String,
    pub key_results: Vec<KrCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

pub fn kr_grid(state: &AppState) -> KrGrid {
    let key_results: Vec<KrCard> = derive::visible_krs(state)
        .into_iter()
        .map(KrCard::from_kr)
        .collect();
    let objective_title = state
        .dataset()
        .objective(state.active_objective_id())
        .map(|o| o.title.clone())
        .unwrap_or_default();
    KrGrid {
        objective_id: state.active_objective_id().to_string(),
        objective_title,
        notice: key_results.is_empty().then_some(EMPTY_KRS_NOTICE),
        key_results,
    }
}

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One block glyph per bar, scaled against the chart's y-axis maximum.
pub fn sparkline(chart: &TrendChart) -> String {
    let max = chart.y_max();
    chart
        .bars
        .iter()
        .map(|bar| {
            if max <= 0.0 || bar.value <= 0.0 {
                return SPARK[0];
            }
            let ratio = (bar.value / max).clamp(0.0, 1.0);
            // ratio is in 0..=1, so the index is in 0..=7.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = (ratio * 7.0).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

fn render_krs_human(grid: &KrGrid, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} {}", grid.objective_id, grid.objective_title))?;
    if let Some(notice) = grid.notice {
        writeln!(w, "{notice}")?;
        return Ok(());
    }
    for (i, card) in grid.key_results.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "{:<6} {}  ({})", card.id, card.title, card.status)?;
        writeln!(w, "       {}", card.stats.join("   "))?;
        writeln!(
            w,
            "       {}  target {}  owner: {}",
            sparkline(&card.chart),
            format::compact(card.chart.target_line),
            card.owner
        )?;
    }
    Ok(())
}

fn render_krs_text(grid: &KrGrid, w: &mut dyn Write) -> io::Result<()> {
    if let Some(notice) = grid.notice {
        writeln!(w, "{notice}")?;
        return Ok(());
    }
    writeln!(w, "ID\tSTATUS\tCURRENT\tTARGET\tDELTA\tTITLE")?;
    for card in &grid.key_results {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            card.id,
            card.status,
            card.current,
            card.target,
            format::signed_percent(card.delta_to_target_pct),
            card.title
        )?;
    }
    Ok(())
}

/// Execute `okr krs`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded, `--objective` names
/// no objective, or output fails.
pub fn run_krs(args: &KrsArgs, output: OutputMode, config: &EffectiveConfig) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config)?;
    let state = super::session(dataset, args.objective.as_deref(), config)?;
    let grid = kr_grid(&state);
    render_mode(output, &grid, render_krs_text, render_krs_human)
}
