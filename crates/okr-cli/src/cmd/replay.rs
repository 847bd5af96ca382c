//! `okr replay`: feed a JSON-lines event log through the selection store.
//!
//! Each line is a [`UiEvent`]:
//!
//! ```text
//! {"kind":"objective_click","id":"OBJ-2","timestamp":1733990400000}
//! {"kind":"open_kr_click","id":"KR-3","timestamp":1733990401000}
//! {"kind":"close_drawer","timestamp":1733990402000}
//! ```

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Context;
use chrono::DateTime;
use clap::Args;
use okr_core::config::EffectiveConfig;
use okr_core::derive;
use okr_core::event::parse_event_log;
use okr_core::{AppState, Drawer, EventKind, UiEvent};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Event log file; `-` reads stdin.
    pub file: PathBuf,

    /// Print the state after every event, not only the final state.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Debug, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub kind: EventKind,
    pub id: String,
    pub timestamp: i64,
    pub changed: bool,
    pub active_objective_id: String,
    pub drawer: Drawer,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub changed: usize,
    pub active_objective_id: String,
    /// Key result ids shown for the final objective.
    pub visible_krs: Vec<String>,
    pub drawer: Drawer,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ReplayStep>,
}

/// Apply `events` in order and summarize the result.
pub fn replay(state: &mut AppState, events: &[UiEvent], trace: bool) -> ReplayReport {
    let mut steps = Vec::new();
    let mut changed = 0;
    for (index, event) in events.iter().enumerate() {
        let did_change = state.apply(event);
        debug!(index, kind = ?event.kind, id = %event.id, changed = did_change, "replayed event");
        if did_change {
            changed += 1;
        }
        if trace {
            steps.push(ReplayStep {
                index,
                kind: event.kind,
                id: event.id.clone(),
                timestamp: event.timestamp,
                changed: did_change,
                active_objective_id: state.active_objective_id().to_string(),
                drawer: state.drawer().clone(),
            });
        }
    }
    ReplayReport {
        events: events.len(),
        changed,
        active_objective_id: state.active_objective_id().to_string(),
        visible_krs: derive::visible_krs(state)
            .iter()
            .map(|kr| kr.id.clone())
            .collect(),
        drawer: state.drawer().clone(),
        steps,
    }
}

fn drawer_label(drawer: &Drawer) -> String {
    drawer
        .open_kr_id()
        .map_or_else(|| "closed".to_string(), |id| format!("open ({id})"))
}

/// `HH:MM:SS.mmm` in UTC, or the raw value when out of range.
fn clock(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp).map_or_else(
        || timestamp.to_string(),
        |at| at.format("%H:%M:%S%.3f").to_string(),
    )
}

fn render_replay_human(report: &ReplayReport, w: &mut dyn Write) -> io::Result<()> {
    if !report.steps.is_empty() {
        pretty_section(w, "Steps")?;
        for step in &report.steps {
            let mark = if step.changed { '*' } else { ' ' };
            writeln!(
                w,
                "{mark} #{:<3} {} {:<16} {:<8} -> objective {}, drawer {}",
                step.index,
                clock(step.timestamp),
                format!("{:?}", step.kind),
                step.id,
                step.active_objective_id,
                drawer_label(&step.drawer)
            )?;
        }
        writeln!(w)?;
    }
    pretty_section(w, "Final state")?;
    pretty_kv(w, "Events", report.events.to_string())?;
    pretty_kv(w, "Changed", report.changed.to_string())?;
    pretty_kv(w, "Objective", &report.active_objective_id)?;
    pretty_kv(
        w,
        "Key results",
        if report.visible_krs.is_empty() {
            derive::EMPTY_KRS_NOTICE.to_string()
        } else {
            report.visible_krs.join(", ")
        },
    )?;
    pretty_kv(w, "Drawer", drawer_label(&report.drawer))
}

fn render_replay_text(report: &ReplayReport, w: &mut dyn Write) -> io::Result<()> {
    for step in &report.steps {
        writeln!(
            w,
            "{}\t{}\t{}",
            step.index,
            step.active_objective_id,
            step.drawer.open_kr_id().unwrap_or("-")
        )?;
    }
    writeln!(
        w,
        "{}\t{}\t{}",
        report.active_objective_id,
        report.drawer.open_kr_id().unwrap_or("-"),
        report.visible_krs.join(",")
    )
}

fn read_log(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading event log from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("reading event log {}", path.display()))
}

/// Execute `okr replay <FILE>`.
///
/// # Errors
///
/// Returns an error if the dataset or log cannot be loaded, the log is
/// malformed, or output fails.
pub fn run_replay(
    args: &ReplayArgs,
    output: OutputMode,
    config: &EffectiveConfig,
) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config)?;
    let mut state = super::session(dataset, None, config)?;
    let events = parse_event_log(&read_log(&args.file)?)?;
    let report = replay(&mut state, &events, args.trace);
    render_mode(output, &report, render_replay_text, render_replay_human)
}
