//! `okr show`: the detail drawer for one key result, printed.

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use clap::Args;
use okr_core::config::EffectiveConfig;
use okr_core::derive::{self, KrDetail};
use okr_core::{AppState, OkrError, format};
use std::io::{self, Write};

const TREND_BAR_WIDTH: f64 = 32.0;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Key result ID, e.g. `KR-3`.
    pub id: String,

    /// Objective to select before opening the drawer.
    #[arg(short, long)]
    pub objective: Option<String>,
}

/// Open `id` in the drawer and return its detail.
///
/// # Errors
///
/// Returns [`OkrError::KeyResultNotFound`] when no key result has that id.
pub fn open_detail<'a>(state: &'a mut AppState, id: &str) -> Result<KrDetail<'a>, OkrError> {
    if state.dataset().key_result(id).is_none() {
        return Err(OkrError::KeyResultNotFound(id.to_string()));
    }
    state.open_kr(id);
    derive::kr_detail(state).ok_or_else(|| OkrError::KeyResultNotFound(id.to_string()))
}

fn trend_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    // Bounded by TREND_BAR_WIDTH.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let len = ((value / max).min(1.0) * TREND_BAR_WIDTH).round() as usize;
    "█".repeat(len)
}

fn render_show_human(detail: &KrDetail<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &detail.drawer_title)?;
    for stat in derive::kr_stats(detail.kr) {
        let (key, value) = stat.split_once(": ").unwrap_or((stat.as_str(), ""));
        pretty_kv(w, key, value)?;
    }

    writeln!(w)?;
    pretty_section(
        w,
        &format!(
            "Trend (target line {})",
            format::thousands(detail.target_line_value)
        ),
    )?;
    let max = detail.chart.y_max();
    for bar in &detail.chart.bars {
        let marker = if bar.value >= detail.target_line_value {
            '▲'
        } else {
            '▽'
        };
        writeln!(
            w,
            "{:<8} {:>10} {marker} {}",
            bar.period,
            format::thousands(bar.value),
            trend_bar(bar.value, max)
        )?;
    }
    if detail.chart.is_empty() {
        writeln!(w, "(no series data)")?;
    }

    writeln!(w)?;
    pretty_section(w, "Recent notes")?;
    for line in &detail.note_lines {
        writeln!(w, "{line}")?;
    }
    pretty_rule(w)
}

fn render_show_text(detail: &KrDetail<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", detail.drawer_title)?;
    writeln!(w, "current\t{}", detail.kr.current)?;
    writeln!(w, "target\t{}", detail.kr.target)?;
    writeln!(w, "delta\t{}", detail.delta_label)?;
    writeln!(w, "target_line\t{}", detail.target_line_value)?;
    for bar in &detail.chart.bars {
        writeln!(w, "period\t{}\t{}", bar.period, bar.value)?;
    }
    for line in &detail.note_lines {
        writeln!(w, "note\t{line}")?;
    }
    Ok(())
}

/// Execute `okr show <KR>`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded, the key result does
/// not exist, or output fails.
pub fn run_show(args: &ShowArgs, output: OutputMode, config: &EffectiveConfig) -> anyhow::Result<()> {
    let dataset = super::load_dataset(config)?;
    let mut state = super::session(dataset, args.objective.as_deref(), config)?;
    let detail = open_detail(&mut state, &args.id)?;
    render_mode(output, &detail, |d, w| render_show_text(d, w), |d, w| {
        render_show_human(d, w)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_mode;
    use okr_core::Dataset;
    use okr_core::derive::NO_NOTES_PLACEHOLDER;

    fn render(detail: &KrDetail<'_>, mode: OutputMode) -> String {
        let mut buf = Vec::new();
        write_mode(
            &mut buf,
            mode,
            detail,
            |d, w| render_show_text(d, w),
            |d, w| render_show_human(d, w),
        )
        .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn show_args_take_id_and_objective() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ShowArgs,
        }
        let w = Wrapper::parse_from(["test", "KR-3", "--objective", "OBJ-1"]);
        assert_eq!(w.args.id, "KR-3");
        assert_eq!(w.args.objective.as_deref(), Some("OBJ-1"));
    }

    #[test]
    fn unknown_kr_is_not_found() {
        let mut state = AppState::new(Dataset::sample()).unwrap();
        let err = open_detail(&mut state, "KR-99").unwrap_err();
        assert_eq!(err.error_code().code(), "E3002");
        assert!(!state.drawer().is_open());
    }

    #[test]
    fn unknown_kr_keeps_open_drawer() {
        let mut state = AppState::new(Dataset::sample()).unwrap();
        open_detail(&mut state, "KR-1").unwrap();
        let err = open_detail(&mut state, "KR-99").unwrap_err();
        assert_eq!(err.error_code().code(), "E3002");
        assert_eq!(state.drawer().open_kr_id(), Some("KR-1"));
    }

    #[test]
    fn json_detail_has_last_period_target_line() {
        let mut state = AppState::new(Dataset::sample()).unwrap();
        let detail = open_detail(&mut state, "KR-3").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&detail, OutputMode::Json)).unwrap();
        assert_eq!(json["target_line_value"], 9000.0);
        assert_eq!(json["delta_label"], "-20%");
        assert_eq!(json["kr"]["id"], "KR-3");
        assert_eq!(json["chart"]["target_series"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn pretty_detail_has_sections() {
        let mut state = AppState::new(Dataset::sample()).unwrap();
        let detail = open_detail(&mut state, "KR-1").unwrap();
        let text = render(&detail, OutputMode::Pretty);
        assert!(text.starts_with("Monthly Revenue Growth ($) — Owner: Liam O'Connor  (On Track)"));
        assert!(text.contains("Current:     38,000"));
        assert!(text.contains("Δ to target: +30%"));
        assert!(text.contains("Trend (target line 30,000)"));
        assert!(text.contains("Recent notes"));
        assert!(text.contains("2025-12-10: Q4 promos outperformed forecast (+8%)."));
    }

    #[test]
    fn text_detail_lists_periods_and_placeholder_note() {
        let mut dataset = Dataset::sample();
        for kr in &mut dataset.key_results {
            kr.notes.clear();
        }
        let mut state = AppState::new(dataset).unwrap();
        let detail = open_detail(&mut state, "KR-2").unwrap();
        let text = render(&detail, OutputMode::Text);
        assert!(text.contains("period\t2025-12\t285\n"));
        assert!(text.ends_with(&format!("note\t{NO_NOTES_PLACEHOLDER}\n")));
    }

    #[test]
    fn trend_bar_scales_to_width() {
        assert_eq!(trend_bar(0.0, 10.0), "");
        assert_eq!(trend_bar(10.0, 10.0).chars().count(), 32);
        assert_eq!(trend_bar(5.0, 10.0).chars().count(), 16);
    }
}
