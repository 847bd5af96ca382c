//! Pure projections of [`AppState`] consumed by every renderer.
//!
//! Nothing here mutates state; renderers call these on every frame.

use serde::Serialize;

use crate::chart::{self, TrendChart};
use crate::format;
use crate::model::{KeyResult, Objective};
use crate::store::AppState;

/// Shown instead of the key-result grid when the active objective has none.
pub const EMPTY_KRS_NOTICE: &str = "No Key Results defined for this Objective.";

/// Single notes entry shown when a key result has no notes.
pub const NO_NOTES_PLACEHOLDER: &str = "No notes yet.";

/// One objective card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveView<'a> {
    #[serde(flatten)]
    pub objective: &'a Objective,
    pub is_selected: bool,
}

/// Drawer payload for the open key result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KrDetail<'a> {
    pub kr: &'a KeyResult,
    /// `"{title} — Owner: {owner}  ({status})"`.
    pub drawer_title: String,
    /// Sign-forced delta, e.g. `+30%`.
    pub delta_label: String,
    /// Reference line: last period's target, else the nominal target.
    pub target_line_value: f64,
    /// `date: text` lines, or the single [`NO_NOTES_PLACEHOLDER`].
    pub note_lines: Vec<String>,
    pub chart: TrendChart,
}

/// Objectives in dataset order; exactly one is selected.
#[must_use]
pub fn visible_objectives(state: &AppState) -> Vec<ObjectiveView<'_>> {
    let active = state.active_objective_id();
    state
        .dataset()
        .objectives
        .iter()
        .map(|objective| ObjectiveView {
            objective,
            is_selected: objective.id == active,
        })
        .collect()
}

/// Key results of the active objective, in dataset order. May be empty.
#[must_use]
pub fn visible_krs(state: &AppState) -> Vec<&KeyResult> {
    state
        .dataset()
        .key_results_for(state.active_objective_id())
        .collect()
}

/// Detail for the key result in the open drawer, `None` when closed.
#[must_use]
pub fn kr_detail(state: &AppState) -> Option<KrDetail<'_>> {
    let kr_id = state.drawer().open_kr_id()?;
    let kr = state.dataset().key_result(kr_id)?;
    Some(detail_for(kr))
}

/// Build the drawer payload for any key result.
#[must_use]
pub fn detail_for(kr: &KeyResult) -> KrDetail<'_> {
    let note_lines = if kr.notes.is_empty() {
        vec![NO_NOTES_PLACEHOLDER.to_string()]
    } else {
        kr.notes.iter().map(crate::model::Note::display_line).collect()
    };
    KrDetail {
        kr,
        drawer_title: format!("{} — Owner: {}  ({})", kr.title, kr.owner, kr.status),
        delta_label: format::signed_percent(kr.delta_to_target_pct),
        target_line_value: kr.target_line_value(),
        note_lines,
        chart: chart::full_chart(kr),
    }
}

/// `Current: 38,000`, `Target: 30,000`, `Δ to target: +30%` card stats.
#[must_use]
pub fn kr_stats(kr: &KeyResult) -> [String; 3] {
    [
        format!("Current: {}", format::thousands(kr.current)),
        format!("Target: {}", format::thousands(kr.target)),
        format!(
            "Δ to target: {}",
            format::signed_percent(kr.delta_to_target_pct)
        ),
    ]
}
