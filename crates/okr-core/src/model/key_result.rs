use serde::{Deserialize, Serialize};

use super::Status;

/// One labeled data point in a key result's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    pub value: f64,
    pub target: f64,
}

/// A dated free-text note attached to a key result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub date: String,
    pub text: String,
}

impl Note {
    /// `date: text`, as shown in the notes list.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.date, self.text)
    }
}

/// A measurable metric belonging to one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: String,
    pub objective_id: String,
    pub title: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: Status,
    pub target: f64,
    pub current: f64,
    /// Signed percentage difference between `current` and `target`.
    #[serde(default)]
    pub delta_to_target_pct: f64,
    #[serde(default)]
    pub series: Vec<SeriesPoint>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl KeyResult {
    /// Reference line for charts: the most recent period's target, or the
    /// nominal target when the series is empty.
    #[must_use]
    pub fn target_line_value(&self) -> f64 {
        self.series.last().map_or(self.target, |point| point.target)
    }
}
