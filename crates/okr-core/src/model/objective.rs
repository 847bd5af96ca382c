use serde::{Deserialize, Serialize};

use super::Status;

/// A top-level goal tracked for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: Status,
    /// Overall completion, 0 to 100.
    #[serde(default)]
    pub progress_pct: f64,
    /// Declared key-result membership. Not authoritative: membership is
    /// always resolved by scanning `KeyResult::objective_id`.
    #[serde(default, rename = "krs", skip_serializing_if = "Option::is_none")]
    pub declared_krs: Option<Vec<String>>,
}

impl Objective {
    /// Progress clamped to the 0..=100 gauge range.
    #[must_use]
    pub fn progress_percent(&self) -> u16 {
        if self.progress_pct.is_nan() {
            return 0;
        }
        // Clamped to 0..=100 first, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = self.progress_pct.round().clamp(0.0, 100.0) as u16;
        pct
    }
}
