//! Tagged UI intents and click-batch resolution.
//!
//! Every interaction that can change selection state arrives as a
//! [`UiEvent`]: which control fired, the id it carries, and when. The TUI
//! builds these from key presses and mouse clicks; `okr replay` reads them
//! from a JSON-lines log.

use serde::{Deserialize, Serialize};

use crate::error::OkrError;

/// Which control produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An objective card was clicked; `id` is the objective id.
    ObjectiveClick,
    /// A key result's "Open details" control was clicked; `id` is the KR id.
    OpenKrClick,
    /// The drawer close control was used; `id` is ignored.
    CloseDrawer,
}

/// A single user intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl UiEvent {
    #[must_use]
    pub fn objective_click(id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            kind: EventKind::ObjectiveClick,
            id: id.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn open_kr_click(id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            kind: EventKind::OpenKrClick,
            id: id.into(),
            timestamp,
        }
    }

    #[must_use]
    pub const fn close_drawer(timestamp: i64) -> Self {
        Self {
            kind: EventKind::CloseDrawer,
            id: String::new(),
            timestamp,
        }
    }

    /// Stamp an event with the current wall-clock time.
    #[must_use]
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Index of the most recent click in a batch of per-control timestamps.
///
/// The maximum timestamp wins; on an exact tie the lowest index wins.
/// Controls that never fired (`None`) are never chosen, so an all-`None`
/// or empty batch yields `None`, meaning "no update".
#[must_use]
pub fn latest_click_index(timestamps: &[Option<i64>]) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (index, ts) in timestamps.iter().enumerate() {
        let Some(ts) = *ts else { continue };
        match best {
            Some((_, best_ts)) if ts <= best_ts => {}
            _ => best = Some((index, ts)),
        }
    }
    best.map(|(index, _)| index)
}

/// Parse a JSON-lines event log. Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns [`OkrError::EventLogParse`] with the 1-based line number of the
/// first malformed entry.
pub fn parse_event_log(text: &str) -> Result<Vec<UiEvent>, OkrError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str::<UiEvent>(line).map_err(|e| OkrError::EventLogParse {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_click_picks_max_timestamp() {
        assert_eq!(latest_click_index(&[None, Some(5), Some(3)]), Some(1));
    }

    #[test]
    fn latest_click_none_when_nothing_fired() {
        assert_eq!(latest_click_index(&[None, None, None]), None);
        assert_eq!(latest_click_index(&[]), None);
    }

    #[test]
    fn latest_click_tie_goes_to_lowest_index() {
        assert_eq!(latest_click_index(&[Some(7), None, Some(7)]), Some(0));
        assert_eq!(latest_click_index(&[None, Some(2), Some(2)]), Some(1));
    }

    #[test]
    fn unfired_controls_never_win_over_zero() {
        assert_eq!(latest_click_index(&[None, Some(0)]), Some(1));
        assert_eq!(latest_click_index(&[None, Some(-4)]), Some(1));
    }

    #[test]
    fn event_json_is_tagged_by_kind() {
        let event = UiEvent::open_kr_click("KR-3", 1_700_000_000_000);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"open_kr_click","id":"KR-3","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn parse_event_log_skips_blanks_and_comments() {
        let log = r#"
# select the second objective
{"kind":"objective_click","id":"OBJ-2","timestamp":10}

{"kind":"close_drawer","timestamp":11}
"#;
        let events = parse_event_log(log).unwrap();
        assert_eq!(
            events,
            vec![UiEvent::objective_click("OBJ-2", 10), UiEvent::close_drawer(11)]
        );
    }

    #[test]
    fn parse_event_log_reports_line_number() {
        let log = "{\"kind\":\"objective_click\",\"id\":\"OBJ-1\",\"timestamp\":1}\n{\"kind\":\"hover\"}\n";
        let err = parse_event_log(log).unwrap_err();
        assert!(matches!(err, OkrError::EventLogParse { line: 2, .. }));
    }
}
