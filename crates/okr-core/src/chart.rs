//! Chart data shaping for key-result trend charts.
//!
//! Two shapes exist. The mini chart on each key-result card colors its last
//! bar by status and every earlier bar neutral, with a dashed reference line
//! at [`KeyResult::target_line_value`]. The full chart in the drawer draws
//! every bar as "actual" and replicates the reference target across all
//! periods as a line series.

use serde::Serialize;

use crate::model::{KeyResult, StatusTone};

/// Fill slot for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tone", content = "status", rename_all = "snake_case")]
pub enum BarTone {
    /// Earlier periods on a mini chart.
    Neutral,
    /// Every bar on the full chart.
    Actual,
    /// The latest period on a mini chart.
    Status(StatusTone),
}

impl BarTone {
    /// Hex color for web-style renderers and JSON consumers.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Neutral => "#94A3B8",
            Self::Actual => "#3B82F6",
            Self::Status(tone) => tone.hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub period: String,
    pub value: f64,
    pub tone: BarTone,
    /// [`BarTone::hex`] of `tone`, for renderers without a palette.
    pub color: &'static str,
}

impl ChartBar {
    fn new(period: &str, value: f64, tone: BarTone) -> Self {
        Self {
            period: period.to_string(),
            value,
            tone,
            color: tone.hex(),
        }
    }
}

/// Renderer-independent chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub title: Option<String>,
    pub bars: Vec<ChartBar>,
    /// Height of the dashed reference line.
    pub target_line: f64,
    /// Per-period target series; empty on mini charts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_series: Vec<f64>,
}

impl TrendChart {
    /// Upper bound of the value axis: the largest bar or the target line.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.value)
            .fold(self.target_line, f64::max)
            .max(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Card-sized chart: status-colored last bar, neutral history.
#[must_use]
pub fn mini_chart(kr: &KeyResult) -> TrendChart {
    let last = kr.series.len().saturating_sub(1);
    let bars = kr
        .series
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let tone = if index == last {
                BarTone::Status(kr.status.tone())
            } else {
                BarTone::Neutral
            };
            ChartBar::new(&point.period, point.value, tone)
        })
        .collect();
    TrendChart {
        title: None,
        bars,
        target_line: kr.target_line_value(),
        target_series: Vec::new(),
    }
}

/// Drawer-sized chart: actual bars plus a replicated target line series.
#[must_use]
pub fn full_chart(kr: &KeyResult) -> TrendChart {
    let target = kr.target_line_value();
    let bars: Vec<ChartBar> = kr
        .series
        .iter()
        .map(|point| ChartBar::new(&point.period, point.value, BarTone::Actual))
        .collect();
    let target_series = vec![target; bars.len()];
    TrendChart {
        title: Some(kr.title.clone()),
        bars,
        target_line: target,
        target_series,
    }
}
