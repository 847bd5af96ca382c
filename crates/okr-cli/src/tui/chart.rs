//! Bar chart widget for [`TrendChart`] with a dashed target row.
//!
//! Bars are drawn bottom-up with eighth-block glyphs, so a chart five rows
//! tall resolves forty height steps. The target line is drawn as `╌` on
//! every blank cell of the row it falls in, labelled `Target` at the right
//! edge when there is room.

use okr_core::chart::{BarTone, TrendChart};
use okr_core::format;
use okr_core::model::StatusTone;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    widgets::Widget,
};

const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const TARGET_GLYPH: char = '╌';
const TARGET_LABEL: &str = "Target";

pub fn tone_color(tone: StatusTone) -> Color {
    let (r, g, b) = tone.rgb();
    Color::Rgb(r, g, b)
}

pub fn bar_color(tone: BarTone) -> Color {
    match tone {
        BarTone::Neutral => Color::Rgb(0x94, 0xA3, 0xB8),
        BarTone::Actual => Color::Rgb(0x3B, 0x82, 0xF6),
        BarTone::Status(status) => tone_color(status),
    }
}

pub struct TrendChartWidget<'a> {
    chart: &'a TrendChart,
    axis: bool,
    period_labels: bool,
}

impl<'a> TrendChartWidget<'a> {
    pub const fn new(chart: &'a TrendChart) -> Self {
        Self {
            chart,
            axis: false,
            period_labels: false,
        }
    }

    /// Reserve a left gutter for the y-axis maximum and target values.
    pub const fn axis(mut self, on: bool) -> Self {
        self.axis = on;
        self
    }

    /// Reserve the bottom row for month labels.
    pub const fn period_labels(mut self, on: bool) -> Self {
        self.period_labels = on;
        self
    }
}

/// `2025-07` → `07`; anything without a dash is kept whole.
fn short_period(period: &str) -> &str {
    period.rsplit_once('-').map_or(period, |(_, tail)| tail)
}

/// Eighths of a cell filled in `row` (0 = bottom) for a bar `eighths` tall.
const fn fill_for_row(eighths: u32, row: u32) -> usize {
    let base = row * 8;
    if eighths <= base {
        0
    } else if eighths - base >= 8 {
        8
    } else {
        (eighths - base) as usize
    }
}

fn scaled(value: f64, max: f64, steps: u32) -> u32 {
    if max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return 0;
    }
    // Clamped to 0..=steps before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ((value / max).min(1.0) * f64::from(steps)).round() as u32;
    n
}

fn put(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
        cell.set_char(ch).set_style(style);
    }
}

fn put_str(buf: &mut Buffer, x: u16, y: u16, text: &str, max_x: u16, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        let Ok(offset) = u16::try_from(i) else { break };
        let cx = x.saturating_add(offset);
        if cx >= max_x {
            break;
        }
        put(buf, cx, y, ch, style);
    }
}

impl Widget for TrendChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let dim = Style::default().fg(Color::DarkGray);

        let max = self.chart.y_max();
        let gutter_text = format::compact(max);
        let gutter = if self.axis {
            u16::try_from(gutter_text.chars().count() + 1).unwrap_or(0)
        } else {
            0
        };
        let label_rows = u16::from(self.period_labels && area.height > 2);
        let plot = Rect {
            x: area.x + gutter.min(area.width),
            y: area.y,
            width: area.width.saturating_sub(gutter),
            height: area.height - label_rows,
        };
        if plot.width == 0 || plot.height == 0 {
            return;
        }

        if self.chart.is_empty() {
            put_str(buf, plot.x, plot.y, "no data", plot.right(), dim);
            return;
        }

        // Keep the most recent periods when the plot is too narrow.
        let fit = usize::from(plot.width);
        let skip = self.chart.bars.len().saturating_sub(fit);
        let bars = &self.chart.bars[skip..];
        let slot = (plot.width / u16::try_from(bars.len()).unwrap_or(u16::MAX)).max(1);
        let bar_w = if slot >= 3 { slot - 1 } else { slot };

        let steps = u32::from(plot.height) * 8;
        let bottom = plot.bottom() - 1;
        for (i, bar) in bars.iter().enumerate() {
            let Ok(i) = u16::try_from(i) else { break };
            let x0 = plot.x + i * slot;
            let style = Style::default().fg(bar_color(bar.tone));
            let eighths = scaled(bar.value, max, steps);
            for row in 0..plot.height {
                let glyph = EIGHTHS[fill_for_row(eighths, u32::from(row))];
                if glyph == ' ' {
                    continue;
                }
                for dx in 0..bar_w {
                    if x0 + dx < plot.right() {
                        put(buf, x0 + dx, bottom - row, glyph, style);
                    }
                }
            }
            if label_rows == 1 {
                put_str(
                    buf,
                    x0,
                    plot.bottom(),
                    short_period(&bar.period),
                    (x0 + slot).min(plot.right()),
                    dim,
                );
            }
        }

        let target_rows = scaled(self.chart.target_line, max, u32::from(plot.height));
        let target_row = u16::try_from(target_rows.saturating_sub(1)).unwrap_or(0);
        let target_y = bottom - target_row.min(plot.height - 1);
        let target_style = Style::default().fg(Color::Gray);
        for x in plot.x..plot.right() {
            let blank = buf
                .cell(Position::new(x, target_y))
                .is_none_or(|cell| cell.symbol() == " ");
            if blank {
                put(buf, x, target_y, TARGET_GLYPH, target_style);
            }
        }
        let label_len = u16::try_from(TARGET_LABEL.len()).unwrap_or(u16::MAX);
        let label_x = plot.right().saturating_sub(label_len);
        let label_fits = plot.width > label_len * 2
            && (label_x..plot.right()).all(|x| {
                buf.cell(Position::new(x, target_y))
                    .is_some_and(|cell| cell.symbol().starts_with(TARGET_GLYPH))
            });
        if label_fits {
            put_str(buf, label_x, target_y, TARGET_LABEL, plot.right(), target_style);
        }

        if self.axis {
            put_str(buf, area.x, plot.y, &gutter_text, plot.x, dim);
            let target_text = format::compact(self.chart.target_line);
            if target_y != plot.y {
                put_str(buf, area.x, target_y, &target_text, plot.x, target_style);
            }
            put_str(buf, area.x, bottom, "0", plot.x, dim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okr_core::Dataset;
    use okr_core::chart::{full_chart, mini_chart};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| {
                buf.cell(Position::new(x, y))
                    .map_or(" ", |cell| cell.symbol())
                    .to_string()
            })
            .collect()
    }

    fn kr_chart(id: &str, full: bool) -> TrendChart {
        let data = Dataset::sample();
        let kr = data.key_result(id).unwrap();
        if full { full_chart(kr) } else { mini_chart(kr) }
    }

    #[test]
    fn fill_for_row_splits_eighths() {
        assert_eq!(fill_for_row(20, 0), 8);
        assert_eq!(fill_for_row(20, 1), 8);
        assert_eq!(fill_for_row(20, 2), 4);
        assert_eq!(fill_for_row(20, 3), 0);
    }

    #[test]
    fn short_period_keeps_month() {
        assert_eq!(short_period("2025-07"), "07");
        assert_eq!(short_period("Q3"), "Q3");
    }

    #[test]
    fn tallest_bar_reaches_top_row() {
        let chart = kr_chart("KR-5", false);
        let area = Rect::new(0, 0, 18, 4);
        let mut buf = Buffer::empty(area);
        TrendChartWidget::new(&chart).render(area, &mut buf);
        // Last of six bars sits in slot 5 (slot width 3, bar width 2).
        let top = row_text(&buf, 0);
        assert_eq!(top.chars().nth(15), Some('█'));
        let cell = buf.cell(Position::new(15, 3)).unwrap();
        assert_eq!(cell.fg, tone_color(StatusTone::Green));
        let first = buf.cell(Position::new(0, 3)).unwrap();
        assert_eq!(first.fg, bar_color(BarTone::Neutral));
    }

    #[test]
    fn target_row_is_dashed_and_labelled() {
        let chart = kr_chart("KR-3", true);
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        TrendChartWidget::new(&chart).render(area, &mut buf);
        // Target 9000 is the axis max, so the line sits on the top row.
        let top = row_text(&buf, 0);
        assert!(top.contains(TARGET_GLYPH));
        assert!(top.ends_with(TARGET_LABEL));
    }

    #[test]
    fn axis_and_period_labels_reserve_space() {
        let chart = kr_chart("KR-2", true);
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        TrendChartWidget::new(&chart)
            .axis(true)
            .period_labels(true)
            .render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with("371"));
        let labels = row_text(&buf, 7);
        assert!(labels.contains("07"));
        assert!(labels.contains("12"));
        assert!(row_text(&buf, 6).starts_with('0'));
    }

    #[test]
    fn narrow_area_keeps_latest_bars() {
        let chart = kr_chart("KR-1", false);
        let area = Rect::new(0, 0, 4, 3);
        let mut buf = Buffer::empty(area);
        TrendChartWidget::new(&chart).render(area, &mut buf);
        // The status-colored last bar is the rightmost column.
        let cell = buf.cell(Position::new(3, 2)).unwrap();
        assert_eq!(cell.fg, tone_color(StatusTone::Green));
    }

    #[test]
    fn empty_chart_says_so() {
        let mut chart = kr_chart("KR-4", false);
        chart.bars.clear();
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        TrendChartWidget::new(&chart).render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with("no data"));
    }
}
