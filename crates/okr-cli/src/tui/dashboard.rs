//! Dashboard view: objective cards, key-result grid, and the detail drawer.
//!
//! Every mouse click and selection key becomes a [`UiEvent`] applied to the
//! owned [`AppState`]; rendering is a pure read of that state through
//! [`okr_core::derive`]. Hit areas for mouse handling are recorded during
//! the last render.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use okr_core::chart;
use okr_core::config::{DatasetSource, UiConfig};
use okr_core::derive::{self, EMPTY_KRS_NOTICE, KrDetail};
use okr_core::model::{KeyResult, Objective, StatusTone};
use okr_core::{AppState, UiEvent, format};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::chart::{TrendChartWidget, tone_color};

const STATUS_TTL: Duration = Duration::from_secs(3);
const KR_COLUMNS: usize = 3;
const OBJECTIVE_CARD_HEIGHT: u16 = 7;
const OPEN_BUTTON: &str = "[ Open details ]";
const CLOSE_MARKER: &str = "[x]";

pub struct DashboardView {
    state: AppState,
    source: DatasetSource,
    ui: UiConfig,
    /// Index into the visible key results.
    kr_focus: usize,
    show_help: bool,
    should_quit: bool,
    status_msg: Option<(String, Instant)>,
    /// Click timestamps must strictly increase within a session.
    last_event_ms: i64,
    objective_hits: Vec<(String, Rect)>,
    kr_card_hits: Vec<(usize, Rect)>,
    open_hits: Vec<(String, Rect)>,
    close_hit: Option<Rect>,
    drawer_area: Option<Rect>,
}

impl DashboardView {
    pub fn new(state: AppState, source: DatasetSource, ui: UiConfig) -> Self {
        Self {
            state,
            source,
            ui: ui.normalized(),
            kr_focus: 0,
            show_help: false,
            should_quit: false,
            status_msg: None,
            last_event_ms: 0,
            objective_hits: Vec::new(),
            kr_card_hits: Vec::new(),
            open_hits: Vec::new(),
            close_hit: None,
            drawer_area: None,
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    fn next_timestamp(&mut self) -> i64 {
        let ts = UiEvent::now_millis().max(self.last_event_ms + 1);
        self.last_event_ms = ts;
        ts
    }

    /// Apply one event to the store, keeping focus in range.
    fn dispatch(&mut self, event: &UiEvent) -> bool {
        let before = self.state.active_objective_id().to_string();
        let changed = self.state.apply(event);
        if self.state.active_objective_id() != before {
            self.kr_focus = 0;
            let title = self
                .state
                .dataset()
                .objective(self.state.active_objective_id())
                .map(|o| o.title.clone())
                .unwrap_or_default();
            self.set_status(format!("Objective: {title}"));
        }
        changed
    }

    fn click_objective_at(&mut self, index: usize) {
        let Some(id) = self
            .state
            .dataset()
            .objectives
            .get(index)
            .map(|o| o.id.clone())
        else {
            debug!(index, "no objective at index");
            return;
        };
        let ts = self.next_timestamp();
        self.dispatch(&UiEvent::objective_click(id, ts));
    }

    fn cycle_objective(&mut self, forward: bool) {
        let len = self.state.dataset().objectives.len();
        let current = self
            .state
            .dataset()
            .objective_index(self.state.active_objective_id())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.click_objective_at(next);
    }

    fn visible_kr_count(&self) -> usize {
        self.state
            .dataset()
            .key_results_for(self.state.active_objective_id())
            .count()
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.visible_kr_count();
        if len == 0 {
            self.kr_focus = 0;
            return;
        }
        self.kr_focus = self
            .kr_focus
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn focused_kr_id(&self) -> Option<String> {
        derive::visible_krs(&self.state)
            .get(self.kr_focus)
            .map(|kr| kr.id.clone())
    }

    fn open_kr(&mut self, id: String) {
        let ts = self.next_timestamp();
        self.dispatch(&UiEvent::open_kr_click(id, ts));
    }

    fn close_drawer(&mut self) {
        let ts = self.next_timestamp();
        self.dispatch(&UiEvent::close_drawer(ts));
    }

    /// Re-read the dataset from its source, keeping selection where possible.
    fn reload(&mut self) {
        let result = self.source.load().and_then(|dataset| {
            self.state
                .replace_dataset(dataset)
                .map_err(anyhow::Error::from)
        });
        match result {
            Ok(()) => {
                self.move_focus(0);
                info!(source = %self.source, "dataset reloaded");
                self.set_status("Dataset reloaded".to_string());
            }
            Err(err) => {
                warn!("dataset reload failed: {err:#}");
                self.set_status(format!("Reload failed: {err:#}"));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(c @ '1'..='9') => {
                let position = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
                if let Some(position) = position {
                    self.click_objective_at(position - 1);
                }
            }
            KeyCode::Tab => self.cycle_objective(true),
            KeyCode::BackTab => self.cycle_objective(false),
            KeyCode::Char('j' | 'l') | KeyCode::Down | KeyCode::Right => self.move_focus(1),
            KeyCode::Char('k' | 'h') | KeyCode::Up | KeyCode::Left => self.move_focus(-1),
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(id) = self.focused_kr_id() {
                    self.open_kr(id);
                }
            }
            KeyCode::Esc | KeyCode::Char('x') => self.close_drawer(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let pos = Position::new(mouse.column, mouse.row);
                if self.show_help {
                    self.show_help = false;
                    return;
                }
                if self.close_hit.is_some_and(|r| r.contains(pos)) {
                    self.close_drawer();
                    return;
                }
                if self.drawer_area.is_some_and(|r| r.contains(pos)) {
                    return;
                }
                if let Some(id) = hit(&self.objective_hits, pos) {
                    let ts = self.next_timestamp();
                    self.dispatch(&UiEvent::objective_click(id, ts));
                    return;
                }
                if let Some(id) = hit(&self.open_hits, pos) {
                    self.open_kr(id);
                    return;
                }
                if let Some(index) = hit(&self.kr_card_hits, pos) {
                    self.kr_focus = index;
                }
            }
            MouseEventKind::ScrollDown => self.move_focus(1),
            MouseEventKind::ScrollUp => self.move_focus(-1),
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        self.objective_hits.clear();
        self.kr_card_hits.clear();
        self.open_hits.clear();
        self.close_hit = None;
        self.drawer_area = None;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(OBJECTIVE_CARD_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(frame, &self.state, chunks[0]);
        self.render_objectives(frame, chunks[1]);
        self.render_kr_grid(frame, chunks[2]);

        let content = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        if let Some(detail) = derive::kr_detail(&self.state) {
            let (drawer, close) = render_drawer(frame, &detail, content, self.ui.drawer_percent);
            self.drawer_area = Some(drawer);
            self.close_hit = Some(close);
        }
        if self.show_help {
            render_help_overlay(frame, content);
        }
        frame.render_widget(Paragraph::new(self.status_line()), chunks[3]);
    }

    fn render_objectives(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let views = derive::visible_objectives(&self.state);
        let count = u32::try_from(views.len()).unwrap_or(u32::MAX).max(1);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(views.iter().map(|_| Constraint::Ratio(1, count)))
            .split(area);
        for (index, (view, cell)) in views.iter().zip(cells.iter()).enumerate() {
            render_objective_card(frame, view.objective, view.is_selected, index, *cell);
            self.objective_hits.push((view.objective.id.clone(), *cell));
        }
    }

    fn render_kr_grid(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let krs = derive::visible_krs(&self.state);
        if krs.is_empty() {
            let notice = Paragraph::new(EMPTY_KRS_NOTICE)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL).border_set(border::ROUNDED));
            frame.render_widget(notice, Rect { height: 3.min(area.height), ..area });
            return;
        }

        let card_h = self.ui.mini_chart_height + 5;
        let rows_fit = usize::from((area.height / card_h).max(1));
        let focus_row = self.kr_focus / KR_COLUMNS;
        let first_row = focus_row.saturating_sub(rows_fit - 1);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints((0..rows_fit).map(|_| Constraint::Length(card_h)))
            .split(area);
        for (slot, row_area) in row_areas.iter().enumerate() {
            let start = (first_row + slot) * KR_COLUMNS;
            if start >= krs.len() {
                break;
            }
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3); KR_COLUMNS])
                .split(*row_area);
            for (offset, col) in cols.iter().enumerate() {
                let index = start + offset;
                let Some(kr) = krs.get(index) else { break };
                let button = render_kr_card(
                    frame,
                    kr,
                    index == self.kr_focus,
                    self.ui.mini_chart_height,
                    *col,
                );
                self.kr_card_hits.push((index, *col));
                if let Some(button) = button {
                    self.open_hits.push((kr.id.clone(), button));
                }
            }
        }
    }

    fn status_line(&self) -> Line<'static> {
        if let Some((msg, at)) = &self.status_msg
            && at.elapsed() < STATUS_TTL
        {
            return Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
        }
        let key = Style::default().fg(Color::Cyan);
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (k, label) in [
            ("1-9/Tab", " objective  "),
            ("j/k", " focus  "),
            ("Enter", " details  "),
            ("Esc", " close  "),
            ("r", " reload  "),
            ("?", " help  "),
            ("q", " quit"),
        ] {
            spans.push(Span::styled(k, key));
            spans.push(Span::styled(label, dim));
        }
        Line::from(spans)
    }
}

fn hit<T: Clone>(hits: &[(T, Rect)], pos: Position) -> Option<T> {
    hits.iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(value, _)| value.clone())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_header(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Objectives & Key Results",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);

    let badge = Paragraph::new(Line::from(Span::styled(
        format!(" Period: {} ", state.dataset().period),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(badge, area);
}

fn render_objective_card(
    frame: &mut Frame<'_>,
    objective: &Objective,
    selected: bool,
    index: usize,
    area: Rect,
) {
    let border_style = if selected {
        Style::default()
            .fg(tone_color(StatusTone::Green))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(if selected { border::THICK } else { border::ROUNDED })
        .border_style(border_style)
        .title(format!(" {} ", index + 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let width = usize::from(inner.width);
    let lines = vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(tone_color(objective.status.tone()))),
            Span::styled(objective.status.to_string(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            truncate(&objective.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            objective.description.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let text_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);

    let pct = objective.progress_percent();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .percent(pct)
        .label(format!("{pct}%"));
    frame.render_widget(
        gauge,
        Rect {
            y: inner.bottom() - 1,
            height: 1,
            ..inner
        },
    );
}

/// Draw one key-result card; returns the "Open details" button area.
fn render_kr_card(
    frame: &mut Frame<'_>,
    kr: &KeyResult,
    focused: bool,
    chart_height: u16,
    area: Rect,
) -> Option<Rect> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(Span::styled(
            format!(" {} ", truncate(&kr.title, usize::from(area.width.saturating_sub(4)))),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 3 || inner.width == 0 {
        return None;
    }

    let tone = tone_color(kr.status.tone());
    let badge = Line::from(vec![
        Span::styled(
            format!(" {} ", kr.status),
            Style::default().fg(Color::Black).bg(tone),
        ),
        Span::styled(format!("  {}", kr.owner), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(badge), Rect { height: 1, ..inner });

    let stats = derive::kr_stats(kr).join("  ");
    frame.render_widget(
        Paragraph::new(Span::styled(stats, Style::default().fg(Color::Gray))),
        Rect {
            y: inner.y + 1,
            height: 1,
            ..inner
        },
    );

    let chart_area = Rect {
        y: inner.y + 2,
        height: chart_height.min(inner.height.saturating_sub(3)),
        ..inner
    };
    let mini = chart::mini_chart(kr);
    frame.render_widget(TrendChartWidget::new(&mini), chart_area);

    let label_w = u16::try_from(OPEN_BUTTON.len()).unwrap_or(u16::MAX);
    let button = Rect {
        x: inner.x,
        y: inner.bottom() - 1,
        width: label_w.min(inner.width),
        height: 1,
    };
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    frame.render_widget(Paragraph::new(Span::styled(OPEN_BUTTON, style)), button);
    Some(button)
}

/// Draw the drawer over the right side of `area`; returns (drawer, close marker).
fn render_drawer(
    frame: &mut Frame<'_>,
    detail: &KrDetail<'_>,
    area: Rect,
    percent: u16,
) -> (Rect, Rect) {
    let width = (u32::from(area.width) * u32::from(percent) / 100)
        .max(20)
        .min(u32::from(area.width));
    let width = u16::try_from(width).unwrap_or(area.width);
    let drawer = Rect {
        x: area.right() - width,
        width,
        ..area
    };
    frame.render_widget(Clear, drawer);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Blue))
        .title(Span::styled(
            format!(" {} ", truncate(&detail.drawer_title, usize::from(width.saturating_sub(8)))),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(drawer);
    frame.render_widget(block, drawer);

    let marker_w = u16::try_from(CLOSE_MARKER.len()).unwrap_or(3);
    let close = Rect {
        x: drawer.right().saturating_sub(marker_w + 1),
        y: drawer.y,
        width: marker_w,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(CLOSE_MARKER, Style::default().fg(Color::Red))),
        close,
    );
    if inner.height < 4 {
        return (drawer, close);
    }

    let muted = Style::default().fg(Color::DarkGray);
    let strong = Style::default().add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::styled("Current ", muted),
        Span::styled(format::thousands(detail.kr.current), strong),
        Span::raw("   "),
        Span::styled("Target ", muted),
        Span::styled(format::thousands(detail.kr.target), strong),
        Span::raw("   "),
        Span::styled("Δ to target ", muted),
        Span::styled(detail.delta_label.clone(), strong),
    ]);
    frame.render_widget(Paragraph::new(header), Rect { height: 1, ..inner });

    let notes_h = u16::try_from(detail.note_lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(1)
        .min(inner.height / 3);
    let chart_h = inner.height.saturating_sub(2 + notes_h);
    let chart_area = Rect {
        y: inner.y + 2,
        height: chart_h,
        ..inner
    };
    frame.render_widget(
        TrendChartWidget::new(&detail.chart)
            .axis(true)
            .period_labels(true),
        chart_area,
    );

    let mut lines = vec![Line::from(Span::styled("Recent notes", strong))];
    lines.extend(
        detail
            .note_lines
            .iter()
            .map(|note| Line::from(format!("• {note}"))),
    );
    let notes_area = Rect {
        y: chart_area.bottom(),
        height: inner.bottom().saturating_sub(chart_area.bottom()),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), notes_area);
    (drawer, close)
}

fn help_hotkeys() -> [(&'static str, &'static str); 9] {
    [
        ("1-9", "select objective by position"),
        ("Tab/S-Tab", "next / previous objective"),
        ("j/k ←/→", "move key-result focus"),
        ("Enter/o", "open details for focused key result"),
        ("Esc/x", "close details drawer"),
        ("r", "reload dataset"),
        ("click", "select objective, open details, [x] close"),
        ("?", "toggle this help"),
        ("q/Ctrl-C", "quit"),
    ]
}

fn render_help_overlay(frame: &mut Frame<'_>, area: Rect) {
    let popup_w = area.width.saturating_sub(8).min(64);
    let popup_h = area.height.saturating_sub(4).min(13);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(popup_w) / 2,
        area.y + area.height.saturating_sub(popup_h) / 2,
        popup_w,
        popup_h,
    );
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(" Hotkeys ");
    let lines: Vec<Line<'static>> = help_hotkeys()
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{key:<12}"), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use okr_core::{Dataset, Drawer};
    use ratatui::{Terminal, backend::TestBackend};

    fn dashboard() -> DashboardView {
        let state = AppState::new(Dataset::sample()).unwrap();
        DashboardView::new(state, DatasetSource::BuiltinSample, UiConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(pos: Position) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: pos.x,
            row: pos.y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(view: &mut DashboardView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| {
                        buffer
                            .cell(Position::new(x, y))
                            .map_or(" ", |cell| cell.symbol())
                            .to_string()
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn center(rect: Rect) -> Position {
        Position::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    #[test]
    fn header_and_first_objective_render() {
        let mut view = dashboard();
        let screen = draw(&mut view);
        assert!(screen.contains("Objectives & Key Results"));
        assert!(screen.contains("Period: 2025-12"));
        assert!(screen.contains("Increase Revenue"));
        assert!(screen.contains("Current: 38,000  Target: 30,000"));
        assert!(screen.contains(OPEN_BUTTON));
    }

    #[test]
    fn number_keys_select_objectives() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('2')));
        assert_eq!(view.state().active_objective_id(), "OBJ-2");
        let screen = draw(&mut view);
        assert!(screen.contains(EMPTY_KRS_NOTICE));

        view.handle_key(key(KeyCode::Char('9')));
        assert_eq!(view.state().active_objective_id(), "OBJ-2");
    }

    #[test]
    fn rapid_selection_keeps_last_choice() {
        let mut view = dashboard();
        for c in ['3', '2', '3', '2'] {
            view.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(view.state().active_objective_id(), "OBJ-2");
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::BackTab));
        assert_eq!(view.state().active_objective_id(), "OBJ-3");
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.state().active_objective_id(), "OBJ-1");
        view.handle_key(key(KeyCode::Tab));
        assert_eq!(view.state().active_objective_id(), "OBJ-2");
    }

    #[test]
    fn enter_opens_focused_kr_and_esc_closes() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('j')));
        view.handle_key(key(KeyCode::Char('j')));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-3".into()));

        let screen = draw(&mut view);
        assert!(screen.contains("Upsell Revenue ($) — Owner: Jamal Habib"));
        assert!(screen.contains("Recent notes"));
        assert!(screen.contains("Playbook v2 rollout slipped two weeks."));

        view.handle_key(key(KeyCode::Esc));
        assert_eq!(view.state().drawer(), &Drawer::Closed);
    }

    #[test]
    fn focus_is_clamped_to_visible_krs() {
        let mut view = dashboard();
        for _ in 0..20 {
            view.handle_key(key(KeyCode::Down));
        }
        view.handle_key(key(KeyCode::Char('o')));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-6".into()));
        for _ in 0..20 {
            view.handle_key(key(KeyCode::Up));
        }
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-1".into()));
    }

    #[test]
    fn enter_without_krs_does_nothing() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('3')));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.state().drawer(), &Drawer::Closed);
    }

    #[test]
    fn clicking_objective_card_selects_it() {
        let mut view = dashboard();
        draw(&mut view);
        let target = view
            .objective_hits
            .iter()
            .find(|(id, _)| id == "OBJ-3")
            .map(|(_, rect)| *rect)
            .unwrap();
        view.handle_mouse(click(center(target)));
        assert_eq!(view.state().active_objective_id(), "OBJ-3");
    }

    #[test]
    fn open_button_and_close_marker_drive_drawer() {
        let mut view = dashboard();
        draw(&mut view);
        let button = view
            .open_hits
            .iter()
            .find(|(id, _)| id == "KR-2")
            .map(|(_, rect)| *rect)
            .unwrap();
        view.handle_mouse(click(Position::new(button.x, button.y)));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-2".into()));

        draw(&mut view);
        let close = view.close_hit.unwrap();
        view.handle_mouse(click(Position::new(close.x, close.y)));
        assert_eq!(view.state().drawer(), &Drawer::Closed);
    }

    #[test]
    fn opening_another_kr_switches_drawer() {
        let mut view = dashboard();
        draw(&mut view);
        let first = view.open_hits[0].1;
        view.handle_mouse(click(Position::new(first.x, first.y)));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-1".into()));

        // The left-most card stays outside a 45% drawer.
        draw(&mut view);
        let fourth = view
            .open_hits
            .iter()
            .find(|(id, _)| id == "KR-4")
            .map(|(_, rect)| *rect)
            .unwrap();
        view.handle_mouse(click(Position::new(fourth.x, fourth.y)));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-4".into()));
    }

    #[test]
    fn clicking_kr_card_moves_focus() {
        let mut view = dashboard();
        draw(&mut view);
        let card = view
            .kr_card_hits
            .iter()
            .find(|(index, _)| *index == 4)
            .map(|(_, rect)| *rect)
            .unwrap();
        view.handle_mouse(click(Position::new(card.x + 1, card.y + 1)));
        view.handle_key(key(KeyCode::Enter));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-5".into()));
    }

    #[test]
    fn help_overlay_toggles_and_blocks_keys() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('?')));
        assert!(draw(&mut view).contains("Hotkeys"));
        view.handle_key(key(KeyCode::Char('2')));
        assert_eq!(view.state().active_objective_id(), "OBJ-1");
        view.handle_key(key(KeyCode::Esc));
        assert!(!draw(&mut view).contains("Hotkeys"));
    }

    #[test]
    fn quit_keys() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('q')));
        assert!(view.should_quit());

        let mut view = dashboard();
        view.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(view.should_quit());
    }

    #[test]
    fn reload_keeps_selection_and_reports_status() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Char('1')));
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Char('r')));
        assert_eq!(view.state().drawer(), &Drawer::Open("KR-1".into()));
        assert!(draw(&mut view).contains("Dataset reloaded"));
    }

    #[test]
    fn selection_reports_status() {
        let mut view = dashboard();
        view.handle_key(key(KeyCode::Tab));
        assert!(draw(&mut view).contains("Objective: Customer Satisfaction"));
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Increase Revenue", 8), "Increas…");
        assert_eq!(truncate("short", 8), "short");
    }
}
