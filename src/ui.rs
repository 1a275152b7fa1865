pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph,
        Widget, Wrap,
    },
};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cubik::record::{format_centis, format_duration};
use cubik::stats::SessionStats;
use cubik::store::KvStore;
use cubik::time_series::solve_series;
use cubik::timer::Phase;

use crate::{App, Mode};

const HORIZONTAL_MARGIN: u16 = 1;

/// Cut `text` to at most `max` display columns
fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Index window of a scrolled list keeping `selected` visible
pub fn visible_window(len: usize, height: usize, selected: Option<usize>) -> (usize, usize) {
    if len <= height || height == 0 {
        return (0, len);
    }
    let anchor = selected.unwrap_or(len - 1).min(len - 1);
    let start = (anchor + 1).saturating_sub(height);
    (start, start + height)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn stats_line(stats: &SessionStats) -> String {
    let fmt = |v: Option<u64>| {
        v.map(format_centis).unwrap_or_else(|| "-".to_string())
    };
    let avg = |v: Option<cubik::stats::Average>| {
        v.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    };
    format!(
        "solves {}  dnf {}  best {}  worst {}  mean {}  ao5 {}  ao12 {}",
        stats.count,
        stats.dnf_count,
        fmt(stats.best),
        fmt(stats.worst),
        fmt(stats.mean),
        avg(stats.ao5),
        avg(stats.ao12),
    )
}

impl<S: KvStore> App<S> {
    /// Text of the big timer: live while running, otherwise the last result
    pub fn timer_text(&self, now: Instant) -> String {
        match self.stopwatch.display_elapsed(now) {
            Some(elapsed) => format_duration(elapsed),
            None => self
                .last_result
                .clone()
                .unwrap_or_else(|| "0.00".to_string()),
        }
    }
}

impl<S: KvStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let selected_style = Style::default().bg(Color::DarkGray).patch(bold_style);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(4), // scramble
                Constraint::Min(8),    // timer, chart, lists
                Constraint::Length(1), // stats
                Constraint::Length(1), // help
            ])
            .split(area);

        Paragraph::new(self.stopwatch.scramble())
            .block(Block::default().borders(Borders::ALL).title("Scramble"))
            .style(bold_style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(columns[0]);

        // timer; green is the "ready" affordance while armed
        let timer_style = match self.stopwatch.phase() {
            Phase::Arming => bold_style.fg(Color::Green),
            Phase::Running => bold_style.fg(Color::White),
            Phase::Idle => bold_style,
        };
        Paragraph::new(Span::styled(self.timer_text(Instant::now()), timer_style))
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Timer ({})",
                self.stopwatch.phase().to_string().to_lowercase()
            )))
            .alignment(Alignment::Center)
            .render(left[0], buf);

        let points = solve_series(self.stopwatch.records());
        let (attempts, slowest) = charting::compute_chart_params(&points);
        let tuples: Vec<(f64, f64)> = points.iter().map(|p| (*p).into()).collect();
        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&tuples)];
        Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Solves"))
            .x_axis(
                Axis::default()
                    .title("attempt")
                    .bounds([1.0, attempts.max(2.0)])
                    .labels(vec![
                        Span::styled("1", bold_style),
                        Span::styled(charting::format_label(attempts), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, slowest])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(slowest), bold_style),
                    ]),
            )
            .render(left[1], buf);

        let sessions = self.stopwatch.sessions();
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length((sessions.len() as u16 + 2).min(10)),
            ])
            .split(columns[1]);

        // times list
        let records = self.stopwatch.records();
        let inner_height = right[0].height.saturating_sub(2) as usize;
        let (start, end) = visible_window(records.len(), inner_height, self.selected);
        let items: Vec<ListItem> = records[start..end]
            .iter()
            .enumerate()
            .map(|(offset, record)| {
                let idx = start + offset;
                let line = format!("{:>3}. {}", idx + 1, record.summary());
                if Some(idx) == self.selected {
                    ListItem::new(line).style(selected_style)
                } else {
                    ListItem::new(line)
                }
            })
            .collect();
        List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Times: {}", self.stopwatch.active_session())),
            )
            .render(right[0], buf);

        // sessions list
        let name_width = right[1].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = sessions
            .iter()
            .map(|name| {
                let label = fit_width(name, name_width);
                if name == self.stopwatch.active_session() {
                    ListItem::new(format!("> {label}")).style(bold_style.fg(Color::Cyan))
                } else {
                    ListItem::new(format!("  {label}"))
                }
            })
            .collect();
        List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Sessions"))
            .render(right[1], buf);

        Paragraph::new(stats_line(&self.stopwatch.stats()))
            .style(dim_style)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let help = if self.stopwatch.is_tap_mode() {
            "(space) start/stop | ↑/↓ select | (p)+2 (d)nf (x)delete | (n)ew [ ] switch (D)elete session | (q)uit"
        } else {
            "hold (space) then release to start, press to stop | ↑/↓ select | (p)+2 (d)nf (x)delete | (n)ew [ ] (D)elete session | (q)uit"
        };
        Paragraph::new(help)
            .style(dim_style.add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Some(message) = &self.message {
            let width = (message.width() as u16 + 4).max(20);
            let popup = Rect {
                y: chunks[2].y.saturating_sub(1),
                height: 1,
                ..centered_rect(width, 1, area)
            };
            Paragraph::new(Span::styled(message.as_str(), bold_style.fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .render(popup, buf);
        }

        render_modal(self, area, buf);
    }
}

fn render_modal<S: KvStore>(app: &App<S>, area: Rect, buf: &mut Buffer) {
    let (title, body) = match &app.mode {
        Mode::Timing => return,
        Mode::NewSession(input) => (
            "New session",
            vec![
                Line::from(format!("{input}▏")),
                Line::from(Span::styled(
                    "(enter) create and switch | (esc) cancel",
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ],
        ),
        Mode::ConfirmDeleteRecord(index) => {
            let record = app.stopwatch.records().get(*index);
            let mut lines = vec![Line::from(format!("Delete solve #{}?", index + 1))];
            if let Some(record) = record {
                lines.push(Line::from(format!("Time: {}", record.summary())));
                lines.push(Line::from(format!("Scramble: {}", record.scramble)));
                if let Some(at) = record.recorded_at {
                    lines.push(Line::from(format!(
                        "Recorded: {}",
                        at.format("%Y-%m-%d %H:%M:%S")
                    )));
                }
            }
            lines.push(Line::from("(y)es / any other key cancels"));
            ("Delete solve", lines)
        }
        Mode::ConfirmDeleteSession(name) => (
            "Delete session",
            vec![
                Line::from(format!("Are you sure you want to delete the session \"{name}\"?")),
                Line::from("(y)es / any other key cancels"),
            ],
        ),
    };

    let popup = centered_rect(area.width.saturating_sub(10).min(70), body.len() as u16 + 2, area);
    Clear.render(popup, buf);
    Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}
