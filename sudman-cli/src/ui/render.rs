//! Draws a dashboard [`Screen`] with ratatui widgets. Owns no state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use sudman_core::frame::{DetailFrame, FilterFrame, Frame as Screen, ListFrame, MessageFrame};
use sudman_core::unit::Unit;

use super::theme::styles;

/// Width reserved after the name column for state and enabled marker
const STATE_COLUMN: usize = 18;
const MARK_COLUMN: usize = 3;
const INPUT_MARKER: &str = "> ";

pub fn draw(f: &mut Frame, screen: &Screen<'_>) {
    let area = f.area();
    match screen {
        Screen::List(list) => draw_list(f, area, list),
        Screen::Detail(detail) => draw_detail(f, area, detail),
        Screen::Message(message) => draw_message(f, area, message),
        Screen::FilterPrompt(prompt) => draw_filter(f, area, prompt),
    }
}

fn rows(area: Rect, constraints: &[Constraint]) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints.to_vec())
        .split(area)
}

fn draw_list(f: &mut Frame, area: Rect, list: &ListFrame<'_>) {
    let chunks = rows(
        area,
        &[
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ],
    );

    f.render_widget(
        Paragraph::new(Span::styled(list.header.as_str(), styles::title())),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(list.hint, styles::text_dim())),
        chunks[1],
    );

    let width = area.width as usize;
    let lines: Vec<Line> = list
        .rows
        .iter()
        .map(|row| {
            let style = styles::activity(row.unit.activity());
            let style = if row.selected {
                style.patch(styles::selection())
            } else {
                style
            };
            Line::from(Span::styled(unit_row(row.unit, width), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[2]);

    f.render_widget(
        Paragraph::new(Span::styled(list.footer.as_str(), styles::text_dim())),
        chunks[3],
    );
}

/// One list row: name, `active/sub`, and an enabled marker, padded to `width`
pub fn unit_row(unit: &Unit, width: usize) -> String {
    let name_width = width.saturating_sub(STATE_COLUMN + MARK_COLUMN + 2).max(1);
    let state = format!("{}/{}", unit.active_state, unit.sub_state);
    let mark = if unit.enabled { "✓" } else { "✗" };
    format!(
        "{:<name_width$} {:<STATE_COLUMN$} {:>MARK_COLUMN$}",
        fit(&unit.name, name_width),
        fit(&state, STATE_COLUMN),
        mark
    )
}

/// Truncate to `max` chars, marking the cut with an ellipsis
fn fit(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

fn draw_detail(f: &mut Frame, area: Rect, detail: &DetailFrame<'_>) {
    let unit = detail.unit;
    let enabled = if unit.enabled { "yes" } else { "no" };

    let mut lines = vec![
        Line::from(Span::styled(format!("Unit: {}", unit.name), styles::title())),
        Line::from(format!("Description: {}", unit.description)),
        Line::from(""),
        Line::from("Status:"),
        Line::from(format!("  Loaded: {}", unit.load_state)),
        Line::from(Span::styled(
            format!("  Active: {} ({})", unit.active_state, unit.sub_state),
            styles::activity(unit.activity()),
        )),
        Line::from(Span::styled(
            format!("  Enabled: {enabled}"),
            styles::enabled(unit.enabled),
        )),
        Line::from(""),
        Line::from(Span::styled("Actions:", styles::title())),
    ];
    lines.extend(detail.actions.iter().map(|(key, label)| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(key.to_string(), styles::key_hint()),
            Span::raw(format!(" - {label}")),
        ])
    }));

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_message(f: &mut Frame, area: Rect, message: &MessageFrame) {
    let chunks = rows(
        area,
        &[
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ],
    );

    f.render_widget(
        Paragraph::new(Span::styled(message.title, styles::title())),
        chunks[0],
    );
    let body: Vec<Line> = message
        .lines
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();
    f.render_widget(Paragraph::new(body), chunks[2]);
    f.render_widget(
        Paragraph::new(Span::styled(message.footer, styles::text_dim())),
        chunks[3],
    );
}

fn draw_filter(f: &mut Frame, area: Rect, prompt: &FilterFrame<'_>) {
    let chunks = rows(
        area,
        &[
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ],
    );

    f.render_widget(
        Paragraph::new(Span::styled(prompt.prompt, styles::title())),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(prompt.hint, styles::text_dim())),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(INPUT_MARKER, styles::key_hint()),
            Span::styled(prompt.input, styles::accent()),
        ])),
        chunks[2],
    );

    let typed = INPUT_MARKER.chars().count() + prompt.input.chars().count();
    let cursor_x = chunks[2]
        .x
        .saturating_add(u16::try_from(typed).unwrap_or(u16::MAX));
    f.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), chunks[2].y));
}
