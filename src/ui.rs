use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::controller::Controller;
use crate::models::{FORM_ORDER, Field, FocusArea, Phase, TextField, TextKind};
use crate::theme::Theme;
use crate::utils::format_price;

pub const IDLE_LABEL: &str = "Predict Price";
pub const BUSY_LABEL: &str = "Predicting...";

const LABEL_WIDTH: usize = 18;

/// Draws the whole form: fields, submit button, result panel and footer.
pub fn render_form(f: &mut Frame, app: &App, ctl: &Controller, theme: &Theme) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                            // title
            Constraint::Length(FORM_ORDER.len() as u16 + 2),  // fields
            Constraint::Length(3),                            // submit button
            Constraint::Min(4),                               // result / messages
            Constraint::Length(3),                            // footer
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled("Laptop Price Predictor", theme.title)),
        Line::from(Span::styled(
            format!(
                "Enter your laptop specifications to get an estimated price in {}",
                app.currency
            ),
            theme.subtitle,
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    render_fields(f, chunks[1], app, ctl, theme);
    render_button(f, chunks[2], app, ctl, theme);
    render_outcome(f, chunks[3], app, ctl, theme);

    let footer = Paragraph::new(
        "↑/↓ Tab Move | ←/→ Choose | 0-9 . Type | Space Toggle | Enter Predict | c Copy | q Quit",
    )
    .block(Block::default().borders(Borders::ALL))
    .style(theme.footer);
    f.render_widget(footer, chunks[4]);
}

fn render_fields(f: &mut Frame, area: Rect, app: &App, ctl: &Controller, theme: &Theme) {
    let focus = app.focus_area();
    let form = ctl.form();
    let lines: Vec<Line> = FORM_ORDER
        .iter()
        .map(|&field| {
            let focused = focus == FocusArea::Field(field);
            let indicator = if focused { "→ " } else { "  " };
            let label_style = if focused { theme.label_focused } else { theme.label };
            let mut spans = vec![
                Span::raw(indicator),
                Span::styled(
                    format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                    label_style,
                ),
            ];
            match field {
                Field::Text(text_field) => {
                    spans.extend(text_value(text_field, form.text(text_field), focused, theme))
                }
                Field::Flag(flag) => {
                    let mark = if form.flag(flag) { "[x]" } else { "[ ]" };
                    spans.push(Span::styled(mark, theme.value));
                }
            }
            Line::from(spans)
        })
        .collect();

    let border = if matches!(focus, FocusArea::Field(_)) {
        theme.focus_border
    } else {
        theme.blurred_border
    };
    let block = Block::default()
        .title("Specifications")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn text_value(field: TextField, value: &str, focused: bool, theme: &Theme) -> Vec<Span<'static>> {
    let shown = if value.is_empty() {
        Span::styled(field.placeholder(), theme.placeholder)
    } else {
        Span::styled(value.to_string(), theme.value)
    };
    match field.kind() {
        TextKind::Select(_) if focused => vec![Span::raw("‹ "), shown, Span::raw(" ›")],
        TextKind::Number(_) if focused => vec![shown, Span::styled("▏", theme.label_focused)],
        _ => vec![shown],
    }
}

fn render_button(f: &mut Frame, area: Rect, app: &App, ctl: &Controller, theme: &Theme) {
    let (label, style) = if ctl.is_loading() {
        (BUSY_LABEL, theme.button_busy)
    } else if app.focus_area() == FocusArea::Submit {
        (IDLE_LABEL, theme.button_focused)
    } else {
        (IDLE_LABEL, theme.button_idle)
    };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    let width = area.width.min(30);
    let centered = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };
    f.render_widget(button, centered);
}

fn render_outcome(f: &mut Frame, area: Rect, app: &App, ctl: &Controller, theme: &Theme) {
    let mut rest = area;

    if let Some(prediction) = ctl.result().filter(|p| p.is_displayable()) {
        let panel_height = area.height.min(4);
        let panel = Paragraph::new(vec![
            Line::from(Span::styled(
                format_price(prediction.local_price, &app.currency),
                theme.price,
            )),
            Line::from(Span::styled(
                format!(
                    "service price {:.2} × {} | as of {}",
                    prediction.base_price,
                    ctl.conversion_rate(),
                    prediction.settled_at.format("%H:%M:%S")
                ),
                Style::default().fg(theme.text_secondary),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title("Predicted Price")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        );
        f.render_widget(panel, Rect { height: panel_height, ..area });
        rest = Rect {
            y: area.y + panel_height,
            height: area.height - panel_height,
            ..area
        };
    }

    let mut lines = Vec::new();
    if let Phase::Failed { reason } = ctl.phase() {
        lines.push(Line::from(Span::styled(
            format!("Prediction failed: {reason}"),
            theme.error,
        )));
    }
    for issue in ctl.issues() {
        lines.push(Line::from(Span::styled(format!("• {issue}"), theme.error)));
    }
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(notice.clone(), theme.notice)));
    }
    if lines.is_empty() || rest.height == 0 {
        return;
    }
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(theme.text));
    f.render_widget(para, rest);
}
