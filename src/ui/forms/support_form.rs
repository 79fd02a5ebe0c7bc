//! Support request form rendering

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::sink::Submission;
use crate::state::FormPhase;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the support form with its action panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(32), // Action panel
        ])
        .split(area);

    draw_form(frame, chunks[0], app);
    draw_action_panel(frame, chunks[1], app);
}

/// Draw the form fields
fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;

    let mut constraints: Vec<Constraint> = form
        .fields()
        .iter()
        .map(|f| {
            if f.is_multiline() {
                Constraint::Min(6)
            } else {
                Constraint::Length(3)
            }
        })
        .collect();
    constraints.push(Constraint::Length(1)); // Help text

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let border_color = if form.is_submit_active() {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Contact Support ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    frame.render_widget(block, area);

    for (idx, field) in form.fields().iter().enumerate() {
        let value = form.value(&field.name).unwrap_or_default();
        draw_field(frame, chunks[idx], field, value, form.active_field_index == idx);
    }

    let help_area = chunks[form.fields().len()];
    if form.is_active_field_select() {
        draw_help_text(
            frame,
            help_area,
            &[("←/→", "choose"), ("Tab", "next field"), ("Esc", "quit")],
        );
    } else if form.is_active_field_multiline() {
        draw_help_text(
            frame,
            help_area,
            &[
                (crate::platform::NEWLINE_KEY, "new line"),
                ("Tab", "next field"),
                (crate::platform::SUBMIT_SHORTCUT, "submit"),
            ],
        );
    } else {
        draw_help_text(
            frame,
            help_area,
            &[
                ("Tab", "next field"),
                (crate::platform::SUBMIT_SHORTCUT, "submit"),
                ("Esc", "quit"),
            ],
        );
    }
}

/// Draw the submit button and the last submission
fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.state.form.is_submit_active();
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(1),             // Spacer
            Constraint::Min(0),                // Last submission
        ])
        .split(inner);

    render_button(frame, chunks[0], "Submit", is_focused, Color::Green);

    let lines = match &app.state.last_submission {
        Some(submission) => submission_lines(submission, app.state.form.phase()),
        None => vec![Line::from(Span::styled(
            "Nothing submitted yet",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let preview = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" Last submission ({}) ", app.sink_name()))
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(preview, chunks[2]);
}

fn submission_lines(submission: &Submission, phase: FormPhase) -> Vec<Line<'_>> {
    let time_color = match phase {
        FormPhase::Submitted => Color::Green,
        FormPhase::Editing => Color::DarkGray,
    };
    let mut lines = vec![Line::from(Span::styled(
        submission.submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Style::default().fg(time_color),
    ))];
    for (field, value) in submission.fields.as_map() {
        let shown: &str = if value.is_empty() { "(empty)" } else { value };
        lines.push(Line::from(vec![
            Span::styled(format!("{field}: "), Style::default().fg(Color::Cyan)),
            Span::raw(shown),
        ]));
    }
    lines
}
