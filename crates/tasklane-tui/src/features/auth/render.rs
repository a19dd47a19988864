use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::{AuthForm, FormField, FormKind};
use crate::common::TextField;
use crate::overlays::render_utils::{InputHint, calculate_centered_area, render_hints};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 12;

pub fn render_form(frame: &mut Frame, area: Rect, kind: FormKind, form: &AuthForm, tick: usize) {
    let title = match kind {
        FormKind::Login => "Sign in",
        FormKind::Register => "Create account",
    };
    let popup = calculate_centered_area(area, FORM_WIDTH, FORM_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let email_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 2);
    render_field(frame, email_area, "Email", &form.email, form.focus == FormField::Email);

    let password_label = if form.password.is_hidden() {
        "Password (Ctrl+V to show)"
    } else {
        "Password (Ctrl+V to hide)"
    };
    let password_area = Rect::new(inner.x + 1, inner.y + 4, inner.width.saturating_sub(2), 2);
    render_field(
        frame,
        password_area,
        password_label,
        &form.password,
        form.focus == FormField::Password,
    );

    let status_area = Rect::new(inner.x, inner.y + 7, inner.width, 1);
    if form.is_busy() {
        let spinner = SPINNER[tick % SPINNER.len()];
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{spinner} Working…"),
                Style::default().fg(Color::Yellow),
            )))
            .alignment(Alignment::Center),
            status_area,
        );
    } else if form.redirect_pending {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Opening your tasks…",
                Style::default().fg(Color::Green),
            )))
            .alignment(Alignment::Center),
            status_area,
        );
    }

    let hints: &[InputHint] = match kind {
        FormKind::Login => &[
            InputHint::new("Enter", "sign in"),
            InputHint::new("^G", "Google"),
            InputHint::new("^F", "reset password"),
            InputHint::new("^R", "register"),
        ],
        FormKind::Register => &[
            InputHint::new("Enter", "create account"),
            InputHint::new("^L", "back to sign in"),
        ],
    };
    render_hints(frame, inner, hints, Color::Blue);
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, field: &TextField, focused: bool) {
    let label_style = if focused {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, label_style))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let value_area = Rect::new(area.x, area.y + 1, area.width, 1);
    let marker = if focused { "› " } else { "  " };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Blue)),
            Span::raw(field.display()),
        ])),
        value_area,
    );
    if focused {
        let x = value_area.x + 2 + field.cursor_offset();
        frame.set_cursor_position((x.min(value_area.right().saturating_sub(1)), value_area.y));
    }
}
