//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::features::auth::{self, FormKind};
use crate::features::{tasks, toast};
use crate::state::{AppState, TuiState, View};

/// Spinner frames for pending states.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Horizontal margin around the body.
const BODY_MARGIN: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let [header_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
    let body_area = Rect::new(
        body_area.x + BODY_MARGIN,
        body_area.y,
        body_area.width.saturating_sub(BODY_MARGIN * 2),
        body_area.height,
    );

    render_header(frame, header_area, state);

    match &state.view {
        View::Entry => render_loading(frame, body_area, state, "Checking session…"),
        View::Login(form) => {
            auth::render_form(frame, body_area, FormKind::Login, form, state.spinner_frame);
        }
        View::Register(form) => {
            auth::render_form(frame, body_area, FormKind::Register, form, state.spinner_frame);
        }
        View::Tasks(list) => {
            if state.session.resolved {
                tasks::render_tasks(frame, body_area, list);
            } else {
                render_loading(frame, body_area, state, "Loading…");
            }
        }
    }

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area);
    }
    toast::render_toasts(frame, area, &state.toasts);
}

fn render_header(frame: &mut Frame, area: Rect, state: &TuiState) {
    let mut spans = vec![
        Span::styled(
            " tasklane ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", state.route().path()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(session) = &state.session.current {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            session.email.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_loading(frame: &mut Frame, area: Rect, state: &TuiState, text: &str) {
    let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{spinner} {text}"),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
}
