use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tasklane_core::notify::Severity;
use unicode_width::UnicodeWidthStr;

use super::ToastState;

const TOAST_WIDTH: u16 = 44;

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✓",
        Severity::Info => "i",
        Severity::Warning => "!",
        Severity::Error => "✗",
    }
}

/// Stacks toasts from the top-right corner down, newest at the bottom.
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &ToastState) {
    let width = TOAST_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let x = area.x + area.width.saturating_sub(width);
    let mut y = area.y + 1;

    for toast in toasts.visible() {
        let message = &toast.notification.message;
        let lines = (message.width() + 2).div_ceil(inner_width).max(1) as u16;
        let height = lines + 2;
        if y + height > area.y + area.height {
            break;
        }

        let color = severity_color(toast.notification.severity);
        let rect = Rect::new(x, y, width, height);
        frame.render_widget(Clear, rect);
        let body = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", severity_icon(toast.notification.severity)),
                Style::default().fg(color),
            ),
            Span::raw(message.as_str()),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(body, rect);
        y += height;
    }
}
