//! Federated sign-in popup.
//!
//! Stands in for the provider's account chooser: the user confirms which
//! account to continue with, or dismisses the window.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tasklane_core::platform::identity::FederatedProvider;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay, render_separator};
use crate::common::TextField;
use crate::features::auth::{AuthRequest, PopupOutcome};

#[derive(Debug, Clone)]
pub struct FederatedPopupState {
    pub provider: FederatedProvider,
    pub email: TextField,
    pub error: Option<String>,
}

impl FederatedPopupState {
    pub fn open(provider: FederatedProvider) -> Self {
        Self {
            provider,
            email: TextField::default(),
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close()
                .with_request(AuthRequest::Federated(PopupOutcome::Dismissed)),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close()
                .with_request(AuthRequest::Federated(PopupOutcome::Dismissed)),
            KeyCode::Enter => {
                let email = self.email.value().trim();
                if email.is_empty() {
                    self.error = Some("Choose an account to continue".to_string());
                    OverlayUpdate::stay()
                } else {
                    let outcome = PopupOutcome::Confirmed {
                        email: email.to_string(),
                    };
                    OverlayUpdate::close().with_request(AuthRequest::Federated(outcome))
                }
            }
            _ => {
                self.email.input(key);
                OverlayUpdate::stay()
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!("Sign in with {}", self.provider.display_name());
        let hints = [
            InputHint::new("Enter", "continue"),
            InputHint::new("Esc", "close"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &title,
                border_color: Color::Magenta,
                width: 52,
                height: 8,
                hints: &hints,
            },
        );

        let body = layout.body;
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Account email",
                Style::default().fg(Color::DarkGray),
            ))),
            Rect::new(body.x, body.y, body.width, 1),
        );
        let input_area = Rect::new(body.x, body.y + 1, body.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::DarkGray)),
                Span::styled(self.email.display(), Style::default().fg(Color::Magenta)),
            ])),
            input_area,
        );
        let cursor_x = input_area.x + 2 + self.email.cursor_offset();
        frame.set_cursor_position((
            cursor_x.min(input_area.right().saturating_sub(1)),
            input_area.y,
        ));

        render_separator(frame, body, 2);

        let (text, style) = match &self.error {
            Some(error) => (error.as_str(), Style::default().fg(Color::Red)),
            None => (
                "Closing this window cancels the sign-in",
                Style::default().fg(Color::DarkGray),
            ),
        };
        if body.height > 3 {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, style))),
                Rect::new(layout.inner.x, body.y + 3, layout.inner.width, 1),
            );
        }
    }
}
