//! Modal overlays.
//!
//! An open overlay takes every key press until it closes. Each overlay owns
//! its state, key handler and render function.

pub mod federated;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use federated::FederatedPopupState;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::features::auth::AuthRequest;

/// Transition returned by overlay key handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    /// Authentication call to start once the overlay is handled.
    pub request: Option<AuthRequest>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self {
            transition: OverlayTransition::Stay,
            request: None,
        }
    }

    pub fn close() -> Self {
        Self {
            transition: OverlayTransition::Close,
            request: None,
        }
    }

    #[must_use]
    pub fn with_request(mut self, request: AuthRequest) -> Self {
        self.request = Some(request);
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Federated(FederatedPopupState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Federated(popup) => popup.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Federated(popup) => popup.handle_key(key),
        }
    }
}
