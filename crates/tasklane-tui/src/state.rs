//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── ui: UiConfig           (toast and redirect timing, draft defaults)
//! │   ├── router: Router         (current route, transition count)
//! │   ├── scope: ViewScope       (epoch + cancellation of the mounted view)
//! │   ├── session: SessionView   (last state seen by the view's listener)
//! │   ├── view: View             (per-route state, rebuilt on every mount)
//! │   ├── toasts: ToastState
//! │   └── spinner_frame
//! └── overlay: Option<Overlay>   (modal overlays)
//! ```
//!
//! The overlay lives beside `TuiState` so its key handler can borrow both.

use tasklane_core::config::UiConfig;
use tasklane_core::platform::identity::Session;

use crate::common::{ScopeSeq, ViewScope};
use crate::features::auth::AuthForm;
use crate::features::gate::{Route, Router};
use crate::features::tasks::TaskListState;
use crate::features::toast::ToastState;
use crate::overlays::Overlay;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(ui: UiConfig) -> Self {
        Self {
            tui: TuiState::new(ui),
            overlay: None,
        }
    }
}

/// What the mounted view's session listener has reported so far.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    /// False until the initial resolution arrives.
    pub resolved: bool,
    pub current: Option<Session>,
}

/// Per-route view state.
#[derive(Debug)]
pub enum View {
    Entry,
    Login(AuthForm),
    Register(AuthForm),
    Tasks(TaskListState),
}

impl View {
    pub fn for_route(route: Route, ui: &UiConfig) -> Self {
        match route {
            Route::Entry => View::Entry,
            Route::Login => View::Login(AuthForm::default()),
            Route::Register => View::Register(AuthForm::default()),
            Route::Tasks => View::Tasks(TaskListState::new(ui.default_category)),
        }
    }
}

pub struct TuiState {
    pub ui: UiConfig,
    pub router: Router,
    pub scopes: ScopeSeq,
    pub scope: ViewScope,
    pub session: SessionView,
    pub view: View,
    pub toasts: ToastState,
    /// Advanced on every tick; drives the busy spinner.
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl TuiState {
    /// Creates state for an unmounted entry view; call
    /// [`crate::features::gate::mount_initial`] to start it.
    pub fn new(ui: UiConfig) -> Self {
        let mut scopes = ScopeSeq::default();
        let scope = scopes.next_scope();
        let toasts = ToastState::new(ui.toast_duration());
        Self {
            view: View::Entry,
            ui,
            router: Router::default(),
            scopes,
            scope,
            session: SessionView::default(),
            toasts,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.router.route()
    }
}
