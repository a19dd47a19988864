//! Routing and the auth gate.
//!
//! Every mounted view owns a fresh [`ViewScope`](crate::common::ViewScope)
//! and one session listener. The gate reacts to the listener's reports by
//! redirecting between the public and private views.

use tasklane_core::platform::identity::Session;
use tracing::{debug, info};

use crate::common::Epoch;
use crate::effects::UiEffect;
use crate::state::{SessionView, TuiState, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Entry,
    Login,
    Register,
    Tasks,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Entry => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Tasks => "/tasks",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    route: Route,
    transitions: u64,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            route: Route::Entry,
            transitions: 0,
        }
    }
}

impl Router {
    pub fn route(&self) -> Route {
        self.route
    }

    /// Number of route changes since start.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn go(&mut self, route: Route) -> bool {
        if self.route == route {
            return false;
        }
        self.route = route;
        self.transitions += 1;
        true
    }
}

/// Starts the view for the current route.
pub fn mount_initial(tui: &mut TuiState) -> Vec<UiEffect> {
    mount(tui)
}

fn mount(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.scope = tui.scopes.next_scope();
    tui.session = SessionView::default();
    tui.view = View::for_route(tui.route(), &tui.ui);
    debug!(route = tui.route().path(), epoch = tui.scope.epoch.0, "view mounted");
    vec![UiEffect::WatchSession {
        scope: tui.scope.clone(),
    }]
}

/// Ends the current view's scope.
pub fn teardown(tui: &TuiState) -> Vec<UiEffect> {
    vec![UiEffect::CancelScope {
        token: tui.scope.cancel.clone(),
    }]
}

/// Switches to `route`. Navigating to the current route does nothing.
pub fn navigate(tui: &mut TuiState, route: Route) -> Vec<UiEffect> {
    if tui.route() == route {
        return vec![];
    }
    let mut effects = teardown(tui);
    tui.router.go(route);
    info!(route = route.path(), "navigate");
    effects.extend(mount(tui));
    effects
}

enum GateAction {
    Stay,
    Navigate(Route),
    Subscribe(Session),
}

/// Applies a session report from the mounted view's listener.
pub fn handle_session(
    tui: &mut TuiState,
    epoch: Epoch,
    session: Option<Session>,
) -> Vec<UiEffect> {
    if !tui.scope.is_current(epoch) {
        debug!(epoch = epoch.0, "dropping session report for an unmounted view");
        return vec![];
    }
    tui.session = SessionView {
        resolved: true,
        current: session.clone(),
    };

    let action = match (&mut tui.view, session) {
        (View::Entry, Some(_)) => GateAction::Navigate(Route::Tasks),
        (View::Entry, None) => GateAction::Navigate(Route::Login),
        // A form operation in flight reports its own outcome and navigates
        // itself; a pending redirect keeps the success toast up for its delay.
        (View::Login(form) | View::Register(form), Some(_)) => {
            if form.is_busy() || form.redirect_pending {
                GateAction::Stay
            } else {
                GateAction::Navigate(Route::Tasks)
            }
        }
        (View::Login(_) | View::Register(_), None) => GateAction::Stay,
        (View::Tasks(_), None) => GateAction::Navigate(Route::Login),
        (View::Tasks(list), Some(session)) => {
            if list.subscribed {
                GateAction::Stay
            } else {
                list.subscribed = true;
                GateAction::Subscribe(session)
            }
        }
    };

    match action {
        GateAction::Stay => vec![],
        GateAction::Navigate(route) => navigate(tui, route),
        GateAction::Subscribe(session) => vec![UiEffect::SubscribeTasks {
            scope: tui.scope.clone(),
            session,
        }],
    }
}

/// Fires a delayed navigation if its view is still mounted.
pub fn handle_redirect_due(tui: &mut TuiState, epoch: Epoch, route: Route) -> Vec<UiEffect> {
    if !tui.scope.is_current(epoch) {
        debug!(epoch = epoch.0, "dropping redirect for an unmounted view");
        return vec![];
    }
    navigate(tui, route)
}

#[cfg(test)]
mod tests {
    use tasklane_core::config::UiConfig;
    use tasklane_core::platform::identity::SignInMethod;

    use super::*;

    fn session() -> Session {
        Session {
            uid: "u1".to_string(),
            email: "a@b.com".to_string(),
            method: SignInMethod::Password,
        }
    }

    fn mounted() -> (TuiState, Epoch) {
        let mut tui = TuiState::new(UiConfig::default());
        mount_initial(&mut tui);
        let epoch = tui.scope.epoch;
        (tui, epoch)
    }

    #[test]
    fn test_entry_resolves_to_login_or_tasks() {
        let (mut tui, epoch) = mounted();
        handle_session(&mut tui, epoch, None);
        assert_eq!(tui.route(), Route::Login);

        let (mut tui, epoch) = mounted();
        handle_session(&mut tui, epoch, Some(session()));
        assert_eq!(tui.route(), Route::Tasks);
        assert_eq!(tui.router.transitions(), 1);
    }

    #[test]
    fn test_idle_login_leaves_once_when_a_session_appears() {
        let (mut tui, epoch) = mounted();
        handle_session(&mut tui, epoch, None);
        assert_eq!(tui.route(), Route::Login);
        let before = tui.router.transitions();

        let epoch = tui.scope.epoch;
        handle_session(&mut tui, epoch, None);
        assert_eq!(tui.route(), Route::Login);

        handle_session(&mut tui, epoch, Some(session()));
        assert_eq!(tui.route(), Route::Tasks);
        assert_eq!(tui.router.transitions(), before + 1);

        // The old listener may still report before its scope is cancelled.
        handle_session(&mut tui, epoch, Some(session()));
        assert_eq!(tui.router.transitions(), before + 1);
    }

    #[test]
    fn test_navigate_to_current_route_is_a_no_op() {
        let (mut tui, _) = mounted();
        let effects = navigate(&mut tui, Route::Login);
        assert_eq!(effects.len(), 2, "cancel old scope + watch new one");
        let epoch = tui.scope.epoch;

        assert!(navigate(&mut tui, Route::Login).is_empty());
        assert_eq!(tui.scope.epoch, epoch);
        assert_eq!(tui.router.transitions(), 1);
    }

    #[test]
    fn test_navigation_cancels_the_previous_scope() {
        let (mut tui, _) = mounted();
        let old = tui.scope.clone();
        let effects = navigate(&mut tui, Route::Register);
        let UiEffect::CancelScope { token } = &effects[0] else {
            panic!("expected the old scope to be cancelled first");
        };
        token.cancel();
        assert!(old.cancel.is_cancelled());
        assert_ne!(tui.scope.epoch, old.epoch);
    }

    #[test]
    fn test_stale_session_report_is_ignored() {
        let (mut tui, stale) = mounted();
        navigate(&mut tui, Route::Tasks);
        let effects = handle_session(&mut tui, stale, None);
        assert!(effects.is_empty());
        assert_eq!(tui.route(), Route::Tasks);
    }

    #[test]
    fn test_tasks_view_subscribes_once_and_leaves_on_sign_out() {
        let (mut tui, _) = mounted();
        navigate(&mut tui, Route::Tasks);
        let epoch = tui.scope.epoch;

        let effects = handle_session(&mut tui, epoch, Some(session()));
        assert!(matches!(effects.as_slice(), [UiEffect::SubscribeTasks { .. }]));
        assert!(handle_session(&mut tui, epoch, Some(session())).is_empty());

        let before = tui.router.transitions();
        handle_session(&mut tui, epoch, None);
        assert_eq!(tui.route(), Route::Login);
        assert_eq!(tui.router.transitions(), before + 1);
    }

    #[test]
    fn test_register_gate_yields_to_pending_redirect() {
        let (mut tui, _) = mounted();
        navigate(&mut tui, Route::Register);
        let epoch = tui.scope.epoch;
        if let View::Register(form) = &mut tui.view {
            form.redirect_pending = true;
        }

        handle_session(&mut tui, epoch, Some(session()));
        assert_eq!(tui.route(), Route::Register);

        handle_redirect_due(&mut tui, epoch, Route::Tasks);
        assert_eq!(tui.route(), Route::Tasks);
    }
}
