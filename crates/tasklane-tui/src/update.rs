//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tasklane_core::notify::{self, AuthOp, Notification};
use tasklane_core::platform::identity::{AuthResult, FederatedProvider};
use tasklane_core::platform::store::{StoreError, StoreResult, WriteReceipt};

use crate::common::Epoch;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::auth::{self, FormKind, FormOutcome};
use crate::features::gate::{self, Route};
use crate::features::tasks::{self, ListOutcome, TaskCommand, Ticket};
use crate::overlays::{FederatedPopupState, Overlay, OverlayTransition, OverlayUpdate};
use crate::state::{AppState, TuiState, View};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.toasts.prune(Instant::now());
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::Session { epoch, session } => gate::handle_session(&mut app.tui, epoch, session),
        UiEvent::AuthFinished { epoch, op, result } => {
            handle_auth_finished(&mut app.tui, epoch, op, &result)
        }
        UiEvent::SignedOut { epoch, result } => handle_signed_out(&mut app.tui, epoch, &result),
        UiEvent::RedirectDue { epoch, route } => {
            gate::handle_redirect_due(&mut app.tui, epoch, route)
        }
        UiEvent::TasksSnapshot { epoch, snapshot } => {
            if !app.tui.scope.is_current(epoch) {
                return vec![];
            }
            if let View::Tasks(list) = &mut app.tui.view {
                tasks::apply_snapshot(list, snapshot);
            }
            vec![]
        }
        UiEvent::TasksUnavailable { epoch, error } => {
            if app.tui.scope.is_current(epoch) {
                notify_user(&mut app.tui, notify::tasks_unavailable(&error));
            }
            vec![]
        }
        UiEvent::TaskCommandFinished {
            epoch,
            ticket,
            result,
        } => {
            if !app.tui.scope.is_current(epoch) {
                tracing::debug!(ticket = ticket.0, "dropping result for an unmounted view");
                return vec![];
            }
            finish_task_command(&mut app.tui, ticket, &result)
        }
    }
}

fn notify_user(tui: &mut TuiState, notification: Notification) {
    tui.toasts.push(notification, Instant::now());
}

fn quit(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.should_quit = true;
    let mut effects = gate::teardown(tui);
    effects.push(UiEffect::Quit);
    effects
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(key);
        return apply_overlay_update(app, update);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc || (ctrl && matches!(key.code, KeyCode::Char('c' | 'q'))) {
        return quit(&mut app.tui);
    }

    match &mut app.tui.view {
        View::Entry => vec![],
        View::Login(form) => {
            let outcome = auth::handle_form_key(FormKind::Login, form, key);
            apply_form_outcome(app, outcome)
        }
        View::Register(form) => {
            let outcome = auth::handle_form_key(FormKind::Register, form, key);
            apply_form_outcome(app, outcome)
        }
        View::Tasks(list) => {
            let outcome = tasks::handle_list_key(list, key);
            apply_list_outcome(&mut app.tui, outcome)
        }
    }
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    if update.transition == OverlayTransition::Close {
        app.overlay = None;
    }
    let Some(request) = update.request else {
        return vec![];
    };
    match &mut app.tui.view {
        View::Login(form) if form.accepts_submit() => {
            auth::begin(form, &request);
            vec![UiEffect::Authenticate {
                epoch: app.tui.scope.epoch,
                request,
            }]
        }
        _ => vec![],
    }
}

fn apply_form_outcome(app: &mut AppState, outcome: FormOutcome) -> Vec<UiEffect> {
    match outcome {
        FormOutcome::Stay => vec![],
        FormOutcome::Notify(notification) => {
            notify_user(&mut app.tui, notification);
            vec![]
        }
        FormOutcome::Submit(request) => vec![UiEffect::Authenticate {
            epoch: app.tui.scope.epoch,
            request,
        }],
        FormOutcome::OpenFederatedPopup => {
            if app.overlay.is_none() {
                app.overlay = Some(Overlay::Federated(FederatedPopupState::open(
                    FederatedProvider::Google,
                )));
            }
            vec![]
        }
        FormOutcome::Navigate(route) => gate::navigate(&mut app.tui, route),
        FormOutcome::ScheduleRedirect(route) => schedule_redirect(&app.tui, route),
    }
}

fn schedule_redirect(tui: &TuiState, route: Route) -> Vec<UiEffect> {
    vec![UiEffect::ScheduleRedirect {
        scope: tui.scope.clone(),
        route,
        after: tui.ui.register_redirect_delay(),
    }]
}

fn handle_auth_finished(
    tui: &mut TuiState,
    epoch: Epoch,
    op: AuthOp,
    result: &AuthResult<()>,
) -> Vec<UiEffect> {
    if !tui.scope.is_current(epoch) {
        tracing::debug!(epoch = epoch.0, ?op, "dropping auth result for an unmounted view");
        return vec![];
    }
    let (notification, outcome) = match &mut tui.view {
        View::Login(form) | View::Register(form) => auth::finish(form, op, result),
        View::Entry | View::Tasks(_) => return vec![],
    };
    notify_user(tui, notification);
    match outcome {
        FormOutcome::Navigate(route) => gate::navigate(tui, route),
        FormOutcome::ScheduleRedirect(route) => schedule_redirect(tui, route),
        FormOutcome::Stay
        | FormOutcome::Notify(_)
        | FormOutcome::Submit(_)
        | FormOutcome::OpenFederatedPopup => vec![],
    }
}

/// The sign-out outcome is reported even if the session listener already
/// moved the user to the login view.
fn handle_signed_out(tui: &mut TuiState, epoch: Epoch, result: &AuthResult<()>) -> Vec<UiEffect> {
    match result {
        Ok(()) => {
            notify_user(tui, notify::signed_out());
            if tui.scope.is_current(epoch) && tui.route() == Route::Tasks {
                gate::navigate(tui, Route::Login)
            } else {
                vec![]
            }
        }
        Err(error) => {
            tracing::warn!("sign-out failed: {error}");
            notify_user(tui, notify::sign_out_failed());
            vec![]
        }
    }
}

// ============================================================================
// Task commands
// ============================================================================

fn apply_list_outcome(tui: &mut TuiState, outcome: ListOutcome) -> Vec<UiEffect> {
    match outcome {
        ListOutcome::Stay | ListOutcome::Queued => vec![],
        ListOutcome::SignOut => vec![UiEffect::SignOut {
            epoch: tui.scope.epoch,
        }],
        ListOutcome::Issue(ticket, command) => issue_task_command(tui, ticket, command),
    }
}

fn issue_task_command(tui: &mut TuiState, ticket: Ticket, command: TaskCommand) -> Vec<UiEffect> {
    match tui.session.current.clone() {
        Some(session) => vec![UiEffect::RunTaskCommand {
            epoch: tui.scope.epoch,
            session,
            ticket,
            command,
        }],
        None => {
            let result = Err(StoreError::permission_denied("no signed-in user"));
            finish_task_command(tui, ticket, &result)
        }
    }
}

fn finish_task_command(
    tui: &mut TuiState,
    ticket: Ticket,
    result: &StoreResult<WriteReceipt>,
) -> Vec<UiEffect> {
    let View::Tasks(list) = &mut tui.view else {
        return vec![];
    };
    let (notification, next) = tasks::command_finished(list, ticket, result);
    if let Some(notification) = notification {
        notify_user(tui, notification);
    }
    match next {
        Some((ticket, command)) => issue_task_command(tui, ticket, command),
        None => vec![],
    }
}
