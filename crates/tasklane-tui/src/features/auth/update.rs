//! Credential form reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklane_core::credentials;
use tasklane_core::notify::{self, AuthOp, Notification};
use tasklane_core::platform::identity::AuthResult;

use super::state::{AuthForm, AuthRequest, FormKind};
use crate::features::gate::Route;

/// What a key press on a form asks the reducer to do.
#[derive(Debug)]
pub enum FormOutcome {
    Stay,
    Notify(Notification),
    Submit(AuthRequest),
    OpenFederatedPopup,
    Navigate(Route),
    /// Successful registration: navigate after the configured delay.
    ScheduleRedirect(Route),
}

pub fn handle_form_key(kind: FormKind, form: &mut AuthForm, key: KeyEvent) -> FormOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('v') if ctrl => {
            form.password.toggle_reveal();
            FormOutcome::Stay
        }
        KeyCode::Char('g') if ctrl && kind == FormKind::Login => {
            if form.accepts_submit() {
                FormOutcome::OpenFederatedPopup
            } else {
                FormOutcome::Stay
            }
        }
        KeyCode::Char('f') if ctrl && kind == FormKind::Login => reset_password(form),
        KeyCode::Char('r') if ctrl && kind == FormKind::Login => {
            FormOutcome::Navigate(Route::Register)
        }
        KeyCode::Char('l') if ctrl && kind == FormKind::Register => {
            FormOutcome::Navigate(Route::Login)
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus = form.focus.other();
            FormOutcome::Stay
        }
        KeyCode::Enter => submit(kind, form),
        _ => {
            form.focused_mut().input(key);
            FormOutcome::Stay
        }
    }
}

fn submit(kind: FormKind, form: &mut AuthForm) -> FormOutcome {
    if !form.accepts_submit() {
        return FormOutcome::Stay;
    }
    let email = form.email.value();
    let password = form.password.value();
    let validated = match kind {
        FormKind::Login => credentials::validate_sign_in(email, password).map(AuthRequest::SignIn),
        FormKind::Register => {
            credentials::validate_registration(email, password).map(AuthRequest::Register)
        }
    };
    match validated {
        Ok(request) => {
            begin(form, &request);
            FormOutcome::Submit(request)
        }
        Err(notification) => FormOutcome::Notify(notification),
    }
}

fn reset_password(form: &mut AuthForm) -> FormOutcome {
    if !form.accepts_submit() {
        return FormOutcome::Stay;
    }
    match credentials::validate_reset(form.email.value()) {
        Ok(email) => {
            let request = AuthRequest::ResetPassword { email };
            begin(form, &request);
            FormOutcome::Submit(request)
        }
        Err(notification) => FormOutcome::Notify(notification),
    }
}

/// Marks the form busy with `request`.
pub fn begin(form: &mut AuthForm, request: &AuthRequest) {
    form.busy = Some(request.op());
}

/// Applies the outcome of an authentication call.
///
/// Returns the notification to show and the follow-up step.
pub fn finish(
    form: &mut AuthForm,
    op: AuthOp,
    result: &AuthResult<()>,
) -> (Notification, FormOutcome) {
    form.busy = None;
    match result {
        Ok(()) => {
            let next = match op {
                AuthOp::Federated | AuthOp::SignIn => FormOutcome::Navigate(Route::Tasks),
                AuthOp::Register => {
                    form.redirect_pending = true;
                    FormOutcome::ScheduleRedirect(Route::Tasks)
                }
                AuthOp::ResetPassword => FormOutcome::Stay,
            };
            (op.success(), next)
        }
        Err(error) => (notify::auth_failure(op, error), FormOutcome::Stay),
    }
}

#[cfg(test)]
mod tests {
    use tasklane_core::notify::{Severity, messages};
    use tasklane_core::platform::identity::{AuthError, AuthErrorCode};

    use super::*;
    use crate::features::auth::FormField;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn fill(form: &mut AuthForm, email: &str, password: &str) {
        form.email.set(email);
        form.password.set(password);
    }

    #[test]
    fn test_empty_sign_in_warns_without_submitting() {
        let mut form = AuthForm::default();
        form.email.set("a@b.com");
        let outcome = handle_form_key(FormKind::Login, &mut form, key(KeyCode::Enter));
        let FormOutcome::Notify(n) = outcome else {
            panic!("expected a warning, got {outcome:?}");
        };
        assert_eq!(n.severity, Severity::Warning);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_weak_registration_password_is_rejected_before_submit() {
        let mut form = AuthForm::default();
        fill(&mut form, "a@b.com", "password");
        let outcome = handle_form_key(FormKind::Register, &mut form, key(KeyCode::Enter));
        assert!(
            matches!(&outcome, FormOutcome::Notify(n) if n.message == messages::WEAK_PASSWORD_RULE)
        );
    }

    #[test]
    fn test_submit_marks_busy_and_ignores_repeats() {
        let mut form = AuthForm::default();
        fill(&mut form, "a@b.com", "Abcdef1!");
        let outcome = handle_form_key(FormKind::Register, &mut form, key(KeyCode::Enter));
        assert!(matches!(outcome, FormOutcome::Submit(AuthRequest::Register(_))));
        assert_eq!(form.busy, Some(AuthOp::Register));

        let again = handle_form_key(FormKind::Register, &mut form, key(KeyCode::Enter));
        assert!(matches!(again, FormOutcome::Stay));
    }

    #[test]
    fn test_reset_requires_email() {
        let mut form = AuthForm::default();
        let outcome = handle_form_key(FormKind::Login, &mut form, ctrl('f'));
        assert!(
            matches!(&outcome, FormOutcome::Notify(n) if n.message == messages::RESET_NEEDS_EMAIL)
        );

        form.email.set("a@b.com");
        let outcome = handle_form_key(FormKind::Login, &mut form, ctrl('f'));
        assert!(matches!(
            outcome,
            FormOutcome::Submit(AuthRequest::ResetPassword { .. })
        ));
    }

    #[test]
    fn test_visibility_toggle_and_focus() {
        let mut form = AuthForm::default();
        assert!(form.password.is_hidden());
        handle_form_key(FormKind::Login, &mut form, ctrl('v'));
        assert!(!form.password.is_hidden());

        handle_form_key(FormKind::Login, &mut form, key(KeyCode::Tab));
        assert_eq!(form.focus, FormField::Password);
        handle_form_key(FormKind::Login, &mut form, key(KeyCode::Char('x')));
        assert_eq!(form.password.value(), "x");
    }

    #[test]
    fn test_federated_popup_only_opens_from_login() {
        let mut form = AuthForm::default();
        assert!(matches!(
            handle_form_key(FormKind::Login, &mut form, ctrl('g')),
            FormOutcome::OpenFederatedPopup
        ));
        assert!(matches!(
            handle_form_key(FormKind::Register, &mut form, ctrl('g')),
            FormOutcome::Stay
        ));
    }

    #[test]
    fn test_finish_register_schedules_redirect() {
        let mut form = AuthForm {
            busy: Some(AuthOp::Register),
            ..AuthForm::default()
        };
        let (n, next) = finish(&mut form, AuthOp::Register, &Ok(()));
        assert_eq!(n.message, messages::REGISTER_SUCCESS);
        assert!(matches!(next, FormOutcome::ScheduleRedirect(Route::Tasks)));
        assert!(form.redirect_pending);
        assert!(!form.accepts_submit());
    }

    #[test]
    fn test_finish_failure_maps_code() {
        let mut form = AuthForm {
            busy: Some(AuthOp::SignIn),
            ..AuthForm::default()
        };
        let err = AuthError::provider(AuthErrorCode::InvalidCredential, "nope");
        let (n, next) = finish(&mut form, AuthOp::SignIn, &Err(err));
        assert_eq!(n.severity, Severity::Error);
        assert!(matches!(next, FormOutcome::Stay));
        assert!(!form.is_busy());
    }
}
