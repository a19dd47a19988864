//! User-facing notifications and the error-to-message policy.
//!
//! Every string shown to the user lives here so the TUI and the headless
//! commands report the same outcome with the same words.

use std::fmt;

use crate::platform::identity::{AuthError, AuthErrorCode};
use crate::platform::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Warnings and errors are reported as failures by the headless commands.
    pub fn is_failure(self) -> bool {
        matches!(self, Severity::Warning | Severity::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Message catalog.
pub mod messages {
    pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
    pub const RESET_NEEDS_EMAIL: &str = "Enter your email to reset your password.";
    pub const WEAK_PASSWORD_RULE: &str = "Password must be at least 8 characters long and include an uppercase letter, a lowercase letter, a number and a special character (!@#$%^&*).";

    pub const FEDERATED_SUCCESS: &str = "Signed in with Google!";
    pub const SIGN_IN_SUCCESS: &str = "Signed in successfully!";
    pub const REGISTER_SUCCESS: &str = "Account created successfully!";
    pub const RESET_SENT: &str = "Password reset email sent!";
    pub const SIGNED_OUT: &str = "Signed out.";

    pub const POPUP_CLOSED: &str = "You closed the sign-in window. Try again.";
    pub const PROVIDER_WEAK_PASSWORD: &str = "Password must be at least 6 characters.";
    pub const EMAIL_IN_USE: &str = "This email is already in use.";
    pub const INVALID_EMAIL: &str = "Invalid email.";
    pub const INVALID_CREDENTIAL: &str = "Sign-in failed. Check your credentials.";
    pub const USER_NOT_FOUND: &str = "No account found for this email.";
    pub const UNEXPECTED: &str = "An unexpected error occurred. Try again.";

    pub const SIGN_IN_FAILED: &str = "Sign-in failed. Check your credentials.";
    pub const REGISTER_FAILED: &str = "Could not create the account. Try again.";
    pub const RESET_FAILED: &str = "Could not send the email. Check the address you entered.";
    pub const SIGN_OUT_FAILED: &str = "Could not sign out. Try again.";

    pub const EMPTY_TASK: &str = "Task text cannot be empty.";
    pub const TASK_ADDED: &str = "Task added!";
    pub const TASK_ADD_FAILED: &str = "Could not add the task.";
    pub const TASK_COMPLETED: &str = "Task completed!";
    pub const TASK_REOPENED: &str = "Task marked as pending.";
    pub const TASK_UPDATE_FAILED: &str = "Could not update the task.";
    pub const TASK_REMOVED: &str = "Task removed!";
    pub const TASK_REMOVE_FAILED: &str = "Could not remove the task.";
    pub const TASKS_UNAVAILABLE: &str = "Could not load your tasks.";

    pub const NOT_SIGNED_IN: &str = "Not signed in. Run `tasklane account login` first.";
}

/// Authentication operations that report through [`auth_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOp {
    Federated,
    SignIn,
    Register,
    ResetPassword,
}

impl AuthOp {
    pub fn success(self) -> Notification {
        match self {
            AuthOp::Federated => Notification::success(messages::FEDERATED_SUCCESS),
            AuthOp::SignIn => Notification::success(messages::SIGN_IN_SUCCESS),
            AuthOp::Register => Notification::success(messages::REGISTER_SUCCESS),
            AuthOp::ResetPassword => Notification::success(messages::RESET_SENT),
        }
    }
}

/// Maps an authentication failure to a notification.
///
/// Known provider codes get the same message whichever operation raised
/// them. Unknown codes fall back to the operation's generic message, except
/// federated sign-in which shows the provider's own text.
pub fn auth_failure(op: AuthOp, error: &AuthError) -> Notification {
    let (code, message) = match error {
        AuthError::Provider { code, message } => (code, message),
        AuthError::Unexpected(_) => return Notification::error(messages::UNEXPECTED),
    };
    match code {
        AuthErrorCode::PopupClosedByUser => Notification::warning(messages::POPUP_CLOSED),
        AuthErrorCode::WeakPassword => Notification::error(messages::PROVIDER_WEAK_PASSWORD),
        AuthErrorCode::EmailAlreadyInUse => Notification::error(messages::EMAIL_IN_USE),
        AuthErrorCode::InvalidEmail => Notification::error(messages::INVALID_EMAIL),
        AuthErrorCode::InvalidCredential => Notification::error(messages::INVALID_CREDENTIAL),
        AuthErrorCode::UserNotFound => Notification::error(messages::USER_NOT_FOUND),
        AuthErrorCode::Other(_) => match op {
            AuthOp::Federated => Notification::error(format!("Error: {message}")),
            AuthOp::SignIn => Notification::error(messages::SIGN_IN_FAILED),
            AuthOp::Register => Notification::error(messages::REGISTER_FAILED),
            AuthOp::ResetPassword => Notification::error(messages::RESET_FAILED),
        },
    }
}

pub fn signed_out() -> Notification {
    Notification::info(messages::SIGNED_OUT)
}

pub fn sign_out_failed() -> Notification {
    Notification::error(messages::SIGN_OUT_FAILED)
}

pub fn tasks_unavailable(error: &StoreError) -> Notification {
    tracing::warn!("task subscription failed: {error}");
    Notification::error(messages::TASKS_UNAVAILABLE)
}

pub fn not_signed_in() -> Notification {
    Notification::warning(messages::NOT_SIGNED_IN)
}

/// Task commands, for outcome reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    Add,
    /// Setting `completed` to the carried value.
    SetCompleted(bool),
    Remove,
}

impl TaskOp {
    pub fn success(self) -> Notification {
        match self {
            TaskOp::Add => Notification::success(messages::TASK_ADDED),
            TaskOp::SetCompleted(true) => Notification::info(messages::TASK_COMPLETED),
            TaskOp::SetCompleted(false) => Notification::info(messages::TASK_REOPENED),
            TaskOp::Remove => Notification::warning(messages::TASK_REMOVED),
        }
    }

    /// Store errors are not shown verbatim; only the operation is reported.
    pub fn failure(self, error: &StoreError) -> Notification {
        tracing::warn!("task command failed: {error}");
        match self {
            TaskOp::Add => Notification::error(messages::TASK_ADD_FAILED),
            TaskOp::SetCompleted(_) => Notification::error(messages::TASK_UPDATE_FAILED),
            TaskOp::Remove => Notification::error(messages::TASK_REMOVE_FAILED),
        }
    }
}
