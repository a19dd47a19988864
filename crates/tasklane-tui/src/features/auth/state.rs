use tasklane_core::credentials::Credentials;
use tasklane_core::notify::AuthOp;

use crate::common::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Email,
    Password,
}

impl FormField {
    pub fn other(self) -> Self {
        match self {
            FormField::Email => FormField::Password,
            FormField::Password => FormField::Email,
        }
    }
}

/// How the federated sign-in popup ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    Confirmed { email: String },
    Dismissed,
}

/// An authentication call for the runtime to perform.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Federated(PopupOutcome),
    SignIn(Credentials),
    Register(Credentials),
    ResetPassword { email: String },
}

impl AuthRequest {
    pub fn op(&self) -> AuthOp {
        match self {
            AuthRequest::Federated(_) => AuthOp::Federated,
            AuthRequest::SignIn(_) => AuthOp::SignIn,
            AuthRequest::Register(_) => AuthOp::Register,
            AuthRequest::ResetPassword { .. } => AuthOp::ResetPassword,
        }
    }
}

/// Email/password form state shared by the login and register views.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: FormField,
    /// Operation in flight; further submits are ignored meanwhile.
    pub busy: Option<AuthOp>,
    /// A successful registration is waiting for its delayed navigation.
    pub redirect_pending: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            email: TextField::default(),
            password: TextField::masked(),
            focus: FormField::Email,
            busy: None,
            redirect_pending: false,
        }
    }
}

impl AuthForm {
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Whether a new submit may start.
    pub fn accepts_submit(&self) -> bool {
        !self.is_busy() && !self.redirect_pending
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
        }
    }
}
