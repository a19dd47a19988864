//! Identity provider boundary.
//!
//! Sessions are observed through [`SessionListener`], never polled: a listener
//! yields the current state once and then every change. Each listener counts
//! itself in the provider while alive so leaks across views are detectable.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// How a session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInMethod {
    Password,
    Google,
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user id, used as the owner of the user's documents.
    pub uid: String,
    pub email: String,
    pub method: SignInMethod,
}

/// Third-party identity providers available for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
}

impl FederatedProvider {
    pub fn display_name(self) -> &'static str {
        match self {
            FederatedProvider::Google => "Google",
        }
    }

    pub fn method(self) -> SignInMethod {
        match self {
            FederatedProvider::Google => SignInMethod::Google,
        }
    }
}

/// The account confirmed in a federated sign-in popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    pub provider: FederatedProvider,
    pub email: String,
}

/// Discriminable provider error codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    PopupClosedByUser,
    WeakPassword,
    EmailAlreadyInUse,
    InvalidEmail,
    InvalidCredential,
    UserNotFound,
    Other(String),
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorCode::PopupClosedByUser => "auth/popup-closed-by-user",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned by identity operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected the call with a known code.
    Provider { code: AuthErrorCode, message: String },
    /// Anything that is not a provider decision (I/O, corrupt state, ...).
    Unexpected(String),
}

impl AuthError {
    pub fn provider(code: AuthErrorCode, message: impl Into<String>) -> Self {
        AuthError::Provider {
            code,
            message: message.into(),
        }
    }

    /// The user dismissed the federated sign-in popup.
    pub fn popup_closed() -> Self {
        Self::provider(
            AuthErrorCode::PopupClosedByUser,
            "The popup has been closed by the user before finalizing the operation.",
        )
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        AuthError::Unexpected(message.into())
    }

    pub fn code(&self) -> Option<&AuthErrorCode> {
        match self {
            AuthError::Provider { code, .. } => Some(code),
            AuthError::Unexpected(_) => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Provider { code, message } => write!(f, "{message} ({code})"),
            AuthError::Unexpected(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Result type for identity operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Issues and validates sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with an account confirmed through a third-party popup.
    async fn sign_in_federated(&self, credential: FederatedCredential) -> AuthResult<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Creates a password account and signs it in.
    async fn create_account(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Dispatches a password-reset message to `email`.
    async fn send_password_reset(&self, email: &str) -> AuthResult<()>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// Last resolved session state.
    fn current_session(&self) -> Option<Session>;

    /// Registers a session-change listener.
    fn watch_sessions(&self) -> SessionListener;

    /// Number of listeners currently registered.
    fn listener_count(&self) -> usize;
}

/// Broadcasts session changes to listeners. Shared by provider backends.
#[derive(Debug)]
pub struct SessionChannel {
    tx: watch::Sender<Option<Session>>,
    listeners: Arc<AtomicUsize>,
}

impl SessionChannel {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            listeners: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Publishes a new state. Listeners are only woken when it differs.
    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    pub fn listen(&self) -> SessionListener {
        self.listeners.fetch_add(1, Ordering::SeqCst);
        SessionListener {
            rx: self.tx.subscribe(),
            initial_delivered: false,
            listeners: Arc::clone(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }
}

/// A registered session-change listener. Unregisters itself on drop.
#[derive(Debug)]
pub struct SessionListener {
    rx: watch::Receiver<Option<Session>>,
    initial_delivered: bool,
    listeners: Arc<AtomicUsize>,
}

impl SessionListener {
    /// Waits for the next session state.
    ///
    /// The first call resolves immediately with the current state. Returns
    /// `None` once the provider has been dropped.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        if !self.initial_delivered {
            self.initial_delivered = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl Drop for SessionListener {
    fn drop(&mut self) {
        self.listeners.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(uid: &str) -> Session {
        Session {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            method: SignInMethod::Password,
        }
    }

    #[tokio::test]
    async fn test_listener_yields_initial_then_changes() {
        let channel = SessionChannel::new(None);
        let mut listener = channel.listen();

        assert_eq!(listener.next().await, Some(None));

        channel.publish(Some(session("u1")));
        assert_eq!(listener.next().await, Some(Some(session("u1"))));

        channel.publish(None);
        assert_eq!(listener.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_publishing_same_state_does_not_wake() {
        let channel = SessionChannel::new(Some(session("u1")));
        let mut listener = channel.listen();
        assert_eq!(listener.next().await, Some(Some(session("u1"))));

        channel.publish(Some(session("u1")));
        channel.publish(Some(session("u2")));
        assert_eq!(listener.next().await, Some(Some(session("u2"))));
    }

    #[test]
    fn test_listener_count_tracks_drops() {
        let channel = SessionChannel::new(None);
        let a = channel.listen();
        let b = channel.listen();
        assert_eq!(channel.listener_count(), 2);
        drop(a);
        assert_eq!(channel.listener_count(), 1);
        drop(b);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_error_display_includes_code() {
        let err = AuthError::provider(AuthErrorCode::InvalidEmail, "bad address");
        assert_eq!(err.to_string(), "bad address (auth/invalid-email)");
        assert_eq!(err.code(), Some(&AuthErrorCode::InvalidEmail));
        assert_eq!(AuthError::unexpected("disk").code(), None);
    }
}
