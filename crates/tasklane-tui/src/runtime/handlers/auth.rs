use std::sync::Arc;

use tasklane_core::platform::identity::{
    AuthError, FederatedCredential, FederatedProvider, IdentityProvider,
};
use tracing::info;

use crate::common::Epoch;
use crate::events::UiEvent;
use crate::features::auth::{AuthRequest, PopupOutcome};

/// Runs an authentication request.
///
/// A dismissed popup never reaches the provider; it fails the same way the
/// provider reports a closed window.
pub async fn authenticate(
    identity: Arc<dyn IdentityProvider>,
    epoch: Epoch,
    request: AuthRequest,
) -> UiEvent {
    let op = request.op();
    let result = match request {
        AuthRequest::Federated(PopupOutcome::Dismissed) => Err(AuthError::popup_closed()),
        AuthRequest::Federated(PopupOutcome::Confirmed { email }) => identity
            .sign_in_federated(FederatedCredential {
                provider: FederatedProvider::Google,
                email,
            })
            .await
            .map(|_| ()),
        AuthRequest::SignIn(credentials) => identity
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await
            .map(|_| ()),
        AuthRequest::Register(credentials) => identity
            .create_account(&credentials.email, &credentials.password)
            .await
            .map(|_| ()),
        AuthRequest::ResetPassword { email } => identity.send_password_reset(&email).await,
    };
    match &result {
        Ok(()) => info!(?op, "auth operation succeeded"),
        Err(e) => info!(?op, "auth operation failed: {e}"),
    }
    UiEvent::AuthFinished { epoch, op, result }
}

pub async fn sign_out(identity: Arc<dyn IdentityProvider>, epoch: Epoch) -> UiEvent {
    let result = identity.sign_out().await;
    UiEvent::SignedOut { epoch, result }
}
