//! Account command handlers.

use anyhow::Result;
use tasklane_core::credentials;
use tasklane_core::notify::{self, AuthOp};
use tasklane_core::platform::Platform;

use super::{done, fail};

pub async fn register(platform: &Platform, email: &str, password: &str) -> Result<()> {
    let credentials = match credentials::validate_registration(email, password) {
        Ok(credentials) => credentials,
        Err(notification) => return fail(notification),
    };
    match platform
        .identity
        .create_account(&credentials.email, &credentials.password)
        .await
    {
        Ok(_) => done(AuthOp::Register.success()),
        Err(e) => fail(notify::auth_failure(AuthOp::Register, &e)),
    }
}

pub async fn login(platform: &Platform, email: &str, password: &str) -> Result<()> {
    let credentials = match credentials::validate_sign_in(email, password) {
        Ok(credentials) => credentials,
        Err(notification) => return fail(notification),
    };
    match platform
        .identity
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
    {
        Ok(_) => done(AuthOp::SignIn.success()),
        Err(e) => fail(notify::auth_failure(AuthOp::SignIn, &e)),
    }
}

pub async fn logout(platform: &Platform) -> Result<()> {
    if platform.identity.current_session().is_none() {
        return fail(notify::not_signed_in());
    }
    match platform.identity.sign_out().await {
        Ok(()) => done(notify::signed_out()),
        Err(e) => {
            tracing::warn!("sign-out failed: {e}");
            fail(notify::sign_out_failed())
        }
    }
}

pub fn whoami(platform: &Platform) -> Result<()> {
    match platform.identity.current_session() {
        Some(session) => {
            println!("{}", session.email);
            Ok(())
        }
        None => fail(notify::not_signed_in()),
    }
}

pub async fn reset_password(platform: &Platform, email: &str) -> Result<()> {
    let email = match credentials::validate_reset(email) {
        Ok(email) => email,
        Err(notification) => return fail(notification),
    };
    match platform.identity.send_password_reset(&email).await {
        Ok(()) => done(AuthOp::ResetPassword.success()),
        Err(e) => fail(notify::auth_failure(AuthOp::ResetPassword, &e)),
    }
}
