//! File-backed identity provider.
//!
//! Accounts live in `accounts.json` keyed by normalized email, with salted
//! SHA-256 password digests. A single hash round keeps passwords out of the
//! file in clear; it is not meant to protect real credentials.
//!
//! The active session is persisted to `session.json` and read once when the
//! provider is opened. It survives restarts and is picked up by processes
//! started later on the same data directory, but a running provider does not
//! see sign-ins or sign-outs made by another process. Password-reset messages
//! are appended to `outbox.jsonl`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::files;
use crate::platform::identity::{
    AuthError, AuthErrorCode, AuthResult, FederatedCredential, IdentityProvider, Session,
    SessionChannel, SessionListener, SignInMethod,
};

const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";
const OUTBOX_FILE: &str = "outbox.jsonl";

/// Minimum length the provider itself accepts for a password.
const PROVIDER_MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: BTreeMap<String, AccountRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    uid: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<PasswordDigest>,
    #[serde(default)]
    methods: Vec<SignInMethod>,
    created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PasswordDigest {
    salt: String,
    sha256: String,
}

impl PasswordDigest {
    fn new(password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let sha256 = digest(&salt, password);
        Self { salt, sha256 }
    }

    fn verify(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.sha256
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Trims and lower-cases an email, rejecting malformed addresses.
fn normalize_email(email: &str) -> AuthResult<String> {
    let normalized = email.trim().to_lowercase();
    if email_pattern().is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(AuthError::provider(
            AuthErrorCode::InvalidEmail,
            "The email address is badly formatted.",
        ))
    }
}

fn invalid_credential() -> AuthError {
    AuthError::provider(
        AuthErrorCode::InvalidCredential,
        "The supplied credentials are incorrect.",
    )
}

fn unexpected(err: &anyhow::Error) -> AuthError {
    AuthError::unexpected(format!("{err:#}"))
}

/// Identity provider backed by files in a data directory.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the accounts file.
    lock: Mutex<()>,
    sessions: SessionChannel,
}

impl LocalIdentityProvider {
    /// Opens the provider, restoring the persisted session if any.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be parsed.
    pub fn open(dir: &Path) -> Result<Self> {
        let stored: Option<Session> = files::read_json_or_default(&dir.join(SESSION_FILE))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            lock: Mutex::new(()),
            sessions: SessionChannel::new(stored),
        })
    }

    fn accounts_path(&self) -> PathBuf {
        self.dir.join(ACCOUNTS_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Runs a read-modify-write cycle on the accounts file.
    ///
    /// The closure decides the outcome; the file is only rewritten when it
    /// returns `Ok((true, _))`.
    fn with_accounts<T>(
        &self,
        f: impl FnOnce(&mut AccountsFile) -> AuthResult<(bool, T)>,
    ) -> AuthResult<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_poisoned| AuthError::unexpected("Account store lock poisoned"))?;
        let path = self.accounts_path();
        let mut accounts: AccountsFile =
            files::read_json_or_default(&path).map_err(|e| unexpected(&e))?;
        let (dirty, value) = f(&mut accounts)?;
        if dirty {
            files::write_json_atomic(&path, &accounts).map_err(|e| unexpected(&e))?;
        }
        Ok(value)
    }

    fn establish(&self, session: Session) -> AuthResult<Session> {
        files::write_json_atomic(&self.session_path(), &Some(&session))
            .map_err(|e| unexpected(&e))?;
        info!(uid = %session.uid, method = ?session.method, "signed in");
        self.sessions.publish(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in_federated(&self, credential: FederatedCredential) -> AuthResult<Session> {
        let email = normalize_email(&credential.email)?;
        let method = credential.provider.method();
        let session = self.with_accounts(|file| {
            let record = file.accounts.entry(email.clone()).or_insert_with(|| {
                info!(%email, provider = credential.provider.display_name(), "creating federated account");
                AccountRecord {
                    uid: uuid::Uuid::new_v4().to_string(),
                    email: email.clone(),
                    password: None,
                    methods: Vec::new(),
                    created_at: chrono::Utc::now().to_rfc3339(),
                }
            });
            let linked = !record.methods.contains(&method);
            if linked {
                record.methods.push(method);
            }
            let session = Session {
                uid: record.uid.clone(),
                email: record.email.clone(),
                method,
            };
            Ok((linked, session))
        })?;
        self.establish(session)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = normalize_email(email)?;
        let session = self.with_accounts(|file| {
            let record = file.accounts.get(&email).ok_or_else(invalid_credential)?;
            let digest = record.password.as_ref().ok_or_else(invalid_credential)?;
            if !digest.verify(password) {
                return Err(invalid_credential());
            }
            Ok((
                false,
                Session {
                    uid: record.uid.clone(),
                    email: record.email.clone(),
                    method: SignInMethod::Password,
                },
            ))
        })?;
        self.establish(session)
    }

    async fn create_account(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = normalize_email(email)?;
        if password.chars().count() < PROVIDER_MIN_PASSWORD_LEN {
            return Err(AuthError::provider(
                AuthErrorCode::WeakPassword,
                "Password should be at least 6 characters.",
            ));
        }
        let session = self.with_accounts(|file| {
            if file.accounts.contains_key(&email) {
                return Err(AuthError::provider(
                    AuthErrorCode::EmailAlreadyInUse,
                    "The email address is already in use by another account.",
                ));
            }
            let record = AccountRecord {
                uid: uuid::Uuid::new_v4().to_string(),
                email: email.clone(),
                password: Some(PasswordDigest::new(password)),
                methods: vec![SignInMethod::Password],
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            let session = Session {
                uid: record.uid.clone(),
                email: record.email.clone(),
                method: SignInMethod::Password,
            };
            file.accounts.insert(email.clone(), record);
            info!(%email, "account created");
            Ok((true, session))
        })?;
        self.establish(session)
    }

    async fn send_password_reset(&self, email: &str) -> AuthResult<()> {
        let email = normalize_email(email)?;
        let known = self.with_accounts(|file| Ok((false, file.accounts.contains_key(&email))))?;
        if !known {
            return Err(AuthError::provider(
                AuthErrorCode::UserNotFound,
                "There is no account for this email address.",
            ));
        }
        let entry = serde_json::json!({
            "kind": "password_reset",
            "to": email,
            "token": uuid::Uuid::new_v4().to_string(),
            "sent_at": chrono::Utc::now().to_rfc3339(),
        });
        files::append_json_line(&self.dir.join(OUTBOX_FILE), &entry)
            .map_err(|e| unexpected(&e))?;
        info!(%email, "password reset message queued");
        Ok(())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if let Err(e) = files::remove_if_exists(&self.session_path()) {
            warn!("failed to clear persisted session: {e:#}");
            return Err(unexpected(&e));
        }
        info!("signed out");
        self.sessions.publish(None);
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.sessions.current()
    }

    fn watch_sessions(&self) -> SessionListener {
        self.sessions.listen()
    }

    fn listener_count(&self) -> usize {
        self.sessions.listener_count()
    }
}
