//! Effect execution.
//!
//! The dispatcher owns the platform handles and the inbox sender. It is kept
//! apart from the terminal so flows can be driven headless.

use std::future::Future;
use std::sync::Arc;

use tasklane_core::platform::Platform;
use tracing::warn;

use super::handlers;
use super::inbox::UiEventSender;
use crate::effects::UiEffect;
use crate::events::UiEvent;

pub struct Dispatcher {
    platform: Platform,
    inbox_tx: UiEventSender,
}

impl Dispatcher {
    pub fn new(platform: Platform, inbox_tx: UiEventSender) -> Self {
        Self { platform, inbox_tx }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn execute_effects(&self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a one-shot handler and sends its result to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Executes a single effect. Must be called inside a tokio runtime.
    pub fn execute_effect(&self, effect: UiEffect) {
        match effect {
            // The reducer already set `should_quit`.
            UiEffect::Quit => {}
            UiEffect::CancelScope { token } => token.cancel(),
            UiEffect::WatchSession { scope } => {
                // Registered here, not in the spawned task, so the listener
                // exists before the effect returns.
                let listener = self.platform.identity.watch_sessions();
                tokio::spawn(handlers::forward_sessions(
                    listener,
                    scope,
                    self.inbox_tx.clone(),
                ));
            }
            UiEffect::Authenticate { epoch, request } => {
                let identity = Arc::clone(&self.platform.identity);
                self.spawn_effect(move || handlers::authenticate(identity, epoch, request));
            }
            UiEffect::SignOut { epoch } => {
                let identity = Arc::clone(&self.platform.identity);
                self.spawn_effect(move || handlers::sign_out(identity, epoch));
            }
            UiEffect::ScheduleRedirect {
                scope,
                route,
                after,
            } => {
                tokio::spawn(handlers::redirect_after(
                    scope,
                    route,
                    after,
                    self.inbox_tx.clone(),
                ));
            }
            UiEffect::SubscribeTasks { scope, session } => {
                match self.platform.tasks().subscribe(&session) {
                    Ok(feed) => {
                        tokio::spawn(handlers::forward_tasks(feed, scope, self.inbox_tx.clone()));
                    }
                    Err(error) => {
                        warn!("task subscription rejected: {error}");
                        let _ = self.inbox_tx.send(UiEvent::TasksUnavailable {
                            epoch: scope.epoch,
                            error,
                        });
                    }
                }
            }
            UiEffect::RunTaskCommand {
                epoch,
                session,
                ticket,
                command,
            } => {
                let repository = self.platform.tasks();
                self.spawn_effect(move || {
                    handlers::run_task_command(repository, session, epoch, ticket, command)
                });
            }
        }
    }
}
