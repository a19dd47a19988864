use std::time::Duration;

use tasklane_core::platform::identity::SessionListener;
use tracing::debug;

use crate::common::ViewScope;
use crate::events::UiEvent;
use crate::features::gate::Route;
use crate::runtime::inbox::UiEventSender;

/// Forwards session changes until the scope is cancelled. Dropping the
/// listener on exit unregisters it.
pub async fn forward_sessions(mut listener: SessionListener, scope: ViewScope, tx: UiEventSender) {
    let epoch = scope.epoch;
    loop {
        tokio::select! {
            () = scope.cancel.cancelled() => break,
            next = listener.next() => {
                let Some(session) = next else { break };
                if tx.send(UiEvent::Session { epoch, session }).is_err() {
                    break;
                }
            }
        }
    }
    debug!(epoch = epoch.0, "session listener released");
}

/// Emits `RedirectDue` after `after`, unless the scope ends first.
pub async fn redirect_after(scope: ViewScope, route: Route, after: Duration, tx: UiEventSender) {
    tokio::select! {
        () = scope.cancel.cancelled() => {
            debug!(epoch = scope.epoch.0, "redirect cancelled");
        }
        () = tokio::time::sleep(after) => {
            let _ = tx.send(UiEvent::RedirectDue { epoch: scope.epoch, route });
        }
    }
}
