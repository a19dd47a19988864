//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never touches the
//! platform directly.

use std::time::Duration;

use tasklane_core::platform::identity::Session;
use tokio_util::sync::CancellationToken;

use crate::common::{Epoch, ViewScope};
use crate::features::auth::AuthRequest;
use crate::features::gate::Route;
use crate::features::tasks::{TaskCommand, Ticket};

#[derive(Debug)]
pub enum UiEffect {
    /// Leave the event loop.
    Quit,

    /// Register a session listener living as long as the scope.
    WatchSession { scope: ViewScope },

    /// End a view scope: its listener and subscription stop.
    CancelScope { token: CancellationToken },

    Authenticate { epoch: Epoch, request: AuthRequest },

    SignOut { epoch: Epoch },

    /// Navigate to `route` after `after`, unless the view is gone by then.
    ScheduleRedirect {
        scope: ViewScope,
        route: Route,
        after: Duration,
    },

    /// Subscribe to the session owner's tasks for the scope's lifetime.
    SubscribeTasks { scope: ViewScope, session: Session },

    RunTaskCommand {
        epoch: Epoch,
        session: Session,
        ticket: Ticket,
        command: TaskCommand,
    },
}
