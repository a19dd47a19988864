//! UI events consumed by the reducer.
//!
//! Terminal input and timer ticks come from the runtime loop; everything
//! else is the result of an effect, delivered through the inbox and tagged
//! with the epoch of the view that requested it.

use crossterm::event::Event;
use tasklane_core::notify::AuthOp;
use tasklane_core::platform::identity::{AuthResult, Session};
use tasklane_core::platform::store::{StoreError, StoreResult, WriteReceipt};
use tasklane_core::tasks::TaskSnapshot;

use crate::common::Epoch;
use crate::features::gate::Route;
use crate::features::tasks::Ticket;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick; drives toast expiry and redraws.
    Tick,
    Terminal(Event),

    /// Session state observed by a view's listener.
    Session {
        epoch: Epoch,
        session: Option<Session>,
    },

    /// An authentication operation finished.
    AuthFinished {
        epoch: Epoch,
        op: AuthOp,
        result: AuthResult<()>,
    },
    SignedOut {
        epoch: Epoch,
        result: AuthResult<()>,
    },

    /// The delayed navigation scheduled after a registration is due.
    RedirectDue {
        epoch: Epoch,
        route: Route,
    },

    TasksSnapshot {
        epoch: Epoch,
        snapshot: TaskSnapshot,
    },
    TasksUnavailable {
        epoch: Epoch,
        error: StoreError,
    },
    TaskCommandFinished {
        epoch: Epoch,
        ticket: Ticket,
        result: StoreResult<WriteReceipt>,
    },
}
