use tasklane_core::platform::identity::Session;
use tasklane_core::tasks::{TaskFeed, TaskRepository};
use tracing::debug;

use crate::common::{Epoch, ViewScope};
use crate::events::UiEvent;
use crate::features::tasks::{TaskCommand, Ticket};
use crate::runtime::inbox::UiEventSender;

/// Forwards task snapshots until the scope is cancelled.
pub async fn forward_tasks(mut feed: TaskFeed, scope: ViewScope, tx: UiEventSender) {
    let epoch = scope.epoch;
    loop {
        tokio::select! {
            () = scope.cancel.cancelled() => break,
            next = feed.next() => {
                let Some(snapshot) = next else { break };
                if tx.send(UiEvent::TasksSnapshot { epoch, snapshot }).is_err() {
                    break;
                }
            }
        }
    }
    debug!(epoch = epoch.0, "task subscription released");
}

pub async fn run_task_command(
    repository: TaskRepository,
    session: Session,
    epoch: Epoch,
    ticket: Ticket,
    command: TaskCommand,
) -> UiEvent {
    let result = match command {
        TaskCommand::Create(task) => repository.create(&session, task).await,
        TaskCommand::SetCompleted { id, completed } => {
            repository.set_completed(&session, &id, completed).await
        }
        TaskCommand::Remove { id } => repository.remove(&session, &id).await,
    };
    UiEvent::TaskCommandFinished {
        epoch,
        ticket,
        result,
    }
}
