//! Task list state.
//!
//! Three writers, kept apart:
//! - [`Draft`]: the new-task input, written only by key handling.
//! - [`Authoritative`]: the last snapshot, written only by the subscription.
//! - [`PendingOps`]: commands not yet reflected in a snapshot, rendered on top
//!   of the authoritative list so the user's own edits show immediately.

use std::collections::{HashMap, VecDeque};

use tasklane_core::notify::TaskOp;
use tasklane_core::platform::store::{StoreResult, WriteReceipt};
use tasklane_core::tasks::{Category, NewTask, Task, TaskSnapshot};

use crate::common::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Category,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Category,
            Focus::Category => Focus::List,
            Focus::List => Focus::Input,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Input => Focus::List,
            Focus::Category => Focus::Input,
            Focus::List => Focus::Category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Draft {
    pub text: TextField,
    pub category: Category,
}

/// State as last reported by the store.
#[derive(Debug, Clone, Default)]
pub struct Authoritative {
    pub loaded: bool,
    pub revision: u64,
    pub tasks: Vec<Task>,
}

impl Authoritative {
    /// Replaces the state with a snapshot. Older snapshots are ignored.
    pub fn apply(&mut self, snapshot: TaskSnapshot) -> bool {
        if self.loaded && snapshot.revision < self.revision {
            return false;
        }
        self.loaded = true;
        self.revision = snapshot.revision;
        self.tasks = snapshot.tasks;
        true
    }
}

/// Client-side identifier of an issued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// A write against the tasks collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Create(NewTask),
    SetCompleted { id: String, completed: bool },
    Remove { id: String },
}

impl TaskCommand {
    pub fn op(&self) -> TaskOp {
        match self {
            TaskCommand::Create(_) => TaskOp::Add,
            TaskCommand::SetCompleted { completed, .. } => TaskOp::SetCompleted(*completed),
            TaskCommand::Remove { .. } => TaskOp::Remove,
        }
    }

    /// Commands sharing a key are issued one at a time.
    fn queue_key(&self, ticket: Ticket) -> String {
        match self {
            TaskCommand::Create(_) => local_key(ticket),
            TaskCommand::SetCompleted { id, .. } | TaskCommand::Remove { id } => id.clone(),
        }
    }
}

fn local_key(ticket: Ticket) -> String {
    format!("local-{}", ticket.0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Queued,
    InFlight,
    /// Acknowledged at `revision` under store id `id`, not yet seen in a
    /// snapshot.
    Applied { revision: u64, id: String },
}

#[derive(Debug, Clone)]
struct PendingEntry {
    ticket: Ticket,
    key: String,
    command: TaskCommand,
    phase: Phase,
}

/// Result of [`PendingOps::complete`].
#[derive(Debug)]
pub struct Completed {
    pub command: TaskCommand,
    /// Next command for the same task, now ready to issue.
    pub next: Option<(Ticket, TaskCommand)>,
}

/// A row as displayed: authoritative data with pending edits applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub task: Task,
    /// An edit to this row has not been confirmed yet.
    pub pending: bool,
    /// False for optimistic creates still waiting for their store id.
    pub persisted: bool,
}

/// Optimistic overlay with per-task command queues.
#[derive(Debug, Default)]
pub struct PendingOps {
    next_ticket: u64,
    entries: Vec<PendingEntry>,
    queues: HashMap<String, VecDeque<Ticket>>,
}

impl PendingOps {
    /// Records a command. Returns its ticket and whether it may be issued
    /// now (nothing else queued for the same task).
    pub fn enqueue(&mut self, command: TaskCommand) -> (Ticket, bool) {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let key = command.queue_key(ticket);
        let queue = self.queues.entry(key.clone()).or_default();
        let ready = queue.is_empty();
        queue.push_back(ticket);
        self.entries.push(PendingEntry {
            ticket,
            key,
            command,
            phase: if ready { Phase::InFlight } else { Phase::Queued },
        });
        (ticket, ready)
    }

    /// Records the store's answer for `ticket`.
    ///
    /// Failed commands are rolled back. Successful ones stay in the overlay
    /// until a snapshot at or past their revision arrives. Returns `None` for
    /// unknown tickets.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: &StoreResult<WriteReceipt>,
        authoritative_revision: u64,
    ) -> Option<Completed> {
        let index = self.entries.iter().position(|e| e.ticket == ticket)?;
        let key = self.entries[index].key.clone();
        let command = self.entries[index].command.clone();

        match result {
            Ok(receipt) if receipt.revision > authoritative_revision => {
                self.entries[index].phase = Phase::Applied {
                    revision: receipt.revision,
                    id: receipt.id.clone(),
                };
            }
            _ => {
                self.entries.remove(index);
            }
        }

        let mut next = None;
        if let Some(queue) = self.queues.get_mut(&key) {
            queue.retain(|t| *t != ticket);
            if let Some(&head) = queue.front()
                && let Some(entry) = self.entries.iter_mut().find(|e| e.ticket == head)
                && entry.phase == Phase::Queued
            {
                entry.phase = Phase::InFlight;
                next = Some((head, entry.command.clone()));
            }
            if queue.is_empty() {
                self.queues.remove(&key);
            }
        }
        Some(Completed { command, next })
    }

    /// Drops acknowledged edits that `revision` already reflects.
    pub fn reconcile(&mut self, revision: u64) {
        self.entries.retain(|e| match &e.phase {
            Phase::Applied {
                revision: applied, ..
            } => *applied > revision,
            Phase::Queued | Phase::InFlight => true,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Builds the displayed rows: `base` with every pending edit applied in
    /// issue order.
    pub fn view(&self, base: &[Task]) -> Vec<Row> {
        let mut rows: Vec<Row> = base
            .iter()
            .map(|task| Row {
                task: task.clone(),
                pending: false,
                persisted: true,
            })
            .collect();

        for entry in &self.entries {
            match &entry.command {
                TaskCommand::Create(new_task) => {
                    let (id, persisted) = match &entry.phase {
                        Phase::Applied { id, .. } => (id.clone(), true),
                        Phase::Queued | Phase::InFlight => (entry.key.clone(), false),
                    };
                    rows.push(Row {
                        task: Task {
                            id,
                            text: new_task.text.clone(),
                            completed: false,
                            category: new_task.category,
                        },
                        pending: true,
                        persisted,
                    });
                }
                TaskCommand::SetCompleted { id, completed } => {
                    if let Some(row) = rows.iter_mut().find(|r| &r.task.id == id) {
                        row.task.completed = *completed;
                        row.pending = true;
                    }
                }
                TaskCommand::Remove { id } => rows.retain(|r| &r.task.id != id),
            }
        }
        rows
    }
}

#[derive(Debug)]
pub struct TaskListState {
    pub draft: Draft,
    pub authoritative: Authoritative,
    pub pending: PendingOps,
    pub focus: Focus,
    pub selected: usize,
    /// The subscription for this view has been requested.
    pub subscribed: bool,
}

impl TaskListState {
    pub fn new(default_category: Category) -> Self {
        Self {
            draft: Draft {
                text: TextField::default(),
                category: default_category,
            },
            authoritative: Authoritative::default(),
            pending: PendingOps::default(),
            focus: Focus::Input,
            selected: 0,
            subscribed: false,
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        self.pending.view(&self.authoritative.tasks)
    }

    /// Keeps the selection inside the list.
    pub fn clamp_selection(&mut self) {
        let len = self.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {id}"),
            completed,
            category: Category::Work,
        }
    }

    fn receipt(id: &str, revision: u64) -> StoreResult<WriteReceipt> {
        Ok(WriteReceipt {
            id: id.to_string(),
            revision,
        })
    }

    #[test]
    fn test_same_task_commands_are_serialized() {
        let mut ops = PendingOps::default();
        let (first, ready) = ops.enqueue(TaskCommand::SetCompleted {
            id: "a".into(),
            completed: true,
        });
        assert!(ready);
        let (second, ready) = ops.enqueue(TaskCommand::SetCompleted {
            id: "a".into(),
            completed: false,
        });
        assert!(!ready);
        let (_, ready) = ops.enqueue(TaskCommand::Remove { id: "b".into() });
        assert!(ready, "other tasks are independent");

        let done = ops.complete(first, &receipt("a", 1), 0).unwrap();
        let (ticket, command) = done.next.unwrap();
        assert_eq!(ticket, second);
        assert_eq!(
            command,
            TaskCommand::SetCompleted {
                id: "a".into(),
                completed: false
            }
        );
    }

    #[test]
    fn test_overlay_shows_final_state_immediately() {
        let mut ops = PendingOps::default();
        ops.enqueue(TaskCommand::SetCompleted {
            id: "a".into(),
            completed: true,
        });
        ops.enqueue(TaskCommand::SetCompleted {
            id: "a".into(),
            completed: false,
        });
        ops.enqueue(TaskCommand::Remove { id: "b".into() });

        let rows = ops.view(&[task("a", false), task("b", false)]);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].task.completed);
        assert!(rows[0].pending);
    }

    #[test]
    fn test_applied_edits_drop_once_snapshot_catches_up() {
        let mut ops = PendingOps::default();
        let (ticket, _) = ops.enqueue(TaskCommand::SetCompleted {
            id: "a".into(),
            completed: true,
        });
        ops.complete(ticket, &receipt("a", 5), 4);
        assert_eq!(ops.len(), 1);

        ops.reconcile(4);
        assert_eq!(ops.len(), 1);
        ops.reconcile(5);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_completion_behind_snapshot_drops_immediately() {
        let mut ops = PendingOps::default();
        let (ticket, _) = ops.enqueue(TaskCommand::Remove { id: "a".into() });
        ops.complete(ticket, &receipt("a", 3), 3);
        assert!(ops.is_empty());
    }

    #[test]
    fn test_failed_create_is_rolled_back() {
        let mut ops = PendingOps::default();
        let new_task = NewTask::from_draft("milk", Category::Study).unwrap();
        let (ticket, _) = ops.enqueue(TaskCommand::Create(new_task));
        let rows = ops.view(&[]);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].persisted);

        let err = tasklane_core::platform::store::StoreError::storage("disk full");
        let done = ops.complete(ticket, &Err(err), 0).unwrap();
        assert!(matches!(done.command, TaskCommand::Create(_)));
        assert!(ops.view(&[]).is_empty());
    }

    #[test]
    fn test_older_snapshot_is_ignored() {
        let mut auth = Authoritative::default();
        assert!(auth.apply(TaskSnapshot {
            revision: 4,
            tasks: vec![task("a", false)],
        }));
        assert!(!auth.apply(TaskSnapshot {
            revision: 3,
            tasks: vec![],
        }));
        assert_eq!(auth.tasks.len(), 1);
    }
}
