//! Task list reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklane_core::notify::Notification;
use tasklane_core::platform::store::{StoreResult, WriteReceipt};
use tasklane_core::tasks::{NewTask, TaskSnapshot};

use super::state::{TaskCommand, TaskListState, Ticket};

#[derive(Debug, PartialEq, Eq)]
pub enum ListOutcome {
    Stay,
    /// Send `command` to the store now.
    Issue(Ticket, TaskCommand),
    /// Queued behind another command for the same task.
    Queued,
    SignOut,
}

pub fn handle_list_key(list: &mut TaskListState, key: KeyEvent) -> ListOutcome {
    use super::state::Focus;

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('o') {
        return ListOutcome::SignOut;
    }

    match key.code {
        KeyCode::Tab => {
            list.focus = list.focus.next();
            return ListOutcome::Stay;
        }
        KeyCode::BackTab => {
            list.focus = list.focus.previous();
            return ListOutcome::Stay;
        }
        _ => {}
    }

    match list.focus {
        Focus::Input => match key.code {
            KeyCode::Enter => add(list),
            _ => {
                list.draft.text.input(key);
                ListOutcome::Stay
            }
        },
        Focus::Category => match key.code {
            KeyCode::Left => {
                list.draft.category = list.draft.category.previous();
                ListOutcome::Stay
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                list.draft.category = list.draft.category.next();
                ListOutcome::Stay
            }
            KeyCode::Enter => add(list),
            _ => ListOutcome::Stay,
        },
        Focus::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                list.selected = list.selected.saturating_sub(1);
                ListOutcome::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list.selected += 1;
                list.clamp_selection();
                ListOutcome::Stay
            }
            KeyCode::Char(' ') | KeyCode::Enter => toggle_selected(list),
            KeyCode::Delete | KeyCode::Char('d') => remove_selected(list),
            _ => ListOutcome::Stay,
        },
    }
}

fn issue(list: &mut TaskListState, command: TaskCommand) -> ListOutcome {
    let (ticket, ready) = list.pending.enqueue(command.clone());
    if ready {
        ListOutcome::Issue(ticket, command)
    } else {
        ListOutcome::Queued
    }
}

fn add(list: &mut TaskListState) -> ListOutcome {
    match NewTask::from_draft(list.draft.text.value(), list.draft.category) {
        Some(task) => issue(list, TaskCommand::Create(task)),
        None => ListOutcome::Stay,
    }
}

fn toggle_selected(list: &mut TaskListState) -> ListOutcome {
    let Some(row) = list.rows().into_iter().nth(list.selected) else {
        return ListOutcome::Stay;
    };
    if !row.persisted {
        return ListOutcome::Stay;
    }
    issue(
        list,
        TaskCommand::SetCompleted {
            id: row.task.id,
            completed: !row.task.completed,
        },
    )
}

fn remove_selected(list: &mut TaskListState) -> ListOutcome {
    let Some(row) = list.rows().into_iter().nth(list.selected) else {
        return ListOutcome::Stay;
    };
    if !row.persisted {
        return ListOutcome::Stay;
    }
    let outcome = issue(list, TaskCommand::Remove { id: row.task.id });
    list.clamp_selection();
    outcome
}

/// Replaces the authoritative list and drops overlay entries it reflects.
pub fn apply_snapshot(list: &mut TaskListState, snapshot: TaskSnapshot) {
    let revision = snapshot.revision;
    if list.authoritative.apply(snapshot) {
        list.pending.reconcile(revision);
    }
    list.clamp_selection();
}

/// Records a command's outcome.
///
/// Returns the notification to show and the next queued command for the
/// same task, if any.
pub fn command_finished(
    list: &mut TaskListState,
    ticket: Ticket,
    result: &StoreResult<WriteReceipt>,
) -> (Option<Notification>, Option<(Ticket, TaskCommand)>) {
    let Some(done) = list
        .pending
        .complete(ticket, result, list.authoritative.revision)
    else {
        return (None, None);
    };
    let notification = match result {
        Ok(_) => {
            // Keep anything typed since the submit.
            if let TaskCommand::Create(task) = &done.command
                && list.draft.text.value() == task.text
            {
                list.draft.text.clear();
            }
            done.command.op().success()
        }
        Err(error) => done.command.op().failure(error),
    };
    list.clamp_selection();
    (Some(notification), done.next)
}

#[cfg(test)]
mod tests {
    use tasklane_core::notify::{Severity, messages};
    use tasklane_core::platform::store::StoreError;
    use tasklane_core::tasks::{Category, Task};

    use super::*;
    use crate::features::tasks::Focus;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn list_with(tasks: Vec<Task>) -> TaskListState {
        let mut list = TaskListState::new(Category::Work);
        apply_snapshot(&mut list, TaskSnapshot { revision: 1, tasks });
        list
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            text: id.to_string(),
            completed: false,
            category: Category::Personal,
        }
    }

    fn type_text(list: &mut TaskListState, text: &str) {
        for ch in text.chars() {
            handle_list_key(list, key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_blank_draft_does_not_add() {
        let mut list = list_with(vec![]);
        type_text(&mut list, "   ");
        assert_eq!(handle_list_key(&mut list, key(KeyCode::Enter)), ListOutcome::Stay);
        assert!(list.pending.is_empty());
    }

    #[test]
    fn test_add_shows_optimistic_row_and_clears_draft_on_success() {
        let mut list = list_with(vec![]);
        type_text(&mut list, "Buy milk");
        let ListOutcome::Issue(ticket, TaskCommand::Create(new_task)) =
            handle_list_key(&mut list, key(KeyCode::Enter))
        else {
            panic!("expected a create");
        };
        assert_eq!(new_task.category, Category::Work);
        assert_eq!(list.rows().len(), 1);
        assert!(list.rows()[0].pending);

        let receipt = Ok(WriteReceipt {
            id: "t1".into(),
            revision: 2,
        });
        let (notification, next) = command_finished(&mut list, ticket, &receipt);
        assert_eq!(notification.unwrap().message, messages::TASK_ADDED);
        assert!(next.is_none());
        assert!(list.draft.text.is_empty());

        apply_snapshot(
            &mut list,
            TaskSnapshot {
                revision: 2,
                tasks: vec![Task {
                    id: "t1".into(),
                    text: "Buy milk".into(),
                    completed: false,
                    category: Category::Work,
                }],
            },
        );
        let rows = list.rows();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].pending);
    }

    #[test]
    fn test_failed_create_rolls_back_with_error() {
        let mut list = list_with(vec![]);
        type_text(&mut list, "x");
        let ListOutcome::Issue(ticket, _) = handle_list_key(&mut list, key(KeyCode::Enter)) else {
            panic!("expected a create");
        };
        let (notification, _) =
            command_finished(&mut list, ticket, &Err(StoreError::storage("boom")));
        let notification = notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, messages::TASK_ADD_FAILED);
        assert!(list.rows().is_empty());
        assert_eq!(list.draft.text.value(), "x", "draft kept for retry");
    }

    #[test]
    fn test_double_toggle_is_serialized_and_shows_final_state() {
        let mut list = list_with(vec![task("a")]);
        list.focus = Focus::List;

        let first = handle_list_key(&mut list, key(KeyCode::Char(' ')));
        let ListOutcome::Issue(first_ticket, first_cmd) = first else {
            panic!("expected the first toggle to be issued");
        };
        assert_eq!(
            first_cmd,
            TaskCommand::SetCompleted {
                id: "a".into(),
                completed: true
            }
        );
        assert_eq!(
            handle_list_key(&mut list, key(KeyCode::Char(' '))),
            ListOutcome::Queued
        );
        assert!(!list.rows()[0].task.completed);

        let (n, next) = command_finished(
            &mut list,
            first_ticket,
            &Ok(WriteReceipt {
                id: "a".into(),
                revision: 2,
            }),
        );
        assert_eq!(n.unwrap().message, messages::TASK_COMPLETED);
        let (_, next_cmd) = next.expect("second toggle released");
        assert_eq!(
            next_cmd,
            TaskCommand::SetCompleted {
                id: "a".into(),
                completed: false
            }
        );
    }

    #[test]
    fn test_remove_hides_row_and_toggle_ignores_unsaved_rows() {
        let mut list = list_with(vec![task("a")]);
        list.focus = Focus::List;
        assert!(matches!(
            handle_list_key(&mut list, key(KeyCode::Char('d'))),
            ListOutcome::Issue(_, TaskCommand::Remove { .. })
        ));
        assert!(list.rows().is_empty());

        let mut list = list_with(vec![]);
        type_text(&mut list, "new");
        handle_list_key(&mut list, key(KeyCode::Enter));
        list.focus = Focus::List;
        assert_eq!(
            handle_list_key(&mut list, key(KeyCode::Char(' '))),
            ListOutcome::Stay
        );
    }

    #[test]
    fn test_category_cycles_with_arrows() {
        let mut list = list_with(vec![]);
        handle_list_key(&mut list, key(KeyCode::Tab));
        assert_eq!(list.focus, Focus::Category);
        handle_list_key(&mut list, key(KeyCode::Right));
        assert_eq!(list.draft.category, Category::Study);
        handle_list_key(&mut list, key(KeyCode::Char(' ')));
        assert_eq!(list.draft.category, Category::Personal);
        handle_list_key(&mut list, key(KeyCode::Left));
        assert_eq!(list.draft.category, Category::Study);
    }

    #[test]
    fn test_sign_out_chord() {
        let mut list = list_with(vec![]);
        assert_eq!(
            handle_list_key(
                &mut list,
                KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL)
            ),
            ListOutcome::SignOut
        );
    }
}
