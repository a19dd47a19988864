//! Task command handlers. All of them act on the signed-in user's tasks.

use anyhow::{Context, Result, anyhow};
use comfy_table::{ContentArrangement, Table};
use tasklane_core::notify::{self, Notification, TaskOp, messages};
use tasklane_core::platform::Platform;
use tasklane_core::platform::identity::Session;
use tasklane_core::platform::store::StoreError;
use tasklane_core::tasks::{Category, NewTask, TASKS_COLLECTION, Task, TaskRepository};

use super::{done, fail};

fn require_session(platform: &Platform) -> Result<Session> {
    platform
        .identity
        .current_session()
        .ok_or_else(|| anyhow!("{}", notify::not_signed_in()))
}

/// Current tasks, as the first snapshot of a subscription.
async fn current_tasks(repository: &TaskRepository, session: &Session) -> Result<Vec<Task>> {
    let mut feed = repository
        .subscribe(session)
        .map_err(|e| anyhow!("{}", notify::tasks_unavailable(&e)))?;
    let snapshot = feed
        .next()
        .await
        .context("task subscription closed before the first snapshot")?;
    Ok(snapshot.tasks)
}

pub async fn list(platform: &Platform) -> Result<()> {
    let session = require_session(platform)?;
    let tasks = current_tasks(&platform.tasks(), &session).await?;
    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Done", "Category", "Task"]);
    for task in &tasks {
        table.add_row(vec![
            task.id.clone(),
            if task.completed { "x" } else { "" }.to_string(),
            task.category.to_string(),
            task.text.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn add(platform: &Platform, text: &str, category: Category) -> Result<()> {
    let session = require_session(platform)?;
    let Some(task) = NewTask::from_draft(text, category) else {
        return fail(Notification::warning(messages::EMPTY_TASK));
    };
    match platform.tasks().create(&session, task).await {
        Ok(receipt) => {
            done(TaskOp::Add.success())?;
            println!("{}", receipt.id);
            Ok(())
        }
        Err(e) => fail(TaskOp::Add.failure(&e)),
    }
}

/// Flips the completion state of task `id`.
pub async fn toggle(platform: &Platform, id: &str) -> Result<()> {
    let session = require_session(platform)?;
    let repository = platform.tasks();
    let tasks = current_tasks(&repository, &session).await?;
    let Some(task) = tasks.into_iter().find(|t| t.id == id) else {
        let op = TaskOp::SetCompleted(true);
        return fail(op.failure(&StoreError::not_found(TASKS_COLLECTION, id)));
    };

    let op = TaskOp::SetCompleted(!task.completed);
    match repository.set_completed(&session, id, !task.completed).await {
        Ok(_) => done(op.success()),
        Err(e) => fail(op.failure(&e)),
    }
}

pub async fn remove(platform: &Platform, id: &str) -> Result<()> {
    let session = require_session(platform)?;
    match platform.tasks().remove(&session, id).await {
        Ok(_) => done(TaskOp::Remove.success()),
        Err(e) => fail(TaskOp::Remove.failure(&e)),
    }
}
