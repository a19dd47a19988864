mod render;
mod state;
mod update;

pub use render::render_tasks;
pub use state::{Focus, Row, TaskCommand, TaskListState, Ticket};
pub use update::{ListOutcome, apply_snapshot, command_finished, handle_list_key};
