use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tasklist_core::{Priority, TaskFilter};

#[derive(Parser, Debug)]
#[command(name = "tasklist", about = "A small single-user task list", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use a different task file (overrides TASKLIST_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks (default command)
    List(ListArgs),
    /// Add a task at the end of the list
    Add(AddArgs),
    /// Mark a task done, or not done again
    Toggle(IdArgs),
    /// Change a task title
    Rename(RenameArgs),
    /// Set task priority
    Priority(PriorityArgs),
    /// Set or clear a due date
    Due(DueArgs),
    /// Delete a task
    Delete(IdArgs),
    /// Delete every completed task
    ClearCompleted,
    /// Print the task file location
    Path,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Which tasks to show: all, active or done
    #[arg(short, long, default_value = "all")]
    pub filter: TaskFilter,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Task id or a unique prefix of it
    pub id: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Task id or a unique prefix of it
    pub id: String,
    /// New title
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PriorityArgs {
    /// Task id or a unique prefix of it
    pub id: String,
    /// low, medium or high
    pub priority: Priority,
}

#[derive(Args, Debug)]
pub struct DueArgs {
    /// Task id or a unique prefix of it
    pub id: String,
    /// Due date, e.g. 2026-11-30; omit to clear
    pub date: Option<String>,
}
