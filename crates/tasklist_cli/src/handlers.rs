use crate::commands::{Cli, Commands, ListArgs};
use log::debug;
use std::io::{self, Write};
use tasklist_core::{
    init_logging, ConfigError, JsonFileStore, Task, TaskListConfig, TaskService,
    TaskServiceError,
};

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] TaskServiceError),
    #[error("id prefix `{prefix}` matches {count} tasks; use more characters")]
    AmbiguousId { prefix: String, count: usize },
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

/// Resolves configuration, starts logging and runs one command.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = TaskListConfig::from_env()?;
    if let Some(path) = cli.store.clone() {
        config = config.with_store_path(path);
    }
    start_logging(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(cli, &config, &mut out)
}

fn start_logging(config: &TaskListConfig) {
    let result = std::path::absolute(config.log_dir())
        .map_err(|err| err.to_string())
        .and_then(|dir| init_logging(&config.log_level, dir).map_err(|err| err.to_string()));
    if let Err(err) = result {
        eprintln!("warning: logging disabled: {err}");
    }
}

pub fn dispatch(cli: Cli, config: &TaskListConfig, out: &mut dyn Write) -> Result<(), CliError> {
    let store = JsonFileStore::new(&config.store_path);
    let command = cli.command.unwrap_or(Commands::List(ListArgs::default()));
    debug!("event=cli_dispatch module=cli status=start command={}", command_name(&command));

    let mut service = TaskService::open(store)?;
    match command {
        Commands::List(args) => {
            let tasks = service.filtered(args.filter);
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
            } else {
                for task in &tasks {
                    writeln!(out, "{}", format_task_line(task))?;
                }
                let counts = service.counts();
                writeln!(
                    out,
                    "{} shown, {} active, {} done",
                    tasks.len(),
                    counts.active,
                    counts.done
                )?;
            }
        }
        Commands::Add(args) => {
            let task = service.add(&args.title.join(" "))?;
            writeln!(out, "added {}", format_task_line(&task))?;
        }
        Commands::Toggle(args) => {
            let id = resolve_id(service.tasks(), &args.id)?;
            let task = service.toggle(&id)?;
            writeln!(out, "{}", format_task_line(&task))?;
        }
        Commands::Rename(args) => {
            let id = resolve_id(service.tasks(), &args.id)?;
            let task = service.rename(&id, &args.title.join(" "))?;
            writeln!(out, "{}", format_task_line(&task))?;
        }
        Commands::Priority(args) => {
            let id = resolve_id(service.tasks(), &args.id)?;
            let task = service.set_priority(&id, args.priority)?;
            writeln!(out, "{}", format_task_line(&task))?;
        }
        Commands::Due(args) => {
            let id = resolve_id(service.tasks(), &args.id)?;
            let task = service.set_due(&id, args.date.as_deref())?;
            writeln!(out, "{}", format_task_line(&task))?;
        }
        Commands::Delete(args) => {
            let id = resolve_id(service.tasks(), &args.id)?;
            service.delete(&id)?;
            writeln!(out, "deleted {}", short_id(&id))?;
        }
        Commands::ClearCompleted => {
            let removed = service.clear_completed()?;
            writeln!(out, "cleared {removed} completed task(s)")?;
        }
        Commands::Path => {
            writeln!(out, "{}", service.store().path().display())?;
        }
    }
    Ok(())
}

/// Expands a unique id prefix to the full id.
///
/// An exact match always wins. When nothing matches, the input is returned
/// unchanged so the service reports `not found`.
fn resolve_id(tasks: &[Task], raw: &str) -> Result<String, CliError> {
    let raw = raw.trim();
    if tasks.iter().any(|task| task.id() == raw) {
        return Ok(raw.to_string());
    }

    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| !raw.is_empty() && task.id().starts_with(raw))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.id().to_string()),
        [] => Ok(raw.to_string()),
        many => Err(CliError::AmbiguousId {
            prefix: raw.to_string(),
            count: many.len(),
        }),
    }
}

fn format_task_line(task: &Task) -> String {
    let mark = if task.is_done() { "x" } else { " " };
    let due = task
        .due()
        .map(|due| format!("  due {due}"))
        .unwrap_or_default();
    format!(
        "[{mark}] {:<8}  {:<6}  {}{due}",
        short_id(task.id()),
        task.priority(),
        task.title()
    )
}

fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List(_) => "list",
        Commands::Add(_) => "add",
        Commands::Toggle(_) => "toggle",
        Commands::Rename(_) => "rename",
        Commands::Priority(_) => "priority",
        Commands::Due(_) => "due",
        Commands::Delete(_) => "delete",
        Commands::ClearCompleted => "clear-completed",
        Commands::Path => "path",
    }
}

#[cfg(test)]
mod tests {
    use super::{dispatch, format_task_line, resolve_id, short_id, CliError};
    use crate::commands::Cli;
    use clap::Parser;
    use tasklist_core::store::load_tasks;
    use tasklist_core::{Priority, Task, TaskListConfig};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> TaskListConfig {
        TaskListConfig::resolve(|_| None, Some(dir.path().to_path_buf())).unwrap()
    }

    fn run(config: &TaskListConfig, args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("tasklist").chain(args.iter().copied()))
            .unwrap();
        let mut out = Vec::new();
        dispatch(cli, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_toggle_and_clear_through_the_cli() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let added = run(&config, &["add", "Buy", "milk"]).unwrap();
        assert!(added.starts_with("added [ ]"), "{added}");
        assert!(added.contains("Buy milk"));

        let id = load_tasks(&config.store_path).unwrap()[0].id().to_string();
        let toggled = run(&config, &["toggle", &id[..4]]).unwrap();
        assert!(toggled.starts_with("[x]"), "{toggled}");

        let listed = run(&config, &["list", "--filter", "done"]).unwrap();
        assert!(listed.contains("Buy milk"));
        assert!(listed.ends_with("1 shown, 0 active, 1 done\n"), "{listed}");

        let cleared = run(&config, &["clear-completed"]).unwrap();
        assert_eq!(cleared, "cleared 1 completed task(s)\n");
        assert!(load_tasks(&config.store_path).unwrap().is_empty());
    }

    #[test]
    fn list_json_outputs_wire_fields() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        run(&config, &["add", "write", "docs"]).unwrap();

        let json = run(&config, &["list", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["title"], "write docs");
        assert_eq!(value[0]["priority"], "medium");
    }

    #[test]
    fn unknown_id_surfaces_not_found() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = run(&config, &["delete", "nope"]).unwrap_err();
        assert!(err.to_string().contains("task not found: nope"), "{err}");
    }

    #[test]
    fn path_command_creates_the_store() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let printed = run(&config, &["path"]).unwrap();
        assert_eq!(printed.trim(), config.store_path.display().to_string());
        assert!(config.store_path.is_file());
    }

    #[test]
    fn resolve_id_prefers_exact_then_unique_prefix() {
        let tasks = vec![
            Task::with_id("abc1", "one"),
            Task::with_id("abc2", "two"),
            Task::with_id("abc", "three"),
        ];
        assert_eq!(resolve_id(&tasks, "abc").unwrap(), "abc");
        assert_eq!(resolve_id(&tasks, "abc2").unwrap(), "abc2");
        assert_eq!(resolve_id(&tasks, "zzz").unwrap(), "zzz");

        let ambiguous = vec![Task::with_id("ab1", "one"), Task::with_id("ab2", "two")];
        assert!(matches!(
            resolve_id(&ambiguous, "ab"),
            Err(CliError::AmbiguousId { count: 2, .. })
        ));
    }

    #[test]
    fn task_line_shows_state_priority_and_due() {
        let task = Task::with_id("0123456789abcdef", "Pay rent")
            .toggle()
            .set_priority(Priority::High)
            .set_due(Some("2026-11-01"));
        assert_eq!(
            format_task_line(&task),
            "[x] 01234567  high    Pay rent  due 2026-11-01"
        );
        assert_eq!(short_id("abc"), "abc");
    }
}
