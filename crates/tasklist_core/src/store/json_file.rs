//! Single-file JSON task store.
//!
//! # Invariants
//! - Writes go to a sibling temp file that is renamed over the target, so a
//!   reader sees either the previous or the next document, never a mix.
//! - A failed write removes its temp file and leaves the target untouched.

use super::document::{StoreDocument, StoreDocumentRef};
use super::{StoreError, StoreResult, TaskStore};
use crate::model::task::Task;
use log::{debug, error, info};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::Builder;

/// `TaskStore` backed by one JSON file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full envelope, including the recorded schema version.
    pub fn load_document(&self) -> StoreResult<StoreDocument> {
        load_document(&self.path)
    }
}

impl TaskStore for JsonFileStore {
    fn ensure(&self) -> StoreResult<()> {
        ensure_store(&self.path)
    }

    fn load(&self) -> StoreResult<Vec<Task>> {
        load_tasks(&self.path)
    }

    fn save(&self, tasks: &[Task]) -> StoreResult<()> {
        save_tasks(tasks, &self.path)
    }
}

/// Creates the parent directory and an empty document when nothing exists.
///
/// Idempotent; an existing file is left alone even if it is corrupt.
pub fn ensure_store(path: &Path) -> StoreResult<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    if path.exists() {
        return Ok(());
    }

    let content = encode(&[])?;
    atomic_write(path, &content).map_err(io_error(path))?;
    info!(
        "event=store_init module=store status=ok path={}",
        path.display()
    );
    Ok(())
}

/// Reads and parses the document at `path`.
///
/// # Errors
/// - `StoreError::Io` when the file cannot be created or read.
/// - `StoreError::Corrupt` when the content is not a valid document.
pub fn load_document(path: &Path) -> StoreResult<StoreDocument> {
    let started_at = Instant::now();
    ensure_store(path)?;

    let raw = fs::read_to_string(path).map_err(io_error(path))?;
    match decode_document(&raw) {
        Ok(document) => {
            info!(
                "event=store_load module=store status=ok version={} task_count={} duration_ms={}",
                document.version,
                document.tasks.len(),
                started_at.elapsed().as_millis()
            );
            Ok(document)
        }
        Err(err) => {
            error!(
                "event=store_load module=store status=error error_code=store_corrupt line={} column={}",
                err.line(),
                err.column()
            );
            Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}

/// Decodes an envelope, rejecting non-object shapes serde would accept.
///
/// Derived struct impls also take JSON arrays in field order, so `[]` or a
/// task written as `["id", "title"]` would otherwise load.
fn decode_document(raw: &str) -> Result<StoreDocument, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let Some(envelope) = value.as_object() else {
        return Err(shape_error("document must be a JSON object"));
    };
    if let Some(tasks) = envelope.get("tasks").and_then(Value::as_array) {
        if let Some(index) = tasks.iter().position(|task| !task.is_object()) {
            return Err(shape_error(format!("task at index {index} must be a JSON object")));
        }
    }
    serde_json::from_value(value)
}

fn shape_error(message: impl std::fmt::Display) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(message)
}

/// Reads tasks in stored order.
pub fn load_tasks(path: &Path) -> StoreResult<Vec<Task>> {
    load_document(path).map(|document| document.tasks)
}

/// Atomically replaces the document at `path` with `tasks`.
pub fn save_tasks(tasks: &[Task], path: &Path) -> StoreResult<()> {
    let started_at = Instant::now();
    ensure_store(path)?;

    let content = encode(tasks)?;
    if let Err(err) = atomic_write(path, &content) {
        error!(
            "event=store_save module=store status=error error_code=write_failed duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: err,
        });
    }

    debug!(
        "event=store_save module=store status=ok task_count={} bytes={} duration_ms={}",
        tasks.len(),
        content.len(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn encode(tasks: &[Task]) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(&StoreDocumentRef::current(tasks)).map_err(StoreError::Serialize)
}

fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    write_atomic_with(path, |file| file.write_all(content))
}

/// Runs `write` against a sibling temp file, then renames it over `path`.
pub(crate) fn write_atomic_with<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let file_name = path.file_name().map_or_else(
        || "tasks".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    let mut tmp = Builder::new()
        .prefix(&format!("{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent_dir(path))?;

    write(tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_store, load_tasks, save_tasks, write_atomic_with};
    use crate::model::task::Task;
    use crate::store::StoreError;
    use std::fs;
    use std::io::{self, Write};
    use tempfile::TempDir;

    #[test]
    fn interrupted_write_keeps_previous_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let tasks = vec![Task::with_id("1", "Alpha"), Task::with_id("2", "Beta")];
        save_tasks(&tasks, &path).unwrap();
        let before = fs::read(&path).unwrap();

        let err = write_atomic_with(&path, |file| {
            file.write_all(br#"{"version": 1, "tasks": [{"id": "3""#)?;
            Err(io::Error::new(io::ErrorKind::Interrupted, "simulated crash"))
        })
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(load_tasks(&path).unwrap(), tasks);
    }

    #[test]
    fn failed_write_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        ensure_store(&path).unwrap();

        let _ = write_atomic_with(&path, |_| Err(io::Error::other("disk full")));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("tasks.json")]);
    }

    #[test]
    fn ensure_creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("tasks.json");
        ensure_store(&nested).unwrap();
        assert!(nested.is_file());
    }

    #[test]
    fn array_shaped_documents_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        for raw in ["[]", "[1]", "[7, []]", r#"[1, [["a1", "Alpha"]]]"#] {
            fs::write(&path, raw).unwrap();
            assert!(
                matches!(load_tasks(&path), Err(StoreError::Corrupt { .. })),
                "{raw} should not load"
            );
            assert_eq!(fs::read_to_string(&path).unwrap(), raw);
        }
    }

    #[test]
    fn array_shaped_task_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"version": 1, "tasks": [{"id": "a1", "title": "Alpha"}, ["b2", "Beta"]]}"#,
        )
        .unwrap();

        let err = load_tasks(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(err.to_string().contains("index 1"), "{err}");
    }
}
