use std::fs;
use tasklist_ffi::api::{init_store, task_add, task_list, task_set_priority};
use tempfile::TempDir;

// Runs as its own test binary, so this process pins a store nobody else uses.
#[test]
fn corrupt_store_reports_argument_errors_first_and_is_never_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "[]").unwrap();
    let error = init_store(path.to_string_lossy().into_owned());
    assert!(error.is_empty(), "{error}");

    let bad_priority = task_set_priority("any".to_string(), "urgent".to_string());
    assert!(!bad_priority.ok);
    assert_eq!(bad_priority.error_kind.as_deref(), Some("invalid_argument"));

    let good_priority = task_set_priority("any".to_string(), "high".to_string());
    assert_eq!(good_priority.error_kind.as_deref(), Some("corrupt_store"));

    let bad_filter = task_list(Some("pending".to_string()));
    assert_eq!(bad_filter.error_kind.as_deref(), Some("invalid_argument"));

    let listed = task_list(None);
    assert!(!listed.ok);
    assert_eq!(listed.error_kind.as_deref(), Some("corrupt_store"));

    let added = task_add("Buy milk".to_string());
    assert_eq!(added.error_kind.as_deref(), Some("corrupt_store"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}
