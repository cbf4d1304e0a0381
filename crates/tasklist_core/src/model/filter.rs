//! Three-way list filter used by presentation layers.

use crate::model::task::{Task, TaskValidationError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which tasks a list view shows. Filtering never reorders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    /// Tasks not yet done.
    Active,
    /// Completed tasks.
    Done,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_done(),
            Self::Done => task.is_done(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Done => "done",
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "done" => Ok(Self::Done),
            _ => Err(TaskValidationError::UnknownFilter(value.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskFilter;
    use crate::model::task::Task;

    #[test]
    fn matches_by_done_flag() {
        let open = Task::with_id("1", "open");
        let closed = open.toggle();

        assert!(TaskFilter::All.matches(&open) && TaskFilter::All.matches(&closed));
        assert!(TaskFilter::Active.matches(&open));
        assert!(!TaskFilter::Active.matches(&closed));
        assert!(TaskFilter::Done.matches(&closed));
        assert!(!TaskFilter::Done.matches(&open));
    }

    #[test]
    fn parses_known_names() {
        assert_eq!("Active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert!("pending".parse::<TaskFilter>().is_err());
    }
}
