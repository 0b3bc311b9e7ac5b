//! In-memory task collection.
//!
//! Tasks live only for the lifetime of the process. The store keeps them in
//! insertion order and hands out ids from a monotonic counter, so two tasks
//! added back to back can never share an id and deleted ids are never reused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Opaque task identifier, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        trimmed
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| Error::InvalidArgument(format!("invalid task id '{}'", s.trim())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub completed: bool,
}

/// Completion-state filter applied to the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    All,
    Completed,
    Pending,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::All, Section::Completed, Section::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::All => "all",
            Section::Completed => "completed",
            Section::Pending => "pending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::All => "All",
            Section::Completed => "Completed",
            Section::Pending => "Pending",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Section::All => true,
            Section::Completed => task.completed,
            Section::Pending => !task.completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::All => Section::Completed,
            Section::Completed => Section::Pending,
            Section::Pending => Section::All,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Section::All => Section::Pending,
            Section::Completed => Section::All,
            Section::Pending => Section::Completed,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Section::All),
            "completed" | "done" => Ok(Section::Completed),
            "pending" | "open" => Ok(Section::Pending),
            _ => Err(Error::InvalidArgument(format!(
                "invalid section '{}': must be all, completed, or pending",
                s.trim()
            ))),
        }
    }
}

/// Per-section task totals, ignoring the search term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub all: usize,
    pub completed: usize,
    pub pending: usize,
}

impl SectionCounts {
    pub fn for_section(&self, section: Section) -> usize {
        match section {
            Section::All => self.all,
            Section::Completed => self.completed,
            Section::Pending => self.pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a task. Text that trims to empty is silently rejected.
    ///
    /// The text is stored as given; a blank due value is stored as `None`.
    pub fn add_task(&mut self, text: &str, due: Option<&str>) -> Option<TaskId> {
        if text.trim().is_empty() {
            debug!("add_task rejected: empty text");
            return None;
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = due
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        debug!(%id, has_due = due.is_some(), "task added");
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            due,
            completed: false,
        });
        Some(id)
    }

    /// Remove the task with `id`. Returns whether a task was removed.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        debug!(%id, removed, "delete_task");
        removed
    }

    /// Flip `completed` on the task with `id`, returning the new value.
    pub fn toggle_completed(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        debug!(%id, completed = task.completed, "toggle_completed");
        Some(task.completed)
    }

    /// Tasks matching both the section and the (case-insensitive) search term,
    /// in insertion order.
    pub fn visible_tasks(&self, section: Section, search: &str) -> Vec<&Task> {
        let needle = search.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| section.matches(task))
            .filter(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> SectionCounts {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        SectionCounts {
            all: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }
}
