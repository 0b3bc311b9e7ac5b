//! Session state: the task store plus the view state and input buffers that
//! the control surface manipulates.
//!
//! Both the terminal UI and the script runner own a [`Session`] and feed it
//! [`Command`]s; rendering only ever reads from it.

use serde::Serialize;
use tracing::debug;

use crate::task::{Section, SectionCounts, Task, TaskId, TaskStore};

/// Pending input typed by the user but not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputBuffer {
    pub text: String,
    pub due: String,
}

impl InputBuffer {
    pub fn clear(&mut self) {
        self.text.clear();
        self.due.clear();
    }
}

/// A user-triggerable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetText(String),
    SetDue(String),
    Submit,
    Toggle(TaskId),
    Delete(TaskId),
    SelectSection(Section),
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Whether the task collection changed.
    pub changed: bool,
    pub task_id: Option<TaskId>,
    pub message: String,
}

impl Outcome {
    fn changed(task_id: TaskId, message: String) -> Self {
        Self {
            changed: true,
            task_id: Some(task_id),
            message,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            task_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    store: TaskStore,
    section: Section,
    search: String,
    input: InputBuffer,
}

impl Session {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn counts(&self) -> SectionCounts {
        self.store.counts()
    }

    /// Tasks visible under the current section and search term.
    pub fn visible(&self) -> Vec<&Task> {
        self.store.visible_tasks(self.section, &self.search)
    }

    /// Add a task from the input buffers, then clear them whether or not the
    /// add was accepted.
    pub fn submit(&mut self) -> Option<TaskId> {
        let id = self
            .store
            .add_task(&self.input.text, Some(self.input.due.as_str()));
        self.input.clear();
        id
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        debug!(?command, "apply");
        match command {
            Command::SetText(text) => {
                self.input.text = text;
                Outcome::unchanged("")
            }
            Command::SetDue(due) => {
                self.input.due = due;
                Outcome::unchanged("")
            }
            Command::Submit => match self.submit() {
                Some(id) => Outcome::changed(id, format!("added task {id}")),
                None => Outcome::unchanged("task text is empty"),
            },
            Command::Toggle(id) => match self.store.toggle_completed(id) {
                Some(true) => Outcome::changed(id, format!("completed task {id}")),
                Some(false) => Outcome::changed(id, format!("reopened task {id}")),
                None => Outcome::unchanged(format!("no task {id}")),
            },
            Command::Delete(id) => {
                if self.store.delete_task(id) {
                    Outcome::changed(id, format!("deleted task {id}"))
                } else {
                    Outcome::unchanged(format!("no task {id}"))
                }
            }
            Command::SelectSection(section) => {
                self.section = section;
                Outcome::unchanged(format!("section: {section}"))
            }
            Command::Search(term) => {
                self.search = term;
                Outcome::unchanged("")
            }
        }
    }
}
