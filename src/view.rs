//! The task view: which tasks are displayed, and which one is being edited
//!
//! A [`TaskView`] sits between the user input and the [`TaskStore`]. It never changes the list by itself, it only forwards the user actions to the store.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::Storage;
use crate::store::{SummaryReceiver, TaskStore, TaskSummary};
use crate::task::{Task, TaskDraft, TaskId};


/// Which tasks should be displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Display every task
    All,
    /// Display only tasks that are not completed
    Active,
    /// Display only completed tasks
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => task.completed() == false,
            TaskFilter::Completed => task.completed(),
        }
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        TaskFilter::All
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Active => write!(f, "active"),
            TaskFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(format!("Unknown task filter {:?}", other)),
        }
    }
}


/// A task that is currently being modified, and the scratch values of its fields
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: TaskId,
    pub draft: TaskDraft,
}


/// What happened to a submitted draft
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// A new task has been created
    Added(TaskId),
    /// The task under edit has been updated
    Updated(TaskId),
    /// The store refused the draft (e.g. its text was blank), or the edited task no longer exists
    Ignored,
}


/// Derives the displayed tasks from a [`TaskStore`], and tracks the current filter and edit session
#[derive(Debug)]
pub struct TaskView<S: Storage> {
    store: TaskStore<S>,
    filter: TaskFilter,
    edit: Option<EditSession>,
    summary: SummaryReceiver,
}

impl<S: Storage> TaskView<S> {
    /// Create a view over a store, displaying every task
    pub fn new(store: TaskStore<S>) -> Self {
        let summary = store.subscribe();
        Self {
            store,
            filter: TaskFilter::default(),
            edit: None,
            summary,
        }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn into_store(self) -> TaskStore<S> {
        self.store
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Returns the tasks that match the current filter, in the store order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.store.tasks()
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    /// The latest counters published by the store
    pub fn summary(&self) -> TaskSummary {
        *self.summary.borrow()
    }

    /// How many tasks of the whole list (regardless of the filter) are not completed
    pub fn remaining(&self) -> usize {
        self.summary().remaining
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// The scratch values of the task under edit, that the input form can change
    pub fn edit_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.edit.as_mut().map(|session| &mut session.draft)
    }

    /// Start editing a task. An edit that was already in progress is discarded.
    ///
    /// Returns `false` (and changes nothing) if no task has this ID
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        let task = match self.store.get(id) {
            None => {
                log::debug!("Cannot edit unknown task {}", id);
                return false;
            },
            Some(t) => t,
        };

        if let Some(previous) = &self.edit {
            log::debug!("Discarding the edit of task {}", previous.task_id);
        }
        self.edit = Some(EditSession {
            task_id: id.clone(),
            draft: task.to_draft(),
        });
        true
    }

    /// Stop editing, without changing the task
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Updates the task under edit with `draft`, and ends the edit session.
    /// When no task is being edited, `draft` is added as a new task instead.
    pub fn submit(&mut self, draft: TaskDraft) -> Submission {
        match self.edit.take() {
            Some(session) => {
                if self.store.edit(&session.task_id, draft.into()) {
                    Submission::Updated(session.task_id)
                } else {
                    Submission::Ignored
                }
            },
            None => match self.store.add(draft) {
                Some(id) => Submission::Added(id),
                None => Submission::Ignored,
            },
        }
    }

    /// Flip the completion status of a task
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        self.store.toggle(id)
    }

    /// Permanently remove a task. If it was being edited, the edit session ends
    pub fn remove(&mut self, id: &TaskId) -> bool {
        if self.edit.as_ref().map(|session| &session.task_id == id).unwrap_or(false) {
            self.edit = None;
        }
        self.store.remove(id)
    }
}
