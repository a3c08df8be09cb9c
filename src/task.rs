//! To-do tasks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, Utc};


/// A to-do task, with its scheduling metadata and its completion state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier of this task in its list
    id: TaskId,
    /// The display text of the task. This is never empty
    text: String,
    /// The calendar date this task is planned for
    date: String,
    /// The planned start time (time of day)
    start_time: String,
    /// The planned end time (time of day). Nothing checks it comes after `start_time`
    end_time: String,
    /// Whether this task has been done
    completed: bool,
    /// The time this task was created. It never changes afterwards
    created_at: DateTime<Utc>,
}

impl Task {
    /// Create a brand new, uncompleted Task from a draft.
    /// This will pick a new (random) task ID.
    ///
    /// Returns `None` if the draft text is blank. The stored text is trimmed.
    pub fn new(draft: TaskDraft) -> Option<Self> {
        let text = draft.text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self::new_with_parameters(
            TaskId::random(),
            text.to_string(),
            draft.date,
            draft.start_time,
            draft.end_time,
            false,
            Utc::now(),
        ))
    }

    /// Create a new Task instance, that may come from a persisted list already
    pub fn new_with_parameters(id: TaskId, text: String, date: String,
                               start_time: String, end_time: String,
                               completed: bool, created_at: DateTime<Utc>,
                            ) -> Self
    {
        Self { id, text, date, start_time, end_time, completed, created_at }
    }

    pub fn id(&self) -> &TaskId     { &self.id         }
    pub fn text(&self) -> &str      { &self.text       }
    pub fn date(&self) -> &str      { &self.date       }
    pub fn start_time(&self) -> &str { &self.start_time }
    pub fn end_time(&self) -> &str  { &self.end_time   }
    pub fn completed(&self) -> bool { self.completed   }
    pub fn created_at(&self) -> &DateTime<Utc> { &self.created_at }

    /// Returns a draft holding the current editable fields of this task
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            text: self.text.clone(),
            date: self.date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }

    /// Flip the completion status
    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
    }

    /// Apply the fields that are set in `patch`.
    ///
    /// The text is trimmed. A patch that would blank the text is refused as a whole, and `false` is returned.
    pub fn apply_patch(&mut self, patch: TaskPatch) -> bool {
        let text = match patch.text {
            None => None,
            Some(t) => {
                let trimmed = t.trim();
                if trimmed.is_empty() {
                    return false;
                }
                Some(trimmed.to_string())
            },
        };

        if let Some(text) = text { self.text = text; }
        if let Some(date) = patch.date { self.date = date; }
        if let Some(start_time) = patch.start_time { self.start_time = start_time; }
        if let Some(end_time) = patch.end_time { self.end_time = end_time; }
        true
    }
}



/// The user input used to create a task, or to edit one
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl TaskDraft {
    pub fn new<S: ToString, T: ToString, U: ToString, V: ToString>(text: S, date: T, start_time: U, end_time: V) -> Self {
        Self {
            text: text.to_string(),
            date: date.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    /// Whether every field has been filled in.
    ///
    /// [`TaskStore::add`](crate::store::TaskStore::add) only requires a non-blank text; input forms can use this to require the rest.
    pub fn is_complete(&self) -> bool {
        [&self.text, &self.date, &self.start_time, &self.end_time]
            .iter()
            .all(|field| field.trim().is_empty() == false)
    }
}



/// A partial update of a task. Fields that are `None` are left untouched
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TaskPatch {
    /// A patch that only changes the text
    pub fn text<S: ToString>(text: S) -> Self {
        Self { text: Some(text.to_string()), ..Self::default() }
    }
}

impl From<TaskDraft> for TaskPatch {
    fn from(draft: TaskDraft) -> Self {
        Self {
            text: Some(draft.text),
            date: Some(draft.date),
            start_time: Some(draft.start_time),
            end_time: Some(draft.end_time),
        }
    }
}



/// The identifier of a task
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl FromStr for TaskId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde.
/// Lists written by older versions used millisecond timestamps as IDs, these are accepted as well.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Token(String),
            Timestamp(u64),
        }

        let content = match RawId::deserialize(deserializer)? {
            RawId::Token(s) => s,
            RawId::Timestamp(n) => n.to_string(),
        };
        Ok(TaskId{ content })
    }
}
