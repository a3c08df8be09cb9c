//! The authoritative list of tasks, and its persistence
//!
//! Every successful mutation is followed by an explicit [`TaskStore::save`], and by a new [`TaskSummary`] sent to the subscribers.

use std::collections::HashSet;
use std::error::Error;

use crate::config::TASKS_STORAGE_KEY;
use crate::storage::Storage;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch};


/// Counters about the task list, sent to subscribers after every change
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskSummary {
    /// How many tasks the list contains
    pub total: usize,
    /// How many of them are not completed yet
    pub remaining: usize,
    /// How many of them are completed
    pub completed: usize,
    /// Incremented by one at every mutation of the list
    pub revision: u64,
}

/// See [`TaskStore::subscribe`]
pub type SummarySender = tokio::sync::watch::Sender<TaskSummary>;
/// See [`TaskStore::subscribe`]
pub type SummaryReceiver = tokio::sync::watch::Receiver<TaskSummary>;


/// An ordered list of tasks, kept in sync with a [`Storage`] slot
#[derive(Debug)]
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    revision: u64,
    summary_channel: SummarySender,
}

impl<S: Storage> TaskStore<S> {
    /// Initialize a store from the content of its storage slot.
    ///
    /// A missing, unreadable or corrupted slot results in an empty list. This never fails.
    pub fn load(storage: S) -> Self {
        let tasks = match storage.read(TASKS_STORAGE_KEY) {
            Err(err) => {
                log::warn!("Unable to read stored tasks: {}. Starting with an empty list", err);
                Vec::new()
            },
            Ok(None) => {
                log::debug!("No stored tasks yet");
                Vec::new()
            },
            Ok(Some(payload)) => deserialize_tasks(&payload),
        };
        log::info!("Loaded {} task(s)", tasks.len());

        let (summary_channel, _) = tokio::sync::watch::channel(summarize(&tasks, 0));
        Self {
            storage,
            tasks,
            revision: 0,
            summary_channel,
        }
    }

    /// Returns the tasks, in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns a particular task
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Count of tasks that are not completed
    pub fn remaining(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed() == false).count()
    }

    pub fn summary(&self) -> TaskSummary {
        summarize(&self.tasks, self.revision)
    }

    /// Returns the storage this store persists to
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get notified about every change of the list.
    ///
    /// The receiver always holds the latest [`TaskSummary`]
    pub fn subscribe(&self) -> SummaryReceiver {
        self.summary_channel.subscribe()
    }

    /// Append a new task built from `draft`, and returns its ID.
    ///
    /// Nothing happens (and `None` is returned) if the draft text is blank
    pub fn add(&mut self, draft: TaskDraft) -> Option<TaskId> {
        let task = match Task::new(draft) {
            None => {
                log::debug!("Ignoring a task with an empty text");
                return None;
            },
            Some(t) => t,
        };

        let id = task.id().clone();
        log::debug!("Adding task {} ({})", id, task.text());
        self.tasks.push(task);
        self.changed();
        Some(id)
    }

    /// Flip the completion status of a task.
    ///
    /// Returns `false` if no task has this ID
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        match self.get_mut(id) {
            None => {
                log::debug!("Cannot toggle unknown task {}", id);
                false
            },
            Some(task) => {
                task.toggle_completion();
                self.changed();
                true
            },
        }
    }

    /// Permanently remove a task.
    ///
    /// Returns `false` if no task has this ID
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id() != id);
        if self.tasks.len() == len_before {
            log::debug!("Cannot remove unknown task {}", id);
            return false;
        }
        self.changed();
        true
    }

    /// Change the text, date or times of a task. Its ID, completion status and creation date are kept.
    ///
    /// Returns `false` if no task has this ID, or if the patch would leave the task with an empty text
    pub fn edit(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        let task = match self.get_mut(id) {
            None => {
                log::debug!("Cannot edit unknown task {}", id);
                return false;
            },
            Some(t) => t,
        };

        if task.apply_patch(patch) == false {
            log::debug!("Refusing to clear the text of task {}", id);
            return false;
        }
        self.changed();
        true
    }

    /// Store the whole list to the storage slot.
    ///
    /// Failures are logged and otherwise ignored, see [`Self::try_save`]
    pub fn save(&mut self) {
        if let Err(err) = self.try_save() {
            log::warn!("Unable to save tasks: {}", err);
        }
    }

    /// Store the whole list to the storage slot
    pub fn try_save(&mut self) -> Result<(), Box<dyn Error>> {
        let payload = serialize_tasks(&self.tasks)?;
        self.storage.write(TASKS_STORAGE_KEY, &payload)
    }

    fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    fn changed(&mut self) {
        self.save();
        self.revision += 1;
        self.summary_channel.send_replace(summarize(&self.tasks, self.revision));
    }
}

fn summarize(tasks: &[Task], revision: u64) -> TaskSummary {
    let completed = tasks.iter().filter(|t| t.completed()).count();
    TaskSummary {
        total: tasks.len(),
        remaining: tasks.len() - completed,
        completed,
        revision,
    }
}


/// Serialize a task list the way it is persisted
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string(tasks)?)
}

/// Deserialize a persisted task list.
///
/// A payload that is not a JSON array results in an empty list.
/// Records that cannot be read as a task, that reuse an ID seen earlier in the list, or that have an empty text, are dropped.
pub fn deserialize_tasks(payload: &str) -> Vec<Task> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(payload) {
        Err(err) => {
            log::warn!("Invalid stored tasks: {}. Starting with an empty list", err);
            return Vec::new();
        },
        Ok(records) => records,
    };

    let mut seen = HashSet::new();
    records.into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
            Err(err) => {
                log::warn!("Dropping stored task #{} that cannot be read: {}", index, err);
                None
            },
            Ok(task) => Some(task),
        })
        .filter(|task| {
            if task.text().trim().is_empty() {
                log::warn!("Dropping stored task {} that has an empty text", task.id());
                return false;
            }
            if seen.insert(task.id().clone()) == false {
                log::warn!("Dropping stored task {} that has a duplicated ID", task.id());
                return false;
            }
            true
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn draft(text: &str) -> TaskDraft {
        TaskDraft::new(text, "2024-05-01", "09:00", "10:00")
    }

    /// A storage that can neither be read nor written
    #[derive(Debug)]
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, Box<dyn Error>> {
            Err("disk is unreadable".into())
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), Box<dyn Error>> {
            Err("disk is full".into())
        }
    }

    fn stored(storage: &MemoryStorage) -> Vec<Task> {
        let payload = storage.read(TASKS_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&payload).unwrap()
    }

    #[test]
    fn empty_storage_loads_empty_list() {
        let store = TaskStore::load(MemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.summary(), TaskSummary::default());
    }

    #[test]
    fn corrupted_storage_loads_empty_list() {
        for payload in &["", "not json", "{\"id\": 3}", "[{\"text\": \"missing fields\"}]", "null"] {
            let store = TaskStore::load(MemoryStorage::with_slot(TASKS_STORAGE_KEY, payload));
            assert!(store.is_empty(), "payload {:?} should give an empty list", payload);
        }
    }

    #[test]
    fn adds_keep_order_and_unique_ids() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let texts = ["a", "  ", "b", "", "c", "\t"];
        for text in texts.iter() {
            store.add(draft(text));
        }

        let got: Vec<&str> = store.tasks().iter().map(|t| t.text()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);

        let ids: HashSet<&TaskId> = store.tasks().iter().map(|t| t.id()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn whitespace_add_changes_nothing() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone());
        assert_eq!(store.add(draft("   ")), None);
        assert_eq!(store.len(), 0);
        // Nothing was written either
        assert_eq!(storage.read(TASKS_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.add(draft("Laundry")).unwrap();

        assert!(store.toggle(&id));
        assert_eq!(store.get(&id).unwrap().completed(), true);
        assert!(store.toggle(&id));
        assert_eq!(store.get(&id).unwrap().completed(), false);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone());
        let id = store.add(draft("Laundry")).unwrap();
        let unknown = TaskId::from("nope");
        let revision = store.summary().revision;

        assert_eq!(store.toggle(&unknown), false);
        assert_eq!(store.edit(&unknown, TaskPatch::text("x")), false);
        assert_eq!(store.remove(&unknown), false);

        assert_eq!(store.summary().revision, revision);
        assert_eq!(stored(&storage), store.tasks().to_vec());
        assert_eq!(store.get(&id).unwrap().text(), "Laundry");
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let keep = store.add(draft("keep")).unwrap();
        let id = store.add(draft("drop")).unwrap();

        assert!(store.remove(&id));
        assert_eq!(store.remove(&id), false);
        assert_eq!(store.len(), 1);
        assert!(store.get(&keep).is_some());
    }

    #[test]
    fn edit_keeps_identity() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.add(draft("Write report")).unwrap();
        store.toggle(&id);
        let before = store.get(&id).unwrap().clone();

        assert!(store.edit(&id, TaskDraft::new("Write final report", "2024-05-02", "14:00", "15:00").into()));

        let after = store.get(&id).unwrap();
        assert_eq!(after.id(), before.id());
        assert_eq!(after.completed(), before.completed());
        assert_eq!(after.created_at(), before.created_at());
        assert_eq!(after.text(), "Write final report");
        assert_eq!(after.date(), "2024-05-02");
    }

    #[test]
    fn edit_to_blank_text_is_refused() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.add(draft("Write report")).unwrap();
        assert_eq!(store.edit(&id, TaskPatch::text("   ")), false);
        assert_eq!(store.get(&id).unwrap().text(), "Write report");
    }

    #[test]
    fn every_mutation_is_persisted() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone());

        let a = store.add(draft("a")).unwrap();
        assert_eq!(stored(&storage), store.tasks().to_vec());
        store.add(draft("b"));
        store.toggle(&a);
        assert_eq!(stored(&storage), store.tasks().to_vec());
        store.edit(&a, TaskPatch::text("a2"));
        assert_eq!(stored(&storage)[0].text(), "a2");
        store.remove(&a);
        assert_eq!(stored(&storage), store.tasks().to_vec());

        let reloaded = TaskStore::load(storage);
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn round_trip_is_structural() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.add(draft("one")).unwrap();
        store.add(draft("two"));
        store.toggle(&id);

        let payload = serialize_tasks(store.tasks()).unwrap();
        assert_eq!(deserialize_tasks(&payload), store.tasks().to_vec());
    }

    #[test]
    fn invalid_records_are_dropped_on_load() {
        let payload = r#"[
            {"id": "a", "text": "first", "date": "", "startTime": "", "endTime": "", "completed": false, "createdAt": "2024-05-01T09:00:00Z"},
            {"id": "b", "text": "  ", "date": "", "startTime": "", "endTime": "", "completed": false, "createdAt": "2024-05-01T09:00:00Z"},
            {"id": "a", "text": "dup", "date": "", "startTime": "", "endTime": "", "completed": true, "createdAt": "2024-05-01T09:00:00Z"},
            {"id": 1714554000000, "text": "legacy", "date": "2024-05-01", "startTime": "09:00", "endTime": "10:00", "completed": true, "createdAt": "2024-05-01T09:00:00.000Z"}
        ]"#;
        let tasks = deserialize_tasks(payload);
        let texts: Vec<&str> = tasks.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["first", "legacy"]);
    }

    #[test]
    fn subscribers_see_every_mutation() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let receiver = store.subscribe();

        let id = store.add(draft("a")).unwrap();
        store.add(draft("b"));
        store.toggle(&id);
        store.add(draft(" "));

        let summary = *receiver.borrow();
        assert_eq!(summary, TaskSummary { total: 2, remaining: 1, completed: 1, revision: 3 });
    }

    #[test]
    fn unreadable_storage_loads_empty_list() {
        let store = TaskStore::load(BrokenStorage);
        assert!(store.is_empty());
        assert_eq!(store.summary().revision, 0);
    }

    #[test]
    fn failed_writes_do_not_undo_mutations() {
        let mut store = TaskStore::load(BrokenStorage);
        let receiver = store.subscribe();

        let id = store.add(draft("Keep me")).unwrap();
        assert!(store.toggle(&id));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().completed(), true);
        assert_eq!(store.summary().revision, 2);
        assert_eq!(receiver.borrow().revision, 2);
        assert!(store.try_save().is_err());
    }

    #[test]
    fn unreadable_records_are_dropped_alone() {
        let payload = r#"[
            {"id": "old", "text": "no times", "date": "2024-05-01", "completed": false, "createdAt": "2024-05-01T09:00:00Z"},
            {"id": "ok", "text": "complete", "date": "2024-05-01", "startTime": "09:00", "endTime": "10:00", "completed": false, "createdAt": "2024-05-01T09:00:00Z"},
            42
        ]"#;
        let tasks = deserialize_tasks(payload);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }
}
