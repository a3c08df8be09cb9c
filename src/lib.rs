//! This crate provides an offline-first task list.
//!
//! Tasks live in a [`TaskStore`](store::TaskStore), which persists the whole list to a [`Storage`](storage::Storage) slot after every change, and restores it at start-up. \
//! A [`TaskView`](view::TaskView) derives what should be displayed from the store (filtering, edit session, remaining count), and forwards the user actions to it.
//!
//! The unrelated [`posts`] module provides a paginated, searchable access to a remote list of posts.

pub mod config;
pub mod storage;
pub mod task;
pub use task::{Task, TaskDraft, TaskId, TaskPatch};
pub mod store;
pub use store::{TaskStore, TaskSummary};
pub mod view;
pub use view::{EditSession, Submission, TaskFilter, TaskView};

pub mod posts;
pub mod utils;
