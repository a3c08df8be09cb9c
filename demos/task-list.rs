//! This is an example of how daily-tasks can be used.
//! This binary adds a task to a list stored in a local folder, completes the oldest task, and prints the list.

use std::path::Path;

use daily_tasks::storage::FileStorage;
use daily_tasks::utils::print_view;
use daily_tasks::{Submission, TaskDraft, TaskFilter, TaskStore, TaskView};

const STORAGE_FOLDER: &str = "demo_storage";


fn main() {
    env_logger::init();

    println!("This example keeps a task list in the '{}' folder.", STORAGE_FOLDER);
    println!("Run it several times to see the list grow. You can also set the RUST_LOG environment variable to display more info.");
    println!();

    let store = TaskStore::load(FileStorage::new(Path::new(STORAGE_FOLDER)));
    let mut view = TaskView::new(store);

    println!("---- Stored tasks -----");
    print_view(&view);

    let draft = TaskDraft::new(
        format!("Demo task #{}", view.store().len() + 1),
        chrono::Local::now().format("%Y-%m-%d"),
        "09:00",
        "10:00",
    );
    if let Submission::Added(id) = view.submit(draft) {
        log::info!("Added task {}", id);
    }

    let oldest_active = view.store().tasks()
        .iter()
        .find(|t| t.completed() == false)
        .map(|t| t.id().clone());
    if let Some(id) = oldest_active {
        view.toggle(&id);
    }

    println!("---- After this run -----");
    print_view(&view);

    view.set_filter(TaskFilter::Completed);
    print_view(&view);
}
