//! Some utility functions

use crate::task::Task;
use crate::view::TaskView;
use crate::storage::Storage;

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list<'a, I>(tasks: I)
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut n_tasks = 0;
    for task in tasks {
        print_task(task);
        n_tasks += 1;
    }
    if n_tasks == 0 {
        println!("    No tasks found");
    }
}

/// A debug utility that pretty-prints what a view currently displays
pub fn print_view<S: Storage>(view: &TaskView<S>) {
    println!("TASKS ({})", view.filter());
    print_task_list(view.visible_tasks());
    println!("{} tasks remaining", view.remaining());
}

pub fn print_task(task: &Task) {
    println!("    {}", format_task(task));
}

/// A one-line description of a task
pub fn format_task(task: &Task) -> String {
    let completion = if task.completed() { "✓" } else { " " };
    format!("[{}] {}\t{} • {} - {}\t{}",
        completion, task.text(), task.date(), task.start_time(), task.end_time(), task.id())
}
