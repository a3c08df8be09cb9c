//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The storage slot that holds the whole task list
pub const TASKS_STORAGE_KEY: &str = "tasks";

/// How many posts are displayed on a page
pub const POSTS_PAGE_SIZE: u32 = 10;

/// The endpoint [`PostsClient::from_config`](crate::posts::PostsClient::from_config) fetches posts from.
/// Feel free to override it when initing this library.
pub static POSTS_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://jsonplaceholder.typicode.com/posts".to_string())));

/// Returns the current value of [`POSTS_URL`]
pub fn posts_url() -> String {
    match POSTS_URL.lock() {
        Ok(url) => url.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
