//! Read-only access to a remote list of posts
//!
//! This is unrelated to the task list: it only fetches pages of posts, or posts that match a search.
//! A [`PostsClient`] gets them from an HTTP server, and a [`PostsPager`] keeps the state of a paginated display.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use async_trait::async_trait;

mod client;
pub use client::PostsClient;
mod pager;
pub use pager::PostsPager;


/// A post, as served by the remote API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// A page of posts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostPage {
    pub items: Vec<Post>,
    /// How many posts exist overall
    pub total_count: u64,
}


/// An error when retrieving posts.
///
/// Its `Display` is meant to be shown to the user as is. The underlying cause is logged where it happens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostsError {
    FetchFailed,
    SearchFailed,
}

impl Display for PostsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PostsError::FetchFailed => write!(f, "Failed to fetch posts"),
            PostsError::SearchFailed => write!(f, "Failed to search posts"),
        }
    }
}

impl std::error::Error for PostsError {}


/// A source of posts
#[async_trait]
pub trait PostSource {
    /// Returns the posts of a given (1-based) page
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PostPage, PostsError>;
    /// Returns the posts that match `query`
    async fn search(&self, query: &str) -> Result<Vec<Post>, PostsError>;
}
