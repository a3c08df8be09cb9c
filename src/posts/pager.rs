//! The state of a paginated, searchable display of posts

use super::{Post, PostSource};
use crate::config::POSTS_PAGE_SIZE;


/// Browses the posts of a [`PostSource`] page by page.
///
/// Errors are not returned, they are stored as a user-visible message (see [`PostsPager::error`]) and the previously displayed posts are kept.
pub struct PostsPager<S: PostSource> {
    source: S,
    page: u32,
    limit: u32,
    total_pages: u32,
    posts: Vec<Post>,
    error: Option<String>,
}

impl<S: PostSource> PostsPager<S> {
    /// Create a pager on the first page. Nothing is fetched until [`Self::load`] is called
    pub fn new(source: S) -> Self {
        Self::with_page_size(source, POSTS_PAGE_SIZE)
    }

    pub fn with_page_size(source: S, limit: u32) -> Self {
        Self {
            source,
            page: 1,
            limit: limit.max(1),
            total_pages: 0,
            posts: Vec::new(),
            error: None,
        }
    }

    /// The current page (1-based)
    pub fn page(&self) -> u32       { self.page        }
    pub fn total_pages(&self) -> u32 { self.total_pages }
    pub fn posts(&self) -> &[Post]  { &self.posts      }
    /// The message of the last failure, if the last request failed
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }
    pub fn source(&self) -> &S      { &self.source     }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Fetch the current page
    pub async fn load(&mut self) {
        match self.source.fetch_page(self.page, self.limit).await {
            Err(err) => self.error = Some(err.to_string()),
            Ok(page) => {
                self.posts = page.items;
                self.total_pages = div_ceil(page.total_count, self.limit);
                self.error = None;
            },
        }
    }

    /// Display the posts that match `query`. A blank query displays the current page again
    pub async fn search(&mut self, query: &str) {
        if query.trim().is_empty() {
            return self.load().await;
        }

        match self.source.search(query).await {
            Err(err) => self.error = Some(err.to_string()),
            Ok(posts) => {
                self.posts = posts;
                self.error = None;
            },
        }
    }

    /// Move to the next page, if there is one.
    ///
    /// If fetching it fails, [`Self::page`] already reports the new page while [`Self::posts`] still holds the previous one
    pub async fn next_page(&mut self) {
        self.go_to(self.page.saturating_add(1)).await;
    }

    /// Move to the previous page, if there is one.
    ///
    /// If fetching it fails, [`Self::page`] already reports the new page while [`Self::posts`] still holds the previous one
    pub async fn previous_page(&mut self) {
        self.go_to(self.page.saturating_sub(1)).await;
    }

    async fn go_to(&mut self, page: u32) {
        let page = page.max(1).min(self.total_pages.max(1));
        if page == self.page {
            return;
        }
        log::debug!("Moving from page {} to page {}", self.page, page);
        self.page = page;
        self.load().await;
    }
}

fn div_ceil(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit);
    let pages = total / limit + u64::from(total % limit != 0);
    pages.min(u64::from(u32::MAX)) as u32
}
