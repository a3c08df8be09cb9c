//! An HTTP client for the posts API

use std::error::Error;

use async_trait::async_trait;
use url::Url;

use super::{Post, PostPage, PostSource, PostsError};

type BoxedError = Box<dyn Error + Send + Sync>;

/// The response header that tells how many posts exist overall
static TOTAL_COUNT_HEADER: &str = "x-total-count";


/// A [`PostSource`] that fetches its posts from an HTTP server
#[derive(Clone, Debug)]
pub struct PostsClient {
    base_url: Url,
    http: reqwest::Client,
}

impl PostsClient {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the URL currently set in [`crate::config::POSTS_URL`]
    pub fn from_config() -> Result<Self, Box<dyn Error>> {
        Self::new(crate::config::posts_url())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The URL of a given page
    pub fn page_url(&self, page: u32, limit: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("_page", &page.to_string())
            .append_pair("_limit", &limit.to_string());
        url
    }

    /// The URL of a full-text search
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query);
        url
    }

    async fn get_page(&self, page: u32, limit: u32) -> Result<PostPage, BoxedError> {
        let url = self.page_url(page, limit);
        log::debug!("Fetching {}", url);

        let res = self.http.get(url).send().await?.error_for_status()?;
        let total_header = res.headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let items: Vec<Post> = res.json().await?;
        let total_count = parse_total_count(total_header.as_deref(), items.len());

        Ok(PostPage { items, total_count })
    }

    async fn get_search(&self, query: &str) -> Result<Vec<Post>, BoxedError> {
        let url = self.search_url(query);
        log::debug!("Searching {}", url);

        let res = self.http.get(url).send().await?.error_for_status()?;
        Ok(res.json().await?)
    }
}

#[async_trait]
impl PostSource for PostsClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PostPage, PostsError> {
        self.get_page(page, limit).await.map_err(|err| {
            log::warn!("Unable to fetch page {} of posts: {}", page, err);
            PostsError::FetchFailed
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, PostsError> {
        self.get_search(query).await.map_err(|err| {
            log::warn!("Unable to search posts for {:?}: {}", query, err);
            PostsError::SearchFailed
        })
    }
}

/// Reads the total count header, or falls back to the number of items that have been received
fn parse_total_count(header: Option<&str>, n_items: usize) -> u64 {
    match header.map(|value| value.trim().parse::<u64>()) {
        Some(Ok(total)) => total,
        Some(Err(_)) => {
            log::warn!("Invalid {} header: {:?}", TOTAL_COUNT_HEADER, header);
            n_items as u64
        },
        None => n_items as u64,
    }
}
