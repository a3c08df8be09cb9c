//! This is an example of how the posts module can be used.
//! This binary prints the first two pages of posts, then the posts that match a search.

use daily_tasks::posts::{PostsClient, PostsPager};


#[tokio::main]
async fn main() {
    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "dolorem".to_string());

    let client = match PostsClient::from_config() {
        Ok(client) => client,
        Err(err) => {
            log::error!("Invalid posts URL: {}", err);
            return;
        }
    };
    println!("Fetching posts from {}", client.base_url());
    let mut pager = PostsPager::new(client);

    pager.load().await;
    print_page(&pager);
    pager.next_page().await;
    print_page(&pager);

    println!("---- Search {:?} -----", query);
    pager.search(&query).await;
    print_page(&pager);
}

fn print_page(pager: &PostsPager<PostsClient>) {
    if let Some(err) = pager.error() {
        println!("{}", err);
        return;
    }
    println!("---- Page {} of {} -----", pager.page(), pager.total_pages());
    for post in pager.posts() {
        println!("  #{}\t{}", post.id, post.title);
    }
}
