// Example: a two-tab feed with coalesced triggers, a page cache and stale-response discarding.
use stickyfeed::{FeedController, FeedEvent, FeedItem, FeedOptions, LoadMore, PageRequest};

#[derive(Clone, Debug)]
struct Post {
    id: u64,
}

impl FeedItem for Post {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// A backend with `len` posts per tab.
fn fetch(len: u64, request: &PageRequest<&'static str>) -> Result<Vec<Post>, String> {
    let start = request.offset() as u64;
    let end = (start + request.page_size as u64).min(len);
    Ok((start..end.max(start)).map(|id| Post { id }).collect())
}

fn main() {
    let on_event = |event: FeedEvent<'_, &'static str, Post>| {
        if let FeedEvent::Updated {
            list_key,
            items,
            loading,
            exhausted,
        } = event
        {
            println!(
                "  [{list_key}] items={} loading={loading} exhausted={exhausted}",
                items.len()
            );
        }
    };
    let options = FeedOptions::default().with_on_event(Some(on_event));
    let mut feed = FeedController::new(options);

    feed.show("latest");
    loop {
        let request = match feed.load_more(&"latest") {
            LoadMore::Fetch(request) => request,
            other => {
                println!("load_more -> {other:?}");
                break;
            }
        };
        // A second trigger while the first fetch is in flight is coalesced.
        assert!(matches!(feed.load_more(&"latest"), LoadMore::Busy));

        let settled = feed.complete(&request, fetch(18, &request));
        println!("page {} -> {settled:?}", request.page);
    }

    // Switching away while a fetch is in flight: the late response is ignored.
    feed.show("popular");
    let LoadMore::Fetch(in_flight) = feed.load_more(&"popular") else {
        return;
    };
    feed.show("latest");
    let late = feed.complete(&in_flight, fetch(18, &in_flight));
    println!("late popular page -> {late:?}");

    // Coming back to "latest" replays its first page from the cache.
    println!("cached -> {:?}", feed.load_more(&"latest"));
    println!("snapshot -> {:?}", feed.snapshot(&"latest"));
}
