use std::collections::HashMap;

use stickyfeed::{
    FeedItem, FeedOptions, IntersectionSample, IntersectionSource, SubscriptionId,
    VisibilityOptions,
};
use stickyfeed_adapter::{FeedPage, PageElement};

#[derive(Clone, Debug)]
struct Card {
    key: u64,
}

impl FeedItem for Card {
    type Key = u64;

    fn key(&self) -> u64 {
        self.key
    }
}

/// Stands in for the platform's intersection observer.
#[derive(Default)]
struct Observer {
    next: SubscriptionId,
    observed: HashMap<SubscriptionId, PageElement<u8>>,
}

impl IntersectionSource<PageElement<u8>> for Observer {
    fn observe(&mut self, handle: &PageElement<u8>, thresholds: &[f32]) -> SubscriptionId {
        self.next += 1;
        println!("  observe #{} {handle:?} thresholds={thresholds:?}", self.next);
        self.observed.insert(self.next, handle.clone());
        self.next
    }

    fn disconnect(&mut self, subscription: SubscriptionId) {
        println!("  disconnect #{subscription}");
        self.observed.remove(&subscription);
    }
}

fn main() {
    // Example: tab 1 has 20 cards, tab 2 has 4. The load-more sentinel stays on screen the whole
    // time (short pages), so every re-armed sentinel immediately appears again.
    let sizes = [(1u8, 20u64), (2, 4)];
    let mut observer = Observer::default();
    let mut page = FeedPage::<u8, Card>::new(FeedOptions::default(), VisibilityOptions::default());
    page.mount(1, &mut observer);

    for (tab, len) in sizes {
        page.switch_tab(tab, &mut observer);
        println!("tab {tab}:");
        loop {
            let (Some(id), Some(sentinel)) = (page.sentinel_watch(), page.sentinel().cloned())
            else {
                break;
            };
            let batch = [IntersectionSample::new(sentinel, 1.0)];
            let Some(request) = page.on_intersection(id, &batch, &mut observer) else {
                break;
            };
            let start = request.offset() as u64;
            let end = (start + request.page_size as u64).min(len);
            let cards = (start..end.max(start)).map(|key| Card { key }).collect();
            let settled = page.complete(&request, Ok::<_, String>(cards), &mut observer);
            println!(
                "  page {} -> {settled:?}, items={} footer={:?}",
                request.page,
                page.items().len(),
                page.footer()
            );
        }
    }

    page.teardown(&mut observer);
    println!("open subscriptions after teardown: {}", observer.observed.len());
}
