use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::collections::HashMap;
use std::sync::Mutex;

use stickyfeed::{
    FeedError, FeedItem, FeedOptions, FixedPane, IntersectionSample, IntersectionSource,
    LayoutPolicy, LayoutStrategy, PageRequest, SectionId, Settled, StickyOptions,
    SubscriptionId, ViewportGeometry, VisibilityOptions, WatchId,
};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start))
    }

    fn gen_ratio(&mut self) -> f32 {
        match self.gen_range_u64(0, 4) {
            0 | 1 => 0.0,
            2 => 0.5,
            _ => 1.0,
        }
    }
}

fn groups_stack(footer: u32) -> SectionStack {
    let mut s = SectionStack::new(600, 375).with_footer_height(footer);
    s.push_block(500);
    s.push_block(500);
    s
}

#[test]
fn stack_clamps_scroll_offset_to_content() {
    let mut s = groups_stack(100);
    assert_eq!(s.content_height(), 1100);
    assert_eq!(s.max_scroll_offset(), 500);
    assert_eq!(s.set_scroll_offset(900), 500);

    // A taller viewport pulls the offset back.
    s.set_viewport_height(800);
    assert_eq!(s.scroll_offset(), 300);

    assert_eq!(s.scroll_by(-1000), 0);
    assert_eq!(s.scroll_by(120), 120);
}

#[test]
fn stack_geometry_is_viewport_relative() {
    let mut s = groups_stack(100).with_container_top(41);
    s.set_scroll_offset(120);

    let container = s.bounding_box(&StackElement::Container).unwrap();
    assert_eq!((container.top, container.bottom), (41, 641));

    let second = s.bounding_box(&StackElement::Block(1)).unwrap();
    assert_eq!((second.top, second.bottom), (421, 921));
    assert_eq!(second.right, 375);

    assert_eq!(
        ViewportGeometry::scroll_offset(&s, &StackElement::Container),
        Some(120)
    );
    assert_eq!(ViewportGeometry::scroll_offset(&s, &StackElement::Block(0)), None);
    assert_eq!(s.block_at_top(), Some(0));

    // Shared edge: the earlier block wins.
    s.set_scroll_offset(500);
    assert_eq!(s.block_at_top(), Some(0));

    s.set_viewport_height(400);
    s.set_scroll_offset(650);
    assert_eq!(s.block_at_top(), Some(1));
}

#[test]
fn stack_geometry_saturates_at_extreme_offsets() {
    let s = groups_stack(0).with_container_top(i64::MAX - 10);
    let container = s.bounding_box(&StackElement::Container).unwrap();
    assert_eq!((container.top, container.bottom), (i64::MAX - 10, i64::MAX));
    let second = s.bounding_box(&StackElement::Block(1)).unwrap();
    assert_eq!((second.top, second.bottom), (i64::MAX, i64::MAX));
    assert_eq!(s.block_at_top(), Some(0));

    let mut s = groups_stack(0).with_container_top(i64::MIN + 10);
    s.set_scroll_offset(400);
    let first = s.bounding_box(&StackElement::Block(0)).unwrap();
    assert_eq!((first.top, first.bottom), (i64::MIN, i64::MIN + 500));
    assert_eq!(s.block_at_top(), Some(0));
}

#[test]
fn stack_unmounted_blocks_take_no_space() {
    let mut s = groups_stack(0);
    s.set_block_mounted(0, false);
    assert!(!s.is_mounted(0));
    assert!(s.bounding_box(&StackElement::Block(0)).is_none());
    assert_eq!(s.block_start(1), Some(0));
    assert_eq!(s.content_height(), 500);
    assert!(s.bounding_box(&StackElement::Block(9)).is_none());

    s.set_block_mounted(0, true);
    s.set_block_height(0, 300);
    assert_eq!(s.block_start(1), Some(300));
}

const TOTAL: u32 = 667;

fn scene(
    strategy: LayoutStrategy,
    max_passes: u32,
    footer: u32,
) -> (StickyScene, Arc<Mutex<Vec<Option<SectionId>>>>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let options = StickyOptions::new().with_on_active_change(Some({
        let changes = Arc::clone(&changes);
        move |id: Option<SectionId>| changes.lock().unwrap().push(id)
    }));
    let policy = LayoutPolicy::new(TOTAL)
        .with_strategy(strategy)
        .with_max_passes(max_passes);
    let mut scene =
        StickyScene::new(policy, FixedPane::new(41, 48), options).with_footer_height(footer);
    scene.push_section(500, true);
    scene.push_section(500, true);
    scene.push_section(495, false);
    (scene, changes)
}

#[test]
fn scene_static_layout_keeps_the_scroll_pane_fixed() {
    let (mut scene, changes) = scene(LayoutStrategy::Static, 2, 400);

    let res = scene.mount();
    assert_eq!(scene.active_id(), Some(0));
    assert!(scene.is_extra_row_visible());
    assert_eq!(scene.fixed_pane_height(), 89);
    assert_eq!(res.sizes.scroll_pane, 626);
    assert_eq!(res.sizes.overflow, 48);
    assert_eq!(res.passes, 1);

    assert!(scene.scroll_to(600, 0));
    assert_eq!(scene.active_id(), Some(1));
    assert_eq!(scene.stack().viewport_height(), 626);

    // Inside the throttle window: only the trailing recompute catches up.
    assert!(!scene.scroll_to(1200, 50));
    assert_eq!(scene.active_id(), Some(1));
    assert_eq!(scene.next_deadline(), Some(350));
    assert!(!scene.tick(349));
    assert!(scene.tick(350));

    assert_eq!(scene.active_id(), Some(2));
    assert!(!scene.is_extra_row_visible());
    assert_eq!(scene.fixed_pane_height(), 41);
    assert_eq!(scene.stack().viewport_height(), 626);
    assert_eq!(scene.stack().scroll_offset(), 1200);
    assert_eq!(*changes.lock().unwrap(), vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn scene_live_layout_flips_back_at_the_bottom() {
    let (mut scene, changes) = scene(LayoutStrategy::Live, 2, 100);

    let res = scene.mount();
    assert!(res.converged);
    assert_eq!(res.sizes.scroll_pane, 578);
    assert_eq!(scene.stack().max_scroll_offset(), 1017);

    // Docking the last section hides the extra row, the taller pane clamps the offset back into
    // the previous section, which shows the extra row again.
    assert!(scene.scroll_to(1017, 0));
    assert_eq!(scene.active_id(), Some(1));
    assert_eq!(scene.stack().scroll_offset(), 969);
    assert_eq!(*changes.lock().unwrap(), vec![Some(0), Some(2), Some(1)]);

    let res = scene.last_resolution().unwrap();
    assert!(res.converged);
    assert_eq!(res.passes, 2);
    assert_eq!(res.sizes.scroll_pane, 578);
}

#[test]
fn scene_live_layout_stops_at_the_pass_budget() {
    let (mut scene, _) = scene(LayoutStrategy::Live, 1, 100);
    scene.mount();
    scene.scroll_to(1017, 0);

    let res = scene.last_resolution().unwrap();
    assert!(!res.converged);
    assert_eq!(res.passes, 1);
    assert_eq!(res.sizes.scroll_pane, 626);
    assert_eq!(res.sizes.overflow, 48);
    assert_eq!(scene.active_id(), Some(1));
}

#[test]
fn scene_teardown_stops_docking() {
    let (mut scene, changes) = scene(LayoutStrategy::Static, 2, 400);
    scene.mount();
    scene.scroll_to(10, 0);
    assert!(scene.next_deadline().is_some());

    scene.teardown();
    assert_eq!(scene.next_deadline(), None);
    assert!(!scene.scroll_to(1200, 500));
    assert!(!scene.tick(10_000));
    assert_eq!(scene.active_id(), Some(0));
    assert_eq!(*changes.lock().unwrap(), vec![Some(0)]);
}

#[derive(Debug, Default)]
struct RecordingSource {
    next: SubscriptionId,
    live: HashMap<SubscriptionId, PageElement<u32>>,
    observed: usize,
    disconnected: Vec<SubscriptionId>,
}

impl IntersectionSource<PageElement<u32>> for RecordingSource {
    fn observe(&mut self, handle: &PageElement<u32>, _thresholds: &[f32]) -> SubscriptionId {
        self.next += 1;
        self.observed += 1;
        self.live.insert(self.next, handle.clone());
        self.next
    }

    fn disconnect(&mut self, subscription: SubscriptionId) {
        self.live.remove(&subscription);
        self.disconnected.push(subscription);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Card {
    key: u64,
}

impl FeedItem for Card {
    type Key = u64;

    fn key(&self) -> u64 {
        self.key
    }
}

/// Serves `len` items keyed `1..=len`, sliced by page.
fn serve(len: u64, request: &PageRequest<u32>) -> Vec<Card> {
    let start = request.offset() as u64;
    let end = (start + request.page_size as u64).min(len);
    (start..end.max(start)).map(|i| Card { key: i + 1 }).collect()
}

fn mounted_page() -> (FeedPage<u32, Card>, RecordingSource) {
    let mut src = RecordingSource::default();
    let mut page = FeedPage::new(FeedOptions::default(), VisibilityOptions::default());
    page.mount(1, &mut src);
    (page, src)
}

fn sentinel_batch(
    page: &FeedPage<u32, Card>,
    ratio: f32,
) -> (WatchId, Vec<IntersectionSample<PageElement<u32>>>) {
    let id = page.sentinel_watch().unwrap();
    let handle = page.sentinel().unwrap().clone();
    (id, vec![IntersectionSample::new(handle, ratio)])
}

fn show_sentinel(
    page: &mut FeedPage<u32, Card>,
    src: &mut RecordingSource,
    ratio: f32,
) -> Option<PageRequest<u32>> {
    let (id, batch) = sentinel_batch(page, ratio);
    page.on_intersection(id, &batch, src)
}

fn header(page: &mut FeedPage<u32, Card>, src: &mut RecordingSource, ratio: f32) {
    let id = page.header_watch().unwrap();
    let batch = [IntersectionSample::new(PageElement::HeaderSentinel, ratio)];
    assert!(page.on_intersection(id, &batch, src).is_none());
}

#[test]
fn page_mount_watches_header_and_first_sentinel() {
    let (page, src) = mounted_page();
    assert_eq!(src.live.len(), 2);
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 1, page: 1 })
    );
    assert_eq!(page.tab(), Some(&1));
    assert_eq!(page.footer(), Some(Footer::Skeleton));
    assert_eq!(page.backdrop(), HeaderBackdrop::Transparent);
    assert!(page.items().is_empty());
}

#[test]
fn page_sentinel_appearance_loads_the_next_page() {
    let (mut page, mut src) = mounted_page();
    let first_watch = page.sentinel_watch().unwrap();
    let first_sub = *src
        .live
        .iter()
        .find(|(_, e)| **e == PageElement::LoadMoreSentinel { tab: 1, page: 1 })
        .unwrap()
        .0;

    let req = show_sentinel(&mut page, &mut src, 0.25).unwrap();
    assert_eq!((req.list_key, req.page, req.page_size), (1, 1, 7));
    // Crossing more thresholds while visible is not a new edge.
    assert!(show_sentinel(&mut page, &mut src, 0.75).is_none());
    assert_eq!(page.footer(), Some(Footer::Skeleton));

    let settled = page.complete(&req, Ok::<_, &str>(serve(20, &req)), &mut src);
    assert_eq!(
        settled,
        Ok(Settled::Applied {
            appended: 7,
            duplicates: 0
        })
    );
    assert_eq!(page.items().len(), 7);
    assert_eq!(page.footer(), Some(Footer::Loading));
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 1, page: 2 })
    );
    assert_ne!(page.sentinel_watch(), Some(first_watch));
    assert_eq!(src.disconnected, vec![first_sub]);
    assert_eq!(src.live.len(), 2);

    // The re-armed sentinel is still on screen: its first visible sample is a fresh edge.
    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
    assert_eq!(req.page, 2);
}

#[test]
fn page_exhausts_and_shows_no_more() {
    let (mut page, mut src) = mounted_page();
    for expected in [7, 3] {
        let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
        let settled = page.complete(&req, Ok::<_, &str>(serve(10, &req)), &mut src);
        assert_eq!(
            settled,
            Ok(Settled::Applied {
                appended: expected,
                duplicates: 0
            })
        );
    }

    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
    assert_eq!(req.page, 3);
    let settled = page.complete(&req, Ok::<_, &str>(serve(10, &req)), &mut src);
    assert_eq!(settled, Ok(Settled::Exhausted));
    assert_eq!(page.footer(), Some(Footer::NoMore));
    assert_eq!(page.items().len(), 10);
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 1, page: 3 })
    );

    assert!(show_sentinel(&mut page, &mut src, 0.0).is_none());
    assert!(show_sentinel(&mut page, &mut src, 1.0).is_none());
    assert!(page.load_more(&mut src).is_none());
}

#[test]
fn page_header_backdrop_follows_the_header_sentinel() {
    let (mut page, mut src) = mounted_page();

    // Mounted while already scrolled: the first sample is hidden.
    header(&mut page, &mut src, 0.0);
    assert_eq!(page.backdrop(), HeaderBackdrop::Opaque);

    header(&mut page, &mut src, 0.25);
    assert_eq!(page.backdrop(), HeaderBackdrop::Transparent);
    header(&mut page, &mut src, 1.0);
    assert_eq!(page.backdrop(), HeaderBackdrop::Transparent);
    header(&mut page, &mut src, 0.0);
    assert_eq!(page.backdrop(), HeaderBackdrop::Opaque);

    // Header samples never trigger a load.
    assert_eq!(page.feed().snapshot(&1).unwrap().request_epoch, 0);
}

#[test]
fn page_tab_switch_discards_in_flight_page_and_rearms() {
    let (mut page, mut src) = mounted_page();
    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();

    assert!(page.switch_tab(2, &mut src));
    assert!(!page.switch_tab(2, &mut src));
    assert_eq!(page.tab(), Some(&2));
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 2, page: 1 })
    );
    assert_eq!(page.footer(), Some(Footer::Skeleton));
    assert_eq!(src.live.len(), 2);

    let settled = page.complete(&req, Ok::<_, &str>(serve(20, &req)), &mut src);
    assert_eq!(settled, Ok(Settled::Stale));
    assert!(page.items().is_empty());

    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
    assert_eq!((req.list_key, req.page), (2, 1));
}

#[test]
fn page_cached_page_rearms_without_fetch() {
    let (mut page, mut src) = mounted_page();
    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
    page.complete(&req, Ok::<_, &str>(serve(20, &req)), &mut src)
        .unwrap();

    page.switch_tab(2, &mut src);
    page.switch_tab(1, &mut src);
    assert!(page.items().is_empty());

    assert!(show_sentinel(&mut page, &mut src, 1.0).is_none());
    assert_eq!(page.items().len(), 7);
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 1, page: 2 })
    );
}

#[test]
fn page_failed_fetch_keeps_sentinel_and_allows_retry() {
    let (mut page, mut src) = mounted_page();
    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();

    let err = page
        .complete(&req, Err::<Vec<Card>, _>("offline"), &mut src)
        .unwrap_err();
    assert!(matches!(
        err,
        FeedError::FetchFailed {
            list_key: 1,
            page: 1,
            ..
        }
    ));
    assert_eq!(
        page.sentinel(),
        Some(&PageElement::LoadMoreSentinel { tab: 1, page: 1 })
    );
    assert_eq!(page.footer(), Some(Footer::Skeleton));

    let retry = page.load_more(&mut src).unwrap();
    assert_eq!(retry.page, 1);
    assert!(retry.epoch > req.epoch);
}

#[test]
fn page_teardown_disconnects_everything() {
    let (mut page, mut src) = mounted_page();
    let req = show_sentinel(&mut page, &mut src, 1.0).unwrap();
    page.complete(&req, Ok::<_, &str>(serve(20, &req)), &mut src)
        .unwrap();
    page.switch_tab(2, &mut src);

    page.teardown(&mut src);
    assert!(src.live.is_empty());
    assert_eq!(src.disconnected.len(), src.observed);
    assert_eq!(page.header_watch(), None);
    assert_eq!(page.sentinel_watch(), None);
    assert!(page.detector().is_empty());
}

#[test]
fn page_random_interaction_never_leaks_subscriptions() {
    let mut rng = Lcg::new(0x5eed_f00d);
    let (mut page, mut src) = mounted_page();
    let mut pending: Vec<PageRequest<u32>> = Vec::new();

    for _ in 0..3000 {
        match rng.gen_range_u64(0, 5) {
            0 | 1 => {
                let ratio = rng.gen_ratio();
                if let Some(req) = show_sentinel(&mut page, &mut src, ratio) {
                    assert_eq!(Some(&req.list_key), page.tab());
                    pending.push(req);
                }
            }
            2 if !pending.is_empty() => {
                let i = rng.gen_range_u64(0, pending.len() as u64) as usize;
                let req = pending.swap_remove(i);
                page.complete(&req, Ok::<_, &str>(serve(60, &req)), &mut src)
                    .unwrap();
            }
            3 => {
                let tab = rng.gen_range_u64(1, 3) as u32;
                page.switch_tab(tab, &mut src);
            }
            _ => {
                let ratio = rng.gen_ratio();
                header(&mut page, &mut src, ratio);
            }
        }

        assert_eq!(src.live.len(), 2);
        assert!(src.live.values().any(|e| Some(e) == page.sentinel()));
        let keys = page.items().iter().map(|c| c.key);
        assert!(keys.eq(1..=page.items().len() as u64));
    }
}
