// Example: docking sections under a sticky header with throttled + debounced recomputes.
use stickyfeed::{BoundingBox, SectionId, StickyOptions, StickyTracker, ViewportGeometry};

const CONTAINER: usize = usize::MAX;

/// Sections stacked in a scroll container whose top edge sits at y=0.
struct Column {
    heights: Vec<i64>,
    viewport: i64,
    offset: i64,
}

impl ViewportGeometry<usize> for Column {
    fn bounding_box(&self, handle: &usize) -> Option<BoundingBox> {
        if *handle == CONTAINER {
            return Some(BoundingBox::new(0, self.viewport, 0, 375));
        }
        let start: i64 = self.heights.get(..*handle)?.iter().sum();
        let top = start - self.offset;
        Some(BoundingBox::new(top, top + self.heights.get(*handle)?, 0, 375))
    }

    fn scroll_offset(&self, _container: &usize) -> Option<i64> {
        Some(self.offset)
    }
}

fn main() {
    let mut column = Column {
        heights: vec![500, 500, 495],
        viewport: 626,
        offset: 0,
    };

    let options = StickyOptions::new().with_on_active_change(Some(|id: Option<SectionId>| {
        println!("  docked -> {id:?}");
    }));
    let mut tracker = StickyTracker::new(CONTAINER, options);
    for i in 0..column.heights.len() {
        tracker.register(i as SectionId, i);
    }
    tracker.mount(&column);

    // A fling: one scroll event every 16ms. Only some of them recompute.
    let mut now_ms = 0u64;
    while column.offset < 860 {
        now_ms += 16;
        column.offset += 43;
        let changed = tracker.on_scroll(now_ms, &column);
        println!("t={now_ms} offset={} recomputed_change={changed}", column.offset);
    }

    // Let the trailing recompute settle the final position.
    if let Some(deadline) = tracker.next_deadline() {
        tracker.tick(deadline, &column);
    }
    println!(
        "settled: active={:?} reason={:?}",
        tracker.active_id(),
        tracker.last_recompute_reason()
    );
    tracker.teardown();
}
