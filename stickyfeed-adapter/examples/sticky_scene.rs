use stickyfeed::{FixedPane, LayoutPolicy, LayoutStrategy, StickyOptions};
use stickyfeed_adapter::StickyScene;

fn run(strategy: LayoutStrategy) {
    // Example: a 667px screen with a 41px toolbar row and a 48px "current section" row that
    // only some sections show.
    let policy = LayoutPolicy::new(667).with_strategy(strategy);
    let mut scene = StickyScene::new(policy, FixedPane::new(41, 48), StickyOptions::new())
        .with_footer_height(100);
    scene.push_section(500, true);
    scene.push_section(500, true);
    scene.push_section(495, false);
    scene.mount();

    println!("{strategy:?}");
    let mut now_ms = 0u64;
    for offset in (0..=1100).step_by(110) {
        now_ms += 120;
        scene.scroll_to(offset, now_ms);
        let res = scene.last_resolution();
        println!(
            "  offset={:>4} docked={:?} pane={} scroll_pane={} passes={:?} converged={:?}",
            scene.stack().scroll_offset(),
            scene.active_id(),
            scene.fixed_pane_height(),
            scene.stack().viewport_height(),
            res.map(|r| r.passes),
            res.map(|r| r.converged),
        );
    }
    if let Some(deadline) = scene.next_deadline() {
        scene.tick(deadline);
    }
    println!("  settled docked={:?}", scene.active_id());
}

fn main() {
    for strategy in [LayoutStrategy::Live, LayoutStrategy::Acyclic, LayoutStrategy::Static] {
        run(strategy);
    }
}
