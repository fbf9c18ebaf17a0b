use alloc::vec::Vec;

use stickyfeed::{
    FixedPane, LayoutPolicy, LayoutResolution, SectionId, StickyOptions, StickyTracker,
};

use crate::{SectionStack, StackElement};

/// Horizontal extent of the simulated container. Only the vertical axis matters here.
const SCENE_WIDTH: u32 = 375;

/// A sticky-header screen: a fixed pane stacked above a scroll container of sections.
///
/// The fixed pane always shows its base row and shows the extra row only while the docked
/// section asks for it. The scroll container is sized by the [`LayoutPolicy`], and every change
/// of the docked section re-runs the layout (which may in turn move the docked section, within
/// the policy's pass budget).
///
/// Section ids are their insertion indices.
#[derive(Clone, Debug)]
pub struct StickyScene {
    tracker: StickyTracker<StackElement>,
    stack: SectionStack,
    pane: FixedPane,
    policy: LayoutPolicy,
    extra_rows: Vec<bool>,
    resolution: Option<LayoutResolution>,
}

fn extra_row_visible(extra_rows: &[bool], active: Option<SectionId>) -> bool {
    active
        .and_then(|id| extra_rows.get(id as usize))
        .copied()
        .unwrap_or(false)
}

impl StickyScene {
    pub fn new(policy: LayoutPolicy, pane: FixedPane, options: StickyOptions) -> Self {
        let initial = pane.heights(false);
        let sizes = policy.sizes(initial);
        let stack = SectionStack::new(sizes.scroll_pane, SCENE_WIDTH)
            .with_container_top(initial.live as i64);
        Self {
            tracker: StickyTracker::new(StackElement::Container, options),
            stack,
            pane,
            policy,
            extra_rows: Vec::new(),
            resolution: None,
        }
    }

    pub fn with_footer_height(mut self, footer_height: u32) -> Self {
        self.stack = self.stack.with_footer_height(footer_height);
        self
    }

    /// Appends a section of `height`. `shows_extra_row` decides whether the fixed pane grows
    /// while this section is docked.
    pub fn push_section(&mut self, height: u32, shows_extra_row: bool) -> SectionId {
        let index = self.stack.push_block(height);
        self.extra_rows.push(shows_extra_row);
        let id = index as SectionId;
        self.tracker.register(id, StackElement::Block(index));
        id
    }

    pub fn tracker(&self) -> &StickyTracker<StackElement> {
        &self.tracker
    }

    pub fn stack(&self) -> &SectionStack {
        &self.stack
    }

    pub fn pane(&self) -> FixedPane {
        self.pane
    }

    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    pub fn active_id(&self) -> Option<SectionId> {
        self.tracker.active_id()
    }

    pub fn is_extra_row_visible(&self) -> bool {
        extra_row_visible(&self.extra_rows, self.tracker.active_id())
    }

    /// The current fixed pane height.
    pub fn fixed_pane_height(&self) -> u32 {
        self.pane.height(self.is_extra_row_visible())
    }

    /// Result of the most recent layout update.
    pub fn last_resolution(&self) -> Option<LayoutResolution> {
        self.resolution
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.tracker.next_deadline()
    }

    /// Initial docking and layout once all sections are pushed.
    pub fn mount(&mut self) -> LayoutResolution {
        self.tracker.mount(&self.stack);
        self.relayout()
    }

    /// Scrolls the container to `offset` (clamped) and reports the scroll to the tracker.
    ///
    /// Returns `true` if the docked section changed, in which case the layout was re-run.
    pub fn scroll_to(&mut self, offset: u64, now_ms: u64) -> bool {
        self.stack.set_scroll_offset(offset);
        let changed = self.tracker.on_scroll(now_ms, &self.stack);
        if changed {
            self.relayout();
        }
        changed
    }

    /// Drives the trailing recompute. Returns `true` if the docked section changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let changed = self.tracker.tick(now_ms, &self.stack);
        if changed {
            self.relayout();
        }
        changed
    }

    pub fn teardown(&mut self) {
        self.tracker.teardown();
    }

    /// Applies the layout policy for the current docked section.
    pub fn relayout(&mut self) -> LayoutResolution {
        let policy = self.policy;
        let pane = self.pane;
        let initial = pane.heights(self.is_extra_row_visible());
        self.stack.set_container_top(initial.live as i64);

        let Self {
            tracker,
            stack,
            extra_rows,
            ..
        } = self;
        let resolution = policy.resolve(initial, |scroll_pane| {
            stack.set_viewport_height(scroll_pane);
            tracker.recompute(&*stack);
            let heights = pane.heights(extra_row_visible(extra_rows, tracker.active_id()));
            stack.set_container_top(heights.live as i64);
            heights
        });

        self.stack.set_viewport_height(resolution.sizes.scroll_pane);
        self.resolution = Some(resolution);
        resolution
    }
}
