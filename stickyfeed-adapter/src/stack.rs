use alloc::vec::Vec;

use stickyfeed::{BoundingBox, ViewportGeometry};

/// Elements a [`SectionStack`] can resolve geometry for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackElement {
    /// The scroll container itself.
    Container,
    /// The n-th block in stacking order.
    Block(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Block {
    height: u32,
    mounted: bool,
}

/// A simulated vertical scroll container: blocks stacked top to bottom, followed by an optional
/// footer, scrolled by a clamped offset.
///
/// Coordinates are viewport-relative, like a browser's bounding client rects: a block's top is
/// `container_top + block_start - scroll_offset`. Unmounted blocks take no space and resolve to
/// no geometry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionStack {
    container_top: i64,
    viewport_height: u32,
    width: u32,
    footer_height: u32,
    scroll_offset: u64,
    blocks: Vec<Block>,
}

impl SectionStack {
    pub fn new(viewport_height: u32, width: u32) -> Self {
        Self {
            container_top: 0,
            viewport_height,
            width,
            footer_height: 0,
            scroll_offset: 0,
            blocks: Vec::new(),
        }
    }

    pub fn with_footer_height(mut self, footer_height: u32) -> Self {
        self.footer_height = footer_height;
        self.clamp();
        self
    }

    pub fn with_container_top(mut self, container_top: i64) -> Self {
        self.container_top = container_top;
        self
    }

    /// Appends a mounted block and returns its index.
    pub fn push_block(&mut self, height: u32) -> usize {
        self.blocks.push(Block {
            height,
            mounted: true,
        });
        self.blocks.len() - 1
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_height(&self, index: usize) -> Option<u32> {
        self.blocks.get(index).map(|b| b.height)
    }

    pub fn set_block_height(&mut self, index: usize, height: u32) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.height = height;
            self.clamp();
        }
    }

    pub fn is_mounted(&self, index: usize) -> bool {
        self.blocks.get(index).is_some_and(|b| b.mounted)
    }

    pub fn set_block_mounted(&mut self, index: usize, mounted: bool) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.mounted = mounted;
            self.clamp();
        }
    }

    pub fn container_top(&self) -> i64 {
        self.container_top
    }

    pub fn set_container_top(&mut self, container_top: i64) {
        self.container_top = container_top;
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Resizes the container. A taller viewport can pull the scroll offset back.
    pub fn set_viewport_height(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height;
        self.clamp();
    }

    pub fn footer_height(&self) -> u32 {
        self.footer_height
    }

    /// Total scrollable height: mounted blocks plus the footer.
    pub fn content_height(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.mounted)
            .map(|b| b.height as u64)
            .sum::<u64>()
            .saturating_add(self.footer_height as u64)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.content_height()
            .saturating_sub(self.viewport_height as u64)
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Scrolls to `offset`, clamped to `[0, max_scroll_offset]`. Returns the applied offset.
    pub fn set_scroll_offset(&mut self, offset: u64) -> u64 {
        self.scroll_offset = offset.min(self.max_scroll_offset());
        self.scroll_offset
    }

    /// Scrolls by a signed delta (clamped).
    pub fn scroll_by(&mut self, delta: i64) -> u64 {
        let next = if delta >= 0 {
            self.scroll_offset.saturating_add(delta as u64)
        } else {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        };
        self.set_scroll_offset(next)
    }

    /// Content-space start of a mounted block.
    pub fn block_start(&self, index: usize) -> Option<u64> {
        if !self.is_mounted(index) {
            return None;
        }
        Some(
            self.blocks[..index]
                .iter()
                .filter(|b| b.mounted)
                .map(|b| b.height as u64)
                .sum(),
        )
    }

    /// Index of the first block that straddles the container's top edge.
    pub fn block_at_top(&self) -> Option<usize> {
        (0..self.blocks.len()).find(|&i| {
            self.bounding_box(&StackElement::Block(i))
                .is_some_and(|r| r.straddles(self.container_top))
        })
    }

    fn clamp(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
    }
}

impl ViewportGeometry<StackElement> for SectionStack {
    fn bounding_box(&self, handle: &StackElement) -> Option<BoundingBox> {
        let right = i64::from(self.width);
        match *handle {
            StackElement::Container => Some(BoundingBox::new(
                self.container_top,
                self.container_top
                    .saturating_add(i64::from(self.viewport_height)),
                0,
                right,
            )),
            StackElement::Block(index) => {
                let start = i64::try_from(self.block_start(index)?).unwrap_or(i64::MAX);
                let scrolled = i64::try_from(self.scroll_offset).unwrap_or(i64::MAX);
                let height = i64::from(self.blocks[index].height);
                let top = self
                    .container_top
                    .saturating_add(start)
                    .saturating_sub(scrolled);
                Some(BoundingBox::new(top, top.saturating_add(height), 0, right))
            }
        }
    }

    fn scroll_offset(&self, handle: &StackElement) -> Option<i64> {
        match handle {
            StackElement::Container => Some(i64::try_from(self.scroll_offset).unwrap_or(i64::MAX)),
            StackElement::Block(_) => None,
        }
    }
}
