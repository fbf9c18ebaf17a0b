//! Sizing of a scroll pane stacked below a fixed pane of variable height.
//!
//! A size must never be derived from a value that the same size decision produces within one
//! synchronous update. [`LayoutStrategy::Live`] breaks that rule on purpose (it re-reads the
//! measured fixed pane after resizing) and is therefore damped by [`LayoutPolicy::max_passes`].

/// How the scroll pane height is derived from the fixed pane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutStrategy {
    /// `total - live measured fixed pane height`, re-measured after every resize.
    ///
    /// If the fixed pane depends on scroll-derived state (e.g. the docked section), resizing can
    /// flip that state and the loop may never converge.
    Live,
    /// `total - fixed pane height derived from state inputs`, computed once per update.
    ///
    /// Cannot loop, but still resizes whenever those inputs change during interaction.
    Acyclic,
    /// `total - baseline fixed pane height`. Never changes during interaction; the difference to
    /// the live height is reported as [`LayoutSizes::overflow`].
    #[default]
    Static,
}

impl LayoutStrategy {
    /// Whether this strategy reads a measurement that its own output can change.
    pub fn reads_live_measurement(self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn scroll_pane_height(self, total_height: u32, pane: PaneHeights) -> u32 {
        let fixed = match self {
            Self::Live => pane.live,
            Self::Acyclic => pane.derived,
            Self::Static => pane.base,
        };
        total_height.saturating_sub(fixed)
    }
}

/// The fixed pane's height, as seen by each strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaneHeights {
    /// Currently rendered (measured) height.
    pub live: u32,
    /// Height computed from state inputs at the start of the update.
    pub derived: u32,
    /// Height that never changes during interaction.
    pub base: u32,
}

/// A fixed pane made of an always-present row plus an optional extra row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedPane {
    pub base_height: u32,
    pub extra_height: u32,
}

impl FixedPane {
    pub fn new(base_height: u32, extra_height: u32) -> Self {
        Self {
            base_height,
            extra_height,
        }
    }

    pub fn height(&self, extra_visible: bool) -> u32 {
        if extra_visible {
            self.base_height.saturating_add(self.extra_height)
        } else {
            self.base_height
        }
    }

    pub fn heights(&self, extra_visible: bool) -> PaneHeights {
        let h = self.height(extra_visible);
        PaneHeights {
            live: h,
            derived: h,
            base: self.base_height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSizes {
    pub container: u32,
    pub scroll_pane: u32,
    /// How far fixed pane + scroll pane exceed the container (the accepted slack).
    pub overflow: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResolution {
    pub sizes: LayoutSizes,
    pub passes: u32,
    /// `false` when the pass budget ran out before the measurement settled.
    pub converged: bool,
}

/// Container sizing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPolicy {
    pub total_height: u32,
    pub strategy: LayoutStrategy,
    /// Upper bound on layout passes per update for [`LayoutStrategy::Live`].
    pub max_passes: u32,
}

impl LayoutPolicy {
    pub fn new(total_height: u32) -> Self {
        Self {
            total_height,
            strategy: LayoutStrategy::default(),
            max_passes: 2,
        }
    }

    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Single-pass sizing from the given heights.
    pub fn sizes(&self, pane: PaneHeights) -> LayoutSizes {
        let scroll_pane = self
            .strategy
            .scroll_pane_height(self.total_height, pane);
        LayoutSizes {
            container: self.total_height,
            scroll_pane,
            overflow: pane
                .live
                .saturating_add(scroll_pane)
                .saturating_sub(self.total_height),
        }
    }

    /// Runs one layout update.
    ///
    /// `measure(scroll_pane)` applies a scroll pane height to the host and returns the fixed
    /// pane heights observed afterwards. Strategies that do not read the live measurement finish
    /// in one pass without calling it. [`LayoutStrategy::Live`] re-measures until the live height
    /// stops changing or `max_passes` is reached.
    pub fn resolve(
        &self,
        initial: PaneHeights,
        mut measure: impl FnMut(u32) -> PaneHeights,
    ) -> LayoutResolution {
        let mut pane = initial;
        let mut sizes = self.sizes(pane);
        if !self.strategy.reads_live_measurement() {
            return LayoutResolution {
                sizes,
                passes: 1,
                converged: true,
            };
        }

        let max_passes = self.max_passes.max(1);
        let mut passes = 1u32;
        loop {
            let next = measure(sizes.scroll_pane);
            if next.live == pane.live {
                return LayoutResolution {
                    sizes,
                    passes,
                    converged: true,
                };
            }
            if passes >= max_passes {
                swarn!(passes, live = next.live, "layout did not settle; damping");
                return LayoutResolution {
                    sizes: LayoutSizes {
                        overflow: next
                            .live
                            .saturating_add(sizes.scroll_pane)
                            .saturating_sub(self.total_height),
                        ..sizes
                    },
                    passes,
                    converged: false,
                };
            }
            pane = next;
            sizes = self.sizes(pane);
            passes += 1;
        }
    }
}
