//! Adapter utilities for the `stickyfeed` crate.
//!
//! The `stickyfeed` crate is UI-agnostic and only holds state machines. This crate wires them
//! into the two screens they are usually part of:
//!
//! - [`StickyScene`]: a fixed pane above a scroll container whose docked section decides the
//!   pane height, sized by a [`stickyfeed::LayoutPolicy`].
//! - [`FeedPage`]: a tabbed infinite feed with a header backdrop and a load-more sentinel.
//!
//! [`SectionStack`] is a simulated scroll container that implements
//! [`stickyfeed::ViewportGeometry`], useful for demos, tests and terminal UIs.
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod key;
mod page;
mod scene;
mod stack;

#[cfg(test)]
mod tests;

pub use key::TabKey;
pub use page::{FeedPage, Footer, HeaderBackdrop, PageElement};
pub use scene::StickyScene;
pub use stack::{SectionStack, StackElement};
