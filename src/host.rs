//! Host Platform
//!
//! The store never touches a browser directly. Everything it needs from the
//! platform (the raw fragment, the viewport scroll offset and the queue of
//! navigation notifications) goes through [`Host`]. [`MemoryHost`] is a
//! headless implementation that behaves the way a browser does, used by the
//! CLI and the tests.

use serde::{Deserialize, Serialize};

use crate::codec::{strip_marker, FRAGMENT_MARKER};

/// Viewport scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn vertical(y: f64) -> Self {
        Self { x: 0.0, y }
    }
}

/// Platform services consumed by the store.
pub trait Host {
    /// The raw fragment as the platform reports it: `#`-prefixed when
    /// non-empty, `""` otherwise.
    fn fragment(&self) -> String;

    /// Assign the fragment. `hash` is given without the leading `#`.
    /// Assigning a different value raises a navigation notification.
    fn set_fragment(&mut self, hash: &str);

    fn scroll_offset(&self) -> ScrollOffset;

    fn set_scroll_offset(&mut self, offset: ScrollOffset);

    /// Drain the navigation notifications raised since the last call and
    /// return how many there were.
    fn take_navigations(&mut self) -> usize;
}

/// In-memory host for headless use and tests.
///
/// Mirrors browser behaviour: a fragment assignment that changes the value
/// queues one navigation notification, and assigning an empty fragment
/// scrolls the viewport back to the top.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    fragment: String,
    scroll: ScrollOffset,
    pending: usize,
    writes: Vec<String>,
}

fn normalize_fragment(hash: &str) -> String {
    let body = strip_marker(hash);
    if body.is_empty() {
        String::new()
    } else {
        format!("{}{}", FRAGMENT_MARKER, body)
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose page was loaded with `hash` already in the address bar.
    pub fn with_fragment(hash: &str) -> Self {
        Self {
            fragment: normalize_fragment(hash),
            ..Self::default()
        }
    }

    /// Simulate an external fragment change (typing in the address bar,
    /// following a link, back/forward).
    pub fn navigate(&mut self, hash: &str) {
        let next = normalize_fragment(hash);
        self.apply(next);
    }

    /// Fragment assignments made through [`Host::set_fragment`], in order.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn pending_navigations(&self) -> usize {
        self.pending
    }

    fn apply(&mut self, next: String) {
        if next == self.fragment {
            return;
        }
        if next.is_empty() {
            self.scroll = ScrollOffset::default();
        }
        self.fragment = next;
        self.pending += 1;
    }
}

impl Host for MemoryHost {
    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, hash: &str) {
        let next = normalize_fragment(hash);
        self.writes.push(next.clone());
        self.apply(next);
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: ScrollOffset) {
        self.scroll = offset;
    }

    fn take_navigations(&mut self) -> usize {
        std::mem::take(&mut self.pending)
    }
}
