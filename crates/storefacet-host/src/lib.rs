#![forbid(unsafe_code)]

//! `storefacet-host` defines the seam between the filtering engine and
//! whatever embeds it.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (a browser bridge, a
//!   test harness) pushes [`event::ShopEvent`]s and performs the actual
//!   network and DOM work.
//! - **Deterministic time**: the host advances a monotonic clock
//!   explicitly; the engine never reads wall-clock time.
//! - **Effects as data**: the engine answers with [`output::ShopOutputs`],
//!   a drained batch of DOM patches, fetches, history updates, and at
//!   most one terminal redirect.
//!
//! Nothing in this crate performs I/O; it is shared vocabulary.

pub mod config;
pub mod event;
pub mod output;

use core::time::Duration;
use std::collections::VecDeque;

use event::ShopEvent;

/// Monotonic time source for debounce scheduling.
///
/// The embedder owns time: nothing downstream reads a wall clock, so
/// replaying one event sequence with the same `advance` calls yields the
/// same schedule every run.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    elapsed: Duration,
}

impl DeterministicClock {
    /// A clock at the zero instant.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Time elapsed since construction.
    #[must_use]
    pub const fn now_mono(&self) -> Duration {
        self.elapsed
    }

    /// Jump directly to `now`.
    pub fn set(&mut self, now: Duration) {
        self.elapsed = now;
    }

    /// Move forward by `dt`, holding at `Duration::MAX` once reached.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

/// Host-driven event queue.
///
/// The host is responsible for translating raw DOM interactions into
/// [`ShopEvent`] values and pushing them here; the engine drains the
/// queue one step at a time.
#[derive(Debug, Clone, Default)]
pub struct HostEventQueue {
    queue: VecDeque<ShopEvent>,
}

impl HostEventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a canonical event onto the queue.
    pub fn push_event(&mut self, event: ShopEvent) {
        self.queue.push_back(event);
    }

    /// Whether any events are waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Pop the oldest pending event.
    pub fn pop_event(&mut self) -> Option<ShopEvent> {
        self.queue.pop_front()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = ShopEvent> + '_ {
        self.queue.drain(..)
    }
}
