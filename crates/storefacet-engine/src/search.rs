#![forbid(unsafe_code)]

//! Debounced header search popup.
//!
//! Keystrokes arrive as raw input values; the popup schedules one fetch per
//! quiet period rather than one per keystroke. Time comes from the host
//! through [`SearchPopup::advance`], so the debounce window is exact and
//! testable.
//!
//! Every dispatched fetch carries a generation number. A newer dispatch
//! supersedes the old one: the stale generation is reported for abortion and
//! its completion, should it still arrive, is ignored. Search failures are
//! silent; the popup simply keeps whatever it last showed.

use std::time::Duration;

use storefacet_host::event::FetchOutcome;
use storefacet_host::output::{SearchFetch, ShopOutputs};
use storefacet_wire::search::{SearchQuery, decode};
use url::Url;

/// Quiet period between the last keystroke and the dispatched fetch.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// Result-set size requested for the popup.
pub const POPUP_PER_PAGE: u32 = 8;

/// State behind the header search box.
#[derive(Debug, Clone)]
pub struct SearchPopup {
    base: Url,
    term: String,
    deadline: Option<Duration>,
    generation: u64,
    in_flight: Option<u64>,
}

impl SearchPopup {
    /// Create a popup issuing requests against `base`'s origin.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            base,
            term: String::new(),
            deadline: None,
            generation: 0,
            in_flight: None,
        }
    }

    /// Record the current input value at time `now`.
    ///
    /// A term long enough to search schedules a fetch [`DEBOUNCE`] from
    /// `now`, replacing any earlier schedule. A shorter term cancels the
    /// schedule, aborts any fetch still running, and asks the host to empty
    /// the popup.
    pub fn input(&mut self, term: &str, now: Duration, out: &mut ShopOutputs) {
        self.term = term.to_owned();
        if SearchQuery::new(term, POPUP_PER_PAGE).is_none() {
            self.deadline = None;
            if let Some(stale) = self.in_flight.take() {
                out.search_aborts.push(stale);
            }
            out.search_cleared = true;
            return;
        }
        self.deadline = Some(now.saturating_add(DEBOUNCE));
    }

    /// Dispatch the scheduled fetch if its quiet period has elapsed by `now`.
    pub fn advance(&mut self, now: Duration, out: &mut ShopOutputs) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if now < deadline {
            return;
        }
        self.deadline = None;
        let Some(query) = SearchQuery::new(&self.term, POPUP_PER_PAGE) else {
            return;
        };
        if let Some(stale) = self.in_flight.take() {
            out.search_aborts.push(stale);
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        tracing::trace!(
            generation = self.generation,
            term = query.term(),
            "search dispatched"
        );
        out.search_fetches.push(SearchFetch {
            generation: self.generation,
            url: query.url(&self.base),
        });
    }

    /// Feed back the outcome of a dispatched fetch.
    ///
    /// Only the newest generation is honored; anything else was superseded
    /// and is dropped. Failures of any kind leave the popup untouched.
    pub fn complete(&mut self, generation: u64, outcome: FetchOutcome, out: &mut ShopOutputs) {
        if self.in_flight != Some(generation) {
            tracing::debug!(generation, "stale search completion ignored");
            return;
        }
        self.in_flight = None;
        let body = match outcome {
            FetchOutcome::Response { status, body } if (200..300).contains(&status) => body,
            FetchOutcome::Response { status, .. } => {
                tracing::debug!(status, "search returned a non-success status");
                return;
            }
            FetchOutcome::TransportError { message } => {
                tracing::debug!(%message, "search failed in transport");
                return;
            }
        };
        match decode(&body) {
            Ok(results) => out.last_search = Some(results),
            Err(err) => tracing::debug!(error = %err, "search response unusable"),
        }
    }

    /// Whether a fetch is scheduled but not yet dispatched.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Generation of the newest dispatched fetch, 0 before the first.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a dispatched fetch has not completed yet.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}
