#![forbid(unsafe_code)]

//! Event-driven controller for the shop filtering page.
//!
//! [`ShopController`] is the single writer of filter state. The host feeds
//! it [`ShopEvent`]s; it mutates the [`FilterStore`] and accumulates
//! [`ShopOutputs`] describing the I/O the host must perform. It performs no
//! I/O itself and reads no clocks, so a scripted sequence of events always
//! produces the same outputs.
//!
//! # Design
//!
//! | Concern | Model |
//! |---------|-------|
//! | Fetch lifecycle | One in-flight request at most; triggers while busy are dropped whole |
//! | Failure handling | Any fetch failure falls back to one full-page navigation |
//! | URL sync | Every reconciled response records the applied state in history |
//! | Termination | After redirecting, the controller ignores all further events |
//!
//! Sidebar edits (checkboxes, slider, carets) touch only the staged layer
//! and never fetch. Apply commits the staged layer wholesale; instant
//! controls (sort, page size, toggles, pagination) write both layers and
//! fetch immediately, leaving unapplied sidebar edits intact.
//!
//! The fallback navigation target is built from the same query codec as the
//! history updates, so a failed fetch lands the browser on the page it would
//! have been showing anyway.

use std::time::Duration;

use storefacet_core::category::CategoryTree;
use storefacet_core::slider::{Handle, PriceSlider};
use storefacet_core::state::InstantPatch;
use storefacet_core::store::FilterStore;
use storefacet_host::config::ShopConfig;
use storefacet_host::event::{FetchOutcome, RequestToken, ShopEvent};
use storefacet_host::output::{FetchRequest, Overlay, RebindTargets, ShopOutputs};
use storefacet_wire::envelope::{self, FilterResults};
use storefacet_wire::payload::FilterRequest;
use storefacet_wire::query::{page_url, parse_query};
use url::Url;

use crate::reconcile;
use crate::search::SearchPopup;

/// The shop page's state machine.
#[derive(Debug)]
pub struct ShopController {
    config: ShopConfig,
    tree: CategoryTree,
    store: FilterStore,
    slider: PriceSlider,
    search: SearchPopup,
    canonical: Url,
    outputs: ShopOutputs,
    in_flight: Option<RequestToken>,
    next_token: u64,
    redirecting: bool,
    now: Duration,
}

impl ShopController {
    /// Create a controller for the page described by `config`.
    ///
    /// The initial applied state is parsed from the page URL's query string,
    /// so a shared or reloaded filtered URL starts from the filters it
    /// names.
    #[must_use]
    pub fn new(tree: CategoryTree, config: ShopConfig) -> Self {
        let bounds = config.bounds();
        let initial = parse_query(config.page_url().query().unwrap_or(""), bounds, &tree);
        let canonical = config.canonical_url();
        Self {
            store: FilterStore::from_state(initial, bounds),
            slider: PriceSlider::new(bounds),
            search: SearchPopup::new(canonical.clone()),
            canonical,
            tree,
            config,
            outputs: ShopOutputs::default(),
            in_flight: None,
            next_token: 1,
            redirecting: false,
            now: Duration::ZERO,
        }
    }

    /// Process one host event.
    pub fn handle(&mut self, event: ShopEvent) {
        if self.redirecting {
            tracing::trace!(?event, "event ignored, navigation pending");
            return;
        }
        match event {
            ShopEvent::CategoryToggled { id, selected } => {
                self.store.stage_category(id, selected, &self.tree);
            }
            ShopEvent::ExpansionToggled { parent } => {
                self.store.toggle_expansion(parent, &self.tree);
            }
            ShopEvent::SliderDragged { handle, x, track } => {
                let value = self.slider.value_at(x, track);
                self.move_handle(handle, value);
            }
            ShopEvent::TrackClicked { x, track } => {
                let value = self.slider.value_at(x, track);
                let price = self.store.staged().price;
                let handle = Handle::nearest(value, price.min, price.max);
                self.move_handle(handle, value);
            }
            ShopEvent::ApplyClicked => {
                if self.begin_action("apply") {
                    let changed = self.store.commit_staged();
                    tracing::debug!(changed, "staged filters applied");
                    self.fire_request();
                }
            }
            ShopEvent::ClearAllClicked => self.clear_all(),
            ShopEvent::OnSaleToggled(on) => self.instant(InstantPatch::OnSale(on)),
            ShopEvent::InStockToggled(on) => self.instant(InstantPatch::InStock(on)),
            ShopEvent::SortChanged(order) => self.instant(InstantPatch::Sort(order)),
            ShopEvent::PerPageChanged(size) => self.instant(InstantPatch::PerPage(size)),
            ShopEvent::PageRequested(page) => self.instant(InstantPatch::Page(page)),
            ShopEvent::ChipRemoved { kind, id } => {
                if self.begin_action("chip_remove") && self.store.remove_filter(kind, id, &self.tree)
                {
                    self.fire_request();
                }
            }
            ShopEvent::FetchCompleted { token, outcome } => self.on_fetch_completed(token, outcome),
            ShopEvent::HistoryPopped { query } => {
                if self.begin_action("popstate") {
                    let state = parse_query(&query, self.store.bounds(), &self.tree);
                    self.store.restore(state);
                    self.fire_request();
                }
            }
            ShopEvent::SearchInput { term } => {
                self.search.input(&term, self.now, &mut self.outputs);
            }
            ShopEvent::SearchCompleted {
                generation,
                outcome,
            } => {
                self.search.complete(generation, outcome, &mut self.outputs);
            }
        }
    }

    /// Advance the controller's clock, dispatching any due debounced work.
    pub fn advance_time(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
        if !self.redirecting {
            self.search.advance(self.now, &mut self.outputs);
        }
    }

    /// Drain the accumulated effects, leaving an empty batch behind.
    #[must_use]
    pub fn take_outputs(&mut self) -> ShopOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Whether any effect is waiting to be drained.
    #[must_use]
    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Whether a filter fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a full-page navigation has been emitted.
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.redirecting
    }

    /// The filter store.
    #[must_use]
    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    /// The category tree the page was built with.
    #[must_use]
    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// The page configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// The search popup.
    #[must_use]
    pub fn search(&self) -> &SearchPopup {
        &self.search
    }

    /// Current controller time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    fn move_handle(&mut self, handle: Handle, value: u32) {
        let price = self.store.staged().price;
        match handle {
            Handle::Low => {
                let low = self.slider.clamp_low(value, price.max);
                self.store.stage_price(low, price.max);
            }
            Handle::High => {
                let high = self.slider.clamp_high(value, price.min);
                self.store.stage_price(price.min, high);
            }
        }
    }

    /// Gate for actions that end in a fetch. While one is in flight the
    /// whole action is dropped, state changes included, not queued.
    fn begin_action(&mut self, action: &'static str) -> bool {
        if self.in_flight.is_some() {
            tracing::debug!(action, "dropped while a fetch is in flight");
            return false;
        }
        true
    }

    fn instant(&mut self, patch: InstantPatch) {
        if self.begin_action("instant") {
            self.store.apply_instant(patch);
            self.fire_request();
        }
    }

    fn clear_all(&mut self) {
        match self.config.scope() {
            None => {
                self.store.clear_all(None);
                self.redirect_to(self.canonical.clone());
            }
            Some(scope) => {
                if !self.begin_action("clear_all") {
                    return;
                }
                // The landing category survives only when nothing was
                // explicitly selected on top of it.
                let keep_scope = self.store.applied().categories.is_empty();
                self.store.clear_all(keep_scope.then_some(scope));
                self.fire_request();
            }
        }
    }

    fn fire_request(&mut self) {
        let (endpoint, nonce) = match self.config.ajax() {
            Some(ajax) => (ajax.endpoint.clone(), ajax.nonce.clone()),
            None => {
                tracing::warn!("ajax endpoint or nonce missing");
                self.fallback_redirect();
                return;
            }
        };
        let request = FilterRequest::new(self.store.applied(), self.store.bounds(), &nonce);
        let token = RequestToken::new(self.next_token);
        self.next_token += 1;
        self.in_flight = Some(token);
        self.outputs.overlay = Some(Overlay::Show);
        tracing::trace!(token = token.get(), "filter fetch dispatched");
        self.outputs.fetches.push(FetchRequest {
            token,
            endpoint,
            body: request.body(),
        });
    }

    fn on_fetch_completed(&mut self, token: RequestToken, outcome: FetchOutcome) {
        if self.in_flight != Some(token) {
            tracing::debug!(token = token.get(), "stale fetch completion ignored");
            return;
        }
        self.in_flight = None;
        let body = match outcome {
            FetchOutcome::Response { status, body } if (200..300).contains(&status) => body,
            FetchOutcome::Response { status, .. } => {
                tracing::warn!(status, "filter fetch returned a non-success status");
                self.fallback_redirect();
                return;
            }
            FetchOutcome::TransportError { message } => {
                tracing::warn!(%message, "filter fetch failed in transport");
                self.fallback_redirect();
                return;
            }
        };
        match envelope::decode(&body) {
            Ok(results) => self.reconcile(&results),
            Err(err) => {
                tracing::warn!(error = %err, "filter response unusable");
                self.fallback_redirect();
            }
        }
    }

    fn reconcile(&mut self, results: &FilterResults) {
        // The server may clamp an out-of-range page.
        if results.current_page >= 1 && results.current_page != self.store.applied().page {
            self.store.apply_instant(InstantPatch::Page(results.current_page));
        }
        self.outputs.patches.extend(reconcile::results_patches(results));
        self.outputs.rebinds |= RebindTargets::PAGINATION | RebindTargets::CHIPS;
        let url = page_url(&self.canonical, self.store.applied(), self.store.bounds());
        self.outputs.history.push(url);
        self.outputs.overlay = Some(Overlay::Hide);
        tracing::trace!(
            total = results.total,
            page = results.current_page,
            "results reconciled"
        );
    }

    /// Abandon in-page filtering and navigate to the URL carrying the
    /// applied state. Emitted at most once for the controller's lifetime.
    fn fallback_redirect(&mut self) {
        if self.redirecting {
            return;
        }
        self.in_flight = None;
        self.outputs.overlay = Some(Overlay::Hide);
        let url = page_url(&self.canonical, self.store.applied(), self.store.bounds());
        tracing::warn!(url = %url, "falling back to full-page navigation");
        self.redirect_to(url);
    }

    fn redirect_to(&mut self, url: Url) {
        if self.redirecting {
            return;
        }
        self.redirecting = true;
        self.outputs.redirect = Some(url);
    }
}
