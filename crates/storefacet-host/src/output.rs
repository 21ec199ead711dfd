#![forbid(unsafe_code)]

//! Captured engine outputs for host consumption.
//!
//! The engine accumulates effects into a [`ShopOutputs`] batch; the host
//! drains the batch after each step and performs the real work: swap
//! fragment HTML into containers, re-attach handlers, start fetches,
//! rewrite history, or navigate away. A batch with a `redirect` is
//! terminal; everything else in it is moot once the browser navigates.

use crate::event::RequestToken;
use storefacet_wire::search::SearchResults;
use url::Url;

/// DOM id of the loading overlay element.
pub const OVERLAY_DOM_ID: &str = "shop-loading-overlay";

/// The four patchable containers, addressed by fixed DOM id.
///
/// A container missing from the page is a silent no-op for the host,
/// never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerId {
    /// `#shop-products-grid`.
    ProductsGrid,
    /// `#shop-result-count`.
    ResultCount,
    /// `#shop-pagination`.
    Pagination,
    /// `#shop-active-filters`.
    ActiveFilters,
}

impl ContainerId {
    /// All containers, in patch order.
    pub const ALL: [ContainerId; 4] = [
        ContainerId::ProductsGrid,
        ContainerId::ResultCount,
        ContainerId::Pagination,
        ContainerId::ActiveFilters,
    ];

    /// The element id this container is found by.
    #[must_use]
    pub const fn dom_id(self) -> &'static str {
        match self {
            ContainerId::ProductsGrid => "shop-products-grid",
            ContainerId::ResultCount => "shop-result-count",
            ContainerId::Pagination => "shop-pagination",
            ContainerId::ActiveFilters => "shop-active-filters",
        }
    }
}

bitflags::bitflags! {
    /// Handler families the host must re-attach after a patch, since
    /// `innerHTML` replacement discards listeners with the old nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RebindTargets: u8 {
        /// Pagination links inside `#shop-pagination`.
        const PAGINATION = 1 << 0;
        /// Chip remove buttons inside `#shop-active-filters`.
        const CHIPS = 1 << 1;
    }
}

/// Loading overlay cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Show the overlay.
    Show,
    /// Hide the overlay.
    Hide,
}

/// Replace one container's `innerHTML` with `html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPatch {
    /// Target container.
    pub container: ContainerId,
    /// Server-rendered (or engine-rendered) markup.
    pub html: String,
}

/// A POST the host must perform against the filtering endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Token to echo back in the completion event.
    pub token: RequestToken,
    /// Endpoint URL.
    pub endpoint: Url,
    /// `application/x-www-form-urlencoded` body.
    pub body: String,
}

/// A GET the host must perform against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFetch {
    /// Generation to echo back; also the abort handle for supersession.
    pub generation: u64,
    /// Full request URL.
    pub url: Url,
}

/// One drained batch of engine effects.
#[derive(Debug, Default, Clone)]
pub struct ShopOutputs {
    /// Container replacements, in order.
    pub patches: Vec<FragmentPatch>,
    /// Handler families to re-attach after applying `patches`.
    pub rebinds: RebindTargets,
    /// Last overlay cue, if any changed this batch.
    pub overlay: Option<Overlay>,
    /// Filter fetches to start.
    pub fetches: Vec<FetchRequest>,
    /// URLs to write via `history.replaceState`, in order.
    pub history: Vec<Url>,
    /// Terminal full-page navigation.
    pub redirect: Option<Url>,
    /// Search fetches to start.
    pub search_fetches: Vec<SearchFetch>,
    /// Generations of search fetches to abort.
    pub search_aborts: Vec<u64>,
    /// Latest search results to render in the popup.
    pub last_search: Option<SearchResults>,
    /// Whether the popup should be emptied and hidden.
    pub search_cleared: bool,
}

impl ShopOutputs {
    /// Whether the batch carries no effect at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
            && self.rebinds.is_empty()
            && self.overlay.is_none()
            && self.fetches.is_empty()
            && self.history.is_empty()
            && self.redirect.is_none()
            && self.search_fetches.is_empty()
            && self.search_aborts.is_empty()
            && self.last_search.is_none()
            && !self.search_cleared
    }
}
