#![forbid(unsafe_code)]

//! Canonical events the host feeds into the engine.
//!
//! Each variant corresponds to one user interaction or one completed
//! side effect. The host owns the translation from raw DOM events; the
//! engine never sees an element, only these values.

use storefacet_core::category::CategoryId;
use storefacet_core::slider::{Handle, TrackRect};
use storefacet_core::state::{FilterKind, PageSize, SortOrder};

/// Correlates a fetch the engine requested with its completion event.
///
/// Tokens are engine-issued and strictly increasing; a completion whose
/// token no longer matches the in-flight request is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Wrap a raw token value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// How a host-performed fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The request completed with an HTTP status and a body.
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The request never produced a response (network failure, CORS,
    /// aborted connection).
    TransportError {
        /// Host-provided description, for logs only.
        message: String,
    },
}

/// One interaction or completed side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum ShopEvent {
    /// A category checkbox changed.
    CategoryToggled {
        /// The category.
        id: CategoryId,
        /// New checkbox state.
        selected: bool,
    },
    /// A parent category's caret was clicked.
    ExpansionToggled {
        /// The parent category.
        parent: CategoryId,
    },
    /// A slider handle moved to pixel `x`.
    SliderDragged {
        /// Which handle is being dragged.
        handle: Handle,
        /// Pointer x position.
        x: f64,
        /// Track extent measured at event time.
        track: TrackRect,
    },
    /// The track was clicked away from both handles.
    TrackClicked {
        /// Pointer x position.
        x: f64,
        /// Track extent measured at event time.
        track: TrackRect,
    },
    /// The Apply button was clicked.
    ApplyClicked,
    /// The clear-all control was clicked.
    ClearAllClicked,
    /// The on-sale toggle changed.
    OnSaleToggled(bool),
    /// The in-stock toggle changed.
    InStockToggled(bool),
    /// The sort dropdown changed.
    SortChanged(SortOrder),
    /// The page-size dropdown changed.
    PerPageChanged(PageSize),
    /// A pagination link was clicked.
    PageRequested(u32),
    /// An active-filter chip's remove button was clicked.
    ChipRemoved {
        /// Which filter family the chip removes.
        kind: FilterKind,
        /// Category id for category chips.
        id: Option<CategoryId>,
    },
    /// A filter fetch the engine requested has completed.
    FetchCompleted {
        /// Token from the originating [`crate::output::FetchRequest`].
        token: RequestToken,
        /// How it ended.
        outcome: FetchOutcome,
    },
    /// The browser fired `popstate`; `query` is the new location's query
    /// string, without the leading `?`.
    HistoryPopped {
        /// Raw query string.
        query: String,
    },
    /// The search box content changed.
    SearchInput {
        /// Current raw input value.
        term: String,
    },
    /// A search fetch the engine requested has completed.
    SearchCompleted {
        /// Generation from the originating [`crate::output::SearchFetch`].
        generation: u64,
        /// How it ended.
        outcome: FetchOutcome,
    },
}
