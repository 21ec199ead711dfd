#![forbid(unsafe_code)]

//! Storefacet public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for embedders. It
//! re-exports common types from the internal crates and offers a lightweight
//! prelude for day-to-day usage.

use std::fmt;

// --- State re-exports ------------------------------------------------------

pub use storefacet_core::category::{CategoryId, CategoryTree, Expansion};
pub use storefacet_core::slider::{Handle, PriceSlider, TrackRect};
pub use storefacet_core::state::{
    FilterKind, FilterState, InstantPatch, PageSize, PriceBounds, PriceSelection, SortOrder,
};
pub use storefacet_core::store::FilterStore;

// --- Wire re-exports -------------------------------------------------------

pub use storefacet_wire::envelope::{ActiveFilter, EnvelopeError, FilterResults};
pub use storefacet_wire::payload::FilterRequest;
pub use storefacet_wire::query::{encode_query, page_url, parse_query};
pub use storefacet_wire::search::{CategoryHit, ProductHit, SearchQuery, SearchResults};

// --- Host seam re-exports --------------------------------------------------

pub use storefacet_host::config::{AjaxConfig, ShopConfig};
pub use storefacet_host::event::{FetchOutcome, RequestToken, ShopEvent};
pub use storefacet_host::output::{
    ContainerId, FetchRequest, FragmentPatch, Overlay, RebindTargets, SearchFetch, ShopOutputs,
};
pub use storefacet_host::{DeterministicClock, HostEventQueue};

// --- Engine re-exports -----------------------------------------------------

#[cfg(feature = "engine")]
pub use storefacet_engine::controller::ShopController;
#[cfg(feature = "engine")]
pub use storefacet_engine::program::{ShopProgram, StepResult};
#[cfg(feature = "engine")]
pub use storefacet_engine::search::SearchPopup;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for storefacet embedders.
#[derive(Debug)]
pub enum Error {
    /// A response body could not be used.
    Envelope(EnvelopeError),
    /// A URL could not be parsed.
    Url(url::ParseError),
    /// Page wiring is invalid, with a message.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope(err) => write!(f, "{err}"),
            Self::Url(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Envelope(err) => Some(err),
            Self::Url(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<EnvelopeError> for Error {
    fn from(err: EnvelopeError) -> Self {
        Self::Envelope(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err)
    }
}

/// Standard result type for storefacet APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AjaxConfig, CategoryId, CategoryTree, Error, FetchOutcome, FilterState, FilterStore,
        PageSize, PriceBounds, Result, ShopConfig, ShopEvent, ShopOutputs, SortOrder,
    };

    #[cfg(feature = "engine")]
    pub use crate::{ShopController, ShopProgram};

    pub use crate::{core, host, wire};

    #[cfg(feature = "engine")]
    pub use crate::engine;
}

pub use storefacet_core as core;
pub use storefacet_host as host;
pub use storefacet_wire as wire;

#[cfg(feature = "engine")]
pub use storefacet_engine as engine;
