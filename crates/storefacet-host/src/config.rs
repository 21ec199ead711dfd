#![forbid(unsafe_code)]

//! Page configuration, injected once at construction.
//!
//! The server-rendered page used to publish this as ambient globals; here
//! it travels explicitly. A page always knows its own URL and price
//! bounds; the AJAX wiring is optional, and an absent (or nonce-less)
//! [`AjaxConfig`] means every filter action degrades to a full-page
//! navigation from the start.

use storefacet_core::category::CategoryId;
use storefacet_core::state::PriceBounds;
use url::Url;

/// Endpoint wiring for the `filter_products` AJAX action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxConfig {
    /// `admin-ajax.php` URL.
    pub endpoint: Url,
    /// Request nonce. An empty nonce is treated as missing wiring.
    pub nonce: String,
}

impl AjaxConfig {
    /// Create endpoint wiring.
    #[must_use]
    pub fn new(endpoint: Url, nonce: impl Into<String>) -> Self {
        Self {
            endpoint,
            nonce: nonce.into(),
        }
    }
}

/// Everything the engine needs to know about the page it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    page_url: Url,
    bounds: PriceBounds,
    scope: Option<CategoryId>,
    ajax: Option<AjaxConfig>,
}

impl ShopConfig {
    /// Configuration for a shop page at `page_url` with the catalog's
    /// price bounds. The URL may carry a filter query; the engine parses
    /// it into the initial state.
    #[must_use]
    pub fn new(page_url: Url, bounds: PriceBounds) -> Self {
        Self {
            page_url,
            bounds,
            scope: None,
            ajax: None,
        }
    }

    /// Mark this as a category landing page scoped to `id`.
    #[must_use]
    pub fn with_scope(mut self, id: CategoryId) -> Self {
        self.scope = Some(id);
        self
    }

    /// Attach AJAX endpoint wiring.
    #[must_use]
    pub fn with_ajax(mut self, ajax: AjaxConfig) -> Self {
        self.ajax = Some(ajax);
        self
    }

    /// The page's own URL, query string included.
    #[must_use]
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// The canonical page URL with no query, the base every generated
    /// URL is built on.
    #[must_use]
    pub fn canonical_url(&self) -> Url {
        let mut url = self.page_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Catalog price bounds.
    #[must_use]
    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }

    /// The category this page is scoped to, if it is a landing page.
    #[must_use]
    pub fn scope(&self) -> Option<CategoryId> {
        self.scope
    }

    /// Usable AJAX wiring, or `None` when the endpoint or nonce is
    /// missing and the engine must fall back to navigation.
    #[must_use]
    pub fn ajax(&self) -> Option<&AjaxConfig> {
        self.ajax.as_ref().filter(|a| !a.nonce.is_empty())
    }
}
