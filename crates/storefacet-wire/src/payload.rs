#![forbid(unsafe_code)]

//! Form-encoded payload for the `filter_products` AJAX action.
//!
//! Omission carries meaning: `min_price`/`max_price` appear only when
//! they differ from the catalog bounds (absence means "no constraint",
//! not zero), and `on_sale`/`in_stock` appear only when set. The sort,
//! page size, and page fields are always present.

use storefacet_core::state::{FilterState, PriceBounds};

/// One outgoing `filter_products` request body.
///
/// Pairs are kept in the order the endpoint's handler reads them:
/// `action`, `nonce`, `categories[]`, the conditional filters, then
/// `orderby`, `per_page`, `paged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pairs: Vec<(String, String)>,
}

impl FilterRequest {
    /// Serialize `state` into a request body for the given nonce.
    #[must_use]
    pub fn new(state: &FilterState, bounds: PriceBounds, nonce: &str) -> Self {
        let mut pairs = Vec::with_capacity(8 + state.categories.len());
        pairs.push(("action".into(), "filter_products".into()));
        pairs.push(("nonce".into(), nonce.into()));

        for id in &state.categories {
            pairs.push(("categories[]".into(), id.get().to_string()));
        }
        if state.price.constrains_min(bounds) {
            pairs.push(("min_price".into(), state.price.min.to_string()));
        }
        if state.price.constrains_max(bounds) {
            pairs.push(("max_price".into(), state.price.max.to_string()));
        }
        if state.on_sale {
            pairs.push(("on_sale".into(), "1".into()));
        }
        if state.in_stock {
            pairs.push(("in_stock".into(), "1".into()));
        }

        pairs.push(("orderby".into(), state.orderby.as_str().into()));
        pairs.push(("per_page".into(), state.per_page.count().to_string()));
        pairs.push(("paged".into(), state.page.max(1).to_string()));

        Self { pairs }
    }

    /// The key/value pairs in emission order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether a key is present at all.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// First value for `key`, if present.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order. Used for `categories[]`.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut enc = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            enc.append_pair(k, v);
        }
        enc.finish()
    }
}
