#![forbid(unsafe_code)]

//! Query string codec for browser URLs.
//!
//! The address bar mirrors the applied filter state with the same
//! omission rules as the request payload, plus one more: fields at
//! their default (`orderby`, `per_page`, `paged`) are dropped entirely,
//! so an unfiltered listing has no query string at all. Categories are
//! comma-joined here, unlike the repeated `categories[]` form field,
//! because the server-rendered shop page reads them that way.
//!
//! Parsing is lenient by design. The query string is user-editable
//! input: unknown keys are skipped, malformed numbers fall back to
//! defaults, and unknown category ids are dropped during normalization.

use storefacet_core::category::CategoryTree;
use storefacet_core::state::{FilterState, PageSize, PriceBounds, SortOrder};
use url::Url;

/// Encode `state` as a query string, or `None` when every field is at
/// its default and the URL should carry no query at all.
#[must_use]
pub fn encode_query(state: &FilterState, bounds: PriceBounds) -> Option<String> {
    let mut enc = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;

    if !state.categories.is_empty() {
        let joined = state
            .categories
            .iter()
            .map(|id| id.get().to_string())
            .collect::<Vec<_>>()
            .join(",");
        enc.append_pair("categories", &joined);
        any = true;
    }
    if state.price.constrains_min(bounds) {
        enc.append_pair("min_price", &state.price.min.to_string());
        any = true;
    }
    if state.price.constrains_max(bounds) {
        enc.append_pair("max_price", &state.price.max.to_string());
        any = true;
    }
    if state.on_sale {
        enc.append_pair("on_sale", "1");
        any = true;
    }
    if state.in_stock {
        enc.append_pair("in_stock", "1");
        any = true;
    }
    if state.orderby != SortOrder::default() {
        enc.append_pair("orderby", state.orderby.as_str());
        any = true;
    }
    if state.per_page != PageSize::default() {
        enc.append_pair("per_page", &state.per_page.count().to_string());
        any = true;
    }
    if state.page > 1 {
        enc.append_pair("paged", &state.page.to_string());
        any = true;
    }

    any.then(|| enc.finish())
}

/// Parse a query string back into a normalized [`FilterState`].
///
/// Tolerates both `categories=12,15` and repeated `categories` keys.
#[must_use]
pub fn parse_query(query: &str, bounds: PriceBounds, tree: &CategoryTree) -> FilterState {
    let mut state = FilterState::defaults(bounds);

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "categories" | "categories[]" => {
                for part in value.split(',') {
                    if let Ok(raw) = part.trim().parse::<u32>() {
                        state.categories.insert(raw.into());
                    }
                }
            }
            "min_price" => {
                if let Ok(v) = value.parse::<u32>() {
                    state.price.min = v;
                }
            }
            "max_price" => {
                if let Ok(v) = value.parse::<u32>() {
                    state.price.max = v;
                }
            }
            "on_sale" => state.on_sale = value == "1",
            "in_stock" => state.in_stock = value == "1",
            "orderby" => state.orderby = SortOrder::parse(&value).unwrap_or_default(),
            "per_page" => {
                state.per_page = value
                    .parse::<u32>()
                    .ok()
                    .and_then(PageSize::from_count)
                    .unwrap_or_default();
            }
            "paged" => state.page = value.parse().unwrap_or(1),
            _ => {}
        }
    }

    state.normalize(bounds, tree);
    state
}

/// The full-page URL for `state`: the canonical shop URL with the
/// encoded query attached, or with no query when the state is default.
/// Used both for history replacement and for the redirect fallback, so
/// the two always agree byte for byte.
#[must_use]
pub fn page_url(base: &Url, state: &FilterState, bounds: PriceBounds) -> Url {
    let mut url = base.clone();
    url.set_query(encode_query(state, bounds).as_deref());
    url
}
