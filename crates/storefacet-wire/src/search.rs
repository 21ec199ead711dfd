#![forbid(unsafe_code)]

//! Types for the REST search endpoint.
//!
//! `GET /wp-json/sega/v1/search?s=<term>&per_page=<n>`. The endpoint
//! refuses terms shorter than two characters, so the query constructor
//! refuses them too and the popup never fires a request that could only
//! fail. `per_page` is clamped to the server's 1..=20 window up front.

use serde::{Deserialize, Serialize};
use url::Url;

/// REST route of the search endpoint, relative to the site root.
pub const SEARCH_ROUTE: &str = "/wp-json/sega/v1/search";

/// Minimum search term length, in characters.
pub const MIN_TERM_CHARS: usize = 2;

/// Largest result count the endpoint will honor.
pub const MAX_PER_PAGE: u32 = 20;

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    per_page: u32,
}

impl SearchQuery {
    /// Validate a raw term. Returns `None` when the trimmed term is
    /// shorter than [`MIN_TERM_CHARS`]; clamps `per_page` into 1..=20.
    #[must_use]
    pub fn new(term: &str, per_page: u32) -> Option<Self> {
        let term = term.trim();
        if term.chars().count() < MIN_TERM_CHARS {
            return None;
        }
        Some(Self {
            term: term.to_owned(),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        })
    }

    /// The trimmed search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The clamped result count.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The request URL against `base` (the site root).
    #[must_use]
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_path(SEARCH_ROUTE);
        url.query_pairs_mut()
            .clear()
            .append_pair("s", &self.term)
            .append_pair("per_page", &self.per_page.to_string());
        url
    }
}

/// A matching product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductHit {
    /// Product post id.
    pub id: u64,
    /// Product title.
    pub title: String,
    /// Permalink.
    pub url: String,
    /// Rendered price markup, absent for price-on-request products.
    #[serde(default)]
    pub price: Option<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A matching category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHit {
    /// Term id.
    pub id: u32,
    /// Category name.
    pub name: String,
    /// Archive permalink.
    pub url: String,
    /// Product count inside the category.
    #[serde(default)]
    pub count: u32,
}

/// The search endpoint's response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching categories, best first.
    #[serde(default)]
    pub categories: Vec<CategoryHit>,
    /// Matching products, best first.
    #[serde(default)]
    pub products: Vec<ProductHit>,
    /// The term the server actually searched for.
    #[serde(default)]
    pub query: String,
}

impl SearchResults {
    /// Whether neither categories nor products matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty()
    }
}

/// Decode a search response body.
pub fn decode(body: &str) -> Result<SearchResults, serde_json::Error> {
    serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_terms_are_refused() {
        assert!(SearchQuery::new("", 10).is_none());
        assert!(SearchQuery::new("a", 10).is_none());
        assert!(SearchQuery::new("  a  ", 10).is_none());
        assert!(SearchQuery::new("ab", 10).is_some());
    }

    #[test]
    fn term_length_counts_characters_not_bytes() {
        // Two characters, four bytes.
        assert!(SearchQuery::new("éé", 10).is_some());
        assert!(SearchQuery::new("é", 10).is_none());
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(SearchQuery::new("ab", 0).unwrap().per_page(), 1);
        assert_eq!(SearchQuery::new("ab", 20).unwrap().per_page(), 20);
        assert_eq!(SearchQuery::new("ab", 500).unwrap().per_page(), 20);
    }

    #[test]
    fn url_carries_term_and_per_page() {
        let base = Url::parse("https://shop.example/").unwrap();
        let query = SearchQuery::new("  lamp shade ", 8).unwrap();
        let url = query.url(&base);
        assert_eq!(
            url.as_str(),
            "https://shop.example/wp-json/sega/v1/search?s=lamp+shade&per_page=8"
        );
    }

    #[test]
    fn url_ignores_base_query_and_path() {
        let base = Url::parse("https://shop.example/shop/?paged=3").unwrap();
        let url = SearchQuery::new("ab", 5).unwrap().url(&base);
        assert_eq!(
            url.as_str(),
            "https://shop.example/wp-json/sega/v1/search?s=ab&per_page=5"
        );
    }

    #[test]
    fn decodes_results() {
        let body = r#"{
            "categories": [{"id": 7, "name": "Lamps", "url": "/cat/lamps", "count": 14}],
            "products": [
                {"id": 101, "title": "Arc Lamp", "url": "/p/arc", "price": "<span>49</span>"},
                {"id": 102, "title": "Shade", "url": "/p/shade"}
            ],
            "query": "lamp"
        }"#;
        let results = decode(body).unwrap();
        assert_eq!(results.categories.len(), 1);
        assert_eq!(results.products.len(), 2);
        assert_eq!(results.products[1].price, None);
        assert_eq!(results.query, "lamp");
        assert!(!results.is_empty());
    }

    #[test]
    fn decodes_empty_object() {
        let results = decode("{}").unwrap();
        assert!(results.is_empty());
        assert_eq!(results.query, "");
    }

    #[test]
    fn malformed_body_errors() {
        assert!(decode("<html></html>").is_err());
    }
}
