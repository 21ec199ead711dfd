#![forbid(unsafe_code)]

//! Scenario testing and replay for the shop filtering engine.
//!
//! - **Scripted host**: plays the browser's role against a
//!   [`ShopProgram`](storefacet_engine::program::ShopProgram), answering its
//!   fetches from a canned queue and recording every effect it was asked to
//!   perform.
//! - **Page model**: a small stand-in for the document that applies patches
//!   to named containers, tracks the overlay and the address bar, and skips
//!   containers marked absent.
//!
//! # Quick Start
//!
//! ```ignore
//! use storefacet_harness::{CannedFetch, ScriptedHost, demo_config, demo_tree};
//!
//! let mut host = ScriptedHost::new(demo_tree(), demo_config());
//! host.expect_fetch(CannedFetch::Success(results));
//! host.event(ShopEvent::ApplyClicked);
//! host.deliver();
//! assert_eq!(host.transcript().fetch_bodies().len(), 1);
//! ```

pub mod page;
pub mod script;

pub use page::PageModel;
pub use script::{CannedFetch, Effect, ScriptedHost, Transcript};

use storefacet_core::category::CategoryTree;
use storefacet_core::state::PriceBounds;
use storefacet_host::config::{AjaxConfig, ShopConfig};
use url::Url;

/// A small two-parent taxonomy used by the demo binary and scenario tests.
#[must_use]
pub fn demo_tree() -> CategoryTree {
    CategoryTree::new()
        .branch(7u32, [8u32, 9])
        .branch(20u32, [21u32, 22])
        .leaf(12u32)
        .leaf(30u32)
}

/// Page wiring matching [`demo_tree`], with a working AJAX endpoint.
#[must_use]
pub fn demo_config() -> ShopConfig {
    let page = Url::parse("https://shop.test/shop/").unwrap();
    let endpoint = Url::parse("https://shop.test/wp-admin/admin-ajax.php").unwrap();
    ShopConfig::new(page, PriceBounds::new(0, 500, 10))
        .with_ajax(AjaxConfig::new(endpoint, "demo-nonce"))
}
