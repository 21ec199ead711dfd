//! Property-based invariant tests for the shop controller.
//!
//! The controller is driven as a black box with arbitrary event sequences
//! while a scripted host answers its fetches. The properties:
//!
//! 1. At most one filter fetch is ever unanswered.
//! 2. Every dispatched fetch batch shows the loading overlay.
//! 3. At most one redirect is ever emitted, and nothing follows it.
//! 4. Every history entry equals the URL codec's rendering of the applied
//!    state at that moment.
//! 5. Fetch bodies always carry the non-negotiable fields.

use proptest::prelude::*;
use storefacet_core::category::{CategoryId, CategoryTree};
use storefacet_core::slider::{Handle, TrackRect};
use storefacet_core::state::{FilterKind, PageSize, PriceBounds, SortOrder};
use storefacet_engine::controller::ShopController;
use storefacet_host::config::{AjaxConfig, ShopConfig};
use storefacet_host::event::{FetchOutcome, RequestToken, ShopEvent};
use storefacet_host::output::Overlay;
use storefacet_wire::envelope::{self, FilterResults};
use storefacet_wire::query::page_url;
use url::Url;

// ── Helpers ─────────────────────────────────────────────────────────────

const KNOWN_IDS: [u32; 6] = [7, 8, 9, 12, 21, 30];

fn sample_tree() -> CategoryTree {
    CategoryTree::new()
        .branch(7u32, [8u32, 9])
        .branch(20u32, [21u32])
        .leaf(12u32)
        .leaf(30u32)
}

fn sample_config(scoped: bool) -> ShopConfig {
    let page = Url::parse("https://shop.test/shop/").unwrap();
    let ajax = AjaxConfig::new(
        Url::parse("https://shop.test/wp-admin/admin-ajax.php").unwrap(),
        "n0nce",
    );
    let config = ShopConfig::new(page, PriceBounds::new(0, 500, 10)).with_ajax(ajax);
    if scoped {
        config.with_scope(CategoryId::new(7))
    } else {
        config
    }
}

/// One scripted step: either a user interaction or the host answering the
/// oldest unanswered fetch.
#[derive(Debug, Clone)]
enum Action {
    Toggle(u32, bool),
    Apply,
    ClearAll,
    OnSale(bool),
    InStock(bool),
    Sort(SortOrder),
    PerPage(PageSize),
    Page(u32),
    RemoveChip(FilterKind, Option<u32>),
    DragLow(f64),
    DragHigh(f64),
    TrackClick(f64),
    Popstate(String),
    AnswerOk,
    AnswerError,
    AnswerStale,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..KNOWN_IDS.len(), any::<bool>())
            .prop_map(|(i, on)| Action::Toggle(KNOWN_IDS[i], on)),
        Just(Action::Apply),
        Just(Action::ClearAll),
        any::<bool>().prop_map(Action::OnSale),
        any::<bool>().prop_map(Action::InStock),
        prop_oneof![
            Just(SortOrder::MenuOrder),
            Just(SortOrder::Popularity),
            Just(SortOrder::PriceAsc),
            Just(SortOrder::PriceDesc),
        ]
        .prop_map(Action::Sort),
        prop_oneof![
            Just(PageSize::P12),
            Just(PageSize::P24),
            Just(PageSize::P48),
            Just(PageSize::P96),
        ]
        .prop_map(Action::PerPage),
        (0u32..40).prop_map(Action::Page),
        prop_oneof![
            Just(Action::RemoveChip(FilterKind::Price, None)),
            Just(Action::RemoveChip(FilterKind::OnSale, None)),
            Just(Action::RemoveChip(FilterKind::Category, Some(12))),
        ],
        (0.0f64..600.0).prop_map(Action::DragLow),
        (0.0f64..600.0).prop_map(Action::DragHigh),
        (0.0f64..600.0).prop_map(Action::TrackClick),
        prop_oneof![
            Just(Action::Popstate(String::new())),
            Just(Action::Popstate("categories=12,30&paged=2".to_owned())),
            Just(Action::Popstate("orderby=price&on_sale=1".to_owned())),
        ],
        Just(Action::AnswerOk),
        Just(Action::AnswerOk),
        Just(Action::AnswerError),
        Just(Action::AnswerStale),
    ]
}

fn action_seq_strategy() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(action_strategy(), 0..60)
}

fn ok_body() -> String {
    envelope::encode(&FilterResults {
        products: "<ul></ul>".to_owned(),
        pagination: String::new(),
        result_count: "<p>n</p>".to_owned(),
        total: 9,
        total_pages: 1,
        current_page: 1,
        active_filters: Vec::new(),
    })
    .unwrap()
}

fn to_event(action: &Action, pending: Option<RequestToken>) -> ShopEvent {
    let track = TrackRect::new(0.0, 500.0);
    match action {
        Action::Toggle(id, on) => ShopEvent::CategoryToggled {
            id: CategoryId::new(*id),
            selected: *on,
        },
        Action::Apply => ShopEvent::ApplyClicked,
        Action::ClearAll => ShopEvent::ClearAllClicked,
        Action::OnSale(on) => ShopEvent::OnSaleToggled(*on),
        Action::InStock(on) => ShopEvent::InStockToggled(*on),
        Action::Sort(order) => ShopEvent::SortChanged(*order),
        Action::PerPage(size) => ShopEvent::PerPageChanged(*size),
        Action::Page(n) => ShopEvent::PageRequested(*n),
        Action::RemoveChip(kind, id) => ShopEvent::ChipRemoved {
            kind: *kind,
            id: id.map(CategoryId::new),
        },
        Action::DragLow(x) => ShopEvent::SliderDragged {
            handle: Handle::Low,
            x: *x,
            track,
        },
        Action::DragHigh(x) => ShopEvent::SliderDragged {
            handle: Handle::High,
            x: *x,
            track,
        },
        Action::TrackClick(x) => ShopEvent::TrackClicked { x: *x, track },
        Action::Popstate(query) => ShopEvent::HistoryPopped {
            query: query.clone(),
        },
        Action::AnswerOk => ShopEvent::FetchCompleted {
            token: pending.unwrap_or(RequestToken::new(u64::MAX)),
            outcome: FetchOutcome::Response {
                status: 200,
                body: ok_body(),
            },
        },
        Action::AnswerError => ShopEvent::FetchCompleted {
            token: pending.unwrap_or(RequestToken::new(u64::MAX)),
            outcome: FetchOutcome::TransportError {
                message: "scripted failure".to_owned(),
            },
        },
        Action::AnswerStale => ShopEvent::FetchCompleted {
            token: RequestToken::new(u64::MAX),
            outcome: FetchOutcome::Response {
                status: 200,
                body: ok_body(),
            },
        },
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Fetch, overlay, and redirect discipline under arbitrary sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fetch_and_redirect_discipline(
        actions in action_seq_strategy(),
        scoped in any::<bool>(),
    ) {
        let mut c = ShopController::new(sample_tree(), sample_config(scoped));
        let mut pending: Option<RequestToken> = None;
        let mut redirected = false;

        for action in &actions {
            let event = to_event(action, pending);
            c.handle(event);
            let out = c.take_outputs();

            if redirected {
                prop_assert!(
                    out.fetches.is_empty()
                        && out.patches.is_empty()
                        && out.history.is_empty()
                        && out.redirect.is_none(),
                    "output after redirect from {action:?}"
                );
                continue;
            }

            prop_assert!(out.fetches.len() <= 1, "batched fetches from {action:?}");
            if let Some(fetch) = out.fetches.first() {
                prop_assert!(pending.is_none(), "fetch while one pending from {action:?}");
                prop_assert_eq!(out.overlay, Some(Overlay::Show));
                pending = Some(fetch.token);
            }
            // Answers are always addressed to the pending token, so a
            // matching completion settles it either way.
            if matches!(action, Action::AnswerOk | Action::AnswerError) && pending.is_some() {
                pending = None;
            }
            if out.redirect.is_some() {
                redirected = true;
                pending = None;
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. History entries agree with the URL codec
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_matches_applied_state(actions in action_seq_strategy()) {
        let config = sample_config(false);
        let canonical = config.canonical_url();
        let bounds = config.bounds();
        let mut c = ShopController::new(sample_tree(), config);
        let mut pending: Option<RequestToken> = None;

        for action in &actions {
            c.handle(to_event(action, pending));
            let out = c.take_outputs();
            if let Some(fetch) = out.fetches.first() {
                pending = Some(fetch.token);
            }
            if matches!(action, Action::AnswerOk | Action::AnswerError) {
                pending = None;
            }
            for url in &out.history {
                let expected = page_url(&canonical, c.store().applied(), bounds);
                prop_assert_eq!(url.as_str(), expected.as_str());
            }
            if out.redirect.is_some() {
                break;
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Fetch bodies carry the non-negotiable fields
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_fetch_body_is_complete(actions in action_seq_strategy()) {
        let mut c = ShopController::new(sample_tree(), sample_config(false));
        let mut pending: Option<RequestToken> = None;

        for action in &actions {
            c.handle(to_event(action, pending));
            let out = c.take_outputs();
            if let Some(fetch) = out.fetches.first() {
                pending = Some(fetch.token);
                prop_assert!(fetch.body.contains("action=filter_products"));
                prop_assert!(fetch.body.contains("nonce=n0nce"));
                prop_assert!(fetch.body.contains("orderby="));
                prop_assert!(fetch.body.contains("per_page="));
                prop_assert!(fetch.body.contains("paged="));
            }
            if matches!(action, Action::AnswerOk | Action::AnswerError) {
                pending = None;
            }
            if out.redirect.is_some() {
                break;
            }
        }
    }
}
