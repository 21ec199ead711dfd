#![forbid(unsafe_code)]

//! Scenario replay binary.
//!
//! Replays a scripted shopping session through the engine and prints the
//! resulting effect transcript as JSON. Without arguments a built-in demo
//! scenario runs; with a path argument the script is read from that file.
//!
//! # Running
//!
//! ```sh
//! cargo run -p storefacet-harness
//! cargo run -p storefacet-harness -- script.json
//! ```
//!
//! # Script format
//!
//! A JSON array of steps, each an object with a single key:
//!
//! ```json
//! [
//!   {"toggle": {"id": 12, "selected": true}},
//!   {"apply": {}},
//!   {"respond": "ok"},
//!   {"sort": "price"},
//!   {"respond": "transport"}
//! ]
//! ```
//!
//! Steps: `toggle`, `expand`, `drag`, `track_click`, `apply`, `clear_all`,
//! `on_sale`, `in_stock`, `sort`, `per_page`, `page`, `remove_chip`,
//! `popstate`, `search`, `advance_ms`, `respond`, `respond_search`.

use std::io;

use serde_json::{Value, json};
use storefacet_core::category::CategoryId;
use storefacet_core::slider::{Handle, TrackRect};
use storefacet_core::state::{FilterKind, PageSize, SortOrder};
use storefacet_harness::{CannedFetch, ScriptedHost, demo_config, demo_tree};
use storefacet_host::event::ShopEvent;
use storefacet_wire::envelope::{ActiveFilter, FilterResults};
use storefacet_wire::search::{CategoryHit, ProductHit, SearchResults};

/// Track extent assumed for scripted pointer positions.
const DEMO_TRACK: TrackRect = TrackRect::new(0.0, 500.0);

fn sample_results(current_page: u32) -> FilterResults {
    FilterResults {
        products: "<ul class=\"products\"><li>Arc lamp</li></ul>".to_owned(),
        pagination: "<nav class=\"pagination\"></nav>".to_owned(),
        result_count: "<p>Showing 1 of 1</p>".to_owned(),
        total: 1,
        total_pages: 1,
        current_page,
        active_filters: vec![ActiveFilter {
            kind: FilterKind::Category,
            label: "Lamps".to_owned(),
            id: Some(CategoryId::new(12)),
        }],
    }
}

fn sample_search() -> SearchResults {
    SearchResults {
        categories: vec![CategoryHit {
            id: 7,
            name: "Lighting".to_owned(),
            url: "https://shop.test/category/lighting/".to_owned(),
            count: 14,
        }],
        products: vec![ProductHit {
            id: 401,
            title: "Arc lamp".to_owned(),
            url: "https://shop.test/p/arc-lamp/".to_owned(),
            price: Some("\u{20ac}120".to_owned()),
            thumbnail: None,
        }],
        query: "lamp".to_owned(),
    }
}

fn parse_id(value: &Value, field: &str) -> Result<CategoryId, String> {
    value[field]
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .map(CategoryId::new)
        .ok_or_else(|| format!("'{field}' must be a category id"))
}

fn run_step(host: &mut ScriptedHost, step: &Value) -> Result<(), String> {
    let object = step.as_object().ok_or("step is not an object")?;
    let (key, value) = object.iter().next().ok_or("empty step")?;
    match key.as_str() {
        "toggle" => {
            let id = parse_id(value, "id")?;
            let selected = value["selected"].as_bool().unwrap_or(true);
            host.event(ShopEvent::CategoryToggled { id, selected });
        }
        "expand" => {
            let parent = value
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .map(CategoryId::new)
                .ok_or("'expand' must be a category id")?;
            host.event(ShopEvent::ExpansionToggled { parent });
        }
        "drag" => {
            let handle = match value["handle"].as_str() {
                Some("high") => Handle::High,
                _ => Handle::Low,
            };
            let x = value["x"].as_f64().ok_or("'drag.x' must be a number")?;
            host.event(ShopEvent::SliderDragged {
                handle,
                x,
                track: DEMO_TRACK,
            });
        }
        "track_click" => {
            let x = value["x"].as_f64().ok_or("'track_click.x' must be a number")?;
            host.event(ShopEvent::TrackClicked { x, track: DEMO_TRACK });
        }
        "apply" => host.event(ShopEvent::ApplyClicked),
        "clear_all" => host.event(ShopEvent::ClearAllClicked),
        "on_sale" => host.event(ShopEvent::OnSaleToggled(value.as_bool().unwrap_or(true))),
        "in_stock" => host.event(ShopEvent::InStockToggled(value.as_bool().unwrap_or(true))),
        "sort" => {
            let order = value
                .as_str()
                .and_then(SortOrder::parse)
                .ok_or("'sort' must be a known order")?;
            host.event(ShopEvent::SortChanged(order));
        }
        "per_page" => {
            let size = value
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .and_then(PageSize::from_count)
                .ok_or("'per_page' must be one of 12, 24, 48, 96")?;
            host.event(ShopEvent::PerPageChanged(size));
        }
        "page" => {
            let page = value
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .ok_or("'page' must be a page number")?;
            host.event(ShopEvent::PageRequested(page));
        }
        "remove_chip" => {
            let kind = value["kind"]
                .as_str()
                .and_then(FilterKind::parse)
                .ok_or("'remove_chip.kind' must be a filter kind")?;
            let id = value["id"]
                .as_u64()
                .and_then(|raw| u32::try_from(raw).ok())
                .map(CategoryId::new);
            host.event(ShopEvent::ChipRemoved { kind, id });
        }
        "popstate" => {
            let query = value.as_str().ok_or("'popstate' must be a query string")?;
            host.event(ShopEvent::HistoryPopped {
                query: query.to_owned(),
            });
        }
        "search" => {
            let term = value.as_str().ok_or("'search' must be a string")?;
            host.event(ShopEvent::SearchInput {
                term: term.to_owned(),
            });
        }
        "advance_ms" => {
            let ms = value.as_u64().ok_or("'advance_ms' must be milliseconds")?;
            host.advance_ms(ms);
        }
        "respond" => {
            queue_response(host, value, false)?;
            if !host.deliver() {
                return Err("no fetch outstanding".to_owned());
            }
        }
        "respond_search" => {
            queue_response(host, value, true)?;
            if !host.deliver_search() {
                return Err("no search fetch outstanding".to_owned());
            }
        }
        other => return Err(format!("unknown step '{other}'")),
    }
    Ok(())
}

fn queue_response(host: &mut ScriptedHost, value: &Value, search: bool) -> Result<(), String> {
    let canned = match value {
        Value::String(kind) => match kind.as_str() {
            "ok" if search => CannedFetch::SearchSuccess(sample_search()),
            "ok" => CannedFetch::Success(sample_results(1)),
            "rejected" => CannedFetch::Rejected {
                message: "nonce check failed".to_owned(),
            },
            "transport" => CannedFetch::Transport("scripted network failure".to_owned()),
            other => return Err(format!("unknown response kind '{other}'")),
        },
        Value::Object(_) => {
            let status = value["status"]
                .as_u64()
                .and_then(|raw| u16::try_from(raw).ok())
                .ok_or("'respond.status' must be an HTTP status")?;
            let body = value["body"].as_str().unwrap_or("").to_owned();
            CannedFetch::Failure { status, body }
        }
        _ => return Err("'respond' must be a string or object".to_owned()),
    };
    if search {
        host.expect_search(canned);
    } else {
        host.expect_fetch(canned);
    }
    Ok(())
}

fn demo_script() -> Vec<Value> {
    vec![
        json!({"toggle": {"id": 12, "selected": true}}),
        json!({"drag": {"handle": "high", "x": 300.0}}),
        json!({"apply": {}}),
        json!({"respond": "ok"}),
        json!({"sort": "price"}),
        json!({"respond": "ok"}),
        json!({"search": "lamp"}),
        json!({"advance_ms": 250}),
        json!({"respond_search": "ok"}),
        json!({"page": 2}),
        json!({"respond": "transport"}),
    ]
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let steps: Vec<Value> = match args.first() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Array(steps)) => steps,
                Ok(_) => {
                    eprintln!("script must be a JSON array of steps");
                    std::process::exit(2);
                }
                Err(err) => {
                    eprintln!("script parse failed: {err}");
                    std::process::exit(2);
                }
            }
        }
        None => demo_script(),
    };

    let mut host = ScriptedHost::new(demo_tree(), demo_config());
    for (idx, step) in steps.iter().enumerate() {
        if let Err(err) = run_step(&mut host, step) {
            eprintln!("step {idx}: {err}");
            std::process::exit(2);
        }
    }

    println!("{:#}", host.transcript().to_json());
    Ok(())
}
