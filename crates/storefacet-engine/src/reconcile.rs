#![forbid(unsafe_code)]

//! Turning a decoded filter response into container patches.
//!
//! Three of the four shop containers are replaced verbatim with
//! server-rendered markup. The active-filter chips arrive as structured
//! data instead and are rendered here, so chip labels pass through one
//! escaping point and the remove buttons carry machine-readable
//! attributes the host's re-bound handlers can act on.

use storefacet_host::output::{ContainerId, FragmentPatch};
use storefacet_wire::envelope::{ActiveFilter, FilterResults};

/// Build the full patch set for one reconciled response, in the order the
/// containers appear on the page.
#[must_use]
pub fn results_patches(results: &FilterResults) -> Vec<FragmentPatch> {
    vec![
        FragmentPatch {
            container: ContainerId::ProductsGrid,
            html: results.products.clone(),
        },
        FragmentPatch {
            container: ContainerId::ResultCount,
            html: results.result_count.clone(),
        },
        FragmentPatch {
            container: ContainerId::Pagination,
            html: results.pagination.clone(),
        },
        FragmentPatch {
            container: ContainerId::ActiveFilters,
            html: chips_markup(&results.active_filters),
        },
    ]
}

/// Render the active-filter chip row.
///
/// Each chip is a removal button tagged with `data-filter-type` and, for
/// category chips, `data-filter-id`. A non-empty row ends with the
/// clear-all control. No filters means an empty container.
#[must_use]
pub fn chips_markup(filters: &[ActiveFilter]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    for filter in filters {
        html.push_str("<button class=\"filter-chip\" data-filter-type=\"");
        html.push_str(filter.kind.as_str());
        html.push('"');
        if let Some(id) = filter.id {
            html.push_str(" data-filter-id=\"");
            html.push_str(&id.get().to_string());
            html.push('"');
        }
        html.push('>');
        push_escaped(&mut html, &filter.label);
        html.push_str("<span class=\"filter-chip-remove\" aria-hidden=\"true\">\u{d7}</span>");
        html.push_str("</button>");
    }
    html.push_str("<button class=\"filter-chip filter-chip-clear\">Clear all</button>");
    html
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
