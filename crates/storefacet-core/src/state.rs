#![forbid(unsafe_code)]

//! Filter state records and the small enums they are built from.
//!
//! `FilterState` is a plain value: cheap to clone, ordered collections
//! throughout, equality meaning "same query". Invariants (page at least
//! 1, ordered price range, known category ids) are restored by
//! [`FilterState::normalize`] after any untrusted input such as a parsed
//! URL.

use crate::category::{CategoryId, CategoryTree};
use std::collections::BTreeSet;

/// Product sort order, named on the wire as WooCommerce names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    /// Store owner's curated order (`menu_order`, the default).
    #[default]
    MenuOrder,
    /// Best selling first (`popularity`).
    Popularity,
    /// Highest rated first (`rating`).
    Rating,
    /// Most recently added first (`date`).
    Latest,
    /// Cheapest first (`price`).
    PriceAsc,
    /// Most expensive first (`price-desc`).
    PriceDesc,
}

impl SortOrder {
    /// All orders, in the order the sort dropdown lists them.
    pub const ALL: [SortOrder; 6] = [
        SortOrder::MenuOrder,
        SortOrder::Popularity,
        SortOrder::Rating,
        SortOrder::Latest,
        SortOrder::PriceAsc,
        SortOrder::PriceDesc,
    ];

    /// The wire name sent as `orderby`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::MenuOrder => "menu_order",
            SortOrder::Popularity => "popularity",
            SortOrder::Rating => "rating",
            SortOrder::Latest => "date",
            SortOrder::PriceAsc => "price",
            SortOrder::PriceDesc => "price-desc",
        }
    }

    /// Parse a wire name. Unknown names yield `None`; callers that want
    /// lenient behavior chain `.unwrap_or_default()`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "menu_order" => Some(SortOrder::MenuOrder),
            "popularity" => Some(SortOrder::Popularity),
            "rating" => Some(SortOrder::Rating),
            "date" => Some(SortOrder::Latest),
            "price" => Some(SortOrder::PriceAsc),
            "price-desc" => Some(SortOrder::PriceDesc),
            _ => None,
        }
    }
}

/// Products shown per page. The storefront offers exactly these counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    /// 12 per page (the default).
    #[default]
    P12,
    /// 24 per page.
    P24,
    /// 48 per page.
    P48,
    /// 96 per page.
    P96,
}

impl PageSize {
    /// All sizes, smallest first.
    pub const ALL: [PageSize; 4] = [PageSize::P12, PageSize::P24, PageSize::P48, PageSize::P96];

    /// The product count for this size.
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            PageSize::P12 => 12,
            PageSize::P24 => 24,
            PageSize::P48 => 48,
            PageSize::P96 => 96,
        }
    }

    /// Exact-match lookup. Anything other than 12/24/48/96 yields `None`.
    #[must_use]
    pub const fn from_count(n: u32) -> Option<Self> {
        match n {
            12 => Some(PageSize::P12),
            24 => Some(PageSize::P24),
            48 => Some(PageSize::P48),
            96 => Some(PageSize::P96),
            _ => None,
        }
    }
}

/// Catalog-wide price range and slider step, fixed at page load.
///
/// Construction sanitizes rather than errors: a zero step becomes 1,
/// reversed bounds are swapped, and a span narrower than one step is
/// widened, moving the floor down when the ceiling has no headroom, so
/// a valid selection always exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceBounds {
    floor: u32,
    ceil: u32,
    step: u32,
}

impl PriceBounds {
    /// Create sanitized bounds.
    #[must_use]
    pub fn new(floor: u32, ceil: u32, step: u32) -> Self {
        let step = step.max(1);
        let (floor, ceil) = if floor <= ceil {
            (floor, ceil)
        } else {
            (ceil, floor)
        };
        // One full step of room must exist above the floor, even with a
        // ceiling at the top of the u32 range.
        let floor = floor.min(u32::MAX - step);
        let ceil = ceil.max(floor.saturating_add(step));
        Self { floor, ceil, step }
    }

    /// Lowest selectable price.
    #[must_use]
    pub const fn floor(self) -> u32 {
        self.floor
    }

    /// Highest selectable price.
    #[must_use]
    pub const fn ceil(self) -> u32 {
        self.ceil
    }

    /// Slider step granularity, at least 1.
    #[must_use]
    pub const fn step(self) -> u32 {
        self.step
    }

    /// Clamp `value` into `[floor, ceil]`.
    #[must_use]
    pub fn clamp(self, value: u32) -> u32 {
        value.clamp(self.floor, self.ceil)
    }

    /// Round `value` to the nearest step multiple above the floor, then
    /// clamp back into range.
    #[must_use]
    pub fn snap(self, value: u32) -> u32 {
        let value = self.clamp(value);
        let offset = value - self.floor;
        let snapped = offset.saturating_add(self.step / 2) / self.step * self.step;
        self.clamp(self.floor.saturating_add(snapped))
    }

    /// The unconstrained selection covering the whole range.
    #[must_use]
    pub fn full_selection(self) -> PriceSelection {
        PriceSelection {
            min: self.floor,
            max: self.ceil,
        }
    }
}

/// The currently selected price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceSelection {
    /// Lower bound, inclusive.
    pub min: u32,
    /// Upper bound, inclusive.
    pub max: u32,
}

impl PriceSelection {
    /// Whether the selection covers the whole catalog range.
    #[must_use]
    pub fn is_full(self, bounds: PriceBounds) -> bool {
        self.min <= bounds.floor() && self.max >= bounds.ceil()
    }

    /// Whether the lower bound actually constrains anything.
    #[must_use]
    pub fn constrains_min(self, bounds: PriceBounds) -> bool {
        self.min > bounds.floor()
    }

    /// Whether the upper bound actually constrains anything.
    #[must_use]
    pub fn constrains_max(self, bounds: PriceBounds) -> bool {
        self.max < bounds.ceil()
    }

    /// Clamp into `bounds` and restore `min <= max` by swapping.
    #[must_use]
    pub fn normalized(self, bounds: PriceBounds) -> Self {
        let min = bounds.clamp(self.min);
        let max = bounds.clamp(self.max);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

/// Which family of filter an active-filter chip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterKind {
    /// A category checkbox.
    Category,
    /// The price range slider.
    Price,
    /// The on-sale toggle.
    OnSale,
    /// The in-stock toggle.
    InStock,
}

impl FilterKind {
    /// The wire name used in active-filter chips.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterKind::Category => "category",
            FilterKind::Price => "price",
            FilterKind::OnSale => "on_sale",
            FilterKind::InStock => "in_stock",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "category" => Some(FilterKind::Category),
            "price" => Some(FilterKind::Price),
            "on_sale" => Some(FilterKind::OnSale),
            "in_stock" => Some(FilterKind::InStock),
            _ => None,
        }
    }
}

/// A single-field change that bypasses staging and applies immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantPatch {
    /// Toggle the on-sale filter.
    OnSale(bool),
    /// Toggle the in-stock filter.
    InStock(bool),
    /// Change the sort order.
    Sort(SortOrder),
    /// Change the page size.
    PerPage(PageSize),
    /// Jump to a page (1-based; 0 is treated as 1).
    Page(u32),
}

/// The complete set of filters describing one product listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    /// Selected category ids. Set semantics: no duplicates, stable order.
    pub categories: BTreeSet<CategoryId>,
    /// Selected price range.
    pub price: PriceSelection,
    /// Only show discounted products.
    pub on_sale: bool,
    /// Only show purchasable products.
    pub in_stock: bool,
    /// Sort order.
    pub orderby: SortOrder,
    /// Products per page.
    pub per_page: PageSize,
    /// Current page, 1-based.
    pub page: u32,
}

impl FilterState {
    /// The unfiltered first page over `bounds`.
    #[must_use]
    pub fn defaults(bounds: PriceBounds) -> Self {
        Self {
            categories: BTreeSet::new(),
            price: bounds.full_selection(),
            on_sale: false,
            in_stock: false,
            orderby: SortOrder::default(),
            per_page: PageSize::default(),
            page: 1,
        }
    }

    /// Whether `id` is in the category selection.
    #[must_use]
    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.categories.contains(&id)
    }

    /// Whether every field matches the unfiltered default.
    #[must_use]
    pub fn is_default(&self, bounds: PriceBounds) -> bool {
        self.categories.is_empty()
            && self.price.is_full(bounds)
            && !self.on_sale
            && !self.in_stock
            && self.orderby == SortOrder::default()
            && self.per_page == PageSize::default()
            && self.page <= 1
    }

    /// Restore invariants after untrusted input: page at least 1, price
    /// clamped and ordered, unknown category ids dropped.
    pub fn normalize(&mut self, bounds: PriceBounds, tree: &CategoryTree) {
        self.page = self.page.max(1);
        self.price = self.price.normalized(bounds);
        tree.retain_known(&mut self.categories);
    }
}
