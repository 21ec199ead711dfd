#![forbid(unsafe_code)]

//! Staged/applied filter store.
//!
//! Two copies of [`FilterState`] live here. `applied` is what the current
//! product listing reflects; `staged` is what the sidebar controls have
//! edited but not yet submitted. Category checkboxes and the price slider
//! mutate *staged* and wait for an explicit apply; toggles, sort, page
//! size, and pagination bypass staging and apply immediately.
//!
//! # Invariants
//!
//! | Invariant | Maintained by |
//! |-----------|---------------|
//! | `page >= 1` on both layers | every mutation path |
//! | `price.min <= price.max` on both layers | [`FilterStore::stage_price`] |
//! | category ids exist in the taxonomy | [`FilterStore::stage_category`] |
//! | instant fields never diverge between layers | [`FilterStore::apply_instant`] mirrors |

use crate::category::{CategoryId, CategoryTree, Expansion};
use crate::state::{FilterKind, FilterState, InstantPatch, PriceBounds};

/// The staged/applied pair plus the caret overlay for the sidebar tree.
#[derive(Debug, Clone)]
pub struct FilterStore {
    applied: FilterState,
    staged: FilterState,
    bounds: PriceBounds,
    expansion: Expansion,
}

impl FilterStore {
    /// Create a store with both layers at the unfiltered default.
    #[must_use]
    pub fn new(bounds: PriceBounds) -> Self {
        let state = FilterState::defaults(bounds);
        Self {
            applied: state.clone(),
            staged: state,
            bounds,
            expansion: Expansion::new(),
        }
    }

    /// Seed both layers from an already-normalized state, e.g. one parsed
    /// from the landing URL.
    #[must_use]
    pub fn from_state(state: FilterState, bounds: PriceBounds) -> Self {
        Self {
            applied: state.clone(),
            staged: state,
            bounds,
            expansion: Expansion::new(),
        }
    }

    /// The state the current listing reflects.
    #[must_use]
    pub fn applied(&self) -> &FilterState {
        &self.applied
    }

    /// The state the sidebar controls show.
    #[must_use]
    pub fn staged(&self) -> &FilterState {
        &self.staged
    }

    /// Catalog price bounds.
    #[must_use]
    pub fn bounds(&self) -> PriceBounds {
        self.bounds
    }

    /// Whether staged edits differ from the applied state.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.staged != self.applied
    }

    // --- staged mutations -------------------------------------------------

    /// Stage a category checkbox change. Unknown ids are ignored.
    ///
    /// Returns whether the staged selection changed. Any change clears the
    /// manual caret override for the affected parent, so the derived
    /// expansion policy takes over.
    pub fn stage_category(&mut self, id: CategoryId, selected: bool, tree: &CategoryTree) -> bool {
        if !tree.contains(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(category = id.get(), "ignoring unknown category toggle");
            return false;
        }
        let changed = if selected {
            self.staged.categories.insert(id)
        } else {
            self.staged.categories.remove(&id)
        };
        if changed {
            let parent = tree.parent_of(id).unwrap_or(id);
            self.expansion.clear_manual(parent);
        }
        changed
    }

    /// Stage a price range. Values are clamped into bounds and reordered
    /// so `min <= max` always holds.
    pub fn stage_price(&mut self, min: u32, max: u32) {
        self.staged.price = crate::state::PriceSelection { min, max }.normalized(self.bounds);
    }

    /// Promote staged edits: page resets to 1 and the staged state becomes
    /// the applied state. Reports whether the applied state changed.
    pub fn commit_staged(&mut self) -> bool {
        self.staged.page = 1;
        let changed = self.applied != self.staged;
        self.applied = self.staged.clone();
        #[cfg(feature = "tracing")]
        tracing::trace!(
            changed,
            categories = self.applied.categories.len(),
            price_min = self.applied.price.min,
            price_max = self.applied.price.max,
            "staged filters committed"
        );
        changed
    }

    /// Discard staged edits, restoring the applied state.
    pub fn revert_staged(&mut self) {
        self.staged = self.applied.clone();
        self.expansion.clear();
    }

    // --- instant mutations ------------------------------------------------

    /// Apply a single-field change to both layers at once.
    ///
    /// Every patch except a page jump resets the page to 1; pending staged
    /// category or price edits are left untouched.
    pub fn apply_instant(&mut self, patch: InstantPatch) {
        match patch {
            InstantPatch::OnSale(v) => {
                self.applied.on_sale = v;
                self.staged.on_sale = v;
                self.reset_page();
            }
            InstantPatch::InStock(v) => {
                self.applied.in_stock = v;
                self.staged.in_stock = v;
                self.reset_page();
            }
            InstantPatch::Sort(order) => {
                self.applied.orderby = order;
                self.staged.orderby = order;
                self.reset_page();
            }
            InstantPatch::PerPage(size) => {
                self.applied.per_page = size;
                self.staged.per_page = size;
                self.reset_page();
            }
            InstantPatch::Page(n) => {
                let n = n.max(1);
                self.applied.page = n;
                self.staged.page = n;
            }
        }
    }

    /// Remove one active filter, as from an active-filter chip. Applies
    /// immediately to both layers and resets the page.
    ///
    /// Returns whether anything changed. `id` is required for
    /// [`FilterKind::Category`] and ignored otherwise.
    pub fn remove_filter(
        &mut self,
        kind: FilterKind,
        id: Option<CategoryId>,
        tree: &CategoryTree,
    ) -> bool {
        let changed = match kind {
            FilterKind::Category => match id {
                Some(id) => {
                    let removed = self.applied.categories.remove(&id);
                    let removed_staged = self.staged.categories.remove(&id);
                    if removed_staged {
                        let parent = tree.parent_of(id).unwrap_or(id);
                        self.expansion.clear_manual(parent);
                    }
                    removed || removed_staged
                }
                None => false,
            },
            FilterKind::Price => {
                let full = self.bounds.full_selection();
                let changed = self.applied.price != full || self.staged.price != full;
                self.applied.price = full;
                self.staged.price = full;
                changed
            }
            FilterKind::OnSale => {
                let changed = self.applied.on_sale || self.staged.on_sale;
                self.applied.on_sale = false;
                self.staged.on_sale = false;
                changed
            }
            FilterKind::InStock => {
                let changed = self.applied.in_stock || self.staged.in_stock;
                self.applied.in_stock = false;
                self.staged.in_stock = false;
                changed
            }
        };
        if changed {
            self.reset_page();
        }
        changed
    }

    /// Reset every filter on both layers. With a scope category the reset
    /// keeps that category selected, matching category landing pages that
    /// never show an empty scope.
    pub fn clear_all(&mut self, scope: Option<CategoryId>) {
        let mut state = FilterState::defaults(self.bounds);
        if let Some(id) = scope {
            state.categories.insert(id);
        }
        self.applied = state.clone();
        self.staged = state;
        self.expansion.clear();
    }

    /// Overwrite both layers with `state`, e.g. after a history `popstate`
    /// re-parse. The caller normalizes first.
    pub fn restore(&mut self, state: FilterState) {
        self.applied = state;
        self.revert_staged();
    }

    // --- expansion --------------------------------------------------------

    /// Whether `parent`'s child list is open in the sidebar, judged
    /// against the staged selection.
    #[must_use]
    pub fn is_expanded(&self, parent: CategoryId, tree: &CategoryTree) -> bool {
        tree.is_expanded(parent, &self.staged.categories, &self.expansion)
    }

    /// Record a caret click on `parent`, flipping its effective state.
    pub fn toggle_expansion(&mut self, parent: CategoryId, tree: &CategoryTree) {
        let open = self.is_expanded(parent, tree);
        self.expansion.set_manual(parent, !open);
    }

    fn reset_page(&mut self) {
        self.applied.page = 1;
        self.staged.page = 1;
    }
}
