#![forbid(unsafe_code)]

//! Category taxonomy: a flat two-level tree with selection-derived expansion.
//!
//! The sidebar shows top-level categories in display order; a top-level
//! entry may carry an ordered list of child categories. Whether a parent's
//! child list is open is *derived* from the current selection, with a
//! manual caret override that only matters while the parent subtree is
//! fully unselected.
//!
//! # Example
//!
//! ```
//! use storefacet_core::category::{CategoryId, CategoryTree};
//!
//! let tree = CategoryTree::new()
//!     .branch(7, [8, 9])
//!     .leaf(12);
//!
//! assert!(tree.is_parent(CategoryId::new(7)));
//! assert_eq!(tree.parent_of(CategoryId::new(9)), Some(CategoryId::new(7)));
//! assert!(!tree.is_parent(CategoryId::new(12)));
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Identifier of a product category (a WordPress term id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryId(u32);

impl CategoryId {
    /// Create an id from its raw term id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw term id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for CategoryId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One top-level sidebar entry and its (possibly empty) child list.
#[derive(Debug, Clone)]
struct TopLevel {
    id: CategoryId,
    children: Vec<CategoryId>,
}

/// The flat two-level category taxonomy shown in the shop sidebar.
///
/// Built once from server-rendered markup and treated as immutable
/// afterwards. Ids are unique across the whole tree; an id that is
/// already known is silently skipped on insert.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    top: Vec<TopLevel>,
    parent_of: BTreeMap<CategoryId, CategoryId>,
    known: BTreeSet<CategoryId>,
}

impl CategoryTree {
    /// Create an empty taxonomy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level category without children.
    #[must_use]
    pub fn leaf(mut self, id: impl Into<CategoryId>) -> Self {
        let id = id.into();
        if self.known.insert(id) {
            self.top.push(TopLevel {
                id,
                children: Vec::new(),
            });
        }
        self
    }

    /// Add a top-level category with the given children, in display order.
    #[must_use]
    pub fn branch(
        mut self,
        id: impl Into<CategoryId>,
        children: impl IntoIterator<Item = impl Into<CategoryId>>,
    ) -> Self {
        let id = id.into();
        if !self.known.insert(id) {
            return self;
        }
        let mut kept = Vec::new();
        for child in children {
            let child = child.into();
            if self.known.insert(child) {
                self.parent_of.insert(child, id);
                kept.push(child);
            }
        }
        self.top.push(TopLevel { id, children: kept });
        self
    }

    /// Whether `id` exists anywhere in the taxonomy.
    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.known.contains(&id)
    }

    /// Whether `id` is a top-level category with at least one child.
    #[must_use]
    pub fn is_parent(&self, id: CategoryId) -> bool {
        self.top
            .iter()
            .any(|t| t.id == id && !t.children.is_empty())
    }

    /// The parent of `id`, if it is a child category.
    #[must_use]
    pub fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        self.parent_of.get(&id).copied()
    }

    /// The children of `id`, in display order. Empty for leaves and
    /// unknown ids.
    #[must_use]
    pub fn children_of(&self, id: CategoryId) -> &[CategoryId] {
        self.top
            .iter()
            .find(|t| t.id == id)
            .map_or(&[], |t| t.children.as_slice())
    }

    /// Top-level categories in display order.
    pub fn top_level(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.top.iter().map(|t| t.id)
    }

    /// Total number of known categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Whether the taxonomy is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Drop ids not present in the taxonomy from `selection`.
    pub fn retain_known(&self, selection: &mut BTreeSet<CategoryId>) {
        selection.retain(|id| self.known.contains(id));
    }

    /// Whether `parent`'s child list is shown, given the current selection
    /// and manual caret overrides.
    ///
    /// Selection wins: a parent that is itself selected, or has at least
    /// one selected child, is always open. A manual open applies only
    /// while the parent subtree is fully unselected; a manual close never
    /// beats the selection.
    #[must_use]
    pub fn is_expanded(
        &self,
        parent: CategoryId,
        selection: &BTreeSet<CategoryId>,
        overlay: &Expansion,
    ) -> bool {
        if selection.contains(&parent) {
            return true;
        }
        if self
            .children_of(parent)
            .iter()
            .any(|c| selection.contains(c))
        {
            return true;
        }
        overlay.manual(parent) == Some(true)
    }
}

/// Manual open/close overrides recorded from caret clicks.
///
/// An entry is cleared whenever the selection state of the parent or one
/// of its children changes, so the derived policy takes over again.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    manual: BTreeMap<CategoryId, bool>,
}

impl Expansion {
    /// Create an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a manual open (`true`) or close (`false`) for `parent`.
    pub fn set_manual(&mut self, parent: CategoryId, open: bool) {
        self.manual.insert(parent, open);
    }

    /// Forget any manual override for `parent`.
    pub fn clear_manual(&mut self, parent: CategoryId) {
        self.manual.remove(&parent);
    }

    /// The manual override for `parent`, if one is recorded.
    #[must_use]
    pub fn manual(&self, parent: CategoryId) -> Option<bool> {
        self.manual.get(&parent).copied()
    }

    /// Forget all manual overrides.
    pub fn clear(&mut self) {
        self.manual.clear();
    }
}
