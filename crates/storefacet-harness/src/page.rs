#![forbid(unsafe_code)]

//! A document stand-in for scenario tests.
//!
//! [`PageModel`] applies one output batch at a time the way the real page
//! glue would: container markup is replaced wholesale, a patch addressed to
//! an absent container is skipped without complaint, the overlay follows
//! the last cue in the batch, and history rewrites move the address bar
//! without navigating.

use std::collections::{BTreeMap, BTreeSet};

use storefacet_host::output::{ContainerId, Overlay, RebindTargets, ShopOutputs};
use url::Url;

/// Mutable page state as the host glue would see it.
#[derive(Debug, Clone)]
pub struct PageModel {
    url: Url,
    containers: BTreeMap<ContainerId, String>,
    absent: BTreeSet<ContainerId>,
    overlay_visible: bool,
    rebound: RebindTargets,
    navigated: Option<Url>,
}

impl PageModel {
    /// A page at `url` with all four containers present and empty.
    #[must_use]
    pub fn new(url: Url) -> Self {
        let containers = ContainerId::ALL
            .into_iter()
            .map(|id| (id, String::new()))
            .collect();
        Self {
            url,
            containers,
            absent: BTreeSet::new(),
            overlay_visible: false,
            rebound: RebindTargets::empty(),
            navigated: None,
        }
    }

    /// Remove a container from the page entirely.
    #[must_use]
    pub fn without(mut self, container: ContainerId) -> Self {
        self.absent.insert(container);
        self.containers.remove(&container);
        self
    }

    /// Apply one drained output batch.
    pub fn apply(&mut self, outputs: &ShopOutputs) {
        for patch in &outputs.patches {
            if self.absent.contains(&patch.container) {
                continue;
            }
            self.containers.insert(patch.container, patch.html.clone());
        }
        self.rebound |= outputs.rebinds;
        if let Some(overlay) = outputs.overlay {
            self.overlay_visible = matches!(overlay, Overlay::Show);
        }
        if let Some(url) = outputs.history.last() {
            self.url = url.clone();
        }
        if let Some(url) = &outputs.redirect {
            self.navigated = Some(url.clone());
        }
    }

    /// Current markup of a container, `None` when absent.
    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&str> {
        self.containers.get(&id).map(String::as_str)
    }

    /// Current address-bar URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the loading overlay is showing.
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Handler families re-attached at any point so far.
    #[must_use]
    pub fn rebound(&self) -> RebindTargets {
        self.rebound
    }

    /// Where the page navigated to, if it did.
    #[must_use]
    pub fn navigated(&self) -> Option<&Url> {
        self.navigated.as_ref()
    }
}
