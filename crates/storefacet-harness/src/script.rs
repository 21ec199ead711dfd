#![forbid(unsafe_code)]

//! The scripted host: a deterministic browser stand-in.
//!
//! [`ScriptedHost`] wraps a [`ShopProgram`] and performs its effects in
//! order: patches and overlay cues go to an internal [`PageModel`], fetches
//! are parked until the script delivers a canned answer, and everything is
//! recorded in a [`Transcript`] for assertions and replay dumps.
//!
//! Delivery is explicit. A fetch stays outstanding until the script calls
//! [`ScriptedHost::deliver`], which is what lets scenarios interleave user
//! actions with slow responses.

use std::collections::VecDeque;
use std::time::Duration;

use serde_json::{Value, json};
use storefacet_core::category::CategoryTree;
use storefacet_engine::program::ShopProgram;
use storefacet_host::config::ShopConfig;
use storefacet_host::event::{FetchOutcome, RequestToken, ShopEvent};
use storefacet_host::output::{Overlay, RebindTargets, ShopOutputs};
use storefacet_wire::envelope::{self, FilterResults};
use storefacet_wire::search::SearchResults;
use url::Url;

use crate::page::PageModel;

/// A scripted answer to one fetch.
#[derive(Debug, Clone)]
pub enum CannedFetch {
    /// HTTP 200 with a well-formed success envelope.
    Success(FilterResults),
    /// HTTP 200 with a well-formed search body.
    SearchSuccess(SearchResults),
    /// HTTP 200 with a `success: false` envelope.
    Rejected {
        /// Server-provided failure message.
        message: String,
    },
    /// An arbitrary HTTP status and body.
    Failure {
        /// HTTP status code.
        status: u16,
        /// Raw body.
        body: String,
    },
    /// No HTTP response at all.
    Transport(String),
}

impl CannedFetch {
    fn into_outcome(self) -> FetchOutcome {
        match self {
            Self::Success(results) => FetchOutcome::Response {
                status: 200,
                body: envelope::encode(&results).unwrap(),
            },
            Self::SearchSuccess(results) => FetchOutcome::Response {
                status: 200,
                body: serde_json::to_string(&results).unwrap(),
            },
            Self::Rejected { message } => FetchOutcome::Response {
                status: 200,
                body: envelope::encode_failure(Some(&message)),
            },
            Self::Failure { status, body } => FetchOutcome::Response { status, body },
            Self::Transport(message) => FetchOutcome::TransportError { message },
        }
    }
}

/// One effect the host performed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A container's markup was replaced.
    Patched {
        /// DOM id of the container.
        dom_id: &'static str,
        /// Replacement markup.
        html: String,
    },
    /// Handler families were re-attached.
    Rebound(RebindTargets),
    /// The loading overlay changed.
    Overlay(Overlay),
    /// A filter fetch was started.
    FetchStarted {
        /// Correlation token.
        token: RequestToken,
        /// Form-encoded body.
        body: String,
    },
    /// The address bar was rewritten in place.
    HistoryReplaced(Url),
    /// The page navigated away.
    Redirected(Url),
    /// A search fetch was started.
    SearchStarted {
        /// Generation counter.
        generation: u64,
        /// Full request URL.
        url: Url,
    },
    /// A superseded search fetch was aborted.
    SearchAborted(u64),
    /// The search popup rendered fresh results.
    PopupRendered(SearchResults),
    /// The search popup was emptied and hidden.
    PopupCleared,
}

/// Ordered record of everything the host did.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    effects: Vec<Effect>,
}

impl Transcript {
    /// All recorded effects in execution order.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Bodies of all filter fetches, in dispatch order.
    #[must_use]
    pub fn fetch_bodies(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::FetchStarted { body, .. } => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All history rewrites, in order.
    #[must_use]
    pub fn history(&self) -> Vec<&Url> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::HistoryReplaced(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// All full-page navigations, in order.
    #[must_use]
    pub fn redirects(&self) -> Vec<&Url> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Redirected(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Render the transcript as a JSON array, one object per effect.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let entries: Vec<Value> = self.effects.iter().map(effect_json).collect();
        Value::Array(entries)
    }

    fn record(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

fn effect_json(effect: &Effect) -> Value {
    match effect {
        Effect::Patched { dom_id, html } => json!({
            "effect": "patch",
            "container": dom_id,
            "bytes": html.len(),
        }),
        Effect::Rebound(targets) => json!({
            "effect": "rebind",
            "pagination": targets.contains(RebindTargets::PAGINATION),
            "chips": targets.contains(RebindTargets::CHIPS),
        }),
        Effect::Overlay(Overlay::Show) => json!({ "effect": "overlay", "visible": true }),
        Effect::Overlay(Overlay::Hide) => json!({ "effect": "overlay", "visible": false }),
        Effect::FetchStarted { token, body } => json!({
            "effect": "fetch",
            "token": token.get(),
            "body": body,
        }),
        Effect::HistoryReplaced(url) => json!({ "effect": "history", "url": url.as_str() }),
        Effect::Redirected(url) => json!({ "effect": "redirect", "url": url.as_str() }),
        Effect::SearchStarted { generation, url } => json!({
            "effect": "search",
            "generation": generation,
            "url": url.as_str(),
        }),
        Effect::SearchAborted(generation) => json!({
            "effect": "search_abort",
            "generation": generation,
        }),
        Effect::PopupRendered(results) => json!({
            "effect": "popup",
            "products": results.products.len(),
            "categories": results.categories.len(),
        }),
        Effect::PopupCleared => json!({ "effect": "popup_cleared" }),
    }
}

/// A deterministic browser stand-in driving one [`ShopProgram`].
#[derive(Debug)]
pub struct ScriptedHost {
    program: ShopProgram,
    page: PageModel,
    canned: VecDeque<CannedFetch>,
    canned_search: VecDeque<CannedFetch>,
    outstanding: VecDeque<RequestToken>,
    outstanding_search: VecDeque<u64>,
    transcript: Transcript,
}

impl ScriptedHost {
    /// Create a host for the page described by `config`.
    #[must_use]
    pub fn new(tree: CategoryTree, config: ShopConfig) -> Self {
        let page = PageModel::new(config.page_url().clone());
        Self {
            program: ShopProgram::new(tree, config),
            page,
            canned: VecDeque::new(),
            canned_search: VecDeque::new(),
            outstanding: VecDeque::new(),
            outstanding_search: VecDeque::new(),
            transcript: Transcript::default(),
        }
    }

    /// Replace the page model, e.g. with one missing a container.
    #[must_use]
    pub fn with_page(mut self, page: PageModel) -> Self {
        self.page = page;
        self
    }

    /// Queue the answer for the next delivered filter fetch.
    pub fn expect_fetch(&mut self, response: CannedFetch) {
        self.canned.push_back(response);
    }

    /// Queue the answer for the next delivered search fetch.
    pub fn expect_search(&mut self, response: CannedFetch) {
        self.canned_search.push_back(response);
    }

    /// Feed one event through the program and perform its effects.
    pub fn event(&mut self, event: ShopEvent) {
        self.program.push_event(event);
        self.pump();
    }

    /// Advance time and perform anything that became due.
    pub fn advance_ms(&mut self, ms: u64) {
        self.program.advance_time(Duration::from_millis(ms));
        self.pump();
    }

    /// Answer the oldest outstanding filter fetch from the canned queue.
    ///
    /// Unscripted deliveries count as transport failures, so a scenario
    /// that forgets to queue an answer fails loudly through the engine's
    /// fallback path.
    pub fn deliver(&mut self) -> bool {
        let Some(token) = self.outstanding.pop_front() else {
            return false;
        };
        let outcome = self
            .canned
            .pop_front()
            .unwrap_or_else(|| CannedFetch::Transport("unscripted fetch".to_owned()))
            .into_outcome();
        self.event(ShopEvent::FetchCompleted { token, outcome });
        true
    }

    /// Answer the oldest live search fetch from the canned queue.
    pub fn deliver_search(&mut self) -> bool {
        let Some(generation) = self.outstanding_search.pop_front() else {
            return false;
        };
        let outcome = self
            .canned_search
            .pop_front()
            .unwrap_or_else(|| CannedFetch::Transport("unscripted search".to_owned()))
            .into_outcome();
        self.event(ShopEvent::SearchCompleted {
            generation,
            outcome,
        });
        true
    }

    /// Everything performed so far.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The document stand-in.
    #[must_use]
    pub fn page(&self) -> &PageModel {
        &self.page
    }

    /// The program under test.
    #[must_use]
    pub fn program(&self) -> &ShopProgram {
        &self.program
    }

    /// Mutable access to the program under test.
    pub fn program_mut(&mut self) -> &mut ShopProgram {
        &mut self.program
    }

    /// Filter fetches started but not yet delivered.
    #[must_use]
    pub fn outstanding_fetches(&self) -> usize {
        self.outstanding.len()
    }

    fn pump(&mut self) {
        self.program.step();
        let outputs = self.program.take_outputs();
        self.page.apply(&outputs);
        self.record(outputs);
    }

    fn record(&mut self, outputs: ShopOutputs) {
        for patch in outputs.patches {
            self.transcript.record(Effect::Patched {
                dom_id: patch.container.dom_id(),
                html: patch.html,
            });
        }
        if !outputs.rebinds.is_empty() {
            self.transcript.record(Effect::Rebound(outputs.rebinds));
        }
        if let Some(overlay) = outputs.overlay {
            self.transcript.record(Effect::Overlay(overlay));
        }
        for fetch in outputs.fetches {
            self.outstanding.push_back(fetch.token);
            self.transcript.record(Effect::FetchStarted {
                token: fetch.token,
                body: fetch.body,
            });
        }
        for url in outputs.history {
            self.transcript.record(Effect::HistoryReplaced(url));
        }
        if let Some(url) = outputs.redirect {
            self.transcript.record(Effect::Redirected(url));
        }
        for generation in outputs.search_aborts {
            self.outstanding_search.retain(|g| *g != generation);
            self.transcript.record(Effect::SearchAborted(generation));
        }
        for fetch in outputs.search_fetches {
            self.outstanding_search.push_back(fetch.generation);
            self.transcript.record(Effect::SearchStarted {
                generation: fetch.generation,
                url: fetch.url,
            });
        }
        if let Some(results) = outputs.last_search {
            self.transcript.record(Effect::PopupRendered(results));
        }
        if outputs.search_cleared {
            self.transcript.record(Effect::PopupCleared);
        }
    }
}
