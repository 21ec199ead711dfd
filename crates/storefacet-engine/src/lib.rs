#![forbid(unsafe_code)]

//! storefacet-engine: the shop filtering state machine.
//!
//! This crate connects the pure state layer (`storefacet-core`) and the
//! codecs (`storefacet-wire`) to a host through the data-only seam defined
//! in `storefacet-host`. The [`controller::ShopController`] consumes
//! [`ShopEvent`](storefacet_host::event::ShopEvent)s and accumulates
//! [`ShopOutputs`](storefacet_host::output::ShopOutputs); the host performs
//! the described I/O (fetches, DOM patches, history updates, redirects) and
//! feeds completions back in as events.
//!
//! [`program::ShopProgram`] wraps a controller in a host-driven step loop
//! with a deterministic clock, which is what embedders and the test harness
//! actually run.

pub mod controller;
pub mod program;
pub mod reconcile;
pub mod search;
