#![forbid(unsafe_code)]

//! Host-driven, non-blocking program runner.
//!
//! [`ShopProgram`] owns a [`ShopController`], an event queue, and a
//! deterministic clock. There is no internal event loop and nothing
//! blocks; the host drives everything:
//!
//! 1. Push interactions and fetch completions via [`ShopProgram::push_event`].
//! 2. Advance time via [`ShopProgram::advance_time`].
//! 3. Call [`ShopProgram::step`] to process whatever is queued.
//! 4. Drain effects via [`ShopProgram::take_outputs`] and perform them.
//!
//! The program stops running once the controller emits a full-page
//! navigation; the page it lives in is about to be torn down.

use std::time::Duration;

use storefacet_core::category::CategoryTree;
use storefacet_host::config::ShopConfig;
use storefacet_host::event::ShopEvent;
use storefacet_host::output::ShopOutputs;
use storefacet_host::{DeterministicClock, HostEventQueue};

use crate::controller::ShopController;

/// What one [`ShopProgram::step`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the program is still running after this step.
    pub running: bool,
    /// Events handled during this step.
    pub events_processed: usize,
    /// Whether effects are waiting in the output buffer.
    pub effects_pending: bool,
}

/// A controller wired to a host-pumped queue and clock.
#[derive(Debug)]
pub struct ShopProgram {
    controller: ShopController,
    queue: HostEventQueue,
    clock: DeterministicClock,
    running: bool,
}

impl ShopProgram {
    /// Create a program for the page described by `config`.
    #[must_use]
    pub fn new(tree: CategoryTree, config: ShopConfig) -> Self {
        Self {
            controller: ShopController::new(tree, config),
            queue: HostEventQueue::new(),
            clock: DeterministicClock::new(),
            running: true,
        }
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: ShopEvent) {
        self.queue.push_event(event);
    }

    /// Advance the program clock by `dt`, dispatching any due debounced
    /// work immediately.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.controller.advance_time(dt);
    }

    /// Process every queued event.
    pub fn step(&mut self) -> StepResult {
        if !self.running {
            return StepResult {
                running: false,
                events_processed: 0,
                effects_pending: self.controller.has_outputs(),
            };
        }
        let mut events_processed = 0;
        while let Some(event) = self.queue.pop_event() {
            self.controller.handle(event);
            events_processed += 1;
        }
        if self.controller.is_redirecting() {
            self.running = false;
        }
        StepResult {
            running: self.running,
            events_processed,
            effects_pending: self.controller.has_outputs(),
        }
    }

    /// Drain the accumulated effects.
    #[must_use]
    pub fn take_outputs(&mut self) -> ShopOutputs {
        self.controller.take_outputs()
    }

    /// Whether [`step`](Self::step) still processes events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The wrapped controller.
    #[must_use]
    pub fn controller(&self) -> &ShopController {
        &self.controller
    }

    /// Mutable access to the wrapped controller.
    pub fn controller_mut(&mut self) -> &mut ShopController {
        &mut self.controller
    }

    /// The program clock.
    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use storefacet_core::category::CategoryId;
    use storefacet_core::state::PriceBounds;
    use storefacet_host::config::AjaxConfig;
    use storefacet_host::event::{FetchOutcome, RequestToken};
    use url::Url;

    fn program() -> ShopProgram {
        let tree = CategoryTree::new()
            .branch(CategoryId::new(7), [CategoryId::new(8), CategoryId::new(9)])
            .leaf(CategoryId::new(12));
        let config = ShopConfig::new(
            Url::parse("https://shop.test/shop/").unwrap(),
            PriceBounds::new(0, 500, 10),
        )
        .with_ajax(AjaxConfig::new(
            Url::parse("https://shop.test/wp-admin/admin-ajax.php").unwrap(),
            "n0nce",
        ));
        ShopProgram::new(tree, config)
    }

    #[test]
    fn quiet_step_reports_nothing() {
        let mut p = program();
        let result = p.step();
        assert_eq!(
            result,
            StepResult {
                running: true,
                events_processed: 0,
                effects_pending: false,
            }
        );
    }

    #[test]
    fn step_processes_the_whole_queue_in_order() {
        let mut p = program();
        p.push_event(ShopEvent::CategoryToggled {
            id: CategoryId::new(12),
            selected: true,
        });
        p.push_event(ShopEvent::ApplyClicked);

        let result = p.step();
        assert_eq!(result.events_processed, 2);
        assert!(result.effects_pending);

        let out = p.take_outputs();
        assert_eq!(out.fetches.len(), 1);
        assert!(out.fetches[0].body.contains("categories%5B%5D=12"));
        assert!(!p.controller().has_outputs());
    }

    #[test]
    fn redirect_stops_the_program() {
        let mut p = program();
        p.push_event(ShopEvent::ApplyClicked);
        p.step();
        let token = p.take_outputs().fetches[0].token;

        p.push_event(ShopEvent::FetchCompleted {
            token,
            outcome: FetchOutcome::TransportError {
                message: "offline".to_owned(),
            },
        });
        let result = p.step();
        assert!(!result.running);
        assert!(!p.is_running());
        assert!(p.take_outputs().redirect.is_some());

        // Stopped programs no longer drain the queue.
        p.push_event(ShopEvent::ApplyClicked);
        assert_eq!(p.step().events_processed, 0);
    }

    #[test]
    fn advance_time_moves_clock_and_debounce_together() {
        let mut p = program();
        p.push_event(ShopEvent::SearchInput {
            term: "lamp".to_owned(),
        });
        p.step();
        assert!(p.take_outputs().search_fetches.is_empty());

        p.advance_time(Duration::from_millis(250));
        assert_eq!(p.clock().now_mono(), Duration::from_millis(250));
        assert_eq!(p.take_outputs().search_fetches.len(), 1);
    }

    #[test]
    fn completion_arrives_as_an_ordinary_event() {
        let mut p = program();
        p.push_event(ShopEvent::ApplyClicked);
        p.step();
        let _ = p.take_outputs();

        let body = storefacet_wire::envelope::encode(&storefacet_wire::envelope::FilterResults {
            products: "<ul></ul>".to_owned(),
            pagination: String::new(),
            result_count: "<p>0</p>".to_owned(),
            total: 0,
            total_pages: 1,
            current_page: 1,
            active_filters: Vec::new(),
        })
        .unwrap();
        p.push_event(ShopEvent::FetchCompleted {
            token: RequestToken::new(1),
            outcome: FetchOutcome::Response { status: 200, body },
        });
        p.step();

        let out = p.take_outputs();
        assert_eq!(out.patches.len(), 4);
        assert_eq!(out.history.len(), 1);
        assert!(p.is_running());
        assert!(!p.controller().is_loading());
    }
}
