//! Priority-weighted middleware chain for event enrichment
//!
//! Steps execute in descending priority order, stable on insertion order for
//! ties. Each step receives the event under construction together with a
//! continuation for the remainder of the chain; a step that does not produce
//! an event vetoes the capture.

use std::sync::Arc;

use flare_core::{Event, EventPayload, ExceptionInfo, RequestInfo};
use tracing::debug;

/// Read-only context threaded through the middleware chain
///
/// The request snapshot is borrowed for the duration of one
/// [`MiddlewareStack::execute_stack`] call and never retained.
pub struct MiddlewareContext<'a> {
    pub request: Option<&'a RequestInfo>,
    pub exception: Option<&'a ExceptionInfo>,
    pub payload: &'a EventPayload,
}

/// An enrichment step composed into the assembly chain
pub trait Middleware: Send + Sync {
    /// Process the in-flight event
    ///
    /// Call `next.run(event)` to hand the event to the remainder of the
    /// chain, or return `None` to veto the capture entirely.
    fn process(&self, event: Event, ctx: &MiddlewareContext<'_>, next: Next<'_>) -> Option<Event>;
}

/// Continuation representing the remainder of the middleware chain
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    ctx: &'a MiddlewareContext<'a>,
}

impl Next<'_> {
    /// Run the rest of the chain on `event`
    pub fn run(self, event: Event) -> Option<Event> {
        match self.chain.split_first() {
            Some((step, rest)) => step.process(
                event,
                self.ctx,
                Next {
                    chain: rest,
                    ctx: self.ctx,
                },
            ),
            None => Some(event),
        }
    }
}

struct FnMiddleware<F>(F);

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(Event, &MiddlewareContext<'a>, Next<'a>) -> Option<Event> + Send + Sync,
{
    fn process(&self, event: Event, ctx: &MiddlewareContext<'_>, next: Next<'_>) -> Option<Event> {
        (self.0)(event, ctx, next)
    }
}

/// Identity step closing the chain; returns the event unchanged when every
/// other step passed through
struct Terminal;

impl Middleware for Terminal {
    fn process(
        &self,
        event: Event,
        _ctx: &MiddlewareContext<'_>,
        _next: Next<'_>,
    ) -> Option<Event> {
        Some(event)
    }
}

struct MiddlewareEntry {
    priority: i32,
    seq: u64,
    step: Arc<dyn Middleware>,
}

/// Ordered, priority-weighted chain of enrichment steps
pub struct MiddlewareStack {
    entries: Vec<MiddlewareEntry>,
    next_seq: u64,
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MiddlewareStack {
    /// Create a stack with the terminal identity step installed at the
    /// lowest effective priority
    pub fn new() -> Self {
        let mut stack = MiddlewareStack {
            entries: Vec::new(),
            next_seq: 0,
        };
        stack.add(Arc::new(Terminal), i32::MIN);
        stack
    }

    /// Register a step
    ///
    /// The same step can be added more than once; each registration executes
    /// independently.
    pub fn add(&mut self, step: Arc<dyn Middleware>, priority: i32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(MiddlewareEntry {
            priority,
            seq,
            step,
        });
    }

    /// Register a closure as a step, returning the handle usable with
    /// [`remove`](Self::remove)
    pub fn add_fn<F>(&mut self, priority: i32, f: F) -> Arc<dyn Middleware>
    where
        F: for<'a> Fn(Event, &MiddlewareContext<'a>, Next<'a>) -> Option<Event>
            + Send
            + Sync
            + 'static,
    {
        let step: Arc<dyn Middleware> = Arc::new(FnMiddleware(f));
        self.add(step.clone(), priority);
        step
    }

    /// Unregister every entry for `step`; removing an absent step is a no-op
    pub fn remove(&mut self, step: &Arc<dyn Middleware>) {
        self.entries.retain(|entry| !Arc::ptr_eq(&entry.step, step));
    }

    /// Run `event` through the chain
    ///
    /// Returns `None` when a step vetoed the event.
    pub fn execute_stack(
        &self,
        event: Event,
        request: Option<&RequestInfo>,
        exception: Option<&ExceptionInfo>,
        payload: &EventPayload,
    ) -> Option<Event> {
        let mut ordered: Vec<&MiddlewareEntry> = self.entries.iter().collect();
        // Descending priority; insertion sequence breaks ties so the order
        // does not lean on the sort algorithm's stability
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        let chain: Vec<Arc<dyn Middleware>> =
            ordered.into_iter().map(|entry| entry.step.clone()).collect();

        let ctx = MiddlewareContext {
            request,
            exception,
            payload,
        };
        let result = Next {
            chain: &chain,
            ctx: &ctx,
        }
        .run(event);
        if result.is_none() {
            debug!("event vetoed by middleware");
        }
        result
    }
}
