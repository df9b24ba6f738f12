//! Observers attached to the intent, update and state streams.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::watch;

/// Synchronous observer of values flowing through a container.
///
/// Middlewares run in ascending `order`. They see every value but cannot
/// change or drop it.
pub trait Middleware<T>: Send + Sync {
    fn order(&self) -> i32 {
        0
    }

    fn observe(&self, value: &T);
}

/// Ordered list of middlewares for one stream.
pub struct MiddlewareChain<T> {
    middlewares: Vec<Arc<dyn Middleware<T>>>,
}

impl<T> Default for MiddlewareChain<T> {
    fn default() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }
}

impl<T> MiddlewareChain<T> {
    pub fn new(mut middlewares: Vec<Arc<dyn Middleware<T>>>) -> Self {
        middlewares.sort_by_key(|m| m.order());
        Self { middlewares }
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn run(&self, value: &T) {
        for middleware in &self.middlewares {
            middleware.observe(value);
        }
    }
}

/// Logs every value at debug level under a fixed tag.
pub struct DebugLoggingMiddleware {
    tag: &'static str,
    order: i32,
}

impl DebugLoggingMiddleware {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, order: 0 }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl<T: Debug> Middleware<T> for DebugLoggingMiddleware {
    fn order(&self) -> i32 {
        self.order
    }

    fn observe(&self, value: &T) {
        tracing::debug!(tag = self.tag, "{:?}", value);
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Busy counter for hosts and tests that need to wait for quiescence.
///
/// Matching intents increment the counter; matching states decrement it.
/// The counter never goes below zero.
pub struct IdlingResource<I, S> {
    busy: watch::Sender<usize>,
    should_increment_on: Predicate<I>,
    should_decrement_on: Predicate<S>,
}

impl<I: 'static, S: 'static> IdlingResource<I, S> {
    pub fn new(
        should_increment_on: impl Fn(&I) -> bool + Send + Sync + 'static,
        should_decrement_on: impl Fn(&S) -> bool + Send + Sync + 'static,
    ) -> Arc<Self> {
        let (busy, _) = watch::channel(0);
        Arc::new(Self {
            busy,
            should_increment_on: Box::new(should_increment_on),
            should_decrement_on: Box::new(should_decrement_on),
        })
    }

    pub fn intent_middleware(self: &Arc<Self>, order: i32) -> Arc<dyn Middleware<I>> {
        Arc::new(IntentCounter {
            resource: Arc::clone(self),
            order,
        })
    }

    pub fn state_middleware(self: &Arc<Self>, order: i32) -> Arc<dyn Middleware<S>> {
        Arc::new(StateCounter {
            resource: Arc::clone(self),
            order,
        })
    }

    pub fn is_idle(&self) -> bool {
        *self.busy.borrow() == 0
    }

    pub fn busy_count(&self) -> usize {
        *self.busy.borrow()
    }

    /// Resolve once the counter drops to zero.
    pub async fn idle(&self) {
        let mut rx = self.busy.subscribe();
        let _ = rx.wait_for(|busy| *busy == 0).await;
    }
}

struct IntentCounter<I, S> {
    resource: Arc<IdlingResource<I, S>>,
    order: i32,
}

impl<I: 'static, S: 'static> Middleware<I> for IntentCounter<I, S> {
    fn order(&self) -> i32 {
        self.order
    }

    fn observe(&self, intent: &I) {
        if (self.resource.should_increment_on)(intent) {
            self.resource.busy.send_modify(|busy| *busy += 1);
        }
    }
}

struct StateCounter<I, S> {
    resource: Arc<IdlingResource<I, S>>,
    order: i32,
}

impl<I: 'static, S: 'static> Middleware<S> for StateCounter<I, S> {
    fn order(&self) -> i32 {
        self.order
    }

    fn observe(&self, state: &S) {
        if (self.resource.should_decrement_on)(state) {
            self.resource.busy.send_if_modified(|busy| {
                if *busy == 0 {
                    false
                } else {
                    *busy -= 1;
                    true
                }
            });
        }
    }
}
