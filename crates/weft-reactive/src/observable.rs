#![forbid(unsafe_code)]

//! Shared, version-tracked value cells with change notification.
//!
//! [`Observable<T>`] is the substrate every Weft binding is built on: a
//! single-threaded shared value that notifies subscribers when it changes.
//! [`Subscription`] is the RAII guard returned by [`Observable::subscribe`];
//! dropping it silences the callback.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version
//!    bump, no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. Clones of an `Observable` share the same underlying cell.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `set()`.
//! - Callback re-entrantly calling `set()` on the same observable: allowed;
//!   the inner `set` completes (and notifies) before the outer one returns.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct ObservableInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    // Weak so that dropping the Subscription (which owns the strong
    // reference) is all it takes to unsubscribe. Dead entries are pruned
    // lazily on the next notification.
    subscribers: RefCell<Vec<Weak<dyn Fn(&T)>>>,
}

/// A shared, observable value.
///
/// `Rc`-based and single-threaded, matching Weft's cooperative scheduling
/// model. Cloning shares the underlying cell.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not call `set` on the same observable; the value is
    /// borrowed while it runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// The number of mutations that actually changed the value.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Set a new value, notifying subscribers in registration order.
    ///
    /// Setting a value equal to the current one is a no-op: no version
    /// bump, no notifications.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        tracing::trace!(target: "weft::reactive", version, "observable changed");
        self.notify();
    }

    /// Subscribe to value changes.
    ///
    /// The callback fires on every mutation that changes the value, after
    /// the value has been stored. It does not fire for the current value at
    /// subscription time. Hold the returned [`Subscription`] for as long as
    /// the callback should stay alive.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    fn notify(&self) {
        // Snapshot the live callbacks first so subscribers may re-enter
        // (subscribe, or set a *different* observable) without tripping a
        // borrow of the subscriber list.
        let live: Vec<Rc<dyn Fn(&T)>> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        let value = self.inner.value.borrow().clone();
        for callback in live {
            callback(&value);
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping the guard unsubscribes: the callback will not fire in any
/// notification cycle that starts after the drop.
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}
