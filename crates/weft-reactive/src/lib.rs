#![forbid(unsafe_code)]

//! Reactive substrate for Weft view bindings.
//!
//! This crate provides the change-tracking primitives the binding layer is
//! built on:
//!
//! - [`Observable`]: a shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`Scope`]: an evaluation-scope tree with explicit cycle boundaries and
//!   a cycle-in-progress predicate visible from descendant scopes.
//! - [`CycleGuard`]: RAII guard holding one evaluation cycle open.
//!
//! # Architecture
//!
//! Everything here is `Rc<RefCell<..>>`-based, single-threaded shared
//! ownership; Weft's scheduling model is cooperative and callback-driven.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification, so dropping a [`Subscription`] is all it takes to
//! silence a callback.
//!
//! Cycles are scoped, not global: a writer that must not re-enter an
//! evaluation in flight asks its own `Scope` handle, and the answer covers
//! that scope plus its ancestors. See the [`scope`] module for the exact
//! rules.

pub mod observable;
pub mod scope;

pub use observable::{Observable, Subscription};
pub use scope::{CycleGuard, Scope};
