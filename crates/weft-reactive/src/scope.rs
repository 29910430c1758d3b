#![forbid(unsafe_code)]

//! Evaluation scopes with explicit cycle boundaries.
//!
//! A [`Scope`] marks where reactive evaluation cycles may run. Opening a
//! cycle ([`Scope::try_enter`]) yields a [`CycleGuard`]; while any guard is
//! alive on a scope, that scope — and every scope below it — reports
//! [`Scope::in_cycle`] as true. Cross-boundary writers (the binding
//! adapters) consult this predicate before propagating a value, which is
//! what keeps a widget-originated change from re-entering an evaluation
//! already in flight.
//!
//! The guard is a plain flag held behind the scope handle, not a global or
//! thread-local phase: a test can construct a `Scope`, hold a guard, and
//! observe the drop behavior without any framework simulation.
//!
//! # Invariants
//!
//! 1. `in_cycle()` is true iff a `CycleGuard` is alive on this scope or any
//!    ancestor.
//! 2. `try_enter()` returns `None` (and changes nothing) while `in_cycle()`
//!    is true; nested cycles cannot be opened.
//! 3. Dropping the guard closes the cycle; guards cannot leak a stuck-open
//!    flag across unwinding.
//! 4. Clones of a `Scope` handle share the same node; `child()` creates a
//!    new node below it.
//!
//! # Failure Modes
//!
//! - Attempt to open a nested cycle: refused (`None`), never a panic.
//! - Guard dropped out of creation order: flags are per-node, so closing
//!   order does not matter.

use std::cell::Cell;
use std::rc::Rc;

struct ScopeNode {
    parent: Option<Rc<ScopeNode>>,
    cycle_open: Cell<bool>,
}

/// A handle to one node in the evaluation-scope tree.
#[derive(Clone)]
pub struct Scope {
    node: Rc<ScopeNode>,
}

impl Scope {
    /// Create a root scope.
    #[must_use]
    pub fn root() -> Self {
        Self {
            node: Rc::new(ScopeNode {
                parent: None,
                cycle_open: Cell::new(false),
            }),
        }
    }

    /// Create a child scope below this one.
    ///
    /// Cycles opened on the parent are visible from the child, not the
    /// other way around.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            node: Rc::new(ScopeNode {
                parent: Some(Rc::clone(&self.node)),
                cycle_open: Cell::new(false),
            }),
        }
    }

    /// Whether an evaluation cycle is open on this scope or any ancestor.
    #[must_use]
    pub fn in_cycle(&self) -> bool {
        let mut node = Some(&self.node);
        while let Some(current) = node {
            if current.cycle_open.get() {
                return true;
            }
            node = current.parent.as_ref();
        }
        false
    }

    /// Open an evaluation cycle on this scope.
    ///
    /// Returns `None` without side effects when a cycle is already open
    /// here or on an ancestor. The cycle closes when the guard drops.
    #[must_use = "the cycle closes as soon as the guard is dropped"]
    pub fn try_enter(&self) -> Option<CycleGuard> {
        if self.in_cycle() {
            return None;
        }
        self.node.cycle_open.set(true);
        Some(CycleGuard {
            node: Rc::clone(&self.node),
        })
    }

    /// Run `f` inside a fresh evaluation cycle.
    ///
    /// Returns `None` — and does not run `f` — when a cycle is already
    /// open. This is the drop-without-retry policy the binding adapters
    /// rely on.
    pub fn apply<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _cycle = self.try_enter()?;
        Some(f())
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("in_cycle", &self.in_cycle())
            .finish()
    }
}

/// RAII guard for an open evaluation cycle. Dropping it closes the cycle.
pub struct CycleGuard {
    node: Rc<ScopeNode>,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.node.cycle_open.set(false);
    }
}

impl std::fmt::Debug for CycleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleGuard").finish()
    }
}
