#![forbid(unsafe_code)]

//! Grouped-button (radio) control.
//!
//! A [`ButtonGroup`] is a set of sibling values of which a press selects
//! exactly one. Bound groups relay the press to a model slot inside an
//! evaluation cycle and take their highlight from the slot, so external
//! writes to the same slot re-highlight the group like any other watcher.
//! Unlike the editor binding there is no high-frequency internal change
//! source here, but the press → model path keeps the same cycle discipline.
//!
//! # Failure Modes
//!
//! - Press on a value outside the group: ignored.
//! - Press while an evaluation cycle is open (bound groups): dropped.
//! - Model write naming a value outside the group: highlight cleared.

use std::cell::RefCell;
use std::rc::Rc;

use weft_reactive::{Observable, Scope, Subscription};

enum GroupBinding {
    Bound {
        slot: Observable<Option<String>>,
        scope: Scope,
        _watch: Subscription,
    },
    Unbound,
}

/// A radio-style selection over an ordered value list.
pub struct ButtonGroup {
    values: Vec<String>,
    active: Rc<RefCell<Option<String>>>,
    binding: GroupBinding,
}

impl ButtonGroup {
    /// A group with purely local selection state.
    #[must_use]
    pub fn unbound(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            active: Rc::new(RefCell::new(None)),
            binding: GroupBinding::Unbound,
        }
    }

    /// A group bound two-way to `slot`.
    ///
    /// The current slot value highlights immediately; presses propagate to
    /// the slot inside an evaluation cycle on `scope`.
    #[must_use]
    pub fn bound(
        scope: &Scope,
        values: impl IntoIterator<Item = impl Into<String>>,
        slot: Observable<Option<String>>,
    ) -> Self {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let active = Rc::new(RefCell::new(highlight_for(&values, slot.get())));

        let watch = {
            let active = Rc::clone(&active);
            let values = values.clone();
            slot.subscribe(move |value| {
                *active.borrow_mut() = highlight_for(&values, value.clone());
            })
        };

        Self {
            values,
            active,
            binding: GroupBinding::Bound {
                slot,
                scope: scope.clone(),
                _watch: watch,
            },
        }
    }

    /// Press the button carrying `value`.
    ///
    /// Values outside the group are ignored. For a bound group the press is
    /// relayed to the model slot inside a fresh evaluation cycle — and
    /// dropped if one is already open.
    pub fn press(&self, value: &str) {
        if !self.values.iter().any(|v| v == value) {
            tracing::debug!(target: "weft::buttons", value, "press: unknown value");
            return;
        }
        match &self.binding {
            GroupBinding::Bound { slot, scope, .. } => {
                let relayed = scope
                    .apply(|| slot.set(Some(value.to_owned())))
                    .is_some();
                if !relayed {
                    tracing::trace!(
                        target: "weft::buttons",
                        "press dropped: evaluation cycle open"
                    );
                }
            }
            GroupBinding::Unbound => {
                *self.active.borrow_mut() = Some(value.to_owned());
            }
        }
    }

    /// The highlighted value, if any.
    #[must_use]
    pub fn active(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// The group's values, in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether the group is bound to a model slot.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, GroupBinding::Bound { .. })
    }
}

impl std::fmt::Debug for ButtonGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonGroup")
            .field("values", &self.values)
            .field("active", &self.active.borrow())
            .field("bound", &self.is_bound())
            .finish()
    }
}

fn highlight_for(values: &[String], value: Option<String>) -> Option<String> {
    value.filter(|v| values.contains(v))
}
