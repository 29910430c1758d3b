#![forbid(unsafe_code)]

//! Tab strip: activation switching and default-pane selection.
//!
//! A [`TabStrip`] is an ordered list of named panes with at most one active
//! at a time. The host wires its click events to [`TabStrip::activate`];
//! [`TabStrip::ensure_default_active`] covers strips that attach with no
//! pane marked active. There is no hidden state machine beyond the single
//! active marker.
//!
//! # Failure Modes
//!
//! - `activate` on an unknown id: returns `false`, changes nothing.
//! - `ensure_default_active` on an empty strip: no-op.

/// One pane in a strip.
#[derive(Debug, Clone)]
struct TabPane {
    id: String,
    active: bool,
}

/// An ordered set of panes, at most one active.
#[derive(Debug, Clone, Default)]
pub struct TabStrip {
    panes: Vec<TabPane>,
}

impl TabStrip {
    /// An empty strip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an inactive pane.
    #[must_use]
    pub fn with_pane(mut self, id: impl Into<String>) -> Self {
        self.push_pane(id);
        self
    }

    /// Append an inactive pane.
    pub fn push_pane(&mut self, id: impl Into<String>) {
        self.panes.push(TabPane {
            id: id.into(),
            active: false,
        });
    }

    /// Activate the pane named `id`, deactivating the current one.
    ///
    /// Returns `false` — and leaves the strip untouched — when no pane has
    /// that id.
    pub fn activate(&mut self, id: &str) -> bool {
        if !self.panes.iter().any(|pane| pane.id == id) {
            tracing::debug!(target: "weft::tabs", id, "activate: unknown pane");
            return false;
        }
        for pane in &mut self.panes {
            pane.active = pane.id == id;
        }
        true
    }

    /// If no pane is active, activate the first one.
    pub fn ensure_default_active(&mut self) {
        if self.panes.iter().any(|pane| pane.active) {
            return;
        }
        if let Some(first) = self.panes.first_mut() {
            first.active = true;
        }
    }

    /// The id of the active pane, if any.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.panes
            .iter()
            .find(|pane| pane.active)
            .map(|pane| pane.id.as_str())
    }

    /// Whether the pane named `id` is the active one.
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.active() == Some(id)
    }

    /// Number of panes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Whether the strip has no panes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}
