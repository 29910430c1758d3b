#![forbid(unsafe_code)]

//! The editor binding adapter.
//!
//! An [`EditorBinding`] owns the lifecycle of one editor-widget instance
//! bound to one reactive model slot and mediates all value flow between
//! them. The widget is the authoritative source of what the user currently
//! sees; the model slot is owned by the surrounding application, which may
//! write to it at any time.
//!
//! # Value flow
//!
//! - **Model → widget**: every change of the bound slot is formatted
//!   through the session's [`FormatterChain`] and written into the widget
//!   buffer, unconditionally.
//! - **Widget → model**: every widget change notification is relayed to the
//!   slot *unless* the buffer already equals the formatted model value
//!   (redundant write), or an evaluation cycle is open on the session's
//!   scope or an ancestor (the notification is dropped, never queued).
//! - **Mode**: one direction only. A non-empty mode value different from
//!   the widget's current mode switches the widget; empty or unchanged
//!   values are ignored. The widget never reports its mode back.
//!
//! # Invariants
//!
//! 1. At any settled instant, the widget buffer equals the formatted model
//!    value, unless a write is in flight.
//! 2. One propagation per distinct value: a programmatic model write cannot
//!    ricochet through the widget back into the model.
//! 3. Teardown runs exactly once, synchronously; afterwards no callback
//!    established by the session fires.
//!
//! # Failure Modes
//!
//! - Unbound session: construction/destruction only, no synchronization.
//! - Absent (`None`) model value: the widget receives `""`.
//! - Change notification under an open cycle: dropped; the next keystroke
//!   or model touch surfaces the eventually-correct state.
//! - Widget construction/destruction panics: not caught.

use std::rc::Rc;

use weft_reactive::{Observable, Scope, Subscription};

use crate::format::FormatterChain;
use crate::widget::{ChangeListener, EditorFactory, EditorWidget, HostSurface};

/// How a session relates to the model, chosen once at attachment.
pub enum ModelBinding {
    /// Two-way synchronization with a model slot.
    Bound {
        /// The model slot to mirror.
        slot: Observable<Option<String>>,
        /// Pre-render pipeline for incoming model values.
        formatters: FormatterChain,
    },
    /// No model: the adapter is a pass-through widget wrapper.
    Unbound,
}

impl std::fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bound { formatters, .. } => f
                .debug_struct("Bound")
                .field("formatters", formatters)
                .finish_non_exhaustive(),
            Self::Unbound => f.debug_struct("Unbound").finish(),
        }
    }
}

/// Configuration for one binding session.
#[derive(Debug)]
pub struct EditorConfig {
    model: ModelBinding,
    mode: Option<Observable<String>>,
}

impl EditorConfig {
    /// A session with no model accessor: lifecycle ownership only.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            model: ModelBinding::Unbound,
            mode: None,
        }
    }

    /// A session bound two-way to `slot`, with the default formatter chain.
    #[must_use]
    pub fn bound(slot: Observable<Option<String>>) -> Self {
        Self {
            model: ModelBinding::Bound {
                slot,
                formatters: FormatterChain::new(),
            },
            mode: None,
        }
    }

    /// Replace the formatter chain. No effect on an unbound session.
    #[must_use]
    pub fn with_formatters(mut self, chain: FormatterChain) -> Self {
        if let ModelBinding::Bound { formatters, .. } = &mut self.model {
            *formatters = chain;
        }
        self
    }

    /// Observe `mode` and forward it to the widget's mode switch.
    #[must_use]
    pub fn with_mode(mut self, mode: Observable<String>) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// One live widget/model binding session.
///
/// Created with [`EditorBinding::attach`]; torn down exactly once, either
/// by [`EditorBinding::detach`] or by drop.
pub struct EditorBinding {
    widget: Rc<dyn EditorWidget>,
    scope: Scope,
    bound: bool,
    // Strong end of the widget's weakly-held change listener.
    change_listener: Option<ChangeListener>,
    mode_watch: Option<Subscription>,
    render: Option<Subscription>,
    torn_down: bool,
}

impl EditorBinding {
    /// Attach a binding session.
    ///
    /// Creates the widget via `factory` on `surface`, wires the mode watch
    /// if one is configured, and — for a bound session — renders the
    /// current model value and establishes both propagation paths.
    pub fn attach(
        scope: &Scope,
        factory: &dyn EditorFactory,
        surface: &HostSurface,
        config: EditorConfig,
    ) -> Self {
        let widget = factory.create(surface);
        tracing::debug!(target: "weft::editor", surface = %surface.id(), "session attached");

        // Mode flows regardless of whether a model is bound.
        let mode_watch = config.mode.map(|mode| {
            apply_mode(widget.as_ref(), &mode.get());
            let weak = Rc::downgrade(&widget);
            mode.subscribe(move |value| {
                if let Some(widget) = weak.upgrade() {
                    apply_mode(widget.as_ref(), value);
                }
            })
        });

        let (bound, change_listener, render) = match config.model {
            ModelBinding::Unbound => (false, None, None),
            ModelBinding::Bound { slot, formatters } => {
                // Initial render, then model → widget on every slot change.
                widget.set_buffer(&formatters.apply(slot.get().as_deref()));
                let render = {
                    let weak = Rc::downgrade(&widget);
                    let chain = formatters.clone();
                    slot.subscribe(move |value| {
                        if let Some(widget) = weak.upgrade() {
                            widget.set_buffer(&chain.apply(value.as_deref()));
                        }
                    })
                };

                // Widget → model, with redundancy and cycle suppression.
                let listener: ChangeListener = {
                    let weak = Rc::downgrade(&widget);
                    let slot = slot.clone();
                    let chain = formatters;
                    let scope = scope.clone();
                    Rc::new(move || {
                        let Some(widget) = weak.upgrade() else {
                            return;
                        };
                        let value = widget.buffer();
                        if value == chain.apply(slot.get().as_deref()) {
                            return;
                        }
                        let Some(_cycle) = scope.try_enter() else {
                            tracing::trace!(
                                target: "weft::editor",
                                "change dropped: evaluation cycle open"
                            );
                            return;
                        };
                        slot.set(Some(value));
                    })
                };
                widget.connect_changed(&listener);
                (true, Some(listener), Some(render))
            }
        };

        Self {
            widget,
            scope: scope.clone(),
            bound,
            change_listener,
            mode_watch,
            render,
            torn_down: false,
        }
    }

    /// The widget this session owns.
    #[must_use]
    pub fn widget(&self) -> &Rc<dyn EditorWidget> {
        &self.widget
    }

    /// The scope this session opens its evaluation cycles on.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Whether a model slot is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Detach the session, tearing it down now instead of at drop.
    pub fn detach(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        tracing::debug!(target: "weft::editor", "session detached");

        // Worker first, then the widget itself; the widget drops its own
        // listener ends, our subscription guards drop last.
        self.widget.stop_worker();
        self.widget.destroy();
        self.change_listener = None;
        self.mode_watch = None;
        self.render = None;
    }
}

impl Drop for EditorBinding {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for EditorBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBinding")
            .field("bound", &self.bound)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

fn apply_mode(widget: &dyn EditorWidget, mode: &str) {
    if mode.is_empty() || widget.mode() == mode {
        return;
    }
    widget.set_mode(mode);
}
