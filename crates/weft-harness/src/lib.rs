#![forbid(unsafe_code)]

//! Test harness and reference fixtures for Weft.
//!
//! [`ScriptedEditor`] is an in-memory [`EditorWidget`] with the full
//! collaborator contract: a buffer, a mode, synchronous weakly-held change
//! listeners, and a background worker that starts with the widget and stops
//! only when told to. Tests drive it like a user ([`ScriptedEditor::edit`])
//! or like a flaky widget internals layer
//! ([`ScriptedEditor::fire_changed`]), and inspect call counters to pin
//! down exactly what a binding did.
//!
//! [`RecordingFactory`] implements [`EditorFactory`] and keeps every widget
//! it created, so a test can reach the concrete fixture behind the trait
//! object a binding holds.
//!
//! # Fixture semantics
//!
//! - `set_buffer` fires change listeners even for a programmatic write and
//!   even when the text is unchanged — the worst-case widget the adapter's
//!   guards must survive.
//! - `destroy` drops all listeners and marks the widget dead; `edit` /
//!   `fire_changed` on a dead widget reach nobody (they do not panic, so a
//!   test can prove post-teardown silence).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use weft_bindings::{ChangeListener, EditorFactory, EditorWidget, HostSurface, SurfaceId};

/// Scriptable in-memory editor widget.
pub struct ScriptedEditor {
    surface: SurfaceId,
    buffer: RefCell<String>,
    mode: RefCell<String>,
    listeners: RefCell<Vec<Weak<dyn Fn()>>>,
    worker_running: Cell<bool>,
    destroyed: Cell<bool>,
    set_buffer_calls: Cell<u32>,
    set_mode_calls: Cell<u32>,
    stop_worker_calls: Cell<u32>,
    destroy_calls: Cell<u32>,
}

impl ScriptedEditor {
    /// Create a widget on `surface`, background worker running.
    #[must_use]
    pub fn new(surface: &HostSurface) -> Rc<Self> {
        tracing::trace!(target: "weft::harness", surface = %surface.id(), "widget created");
        Rc::new(Self {
            surface: surface.id(),
            buffer: RefCell::new(String::new()),
            mode: RefCell::new(String::new()),
            listeners: RefCell::new(Vec::new()),
            worker_running: Cell::new(true),
            destroyed: Cell::new(false),
            set_buffer_calls: Cell::new(0),
            set_mode_calls: Cell::new(0),
            stop_worker_calls: Cell::new(0),
            destroy_calls: Cell::new(0),
        })
    }

    /// Simulate a user keystroke: replace the buffer, notify listeners.
    pub fn edit(&self, text: &str) {
        *self.buffer.borrow_mut() = text.to_owned();
        self.fire_changed();
    }

    /// Fire the change listeners without touching the buffer.
    pub fn fire_changed(&self) {
        let live: Vec<Rc<dyn Fn()>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener();
        }
    }

    /// The surface this widget was created on.
    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Whether the background worker is still running.
    #[must_use]
    pub fn worker_running(&self) -> bool {
        self.worker_running.get()
    }

    /// Whether `destroy` has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Number of live change listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Number of `set_buffer` calls received.
    #[must_use]
    pub fn set_buffer_calls(&self) -> u32 {
        self.set_buffer_calls.get()
    }

    /// Number of `set_mode` calls received.
    #[must_use]
    pub fn set_mode_calls(&self) -> u32 {
        self.set_mode_calls.get()
    }

    /// Number of `stop_worker` calls received.
    #[must_use]
    pub fn stop_worker_calls(&self) -> u32 {
        self.stop_worker_calls.get()
    }

    /// Number of `destroy` calls received.
    #[must_use]
    pub fn destroy_calls(&self) -> u32 {
        self.destroy_calls.get()
    }
}

impl EditorWidget for ScriptedEditor {
    fn buffer(&self) -> String {
        self.buffer.borrow().clone()
    }

    fn set_buffer(&self, text: &str) {
        self.set_buffer_calls.set(self.set_buffer_calls.get() + 1);
        *self.buffer.borrow_mut() = text.to_owned();
        // Real editor sessions notify on programmatic writes too.
        self.fire_changed();
    }

    fn mode(&self) -> String {
        self.mode.borrow().clone()
    }

    fn set_mode(&self, mode: &str) {
        self.set_mode_calls.set(self.set_mode_calls.get() + 1);
        *self.mode.borrow_mut() = mode.to_owned();
    }

    fn connect_changed(&self, listener: &ChangeListener) {
        self.listeners.borrow_mut().push(Rc::downgrade(listener));
    }

    fn stop_worker(&self) {
        self.stop_worker_calls.set(self.stop_worker_calls.get() + 1);
        self.worker_running.set(false);
    }

    fn destroy(&self) {
        self.destroy_calls.set(self.destroy_calls.get() + 1);
        self.destroyed.set(true);
        self.listeners.borrow_mut().clear();
    }
}

/// Factory that records every widget it creates.
#[derive(Default)]
pub struct RecordingFactory {
    created: RefCell<Vec<Rc<ScriptedEditor>>>,
}

impl RecordingFactory {
    /// An empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All widgets created so far, in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<Rc<ScriptedEditor>> {
        self.created.borrow().clone()
    }

    /// The most recently created widget.
    #[must_use]
    pub fn last(&self) -> Option<Rc<ScriptedEditor>> {
        self.created.borrow().last().cloned()
    }
}

impl EditorFactory for RecordingFactory {
    fn create(&self, surface: &HostSurface) -> Rc<dyn EditorWidget> {
        let widget = ScriptedEditor::new(surface);
        self.created.borrow_mut().push(Rc::clone(&widget));
        widget
    }
}
