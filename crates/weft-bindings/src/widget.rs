#![forbid(unsafe_code)]

//! The widget boundary: what an editor widget must look like to Weft.
//!
//! The binding layer never resolves a widget implementation from ambient
//! state. It receives an [`EditorFactory`] capability at construction time
//! and calls [`EditorFactory::create`] with the [`HostSurface`] it is being
//! attached to. Everything the adapter does afterwards goes through the
//! [`EditorWidget`] trait object the factory returned.
//!
//! # Contract
//!
//! An `EditorWidget` implementation must guarantee:
//!
//! - `set_buffer` / `set_mode` take effect synchronously; `buffer` / `mode`
//!   observe the latest write.
//! - Change listeners registered via [`EditorWidget::connect_changed`] are
//!   stored **weakly**: the caller keeps the strong [`ChangeListener`]
//!   reference, and dropping it is a valid way to disconnect.
//! - [`EditorWidget::stop_worker`] halts any internal background task
//!   (linting, analysis) synchronously.
//! - [`EditorWidget::destroy`] releases the buffer, cursor state, and
//!   host-surface resources, and drops all registered change listeners,
//!   synchronously. No listener may fire afterwards.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A change-notification callback, owned strongly by the registrar.
///
/// Widgets hold these weakly; see the module docs.
pub type ChangeListener = Rc<dyn Fn()>;

/// Global counter for unique surface IDs.
static SURFACE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        Self(SURFACE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// The attachment point a widget is created on.
///
/// Opaque to the binding layer; the factory knows what to do with it.
#[derive(Debug)]
pub struct HostSurface {
    id: SurfaceId,
}

impl HostSurface {
    /// Allocate a fresh surface.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SurfaceId::next(),
        }
    }

    /// This surface's unique id.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }
}

impl Default for HostSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// The external, stateful text/code-editing component.
///
/// The widget owns its internal buffer and is the authoritative source of
/// what the user is currently seeing; the adapter only mediates between it
/// and the reactive model.
pub trait EditorWidget {
    /// Current buffer content.
    fn buffer(&self) -> String;

    /// Replace the buffer content.
    fn set_buffer(&self, text: &str);

    /// Current syntax/highlighting mode identifier.
    fn mode(&self) -> String;

    /// Switch the highlighting mode. A mode the widget does not recognize
    /// is its problem to no-op or fall back on; the adapter does not check.
    fn set_mode(&self, mode: &str);

    /// Register a change listener for internal buffer changes.
    ///
    /// The widget stores the listener weakly; the caller must keep the
    /// strong reference alive for as long as it wants notifications.
    fn connect_changed(&self, listener: &ChangeListener);

    /// Halt the widget's internal background worker, if any.
    fn stop_worker(&self);

    /// Destroy the widget: release buffer, cursor state, and surface
    /// resources, and drop all change listeners. Synchronous.
    fn destroy(&self);
}

/// The injected capability that creates widgets on host surfaces.
pub trait EditorFactory {
    /// Create a widget instance on `surface`.
    fn create(&self, surface: &HostSurface) -> Rc<dyn EditorWidget>;
}
