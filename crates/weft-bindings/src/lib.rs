#![forbid(unsafe_code)]

//! View-binding glue for Weft.
//!
//! The centerpiece is the [`EditorBinding`] adapter: it owns the lifecycle
//! of one external editor widget bound to one reactive model slot and
//! mediates all value flow between them — model writes render into the
//! widget through a [`FormatterChain`], widget edits relay back to the
//! model behind redundancy and evaluation-cycle guards, and a mode
//! observable drives the widget's syntax highlighting one-directionally.
//! Teardown is exactly-once and synchronous, releasing the widget's
//! background worker along with everything else.
//!
//! Around it sit the small glue behaviors that share the same reactive
//! layer: a version label ([`VersionLabel`]), tab activation and
//! default-pane selection ([`TabStrip`]), and a grouped-button radio
//! control ([`ButtonGroup`]).
//!
//! Widgets are reached only through the [`EditorWidget`] trait, created by
//! an injected [`EditorFactory`] — never resolved from ambient state.

pub mod buttons;
pub mod editor;
pub mod format;
pub mod tabs;
pub mod version;
pub mod widget;

pub use buttons::ButtonGroup;
pub use editor::{EditorBinding, EditorConfig, ModelBinding};
pub use format::{FormatterChain, FormatterFn};
pub use tabs::TabStrip;
pub use version::{VERSION, VersionLabel};
pub use widget::{ChangeListener, EditorFactory, EditorWidget, HostSurface, SurfaceId};
