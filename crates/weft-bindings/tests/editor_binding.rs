#![forbid(unsafe_code)]

//! Integration tests: the editor binding adapter against the scripted
//! reference widget.

use std::cell::Cell;
use std::rc::Rc;

use weft_bindings::{EditorBinding, EditorConfig, EditorWidget, FormatterChain, HostSurface};
use weft_harness::{RecordingFactory, ScriptedEditor};
use weft_reactive::{Observable, Scope};

type Slot = Observable<Option<String>>;

fn attach(config: EditorConfig) -> (EditorBinding, Rc<ScriptedEditor>, Scope) {
    let scope = Scope::root();
    let factory = RecordingFactory::new();
    let binding = EditorBinding::attach(&scope, &factory, &HostSurface::new(), config);
    let widget = factory.last().expect("factory must have created the widget");
    (binding, widget, scope)
}

fn write_counter(slot: &Slot) -> (Rc<Cell<u32>>, weft_reactive::Subscription) {
    let writes = Rc::new(Cell::new(0));
    let w = Rc::clone(&writes);
    let sub = slot.subscribe(move |_| w.set(w.get() + 1));
    (writes, sub)
}

// ============================================================================
// Round-trip idempotence
// ============================================================================

#[test]
fn model_value_round_trips_into_the_buffer() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));

    slot.set(Some("x".to_owned()));
    assert_eq!(editor.buffer(), "x");
}

#[test]
fn settled_change_notification_writes_nothing() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));

    slot.set(Some("x".to_owned()));
    let (writes, _sub) = write_counter(&slot);

    editor.fire_changed();
    assert_eq!(writes.get(), 0, "settled state must produce zero model writes");
    assert_eq!(slot.version(), 1);
}

// ============================================================================
// Loop suppression
// ============================================================================

#[test]
fn programmatic_write_propagates_exactly_once() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));
    let (writes, _sub) = write_counter(&slot);

    slot.set(Some("a".to_owned()));

    // The render path echoed into the widget, the widget notified, and the
    // adapter swallowed the echo: one write total, buffer in sync.
    assert_eq!(writes.get(), 1, "at most one propagation per distinct value");
    assert_eq!(editor.buffer(), "a");
    assert!(editor.set_buffer_calls() >= 1);
}

#[test]
fn user_edit_propagates_exactly_once() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));
    let (writes, _sub) = write_counter(&slot);

    editor.edit("typed by hand");

    assert_eq!(slot.get(), Some("typed by hand".to_owned()));
    assert_eq!(writes.get(), 1);
    assert_eq!(editor.buffer(), "typed by hand");
}

// ============================================================================
// Mode one-directionality
// ============================================================================

#[test]
fn mode_change_switches_the_widget() {
    let mode = Observable::new("text".to_owned());
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) =
        attach(EditorConfig::bound(slot).with_mode(mode.clone()));
    assert_eq!(editor.mode(), "text");

    mode.set("json".to_owned());
    assert_eq!(editor.mode(), "json");
}

#[test]
fn buffer_changes_never_alter_the_mode() {
    let mode = Observable::new("json".to_owned());
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) =
        attach(EditorConfig::bound(slot.clone()).with_mode(mode.clone()));

    editor.edit("{\"k\": 1}");
    slot.set(Some("plain now".to_owned()));

    assert_eq!(editor.mode(), "json");
    assert_eq!(mode.get(), "json", "the widget never reports its mode back");
}

#[test]
fn falsy_mode_keeps_the_previous_one() {
    let mode = Observable::new("rust".to_owned());
    let (_binding, editor, _scope) = attach(EditorConfig::unbound().with_mode(mode.clone()));

    mode.set(String::new());
    assert_eq!(editor.mode(), "rust");
}

// ============================================================================
// Null/undefined formatting
// ============================================================================

#[test]
fn absent_model_value_renders_as_empty_string() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));
    assert_eq!(editor.buffer(), "");

    slot.set(Some("something".to_owned()));
    slot.set(None);
    assert_eq!(editor.buffer(), "", "None must reach the widget as \"\"");
}

#[test]
fn formatter_links_run_after_the_coercion() {
    let slot: Slot = Observable::new(None);
    let chain = FormatterChain::new().with_link(|v| format!("// generated\n{v}"));
    let (_binding, editor, _scope) =
        attach(EditorConfig::bound(slot.clone()).with_formatters(chain));
    assert_eq!(editor.buffer(), "// generated\n");

    slot.set(Some("fn f() {}".to_owned()));
    assert_eq!(editor.buffer(), "// generated\nfn f() {}");
}

// ============================================================================
// Teardown resource release
// ============================================================================

#[test]
fn teardown_releases_worker_and_silences_changes() {
    let slot: Slot = Observable::new(None);
    let (binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));
    let (writes, _sub) = write_counter(&slot);
    assert!(editor.worker_running());

    drop(binding);

    assert!(!editor.worker_running(), "worker must not outlive the session");
    assert!(editor.is_destroyed());
    assert_eq!(editor.listener_count(), 0);

    editor.edit("posthumous keystroke");
    assert_eq!(writes.get(), 0);
    assert_eq!(slot.get(), None);
}

#[test]
fn explicit_detach_then_drop_tears_down_once() {
    let slot: Slot = Observable::new(None);
    let (binding, editor, _scope) = attach(EditorConfig::bound(slot));

    binding.detach();

    assert_eq!(editor.destroy_calls(), 1);
    assert_eq!(editor.stop_worker_calls(), 1);
}

#[test]
fn subscriptions_die_with_the_session() {
    let mode = Observable::new("text".to_owned());
    let slot: Slot = Observable::new(None);
    let (binding, _editor, _scope) =
        attach(EditorConfig::bound(slot.clone()).with_mode(mode.clone()));
    assert_eq!(slot.subscriber_count(), 1);
    assert_eq!(mode.subscriber_count(), 1);

    drop(binding);
    assert_eq!(slot.subscriber_count(), 0);
    assert_eq!(mode.subscriber_count(), 0);
}

// ============================================================================
// No-model no-op
// ============================================================================

#[test]
fn unbound_session_is_a_dumb_wrapper() {
    let (binding, editor, _scope) = attach(EditorConfig::unbound());
    assert!(!binding.is_bound());

    editor.edit("no model anywhere");
    assert_eq!(editor.buffer(), "no model anywhere");
    assert_eq!(editor.set_buffer_calls(), 0, "no render path may exist");

    drop(binding);
    assert!(editor.is_destroyed());
    assert!(!editor.worker_running());
}

// ============================================================================
// Dropped update on cycle collision
// ============================================================================

#[test]
fn change_during_open_cycle_is_dropped_not_queued() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, scope) = attach(EditorConfig::bound(slot.clone()));

    let guard = scope.try_enter().expect("no cycle open yet");
    editor.edit("while busy");
    assert_eq!(slot.get(), None, "colliding change must be dropped");
    drop(guard);

    // Nothing was queued: the model only catches up on the next trigger.
    assert_eq!(slot.get(), None);
    editor.fire_changed();
    assert_eq!(slot.get(), Some("while busy".to_owned()));
}

#[test]
fn ancestor_cycle_also_suppresses() {
    let root = Scope::root();
    let child = root.child();
    let factory = RecordingFactory::new();
    let slot: Slot = Observable::new(None);
    let _binding = EditorBinding::attach(
        &child,
        &factory,
        &HostSurface::new(),
        EditorConfig::bound(slot.clone()),
    );
    let editor = factory.last().unwrap();

    let _guard = root.try_enter().unwrap();
    editor.edit("under the ancestor");
    assert_eq!(slot.get(), None);
}

// ============================================================================
// Shared slot: the adapter is not the only writer
// ============================================================================

#[test]
fn foreign_writer_flows_through_like_any_other() {
    let slot: Slot = Observable::new(None);
    let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));

    // Another part of the application owns the slot too.
    let foreign = slot.clone();
    foreign.set(Some("from elsewhere".to_owned()));

    assert_eq!(editor.buffer(), "from elsewhere");
    assert_eq!(slot.version(), 1);
}

// ============================================================================
// Property: suppression holds for arbitrary values
// ============================================================================

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_distinct_model_write_lands_once(values in proptest::collection::vec("\\PC{0,16}", 1..16)) {
            let slot: Slot = Observable::new(None);
            let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));
            let (writes, _sub) = write_counter(&slot);

            let mut expected = 0;
            let mut current: Option<String> = None;
            for v in values {
                let next = Some(v.clone());
                if next != current {
                    expected += 1;
                    current = next.clone();
                }
                slot.set(next);
                prop_assert_eq!(editor.buffer(), v);
            }
            prop_assert_eq!(writes.get(), expected, "echoes must never double-write");
        }

        #[test]
        fn user_edits_round_trip(values in proptest::collection::vec("\\PC{1,16}", 1..16)) {
            let slot: Slot = Observable::new(None);
            let (_binding, editor, _scope) = attach(EditorConfig::bound(slot.clone()));

            for v in values {
                editor.edit(&v);
                prop_assert_eq!(slot.get(), Some(v.clone()));
                prop_assert_eq!(editor.buffer(), v);
            }
        }
    }
}
