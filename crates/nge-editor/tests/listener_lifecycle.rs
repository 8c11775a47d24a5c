//! Integration tests: host listener lifecycle (nge-editor).
//!
//! A fake host applies `AttachListener` / `DetachListener` effects and fails
//! on any double attach or stray detach. Every scenario ends with zero live
//! listeners, whether the gesture completed or was torn down mid-way.

use nge_core::{NodeId, NodeType, NodeTypeId, NodeTypeRegistry, Point, Rect, StageConfig};
use nge_core::{StageViewState, SurfaceRect};
use nge_editor::listeners::Listener;
use nge_editor::{Effect, Key, Modifiers, MouseButtons, Node, NodeProps, PointerInput, Stage};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct FakeHost {
    live: HashMap<Listener, usize>,
    attached: usize,
    detached: usize,
}

impl FakeHost {
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AttachListener(l) => {
                    let count = self.live.entry(l).or_default();
                    assert_eq!(*count, 0, "{l:?} attached twice");
                    *count += 1;
                    self.attached += 1;
                }
                Effect::DetachListener(l) => {
                    let count = self.live.get_mut(&l).unwrap_or_else(|| {
                        panic!("{l:?} detached but never attached");
                    });
                    assert_eq!(*count, 1, "{l:?} detached twice");
                    *count = 0;
                    self.live.remove(&l);
                    self.detached += 1;
                }
                _ => {}
            }
        }
    }

    fn live_count(&self) -> usize {
        self.live.len()
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> Rc<NodeTypeRegistry> {
    Rc::new([NodeType::new("number", "Number")].into_iter().collect())
}

fn surface() -> SurfaceRect {
    SurfaceRect::from_client_rect(0.0, 0.0, 800.0, 600.0)
}

fn mouse(x: f64, y: f64) -> PointerInput {
    PointerInput::mouse(x, y, MouseButtons::PRIMARY)
}

fn middle(x: f64, y: f64) -> PointerInput {
    PointerInput::mouse(x, y, MouseButtons::MIDDLE)
}

// ─── Stage ───────────────────────────────────────────────────────────────

#[test]
fn completed_stage_gestures_release_their_listeners() {
    init_logger();
    let mut host = FakeHost::default();
    let mut stage = Stage::new(StageConfig::default(), registry(), StageViewState::default());
    host.apply(stage.mount(surface()));
    let baseline = host.live_count();
    assert_eq!(baseline, 2);

    // Click (delay phase only).
    host.apply(stage.pointer_down(&mouse(10.0, 10.0)));
    assert_eq!(host.live_count(), baseline + 2);
    host.apply(stage.pointer_up(&mouse(10.0, 10.0)));
    assert_eq!(host.live_count(), baseline);

    // Selection drag.
    host.apply(stage.pointer_down(&mouse(10.0, 10.0)));
    host.apply(stage.pointer_move(&mouse(30.0, 30.0)));
    host.apply(stage.pointer_move(&mouse(60.0, 10.0)));
    assert_eq!(host.live_count(), baseline + 2);
    host.apply(stage.pointer_up(&mouse(60.0, 10.0)));
    assert_eq!(host.live_count(), baseline);

    // Pan drag.
    host.apply(stage.pointer_down(&middle(10.0, 10.0)));
    host.apply(stage.pointer_move(&middle(50.0, 10.0)));
    host.apply(stage.pointer_up(&middle(70.0, 10.0)));
    assert_eq!(host.live_count(), baseline);

    host.apply(stage.unmount());
    assert_eq!(host.live_count(), 0);
    assert_eq!(host.attached, host.detached);
}

#[test]
fn unmount_mid_drag_releases_everything() {
    init_logger();
    let config = StageConfig {
        space_to_pan: true,
        ..StageConfig::default()
    };
    let mut host = FakeHost::default();
    let mut stage = Stage::new(config, registry(), StageViewState::default());
    host.apply(stage.mount(surface()));
    stage.set_focused(true);

    host.apply(stage.key_down(Key::Space));
    host.apply(stage.pointer_down(&mouse(0.0, 0.0).with_modifiers(Modifiers::ALT)));
    host.apply(stage.pointer_move(&mouse(40.0, 0.0).with_modifiers(Modifiers::ALT)));
    assert!(stage.session().is_some());
    // resize + wheel + keyup + window move/up
    assert_eq!(host.live_count(), 5);

    let teardown = stage.unmount();
    assert!(
        !teardown.iter().any(|e| matches!(e, Effect::Stage(_))),
        "unmount must not commit an unfinished pan"
    );
    host.apply(teardown);
    assert_eq!(host.live_count(), 0);
    assert_eq!(host.attached, host.detached);
    assert!(stage.active_listeners().is_empty());
}

#[test]
fn unmount_while_delaying_releases_document_listeners() {
    let mut host = FakeHost::default();
    let mut stage = Stage::new(StageConfig::default(), registry(), StageViewState::default());
    host.apply(stage.mount(surface()));
    host.apply(stage.pointer_down(&PointerInput::touch(5.0, 5.0)));
    assert_eq!(host.live_count(), 4);
    host.apply(stage.unmount());
    assert_eq!(host.live_count(), 0);
}

// ─── Node ────────────────────────────────────────────────────────────────

fn node() -> Node {
    let props = NodeProps::new(
        NodeId::intern("lifecycle"),
        NodeTypeId::intern("number"),
        Point::new(0.0, 0.0),
    );
    Node::new(props, &registry()).unwrap()
}

#[test]
fn node_drag_and_unmount_are_balanced() {
    init_logger();
    let mut host = FakeHost::default();
    let bounds = Rect::new(0.0, 0.0, 200.0, 60.0);

    let mut n = node();
    host.apply(n.pointer_down(&mouse(5.0, 5.0), bounds));
    host.apply(n.pointer_move(&mouse(25.0, 5.0), &surface()));
    host.apply(n.pointer_up(&mouse(25.0, 5.0)));
    assert_eq!(host.live_count(), 0);

    host.apply(n.pointer_down(&mouse(5.0, 5.0), bounds));
    host.apply(n.pointer_move(&mouse(25.0, 5.0), &surface()));
    assert_eq!(host.live_count(), 2);
    host.apply(n.unmount());
    assert_eq!(host.live_count(), 0);
    assert_eq!(host.attached, host.detached);
}

// ─── Arbitrary event streams ─────────────────────────────────────────────

/// Small deterministic generator so the stream is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn coord(&mut self) -> f64 {
        (self.next() % 400) as f64
    }
}

#[test]
fn arbitrary_event_streams_never_leak() {
    init_logger();
    for seed in 1..=25u64 {
        let mut rng = Lcg(seed);
        let mut host = FakeHost::default();
        let config = StageConfig {
            space_to_pan: seed % 3 == 0,
            disable_pan: seed % 5 == 0,
            ..StageConfig::default()
        };
        let mut stage = Stage::new(config, registry(), StageViewState::default());
        let mut n = node();
        host.apply(stage.mount(surface()));
        stage.set_focused(true);

        for _ in 0..200 {
            let (x, y) = (rng.coord(), rng.coord());
            let buttons = if rng.next() % 4 == 0 {
                MouseButtons::MIDDLE
            } else {
                MouseButtons::PRIMARY
            };
            let input = PointerInput::mouse(x, y, buttons);
            match rng.next() % 9 {
                0 => host.apply(stage.pointer_down(&input)),
                1 | 2 => host.apply(stage.pointer_move(&input)),
                3 => host.apply(stage.pointer_up(&input)),
                4 => host.apply(stage.key_down(Key::Space)),
                5 => host.apply(stage.key_up(Key::Space)),
                6 => host.apply(n.pointer_down(&input, Rect::new(0.0, 0.0, 100.0, 40.0))),
                7 => host.apply(n.pointer_move(&input, stage.surface())),
                _ => host.apply(n.pointer_up(&input)),
            }
        }

        host.apply(stage.unmount());
        host.apply(n.unmount());
        assert_eq!(host.live_count(), 0, "seed {seed} leaked listeners");
        assert_eq!(host.attached, host.detached, "seed {seed}");
    }
}
