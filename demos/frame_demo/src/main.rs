// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame pump driving a small UI tree.
//!
//! Runs 60 synthetic frames through [`World::dispatch`], feeding pointer and
//! key events to a [`Canvas`] along the way. Trace events go to both a
//! [`PrettyPrintSink`] and a [`RecorderSink`]; the recording is exported as a
//! Chrome trace JSON file at the end.
//!
//! Set `RUST_LOG=debug` to see the behaviors' own log output.

use std::fs::File;
use std::io::{self, BufWriter};

use kurbo::{Point, Rect};
use sylva_core::component::{Behavior, Capabilities, Context};
use sylva_core::input::{
    Canvas, Interactive, KeyCode, KeyEvent, Modifiers, PointerButton, RouterConfig,
};
use sylva_core::time::{Duration, HostTime};
use sylva_core::trace::{
    DispatchBeginEvent, DispatchSummary, FocusChangeEvent, HoverChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, ReceiverSkippedEvent, SceneRefreshEvent, TraceSink, Tracer,
};
use sylva_core::{NodeId, World};
use sylva_debug::dump::TreeDump;
use sylva_debug::pretty::PrettyPrintSink;
use sylva_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 60;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// -- behaviors ----------------------------------------------------------------

/// Node behavior that turns a little every update.
#[derive(Default)]
struct Spinner {
    angle: f64,
}

impl Behavior for Spinner {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE
    }

    fn update(&mut self, _cx: &mut Context<'_>, dt: Duration) {
        self.angle = (self.angle + 90.0 * dt.as_secs_f64()) % 360.0;
    }

    fn on_hierarchy_changed(&mut self, cx: &mut Context<'_>, active: bool) {
        log::info!("spinner {:?} active={active} at {:.1}°", cx.node(), self.angle);
    }
}

/// Counts frames and reports every thirty.
#[derive(Default)]
struct FrameCounter {
    frames: u64,
}

impl Behavior for FrameCounter {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE_RENDER
    }

    fn update(&mut self, _cx: &mut Context<'_>, _dt: Duration) {
        self.frames += 1;
    }

    fn render(&mut self, cx: &mut Context<'_>) {
        if self.frames.is_multiple_of(30) {
            log::info!("{} frames at {:?}", self.frames, cx.clock());
        }
    }
}

/// A rectangular push button.
struct Button {
    bounds: Rect,
    presses: u32,
}

impl Button {
    fn new(bounds: Rect) -> Self {
        Self { bounds, presses: 0 }
    }
}

impl Behavior for Button {
    fn interactive(&self) -> Option<&dyn Interactive> {
        Some(self)
    }

    fn interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        Some(self)
    }

    fn on_destroy(&mut self, cx: &mut Context<'_>) {
        log::info!("button {:?} destroyed after {} presses", cx.node(), self.presses);
    }
}

impl Interactive for Button {
    fn hit_test(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    fn on_focus_enter(&mut self, cx: &mut Context<'_>) {
        log::info!("focus -> {}", cx.name(cx.node()).unwrap_or("?"));
    }

    fn on_pointer_enter(&mut self, cx: &mut Context<'_>) {
        log::debug!("hover -> {}", cx.name(cx.node()).unwrap_or("?"));
    }

    fn on_pointer_up(
        &mut self,
        cx: &mut Context<'_>,
        _point: Point,
        _button: PointerButton,
        still_over: bool,
    ) {
        if still_over {
            self.presses += 1;
            log::info!("{} pressed", cx.name(cx.node()).unwrap_or("?"));
        }
    }

    fn on_key(&mut self, cx: &mut Context<'_>, event: &KeyEvent) {
        if event.code == KeyCode::Enter {
            self.presses += 1;
            log::info!("{} activated by key", cx.name(cx.node()).unwrap_or("?"));
        }
    }
}

// -- sinks --------------------------------------------------------------------

/// Forwards every event to a pretty printer and a recorder.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Fanout {
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        self.pretty.on_dispatch_begin(e);
        self.recorder.on_dispatch_begin(e);
    }

    fn on_scene_refresh(&mut self, e: &SceneRefreshEvent) {
        self.pretty.on_scene_refresh(e);
        self.recorder.on_scene_refresh(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
        self.pretty.on_receiver_skipped(e);
        self.recorder.on_receiver_skipped(e);
    }

    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        self.pretty.on_dispatch_summary(s);
        self.recorder.on_dispatch_summary(s);
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        self.pretty.on_focus_change(e);
        self.recorder.on_focus_change(e);
    }

    fn on_hover_change(&mut self, e: &HoverChangeEvent) {
        self.pretty.on_hover_change(e);
        self.recorder.on_hover_change(e);
    }
}

// -- scene --------------------------------------------------------------------

struct Scene {
    canvas: Canvas,
    toolbar: NodeId,
    stop: NodeId,
}

fn build(world: &mut World) -> Scene {
    let canvas = Canvas::instantiate(world, None, RouterConfig::new());
    let ui = canvas.node();

    let toolbar = world.instantiate(Some(ui), Some("Toolbar"));
    let play = world.instantiate(Some(toolbar), Some("Play"));
    let stop = world.instantiate(Some(toolbar), Some("Stop"));
    for (node, x) in [(play, 0.0), (stop, 60.0)] {
        let button = Button::new(Rect::new(x, 0.0, x + 50.0, 30.0));
        if let Err(e) = world.add_component(node, button) {
            log::error!("failed to attach button: {e}");
        }
    }
    world.instantiate_with(Some(ui), Some("Spinner"), Spinner::default());

    let hud = world.instantiate_with(None, Some("Hud"), FrameCounter::default());
    // Runs before the UI scene each frame.
    world.registry_mut().set_scene_priority(hud, -1);

    Scene {
        canvas,
        toolbar,
        stop,
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world = World::new();
    let mut scene = build(&mut world);
    println!("{}", TreeDump::new(&world, scene.canvas.node()));

    let mut sink = Fanout {
        pretty: PrettyPrintSink::new(Box::new(io::stdout())),
        recorder: RecorderSink::new(),
    };

    for frame in 0..FRAME_COUNT {
        let mut tracer = Tracer::new(&mut sink);
        let now = world.clock();
        let canvas = &mut scene.canvas;

        match frame {
            10 => {
                let over_play = Point::new(20.0, 15.0);
                canvas.on_pointer_move(&mut world, &mut tracer, now, over_play);
                canvas.on_pointer_down(&mut world, &mut tracer, over_play, PointerButton::Primary);
                canvas.on_pointer_up(&mut world, &mut tracer, over_play, PointerButton::Primary);
            }
            20 => {
                canvas.on_key(&mut world, &mut tracer, &KeyEvent::pressed(KeyCode::Tab));
                canvas.on_key(&mut world, &mut tracer, &KeyEvent::pressed(KeyCode::Enter));
                let back = KeyEvent::pressed(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
                canvas.on_key(&mut world, &mut tracer, &back);
            }
            30 => {
                if let Err(e) = world.set_active(scene.toolbar, false) {
                    log::error!("{e}");
                }
                // Focus on a deactivated button is dropped on the next event.
                canvas.on_window_leave(&mut world, &mut tracer, now);
            }
            40 => {
                if let Err(e) = world.destroy(scene.stop) {
                    log::error!("{e}");
                }
            }
            45 => {
                if let Err(e) = world.set_active(scene.toolbar, true) {
                    log::error!("{e}");
                }
                canvas.on_key(&mut world, &mut tracer, &KeyEvent::pressed(KeyCode::Tab));
            }
            _ => {}
        }

        let summary = world.dispatch(FRAME_INTERVAL, &mut tracer);
        if summary.skipped > 0 {
            log::warn!("frame {frame}: {} stale receivers skipped", summary.skipped);
        }
    }

    println!("{}", TreeDump::new(&world, scene.canvas.node()));
    let elapsed = world.clock().saturating_duration_since(HostTime::default());
    log::info!("ran {FRAME_COUNT} frames, clock at {elapsed:?}");

    // -- export Chrome trace ---------------------------------------------------
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    sylva_debug::chrome::export(sink.recorder.as_bytes(), &mut writer)?;

    println!("Wrote {path} ({FRAME_COUNT} frames)");
    Ok(())
}
