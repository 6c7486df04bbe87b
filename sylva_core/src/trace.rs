// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for dispatch and input routing.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! scheduler and the input router call at each stage. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Free-form diagnostics (stale entries skipped, invalid parents) go through
//! the `log` facade instead; these events are the structured record of a
//! frame.

use crate::id::{ComponentId, NodeId, Receiver};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a dispatch pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Lazy order recomputation for stale scenes.
    Refresh,
    /// `update` hooks, in scheduled order.
    Update,
    /// `render` hooks, in scheduled order.
    Render,
}

/// Why a planned receiver was not invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Removed from the registry after the plan was frozen.
    Unregistered,
    /// The node or component was destroyed after the plan was frozen.
    Destroyed,
}

/// What caused a focus transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusCause {
    /// A pointer press selected a new component.
    Pointer,
    /// Focus navigation key.
    Keyboard,
    /// [`Canvas::set_focus`](crate::input::Canvas::set_focus) or
    /// [`Canvas::clear_focus`](crate::input::Canvas::clear_focus).
    Programmatic,
    /// The off-screen surface projection reported no hit.
    ProjectionMiss,
    /// The focused component was destroyed or deactivated.
    Stale,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of [`World::dispatch`](crate::World::dispatch).
#[derive(Clone, Copy, Debug)]
pub struct DispatchBeginEvent {
    /// Monotonic dispatch counter.
    pub frame_index: u64,
    /// World clock after applying this frame's delta.
    pub now: HostTime,
    /// Scenes in the registry snapshot.
    pub scene_count: u32,
}

/// Emitted when a stale scene has its order recomputed.
#[derive(Clone, Copy, Debug)]
pub struct SceneRefreshEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Root node keying the scene.
    pub root: NodeId,
    /// Scene priority.
    pub priority: i32,
    /// Receivers registered by the refresh.
    pub receiver_count: u32,
}

/// Marks the beginning of a dispatch phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// World clock.
    pub timestamp: HostTime,
}

/// Marks the end of a dispatch phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Hooks invoked during the phase.
    pub invoked: u32,
}

/// Emitted for every planned receiver that was skipped.
#[derive(Clone, Copy, Debug)]
pub struct ReceiverSkippedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The receiver that was skipped.
    pub receiver: Receiver,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Per-dispatch summary, returned by
/// [`World::dispatch`](crate::World::dispatch) and emitted at its end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Scenes in the snapshot.
    pub scenes: u32,
    /// Scenes whose order was recomputed.
    pub refreshed: u32,
    /// Receivers in the frozen plan.
    pub planned: u32,
    /// `update` hooks invoked.
    pub updated: u32,
    /// `render` hooks invoked.
    pub rendered: u32,
    /// Planned receivers skipped as stale.
    pub skipped: u32,
    /// Empty scenes pruned after the pass.
    pub pruned: u32,
}

/// Emitted when an input router's focus changes.
#[derive(Clone, Copy, Debug)]
pub struct FocusChangeEvent {
    /// Canvas node of the router.
    pub canvas: NodeId,
    /// Previously focused component.
    pub from: Option<ComponentId>,
    /// Newly focused component.
    pub to: Option<ComponentId>,
    /// What caused the change.
    pub cause: FocusCause,
}

/// Emitted when an input router's hovered component changes.
#[derive(Clone, Copy, Debug)]
pub struct HoverChangeEvent {
    /// Canvas node of the router.
    pub canvas: NodeId,
    /// Previously hovered component.
    pub from: Option<ComponentId>,
    /// Newly hovered component.
    pub to: Option<ComponentId>,
    /// Time of the move that triggered the re-evaluation.
    pub timestamp: HostTime,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from dispatch and input routing.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a dispatch pass starts.
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        _ = e;
    }

    /// Called after a stale scene's order has been recomputed.
    fn on_scene_refresh(&mut self, e: &SceneRefreshEvent) {
        _ = e;
    }

    /// Called at the beginning of a dispatch phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a dispatch phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called for every planned receiver that was skipped.
    fn on_receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
        _ = e;
    }

    /// Called with the summary of a finished dispatch pass.
    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        _ = s;
    }

    /// Called when a router's focus changes.
    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        _ = e;
    }

    /// Called when a router's hovered component changes.
    fn on_hover_change(&mut self, e: &HoverChangeEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`DispatchBeginEvent`].
    #[inline]
    pub fn dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispatch_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SceneRefreshEvent`].
    #[inline]
    pub fn scene_refresh(&mut self, e: &SceneRefreshEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scene_refresh(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReceiverSkippedEvent`].
    #[inline]
    pub fn receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_receiver_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DispatchSummary`].
    #[inline]
    pub fn dispatch_summary(&mut self, s: &DispatchSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_dispatch_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`FocusChangeEvent`].
    #[inline]
    pub fn focus_change(&mut self, e: &FocusChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_focus_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`HoverChangeEvent`].
    #[inline]
    pub fn hover_change(&mut self, e: &HoverChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_hover_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> DispatchSummary {
        DispatchSummary {
            frame_index: 3,
            scenes: 2,
            refreshed: 1,
            planned: 4,
            updated: 4,
            rendered: 1,
            skipped: 0,
            pruned: 0,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_dispatch_begin(&DispatchBeginEvent {
            frame_index: 1,
            now: HostTime(0),
            scene_count: 0,
        });
        sink.on_dispatch_summary(&sample_summary());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.dispatch_summary(&sample_summary());
        tracer.phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Update,
            invoked: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
                self.frames.push(s.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.dispatch_summary(&sample_summary());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[3]);
    }
}
