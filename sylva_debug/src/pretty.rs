// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use sylva_core::id::{ComponentId, Receiver};
use sylva_core::time::HostTime;
use sylva_core::trace::{
    DispatchBeginEvent, DispatchSummary, FocusChangeEvent, HoverChangeEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ReceiverSkippedEvent, SceneRefreshEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn host_us(t: HostTime) -> f64 {
    t.ticks() as f64 / 1000.0
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Refresh => "refresh",
        PhaseKind::Update => "update",
        PhaseKind::Render => "render",
    }
}

fn receiver_label(r: Receiver) -> String {
    match r {
        Receiver::Node(n) => format!("node {}@{}", n.index(), n.generation()),
        Receiver::Component(c) => format!("comp {}@{}", c.index(), c.generation()),
    }
}

fn component_label(c: Option<ComponentId>) -> String {
    match c {
        Some(c) => format!("{}@{}", c.index(), c.generation()),
        None => "-".into(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[dispatch] frame={} now={:.1}µs scenes={}",
            e.frame_index,
            host_us(e.now),
            e.scene_count,
        );
    }

    fn on_scene_refresh(&mut self, e: &SceneRefreshEvent) {
        let _ = writeln!(
            self.writer,
            "[refresh] frame={} root={} priority={} receivers={}",
            e.frame_index,
            e.root.index(),
            e.priority,
            e.receiver_count,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} invoked={}",
            e.frame_index,
            phase_name(e.phase),
            e.invoked,
        );
    }

    fn on_receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] frame={} {} reason={:?}",
            e.frame_index,
            receiver_label(e.receiver),
            e.reason,
        );
    }

    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} scenes={} refreshed={} planned={} updated={} \
             rendered={} skipped={} pruned={}",
            s.frame_index,
            s.scenes,
            s.refreshed,
            s.planned,
            s.updated,
            s.rendered,
            s.skipped,
            s.pruned,
        );
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] canvas={} {} -> {} cause={:?}",
            e.canvas.index(),
            component_label(e.from),
            component_label(e.to),
            e.cause,
        );
    }

    fn on_hover_change(&mut self, e: &HoverChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[hover] canvas={} {} -> {} at {:.1}µs",
            e.canvas.index(),
            component_label(e.from),
            component_label(e.to),
            host_us(e.timestamp),
        );
    }
}
