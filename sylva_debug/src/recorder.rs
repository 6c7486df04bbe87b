// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Handles are stored as their raw slot index and generation, so decoded
//! handles only mean something against the world that was recorded.

use sylva_core::id::{ComponentId, NodeId, Receiver};
use sylva_core::time::HostTime;
use sylva_core::trace::{
    DispatchBeginEvent, DispatchSummary, FocusCause, FocusChangeEvent, HoverChangeEvent,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, ReceiverSkippedEvent, SceneRefreshEvent,
    SkipReason, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_DISPATCH_BEGIN: u8 = 1;
const TAG_SCENE_REFRESH: u8 = 2;
const TAG_PHASE_BEGIN: u8 = 3;
const TAG_PHASE_END: u8 = 4;
const TAG_RECEIVER_SKIPPED: u8 = 5;
const TAG_DISPATCH_SUMMARY: u8 = 6;
const TAG_FOCUS_CHANGE: u8 = 7;
const TAG_HOVER_CHANGE: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, id: NodeId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_component(&mut self, id: ComponentId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_component(&mut self, id: Option<ComponentId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_component(id);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_receiver(&mut self, r: Receiver) {
        match r {
            Receiver::Node(id) => {
                self.write_u8(0);
                self.write_node(id);
            }
            Receiver::Component(id) => {
                self.write_u8(1);
                self.write_component(id);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Refresh => 0,
            PhaseKind::Update => 1,
            PhaseKind::Render => 2,
        });
    }

    fn write_skip_reason(&mut self, r: SkipReason) {
        self.write_u8(match r {
            SkipReason::Unregistered => 0,
            SkipReason::Destroyed => 1,
        });
    }

    fn write_cause(&mut self, c: FocusCause) {
        self.write_u8(match c {
            FocusCause::Pointer => 0,
            FocusCause::Keyboard => 1,
            FocusCause::Programmatic => 2,
            FocusCause::ProjectionMiss => 3,
            FocusCause::Stale => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_dispatch_begin(&mut self, e: &DispatchBeginEvent) {
        self.write_u8(TAG_DISPATCH_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_u32(e.scene_count);
    }

    fn on_scene_refresh(&mut self, e: &SceneRefreshEvent) {
        self.write_u8(TAG_SCENE_REFRESH);
        self.write_u64(e.frame_index);
        self.write_node(e.root);
        self.write_i32(e.priority);
        self.write_u32(e.receiver_count);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u32(e.invoked);
    }

    fn on_receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
        self.write_u8(TAG_RECEIVER_SKIPPED);
        self.write_u64(e.frame_index);
        self.write_receiver(e.receiver);
        self.write_skip_reason(e.reason);
    }

    fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
        self.write_u8(TAG_DISPATCH_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.scenes);
        self.write_u32(s.refreshed);
        self.write_u32(s.planned);
        self.write_u32(s.updated);
        self.write_u32(s.rendered);
        self.write_u32(s.skipped);
        self.write_u32(s.pruned);
    }

    fn on_focus_change(&mut self, e: &FocusChangeEvent) {
        self.write_u8(TAG_FOCUS_CHANGE);
        self.write_node(e.canvas);
        self.write_option_component(e.from);
        self.write_option_component(e.to);
        self.write_cause(e.cause);
    }

    fn on_hover_change(&mut self, e: &HoverChangeEvent) {
        self.write_u8(TAG_HOVER_CHANGE);
        self.write_node(e.canvas);
        self.write_option_component(e.from);
        self.write_option_component(e.to);
        self.write_u64(e.timestamp.ticks());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`DispatchBeginEvent`].
    DispatchBegin(DispatchBeginEvent),
    /// A [`SceneRefreshEvent`].
    SceneRefresh(SceneRefreshEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`ReceiverSkippedEvent`].
    ReceiverSkipped(ReceiverSkippedEvent),
    /// A [`DispatchSummary`].
    DispatchSummary(DispatchSummary),
    /// A [`FocusChangeEvent`].
    FocusChange(FocusChangeEvent),
    /// A [`HoverChangeEvent`].
    HoverChange(HoverChangeEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_node(&mut self) -> Option<NodeId> {
        Some(NodeId::from_raw_parts(self.read_u32()?, self.read_u32()?))
    }

    fn read_component(&mut self) -> Option<ComponentId> {
        Some(ComponentId::from_raw_parts(
            self.read_u32()?,
            self.read_u32()?,
        ))
    }

    fn read_option_component(&mut self) -> Option<Option<ComponentId>> {
        let present = self.read_u8()?;
        let id = self.read_component()?;
        Some((present != 0).then_some(id))
    }

    fn read_receiver(&mut self) -> Option<Receiver> {
        Some(match self.read_u8()? {
            0 => Receiver::Node(self.read_node()?),
            _ => Receiver::Component(self.read_component()?),
        })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Refresh,
            1 => PhaseKind::Update,
            _ => PhaseKind::Render,
        })
    }

    fn read_skip_reason(&mut self) -> Option<SkipReason> {
        Some(match self.read_u8()? {
            0 => SkipReason::Unregistered,
            _ => SkipReason::Destroyed,
        })
    }

    fn read_cause(&mut self) -> Option<FocusCause> {
        Some(match self.read_u8()? {
            0 => FocusCause::Pointer,
            1 => FocusCause::Keyboard,
            2 => FocusCause::Programmatic,
            3 => FocusCause::ProjectionMiss,
            _ => FocusCause::Stale,
        })
    }

    fn decode_dispatch_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DispatchBegin(DispatchBeginEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            scene_count: self.read_u32()?,
        }))
    }

    fn decode_scene_refresh(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SceneRefresh(SceneRefreshEvent {
            frame_index: self.read_u64()?,
            root: self.read_node()?,
            priority: self.read_i32()?,
            receiver_count: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            invoked: self.read_u32()?,
        }))
    }

    fn decode_receiver_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReceiverSkipped(ReceiverSkippedEvent {
            frame_index: self.read_u64()?,
            receiver: self.read_receiver()?,
            reason: self.read_skip_reason()?,
        }))
    }

    fn decode_dispatch_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DispatchSummary(DispatchSummary {
            frame_index: self.read_u64()?,
            scenes: self.read_u32()?,
            refreshed: self.read_u32()?,
            planned: self.read_u32()?,
            updated: self.read_u32()?,
            rendered: self.read_u32()?,
            skipped: self.read_u32()?,
            pruned: self.read_u32()?,
        }))
    }

    fn decode_focus_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FocusChange(FocusChangeEvent {
            canvas: self.read_node()?,
            from: self.read_option_component()?,
            to: self.read_option_component()?,
            cause: self.read_cause()?,
        }))
    }

    fn decode_hover_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::HoverChange(HoverChangeEvent {
            canvas: self.read_node()?,
            from: self.read_option_component()?,
            to: self.read_option_component()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_DISPATCH_BEGIN => self.decode_dispatch_begin(),
            TAG_SCENE_REFRESH => self.decode_scene_refresh(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_RECEIVER_SKIPPED => self.decode_receiver_skipped(),
            TAG_DISPATCH_SUMMARY => self.decode_dispatch_summary(),
            TAG_FOCUS_CHANGE => self.decode_focus_change(),
            TAG_HOVER_CHANGE => self.decode_hover_change(),
            _ => None, // unknown tag → stop iteration
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
            frame_index: 7,
            scenes: 3,
            refreshed: 1,
            planned: 12,
            updated: 9,
            rendered: 2,
            skipped: 1,
            pruned: 0,
        }
    }

    #[test]
    fn records_a_dispatch_pass_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_dispatch_begin(&DispatchBeginEvent {
            frame_index: 7,
            now: HostTime(112_000_000),
            scene_count: 3,
        });
        rec.on_scene_refresh(&SceneRefreshEvent {
            frame_index: 7,
            root: NodeId::from_raw_parts(4, 2),
            priority: -5,
            receiver_count: 6,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 7,
            phase: PhaseKind::Update,
            timestamp: HostTime(112_000_000),
        });
        rec.on_receiver_skipped(&ReceiverSkippedEvent {
            frame_index: 7,
            receiver: Receiver::Node(NodeId::from_raw_parts(9, 1)),
            reason: SkipReason::Unregistered,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 7,
            phase: PhaseKind::Update,
            invoked: 9,
        });
        rec.on_dispatch_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], RecordedEvent::DispatchBegin(_)));
        match &events[1] {
            RecordedEvent::SceneRefresh(e) => {
                assert_eq!(e.root, NodeId::from_raw_parts(4, 2));
                assert_eq!(e.priority, -5);
                assert_eq!(e.receiver_count, 6);
            }
            other => panic!("expected SceneRefresh, got {other:?}"),
        }
        assert!(matches!(events[2], RecordedEvent::PhaseBegin(_)));
        match &events[3] {
            RecordedEvent::ReceiverSkipped(e) => {
                assert_eq!(e.receiver, Receiver::Node(NodeId::from_raw_parts(9, 1)));
                assert_eq!(e.reason, SkipReason::Unregistered);
            }
            other => panic!("expected ReceiverSkipped, got {other:?}"),
        }
        match &events[4] {
            RecordedEvent::PhaseEnd(e) => {
                assert_eq!(e.phase, PhaseKind::Update);
                assert_eq!(e.invoked, 9);
            }
            other => panic!("expected PhaseEnd, got {other:?}"),
        }
        match &events[5] {
            RecordedEvent::DispatchSummary(s) => assert_eq!(*s, sample_summary()),
            other => panic!("expected DispatchSummary, got {other:?}"),
        }
    }

    #[test]
    fn focus_change_keeps_absent_endpoints() {
        let mut rec = RecorderSink::new();
        rec.on_focus_change(&FocusChangeEvent {
            canvas: NodeId::from_raw_parts(0, 0),
            from: Some(ComponentId::from_raw_parts(3, 1)),
            to: None,
            cause: FocusCause::ProjectionMiss,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::FocusChange(e) => {
                assert_eq!(e.from, Some(ComponentId::from_raw_parts(3, 1)));
                assert_eq!(e.to, None);
                assert_eq!(e.cause, FocusCause::ProjectionMiss);
            }
            other => panic!("expected FocusChange, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_dispatch_summary(&sample_summary());
        rec.on_hover_change(&HoverChangeEvent {
            canvas: NodeId::from_raw_parts(1, 0),
            from: None,
            to: Some(ComponentId::from_raw_parts(2, 0)),
            timestamp: HostTime(5_000),
        });
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], RecordedEvent::DispatchSummary(_)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let events: Vec<_> = decode(&[0xff, 1, 2, 3]).collect();
        assert!(events.is_empty());
    }
}
