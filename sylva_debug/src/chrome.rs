// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

const TID_DISPATCH: u32 = 0;
const TID_INPUT: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Events without their own timestamp (phase ends, skips, focus changes) are
/// placed at the most recent timestamp seen in the recording.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::DispatchBegin(e) => {
                last_ts = ticks_to_us(e.now.ticks());
                events.push(json!({
                    "ph": "i",
                    "name": "DispatchBegin",
                    "cat": "Scheduler",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "scene_count": e.scene_count,
                    }
                }));
            }
            RecordedEvent::SceneRefresh(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SceneRefresh",
                    "cat": "Scheduler",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "root": e.root.index(),
                        "priority": e.priority,
                        "receiver_count": e.receiver_count,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks());
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "args": {
                        "frame_index": e.frame_index,
                        "invoked": e.invoked,
                    }
                }));
            }
            RecordedEvent::ReceiverSkipped(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ReceiverSkipped",
                    "cat": "Scheduler",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "receiver": format!("{:?}", e.receiver),
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::DispatchSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "DispatchSummary",
                    "cat": "Summary",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_DISPATCH,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "scenes": s.scenes,
                        "refreshed": s.refreshed,
                        "planned": s.planned,
                        "updated": s.updated,
                        "rendered": s.rendered,
                        "skipped": s.skipped,
                        "pruned": s.pruned,
                    }
                }));
            }
            RecordedEvent::FocusChange(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FocusChange",
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "t",
                    "args": {
                        "canvas": e.canvas.index(),
                        "from": e.from.map(|c| c.index()),
                        "to": e.to.map(|c| c.index()),
                        "cause": format!("{:?}", e.cause),
                    }
                }));
            }
            RecordedEvent::HoverChange(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks());
                events.push(json!({
                    "ph": "i",
                    "name": "HoverChange",
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "t",
                    "args": {
                        "canvas": e.canvas.index(),
                        "from": e.from.map(|c| c.index()),
                        "to": e.to.map(|c| c.index()),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64) -> f64 {
    ticks as f64 / 1000.0
}
