// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, tree dumps, and Chrome trace export for sylva
//! diagnostics.
//!
//! This crate provides [`TraceSink`](sylva_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`dump::TreeDump`]: an indented snapshot of a node subtree.

pub mod chrome;
pub mod dump;
pub mod pretty;
pub mod recorder;
