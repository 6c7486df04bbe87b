// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph, per-frame update scheduling, and canvas input routing.
//!
//! `sylva_core` provides a tree of nodes with attached behaviors, a scheduler
//! that invokes those behaviors once per frame in a deterministic order, and a
//! router that turns raw pointer and key events into focus, hover, and press
//! callbacks. It is `no_std` compatible (with `alloc`) and uses array-based
//! struct-of-arrays storage with generational handles.
//!
//! # Architecture
//!
//! ```text
//!   host frame callback
//!       │
//!       ▼
//!   World::dispatch(dt) ──► refresh stale scenes ──► update phase ──► render phase
//!       ▲                        │
//!       │                        ▼
//!   tree edits ───────► SceneRegistry (root -> ordered receivers)
//!
//!   host pointer / key events ──► Canvas ──► Interactive callbacks
//! ```
//!
//! **[`node`]**: The [`World`] node tree. Creation, destruction, reparenting,
//! sibling order, activity propagation, and name lookup.
//!
//! **[`component`]**: The [`Behavior`](component::Behavior) trait, capability
//! flags, and components attached to nodes.
//!
//! **[`scheduler`]**: [`SceneRegistry`](scheduler::SceneRegistry), which
//! groups receivers by root, and [`World::dispatch`], the frame entry point.
//!
//! **[`dirty`]**: The activity channel used with `understory_dirty` to
//! propagate active-in-hierarchy flags through a subtree.
//!
//! **[`input`]**: [`Canvas`](input::Canvas), the per-subtree input router,
//! and the [`Interactive`](input::Interactive) trait its targets implement.
//!
//! **[`time`]**: Host timestamps and durations in nanosecond ticks.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! dispatch and input instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod component;
pub mod dirty;
pub mod error;
pub mod id;
pub mod input;
pub mod node;
pub mod scheduler;
pub mod time;
pub mod trace;

pub use error::TreeError;
pub use id::{ComponentId, INVALID, NodeId, Receiver};
pub use node::World;
