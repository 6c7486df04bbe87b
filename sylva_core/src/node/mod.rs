// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is an entity in a scene tree. Each node has:
//!
//! - An identity ([`NodeId`](crate::NodeId)): a generational handle that
//!   becomes stale when the node is destroyed.
//! - A link: parent, first-child, and sibling indices forming an ordered tree.
//! - An optional node [`Behavior`](crate::component::Behavior) and an ordered
//!   list of components.
//! - Two activity flags: `active`, set by the caller, and
//!   `active_in_hierarchy`, derived as `active && parent.active_in_hierarchy`
//!   (a root's derived flag equals its own flag).
//!
//! Nodes live in the struct-of-arrays [`World`], which also owns component
//! storage and the [`SceneRegistry`](crate::scheduler::SceneRegistry). Each
//! distinct root keys one scene; structural changes that can alter the update
//! order invalidate that scene, and the next
//! [`dispatch`](World::dispatch) recomputes it.
//!
//! # Traversal order
//!
//! Forward traversal is depth-first: a node's components in attachment order,
//! then its children in child-list order. Reverse traversal visits children
//! last-to-first before the node's own components (also reversed), so the
//! most recently attached sibling, which is drawn on top, is tested first.

mod link;
mod traverse;
mod world;

pub use traverse::{Children, Descendants};
pub use world::World;
