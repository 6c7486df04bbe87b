// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Sylva uses [`understory_dirty`] to push hierarchy activity through the
//! node tree. Every attached node carries a dependency edge on its parent in
//! the [`ACTIVE`] channel.
//!
//! # Propagation semantics
//!
//! [`World::set_active`](crate::World::set_active) marks the node with
//! [`EagerPolicy`](understory_dirty::EagerPolicy), which marks every
//! descendant as well, and then drains the channel in dependency order so
//! that each parent's `active_in_hierarchy` is settled before its children
//! are recomputed. The drain happens before the setter returns; nothing is
//! left marked between calls.

use understory_dirty::Channel;

/// Activity intent changed; `active_in_hierarchy` must be recomputed for the
/// node, its components, and all descendants.
pub const ACTIVE: Channel = Channel::new(0);
