// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural-misuse errors.
//!
//! Lookups that find nothing are not errors and return `Option`. Dispatch
//! never fails: stale scheduling entries are skipped and logged.

use core::fmt;

use crate::id::{ComponentId, NodeId};

/// Errors from [`World`](crate::World) operations that mutate or query the
/// tree structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The node handle refers to a destroyed node.
    StaleNode(NodeId),
    /// The component handle refers to a removed component.
    StaleComponent(ComponentId),
    /// The operation needs a parent, but the node is a root.
    NoParent(NodeId),
    /// Attaching `node` under `parent` would make a node its own ancestor.
    WouldCycle {
        /// The node being moved.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(id) => write!(f, "stale node handle {id:?}"),
            Self::StaleComponent(id) => write!(f, "stale component handle {id:?}"),
            Self::NoParent(id) => write!(f, "node {id:?} has no parent"),
            Self::WouldCycle { node, parent } => {
                write!(f, "attaching {node:?} under {parent:?} would create a cycle")
            }
        }
    }
}

impl core::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_handle() {
        let err = TreeError::NoParent(NodeId::from_raw_parts(2, 0));
        assert_eq!(err.to_string(), "node NodeId(2@gen0) has no parent");
    }
}
