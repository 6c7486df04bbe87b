// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented snapshots of a node subtree.
//!
//! [`TreeDump`] borrows a [`World`] and formats the subtree under one node,
//! one line per node and per component:
//!
//! ```text
//! Canvas
//!   Panel (inactive)
//!     Ok <Button> (inactive in hierarchy)
//!       - Label
//! ```

use std::fmt;

use sylva_core::{NodeId, World};

/// Formats the subtree rooted at a node.
#[derive(Debug, Clone, Copy)]
pub struct TreeDump<'a> {
    world: &'a World,
    root: NodeId,
}

impl<'a> TreeDump<'a> {
    /// Dumps the subtree rooted at `root`.
    #[must_use]
    pub fn new(world: &'a World, root: NodeId) -> Self {
        Self { world, root }
    }

    /// Writes every root of the world, in creation slot order.
    pub fn all(world: &World, f: &mut impl fmt::Write) -> fmt::Result {
        for root in world.roots() {
            write!(f, "{}", TreeDump::new(world, root))?;
        }
        Ok(())
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let world = self.world;
        let indent = depth * 2;
        let Ok(name) = world.name(id) else {
            return writeln!(f, "{:indent$}<stale {id:?}>", "");
        };
        write!(f, "{:indent$}{name}", "")?;
        if let Ok(Some(tag)) = world.type_tag(id)
            && tag != name
        {
            write!(f, " <{tag}>")?;
        }
        if world.is_active(id) == Ok(false) {
            f.write_str(" (inactive)")?;
        } else if world.is_active_in_hierarchy(id) == Ok(false) {
            f.write_str(" (inactive in hierarchy)")?;
        }
        writeln!(f)?;

        for &c in world.components(id).unwrap_or_default() {
            let type_name = world.component_type_name(c).unwrap_or("?");
            write!(f, "{:w$}- {type_name}", "", w = indent + 2)?;
            if world.is_component_active(c) == Ok(false) {
                f.write_str(" (disabled)")?;
            }
            writeln!(f)?;
        }

        if let Ok(children) = world.children(id) {
            for child in children {
                self.write_node(f, child, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sylva_core::component::Behavior;

    struct Button;
    impl Behavior for Button {}

    struct Label;
    impl Behavior for Label {}

    #[test]
    fn dumps_names_tags_and_activity() {
        let mut world = World::new();
        let canvas = world.instantiate(None, Some("Canvas"));
        let panel = world.instantiate(Some(canvas), Some("Panel"));
        let ok = world.instantiate_with(Some(panel), Some("Ok"), Button);
        world.add_component(ok, Label).unwrap();
        let hidden = world.add_component(ok, Label).unwrap();
        world.set_component_active(hidden, false).unwrap();
        world.set_active(panel, false).unwrap();

        let dump = TreeDump::new(&world, canvas).to_string();
        assert_eq!(
            dump,
            "Canvas\n  \
             Panel (inactive)\n    \
             Ok <Button> (inactive in hierarchy)\n      \
             - Label\n      \
             - Label (disabled)\n"
        );
    }

    #[test]
    fn tag_matching_name_is_not_repeated() {
        let mut world = World::new();
        let root = world.instantiate_with(None, None, Button);
        assert_eq!(TreeDump::new(&world, root).to_string(), "Button\n");
    }

    #[test]
    fn stale_root_is_marked() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        world.destroy(root).unwrap();
        let dump = TreeDump::new(&world, root).to_string();
        assert!(dump.starts_with("<stale NodeId("), "got: {dump}");
    }

    #[test]
    fn all_writes_every_root() {
        let mut world = World::new();
        world.instantiate(None, Some("A"));
        world.instantiate(None, Some("B"));
        let mut out = String::new();
        TreeDump::all(&world, &mut out).unwrap();
        assert_eq!(out, "A\nB\n");
    }
}
