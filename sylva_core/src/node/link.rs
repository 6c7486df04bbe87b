// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent/child links: queries, reparenting, and sibling order.

use crate::dirty;
use crate::error::TreeError;
use crate::id::{INVALID, NodeId};

use super::traverse::{Children, Descendants};
use super::world::World;

impl World {
    /// Returns the parent of a node, or `None` for a root.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.validate(id)?;
        let p = self.parent[id.idx as usize];
        Ok((p != INVALID).then(|| self.id_at(p)))
    }

    /// Follows parent links up to the first node without a parent.
    ///
    /// The root keys the scene a node is scheduled in.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn root(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.validate(id)?;
        Ok(self.root_at(id.idx))
    }

    /// Returns an iterator over the direct children of a node.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn children(&self, id: NodeId) -> Result<Children<'_>, TreeError> {
        self.validate(id)?;
        Ok(Children::new(self, self.first_child[id.idx as usize]))
    }

    /// Returns a pre-order iterator over every node below `id` (not
    /// including `id` itself).
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn descendants(&self, id: NodeId) -> Result<Descendants<'_>, TreeError> {
        self.validate(id)?;
        Ok(Descendants::new(self, id.idx))
    }

    /// Returns the number of direct children.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn child_count(&self, id: NodeId) -> Result<usize, TreeError> {
        Ok(self.children(id)?.count())
    }

    /// Returns the node's position among its siblings.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed;
    /// [`TreeError::NoParent`] for a root.
    pub fn sibling_index(&self, id: NodeId) -> Result<usize, TreeError> {
        self.validate(id)?;
        if self.parent[id.idx as usize] == INVALID {
            return Err(TreeError::NoParent(id));
        }
        let mut n = 0;
        let mut prev = self.prev_sibling[id.idx as usize];
        while prev != INVALID {
            n += 1;
            prev = self.prev_sibling[prev as usize];
        }
        Ok(n)
    }

    /// Moves `id` under `new_parent` (as its last child), or makes it a root.
    ///
    /// Hierarchy activity is recomputed for the moved subtree. If the subtree
    /// holds scheduled behaviors, the scenes of both the old and the new root
    /// are invalidated. Moving a node to the parent it already has does
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if either handle is stale;
    /// [`TreeError::WouldCycle`] if `new_parent` is `id` or one of its
    /// descendants.
    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        self.validate(id)?;
        if let Some(p) = new_parent {
            self.validate(p)?;
            if self.is_ancestor_or_self(id.idx, p.idx) {
                return Err(TreeError::WouldCycle {
                    node: id,
                    parent: p,
                });
            }
        }
        let c = id.idx;
        let old = self.parent[c as usize];
        let new = new_parent.map_or(INVALID, |p| p.idx);
        if old == new {
            return Ok(());
        }

        let had_receivers = self.contains_receivers_at(c);
        let old_root = self.root_at(c);

        if old != INVALID {
            self.unlink(c);
            self.dirty.remove_dependency(c, old, dirty::ACTIVE);
        }
        if new != INVALID {
            self.link_last(new, c);
            let _ = self.dirty.add_dependency(c, new, dirty::ACTIVE);
        }
        self.propagate_activity(c);

        if had_receivers && self.is_alive(id) {
            let new_root = self.root_at(c);
            self.registry.invalidate_scene_order(old_root);
            self.registry.invalidate_scene_order(new_root);
        }
        Ok(())
    }

    /// Moves a node to the front of its parent's child list.
    ///
    /// Sibling order is update and hit-test order, so the root's scene is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed;
    /// [`TreeError::NoParent`] for a root.
    pub fn set_as_first_sibling(&mut self, id: NodeId) -> Result<(), TreeError> {
        let p = self.require_parent(id)?;
        if self.prev_sibling[id.idx as usize] != INVALID {
            self.unlink(id.idx);
            self.link_first(p, id.idx);
        }
        let root = self.root_at(p);
        self.registry.invalidate_scene_order(root);
        Ok(())
    }

    /// Moves a node to the back of its parent's child list.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed;
    /// [`TreeError::NoParent`] for a root.
    pub fn set_as_last_sibling(&mut self, id: NodeId) -> Result<(), TreeError> {
        let p = self.require_parent(id)?;
        if self.next_sibling[id.idx as usize] != INVALID {
            self.unlink(id.idx);
            self.link_last(p, id.idx);
        }
        let root = self.root_at(p);
        self.registry.invalidate_scene_order(root);
        Ok(())
    }

    // -- Internal helpers --

    fn require_parent(&self, id: NodeId) -> Result<u32, TreeError> {
        self.validate(id)?;
        match self.parent[id.idx as usize] {
            INVALID => Err(TreeError::NoParent(id)),
            p => Ok(p),
        }
    }

    pub(crate) fn root_at(&self, mut idx: u32) -> NodeId {
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        self.id_at(idx)
    }

    /// Whether `ancestor` is `idx` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        loop {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
            if idx == INVALID {
                return false;
            }
        }
    }

    /// Appends `c` to `p`'s child list. Topology only.
    pub(crate) fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Prepends `c` to `p`'s child list. Topology only.
    fn link_first(&mut self, p: u32, c: u32) {
        let first = self.first_child[p as usize];
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = first;
        if first != INVALID {
            self.prev_sibling[first as usize] = c;
        }
        self.first_child[p as usize] = c;
    }

    /// Removes `idx` from its parent's child list. Topology only.
    pub(crate) fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::component::{Behavior, Capabilities};

    use super::*;

    struct Ticker;

    impl Behavior for Ticker {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATE
        }
    }

    fn kids(world: &World, id: NodeId) -> Vec<NodeId> {
        world.children(id).unwrap().collect()
    }

    #[test]
    fn children_in_insertion_order() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate(Some(root), None);
        let b = world.instantiate(Some(root), None);
        let c = world.instantiate(Some(root), None);

        assert_eq!(kids(&world, root), vec![a, b, c]);
        assert_eq!(world.parent(b).unwrap(), Some(root));
        assert_eq!(world.parent(root).unwrap(), None);
        assert_eq!(world.child_count(root).unwrap(), 3);
        assert_eq!(world.sibling_index(c).unwrap(), 2);
        assert_eq!(world.sibling_index(root), Err(TreeError::NoParent(root)));
    }

    #[test]
    fn root_follows_parent_chain() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let mid = world.instantiate(Some(root), None);
        let leaf = world.instantiate(Some(mid), None);
        assert_eq!(world.root(leaf).unwrap(), root);
        assert_eq!(world.root(root).unwrap(), root);
    }

    #[test]
    fn descendants_pre_order() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate(Some(root), None);
        let a1 = world.instantiate(Some(a), None);
        let a2 = world.instantiate(Some(a), None);
        let b = world.instantiate(Some(root), None);
        let b1 = world.instantiate(Some(b), None);

        let order: Vec<_> = world.descendants(root).unwrap().collect();
        assert_eq!(order, vec![a, a1, a2, b, b1]);
        let under_a: Vec<_> = world.descendants(a).unwrap().collect();
        assert_eq!(under_a, vec![a1, a2]);
        assert_eq!(world.descendants(b1).unwrap().count(), 0);
    }

    #[test]
    fn sibling_reorder() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate(Some(root), None);
        let b = world.instantiate(Some(root), None);
        let c = world.instantiate(Some(root), None);

        world.set_as_first_sibling(c).unwrap();
        assert_eq!(kids(&world, root), vec![c, a, b]);
        world.set_as_last_sibling(c).unwrap();
        assert_eq!(kids(&world, root), vec![a, b, c]);
        world.set_as_last_sibling(a).unwrap();
        assert_eq!(kids(&world, root), vec![b, c, a]);
        world.set_as_first_sibling(b).unwrap();
        assert_eq!(kids(&world, root), vec![b, c, a]);
    }

    #[test]
    fn sibling_reorder_on_root_errors() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        assert_eq!(world.set_as_first_sibling(root), Err(TreeError::NoParent(root)));
        assert_eq!(world.set_as_last_sibling(root), Err(TreeError::NoParent(root)));
    }

    #[test]
    fn sibling_reorder_invalidates_scene() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate(Some(root), None);
        world.instantiate(Some(root), None);
        world.registry_mut().set_scene_priority(root, 0);
        world.registry_mut().mark_valid(root);
        assert_eq!(world.registry().is_scene_valid(root), Some(true));

        world.set_as_last_sibling(a).unwrap();
        assert_eq!(world.registry().is_scene_valid(root), Some(false));
    }

    #[test]
    fn set_parent_moves_subtree() {
        let mut world = World::new();
        let r1 = world.instantiate(None, None);
        let r2 = world.instantiate(None, None);
        let n = world.instantiate(Some(r1), None);
        let leaf = world.instantiate(Some(n), None);

        world.set_parent(n, Some(r2)).unwrap();
        assert_eq!(kids(&world, r1), vec![]);
        assert_eq!(kids(&world, r2), vec![n]);
        assert_eq!(world.root(leaf).unwrap(), r2);

        world.set_parent(n, None).unwrap();
        assert_eq!(world.parent(n).unwrap(), None);
        assert_eq!(world.root(leaf).unwrap(), n);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate(Some(root), None);
        let b = world.instantiate(Some(a), None);

        assert_eq!(
            world.set_parent(a, Some(b)),
            Err(TreeError::WouldCycle { node: a, parent: b })
        );
        assert_eq!(
            world.set_parent(a, Some(a)),
            Err(TreeError::WouldCycle { node: a, parent: a })
        );
        assert_eq!(world.parent(a).unwrap(), Some(root));
    }

    #[test]
    fn set_parent_recomputes_activity() {
        let mut world = World::new();
        let off = world.instantiate(None, None);
        world.set_active(off, false).unwrap();
        let on = world.instantiate(None, None);
        let n = world.instantiate(Some(on), None);
        let leaf = world.instantiate(Some(n), None);

        world.set_parent(n, Some(off)).unwrap();
        assert!(!world.is_active_in_hierarchy(n).unwrap());
        assert!(!world.is_active_in_hierarchy(leaf).unwrap());

        world.set_parent(n, Some(on)).unwrap();
        assert!(world.is_active_in_hierarchy(leaf).unwrap());
    }

    #[test]
    fn set_parent_invalidates_both_scenes_when_scheduled() {
        let mut world = World::new();
        let r1 = world.instantiate(None, None);
        let r2 = world.instantiate(None, None);
        let n = world.instantiate(Some(r1), None);
        world.instantiate_with(Some(n), None, Ticker);
        world.registry_mut().set_scene_priority(r2, 0);
        world.registry_mut().mark_valid(r1);
        world.registry_mut().mark_valid(r2);

        world.set_parent(n, Some(r2)).unwrap();
        assert_eq!(world.registry().is_scene_valid(r1), Some(false));
        assert_eq!(world.registry().is_scene_valid(r2), Some(false));
    }
}
