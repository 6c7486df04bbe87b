// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal: iterators, component search, and update-order assignment.

use alloc::vec::Vec;

use crate::error::TreeError;
use crate::id::{ComponentId, INVALID, NodeId, Receiver};

use super::world::World;

/// An iterator over the direct children of a node.
///
/// Created by [`World::children`].
#[derive(Debug)]
pub struct Children<'a> {
    world: &'a World,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(world: &'a World, first: u32) -> Self {
        Self {
            world,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.world.next_sibling[idx as usize];
        Some(self.world.id_at(idx))
    }
}

/// A depth-first pre-order iterator over the nodes below a node.
///
/// Created by [`World::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    world: &'a World,
    top: u32,
    current: u32,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(world: &'a World, top: u32) -> Self {
        Self {
            world,
            top,
            current: world.first_child[top as usize],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let w = self.world;
        let idx = self.current;

        // Advance: down, else right, else up until a right turn exists.
        self.current = match w.first_child[idx as usize] {
            INVALID => w.next_outside(idx, self.top),
            child => child,
        };
        Some(w.id_at(idx))
    }
}

impl World {
    /// Visits every component below `start` in forward traversal order until
    /// `pred` returns `true`.
    ///
    /// Forward order is: a node's components in attachment order, then its
    /// children in child-list order, recursively. With `test_activity`,
    /// subtrees that are not active in hierarchy are skipped entirely, as
    /// are inactive components.
    ///
    /// Returns whether `pred` matched. A stale `start` matches nothing.
    pub fn for_each_component(
        &self,
        start: NodeId,
        test_activity: bool,
        mut pred: impl FnMut(ComponentId) -> bool,
    ) -> bool {
        self.is_alive(start) && self.visit_forward(start.idx, test_activity, &mut pred)
    }

    /// Like [`for_each_component`](Self::for_each_component), in reverse
    /// order: children last-to-first, then the node's own components
    /// last-to-first. The topmost drawn component comes first, which is what
    /// hit-testing wants.
    pub fn for_each_component_rev(
        &self,
        start: NodeId,
        test_activity: bool,
        mut pred: impl FnMut(ComponentId) -> bool,
    ) -> bool {
        self.is_alive(start) && self.visit_reverse(start.idx, test_activity, &mut pred)
    }

    /// Returns the first component in forward order satisfying `pred`.
    #[must_use]
    pub fn find_component(
        &self,
        start: NodeId,
        test_activity: bool,
        mut pred: impl FnMut(ComponentId) -> bool,
    ) -> Option<ComponentId> {
        let mut found = None;
        self.for_each_component(start, test_activity, |c| {
            let hit = pred(c);
            if hit {
                found = Some(c);
            }
            hit
        });
        found
    }

    /// Returns the first component in reverse order satisfying `pred`.
    #[must_use]
    pub fn find_component_rev(
        &self,
        start: NodeId,
        test_activity: bool,
        mut pred: impl FnMut(ComponentId) -> bool,
    ) -> Option<ComponentId> {
        let mut found = None;
        self.for_each_component_rev(start, test_activity, |c| {
            let hit = pred(c);
            if hit {
                found = Some(c);
            }
            hit
        });
        found
    }

    /// Pre-order walk from `top`, skipping inactive subtrees when asked.
    fn visit_forward(
        &self,
        top: u32,
        test_activity: bool,
        pred: &mut dyn FnMut(ComponentId) -> bool,
    ) -> bool {
        let mut idx = top;
        loop {
            let enter = !test_activity || self.active_in_hierarchy[idx as usize];
            if enter && self.visit_own(idx, test_activity, false, pred) {
                return true;
            }
            let child = if enter {
                self.first_child[idx as usize]
            } else {
                INVALID
            };
            idx = match child {
                INVALID => self.next_outside(idx, top),
                c => c,
            };
            if idx == INVALID {
                return false;
            }
        }
    }

    /// Mirror image of [`visit_forward`](Self::visit_forward): a post-order
    /// walk over children last-to-first.
    fn visit_reverse(
        &self,
        top: u32,
        test_activity: bool,
        pred: &mut dyn FnMut(ComponentId) -> bool,
    ) -> bool {
        if test_activity && !self.active_in_hierarchy[top as usize] {
            return false;
        }
        let mut idx = self.deepest_last(top, test_activity);
        loop {
            if self.visit_own(idx, test_activity, true, pred) {
                return true;
            }
            if idx == top {
                return false;
            }
            let prev = self.entered_sibling_before(idx, test_activity);
            idx = match prev {
                INVALID => self.parent[idx as usize],
                p => self.deepest_last(p, test_activity),
            };
        }
    }

    /// Offers a node's own components to `pred`, optionally last-to-first.
    fn visit_own(
        &self,
        idx: u32,
        test_activity: bool,
        reverse: bool,
        pred: &mut dyn FnMut(ComponentId) -> bool,
    ) -> bool {
        let own = &self.node_components[idx as usize];
        let mut offer = |c: ComponentId| {
            (!test_activity || self.components.active_in_hierarchy[c.idx as usize]) && pred(c)
        };
        if reverse {
            own.iter().rev().any(|&c| offer(c))
        } else {
            own.iter().any(|&c| offer(c))
        }
    }

    /// The next pre-order node after the subtree at `idx`, staying below
    /// `top`. `INVALID` once the walk climbs back to `top`.
    fn next_outside(&self, mut idx: u32, top: u32) -> u32 {
        loop {
            if idx == top {
                return INVALID;
            }
            let next = self.next_sibling[idx as usize];
            if next != INVALID {
                return next;
            }
            idx = self.parent[idx as usize];
        }
    }

    /// Follows the last entered child down from `idx` as far as it goes.
    fn deepest_last(&self, mut idx: u32, test_activity: bool) -> u32 {
        loop {
            let mut c = self.last_child(idx);
            while c != INVALID && test_activity && !self.active_in_hierarchy[c as usize] {
                c = self.prev_sibling[c as usize];
            }
            if c == INVALID {
                return idx;
            }
            idx = c;
        }
    }

    /// The closest previous sibling that the walk would enter.
    fn entered_sibling_before(&self, idx: u32, test_activity: bool) -> u32 {
        let mut p = self.prev_sibling[idx as usize];
        while p != INVALID && test_activity && !self.active_in_hierarchy[p as usize] {
            p = self.prev_sibling[p as usize];
        }
        p
    }

    fn last_child(&self, idx: u32) -> u32 {
        let mut c = self.first_child[idx as usize];
        if c == INVALID {
            return INVALID;
        }
        while self.next_sibling[c as usize] != INVALID {
            c = self.next_sibling[c as usize];
        }
        c
    }

    /// Whether `node` or anything below it has a scheduled behavior.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn contains_receivers(&self, node: NodeId) -> Result<bool, TreeError> {
        self.validate(node)?;
        Ok(self.contains_receivers_at(node.idx))
    }

    pub(crate) fn contains_receivers_at(&self, idx: u32) -> bool {
        let schedules = |i: u32| {
            self.caps[i as usize].is_receiver()
                || self.node_components[i as usize]
                    .iter()
                    .any(|c| self.components.caps[c.idx as usize].is_receiver())
        };
        schedules(idx) || Descendants::new(self, idx).any(|n| schedules(n.idx))
    }

    /// Assigns update order below `node` and registers every scheduled
    /// behavior with the scene of `node`'s root.
    ///
    /// The counter restarts at zero when `node` is a root and increments
    /// before each assignment, so the first receiver of a scene gets order 1.
    /// Within a node, the node's own behavior comes first, then its
    /// components in attachment order, then its children in child-list
    /// order. Activity is not consulted; inactive receivers keep their slot
    /// and are skipped at dispatch.
    ///
    /// Running it twice with no structural change in between assigns the same
    /// orders.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn refresh_update_order(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.validate(node)?;
        if self.parent[node.idx as usize] == INVALID {
            self.order_counter = 0;
        }
        let root = self.root_at(node.idx);
        self.assign_order(node.idx, root);
        Ok(())
    }

    fn assign_order(&mut self, top: u32, root: NodeId) {
        let walk: Vec<u32> = core::iter::once(top)
            .chain(Descendants::new(self, top).map(|n| n.idx))
            .collect();
        for idx in walk {
            let i = idx as usize;
            if self.caps[i].is_receiver() {
                self.order_counter += 1;
                let id = self.id_at(idx);
                self.registry
                    .register_update_receiver(root, Receiver::Node(id), self.order_counter);
            }
            for k in 0..self.node_components[i].len() {
                let c = self.node_components[i][k];
                if self.components.is_alive(c) && self.components.caps[c.idx as usize].is_receiver() {
                    self.order_counter += 1;
                    self.registry
                        .register_update_receiver(root, Receiver::Component(c), self.order_counter);
                }
            }
        }
    }
}
