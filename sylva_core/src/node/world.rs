// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, activity, and lifecycle.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::component::{Behavior, Capabilities, ComponentState, ComponentStore, Context};
use crate::dirty;
use crate::error::TreeError;
use crate::id::{ComponentId, INVALID, NodeId, Receiver};
use crate::scheduler::{RegistryConfig, SceneRegistry};
use crate::time::HostTime;

/// The node tree, its components, and its scene registry.
///
/// Nodes and components are addressed by generational handles. Destroyed
/// slots are recycled through free lists and their generation is bumped, so
/// old handles fail validation with [`TreeError::StaleNode`] or
/// [`TreeError::StaleComponent`].
///
/// Independent worlds share nothing; tests can build as many as they like.
pub struct World {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Node data --
    pub(crate) name: Vec<String>,
    pub(crate) type_tag: Vec<Option<&'static str>>,
    pub(crate) behavior: Vec<Option<Box<dyn Behavior>>>,
    pub(crate) caps: Vec<Capabilities>,
    pub(crate) node_components: Vec<Vec<ComponentId>>,

    // -- Activity --
    pub(crate) active: Vec<bool>,
    pub(crate) active_in_hierarchy: Vec<bool>,
    pub(crate) destroying: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Collaborators --
    pub(crate) components: ComponentStore,
    pub(crate) registry: SceneRegistry,
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Counters --
    pub(crate) order_counter: u32,
    pub(crate) frame_index: u64,
    pub(crate) clock: HostTime,
    pub(crate) propagations: u64,
    pub(crate) dispatching: bool,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("nodes", &self.node_count())
            .field("components", &self.components)
            .field("registry", &self.registry)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with [`RegistryConfig::new`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::new())
    }

    /// Creates an empty world with the given registry configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            name: Vec::new(),
            type_tag: Vec::new(),
            behavior: Vec::new(),
            caps: Vec::new(),
            node_components: Vec::new(),
            active: Vec::new(),
            active_in_hierarchy: Vec::new(),
            destroying: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            components: ComponentStore::new(),
            registry: SceneRegistry::new(config),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            order_counter: 0,
            frame_index: 0,
            clock: HostTime(0),
            propagations: 0,
            dispatching: false,
        }
    }

    // -- Allocation API --

    /// Creates a plain node under `parent`, or a new root if `parent` is
    /// `None`.
    ///
    /// Never fails. A stale `parent` is logged and treated as `None`. The
    /// default name is `"Node"`.
    pub fn instantiate(&mut self, parent: Option<NodeId>, name: Option<&str>) -> NodeId {
        self.instantiate_impl(parent, name, None)
    }

    /// Creates a node carrying `behavior` under `parent`.
    ///
    /// The default name is the behavior's [`type_name`](Behavior::type_name).
    /// `awake` runs once the node is wired into the tree with its hierarchy
    /// flag computed. If the behavior is scheduled, the root's scene order is
    /// invalidated.
    pub fn instantiate_with<B: Behavior>(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        behavior: B,
    ) -> NodeId {
        self.instantiate_impl(parent, name, Some(Box::new(behavior)))
    }

    /// Like [`instantiate_with`](Self::instantiate_with), for an already
    /// boxed behavior.
    pub fn instantiate_boxed(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        behavior: Box<dyn Behavior>,
    ) -> NodeId {
        self.instantiate_impl(parent, name, Some(behavior))
    }

    fn instantiate_impl(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        behavior: Option<Box<dyn Behavior>>,
    ) -> NodeId {
        let parent = parent.filter(|&p| {
            let ok = self.is_alive(p);
            if !ok {
                log::warn!("instantiate: parent {p:?} is stale, creating a root instead");
            }
            ok
        });

        let (type_tag, caps) = behavior
            .as_deref()
            .map_or((None, Capabilities::empty()), |b| {
                (Some(b.type_name()), b.capabilities())
            });
        let name = name.map_or_else(|| String::from(type_tag.unwrap_or("Node")), String::from);
        let id = self.alloc_node(name, type_tag, behavior, caps);

        if let Some(p) = parent {
            self.link_last(p.idx, id.idx);
            let _ = self.dirty.add_dependency(id.idx, p.idx, dirty::ACTIVE);
            self.active_in_hierarchy[id.idx as usize] = self.active_in_hierarchy[p.idx as usize];
        }

        self.with_node_behavior(id, |b, cx| b.awake(cx));

        if self.is_alive(id) && self.contains_receivers_at(id.idx) {
            let root = self.root_at(id.idx);
            self.registry.invalidate_scene_order(root);
        }
        id
    }

    fn alloc_node(
        &mut self,
        name: String,
        type_tag: Option<&'static str>,
        behavior: Option<Box<dyn Behavior>>,
        caps: Capabilities,
    ) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.name[i] = name;
            self.type_tag[i] = type_tag;
            self.behavior[i] = behavior;
            self.caps[i] = caps;
            self.node_components[i].clear();
            self.active[i] = true;
            self.active_in_hierarchy[i] = true;
            self.destroying[i] = false;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.name.push(name);
            self.type_tag.push(type_tag);
            self.behavior.push(behavior);
            self.caps.push(caps);
            self.node_components.push(Vec::new());
            self.active.push(true);
            self.active_in_hierarchy.push(true);
            self.destroying.push(false);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn free_node(&mut self, idx: u32) {
        let i = idx as usize;
        self.alive[i] = false;
        self.destroying[i] = false;
        self.generation[i] += 1;
        self.behavior[i] = None;
        self.name[i].clear();
        self.node_components[i].clear();
        self.free_list.push(idx);
    }

    /// Destroys a node, its subtree, and its components.
    ///
    /// In order: the node is unscheduled, its `on_destroy` hook runs, its
    /// children are destroyed the same way, its components are removed, and
    /// it is detached from its parent. Hooks therefore still see an intact
    /// tree above them. The subtree is walked with an explicit stack, so
    /// depth is bounded only by memory.
    ///
    /// Calling `destroy` on a node whose destruction is already in progress
    /// (from one of its own hooks) is a no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was already destroyed.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.validate(id)?;
        if self.destroying[id.idx as usize] {
            log::debug!("destroy({id:?}) re-entered while already in progress");
            return Ok(());
        }
        self.begin_destroy(id.idx);

        let mut stack = alloc::vec![id.idx];
        while let Some(&top) = stack.last() {
            // Hooks may attach new children while we go, so drain until empty.
            let c = self.first_child[top as usize];
            if c == INVALID {
                stack.pop();
                self.finish_destroy(top);
            } else if self.destroying[c as usize] {
                // Its own destroy is running in an outer call.
                self.unlink(c);
                self.dirty.remove_dependency(c, top, dirty::ACTIVE);
            } else {
                self.begin_destroy(c);
                stack.push(c);
            }
        }
        Ok(())
    }

    /// Marks a node as going away, unschedules it, and runs `on_destroy`.
    fn begin_destroy(&mut self, idx: u32) {
        self.destroying[idx as usize] = true;
        let id = self.id_at(idx);
        self.registry.remove_update_receiver(Receiver::Node(id));
        self.with_node_behavior(id, |b, cx| b.on_destroy(cx));
    }

    /// Releases the components of a childless node, detaches it, and frees
    /// its slot.
    fn finish_destroy(&mut self, idx: u32) {
        let i = idx as usize;
        loop {
            let owned = core::mem::take(&mut self.node_components[i]);
            if owned.is_empty() {
                break;
            }
            for c in owned {
                if self.components.is_alive(c)
                    && self.components.state[c.idx as usize] != ComponentState::Destroyed
                {
                    self.release_component(c);
                }
            }
        }

        if self.parent[i] != INVALID {
            self.unlink(idx);
        }
        self.dirty.remove_key(idx);
        self.free_node(idx);
    }

    /// Unschedules a component, delivers `on_destroy`, and frees its slot.
    ///
    /// Does not touch the owner's component list.
    pub(crate) fn release_component(&mut self, id: ComponentId) {
        self.registry.remove_update_receiver(Receiver::Component(id));
        self.components.state[id.idx as usize] = ComponentState::Destroyed;
        self.with_component_behavior(id, |b, cx| b.on_destroy(cx));
        if self.components.is_alive(id) {
            self.components.free(id);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns every live root, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Activity API --

    /// Sets a node's own activity flag.
    ///
    /// `active_in_hierarchy` is recomputed for the node, its components, and
    /// every descendant before this returns, even if the flag did not change.
    /// The node behavior's [`on_active_changed`](Behavior::on_active_changed)
    /// fires only on an actual change.
    ///
    /// Returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<bool, TreeError> {
        self.validate(id)?;
        let i = id.idx as usize;
        let changed = self.active[i] != active;
        self.active[i] = active;
        self.propagate_activity(id.idx);
        if changed {
            self.with_node_behavior(id, |b, cx| b.on_active_changed(cx, active));
        }
        Ok(changed)
    }

    /// Returns a node's own activity flag.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn is_active(&self, id: NodeId) -> Result<bool, TreeError> {
        self.validate(id)?;
        Ok(self.active[id.idx as usize])
    }

    /// Returns a node's derived activity flag.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> Result<bool, TreeError> {
        self.validate(id)?;
        Ok(self.active_in_hierarchy[id.idx as usize])
    }

    /// Number of hierarchy propagation passes run so far.
    #[must_use]
    pub fn propagation_count(&self) -> u64 {
        self.propagations
    }

    /// Recomputes `active_in_hierarchy` below `idx` and delivers flip hooks.
    pub(crate) fn propagate_activity(&mut self, idx: u32) {
        self.propagations += 1;
        self.dirty.mark_with(idx, dirty::ACTIVE, &EagerPolicy);
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::ACTIVE)
            .affected()
            .deterministic()
            .run()
            .collect();

        let mut flipped = Vec::new();
        for &n in &affected {
            let i = n as usize;
            if !self.alive[i] {
                continue;
            }
            let p = self.parent[i];
            let parent_active = p == INVALID || self.active_in_hierarchy[p as usize];
            let next = self.active[i] && parent_active;
            if self.active_in_hierarchy[i] != next {
                self.active_in_hierarchy[i] = next;
                flipped.push(Receiver::Node(self.id_at(n)));
            }
            for &c in &self.node_components[i] {
                if self.components.is_alive(c) && self.components.sync_hierarchy(c, next) {
                    flipped.push(Receiver::Component(c));
                }
            }
        }

        for r in flipped {
            match r {
                Receiver::Node(n) => {
                    if self.is_alive(n) {
                        let now = self.active_in_hierarchy[n.idx as usize];
                        self.with_node_behavior(n, |b, cx| b.on_hierarchy_changed(cx, now));
                    }
                }
                Receiver::Component(c) => {
                    if self.components.is_alive(c) {
                        let now = self.components.active_in_hierarchy[c.idx as usize];
                        self.with_component_behavior(c, |b, cx| b.on_hierarchy_changed(cx, now));
                    }
                }
            }
        }
    }

    // -- Naming API --

    /// Returns a node's name.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn name(&self, id: NodeId) -> Result<&str, TreeError> {
        self.validate(id)?;
        Ok(&self.name[id.idx as usize])
    }

    /// Renames a node. Names need not be unique.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        self.validate(id)?;
        self.name[id.idx as usize] = name.into();
        Ok(())
    }

    /// Returns the type tag of the node behavior, or `None` for plain nodes.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn type_tag(&self, id: NodeId) -> Result<Option<&'static str>, TreeError> {
        self.validate(id)?;
        Ok(self.type_tag[id.idx as usize])
    }

    /// Returns the first direct child of `node` called `name`.
    #[must_use]
    pub fn find_child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.children(node)
            .ok()?
            .find(|c| self.name[c.idx as usize] == name)
    }

    /// Resolves a `/`-separated path of child names below `node`.
    ///
    /// Empty segments are ignored, so `"a//b/"` is the same as `"a/b"`, and
    /// an empty path resolves to `node` itself.
    #[must_use]
    pub fn find_path(&self, node: NodeId, path: &str) -> Option<NodeId> {
        if !self.is_alive(node) {
            return None;
        }
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(node, |at, segment| self.find_child(at, segment))
    }

    // -- Behavior API --

    /// Borrows a node's behavior as its concrete type.
    ///
    /// Returns `None` for stale handles, plain nodes, type mismatches, and
    /// behaviors that are currently running a hook.
    #[must_use]
    pub fn behavior<T: Behavior>(&self, id: NodeId) -> Option<&T> {
        if !self.is_alive(id) {
            return None;
        }
        let behavior: &dyn Behavior = self.behavior[id.idx as usize].as_deref()?;
        let any: &dyn Any = behavior;
        any.downcast_ref::<T>()
    }

    /// Mutable counterpart of [`behavior`](Self::behavior).
    #[must_use]
    pub fn behavior_mut<T: Behavior>(&mut self, id: NodeId) -> Option<&mut T> {
        if !self.is_alive(id) {
            return None;
        }
        let behavior: &mut dyn Behavior = self.behavior[id.idx as usize].as_deref_mut()?;
        let any: &mut dyn Any = behavior;
        any.downcast_mut::<T>()
    }

    /// Lends a node's behavior to `f` together with a hook context.
    ///
    /// Returns `None` for stale nodes, plain nodes, and behaviors that are
    /// already lent out.
    pub(crate) fn with_node_behavior<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Behavior, &mut Context<'_>) -> R,
    ) -> Option<R> {
        if !self.is_alive(id) {
            return None;
        }
        let mut behavior = self.behavior[id.idx as usize].take()?;
        let result = {
            let mut cx = Context::new(self, id, None);
            f(behavior.as_mut(), &mut cx)
        };
        if self.is_alive(id) {
            self.behavior[id.idx as usize] = Some(behavior);
        } else {
            log::trace!("node {id:?} was destroyed during its own hook");
            let mut cx = Context::new(self, id, None);
            behavior.on_destroy(&mut cx);
        }
        Some(result)
    }

    // -- Frame state --

    /// World clock, advanced by every [`dispatch`](Self::dispatch).
    #[must_use]
    pub fn clock(&self) -> HostTime {
        self.clock
    }

    /// Number of completed dispatch passes.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The scene registry.
    #[must_use]
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Mutable access to the scene registry, for priorities and manual
    /// registration.
    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    // -- Internal helpers --

    /// Returns an error if the handle is stale.
    #[inline]
    pub(crate) fn validate(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    /// Builds the current handle for a live slot.
    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }
}
