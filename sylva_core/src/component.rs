// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behaviors, components, and the hook context.
//!
//! A [`Behavior`] is the user-supplied logic of a node or of a component
//! attached to a node. What a behavior takes part in is declared up front
//! through [`Capabilities`], read exactly once when the behavior is attached;
//! the scheduler never inspects a behavior for which hooks it overrides.
//!
//! # Lifecycle
//!
//! A component moves through [`ComponentState`]:
//!
//! ```text
//!   Constructed ──awake──► Initialized ──► Active ⇄ Inactive ──► Destroyed
//! ```
//!
//! `Active`/`Inactive` follow `owner.active_in_hierarchy && own_active` and
//! are recomputed whenever either input changes. A removed component's handle
//! is stale; further calls with it return
//! [`TreeError::StaleComponent`](crate::TreeError::StaleComponent).
//!
//! # Hooks and mutation
//!
//! Every hook receives a [`Context`] that dereferences to the owning
//! [`World`], so hooks may add, move, deactivate, or destroy anything,
//! including themselves. While a hook runs its behavior is lent out of the
//! world; nested hooks on the same behavior are not delivered. If the
//! behavior's slot dies while it is lent out, `on_destroy` is delivered once
//! the hook returns and the behavior is dropped.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::ops::{Deref, DerefMut};

use bitflags::bitflags;

use crate::error::TreeError;
use crate::id::{ComponentId, NodeId, Receiver};
use crate::input::Interactive;
use crate::node::World;
use crate::time::Duration;

bitflags! {
    /// Which scheduled hooks a behavior takes part in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Receives [`Behavior::update`] every dispatch.
        const UPDATE = 0b0000_0001;
        /// Receives [`Behavior::render`] every dispatch.
        const RENDER = 0b0000_0010;
        /// Update and render.
        const UPDATE_RENDER = Self::UPDATE.bits() | Self::RENDER.bits();
    }
}

impl Capabilities {
    /// Whether the scene registry needs to schedule this behavior at all.
    #[inline]
    #[must_use]
    pub const fn is_receiver(self) -> bool {
        self.intersects(Self::UPDATE_RENDER)
    }
}

/// Logic attached to a node or carried by a component.
///
/// All hooks default to no-ops.
pub trait Behavior: Any {
    /// Scheduled hooks this behavior takes part in. Read once, at attach time.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Type tag, used as the default node name and in diagnostics.
    fn type_name(&self) -> &'static str {
        short_type_name(core::any::type_name::<Self>())
    }

    /// Called exactly once, right after attachment.
    fn awake(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// Called once per dispatch while active in hierarchy, if
    /// [`Capabilities::UPDATE`] is set.
    fn update(&mut self, cx: &mut Context<'_>, dt: Duration) {
        _ = (cx, dt);
    }

    /// Called once per dispatch, after every update, while active in
    /// hierarchy, if [`Capabilities::RENDER`] is set.
    fn render(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// Node behaviors only: the node's own `active` flag changed through
    /// [`World::set_active`].
    fn on_active_changed(&mut self, cx: &mut Context<'_>, active: bool) {
        _ = (cx, active);
    }

    /// The derived `active_in_hierarchy` flag flipped.
    fn on_hierarchy_changed(&mut self, cx: &mut Context<'_>, active: bool) {
        _ = (cx, active);
    }

    /// Called exactly once before the node or component is released.
    fn on_destroy(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// Pointer and keyboard capability, queried by the input router.
    ///
    /// Only consulted for component behaviors: focus and hover always name a
    /// component. A node behavior that wants input attaches a component.
    fn interactive(&self) -> Option<&dyn Interactive> {
        None
    }

    /// Mutable counterpart of [`interactive`](Self::interactive).
    fn interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        None
    }
}

/// Strips the module path (and generic arguments) from a type name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

/// What a hook is running for, plus mutable access to the world.
pub struct Context<'a> {
    world: &'a mut World,
    node: NodeId,
    component: Option<ComponentId>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(world: &'a mut World, node: NodeId, component: Option<ComponentId>) -> Self {
        Self {
            world,
            node,
            component,
        }
    }

    /// The node the hook runs on (the owner, for component hooks).
    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The component the hook runs on, if any.
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    /// The scheduling identity of the hook's target.
    #[must_use]
    pub fn receiver(&self) -> Receiver {
        match self.component {
            Some(c) => Receiver::Component(c),
            None => Receiver::Node(self.node),
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("node", &self.node)
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl Deref for Context<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for Context<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}

/// Observable lifecycle position of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentState {
    /// Allocated and attached, awake not yet delivered.
    Constructed,
    /// Awake is running.
    Initialized,
    /// Active in hierarchy.
    Active,
    /// Not active in hierarchy.
    Inactive,
    /// `on_destroy` is running; the handle goes stale afterwards.
    Destroyed,
}

/// Struct-of-arrays storage for components.
pub(crate) struct ComponentStore {
    pub(crate) owner: Vec<NodeId>,
    pub(crate) behavior: Vec<Option<Box<dyn Behavior>>>,
    pub(crate) caps: Vec<Capabilities>,
    pub(crate) type_name: Vec<&'static str>,
    pub(crate) own_active: Vec<bool>,
    pub(crate) active_in_hierarchy: Vec<bool>,
    pub(crate) state: Vec<ComponentState>,
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStore")
            .field("slots", &self.alive.len())
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl ComponentStore {
    pub(crate) fn new() -> Self {
        Self {
            owner: Vec::new(),
            behavior: Vec::new(),
            caps: Vec::new(),
            type_name: Vec::new(),
            own_active: Vec::new(),
            active_in_hierarchy: Vec::new(),
            state: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn alloc(&mut self, owner: NodeId, behavior: Box<dyn Behavior>) -> ComponentId {
        let caps = behavior.capabilities();
        let type_name = behavior.type_name();
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.owner[i] = owner;
            self.behavior[i] = Some(behavior);
            self.caps[i] = caps;
            self.type_name[i] = type_name;
            self.own_active[i] = true;
            self.active_in_hierarchy[i] = false;
            self.state[i] = ComponentState::Constructed;
            self.alive[i] = true;
            idx
        } else {
            let idx = u32::try_from(self.alive.len()).unwrap_or(u32::MAX);
            self.owner.push(owner);
            self.behavior.push(Some(behavior));
            self.caps.push(caps);
            self.type_name.push(type_name);
            self.own_active.push(true);
            self.active_in_hierarchy.push(false);
            self.state.push(ComponentState::Constructed);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        ComponentId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn free(&mut self, id: ComponentId) {
        let i = id.idx as usize;
        self.alive[i] = false;
        self.generation[i] += 1;
        self.behavior[i] = None;
        self.free_list.push(id.idx);
    }

    #[inline]
    pub(crate) fn is_alive(&self, id: ComponentId) -> bool {
        let i = id.idx as usize;
        i < self.alive.len() && self.alive[i] && self.generation[i] == id.generation
    }

    #[inline]
    pub(crate) fn validate(&self, id: ComponentId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleComponent(id))
        }
    }

    /// Recomputes the derived flag; returns `true` if it flipped.
    pub(crate) fn sync_hierarchy(&mut self, id: ComponentId, owner_active: bool) -> bool {
        let i = id.idx as usize;
        let next = owner_active && self.own_active[i];
        let flipped = self.active_in_hierarchy[i] != next;
        self.active_in_hierarchy[i] = next;
        if matches!(
            self.state[i],
            ComponentState::Active | ComponentState::Inactive
        ) {
            self.state[i] = if next {
                ComponentState::Active
            } else {
                ComponentState::Inactive
            };
        }
        flipped
    }
}

impl World {
    /// Attaches a new component carrying `behavior` to `node`.
    ///
    /// The component's hierarchy flag is synced to the owner before `awake`
    /// runs. If the behavior is scheduled, the owning scene is invalidated.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if `node` has been destroyed.
    pub fn add_component<B: Behavior>(
        &mut self,
        node: NodeId,
        behavior: B,
    ) -> Result<ComponentId, TreeError> {
        self.add_boxed_component(node, Box::new(behavior))
    }

    /// Like [`add_component`](Self::add_component), for an already boxed
    /// behavior.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if `node` has been destroyed.
    pub fn add_boxed_component(
        &mut self,
        node: NodeId,
        behavior: Box<dyn Behavior>,
    ) -> Result<ComponentId, TreeError> {
        self.validate(node)?;
        let id = self.components.alloc(node, behavior);
        let owner_active = self.active_in_hierarchy[node.idx as usize];
        self.components.sync_hierarchy(id, owner_active);
        self.node_components[node.idx as usize].push(id);

        self.components.state[id.idx as usize] = ComponentState::Initialized;
        self.with_component_behavior(id, |b, cx| b.awake(cx));
        if self.components.is_alive(id) {
            let i = id.idx as usize;
            self.components.state[i] = if self.components.active_in_hierarchy[i] {
                ComponentState::Active
            } else {
                ComponentState::Inactive
            };
            if self.components.caps[i].is_receiver()
                && let Ok(root) = self.root(node)
            {
                self.registry.invalidate_scene_order(root);
            }
        }
        Ok(id)
    }

    /// Detaches and releases a component.
    ///
    /// The component is unscheduled, receives `on_destroy`, and is removed
    /// from its owner's component list.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was already removed.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(), TreeError> {
        self.components.validate(id)?;
        let i = id.idx as usize;
        if self.components.state[i] == ComponentState::Destroyed {
            log::debug!("remove_component({id:?}) re-entered from its own on_destroy");
            return Ok(());
        }
        let owner = self.components.owner[i];
        if self.is_alive(owner) {
            self.node_components[owner.idx as usize].retain(|c| *c != id);
        }
        self.release_component(id);
        Ok(())
    }

    /// Sets a component's own activity flag and recomputes its hierarchy
    /// flag against the owner.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn set_component_active(&mut self, id: ComponentId, active: bool) -> Result<(), TreeError> {
        self.components.validate(id)?;
        let i = id.idx as usize;
        self.components.own_active[i] = active;
        let owner = self.components.owner[i];
        let owner_active = self.active_in_hierarchy[owner.idx as usize];
        if self.components.sync_hierarchy(id, owner_active) {
            let now = self.components.active_in_hierarchy[i];
            self.with_component_behavior(id, |b, cx| b.on_hierarchy_changed(cx, now));
        }
        Ok(())
    }

    /// Returns a component's own activity flag.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn is_component_active(&self, id: ComponentId) -> Result<bool, TreeError> {
        self.components.validate(id)?;
        Ok(self.components.own_active[id.idx as usize])
    }

    /// Returns `owner.active_in_hierarchy && own_active` for a component.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn is_component_active_in_hierarchy(&self, id: ComponentId) -> Result<bool, TreeError> {
        self.components.validate(id)?;
        Ok(self.components.active_in_hierarchy[id.idx as usize])
    }

    /// Returns the lifecycle state of a component.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn component_state(&self, id: ComponentId) -> Result<ComponentState, TreeError> {
        self.components.validate(id)?;
        Ok(self.components.state[id.idx as usize])
    }

    /// Returns the node a component is attached to.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn component_owner(&self, id: ComponentId) -> Result<NodeId, TreeError> {
        self.components.validate(id)?;
        Ok(self.components.owner[id.idx as usize])
    }

    /// Returns the type tag of a component's behavior.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if it was removed.
    pub fn component_type_name(&self, id: ComponentId) -> Result<&'static str, TreeError> {
        self.components.validate(id)?;
        Ok(self.components.type_name[id.idx as usize])
    }

    /// Returns whether the handle refers to a live component.
    #[must_use]
    pub fn is_component_alive(&self, id: ComponentId) -> bool {
        self.components.is_alive(id)
    }

    /// Returns a node's components in attachment order.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the node was destroyed.
    pub fn components(&self, node: NodeId) -> Result<&[ComponentId], TreeError> {
        self.validate(node)?;
        Ok(&self.node_components[node.idx as usize])
    }

    /// Borrows a component's behavior as its concrete type.
    ///
    /// Returns `None` for stale handles, type mismatches, and behaviors that
    /// are currently running a hook.
    #[must_use]
    pub fn component<T: Behavior>(&self, id: ComponentId) -> Option<&T> {
        if !self.components.is_alive(id) {
            return None;
        }
        let behavior: &dyn Behavior = self.components.behavior[id.idx as usize].as_deref()?;
        let any: &dyn Any = behavior;
        any.downcast_ref::<T>()
    }

    /// Mutable counterpart of [`component`](Self::component).
    #[must_use]
    pub fn component_mut<T: Behavior>(&mut self, id: ComponentId) -> Option<&mut T> {
        if !self.components.is_alive(id) {
            return None;
        }
        let behavior: &mut dyn Behavior = self.components.behavior[id.idx as usize].as_deref_mut()?;
        let any: &mut dyn Any = behavior;
        any.downcast_mut::<T>()
    }

    /// Returns the first component of type `T` on `node`.
    #[must_use]
    pub fn get_component<T: Behavior>(&self, node: NodeId) -> Option<ComponentId> {
        self.components(node)
            .ok()?
            .iter()
            .copied()
            .find(|&c| self.component::<T>(c).is_some())
    }

    /// Returns every component of type `T` on `node`, in attachment order.
    #[must_use]
    pub fn get_components<T: Behavior>(&self, node: NodeId) -> Vec<ComponentId> {
        self.components(node)
            .map(|cs| {
                cs.iter()
                    .copied()
                    .filter(|&c| self.component::<T>(c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Lends a component's behavior to `f` together with a hook context.
    ///
    /// Returns `None` if the component is stale or its behavior is already
    /// lent out.
    pub(crate) fn with_component_behavior<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Behavior, &mut Context<'_>) -> R,
    ) -> Option<R> {
        if !self.components.is_alive(id) {
            return None;
        }
        let owner = self.components.owner[id.idx as usize];
        let mut behavior = self.components.behavior[id.idx as usize].take()?;
        let result = {
            let mut cx = Context::new(self, owner, Some(id));
            f(behavior.as_mut(), &mut cx)
        };
        if self.components.is_alive(id) {
            self.components.behavior[id.idx as usize] = Some(behavior);
        } else {
            log::trace!("component {id:?} was removed during its own hook");
            let mut cx = Context::new(self, owner, Some(id));
            behavior.on_destroy(&mut cx);
        }
        Some(result)
    }

    /// Lends the [`Interactive`] side of a component's behavior to `f`.
    pub(crate) fn with_interactive<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Interactive, &mut Context<'_>) -> R,
    ) -> Option<R> {
        self.with_component_behavior(id, |b, cx| b.interactive_mut().map(|i| f(i, cx)))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Tracked {
        tag: &'static str,
        log: Log,
    }

    impl Behavior for Tracked {
        fn awake(&mut self, _cx: &mut Context<'_>) {
            self.log.borrow_mut().push(alloc::format!("{}:awake", self.tag));
        }

        fn on_hierarchy_changed(&mut self, _cx: &mut Context<'_>, active: bool) {
            self.log
                .borrow_mut()
                .push(alloc::format!("{}:hierarchy={active}", self.tag));
        }

        fn on_destroy(&mut self, _cx: &mut Context<'_>) {
            self.log.borrow_mut().push(alloc::format!("{}:destroy", self.tag));
        }
    }

    struct Ticker;

    impl Behavior for Ticker {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATE
        }
    }

    struct Marker(u32);

    impl Behavior for Marker {}

    #[test]
    fn capability_flags() {
        assert!(!Capabilities::empty().is_receiver());
        assert!(Capabilities::RENDER.is_receiver());
        assert_eq!(
            Capabilities::UPDATE | Capabilities::RENDER,
            Capabilities::UPDATE_RENDER
        );
        assert!(Capabilities::UPDATE_RENDER.contains(Capabilities::UPDATE));
        assert!(!Capabilities::UPDATE.contains(Capabilities::RENDER));
        assert_eq!(Marker(0).capabilities(), Capabilities::empty());
    }

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name("a::b::Button"), "Button");
        assert_eq!(short_type_name("a::Wrap<b::Inner>"), "Wrap");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(Marker(0).type_name(), "Marker");
    }

    #[test]
    fn add_component_runs_awake_and_becomes_active() {
        let log = Log::default();
        let mut world = World::new();
        let node = world.instantiate(None, None);
        let c = world
            .add_component(node, Tracked { tag: "p", log: log.clone() })
            .unwrap();

        assert_eq!(*log.borrow(), vec![String::from("p:awake")]);
        assert_eq!(world.component_state(c).unwrap(), ComponentState::Active);
        assert_eq!(world.components(node).unwrap(), &[c]);
        assert_eq!(world.component_owner(c).unwrap(), node);
    }

    #[test]
    fn component_under_inactive_owner_starts_inactive() {
        let mut world = World::new();
        let parent = world.instantiate(None, None);
        world.set_active(parent, false).unwrap();
        let child = world.instantiate(Some(parent), None);
        let c = world.add_component(child, Marker(1)).unwrap();

        assert!(!world.is_component_active_in_hierarchy(c).unwrap());
        assert_eq!(world.component_state(c).unwrap(), ComponentState::Inactive);
    }

    #[test]
    fn own_flag_and_owner_flag_combine() {
        let log = Log::default();
        let mut world = World::new();
        let node = world.instantiate(None, None);
        let c = world
            .add_component(node, Tracked { tag: "p", log: log.clone() })
            .unwrap();

        world.set_component_active(c, false).unwrap();
        assert!(!world.is_component_active_in_hierarchy(c).unwrap());

        // Owner flips while the component is off: no flip, no hook.
        world.set_active(node, false).unwrap();
        world.set_active(node, true).unwrap();
        assert!(!world.is_component_active_in_hierarchy(c).unwrap());

        world.set_component_active(c, true).unwrap();
        assert!(world.is_component_active_in_hierarchy(c).unwrap());
        assert_eq!(
            *log.borrow(),
            vec![
                String::from("p:awake"),
                String::from("p:hierarchy=false"),
                String::from("p:hierarchy=true"),
            ]
        );
    }

    #[test]
    fn updateable_component_invalidates_its_scene() {
        let mut world = World::new();
        let root = world.instantiate(None, None);
        assert_eq!(world.registry().is_scene_valid(root), None);

        world.add_component(root, Marker(0)).unwrap();
        assert_eq!(world.registry().is_scene_valid(root), None, "not scheduled");

        world.add_component(root, Ticker).unwrap();
        assert_eq!(world.registry().is_scene_valid(root), Some(false));
    }

    #[test]
    fn remove_component_fires_destroy_and_goes_stale() {
        let log = Log::default();
        let mut world = World::new();
        let node = world.instantiate(None, None);
        let c = world
            .add_component(node, Tracked { tag: "p", log: log.clone() })
            .unwrap();

        world.remove_component(c).unwrap();
        assert_eq!(log.borrow().last().map(String::as_str), Some("p:destroy"));
        assert!(world.components(node).unwrap().is_empty());
        assert_eq!(world.remove_component(c), Err(TreeError::StaleComponent(c)));
        assert_eq!(
            world.set_component_active(c, true),
            Err(TreeError::StaleComponent(c))
        );
    }

    #[test]
    fn add_component_to_destroyed_node_errors() {
        let mut world = World::new();
        let node = world.instantiate(None, None);
        world.destroy(node).unwrap();
        assert_eq!(
            world.add_component(node, Marker(0)),
            Err(TreeError::StaleNode(node))
        );
    }

    #[test]
    fn typed_lookup() {
        let mut world = World::new();
        let node = world.instantiate(None, None);
        let a = world.add_component(node, Marker(1)).unwrap();
        let _t = world.add_component(node, Ticker).unwrap();
        let b = world.add_component(node, Marker(2)).unwrap();

        assert_eq!(world.get_component::<Marker>(node), Some(a));
        assert_eq!(world.get_components::<Marker>(node), vec![a, b]);
        assert_eq!(world.component::<Marker>(b).map(|m| m.0), Some(2));
        assert!(world.component::<Ticker>(a).is_none());

        if let Some(m) = world.component_mut::<Marker>(a) {
            m.0 = 10;
        }
        assert_eq!(world.component::<Marker>(a).map(|m| m.0), Some(10));
        assert_eq!(world.component_type_name(a).unwrap(), "Marker");
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut world = World::new();
        let node = world.instantiate(None, None);
        let a = world.add_component(node, Marker(1)).unwrap();
        world.remove_component(a).unwrap();
        let b = world.add_component(node, Marker(2)).unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(!world.is_component_alive(a));
        assert!(world.is_component_alive(b));
    }
}
