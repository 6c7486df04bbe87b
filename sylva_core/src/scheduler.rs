// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene registry and per-frame dispatch.
//!
//! Every distinct tree root keys one *scene*. A scene holds a priority and a
//! map from update receivers (scheduled node behaviors and components) to
//! their order. Structural changes mark a scene stale through
//! [`SceneRegistry::invalidate_scene_order`]; the next
//! [`World::dispatch`] re-walks the stale root with
//! [`World::refresh_update_order`] before running anything.
//!
//! # Dispatch
//!
//! ```text
//!   snapshot stale scenes ──► refresh order ──► freeze plan
//!                                                   │
//!             ┌─────────────────────────────────────┘
//!             ▼
//!   Update phase (plan order) ──► Render phase (plan order) ──► prune
//! ```
//!
//! The plan orders scenes by ascending priority (ties keep scene creation
//! order) and receivers by ascending order (ties keep registration order).
//! It is frozen before the first hook runs, so hooks that mutate the tree
//! only affect the next dispatch. Planned receivers that were destroyed or
//! unregistered in the meantime are skipped and logged.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::component::Capabilities;
use crate::id::{INVALID, NodeId, Receiver};
use crate::node::World;
use crate::time::Duration;
use crate::trace::{
    DispatchBeginEvent, DispatchSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind,
    ReceiverSkippedEvent, SceneRefreshEvent, SkipReason, Tracer,
};

/// Configuration for the [`SceneRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Drop scenes that are valid and have no receivers after each dispatch.
    ///
    /// A scene given an explicit priority is kept while its root is alive and
    /// still a root.
    pub prune_empty_scenes: bool,
    /// Priority given to scenes created implicitly.
    pub default_priority: i32,
}

impl RegistryConfig {
    /// Prunes empty scenes; new scenes get priority 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prune_empty_scenes: true,
            default_priority: 0,
        }
    }

    /// Keeps scenes around after their receivers are gone, so their priority
    /// survives the subtree being rebuilt.
    #[must_use]
    pub const fn retain_scenes() -> Self {
        Self {
            prune_empty_scenes: false,
            default_priority: 0,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Scene {
    root: NodeId,
    valid: bool,
    priority: i32,
    /// Priority was set explicitly rather than defaulted.
    pinned: bool,
    /// Receiver to (order, registration sequence).
    receivers: BTreeMap<Receiver, (u32, u64)>,
}

/// One scene per distinct root: priority, validity, and receiver order.
///
/// Owned by a [`World`]; reachable through [`World::registry`] and
/// [`World::registry_mut`].
#[derive(Debug)]
pub struct SceneRegistry {
    scenes: Vec<Scene>,
    membership: BTreeMap<Receiver, NodeId>,
    seq: u64,
    refresh_count: u64,
    config: RegistryConfig,
}

impl SceneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            scenes: Vec::new(),
            membership: BTreeMap::new(),
            seq: 0,
            refresh_count: 0,
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Marks the scene for `root` stale, creating it if absent.
    ///
    /// Idempotent: any number of calls before a dispatch cost one recompute.
    pub fn invalidate_scene_order(&mut self, root: NodeId) {
        let i = self.scene_index_or_insert(root, false);
        self.scenes[i].valid = false;
    }

    /// Sets the priority of the scene for `root`.
    ///
    /// A missing scene is created stale, so the next dispatch walks it. The
    /// scene survives pruning while `root` is a live root, so a priority set
    /// before any receiver exists still applies once one is added.
    pub fn set_scene_priority(&mut self, root: NodeId, priority: i32) {
        let i = self.scene_index_or_insert(root, false);
        self.scenes[i].priority = priority;
        self.scenes[i].pinned = true;
    }

    /// Inserts `receiver` into the scene for `root` with the given order.
    ///
    /// Registering again overwrites the order (last write wins) but keeps the
    /// original tie-break position. A receiver registered under a different
    /// root is moved. A scene created by this call starts valid.
    pub fn register_update_receiver(&mut self, root: NodeId, receiver: Receiver, order: u32) {
        if let Some(&prev) = self.membership.get(&receiver)
            && prev != root
            && let Some(i) = self.scene_index(prev)
        {
            self.scenes[i].receivers.remove(&receiver);
        }
        let i = self.scene_index_or_insert(root, true);
        let seq = match self.scenes[i].receivers.get(&receiver) {
            Some(&(_, seq)) => seq,
            None => {
                self.seq += 1;
                self.seq
            }
        };
        self.scenes[i].receivers.insert(receiver, (order, seq));
        self.membership.insert(receiver, root);
    }

    /// Removes `receiver` from whichever scene holds it.
    ///
    /// Returns whether it was registered.
    pub fn remove_update_receiver(&mut self, receiver: Receiver) -> bool {
        let Some(root) = self.membership.remove(&receiver) else {
            return false;
        };
        if let Some(i) = self.scene_index(root) {
            self.scenes[i].receivers.remove(&receiver);
        }
        true
    }

    /// Whether `receiver` is currently scheduled.
    #[must_use]
    pub fn is_registered(&self, receiver: Receiver) -> bool {
        self.membership.contains_key(&receiver)
    }

    /// The order value assigned to `receiver`, if scheduled.
    #[must_use]
    pub fn receiver_order(&self, receiver: Receiver) -> Option<u32> {
        let root = self.membership.get(&receiver)?;
        let i = self.scene_index(*root)?;
        self.scenes[i].receivers.get(&receiver).map(|&(order, _)| order)
    }

    /// The root of the scene that schedules `receiver`.
    #[must_use]
    pub fn receiver_scene(&self, receiver: Receiver) -> Option<NodeId> {
        self.membership.get(&receiver).copied()
    }

    /// The priority of the scene for `root`, if it exists.
    #[must_use]
    pub fn scene_priority(&self, root: NodeId) -> Option<i32> {
        self.scene_index(root).map(|i| self.scenes[i].priority)
    }

    /// Whether the scene for `root` is up to date, or `None` if there is no
    /// such scene.
    #[must_use]
    pub fn is_scene_valid(&self, root: NodeId) -> Option<bool> {
        self.scene_index(root).map(|i| self.scenes[i].valid)
    }

    /// Number of receivers in the scene for `root`.
    #[must_use]
    pub fn receiver_count(&self, root: NodeId) -> usize {
        self.scene_index(root)
            .map_or(0, |i| self.scenes[i].receivers.len())
    }

    /// Number of scenes.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Scene roots in creation order.
    #[must_use]
    pub fn scene_roots(&self) -> Vec<NodeId> {
        self.scenes.iter().map(|s| s.root).collect()
    }

    /// Number of order recomputes performed by dispatch.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    // -- Dispatch support --

    /// Roots of stale scenes, in creation order.
    pub(crate) fn stale_roots(&self) -> Vec<NodeId> {
        self.scenes
            .iter()
            .filter(|s| !s.valid)
            .map(|s| s.root)
            .collect()
    }

    /// Drops every receiver of the scene for `root`.
    pub(crate) fn clear_scene(&mut self, root: NodeId) {
        let Some(i) = self.scene_index(root) else {
            return;
        };
        let receivers = core::mem::take(&mut self.scenes[i].receivers);
        for r in receivers.keys() {
            self.membership.remove(r);
        }
    }

    pub(crate) fn mark_valid(&mut self, root: NodeId) {
        if let Some(i) = self.scene_index(root) {
            self.scenes[i].valid = true;
        }
    }

    /// Marks a freshly walked scene valid and counts the recompute.
    ///
    /// Returns the scene's priority and receiver count.
    fn finish_refresh(&mut self, root: NodeId) -> (i32, usize) {
        self.refresh_count += 1;
        match self.scene_index(root) {
            Some(i) => {
                let scene = &mut self.scenes[i];
                scene.valid = true;
                (scene.priority, scene.receivers.len())
            }
            None => (self.config.default_priority, 0),
        }
    }

    /// Every scheduled receiver in execution order.
    pub(crate) fn plan(&self) -> Vec<Receiver> {
        let mut scene_order: Vec<usize> = (0..self.scenes.len()).collect();
        scene_order.sort_by_key(|&i| self.scenes[i].priority);

        let mut plan = Vec::with_capacity(self.membership.len());
        for i in scene_order {
            let mut entries: Vec<(u32, u64, Receiver)> = self.scenes[i]
                .receivers
                .iter()
                .map(|(&r, &(order, seq))| (order, seq, r))
                .collect();
            entries.sort_unstable_by_key(|&(order, seq, _)| (order, seq));
            plan.extend(entries.into_iter().map(|(_, _, r)| r));
        }
        plan
    }

    /// Removes valid scenes without receivers. Returns how many went.
    ///
    /// Scenes with an explicit priority stay if `is_live_root` holds for
    /// their root.
    pub(crate) fn prune_empty(&mut self, is_live_root: impl Fn(NodeId) -> bool) -> u32 {
        let before = self.scenes.len();
        self.scenes.retain(|s| {
            !s.valid || !s.receivers.is_empty() || (s.pinned && is_live_root(s.root))
        });
        u32::try_from(before - self.scenes.len()).unwrap_or(u32::MAX)
    }

    fn scene_index(&self, root: NodeId) -> Option<usize> {
        self.scenes.iter().position(|s| s.root == root)
    }

    fn scene_index_or_insert(&mut self, root: NodeId, valid: bool) -> usize {
        if let Some(i) = self.scene_index(root) {
            return i;
        }
        self.scenes.push(Scene {
            root,
            valid,
            priority: self.config.default_priority,
            pinned: false,
            receivers: BTreeMap::new(),
        });
        self.scenes.len() - 1
    }
}

impl World {
    /// Runs one frame: recompute stale scenes, then every scheduled `update`,
    /// then every scheduled `render`.
    ///
    /// `dt` advances the world clock and is handed to `update` hooks. The
    /// execution plan is frozen before the first hook runs. A receiver is
    /// invoked only if it is active in hierarchy and has the phase's
    /// capability. Planned receivers that were destroyed or unregistered
    /// after the freeze are skipped. Dispatch never fails.
    ///
    /// Calling `dispatch` from inside a hook does nothing and returns an
    /// empty summary.
    pub fn dispatch(&mut self, dt: Duration, tracer: &mut Tracer<'_>) -> DispatchSummary {
        if self.dispatching {
            log::warn!("dispatch called re-entrantly from a hook; ignored");
            return DispatchSummary::default();
        }
        self.dispatching = true;

        self.clock = self.clock + dt;
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let mut summary = DispatchSummary {
            frame_index,
            scenes: saturate(self.registry.scene_count()),
            ..DispatchSummary::default()
        };
        tracer.dispatch_begin(&DispatchBeginEvent {
            frame_index,
            now: self.clock,
            scene_count: summary.scenes,
        });

        // Refresh stale scenes.
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase: PhaseKind::Refresh,
            timestamp: self.clock,
        });
        for root in self.registry.stale_roots() {
            self.registry.clear_scene(root);
            if self.is_alive(root) && self.parent[root.idx as usize] == INVALID {
                let _ = self.refresh_update_order(root);
            }
            let (priority, receivers) = self.registry.finish_refresh(root);
            summary.refreshed += 1;
            tracer.scene_refresh(&SceneRefreshEvent {
                frame_index,
                root,
                priority,
                receiver_count: saturate(receivers),
            });
        }
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase: PhaseKind::Refresh,
            invoked: summary.refreshed,
        });

        // Freeze. Capabilities never change after attach, so the per-phase
        // split can be taken now.
        let plan = self.registry.plan();
        summary.planned = saturate(plan.len());
        let mut update_plan = Vec::new();
        let mut render_plan = Vec::new();
        for &r in &plan {
            let caps = self.receiver_caps(r);
            if caps.contains(Capabilities::UPDATE) {
                update_plan.push(r);
            }
            if caps.contains(Capabilities::RENDER) {
                render_plan.push(r);
            }
        }

        let mut skipped = 0;
        summary.updated =
            self.run_phase(PhaseKind::Update, &update_plan, dt, frame_index, tracer, &mut skipped);
        summary.rendered =
            self.run_phase(PhaseKind::Render, &render_plan, dt, frame_index, tracer, &mut skipped);
        summary.skipped = skipped;

        if self.registry.config.prune_empty_scenes {
            let (alive, generation, parent) = (&self.alive, &self.generation, &self.parent);
            summary.pruned = self.registry.prune_empty(|root| {
                let i = root.idx as usize;
                alive.get(i).copied().unwrap_or(false)
                    && generation[i] == root.generation
                    && parent[i] == INVALID
            });
        }

        tracer.dispatch_summary(&summary);
        self.dispatching = false;
        summary
    }

    fn run_phase(
        &mut self,
        phase: PhaseKind,
        plan: &[Receiver],
        dt: Duration,
        frame_index: u64,
        tracer: &mut Tracer<'_>,
        skipped: &mut u32,
    ) -> u32 {
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            timestamp: self.clock,
        });
        let mut invoked = 0_u32;
        for &r in plan {
            if let Some(reason) = self.skip_reason(r) {
                log::debug!("frame {frame_index}: skipping {r:?} in {phase:?}: {reason:?}");
                *skipped += 1;
                tracer.receiver_skipped(&ReceiverSkippedEvent {
                    frame_index,
                    receiver: r,
                    reason,
                });
                continue;
            }
            let ran = match r {
                Receiver::Node(n) if self.active_in_hierarchy[n.idx as usize] => {
                    self.with_node_behavior(n, |b, cx| match phase {
                        PhaseKind::Update => b.update(cx, dt),
                        _ => b.render(cx),
                    })
                }
                Receiver::Component(c) if self.components.active_in_hierarchy[c.idx as usize] => {
                    self.with_component_behavior(c, |b, cx| match phase {
                        PhaseKind::Update => b.update(cx, dt),
                        _ => b.render(cx),
                    })
                }
                _ => None,
            };
            if ran.is_some() {
                invoked += 1;
            }
        }
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            invoked,
        });
        invoked
    }

    fn skip_reason(&self, r: Receiver) -> Option<SkipReason> {
        let alive = match r {
            Receiver::Node(n) => self.is_alive(n),
            Receiver::Component(c) => self.components.is_alive(c),
        };
        if !alive {
            Some(SkipReason::Destroyed)
        } else if !self.registry.is_registered(r) {
            Some(SkipReason::Unregistered)
        } else {
            None
        }
    }

    fn receiver_caps(&self, r: Receiver) -> Capabilities {
        match r {
            Receiver::Node(n) if self.is_alive(n) => self.caps[n.idx as usize],
            Receiver::Component(c) if self.components.is_alive(c) => {
                self.components.caps[c.idx as usize]
            }
            _ => Capabilities::empty(),
        }
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    use crate::component::{Behavior, Context};
    use crate::id::ComponentId;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Logs its scheduled hooks.
    struct Tracked {
        tag: &'static str,
        caps: Capabilities,
        log: Log,
    }

    impl Behavior for Tracked {
        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn update(&mut self, _cx: &mut Context<'_>, _dt: Duration) {
            self.log
                .borrow_mut()
                .push(alloc::format!("{}:update", self.tag));
        }

        fn render(&mut self, _cx: &mut Context<'_>) {
            self.log
                .borrow_mut()
                .push(alloc::format!("{}:render", self.tag));
        }
    }

    fn updater(tag: &'static str, log: &Log) -> Tracked {
        Tracked {
            tag,
            caps: Capabilities::UPDATE,
            log: log.clone(),
        }
    }

    fn drain(log: &Log) -> Vec<String> {
        core::mem::take(&mut *log.borrow_mut())
    }

    fn frame(world: &mut World) -> DispatchSummary {
        world.dispatch(Duration::from_millis(16), &mut Tracer::none())
    }

    fn node(n: u32) -> NodeId {
        NodeId::from_raw_parts(n, 0)
    }

    fn comp(n: u32) -> Receiver {
        Receiver::Component(ComponentId::from_raw_parts(n, 0))
    }

    #[test]
    fn invalidate_creates_stale_scene() {
        let mut reg = SceneRegistry::new(RegistryConfig::new());
        reg.invalidate_scene_order(node(1));
        reg.invalidate_scene_order(node(1));
        assert_eq!(reg.scene_count(), 1);
        assert_eq!(reg.is_scene_valid(node(1)), Some(false));
        assert_eq!(reg.scene_priority(node(1)), Some(0));
    }

    #[test]
    fn set_scene_priority_auto_creates() {
        let mut reg = SceneRegistry::new(RegistryConfig {
            prune_empty_scenes: true,
            default_priority: 5,
        });
        reg.set_scene_priority(node(3), -2);
        assert_eq!(reg.scene_priority(node(3)), Some(-2));
        assert_eq!(reg.is_scene_valid(node(3)), Some(false));
        reg.invalidate_scene_order(node(4));
        assert_eq!(reg.scene_priority(node(4)), Some(5));
    }

    #[test]
    fn register_last_write_wins_and_moves_between_scenes() {
        let mut reg = SceneRegistry::new(RegistryConfig::new());
        reg.register_update_receiver(node(1), comp(7), 3);
        reg.register_update_receiver(node(1), comp(7), 9);
        assert_eq!(reg.receiver_order(comp(7)), Some(9));
        assert_eq!(reg.receiver_count(node(1)), 1);

        reg.register_update_receiver(node(2), comp(7), 1);
        assert_eq!(reg.receiver_scene(comp(7)), Some(node(2)));
        assert_eq!(reg.receiver_count(node(1)), 0);
        assert_eq!(reg.is_scene_valid(node(2)), Some(true));

        assert!(reg.remove_update_receiver(comp(7)));
        assert!(!reg.remove_update_receiver(comp(7)));
        assert!(!reg.is_registered(comp(7)));
    }

    #[test]
    fn plan_sorts_by_priority_then_order_with_stable_ties() {
        let mut reg = SceneRegistry::new(RegistryConfig::new());
        reg.register_update_receiver(node(1), comp(10), 2);
        reg.register_update_receiver(node(1), comp(11), 1);
        reg.register_update_receiver(node(2), comp(20), 1);
        reg.register_update_receiver(node(3), comp(30), 5);
        reg.register_update_receiver(node(3), comp(31), 5);
        reg.set_scene_priority(node(2), -1);

        assert_eq!(
            reg.plan(),
            vec![comp(20), comp(11), comp(10), comp(30), comp(31)]
        );
    }

    #[test]
    fn prune_only_valid_empty_scenes() {
        let mut reg = SceneRegistry::new(RegistryConfig::new());
        reg.invalidate_scene_order(node(1));
        reg.register_update_receiver(node(2), comp(1), 1);
        reg.set_scene_priority(node(3), 0);
        reg.mark_valid(node(3));

        assert_eq!(reg.prune_empty(|_| false), 1);
        assert_eq!(reg.scene_roots(), vec![node(1), node(2)]);
    }

    #[test]
    fn explicit_priority_pins_scene_while_root_lives() {
        let mut reg = SceneRegistry::new(RegistryConfig::new());
        reg.set_scene_priority(node(3), 4);
        reg.mark_valid(node(3));
        reg.invalidate_scene_order(node(5));
        reg.mark_valid(node(5));

        assert_eq!(reg.prune_empty(|r| r == node(3)), 1);
        assert_eq!(reg.scene_roots(), vec![node(3)]);
        assert_eq!(reg.prune_empty(|_| false), 1);
        assert_eq!(reg.scene_count(), 0);
    }

    #[test]
    fn priority_set_before_receivers_survives_dispatch() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        world.registry_mut().set_scene_priority(root, 7);

        let summary = frame(&mut world);
        assert_eq!(summary.pruned, 0);
        assert_eq!(world.registry().scene_priority(root), Some(7));

        world.add_component(root, updater("late", &log)).unwrap();
        frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("late:update")]);
        assert_eq!(world.registry().scene_priority(root), Some(7));

        world.destroy(root).unwrap();
        let summary = frame(&mut world);
        assert_eq!(summary.pruned, 1);
        assert_eq!(world.registry().scene_count(), 0);
    }

    #[test]
    fn siblings_update_in_order_every_frame() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate_with(Some(root), Some("A"), updater("A", &log));
        let b = world.instantiate_with(Some(root), Some("B"), updater("B", &log));

        for _ in 0..3 {
            frame(&mut world);
            assert_eq!(drain(&log), vec![String::from("A:update"), String::from("B:update")]);
        }
        let b_order = world.registry().receiver_order(Receiver::Node(b));
        let refreshes = world.registry().refresh_count();

        world.set_active(a, false).unwrap();
        let summary = frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("B:update")]);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 0, "inactive is not stale");
        assert_eq!(world.registry().refresh_count(), refreshes, "no recompute");
        assert_eq!(world.registry().receiver_order(Receiver::Node(b)), b_order);
    }

    #[test]
    fn sibling_reorder_changes_update_order() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        world.instantiate_with(Some(root), Some("A"), updater("A", &log));
        let b = world.instantiate_with(Some(root), Some("B"), updater("B", &log));

        frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("A:update"), String::from("B:update")]);

        world.set_as_first_sibling(b).unwrap();
        let summary = frame(&mut world);
        assert_eq!(summary.refreshed, 1);
        assert_eq!(drain(&log), vec![String::from("B:update"), String::from("A:update")]);
        assert_eq!(world.registry().receiver_order(Receiver::Node(b)), Some(1));
    }

    #[test]
    fn repeated_invalidation_costs_one_refresh() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        world.instantiate_with(Some(root), None, updater("A", &log));
        frame(&mut world);

        let before = world.registry().refresh_count();
        for _ in 0..5 {
            world.registry_mut().invalidate_scene_order(root);
        }
        let summary = frame(&mut world);
        assert_eq!(summary.refreshed, 1);
        assert_eq!(world.registry().refresh_count(), before + 1);
        assert_eq!(drain(&log).len(), 2);
    }

    #[test]
    fn update_phase_precedes_render_phase() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        for tag in ["A", "B"] {
            world.instantiate_with(
                Some(root),
                None,
                Tracked {
                    tag,
                    caps: Capabilities::UPDATE_RENDER,
                    log: log.clone(),
                },
            );
        }
        world.instantiate_with(
            Some(root),
            None,
            Tracked {
                tag: "C",
                caps: Capabilities::RENDER,
                log: log.clone(),
            },
        );

        let summary = frame(&mut world);
        assert_eq!(
            drain(&log),
            vec![
                String::from("A:update"),
                String::from("B:update"),
                String::from("A:render"),
                String::from("B:render"),
                String::from("C:render"),
            ]
        );
        assert_eq!(summary.planned, 3);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.rendered, 3);
    }

    #[test]
    fn scenes_run_by_priority() {
        let log = Log::default();
        let mut world = World::new();
        let hud = world.instantiate(None, Some("hud"));
        world.instantiate_with(Some(hud), None, updater("hud", &log));
        let game = world.instantiate(None, Some("game"));
        world.instantiate_with(Some(game), None, updater("game", &log));
        let late = world.instantiate(None, Some("late"));
        world.instantiate_with(Some(late), None, updater("late", &log));

        world.registry_mut().set_scene_priority(hud, 10);
        frame(&mut world);
        assert_eq!(
            drain(&log),
            vec![String::from("game:update"), String::from("late:update"), String::from("hud:update")]
        );
    }

    #[test]
    fn component_receivers_follow_their_node() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate_with(Some(root), None, updater("a", &log));
        world.add_component(a, updater("a.0", &log)).unwrap();
        let b = world.instantiate(Some(root), None);
        world.add_component(b, updater("b.0", &log)).unwrap();
        let off = world.add_component(b, updater("b.1", &log)).unwrap();
        world.set_component_active(off, false).unwrap();

        frame(&mut world);
        assert_eq!(
            drain(&log),
            vec![String::from("a:update"), String::from("a.0:update"), String::from("b.0:update")]
        );
    }

    struct Killer {
        victim: Option<NodeId>,
        spawn_under: Option<NodeId>,
        log: Log,
    }

    impl Behavior for Killer {
        fn capabilities(&self) -> Capabilities {
            Capabilities::UPDATE
        }

        fn update(&mut self, cx: &mut Context<'_>, _dt: Duration) {
            self.log.borrow_mut().push(String::from("killer:update"));
            if let Some(v) = self.victim.take() {
                cx.destroy(v).unwrap();
            }
            if let Some(p) = self.spawn_under.take() {
                let log = self.log.clone();
                cx.instantiate_with(Some(p), None, updater("spawned", &log));
            }
        }
    }

    #[test]
    fn destroy_during_dispatch_is_skipped() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let killer = world.instantiate_with(
            Some(root),
            None,
            Killer {
                victim: None,
                spawn_under: None,
                log: log.clone(),
            },
        );
        let victim = world.instantiate_with(Some(root), None, updater("victim", &log));
        if let Some(k) = world.behavior_mut::<Killer>(killer) {
            k.victim = Some(victim);
        }

        let summary = frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("killer:update")]);
        assert_eq!(summary.skipped, 1);
        assert!(!world.is_alive(victim));

        let summary = frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("killer:update")]);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.planned, 1);
    }

    #[test]
    fn nodes_added_during_dispatch_run_next_frame() {
        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        world.instantiate_with(
            Some(root),
            None,
            Killer {
                victim: None,
                spawn_under: Some(root),
                log: log.clone(),
            },
        );

        frame(&mut world);
        assert_eq!(drain(&log), vec![String::from("killer:update")]);
        assert_eq!(world.registry().is_scene_valid(root), Some(false));

        frame(&mut world);
        assert_eq!(
            drain(&log),
            vec![String::from("killer:update"), String::from("spawned:update")]
        );
    }

    #[test]
    fn empty_scenes_are_pruned_unless_retained() {
        let log = Log::default();
        for (config, scenes_left, pruned) in [
            (RegistryConfig::new(), 0, 1),
            (RegistryConfig::retain_scenes(), 1, 0),
        ] {
            let mut world = World::with_config(config);
            let root = world.instantiate_with(None, None, updater("r", &log));
            frame(&mut world);
            assert_eq!(world.registry().scene_count(), 1);

            world.destroy(root).unwrap();
            let summary = frame(&mut world);
            assert_eq!(world.registry().scene_count(), scenes_left);
            assert_eq!(summary.pruned, pruned);
        }
    }

    #[test]
    fn reparented_subtree_moves_scenes() {
        let log = Log::default();
        let mut world = World::new();
        let r1 = world.instantiate(None, None);
        let r2 = world.instantiate(None, None);
        let n = world.instantiate_with(Some(r1), None, updater("n", &log));
        frame(&mut world);
        assert_eq!(world.registry().receiver_scene(Receiver::Node(n)), Some(r1));

        world.set_parent(n, Some(r2)).unwrap();
        frame(&mut world);
        assert_eq!(world.registry().receiver_scene(Receiver::Node(n)), Some(r2));
        assert_eq!(world.registry().scene_roots(), vec![r2]);
        assert_eq!(drain(&log).len(), 2);
    }

    #[test]
    fn dispatch_advances_clock_and_frame_index() {
        let mut world = World::new();
        let s0 = frame(&mut world);
        let s1 = frame(&mut world);
        assert_eq!(s0.frame_index, 0);
        assert_eq!(s1.frame_index, 1);
        assert_eq!(world.frame_index(), 2);
        assert_eq!(world.clock().ticks(), 32_000_000);
    }

    #[test]
    fn reentrant_dispatch_is_ignored() {
        struct Pump(Rc<RefCell<Option<DispatchSummary>>>);

        impl Behavior for Pump {
            fn capabilities(&self) -> Capabilities {
                Capabilities::UPDATE
            }

            fn update(&mut self, cx: &mut Context<'_>, dt: Duration) {
                let inner = cx.dispatch(dt, &mut Tracer::none());
                *self.0.borrow_mut() = Some(inner);
            }
        }

        let seen = Rc::new(RefCell::new(None));
        let mut world = World::new();
        world.instantiate_with(None, None, Pump(seen.clone()));
        frame(&mut world);
        assert_eq!(*seen.borrow(), Some(DispatchSummary::default()));
        assert_eq!(world.frame_index(), 1);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn dispatch_emits_trace_events() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Recording {
            refreshed: Vec<NodeId>,
            phases: Vec<(PhaseKind, u32)>,
            skipped: Vec<(Receiver, SkipReason)>,
            summaries: u32,
        }

        impl TraceSink for Recording {
            fn on_scene_refresh(&mut self, e: &SceneRefreshEvent) {
                self.refreshed.push(e.root);
            }

            fn on_phase_end(&mut self, e: &PhaseEndEvent) {
                self.phases.push((e.phase, e.invoked));
            }

            fn on_receiver_skipped(&mut self, e: &ReceiverSkippedEvent) {
                self.skipped.push((e.receiver, e.reason));
            }

            fn on_dispatch_summary(&mut self, _s: &DispatchSummary) {
                self.summaries += 1;
            }
        }

        let log = Log::default();
        let mut world = World::new();
        let root = world.instantiate(None, None);
        let a = world.instantiate_with(Some(root), None, updater("a", &log));
        world.instantiate_with(Some(root), None, updater("b", &log));
        frame(&mut world);

        // A receiver removed from the registry drops out of the next plan.
        world.registry_mut().remove_update_receiver(Receiver::Node(a));
        let mut sink = Recording::default();
        world.dispatch(Duration::ZERO, &mut Tracer::new(&mut sink));

        assert!(sink.refreshed.is_empty());
        assert_eq!(
            sink.phases,
            vec![(PhaseKind::Refresh, 0), (PhaseKind::Update, 1), (PhaseKind::Render, 0)]
        );
        assert!(sink.skipped.is_empty());
        assert_eq!(sink.summaries, 1);

        world.registry_mut().invalidate_scene_order(root);
        let mut sink = Recording::default();
        world.dispatch(Duration::ZERO, &mut Tracer::new(&mut sink));
        assert_eq!(sink.refreshed, vec![root]);
        assert_eq!(sink.phases[1], (PhaseKind::Update, 2));
    }
}
