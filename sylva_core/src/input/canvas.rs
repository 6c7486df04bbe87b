// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input router: focus, hover, and pointer/key delivery for one subtree.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::error::TreeError;
use crate::id::{ComponentId, NodeId};
use crate::node::World;
use crate::time::HostTime;
use crate::trace::{FocusCause, FocusChangeEvent, HoverChangeEvent, Tracer};

use super::event::{KeyEvent, KeyState, PointerButton};
use super::{RouterConfig, SurfaceProjection};

/// Routes pointer and keyboard events to the interactive components below
/// one node.
///
/// The canvas keeps the focused component, the hovered component, and the
/// time of the last hover evaluation. Focus and hover references that went
/// stale (component removed, or no longer active in hierarchy) are dropped
/// at the start of the next event, with cause [`FocusCause::Stale`].
///
/// Focus transitions deliver `on_focus_leave` to the old component before
/// `on_focus_enter` to the new one, and only when the focus actually
/// changes.
pub struct Canvas {
    node: NodeId,
    config: RouterConfig,
    focus: Option<ComponentId>,
    hover: Option<ComponentId>,
    last_hover_eval: Option<HostTime>,
    projection: Option<Box<dyn SurfaceProjection>>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("node", &self.node)
            .field("config", &self.config)
            .field("focus", &self.focus)
            .field("hover", &self.hover)
            .field("projected", &self.projection.is_some())
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Creates a node named `"Canvas"` under `parent` and a router for it.
    pub fn instantiate(world: &mut World, parent: Option<NodeId>, config: RouterConfig) -> Self {
        let node = world.instantiate(parent, Some("Canvas"));
        Self::attach(node, config)
    }

    /// Creates a router for an existing node.
    #[must_use]
    pub fn attach(node: NodeId, config: RouterConfig) -> Self {
        Self {
            node,
            config,
            focus: None,
            hover: None,
            last_hover_eval: None,
            projection: None,
        }
    }

    /// Routes through `projection` first, for canvases drawn onto an
    /// off-screen surface.
    #[must_use]
    pub fn with_projection(mut self, projection: impl SurfaceProjection + 'static) -> Self {
        self.projection = Some(Box::new(projection));
        self
    }

    /// The canvas node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The router configuration.
    #[must_use]
    pub fn config(&self) -> RouterConfig {
        self.config
    }

    /// The focused component.
    #[must_use]
    pub fn focus(&self) -> Option<ComponentId> {
        self.focus
    }

    /// The hovered component.
    #[must_use]
    pub fn hovered(&self) -> Option<ComponentId> {
        self.hover
    }

    // -- Device events --

    /// A button went down at `point`.
    ///
    /// The topmost focusable, enabled component under the point becomes the
    /// focus and receives `on_pointer_down`. If nothing qualifies, focus is
    /// left as it was. Returns the component that was hit.
    pub fn on_pointer_down(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        point: Point,
        button: PointerButton,
    ) -> Option<ComponentId> {
        self.drop_stale(world, tracer);
        let point = self.project(world, tracer, point)?;
        let hit = self.hit_focusable(world, point)?;
        self.change_focus(world, tracer, Some(hit), FocusCause::Pointer);
        world.with_interactive(hit, |i, cx| i.on_pointer_down(cx, point, button));
        Some(hit)
    }

    /// A button went up at `point`.
    ///
    /// The focused component receives `on_pointer_up`, with `still_over`
    /// telling whether the same hit test still lands on it.
    pub fn on_pointer_up(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        point: Point,
        button: PointerButton,
    ) {
        self.drop_stale(world, tracer);
        let Some(point) = self.project(world, tracer, point) else {
            return;
        };
        let hit = self.hit_focusable(world, point);
        if let Some(focus) = self.focus {
            let still_over = hit == Some(focus);
            world.with_interactive(focus, |i, cx| {
                i.on_pointer_up(cx, point, button, still_over);
            });
        }
    }

    /// The pointer moved to `point` at time `now`.
    ///
    /// The move is always forwarded to the focused component. Hover is
    /// re-evaluated at most once per [`RouterConfig::hover_interval`].
    pub fn on_pointer_move(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        now: HostTime,
        point: Point,
    ) {
        self.drop_stale(world, tracer);
        let Some(point) = self.project(world, tracer, point) else {
            return;
        };
        if let Some(focus) = self.focus {
            world.with_interactive(focus, |i, cx| i.on_pointer_move(cx, point));
        }

        let due = self.last_hover_eval.is_none_or(|last| {
            now.saturating_duration_since(last) >= self.config.hover_interval
        });
        if due {
            self.last_hover_eval = Some(now);
            let hit = self.hit_hoverable(world, point);
            self.change_hover(world, tracer, hit, now);
        }
    }

    /// The pointer left the window. Clears hover and resets the throttle.
    pub fn on_window_leave(&mut self, world: &mut World, tracer: &mut Tracer<'_>, now: HostTime) {
        self.drop_stale(world, tracer);
        self.change_hover(world, tracer, None, now);
        self.last_hover_eval = None;
    }

    /// A key event.
    ///
    /// A press of [`RouterConfig::focus_key`] moves focus to the next focus
    /// candidate in forward traversal order, or the previous one with
    /// [`RouterConfig::reverse_modifier`] held. Both directions wrap, and
    /// with no current focus the first candidate is chosen. Other phases of
    /// the focus key are swallowed. Every other key goes to the focused
    /// component.
    ///
    /// Returns whether the event was consumed.
    pub fn on_key(&mut self, world: &mut World, tracer: &mut Tracer<'_>, event: &KeyEvent) -> bool {
        self.drop_stale(world, tracer);
        if event.code == self.config.focus_key {
            if event.state == KeyState::Pressed {
                let reverse = !self.config.reverse_modifier.is_empty()
                    && event.modifiers.contains(self.config.reverse_modifier);
                self.navigate(world, tracer, reverse);
            }
            return true;
        }
        match self.focus {
            Some(focus) => world
                .with_interactive(focus, |i, cx| i.on_key(cx, event))
                .is_some(),
            None => false,
        }
    }

    // -- Programmatic focus --

    /// Moves focus to `target`.
    ///
    /// Returns whether the focus changed.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleComponent`] if `target` was removed.
    pub fn set_focus(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        target: ComponentId,
    ) -> Result<bool, TreeError> {
        if !world.is_component_alive(target) {
            return Err(TreeError::StaleComponent(target));
        }
        Ok(self.change_focus(world, tracer, Some(target), FocusCause::Programmatic))
    }

    /// Drops focus. Returns whether there was a focus to drop.
    pub fn clear_focus(&mut self, world: &mut World, tracer: &mut Tracer<'_>) -> bool {
        self.change_focus(world, tracer, None, FocusCause::Programmatic)
    }

    // -- Internals --

    fn drop_stale(&mut self, world: &mut World, tracer: &mut Tracer<'_>) {
        if let Some(focus) = self.focus
            && !is_live(world, focus)
        {
            log::debug!("canvas {:?}: dropping stale focus {focus:?}", self.node);
            self.change_focus(world, tracer, None, FocusCause::Stale);
        }
        if let Some(hover) = self.hover
            && !is_live(world, hover)
        {
            let now = world.clock();
            self.change_hover(world, tracer, None, now);
        }
    }

    /// Applies the projection. A miss drops focus and hover.
    fn project(&mut self, world: &mut World, tracer: &mut Tracer<'_>, point: Point) -> Option<Point> {
        let Some(projection) = &self.projection else {
            return Some(point);
        };
        let projected = projection.project(point);
        if projected.is_none() {
            log::trace!("canvas {:?}: {point:?} missed the surface", self.node);
            self.change_focus(world, tracer, None, FocusCause::ProjectionMiss);
            let now = world.clock();
            self.change_hover(world, tracer, None, now);
        }
        projected
    }

    fn hit_focusable(&self, world: &World, point: Point) -> Option<ComponentId> {
        world.find_component_rev(self.node, true, |c| {
            world
                .interactive(c)
                .is_some_and(|i| i.is_focusable() && i.is_enabled() && i.hit_test(point))
        })
    }

    fn hit_hoverable(&self, world: &World, point: Point) -> Option<ComponentId> {
        world.find_component_rev(self.node, true, |c| {
            world
                .interactive(c)
                .is_some_and(|i| i.is_enabled() && i.hit_test(point))
        })
    }

    fn navigate(&mut self, world: &mut World, tracer: &mut Tracer<'_>, reverse: bool) {
        let mut candidates = Vec::new();
        world.for_each_component(self.node, true, |c| {
            if world.is_focus_candidate(c) {
                candidates.push(c);
            }
            false
        });
        if candidates.is_empty() {
            return;
        }
        let n = candidates.len();
        let next = match self.focus.and_then(|f| candidates.iter().position(|&c| c == f)) {
            Some(i) if reverse => (i + n - 1) % n,
            Some(i) => (i + 1) % n,
            None => 0,
        };
        self.change_focus(world, tracer, Some(candidates[next]), FocusCause::Keyboard);
    }

    fn change_focus(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        to: Option<ComponentId>,
        cause: FocusCause,
    ) -> bool {
        if self.focus == to {
            return false;
        }
        let from = core::mem::replace(&mut self.focus, to);
        if let Some(old) = from {
            world.with_interactive(old, |i, cx| i.on_focus_leave(cx));
        }
        if let Some(new) = to {
            world.with_interactive(new, |i, cx| i.on_focus_enter(cx));
        }
        tracer.focus_change(&FocusChangeEvent {
            canvas: self.node,
            from,
            to,
            cause,
        });
        true
    }

    fn change_hover(
        &mut self,
        world: &mut World,
        tracer: &mut Tracer<'_>,
        to: Option<ComponentId>,
        timestamp: HostTime,
    ) {
        if self.hover == to {
            return;
        }
        let from = core::mem::replace(&mut self.hover, to);
        if let Some(old) = from {
            world.with_interactive(old, |i, cx| i.on_pointer_leave(cx));
        }
        if let Some(new) = to {
            world.with_interactive(new, |i, cx| i.on_pointer_enter(cx));
        }
        tracer.hover_change(&HoverChangeEvent {
            canvas: self.node,
            from,
            to,
            timestamp,
        });
    }
}

fn is_live(world: &World, id: ComponentId) -> bool {
    world.is_component_active_in_hierarchy(id).unwrap_or(false)
}
