// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and keyboard routing over a node subtree.
//!
//! A [`Canvas`] owns one node and turns decoded device events into
//! component-level focus, hover, and pointer callbacks on the components
//! below it whose behaviors implement [`Interactive`]. Node behaviors are
//! not routed.
//!
//! Hit-testing walks the canvas subtree in reverse traversal order (see
//! [`World::for_each_component_rev`]), so among overlapping components the
//! one drawn last wins. Keyboard focus navigation walks the same subtree in
//! forward order.
//!
//! When the canvas is rendered onto an off-screen surface, a
//! [`SurfaceProjection`] maps screen coordinates into canvas space first. A
//! projection miss skips hit-testing and drops focus and hover.

mod canvas;
mod event;

use kurbo::Point;

use crate::component::Context;
use crate::id::ComponentId;
use crate::node::World;
use crate::time::Duration;

pub use canvas::Canvas;
pub use event::{KeyCode, KeyEvent, KeyState, Modifiers, PointerButton};

/// Pointer and keyboard behavior of a component.
///
/// Returned from [`Behavior::interactive`](crate::component::Behavior::interactive).
/// All callbacks default to no-ops; [`hit_test`](Self::hit_test) defaults to
/// never hit.
pub trait Interactive {
    /// Whether the component can take keyboard focus.
    fn is_focusable(&self) -> bool {
        true
    }

    /// Whether the component currently accepts input.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Whether `point`, in canvas space, lies on the component.
    fn hit_test(&self, point: Point) -> bool {
        _ = point;
        false
    }

    /// The component became the focus.
    fn on_focus_enter(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// The component stopped being the focus.
    fn on_focus_leave(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// The pointer started hovering the component.
    fn on_pointer_enter(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// The pointer stopped hovering the component.
    fn on_pointer_leave(&mut self, cx: &mut Context<'_>) {
        _ = cx;
    }

    /// A button went down over the component.
    fn on_pointer_down(&mut self, cx: &mut Context<'_>, point: Point, button: PointerButton) {
        _ = (cx, point, button);
    }

    /// A button went up while the component had focus. `still_over` tells
    /// whether the release happened over the same component.
    fn on_pointer_up(
        &mut self,
        cx: &mut Context<'_>,
        point: Point,
        button: PointerButton,
        still_over: bool,
    ) {
        _ = (cx, point, button, still_over);
    }

    /// The pointer moved while the component had focus.
    fn on_pointer_move(&mut self, cx: &mut Context<'_>, point: Point) {
        _ = (cx, point);
    }

    /// A key event other than focus navigation, while focused.
    fn on_key(&mut self, cx: &mut Context<'_>, event: &KeyEvent) {
        _ = (cx, event);
    }
}

/// Maps a screen-space pointer position onto an off-screen canvas surface.
pub trait SurfaceProjection {
    /// Returns the canvas-space point, or `None` if the surface was missed.
    fn project(&self, point: Point) -> Option<Point>;
}

impl<F> SurfaceProjection for F
where
    F: Fn(Point) -> Option<Point>,
{
    fn project(&self, point: Point) -> Option<Point> {
        self(point)
    }
}

/// Configuration for a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouterConfig {
    /// Minimum time between hover re-evaluations on pointer moves.
    pub hover_interval: Duration,
    /// Key that moves focus to the next candidate.
    pub focus_key: KeyCode,
    /// Modifier that reverses focus navigation.
    pub reverse_modifier: Modifiers,
}

impl RouterConfig {
    /// 200 ms hover throttle, Tab / Shift+Tab navigation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hover_interval: Duration::from_millis(200),
            focus_key: KeyCode::Tab,
            reverse_modifier: Modifiers::SHIFT,
        }
    }

    /// Re-evaluates hover on every move.
    #[must_use]
    pub const fn unthrottled() -> Self {
        Self {
            hover_interval: Duration::ZERO,
            ..Self::new()
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// The [`Interactive`] side of a component's behavior, if it has one.
    ///
    /// `None` for stale handles and for behaviors that are running a hook.
    #[must_use]
    pub fn interactive(&self, id: ComponentId) -> Option<&dyn Interactive> {
        if !self.components.is_alive(id) {
            return None;
        }
        self.components.behavior[id.idx as usize]
            .as_deref()?
            .interactive()
    }

    /// Whether a component can take focus right now.
    pub(crate) fn is_focus_candidate(&self, id: ComponentId) -> bool {
        self.interactive(id)
            .is_some_and(|i| i.is_focusable() && i.is_enabled())
    }
}
