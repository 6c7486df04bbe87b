// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded device events consumed by the [`Canvas`](super::Canvas).

use bitflags::bitflags;

/// Which pointer button a press or release refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, pen tip, or touch contact.
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
    /// Any other button, by platform index.
    Other(u16),
}

/// A key, reduced to what focus navigation and widgets care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Tab.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// A key that produces a character.
    Char(char),
    /// Anything else, by platform scan code.
    Other(u32),
}

bitflags! {
    /// Held modifier keys.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Super / Command / Windows.
        const META  = 0b0000_1000;
    }
}

/// Phase of a key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key went down (including auto-repeat).
    Pressed,
    /// Key went up.
    Released,
    /// Modifier state changed without a key transition.
    Changed,
}

/// A decoded keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    /// Down, up, or modifier change.
    pub state: KeyState,
}

impl KeyEvent {
    /// A press of `code` with no modifiers.
    #[must_use]
    pub const fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            state: KeyState::Pressed,
        }
    }

    /// A release of `code` with no modifiers.
    #[must_use]
    pub const fn released(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            state: KeyState::Released,
        }
    }

    /// Returns the event with `modifiers` held.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn modifier_set_operations() {
        let m = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(m.contains(Modifiers::SHIFT));
        assert!(m.contains(Modifiers::SHIFT | Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
        assert!(m.contains(Modifiers::empty()));
        assert!(Modifiers::default().is_empty());
    }

    #[test]
    fn modifier_debug_lists_flags() {
        assert_eq!(
            format!("{:?}", Modifiers::SHIFT | Modifiers::META),
            "Modifiers(SHIFT | META)"
        );
    }

    #[test]
    fn key_event_builders() {
        let e = KeyEvent::pressed(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);
        assert_eq!(e.state, KeyState::Pressed);
        assert_eq!(e.modifiers, Modifiers::SHIFT);
        assert_eq!(KeyEvent::released(KeyCode::Enter).state, KeyState::Released);
    }
}
