//! Input events.
//!
//! The tree combo box never talks to a window system. Whatever drives it (a
//! toolkit bridge, a test, the headless demo) builds these values and hands
//! them to [`Widget::event`](super::Widget::event) or
//! [`TreeComboBox::popup_event`](super::widgets::TreeComboBox::popup_event).
//! A handler that uses an event marks it accepted.

use tree_combo_core::Point;

/// Modifier keys held while an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    pub shift: bool,
    /// Control, or Command on macOS.
    pub control: bool,
    /// Alt, or Option on macOS.
    pub alt: bool,
}

impl KeyboardModifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Alt alone; Alt+Down and Alt+Up open and close the popup.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the combo box and its popup react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    NumpadEnter,
    Escape,
    Space,
    Tab,
    F4,
    /// Any other key, identified by a host-specific code.
    Other(u32),
}

/// A mouse button going down or up.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    pub button: MouseButton,
    /// Position relative to the receiving surface's top-left corner.
    pub local_pos: Point,
    pub modifiers: KeyboardModifiers,
    accepted: bool,
}

/// A mouse button going down.
pub type MousePressEvent = MouseEvent;
/// A mouse button going up.
pub type MouseReleaseEvent = MouseEvent;

impl MouseEvent {
    pub fn new(button: MouseButton, local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            local_pos,
            modifiers,
            accepted: false,
        }
    }
}

/// A key going down.
#[derive(Debug, Clone, Copy)]
pub struct KeyPressEvent {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
    accepted: bool,
}

impl KeyPressEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            key,
            modifiers,
            accepted: false,
        }
    }
}

/// An event delivered to a widget.
#[derive(Debug, Clone, Copy)]
pub enum WidgetEvent {
    MousePress(MousePressEvent),
    MouseRelease(MouseReleaseEvent),
    KeyPress(KeyPressEvent),
}

impl WidgetEvent {
    /// A left-button press at `pos`.
    pub fn left_press(pos: impl Into<Point>) -> Self {
        Self::MousePress(MouseEvent::new(
            MouseButton::Left,
            pos.into(),
            KeyboardModifiers::NONE,
        ))
    }

    /// A left-button release at `pos`.
    pub fn left_release(pos: impl Into<Point>) -> Self {
        Self::MouseRelease(MouseEvent::new(
            MouseButton::Left,
            pos.into(),
            KeyboardModifiers::NONE,
        ))
    }

    /// A key press without modifiers.
    pub fn key(key: Key) -> Self {
        Self::KeyPress(KeyPressEvent::new(key, KeyboardModifiers::NONE))
    }

    fn accepted_mut(&mut self) -> &mut bool {
        match self {
            Self::MousePress(e) | Self::MouseRelease(e) => &mut e.accepted,
            Self::KeyPress(e) => &mut e.accepted,
        }
    }

    pub fn is_accepted(&self) -> bool {
        match self {
            Self::MousePress(e) | Self::MouseRelease(e) => e.accepted,
            Self::KeyPress(e) => e.accepted,
        }
    }

    pub fn accept(&mut self) {
        *self.accepted_mut() = true;
    }

    pub fn ignore(&mut self) {
        *self.accepted_mut() = false;
    }

    /// Position of a mouse event; `None` for keys.
    pub fn mouse_pos(&self) -> Option<Point> {
        match self {
            Self::MousePress(e) | Self::MouseRelease(e) => Some(e.local_pos),
            Self::KeyPress(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_start_unaccepted() {
        let mut event = WidgetEvent::key(Key::Enter);
        assert!(!event.is_accepted());
        event.accept();
        assert!(event.is_accepted());
        event.ignore();
        assert!(!event.is_accepted());

        let mut release = WidgetEvent::left_release((1.0, 1.0));
        release.accept();
        assert!(release.is_accepted());
    }

    #[test]
    fn test_mouse_pos() {
        let event = WidgetEvent::left_press((3.0, 4.0));
        assert_eq!(event.mouse_pos(), Some(Point::new(3.0, 4.0)));
        assert_eq!(WidgetEvent::key(Key::Space).mouse_pos(), None);
    }
}
