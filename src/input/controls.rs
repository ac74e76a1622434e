//! Control bindings
//!
//! Physical inputs are named by our own serde enums so that bindings can
//! live in the RON config. `Key` maps onto macroquad's `KeyCode` and
//! `PadButton` onto gilrs buttons.

use macroquad::input::{KeyCode, MouseButton};
use serde::{Deserialize, Serialize};

use super::Action;

/// Keyboard keys that can be bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    P,
    Up,
    Down,
    Left,
    Right,
    Space,
    LeftShift,
    LeftControl,
    Tab,
    Enter,
    Escape,
}

impl Key {
    pub const ALL: [Key; 19] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::R,
        Key::F,
        Key::P,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Space,
        Key::LeftShift,
        Key::LeftControl,
        Key::Tab,
        Key::Enter,
        Key::Escape,
    ];

    pub fn keycode(&self) -> KeyCode {
        match self {
            Key::W => KeyCode::W,
            Key::A => KeyCode::A,
            Key::S => KeyCode::S,
            Key::D => KeyCode::D,
            Key::Q => KeyCode::Q,
            Key::E => KeyCode::E,
            Key::R => KeyCode::R,
            Key::F => KeyCode::F,
            Key::P => KeyCode::P,
            Key::Up => KeyCode::Up,
            Key::Down => KeyCode::Down,
            Key::Left => KeyCode::Left,
            Key::Right => KeyCode::Right,
            Key::Space => KeyCode::Space,
            Key::LeftShift => KeyCode::LeftShift,
            Key::LeftControl => KeyCode::LeftControl,
            Key::Tab => KeyCode::Tab,
            Key::Enter => KeyCode::Enter,
            Key::Escape => KeyCode::Escape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mouse {
    Left,
    Right,
    Middle,
}

impl Mouse {
    pub const ALL: [Mouse; 3] = [Mouse::Left, Mouse::Right, Mouse::Middle];

    pub fn button(&self) -> MouseButton {
        match self {
            Mouse::Left => MouseButton::Left,
            Mouse::Right => MouseButton::Right,
            Mouse::Middle => MouseButton::Middle,
        }
    }
}

/// Digital gamepad buttons (Xbox names in comments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PadButton {
    South,       // A
    East,        // B
    West,        // X
    North,       // Y
    LeftBumper,  // LB
    RightBumper, // RB
    Select,
    Start,
    LeftStick,   // L3
    RightStick,  // R3
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    pub const ALL: [PadButton; 14] = [
        PadButton::South,
        PadButton::East,
        PadButton::West,
        PadButton::North,
        PadButton::LeftBumper,
        PadButton::RightBumper,
        PadButton::Select,
        PadButton::Start,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
    ];
}

/// One physical input bound to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    Key(Key),
    Mouse(Mouse),
    Pad(PadButton),
    /// Analog trigger, held past the trigger threshold
    LeftTrigger,
    RightTrigger,
    Unbound,
}

/// Action -> binding table for one device kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub move_up: Binding,
    pub move_down: Binding,
    pub move_left: Binding,
    pub move_right: Binding,
    pub shoot: Binding,
    pub reload: Binding,
    pub dash: Binding,
    pub pause: Binding,
}

impl Controls {
    pub fn keyboard() -> Self {
        Self {
            move_up: Binding::Key(Key::W),
            move_down: Binding::Key(Key::S),
            move_left: Binding::Key(Key::A),
            move_right: Binding::Key(Key::D),
            shoot: Binding::Mouse(Mouse::Left),
            reload: Binding::Key(Key::R),
            dash: Binding::Key(Key::LeftShift),
            pause: Binding::Key(Key::Escape),
        }
    }

    /// Movement also comes from the left stick; the D-pad is a fallback.
    pub fn controller() -> Self {
        Self {
            move_up: Binding::Pad(PadButton::DPadUp),
            move_down: Binding::Pad(PadButton::DPadDown),
            move_left: Binding::Pad(PadButton::DPadLeft),
            move_right: Binding::Pad(PadButton::DPadRight),
            shoot: Binding::RightTrigger,
            reload: Binding::Pad(PadButton::North),
            dash: Binding::Pad(PadButton::East),
            pause: Binding::Pad(PadButton::Start),
        }
    }

    pub fn binding(&self, action: Action) -> Binding {
        match action {
            Action::MoveUp => self.move_up,
            Action::MoveDown => self.move_down,
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::Shoot => self.shoot,
            Action::Reload => self.reload,
            Action::Dash => self.dash,
            Action::Pause => self.pause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_every_action() {
        for controls in [Controls::keyboard(), Controls::controller()] {
            for action in Action::ALL {
                assert_ne!(controls.binding(action), Binding::Unbound, "{:?}", action);
            }
        }
    }

    #[test]
    fn test_controls_ron_round_trip() {
        let text = ron::to_string(&Controls::keyboard()).unwrap();
        assert!(text.contains("Key(LeftShift)"));
        let back: Controls = ron::from_str(&text).unwrap();
        assert_eq!(back, Controls::keyboard());
    }
}
