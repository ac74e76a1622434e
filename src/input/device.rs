//! Input devices
//!
//! A device is either the keyboard+mouse or one gamepad. Both are driven by
//! per-frame `DeviceState` snapshots and expose the same queries, so player
//! code never branches on the device kind except for aiming.

use std::collections::HashSet;

use super::controls::{Binding, Controls, Key, Mouse, PadButton};
use super::Action;
use crate::rasterizer::Vec2;

/// Analog trigger value that counts as "held"
pub const TRIGGER_THRESHOLD: f32 = 0.5;

/// Zero each axis whose magnitude is below `deadzone`
pub fn apply_deadzone(stick: Vec2, deadzone: f32) -> Vec2 {
    let axis = |v: f32| if v.abs() < deadzone { 0.0 } else { v };
    Vec2::new(axis(stick.x), axis(stick.y))
}

/// Everything read from one device in one frame. Sticks are screen
/// oriented (+y down).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    pub keys: HashSet<Key>,
    pub mouse: HashSet<Mouse>,
    pub buttons: HashSet<PadButton>,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    /// Mouse position in physical pixels
    pub pointer: Vec2,
}

impl DeviceState {
    pub fn is_down(&self, binding: Binding) -> bool {
        match binding {
            Binding::Key(key) => self.keys.contains(&key),
            Binding::Mouse(button) => self.mouse.contains(&button),
            Binding::Pad(button) => self.buttons.contains(&button),
            Binding::LeftTrigger => self.left_trigger >= TRIGGER_THRESHOLD,
            Binding::RightTrigger => self.right_trigger >= TRIGGER_THRESHOLD,
            Binding::Unbound => false,
        }
    }
}

/// Where a device is aiming this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Absolute pointer position in physical pixels
    Pointer(Vec2),
    /// Stick deflection; moves the cursor relatively
    Stick(Vec2),
}

/// Current and previous snapshot plus the bindings to read them with
#[derive(Debug, Clone)]
pub struct Bound {
    pub controls: Controls,
    current: DeviceState,
    previous: DeviceState,
}

impl Bound {
    pub fn new(controls: Controls) -> Self {
        Self {
            controls,
            current: DeviceState::default(),
            previous: DeviceState::default(),
        }
    }

    pub fn push(&mut self, state: DeviceState) {
        self.previous = std::mem::replace(&mut self.current, state);
    }

    pub fn current(&self) -> &DeviceState {
        &self.current
    }

    fn down(&self, action: Action) -> bool {
        self.current.is_down(self.controls.binding(action))
    }

    fn was_down(&self, action: Action) -> bool {
        self.previous.is_down(self.controls.binding(action))
    }

    /// -1/0/1 per axis from the four move actions
    fn digital_intent(&self) -> Vec2 {
        let axis = |neg: Action, pos: Action| {
            (self.down(pos) as i32 - self.down(neg) as i32) as f32
        };
        Vec2::new(
            axis(Action::MoveLeft, Action::MoveRight),
            axis(Action::MoveUp, Action::MoveDown),
        )
    }
}

#[derive(Debug, Clone)]
pub enum InputDevice {
    Keyboard(Bound),
    Controller {
        /// Slot in the gamepad list
        pad: usize,
        deadzone: f32,
        bound: Bound,
    },
}

impl InputDevice {
    pub fn keyboard(controls: Controls) -> Self {
        InputDevice::Keyboard(Bound::new(controls))
    }

    pub fn controller(pad: usize, deadzone: f32, controls: Controls) -> Self {
        InputDevice::Controller { pad, deadzone, bound: Bound::new(controls) }
    }

    fn bound(&self) -> &Bound {
        match self {
            InputDevice::Keyboard(bound) => bound,
            InputDevice::Controller { bound, .. } => bound,
        }
    }

    /// Feed this frame's snapshot. Sticks are deadzone filtered here.
    pub fn update(&mut self, mut state: DeviceState) {
        match self {
            InputDevice::Keyboard(bound) => bound.push(state),
            InputDevice::Controller { deadzone, bound, .. } => {
                state.left_stick = apply_deadzone(state.left_stick, *deadzone);
                state.right_stick = apply_deadzone(state.right_stick, *deadzone);
                bound.push(state);
            }
        }
    }

    /// Raw (unnormalized) movement direction. Keyboard axes are -1/0/1; the
    /// controller uses the left stick, or the D-pad when the stick is idle.
    pub fn movement_intent(&self) -> Vec2 {
        match self {
            InputDevice::Keyboard(bound) => bound.digital_intent(),
            InputDevice::Controller { bound, .. } => {
                let stick = bound.current.left_stick;
                if stick.is_zero() { bound.digital_intent() } else { stick }
            }
        }
    }

    pub fn action_down(&self, action: Action) -> bool {
        self.bound().down(action)
    }

    /// Down this frame, up the previous one
    pub fn action_pressed(&self, action: Action) -> bool {
        let bound = self.bound();
        bound.down(action) && !bound.was_down(action)
    }

    pub fn action_released(&self, action: Action) -> bool {
        let bound = self.bound();
        !bound.down(action) && bound.was_down(action)
    }

    pub fn aim(&self) -> Aim {
        match self {
            InputDevice::Keyboard(bound) => Aim::Pointer(bound.current.pointer),
            InputDevice::Controller { bound, .. } => Aim::Stick(bound.current.right_stick),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: &[Key]) -> DeviceState {
        DeviceState { keys: keys.iter().copied().collect(), ..DeviceState::default() }
    }

    #[test]
    fn test_keyboard_intent_is_digital() {
        let mut kb = InputDevice::keyboard(Controls::keyboard());
        kb.update(keys(&[Key::W, Key::D]));
        assert_eq!(kb.movement_intent(), Vec2::new(1.0, -1.0));

        // Opposite keys cancel
        kb.update(keys(&[Key::A, Key::D]));
        assert_eq!(kb.movement_intent(), Vec2::ZERO);
    }

    #[test]
    fn test_pressed_and_released_edges() {
        let mut kb = InputDevice::keyboard(Controls::keyboard());
        kb.update(keys(&[Key::R]));
        assert!(kb.action_pressed(Action::Reload));
        assert!(kb.action_down(Action::Reload));

        kb.update(keys(&[Key::R]));
        assert!(!kb.action_pressed(Action::Reload));
        assert!(kb.action_down(Action::Reload));

        kb.update(keys(&[]));
        assert!(kb.action_released(Action::Reload));
        assert!(!kb.action_down(Action::Reload));
    }

    #[test]
    fn test_deadzone_is_per_axis() {
        let v = apply_deadzone(Vec2::new(0.05, -0.8), 0.1);
        assert_eq!(v, Vec2::new(0.0, -0.8));
        assert_eq!(apply_deadzone(Vec2::new(-0.2, 0.09), 0.1), Vec2::new(-0.2, 0.0));
    }

    #[test]
    fn test_controller_uses_stick_then_dpad() {
        let mut pad = InputDevice::controller(0, 0.1, Controls::controller());
        pad.update(DeviceState {
            left_stick: Vec2::new(0.5, 0.05),
            buttons: [PadButton::DPadLeft].into_iter().collect(),
            ..DeviceState::default()
        });
        assert_eq!(pad.movement_intent(), Vec2::new(0.5, 0.0));

        pad.update(DeviceState {
            buttons: [PadButton::DPadLeft].into_iter().collect(),
            ..DeviceState::default()
        });
        assert_eq!(pad.movement_intent(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_trigger_threshold_and_aim() {
        let mut pad = InputDevice::controller(0, 0.1, Controls::controller());
        pad.update(DeviceState {
            right_trigger: 0.3,
            right_stick: Vec2::new(0.0, 0.7),
            ..DeviceState::default()
        });
        assert!(!pad.action_down(Action::Shoot));
        assert_eq!(pad.aim(), Aim::Stick(Vec2::new(0.0, 0.7)));

        pad.update(DeviceState { right_trigger: 0.9, ..DeviceState::default() });
        assert!(pad.action_pressed(Action::Shoot));

        let mut kb = InputDevice::keyboard(Controls::keyboard());
        kb.update(DeviceState { pointer: Vec2::new(10.0, 20.0), ..DeviceState::default() });
        assert_eq!(kb.aim(), Aim::Pointer(Vec2::new(10.0, 20.0)));
    }
}
