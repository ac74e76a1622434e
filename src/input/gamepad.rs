//! Gamepad backend
//!
//! Native: gilrs. WASM: no backend; the game runs keyboard-only.
//!
//! `Gamepads::new` fails with `InputDeviceUnavailable` when there is no
//! backend, and `require_any` when no pad is plugged in. Callers fall back
//! to the keyboard in both cases.

use super::device::DeviceState;
use crate::error::Result;

// ============================================================================
// Native Implementation (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use crate::error::Error;
    use crate::input::controls::PadButton;
    use crate::rasterizer::Vec2;
    use gilrs::{Axis, Button, GamepadId, Gilrs};

    fn gilrs_button(button: PadButton) -> Button {
        match button {
            PadButton::South => Button::South,
            PadButton::East => Button::East,
            PadButton::West => Button::West,
            PadButton::North => Button::North,
            PadButton::LeftBumper => Button::LeftTrigger,
            PadButton::RightBumper => Button::RightTrigger,
            PadButton::Select => Button::Select,
            PadButton::Start => Button::Start,
            PadButton::LeftStick => Button::LeftThumb,
            PadButton::RightStick => Button::RightThumb,
            PadButton::DPadUp => Button::DPadUp,
            PadButton::DPadDown => Button::DPadDown,
            PadButton::DPadLeft => Button::DPadLeft,
            PadButton::DPadRight => Button::DPadRight,
        }
    }

    pub struct Gamepads {
        gilrs: Gilrs,
        /// Pads in connection order; a slot keeps its id after disconnect
        slots: Vec<GamepadId>,
    }

    impl Gamepads {
        pub fn new() -> Result<Self> {
            let gilrs = Gilrs::new().map_err(|e| Error::InputDeviceUnavailable(e.to_string()))?;
            let slots: Vec<GamepadId> = gilrs.gamepads().map(|(id, _)| id).collect();
            for (slot, (_, pad)) in gilrs.gamepads().enumerate() {
                tracing::info!(slot, name = pad.name(), "gamepad connected");
            }
            Ok(Self { gilrs, slots })
        }

        pub fn require_any(&self) -> Result<()> {
            if self.slots.is_empty() {
                return Err(Error::InputDeviceUnavailable("no controllers detected".into()));
            }
            Ok(())
        }

        /// Drain backend events. Returns slots of pads connected since the
        /// last poll.
        pub fn poll(&mut self) -> Vec<usize> {
            let mut added = Vec::new();
            while let Some(event) = self.gilrs.next_event() {
                if let gilrs::EventType::Connected = event.event {
                    if !self.slots.contains(&event.id) {
                        self.slots.push(event.id);
                        let slot = self.slots.len() - 1;
                        tracing::info!(slot, "gamepad hot-plugged");
                        added.push(slot);
                    }
                }
            }
            added
        }

        pub fn count(&self) -> usize {
            self.slots.len()
        }

        /// Snapshot of one pad; `None` if it is disconnected.
        pub fn snapshot(&self, slot: usize) -> Option<DeviceState> {
            let id = *self.slots.get(slot)?;
            let pad = self.gilrs.connected_gamepad(id)?;

            let buttons = PadButton::ALL
                .into_iter()
                .filter(|&b| pad.is_pressed(gilrs_button(b)))
                .collect();
            let trigger = |button: Button| {
                pad.button_data(button)
                    .map(|data| data.value())
                    .unwrap_or(if pad.is_pressed(button) { 1.0 } else { 0.0 })
            };

            Some(DeviceState {
                buttons,
                left_trigger: trigger(Button::LeftTrigger2),
                right_trigger: trigger(Button::RightTrigger2),
                // gilrs reports +y as up
                left_stick: Vec2::new(pad.value(Axis::LeftStickX), -pad.value(Axis::LeftStickY)),
                right_stick: Vec2::new(pad.value(Axis::RightStickX), -pad.value(Axis::RightStickY)),
                ..DeviceState::default()
            })
        }
    }
}

// ============================================================================
// WASM (no backend)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;
    use crate::error::Error;

    pub struct Gamepads;

    impl Gamepads {
        pub fn new() -> Result<Self> {
            Err(Error::InputDeviceUnavailable("no gamepad backend on this target".into()))
        }

        pub fn require_any(&self) -> Result<()> {
            Err(Error::InputDeviceUnavailable("no controllers detected".into()))
        }

        pub fn poll(&mut self) -> Vec<usize> {
            Vec::new()
        }

        pub fn count(&self) -> usize {
            0
        }

        pub fn snapshot(&self, _slot: usize) -> Option<DeviceState> {
            None
        }
    }
}

pub use platform::Gamepads;
