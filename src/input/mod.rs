//! Input handling with gamepad support
//!
//! Provides an action-based input system over keyboard/mouse and gamepads.
//! Each physical device becomes one `InputDevice`, and each device drives
//! one player.
//!
//! Native: Uses gilrs crate for cross-platform gamepad input
//! WASM: Keyboard and mouse only

mod actions;
mod controls;
mod device;
mod gamepad;
mod state;

pub use actions::Action;
pub use controls::{Binding, Controls, Key, Mouse, PadButton};
pub use device::{apply_deadzone, Aim, DeviceState, InputDevice, TRIGGER_THRESHOLD};
pub use gamepad::Gamepads;
pub use state::InputState;
