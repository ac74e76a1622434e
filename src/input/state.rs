//! Input state management
//!
//! Polls the keyboard/mouse (macroquad) and every gamepad (gilrs) once per
//! frame and feeds the snapshots to the device list. Device 0 is always the
//! keyboard; each connected pad adds one controller device.

use macroquad::input::{is_key_down, is_mouse_button_down, mouse_position};
use macroquad::window::{screen_height, screen_width};

use super::controls::{Key, Mouse};
use super::device::{DeviceState, InputDevice};
use super::gamepad::Gamepads;
use crate::config::InputConfig;
use crate::rasterizer::{screen_to_display, Vec2};

pub struct InputState {
    gamepads: Option<Gamepads>,
    devices: Vec<InputDevice>,
    config: InputConfig,
    /// Physical resolution the pointer is mapped into
    display: Vec2,
}

impl InputState {
    /// Never fails: without a usable gamepad the device list is keyboard-only.
    pub fn new(config: &InputConfig, display: (usize, usize)) -> Self {
        let mut state = Self::keyboard_only(config, display);

        match Gamepads::new() {
            Ok(pads) => {
                if let Err(e) = pads.require_any() {
                    tracing::warn!(error = %e, "keyboard only until a controller connects");
                }
                for slot in 0..pads.count() {
                    state.add_controller(slot);
                }
                state.gamepads = Some(pads);
            }
            Err(e) => tracing::warn!(error = %e, "gamepad backend unavailable, keyboard only"),
        }

        tracing::info!(devices = state.devices.len(), "input ready");
        state
    }

    pub fn keyboard_only(config: &InputConfig, display: (usize, usize)) -> Self {
        Self {
            gamepads: None,
            devices: vec![InputDevice::keyboard(config.keyboard.clone())],
            config: config.clone(),
            display: Vec2::new(display.0 as f32, display.1 as f32),
        }
    }

    /// New physical resolution for pointer mapping
    pub fn set_display(&mut self, display: (usize, usize)) {
        self.display = Vec2::new(display.0 as f32, display.1 as f32);
    }

    fn add_controller(&mut self, slot: usize) -> usize {
        self.devices.push(InputDevice::controller(
            slot,
            self.config.deadzone,
            self.config.controller.clone(),
        ));
        self.devices.len() - 1
    }

    /// Once per frame. Returns indices of devices added by hot-plug.
    pub fn poll(&mut self) -> Vec<usize> {
        let new_slots = self.gamepads.as_mut().map(Gamepads::poll).unwrap_or_default();
        let added: Vec<usize> = new_slots.into_iter().map(|slot| self.add_controller(slot)).collect();

        let keyboard = keyboard_snapshot(self.display);
        for device in &mut self.devices {
            let snapshot = match device {
                InputDevice::Keyboard(_) => Some(keyboard.clone()),
                InputDevice::Controller { pad, .. } => self.gamepads.as_ref().and_then(|p| p.snapshot(*pad)),
            };
            // Disconnected pads read as idle
            device.update(snapshot.unwrap_or_default());
        }
        added
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }
}

/// The pointer is reported in display pixels, undoing the letterbox
fn keyboard_snapshot(display: Vec2) -> DeviceState {
    let (x, y) = mouse_position();
    let screen = Vec2::new(screen_width(), screen_height());
    DeviceState {
        keys: Key::ALL.into_iter().filter(|k| is_key_down(k.keycode())).collect(),
        mouse: Mouse::ALL.into_iter().filter(|m| is_mouse_button_down(m.button())).collect(),
        pointer: screen_to_display(Vec2::new(x, y), display, screen),
        ..DeviceState::default()
    }
}
