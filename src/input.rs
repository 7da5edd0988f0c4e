//! Input sources
//!
//! Devices are polled by the host, which forwards platform events as
//! `InputEvent`s. Every source produces the same normalized `TickInput`, so
//! the simulation never knows which device is in use. Device enumeration is
//! left to the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{HorizontalIntent, TickInput};

/// Platform-neutral key identifier; hosts map their key codes onto it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    D,
    W,
    S,
    Space,
    Left,
    Right,
    Up,
    Down,
    Other(u32),
}

/// Keyboard bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub move_left: Key,
    pub move_right: Key,
    pub jump: Key,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_left: Key::A,
            move_right: Key::D,
            jump: Key::Space,
        }
    }
}

/// Raw device events forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Controller axis moved (sticks 0-3, triggers 4-5), value in [-1, 1]
    AxisMotion { axis: u8, value: f32 },
    ButtonDown(u8),
    ButtonUp(u8),
}

/// Zero out stick drift below `deadzone`
#[inline]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone { 0.0 } else { value }
}

/// Held-key tracking for the keyboard
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub controls: Controls,
    left_held: bool,
    right_held: bool,
    jump_queued: bool,
}

impl KeyboardState {
    pub fn new(controls: Controls) -> Self {
        Self {
            controls,
            ..Default::default()
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                if key == self.controls.move_left {
                    self.left_held = true;
                } else if key == self.controls.move_right {
                    self.right_held = true;
                }
                if key == self.controls.jump {
                    self.jump_queued = true;
                }
            }
            InputEvent::KeyUp(key) => {
                if key == self.controls.move_left {
                    self.left_held = false;
                }
                if key == self.controls.move_right {
                    self.right_held = false;
                }
            }
            _ => {}
        }
    }

    /// Current intent; a queued jump is consumed
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            horizontal: HorizontalIntent::from_held(self.left_held, self.right_held),
            jump: std::mem::take(&mut self.jump_queued),
        }
    }
}

/// Analog trigger with press/release edge detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    pub axis: u8,
    /// Last raw value (-1 released, 1 fully pressed)
    pub value: f32,
    /// Crossed the stop threshold this update
    pub down: bool,
    /// Fell back below the stop threshold this update
    pub up: bool,
    pub activated: bool,
    /// Threshold separating pressed from released
    pub stop: f32,
}

impl Trigger {
    pub fn new(axis: u8) -> Self {
        Self {
            axis,
            value: -1.0,
            down: false,
            up: false,
            activated: false,
            stop: 0.0,
        }
    }

    pub fn update(&mut self, value: f32) {
        self.value = value;
        if value > self.stop {
            self.down = !self.activated;
            self.activated = true;
            self.up = false;
        } else if value < self.stop {
            self.up = self.activated;
            self.activated = false;
            self.down = false;
        } else {
            self.down = false;
            self.up = false;
        }
    }
}

/// Controller layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerControls {
    /// Button index that jumps (south face button on most pads)
    pub jump_button: u8,
}

/// Stick, trigger and button tracking for a game controller
#[derive(Debug, Clone)]
pub struct ControllerState {
    pub name: String,
    pub controls: ControllerControls,
    pub deadzone: f32,
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: Trigger,
    pub right_trigger: Trigger,
    jump_queued: bool,
}

impl ControllerState {
    pub fn new(name: impl Into<String>, controls: ControllerControls, deadzone: f32) -> Self {
        Self {
            name: name.into(),
            controls,
            deadzone,
            left_stick: Vec2::ZERO,
            right_stick: Vec2::ZERO,
            left_trigger: Trigger::new(4),
            right_trigger: Trigger::new(5),
            jump_queued: false,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::AxisMotion { axis, value } => {
                let dz = apply_deadzone(value, self.deadzone);
                match axis {
                    0 => self.left_stick.x = dz,
                    1 => self.left_stick.y = dz,
                    2 => self.right_stick.x = dz,
                    3 => self.right_stick.y = dz,
                    a if a == self.left_trigger.axis => self.left_trigger.update(value),
                    a if a == self.right_trigger.axis => self.right_trigger.update(value),
                    other => log::trace!("Unmapped controller axis {other}"),
                }
            }
            InputEvent::ButtonDown(button) if button == self.controls.jump_button => {
                self.jump_queued = true;
            }
            _ => {}
        }
    }

    /// Current intent; a queued jump is consumed
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            horizontal: HorizontalIntent::from_axis(self.left_stick.x),
            jump: std::mem::take(&mut self.jump_queued),
        }
    }
}

/// The device driving the player, chosen when the session starts
#[derive(Debug, Clone)]
pub enum InputSource {
    Keyboard(KeyboardState),
    Controller(ControllerState),
}

impl InputSource {
    pub fn keyboard(controls: Controls) -> Self {
        InputSource::Keyboard(KeyboardState::new(controls))
    }

    pub fn controller(name: impl Into<String>, deadzone: f32) -> Self {
        InputSource::Controller(ControllerState::new(name, ControllerControls::default(), deadzone))
    }

    pub fn name(&self) -> &str {
        match self {
            InputSource::Keyboard(_) => "keyboard",
            InputSource::Controller(c) => &c.name,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match self {
            InputSource::Keyboard(k) => k.handle_event(event),
            InputSource::Controller(c) => c.handle_event(event),
        }
    }

    pub fn sample(&mut self) -> TickInput {
        match self {
            InputSource::Keyboard(k) => k.sample(),
            InputSource::Controller(c) => c.sample(),
        }
    }
}
