//! Input handling for keyboard and mouse, mapped onto flight axes and actions.

mod bindings;

pub use bindings::*;

use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Buttons currently held down.
    held: HashSet<Button>,
    /// Buttons pressed this frame.
    pressed: HashSet<Button>,
    /// Buttons released this frame.
    released: HashSet<Button>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        self.process_button(Button::Key(key), state);
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_button(Button::Mouse(button), state);
    }

    /// Process a press or release of any bound button.
    pub fn process_button(&mut self, button: Button, state: ElementState) {
        log::trace!("{:?} {:?}", button, state);
        match state {
            ElementState::Pressed => {
                if !self.held.contains(&button) {
                    self.pressed.insert(button);
                }
                self.held.insert(button);
            }
            ElementState::Released => {
                if self.held.remove(&button) {
                    self.released.insert(button);
                }
            }
        }
    }

    /// Check if a button is currently held.
    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    /// Check if a button was pressed this frame.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    /// Check if a button was released this frame.
    pub fn is_released(&self, button: Button) -> bool {
        self.released.contains(&button)
    }

    /// Current value of a continuous axis: the sum of every held binding's
    /// scale, clamped to `[-1, 1]`.
    pub fn axis(&self, bindings: &InputBindings, axis: Axis) -> f32 {
        bindings
            .axis_bindings(axis)
            .filter(|binding| self.is_held(binding.button))
            .map(|binding| binding.scale)
            .sum::<f32>()
            .clamp(-1.0, 1.0)
    }

    /// All six flight axes for this frame.
    pub fn flight_axes(&self, bindings: &InputBindings) -> FlightAxes {
        FlightAxes {
            pitch: self.axis(bindings, Axis::Pitch),
            yaw: self.axis(bindings, Axis::Yaw),
            roll: self.axis(bindings, Axis::Roll),
            forward: self.axis(bindings, Axis::Forward),
            strafe: self.axis(bindings, Axis::Strafe),
            vertical: self.axis(bindings, Axis::Vertical),
        }
    }

    /// Edge-triggered action events for this frame, presses before releases.
    pub fn action_events(&self, bindings: &InputBindings) -> Vec<ActionEvent> {
        let presses = bindings
            .actions
            .iter()
            .filter(|binding| self.is_pressed(binding.button))
            .map(|binding| ActionEvent::pressed(binding.action));
        let releases = bindings
            .actions
            .iter()
            .filter(|binding| self.is_released(binding.button))
            .map(|binding| ActionEvent::released(binding.action));
        presses.chain(releases).collect()
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
