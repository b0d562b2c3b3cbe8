//! Named flight axes and actions, and the buttons bound to them.

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// A physical key or mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Continuous control axes, sampled every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Pitch,
    Yaw,
    Roll,
    Forward,
    Strafe,
    Vertical,
}

/// Discrete, edge-triggered actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleView,
    ToggleLight,
    PrimaryFire,
    /// Select weapon slot 0..=9.
    SelectWeapon(u8),
}

/// Whether an action's button went down or came up this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEvent {
    pub action: Action,
    pub phase: ActionPhase,
}

impl ActionEvent {
    pub fn pressed(action: Action) -> Self {
        Self {
            action,
            phase: ActionPhase::Pressed,
        }
    }

    pub fn released(action: Action) -> Self {
        Self {
            action,
            phase: ActionPhase::Released,
        }
    }
}

/// Snapshot of the six flight axes, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightAxes {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub forward: f32,
    pub strafe: f32,
    pub vertical: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct AxisBinding {
    pub button: Button,
    pub axis: Axis,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionBinding {
    pub button: Button,
    pub action: Action,
}

/// Button → axis/action mapping.
#[derive(Debug, Clone, Default)]
pub struct InputBindings {
    pub axes: Vec<AxisBinding>,
    pub actions: Vec<ActionBinding>,
}

const WEAPON_SLOT_KEYS: [KeyCode; 10] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
    KeyCode::Digit0,
];

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default craft layout:
    /// - W/S forward thrust, A/D strafe, Space/Ctrl vertical
    /// - arrow keys pitch and yaw, Q/E roll
    /// - V view, L spot light, left mouse fire, 1..0 weapon slots
    pub fn default_flight() -> Self {
        let mut bindings = Self::new();
        bindings
            .bind_axis(Button::Key(KeyCode::KeyW), Axis::Forward, 1.0)
            .bind_axis(Button::Key(KeyCode::KeyS), Axis::Forward, -1.0)
            .bind_axis(Button::Key(KeyCode::KeyD), Axis::Strafe, 1.0)
            .bind_axis(Button::Key(KeyCode::KeyA), Axis::Strafe, -1.0)
            .bind_axis(Button::Key(KeyCode::Space), Axis::Vertical, 1.0)
            .bind_axis(Button::Key(KeyCode::ControlLeft), Axis::Vertical, -1.0)
            .bind_axis(Button::Key(KeyCode::ArrowUp), Axis::Pitch, 1.0)
            .bind_axis(Button::Key(KeyCode::ArrowDown), Axis::Pitch, -1.0)
            .bind_axis(Button::Key(KeyCode::ArrowRight), Axis::Yaw, 1.0)
            .bind_axis(Button::Key(KeyCode::ArrowLeft), Axis::Yaw, -1.0)
            .bind_axis(Button::Key(KeyCode::KeyE), Axis::Roll, 1.0)
            .bind_axis(Button::Key(KeyCode::KeyQ), Axis::Roll, -1.0)
            .bind_action(Button::Key(KeyCode::KeyV), Action::ToggleView)
            .bind_action(Button::Key(KeyCode::KeyL), Action::ToggleLight)
            .bind_action(Button::Mouse(MouseButton::Left), Action::PrimaryFire);

        for (slot, key) in (0u8..).zip(WEAPON_SLOT_KEYS) {
            bindings.bind_action(Button::Key(key), Action::SelectWeapon(slot));
        }
        bindings
    }

    pub fn bind_axis(&mut self, button: Button, axis: Axis, scale: f32) -> &mut Self {
        self.axes.push(AxisBinding {
            button,
            axis,
            scale,
        });
        self
    }

    pub fn bind_action(&mut self, button: Button, action: Action) -> &mut Self {
        self.actions.push(ActionBinding { button, action });
        self
    }

    pub(crate) fn axis_bindings(&self, axis: Axis) -> impl Iterator<Item = &AxisBinding> + '_ {
        self.axes.iter().filter(move |binding| binding.axis == axis)
    }

    /// First button bound to an action, for scripted input.
    pub fn button_for(&self, action: Action) -> Option<Button> {
        self.actions
            .iter()
            .find(|binding| binding.action == action)
            .map(|binding| binding.button)
    }

    /// First button driving `axis` in the direction of `sign`.
    pub fn button_for_axis(&self, axis: Axis, sign: f32) -> Option<Button> {
        self.axis_bindings(axis)
            .find(|binding| binding.scale * sign > 0.0)
            .map(|binding| binding.button)
    }
}
