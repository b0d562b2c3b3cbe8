//! Scripted pilot: timed button presses fed through `InputState`, so the
//! headless binary exercises the same bindings a player would.

use input::{Action, Axis, Button, ElementState, InputBindings, InputState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotStep {
    /// Simulation time at which the step is applied.
    pub at: f32,
    pub button: Button,
    pub state: ElementState,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedPilot {
    steps: Vec<PilotStep>,
    next: usize,
    /// Releases held back from the previous call.
    deferred: Vec<PilotStep>,
}

impl ScriptedPilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `button` from `from` until `to`.
    pub fn hold(&mut self, button: Button, from: f32, to: f32) -> &mut Self {
        self.push(from, button, ElementState::Pressed);
        self.push(to, button, ElementState::Released);
        self
    }

    /// Press and release `button` on consecutive ticks starting at `at`.
    pub fn tap(&mut self, button: Button, at: f32) -> &mut Self {
        self.hold(button, at, at)
    }

    fn push(&mut self, at: f32, button: Button, state: ElementState) {
        let index = self.steps.partition_point(|step| step.at <= at);
        self.steps.insert(index, PilotStep { at, button, state });
    }

    /// A short sortie: thrust out, sweep the guns across the rock field with
    /// yaw and pitch, try an empty weapon slot, and swap views mid-run.
    pub fn patrol(bindings: &InputBindings) -> Self {
        let mut pilot = Self::new();
        let axis = |axis: Axis, sign: f32| bindings.button_for_axis(axis, sign);
        let action = |action: Action| bindings.button_for(action);

        let script: [(Option<Button>, f32, f32); 8] = [
            (axis(Axis::Forward, 1.0), 0.0, 3.0),
            (action(Action::PrimaryFire), 0.5, 25.0),
            (axis(Axis::Yaw, 1.0), 1.0, 4.5),
            (axis(Axis::Pitch, 1.0), 5.0, 6.0),
            (axis(Axis::Roll, -1.0), 6.5, 7.5),
            (axis(Axis::Strafe, 1.0), 8.0, 9.0),
            (axis(Axis::Yaw, -1.0), 10.0, 16.0),
            (axis(Axis::Vertical, -1.0), 17.0, 18.0),
        ];
        for (button, from, to) in script {
            match button {
                Some(button) => {
                    pilot.hold(button, from, to);
                }
                None => log::warn!("Scripted pilot: no binding for step at {from}s, skipped"),
            }
        }

        for (button, at) in [
            (action(Action::SelectWeapon(1)), 2.0),
            (action(Action::ToggleView), 12.0),
            (action(Action::ToggleLight), 14.0),
        ] {
            if let Some(button) = button {
                pilot.tap(button, at);
            }
        }
        pilot
    }

    /// Apply every step due at or before `time`. A release scheduled for the
    /// same time as its press is held back one call so the press registers.
    pub fn feed(&mut self, time: f32, input: &mut InputState) {
        for step in std::mem::take(&mut self.deferred) {
            input.process_button(step.button, step.state);
        }

        let mut pressed_now = Vec::new();
        while let Some(&step) = self.steps.get(self.next) {
            if step.at > time {
                break;
            }
            self.next += 1;
            if step.state == ElementState::Released && pressed_now.contains(&step.button) {
                self.deferred.push(step);
                continue;
            }
            if step.state == ElementState::Pressed {
                pressed_now.push(step.button);
            }
            input.process_button(step.button, step.state);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len() && self.deferred.is_empty()
    }

    pub fn steps(&self) -> &[PilotStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::KeyCode;

    const W: Button = Button::Key(KeyCode::KeyW);
    const V: Button = Button::Key(KeyCode::KeyV);
    const L: Button = Button::Key(KeyCode::KeyL);

    #[test]
    fn steps_apply_in_time_order() {
        let mut pilot = ScriptedPilot::new();
        pilot.hold(W, 1.0, 2.0);
        let mut input = InputState::new();

        pilot.feed(0.5, &mut input);
        assert!(!input.is_held(W));

        input.begin_frame();
        pilot.feed(1.0, &mut input);
        assert!(input.is_pressed(W));

        input.begin_frame();
        pilot.feed(2.5, &mut input);
        assert!(input.is_released(W));
        assert!(pilot.is_finished());
    }

    #[test]
    fn tap_spans_two_feeds() {
        let mut pilot = ScriptedPilot::new();
        pilot.tap(V, 1.0);
        let mut input = InputState::new();

        pilot.feed(1.0, &mut input);
        assert!(input.is_pressed(V));
        assert!(input.is_held(V));

        input.begin_frame();
        pilot.feed(1.01, &mut input);
        assert!(input.is_released(V));
    }

    #[test]
    fn simultaneous_taps_all_press_then_all_release() {
        let mut pilot = ScriptedPilot::new();
        pilot.tap(V, 1.0).tap(L, 1.0);
        let mut input = InputState::new();

        pilot.feed(1.0, &mut input);
        assert!(input.is_pressed(V));
        assert!(input.is_pressed(L));
        assert!(!pilot.is_finished());

        input.begin_frame();
        pilot.feed(1.01, &mut input);
        assert!(input.is_released(V));
        assert!(input.is_released(L));
        assert!(pilot.is_finished());
    }

    #[test]
    fn held_back_release_does_not_stall_later_steps() {
        let mut pilot = ScriptedPilot::new();
        pilot.tap(V, 1.0).hold(W, 1.0, 5.0);
        let mut input = InputState::new();

        pilot.feed(1.0, &mut input);
        assert!(input.is_pressed(V));
        assert!(input.is_pressed(W));

        input.begin_frame();
        pilot.feed(1.01, &mut input);
        assert!(input.is_released(V));
        assert!(input.is_held(W));
    }

    #[test]
    fn patrol_uses_default_bindings() {
        let bindings = InputBindings::default_flight();
        let pilot = ScriptedPilot::patrol(&bindings);
        assert_eq!(pilot.steps().len(), 22);
        assert_eq!(pilot.steps()[0].button, W);
        assert!(pilot.steps().windows(2).all(|pair| pair[0].at <= pair[1].at));
    }
}
