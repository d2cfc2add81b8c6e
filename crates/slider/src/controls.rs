use std::time::Instant;

use crate::orchestrator::{Navigation, RenderTarget, Slider, SliderSnapshot};
use crate::tween::AnimationDriver;

pub const DISP_POWER: &str = "dispPower";
pub const INTENSITY: &str = "intensity";
pub const AUTO_TRANSITION: &str = "autoTransition";

pub struct FloatControl<S> {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub get: fn(&S) -> f32,
    pub set: fn(&mut S, f32) -> f32,
}

pub struct ToggleControl<S> {
    pub name: &'static str,
    pub get: fn(&S) -> bool,
    pub set: fn(&mut S, bool),
}

/// Table of live-tunable parameters bound through typed accessors.
pub struct ControlPanel<S> {
    floats: Vec<FloatControl<S>>,
    toggles: Vec<ToggleControl<S>>,
}

impl<S> Default for ControlPanel<S> {
    fn default() -> Self {
        Self {
            floats: Vec::new(),
            toggles: Vec::new(),
        }
    }
}

impl<S> ControlPanel<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_float(mut self, control: FloatControl<S>) -> Self {
        self.floats.push(control);
        self
    }

    pub fn with_toggle(mut self, control: ToggleControl<S>) -> Self {
        self.toggles.push(control);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.floats
            .iter()
            .map(|control| control.name)
            .chain(self.toggles.iter().map(|control| control.name))
    }

    fn float(&self, name: &str) -> Option<&FloatControl<S>> {
        self.floats.iter().find(|control| control.name == name)
    }

    fn toggle_control(&self, name: &str) -> Option<&ToggleControl<S>> {
        self.toggles.iter().find(|control| control.name == name)
    }

    pub fn value(&self, state: &S, name: &str) -> Option<f32> {
        self.float(name).map(|control| (control.get)(state))
    }

    pub fn flag(&self, state: &S, name: &str) -> Option<bool> {
        self.toggle_control(name).map(|control| (control.get)(state))
    }

    /// Writes `value` clamped to the control's range and returns what was stored.
    pub fn set(&self, state: &mut S, name: &str, value: f32) -> Option<f32> {
        let control = self.float(name)?;
        Some((control.set)(state, value.clamp(control.min, control.max)))
    }

    pub fn nudge(&self, state: &mut S, name: &str, steps: i32) -> Option<f32> {
        let control = self.float(name)?;
        let current = (control.get)(state);
        let target = (current + control.step * steps as f32).clamp(control.min, control.max);
        Some((control.set)(state, target))
    }

    pub fn toggle(&self, state: &mut S, name: &str) -> Option<bool> {
        let control = self.toggle_control(name)?;
        let flipped = !(control.get)(state);
        (control.set)(state, flipped);
        Some(flipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Nudge { name: &'static str, steps: i32 },
    Toggle(&'static str),
    TriggerTransition,
    ResetDisplacement,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlOutcome {
    Value(f32),
    Flag(bool),
    Navigation(Navigation),
    Info(SliderSnapshot),
    Unknown,
}

impl<A: AnimationDriver, R: RenderTarget> Slider<A, R> {
    pub fn control_panel() -> ControlPanel<Self> {
        ControlPanel::new()
            .with_float(FloatControl {
                name: DISP_POWER,
                min: 0.0,
                max: 1.0,
                step: 0.01,
                get: |slider: &Self| slider.uniforms().disp_power(),
                set: |slider: &mut Self, value| slider.set_displacement(value),
            })
            .with_float(FloatControl {
                name: INTENSITY,
                min: 0.0,
                max: 2.0,
                step: 0.1,
                get: |slider: &Self| slider.uniforms().intensity(),
                set: |slider: &mut Self, value| slider.set_intensity(value),
            })
            .with_toggle(ToggleControl {
                name: AUTO_TRANSITION,
                get: |slider: &Self| slider.auto_transition(),
                set: |slider: &mut Self, enabled| slider.set_auto_transition(enabled),
            })
    }

    pub fn apply(
        &mut self,
        panel: &ControlPanel<Self>,
        command: ControlCommand,
        now: Instant,
    ) -> ControlOutcome {
        let outcome = match command {
            ControlCommand::Nudge { name, steps } => panel
                .nudge(self, name, steps)
                .map_or(ControlOutcome::Unknown, ControlOutcome::Value),
            ControlCommand::Toggle(name) => panel
                .toggle(self, name)
                .map_or(ControlOutcome::Unknown, ControlOutcome::Flag),
            ControlCommand::TriggerTransition => {
                ControlOutcome::Navigation(self.next_slide(now))
            }
            ControlCommand::ResetDisplacement => {
                ControlOutcome::Value(self.set_displacement(0.0))
            }
            ControlCommand::Info => ControlOutcome::Info(self.snapshot()),
        };
        tracing::debug!(?command, ?outcome, "control applied");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SliderCursor;
    use crate::orchestrator::{IgnoreReason, SliderOptions};
    use crate::testing::FakeTarget;
    use crate::tween::TweenEngine;
    use crate::uniforms::{DisplacementUniforms, TextureSlots};

    type TestSlider = Slider<TweenEngine, FakeTarget>;

    fn slider() -> (TestSlider, FakeTarget) {
        let target = FakeTarget::default();
        let slider = Slider::new(
            SliderCursor::new(3).unwrap(),
            DisplacementUniforms::new(0.5, (800, 600), TextureSlots { a: 0, b: 1 }),
            SliderOptions::default(),
            TweenEngine::new(),
            target.clone(),
        );
        (slider, target)
    }

    #[test]
    fn panel_lists_standard_controls() {
        let panel = TestSlider::control_panel();
        let names: Vec<_> = panel.names().collect();
        assert_eq!(names, vec![DISP_POWER, INTENSITY, AUTO_TRANSITION]);
    }

    #[test]
    fn nudges_clamp_and_render() {
        let (mut slider, target) = slider();
        let panel = TestSlider::control_panel();
        let now = Instant::now();

        let value = slider.apply(
            &panel,
            ControlCommand::Nudge {
                name: INTENSITY,
                steps: 3,
            },
            now,
        );
        match value {
            ControlOutcome::Value(v) => assert!((v - 0.8).abs() < 1e-5),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(panel.nudge(&mut slider, DISP_POWER, -5), Some(0.0));
        assert_eq!(panel.set(&mut slider, INTENSITY, 9.0), Some(2.0));
        assert_eq!(target.log.borrow().renders.len(), 3);
    }

    #[test]
    fn toggle_disables_navigation() {
        let (mut slider, _target) = slider();
        let panel = TestSlider::control_panel();
        let now = Instant::now();

        assert_eq!(
            slider.apply(&panel, ControlCommand::Toggle(AUTO_TRANSITION), now),
            ControlOutcome::Flag(false)
        );
        assert_eq!(
            slider.apply(&panel, ControlCommand::TriggerTransition, now),
            ControlOutcome::Navigation(Navigation::Ignored(IgnoreReason::AutoTransitionDisabled))
        );
        assert_eq!(panel.flag(&slider, AUTO_TRANSITION), Some(false));
    }

    #[test]
    fn reset_returns_displacement_to_zero() {
        let (mut slider, _target) = slider();
        let panel = TestSlider::control_panel();
        panel.set(&mut slider, DISP_POWER, 0.7);
        assert_eq!(
            slider.apply(&panel, ControlCommand::ResetDisplacement, Instant::now()),
            ControlOutcome::Value(0.0)
        );
        assert_eq!(panel.value(&slider, DISP_POWER), Some(0.0));
    }

    #[test]
    fn unknown_names_are_reported() {
        let (mut slider, _target) = slider();
        let panel = TestSlider::control_panel();
        assert_eq!(
            slider.apply(
                &panel,
                ControlCommand::Nudge {
                    name: "speed",
                    steps: 1
                },
                Instant::now()
            ),
            ControlOutcome::Unknown
        );
    }
}
