use std::fmt;
use std::time::{Duration, Instant};

use slideconfig::SliderConfig;

use crate::bullets::{BulletIndicator, NoBullets};
use crate::cursor::SliderCursor;
use crate::easing::Easing;
use crate::registry::ResourceRegistry;
use crate::tween::{AnimationDriver, Tween, TweenEvent, TweenHandle, TweenTarget};
use crate::uniforms::{DisplacementUniforms, TextureSlots};

/// Surface the slider draws into.
pub trait RenderTarget {
    /// Recomputes projection bounds, quad and surface size.
    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()>;
    fn render(&mut self, uniforms: &DisplacementUniforms) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderOptions {
    pub intensity: f32,
    pub duration: Duration,
    pub easing: Easing,
    pub auto_transition: bool,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            duration: Duration::from_millis(2500),
            easing: Easing::ExpoInOut,
            auto_transition: true,
        }
    }
}

impl From<&SliderConfig> for SliderOptions {
    fn from(config: &SliderConfig) -> Self {
        Self {
            intensity: config.intensity,
            duration: config.duration,
            easing: config.easing.into(),
            auto_transition: config.auto_transition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Animating(TweenHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disposed,
    Animating,
    AutoTransitionDisabled,
    OutOfRange,
    SameSlide,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Started { from: usize, to: usize },
    Ignored(IgnoreReason),
}

impl Navigation {
    pub fn started(&self) -> bool {
        matches!(self, Navigation::Started { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSnapshot {
    pub current: usize,
    pub next: usize,
    pub total: usize,
    pub disp_power: f32,
    pub intensity: f32,
    pub auto_transition: bool,
    pub animating: bool,
}

impl fmt::Display for SliderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "current={} next={} total={} dispPower={:.2} intensity={:.2} autoTransition={}{}",
            self.current,
            self.next,
            self.total,
            self.disp_power,
            self.intensity,
            self.auto_transition,
            if self.animating { " (animating)" } else { "" }
        )
    }
}

/// Transition state machine for a single displacement slider.
///
/// Every navigation is a jump: the slide on screen stays in texture slot A,
/// the target is bound to slot B, and `dispPower` sweeps from 0 to 1. When the
/// sweep completes the slots settle on `(current, next)` and `dispPower`
/// drops back to exactly 0. Requests arriving mid-sweep are dropped.
pub struct Slider<A: AnimationDriver, R: RenderTarget> {
    cursor: SliderCursor,
    state: AnimationState,
    uniforms: DisplacementUniforms,
    options: SliderOptions,
    driver: A,
    target: R,
    bullets: Box<dyn BulletIndicator>,
    registry: ResourceRegistry,
    disposed: bool,
}

impl<A: AnimationDriver, R: RenderTarget> Slider<A, R> {
    pub fn new(
        cursor: SliderCursor,
        uniforms: DisplacementUniforms,
        options: SliderOptions,
        driver: A,
        target: R,
    ) -> Self {
        Self {
            cursor,
            state: AnimationState::Idle,
            uniforms,
            options,
            driver,
            target,
            bullets: Box::new(NoBullets),
            registry: ResourceRegistry::new(),
            disposed: false,
        }
    }

    pub fn with_bullets(mut self, bullets: Box<dyn BulletIndicator>) -> Self {
        self.bullets = bullets;
        self
    }

    pub fn with_registry(mut self, registry: ResourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn cursor(&self) -> &SliderCursor {
        &self.cursor
    }

    pub fn uniforms(&self) -> &DisplacementUniforms {
        &self.uniforms
    }

    pub fn options(&self) -> &SliderOptions {
        &self.options
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    pub fn snapshot(&self) -> SliderSnapshot {
        SliderSnapshot {
            current: self.cursor.current(),
            next: self.cursor.next(),
            total: self.cursor.total(),
            disp_power: self.uniforms.disp_power(),
            intensity: self.uniforms.intensity(),
            auto_transition: self.options.auto_transition,
            animating: self.is_animating(),
        }
    }

    pub fn next_slide(&mut self, now: Instant) -> Navigation {
        let target = self.cursor.successor(self.cursor.current());
        self.go_to_slide(target, now)
    }

    pub fn go_to_slide(&mut self, index: usize, now: Instant) -> Navigation {
        if let Some(reason) = self.navigation_guard(index) {
            tracing::debug!(index, ?reason, "navigation ignored");
            return Navigation::Ignored(reason);
        }

        tracing::debug!(
            current = self.cursor.current(),
            next = self.cursor.next(),
            "transition starting"
        );
        let outgoing = self.cursor.retarget(index);
        self.uniforms.set_slots(TextureSlots {
            a: outgoing,
            b: index,
        });
        self.uniforms.set_displacement(0.0);
        let handle = self.driver.animate(Tween {
            target: TweenTarget::DispPower,
            from: 0.0,
            to: 1.0,
            duration: self.options.duration,
            easing: self.options.easing,
            started: now,
        });
        self.state = AnimationState::Animating(handle);
        self.refresh_bullets();
        tracing::debug!(
            current = self.cursor.current(),
            next = self.cursor.next(),
            outgoing,
            "cursor advanced"
        );
        Navigation::Started {
            from: outgoing,
            to: index,
        }
    }

    fn navigation_guard(&self, index: usize) -> Option<IgnoreReason> {
        if self.disposed {
            Some(IgnoreReason::Disposed)
        } else if self.is_animating() {
            Some(IgnoreReason::Animating)
        } else if !self.options.auto_transition {
            tracing::info!("auto transition is disabled");
            Some(IgnoreReason::AutoTransitionDisabled)
        } else if !self.cursor.contains(index) {
            Some(IgnoreReason::OutOfRange)
        } else if index == self.cursor.current() {
            Some(IgnoreReason::SameSlide)
        } else {
            None
        }
    }

    /// Forwards driver events into the uniforms. Returns whether anything was rendered.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let AnimationState::Animating(active) = self.state else {
            return false;
        };

        let mut rendered = false;
        for event in self.driver.advance(now) {
            match event {
                TweenEvent::Progress {
                    handle,
                    target: TweenTarget::DispPower,
                    value,
                } if handle == active => {
                    self.uniforms.set_displacement(value);
                    self.render();
                    rendered = true;
                }
                TweenEvent::Completed { handle, .. } if handle == active => {
                    self.finish_transition();
                    rendered = true;
                }
                _ => {}
            }
        }
        rendered
    }

    fn finish_transition(&mut self) {
        self.uniforms.set_slots(TextureSlots {
            a: self.cursor.current(),
            b: self.cursor.next(),
        });
        self.uniforms.set_displacement(0.0);
        self.state = AnimationState::Idle;
        tracing::debug!(
            texture1 = self.cursor.current(),
            texture2 = self.cursor.next(),
            "transition complete"
        );
        self.render();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        if let Err(err) = self.target.resize(width, height) {
            tracing::warn!(width, height, "failed to resize render target: {err:#}");
        }
        self.uniforms.set_resolution(width, height);
        self.render();
    }

    pub fn set_displacement(&mut self, value: f32) -> f32 {
        let stored = self.uniforms.set_displacement(value);
        self.render();
        stored
    }

    pub fn set_intensity(&mut self, value: f32) -> f32 {
        let stored = self.uniforms.set_intensity(value);
        self.render();
        stored
    }

    pub fn auto_transition(&self) -> bool {
        self.options.auto_transition
    }

    pub fn set_auto_transition(&mut self, enabled: bool) {
        self.options.auto_transition = enabled;
        tracing::info!(enabled, "auto transition toggled");
        self.render();
    }

    pub fn refresh_bullets(&mut self) {
        self.bullets.update(self.cursor.current(), self.cursor.len());
    }

    pub fn render(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(err) = self.target.render(&self.uniforms) {
            tracing::warn!("render failed: {err:#}");
        }
    }

    /// Cancels any running sweep and releases every registered resource.
    pub fn dispose(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        if let AnimationState::Animating(handle) = self.state {
            self.driver.cancel(handle);
        }
        self.driver.cancel_all();
        self.state = AnimationState::Idle;
        self.disposed = true;
        let released = self.registry.release_all();
        tracing::info!(released, "slider disposed");
        released
    }
}

impl<A: AnimationDriver, R: RenderTarget> Drop for Slider<A, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTarget, RecordingBullets};
    use crate::tween::TweenEngine;

    fn slider(len: usize) -> (Slider<TweenEngine, FakeTarget>, FakeTarget) {
        let target = FakeTarget::default();
        let cursor = SliderCursor::new(len).unwrap();
        let uniforms = DisplacementUniforms::new(0.5, (1920, 1080), TextureSlots { a: 0, b: 1 });
        let slider = Slider::new(
            cursor,
            uniforms,
            SliderOptions {
                easing: Easing::Linear,
                ..SliderOptions::default()
            },
            TweenEngine::new(),
            target.clone(),
        );
        (slider, target)
    }

    fn run_to_completion(slider: &mut Slider<TweenEngine, FakeTarget>, start: Instant) {
        slider.tick(start + Duration::from_millis(1200));
        assert!(slider.is_animating());
        slider.tick(start + Duration::from_secs(3));
        assert!(!slider.is_animating());
    }

    #[test]
    fn three_slide_scenario_wraps_around() {
        let (mut slider, _target) = slider(3);
        let start = Instant::now();
        assert_eq!((slider.cursor().current(), slider.cursor().next()), (0, 1));

        for expected in [(1, 2), (2, 0), (0, 1)] {
            assert_eq!(slider.uniforms().disp_power(), 0.0);
            assert!(slider.next_slide(start).started());
            assert!(slider.is_animating());
            run_to_completion(&mut slider, start);
            assert_eq!(
                (slider.cursor().current(), slider.cursor().next()),
                expected
            );
            assert_eq!(slider.uniforms().disp_power(), 0.0);
            assert_eq!(
                slider.uniforms().slots(),
                TextureSlots {
                    a: expected.0,
                    b: expected.1
                }
            );
        }
    }

    #[test]
    fn sweep_binds_outgoing_and_target_slots() {
        let (mut slider, target) = slider(4);
        let start = Instant::now();
        assert_eq!(
            slider.go_to_slide(3, start),
            Navigation::Started { from: 0, to: 3 }
        );
        slider.tick(start + Duration::from_millis(1250));

        let log = target.log.borrow();
        let frame = log.renders.last().unwrap();
        assert_eq!(frame.slots, TextureSlots { a: 0, b: 3 });
        assert!((frame.disp_power - 0.5).abs() < 0.01);
    }

    #[test]
    fn requests_while_animating_are_dropped() {
        let (mut slider, _target) = slider(3);
        let start = Instant::now();
        slider.next_slide(start);
        let before = (slider.cursor().current(), slider.cursor().next());

        assert_eq!(
            slider.next_slide(start),
            Navigation::Ignored(IgnoreReason::Animating)
        );
        assert_eq!(
            slider.go_to_slide(2, start),
            Navigation::Ignored(IgnoreReason::Animating)
        );
        assert_eq!((slider.cursor().current(), slider.cursor().next()), before);
        assert!(slider.is_animating());
    }

    #[test]
    fn guards_reject_same_out_of_range_and_disabled() {
        let (mut slider, _target) = slider(3);
        let now = Instant::now();
        assert_eq!(
            slider.go_to_slide(0, now),
            Navigation::Ignored(IgnoreReason::SameSlide)
        );
        assert_eq!(
            slider.go_to_slide(3, now),
            Navigation::Ignored(IgnoreReason::OutOfRange)
        );
        slider.set_auto_transition(false);
        assert_eq!(
            slider.next_slide(now),
            Navigation::Ignored(IgnoreReason::AutoTransitionDisabled)
        );
        assert_eq!(slider.cursor().current(), 0);
        assert!(!slider.is_animating());
    }

    #[test]
    fn completion_renders_settled_frame() {
        let (mut slider, target) = slider(2);
        let start = Instant::now();
        slider.next_slide(start);
        slider.tick(start + Duration::from_secs(5));

        let log = target.log.borrow();
        let last = log.renders.last().unwrap();
        assert_eq!(last.disp_power, 0.0);
        assert_eq!(last.slots, TextureSlots { a: 1, b: 0 });
    }

    #[test]
    fn resize_renders_exactly_once() {
        let (mut slider, target) = slider(3);
        slider.resize(800, 600);

        let log = target.log.borrow();
        assert_eq!(log.resizes, vec![(800, 600)]);
        assert_eq!(log.renders.len(), 1);
        assert_eq!(log.renders[0].resolution, [800.0, 600.0]);
        assert_eq!(slider.uniforms().resolution(), [800.0, 600.0]);
    }

    #[test]
    fn resize_mid_transition_still_renders() {
        let (mut slider, target) = slider(3);
        let start = Instant::now();
        slider.next_slide(start);
        slider.resize(1024, 768);
        assert_eq!(target.log.borrow().renders.len(), 1);
        assert!(slider.is_animating());
    }

    #[test]
    fn render_failures_are_swallowed() {
        let (mut slider, target) = slider(3);
        target.log.borrow_mut().fail_render = true;
        slider.set_intensity(0.8);
        assert_eq!(slider.uniforms().intensity(), 0.8);
    }

    #[test]
    fn bullets_follow_cursor() {
        let (slider, _target) = slider(3);
        let bullets = RecordingBullets::default();
        let mut slider = slider.with_bullets(Box::new(bullets.clone()));
        let start = Instant::now();
        slider.go_to_slide(2, start);
        slider.tick(start + Duration::from_secs(3));
        slider.next_slide(start + Duration::from_secs(3));
        assert_eq!(*bullets.seen.borrow(), vec![(2, 3), (0, 3)]);
    }

    #[test]
    fn dispose_cancels_sweep_and_is_idempotent() {
        let (slider, target) = slider(3);
        let mut registry = ResourceRegistry::new();
        let released = std::rc::Rc::new(std::cell::Cell::new(0));
        for label in ["texture", "material"] {
            let released = std::rc::Rc::clone(&released);
            registry.register(label, move || released.set(released.get() + 1));
        }
        let mut slider = slider.with_registry(registry);
        let start = Instant::now();
        slider.next_slide(start);

        assert_eq!(slider.dispose(), 2);
        assert_eq!(slider.dispose(), 0);
        assert_eq!(released.get(), 2);
        assert!(!slider.tick(start + Duration::from_secs(1)));
        slider.resize(10, 10);
        assert!(target.log.borrow().renders.is_empty());
        assert_eq!(
            slider.next_slide(start),
            Navigation::Ignored(IgnoreReason::Disposed)
        );
    }

    #[test]
    fn snapshot_reports_state() {
        let (mut slider, _target) = slider(3);
        slider.set_displacement(0.25);
        let snapshot = slider.snapshot();
        assert_eq!(snapshot.current, 0);
        assert_eq!(snapshot.next, 1);
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.disp_power, 0.25);
        assert!(snapshot.to_string().contains("dispPower=0.25"));
    }
}
