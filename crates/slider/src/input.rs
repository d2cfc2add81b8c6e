use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use slideconfig::WheelConfig;

use crate::orchestrator::{Navigation, RenderTarget, Slider};
use crate::registry::ResourceRegistry;
use crate::tween::AnimationDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Wheel,
    Key,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowRight,
    ArrowLeft,
    Space,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f64, at: Instant },
    Key { key: NavKey, at: Instant },
    Resize { width: u32, height: u32 },
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            InputEvent::Wheel { .. } => InputKind::Wheel,
            InputEvent::Key { .. } => InputKind::Key,
            InputEvent::Resize { .. } => InputKind::Resize,
        }
    }
}

/// Something that can deliver viewport input to the slider.
pub trait InputSource {
    fn subscribe(&self, kind: InputKind) -> Subscription;
}

/// Live listener registration; cancelling it more than once is a no-op.
pub struct Subscription {
    kind: InputKind,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(kind: InputKind, release: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            release: Some(Box::new(release)),
        }
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn cancel(&mut self) -> bool {
        match self.release.take() {
            Some(release) => {
                release();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Debug, Default)]
struct ListenerState {
    active: HashMap<InputKind, usize>,
    subscribed: usize,
    unsubscribed: usize,
}

/// Single-threaded listener table.
///
/// The window runtime only forwards events whose kind has a live listener.
#[derive(Debug, Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<ListenerState>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self, kind: InputKind) -> bool {
        self.inner
            .borrow()
            .active
            .get(&kind)
            .is_some_and(|count| *count > 0)
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.values().sum()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.inner.borrow().subscribed
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.inner.borrow().unsubscribed
    }
}

impl InputSource for ListenerSet {
    fn subscribe(&self, kind: InputKind) -> Subscription {
        {
            let mut state = self.inner.borrow_mut();
            *state.active.entry(kind).or_default() += 1;
            state.subscribed += 1;
        }
        let inner = Rc::clone(&self.inner);
        Subscription::new(kind, move || {
            let mut state = inner.borrow_mut();
            if let Some(count) = state.active.get_mut(&kind) {
                *count = count.saturating_sub(1);
            }
            state.unsubscribed += 1;
        })
    }
}

/// Wheel gate: minimum spacing between accepted events plus a dead zone.
#[derive(Debug, Clone)]
pub struct WheelThrottle {
    threshold: Duration,
    min_delta: f64,
    last_accepted: Option<Instant>,
}

impl Default for WheelThrottle {
    fn default() -> Self {
        Self::from_config(&WheelConfig::default())
    }
}

impl WheelThrottle {
    pub fn new(threshold: Duration, min_delta: f64) -> Self {
        Self {
            threshold,
            min_delta,
            last_accepted: None,
        }
    }

    pub fn from_config(config: &WheelConfig) -> Self {
        Self::new(config.threshold, config.min_delta)
    }

    pub fn admits(&self, delta_y: f64, at: Instant, animating: bool) -> bool {
        let spaced = self
            .last_accepted
            .map_or(true, |last| at.saturating_duration_since(last) >= self.threshold);
        spaced && !animating && delta_y.abs() > self.min_delta
    }

    /// Checks the gate and records `at` when it passes.
    pub fn accept(&mut self, delta_y: f64, at: Instant, animating: bool) -> bool {
        let admitted = self.admits(delta_y, at, animating);
        if admitted {
            self.last_accepted = Some(at);
        }
        admitted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Navigation(Navigation),
    Resized,
    Throttled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Whether the event's default handling should be suppressed.
    pub consumed: bool,
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Default)]
pub struct InputDispatcher {
    throttle: WheelThrottle,
    attached: bool,
}

impl InputDispatcher {
    pub fn new(throttle: WheelThrottle) -> Self {
        Self {
            throttle,
            attached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach<S: InputSource + ?Sized>(
        &mut self,
        source: &S,
        registry: &mut ResourceRegistry,
    ) {
        for kind in [InputKind::Wheel, InputKind::Key, InputKind::Resize] {
            let mut subscription = source.subscribe(kind);
            registry.register(format!("{kind:?} listener"), move || {
                subscription.cancel();
            });
            tracing::debug!(?kind, "input listener added");
        }
        self.attached = true;
    }

    pub fn dispatch<A, R>(&mut self, event: InputEvent, slider: &mut Slider<A, R>) -> Dispatch
    where
        A: AnimationDriver,
        R: RenderTarget,
    {
        match event {
            InputEvent::Wheel { delta_y, at } => {
                let outcome = if self.throttle.accept(delta_y, at, slider.is_animating()) {
                    tracing::trace!(delta_y, "wheel accepted");
                    DispatchOutcome::Navigation(slider.next_slide(at))
                } else {
                    DispatchOutcome::Throttled
                };
                Dispatch {
                    consumed: true,
                    outcome,
                }
            }
            InputEvent::Key { key, at } => {
                let navigation = match key {
                    NavKey::ArrowRight | NavKey::ArrowLeft | NavKey::Space => {
                        slider.next_slide(at)
                    }
                    NavKey::Home => slider.go_to_slide(0, at),
                    NavKey::End => {
                        let last = slider.cursor().total();
                        slider.go_to_slide(last, at)
                    }
                };
                Dispatch {
                    consumed: false,
                    outcome: DispatchOutcome::Navigation(navigation),
                }
            }
            InputEvent::Resize { width, height } => {
                slider.resize(width, height);
                Dispatch {
                    consumed: false,
                    outcome: DispatchOutcome::Resized,
                }
            }
        }
    }
}
