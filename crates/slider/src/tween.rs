use std::time::{Duration, Instant};

use crate::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(u64);

/// Uniform field a tween writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTarget {
    DispPower,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: TweenTarget,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
    pub started: Instant,
}

impl Tween {
    /// Interpolated value at `now` and whether the tween has run its course.
    pub fn value_at(&self, now: Instant) -> (f32, bool) {
        if self.duration.is_zero() {
            return (self.to, true);
        }
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
        let eased = self.easing.sample(progress);
        (self.from + (self.to - self.from) * eased, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenEvent {
    Progress {
        handle: TweenHandle,
        target: TweenTarget,
        value: f32,
    },
    Completed {
        handle: TweenHandle,
        target: TweenTarget,
    },
}

/// Interpolates numeric fields over time and reports progress as events.
pub trait AnimationDriver {
    fn animate(&mut self, tween: Tween) -> TweenHandle;
    fn cancel(&mut self, handle: TweenHandle) -> bool;
    fn is_active(&self, handle: TweenHandle) -> bool;
    fn advance(&mut self, now: Instant) -> Vec<TweenEvent>;
    fn cancel_all(&mut self) -> usize;
}

#[derive(Debug, Default)]
pub struct TweenEngine {
    next_id: u64,
    active: Vec<(TweenHandle, Tween)>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }
}

impl AnimationDriver for TweenEngine {
    fn animate(&mut self, tween: Tween) -> TweenHandle {
        let handle = TweenHandle(self.next_id);
        self.next_id += 1;
        tracing::trace!(
            handle = handle.0,
            from = tween.from,
            to = tween.to,
            duration_ms = tween.duration.as_millis() as u64,
            "tween scheduled"
        );
        self.active.push((handle, tween));
        handle
    }

    fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|(active, _)| *active != handle);
        before != self.active.len()
    }

    fn is_active(&self, handle: TweenHandle) -> bool {
        self.active.iter().any(|(active, _)| *active == handle)
    }

    fn advance(&mut self, now: Instant) -> Vec<TweenEvent> {
        let mut events = Vec::with_capacity(self.active.len());
        self.active.retain(|(handle, tween)| {
            let (value, finished) = tween.value_at(now);
            events.push(TweenEvent::Progress {
                handle: *handle,
                target: tween.target,
                value,
            });
            if finished {
                events.push(TweenEvent::Completed {
                    handle: *handle,
                    target: tween.target,
                });
            }
            !finished
        });
        events
    }

    fn cancel_all(&mut self) -> usize {
        let cancelled = self.active.len();
        self.active.clear();
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(started: Instant) -> Tween {
        Tween {
            target: TweenTarget::DispPower,
            from: 0.0,
            to: 1.0,
            duration: Duration::from_millis(100),
            easing: Easing::Linear,
            started,
        }
    }

    #[test]
    fn reports_progress_then_exact_completion() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let handle = engine.animate(sweep(start));

        let events = engine.advance(start + Duration::from_millis(50));
        assert_eq!(events.len(), 1);
        match events[0] {
            TweenEvent::Progress { value, .. } => assert!((value - 0.5).abs() < 0.01),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(engine.is_active(handle));

        let events = engine.advance(start + Duration::from_millis(150));
        assert_eq!(
            events,
            vec![
                TweenEvent::Progress {
                    handle,
                    target: TweenTarget::DispPower,
                    value: 1.0
                },
                TweenEvent::Completed {
                    handle,
                    target: TweenTarget::DispPower
                },
            ]
        );
        assert!(!engine.is_active(handle));
        assert!(engine.advance(start + Duration::from_millis(200)).is_empty());
    }

    #[test]
    fn cancelled_tween_stays_silent() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let handle = engine.animate(sweep(start));
        assert!(engine.cancel(handle));
        assert!(!engine.cancel(handle));
        assert!(engine.advance(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn cancel_all_clears_everything() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        engine.animate(sweep(start));
        engine.animate(sweep(start));
        assert_eq!(engine.cancel_all(), 2);
        assert_eq!(engine.active_len(), 0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let start = Instant::now();
        let mut tween = sweep(start);
        tween.duration = Duration::ZERO;
        assert_eq!(tween.value_at(start), (1.0, true));
    }
}
