//! GPU-free core of the displacement slider.
//!
//! Everything here is single-threaded and driven by explicit timestamps so
//! the whole transition state machine can be exercised without a display.

pub mod bootstrap;
pub mod bullets;
pub mod controls;
pub mod cursor;
pub mod easing;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod registry;
pub mod tween;
pub mod uniforms;

#[cfg(test)]
mod testing;

pub use bootstrap::{initialise, Initialised, SliderBackend};
pub use bullets::{bullet_line, BulletIndicator, LogBullets, NoBullets};
pub use controls::{ControlCommand, ControlOutcome, ControlPanel, FloatControl, ToggleControl};
pub use cursor::SliderCursor;
pub use easing::Easing;
pub use error::InitError;
pub use input::{
    Dispatch, DispatchOutcome, InputDispatcher, InputEvent, InputKind, InputSource, ListenerSet,
    NavKey, Subscription, WheelThrottle,
};
pub use orchestrator::{
    AnimationState, IgnoreReason, Navigation, RenderTarget, Slider, SliderOptions, SliderSnapshot,
};
pub use registry::ResourceRegistry;
pub use tween::{AnimationDriver, Tween, TweenEngine, TweenEvent, TweenHandle, TweenTarget};
pub use uniforms::{DisplacementUniforms, TextureSlots};
