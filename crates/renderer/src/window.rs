use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use slideconfig::{BulletStyle, ContainerTarget, SliderConfig};
use slider::controls::{AUTO_TRANSITION, DISP_POWER, INTENSITY};
use slider::{
    bullet_line, initialise, BulletIndicator, ControlCommand, ControlOutcome, InitError,
    Initialised, InputEvent, InputKind, ListenerSet, LogBullets, NavKey, NoBullets, Slider,
    SliderOptions, TweenEngine, WheelThrottle,
};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::backend::WgpuBackend;
use crate::scene::GpuScene;

type GpuSlider = Slider<TweenEngine, GpuScene>;

/// Tick spacing while a sweep is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Pixels per wheel line, matching a browser's line-mode wheel deltas.
const LINE_HEIGHT_PX: f64 = 100.0;

/// What a pressed key asks the runtime to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Navigate(NavKey),
    Jump(usize),
    Control(ControlCommand),
    Exit,
}

impl KeyAction {
    /// Slide navigation only runs while the key listener is attached.
    pub fn needs_key_listener(&self) -> bool {
        matches!(self, KeyAction::Navigate(_) | KeyAction::Jump(_))
    }
}

pub fn translate_key(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(NamedKey::ArrowRight) => Some(KeyAction::Navigate(NavKey::ArrowRight)),
        Key::Named(NamedKey::ArrowLeft) => Some(KeyAction::Navigate(NavKey::ArrowLeft)),
        Key::Named(NamedKey::Space) => Some(KeyAction::Navigate(NavKey::Space)),
        Key::Named(NamedKey::Home) => Some(KeyAction::Navigate(NavKey::Home)),
        Key::Named(NamedKey::End) => Some(KeyAction::Navigate(NavKey::End)),
        Key::Named(NamedKey::Escape) => Some(KeyAction::Exit),
        Key::Character(value) => translate_character(value.as_str()),
        _ => None,
    }
}

fn translate_character(value: &str) -> Option<KeyAction> {
    let nudge = |name, steps| Some(KeyAction::Control(ControlCommand::Nudge { name, steps }));
    match value {
        " " => Some(KeyAction::Navigate(NavKey::Space)),
        "," => nudge(DISP_POWER, -1),
        "." => nudge(DISP_POWER, 1),
        "[" => nudge(INTENSITY, -1),
        "]" => nudge(INTENSITY, 1),
        "a" | "A" => Some(KeyAction::Control(ControlCommand::Toggle(AUTO_TRANSITION))),
        "t" | "T" => Some(KeyAction::Control(ControlCommand::TriggerTransition)),
        "r" | "R" => Some(KeyAction::Control(ControlCommand::ResetDisplacement)),
        "i" | "I" => Some(KeyAction::Control(ControlCommand::Info)),
        digit => match digit.parse::<usize>() {
            Ok(number @ 1..=9) => Some(KeyAction::Jump(number - 1)),
            _ => None,
        },
    }
}

/// Converts a winit wheel delta to browser-style `deltaY` pixels
/// (positive when scrolling down).
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -(lines as f64) * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(position) => -position.y,
    }
}

/// Writes the bullet line into the window title.
struct TitleBullets {
    window: Arc<Window>,
    title: String,
}

impl BulletIndicator for TitleBullets {
    fn update(&mut self, active: usize, count: usize) {
        self.window
            .set_title(&format!("{} {}", self.title, bullet_line(active, count)));
    }
}

fn bullets_for(style: BulletStyle, window: &Arc<Window>, title: &str) -> Box<dyn BulletIndicator> {
    match style {
        BulletStyle::Title => Box::new(TitleBullets {
            window: Arc::clone(window),
            title: title.to_string(),
        }),
        BulletStyle::Log => Box::new(LogBullets),
        BulletStyle::None => Box::new(NoBullets),
    }
}

fn resolve_container(
    event_loop: &EventLoop<()>,
    container: &ContainerTarget,
) -> Result<Option<Fullscreen>, InitError> {
    match container {
        ContainerTarget::Window => Ok(None),
        ContainerTarget::Fullscreen { monitor: None } => Ok(Some(Fullscreen::Borderless(None))),
        ContainerTarget::Fullscreen {
            monitor: Some(name),
        } => {
            let mut monitors: Vec<_> = event_loop.available_monitors().collect();
            let index = monitor_index(monitors.iter().map(|monitor| monitor.name()), name)
                .ok_or_else(|| InitError::ContainerNotFound(container.to_string()))?;
            Ok(Some(Fullscreen::Borderless(Some(monitors.swap_remove(index)))))
        }
    }
}

/// Position of the monitor called `wanted`; unnamed monitors never match.
fn monitor_index<I>(names: I, wanted: &str) -> Option<usize>
where
    I: IntoIterator<Item = Option<String>>,
{
    names
        .into_iter()
        .position(|name| name.as_deref() == Some(wanted))
}

/// Opens the slider window and runs it until it is closed.
pub fn run(config: SliderConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let fullscreen = resolve_container(&event_loop, &config.container)?;
    let window = WindowBuilder::new()
        .with_title(config.window.title.as_str())
        .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
        .with_fullscreen(fullscreen)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create slider window: {err}"))?;
    let window = Arc::new(window);

    let listeners = ListenerSet::new();
    let bullets = bullets_for(config.bullets, &window, &config.window.title);
    let mut backend = WgpuBackend::new(Arc::clone(&window), config.clone());
    let Initialised {
        mut slider,
        mut dispatcher,
    } = initialise(
        &mut backend,
        SliderOptions::from(&config),
        WheelThrottle::from_config(&config.wheel),
        TweenEngine::new(),
        bullets,
        &listeners,
    )?;
    drop(backend);
    let panel = GpuSlider::control_panel();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                slider.dispose();
                elwt.exit();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if listeners.is_listening(InputKind::Wheel) {
                    let event = InputEvent::Wheel {
                        delta_y: wheel_delta_y(delta),
                        at: Instant::now(),
                    };
                    let dispatch = dispatcher.dispatch(event, &mut slider);
                    tracing::trace!(?dispatch, "wheel dispatched");
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let now = Instant::now();
                let action = translate_key(&event.logical_key).filter(|action| {
                    !action.needs_key_listener() || listeners.is_listening(InputKind::Key)
                });
                match action {
                    Some(KeyAction::Navigate(key)) => {
                        dispatcher.dispatch(InputEvent::Key { key, at: now }, &mut slider);
                    }
                    Some(KeyAction::Jump(index)) => {
                        slider.go_to_slide(index, now);
                    }
                    Some(KeyAction::Control(command)) => {
                        match slider.apply(&panel, command, now) {
                            ControlOutcome::Info(snapshot) => tracing::info!("{snapshot}"),
                            ControlOutcome::Value(value) => tracing::info!(?command, value),
                            ControlOutcome::Flag(enabled) => tracing::info!(?command, enabled),
                            ControlOutcome::Navigation(_) | ControlOutcome::Unknown => {}
                        }
                    }
                    Some(KeyAction::Exit) => {
                        slider.dispose();
                        elwt.exit();
                    }
                    None => {}
                }
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                if listeners.is_listening(InputKind::Resize) {
                    dispatcher.dispatch(
                        InputEvent::Resize {
                            width: size.width,
                            height: size.height,
                        },
                        &mut slider,
                    );
                }
            }
            WindowEvent::RedrawRequested => slider.render(),
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if slider.is_animating() {
                slider.tick(now);
            }
            if slider.target().surface_exhausted() && !slider.is_disposed() {
                tracing::error!("surface out of memory; exiting slider");
                slider.dispose();
                elwt.exit();
                return;
            }
            if slider.is_animating() {
                elwt.set_control_flow(ControlFlow::WaitUntil(now + FRAME_INTERVAL));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
