use crate::bullets::BulletIndicator;
use crate::cursor::SliderCursor;
use crate::error::InitError;
use crate::input::{InputDispatcher, InputSource, WheelThrottle};
use crate::orchestrator::{RenderTarget, Slider, SliderOptions};
use crate::registry::ResourceRegistry;
use crate::tween::AnimationDriver;
use crate::uniforms::{DisplacementUniforms, TextureSlots};

/// Platform half of slider start-up.
///
/// Each step may record releasable resources in the registry it is handed.
pub trait SliderBackend {
    type Assets;
    type Target: RenderTarget;

    /// Creates the render surface and reports its pixel size.
    fn prepare_surface(&mut self, registry: &mut ResourceRegistry) -> Result<(u32, u32), InitError>;
    fn setup_camera(&mut self, width: u32, height: u32) -> Result<(), InitError>;
    fn load_assets(&mut self) -> Result<Self::Assets, InitError>;
    fn slide_count(&self, assets: &Self::Assets) -> usize;
    fn build_material(
        &mut self,
        assets: Self::Assets,
        uniforms: &DisplacementUniforms,
        registry: &mut ResourceRegistry,
    ) -> Result<Self::Target, InitError>;
}

pub struct Initialised<A: AnimationDriver, R: RenderTarget> {
    pub slider: Slider<A, R>,
    pub dispatcher: InputDispatcher,
}

/// Brings a slider up in order: surface, camera, assets, cursor, material,
/// bullets, first render, then input listeners.
///
/// On failure everything recorded so far is released and no listener is
/// attached.
pub fn initialise<B, A, S>(
    backend: &mut B,
    options: SliderOptions,
    throttle: WheelThrottle,
    driver: A,
    bullets: Box<dyn BulletIndicator>,
    input: &S,
) -> Result<Initialised<A, B::Target>, InitError>
where
    B: SliderBackend,
    A: AnimationDriver,
    S: InputSource + ?Sized,
{
    let mut registry = ResourceRegistry::new();
    let (cursor, uniforms, target) = match assemble(backend, &options, &mut registry) {
        Ok(parts) => parts,
        Err(err) => {
            tracing::error!("slider initialisation failed: {err}");
            let released = registry.release_all();
            tracing::debug!(released, "released partially initialised resources");
            return Err(err);
        }
    };

    let mut slider = Slider::new(cursor, uniforms, options, driver, target)
        .with_bullets(bullets)
        .with_registry(registry);
    slider.refresh_bullets();
    slider.render();

    let mut dispatcher = InputDispatcher::new(throttle);
    dispatcher.attach(input, slider.registry_mut());
    tracing::info!(
        slides = slider.cursor().len(),
        current = slider.cursor().current(),
        "slider ready"
    );
    Ok(Initialised { slider, dispatcher })
}

fn assemble<B: SliderBackend>(
    backend: &mut B,
    options: &SliderOptions,
    registry: &mut ResourceRegistry,
) -> Result<(SliderCursor, DisplacementUniforms, B::Target), InitError> {
    let (width, height) = backend.prepare_surface(registry)?;
    backend.setup_camera(width, height)?;
    let assets = backend.load_assets()?;
    let cursor = SliderCursor::new(backend.slide_count(&assets))?;
    let uniforms = DisplacementUniforms::new(
        options.intensity,
        (width, height),
        TextureSlots {
            a: cursor.current(),
            b: cursor.next(),
        },
    );
    let target = backend.build_material(assets, &uniforms, registry)?;
    Ok((cursor, uniforms, target))
}
