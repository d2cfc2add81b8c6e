use std::sync::Arc;

use assets::{AssetLoader, AssetRequest, LoadedAssets};
use slideconfig::SliderConfig;
use slider::{DisplacementUniforms, InitError, ResourceRegistry, SliderBackend};
use winit::window::Window;

use crate::camera::OrthoCamera;
use crate::context::GpuContext;
use crate::scene::GpuScene;
use crate::textures;

/// wgpu implementation of the slider start-up steps for one window.
pub struct WgpuBackend {
    window: Arc<Window>,
    config: SliderConfig,
    context: Option<GpuContext>,
    camera: Option<OrthoCamera>,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, config: SliderConfig) -> Self {
        Self {
            window,
            config,
            context: None,
            camera: None,
        }
    }
}

impl SliderBackend for WgpuBackend {
    type Assets = LoadedAssets;
    type Target = GpuScene;

    fn prepare_surface(
        &mut self,
        registry: &mut ResourceRegistry,
    ) -> Result<(u32, u32), InitError> {
        let size = self.window.inner_size();
        let context = GpuContext::new(self.window.as_ref(), size).map_err(InitError::surface)?;
        let device = context.device.clone();
        registry.register("gpu device", move || device.destroy());

        let (width, height) = (context.size.width, context.size.height);
        tracing::info!("initialised GPU surface {}x{}", width, height);
        self.context = Some(context);
        Ok((width, height))
    }

    fn setup_camera(&mut self, width: u32, height: u32) -> Result<(), InitError> {
        self.camera = Some(OrthoCamera::for_size(width, height));
        Ok(())
    }

    fn load_assets(&mut self) -> Result<LoadedAssets, InitError> {
        let request = AssetRequest::from_config(&self.config)?;
        tracing::info!(
            textures = request.texture_count(),
            displacement = %request.displacement,
            "loading textures"
        );
        let loaded = AssetLoader::new()?.load(&request)?;
        Ok(loaded)
    }

    fn slide_count(&self, assets: &LoadedAssets) -> usize {
        assets.slides.len()
    }

    fn build_material(
        &mut self,
        assets: LoadedAssets,
        uniforms: &DisplacementUniforms,
        registry: &mut ResourceRegistry,
    ) -> Result<GpuScene, InitError> {
        let context = self
            .context
            .take()
            .ok_or_else(|| InitError::Material("render surface was not prepared".into()))?;
        let camera = self
            .camera
            .take()
            .ok_or_else(|| InitError::Material("camera was not set up".into()))?;

        let slides = assets
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| {
                textures::upload(
                    &context.device,
                    &context.queue,
                    slide,
                    &format!("slide {index}"),
                    registry,
                )
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(InitError::material)?;
        let displacement = textures::upload(
            &context.device,
            &context.queue,
            &assets.displacement,
            "displacement map",
            registry,
        )
        .map_err(InitError::material)?;

        GpuScene::new(
            Arc::clone(&self.window),
            context,
            camera,
            slides,
            displacement,
            uniforms,
            registry,
        )
        .map_err(InitError::material)
    }
}
