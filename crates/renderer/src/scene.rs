use std::sync::Arc;

use anyhow::{anyhow, Result};
use slider::{DisplacementUniforms, RenderTarget, ResourceRegistry, TextureSlots};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::{quad_vertices, OrthoCamera, QUAD_INDICES};
use crate::context::GpuContext;
use crate::material::{DisplacementMaterial, GpuUniforms};
use crate::textures::GpuTexture;

struct QuadBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl QuadBuffers {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slider quad vertices"),
            contents: bytemuck::cast_slice(&quad_vertices(width, height)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slider quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self { vertices, indices }
    }
}

/// Everything needed to draw the slider into its window.
pub struct GpuScene {
    context: GpuContext,
    camera: OrthoCamera,
    quad: QuadBuffers,
    material: DisplacementMaterial,
    slides: Vec<GpuTexture>,
    displacement: GpuTexture,
    surface_exhausted: bool,
    // Dropped last: the surface borrows the native window.
    window: Arc<Window>,
}

impl GpuScene {
    pub(crate) fn new(
        window: Arc<Window>,
        context: GpuContext,
        camera: OrthoCamera,
        slides: Vec<GpuTexture>,
        displacement: GpuTexture,
        uniforms: &DisplacementUniforms,
        registry: &mut ResourceRegistry,
    ) -> Result<Self> {
        let size = context.size;
        let quad = QuadBuffers::new(&context.device, size.width, size.height);
        let material = DisplacementMaterial::new(
            &context.device,
            context.surface_format,
            &slides,
            &displacement,
            &GpuUniforms::new(&camera, uniforms),
            uniforms.slots(),
        )?;

        for (label, buffer) in [
            ("quad vertices", quad.vertices.clone()),
            ("quad indices", quad.indices.clone()),
            ("uniform buffer", material.uniform_buffer().clone()),
        ] {
            registry.register(label, move || buffer.destroy());
        }

        Ok(Self {
            context,
            camera,
            quad,
            material,
            slides,
            displacement,
            surface_exhausted: false,
            window,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    /// Set once the surface ran out of memory; the runtime exits on it.
    pub fn surface_exhausted(&self) -> bool {
        self.surface_exhausted
    }

    fn draw(&self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("slider encoder"),
                });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("slider pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.material.draw(
                &mut pass,
                &self.quad.vertices,
                &self.quad.indices,
                QUAD_INDICES.len() as u32,
            );
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl RenderTarget for GpuScene {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.context.resize(PhysicalSize::new(width, height));
        self.camera.resize(width, height);
        self.context.queue.write_buffer(
            &self.quad.vertices,
            0,
            bytemuck::cast_slice(&quad_vertices(width, height)),
        );
        tracing::debug!("resized GPU surface to {}x{}", width, height);
        Ok(())
    }

    fn render(&mut self, uniforms: &DisplacementUniforms) -> Result<()> {
        let slots: TextureSlots = uniforms.slots();
        self.material
            .bind_slots(&self.context.device, &self.slides, &self.displacement, slots)?;
        self.material
            .write_uniforms(&self.context.queue, &GpuUniforms::new(&self.camera, uniforms));

        match self.draw() {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                self.draw()
                    .map_err(|err| anyhow!("surface error after reconfigure: {err}"))
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.surface_exhausted = true;
                Err(anyhow!("surface out of memory"))
            }
            Err(other) => Err(anyhow!("surface error: {other:?}; retrying on next render")),
        }
    }
}
