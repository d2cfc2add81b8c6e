use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use slider::{DisplacementUniforms, TextureSlots};
use wgpu::util::DeviceExt;

use crate::camera::{OrthoCamera, QuadVertex};
use crate::compile::{compile_fragment_shader, compile_vertex_shader};
use crate::textures::GpuTexture;

/// std140 mirror of the `SliderParams` block.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GpuUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub disp_power: f32,
    pub intensity: f32,
}

unsafe impl Zeroable for GpuUniforms {}
unsafe impl Pod for GpuUniforms {}

impl GpuUniforms {
    pub fn new(camera: &OrthoCamera, uniforms: &DisplacementUniforms) -> Self {
        Self {
            view_projection: camera.view_projection().to_cols_array_2d(),
            resolution: uniforms.resolution(),
            disp_power: uniforms.disp_power(),
            intensity: uniforms.intensity(),
        }
    }
}

pub(crate) struct DisplacementMaterial {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    bound: TextureSlots,
}

impl DisplacementMaterial {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        slides: &[GpuTexture],
        displacement: &GpuTexture,
        initial: &GpuUniforms,
        slots: TextureSlots,
    ) -> Result<Self> {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slider uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slider texture layout"),
            entries: &texture_layout_entries(),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slider uniforms"),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slider uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group =
            create_texture_bind_group(device, &texture_layout, slides, displacement, slots)?;

        let vertex_module = compile_vertex_shader(device);
        let fragment_module = compile_fragment_shader(device);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("displacement pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("displacement pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[QuadVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            texture_bind_group,
            bound: slots,
        })
    }

    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &GpuUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Rebuilds the texture bind group when the slide slots changed.
    pub fn bind_slots(
        &mut self,
        device: &wgpu::Device,
        slides: &[GpuTexture],
        displacement: &GpuTexture,
        slots: TextureSlots,
    ) -> Result<bool> {
        if slots == self.bound {
            return Ok(false);
        }
        self.texture_bind_group =
            create_texture_bind_group(device, &self.texture_layout, slides, displacement, slots)?;
        self.bound = slots;
        tracing::trace!(texture1 = slots.a, texture2 = slots.b, "rebound slide textures");
        Ok(true)
    }

    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        vertices: &wgpu::Buffer,
        indices: &wgpu::Buffer,
        index_count: u32,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..index_count, 0, 0..1);
    }
}

fn texture_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = Vec::with_capacity(6);
    for index in 0..3u32 {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: index * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: index * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slides: &[GpuTexture],
    displacement: &GpuTexture,
    slots: TextureSlots,
) -> Result<wgpu::BindGroup> {
    let slide = |index: usize| {
        slides
            .get(index)
            .ok_or_else(|| anyhow!("slide {index} is not loaded ({} available)", slides.len()))
    };
    let first = slide(slots.a)?;
    let second = slide(slots.b)?;

    let mut entries = Vec::with_capacity(6);
    for (index, texture) in [first, second, displacement].into_iter().enumerate() {
        let binding = index as u32 * 2;
        entries.push(wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::TextureView(&texture.view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: binding + 1,
            resource: wgpu::BindingResource::Sampler(&texture.sampler),
        });
    }

    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("slider texture bind group"),
        layout,
        entries: &entries,
    }))
}
