use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Orthographic camera whose view volume matches the surface in pixels,
/// origin centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoCamera {
    half_width: f32,
    half_height: f32,
}

impl OrthoCamera {
    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 1000.0;
    pub const EYE_Z: f32 = 1.0;

    pub fn for_size(width: u32, height: u32) -> Self {
        Self {
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::for_size(width, height);
    }

    /// `([left, right], [bottom, top])` in pixels.
    pub fn bounds(&self) -> ([f32; 2], [f32; 2]) {
        (
            [-self.half_width, self.half_width],
            [-self.half_height, self.half_height],
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            Self::NEAR,
            Self::FAR,
        );
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, Self::EYE_Z), Vec3::ZERO, Vec3::Y);
        projection * view
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub(crate) const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Pixel-space quad covering a `width` x `height` surface. Texture rows run
/// top to bottom, so the top edge samples `v = 0`.
pub fn quad_vertices(width: u32, height: u32) -> [QuadVertex; 4] {
    let hw = width as f32 / 2.0;
    let hh = height as f32 / 2.0;
    [
        QuadVertex {
            position: [-hw, hh, 0.0],
            uv: [0.0, 0.0],
        },
        QuadVertex {
            position: [-hw, -hh, 0.0],
            uv: [0.0, 1.0],
        },
        QuadVertex {
            position: [hw, hh, 0.0],
            uv: [1.0, 0.0],
        },
        QuadVertex {
            position: [hw, -hh, 0.0],
            uv: [1.0, 1.0],
        },
    ]
}
