use anyhow::{bail, Context, Result};
use assets::{LoadedTexture, TextureWrap};
use slider::ResourceRegistry;
use wgpu::util::{DeviceExt, TextureDataOrder};

pub(crate) struct GpuTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

fn address_mode(wrap: TextureWrap) -> wgpu::AddressMode {
    match wrap {
        TextureWrap::Clamp => wgpu::AddressMode::ClampToEdge,
        TextureWrap::Repeat => wgpu::AddressMode::Repeat,
    }
}

/// Uploads a decoded texture and records its release.
pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    loaded: &LoadedTexture,
    label: &str,
    registry: &mut ResourceRegistry,
) -> Result<GpuTexture> {
    let image = &loaded.image;
    check_extent(
        image.width,
        image.height,
        device.limits().max_texture_dimension_2d,
    )
    .with_context(|| format!("cannot upload {}", loaded.source))?;

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            // Only the base level is uploaded.
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mode = address_mode(loaded.policy.wrap);
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: if loaded.policy.mipmaps {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        },
        ..Default::default()
    });

    registry.register(format!("texture {label}"), move || texture.destroy());
    tracing::debug!(
        label,
        width = image.width,
        height = image.height,
        wrap = %loaded.policy.wrap,
        "uploaded texture"
    );

    Ok(GpuTexture { view, sampler })
}

fn check_extent(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("texture has zero size ({width}x{height})");
    }
    if width > max_dimension || height > max_dimension {
        bail!("texture is {width}x{height} but the GPU supports at most {max_dimension} per side");
    }
    Ok(())
}
