use anyhow::{anyhow, Context as AnyhowContext, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

/// Device, queue and swapchain for the slider window.
pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    pub surface_format: wgpu::TextureFormat,
}

/// Slide bytes are sampled as stored, so a linear swapchain keeps them unchanged.
fn select_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

fn select_present_mode(modes: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if modes.contains(&wgpu::PresentMode::Fifo) {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoVsync
    }
}

fn clamp_surface_size(
    requested: PhysicalSize<u32>,
    max_dimension: u32,
) -> Result<PhysicalSize<u32>> {
    let width = requested.width.max(1);
    let height = requested.height.max(1);
    if width > max_dimension || height > max_dimension {
        anyhow::bail!(
            "window is {width}x{height} but the GPU supports at most {max_dimension} per side"
        );
    }
    Ok(PhysicalSize::new(width, height))
}

impl GpuContext {
    /// `target` must outlive the returned context.
    pub(crate) fn new<T>(target: &T, initial_size: PhysicalSize<u32>) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = create_surface(&instance, target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to the slider window")?;
        let info = adapter.get_info();
        tracing::debug!(adapter = %info.name, backend = ?info.backend, "selected GPU adapter");

        let limits = adapter.limits();
        let size = clamp_surface_size(initial_size, limits.max_texture_dimension_2d)?;

        let capabilities = surface.get_capabilities(&adapter);
        let surface_format = select_surface_format(&capabilities.formats)
            .context("surface reports no supported formats")?;
        if surface_format.is_srgb() {
            tracing::warn!(?surface_format, "only sRGB surface formats available");
        }
        let present_mode = select_present_mode(&capabilities.present_modes);
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("dispslide device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to open GPU device")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        tracing::debug!(?present_mode, ?surface_format, "surface configured");

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            surface_format,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.reconfigure();
    }

    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

fn create_surface<T>(instance: &wgpu::Instance, target: &T) -> Result<wgpu::Surface<'static>>
where
    T: HasDisplayHandle + HasWindowHandle,
{
    let window = target
        .window_handle()
        .map_err(|err| anyhow!("window handle unavailable: {err}"))?;
    let display = target
        .display_handle()
        .map_err(|err| anyhow!("display handle unavailable: {err}"))?;

    // The caller keeps the window alive for as long as the surface.
    unsafe {
        instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
            raw_display_handle: display.as_raw(),
            raw_window_handle: window.as_raw(),
        })
    }
    .context("failed to create rendering surface")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn prefers_linear_formats() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            select_surface_format(&formats),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(
            select_surface_format(&[TextureFormat::Rgba8UnormSrgb]),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(select_surface_format(&[]), None);
    }

    #[test]
    fn falls_back_to_auto_vsync() {
        assert_eq!(
            select_present_mode(&[wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo]),
            wgpu::PresentMode::Fifo
        );
        assert_eq!(
            select_present_mode(&[wgpu::PresentMode::Immediate]),
            wgpu::PresentMode::AutoVsync
        );
    }

    #[test]
    fn surface_size_is_bounded_by_limits() {
        let size = clamp_surface_size(PhysicalSize::new(0, 600), 4096).unwrap();
        assert_eq!((size.width, size.height), (1, 600));
        assert!(clamp_surface_size(PhysicalSize::new(8192, 600), 4096).is_err());
    }
}
