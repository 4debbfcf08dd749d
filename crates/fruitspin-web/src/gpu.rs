use fruitspin_core::error::FruitspinError;
use wgpu::{
    CompositeAlphaMode, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference,
    Queue, RequestAdapterOptions, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
};

/// The canvas surface and the device that draws the machine.
pub struct GpuContext {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub surface_format: TextureFormat,
    pub adapter_name: String,
    pub backend: String,
}

impl GpuContext {
    /// Reapply the current configuration after the surface was lost or went stale.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }
}

/// A zero-sized canvas (hidden, or laid out before CSS applies) cannot back
/// a surface, so each side is at least one pixel.
pub fn surface_size(width: u32, height: u32) -> (u32, u32) {
    (width.max(1), height.max(1))
}

fn surface_config(
    format: TextureFormat,
    alpha_mode: CompositeAlphaMode,
    width: u32,
    height: u32,
) -> SurfaceConfiguration {
    let (width, height) = surface_size(width, height);
    SurfaceConfiguration {
        usage: TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        desired_maximum_frame_latency: 2,
        alpha_mode,
        view_formats: vec![],
    }
}

/// Open WebGPU on `canvas`. Everything is painted through egui, so the
/// framebuffer format is the one egui-wgpu prefers and no features are needed.
#[cfg(target_arch = "wasm32")]
pub async fn init_gpu(
    canvas: web_sys::HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<GpuContext, FruitspinError> {
    let instance = Instance::new(&InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });

    let surface: Surface<'static> = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
        .map_err(|e| FruitspinError::SurfaceConfigFailed(format!("{e}")))?;

    // A 2D slot machine has no use for the discrete GPU
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| {
            FruitspinError::AdapterNotFound(
                "No WebGPU adapter found. Your browser may not support WebGPU.".into(),
            )
        })?;

    let info = adapter.get_info();
    let backend = format!("{:?}", info.backend);
    log::info!("Adapter: {} ({})", info.name, backend);

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some("fruitspin-device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| FruitspinError::DeviceRequestFailed(format!("{e}")))?;

    let caps = surface.get_capabilities(&adapter);
    let surface_format = egui_wgpu::preferred_framebuffer_format(&caps.formats)
        .map_err(|e| FruitspinError::SurfaceConfigFailed(format!("{e}")))?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(CompositeAlphaMode::Auto);

    let config = surface_config(surface_format, alpha_mode, width, height);
    surface.configure(&device, &config);
    log::info!(
        "Surface {:?} at {}x{}",
        surface_format,
        config.width,
        config.height
    );

    Ok(GpuContext {
        device,
        queue,
        surface,
        surface_config: config,
        surface_format,
        adapter_name: info.name,
        backend,
    })
}
