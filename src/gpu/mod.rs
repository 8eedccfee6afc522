pub mod pipeline;

pub use pipeline::{create_shader_render_pipeline, do_render_pass, PipelineShape};

use crate::error::RenderingError;

/// Owns the adapter/device/queue triple and knows how to turn a WGSL source
/// string into a render pipeline. Everything else in the crate that touches
/// the GPU borrows from here.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> Result<Self, RenderingError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderingError::UnsupportedGpu)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("chromafield-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        tracing::debug!(adapter = ?adapter.get_info().name, "gpu context initialized");

        Ok(GpuContext { instance, adapter, device, queue })
    }
}
