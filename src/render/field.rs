use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::geometry::vertex::vertex_buffer_layout;
use crate::gpu::pipeline::{create_shader_render_pipeline, PipelineShape};
use crate::palette::MAX_PALETTE_COLORS;

const FIELD_SHADER: &str = include_str!("../shaders/field.wgsl");

pub const CLASSIFIED_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FieldUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub color_space: u32,
    pub polar_axis_a: i32,
    pub polar_axis_b: i32,
    pub palette_count: u32,
    pub metric: u32,
    pub threshold: f32,
    pub highlight_mode: u32,
    pub highlight_index: i32,
    pub show_unmatched: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub palette: [[f32; 4]; MAX_PALETTE_COLORS],
}

impl FieldUniforms {
    pub fn zeroed() -> Self {
        Zeroable::zeroed()
    }
}

/// The offscreen pass that rasterizes color-space geometry into a classified
/// RGBA8 buffer. Mirrors the shape of the teacher's per-layer pipelines: one
/// struct owning the pipeline and bind group layout, a `bind_group` builder,
/// and a thin `render` entry point.
pub struct FieldPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl FieldPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("field-bind-group-layout"),
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

        let pipeline = create_shader_render_pipeline(
            device,
            &bind_group_layout,
            FIELD_SHADER,
            "field-pipeline",
            CLASSIFIED_FORMAT,
            PipelineShape::IndexedMesh { topology: wgpu::PrimitiveTopology::TriangleList },
            true,
        );

        FieldPipeline { pipeline, bind_group_layout }
    }

    pub fn bind_group(&self, device: &wgpu::Device, uniform_buffer: &wgpu::Buffer) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("field-bind-group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        })
    }

    pub fn uniform_buffer(&self, device: &wgpu::Device, uniforms: &FieldUniforms) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("field-uniforms"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Runs the Pass A draw into `classified_view`/`depth_view`. `vertex_buffer`
    /// and `index_buffer` hold the combined surface + cross-section geometry.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &wgpu::BindGroup,
        classified_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        vertex_buffer: &wgpu::Buffer,
        index_buffer: &wgpu::Buffer,
        index_count: u32,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("field-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: classified_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..index_count, 0, 0..1);
    }
}

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    vertex_buffer_layout()
}
