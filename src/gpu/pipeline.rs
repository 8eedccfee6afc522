use crate::geometry::vertex::vertex_buffer_layout;

/// Shape of the pipeline to build: a full-screen triangle (Pass B style,
/// no vertex buffer, 3 vertices drawn directly) or an indexed mesh pipeline
/// drawing either triangles or lines from the shared [`Vertex`] layout.
///
/// [`Vertex`]: crate::geometry::vertex::Vertex
pub enum PipelineShape {
    FullScreenTriangle,
    IndexedMesh { topology: wgpu::PrimitiveTopology },
}

#[allow(clippy::too_many_arguments)]
pub fn create_shader_render_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader_source: &str,
    label: &str,
    color_format: wgpu::TextureFormat,
    shape: PipelineShape,
    depth_enabled: bool,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label}-layout")),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let (vertex_buffers, topology): (Vec<wgpu::VertexBufferLayout>, wgpu::PrimitiveTopology) =
        match shape {
            PipelineShape::FullScreenTriangle => (vec![], wgpu::PrimitiveTopology::TriangleList),
            PipelineShape::IndexedMesh { topology } => (vec![vertex_buffer_layout()], topology),
        };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: depth_enabled.then(|| wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Binds `pipeline` and `bind_group` into `pass` and issues the draw call.
/// `vertex_count` is `3` for the full-screen-triangle trick, or the mesh's
/// index count when `index_buffer` is supplied.
pub fn do_render_pass<'a>(
    pass: &mut wgpu::RenderPass<'a>,
    pipeline: &'a wgpu::RenderPipeline,
    bind_group: &'a wgpu::BindGroup,
    vertex_buffer: Option<&'a wgpu::Buffer>,
    index_buffer: Option<(&'a wgpu::Buffer, u32)>,
) {
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);

    if let Some(vb) = vertex_buffer {
        pass.set_vertex_buffer(0, vb.slice(..));
    }

    match index_buffer {
        Some((ib, count)) => {
            pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..count, 0, 0..1);
        }
        None => pass.draw(0..3, 0..1),
    }
}
