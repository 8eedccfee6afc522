use bytemuck::{Pod, Zeroable};

/// One mesh vertex: a camera-space position plus the color-space coordinate
/// it represents. Wireframe meshes reuse this layout with `color_coord`
/// zeroed, since the wireframe shader never reads it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color_coord: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], color_coord: [f32; 3]) -> Self {
        Vertex { position, color_coord }
    }

    pub fn position_only(position: [f32; 3]) -> Self {
        Vertex { position, color_coord: [0.0; 3] }
    }
}

pub const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// A generated mesh: interleaved vertices plus a triangle-list or line-list
/// index buffer, depending on the producing function.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertices.len() as u16;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Centers a normalized `[0,1]^3` color coordinate on the origin at `size`.
pub fn color_coord_to_position(c: [f32; 3], size: f32) -> [f32; 3] {
    [(c[0] - 0.5) * size, (c[1] - 0.5) * size, (c[2] - 0.5) * size]
}
