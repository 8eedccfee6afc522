use super::vertex::{Mesh, Vertex};

/// Builds the single camera-facing quad for a 2D slice view. `fixed_axis`
/// names the axis held at `slice_value` (normalized `[0,1]`); the other two
/// axes sweep the full `[0,1]` square. The 2D pass uses an identity MVP, so
/// the quad must land directly in clip space: the first free axis always
/// maps to screen X and the second to screen Y, regardless of which axis is
/// fixed. The fixed component only ever lands in `color_coord`, never in
/// `position` — the quad is flush against the screen for every fixed axis.
pub fn face_2d(fixed_axis: usize, slice_value: f32, size: f32) -> Mesh {
    let corners_uv = [[0.0f32, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut mesh = Mesh::default();
    for &[u, v] in &corners_uv {
        let color_coord = color_coord_for(fixed_axis, slice_value, u, v);
        let screen = screen_position(u, v, size);
        mesh.vertices.push(Vertex::new(screen, color_coord));
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

fn color_coord_for(fixed_axis: usize, slice_value: f32, u: f32, v: f32) -> [f32; 3] {
    let mut c = [0.0f32; 3];
    let free_axes: Vec<usize> = (0..3).filter(|&a| a != fixed_axis).collect();
    c[fixed_axis] = slice_value;
    c[free_axes[0]] = u;
    c[free_axes[1]] = v;
    c
}

fn screen_position(u: f32, v: f32, size: f32) -> [f32; 3] {
    [(u - 0.5) * size, (v - 0.5) * size, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_has_four_vertices_two_triangles() {
        let mesh = face_2d(2, 0.5, 2.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn fixed_axis_component_is_constant_across_vertices() {
        let mesh = face_2d(0, 0.25, 2.0);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.color_coord[0], 0.25);
        }
    }
}
