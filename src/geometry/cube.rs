use super::vertex::{color_coord_to_position, Mesh, Vertex};

pub const CUBE_SIZE_3D: f32 = 1.1;

/// The 8 corners of a `[lo,hi]^3` sub-box, enumerated by a 3-bit index: bit
/// `k` selects `hi[k]` (1) or `lo[k]` (0) of axis `k`.
fn corner_coord(index: u8, lo: [f32; 3], hi: [f32; 3]) -> [f32; 3] {
    [
        if index & 1 != 0 { hi[0] } else { lo[0] },
        if index & 2 != 0 { hi[1] } else { lo[1] },
        if index & 4 != 0 { hi[2] } else { lo[2] },
    ]
}

fn axis_bit(index: u8, axis: usize) -> bool {
    (index >> axis) & 1 != 0
}

/// Surface mesh of a sliced axis-aligned cube: 6 faces, each a quad split
/// into two triangles.
pub fn cube_surface(lo: [f32; 3], hi: [f32; 3], size: f32) -> Mesh {
    let mut mesh = Mesh::default();

    for axis in 0..3 {
        for direction in 0..2u8 {
            let corners: Vec<u8> = (0..8u8).filter(|&i| (axis_bit(i, axis) as u8) == direction).collect();
            // `corners` names 4 of the cube's 8 vertices; order them into a
            // consistent quad winding by varying the two free axes.
            let free_axes: Vec<usize> = (0..3).filter(|&a| a != axis).collect();
            let mut ordered = corners.clone();
            ordered.sort_by_key(|&i| {
                let a0 = axis_bit(i, free_axes[0]) as u8;
                let a1 = axis_bit(i, free_axes[1]) as u8;
                (a1, a0)
            });
            // ordered: (0,0) (1,0) (0,1) (1,1) -> reorder to a proper quad fan.
            let quad = [ordered[0], ordered[1], ordered[3], ordered[2]];

            let base = mesh.vertices.len() as u16;
            for &corner in &quad {
                let coord = corner_coord(corner, lo, hi);
                mesh.vertices.push(Vertex::new(color_coord_to_position(coord, size), coord));
            }
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    mesh
}

/// Edges of the sliced sub-box plus the edges of the full unit cube, so the
/// viewer always sees both the current crop and the overall bounds.
pub fn cube_wireframe(lo: [f32; 3], hi: [f32; 3]) -> Mesh {
    let mut mesh = Mesh::default();
    append_cube_edges(&mut mesh, lo, hi);
    append_cube_edges(&mut mesh, [0.0; 3], [1.0; 3]);
    mesh
}

fn append_cube_edges(mesh: &mut Mesh, lo: [f32; 3], hi: [f32; 3]) {
    for i in 0..8u8 {
        for axis in 0..3 {
            if axis_bit(i, axis) {
                let j = i ^ (1 << axis);
                let base = mesh.vertices.len() as u16;
                let ci = corner_coord(i, lo, hi);
                let cj = corner_coord(j, lo, hi);
                mesh.vertices.push(Vertex::position_only(color_coord_to_position(ci, CUBE_SIZE_3D)));
                mesh.vertices.push(Vertex::position_only(color_coord_to_position(cj, CUBE_SIZE_3D)));
                mesh.indices.extend_from_slice(&[base, base + 1]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cube_surface_has_six_faces() {
        let mesh = cube_surface([0.0; 3], [1.0; 3], CUBE_SIZE_3D);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn wireframe_has_twelve_plus_twelve_edges() {
        let mesh = cube_wireframe([0.2, 0.2, 0.2], [0.8, 0.8, 0.8]);
        assert_eq!(mesh.indices.len() / 2, 24);
    }
}
