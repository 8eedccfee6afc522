use super::vertex::{Mesh, Vertex};

pub const CROSS_SECTION_SCALE: f32 = 1.0 / 64.0;

type Mat4 = [[f32; 4]; 4];

fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 3] {
    let v = [p[0], p[1], p[2], 1.0];
    let mut out = [0.0f32; 4];
    for row in 0..4 {
        out[row] = m[row][0] * v[0] + m[row][1] * v[1] + m[row][2] * v[2] + m[row][3] * v[3];
    }
    [out[0], out[1], out[2]]
}

fn cube_corner(index: u8) -> [f32; 3] {
    [
        if index & 1 != 0 { 1.0 } else { 0.0 },
        if index & 2 != 0 { 1.0 } else { 0.0 },
        if index & 4 != 0 { 1.0 } else { 0.0 },
    ]
}

fn cube_edges() -> Vec<(u8, u8)> {
    let mut edges = Vec::with_capacity(12);
    for i in 0..8u8 {
        for axis in 0..3 {
            if (i >> axis) & 1 != 0 {
                edges.push((i, i ^ (1 << axis)));
            }
        }
    }
    edges
}

/// Camera-aligned slicing quads through the unit cube, used to give the 3D
/// renderer fragments to shade when the exterior surface is culled away.
/// Each produced triangle carries interpolated color coordinates so the Pass
/// A fragment shader treats them identically to surface triangles.
pub fn cross_sections(rotation: &Mat4, size: f32) -> Mesh {
    let corners: Vec<[f32; 3]> = (0..8u8).map(cube_corner).collect();
    let transformed: Vec<[f32; 3]> = corners.iter().map(|c| transform_point(rotation, *c)).collect();

    let z_min = transformed.iter().map(|p| p[2]).fold(f32::INFINITY, f32::min);
    let z_max = transformed.iter().map(|p| p[2]).fold(f32::NEG_INFINITY, f32::max);
    let step = CROSS_SECTION_SCALE * size;

    let edges = cube_edges();
    let mut mesh = Mesh::default();

    let mut z = z_min + step * 0.5;
    while z < z_max {
        let mut ring: Vec<([f32; 3], [f32; 3])> = Vec::new(); // (camera xy at z, color_coord)

        for &(a, b) in &edges {
            let za = transformed[a as usize][2];
            let zb = transformed[b as usize][2];
            if (za <= z && zb >= z) || (zb <= z && za >= z) {
                if (za - zb).abs() < 1e-9 {
                    continue;
                }
                let t = (z - za) / (zb - za);
                let pos_cam = lerp3(transformed[a as usize], transformed[b as usize], t);
                let coord = lerp3(corners[a as usize], corners[b as usize], t);
                ring.push(([pos_cam[0], pos_cam[1], z], coord));
            }
        }

        if ring.len() >= 3 {
            let (cx, cy) = ring.iter().fold((0.0f32, 0.0f32), |(sx, sy), (p, _)| (sx + p[0], sy + p[1]));
            let n = ring.len() as f32;
            let (cx, cy) = (cx / n, cy / n);
            ring.sort_by(|(a, _), (b, _)| {
                let angle_a = (a[1] - cy).atan2(a[0] - cx);
                let angle_b = (b[1] - cy).atan2(b[0] - cx);
                angle_a.partial_cmp(&angle_b).unwrap()
            });

            let base = mesh.vertices.len() as u16;
            for (pos, coord) in &ring {
                let world = [(pos[0]) * size, (pos[1]) * size, pos[2]];
                mesh.vertices.push(Vertex::new(world, *coord));
            }
            for i in 0..ring.len() as u16 - 2 {
                mesh.indices.extend_from_slice(&[base, base + i + 1, base + i + 2]);
            }
        }

        z += step;
    }

    mesh
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Mat4 {
        [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]]
    }

    #[test]
    fn produces_triangles_spanning_the_cube_depth() {
        let mesh = cross_sections(&identity(), 1.0);
        assert!(mesh.triangle_count() > 0);
        for v in &mesh.vertices {
            for c in v.color_coord {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }
}
