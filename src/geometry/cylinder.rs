use std::f32::consts::PI;

use super::vertex::{Mesh, Vertex};

pub const CYLINDER_RADIAL_SEGMENTS: usize = 16;

/// Fraction of the cylinder's diameter that the outer radius must be pulled
/// inward by so a 16-gon approximation of the circle still fits entirely
/// inside an axis-aligned square viewport.
pub fn radial_axis_offset(diameter: f32) -> f32 {
    let segment_angle = 2.0 * PI / CYLINDER_RADIAL_SEGMENTS as f32;
    let sagitta = 1.0 - (segment_angle / 2.0).cos();
    diameter * sagitta
}

/// Which color-space axis plays which geometric role in the cylinder.
#[derive(Debug, Clone, Copy)]
pub struct CylinderAxes {
    pub angular_axis: usize,
    pub radial_axis: usize,
    pub height_axis: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CylinderRange {
    pub theta: (f32, f32),
    pub radius: (f32, f32),
    pub height: (f32, f32),
}

impl CylinderRange {
    pub fn is_full_circle(&self) -> bool {
        (self.theta.1 - self.theta.0 - 1.0).abs() < 1e-6
    }
}

fn square_coord_for_polar(theta: f32, r: f32) -> (f32, f32) {
    let angle = theta * 2.0 * PI;
    let x = angle.sin() * r / 2.0 + 0.5;
    let y = angle.cos() * r / 2.0 + 0.5;
    (x, y)
}

fn color_coord(axes: CylinderAxes, theta: f32, r: f32, height: f32) -> [f32; 3] {
    let (x, y) = square_coord_for_polar(theta, r);
    let mut c = [0.0f32; 3];
    c[axes.angular_axis] = x;
    c[axes.radial_axis] = y;
    c[axes.height_axis] = height;
    c
}

fn world_position(theta: f32, r: f32, height: f32, size: f32, inset: f32) -> [f32; 3] {
    let inset_r = (r - inset).max(0.0);
    let angle = theta * 2.0 * PI;
    let radius_world = inset_r * 0.5 * size;
    [
        radius_world * angle.cos(),
        (height - 0.5) * size,
        radius_world * angle.sin(),
    ]
}

fn vertex_at(axes: CylinderAxes, theta: f32, r: f32, height: f32, size: f32, inset: f32) -> Vertex {
    Vertex::new(world_position(theta, r, height, size, inset), color_coord(axes, theta, r, height))
}

fn theta_steps(range: (f32, f32)) -> Vec<f32> {
    let (lo, hi) = range;
    let span = hi - lo;
    let steps = CYLINDER_RADIAL_SEGMENTS;
    (0..=steps).map(|i| lo + span * (i as f32 / steps as f32)).collect()
}

fn annulus(axes: CylinderAxes, range: CylinderRange, height: f32, size: f32, inset: f32, flip: bool) -> Mesh {
    let mut mesh = Mesh::default();
    let thetas = theta_steps(range.theta);
    let (r_lo, r_hi) = range.radius;

    for window in thetas.windows(2) {
        let (t0, t1) = (window[0], window[1]);
        let base = mesh.vertices.len() as u16;
        mesh.vertices.push(vertex_at(axes, t0, r_lo, height, size, inset));
        mesh.vertices.push(vertex_at(axes, t1, r_lo, height, size, inset));
        mesh.vertices.push(vertex_at(axes, t1, r_hi, height, size, inset));
        mesh.vertices.push(vertex_at(axes, t0, r_hi, height, size, inset));
        if flip {
            mesh.indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        } else {
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
    mesh
}

fn band(axes: CylinderAxes, range: CylinderRange, radius: f32, size: f32, inset: f32, outward: bool) -> Mesh {
    let mut mesh = Mesh::default();
    let thetas = theta_steps(range.theta);
    let (h_lo, h_hi) = range.height;

    for window in thetas.windows(2) {
        let (t0, t1) = (window[0], window[1]);
        let base = mesh.vertices.len() as u16;
        mesh.vertices.push(vertex_at(axes, t0, radius, h_lo, size, inset));
        mesh.vertices.push(vertex_at(axes, t1, radius, h_lo, size, inset));
        mesh.vertices.push(vertex_at(axes, t1, radius, h_hi, size, inset));
        mesh.vertices.push(vertex_at(axes, t0, radius, h_hi, size, inset));
        if outward {
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            mesh.indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }
    mesh
}

fn wedge_face(axes: CylinderAxes, range: CylinderRange, theta: f32, size: f32, inset: f32, flip: bool) -> Mesh {
    let mut mesh = Mesh::default();
    let (r_lo, r_hi) = range.radius;
    let (h_lo, h_hi) = range.height;
    let corners = [
        vertex_at(axes, theta, r_lo, h_lo, size, inset),
        vertex_at(axes, theta, r_hi, h_lo, size, inset),
        vertex_at(axes, theta, r_hi, h_hi, size, inset),
        vertex_at(axes, theta, r_lo, h_hi, size, inset),
    ];
    mesh.vertices.extend_from_slice(&corners);
    if flip {
        mesh.indices.extend_from_slice(&[0, 2, 1, 0, 3, 2]);
    } else {
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    }
    mesh
}

/// Full surface mesh of a sliced cylinder: top/bottom annuli, outer band,
/// optional inner band (when the radial range doesn't reach the axis), and
/// optional wedge end caps (when the angular range is a proper wedge).
pub fn cylinder_surface(axes: CylinderAxes, range: CylinderRange, size: f32) -> Mesh {
    let mut mesh = Mesh::default();
    let inset = radial_axis_offset(range.radius.1 * 2.0);

    mesh.append(annulus(axes, range, range.height.1, size, inset, false));
    mesh.append(annulus(axes, range, range.height.0, size, inset, true));
    mesh.append(band(axes, range, range.radius.1, size, inset, true));

    if range.radius.0 > 0.0 {
        mesh.append(band(axes, range, range.radius.0, size, inset, false));
    }

    if !range.is_full_circle() {
        mesh.append(wedge_face(axes, range, range.theta.0, size, inset, true));
        mesh.append(wedge_face(axes, range, range.theta.1, size, inset, false));
    }

    mesh
}

/// Top/bottom circle polylines, wedge-face outlines (if wedged), and four
/// generator lines spaced at 90 degrees along the body.
pub fn cylinder_wireframe(range: CylinderRange, size: f32) -> Mesh {
    let mut mesh = Mesh::default();
    let inset = radial_axis_offset(range.radius.1);
    let axes = CylinderAxes { angular_axis: 0, radial_axis: 1, height_axis: 2 };

    for &height in &[range.height.0, range.height.1] {
        let thetas = theta_steps(range.theta);
        for window in thetas.windows(2) {
            let base = mesh.vertices.len() as u16;
            mesh.vertices.push(Vertex::position_only(world_position(window[0], range.radius.1, height, size, inset)));
            mesh.vertices.push(Vertex::position_only(world_position(window[1], range.radius.1, height, size, inset)));
            mesh.indices.extend_from_slice(&[base, base + 1]);
        }
    }

    if !range.is_full_circle() {
        for &theta in &[range.theta.0, range.theta.1] {
            let base = mesh.vertices.len() as u16;
            mesh.vertices.push(Vertex::position_only(world_position(theta, range.radius.1, range.height.0, size, inset)));
            mesh.vertices.push(Vertex::position_only(world_position(theta, range.radius.1, range.height.1, size, inset)));
            mesh.indices.extend_from_slice(&[base, base + 1]);
        }
    }

    for i in 0..4 {
        let theta = i as f32 / 4.0;
        let base = mesh.vertices.len() as u16;
        mesh.vertices.push(Vertex::position_only(world_position(theta, range.radius.1, range.height.0, size, inset)));
        mesh.vertices.push(Vertex::position_only(world_position(theta, range.radius.1, range.height.1, size, inset)));
        mesh.indices.extend_from_slice(&[base, base + 1]);
    }

    let _ = axes;
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_range() -> CylinderRange {
        CylinderRange { theta: (0.0, 1.0), radius: (0.0, 1.0), height: (0.0, 1.0) }
    }

    #[test]
    fn full_cylinder_has_no_inner_band_or_wedges() {
        let axes = CylinderAxes { angular_axis: 0, radial_axis: 1, height_axis: 2 };
        let mesh = cylinder_surface(axes, full_range(), 1.0);
        // two annuli + one outer band, each with 16 quads (32 triangles) => 48 triangles total
        assert_eq!(mesh.triangle_count(), 16 * 2 * 3);
    }

    #[test]
    fn wedge_adds_two_flat_faces() {
        let axes = CylinderAxes { angular_axis: 0, radial_axis: 1, height_axis: 2 };
        let mut range = full_range();
        range.theta = (0.0, 0.5);
        let mesh = cylinder_surface(axes, range, 1.0);
        // two annuli (16 quads each) + outer band (16 quads) + 2 wedge faces
        assert_eq!(mesh.triangle_count(), 16 * 2 * 3 + 4);
    }

    #[test]
    fn inner_band_present_when_radius_floor_above_zero() {
        let axes = CylinderAxes { angular_axis: 0, radial_axis: 1, height_axis: 2 };
        let mut range = full_range();
        range.radius = (0.3, 1.0);
        let mesh = cylinder_surface(axes, range, 1.0);
        assert_eq!(mesh.triangle_count(), 16 * 3 * 3);
    }
}
