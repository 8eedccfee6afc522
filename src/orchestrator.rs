use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::color::{by_id, ColorSpaceId, RgbColor};
use crate::diagnostics::{self, RenderDiagnostic};
use crate::error::RenderingError;
use crate::geometry::{
    cross_sections, cube_surface, cube_wireframe, cylinder_surface, cylinder_wireframe, face_2d,
    CylinderAxes, CylinderRange, Mesh, CUBE_SIZE_3D,
};
use crate::gpu::GpuContext;
use crate::palette::NamedColor;
use crate::render::{
    field::{FieldPipeline, FieldUniforms, CLASSIFIED_FORMAT},
    display::{DisplayPipeline, DisplayUniforms, DISPLAY_FORMAT},
    oracle::{read_framebuffer, PixelOracle},
    wireframe::{WireframePipeline, WireframeUniforms},
};
use crate::request::{HighlightMode, RenderMode, RenderRequest};

/// Telemetry returned alongside a completed render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub generation: u64,
    pub triangle_count: usize,
}

enum Command {
    RenderNow(RenderRequest, u64, oneshot::Sender<Result<RenderStats, RenderingError>>),
    ColorAt(u32, u32, oneshot::Sender<(Option<RgbColor>, Option<NamedColor>)>),
}

/// Single entry point coordinating geometry generation, the two GPU passes,
/// and pixel readback. Internally a one-task actor owns every `wgpu`
/// resource, so the "single-threaded cooperative" render model is enforced
/// by construction rather than by convention.
pub struct Orchestrator {
    commands: mpsc::UnboundedSender<Command>,
    deferred: watch::Sender<Option<(u64, RenderRequest)>>,
    completed_generation: watch::Receiver<u64>,
    generation_counter: Arc<AtomicU64>,
    diagnostics_rx: std::sync::Mutex<Option<mpsc::UnboundedReceiver<RenderDiagnostic>>>,
}

impl Orchestrator {
    pub async fn create(width: u32, height: u32) -> Result<Self, RenderingError> {
        let gpu = GpuContext::new().await?;
        let state = GpuState::new(gpu, width, height);

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (deferred_tx, deferred_rx) = watch::channel(None);
        let (completed_tx, completed_rx) = watch::channel(0u64);
        let (diagnostics_tx, diagnostics_rx) = mpsc::unbounded_channel();

        let generation_counter = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_actor(state, commands_rx, deferred_rx, completed_tx, diagnostics_tx));

        Ok(Orchestrator {
            commands: commands_tx,
            deferred: deferred_tx,
            completed_generation: completed_rx,
            generation_counter,
            diagnostics_rx: std::sync::Mutex::new(Some(diagnostics_rx)),
        })
    }

    /// Generations are 1-based: `completed_generation` starts at 0, so the
    /// first render (generation 1) is the first value that can ever satisfy
    /// `generation > *v` and move the completed watch.
    fn next_generation(&self) -> u64 {
        self.generation_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Submits a render that is never coalesced — used for requests whose
    /// arguments (palette edits, highlight selection) must not be silently
    /// dropped in favor of a later call.
    pub async fn render_now(&self, request: RenderRequest) -> Result<RenderStats, RenderingError> {
        request.validate()?;
        let generation = self.next_generation();
        diagnostics::log_accepted(generation);
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::RenderNow(request, generation, tx))
            .map_err(|_| RenderingError::BufferMapWaitingFailed)?;
        rx.await.map_err(|_| RenderingError::BufferMapWaitingFailed)?
    }

    /// Fire-and-forget submit. If another `render_deferred` call lands
    /// before this one is picked up by the actor, only the latest survives —
    /// `tokio::sync::watch` provides this "keep only the newest" semantics
    /// natively.
    pub fn render_deferred(&self, request: RenderRequest) -> Result<(), RenderingError> {
        request.validate()?;
        let generation = self.next_generation();
        diagnostics::log_accepted(generation);
        if let Some(pending_generation) = self.deferred.borrow().as_ref().map(|(g, _)| *g) {
            diagnostics::log_coalesced(pending_generation);
        }
        let _ = self.deferred.send(Some((generation, request)));
        Ok(())
    }

    pub async fn color_at(&self, x: u32, y: u32) -> (Option<RgbColor>, Option<NamedColor>) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::ColorAt(x, y, tx)).is_err() {
            return (None, None);
        }
        rx.await.unwrap_or((None, None))
    }

    /// Resolves once every render submitted before this call has finished.
    pub async fn wait_for_render(&self) {
        let target = self.generation_counter.load(Ordering::SeqCst);
        let mut rx = self.completed_generation.clone();
        while *rx.borrow() < target {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Takes ownership of the diagnostic receiver. Only the first caller
    /// gets it; later calls return `None`.
    pub fn diagnostics(&self) -> Option<mpsc::UnboundedReceiver<RenderDiagnostic>> {
        self.diagnostics_rx.lock().unwrap().take()
    }
}

/// Owns every `wgpu` resource. Only the actor task touches this.
struct GpuState {
    gpu: GpuContext,
    width: u32,
    height: u32,
    field: FieldPipeline,
    display: DisplayPipeline,
    wireframe: WireframePipeline,
    classified_texture: wgpu::Texture,
    depth_texture: wgpu::Texture,
    canvas_texture: wgpu::Texture,
    oracle: Option<PixelOracle>,
    last_palette: crate::palette::Palette,
}

impl GpuState {
    fn new(gpu: GpuContext, width: u32, height: u32) -> Self {
        let field = FieldPipeline::new(&gpu.device);
        let display = DisplayPipeline::new(&gpu.device);
        let wireframe = WireframePipeline::new(&gpu.device);

        let classified_texture = make_texture(&gpu.device, width, height, CLASSIFIED_FORMAT, "classified");
        let depth_texture = make_texture(&gpu.device, width, height, wgpu::TextureFormat::Depth32Float, "depth");
        let canvas_texture = make_texture(&gpu.device, width, height, DISPLAY_FORMAT, "canvas");

        GpuState {
            gpu,
            width,
            height,
            field,
            display,
            wireframe,
            classified_texture,
            depth_texture,
            canvas_texture,
            oracle: None,
            last_palette: crate::palette::Palette::default(),
        }
    }

    async fn execute(&mut self, request: RenderRequest, generation: u64) -> Result<RenderStats, RenderingError> {
        let space = by_id(request.color_space);
        let highlight_index = request.highlight_palette_index;

        let (surface, wire, polar_axes) = build_geometry(&request, &space, self.width, self.height);
        let triangle_count = surface.triangle_count();
        diagnostics::log_submitted(generation, triangle_count);

        let view_proj = compute_view_proj(&request, self.width, self.height);

        let mut field_uniforms = FieldUniforms::zeroed();
        field_uniforms.view_proj = view_proj;
        field_uniforms.color_space = match request.color_space {
            ColorSpaceId::Rgb => 0,
            ColorSpaceId::Hsv => 1,
            ColorSpaceId::Hsl => 2,
        };
        field_uniforms.polar_axis_a = polar_axes.map(|(a, _)| a as i32).unwrap_or(-1);
        field_uniforms.polar_axis_b = polar_axes.map(|(_, b)| b as i32).unwrap_or(-1);
        field_uniforms.palette_count = request.palette.len() as u32;
        field_uniforms.metric = match request.distance_metric.id {
            crate::palette::DistanceMetricId::DeltaE => 0,
            crate::palette::DistanceMetricId::RgbEuclidean => 1,
        };
        field_uniforms.threshold = request.distance_threshold as f32;
        field_uniforms.highlight_mode = match request.highlight_mode {
            HighlightMode::DimOther => 0,
            HighlightMode::HideOther => 1,
            HighlightMode::Boundary => 2,
        };
        field_uniforms.highlight_index = highlight_index.map(|i| i as i32).unwrap_or(-1);
        field_uniforms.show_unmatched = request.show_unmatched as u32;
        for (slot, named) in field_uniforms.palette.iter_mut().zip(request.palette.iter()) {
            let [r, g, b] = named.rgb.components().map(|c| c as f32);
            *slot = [r, g, b, 1.0];
        }

        let classified_view = self.classified_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = self.depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let canvas_view = self.canvas_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let field_uniform_buffer = self.field.uniform_buffer(&self.gpu.device, &field_uniforms);
        let field_bind_group = self.field.bind_group(&self.gpu.device, &field_uniform_buffer);

        let (vertex_buffer, index_buffer, index_count) = upload_mesh(&self.gpu.device, &surface);

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orchestrator-encoder"),
        });

        self.field.render(
            &mut encoder,
            &field_bind_group,
            &classified_view,
            &depth_view,
            &vertex_buffer,
            &index_buffer,
            index_count,
        );

        let display_uniforms = DisplayUniforms {
            highlight_mode: field_uniforms.highlight_mode,
            highlight_index: field_uniforms.highlight_index,
            show_boundaries: request.show_boundaries as u32,
            show_unmatched: request.show_unmatched as u32,
            texel_size: [1.0 / self.width as f32, 1.0 / self.height as f32],
            _pad: [0.0, 0.0],
        };
        let display_uniform_buffer = self.display.uniform_buffer(&self.gpu.device, &display_uniforms);
        let display_bind_group = self.display.bind_group(&self.gpu.device, &display_uniform_buffer, &classified_view);
        self.display.render(&mut encoder, &display_bind_group, &canvas_view);

        if matches!(request.mode, RenderMode::Volume3D) {
            if let Some(wire_mesh) = wire {
                let wire_uniforms = WireframeUniforms {
                    view_proj,
                    viewport_size: [self.width as f32, self.height as f32],
                    _pad: [0.0, 0.0],
                };
                let wire_uniform_buffer = self.wireframe.uniform_buffer(&self.gpu.device, &wire_uniforms);
                let wire_bind_group = self.wireframe.bind_group(&self.gpu.device, &wire_uniform_buffer, &depth_view);
                let (wire_vb, wire_ib, wire_count) = upload_mesh(&self.gpu.device, &wire_mesh);
                self.wireframe.render(&mut encoder, &wire_bind_group, &canvas_view, &wire_vb, &wire_ib, wire_count);
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));

        let pixels = read_framebuffer(&self.gpu.device, &self.gpu.queue, &self.classified_texture, self.width, self.height).await?;
        self.oracle = Some(PixelOracle::new(pixels, self.width, self.height));
        self.last_palette = request.palette.clone();

        diagnostics::log_completed(generation);
        Ok(RenderStats { generation, triangle_count })
    }

    fn color_at(&self, x: u32, y: u32) -> (Option<RgbColor>, Option<NamedColor>) {
        match &self.oracle {
            Some(oracle) => oracle.color_at(x, y, &self.last_palette),
            None => (None, None),
        }
    }
}

fn make_texture(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat, label: &str) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

fn upload_mesh(device: &wgpu::Device, mesh: &Mesh) -> (wgpu::Buffer, wgpu::Buffer, u32) {
    use wgpu::util::DeviceExt;
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh-vertices"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh-indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    (vertex_buffer, index_buffer, mesh.indices.len() as u32)
}

type Mat4 = [[f32; 4]; 4];

fn identity_matrix() -> Mat4 {
    [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]]
}

/// `a * b`, both operands and the result in the row-major `out[row] =
/// sum_col m[row][col] * v[col]` convention used throughout this module and
/// by `geometry::cross_section::transform_point`.
fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for row in 0..4 {
        for col in 0..4 {
            out[row][col] = (0..4).map(|k| a[row][k] * b[k][col]).sum();
        }
    }
    out
}

/// Row-major transpose. `wgpu`'s `mat4x4<f32>` is laid out column-major, so a
/// row-major matrix built with the rest of this module's math has to be
/// transposed before it lands in a uniform buffer `vs_main` reads with `*`.
fn transpose4(m: Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for row in 0..4 {
        for col in 0..4 {
            out[row][col] = m[col][row];
        }
    }
    out
}

/// Standard right-handed perspective projection (row-major, NDC z in
/// `[-1, 1]`); paired with `OPENGL_TO_WGPU_MATRIX` to land in wgpu's
/// `[0, 1]` depth range, following the widely-used wgpu tutorial convention.
fn perspective_matrix(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_radians / 2.0).tan();
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) / (near - far), (2.0 * far * near) / (near - far)],
        [0.0, 0.0, -1.0, 0.0],
    ]
}

const OPENGL_TO_WGPU_MATRIX: Mat4 =
    [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 0.5, 0.0], [0.0, 0.0, 0.5, 1.0]];

const CAMERA_DISTANCE: f32 = 3.0;

/// Translation-only view matrix: the camera sits `distance` back along +z,
/// looking at the origin, so the view transform just pushes the scene to
/// negative z.
fn camera_view_matrix(distance: f32) -> Mat4 {
    let mut m = identity_matrix();
    m[2][3] = -distance;
    m
}

/// MVP = projection · camera · rotation. 2D slices render with an identity
/// MVP (`face_2d` places its quad directly in clip space); 3D volumes rotate
/// the cube by `request.rotation_matrix` before the fixed camera and
/// projection are applied.
fn compute_view_proj(request: &RenderRequest, width: u32, height: u32) -> Mat4 {
    match request.mode {
        RenderMode::Slice2D { .. } => identity_matrix(),
        RenderMode::Volume3D => {
            let aspect = width as f32 / height.max(1) as f32;
            let proj = perspective_matrix(45f32.to_radians(), aspect, 0.1, 100.0);
            let view = camera_view_matrix(CAMERA_DISTANCE);
            let mvp = mat4_mul(OPENGL_TO_WGPU_MATRIX, mat4_mul(proj, mat4_mul(view, request.rotation_matrix)));
            transpose4(mvp)
        }
    }
}

type PolarAxes = Option<(usize, usize)>;

fn build_geometry(
    request: &RenderRequest,
    space: &crate::color::ColorSpace,
    _width: u32,
    _height: u32,
) -> (Mesh, Option<Mesh>, PolarAxes) {
    match request.mode {
        RenderMode::Slice2D { fixed_axis_index, slice_value } => {
            let axis = &space.axes()[fixed_axis_index];
            let (normalized, _) = crate::request::AxisSlice::fixed(slice_value).to_unit_range(axis);
            let polar_axes = if request.polar {
                space.available_polar_axis(fixed_axis_index).and_then(|_| {
                    let free: Vec<usize> = (0..3).filter(|&a| a != fixed_axis_index).collect();
                    Some((free[0], free[1]))
                })
            } else {
                None
            };
            let size = 2.0;
            let mesh = face_2d(fixed_axis_index, normalized, size);
            (mesh, None, polar_axes)
        }
        RenderMode::Volume3D => {
            let lo_hi: Vec<(f32, f32)> = space
                .axes()
                .iter()
                .zip(request.axis_slices.iter())
                .map(|(axis, slice)| slice.to_unit_range(axis))
                .collect();
            let lo = [lo_hi[0].0, lo_hi[1].0, lo_hi[2].0];
            let hi = [lo_hi[0].1, lo_hi[1].1, lo_hi[2].1];

            let fully_cropped = lo == [0.0, 0.0, 0.0] && hi == [1.0, 1.0, 1.0];
            let needs_interior = !request.show_unmatched || matches!(request.highlight_mode, HighlightMode::HideOther);

            let mut surface = if request.polar {
                let polar_axis = space.polar_axis_index().unwrap_or(0);
                let free: Vec<usize> = (0..3).filter(|&a| a != polar_axis).collect();
                let axes = CylinderAxes { angular_axis: polar_axis, radial_axis: free[0], height_axis: free[1] };
                let range = CylinderRange {
                    theta: (lo[polar_axis], hi[polar_axis]),
                    radius: (lo[free[0]], hi[free[0]]),
                    height: (lo[free[1]], hi[free[1]]),
                };
                cylinder_surface(axes, range, CUBE_SIZE_3D)
            } else {
                cube_surface(lo, hi, CUBE_SIZE_3D)
            };

            if needs_interior && fully_cropped {
                surface.append(cross_sections(&request.rotation_matrix, CUBE_SIZE_3D));
            }

            let wire = Some(if request.polar {
                let polar_axis = space.polar_axis_index().unwrap_or(0);
                let free: Vec<usize> = (0..3).filter(|&a| a != polar_axis).collect();
                let range = CylinderRange {
                    theta: (lo[polar_axis], hi[polar_axis]),
                    radius: (lo[free[0]], hi[free[0]]),
                    height: (lo[free[1]], hi[free[1]]),
                };
                cylinder_wireframe(range, CUBE_SIZE_3D)
            } else {
                cube_wireframe(lo, hi)
            });

            let polar_axes = request.polar.then(|| {
                let polar_axis = space.polar_axis_index().unwrap_or(0);
                let free: Vec<usize> = (0..3).filter(|&a| a != polar_axis).collect();
                (polar_axis, free[0])
            });

            (surface, wire, polar_axes)
        }
    }
}

async fn run_actor(
    mut state: GpuState,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut deferred: watch::Receiver<Option<(u64, RenderRequest)>>,
    completed_tx: watch::Sender<u64>,
    diagnostics_tx: mpsc::UnboundedSender<RenderDiagnostic>,
) {
    loop {
        tokio::select! {
            cmd = commands.recv() => {
                match cmd {
                    Some(Command::RenderNow(request, generation, reply)) => {
                        let result = state.execute(request, generation).await;
                        match &result {
                            Ok(_) => {
                                completed_tx.send_if_modified(|v| {
                                    if generation > *v { *v = generation; true } else { false }
                                });
                            }
                            Err(err) => {
                                diagnostics::log_aborted(generation, err);
                                let _ = diagnostics_tx.send(RenderDiagnostic { generation, message: err.to_string() });
                            }
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::ColorAt(x, y, reply)) => {
                        let _ = reply.send(state.color_at(x, y));
                    }
                    None => break,
                }
            }
            changed = deferred.changed() => {
                if changed.is_err() {
                    break;
                }
                let request = deferred.borrow_and_update().clone();
                if let Some((generation, request)) = request {
                    let result = state.execute(request, generation).await;
                    match result {
                        Ok(_) => {
                            completed_tx.send_if_modified(|v| {
                                if generation > *v { *v = generation; true } else { false }
                            });
                        }
                        Err(err) => {
                            diagnostics::log_aborted(generation, &err);
                            let _ = diagnostics_tx.send(RenderDiagnostic { generation, message: err.to_string() });
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_times_identity_is_identity() {
        assert_eq!(mat4_mul(identity_matrix(), identity_matrix()), identity_matrix());
    }

    #[test]
    fn transpose_is_its_own_inverse() {
        let m = [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [9.0, 10.0, 11.0, 12.0], [13.0, 14.0, 15.0, 16.0]];
        assert_eq!(transpose4(transpose4(m)), m);
    }

    #[test]
    fn slice2d_uses_identity_mvp_regardless_of_rotation() {
        let mut request = test_request();
        request.rotation_matrix = camera_view_matrix(7.0);
        assert_eq!(compute_view_proj(&request, 64, 64), identity_matrix());
    }

    #[test]
    fn volume3d_mvp_consumes_the_rotation_matrix() {
        let mut request = test_request();
        request.mode = RenderMode::Volume3D;
        let identity_result = compute_view_proj(&request, 64, 64);

        request.rotation_matrix = camera_view_matrix(5.0);
        let rotated_result = compute_view_proj(&request, 64, 64);

        assert_ne!(identity_result, rotated_result);
    }

    fn test_request() -> RenderRequest {
        RenderRequest {
            color_space: ColorSpaceId::Rgb,
            mode: RenderMode::Slice2D { fixed_axis_index: 2, slice_value: 0 },
            axis_slices: [crate::request::AxisSlice::fixed(0); 3],
            polar: false,
            show_boundaries: true,
            palette: crate::palette::Palette::default(),
            distance_metric: crate::palette::DistanceMetric::rgb_euclidean(),
            distance_threshold: 0.1,
            highlight_mode: HighlightMode::DimOther,
            highlight_palette_index: None,
            show_unmatched: true,
            rotation_matrix: identity_matrix(),
        }
    }
}
