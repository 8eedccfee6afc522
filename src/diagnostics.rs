/// Emitted on the diagnostics channel when a render aborts after a GPU
/// failure. The classified framebuffer keeps its previous contents, so
/// `color_at` remains valid even though this generation never completed.
#[derive(Debug, Clone)]
pub struct RenderDiagnostic {
    pub generation: u64,
    pub message: String,
}

pub fn log_accepted(generation: u64) {
    tracing::debug!(generation, "render.accepted");
}

pub fn log_coalesced(generation: u64) {
    tracing::debug!(generation, "render.coalesced");
}

pub fn log_submitted(generation: u64, triangle_count: usize) {
    tracing::debug!(generation, triangle_count, "render.submitted");
}

pub fn log_completed(generation: u64) {
    tracing::debug!(generation, "render.completed");
}

pub fn log_aborted(generation: u64, error: &crate::error::RenderingError) {
    tracing::warn!(generation, %error, "render.aborted");
}
