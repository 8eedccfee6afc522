use futures_intrusive::channel::shared::oneshot_channel;

use crate::color::RgbColor;
use crate::error::RenderingError;
use crate::palette::{NamedColor, Palette, OUTSIDE_COLOR_SPACE};

pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padding = (align - unpadded % align) % align;
    unpadded + padding
}

/// Copies the classified texture back to host memory. Follows the same
/// map-then-poll dance used throughout the corpus for GPU readback: a
/// `futures_intrusive` oneshot bridges `map_async`'s callback into an
/// awaitable future, then `device.poll` drives it to completion.
pub async fn read_framebuffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RenderingError> {
    let padded_row = padded_bytes_per_row(width);
    let buffer_size = (padded_row * height) as wgpu::BufferAddress;

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("oracle-readback-buffer"),
        size: buffer_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("oracle-readback-encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
    queue.submit(Some(encoder.finish()));

    let slice = output_buffer.slice(..);
    let (tx, rx) = oneshot_channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    device.poll(wgpu::PollType::Wait).map_err(|_| RenderingError::BufferMapWaitingFailed)?;
    rx.receive().await.ok_or(RenderingError::BufferMapWaitingFailed)??;

    let data = slice.get_mapped_range();
    let mut unpadded = Vec::with_capacity((width * 4 * height) as usize);
    for row in data.chunks(padded_row as usize) {
        unpadded.extend_from_slice(&row[..(width * 4) as usize]);
    }
    drop(data);
    output_buffer.unmap();

    Ok(unpadded)
}

/// Tight cache of the last completed render's classified pixels, queried by
/// `Orchestrator::color_at`. Pixel Oracle never fails: out-of-bounds and
/// outside-color-space reads both yield `(None, None)`.
pub struct PixelOracle {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelOracle {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        PixelOracle { pixels, width, height }
    }

    pub fn color_at(&self, x: u32, y: u32, palette: &Palette) -> (Option<RgbColor>, Option<NamedColor>) {
        if x >= self.width || y >= self.height {
            return (None, None);
        }
        let flipped_y = self.height - 1 - y;
        let offset = ((flipped_y * self.width + x) * 4) as usize;
        let Some(bytes) = self.pixels.get(offset..offset + 4) else {
            return (None, None);
        };
        let [r, g, b, alpha] = [bytes[0], bytes[1], bytes[2], bytes[3]];

        if alpha == OUTSIDE_COLOR_SPACE {
            return (None, None);
        }

        let rgb = RgbColor(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
        let named = palette.get(alpha as usize).cloned();
        (Some(rgb), named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_row_respects_alignment() {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        assert_eq!(padded_bytes_per_row(1) % align, 0);
        assert_eq!(padded_bytes_per_row(64) % align, 0);
    }

    #[test]
    fn out_of_bounds_pixel_is_none() {
        let oracle = PixelOracle::new(vec![0; 16], 2, 2);
        let palette = Palette::new(vec![]).unwrap();
        assert_eq!(oracle.color_at(5, 5, &palette), (None, None));
    }

    #[test]
    fn outside_color_space_alpha_is_none() {
        let oracle = PixelOracle::new(vec![10, 20, 30, OUTSIDE_COLOR_SPACE], 1, 1);
        let palette = Palette::new(vec![]).unwrap();
        assert_eq!(oracle.color_at(0, 0, &palette), (None, None));
    }

    #[test]
    fn matched_pixel_decodes_rgb_and_name() {
        use crate::palette::NamedColor;
        let oracle = PixelOracle::new(vec![255, 0, 0, 0], 1, 1);
        let palette = Palette::new(vec![NamedColor { name: "red".into(), rgb: RgbColor(1.0, 0.0, 0.0) }]).unwrap();
        let (rgb, named) = oracle.color_at(0, 0, &palette);
        pretty_assertions::assert_eq!(rgb, Some(RgbColor(1.0, 0.0, 0.0)));
        assert_eq!(named.unwrap().name, "red");
    }
}
