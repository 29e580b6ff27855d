//! Host-side PNG previews of a [`PixelBuffer`], drawn as round LEDs.
#![cfg(feature = "host")]

use std::{error::Error, fs::File, io::BufWriter, path::Path};

use png::{BitDepth, ColorType, Encoder};

use crate::matrix::{Cell, PixelBuffer};

/// Level of an unlit LED so the grid stays visible in previews.
const UNLIT_LEVEL: u8 = 24;

/// Render `pixels` as a PNG of at most `max_dimension` pixels on its longer side.
///
/// Each cell becomes one round LED: a lit channel shows at full brightness, an unset cell or
/// dark channel as a dim dot.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn write_pixels_png(
    pixels: &PixelBuffer,
    output_path: impl AsRef<Path>,
    max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let cell_size = cell_size_for(max_dimension);
    let (width, height, bytes) = render_leds(pixels, cell_size);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bytes)?;
    writer.finish()?;
    info!("to_png: wrote {}x{} preview to {}", width, height, output_path.display());
    Ok(())
}

#[expect(clippy::cast_possible_truncation, reason = "panel dimensions are tiny")]
fn cell_size_for(max_dimension: u32) -> u32 {
    let longer_side = PixelBuffer::WIDTH.max(PixelBuffer::HEIGHT) as u32;
    (max_dimension / longer_side).max(2)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "preview images are far below i32::MAX"
)]
fn render_leds(pixels: &PixelBuffer, cell_size: u32) -> (u32, u32, Vec<u8>) {
    let width = PixelBuffer::WIDTH as u32 * cell_size;
    let height = PixelBuffer::HEIGHT as u32 * cell_size;
    let mut bytes = vec![0u8; (width * height * 3) as usize];

    // Twice the coordinates so the LED center can sit between pixels.
    let diameter = cell_size as i32;
    let radius_sq = (diameter - 1) * (diameter - 1);

    for (row_index, row) in pixels.rows().iter().enumerate() {
        for (column_index, cell) in row.iter().enumerate() {
            let rgb = led_rgb(*cell);
            for local_y in 0..cell_size {
                let delta_y = 2 * local_y as i32 - (diameter - 1);
                for local_x in 0..cell_size {
                    let delta_x = 2 * local_x as i32 - (diameter - 1);
                    if delta_x * delta_x + delta_y * delta_y > radius_sq {
                        continue;
                    }
                    let x = column_index as u32 * cell_size + local_x;
                    let y = row_index as u32 * cell_size + local_y;
                    let start = ((y * width + x) * 3) as usize;
                    bytes[start..start + 3].copy_from_slice(&rgb);
                }
            }
        }
    }
    (width, height, bytes)
}

fn led_rgb(cell: Cell) -> [u8; 3] {
    let (red, green, blue) = cell.map_or((false, false, false), |color| color.channels_on());
    let level = |on: bool| if on { u8::MAX } else { UNLIT_LEVEL };
    [level(red), level(green), level(blue)]
}
