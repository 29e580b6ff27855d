#![cfg(feature = "host")]
#![allow(missing_docs, reason = "integration tests")]
//! Host-level tests for buffer mutations: fill, rectangles, blits and embedded-graphics drawing.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use hub75_envoy::{
    Error,
    matrix::{BlitColor, Color, Picture, PixelBuffer, Raster},
};

fn lit_cells(pixels: &PixelBuffer) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for (y_index, row) in pixels.rows().iter().enumerate() {
        for (x_index, cell) in row.iter().enumerate() {
            if cell.is_some() {
                cells.push((x_index, y_index));
            }
        }
    }
    cells
}

fn solid_raster(width: usize, height: usize, color: Color) -> Raster<16, 16> {
    Raster::resample(width, height, 1, 1, |_, _| color).expect("raster fits")
}

#[test]
fn fill_merges_every_cell() {
    let mut pixels = PixelBuffer::new();
    pixels.fill(Color::BLUE);
    assert!(pixels.rows().iter().flatten().all(|cell| *cell == Some(Color::BLUE)));

    pixels.fill(Color::new(1, 0, 0, 0));
    assert!(
        pixels
            .rows()
            .iter()
            .flatten()
            .all(|cell| *cell == Some(Color::new(1, 0, 1, 255)))
    );
}

#[test]
fn clear_unsets_every_cell() {
    let mut pixels = PixelBuffer::new();
    pixels.fill(Color::WHITE);
    pixels.clear();
    assert_eq!(pixels, PixelBuffer::new());
}

#[test]
fn rectangle_is_half_open() {
    let mut pixels = PixelBuffer::new();
    pixels
        .draw_rectangle(10, 4, 3, 2, Color::RED)
        .expect("rectangle is on the panel");
    let lit = lit_cells(&pixels);
    assert_eq!(lit.len(), 6);
    assert!(lit.contains(&(10, 4)));
    assert!(lit.contains(&(12, 5)));
    assert!(!lit.contains(&(13, 4)));
    assert!(!lit.contains(&(10, 6)));
}

#[test]
fn rectangle_reaching_the_far_corner_fits() {
    let mut pixels = PixelBuffer::new();
    pixels
        .draw_rectangle(0, 0, 64, 32, Color::GREEN)
        .expect("whole panel is in bounds");
    assert_eq!(pixels[(63, 31)], Some(Color::GREEN));
}

#[test]
fn rectangle_out_of_bounds_changes_nothing() {
    let mut pixels = PixelBuffer::new();
    assert!(matches!(
        pixels.draw_rectangle(60, 0, 5, 1, Color::RED),
        Err(Error::IndexOutOfBounds)
    ));
    assert!(matches!(
        pixels.draw_rectangle(-1, 0, 2, 2, Color::RED),
        Err(Error::IndexOutOfBounds)
    ));
    assert!(matches!(
        pixels.draw_rectangle(0, 31, 1, 2, Color::RED),
        Err(Error::IndexOutOfBounds)
    ));
    assert_eq!(pixels, PixelBuffer::new());
}

#[test]
fn empty_rectangle_draws_nothing() {
    let mut pixels = PixelBuffer::new();
    pixels
        .draw_rectangle(5, 5, 0, 4, Color::RED)
        .expect("empty rectangle is accepted");
    pixels
        .draw_rectangle(5, 5, 4, -2, Color::RED)
        .expect("negative size is accepted");
    assert_eq!(pixels, PixelBuffer::new());
}

#[test]
fn blit_with_negative_offset_clips_top_left() {
    let mut pixels = PixelBuffer::new();
    let raster = solid_raster(10, 10, Color::RED);
    pixels.blit(&raster, -5, -5, BlitColor::Raster);

    let lit = lit_cells(&pixels);
    assert_eq!(lit.len(), 25);
    assert!(lit.iter().all(|(x, y)| *x < 5 && *y < 5));
}

#[test]
fn blit_entirely_off_panel_is_a_no_op() {
    let mut pixels = PixelBuffer::new();
    let raster = solid_raster(10, 10, Color::RED);
    for (x, y) in [(64, 0), (0, 32), (-10, 0), (0, -10), (1_000, -1_000)] {
        pixels.blit(&raster, x, y, BlitColor::Raster);
    }
    assert_eq!(pixels, PixelBuffer::new());
}

#[test]
fn blit_clips_bottom_right() {
    let mut pixels = PixelBuffer::new();
    let raster = solid_raster(10, 10, Color::GREEN);
    pixels.blit(&raster, 60, 28, BlitColor::Raster);
    assert_eq!(lit_cells(&pixels).len(), 16);
    assert_eq!(pixels[(63, 31)], Some(Color::GREEN));
}

#[test]
fn blit_skips_zero_alpha_samples() {
    let mut pixels = PixelBuffer::new();
    pixels.fill(Color::BLUE);
    let mut raster: Raster<4, 4> = Raster::new(2, 1).expect("raster fits");
    raster.set(0, 0, Color::new(1, 0, 0, 0));
    raster.set(1, 0, Color::RED);
    pixels.blit(&raster, 0, 0, BlitColor::Raster);

    // A zero-alpha sample is skipped, not OR-merged.
    assert_eq!(pixels[(0, 0)], Some(Color::BLUE));
    assert_eq!(pixels[(1, 0)], Some(Color::RED));
}

#[test]
fn flat_blit_uses_raster_only_as_coverage() {
    let mut pixels = PixelBuffer::new();
    let raster = solid_raster(3, 2, Color::RED);
    pixels.blit(&raster, 1, 1, BlitColor::Flat(Color::YELLOW));
    assert_eq!(pixels[(1, 1)], Some(Color::YELLOW));
    assert_eq!(pixels[(3, 2)], Some(Color::YELLOW));
    assert_eq!(pixels[(4, 2)], None);
}

#[test]
fn picture_scales_before_blitting() {
    let mut source: Raster<2, 2> = Raster::new(2, 2).expect("raster fits");
    source.set(1, 1, Color::MAGENTA);
    let picture: Picture<8, 8> = Picture::new(&source, 3.0, 0, 0).expect("picture fits");
    assert_eq!(picture.raster().width(), 6);

    let mut pixels = PixelBuffer::new();
    picture.print_into(&mut pixels);
    let lit = lit_cells(&pixels);
    assert_eq!(lit.len(), 9);
    assert!(lit.iter().all(|(x, y)| (3..6).contains(x) && (3..6).contains(y)));
}

#[test]
fn picture_with_non_positive_or_nan_scale_is_empty() {
    let source = solid_raster(4, 4, Color::RED);
    for scale in [0.0, -2.0, f32::NAN] {
        let picture: Picture<8, 8> = Picture::new(&source, scale, 1, 1).expect("empty fits");
        assert_eq!(picture.raster().width(), 0);
        assert_eq!(picture.raster().height(), 0);

        let mut pixels = PixelBuffer::new();
        picture.print_into(&mut pixels);
        assert_eq!(pixels, PixelBuffer::new());
    }
}

#[test]
fn picture_too_large_for_capacity_is_rejected() {
    let source: Raster<4, 4> = Raster::new(4, 4).expect("raster fits");
    let result: Result<Picture<8, 8>, _> = Picture::new(&source, 4.0, 0, 0);
    assert!(matches!(result, Err(Error::RasterTooLarge)));
}

#[test]
fn draw_target_merges_and_clips() -> Result<(), core::convert::Infallible> {
    let mut pixels = PixelBuffer::new();
    Rectangle::new(PixelBuffer::TOP_LEFT, PixelBuffer::SIZE)
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
        .draw(&mut pixels)?;
    Line::new(Point::new(-5, 16), Point::new(70, 16))
        .into_styled(PrimitiveStyle::with_stroke(Rgb888::GREEN, 1))
        .draw(&mut pixels)?;

    assert_eq!(pixels[(0, 0)], Some(Color::new(255, 0, 0, 255)));
    assert_eq!(pixels[(63, 31)], Some(Color::new(255, 0, 0, 255)));
    assert_eq!(pixels[(30, 16)], Some(Color::new(0, 255, 0, 255)));
    assert_eq!(pixels[(30, 15)], None);
    Ok(())
}

#[test]
fn checked_cell_read_reports_out_of_bounds() {
    let pixels = PixelBuffer::new();
    assert_eq!(pixels.cell(63, 31).expect("corner is in bounds"), None);
    assert!(matches!(pixels.cell(64, 0), Err(Error::IndexOutOfBounds)));
}

#[test]
#[should_panic(expected = "x_index must be within width")]
fn raw_index_past_the_edge_panics() {
    let pixels = PixelBuffer::new();
    let _cell = pixels[(64, 0)];
}
