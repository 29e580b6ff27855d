#![cfg(feature = "host")]
#![allow(missing_docs, reason = "integration tests")]
//! Host-level tests for text rendering, centering and scrolling.

use std::{mem::MaybeUninit, thread};

use embassy_futures::{block_on, join::join};
use embassy_time::{Duration, Timer};
use embedded_graphics::geometry::Point;
use hub75_envoy::{
    Error,
    matrix::{
        Color, Matrix, MatrixFont, MatrixStatic, PixelBuffer, Raster, Scroll, ScrollStop, Text,
        render_text,
    },
};

fn text_8_wide(x: i32, y: i32) -> Text {
    let text: Text = Text::new("ab", MatrixFont::Font4x6, 1.0, x, y).expect("text fits");
    assert_eq!(text.coverage().width(), 8);
    assert_eq!(text.coverage().height(), 6);
    text
}

#[test]
fn rightward_scroll_wraps_to_minus_width() {
    let text = text_8_wide(60, 0);
    assert_eq!(text.step(5, 0), Point::new(-8, 0));
}

#[test]
fn rightward_scroll_at_the_edge_does_not_wrap_yet() {
    let text = text_8_wide(59, 0);
    assert_eq!(text.step(5, 0), Point::new(64, 0));
}

#[test]
fn leftward_scroll_wraps_past_the_right_edge() {
    let text = text_8_wide(-8, 3);
    assert_eq!(text.step(-1, 0), Point::new(72, 3));
}

#[test]
fn vertical_scroll_wraps_against_height() {
    let text = text_8_wide(4, 30);
    assert_eq!(text.step(0, 3), Point::new(4, -6));

    text.set_position(4, -5);
    assert_eq!(text.step(0, -1), Point::new(4, -6));
    assert_eq!(text.step(0, -1), Point::new(4, 38));
}

#[test]
fn idle_step_never_moves() {
    let text = text_8_wide(100, -100);
    assert_eq!(text.step(0, 0), Point::new(100, -100));
}

#[test]
fn center_uses_integer_division() {
    let text: Text = Text::new("ab", MatrixFont::Font10x20, 0.5, 0, 0).expect("text fits");
    assert_eq!(text.coverage().width(), 10);
    assert_eq!(text.coverage().height(), 10);

    text.center(true, false);
    assert_eq!(text.position(), Point::new(27, 0));
    text.center(false, true);
    assert_eq!(text.position(), Point::new(27, 11));
}

#[test]
fn scale_above_one_uses_its_whole_part() {
    let text: Text = Text::new("ab", MatrixFont::Font4x6, 2.7, 0, 0).expect("text fits");
    assert_eq!(text.coverage().width(), 16);
    assert_eq!(text.coverage().height(), 12);
    assert!((text.scale() - 2.7).abs() < f32::EPSILON);
}

#[test]
fn scaled_text_matches_nearest_neighbour_of_the_unscaled_render() {
    let unscaled: Raster<192, 32> = render_text("Hi!", MatrixFont::Font5x8).expect("text fits");
    for scale in [0.5, 0.7, 1.0, 2.0, 3.0] {
        let expected: Raster<192, 32> = unscaled.scaled(scale).expect("scaled text fits");
        let text: Text = Text::new("Hi!", MatrixFont::Font5x8, scale, 0, 0).expect("text fits");
        let coverage = text.coverage();
        assert_eq!(coverage.width(), expected.width(), "width at {scale}");
        assert_eq!(coverage.height(), expected.height(), "height at {scale}");
        for y in 0..expected.height() {
            for x in 0..expected.width() {
                assert_eq!(
                    coverage.is_covered(x, y),
                    expected.sample(x, y).a > 0,
                    "cell ({x}, {y}) at {scale}"
                );
            }
        }
    }
}

#[test]
fn non_positive_or_nan_scale_renders_nothing() {
    for scale in [0.0, -1.5, f32::NAN] {
        let text: Text =
            Text::new("ab", MatrixFont::Font4x6, scale, 3, 3).expect("empty text fits");
        assert_eq!(text.coverage().width(), 0);
        assert_eq!(text.coverage().height(), 0);

        let mut pixels = PixelBuffer::new();
        text.print_into(&mut pixels, Color::RED);
        assert_eq!(pixels, PixelBuffer::new());
    }
}

#[test]
fn default_text_builds_on_a_small_stack() {
    let builder = thread::Builder::new().stack_size(64 * 1024);
    let handle = builder
        .spawn(|| {
            let text: Text = Text::new("Hello", MatrixFont::Font6x10, 1.0, 0, 0)?;
            Ok::<_, Error>(text.coverage().width())
        })
        .expect("thread spawns");
    let width = handle.join().expect("no stack overflow").expect("text fits");
    assert_eq!(width, 30);
}

#[test]
fn new_in_renders_into_the_given_slot() {
    let slot: &'static mut MaybeUninit<Text> = Box::leak(Box::new(MaybeUninit::uninit()));
    let text = Text::new_in(slot, "ab", MatrixFont::Font4x6, 2.0, 5, 6).expect("text fits");
    assert_eq!(text.content(), "ab");
    assert_eq!(text.coverage().width(), 16);
    assert_eq!(text.position(), Point::new(5, 6));

    let mut other = MaybeUninit::<Text<8, 8>>::uninit();
    let result = Text::new_in(&mut other, "hello", MatrixFont::Font5x8, 1.0, 0, 0);
    assert!(matches!(result, Err(Error::RasterTooLarge)));
}

#[test]
fn too_long_text_is_rejected() {
    let content = "x".repeat(65);
    let result: Result<Text, _> = Text::new(&content, MatrixFont::Font3x4, 1.0, 0, 0);
    assert!(matches!(result, Err(Error::TextTooLong)));
}

#[test]
fn text_larger_than_its_capacity_is_rejected() {
    let result: Result<Text<8, 8>, _> = Text::new("hello", MatrixFont::Font5x8, 1.0, 0, 0);
    assert!(matches!(result, Err(Error::RasterTooLarge)));
}

#[test]
fn text_prints_in_one_flat_color() {
    let text: Text = Text::new("H", MatrixFont::Font5x8, 1.0, 2, 1).expect("text fits");
    assert_eq!(text.content(), "H");
    let mut pixels = PixelBuffer::new();
    text.print_into(&mut pixels, Color::MAGENTA);

    let lit: Vec<_> = pixels.rows().iter().flatten().flatten().collect();
    assert!(!lit.is_empty());
    assert!(lit.iter().all(|color| **color == Color::MAGENTA));
    // Glyph cells outside the 5x8 box at (2, 1) stay unset.
    assert_eq!(pixels[(1, 1)], None);
    assert_eq!(pixels[(7, 1)], None);
}

#[test]
fn every_font_renders() {
    for font in [
        MatrixFont::Font3x4,
        MatrixFont::Font4x6,
        MatrixFont::Font5x7,
        MatrixFont::Font5x8,
        MatrixFont::Font6x9,
        MatrixFont::Font6x10,
        MatrixFont::Font6x12,
        MatrixFont::Font6x13,
        MatrixFont::Font6x13Bold,
        MatrixFont::Font7x13,
        MatrixFont::Font7x14,
        MatrixFont::Font8x13,
        MatrixFont::Font9x15,
        MatrixFont::Font9x18,
        MatrixFont::Font10x20,
    ] {
        let glyph_size = font.to_font().character_size;
        let text: Text = Text::new("A", font, 1.0, 0, 0).expect("one glyph fits");
        assert_eq!(text.coverage().width(), glyph_size.width as usize);
        assert_eq!(text.coverage().height(), glyph_size.height as usize);
    }
}

#[test]
fn scroll_with_stop_already_signaled_returns_without_moving() {
    let text = text_8_wide(10, 10);
    let stop = ScrollStop::new();
    stop.signal(());
    block_on(text.scroll(Scroll::left(1, Duration::from_millis(5)), &stop));
    assert_eq!(text.position(), Point::new(10, 10));
}

#[test]
fn idle_scroll_waits_for_stop() {
    let text = text_8_wide(10, 10);
    let stop = ScrollStop::new();
    block_on(join(
        text.scroll(Scroll::new(0, 0, Duration::from_millis(1)), &stop),
        async {
            Timer::after(Duration::from_millis(20)).await;
            stop.signal(());
        },
    ));
    assert_eq!(text.position(), Point::new(10, 10));
}

#[test]
fn scroll_moves_on_each_tick_until_stopped() {
    let text = text_8_wide(0, 0);
    let stop = ScrollStop::new();
    block_on(join(
        text.scroll(Scroll::right(2, Duration::from_millis(5)), &stop),
        async {
            Timer::after(Duration::from_millis(60)).await;
            stop.signal(());
        },
    ));
    let position = text.position();
    assert!(position.x > 0, "text must have moved");
    assert!(position.x <= 64, "too few ticks to wrap");
    assert_eq!(position.x % 2, 0);
    assert_eq!(position.y, 0);
}

#[test]
fn two_texts_scroll_independently() {
    let left = text_8_wide(30, 0);
    let down = text_8_wide(0, 0);
    let left_stop = ScrollStop::new();
    let down_stop = ScrollStop::new();
    block_on(join(
        join(
            left.scroll(Scroll::left(1, Duration::from_millis(5)), &left_stop),
            down.scroll(Scroll::down(1, Duration::from_millis(5)), &down_stop),
        ),
        async {
            Timer::after(Duration::from_millis(30)).await;
            left_stop.signal(());
            Timer::after(Duration::from_millis(30)).await;
            down_stop.signal(());
        },
    ));
    assert!(left.position().x < 30);
    assert_eq!(left.position().y, 0);
    assert!(down.position().y > 0);
    assert_eq!(down.position().x, 0);
}

#[test]
fn matrix_prints_text_and_reports_bounds_errors() {
    let matrix_static: &'static MatrixStatic = Box::leak(Box::new(MatrixStatic::new_static()));
    let matrix = Matrix::from_static(matrix_static);
    let text: Text = Text::new("Hi", MatrixFont::Font5x8, 1.0, 0, 0).expect("text fits");
    text.center(true, true);

    block_on(async {
        matrix.fill(Color::BLUE).await;
        matrix.clear().await;
        matrix.print_text(&text, Color::GREEN).await;
        assert!(matches!(
            matrix.draw_rectangle(60, 30, 8, 8, Color::RED).await,
            Err(Error::IndexOutOfBounds)
        ));
    });

    let pixels = block_on(matrix.snapshot());
    let lit = pixels.rows().iter().flatten().flatten().count();
    assert!(lit > 0);
    assert_eq!(pixels[(0, 0)], None);
}
