//! Text rendered to a coverage mask, with a position that can scroll.

use core::{cell::Cell as PositionCell, convert::Infallible, mem::MaybeUninit, ops::Range};

use embassy_futures::select::{Either, select};
use embassy_sync::{
    blocking_mutex::{Mutex as BlockingMutex, raw::CriticalSectionRawMutex},
    signal::Signal,
};
use embassy_time::{Duration, Timer};
use embedded_graphics::{
    Drawable, Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point},
    image::ImageRaw,
    mono_font::{
        DecorationDimensions, MonoFont, MonoTextStyle,
        ascii::{
            FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X9, FONT_6X10, FONT_6X12, FONT_6X13,
            FONT_6X13_BOLD, FONT_7X13, FONT_7X14, FONT_8X13, FONT_9X15, FONT_9X18, FONT_10X20,
        },
        mapping::StrGlyphMapping,
    },
    pixelcolor::{Rgb888, RgbColor},
    prelude::Size,
    text::{Baseline, Text as GlyphRun},
};
use heapless::String;

use super::{BlitColor, Color, Coverage, HEIGHT, PixelBuffer, Raster, WIDTH, raster::scaled_size};
use crate::{Error, Result};

/// Maximum number of bytes of text content.
pub const TEXT_CAPACITY: usize = 64;

/// Stop token for one [`Text::scroll`] loop. Signal it to end that loop.
pub type ScrollStop = Signal<CriticalSectionRawMutex, ()>;

// ============================================================================
// Fonts
// ============================================================================

// Packed bitmap for the built-in 3x4 font (ASCII 0x20-0x7E).
const FONT_3X4_DATA: [u8; 144] = [
    0x0a, 0xd5, 0x10, 0x4a, 0xa0, 0x01, 0x0a, 0xfe, 0x68, 0x85, 0x70, 0x02, 0x08, 0x74, 0x90, 0x86,
    0xa5, 0xc4, 0x08, 0x5e, 0x68, 0x48, 0x08, 0x10, 0xeb, 0x7b, 0xe7, 0xfd, 0x22, 0x27, 0xb8, 0x9b,
    0x39, 0xb4, 0x05, 0xd1, 0xa9, 0x3e, 0xea, 0x5d, 0x28, 0x0a, 0xff, 0xf3, 0xfc, 0xe4, 0x45, 0xd2,
    0xff, 0x7d, 0xff, 0xbc, 0xd9, 0xff, 0xb7, 0xcb, 0xb4, 0xe8, 0xe9, 0xfd, 0xfe, 0xcb, 0x25, 0xaa,
    0xd9, 0x7d, 0x97, 0x7d, 0xe7, 0xbf, 0xdf, 0x6f, 0xdf, 0x7f, 0x6d, 0xb7, 0xe0, 0xd0, 0xf7, 0xe5,
    0x6d, 0x48, 0xc0, 0x68, 0xdf, 0x35, 0x6f, 0x49, 0x40, 0x40, 0x86, 0xf5, 0xd7, 0xab, 0xe0, 0xc7,
    0x5f, 0x7d, 0xff, 0xbc, 0xd9, 0xff, 0x37, 0xcb, 0xb4, 0xe8, 0xe9, 0xfd, 0x1e, 0xcb, 0x25, 0xaa,
    0xd9, 0x7d, 0x17, 0x7d, 0xe7, 0xbf, 0xdf, 0x6f, 0xdf, 0x7f, 0x6d, 0xb7, 0xb1, 0x80, 0xf7, 0xe5,
    0x6d, 0x48, 0xa0, 0xa8, 0xdf, 0x35, 0x6f, 0x49, 0x20, 0x90, 0x86, 0xf5, 0xd7, 0xab, 0xb1, 0x80,
];
const FONT_3X4_IMAGE_WIDTH: u32 = 48;
const FONT_3X4_GLYPH_MAPPING: StrGlyphMapping<'static> = StrGlyphMapping::new("\0 \u{7e}", 0);

fn font_3x4() -> MonoFont<'static> {
    MonoFont {
        image: ImageRaw::new(&FONT_3X4_DATA, FONT_3X4_IMAGE_WIDTH),
        glyph_mapping: &FONT_3X4_GLYPH_MAPPING,
        character_size: Size::new(3, 4),
        character_spacing: 0,
        baseline: 3,
        underline: DecorationDimensions::new(3, 1),
        strikethrough: DecorationDimensions::new(2, 1),
    }
}

/// Fonts available for [`Text`]. The name gives the glyph cell size in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixFont {
    /// Built-in 3×4 font, four lines of text fit on the panel.
    Font3x4,
    /// 4×6 font.
    Font4x6,
    /// 5×7 font.
    Font5x7,
    /// 5×8 font.
    Font5x8,
    /// 6×9 font.
    Font6x9,
    /// 6×10 font.
    Font6x10,
    /// 6×12 font.
    Font6x12,
    /// 6×13 font.
    Font6x13,
    /// 6×13 bold font.
    Font6x13Bold,
    /// 7×13 font.
    Font7x13,
    /// 7×14 font.
    Font7x14,
    /// 8×13 font.
    Font8x13,
    /// 9×15 font.
    Font9x15,
    /// 9×18 font.
    Font9x18,
    /// 10×20 font.
    Font10x20,
}

impl MatrixFont {
    /// Return the `MonoFont` for this variant.
    #[must_use]
    pub fn to_font(self) -> MonoFont<'static> {
        match self {
            Self::Font3x4 => font_3x4(),
            Self::Font4x6 => FONT_4X6,
            Self::Font5x7 => FONT_5X7,
            Self::Font5x8 => FONT_5X8,
            Self::Font6x9 => FONT_6X9,
            Self::Font6x10 => FONT_6X10,
            Self::Font6x12 => FONT_6X12,
            Self::Font6x13 => FONT_6X13,
            Self::Font6x13Bold => FONT_6X13_BOLD,
            Self::Font7x13 => FONT_7X13,
            Self::Font7x14 => FONT_7X14,
            Self::Font8x13 => FONT_8X13,
            Self::Font9x15 => FONT_9X15,
            Self::Font9x18 => FONT_9X18,
            Self::Font10x20 => FONT_10X20,
        }
    }
}

/// Render `content` at 1× into a raster: opaque white glyph pixels on a transparent background.
///
/// `\n` starts a new line. The raster is sized to the text's bounding box.
///
/// # Errors
///
/// Returns [`Error::RasterTooLarge`] if the rendered text does not fit in `W × H`.
pub fn render_text<const W: usize, const H: usize>(
    content: &str,
    font: MatrixFont,
) -> Result<Raster<W, H>> {
    let font = font.to_font();
    let style = MonoTextStyle::new(&font, Rgb888::WHITE);
    let glyph_run = GlyphRun::with_baseline(content, Point::zero(), style, Baseline::Top);
    let bounds = glyph_run.bounding_box();
    let width = usize::try_from(bounds.size.width).map_err(|_| Error::RasterTooLarge)?;
    let height = usize::try_from(bounds.size.height).map_err(|_| Error::RasterTooLarge)?;
    let mut raster = Raster::new(width, height)?;
    let Ok(_) = glyph_run.draw(&mut raster);
    Ok(raster)
}

// ============================================================================
// Scroll - animator settings
// ============================================================================

/// How far and how often [`Text::scroll`] moves its text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scroll {
    /// Pixels added to `x` each tick; positive moves right.
    pub horizontal: i32,
    /// Pixels added to `y` each tick; positive moves down.
    pub vertical: i32,
    /// Time between ticks.
    pub interval: Duration,
}

impl Scroll {
    /// Move by `(horizontal, vertical)` every `interval`.
    #[must_use]
    pub const fn new(horizontal: i32, vertical: i32, interval: Duration) -> Self {
        Self {
            horizontal,
            vertical,
            interval,
        }
    }

    /// Move left by `step` pixels every `interval`.
    #[must_use]
    pub const fn left(step: i32, interval: Duration) -> Self {
        Self::new(-step, 0, interval)
    }

    /// Move right by `step` pixels every `interval`.
    #[must_use]
    pub const fn right(step: i32, interval: Duration) -> Self {
        Self::new(step, 0, interval)
    }

    /// Move up by `step` pixels every `interval`.
    #[must_use]
    pub const fn up(step: i32, interval: Duration) -> Self {
        Self::new(0, -step, interval)
    }

    /// Move down by `step` pixels every `interval`.
    #[must_use]
    pub const fn down(step: i32, interval: Duration) -> Self {
        Self::new(0, step, interval)
    }

    const fn is_idle(&self) -> bool {
        self.horizontal == 0 && self.vertical == 0
    }
}

// ============================================================================
// Text
// ============================================================================

/// A line (or lines) of text, rendered once, drawn wherever its position says.
///
/// The text is kept as a [`Coverage`] mask: [`print_into`](Self::print_into) lights every
/// covered cell in one flat color. `W × H` is the mask capacity and must hold the text after
/// scaling. The default `192 × 32` capacity takes 6 KiB; give a `Text` that large a `static`
/// home with [`new_in`](Self::new_in).
///
/// The position sits behind a critical-section mutex so one future can
/// [`scroll`](Self::scroll) the text while another prints it.
///
/// ```
/// use hub75_envoy::matrix::{MatrixFont, Text};
///
/// let text: Text = Text::new("Hi", MatrixFont::Font5x8, 1.0, 0, 0)?;
/// text.center(true, true);
/// assert_eq!(text.position().x, (64 - text.coverage().width() as i32) / 2);
/// # Ok::<(), hub75_envoy::Error>(())
/// ```
pub struct Text<const W: usize = 192, const H: usize = 32> {
    content: String<TEXT_CAPACITY>,
    coverage: Coverage<W, H>,
    scale: f32,
    position: BlockingMutex<CriticalSectionRawMutex, PositionCell<Point>>,
}

impl<const W: usize, const H: usize> Text<W, H> {
    /// Render `content` in `font` at `(x, y)`.
    ///
    /// A `scale` of 1 or more enlarges by its whole part (2.7 draws at 2×); a `scale` below 1
    /// shrinks with nearest-neighbour sampling. A zero, negative or NaN `scale` renders nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooLong`] if `content` exceeds [`TEXT_CAPACITY`] bytes and
    /// [`Error::RasterTooLarge`] if the rendered text does not fit in `W × H`.
    pub fn new(content: &str, font: MatrixFont, scale: f32, x: i32, y: i32) -> Result<Self> {
        let mut text = Self::empty();
        text.render(content, font, scale)?;
        text.set_position(x, y);
        Ok(text)
    }

    /// Like [`new`](Self::new), but render straight into `slot` so the mask is never copied.
    ///
    /// ```
    /// use core::mem::MaybeUninit;
    /// use hub75_envoy::matrix::{MatrixFont, Text};
    ///
    /// let mut slot = MaybeUninit::<Text>::uninit();
    /// let text = Text::new_in(&mut slot, "Hi", MatrixFont::Font5x8, 1.0, 3, 4)?;
    /// assert_eq!(text.content(), "Hi");
    /// # Ok::<(), hub75_envoy::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`new`](Self::new). On error `slot` holds an empty text.
    pub fn new_in<'a>(
        slot: &'a mut MaybeUninit<Self>,
        content: &str,
        font: MatrixFont,
        scale: f32,
        x: i32,
        y: i32,
    ) -> Result<&'a mut Self> {
        let text = slot.write(Self::empty());
        text.render(content, font, scale)?;
        text.set_position(x, y);
        Ok(text)
    }

    const fn empty() -> Self {
        Self {
            content: String::new(),
            coverage: Coverage::new(),
            scale: 1.0,
            position: BlockingMutex::new(PositionCell::new(Point::zero())),
        }
    }

    fn render(&mut self, content: &str, font: MatrixFont, scale: f32) -> Result<()> {
        self.content.clear();
        self.content
            .push_str(content)
            .map_err(|()| Error::TextTooLong)?;

        let font = font.to_font();
        let style = MonoTextStyle::new(&font, Rgb888::WHITE);
        let glyph_run = GlyphRun::with_baseline(content, Point::zero(), style, Baseline::Top);
        let source = glyph_run.bounding_box().size;
        let source_width = usize::try_from(source.width).map_err(|_| Error::RasterTooLarge)?;
        let source_height = usize::try_from(source.height).map_err(|_| Error::RasterTooLarge)?;
        let (width, height) = scaled_size(source_width, source_height, glyph_scale(scale));
        self.coverage.reset(width, height)?;

        let mut target = ScaledGlyphs {
            coverage: &mut self.coverage,
            source,
            source_width,
            source_height,
        };
        let Ok(_) = glyph_run.draw(&mut target);
        self.scale = scale;
        debug!(
            "Text::new: {} bytes rendered to {}x{}",
            content.len(),
            width,
            height
        );
        Ok(())
    }

    /// The text this was rendered from.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The rendered coverage mask.
    #[must_use]
    pub const fn coverage(&self) -> &Coverage<W, H> {
        &self.coverage
    }

    /// The scale requested at construction.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Current top-left position in panel coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position.lock(PositionCell::get)
    }

    /// Move the top-left corner to `(x, y)`.
    pub fn set_position(&self, x: i32, y: i32) {
        self.position.lock(|position| position.set(Point::new(x, y)));
    }

    /// Center the text horizontally, vertically, or both; a one-shot assignment.
    ///
    /// Uses `(64 - width) / 2` and `(32 - height) / 2` with integer division.
    pub fn center(&self, x: bool, y: bool) {
        let centered_x = centered(WIDTH, self.coverage.width());
        let centered_y = centered(HEIGHT, self.coverage.height());
        self.position.lock(|position| {
            let mut next = position.get();
            if x {
                next.x = centered_x;
            }
            if y {
                next.y = centered_y;
            }
            position.set(next);
        });
    }

    /// Advance one scroll tick and return the new position.
    ///
    /// Text that runs off the right edge (`x > 64`) re-enters fully off-screen at
    /// `x = -width`; text that runs off the left edge (`x < -width`) re-enters at
    /// `x = 64 + width`. The vertical axis wraps the same way against height 32.
    pub fn step(&self, horizontal: i32, vertical: i32) -> Point {
        let width = to_i32(self.coverage.width());
        let height = to_i32(self.coverage.height());
        self.position.lock(|position| {
            let current = position.get();
            let next = Point::new(
                wrap_axis(current.x, horizontal, width, to_i32(WIDTH)),
                wrap_axis(current.y, vertical, height, to_i32(HEIGHT)),
            );
            position.set(next);
            next
        })
    }

    /// Scroll until `stop` is signaled: one [`step`](Self::step) every `scroll.interval`.
    ///
    /// Idle scrolls (both steps zero) never move and just wait for `stop`. Each scrolling text
    /// has its own loop and its own stop token, and it runs independently of the scan task.
    pub async fn scroll(&self, scroll: Scroll, stop: &ScrollStop) {
        info!(
            "Text::scroll: started ({}, {}) every {} ms",
            scroll.horizontal,
            scroll.vertical,
            scroll.interval.as_millis()
        );
        if scroll.is_idle() {
            stop.wait().await;
        } else {
            loop {
                match select(stop.wait(), Timer::after(scroll.interval)).await {
                    Either::First(()) => break,
                    Either::Second(()) => {
                        let position = self.step(scroll.horizontal, scroll.vertical);
                        trace!("Text::scroll: now at ({}, {})", position.x, position.y);
                    }
                }
            }
        }
        info!("Text::scroll: stopped");
    }

    /// Composite the text into `pixels` at its current position in a flat `color`.
    ///
    /// Only covered cells are merged; uncovered parts of the mask leave cells untouched.
    pub fn print_into(&self, pixels: &mut PixelBuffer, color: Color) {
        let position = self.position();
        pixels.blit(&self.coverage, position.x, position.y, BlitColor::Flat(color));
    }
}

/// Whole-number upscale or fractional downscale, as glyphs are drawn.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "scale factors are small positive numbers"
)]
fn glyph_scale(scale: f32) -> f32 {
    if scale >= 1.0 {
        (scale as u32) as f32
    } else {
        scale
    }
}

/// Glyph pixels drawn at 1× land on every mask cell that samples them at the mask's scale.
struct ScaledGlyphs<'a, const W: usize, const H: usize> {
    coverage: &'a mut Coverage<W, H>,
    source: Size,
    source_width: usize,
    source_height: usize,
}

impl<const W: usize, const H: usize> OriginDimensions for ScaledGlyphs<'_, W, H> {
    fn size(&self) -> Size {
        self.source
    }
}

impl<const W: usize, const H: usize> DrawTarget for ScaledGlyphs<'_, W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, _) in pixels {
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y))
            else {
                continue;
            };
            if x_index >= self.source_width || y_index >= self.source_height {
                continue;
            }
            let columns = scaled_span(x_index, self.source_width, self.coverage.width());
            for row in scaled_span(y_index, self.source_height, self.coverage.height()) {
                for column in columns.clone() {
                    self.coverage.cover(column, row);
                }
            }
        }
        Ok(())
    }
}

/// Target cells whose nearest-neighbour source index is `index`.
///
/// Target cell `t` samples source `t * source_length / target_length`, so source `index` owns
/// `[ceil(index * target / source), ceil((index + 1) * target / source))`.
fn scaled_span(index: usize, source_length: usize, target_length: usize) -> Range<usize> {
    let start = (index * target_length).div_ceil(source_length);
    let end = ((index + 1) * target_length).div_ceil(source_length);
    start..end
}

fn wrap_axis(position: i32, delta: i32, length: i32, extent: i32) -> i32 {
    let next = position.saturating_add(delta);
    if delta > 0 && next > extent {
        -length
    } else if delta < 0 && next < -length {
        extent.saturating_add(length)
    } else {
        next
    }
}

fn centered(extent: usize, length: usize) -> i32 {
    to_i32(extent).saturating_sub(to_i32(length)) / 2
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
