//! Fixed-capacity RGBA rasters used as the source of text and picture blits.

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::Rgb888,
    Pixel,
};

use super::Color;
use crate::{Error, Result};

/// A 2-D grid of RGBA samples with a logical size up to `W × H`.
///
/// Capacity is fixed at compile time so rasters can live in `static` memory on the Pico.
/// Only the logical `width × height` region is meaningful; everything outside it reads as
/// [`Color::TRANSPARENT`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster<const W: usize, const H: usize> {
    samples: [[Color; W]; H],
    width: usize,
    height: usize,
}

impl<const W: usize, const H: usize> Raster<W, H> {
    /// Capacity in columns.
    pub const MAX_WIDTH: usize = W;
    /// Capacity in rows.
    pub const MAX_HEIGHT: usize = H;

    /// Create a fully transparent raster of the given logical size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterTooLarge`] if the size exceeds the `W × H` capacity.
    pub const fn new(width: usize, height: usize) -> Result<Self> {
        if width > W || height > H {
            return Err(Error::RasterTooLarge);
        }
        Ok(Self {
            samples: [[Color::TRANSPARENT; W]; H],
            width,
            height,
        })
    }

    /// Logical width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Logical height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Read the sample at `(x, y)`; positions outside the logical size are transparent.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.samples[y][x]
        } else {
            Color::TRANSPARENT
        }
    }

    /// Write the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the logical size.
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        assert!(x < self.width, "x must be within raster width");
        assert!(y < self.height, "y must be within raster height");
        self.samples[y][x] = color;
    }

    /// Build a raster of `width × height` by nearest-neighbour sampling a
    /// `source_width × source_height` source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterTooLarge`] if `width × height` exceeds the capacity.
    pub fn resample(
        width: usize,
        height: usize,
        source_width: usize,
        source_height: usize,
        mut sample: impl FnMut(usize, usize) -> Color,
    ) -> Result<Self> {
        let mut raster = Self::new(width, height)?;
        for y_index in 0..height {
            let source_y = y_index * source_height / height;
            for x_index in 0..width {
                let source_x = x_index * source_width / width;
                raster.samples[y_index][x_index] = sample(source_x, source_y);
            }
        }
        Ok(raster)
    }

    /// Nearest-neighbour resize into a raster of (possibly) different capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterTooLarge`] if the new size exceeds the target capacity.
    pub fn resize_nearest<const W2: usize, const H2: usize>(
        &self,
        width: usize,
        height: usize,
    ) -> Result<Raster<W2, H2>> {
        Raster::resample(width, height, self.width, self.height, |x, y| {
            self.sample(x, y)
        })
    }

    /// Scale by `scale` with nearest-neighbour sampling; `1.0` copies.
    ///
    /// A zero, negative or NaN `scale` gives an empty raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterTooLarge`] if the scaled size exceeds the target capacity.
    pub fn scaled<const W2: usize, const H2: usize>(&self, scale: f32) -> Result<Raster<W2, H2>> {
        let (width, height) = scaled_size(self.width, self.height, scale);
        self.resize_nearest(width, height)
    }
}

/// Size of a `width × height` image after scaling, truncating toward zero.
///
/// A zero, negative or NaN `scale` gives `(0, 0)`: an empty image, never a panic.
#[must_use]
pub(crate) fn scaled_size(width: usize, height: usize, scale: f32) -> (usize, usize) {
    if scale.is_nan() || scale <= 0.0 {
        return (0, 0);
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "panel-sized images; truncation matches nearest-neighbour sizing"
    )]
    let scale_dimension = |dimension: usize| (dimension as f32 * scale) as usize;
    (scale_dimension(width), scale_dimension(height))
}

/// A sized grid of samples that [`PixelBuffer::blit`](super::PixelBuffer::blit) can composite.
pub trait Samples {
    /// Logical width in pixels.
    fn width(&self) -> usize;
    /// Logical height in pixels.
    fn height(&self) -> usize;
    /// The sample at `(x, y)`; transparent outside the logical size.
    fn sample(&self, x: usize, y: usize) -> Color;
}

impl<const W: usize, const H: usize> Samples for Raster<W, H> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, x: usize, y: usize) -> Color {
        Self::sample(self, x, y)
    }
}

impl<const W: usize, const H: usize> OriginDimensions for Raster<W, H> {
    #[expect(clippy::cast_possible_truncation, reason = "capacity is panel-sized")]
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

/// Drawing into a raster stores opaque samples; anything outside the logical size is clipped.
impl<const W: usize, const H: usize> DrawTarget for Raster<W, H> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y))
            else {
                continue;
            };
            if x_index < self.width && y_index < self.height {
                self.samples[y_index][x_index] = Color::from(color);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Coverage - one byte per cell, for text
// ============================================================================

/// A coverage mask with a logical size up to `W × H`: each cell is either covered or not.
///
/// Text only needs to know *where* to draw, so it keeps a mask instead of a full RGBA
/// [`Raster`], at a quarter of the memory. As a [`Samples`] source a covered cell reads as
/// opaque white and everything else as [`Color::TRANSPARENT`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Coverage<const W: usize, const H: usize> {
    cells: [[bool; W]; H],
    width: usize,
    height: usize,
}

impl<const W: usize, const H: usize> Coverage<W, H> {
    /// An empty `0 × 0` mask.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[false; W]; H],
            width: 0,
            height: 0,
        }
    }

    /// Logical width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Logical height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether `(x, y)` is covered; positions outside the logical size never are.
    #[must_use]
    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y][x]
    }

    /// Uncover every cell and set a new logical size, in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RasterTooLarge`] (leaving the mask unchanged) if the size exceeds the
    /// `W × H` capacity.
    pub fn reset(&mut self, width: usize, height: usize) -> Result<()> {
        if width > W || height > H {
            return Err(Error::RasterTooLarge);
        }
        for row in &mut self.cells {
            row.fill(false);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Cover `(x, y)`; positions outside the logical size are ignored.
    pub fn cover(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y][x] = true;
        }
    }
}

impl<const W: usize, const H: usize> Default for Coverage<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Samples for Coverage<W, H> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn sample(&self, x: usize, y: usize) -> Color {
        if self.is_covered(x, y) {
            Color::WHITE
        } else {
            Color::TRANSPARENT
        }
    }
}
