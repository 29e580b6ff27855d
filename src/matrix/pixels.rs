//! The 64×32 pixel buffer shared by the scan task and the compositor.

use core::{
    convert::Infallible,
    ops::{Index, IndexMut},
};

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb888,
    Pixel,
};

use super::{Color, HEIGHT, ROW_PAIRS, Samples, WIDTH};
use crate::{Error, Result};

/// One buffer cell: `None` until something is drawn there.
pub type Cell = Option<Color>;

/// How [`PixelBuffer::blit`] picks the color it merges for each covered cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlitColor {
    /// Merge the raster's own sample (pictures).
    Raster,
    /// Merge one flat color wherever the raster has coverage (text).
    Flat(Color),
}

/// A 64×32 grid of optional colors: the one piece of state the scan task reads.
///
/// Every mutation goes through [`Color::merge`]. Cells are indexed with `(x, y)` tuples where
/// `(0, 0)` is the top-left; indexing outside the panel panics instead of clamping.
///
/// `PixelBuffer` is also an [`embedded-graphics`](https://docs.rs/embedded-graphics)
/// [`DrawTarget`]: drawn pixels are merged as opaque colors and off-panel pixels are clipped.
///
/// ```
/// use hub75_envoy::matrix::{Color, PixelBuffer};
///
/// let mut pixels = PixelBuffer::new();
/// pixels.draw_rectangle(2, 1, 3, 2, Color::GREEN)?;
/// assert_eq!(pixels[(2, 1)], Some(Color::GREEN));
/// assert_eq!(pixels[(5, 1)], None);
/// # Ok::<(), hub75_envoy::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PixelBuffer([[Cell; WIDTH]; HEIGHT]);

impl PixelBuffer {
    /// Buffer width in pixels (columns).
    pub const WIDTH: usize = WIDTH;
    /// Buffer height in pixels (rows).
    pub const HEIGHT: usize = HEIGHT;
    /// Offset between the two rows of a row pair.
    pub const HALF_HEIGHT: usize = ROW_PAIRS;
    /// Buffer dimensions as a [`Size`].
    pub const SIZE: Size = Size::new(WIDTH as u32, HEIGHT as u32);
    /// Top-left corner coordinate as a [`Point`].
    pub const TOP_LEFT: Point = Point::new(0, 0);
    /// Top-right corner coordinate as a [`Point`].
    pub const TOP_RIGHT: Point = Point::new(WIDTH as i32 - 1, 0);
    /// Bottom-left corner coordinate as a [`Point`].
    pub const BOTTOM_LEFT: Point = Point::new(0, HEIGHT as i32 - 1);
    /// Bottom-right corner coordinate as a [`Point`].
    pub const BOTTOM_RIGHT: Point = Point::new(WIDTH as i32 - 1, HEIGHT as i32 - 1);

    /// Create a buffer with every cell unset.
    #[must_use]
    pub const fn new() -> Self {
        Self([[None; WIDTH]; HEIGHT])
    }

    /// Rows of cells, top to bottom.
    #[must_use]
    pub const fn rows(&self) -> &[[Cell; WIDTH]; HEIGHT] {
        &self.0
    }

    /// Read a cell without panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` lies outside the panel.
    pub fn cell(&self, x: usize, y: usize) -> Result<Cell> {
        self.0
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .ok_or(Error::IndexOutOfBounds)
    }

    /// Merge `color` into the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the panel.
    pub fn merge_at(&mut self, x: usize, y: usize, color: Color) {
        let cell = &mut self[(x, y)];
        *cell = Some(Color::merge(*cell, color));
    }

    /// Reset every cell to unset.
    pub fn clear(&mut self) {
        self.0 = [[None; WIDTH]; HEIGHT];
    }

    /// Merge `color` into every cell.
    pub fn fill(&mut self, color: Color) {
        for cell in self.0.iter_mut().flatten() {
            *cell = Some(Color::merge(*cell, color));
        }
    }

    /// Merge `color` into the half-open rectangle `[x, x + width) × [y, y + height)`.
    ///
    /// A rectangle with a non-positive width or height draws nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] without touching any cell if part of the rectangle
    /// lies outside the panel.
    pub fn draw_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        let columns = checked_span(x, width, WIDTH)?;
        let rows = checked_span(y, height, HEIGHT)?;
        for row in &mut self.0[rows] {
            for cell in &mut row[columns.clone()] {
                *cell = Some(Color::merge(*cell, color));
            }
        }
        Ok(())
    }

    /// Composite `raster` (a [`Raster`](super::Raster) or a text
    /// [`Coverage`](super::Coverage) mask) with its top-left corner at `(x, y)`.
    ///
    /// Only the part of the raster that overlaps the panel is visited; a raster entirely
    /// off-panel is a no-op. A negative offset skips that many raster rows or columns.
    /// Samples with zero alpha are skipped outright (no merge), so a raster never touches cells
    /// outside its own coverage. Covered cells merge either the sample itself or a flat color,
    /// per `blit_color`.
    pub fn blit<S: Samples>(
        &mut self,
        raster: &S,
        x: i32,
        y: i32,
        blit_color: BlitColor,
    ) {
        let Some(columns) = visible_window(x, raster.width(), WIDTH) else {
            return;
        };
        let Some(rows) = visible_window(y, raster.height(), HEIGHT) else {
            return;
        };

        for row in rows.panel_start..rows.panel_end {
            let raster_y = rows.raster_start + (row - rows.panel_start);
            for col in columns.panel_start..columns.panel_end {
                let raster_x = columns.raster_start + (col - columns.panel_start);
                let sample = raster.sample(raster_x, raster_y);
                if sample.a == 0 {
                    continue;
                }
                let incoming = match blit_color {
                    BlitColor::Raster => sample,
                    BlitColor::Flat(color) => color,
                };
                self.merge_at(col, row, incoming);
            }
        }
    }
}

/// The part of one axis of a raster that lands on the panel.
struct Window {
    panel_start: usize,
    panel_end: usize,
    raster_start: usize,
}

/// Clip a raster axis at `offset` with `length` samples to `[0, limit)`.
fn visible_window(offset: i32, length: usize, limit: usize) -> Option<Window> {
    let length = i64::try_from(length).ok()?;
    let offset = i64::from(offset);
    let limit_i64 = i64::try_from(limit).ok()?;
    let panel_start = offset.max(0);
    let panel_end = (offset + length).min(limit_i64);
    if panel_start >= panel_end {
        return None;
    }
    // A negative offset hides the first `-offset` samples of the raster.
    let raster_start = panel_start - offset;
    Some(Window {
        panel_start: usize::try_from(panel_start).ok()?,
        panel_end: usize::try_from(panel_end).ok()?,
        raster_start: usize::try_from(raster_start).ok()?,
    })
}

/// Validate `[start, start + length)` against `[0, limit)`.
fn checked_span(start: i32, length: i32, limit: usize) -> Result<core::ops::Range<usize>> {
    let start = usize::try_from(start).map_err(|_| Error::IndexOutOfBounds)?;
    let length = usize::try_from(length).map_err(|_| Error::IndexOutOfBounds)?;
    let end = start.checked_add(length).ok_or(Error::IndexOutOfBounds)?;
    if end > limit {
        return Err(Error::IndexOutOfBounds);
    }
    Ok(start..end)
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<(usize, usize)> for PixelBuffer {
    type Output = Cell;

    fn index(&self, (x_index, y_index): (usize, usize)) -> &Self::Output {
        assert!(x_index < WIDTH, "x_index must be within width");
        assert!(y_index < HEIGHT, "y_index must be within height");
        &self.0[y_index][x_index]
    }
}

impl IndexMut<(usize, usize)> for PixelBuffer {
    fn index_mut(&mut self, (x_index, y_index): (usize, usize)) -> &mut Self::Output {
        assert!(x_index < WIDTH, "x_index must be within width");
        assert!(y_index < HEIGHT, "y_index must be within height");
        &mut self.0[y_index][x_index]
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Self::SIZE
    }
}

impl DrawTarget for PixelBuffer {
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
            if x_index < WIDTH && y_index < HEIGHT {
                self.merge_at(x_index, y_index, Color::from(color));
            }
        }
        Ok(())
    }
}
