//! A device abstraction for 64×32 HUB75 RGB LED matrix panels with 1/16 row multiplexing.
//!
//! The panel has no memory of its own: it shows one row pair at a time and must be refreshed
//! continuously. [`Matrix::new`] spawns a background task that does exactly that from a
//! shared [`PixelBuffer`], while the [`Matrix`] handle lets application code fill, draw
//! rectangles, print [`Text`] and [`Picture`]s, and run any [`embedded-graphics`] drawing
//! against the same buffer.
//!
//! Each channel is on or off (no brightness control), so the panel shows eight colors. See
//! [`Color`] for how new drawing merges with what a cell already holds.
//!
//! [`embedded-graphics`]: https://docs.rs/embedded-graphics
//!
//! # Example: Scroll Text
//!
//! ```rust,ignore
//! # #![no_std]
//! # #![no_main]
//! # use panic_probe as _;
//! # use core::convert::Infallible;
//! use embassy_executor::Spawner;
//! use embassy_time::{Duration, Timer};
//! use hub75_envoy::{
//!     Result,
//!     matrix::{
//!         Color, Matrix, MatrixFont, MatrixPins, MatrixStatic, PinMapping, RpPinBank, Scroll,
//!         ScrollStop, Text,
//!     },
//! };
//!
//! static MATRIX_STATIC: MatrixStatic = MatrixStatic::new_static();
//! static TEXT_STOP: ScrollStop = ScrollStop::new();
//!
//! # #[embassy_executor::main]
//! # pub async fn main(spawner: Spawner) -> ! {
//! #     let err = example(spawner).await.unwrap_err();
//! #     core::panic!("{err}");
//! # }
//! async fn example(spawner: Spawner) -> Result<Infallible> {
//!     let _p = embassy_rp::init(Default::default());
//!
//!     // Claim the 13 HUB75 lines by GPIO number and start refreshing the panel.
//!     // SAFETY: these GPIOs are used for nothing else.
//!     let mut pin_bank = unsafe { RpPinBank::new() };
//!     let pins = MatrixPins::from_mapping(&PinMapping::ADAFRUIT_HAT, &mut pin_bank)?;
//!     let matrix = Matrix::new(&MATRIX_STATIC, pins, spawner)?;
//!
//!     let text: Text = Text::new("Hello", MatrixFont::Font6x10, 1.0, 64, 10)?;
//!     let scroll = Scroll::left(1, Duration::from_millis(40));
//!
//!     // Move the text in one future and redraw it in another.
//!     embassy_futures::join::join(text.scroll(scroll, &TEXT_STOP), async {
//!         loop {
//!             matrix
//!                 .update(|pixels| {
//!                     pixels.clear();
//!                     text.print_into(pixels, Color::CYAN);
//!                 })
//!                 .await;
//!             Timer::after(Duration::from_millis(20)).await;
//!         }
//!     })
//!     .await;
//!     unreachable!()
//! }
//! ```

mod color;
mod picture;
mod pixels;
mod pins;
mod raster;
#[cfg(not(feature = "host"))]
mod rp;
mod scan;
mod text;

pub use color::Color;
pub use picture::Picture;
pub use pixels::{BlitColor, Cell, PixelBuffer};
pub use pins::{MatrixPins, PinBank, PinMapping, SignalDriver};
pub use raster::{Coverage, Raster, Samples};
#[cfg(not(feature = "host"))]
pub use rp::RpPinBank;
pub use scan::{scan_frame, scan_loop};
pub use text::{MatrixFont, Scroll, ScrollStop, TEXT_CAPACITY, Text, render_text};

// Re-export geometric types from embedded-graphics for convenience
pub use embedded_graphics::geometry::{Point, Size};

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, signal::Signal};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::Result;

/// Panel width in pixels.
pub const WIDTH: usize = 64;
/// Panel height in pixels.
pub const HEIGHT: usize = 32;
/// Number of row pairs scanned per frame (1/16 multiplexing).
pub const ROW_PAIRS: usize = HEIGHT / 2;

/// The pixel buffer behind its single coarse lock.
pub type PixelMutex = Mutex<CriticalSectionRawMutex, PixelBuffer>;

// ============================================================================
// MatrixStatic - shared state between the scan task and Matrix handles
// ============================================================================

/// Static resources for one matrix.
///
/// Declare it as a `static` and hand it to [`Matrix::new`]. The pixel buffer is the only
/// mutable state shared with the scan task; it is guarded by one async mutex that the scan
/// task holds for a whole frame and every compositor call holds for its whole mutation.
pub struct MatrixStatic {
    pub(crate) pixels: PixelMutex,
    pub(crate) stop: Signal<CriticalSectionRawMutex, ()>,
    pub(crate) stopped: Signal<CriticalSectionRawMutex, ()>,
    pub(crate) frame_count: AtomicU32,
    pub(crate) has_stopped: AtomicBool,
}

impl MatrixStatic {
    /// Create the static resources with every cell unset.
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            pixels: Mutex::new(PixelBuffer::new()),
            stop: Signal::new(),
            stopped: Signal::new(),
            frame_count: AtomicU32::new(0),
            has_stopped: AtomicBool::new(false),
        }
    }
}

impl Default for MatrixStatic {
    fn default() -> Self {
        Self::new_static()
    }
}

// ============================================================================
// Matrix - handle used by application code
// ============================================================================

/// A handle to a running matrix. Cheap to copy; every copy mutates the same buffer.
///
/// Every drawing method awaits the buffer lock and finishes its whole mutation before
/// releasing it, so the scan task never shows a half-applied call. A call can wait up to one
/// frame for the lock, and a long [`update`](Self::update) delays the next refresh.
///
/// See the [module docs](crate::matrix) for a complete example.
#[derive(Clone, Copy)]
pub struct Matrix {
    matrix_static: &'static MatrixStatic,
}

impl Matrix {
    /// Start refreshing the panel on `pins` and return a handle to its buffer.
    ///
    /// The spawned scan task drives every line low before its first frame.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TaskSpawn`] if the scan task cannot be spawned.
    #[cfg(not(feature = "host"))]
    pub fn new(
        matrix_static: &'static MatrixStatic,
        pins: MatrixPins<embassy_rp::gpio::Output<'static>>,
        spawner: embassy_executor::Spawner,
    ) -> Result<Self> {
        let token = rp::matrix_scan_task(matrix_static, SignalDriver::new(pins));
        spawner.spawn(token).map_err(crate::Error::TaskSpawn)?;
        Ok(Self::from_static(matrix_static))
    }

    /// A handle to `matrix_static` without spawning anything.
    ///
    /// Use this when the scan loop is driven some other way (for example [`scan_loop`] in a
    /// host test).
    #[must_use]
    pub const fn from_static(matrix_static: &'static MatrixStatic) -> Self {
        Self { matrix_static }
    }

    /// Run `f` on the buffer under the lock, as one atomic change.
    pub async fn update<R>(&self, f: impl FnOnce(&mut PixelBuffer) -> R) -> R {
        let mut pixels = self.matrix_static.pixels.lock().await;
        f(&mut pixels)
    }

    /// A copy of the buffer as it is now.
    pub async fn snapshot(&self) -> PixelBuffer {
        *self.matrix_static.pixels.lock().await
    }

    /// Merge `color` into every cell.
    pub async fn fill(&self, color: Color) {
        self.update(|pixels| pixels.fill(color)).await;
    }

    /// Reset every cell to unset (panel dark).
    pub async fn clear(&self) {
        self.update(PixelBuffer::clear).await;
    }

    /// Merge `color` into `[x, x + width) × [y, y + height)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IndexOutOfBounds`] without changing anything if part of the
    /// rectangle lies outside the panel.
    pub async fn draw_rectangle(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    ) -> Result<()> {
        self.update(|pixels| pixels.draw_rectangle(x, y, width, height, color))
            .await
    }

    /// Draw `text` at its current position in `color`, using the glyphs as a coverage mask.
    pub async fn print_text<const W: usize, const H: usize>(
        &self,
        text: &Text<W, H>,
        color: Color,
    ) {
        self.update(|pixels| text.print_into(pixels, color)).await;
    }

    /// Draw `picture` at its position with its own colors.
    pub async fn print_picture<const W: usize, const H: usize>(&self, picture: &Picture<W, H>) {
        self.update(|pixels| picture.print_into(pixels)).await;
    }

    /// Number of frames scanned so far (wraps at `u32::MAX`).
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.matrix_static.frame_count.load(Ordering::Relaxed)
    }

    /// Stop the scan task and wait until it has finished its last frame.
    ///
    /// When this returns every signal line is low and nothing toggles the pins any more. Once
    /// the scan loop has ended, further calls return at once. Before a scan loop has started it
    /// waits until one starts and stops.
    pub async fn stop(&self) {
        if self.matrix_static.has_stopped.load(Ordering::Acquire) {
            return;
        }
        self.matrix_static.stop.signal(());
        self.matrix_static.stopped.wait().await;
    }
}
