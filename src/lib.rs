//! Device abstraction for a 64×32 HUB75 RGB LED matrix driven by bit-banged GPIO on Pico 1 and 2.
//!
//! A background scan task refreshes the panel continuously from a shared pixel buffer while
//! application code fills, draws, prints text and pictures, and scrolls text into that buffer.
//! See [`matrix`] for the device abstraction and examples.
//!
//! # Glossary
//!
//! - **Row pair:** The panel is wired as two 16-row halves scanned in lock-step. Row `r` and
//!   row `r + 16` share one row address and one column clock but have their own color lines.
//! - **Output enable:** Blanks the panel while a new row of column data is shifted in.
//! - **Latch:** Commits a fully shifted row of column data to the LED drivers.
//! - **Raster:** A 2-D grid of RGBA samples produced from text or an image.
//! - **Coverage mask:** A raster whose alpha only decides *where* a flat color is drawn.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(not(feature = "arm"), not(feature = "host")))]
compile_error!("Must enable the 'arm' architecture feature");

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

mod error;
pub mod matrix;
#[cfg(feature = "host")]
pub mod to_png;

// Re-export error types and result (used throughout)
pub use crate::error::{DecodeError, Error, Result};
