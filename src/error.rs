use derive_more::{Display, Error as DeriveError};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the matrix device abstraction.
#[derive(Debug, Display, DeriveError)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A GPIO line could not be claimed (unknown pin number or named twice in a mapping).
    #[display("hardware unavailable: GPIO {gpio} could not be claimed")]
    HardwareUnavailable {
        /// The GPIO number that could not be claimed.
        gpio: u8,
    },

    /// A pin rejected a level change while scanning.
    #[display("a matrix pin rejected a level change")]
    PinWrite,

    /// An image could not be loaded or decoded.
    #[display("image decode failed: {_0}")]
    Decode(#[error(not(source))] DecodeError),

    /// A rectangle or cell lies outside the 64×32 panel.
    #[display("coordinates fall outside the 64x32 panel")]
    IndexOutOfBounds,

    /// A raster does not fit in the capacity chosen for it.
    #[display("raster exceeds its fixed capacity")]
    RasterTooLarge,

    /// Text content is longer than the text capacity.
    #[display("text content exceeds its fixed capacity")]
    TextTooLong,

    /// The scan task could not be spawned.
    #[display("task spawn failed: {_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}

/// Why a picture could not be produced from an image source.
#[derive(Clone, Copy, Debug, Display, DeriveError, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The path could not be opened or read.
    #[display("image source is unreadable")]
    Unreadable,
    /// The data is not an image format this crate decodes.
    #[display("image format is not supported")]
    UnsupportedFormat,
}

impl From<DecodeError> for Error {
    fn from(decode_error: DecodeError) -> Self {
        Self::Decode(decode_error)
    }
}
