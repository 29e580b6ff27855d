//! Colors for the 1-bit-per-channel panel and the cell merge rule.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use smart_leds::RGB8;

/// An RGBA color as stored in the pixel buffer.
///
/// The panel can only switch each channel fully on or off: any channel value above zero
/// lights that channel. Alpha is not a blend weight. It only selects how [`Color::merge`]
/// combines a new color with what a cell already holds.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha: `> 0` overwrites on merge, `0` ORs channels into the existing color.
    pub a: u8,
}

impl Color {
    /// All channels off, zero alpha. Merging it never changes a cell that is already set.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black. Merging it turns a cell off.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1, 1, 1);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 1, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 1);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(1, 1, 0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::rgb(0, 1, 1);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::rgb(1, 0, 1);

    /// Create a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    /// Whether merging this color overwrites the existing cell.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a > 0
    }

    /// On/off state of the red, green and blue lines for this color.
    #[must_use]
    pub const fn channels_on(self) -> (bool, bool, bool) {
        (self.r > 0, self.g > 0, self.b > 0)
    }

    /// Combine an incoming color with a cell's current content.
    ///
    /// - An unset cell takes `incoming` as is.
    /// - An opaque `incoming` (`a > 0`) replaces the cell entirely.
    /// - A zero-alpha `incoming` ORs each channel's on/off state into the cell (result channels
    ///   are `0` or `1`) and keeps the cell's alpha.
    ///
    /// This is not an alpha blend. The OR branch is what lets anti-aliased edges light a pixel
    /// whenever any layer wants it on.
    ///
    /// ```
    /// use hub75_envoy::matrix::Color;
    ///
    /// assert_eq!(Color::merge(None, Color::RED), Color::RED);
    /// assert_eq!(Color::merge(Some(Color::RED), Color::BLUE), Color::BLUE);
    /// assert_eq!(
    ///     Color::merge(Some(Color::RED), Color::new(0, 0, 9, 0)),
    ///     Color::new(1, 0, 1, u8::MAX)
    /// );
    /// ```
    #[must_use]
    pub const fn merge(existing: Option<Self>, incoming: Self) -> Self {
        match existing {
            None => incoming,
            Some(_) if incoming.is_opaque() => incoming,
            Some(existing) => Self {
                r: or_on(existing.r, incoming.r),
                g: or_on(existing.g, incoming.g),
                b: or_on(existing.b, incoming.b),
                a: existing.a,
            },
        }
    }
}

const fn or_on(existing: u8, incoming: u8) -> u8 {
    if existing > 0 || incoming > 0 { 1 } else { 0 }
}

impl From<RGB8> for Color {
    fn from(color: RGB8) -> Self {
        Self::rgb(color.r, color.g, color.b)
    }
}

impl From<Rgb888> for Color {
    fn from(color: Rgb888) -> Self {
        Self::rgb(color.r(), color.g(), color.b())
    }
}

impl From<Color> for Rgb888 {
    /// Full-brightness preview color: every lit channel becomes 255.
    fn from(color: Color) -> Self {
        let (red, green, blue) = color.channels_on();
        Self::new(
            if red { u8::MAX } else { 0 },
            if green { u8::MAX } else { 0 },
            if blue { u8::MAX } else { 0 },
        )
    }
}
