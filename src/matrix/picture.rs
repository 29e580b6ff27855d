//! Pictures: full-color rasters blitted with their own colors.

use embedded_graphics::geometry::Point;

use super::{BlitColor, PixelBuffer, Raster};
use crate::Result;

/// A raster with a scale and a fixed top-left position.
///
/// Pictures are composited sample by sample: zero-alpha samples leave the panel alone and
/// every other sample replaces what the cell holds.
///
/// ```
/// use hub75_envoy::matrix::{Color, Picture, PixelBuffer, Raster};
///
/// let mut source: Raster<2, 2> = Raster::new(2, 2)?;
/// source.set(0, 0, Color::RED);
/// let picture: Picture<4, 4> = Picture::new(&source, 2.0, 10, 3)?;
///
/// let mut pixels = PixelBuffer::new();
/// picture.print_into(&mut pixels);
/// assert_eq!(pixels[(11, 4)], Some(Color::RED));
/// assert_eq!(pixels[(12, 4)], None);
/// # Ok::<(), hub75_envoy::Error>(())
/// ```
pub struct Picture<const W: usize = 64, const H: usize = 32> {
    raster: Raster<W, H>,
    scale: f32,
    position: Point,
}

impl<const W: usize, const H: usize> Picture<W, H> {
    /// Scale `source` by `scale` (nearest neighbour) and place it at `(x, y)`.
    ///
    /// A zero, negative or NaN `scale` gives an empty picture that draws nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RasterTooLarge`] if the scaled raster does not fit in `W × H`.
    pub fn new<const SW: usize, const SH: usize>(
        source: &Raster<SW, SH>,
        scale: f32,
        x: i32,
        y: i32,
    ) -> Result<Self> {
        let raster = source.scaled(scale)?;
        Ok(Self {
            raster,
            scale,
            position: Point::new(x, y),
        })
    }

    /// The scaled raster.
    #[must_use]
    pub const fn raster(&self) -> &Raster<W, H> {
        &self.raster
    }

    /// The scale the picture was built with.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Top-left position in panel coordinates.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Composite the picture into `pixels` with its own colors.
    pub fn print_into(&self, pixels: &mut PixelBuffer) {
        pixels.blit(
            &self.raster,
            self.position.x,
            self.position.y,
            BlitColor::Raster,
        );
    }
}

#[cfg(feature = "host")]
mod decode {
    use std::{fs::File, io::BufReader, path::Path};

    use png::{ColorType, Decoder, DecodingError, Transformations};

    use super::Picture;
    use crate::{
        DecodeError, Result,
        matrix::{Color, Raster, raster::scaled_size},
    };

    impl<const W: usize, const H: usize> Picture<W, H> {
        /// Decode the PNG at `path`, scale it by `scale` and place it at `(x, y)`.
        ///
        /// Grayscale and RGB images are fully opaque; images with an alpha channel keep it.
        /// Palette images are expanded, and 16-bit channels are reduced to 8 bits.
        ///
        /// # Errors
        ///
        /// Returns [`crate::Error::Decode`] with [`DecodeError::Unreadable`] when the path cannot
        /// be read, or with [`DecodeError::UnsupportedFormat`] when the bytes are not a PNG this
        /// crate decodes. Returns [`crate::Error::RasterTooLarge`] if the scaled image does not
        /// fit in `W × H`.
        pub fn open(path: impl AsRef<Path>, scale: f32, x: i32, y: i32) -> Result<Self> {
            let path = path.as_ref();
            let image = decode_png(path).inspect_err(|decode_error| {
                warn!("Picture::open: {} ({})", path.display(), decode_error);
            })?;

            let (width, height) = scaled_size(image.width, image.height, scale);
            let raster = Raster::resample(width, height, image.width, image.height, |sx, sy| {
                image.sample(sx, sy)
            })?;
            debug!(
                "Picture::open: {} decoded {}x{}, scaled to {}x{}",
                path.display(),
                image.width,
                image.height,
                width,
                height
            );
            Ok(Self {
                raster,
                scale,
                position: embedded_graphics::geometry::Point::new(x, y),
            })
        }
    }

    struct DecodedImage {
        width: usize,
        height: usize,
        color_type: ColorType,
        bytes: Vec<u8>,
    }

    impl DecodedImage {
        fn sample(&self, x: usize, y: usize) -> Color {
            let channels = self.color_type.samples();
            let start = (y * self.width + x) * channels;
            let Some(sample) = self.bytes.get(start..start + channels) else {
                return Color::TRANSPARENT;
            };
            match (self.color_type, sample) {
                (ColorType::Rgba, &[r, g, b, a]) => Color::new(r, g, b, a),
                (ColorType::Rgb, &[r, g, b]) => Color::new(r, g, b, u8::MAX),
                (ColorType::GrayscaleAlpha, &[l, a]) => Color::new(l, l, l, a),
                (ColorType::Grayscale, &[l]) => Color::new(l, l, l, u8::MAX),
                _ => Color::TRANSPARENT,
            }
        }
    }

    fn decode_png(path: &Path) -> core::result::Result<DecodedImage, DecodeError> {
        let file = File::open(path).map_err(|_| DecodeError::Unreadable)?;
        let mut decoder = Decoder::new(BufReader::new(file));
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut reader = decoder.read_info().map_err(classify)?;
        let mut bytes = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut bytes).map_err(classify)?;
        if info.color_type == ColorType::Indexed {
            return Err(DecodeError::UnsupportedFormat);
        }
        bytes.truncate(info.buffer_size());
        let width = usize::try_from(info.width).map_err(|_| DecodeError::UnsupportedFormat)?;
        let height = usize::try_from(info.height).map_err(|_| DecodeError::UnsupportedFormat)?;
        Ok(DecodedImage {
            width,
            height,
            color_type: info.color_type,
            bytes,
        })
    }

    fn classify(decoding_error: DecodingError) -> DecodeError {
        match decoding_error {
            DecodingError::IoError(_) => DecodeError::Unreadable,
            _ => DecodeError::UnsupportedFormat,
        }
    }
}
