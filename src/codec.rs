//! Image codec seam.
//!
//! The resizer never touches pixels itself. It picks target sizes and hands
//! decode, resample and encode to an [`ImageCodec`]. The production codec,
//! [`PngCodec`], is backed by the `image` crate with an optional lossless
//! `oxipng` pass on every encoded variant.

use crate::constants::{LIBDEFLATER_HIGH_LEVEL, OXIPNG_PRESET, ZOPFLI_ITERATIONS};
use clap::ValueEnum;
use image::codecs::png::{PngDecoder, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageFormat};
use oxipng::{Deflaters, Options};
use std::io::{Cursor, Read, Write};
use std::num::NonZeroU8;
use thiserror::Error;

/// Decoded bitmap handled by the pipeline.
pub type SourceImage = DynamicImage;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("{0}")]
    Malformed(String),
}

pub trait ImageCodec {
    /// Decode a whole image from `reader`.
    fn decode(&self, reader: &mut dyn Read) -> Result<SourceImage, CodecError>;

    /// Width and height of the image in `reader`. Decodes the whole image
    /// unless the codec can read the size from the header.
    fn dimensions(&self, reader: &mut dyn Read) -> Result<(u32, u32), CodecError> {
        Ok(self.decode(reader)?.dimensions())
    }

    /// Resample `image` to exactly `width`x`height` with a high-quality filter.
    fn resample(
        &self,
        image: &SourceImage,
        width: u32,
        height: u32,
    ) -> Result<SourceImage, CodecError>;

    /// Encode `image` into `sink`.
    fn encode(&self, image: &SourceImage, sink: &mut dyn Write) -> Result<(), CodecError>;
}

/// Lossless post-processing applied to encoded PNGs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OptimizeLevel {
    /// Write the encoder output as is.
    #[default]
    Off,
    /// oxipng with libdeflater at its highest level.
    Fast,
    /// oxipng with zopfli; much slower, slightly smaller.
    Max,
}

impl OptimizeLevel {
    fn oxipng_options(self) -> Option<Options> {
        let deflate = match self {
            OptimizeLevel::Off => return None,
            OptimizeLevel::Fast => Deflaters::Libdeflater {
                compression: LIBDEFLATER_HIGH_LEVEL,
            },
            OptimizeLevel::Max => Deflaters::Zopfli {
                iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
            },
        };
        let mut options = Options::from_preset(OXIPNG_PRESET);
        options.deflate = deflate;
        Some(options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PngCodec {
    optimize: OptimizeLevel,
}

impl PngCodec {
    pub fn new(optimize: OptimizeLevel) -> Self {
        Self { optimize }
    }
}

impl ImageCodec for PngCodec {
    fn decode(&self, reader: &mut dyn Read) -> Result<SourceImage, CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?)
    }

    fn dimensions(&self, reader: &mut dyn Read) -> Result<(u32, u32), CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(PngDecoder::new(Cursor::new(bytes))?.dimensions())
    }

    fn resample(
        &self,
        image: &SourceImage,
        width: u32,
        height: u32,
    ) -> Result<SourceImage, CodecError> {
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    fn encode(&self, image: &SourceImage, sink: &mut dyn Write) -> Result<(), CodecError> {
        let Some(options) = self.optimize.oxipng_options() else {
            image.write_with_encoder(PngEncoder::new(sink))?;
            return Ok(());
        };

        let mut raw = Vec::new();
        image.write_with_encoder(PngEncoder::new(&mut raw))?;
        let optimized = oxipng::optimize_from_memory(&raw, &options)
            .map_err(|e| CodecError::PngOptimization(e.to_string()))?;
        sink.write_all(&optimized)?;
        Ok(())
    }
}
