//! CLI image helpers.
//!
//! Loads PNG files into RGBA pixel grids, encodes grids back to PNG bytes and
//! derives the default output path.
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageError, RgbaImage,
};
use log::info;

use super::AppError;

/// Prefix added to the file name of an encoded image.
pub const OUTPUT_PREFIX: &str = "INKT_";

/// The only extension accepted for written images.
const PNG_EXTENSION: &str = "png";

/// Normalizes the extension of a path to lowercase.
pub(super) fn normalized_extension(path: impl AsRef<Path>) -> Option<String>
{
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Returns `INKT_<file name>` next to `input`, with a `.png` extension.
pub(super) fn default_output_path(input: impl AsRef<Path>) -> PathBuf
{
    let input = input.as_ref();
    let name = input
        .file_name()
        .map_or_else(|| "image".into(), |name| name.to_string_lossy());

    let mut output = input.with_file_name(format!("{OUTPUT_PREFIX}{name}"));
    output.set_extension(PNG_EXTENSION);
    output
}

/// Fails unless `output` names a PNG file.
///
/// # Errors
///
/// Returns [`AppError::UnsupportedFormat`] for any other extension.
pub(super) fn ensure_png(output: impl AsRef<Path>) -> Result<(), AppError>
{
    match normalized_extension(output)
    {
        Some(ext) if ext == PNG_EXTENSION => Ok(()),
        other =>
        {
            let extension = other.as_deref().unwrap_or("<unknown>").into();
            Err(AppError::UnsupportedFormat { extension })
        },
    }
}

/// Loads an image from the specified path as an 8-bit RGBA grid.
///
/// Without `convert` the image must already be 8-bit RGBA.
///
/// # Errors
///
/// Returns:
/// * [`AppError::Read`] when the path is a directory or cannot be read
/// * [`AppError::ImageDecode`] when the bytes are not a decodable image
/// * [`AppError::UnsupportedPixelFormat`] when the image is not 8-bit RGBA and
///   `convert` is off
pub(super) fn load_image(
    path: impl AsRef<Path>,
    convert: bool,
) -> Result<RgbaImage, AppError>
{
    let path = path.as_ref();
    if path.is_dir()
    {
        let message = format!("{} is a directory", path.display());
        return Err(AppError::Read {
            path: path.into(),
            source: Error::new(ErrorKind::IsADirectory, message),
        });
    }

    let bytes = fs::read(path).map_err(|source| AppError::Read {
        path: path.into(),
        source,
    })?;

    decode_image(&bytes, convert).map_err(|error| match error
    {
        DecodeError::Image(source) => AppError::ImageDecode {
            path: path.into(),
            source,
        },
        DecodeError::PixelFormat(color) => AppError::UnsupportedPixelFormat {
            path: path.into(),
            color: format!("{color:?}").into(),
        },
    })
}

/// Reasons a byte buffer cannot become an RGBA grid.
#[derive(Debug)]
pub(super) enum DecodeError
{
    Image(ImageError),
    PixelFormat(image::ColorType),
}

/// Decodes an encoded image into an 8-bit RGBA grid.
pub(super) fn decode_image(
    bytes: &[u8],
    convert: bool,
) -> Result<RgbaImage, DecodeError>
{
    match image::load_from_memory(bytes).map_err(DecodeError::Image)?
    {
        DynamicImage::ImageRgba8(grid) => Ok(grid),
        other if convert =>
        {
            info!("converting {:?} image to RGBA8", other.color());
            Ok(other.into_rgba8())
        },
        other => Err(DecodeError::PixelFormat(other.color())),
    }
}

/// Encodes an RGBA grid as PNG bytes.
pub(super) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError>
{
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut bytes,
        CompressionType::Default,
        FilterType::Adaptive,
    );
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;

    Ok(bytes)
}

/// Writes the image as a PNG file.
///
/// The image is encoded in memory first, so nothing is written when encoding
/// fails.
///
/// # Errors
///
/// Returns:
/// * [`AppError::UnsupportedFormat`] when `output` is not a `.png` path
/// * [`AppError::ImageEncode`] when the image cannot be encoded
/// * [`AppError::Write`] when the file cannot be written
pub(super) fn write_image(
    image: &RgbaImage,
    output: impl AsRef<Path>,
) -> Result<(), AppError>
{
    let output = output.as_ref();
    ensure_png(output)?;

    let bytes = encode_png(image).map_err(|source| AppError::ImageEncode {
        path: output.into(),
        source,
    })?;

    fs::write(output, bytes).map_err(|source| AppError::Write {
        path: output.into(),
        source,
    })
}
