//! Steganography routines for embedding a message into an RGBA image.
//!
//! # Errors
//!
//! Returns [`StegoError`] when embedding the message fails.
use image::RgbaImage;
use log::debug;

use super::pair::PixelPair;
use super::selection::{PixelSelection, frame};
use super::{StegoError, pixel_count};

/// Embeds `message` into a copy of `source` and returns the copy.
///
/// The message is terminated with the sentinel byte and laid out by
/// `selection`. Only the least significant bit of the channels of the chosen
/// pixel pairs can differ between `source` and the result.
///
/// # Errors
///
/// Returns [`StegoError::SentinelInPayload`] when the message contains the
/// terminator, [`StegoError::CapacityExceeded`] when it does not fit, or
/// [`StegoError::DegenerateInterval`] when the image size yields an unusable
/// interval. All of these are detected before any pixel is written.
pub fn embed_message(
    source: &RgbaImage,
    message: &[u8],
    selection: &dyn PixelSelection,
) -> Result<RgbaImage, StegoError>
{
    let framed = frame(message)?;
    let pixel_count = pixel_count(source);
    let layout = selection.plan(pixel_count, framed.len())?;

    // untouched pixels are carried over as they are
    let mut image = source.clone();

    if let Some(interval) = layout.header
    {
        PixelPair::read(source, 0)
            .encode_byte(interval)
            .write(&mut image, 0);
    }

    let mut written = 0;
    for (start, &byte) in layout.starts(pixel_count).zip(&framed)
    {
        PixelPair::read(source, start)
            .encode_byte(byte)
            .write(&mut image, start);
        written += 1;
    }
    debug!(
        "embedded {written} bytes starting at pixel {} every {} pixels",
        layout.first, layout.step
    );

    Ok(image)
}
