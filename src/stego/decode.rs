//! Steganography routines for extracting a message from an RGBA image.
//!
//! Decoding reads the layout (the interval header for the strided selection),
//! then decodes one byte per payload pair until the terminator shows up or the
//! image runs out.
//!
//! # Errors
//!
//! Returns [`StegoError`] when extracting the message fails.
use image::RgbaImage;
use log::debug;

use super::pair::PixelPair;
use super::selection::{PixelSelection, SENTINEL};
use super::{StegoError, pixel_count};

/// Extracts a message previously embedded with [`embed_message`] using the
/// same `selection`.
///
/// The terminator is not part of the returned bytes.
///
/// # Errors
///
/// Returns [`StegoError::MissingHeader`] when the image is too small to hold
/// the interval header,
///
/// [`StegoError::DegenerateInterval`] when the header decodes to an interval
/// that cannot be walked,
///
/// [`StegoError::TruncatedMessage`] when the image ends before a terminator is
/// found. Partial data is never returned.
///
/// [`embed_message`]: super::embed_message
pub fn extract_message(
    image: &RgbaImage,
    selection: &dyn PixelSelection,
) -> Result<Vec<u8>, StegoError>
{
    let layout = selection.recover(image)?;
    let pixel_count = pixel_count(image);

    let mut message = Vec::new();
    for start in layout.starts(pixel_count)
    {
        let byte = PixelPair::read(image, start).decode_byte();
        if byte == SENTINEL
        {
            debug!("terminator found at pixel {start}");
            return Ok(message);
        }
        message.push(byte);
    }

    Err(StegoError::TruncatedMessage {
        decoded_bytes: message.len(),
    })
}
