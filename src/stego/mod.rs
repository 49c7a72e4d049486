//! Steganography routines for hiding a byte message in an RGBA image.
//!
//! # Encoding Format
//!
//! - Each payload byte occupies a pixel pair: its bits, least significant
//!   first, go into the low bit of R, G, B, A of the first pixel and then R,
//!   G, B, A of the second pixel
//! - The message is terminated by a single [`SENTINEL`] byte, which therefore
//!   cannot appear inside the message
//! - With the [`Strided`] selection the first pixel pair holds the interval
//!   between payload pairs, `(pixels / (len + 1)) mod 255`
//! - Pixels are addressed left-to-right, top-to-bottom
//!
//! # Errors
//!
//! Returns [`StegoError`] when embedding or extracting a message fails.
use image::RgbaImage;
use thiserror::Error;

mod bits;
mod decode;
mod encode;
mod pair;
mod selection;

pub use bits::{read_bit, write_bit};
pub use decode::extract_message;
pub use encode::embed_message;
pub use pair::{PixelPair, to_position};
pub use selection::{
    Dense, INTERVAL_MODULUS, Layout, MIN_INTERVAL, PixelSelection, SENTINEL,
    Strategy, Strided, compute_interval, frame,
};

/// Errors that can be emitted while embedding or extracting a message
#[derive(Debug, Error)]
pub enum StegoError
{
    /// The message is too large to fit in the image
    #[error(
        "message length of {requested_bytes} bytes exceeds available capacity \
         of {available_bytes} bytes"
    )]
    CapacityExceeded
    {
        requested_bytes: usize,
        available_bytes: usize,
    },

    /// The message contains the terminator byte
    #[error(
        "message contains the terminator byte 0x5C ('\\') at offset {position}"
    )]
    SentinelInPayload
    {
        position: usize
    },

    /// The interval is too small to walk the image
    #[error("interval {interval} is too small to separate pixel pairs")]
    DegenerateInterval
    {
        interval: u8
    },

    /// The payload pairs run past the end of the image at this interval
    #[error(
        "interval {interval} places the last of {framed_bytes} payload pairs \
         past the end of an image of {pixel_count} pixels"
    )]
    LayoutOverflow
    {
        interval: u8,
        framed_bytes: usize,
        pixel_count: usize,
    },

    /// The image is too small to contain the interval header
    #[error("image of {pixel_count} pixels cannot hold the interval header")]
    MissingHeader
    {
        pixel_count: usize
    },

    /// The image ended before the terminator byte was found
    #[error(
        "no terminator found after decoding {decoded_bytes} bytes, the image \
         does not contain a message"
    )]
    TruncatedMessage
    {
        decoded_bytes: usize
    },
}

/// Returns the maximum message size (in bytes, terminator excluded) that
/// `selection` can embed in the given image.
#[must_use]
pub fn max_message_size(
    image: &RgbaImage,
    selection: &dyn PixelSelection,
) -> usize
{
    selection.capacity(pixel_count(image))
}

/// Returns the number of pixels in the image
fn pixel_count(image: &RgbaImage) -> usize
{
    (image.width() as usize) * (image.height() as usize)
}
