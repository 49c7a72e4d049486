//! Pixel addressing and the pixel-pair byte codec.
//!
//! One byte is spread over the eight channels of two consecutive pixels,
//! least significant bit first, in the order R, G, B, A of the first pixel and
//! then R, G, B, A of the second pixel.
use image::{Rgba, RgbaImage};

use super::bits::{read_bit, write_bit};

/// Maps a row-major pixel index to `(x, y)` for an image of the given width.
///
/// The caller guarantees `index < width * height`.
#[must_use]
pub const fn to_position(index: usize, width: usize) -> (usize, usize)
{
    (index % width, index / width)
}

/// Two consecutive pixels carrying one payload byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPair
{
    pub first: Rgba<u8>,
    pub second: Rgba<u8>,
}

impl PixelPair
{
    /// Reads the pair starting at pixel `start` of `image`.
    ///
    /// # Panics
    ///
    /// Panics if `start + 1` lies outside the image.
    #[must_use]
    pub fn read(image: &RgbaImage, start: usize) -> Self
    {
        Self {
            first: *pixel_at(image, start),
            second: *pixel_at(image, start + 1),
        }
    }

    /// Stores the pair into `image` starting at pixel `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + 1` lies outside the image.
    pub fn write(self, image: &mut RgbaImage, start: usize)
    {
        *pixel_at_mut(image, start) = self.first;
        *pixel_at_mut(image, start + 1) = self.second;
    }

    /// Returns a copy of the pair with `value` written into its low bits.
    #[must_use]
    pub fn encode_byte(self, value: u8) -> Self
    {
        let mut rest = value;
        let mut first = self.first;
        let mut second = self.second;

        for channel in first.0.iter_mut().chain(second.0.iter_mut())
        {
            (*channel, rest) = write_bit(*channel, rest);
        }

        Self { first, second }
    }

    /// Reassembles the byte stored by [`PixelPair::encode_byte`].
    #[must_use]
    pub fn decode_byte(&self) -> u8
    {
        // reverse of the write order: A, B, G, R of the second pixel, then
        // A, B, G, R of the first
        self.second
            .0
            .iter()
            .rev()
            .chain(self.first.0.iter().rev())
            .fold(0, |value, &channel| read_bit(channel, value))
    }
}

fn pixel_at(image: &RgbaImage, index: usize) -> &Rgba<u8>
{
    let (x, y) = to_position(index, image.width() as usize);
    image.get_pixel(x as u32, y as u32)
}

fn pixel_at_mut(image: &mut RgbaImage, index: usize) -> &mut Rgba<u8>
{
    let (x, y) = to_position(index, image.width() as usize);
    image.get_pixel_mut(x as u32, y as u32)
}
