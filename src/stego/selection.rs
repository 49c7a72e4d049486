//! Message framing and pixel selection.
//!
//! A [`PixelSelection`] decides which pixel pairs carry the payload. Two
//! strategies exist:
//!
//! - [`Strided`]: the first pixel pair stores an interval byte, the payload
//!   follows with one byte every `interval` pixels.
//! - [`Dense`]: the payload occupies consecutive pixel pairs from pixel 0.
//!
//! Both frame the message with a trailing [`SENTINEL`] byte.
use clap::ValueEnum;
use image::RgbaImage;
use log::debug;

use super::pair::PixelPair;
use super::{StegoError, pixel_count};

/// Byte marking the end of the message (`\`).
pub const SENTINEL: u8 = b'\\';

/// The interval byte wraps at this value.
pub const INTERVAL_MODULUS: usize = 255;

/// Smallest interval that keeps consecutive pixel pairs disjoint.
pub const MIN_INTERVAL: u8 = 2;

/// Pixels taken by the interval header of the strided layout.
const HEADER_PIXELS: usize = 2;

/// Appends the sentinel to `message`.
///
/// # Errors
///
/// Returns [`StegoError::SentinelInPayload`] when `message` already contains
/// the sentinel, since the decoder would stop at it.
pub fn frame(message: &[u8]) -> Result<Vec<u8>, StegoError>
{
    if let Some(position) = message.iter().position(|&byte| byte == SENTINEL)
    {
        return Err(StegoError::SentinelInPayload { position });
    }

    let mut framed = Vec::with_capacity(message.len() + 1);
    framed.extend_from_slice(message);
    framed.push(SENTINEL);
    Ok(framed)
}

/// Computes the strided interval for `framed_len` bytes (sentinel included).
///
/// The result is `(pixel_count / framed_len) mod 255` and may therefore be 0
/// or 1 for some image sizes; callers validate it.
#[must_use]
pub const fn compute_interval(pixel_count: usize, framed_len: usize) -> u8
{
    if framed_len == 0
    {
        return 0;
    }

    // always below 255, the cast cannot truncate
    ((pixel_count / framed_len) % INTERVAL_MODULUS) as u8
}

/// Where the header and the payload pairs of an image live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout
{
    /// Interval byte stored in pixel pair (0, 1), if the strategy has one
    pub header: Option<u8>,
    /// Start index of the first payload pair
    pub first: usize,
    /// Distance between the start indices of consecutive payload pairs
    pub step: usize,
}

impl Layout
{
    /// Ordered start indices of the payload pairs that fit in an image of
    /// `pixel_count` pixels.
    pub fn starts(&self, pixel_count: usize) -> impl Iterator<Item = usize>
    {
        let Self { first, step, .. } = *self;
        (0..)
            .map(move |k| first + k * step)
            .take_while(move |&start| start + 1 < pixel_count)
    }

    /// Whether `framed_len` payload pairs fit in an image of `pixel_count`
    /// pixels.
    fn fits(&self, pixel_count: usize, framed_len: usize) -> bool
    {
        match framed_len.checked_sub(1)
        {
            None => true,
            Some(last) => self.first + last * self.step + 1 < pixel_count,
        }
    }
}

/// Chooses the pixel pairs that carry a message.
pub trait PixelSelection
{
    /// Lays out `framed_len` bytes (sentinel included) in an image with
    /// `pixel_count` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`StegoError`] when the message does not fit. No pixel has been
    /// touched at that point.
    fn plan(
        &self,
        pixel_count: usize,
        framed_len: usize,
    ) -> Result<Layout, StegoError>;

    /// Recovers the layout that [`PixelSelection::plan`] used for `image`.
    ///
    /// # Errors
    ///
    /// Returns [`StegoError`] when the image cannot hold a valid layout.
    fn recover(&self, image: &RgbaImage) -> Result<Layout, StegoError>;

    /// Maximum message length in bytes, sentinel excluded.
    fn capacity(&self, pixel_count: usize) -> usize;
}

/// Payload bytes spaced `interval` pixels apart after an interval header.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strided;

impl PixelSelection for Strided
{
    fn plan(
        &self,
        pixel_count: usize,
        framed_len: usize,
    ) -> Result<Layout, StegoError>
    {
        let capacity_error = || StegoError::CapacityExceeded {
            requested_bytes: framed_len.saturating_sub(1),
            available_bytes: self.capacity(pixel_count),
        };

        if framed_len >= pixel_count / 2
        {
            return Err(capacity_error());
        }

        let interval = compute_interval(pixel_count, framed_len);
        debug!(
            "strided interval {interval} for {framed_len} bytes in \
             {pixel_count} pixels"
        );
        if interval < MIN_INTERVAL
        {
            return Err(StegoError::DegenerateInterval { interval });
        }

        let layout = Layout {
            header: Some(interval),
            first: HEADER_PIXELS,
            step: usize::from(interval),
        };
        if !layout.fits(pixel_count, framed_len)
        {
            return Err(StegoError::LayoutOverflow {
                interval,
                framed_bytes: framed_len,
                pixel_count,
            });
        }

        Ok(layout)
    }

    fn recover(&self, image: &RgbaImage) -> Result<Layout, StegoError>
    {
        let pixel_count = pixel_count(image);
        if pixel_count < HEADER_PIXELS
        {
            return Err(StegoError::MissingHeader { pixel_count });
        }

        let interval = PixelPair::read(image, 0).decode_byte();
        debug!("read interval {interval} from the header pair");
        if interval < MIN_INTERVAL
        {
            return Err(StegoError::DegenerateInterval { interval });
        }

        Ok(Layout {
            header: Some(interval),
            first: HEADER_PIXELS,
            step: usize::from(interval),
        })
    }

    /// Upper bound from the half-the-pairs rule. Shorter messages can still
    /// fail with [`StegoError::LayoutOverflow`] when the interval is 3 and
    /// `3 * (len + 1)` equals the pixel count.
    fn capacity(&self, pixel_count: usize) -> usize
    {
        // framed length must stay below half the pixel count
        (pixel_count / 2).saturating_sub(2)
    }
}

/// Payload bytes in consecutive pixel pairs from pixel 0, without a header.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dense;

impl Dense
{
    const LAYOUT: Layout = Layout {
        header: None,
        first: 0,
        step: 2,
    };
}

impl PixelSelection for Dense
{
    fn plan(
        &self,
        pixel_count: usize,
        framed_len: usize,
    ) -> Result<Layout, StegoError>
    {
        if !Self::LAYOUT.fits(pixel_count, framed_len)
        {
            return Err(StegoError::CapacityExceeded {
                requested_bytes: framed_len.saturating_sub(1),
                available_bytes: self.capacity(pixel_count),
            });
        }

        Ok(Self::LAYOUT)
    }

    fn recover(&self, _image: &RgbaImage) -> Result<Layout, StegoError>
    {
        Ok(Self::LAYOUT)
    }

    fn capacity(&self, pixel_count: usize) -> usize
    {
        (pixel_count / 2).saturating_sub(1)
    }
}

/// Selection strategy picked on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy
{
    /// Interval header followed by evenly spaced payload pairs
    #[default]
    Strided,
    /// Consecutive payload pairs from the first pixel
    Dense,
}

impl Strategy
{
    /// Returns the selection implementing this strategy.
    #[must_use]
    pub fn selection(self) -> &'static dyn PixelSelection
    {
        match self
        {
            Self::Strided => &Strided,
            Self::Dense => &Dense,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn frame_appends_sentinel()
    {
        assert_eq!(frame(b"hi").unwrap(), b"hi\\");
        assert_eq!(frame(b"").unwrap(), b"\\");
    }

    #[test]
    fn frame_rejects_sentinel_in_payload()
    {
        let error = frame(b"a\\b").expect_err("sentinel must be rejected");
        assert!(matches!(error, StegoError::SentinelInPayload { position: 1 }));
    }

    #[test]
    fn interval_is_deterministic()
    {
        assert_eq!(compute_interval(1000, 4), 250);
        assert_eq!(compute_interval(1000, 4), compute_interval(1000, 4));
    }

    #[test]
    fn interval_wraps_at_255()
    {
        assert_eq!(compute_interval(256 * 4, 4), 1);
        assert_eq!(compute_interval(255 * 4, 4), 0);
        assert_eq!(compute_interval(300, 1), 45);
    }

    #[test]
    fn strided_plan_keeps_sentinel_inside_the_image()
    {
        let layout = Strided.plan(1000, 4).expect("message should fit");
        assert_eq!(layout.header, Some(250));

        let starts: Vec<_> = layout.starts(1000).take(4).collect();
        assert_eq!(starts, [2, 252, 502, 752]);
    }

    #[test]
    fn strided_rejects_half_of_the_pairs()
    {
        // 10x10 image, 49 message bytes plus sentinel
        let error = Strided.plan(100, 50).expect_err("must not fit");
        assert!(matches!(
            error,
            StegoError::CapacityExceeded {
                requested_bytes: 49,
                available_bytes: 48
            }
        ));

        assert!(Strided.plan(100, 49).is_ok());
    }

    #[test]
    fn strided_rejects_wrapped_intervals()
    {
        let error = Strided.plan(255 * 4, 4).expect_err("interval wraps to 0");
        assert!(matches!(
            error,
            StegoError::DegenerateInterval { interval: 0 }
        ));

        let error = Strided.plan(256 * 4, 4).expect_err("interval wraps to 1");
        assert!(matches!(
            error,
            StegoError::DegenerateInterval { interval: 1 }
        ));
    }

    #[test]
    fn strided_rejects_layout_overflowing_the_image()
    {
        // interval 3 with 4 bytes needs starts 2, 5, 8 and 11 in a 12 pixel
        // image, the last pair would need pixel 12
        let error = Strided.plan(12, 4).expect_err("last pair overflows");
        assert!(matches!(
            error,
            StegoError::LayoutOverflow {
                interval: 3,
                framed_bytes: 4,
                pixel_count: 12
            }
        ));
    }

    #[test]
    fn overflow_below_capacity_is_not_a_capacity_error()
    {
        // a 1x12 image advertises 4 bytes but 3 bytes land at interval 3
        assert_eq!(Strided.capacity(12), 4);
        assert!(matches!(
            Strided.plan(12, 4),
            Err(StegoError::LayoutOverflow { interval: 3, .. })
        ));
        assert!(Strided.plan(12, 5).is_ok());

        // 1x6 with a single byte hits the same layout
        assert!(matches!(
            Strided.plan(6, 2),
            Err(StegoError::LayoutOverflow { interval: 3, .. })
        ));
    }

    #[test]
    fn strided_only_reports_capacity_errors_above_capacity()
    {
        for pixel_count in 4..600
        {
            let capacity = Strided.capacity(pixel_count);
            for framed_len in 1..=capacity + 1
            {
                assert!(
                    !matches!(
                        Strided.plan(pixel_count, framed_len),
                        Err(StegoError::CapacityExceeded { .. })
                    ),
                    "{framed_len} framed bytes in {pixel_count} pixels"
                );
            }
            assert!(matches!(
                Strided.plan(pixel_count, capacity + 2),
                Err(StegoError::CapacityExceeded { .. })
            ));
        }
    }

    #[test]
    fn dense_layout_is_consecutive()
    {
        let layout = Dense.plan(9, 4).expect("four pairs fit in nine pixels");
        assert_eq!(layout.header, None);
        assert_eq!(layout.starts(9).collect::<Vec<_>>(), [0, 2, 4, 6]);
    }

    #[test]
    fn dense_rejects_long_messages()
    {
        assert_eq!(Dense.capacity(100), 49);
        assert!(Dense.plan(100, 50).is_ok());
        assert!(matches!(
            Dense.plan(100, 51),
            Err(StegoError::CapacityExceeded {
                requested_bytes: 50,
                available_bytes: 49
            })
        ));
    }

    #[test]
    fn strategy_defaults_to_strided()
    {
        assert_eq!(Strategy::default(), Strategy::Strided);
    }
}
