//! Single-bit access to the least significant bit of a channel value.
//!
//! Only bit 0 of a channel is ever inspected or modified.

/// Writes the lowest bit of `source` into the lowest bit of `channel`.
///
/// Returns the updated channel together with `source` shifted right by one,
/// so that the next call sees the next higher bit.
#[must_use]
pub const fn write_bit(channel: u8, source: u8) -> (u8, u8)
{
    let wanted = source & 1;
    let current = channel & 1;
    let channel = if wanted == current { channel } else { channel ^ 1 };

    (channel, source >> 1)
}

/// Shifts `accumulator` left by one and appends the lowest bit of `channel`.
///
/// Reading is the mirror of [`write_bit`]: the bit written last has to be read
/// first.
#[must_use]
pub const fn read_bit(channel: u8, accumulator: u8) -> u8
{
    (accumulator << 1) | (channel & 1)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn write_bit_only_touches_bit_zero()
    {
        assert_eq!(write_bit(0b1010_1010, 1), (0b1010_1011, 0));
        assert_eq!(write_bit(0b1010_1011, 0), (0b1010_1010, 0));
        // already matching, nothing changes
        assert_eq!(write_bit(0xFF, 1), (0xFF, 0));
        assert_eq!(write_bit(0x00, 0), (0x00, 0));
    }

    #[test]
    fn write_bit_advances_the_source()
    {
        let (_, rest) = write_bit(0, 0b1000_0001);
        assert_eq!(rest, 0b0100_0000);
    }

    #[test]
    fn read_bit_accumulates_msb_first()
    {
        let mut value = 0;
        for channel in [1, 0, 1, 0, 0, 1, 0, 1]
        {
            value = read_bit(channel, value);
        }
        assert_eq!(value, 0xA5);
    }

    #[test]
    fn read_bit_ignores_upper_channel_bits()
    {
        assert_eq!(read_bit(0xFE, 0), 0);
        assert_eq!(read_bit(0xFF, 0), 1);
    }
}
