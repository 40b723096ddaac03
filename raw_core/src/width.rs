use std::fmt;

use crate::error::SampleError;

/// Number of bytes per sample in a raw big-endian stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    One,
    Two,
    Four,
}

impl SampleWidth {
    /// Every width the sample layer understands, narrowest first.
    pub const ALL: [SampleWidth; 3] = [SampleWidth::One, SampleWidth::Two, SampleWidth::Four];

    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::One => 1,
            SampleWidth::Two => 2,
            SampleWidth::Four => 4,
        }
    }

    /// Largest sample value representable in this width.
    #[inline]
    pub fn max_value(self) -> u32 {
        match self {
            SampleWidth::One => u8::MAX as u32,
            SampleWidth::Two => u16::MAX as u32,
            SampleWidth::Four => u32::MAX,
        }
    }
}

impl TryFrom<u8> for SampleWidth {
    type Error = SampleError;

    fn try_from(bytes: u8) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(SampleWidth::One),
            2 => Ok(SampleWidth::Two),
            4 => Ok(SampleWidth::Four),
            other => Err(SampleError::UnsupportedWidth(other)),
        }
    }
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}
