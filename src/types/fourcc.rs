//! Four-character codec tags

use std::fmt;
use std::str::FromStr;

use crate::core::error::MetaError;

/// A 32-bit four-character code such as `avc1` or `mp4a`
///
/// The first character occupies the least significant byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FourCc(u32);

impl FourCc {
    /// Wrap a raw tag value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Build a tag from its four characters
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Raw tag value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The four characters of the tag
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Compare against a character tag
    pub fn matches(self, tag: &[u8; 4]) -> bool {
        self.to_bytes() == *tag
    }
}

impl From<u32> for FourCc {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<FourCc> for u32 {
    fn from(fourcc: FourCc) -> Self {
        fourcc.0
    }
}

impl FromStr for FourCc {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s.as_bytes().try_into().map_err(|_| {
            MetaError::InvalidArgument(format!("fourcc must be 4 bytes, got {:?}", s))
        })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            for b in bytes {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08x}", self.0)
        }
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc({})", self)
    }
}
