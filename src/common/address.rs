use core::ops::RangeInclusive;
use core::str::FromStr;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressError {
    Short(u8),
    Group(u8),
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        match self {
            AddressError::Short(a) => {
                write!(fmt, "Short address {} out of range. 0 <= addr <= 63", a)
            }
            AddressError::Group(g) => write!(fmt, "Group {} out of range. 0 <= group <= 15", g),
        }
    }
}

impl std::error::Error for AddressError {}

/// DALI short address, 0..64
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Short(u8);

impl Short {
    pub const RANGE: RangeInclusive<u8> = 0..=63;

    pub fn new(a: u8) -> Short {
        assert!(a < 64);
        Short(a)
    }

    /// Address 0..64
    pub fn value(&self) -> u8 {
        self.0
    }

    /// All short addresses in ascending order
    pub fn all() -> impl Iterator<Item = Short> {
        Self::RANGE.map(Short)
    }
}

impl TryFrom<u8> for Short {
    type Error = AddressError;
    fn try_from(a: u8) -> Result<Self, Self::Error> {
        if Self::RANGE.contains(&a) {
            Ok(Short(a))
        } else {
            Err(AddressError::Short(a))
        }
    }
}

impl From<Short> for u8 {
    fn from(a: Short) -> u8 {
        a.0
    }
}

impl std::fmt::Display for Short {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, fmt)
    }
}

impl FromStr for Short {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Anything that is not a small number is reported as the largest invalid address
        u8::from_str(s.trim()).map_or(Err(AddressError::Short(u8::MAX)), Short::try_from)
    }
}

/// Broadcast group G0..G15
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(u8);

impl Group {
    pub const RANGE: RangeInclusive<u8> = 0..=15;

    pub fn new(g: u8) -> Group {
        assert!(g < 16);
        Group(g)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub(crate) fn bit(&self) -> u16 {
        1u16 << self.0
    }
}

impl TryFrom<u8> for Group {
    type Error = AddressError;
    fn try_from(g: u8) -> Result<Self, Self::Error> {
        if Self::RANGE.contains(&g) {
            Ok(Group(g))
        } else {
            Err(AddressError::Group(g))
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        write!(fmt, "G{}", self.0)
    }
}

impl FromStr for Group {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('G')
            .or_else(|| s.strip_prefix('g'))
            .unwrap_or(s);
        u8::from_str(digits).map_or(Err(AddressError::Group(u8::MAX)), Group::try_from)
    }
}
