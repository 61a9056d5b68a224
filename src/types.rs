//! Shared types used across the receiver
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::rds::tables;

/// FM broadcast frequency with validation
///
/// Represents a frequency inside the receivable broadcast band.
/// The frequency is stored in kHz so channel arithmetic stays exact.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FmFrequency(u32);

impl FmFrequency {
    /// Bottom of the band (87.5 MHz)
    pub const MIN_KHZ: u32 = 87_500;

    /// Top of the band (107.9 MHz)
    pub const MAX_KHZ: u32 = 107_900;

    /// Tuner channel spacing (200 kHz, North American grid)
    pub const CHANNEL_SPACING_KHZ: u32 = 200;

    /// Lowest tunable frequency
    pub const MIN: Self = Self(Self::MIN_KHZ);

    /// Highest tunable frequency
    pub const MAX: Self = Self(Self::MAX_KHZ);

    /// Create a new frequency from kHz, returns None if out of band
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        if khz >= Self::MIN_KHZ && khz <= Self::MAX_KHZ {
            Some(Self(khz))
        } else {
            None
        }
    }

    /// Create a new frequency from MHz, returns None if out of band
    ///
    /// Both band edges are inclusive. NaN is rejected.
    #[must_use]
    pub fn from_mhz(mhz: f32) -> Option<Self> {
        if !(87.5..=107.9).contains(&mhz) {
            return None;
        }
        let khz = (mhz * 1000.0).round() as u32;
        Self::from_khz(khz.clamp(Self::MIN_KHZ, Self::MAX_KHZ))
    }

    /// Frequency of a tuner channel code
    #[must_use]
    pub const fn from_channel(channel: ChannelCode) -> Option<Self> {
        Self::from_khz(Self::MIN_KHZ + channel.0 as u32 * Self::CHANNEL_SPACING_KHZ)
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0
    }

    /// Get the frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Nearest tuner channel: round((f - 87.5 MHz) / 200 kHz)
    #[must_use]
    pub const fn channel(self) -> ChannelCode {
        let offset = self.0 - Self::MIN_KHZ;
        ChannelCode(((offset + Self::CHANNEL_SPACING_KHZ / 2) / Self::CHANNEL_SPACING_KHZ) as u16)
    }

    /// Next channel up, wrapping from the top of the band to the bottom
    #[must_use]
    pub const fn next_channel(self) -> Self {
        let khz = self.0 + Self::CHANNEL_SPACING_KHZ;
        if khz > Self::MAX_KHZ {
            Self::MIN
        } else {
            Self(khz)
        }
    }

    /// Next channel down, wrapping from the bottom of the band to the top
    #[must_use]
    pub const fn prev_channel(self) -> Self {
        if self.0 < Self::MIN_KHZ + Self::CHANNEL_SPACING_KHZ {
            Self::MAX
        } else {
            Self(self.0 - Self::CHANNEL_SPACING_KHZ)
        }
    }
}

impl fmt::Debug for FmFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FmFrequency({} kHz)", self.0)
    }
}

impl fmt::Display for FmFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} MHz", self.0 / 1000, (self.0 % 1000) / 100)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FmFrequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{} MHz", self.0 / 1000, (self.0 % 1000) / 100);
    }
}

/// Tuner channel number (9 bits on the wire)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChannelCode(u16);

impl ChannelCode {
    /// Channel field mask in the CHANNEL and READCHAN registers
    pub const MASK: u16 = 0x01FF;

    /// Create from a raw register value (upper bits are discarded)
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Get the raw channel number
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ch{}", self.0);
    }
}

/// One RDS group: four 16-bit information words
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RawGroup {
    /// Block A: program identification
    pub a: u16,
    /// Block B: group type, version, TP, PTY and type-specific bits
    pub b: u16,
    /// Block C: type-dependent payload
    pub c: u16,
    /// Block D: type-dependent payload
    pub d: u16,
}

impl RawGroup {
    /// Create a group from its four blocks
    #[must_use]
    pub const fn new(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self { a, b, c, d }
    }

    /// Group type from the top four bits of block B
    #[must_use]
    pub const fn group_type(&self) -> GroupType {
        GroupType((self.b >> 12) as u8)
    }

    /// Version from bit 11 of block B
    #[must_use]
    pub const fn version(&self) -> Version {
        if self.b & 0x0800 == 0 {
            Version::A
        } else {
            Version::B
        }
    }

    /// Program type from bits 5..9 of block B
    #[must_use]
    pub const fn program_type(&self) -> ProgramType {
        ProgramType(((self.b >> 5) & 0x1F) as u8)
    }

    /// Traffic program flag
    #[must_use]
    pub const fn traffic_program(&self) -> bool {
        self.b & 0x0020 != 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RawGroup {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{:04X} {:04X} {:04X} {:04X}",
            self.a,
            self.b,
            self.c,
            self.d
        );
    }
}

/// RDS group type (0-15)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupType(u8);

impl GroupType {
    /// Basic tuning and switching information
    pub const BASIC_TUNING: Self = Self(0);

    /// Program item number and slow labeling codes
    pub const PROGRAM_ITEM: Self = Self(1);

    /// Radiotext
    pub const RADIOTEXT: Self = Self(2);

    /// Application identification for open data
    pub const ODA_ID: Self = Self(3);

    /// Create from a raw number, returns None above 15
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value < 16 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the group number
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Descriptive name for this group type and version
    #[must_use]
    pub fn name(self, version: Version) -> &'static str {
        tables::group_type_name(self, version)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for GroupType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.0);
    }
}

/// RDS group version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Version {
    /// Version A: block C carries payload
    #[default]
    A,
    /// Version B: block C repeats the PI code
    B,
}

impl Version {
    /// Version letter
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Version {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::A => defmt::write!(f, "A"),
            Self::B => defmt::write!(f, "B"),
        }
    }
}

/// Program type code (0-31)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ProgramType(u8);

impl ProgramType {
    /// Create from a raw code (upper bits are discarded)
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        Self(code & 0x1F)
    }

    /// Get the raw code
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Human-readable program type for a region
    #[must_use]
    pub fn name(self, region: PtyRegion) -> &'static str {
        tables::program_type_name(self, region)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ProgramType {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PTY{}", self.0);
    }
}

/// Which program type table applies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PtyRegion {
    /// RBDS (United States / Canada)
    #[default]
    NorthAmerica,
    /// RDS (Europe)
    Europe,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PtyRegion {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NorthAmerica => defmt::write!(f, "RBDS"),
            Self::Europe => defmt::write!(f, "RDS"),
        }
    }
}
