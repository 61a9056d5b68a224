//! Si4703 Register File
//!
//! The tuner exposes sixteen 16-bit registers. The I2C read burst starts
//! at STATUSRSSI (0x0A) and wraps, and the write burst always covers
//! POWERCFG through OSCILLATOR (0x02..=0x07). [`RegisterFile`] hides both
//! quirks so everything else addresses registers by name.

use core::fmt;

use crate::types::{ChannelCode, RawGroup};

/// Number of registers
pub const REGISTER_COUNT: usize = 16;

/// Bytes in a full read burst
pub const READ_BURST_LEN: usize = REGISTER_COUNT * 2;

/// First register in the read burst
pub const READ_BURST_START: usize = 0x0A;

/// First writable register
pub const WRITE_FIRST: usize = 0x02;

/// Last writable register
pub const WRITE_LAST: usize = 0x07;

/// Bytes in a write burst
pub const WRITE_BURST_LEN: usize = (WRITE_LAST - WRITE_FIRST + 1) * 2;

/// Named Si4703 registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Part and manufacturer ID
    DeviceId = 0x00,
    /// Chip revision
    ChipId = 0x01,
    /// Power configuration (mute, enable)
    PowerCfg = 0x02,
    /// Channel select and TUNE
    Channel = 0x03,
    /// RDS enable, interrupts
    SysConfig1 = 0x04,
    /// Seek threshold, band, spacing, volume
    SysConfig2 = 0x05,
    /// Extended volume range
    SysConfig3 = 0x06,
    /// Crystal oscillator enable
    TestAndOscillator = 0x07,
    /// Reserved
    Boot = 0x08,
    /// Reserved
    Reserved9 = 0x09,
    /// RDS ready, seek/tune complete, stereo, RSSI
    StatusRssi = 0x0A,
    /// Current channel
    ReadChan = 0x0B,
    /// RDS block A
    RdsA = 0x0C,
    /// RDS block B
    RdsB = 0x0D,
    /// RDS block C
    RdsC = 0x0E,
    /// RDS block D
    RdsD = 0x0F,
}

impl Register {
    /// Register number
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Only 0x02..=0x07 may be written
    #[must_use]
    pub const fn is_writable(self) -> bool {
        let i = self.index();
        i >= WRITE_FIRST && i <= WRITE_LAST
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Register {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "reg{=u8:02X}", *self as u8);
    }
}

/// Register bit fields
pub mod bits {
    /// POWERCFG: disable soft mute
    pub const DSMUTE: u16 = 0x8000;
    /// POWERCFG: disable mute
    pub const DMUTE: u16 = 0x4000;
    /// POWERCFG: power-down request
    pub const DISABLE: u16 = 0x0040;
    /// POWERCFG: power-up enable
    pub const ENABLE: u16 = 0x0001;

    /// CHANNEL: start tuning
    pub const TUNE: u16 = 0x8000;

    /// SYSCONFIG1: RDS enable
    pub const RDS: u16 = 0x1000;

    /// SYSCONFIG2: volume field
    pub const VOLUME: u16 = 0x000F;

    /// SYSCONFIG3: extended volume range (-30 dB)
    pub const VOLEXT: u16 = 0x0100;

    /// TEST1: crystal oscillator on, plus the reserved bit the datasheet
    /// requires when XOSCEN is set
    pub const XOSCEN: u16 = 0x8100;

    /// STATUSRSSI: RDS group ready
    pub const RDSR: u16 = 0x8000;
    /// STATUSRSSI: seek/tune complete
    pub const STC: u16 = 0x4000;
    /// STATUSRSSI: stereo indicator
    pub const STEREO: u16 = 0x0010;
    /// STATUSRSSI: RSSI field
    pub const RSSI: u16 = 0x00FF;
}

/// Register access error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// Register is outside the write window
    ReadOnly(Register),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly(reg) => write!(f, "register {:#04x} is read-only", reg.index()),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegisterError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ReadOnly(reg) => defmt::write!(f, "ReadOnly({})", reg),
        }
    }
}

/// Snapshot of all sixteen registers, addressed by register number
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterFile([u16; REGISTER_COUNT]);

impl RegisterFile {
    /// All-zero register file
    #[must_use]
    pub const fn new() -> Self {
        Self([0; REGISTER_COUNT])
    }

    /// Build from words already in register order
    #[must_use]
    pub const fn from_words(words: [u16; REGISTER_COUNT]) -> Self {
        Self(words)
    }

    /// Decode a raw read burst, which starts at register 0x0A and wraps
    #[must_use]
    pub fn from_read_burst(burst: &[u8; READ_BURST_LEN]) -> Self {
        let mut words = [0u16; REGISTER_COUNT];
        for (i, pair) in burst.chunks_exact(2).enumerate() {
            words[(i + READ_BURST_START) % REGISTER_COUNT] = u16::from_be_bytes([pair[0], pair[1]]);
        }
        Self(words)
    }

    /// Encode in read-burst order (used by simulated devices)
    #[must_use]
    pub fn to_read_burst(&self) -> [u8; READ_BURST_LEN] {
        let mut burst = [0u8; READ_BURST_LEN];
        for (i, pair) in burst.chunks_exact_mut(2).enumerate() {
            pair.copy_from_slice(&self.0[(i + READ_BURST_START) % REGISTER_COUNT].to_be_bytes());
        }
        burst
    }

    /// Read a register
    #[must_use]
    pub const fn get(&self, reg: Register) -> u16 {
        self.0[reg.index()]
    }

    /// Copy with one register replaced
    #[must_use]
    pub const fn with(mut self, reg: Register, value: u16) -> Self {
        self.0[reg.index()] = value;
        self
    }

    /// Replace one register in place
    pub fn set(&mut self, reg: Register, value: u16) {
        self.0[reg.index()] = value;
    }

    /// All registers in order
    #[must_use]
    pub const fn words(&self) -> &[u16; REGISTER_COUNT] {
        &self.0
    }

    /// Write burst for registers 0x02..=0x07 with `reg` set to `value` and
    /// every other register carried over from this snapshot
    pub fn write_burst(&self, reg: Register, value: u16) -> Result<[u8; WRITE_BURST_LEN], RegisterError> {
        if !reg.is_writable() {
            return Err(RegisterError::ReadOnly(reg));
        }
        let updated = self.with(reg, value);
        let mut burst = [0u8; WRITE_BURST_LEN];
        for (pair, word) in burst.chunks_exact_mut(2).zip(&updated.0[WRITE_FIRST..=WRITE_LAST]) {
            pair.copy_from_slice(&word.to_be_bytes());
        }
        Ok(burst)
    }

    /// RDS group ready
    #[must_use]
    pub const fn rds_ready(&self) -> bool {
        self.get(Register::StatusRssi) & bits::RDSR != 0
    }

    /// Seek/tune complete
    #[must_use]
    pub const fn tune_complete(&self) -> bool {
        self.get(Register::StatusRssi) & bits::STC != 0
    }

    /// Stereo pilot detected
    #[must_use]
    pub const fn stereo(&self) -> bool {
        self.get(Register::StatusRssi) & bits::STEREO != 0
    }

    /// Received signal strength (dBuV)
    #[must_use]
    pub const fn rssi(&self) -> u8 {
        (self.get(Register::StatusRssi) & bits::RSSI) as u8
    }

    /// Channel the tuner reports
    #[must_use]
    pub const fn read_channel(&self) -> ChannelCode {
        ChannelCode::from_bits(self.get(Register::ReadChan))
    }

    /// RDS blocks A-D as a group
    #[must_use]
    pub const fn raw_group(&self) -> RawGroup {
        RawGroup::new(
            self.get(Register::RdsA),
            self.get(Register::RdsB),
            self.get(Register::RdsC),
            self.get(Register::RdsD),
        )
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RegisterFile[")?;
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word:04X}")?;
        }
        f.write_str("]")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegisterFile {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RegisterFile[");
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " ");
            }
            defmt::write!(f, "{=u16:04X}", *word);
        }
        defmt::write!(f, "]");
    }
}
