//! `Si4703` FM Tuner Driver
//!
//! The `Si4703` has no register pointer on its 2-wire interface. Every
//! read returns all sixteen registers starting at STATUSRSSI, and every
//! write covers POWERCFG through TEST1. Single-register updates are
//! therefore read-modify-write against a fresh read.
//!
//! The reset line and SDIO mode-select are handled by the caller before
//! the bus is brought up.

use core::fmt;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{ENABLE_DELAY_US, OSCILLATOR_SETTLE_MS, POWER_UP_SETTLE_MS};
use crate::hal::i2c::{I2cAddress, I2cBus};
use crate::tuner::registers::{bits, Register, RegisterError, RegisterFile, READ_BURST_LEN};
use crate::tuner::source::RegisterSource;

/// Highest volume step (VOLEXT clear, volume 15)
pub const MAX_VOLUME: u8 = 31;

/// Driver error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Si4703Error<E> {
    /// Bus transfer failed
    I2c(E),
    /// Register cannot be written
    Register(RegisterError),
}

impl<E> From<RegisterError> for Si4703Error<E> {
    fn from(e: RegisterError) -> Self {
        Self::Register(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Si4703Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::Register(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<E: defmt::Format> defmt::Format for Si4703Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::I2c(e) => defmt::write!(f, "I2c({})", e),
            Self::Register(e) => defmt::write!(f, "{}", e),
        }
    }
}

type Result<T, E> = core::result::Result<T, Si4703Error<E>>;

/// `Si4703` driver
pub struct Si4703<B> {
    bus: I2cBus<B>,
    regs: RegisterFile,
}

impl<B: I2c> Si4703<B> {
    /// Wrap an I2C bus. No bus traffic until the first call.
    #[must_use]
    pub const fn new(i2c: B) -> Self {
        Self {
            bus: I2cBus::new(i2c),
            regs: RegisterFile::new(),
        }
    }

    /// Register values from the last read
    #[must_use]
    pub const fn registers(&self) -> RegisterFile {
        self.regs
    }

    /// Part number and manufacturer from the last read
    #[must_use]
    pub const fn device_id(&self) -> u16 {
        self.regs.get(Register::DeviceId)
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus.release()
    }

    /// Read all sixteen registers
    pub async fn read(&mut self) -> Result<RegisterFile, B::Error> {
        let mut burst = [0u8; READ_BURST_LEN];
        self.bus
            .read(I2cAddress::SI4703, &mut burst)
            .await
            .map_err(Si4703Error::I2c)?;
        self.regs = RegisterFile::from_read_burst(&burst);
        Ok(self.regs)
    }

    /// Set one writable register, keeping the others as the chip has them
    pub async fn set(&mut self, reg: Register, value: u16) -> Result<(), B::Error> {
        let current = self.read().await?;
        let burst = current.write_burst(reg, value)?;
        self.bus
            .write(I2cAddress::SI4703, &burst)
            .await
            .map_err(Si4703Error::I2c)?;
        self.read().await?;
        Ok(())
    }

    /// Start or stop the crystal oscillator
    pub async fn set_oscillator(&mut self, on: bool) -> Result<(), B::Error> {
        let value = if on { bits::XOSCEN } else { 0 };
        self.set(Register::TestAndOscillator, value).await
    }

    /// Power the receiver up (no-op if already enabled)
    pub async fn enable<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), B::Error> {
        let powercfg = self.regs.get(Register::PowerCfg);
        if powercfg & bits::ENABLE != 0 {
            return Ok(());
        }
        // Required when coming out of a previous disable
        delay.delay_us(ENABLE_DELAY_US).await;
        self.set(Register::PowerCfg, (powercfg | bits::ENABLE) & !bits::DISABLE)
            .await
    }

    /// Request power-down
    pub async fn disable(&mut self) -> Result<(), B::Error> {
        let powercfg = self.regs.get(Register::PowerCfg);
        self.set(Register::PowerCfg, powercfg | bits::DISABLE).await
    }

    /// Mute or unmute audio (DMUTE set means unmuted)
    pub async fn mute(&mut self, on: bool) -> Result<(), B::Error> {
        let powercfg = self.regs.get(Register::PowerCfg);
        let unmuted = powercfg & bits::DMUTE != 0;
        if on != unmuted {
            return Ok(());
        }
        let value = if on {
            powercfg & !bits::DMUTE
        } else {
            powercfg | bits::DMUTE
        };
        self.set(Register::PowerCfg, value).await
    }

    /// Turn RDS reception on or off
    pub async fn enable_rds(&mut self, on: bool) -> Result<(), B::Error> {
        let sysconfig1 = self.regs.get(Register::SysConfig1);
        let value = if on {
            sysconfig1 | bits::RDS
        } else {
            sysconfig1 & !bits::RDS
        };
        self.set(Register::SysConfig1, value).await
    }

    /// Set volume 0..=31 (clamped).
    ///
    /// Steps 0-15 use the extended (quieter) range, 16-31 the normal one.
    /// VOLEXT and the volume field are updated in the order that never
    /// passes through a louder setting than either endpoint.
    pub async fn set_volume(&mut self, volume: u8) -> Result<(), B::Error> {
        let volume = volume.min(MAX_VOLUME);
        let extended = self.regs.get(Register::SysConfig3) & bits::VOLEXT != 0;
        let want_extended = volume & 0x10 == 0;
        let level = u16::from(volume) & bits::VOLUME;

        match (extended, want_extended) {
            (true, false) => {
                self.write_volume_level(level).await?;
                let sysconfig3 = self.regs.get(Register::SysConfig3);
                self.set(Register::SysConfig3, sysconfig3 & !bits::VOLEXT).await
            }
            (false, true) => {
                let sysconfig3 = self.regs.get(Register::SysConfig3);
                self.set(Register::SysConfig3, sysconfig3 | bits::VOLEXT).await?;
                self.write_volume_level(level).await
            }
            _ => self.write_volume_level(level).await,
        }
    }

    /// Bring the chip from reset to a playing, RDS-enabled state
    pub async fn power_up<D: DelayNs>(&mut self, delay: &mut D, volume: u8) -> Result<(), B::Error> {
        self.read().await?;
        info!("Si4703 device id {:04X}", self.device_id());

        self.set_oscillator(true).await?;
        delay.delay_ms(OSCILLATOR_SETTLE_MS).await;

        self.enable(delay).await?;
        self.mute(false).await?;
        delay.delay_ms(POWER_UP_SETTLE_MS).await;

        self.enable_rds(true).await?;
        self.set_volume(volume).await?;
        info!("Si4703 powered up");
        Ok(())
    }

    async fn write_volume_level(&mut self, level: u16) -> Result<(), B::Error> {
        let sysconfig2 = self.regs.get(Register::SysConfig2);
        self.set(Register::SysConfig2, (sysconfig2 & !bits::VOLUME) | level)
            .await
    }
}

impl<B: I2c> RegisterSource for Si4703<B> {
    type Error = Si4703Error<B::Error>;

    async fn read_snapshot(&mut self) -> core::result::Result<RegisterFile, Self::Error> {
        self.read().await
    }

    async fn write(&mut self, reg: Register, value: u16) -> core::result::Result<(), Self::Error> {
        self.set(reg, value).await
    }
}
