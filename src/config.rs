//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the receiver hardware.
//! Pin mappings, bus parameters and tuning timings are centralized here.

use crate::types::{FmFrequency, PtyRegion};

/// I2C bus frequency for the Si4703
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Si4703 I2C address (fixed by the part)
pub const SI4703_I2C_ADDR: u8 = 0x10;

/// Register snapshot period.
///
/// RDS data appears roughly every 88 ms and the RDS-ready bit stays
/// asserted for at least 40 ms, so sampling at 40 ms never misses a group.
pub const REGISTER_POLL_PERIOD_MS: u64 = 40;

/// Deadline for the tune-complete handshake
pub const TUNE_DEADLINE_MS: u32 = 5_000;

/// Interval between status reads while waiting for tune-complete
pub const TUNE_POLL_INTERVAL_MS: u32 = 100;

/// Reset line hold time (low, then high) during power-on
pub const RESET_HOLD_MS: u64 = 100;

/// Crystal oscillator start-up time after XOSCEN
pub const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Delay before setting ENABLE when coming out of shutdown (1.5 ms)
pub const ENABLE_DELAY_US: u32 = 1_500;

/// Settling time after the device is enabled
pub const POWER_UP_SETTLE_MS: u32 = 100;

/// Default startup frequency in kHz
pub const DEFAULT_FREQUENCY_KHZ: u32 = 88_500;

/// Default volume (0-31, 0 = muted level, 31 = loudest)
pub const DEFAULT_VOLUME: u8 = 15;

/// Program type table used for display
pub const DEFAULT_PTY_REGION: PtyRegion = PtyRegion::NorthAmerica;

/// Alternate-frequency code base (87.5 MHz)
pub const AF_BASE_KHZ: u32 = 87_500;

/// Alternate-frequency code step (100 kHz)
pub const AF_STEP_KHZ: u32 = 100;

/// Maximum number of alternate frequencies retained per station
pub const MAX_ALT_FREQUENCIES: usize = 32;

/// Maximum number of open-data-application tables retained
pub const MAX_ODA_TABLES: usize = 8;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Si4703 reset line (active low)
    pub const TUNER_RESET: &str = "PA8";

    /// I2C1 SCL (Si4703)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (Si4703, also SDIO mode select during reset)
    pub const I2C1_SDA: &str = "PB9";
}

/// DMA channel assignments
pub mod dma {
    //! DMA channel assignments for zero-copy transfers

    /// I2C1 TX DMA channel
    pub const I2C1_TX: u8 = 1;

    /// I2C1 RX DMA channel
    pub const I2C1_RX: u8 = 2;
}

/// Build the default startup frequency
#[must_use]
pub const fn default_frequency() -> Option<FmFrequency> {
    FmFrequency::from_khz(DEFAULT_FREQUENCY_KHZ)
}
