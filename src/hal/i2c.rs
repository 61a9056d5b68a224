//! I2C Bus Abstractions
//!
//! Thin async wrapper over any `embedded-hal-async` I2C bus. On the
//! target this is the embassy-stm32 DMA driver; on the host it is a
//! simulated device.

use embedded_hal_async::i2c::I2c;

/// I2C operation result
pub type I2cResult<T, E> = Result<T, E>;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Si4703 FM tuner address
    pub const SI4703: Self = Self(crate::config::SI4703_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// I2C bus wrapper owning the peripheral
pub struct I2cBus<B> {
    i2c: B,
}

impl<B: I2c> I2cBus<B> {
    /// Create a new I2C bus wrapper
    #[must_use]
    pub const fn new(i2c: B) -> Self {
        Self { i2c }
    }

    /// Write bytes to a device
    pub async fn write(&mut self, addr: I2cAddress, data: &[u8]) -> I2cResult<(), B::Error> {
        self.i2c.write(addr.addr(), data).await
    }

    /// Read bytes from a device
    pub async fn read(&mut self, addr: I2cAddress, buffer: &mut [u8]) -> I2cResult<(), B::Error> {
        self.i2c.read(addr.addr(), buffer).await
    }

    /// Give the peripheral back
    pub fn release(self) -> B {
        self.i2c
    }
}
