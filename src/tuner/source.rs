//! Register Source
//!
//! The boundary between the tuning/decoding logic and whatever owns the
//! tuner's registers: the I2C driver itself, a shared cache fed by a
//! polling task, or a simulated chip in tests.

use crate::tuner::registers::{Register, RegisterFile};

/// Access to the tuner's sixteen registers
///
/// `write` is read-modify-write: every writable register other than
/// `reg` keeps its current hardware value.
#[allow(async_fn_in_trait)]
pub trait RegisterSource {
    /// Transport error
    type Error;

    /// Latest full register snapshot
    async fn read_snapshot(&mut self) -> Result<RegisterFile, Self::Error>;

    /// Write one register in the 0x02..=0x07 window
    async fn write(&mut self, reg: Register, value: u16) -> Result<(), Self::Error>;
}

impl<S: RegisterSource> RegisterSource for &mut S {
    type Error = S::Error;

    async fn read_snapshot(&mut self) -> Result<RegisterFile, Self::Error> {
        S::read_snapshot(self).await
    }

    async fn write(&mut self, reg: Register, value: u16) -> Result<(), Self::Error> {
        S::write(self, reg, value).await
    }
}
