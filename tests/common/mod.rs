//! Host-side test doubles: a simulated Si4703 on an I2C bus, a delay that
//! only counts, and a scripted register source.
#![allow(dead_code)]

use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

use rds_tuner::tuner::registers::{bits, READ_BURST_LEN, WRITE_BURST_LEN, WRITE_FIRST};
use rds_tuner::tuner::{Register, RegisterFile, RegisterSource};
use rds_tuner::types::RawGroup;

// ============================================================================
// Simulated Si4703
// ============================================================================

/// Simulated chip behind an I2C bus
#[derive(Debug, Default)]
pub struct SimulatedSi4703 {
    pub regs: RegisterFile,
    /// Set STC as soon as TUNE is written
    pub completes_tune: bool,
    /// Fail every transfer
    pub fail: bool,
    pub reads: usize,
    /// Every write burst received, decoded to registers 2..=7
    pub writes: Vec<[u16; 6]>,
    pub last_address: Option<u8>,
}

impl SimulatedSi4703 {
    pub fn new() -> Self {
        Self {
            regs: RegisterFile::new().with(Register::DeviceId, 0x1242),
            completes_tune: true,
            ..Self::default()
        }
    }

    fn apply_write(&mut self, bytes: &[u8]) {
        let mut words = [0u16; 6];
        for (i, pair) in bytes.chunks_exact(2).enumerate() {
            words[i] = u16::from_be_bytes([pair[0], pair[1]]);
        }
        self.writes.push(words);

        let mut all = *self.regs.words();
        all[WRITE_FIRST..WRITE_FIRST + 6].copy_from_slice(&words);
        let mut regs = RegisterFile::from_words(all);

        let channel = regs.get(Register::Channel);
        let status = regs.get(Register::StatusRssi);
        if channel & bits::TUNE != 0 {
            if self.completes_tune {
                regs.set(Register::StatusRssi, status | bits::STC);
                regs.set(Register::ReadChan, channel & 0x01FF);
            }
        } else {
            regs.set(Register::StatusRssi, status & !bits::STC);
        }
        self.regs = regs;
    }
}

impl ErrorType for SimulatedSi4703 {
    type Error = ErrorKind;
}

impl I2c for SimulatedSi4703 {
    async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.last_address = Some(address);
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    assert_eq!(buf.len(), READ_BURST_LEN);
                    self.reads += 1;
                    buf.copy_from_slice(&self.regs.to_read_burst());
                }
                Operation::Write(bytes) => {
                    assert_eq!(bytes.len(), WRITE_BURST_LEN);
                    self.apply_write(bytes);
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Counting delay
// ============================================================================

/// Delay that returns immediately and records how long it was asked to wait
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub elapsed_ns: u64,
}

impl CountingDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

// ============================================================================
// Scripted register source
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockError;

/// Register source with scripted STC behavior
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub regs: RegisterFile,
    pub writes: Vec<(Register, u16)>,
    pub reads: usize,
    /// Assert STC once this many reads have happened after a TUNE write
    pub stc_after_reads: Option<usize>,
    pub fail_writes: bool,
    reads_since_tune: usize,
}

impl ScriptedSource {
    pub fn never_completes() -> Self {
        Self::default()
    }

    pub fn completes_after(reads: usize) -> Self {
        Self {
            stc_after_reads: Some(reads),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: RawGroup) -> Self {
        self.regs = self
            .regs
            .with(Register::RdsA, group.a)
            .with(Register::RdsB, group.b)
            .with(Register::RdsC, group.c)
            .with(Register::RdsD, group.d);
        self
    }
}

impl RegisterSource for ScriptedSource {
    type Error = MockError;

    async fn read_snapshot(&mut self) -> Result<RegisterFile, Self::Error> {
        self.reads += 1;
        if self.regs.get(Register::Channel) & bits::TUNE != 0 {
            self.reads_since_tune += 1;
            if self.stc_after_reads.is_some_and(|n| self.reads_since_tune >= n) {
                let status = self.regs.get(Register::StatusRssi);
                self.regs.set(Register::StatusRssi, status | bits::STC);
            }
        }
        Ok(self.regs)
    }

    async fn write(&mut self, reg: Register, value: u16) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError);
        }
        self.writes.push((reg, value));
        self.regs.set(reg, value);
        if reg == Register::Channel && value & bits::TUNE == 0 {
            let status = self.regs.get(Register::StatusRssi);
            self.regs.set(Register::StatusRssi, status & !bits::STC);
            self.reads_since_tune = 0;
        }
        Ok(())
    }
}
