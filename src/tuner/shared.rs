//! Shared Register Cache
//!
//! One task samples the tuner on a fixed period; others read the latest
//! snapshot or wait for a fresh one. The underlying source is guarded by a
//! single async mutex, snapshots are published by copy, and the "fresh
//! snapshot" notification is a single-slot signal that overwrites itself,
//! so at most one unread notification is ever pending.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::tuner::registers::{Register, RegisterFile};
use crate::tuner::source::RegisterSource;

/// Register source shared between a polling task and its consumers
pub struct SharedRegisters<M: RawMutex, S> {
    source: Mutex<M, S>,
    latest: BlockingMutex<M, Cell<RegisterFile>>,
    fresh: Signal<M, ()>,
    polling: AtomicBool,
}

impl<M: RawMutex, S: RegisterSource> SharedRegisters<M, S> {
    /// Wrap a source. Polling starts enabled.
    pub const fn new(source: S) -> Self {
        Self {
            source: Mutex::new(source),
            latest: BlockingMutex::new(Cell::new(RegisterFile::new())),
            fresh: Signal::new(),
            polling: AtomicBool::new(true),
        }
    }

    /// Read the source, publish the snapshot and raise the notification
    pub async fn refresh(&self) -> Result<RegisterFile, S::Error> {
        let snapshot = {
            let mut source = self.source.lock().await;
            source.read_snapshot().await?
        };
        self.publish(snapshot);
        Ok(snapshot)
    }

    /// Write a register, then publish the post-write snapshot
    pub async fn write(&self, reg: Register, value: u16) -> Result<(), S::Error> {
        let snapshot = {
            let mut source = self.source.lock().await;
            source.write(reg, value).await?;
            source.read_snapshot().await?
        };
        self.publish(snapshot);
        Ok(())
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> RegisterFile {
        self.latest.lock(Cell::get)
    }

    /// Wait for the next notification, then return the latest snapshot
    pub async fn wait_fresh(&self) -> RegisterFile {
        self.fresh.wait().await;
        self.latest()
    }

    /// Consume a pending notification without waiting
    pub fn try_fresh(&self) -> Option<RegisterFile> {
        self.fresh.try_take().map(|()| self.latest())
    }

    /// Pause or resume the periodic poller
    pub fn set_polling(&self, enabled: bool) {
        self.polling.store(enabled, Ordering::Relaxed);
    }

    /// Whether the periodic poller is sampling
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Relaxed)
    }

    /// Sample the source forever on the configured period
    #[cfg(feature = "embedded")]
    pub async fn run_poller(&self) -> !
    where
        S::Error: defmt::Format,
    {
        use embassy_time::{Duration, Ticker};

        let mut ticker = Ticker::every(Duration::from_millis(crate::config::REGISTER_POLL_PERIOD_MS));
        loop {
            ticker.next().await;
            if !self.is_polling() {
                continue;
            }
            if let Err(e) = self.refresh().await {
                warn!("Register poll failed: {}", e);
            }
        }
    }

    fn publish(&self, snapshot: RegisterFile) {
        self.latest.lock(|cell| cell.set(snapshot));
        self.fresh.signal(());
    }
}

impl<M: RawMutex, S: RegisterSource> RegisterSource for &SharedRegisters<M, S> {
    type Error = S::Error;

    async fn read_snapshot(&mut self) -> Result<RegisterFile, Self::Error> {
        self.refresh().await
    }

    async fn write(&mut self, reg: Register, value: u16) -> Result<(), Self::Error> {
        SharedRegisters::write(*self, reg, value).await
    }
}
