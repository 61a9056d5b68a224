//! Receiver
//!
//! Ties the decoder and the tuner together: every fresh register snapshot
//! updates the signal status and, when an RDS group is ready, feeds the
//! decoder. Tune requests go through the channel tuner, which resets the
//! decoder once the new channel is confirmed.

use embedded_hal_async::delay::DelayNs;

use crate::config::{default_frequency, DEFAULT_PTY_REGION};
use crate::radio::state::{ReceiverView, SignalStatus};
use crate::rds::{Commits, RdsDecoder};
use crate::tuner::{ChannelTuner, RegisterFile, RegisterSource, TuneError, TuneTiming};
use crate::types::{FmFrequency, PtyRegion};

/// FM receiver core
#[derive(Clone, Debug)]
pub struct Receiver {
    decoder: RdsDecoder,
    tuner: ChannelTuner,
    signal: SignalStatus,
    requested: FmFrequency,
    region: PtyRegion,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    /// Create a receiver with default timing and region
    #[must_use]
    pub fn new() -> Self {
        Self::with_timing(TuneTiming::default())
    }

    /// Create a receiver with custom tune timing
    #[must_use]
    pub fn with_timing(timing: TuneTiming) -> Self {
        Self {
            decoder: RdsDecoder::new(),
            tuner: ChannelTuner::with_timing(timing),
            signal: SignalStatus::default(),
            requested: default_frequency().unwrap_or(FmFrequency::MIN),
            region: DEFAULT_PTY_REGION,
        }
    }

    /// Use a different program type table
    #[must_use]
    pub fn with_region(mut self, region: PtyRegion) -> Self {
        self.region = region;
        self
    }

    /// Decoder (read-only)
    #[must_use]
    pub const fn decoder(&self) -> &RdsDecoder {
        &self.decoder
    }

    /// Tuner (read-only)
    #[must_use]
    pub const fn tuner(&self) -> &ChannelTuner {
        &self.tuner
    }

    /// Process a fresh register snapshot
    pub fn on_snapshot(&mut self, regs: &RegisterFile) -> Commits {
        self.signal = SignalStatus::from_registers(regs);
        if self.signal.rds_ready() {
            self.decoder.decode(regs.raw_group())
        } else {
            Commits::default()
        }
    }

    /// Tune to `mhz`
    pub async fn tune<S, D>(&mut self, source: S, delay: &mut D, mhz: f32) -> Result<FmFrequency, TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        let frequency = self
            .tuner
            .set_channel(source, delay, &mut self.decoder, mhz)
            .await?;
        self.requested = frequency;
        Ok(frequency)
    }

    /// Step one channel up, wrapping at the top of the band
    pub async fn tune_up<S, D>(&mut self, source: S, delay: &mut D) -> Result<FmFrequency, TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        self.step_to(source, delay, self.requested.next_channel()).await
    }

    /// Step one channel down, wrapping at the bottom of the band
    pub async fn tune_down<S, D>(&mut self, source: S, delay: &mut D) -> Result<FmFrequency, TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        self.step_to(source, delay, self.requested.prev_channel()).await
    }

    /// Snapshot for presentation
    #[must_use]
    pub fn view(&self) -> ReceiverView<'_> {
        ReceiverView {
            requested: self.requested,
            tuned: self.tuner.tuned_frequency(),
            tune_state: self.tuner.state(),
            signal: self.signal,
            station: self.decoder.station(),
            region: self.region,
        }
    }

    async fn step_to<S, D>(
        &mut self,
        source: S,
        delay: &mut D,
        target: FmFrequency,
    ) -> Result<FmFrequency, TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        // The step is kept even if the tune fails, so repeated presses advance
        self.requested = target;
        self.tune(source, delay, target.as_mhz_f32()).await
    }
}
