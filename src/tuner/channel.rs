//! Channel Tuning
//!
//! Drives the Si4703 tune handshake: write the channel with TUNE set,
//! wait for seek/tune complete (STC), then clear TUNE. The wait is bounded;
//! on success the RDS decoder is reset so the new station starts clean.
//!
//! The state machine itself is synchronous ([`ChannelTuner::begin`],
//! [`ChannelTuner::poll`]) so it can be driven by any loop; the async
//! [`ChannelTuner::set_channel`] is the usual way in.

use core::fmt;

use embedded_hal_async::delay::DelayNs;

use crate::config::{TUNE_DEADLINE_MS, TUNE_POLL_INTERVAL_MS};
use crate::rds::RdsDecoder;
use crate::tuner::registers::{bits, Register, RegisterFile};
use crate::tuner::source::RegisterSource;
use crate::types::{ChannelCode, FmFrequency};

/// Tuner state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TuneState {
    /// No tune in progress
    #[default]
    Idle,
    /// TUNE written, waiting for STC
    Tuning {
        /// Requested channel
        channel: ChannelCode,
    },
    /// STC observed, TUNE being cleared
    Complete,
    /// STC never observed before the deadline
    TimedOut,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::Tuning { channel } => defmt::write!(f, "Tuning({})", channel),
            Self::Complete => defmt::write!(f, "Complete"),
            Self::TimedOut => defmt::write!(f, "TimedOut"),
        }
    }
}

/// Result of one status check while tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunePoll {
    /// Keep waiting
    Pending,
    /// STC seen
    Complete,
    /// Deadline passed
    TimedOut,
}

/// Tune wait bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneTiming {
    /// Give up after this much waiting
    pub deadline_ms: u32,
    /// Wait between status reads
    pub poll_interval_ms: u32,
}

impl Default for TuneTiming {
    fn default() -> Self {
        Self {
            deadline_ms: TUNE_DEADLINE_MS,
            poll_interval_ms: TUNE_POLL_INTERVAL_MS,
        }
    }
}

/// Tuning failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneError<E> {
    /// Requested frequency is outside 87.5..=107.9 MHz
    InvalidFrequency,
    /// STC was not observed before the deadline
    Timeout,
    /// Register source failed
    Transport(E),
}

impl<E: fmt::Debug> fmt::Display for TuneError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrequency => f.write_str("frequency outside 87.5-107.9 MHz"),
            Self::Timeout => f.write_str("tune did not complete before the deadline"),
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<E: defmt::Format> defmt::Format for TuneError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidFrequency => defmt::write!(f, "InvalidFrequency"),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Transport(e) => defmt::write!(f, "Transport({})", e),
        }
    }
}

/// CHANNEL register value selecting `channel` with TUNE set
#[must_use]
pub const fn tune_word(current: u16, channel: ChannelCode) -> u16 {
    (current & !ChannelCode::MASK) | channel.value() | bits::TUNE
}

/// Channel tuning state machine
#[derive(Clone, Debug, Default)]
pub struct ChannelTuner {
    state: TuneState,
    timing: TuneTiming,
    tuned: Option<FmFrequency>,
}

impl ChannelTuner {
    /// Create an idle tuner with default timing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle tuner with custom timing
    #[must_use]
    pub fn with_timing(timing: TuneTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> TuneState {
        self.state
    }

    /// Wait bounds in use
    #[must_use]
    pub const fn timing(&self) -> TuneTiming {
        self.timing
    }

    /// Last frequency successfully tuned
    #[must_use]
    pub const fn tuned_frequency(&self) -> Option<FmFrequency> {
        self.tuned
    }

    /// Validate a request and enter `Tuning`
    pub fn begin<E>(&mut self, mhz: f32) -> Result<FmFrequency, TuneError<E>> {
        let Some(frequency) = FmFrequency::from_mhz(mhz) else {
            warn!("Rejected tune request outside the band");
            return Err(TuneError::InvalidFrequency);
        };
        self.state = TuneState::Tuning {
            channel: frequency.channel(),
        };
        Ok(frequency)
    }

    /// Check a status snapshot after `elapsed_ms` of waiting
    pub fn poll(&mut self, status: &RegisterFile, elapsed_ms: u32) -> TunePoll {
        if !matches!(self.state, TuneState::Tuning { .. }) {
            return TunePoll::Pending;
        }
        if status.tune_complete() {
            self.state = TuneState::Complete;
            TunePoll::Complete
        } else if elapsed_ms >= self.timing.deadline_ms {
            self.state = TuneState::TimedOut;
            TunePoll::TimedOut
        } else {
            TunePoll::Pending
        }
    }

    /// Record a finished tune and return to `Idle`
    pub fn finish(&mut self, frequency: FmFrequency) {
        self.tuned = Some(frequency);
        self.state = TuneState::Idle;
    }

    /// Abandon the attempt after a transport failure
    pub fn abort(&mut self) {
        self.state = TuneState::Idle;
    }

    /// Tune to `mhz`, waiting for the hardware to confirm.
    ///
    /// On success TUNE is cleared and `decoder` is reset. On timeout TUNE
    /// is left set and the decoder is untouched.
    ///
    /// The deadline counts only the poll intervals slept through `delay`.
    /// Time spent inside `read_snapshot`, including waits for a shared
    /// source's lock, is not counted, so the wall-clock bound is approximate.
    pub async fn set_channel<S, D>(
        &mut self,
        mut source: S,
        delay: &mut D,
        decoder: &mut RdsDecoder,
        mhz: f32,
    ) -> Result<FmFrequency, TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        let frequency = self.begin(mhz)?;
        info!("Tuning to {}", frequency);

        match self.handshake(&mut source, delay, frequency).await {
            Ok(()) => {
                decoder.reset();
                self.finish(frequency);
                info!("Tuned to {}", frequency);
                Ok(frequency)
            }
            Err(TuneError::Timeout) => {
                warn!("Tune to {} timed out", frequency);
                Err(TuneError::Timeout)
            }
            Err(e) => {
                error!("Tune to {} failed on transport", frequency);
                self.abort();
                Err(e)
            }
        }
    }

    async fn handshake<S, D>(
        &mut self,
        source: &mut S,
        delay: &mut D,
        frequency: FmFrequency,
    ) -> Result<(), TuneError<S::Error>>
    where
        S: RegisterSource,
        D: DelayNs,
    {
        let regs = source.read_snapshot().await.map_err(TuneError::Transport)?;
        let word = tune_word(regs.get(Register::Channel), frequency.channel());
        source
            .write(Register::Channel, word)
            .await
            .map_err(TuneError::Transport)?;

        let mut elapsed_ms = 0;
        loop {
            let status = source.read_snapshot().await.map_err(TuneError::Transport)?;
            match self.poll(&status, elapsed_ms) {
                TunePoll::Complete => break,
                TunePoll::TimedOut => return Err(TuneError::Timeout),
                TunePoll::Pending => {
                    delay.delay_ms(self.timing.poll_interval_ms).await;
                    elapsed_ms += self.timing.poll_interval_ms;
                }
            }
        }

        let regs = source.read_snapshot().await.map_err(TuneError::Transport)?;
        source
            .write(Register::Channel, regs.get(Register::Channel) & !bits::TUNE)
            .await
            .map_err(TuneError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tune_word_replaces_channel_bits() {
        let ch = FmFrequency::from_khz(88_500).map(FmFrequency::channel);
        assert_eq!(ch.map(ChannelCode::value), Some(5));
        assert_eq!(tune_word(0x01FF, ChannelCode::from_bits(5)), 0x8005);
        assert_eq!(tune_word(0x4A00, ChannelCode::from_bits(102)), 0xCA66);
    }

    #[test]
    fn poll_sequence() {
        let mut tuner = ChannelTuner::new();
        let freq = tuner.begin::<()>(100.1).unwrap();
        assert_eq!(freq.as_khz(), 100_100);
        assert_eq!(tuner.state(), TuneState::Tuning { channel: ChannelCode::from_bits(63) });

        let idle = RegisterFile::new();
        assert_eq!(tuner.poll(&idle, 4_900), TunePoll::Pending);

        let done = idle.with(Register::StatusRssi, bits::STC);
        assert_eq!(tuner.poll(&done, 5_000), TunePoll::Complete);
        tuner.finish(freq);
        assert_eq!(tuner.state(), TuneState::Idle);
        assert_eq!(tuner.tuned_frequency(), Some(freq));
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut tuner = ChannelTuner::new();
        tuner.begin::<()>(88.5).unwrap();
        assert_eq!(tuner.poll(&RegisterFile::new(), 5_000), TunePoll::TimedOut);
        assert_eq!(tuner.state(), TuneState::TimedOut);
    }
}
