//! Receiver State
//!
//! Read-only values handed to presentation: the signal status decoded
//! from each register snapshot and a borrowed view combining it with the
//! committed station state.

use crate::rds::StationState;
use crate::tuner::{RegisterFile, TuneState};
use crate::types::{FmFrequency, PtyRegion};

/// Signal quality and tuner status from one snapshot (immutable)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalStatus {
    rssi: u8,
    stereo: bool,
    rds_ready: bool,
    frequency: Option<FmFrequency>,
}

impl SignalStatus {
    /// Decode from a register snapshot
    #[must_use]
    pub const fn from_registers(regs: &RegisterFile) -> Self {
        Self {
            rssi: regs.rssi(),
            stereo: regs.stereo(),
            rds_ready: regs.rds_ready(),
            frequency: FmFrequency::from_channel(regs.read_channel()),
        }
    }

    /// Received signal strength (dBuV)
    #[must_use]
    pub const fn rssi(&self) -> u8 {
        self.rssi
    }

    /// Stereo pilot detected
    #[must_use]
    pub const fn stereo(&self) -> bool {
        self.stereo
    }

    /// An RDS group was ready in this snapshot
    #[must_use]
    pub const fn rds_ready(&self) -> bool {
        self.rds_ready
    }

    /// Frequency the tuner reports it is on
    #[must_use]
    pub const fn frequency(&self) -> Option<FmFrequency> {
        self.frequency
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SignalStatus {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} RSSI {} {=str}{=str}",
            self.frequency,
            self.rssi,
            if self.stereo { "Stereo" } else { "Mono" },
            if self.rds_ready { " RDS" } else { "" }
        );
    }
}

/// Everything presentation needs, borrowed from the receiver
#[derive(Clone, Copy, Debug)]
pub struct ReceiverView<'a> {
    /// Last requested frequency
    pub requested: FmFrequency,
    /// Last frequency whose tune completed
    pub tuned: Option<FmFrequency>,
    /// Tuner state machine
    pub tune_state: TuneState,
    /// Latest signal status
    pub signal: SignalStatus,
    /// Committed RDS data
    pub station: &'a StationState,
    /// Program type naming
    pub region: PtyRegion,
}

impl ReceiverView<'_> {
    /// Program type name for the current station
    #[must_use]
    pub fn program_type_name(&self) -> &'static str {
        self.station.program_type_name(self.region)
    }

    /// Call sign text, blank until committed
    #[must_use]
    pub fn call_sign(&self) -> &str {
        match &self.station.call_sign {
            Some(call) => call.as_str(),
            None => "    ",
        }
    }
}
