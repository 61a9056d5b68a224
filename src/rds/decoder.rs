//! RDS Group Decoder
//!
//! Classifies each group by type and version and folds its payload into
//! the [`StationState`]. PI, TP and PTY are taken from every group; the
//! textual fields go through consensus buffers so a single corrupted
//! broadcast cycle never reaches the display.
//!
//! Decoding never fails. Group types without a handler are counted and
//! otherwise ignored.

use crate::rds::consensus::ConsensusBuffer;
use crate::rds::station::{
    text_from_bytes, CallSign, StationState, PROGRAM_SERVICE_LEN, RADIOTEXT_LEN,
};
use crate::types::{GroupType, RawGroup, Version};

/// Radiotext end-of-message marker (carriage return)
pub const RADIOTEXT_TERMINATOR: u8 = 0x0D;

/// Filler for unreceived or blanked text positions
const TEXT_FILL: u8 = b' ';

/// Which consensus-backed fields changed during one decode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Commits {
    /// Call sign committed a new value
    pub call_sign: bool,
    /// Program service name committed a new value
    pub program_service: bool,
    /// Radiotext committed a new value
    pub radiotext: bool,
}

impl Commits {
    /// True if anything was committed
    #[must_use]
    pub const fn any(&self) -> bool {
        self.call_sign || self.program_service || self.radiotext
    }
}

/// Group counters since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderStats {
    groups: u32,
    by_type: [[u32; 2]; 16],
}

impl DecoderStats {
    /// Total groups decoded
    #[must_use]
    pub const fn groups(&self) -> u32 {
        self.groups
    }

    /// Groups seen of one type and version
    #[must_use]
    pub const fn count(&self, group_type: GroupType, version: Version) -> u32 {
        self.by_type[group_type.value() as usize][version as usize]
    }

    fn record(&mut self, group_type: GroupType, version: Version) {
        self.groups = self.groups.wrapping_add(1);
        let slot = &mut self.by_type[usize::from(group_type.value())][version as usize];
        *slot = slot.wrapping_add(1);
    }
}

/// RDS group decoder owning the committed station state
#[derive(Clone, Debug)]
pub struct RdsDecoder {
    station: StationState,
    call_sign: ConsensusBuffer<u8, 4>,
    program_service: ConsensusBuffer<u8, PROGRAM_SERVICE_LEN>,
    radiotext: ConsensusBuffer<u8, RADIOTEXT_LEN>,
    stats: DecoderStats,
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RdsDecoder {
    /// Create a decoder with empty station state
    #[must_use]
    pub fn new() -> Self {
        Self {
            station: StationState::new(),
            call_sign: ConsensusBuffer::new(0),
            program_service: ConsensusBuffer::new(TEXT_FILL),
            radiotext: ConsensusBuffer::new(TEXT_FILL),
            stats: DecoderStats::default(),
        }
    }

    /// Discard everything learned so far (new channel)
    pub fn reset(&mut self) {
        debug!("RDS decoder reset");
        *self = Self::new();
    }

    /// Committed station state
    #[must_use]
    pub const fn station(&self) -> &StationState {
        &self.station
    }

    /// Owned copy of the committed state
    #[must_use]
    pub fn snapshot(&self) -> StationState {
        self.station.clone()
    }

    /// Group counters
    #[must_use]
    pub const fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    /// Fold one group into the station state
    pub fn decode(&mut self, group: RawGroup) -> Commits {
        let mut commits = Commits::default();
        let group_type = group.group_type();
        let version = group.version();
        self.stats.record(group_type, version);

        commits.call_sign = self.update_pi(group.a);
        self.station.traffic_program = group.traffic_program();
        self.station.program_type = group.program_type();

        match (group_type, version) {
            (GroupType::BASIC_TUNING, _) => {
                commits.program_service = self.update_basic_tuning(group);
            }
            (GroupType::PROGRAM_ITEM, _) => {
                // Program item number / slow labeling: not decoded
            }
            (GroupType::RADIOTEXT, _) => {
                commits.radiotext = self.update_radiotext(group);
            }
            (GroupType::ODA_ID, Version::A) => self.update_oda(group),
            _ => {
                trace!("RDS group {}{} ignored", group_type, version);
            }
        }

        commits
    }

    fn update_pi(&mut self, pi: u16) -> bool {
        self.station.pi = Some(pi);
        let Some(candidate) = CallSign::from_pi(pi) else {
            return false;
        };
        if !self.call_sign.write_all(candidate.as_bytes()) {
            return false;
        }
        let committed = self.call_sign.committed().map(|b| CallSign::from_bytes(*b));
        if let Some(call_sign) = committed {
            info!("Call sign: {}", call_sign);
        }
        self.station.call_sign = committed;
        true
    }

    fn update_basic_tuning(&mut self, group: RawGroup) -> bool {
        let b = group.b;
        self.station.music = b & 0x0008 != 0;
        self.station.traffic_announcement = b & 0x0010 != 0;

        let segment = b & 0x3;
        self.station.di.set(segment, b & 0x0004 != 0);

        if group.version() == Version::A {
            let [high, low] = group.c.to_be_bytes();
            self.station.alt_frequencies.apply(high);
            self.station.alt_frequencies.apply(low);
        }

        let offset = usize::from(segment) * 2;
        let [first, second] = group.d.to_be_bytes();
        let mut changed = self.program_service.write(offset, first & 0x7F);
        changed |= self.program_service.write(offset + 1, second & 0x7F);

        if changed {
            if let Some(bytes) = self.program_service.committed() {
                self.station.program_service = text_from_bytes(bytes);
                info!("Program service: '{=str}'", self.station.program_service.as_str());
            }
        }
        changed
    }

    fn update_radiotext(&mut self, group: RawGroup) -> bool {
        let offset = usize::from(group.b & 0xF) * 4;
        let [c_hi, c_lo] = group.c.to_be_bytes();
        let [d_hi, d_lo] = group.d.to_be_bytes();

        let mut changed = false;
        let mut terminator = None;
        for (i, byte) in [c_hi, c_lo, d_hi, d_lo].into_iter().enumerate() {
            let byte = byte & 0x7F;
            changed |= self.radiotext.write(offset + i, byte);
            if byte == RADIOTEXT_TERMINATOR {
                terminator = Some(offset + i);
            }
        }

        if let Some(position) = terminator {
            self.radiotext.blank_after(position, TEXT_FILL);
        }

        if changed {
            if let Some(bytes) = self.radiotext.committed() {
                let end = bytes
                    .iter()
                    .position(|&b| b == RADIOTEXT_TERMINATOR)
                    .unwrap_or(bytes.len());
                self.station.radiotext = text_from_bytes(&bytes[..end]);
                info!("Radiotext: '{=str}'", self.station.radiotext.as_str());
            }
        }
        changed
    }

    fn update_oda(&mut self, group: RawGroup) {
        let slot = usize::from(group.b & 0x1F);
        self.station.oda.register(group.a, slot, group.d);
    }
}
