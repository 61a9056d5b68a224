//! Station State
//!
//! The committed, externally visible result of RDS decoding. Only the
//! decoder mutates it; everything else reads snapshots.

use core::fmt;

use heapless::{FnvIndexMap, FnvIndexSet, String};

use crate::config::{AF_BASE_KHZ, AF_STEP_KHZ, MAX_ALT_FREQUENCIES, MAX_ODA_TABLES};
use crate::rds::tables;
use crate::types::{FmFrequency, ProgramType, PtyRegion};

/// Program service name length
pub const PROGRAM_SERVICE_LEN: usize = 8;

/// Radiotext length
pub const RADIOTEXT_LEN: usize = 64;

/// Open data application group slots (one per group type code)
pub const ODA_SLOTS: usize = 32;

/// Four-letter call sign derived from a PI code
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSign([u8; 4]);

impl CallSign {
    /// Lowest North American PI code
    pub const NA_FIRST: u16 = 4096;

    /// First "W" PI code
    pub const NA_W_FIRST: u16 = 21_672;

    /// Highest North American four-letter PI code
    pub const NA_LAST: u16 = 39_247;

    /// Derive a call sign from a PI code.
    ///
    /// Returns None for codes outside every known range (nationally
    /// linked and three-letter North American codes are not derived).
    #[must_use]
    pub const fn from_pi(pi: u16) -> Option<Self> {
        if pi & 0x0F00 == 0 {
            // European local / unique
            Some(Self([
                b'A',
                letter(pi >> 12),
                letter(pi >> 4),
                letter(pi),
            ]))
        } else if pi & 0x00FF == 0 {
            // European test mode
            Some(Self([b'A', b'F', letter(pi >> 12), letter(pi >> 8)]))
        } else if pi >= Self::NA_FIRST && pi <= Self::NA_LAST {
            let (prefix, base) = if pi < Self::NA_W_FIRST {
                (b'K', pi - Self::NA_FIRST)
            } else {
                (b'W', pi - Self::NA_W_FIRST)
            };
            Some(Self([
                prefix,
                b'A' + (base / 676) as u8,
                b'A' + ((base % 676) / 26) as u8,
                b'A' + (base % 26) as u8,
            ]))
        } else {
            None
        }
    }

    /// Create from raw letters
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw letters
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Letters as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("????")
    }
}

const fn letter(nibble: u16) -> u8 {
    b'A' + (nibble & 0x0F) as u8
}

impl fmt::Debug for CallSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallSign({})", self.as_str())
    }
}

impl fmt::Display for CallSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CallSign {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}

/// Decoder identification flags, one per program-service segment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderIdentification {
    /// Stereo (segment 0)
    pub stereo: bool,
    /// Artificial head recording (segment 1)
    pub artificial_head: bool,
    /// Compressed audio (segment 2)
    pub compressed: bool,
    /// Program type may change (segment 3)
    pub dynamic_pty: bool,
}

impl DecoderIdentification {
    /// Set the flag carried by a program-service segment address (0-3)
    pub fn set(&mut self, segment: u16, value: bool) {
        match segment & 0x3 {
            0 => self.stereo = value,
            1 => self.artificial_head = value,
            2 => self.compressed = value,
            _ => self.dynamic_pty = value,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DecoderIdentification {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DI(st={}, ah={}, comp={}, dpty={})",
            self.stereo,
            self.artificial_head,
            self.compressed,
            self.dynamic_pty
        );
    }
}

/// Meaning of one 8-bit alternate-frequency code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfCode {
    /// Code 0, not to be used
    NotUsed,
    /// Codes 1-204, a VHF frequency
    Frequency(FmFrequency),
    /// Codes 224-249, number of frequencies in the list
    Count(u8),
    /// Code 205, filler
    Filler,
    /// Code 250, an LF/MF frequency follows (not decoded)
    LfMfFollows,
    /// Codes 206-223 and 251-255
    Unassigned,
}

impl AfCode {
    /// Classify a raw code
    #[must_use]
    pub const fn classify(code: u8) -> Self {
        match code {
            0 => Self::NotUsed,
            1..=204 => match FmFrequency::from_khz(AF_BASE_KHZ + code as u32 * AF_STEP_KHZ) {
                Some(freq) => Self::Frequency(freq),
                None => Self::Unassigned,
            },
            205 => Self::Filler,
            224..=249 => Self::Count(code - 224),
            250 => Self::LfMfFollows,
            _ => Self::Unassigned,
        }
    }
}

/// Alternate frequencies announced by the station
#[derive(Clone, Debug, Default)]
pub struct AltFrequencies {
    frequencies: FnvIndexSet<FmFrequency, MAX_ALT_FREQUENCIES>,
    expected: Option<u8>,
}

impl AltFrequencies {
    /// Apply one code. Returns true when the set or count changed.
    pub fn apply(&mut self, code: u8) -> bool {
        match AfCode::classify(code) {
            AfCode::Frequency(freq) => match self.frequencies.insert(freq) {
                Ok(added) => added,
                Err(_) => {
                    warn!("AF list full, dropping {}", freq);
                    false
                }
            },
            AfCode::Count(count) => {
                let changed = self.expected != Some(count);
                self.expected = Some(count);
                changed
            }
            AfCode::LfMfFollows => {
                trace!("AF: LF/MF frequency follows (not decoded)");
                false
            }
            AfCode::NotUsed | AfCode::Filler | AfCode::Unassigned => false,
        }
    }

    /// Check whether a frequency was announced
    #[must_use]
    pub fn contains(&self, frequency: FmFrequency) -> bool {
        self.frequencies.contains(&frequency)
    }

    /// Check whether a frequency in MHz was announced
    #[must_use]
    pub fn contains_mhz(&self, mhz: f32) -> bool {
        FmFrequency::from_mhz(mhz).is_some_and(|f| self.contains(f))
    }

    /// Announced frequencies
    pub fn iter(&self) -> impl Iterator<Item = FmFrequency> + '_ {
        self.frequencies.iter().copied()
    }

    /// Number of announced frequencies received so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when nothing has been announced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Expected list length, if the station sent one
    #[must_use]
    pub const fn expected_count(&self) -> Option<u8> {
        self.expected
    }
}

/// Open data application payload tables
#[derive(Clone, Debug, Default)]
pub struct OdaRegistry {
    tables: FnvIndexMap<u16, [u16; ODA_SLOTS], MAX_ODA_TABLES>,
}

impl OdaRegistry {
    /// Store `payload` at `slot` of the table for `key`, creating the table
    /// on first use. Silently drops new keys once the registry is full.
    pub fn register(&mut self, key: u16, slot: usize, payload: u16) {
        if !self.tables.contains_key(&key) {
            if self.tables.insert(key, [0; ODA_SLOTS]).is_err() {
                warn!("ODA registry full, dropping {:04X}", key);
                return;
            }
            debug!("ODA table created for {:04X}", key);
        }
        if let Some(table) = self.tables.get_mut(&key) {
            if let Some(entry) = table.get_mut(slot) {
                *entry = payload;
            }
        }
    }

    /// Table for a key
    #[must_use]
    pub fn get(&self, key: u16) -> Option<&[u16; ODA_SLOTS]> {
        self.tables.get(&key)
    }

    /// All tables
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u16; ODA_SLOTS])> + '_ {
        self.tables.iter().map(|(&key, table)| (key, table))
    }

    /// Number of tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when no table exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registered name of an application ID
    #[must_use]
    pub fn application_name(aid: u16) -> Option<&'static str> {
        tables::oda_application_name(aid)
    }
}

/// Committed station information (read-only snapshot for presentation)
#[derive(Clone, Debug, Default)]
pub struct StationState {
    pub(crate) pi: Option<u16>,
    pub(crate) call_sign: Option<CallSign>,
    pub(crate) program_type: ProgramType,
    pub(crate) traffic_program: bool,
    pub(crate) traffic_announcement: bool,
    pub(crate) music: bool,
    pub(crate) di: DecoderIdentification,
    pub(crate) program_service: String<PROGRAM_SERVICE_LEN>,
    pub(crate) radiotext: String<RADIOTEXT_LEN>,
    pub(crate) alt_frequencies: AltFrequencies,
    pub(crate) oda: OdaRegistry,
}

impl StationState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last seen program identification code
    #[must_use]
    pub const fn pi(&self) -> Option<u16> {
        self.pi
    }

    /// Committed call sign
    #[must_use]
    pub const fn call_sign(&self) -> Option<CallSign> {
        self.call_sign
    }

    /// Current program type
    #[must_use]
    pub const fn program_type(&self) -> ProgramType {
        self.program_type
    }

    /// Program type name in a region's table
    #[must_use]
    pub fn program_type_name(&self, region: PtyRegion) -> &'static str {
        self.program_type.name(region)
    }

    /// Station carries traffic information
    #[must_use]
    pub const fn traffic_program(&self) -> bool {
        self.traffic_program
    }

    /// A traffic bulletin is on air
    #[must_use]
    pub const fn traffic_announcement(&self) -> bool {
        self.traffic_announcement
    }

    /// Music (true) or speech (false)
    #[must_use]
    pub const fn music(&self) -> bool {
        self.music
    }

    /// Decoder identification flags
    #[must_use]
    pub const fn decoder_identification(&self) -> DecoderIdentification {
        self.di
    }

    /// Committed program service name (empty until agreed)
    #[must_use]
    pub fn program_service(&self) -> &str {
        &self.program_service
    }

    /// Committed radiotext (empty until agreed)
    #[must_use]
    pub fn radiotext(&self) -> &str {
        &self.radiotext
    }

    /// Alternate frequencies
    #[must_use]
    pub const fn alt_frequencies(&self) -> &AltFrequencies {
        &self.alt_frequencies
    }

    /// Open data application tables
    #[must_use]
    pub const fn oda(&self) -> &OdaRegistry {
        &self.oda
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for StationState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Station({}, {}, '{=str}', '{=str}')",
            self.call_sign,
            self.program_type,
            self.program_service.as_str(),
            self.radiotext.as_str()
        );
    }
}

/// Convert committed 7-bit bytes into text
pub(crate) fn text_from_bytes<const N: usize>(bytes: &[u8]) -> String<N> {
    let mut text = String::new();
    for &byte in bytes.iter().take(N) {
        if text.push(char::from(byte & 0x7F)).is_err() {
            break;
        }
    }
    text
}
