//! Radio Data System
//!
//! Group decoding, consensus buffering and the committed station state.
//! Pure logic with no hardware access; runs identically on host and target.

pub mod consensus;
pub mod decoder;
pub mod station;
pub mod tables;

pub use consensus::ConsensusBuffer;
pub use decoder::{Commits, DecoderStats, RdsDecoder};
pub use station::{AfCode, AltFrequencies, CallSign, DecoderIdentification, OdaRegistry, StationState};
