//! Tuner Control
//!
//! Si4703 register model, the register-source boundary, the shared
//! register cache and the channel tuning handshake.

pub mod channel;
pub mod registers;
pub mod shared;
pub mod source;

pub use channel::{ChannelTuner, TuneError, TunePoll, TuneState, TuneTiming};
pub use registers::{Register, RegisterError, RegisterFile};
pub use shared::SharedRegisters;
pub use source::RegisterSource;
