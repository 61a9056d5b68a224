//! Receiver Control Logic
//!
//! The functional core of the FM receiver: snapshot handling, tuning
//! requests and the read-only view handed to presentation.

pub mod receiver;
pub mod state;

pub use receiver::Receiver;
pub use state::{ReceiverView, SignalStatus};
