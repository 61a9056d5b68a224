//! RDS Receiver Library
//!
//! This library provides the core of an STM32G474 + `Si4703` FM broadcast
//! receiver: decoding of RDS (Radio Data System) station metadata and the
//! tuner's channel-change handshake.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │        Receiver  │  Signal status  │  Presentation view      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RDS LAYER                               │
//! │  Group decoder  │  Consensus buffers  │  Station state       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     TUNER LAYER                              │
//! │  Channel tuner  │  Register cache  │  Register source        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │            I2C bus  │  Si4703 driver                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: decoding and tuning logic is
//!   hardware-free and tested on the host
//! - **Type-driven design**: custom types enforce band and field limits
//! - **No unsafe in application code**
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// This must go first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Bus wrappers over `embedded-hal-async` traits.
pub mod hal;

/// Peripheral Drivers
///
/// `Si4703` FM tuner.
pub mod drivers;

/// Radio Data System
///
/// Group decoding, consensus buffering, station state and lookup tables.
pub mod rds;

/// Tuner Control
///
/// Register model, register source boundary, shared cache, tuning.
pub mod tuner;

/// Receiver Control Logic
///
/// Snapshot handling and tuning requests for the application.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::radio::{Receiver, ReceiverView, SignalStatus};
    pub use crate::rds::{RdsDecoder, StationState};
    pub use crate::tuner::{
        ChannelTuner, Register, RegisterFile, RegisterSource, SharedRegisters, TuneError, TuneState,
    };

    // Common traits
    pub use embedded_hal_async::delay::DelayNs;
    pub use embedded_hal_async::i2c::I2c;

    // Error handling
    pub use core::result::Result;
}
