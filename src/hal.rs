//! Hardware Abstraction Layer
//!
//! Bus wrappers generic over `embedded-hal-async`, so the same driver code
//! runs against the STM32 peripherals and against host-side simulations.

pub mod i2c;
