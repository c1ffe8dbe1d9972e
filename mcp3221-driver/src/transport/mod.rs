//! Concrete bus transports.
//!
//! Drivers only see [`crate::hw_trait::I2c`]; this module provides the
//! implementations that move bytes on real hardware.
//!
//! ## Platform Support
//!
//! - **Linux**: i2c-dev character devices (`/dev/i2c-N`)

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxI2c;
