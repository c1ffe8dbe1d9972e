//! Hardware abstraction layer traits.
//!
//! This module defines the bus and converter traits that let drivers run on
//! top of different underlying implementations, whether direct Linux i2c-dev
//! access or a scripted test double.

pub mod adc;
pub mod i2c;

#[cfg(test)]
pub(crate) mod mock;

// Re-export traits
pub use adc::{Adc, AdcChannel};
pub use i2c::{I2c, I2cError, I2cFunctionality};

/// Common error type for hardware operations
#[derive(Debug, thiserror::Error)]
pub enum HwError {
    /// Bus-level I2C failure
    #[error(transparent)]
    I2c(#[from] I2cError),

    /// Invalid parameter or argument
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation not supported by hardware
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Other hardware-specific error
    #[error("Hardware error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HwError>;
