//! I2C hardware abstraction trait.

use async_trait::async_trait;
use std::fmt;

use super::Result;

/// I2C-specific errors
#[derive(Debug, thiserror::Error)]
pub enum I2cError {
    /// No acknowledgment from device
    #[error("No acknowledgment from device at address 0x{0:02x}")]
    NoAck(u8),

    /// Bus arbitration lost
    #[error("Bus arbitration lost")]
    ArbitrationLost,

    /// Bus error
    #[error("Bus error")]
    BusError,

    /// Other I2C error
    #[error("I2C error: {0}")]
    Other(String),
}

/// Transfer capabilities reported by an I2C adapter.
///
/// Holds the Linux `I2C_FUNC_*` bit set. Plain I2C means the adapter can
/// issue arbitrary START/ADDR/DATA/STOP transactions rather than only SMBus
/// commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I2cFunctionality(u32);

impl I2cFunctionality {
    /// Plain I2C-level transactions (`I2C_FUNC_I2C`).
    pub const I2C: Self = Self(0x0000_0001);

    /// No capabilities at all.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap a raw `I2C_FUNC_*` bit set as reported by the kernel.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw capability bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is present in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Display for I2cFunctionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// I2C bus abstraction
#[async_trait]
pub trait I2c: Send + Sync {
    /// Read data from an I2C device.
    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Transfer capabilities of the underlying adapter.
    fn functionality(&self) -> I2cFunctionality;
}

#[cfg(test)]
mod tests {
    use super::*;

    // I2C_FUNC_SMBUS_QUICK | BYTE | BYTE_DATA | WORD_DATA, as reported by
    // SMBus-only controllers such as i801
    const SMBUS_ONLY: u32 = 0x007F_0000;

    #[test]
    fn test_functionality_contains() {
        let full = I2cFunctionality::from_bits(SMBUS_ONLY | 0x1);
        assert!(full.contains(I2cFunctionality::I2C));

        // SMBus-only adapters cannot do raw receives
        let smbus = I2cFunctionality::from_bits(SMBUS_ONLY);
        assert!(!smbus.contains(I2cFunctionality::I2C));
        assert_eq!(smbus.bits(), SMBUS_ONLY);
        assert!(I2cFunctionality::empty().contains(I2cFunctionality::empty()));
    }

    #[test]
    fn test_functionality_display() {
        assert_eq!(I2cFunctionality::I2C.to_string(), "0x00000001");
        assert_eq!(I2cFunctionality::empty().bits(), 0);
    }
}
