//! Configuration for a bound MCP3221.
//!
//! Parses environment variables naming the bus, address, and device name.

use std::path::PathBuf;
use thiserror::Error;

use crate::peripheral::mcp3221::{DEFAULT_ADDRESS, DEFAULT_NAME};

/// Default i2c-dev node
pub const DEFAULT_BUS: &str = "/dev/i2c-1";

/// Lowest and highest non-reserved 7-bit addresses
const ADDRESS_RANGE: std::ops::RangeInclusive<u16> = 0x08..=0x77;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid I2C address: {0:?}")]
    InvalidAddress(String),

    #[error("I2C address 0x{0:02x} outside 0x08..=0x77")]
    AddressOutOfRange(u16),
}

/// Device binding parsed from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mcp3221Config {
    /// i2c-dev node the chip hangs off.
    pub bus: PathBuf,

    /// 7-bit I2C address. MCP3221 parts are factory-programmed to one of
    /// 0x48..=0x4F; the A5 variant (0x4D) is by far the most common.
    pub address: u8,

    /// Name used in logs and as the device name.
    pub name: String,
}

impl Default for Mcp3221Config {
    fn default() -> Self {
        Self {
            bus: PathBuf::from(DEFAULT_BUS),
            address: DEFAULT_ADDRESS,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl Mcp3221Config {
    /// Parse configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MCP3221_I2C_BUS`: i2c-dev node (default: `/dev/i2c-1`)
    /// - `MCP3221_ADDRESS`: hex (`0x4d`) or decimal address (default: `0x4d`)
    /// - `MCP3221_NAME`: device name (default: `mcp3221`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bus) = std::env::var("MCP3221_I2C_BUS") {
            config.bus = PathBuf::from(bus);
        }
        if let Ok(address) = std::env::var("MCP3221_ADDRESS") {
            config.address = parse_address(&address)?;
        }
        if let Ok(name) = std::env::var("MCP3221_NAME") {
            if !name.is_empty() {
                config.name = name;
            }
        }

        Ok(config)
    }
}

/// Parse a 7-bit address written as hex (`0x4d`) or decimal (`77`).
pub fn parse_address(s: &str) -> Result<u8, ConfigError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    }
    .map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;

    if !ADDRESS_RANGE.contains(&parsed) {
        return Err(ConfigError::AddressOutOfRange(parsed));
    }
    Ok(parsed as u8)
}
