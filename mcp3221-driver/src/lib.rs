//! Driver for the Microchip MCP3221 12-bit I2C ADC.
//!
//! The driver reads one signed sample per request, reports a fixed
//! nanovolt-per-code scale and a fixed sampling frequency, and serializes bus
//! access per device. See [`peripheral::mcp3221`] for the device itself and
//! [`iio`] for the channel contract it implements.

pub mod config;
pub mod hw_trait;
pub mod iio;
pub mod peripheral;
pub mod tracing;
pub mod transport;
