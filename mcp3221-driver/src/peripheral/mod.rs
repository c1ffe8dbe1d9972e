//! Drivers for chips attached to a host bus.

pub mod mcp3221;
