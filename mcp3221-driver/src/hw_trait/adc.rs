//! ADC hardware abstraction trait.

use async_trait::async_trait;
use super::Result;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdcChannel(pub u8);

/// ADC abstraction for reading analog values
#[async_trait]
pub trait Adc: Send + Sync {
    /// Read the signed raw conversion result from a channel.
    async fn read_raw(&self, channel: AdcChannel) -> Result<i32>;

    /// Read voltage from a channel in millivolts.
    async fn read_millivolts(&self, channel: AdcChannel) -> Result<i32>;
}
