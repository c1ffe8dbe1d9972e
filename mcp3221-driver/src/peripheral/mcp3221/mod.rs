//! Microchip MCP3221 12-bit ADC driver.
//!
//! The MCP3221 is a single-channel successive-approximation ADC with an I2C
//! interface. It has no registers to configure: addressing it for a read
//! returns the latest conversion as two bytes, MSB first, with the result in
//! the low 12 bits. The reference is tied to VDD, taken here as 3.3 V.
//!
//! Datasheet: <https://ww1.microchip.com/downloads/en/DeviceDoc/20001732E.pdf>

mod decode;
mod error;

pub use decode::{decode, SAMPLE_BITS, SAMPLE_CODES};
pub use error::AdcError;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::hw_trait::{self, Adc, AdcChannel, HwError, I2c, I2cFunctionality};
use crate::iio::{ChanInfo, ChannelSpec, IioDevice, IioValue, ValueFormat};
use crate::tracing::prelude::*;

/// Default I2C address (MCP3221A5)
pub const DEFAULT_ADDRESS: u8 = 0x4D;

/// Default device name
pub const DEFAULT_NAME: &str = "mcp3221";

/// Full-scale input in nanovolts
const VREF_NANOVOLTS: u64 = 3_300_000_000;

/// Nanovolts per LSB, truncated
pub const SCALE_NANO: i32 = (VREF_NANOVOLTS / SAMPLE_CODES as u64) as i32;

/// Conversion rate in Hz
pub const SAMPLING_FREQUENCY_HZ: i32 = 5500;

/// Bytes per conversion result
const SAMPLE_LEN: usize = 2;

/// The single voltage input.
pub static MCP3221_CHANNELS: [ChannelSpec; 1] = [ChannelSpec::voltage(
    0,
    &[ChanInfo::Raw, ChanInfo::Scale],
    &[ChanInfo::SampFreq],
)];

/// MCP3221 driver
///
/// Reads take `&self`; concurrent callers queue on an internal lock so only
/// one bus transaction is outstanding per device.
pub struct Mcp3221<I: I2c> {
    i2c: Mutex<I>,
    address: u8,
    name: String,
}

impl<I: I2c> Mcp3221<I> {
    /// Bind a driver at the default address.
    pub fn new(i2c: I) -> Result<Self, AdcError> {
        Self::probe(i2c, DEFAULT_ADDRESS, DEFAULT_NAME)
    }

    /// Bind a driver to the chip at `address`.
    ///
    /// Fails with [`AdcError::UnsupportedTransport`] if the adapter cannot do
    /// plain I2C receives. Nothing is sent on the bus.
    pub fn probe(i2c: I, address: u8, name: impl Into<String>) -> Result<Self, AdcError> {
        let name = name.into();
        let available = i2c.functionality();
        if !available.contains(I2cFunctionality::I2C) {
            warn!(device = %name, functionality = %available, "I2C adapter unsupported");
            return Err(AdcError::UnsupportedTransport { available });
        }

        info!(
            device = %name,
            address = %format!("{:#04x}", address),
            "MCP3221 bound"
        );

        Ok(Self {
            i2c: Mutex::new(i2c),
            address,
            name,
        })
    }

    /// 7-bit I2C address the driver is bound to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Device name used in logs and reported to the framework.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read one conversion result.
    pub async fn read_raw(&self) -> Result<i32, AdcError> {
        let buf = {
            let mut i2c = self.i2c.lock().await;
            let mut buf = [0u8; SAMPLE_LEN];
            i2c.read(self.address, &mut buf).await.map_err(|e| {
                debug!(device = %self.name, error = %e, "MCP3221 read failed");
                AdcError::TransportFailure(e)
            })?;
            buf
        };

        let value = decode(buf);
        trace!(device = %self.name, frame = ?buf, value, "MCP3221 sample");
        Ok(value)
    }

    /// Volts per LSB as (integer part, nano part).
    pub fn scale(&self) -> (i32, i32) {
        (0, SCALE_NANO)
    }

    /// Conversion rate in Hz.
    pub fn sampling_frequency(&self) -> i32 {
        SAMPLING_FREQUENCY_HZ
    }

    /// Release the bus handle when the device is detached.
    pub fn into_inner(self) -> I {
        self.i2c.into_inner()
    }
}

/// Convert a raw code to microvolts, truncating toward zero.
pub fn raw_to_microvolts(raw: i32) -> i64 {
    const NANOVOLTS_PER_MICROVOLT: i64 = 1_000;
    raw as i64 * SCALE_NANO as i64 / NANOVOLTS_PER_MICROVOLT
}

/// Convert a raw code to millivolts, truncating toward zero.
fn raw_to_millivolts(raw: i32) -> i32 {
    (raw_to_microvolts(raw) / 1_000) as i32
}

#[async_trait]
impl<I: I2c> Adc for Mcp3221<I> {
    // Single input, so every channel reads the same conversion.
    async fn read_raw(&self, _channel: AdcChannel) -> hw_trait::Result<i32> {
        Mcp3221::read_raw(self).await.map_err(HwError::from)
    }

    async fn read_millivolts(&self, channel: AdcChannel) -> hw_trait::Result<i32> {
        let raw = Adc::read_raw(self, channel).await?;
        Ok(raw_to_millivolts(raw))
    }
}

#[async_trait]
impl<I: I2c> IioDevice for Mcp3221<I> {
    type Error = AdcError;

    fn name(&self) -> &str {
        &self.name
    }

    fn channels(&self) -> &[ChannelSpec] {
        &MCP3221_CHANNELS
    }

    // The channel index is not consulted: there is one physical input.
    async fn read_info(&self, _chan: &ChannelSpec, info: ChanInfo) -> Result<IioValue, AdcError> {
        match info {
            ChanInfo::Raw => Ok(IioValue::Int(self.read_raw().await?)),
            ChanInfo::Scale => {
                let (int, nano) = self.scale();
                Ok(IioValue::IntPlusNano(int, nano))
            }
            ChanInfo::SampFreq => Ok(IioValue::Int(self.sampling_frequency())),
            ChanInfo::Processed | ChanInfo::Offset => {
                debug!(device = %self.name, ?info, "Rejected read request");
                Err(AdcError::InvalidRequest {
                    info,
                    reason: "not exposed by this device",
                })
            }
        }
    }

    fn write_info(
        &self,
        _chan: &ChannelSpec,
        info: ChanInfo,
        value: IioValue,
    ) -> Result<(), AdcError> {
        debug!(device = %self.name, ?info, %value, "Rejected write request");
        Err(AdcError::InvalidRequest {
            info,
            reason: "device has no writable attributes",
        })
    }

    fn write_info_format(&self, _chan: &ChannelSpec, info: ChanInfo) -> Result<ValueFormat, AdcError> {
        match info {
            ChanInfo::Scale => Ok(ValueFormat::IntPlusNano),
            ChanInfo::SampFreq => Ok(ValueFormat::IntPlusMicro),
            ChanInfo::Raw | ChanInfo::Processed | ChanInfo::Offset => {
                Err(AdcError::InvalidRequest {
                    info,
                    reason: "no write format defined",
                })
            }
        }
    }

    fn extra_attributes(&self) -> Vec<(&'static str, String)> {
        let (int, nano) = self.scale();
        vec![
            (
                "sampling_frequency_available",
                IioValue::Int(self.sampling_frequency()).to_string(),
            ),
            (
                "in_voltage_scale_available",
                IioValue::IntPlusNano(int, nano).to_string(),
            ),
        ]
    }
}
